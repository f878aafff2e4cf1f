//! campusdb - query engine for course sections and campus rooms
//!
//! Datasets are registered in a [`catalog::DatasetCatalog`] and queried
//! with JSON query documents (`WHERE`, `OPTIONS`, `TRANSFORMATIONS`).

pub mod api;
pub mod catalog;
pub mod cli;
pub mod dataset;
pub mod engine;
pub mod executor;
pub mod observability;
pub mod planner;
