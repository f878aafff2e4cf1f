//! Query Planner subsystem for campusdb
//!
//! Validates raw JSON query documents and produces immutable query plans.
//!
//! # Design Principles
//!
//! - Deterministic: same document → same plan
//! - Strict: anything not explicitly allowed is rejected before execution
//! - Single dataset: every qualified key must name the same dataset
//!
//! Field names are resolved to typed [`crate::dataset::Field`] values here,
//! so execution never parses strings.

mod ast;
mod context;
mod errors;
mod filter_builder;
mod options;
mod planner;
mod transformations;

pub use ast::{
    AggregateOp, ApplyRule, ColumnKey, ComparisonOp, Filter, FilterNode, OrderSpec, QueryPlan,
    SortDirection, StringPattern, Transformations,
};
pub use context::BindingContext;
pub use errors::{PlannerError, PlannerErrorCode, PlannerResult};
pub use filter_builder::FilterBuilder;
pub use options::{Options, OptionsBuilder};
pub use planner::QueryPlanner;
pub use transformations::TransformationsBuilder;
