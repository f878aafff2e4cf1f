//! Dataset catalog
//!
//! Owns the registered datasets and routes each query to the dataset its
//! keys are bound to. Datasets are loaded from and saved to JSON snapshot
//! files.

mod catalog;
mod errors;
mod snapshot;

pub use catalog::{DatasetCatalog, DatasetSummary};
pub use errors::{CatalogError, CatalogResult};
pub use snapshot::{
    load_snapshot, load_snapshots, records_from_value, remove_snapshot, save_snapshot,
    DatasetSnapshot,
};
