//! Catalog errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::QueryError;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Dataset management errors
#[derive(Debug, Error)]
pub enum CatalogError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Empty, whitespace-only or underscore-containing id
    #[error("Invalid dataset id: '{0}'")]
    InvalidId(String),

    /// Id already registered
    #[error("Dataset already exists: {0}")]
    DuplicateId(String),

    /// A dataset must have at least one record
    #[error("Dataset has no records: {0}")]
    EmptyDataset(String),

    /// Id not registered
    #[error("Dataset not found: {0}")]
    NotFound(String),

    /// Query rejected or failed
    #[error("{0}")]
    Query(#[from] QueryError),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Snapshot file that cannot be parsed
    #[error("Invalid snapshot {}: {reason}", .path.display())]
    InvalidSnapshot { path: PathBuf, reason: String },

    /// Filesystem failure while loading or saving snapshots
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Stable error code; query errors keep their own code
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::InvalidId(_) => "DATASET_INVALID_ID",
            CatalogError::DuplicateId(_) => "DATASET_DUPLICATE_ID",
            CatalogError::EmptyDataset(_) => "DATASET_EMPTY",
            CatalogError::NotFound(_) => "DATASET_NOT_FOUND",
            CatalogError::Query(e) => e.code(),
            CatalogError::InvalidSnapshot { .. } => "DATASET_INVALID_SNAPSHOT",
            CatalogError::Io(_) => "DATASET_IO_ERROR",
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::InvalidId(_)
            | CatalogError::DuplicateId(_)
            | CatalogError::EmptyDataset(_) => 400,
            CatalogError::NotFound(_) => 404,
            CatalogError::Query(e) => e.status_code(),
            CatalogError::InvalidSnapshot { .. } | CatalogError::Io(_) => 500,
        }
    }

    pub(crate) fn invalid_snapshot(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        CatalogError::InvalidSnapshot {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
