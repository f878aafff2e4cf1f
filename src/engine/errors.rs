//! Query errors.
//!
//! - `Rejected`: the document failed validation (planner)
//! - `Failed`: a validated query could not be executed (executor)

use thiserror::Error;

use crate::executor::{ExecutorError, ExecutorErrorCode};
use crate::planner::PlannerError;

/// Why a query produced no rows
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    #[error("{0}")]
    Rejected(#[from] PlannerError),

    #[error("{0}")]
    Failed(#[from] ExecutorError),
}

impl QueryError {
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Rejected(e) => e.code().code(),
            QueryError::Failed(e) => e.code().code(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            QueryError::Rejected(e) => e.message(),
            QueryError::Failed(e) => e.message(),
        }
    }

    /// Every query error is a client error.
    pub fn status_code(&self) -> u16 {
        400
    }

    pub fn is_too_large(&self) -> bool {
        matches!(self, QueryError::Failed(e) if e.code() == ExecutorErrorCode::QueryResultTooLarge)
    }
}
