//! Executor error types
//!
//! Error codes:
//! - QUERY_EXECUTION_FAILED (ERROR)
//! - QUERY_RESULT_TOO_LARGE (ERROR)

use std::fmt;

/// Severity levels for executor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Query failed, catalog state is untouched
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Executor-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// Type mismatch or missing field while evaluating a plan
    QueryExecutionFailed,
    /// More rows than the configured cap
    QueryResultTooLarge,
}

impl ExecutorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::QueryExecutionFailed => "QUERY_EXECUTION_FAILED",
            ExecutorErrorCode::QueryResultTooLarge => "QUERY_RESULT_TOO_LARGE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error type with full context
#[derive(Debug, Clone)]
pub struct ExecutorError {
    /// Error code
    code: ExecutorErrorCode,
    /// Human-readable message
    message: String,
    /// Row count that exceeded the cap, if applicable
    row_count: Option<usize>,
}

impl ExecutorError {
    /// Create an execution failed error
    pub fn execution_failed(reason: impl Into<String>) -> Self {
        Self {
            code: ExecutorErrorCode::QueryExecutionFailed,
            message: reason.into(),
            row_count: None,
        }
    }

    /// Create a type mismatch error for a field read during evaluation
    pub fn type_mismatch(field: impl fmt::Display, expected: &str, found: &str) -> Self {
        Self::execution_failed(format!(
            "Field '{}' expected {} but found {}",
            field, expected, found
        ))
    }

    /// Create a missing field error
    pub fn missing_field(field: impl fmt::Display) -> Self {
        Self::execution_failed(format!("Field '{}' is absent on record", field))
    }

    /// Create a result too large error
    pub fn result_too_large(row_count: usize, limit: usize) -> Self {
        Self {
            code: ExecutorErrorCode::QueryResultTooLarge,
            message: format!(
                "Query produced {} rows, more than the limit of {}",
                row_count, limit
            ),
            row_count: Some(row_count),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ExecutorErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending row count for too-large results
    pub fn row_count(&self) -> Option<usize> {
        self.row_count
    }

    /// Returns whether the result exceeded the row cap
    pub fn is_too_large(&self) -> bool {
        self.code == ExecutorErrorCode::QueryResultTooLarge
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for ExecutorError {}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
