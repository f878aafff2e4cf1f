//! Planner error types
//!
//! Error codes:
//! - QUERY_INVALID (REJECT)
//! - QUERY_DATASET_MISMATCH (REJECT)

use std::fmt;

/// Severity levels for planner errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Planner-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerErrorCode {
    /// Malformed or semantically invalid query document
    QueryInvalid,
    /// Query references fields the target dataset kind does not carry
    QueryDatasetMismatch,
}

impl PlannerErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            PlannerErrorCode::QueryInvalid => "QUERY_INVALID",
            PlannerErrorCode::QueryDatasetMismatch => "QUERY_DATASET_MISMATCH",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for PlannerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Planner error type with full context
#[derive(Debug, Clone)]
pub struct PlannerError {
    /// Error code
    code: PlannerErrorCode,
    /// Human-readable message
    message: String,
    /// Offending key if applicable
    field: Option<String>,
}

impl PlannerError {
    /// Create a query invalid error
    pub fn query_invalid(reason: impl Into<String>) -> Self {
        Self {
            code: PlannerErrorCode::QueryInvalid,
            message: reason.into(),
            field: None,
        }
    }

    /// Create a query invalid error pointing at a specific key
    pub fn invalid_key(key: impl Into<String>, reason: impl fmt::Display) -> Self {
        let k = key.into();
        Self {
            code: PlannerErrorCode::QueryInvalid,
            message: format!("Invalid key '{}': {}", k, reason),
            field: Some(k),
        }
    }

    /// Create an error for a query that names two different datasets
    pub fn conflicting_datasets(bound: &str, other: &str) -> Self {
        Self {
            code: PlannerErrorCode::QueryInvalid,
            message: format!(
                "Query references more than one dataset: '{}' and '{}'",
                bound, other
            ),
            field: None,
        }
    }

    /// Create a dataset mismatch error
    pub fn dataset_mismatch(field: impl Into<String>, kind: impl fmt::Display) -> Self {
        let f = field.into();
        Self {
            code: PlannerErrorCode::QueryDatasetMismatch,
            message: format!("Field '{}' does not exist on {} datasets", f, kind),
            field: Some(f),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> PlannerErrorCode {
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

    /// Returns the offending key if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for PlannerError {
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

impl std::error::Error for PlannerError {}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PlannerErrorCode::QueryInvalid.code(), "QUERY_INVALID");
        assert_eq!(
            PlannerErrorCode::QueryDatasetMismatch.code(),
            "QUERY_DATASET_MISMATCH"
        );
    }

    #[test]
    fn test_error_display() {
        let err = PlannerError::invalid_key("sections_average", "unknown field");
        let display = format!("{}", err);
        assert!(display.starts_with("[REJECT] QUERY_INVALID"));
        assert!(display.contains("sections_average"));
        assert_eq!(err.field(), Some("sections_average"));
    }

    #[test]
    fn test_dataset_mismatch() {
        let err = PlannerError::dataset_mismatch("avg", "rooms");
        assert_eq!(err.code(), PlannerErrorCode::QueryDatasetMismatch);
        assert!(err.message().contains("rooms"));
    }
}
