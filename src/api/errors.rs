//! API error types
//!
//! API errors are pass-through: they preserve the original error codes
//! from lower subsystems (planner, executor, catalog).

use std::fmt;

use crate::catalog::CatalogError;

/// API-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// Invalid request format
    CampusInvalidRequest,
    /// Unknown operation
    CampusUnknownOperation,
    /// Pass-through error from subsystem
    PassThrough,
}

impl ApiErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorCode::CampusInvalidRequest => "CAMPUS_INVALID_REQUEST",
            ApiErrorCode::CampusUnknownOperation => "CAMPUS_UNKNOWN_OPERATION",
            ApiErrorCode::PassThrough => "PASS_THROUGH",
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// API error with preserved subsystem error information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Original error code string (from subsystem or API)
    code: String,
    message: String,
    http_status: u16,
}

impl ApiError {
    /// Create an invalid request error
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::CampusInvalidRequest.code().to_string(),
            message: reason.into(),
            http_status: 400,
        }
    }

    /// Create an unknown operation error
    pub fn unknown_operation(op: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::CampusUnknownOperation.code().to_string(),
            message: format!("Unknown operation: {}", op.into()),
            http_status: 400,
        }
    }

    /// Create from a catalog error (pass-through)
    pub fn from_catalog_error(err: CatalogError) -> Self {
        let message = match &err {
            CatalogError::Query(e) => e.message().to_string(),
            other => other.to_string(),
        };
        Self {
            code: err.code().to_string(),
            message,
            http_status: err.status_code(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status a server front end should answer with
    pub fn http_status(&self) -> u16 {
        self.http_status
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::from_catalog_error(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.http_status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::QueryError;
    use crate::planner::PlannerError;

    #[test]
    fn test_invalid_request_error() {
        let err = ApiError::invalid_request("missing field");
        assert_eq!(err.code(), "CAMPUS_INVALID_REQUEST");
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn test_unknown_operation_error() {
        let err = ApiError::unknown_operation("foo");
        assert_eq!(err.code(), "CAMPUS_UNKNOWN_OPERATION");
        assert!(err.message().contains("foo"));
    }

    #[test]
    fn test_catalog_codes_pass_through() {
        let err = ApiError::from(CatalogError::NotFound("rooms".into()));
        assert_eq!(err.code(), "DATASET_NOT_FOUND");
        assert_eq!(err.http_status(), 404);

        let err = ApiError::from(CatalogError::from(QueryError::from(
            PlannerError::query_invalid("WHERE must be an object"),
        )));
        assert_eq!(err.code(), "QUERY_INVALID");
        assert_eq!(err.message(), "WHERE must be an object");
        assert_eq!(err.to_string(), "[400] QUERY_INVALID: WHERE must be an object");
    }
}
