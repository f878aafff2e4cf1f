//! API Layer for campusdb
//!
//! Line-oriented JSON requests in, JSON responses out.
//!
//! # Design Principles
//!
//! - Error codes passed through unchanged
//! - Every response carries the HTTP status a server front end would use
//! - No timestamps, no generated IDs, no metadata injection
//!
//! # Supported Operations
//!
//! - query
//! - add
//! - remove
//! - list
//! - stats

mod errors;
mod handler;
mod request;
mod response;

pub use errors::{ApiError, ApiErrorCode, ApiResult};
pub use handler::ApiHandler;
pub use request::{AddRequest, Request};
pub use response::{ErrorResponse, Response, SuccessResponse};
