//! API request types
//!
//! One JSON object per request, dispatched on `op`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dataset::DatasetKind;

use super::errors::{ApiError, ApiResult};

/// Add-dataset request
#[derive(Debug, Clone, PartialEq)]
pub struct AddRequest {
    pub id: String,
    pub kind: DatasetKind,
    pub records: Value,
}

/// Unified request envelope
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Query(Value),
    Add(AddRequest),
    Remove { id: String },
    List,
    Stats,
}

/// Raw request for parsing
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawRequest {
    op: String,
    #[serde(default)]
    query: Option<Value>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    records: Option<Value>,
}

impl Request {
    /// Parse a request from JSON string
    pub fn parse(json: &str) -> ApiResult<Self> {
        let raw: RawRequest = serde_json::from_str(json)
            .map_err(|e| ApiError::invalid_request(format!("Invalid JSON: {}", e)))?;

        match raw.op.as_str() {
            "query" => {
                let query = raw
                    .query
                    .ok_or_else(|| ApiError::invalid_request("Missing query"))?;
                Ok(Request::Query(query))
            }
            "add" => {
                let id = raw.id.ok_or_else(|| ApiError::invalid_request("Missing id"))?;
                let kind = match raw.kind.as_deref() {
                    Some("sections") => DatasetKind::Sections,
                    Some("rooms") => DatasetKind::Rooms,
                    Some(other) => {
                        return Err(ApiError::invalid_request(format!(
                            "Unknown dataset kind: {}",
                            other
                        )))
                    }
                    None => return Err(ApiError::invalid_request("Missing kind")),
                };
                let records = raw
                    .records
                    .ok_or_else(|| ApiError::invalid_request("Missing records"))?;
                Ok(Request::Add(AddRequest { id, kind, records }))
            }
            "remove" => {
                let id = raw.id.ok_or_else(|| ApiError::invalid_request("Missing id"))?;
                Ok(Request::Remove { id })
            }
            "list" => Ok(Request::List),
            "stats" => Ok(Request::Stats),
            other => Err(ApiError::unknown_operation(other)),
        }
    }
}
