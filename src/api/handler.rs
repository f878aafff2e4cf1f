//! API Handler for campusdb
//!
//! Parses one request line, dispatches it to the catalog and formats the
//! response. The handler holds the catalog mutably, so requests are
//! serialized by construction.

use std::path::PathBuf;

use serde_json::{json, Value};

use crate::catalog::{records_from_value, remove_snapshot, save_snapshot, DatasetCatalog};

use super::errors::{ApiError, ApiResult};
use super::request::{AddRequest, Request};
use super::response::Response;

/// Request dispatcher over a dataset catalog
pub struct ApiHandler<'a> {
    catalog: &'a mut DatasetCatalog,

    /// When set, added datasets are written here and removed ones deleted
    snapshot_dir: Option<PathBuf>,
}

impl<'a> ApiHandler<'a> {
    pub fn new(catalog: &'a mut DatasetCatalog) -> Self {
        Self {
            catalog,
            snapshot_dir: None,
        }
    }

    /// Persist dataset changes as snapshot files in `dir`
    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(dir.into());
        self
    }

    /// Handle a raw JSON request string
    pub fn handle(&mut self, json_request: &str) -> Response {
        let request = match Request::parse(json_request) {
            Ok(r) => r,
            Err(e) => return Response::error(&e),
        };

        let result = match request {
            Request::Query(q) => self.handle_query(&q),
            Request::Add(r) => self.handle_add(r),
            Request::Remove { id } => self.handle_remove(&id),
            Request::List => self.handle_list(),
            Request::Stats => Ok(self.handle_stats()),
        };

        match result {
            Ok(data) => Response::success(data),
            Err(e) => Response::error(&e),
        }
    }

    fn handle_query(&self, query: &Value) -> ApiResult<Value> {
        let result = self.catalog.perform_query(query)?;
        Ok(result.to_json())
    }

    /// Flow:
    /// 1. Decode records for the declared kind
    /// 2. Register with the catalog
    /// 3. Write the snapshot, if persisting
    /// 4. On a failed write, unregister so the add can be retried
    fn handle_add(&mut self, req: AddRequest) -> ApiResult<Value> {
        let records = records_from_value(req.kind, req.records)
            .map_err(|e| ApiError::invalid_request(format!("Invalid records: {}", e)))?;

        let ids = self.catalog.add_dataset(&req.id, records)?;

        let saved = match (&self.snapshot_dir, self.catalog.get(&req.id)) {
            (Some(dir), Some(records)) => save_snapshot(dir, &req.id, records).map(|_| ()),
            _ => Ok(()),
        };
        if let Err(e) = saved {
            let _ = self.catalog.remove_dataset(&req.id);
            return Err(e.into());
        }

        Ok(json!(ids))
    }

    fn handle_remove(&mut self, id: &str) -> ApiResult<Value> {
        let removed = self.catalog.remove_dataset(id)?;

        if let Some(dir) = &self.snapshot_dir {
            remove_snapshot(dir, &removed)?;
        }

        Ok(json!(removed))
    }

    fn handle_list(&self) -> ApiResult<Value> {
        serde_json::to_value(self.catalog.list_datasets())
            .map_err(|e| ApiError::invalid_request(format!("Failed to serialize list: {}", e)))
    }

    fn handle_stats(&self) -> Value {
        json!({
            "datasets": self.catalog.len(),
            "metrics": self.catalog.metrics().to_json(),
        })
    }
}
