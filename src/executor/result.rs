//! Result types for query execution

use serde_json::{Map, Value};

/// One output row: output key → value
pub type ResultRow = Map<String, Value>;

/// Result of query execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    /// Rows in result order
    pub rows: Vec<ResultRow>,
    /// Number of records scanned
    pub scanned_count: usize,
    /// Number of records that passed WHERE
    pub matched_count: usize,
    /// Number of groups formed (equal to matched_count without TRANSFORMATIONS)
    pub group_count: usize,
}

impl ExecutionResult {
    /// Creates an empty result
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            scanned_count: 0,
            matched_count: 0,
            group_count: 0,
        }
    }

    /// Returns true if no rows were produced
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns an iterator over the rows
    pub fn iter(&self) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter()
    }

    /// Rows as a JSON array
    pub fn to_json(&self) -> Value {
        Value::Array(self.rows.iter().cloned().map(Value::Object).collect())
    }
}
