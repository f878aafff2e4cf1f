//! Column projection
//!
//! Reshapes grouped rows into output rows keyed by `dataset_field` or the
//! alias verbatim.

use crate::planner::ColumnKey;

use super::errors::{ExecutorError, ExecutorResult};
use super::grouping::GroupedRow;
use super::result::ResultRow;

pub struct Projector;

impl Projector {
    /// Selects `columns` from `row`. A missing column fails the query.
    pub fn project(row: &GroupedRow, columns: &[ColumnKey], dataset: &str) -> ExecutorResult<ResultRow> {
        let mut out = ResultRow::new();
        for column in columns {
            let name = column.output_name(dataset);
            let value = row.get(column).ok_or_else(|| {
                ExecutorError::execution_failed(format!("Column '{}' is missing from row", name))
            })?;
            out.insert(name, value.clone());
        }
        Ok(out)
    }
}
