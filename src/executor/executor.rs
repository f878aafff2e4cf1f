//! Query executor for campusdb
//!
//! Executes validated plans against an in-memory record slice.
//!
//! Execution flow (strict order):
//! 1. Filter records by WHERE
//! 2. Group (or treat every record as its own group)
//! 3. Compute APPLY aggregates per group
//! 4. Project COLUMNS
//! 5. Enforce the row cap
//! 6. Sort by ORDER

use crate::dataset::Record;
use crate::planner::{ColumnKey, QueryPlan};

use super::aggregates::Aggregator;
use super::errors::{ExecutorError, ExecutorResult};
use super::filters::PredicateFilter;
use super::grouping::{GroupedRow, Grouper};
use super::projection::Projector;
use super::result::ExecutionResult;
use super::sorter::ResultSorter;

/// Maximum number of rows a query may return
pub const RESULT_LIMIT: usize = 5000;

/// Query executor that processes plans against records
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    result_limit: usize,
}

impl QueryExecutor {
    /// Creates an executor with the standard row cap
    pub fn new() -> Self {
        Self {
            result_limit: RESULT_LIMIT,
        }
    }

    /// Creates an executor with a custom row cap
    pub fn with_result_limit(result_limit: usize) -> Self {
        Self { result_limit }
    }

    pub fn result_limit(&self) -> usize {
        self.result_limit
    }

    /// Executes a query plan and returns results.
    ///
    /// Deterministic: same plan + same records = same rows in the same
    /// order. Results over the row cap fail rather than truncate.
    pub fn execute<R: Record>(&self, plan: &QueryPlan, records: &[R]) -> ExecutorResult<ExecutionResult> {
        // Step 1: Filter
        let mut matched = Vec::new();
        for record in records {
            if PredicateFilter::matches(&plan.filter, record)? {
                matched.push(record);
            }
        }

        // Steps 2-3: Group and aggregate
        let grouped = Self::group_rows(plan, &matched)?;
        let group_count = grouped.len();

        // Step 4: Project
        let mut rows = grouped
            .iter()
            .map(|row| Projector::project(row, &plan.columns, &plan.dataset))
            .collect::<ExecutorResult<Vec<_>>>()?;

        // Step 5: Row cap
        if rows.len() > self.result_limit {
            return Err(ExecutorError::result_too_large(rows.len(), self.result_limit));
        }

        // Step 6: Sort
        if let Some(order) = &plan.order {
            ResultSorter::sort(&mut rows, order, &plan.dataset);
        }

        Ok(ExecutionResult {
            rows,
            scanned_count: records.len(),
            matched_count: matched.len(),
            group_count,
        })
    }

    fn group_rows<R: Record>(plan: &QueryPlan, matched: &[&R]) -> ExecutorResult<Vec<GroupedRow>> {
        let transformations = match &plan.transformations {
            Some(t) => t,
            None => return matched.iter().map(|r| Grouper::identity_row(*r)).collect(),
        };

        let groups = Grouper::partition(matched, &transformations.group)?;
        let mut rows = Vec::with_capacity(groups.len());
        for group in groups {
            let mut row = GroupedRow::new();
            for (field, value) in &group.key {
                row.insert(ColumnKey::Field(*field), value.to_json());
            }
            for rule in &transformations.apply {
                let value = Aggregator::compute(rule, &group.members)?;
                row.insert(ColumnKey::Alias(rule.alias.clone()), value);
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::new()
    }
}
