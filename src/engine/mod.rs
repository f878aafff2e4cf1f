//! Query coordinator
//!
//! Drives a query document through its lifecycle. The states are types:
//!
//! - UNVALIDATED: a raw `serde_json::Value`
//! - VALIDATED: [`ValidatedQuery`], returned by [`QueryEngine::validate`]
//! - REJECTED: the `PlannerError` returned instead
//! - EXECUTED: [`ValidatedQuery::execute`] consumes the query
//!
//! A rejected document never reaches the executor.

mod errors;

pub use errors::QueryError;

use serde_json::Value;

use crate::dataset::{DatasetKind, Record};
use crate::executor::{ExecutionResult, ExecutorResult, QueryExecutor};
use crate::planner::{PlannerResult, QueryPlan, QueryPlanner};

/// Validates and executes query documents
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    executor: QueryExecutor,
}

impl QueryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a row cap other than the standard 5000
    pub fn with_result_limit(result_limit: usize) -> Self {
        Self {
            executor: QueryExecutor::with_result_limit(result_limit),
        }
    }

    pub fn result_limit(&self) -> usize {
        self.executor.result_limit()
    }

    /// Validates a raw query document.
    pub fn validate(&self, document: &Value) -> PlannerResult<ValidatedQuery<'_>> {
        let plan = QueryPlanner::plan(document)?;
        Ok(ValidatedQuery { engine: self, plan })
    }

    /// Validates, checks the plan against `R`'s kind, then executes.
    pub fn run<R: Record>(&self, document: &Value, records: &[R]) -> Result<ExecutionResult, QueryError> {
        let query = self.validate(document)?;
        query.check_kind(R::KIND)?;
        Ok(query.execute(records)?)
    }
}

/// A query that passed validation and has not run yet
#[derive(Debug, Clone)]
pub struct ValidatedQuery<'e> {
    engine: &'e QueryEngine,
    plan: QueryPlan,
}

impl<'e> ValidatedQuery<'e> {
    /// The dataset name every key in the query is bound to
    pub fn dataset(&self) -> &str {
        &self.plan.dataset
    }

    pub fn plan(&self) -> &QueryPlan {
        &self.plan
    }

    /// Rejects the query if it references fields `kind` does not carry.
    pub fn check_kind(&self, kind: DatasetKind) -> PlannerResult<()> {
        QueryPlanner::check_kind(&self.plan, kind)
    }

    /// Executes against the records of the bound dataset.
    pub fn execute<R: Record>(self, records: &[R]) -> ExecutorResult<ExecutionResult> {
        self.engine.executor.execute(&self.plan, records)
    }
}
