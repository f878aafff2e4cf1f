//! Query Executor subsystem for campusdb
//!
//! Consumes validated plans and produces deterministic result rows.
//!
//! # Execution Flow (strict order)
//!
//! 1. Filter records by the predicate tree
//! 2. Group records (identity groups without TRANSFORMATIONS)
//! 3. Compute aggregates per group
//! 4. Project the requested columns
//! 5. Fail if the row count exceeds the cap
//! 6. Sort
//!
//! Type mismatches discovered while reading records fail the whole query;
//! there are no partial results.

mod aggregates;
mod errors;
mod executor;
mod filters;
mod grouping;
mod projection;
mod result;
mod sorter;

pub use aggregates::Aggregator;
pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult};
pub use executor::{QueryExecutor, RESULT_LIMIT};
pub use filters::PredicateFilter;
pub use grouping::{Group, GroupKeyPart, GroupedRow, Grouper};
pub use projection::Projector;
pub use result::{ExecutionResult, ResultRow};
pub use sorter::ResultSorter;
