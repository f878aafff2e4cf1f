//! Metrics registry for campusdb
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde_json::Value;

/// Metrics registry containing all operational counters
///
/// Counters use Relaxed ordering; readers only need eventually exact values.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Query documents received
    queries_received: AtomicU64,
    /// Queries that passed validation
    queries_validated: AtomicU64,
    /// Queries rejected by validation, kind check or unknown dataset
    queries_rejected: AtomicU64,
    /// Queries that produced a result
    queries_executed: AtomicU64,
    /// Queries that failed while executing
    execution_failures: AtomicU64,
    /// Subset of execution failures caused by the row cap
    results_too_large: AtomicU64,
    /// Datasets registered
    datasets_added: AtomicU64,
    /// Datasets removed
    datasets_removed: AtomicU64,
    /// Total rows returned by successful queries
    rows_returned: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    // Query metrics

    pub fn increment_queries_received(&self) {
        self.queries_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_validated(&self) {
        self.queries_validated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a successful query and the rows it returned
    pub fn record_query_executed(&self, rows: usize) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
        self.rows_returned.fetch_add(rows as u64, Ordering::Relaxed);
    }

    /// Records a failed execution
    pub fn record_execution_failure(&self, too_large: bool) {
        self.execution_failures.fetch_add(1, Ordering::Relaxed);
        if too_large {
            self.results_too_large.fetch_add(1, Ordering::Relaxed);
        }
    }

    // Dataset metrics

    pub fn increment_datasets_added(&self) {
        self.datasets_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_datasets_removed(&self) {
        self.datasets_removed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_received: self.queries_received.load(Ordering::Relaxed),
            queries_validated: self.queries_validated.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            execution_failures: self.execution_failures.load(Ordering::Relaxed),
            results_too_large: self.results_too_large.load(Ordering::Relaxed),
            datasets_added: self.datasets_added.load(Ordering::Relaxed),
            datasets_removed: self.datasets_removed.load(Ordering::Relaxed),
            rows_returned: self.rows_returned.load(Ordering::Relaxed),
        }
    }

    /// Current values as a JSON object
    pub fn to_json(&self) -> Value {
        self.snapshot().to_json()
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub queries_received: u64,
    pub queries_validated: u64,
    pub queries_rejected: u64,
    pub queries_executed: u64,
    pub execution_failures: u64,
    pub results_too_large: u64,
    pub datasets_added: u64,
    pub datasets_removed: u64,
    pub rows_returned: u64,
}

impl MetricsSnapshot {
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
