//! Observability subsystem for campusdb
//!
//! - Structured logging (JSON lines on stderr)
//! - Counter metrics
//! - Lifecycle event tracing
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on query results
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use campusdb::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::QueryExecuted, &[("rows", "42")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.record_query_executed(42);
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{LogLine, Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;

/// Log a typed event on stderr at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let _ = LogLine::for_event(event, fields).write_to(&mut std::io::stderr().lock());
}
