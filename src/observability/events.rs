//! Observable events for campusdb
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Snapshot directory loaded into the catalog
    DatasetsLoaded,
    /// Serving loop ready for requests
    Serving,
    /// Serving loop reached end of input
    ShutdownComplete,

    // Datasets
    /// Dataset registered
    DatasetAdded,
    /// Dataset removed
    DatasetRemoved,

    // Queries
    /// Query document received
    QueryReceived,
    /// Query passed validation
    QueryValidated,
    /// Query failed validation
    QueryRejected,
    /// Query executed successfully
    QueryExecuted,
    /// Query failed during execution
    QueryFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DatasetsLoaded => "DATASETS_LOADED",
            Event::Serving => "CAMPUSDB_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::DatasetAdded => "DATASET_ADDED",
            Event::DatasetRemoved => "DATASET_REMOVED",

            Event::QueryReceived => "QUERY_RECEIVED",
            Event::QueryValidated => "QUERY_VALIDATED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryFailed => "QUERY_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryRejected | Event::QueryFailed => Severity::Warn,
            Event::QueryReceived | Event::QueryValidated => Severity::Trace,
            _ => Severity::Info,
        }
    }

    /// Returns true for per-query events, which can be switched off
    pub fn is_query_event(&self) -> bool {
        matches!(
            self,
            Event::QueryReceived
                | Event::QueryValidated
                | Event::QueryRejected
                | Event::QueryExecuted
                | Event::QueryFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
