//! In-memory dataset registry.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::dataset::{DatasetKind, DatasetRecords};
use crate::engine::{QueryEngine, QueryError};
use crate::executor::ExecutionResult;
use crate::observability::{log_event_with_fields, Event, MetricsRegistry, ObservationScope};

use super::errors::{CatalogError, CatalogResult};
use super::snapshot;

/// One row of `list_datasets`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub id: String,
    pub kind: DatasetKind,
    #[serde(rename = "numRows")]
    pub num_rows: usize,
}

/// Registered datasets plus the engine that queries them
#[derive(Debug)]
pub struct DatasetCatalog {
    datasets: BTreeMap<String, DatasetRecords>,
    engine: QueryEngine,
    metrics: MetricsRegistry,
    log_queries: bool,
}

impl DatasetCatalog {
    pub fn new() -> Self {
        Self::with_engine(QueryEngine::new())
    }

    pub fn with_engine(engine: QueryEngine) -> Self {
        Self {
            datasets: BTreeMap::new(),
            engine,
            metrics: MetricsRegistry::new(),
            log_queries: true,
        }
    }

    /// Turns per-query log lines on or off
    pub fn with_query_logging(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub fn get(&self, id: &str) -> Option<&DatasetRecords> {
        self.datasets.get(id)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Registers a dataset and returns every registered id.
    pub fn add_dataset(
        &mut self,
        id: &str,
        records: impl Into<DatasetRecords>,
    ) -> CatalogResult<Vec<String>> {
        validate_id(id)?;
        if self.datasets.contains_key(id) {
            return Err(CatalogError::DuplicateId(id.to_string()));
        }

        let records = records.into();
        if records.is_empty() {
            return Err(CatalogError::EmptyDataset(id.to_string()));
        }

        let kind = records.kind();
        let rows = records.len().to_string();
        self.datasets.insert(id.to_string(), records);
        self.metrics.increment_datasets_added();
        log_event_with_fields(
            Event::DatasetAdded,
            &[("id", id), ("kind", kind.as_str()), ("rows", &rows)],
        );

        Ok(self.datasets.keys().cloned().collect())
    }

    /// Removes a dataset and returns its id.
    pub fn remove_dataset(&mut self, id: &str) -> CatalogResult<String> {
        validate_id(id)?;
        if self.datasets.remove(id).is_none() {
            return Err(CatalogError::NotFound(id.to_string()));
        }

        self.metrics.increment_datasets_removed();
        log_event_with_fields(Event::DatasetRemoved, &[("id", id)]);
        Ok(id.to_string())
    }

    /// Summaries of every dataset, sorted by id.
    pub fn list_datasets(&self) -> Vec<DatasetSummary> {
        self.datasets
            .iter()
            .map(|(id, records)| DatasetSummary {
                id: id.clone(),
                kind: records.kind(),
                num_rows: records.len(),
            })
            .collect()
    }

    /// Validates `query`, resolves its dataset and executes it.
    pub fn perform_query(&self, query: &Value) -> CatalogResult<ExecutionResult> {
        self.metrics.increment_queries_received();
        self.log_query(Event::QueryReceived, &[]);

        let validated = match self.engine.validate(query) {
            Ok(v) => v,
            Err(e) => return Err(self.reject(QueryError::from(e))),
        };

        let dataset = validated.dataset().to_string();
        let records = match self.datasets.get(&dataset) {
            Some(records) => records,
            None => {
                self.metrics.increment_queries_rejected();
                self.log_query(
                    Event::QueryRejected,
                    &[("code", "DATASET_NOT_FOUND"), ("dataset", &dataset)],
                );
                return Err(CatalogError::NotFound(dataset));
            }
        };

        if let Err(e) = validated.check_kind(records.kind()) {
            return Err(self.reject(QueryError::from(e)));
        }
        self.metrics.increment_queries_validated();
        self.log_query(Event::QueryValidated, &[("dataset", &dataset)]);

        let outcome = match records {
            DatasetRecords::Sections(rows) => validated.execute(rows),
            DatasetRecords::Rooms(rows) => validated.execute(rows),
        };

        match outcome {
            Ok(result) => {
                self.metrics.record_query_executed(result.len());
                let rows = result.len().to_string();
                let scanned = result.scanned_count.to_string();
                self.log_query(
                    Event::QueryExecuted,
                    &[("dataset", &dataset), ("rows", &rows), ("scanned", &scanned)],
                );
                Ok(result)
            }
            Err(e) => {
                self.metrics.record_execution_failure(e.is_too_large());
                self.log_query(
                    Event::QueryFailed,
                    &[
                        ("code", e.code().code()),
                        ("dataset", &dataset),
                        ("message", e.message()),
                    ],
                );
                Err(QueryError::from(e).into())
            }
        }
    }

    /// Loads every snapshot in `dir`. Returns the number of datasets added.
    pub fn load_dir(&mut self, dir: &Path) -> CatalogResult<usize> {
        let dir_display = dir.display().to_string();
        let scope = ObservationScope::with_fields("DATASET_LOAD", &[("data_dir", &dir_display)]);

        let snapshots = match snapshot::load_snapshots(dir) {
            Ok(s) => s,
            Err(e) => {
                scope.fail(&e.to_string());
                return Err(e);
            }
        };

        let count = snapshots.len();
        for snap in snapshots {
            if let Err(e) = self.add_dataset(&snap.id, snap.records) {
                scope.fail(&e.to_string());
                return Err(e);
            }
        }

        let count_str = count.to_string();
        scope.complete_with_fields(&[("datasets", &count_str)]);
        log_event_with_fields(Event::DatasetsLoaded, &[("count", &count_str)]);
        Ok(count)
    }

    fn reject(&self, error: QueryError) -> CatalogError {
        self.metrics.increment_queries_rejected();
        self.log_query(
            Event::QueryRejected,
            &[("code", error.code()), ("message", error.message())],
        );
        CatalogError::Query(error)
    }

    fn log_query(&self, event: Event, fields: &[(&str, &str)]) {
        if self.log_queries {
            log_event_with_fields(event, fields);
        }
    }
}

impl Default for DatasetCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Ids are checked after trimming: empty, whitespace-only and
/// underscore-containing ids are rejected. An id also has to work as a
/// snapshot file name, so `.`, `..` and path separators are out.
fn validate_id(id: &str) -> CatalogResult<()> {
    let trimmed = id.trim();
    if trimmed.is_empty() || trimmed.contains('_') || !snapshot::is_plain_file_name(trimmed) {
        return Err(CatalogError::InvalidId(id.to_string()));
    }
    Ok(())
}
