//! Request-scoped validation state.
//!
//! A fresh context is created for every `plan` call. It records the one
//! dataset name the query is allowed to reference.

use crate::dataset::Field;

use super::errors::{PlannerError, PlannerResult};

/// Tracks the dataset name bound by the first qualified key seen.
#[derive(Debug, Default)]
pub struct BindingContext {
    dataset: Option<String>,
}

impl BindingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, or checks it against the name already bound.
    pub fn bind(&mut self, name: &str) -> PlannerResult<()> {
        match &self.dataset {
            Some(bound) if bound != name => Err(PlannerError::conflicting_datasets(bound, name)),
            Some(_) => Ok(()),
            None => {
                self.dataset = Some(name.to_string());
                Ok(())
            }
        }
    }

    /// Resolves a `dataset_field` key and binds its dataset name.
    pub fn resolve_key(&mut self, key: &str) -> PlannerResult<Field> {
        let field = parse_qualified(key)?;
        if let Some((dataset, _)) = key.split_once('_') {
            self.bind(dataset)?;
        }
        Ok(field)
    }

    pub fn dataset(&self) -> Option<&str> {
        self.dataset.as_deref()
    }

    pub fn into_dataset(self) -> Option<String> {
        self.dataset
    }
}

/// Splits `dataset_field` and resolves the field. Exactly one underscore
/// and a non-empty dataset name are required.
fn parse_qualified(key: &str) -> PlannerResult<Field> {
    let mut parts = key.split('_');
    let (dataset, name) = match (parts.next(), parts.next(), parts.next()) {
        (Some(dataset), Some(name), None) => (dataset, name),
        _ => {
            return Err(PlannerError::invalid_key(
                key,
                "expected exactly one underscore",
            ))
        }
    };

    if dataset.is_empty() {
        return Err(PlannerError::invalid_key(key, "missing dataset name"));
    }

    Field::parse(name).ok_or_else(|| PlannerError::invalid_key(key, "unknown field"))
}

/// Returns true if `key` is an alias rather than a qualified field.
pub fn is_alias(key: &str) -> bool {
    !key.contains('_')
}
