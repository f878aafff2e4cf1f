//! Query planner
//!
//! Turns a raw query document into an immutable [`QueryPlan`] or rejects
//! it. Validation order:
//! 1. Top-level shape (WHERE, OPTIONS, optional TRANSFORMATIONS)
//! 2. OPTIONS
//! 3. TRANSFORMATIONS
//! 4. WHERE
//! 5. COLUMNS against GROUP/APPLY
//!
//! Every qualified key seen along the way must name the same dataset.

use serde_json::Value;

use crate::dataset::DatasetKind;

use super::ast::{ColumnKey, QueryPlan, Transformations};
use super::context::BindingContext;
use super::errors::{PlannerError, PlannerResult};
use super::filter_builder::FilterBuilder;
use super::options::OptionsBuilder;
use super::transformations::TransformationsBuilder;

const TOP_LEVEL_KEYS: [&str; 3] = ["WHERE", "OPTIONS", "TRANSFORMATIONS"];

/// Stateless query planner
pub struct QueryPlanner;

impl QueryPlanner {
    /// Plans a query document.
    ///
    /// Deterministic and side-effect free: the binding context lives only
    /// for the duration of this call.
    pub fn plan(document: &Value) -> PlannerResult<QueryPlan> {
        let object = document
            .as_object()
            .ok_or_else(|| PlannerError::query_invalid("Query must be an object"))?;

        if let Some(extra) = object.keys().find(|k| !TOP_LEVEL_KEYS.contains(&k.as_str())) {
            return Err(PlannerError::invalid_key(extra.as_str(), "unexpected top-level key"));
        }

        let where_clause = object
            .get("WHERE")
            .ok_or_else(|| PlannerError::query_invalid("Missing WHERE"))?;
        let options = object
            .get("OPTIONS")
            .ok_or_else(|| PlannerError::query_invalid("Missing OPTIONS"))?;

        let mut ctx = BindingContext::new();

        let options = OptionsBuilder::build(options, &mut ctx)?;
        let transformations = match object.get("TRANSFORMATIONS") {
            Some(t) => Some(TransformationsBuilder::build(t, &mut ctx)?),
            None => None,
        };
        let filter = FilterBuilder::build(where_clause, &mut ctx)?;

        Self::check_columns(&options.columns, transformations.as_ref())?;

        let dataset = ctx
            .into_dataset()
            .ok_or_else(|| PlannerError::query_invalid("Query does not reference a dataset"))?;

        Ok(QueryPlan {
            dataset,
            filter,
            transformations,
            columns: options.columns,
            order: options.order,
        })
    }

    /// Verifies that every field the plan references exists on `kind`.
    pub fn check_kind(plan: &QueryPlan, kind: DatasetKind) -> PlannerResult<()> {
        match plan.referenced_fields().into_iter().find(|f| !kind.has_field(*f)) {
            Some(field) => Err(PlannerError::dataset_mismatch(
                field.qualified(&plan.dataset),
                kind,
            )),
            None => Ok(()),
        }
    }

    /// With TRANSFORMATIONS, COLUMNS is drawn from GROUP and APPLY aliases.
    /// Without it, aliases have nothing to refer to.
    fn check_columns(
        columns: &[ColumnKey],
        transformations: Option<&Transformations>,
    ) -> PlannerResult<()> {
        for column in columns {
            match (column, transformations) {
                (ColumnKey::Field(field), Some(t)) if !t.group.contains(field) => {
                    return Err(PlannerError::invalid_key(
                        field.as_str(),
                        "COLUMNS key must appear in GROUP",
                    ));
                }
                (ColumnKey::Alias(alias), Some(t)) if !t.has_alias(alias) => {
                    return Err(PlannerError::invalid_key(
                        alias.as_str(),
                        "COLUMNS alias is not defined in APPLY",
                    ));
                }
                (ColumnKey::Alias(alias), None) => {
                    return Err(PlannerError::invalid_key(
                        alias.as_str(),
                        "aliases require TRANSFORMATIONS",
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
