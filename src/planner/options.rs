//! Validates OPTIONS (COLUMNS + ORDER).

use serde_json::Value;

use super::ast::{ColumnKey, OrderSpec, SortDirection};
use super::context::{is_alias, BindingContext};
use super::errors::{PlannerError, PlannerResult};

/// Validated OPTIONS clause
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub columns: Vec<ColumnKey>,
    pub order: Option<OrderSpec>,
}

pub struct OptionsBuilder;

impl OptionsBuilder {
    pub fn build(value: &Value, ctx: &mut BindingContext) -> PlannerResult<Options> {
        let object = value
            .as_object()
            .ok_or_else(|| PlannerError::query_invalid("OPTIONS must be an object"))?;

        if let Some(extra) = object.keys().find(|k| *k != "COLUMNS" && *k != "ORDER") {
            return Err(PlannerError::invalid_key(
                extra.as_str(),
                "OPTIONS only accepts COLUMNS and ORDER",
            ));
        }

        let columns = object
            .get("COLUMNS")
            .ok_or_else(|| PlannerError::query_invalid("OPTIONS missing COLUMNS"))?;
        let columns = Self::build_columns(columns, ctx)?;

        let order = match object.get("ORDER") {
            Some(order) => Some(Self::build_order(order, &columns, ctx)?),
            None => None,
        };

        Ok(Options { columns, order })
    }

    fn build_columns(value: &Value, ctx: &mut BindingContext) -> PlannerResult<Vec<ColumnKey>> {
        let keys = value
            .as_array()
            .filter(|keys| !keys.is_empty())
            .ok_or_else(|| PlannerError::query_invalid("COLUMNS must be a non-empty array"))?;

        keys.iter()
            .map(|key| {
                let key = key
                    .as_str()
                    .ok_or_else(|| PlannerError::query_invalid("COLUMNS keys must be strings"))?;
                parse_key(key, ctx)
            })
            .collect()
    }

    fn build_order(
        value: &Value,
        columns: &[ColumnKey],
        ctx: &mut BindingContext,
    ) -> PlannerResult<OrderSpec> {
        let spec = match value {
            Value::String(key) => OrderSpec::ascending(parse_key(key, ctx)?),
            Value::Object(object) => {
                if let Some(extra) = object.keys().find(|k| *k != "dir" && *k != "keys") {
                    return Err(PlannerError::invalid_key(
                        extra.as_str(),
                        "ORDER only accepts dir and keys",
                    ));
                }

                let direction = match object.get("dir").and_then(Value::as_str) {
                    Some("UP") => SortDirection::Up,
                    Some("DOWN") => SortDirection::Down,
                    _ => return Err(PlannerError::query_invalid("ORDER dir must be UP or DOWN")),
                };

                let keys = object
                    .get("keys")
                    .and_then(Value::as_array)
                    .filter(|keys| !keys.is_empty())
                    .ok_or_else(|| {
                        PlannerError::query_invalid("ORDER keys must be a non-empty array")
                    })?;
                let keys = keys
                    .iter()
                    .map(|key| {
                        let key = key.as_str().ok_or_else(|| {
                            PlannerError::query_invalid("ORDER keys must be strings")
                        })?;
                        parse_key(key, ctx)
                    })
                    .collect::<PlannerResult<Vec<_>>>()?;

                OrderSpec { direction, keys }
            }
            _ => return Err(PlannerError::query_invalid("ORDER must be a string or an object")),
        };

        for key in &spec.keys {
            if !columns.contains(key) {
                let name = match key {
                    ColumnKey::Field(field) => field.as_str().to_string(),
                    ColumnKey::Alias(alias) => alias.clone(),
                };
                return Err(PlannerError::invalid_key(name, "ORDER key must be in COLUMNS"));
            }
        }

        Ok(spec)
    }
}

fn parse_key(key: &str, ctx: &mut BindingContext) -> PlannerResult<ColumnKey> {
    if is_alias(key) {
        if key.is_empty() {
            return Err(PlannerError::query_invalid("empty key"));
        }
        return Ok(ColumnKey::Alias(key.to_string()));
    }
    ctx.resolve_key(key).map(ColumnKey::Field)
}
