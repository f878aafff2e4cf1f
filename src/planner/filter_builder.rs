//! Builds the predicate tree from a WHERE clause.

use serde_json::{Map, Value};

use super::ast::{ComparisonOp, Filter, FilterNode, StringPattern};
use super::context::BindingContext;
use super::errors::{PlannerError, PlannerResult};

/// Validates WHERE and converts it into a [`Filter`].
pub struct FilterBuilder;

impl FilterBuilder {
    /// Builds the root filter. `{}` matches every record.
    pub fn build(clause: &Value, ctx: &mut BindingContext) -> PlannerResult<Filter> {
        let object = clause
            .as_object()
            .ok_or_else(|| PlannerError::query_invalid("WHERE must be an object"))?;

        if object.is_empty() {
            return Ok(Filter::match_all());
        }

        let node = Self::build_node(object, ctx)?;
        Ok(Filter::match_all().with_node(node))
    }

    fn build_node(object: &Map<String, Value>, ctx: &mut BindingContext) -> PlannerResult<FilterNode> {
        let (key, value) = single_entry(object, "Filter")?;

        match key.as_str() {
            "AND" => Ok(FilterNode::And(Self::build_list(key, value, ctx)?)),
            "OR" => Ok(FilterNode::Or(Self::build_list(key, value, ctx)?)),
            "NOT" => {
                let inner = value
                    .as_object()
                    .ok_or_else(|| PlannerError::query_invalid("NOT must be an object"))?;
                Ok(FilterNode::not(Self::build_node(inner, ctx)?))
            }
            "IS" => Self::build_string_match(value, ctx),
            other => match ComparisonOp::from_key(other) {
                Some(op) => Self::build_comparison(op, value, ctx),
                None => Err(PlannerError::query_invalid(format!(
                    "Invalid filter key '{}'",
                    other
                ))),
            },
        }
    }

    fn build_list(
        op: &str,
        value: &Value,
        ctx: &mut BindingContext,
    ) -> PlannerResult<Vec<FilterNode>> {
        let items = value
            .as_array()
            .filter(|items| !items.is_empty())
            .ok_or_else(|| PlannerError::query_invalid(format!("{} must be a non-empty array", op)))?;

        items
            .iter()
            .map(|item| {
                let object = item.as_object().ok_or_else(|| {
                    PlannerError::query_invalid(format!("{} entries must be objects", op))
                })?;
                Self::build_node(object, ctx)
            })
            .collect()
    }

    fn build_comparison(
        op: ComparisonOp,
        value: &Value,
        ctx: &mut BindingContext,
    ) -> PlannerResult<FilterNode> {
        let object = value.as_object().ok_or_else(|| {
            PlannerError::query_invalid(format!("{} must be an object", op.as_str()))
        })?;
        let (key, limit) = single_entry(object, op.as_str())?;
        let field = ctx.resolve_key(key)?;
        let limit = match limit {
            Value::Number(n) => n.as_f64().ok_or_else(|| {
                PlannerError::invalid_key(key.as_str(), "comparison value out of range")
            })?,
            _ => {
                return Err(PlannerError::invalid_key(
                    key.as_str(),
                    format!("{} value must be a number", op.as_str()),
                ))
            }
        };

        Ok(FilterNode::Comparison {
            op,
            field,
            value: limit,
        })
    }

    fn build_string_match(value: &Value, ctx: &mut BindingContext) -> PlannerResult<FilterNode> {
        let object = value
            .as_object()
            .ok_or_else(|| PlannerError::query_invalid("IS must be an object"))?;
        let (key, raw) = single_entry(object, "IS")?;
        let field = ctx.resolve_key(key)?;
        let raw = raw
            .as_str()
            .ok_or_else(|| PlannerError::invalid_key(key.as_str(), "IS value must be a string"))?;

        Ok(FilterNode::StringMatch {
            field,
            pattern: StringPattern::parse(raw)?,
        })
    }
}

/// Returns the only entry of `object`, rejecting zero or several keys.
pub(super) fn single_entry<'a>(
    object: &'a Map<String, Value>,
    what: &str,
) -> PlannerResult<(&'a String, &'a Value)> {
    let mut entries = object.iter();
    match (entries.next(), entries.next()) {
        (Some(entry), None) => Ok(entry),
        _ => Err(PlannerError::query_invalid(format!(
            "{} must have exactly one key, found {}",
            what,
            object.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Field;
    use serde_json::json;

    fn build(clause: Value) -> PlannerResult<Filter> {
        FilterBuilder::build(&clause, &mut BindingContext::new())
    }

    #[test]
    fn test_empty_where_matches_all() {
        assert!(build(json!({})).unwrap().is_match_all());
    }

    #[test]
    fn test_nested_tree() {
        let filter = build(json!({
            "AND": [
                {"GT": {"sections_avg": 90}},
                {"NOT": {"IS": {"sections_dept": "cp*"}}}
            ]
        }))
        .unwrap();

        assert_eq!(
            filter.nodes,
            vec![FilterNode::And(vec![
                FilterNode::gt(Field::Avg, 90.0),
                FilterNode::not(FilterNode::is(Field::Dept, "cp*").unwrap()),
            ])]
        );
    }

    #[test]
    fn test_where_must_be_object() {
        assert!(build(json!([])).is_err());
        assert!(build(json!("x")).is_err());
    }

    #[test]
    fn test_logic_requires_non_empty_array() {
        assert!(build(json!({"AND": []})).is_err());
        assert!(build(json!({"OR": {}})).is_err());
        assert!(build(json!({"AND": [1]})).is_err());
    }

    #[test]
    fn test_not_requires_object_with_key() {
        assert!(build(json!({"NOT": {}})).is_err());
        assert!(build(json!({"NOT": []})).is_err());
    }

    #[test]
    fn test_node_must_have_one_key() {
        assert!(build(json!({"GT": {"sections_avg": 1}, "LT": {"sections_avg": 2}})).is_err());
        assert!(build(json!({"XOR": []})).is_err());
    }

    #[test]
    fn test_comparison_value_types() {
        assert!(build(json!({"GT": {"sections_avg": "90"}})).is_err());
        assert!(build(json!({"GT": {"sections_avg": 90, "sections_pass": 1}})).is_err());
        assert!(build(json!({"GT": {}})).is_err());
        assert!(build(json!({"IS": {"sections_dept": 5}})).is_err());
        assert!(build(json!({"IS": {"sections_dept": "a*b"}})).is_err());
    }

    #[test]
    fn test_binds_dataset() {
        let mut ctx = BindingContext::new();
        FilterBuilder::build(&json!({"EQ": {"rooms_seats": 100}}), &mut ctx).unwrap();
        assert_eq!(ctx.dataset(), Some("rooms"));

        let err = FilterBuilder::build(&json!({"EQ": {"sections_avg": 100}}), &mut ctx);
        assert!(err.is_err());
    }
}
