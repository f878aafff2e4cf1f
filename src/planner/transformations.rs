//! Validates TRANSFORMATIONS (GROUP + APPLY).

use std::collections::HashSet;

use serde_json::Value;

use crate::dataset::Field;

use super::ast::{AggregateOp, ApplyRule, Transformations};
use super::context::BindingContext;
use super::errors::{PlannerError, PlannerResult};
use super::filter_builder::single_entry;

pub struct TransformationsBuilder;

impl TransformationsBuilder {
    pub fn build(value: &Value, ctx: &mut BindingContext) -> PlannerResult<Transformations> {
        let object = value
            .as_object()
            .ok_or_else(|| PlannerError::query_invalid("TRANSFORMATIONS must be an object"))?;

        if let Some(extra) = object.keys().find(|k| *k != "GROUP" && *k != "APPLY") {
            return Err(PlannerError::invalid_key(
                extra.as_str(),
                "TRANSFORMATIONS only accepts GROUP and APPLY",
            ));
        }

        let group = object
            .get("GROUP")
            .ok_or_else(|| PlannerError::query_invalid("TRANSFORMATIONS missing GROUP"))?;
        let apply = object
            .get("APPLY")
            .ok_or_else(|| PlannerError::query_invalid("TRANSFORMATIONS missing APPLY"))?;

        Ok(Transformations {
            group: Self::build_group(group, ctx)?,
            apply: Self::build_apply(apply, ctx)?,
        })
    }

    fn build_group(value: &Value, ctx: &mut BindingContext) -> PlannerResult<Vec<Field>> {
        let keys = value
            .as_array()
            .filter(|keys| !keys.is_empty())
            .ok_or_else(|| PlannerError::query_invalid("GROUP must be a non-empty array"))?;

        keys.iter()
            .map(|key| {
                let key = key
                    .as_str()
                    .ok_or_else(|| PlannerError::query_invalid("GROUP keys must be strings"))?;
                ctx.resolve_key(key)
            })
            .collect()
    }

    fn build_apply(value: &Value, ctx: &mut BindingContext) -> PlannerResult<Vec<ApplyRule>> {
        let rules = value
            .as_array()
            .ok_or_else(|| PlannerError::query_invalid("APPLY must be an array"))?;

        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(rules.len());
        for rule in rules {
            let rule = Self::build_rule(rule, ctx)?;
            if !seen.insert(rule.alias.clone()) {
                return Err(PlannerError::invalid_key(
                    rule.alias.as_str(),
                    "duplicate APPLY alias",
                ));
            }
            out.push(rule);
        }
        Ok(out)
    }

    fn build_rule(value: &Value, ctx: &mut BindingContext) -> PlannerResult<ApplyRule> {
        let object = value
            .as_object()
            .ok_or_else(|| PlannerError::query_invalid("APPLY entries must be objects"))?;
        let (alias, body) = single_entry(object, "APPLY rule")?;
        validate_alias(alias)?;

        let body = body.as_object().ok_or_else(|| {
            PlannerError::invalid_key(alias.as_str(), "APPLY rule body must be an object")
        })?;
        let (token, target) = single_entry(body, "APPLY rule body")?;
        let op = AggregateOp::from_key(token).ok_or_else(|| {
            PlannerError::invalid_key(token.as_str(), "unknown aggregate operator")
        })?;
        let target = target.as_str().ok_or_else(|| {
            PlannerError::invalid_key(alias.as_str(), "aggregate target must be a string")
        })?;

        Ok(ApplyRule {
            alias: alias.clone(),
            op,
            field: ctx.resolve_key(target)?,
        })
    }
}

/// Aliases are non-empty, contain no underscore and never shadow a field
/// name.
fn validate_alias(alias: &str) -> PlannerResult<()> {
    if alias.is_empty() {
        return Err(PlannerError::query_invalid("APPLY alias cannot be empty"));
    }
    if alias.contains('_') {
        return Err(PlannerError::invalid_key(
            alias,
            "APPLY alias cannot contain an underscore",
        ));
    }
    if Field::parse(alias).is_some() {
        return Err(PlannerError::invalid_key(
            alias,
            "APPLY alias cannot be a field name",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(value: Value) -> PlannerResult<Transformations> {
        TransformationsBuilder::build(&value, &mut BindingContext::new())
    }

    #[test]
    fn test_group_and_apply() {
        let t = build(json!({
            "GROUP": ["sections_dept", "sections_year"],
            "APPLY": [
                {"overallAvg": {"AVG": "sections_avg"}},
                {"count": {"COUNT": "sections_uuid"}}
            ]
        }))
        .unwrap();

        assert_eq!(t.group, vec![Field::Dept, Field::Year]);
        assert_eq!(
            t.apply,
            vec![
                ApplyRule::new("overallAvg", AggregateOp::Avg, Field::Avg),
                ApplyRule::new("count", AggregateOp::Count, Field::Uuid),
            ]
        );
    }

    #[test]
    fn test_empty_apply_allowed() {
        let t = build(json!({"GROUP": ["rooms_shortname"], "APPLY": []})).unwrap();
        assert!(t.apply.is_empty());
    }

    #[test]
    fn test_structure_rejected() {
        assert!(build(json!({"GROUP": [], "APPLY": []})).is_err());
        assert!(build(json!({"GROUP": ["sections_dept"]})).is_err());
        assert!(build(json!({"APPLY": []})).is_err());
        assert!(build(json!({"GROUP": ["sections_dept"], "APPLY": {}})).is_err());
        assert!(build(json!({"GROUP": ["sections_dept"], "APPLY": [], "ORDER": 1})).is_err());
        assert!(build(json!({"GROUP": ["maxAvg"], "APPLY": []})).is_err());
    }

    #[test]
    fn test_bad_rules_rejected() {
        let cases = [
            json!({"max_avg": {"MAX": "sections_avg"}}),
            json!({"": {"MAX": "sections_avg"}}),
            json!({"avg": {"MAX": "sections_avg"}}),
            json!({"m": {"MEDIAN": "sections_avg"}}),
            json!({"m": {"MAX": "sections_avg", "MIN": "sections_avg"}}),
            json!({"m": {"MAX": 1}}),
            json!({"m": {"MAX": "rooms_seats"}}),
            json!({"a": {"MAX": "sections_avg"}, "b": {"MIN": "sections_avg"}}),
        ];
        for rule in cases {
            let query = json!({"GROUP": ["sections_dept"], "APPLY": [rule]});
            assert!(build(query.clone()).is_err(), "accepted {}", query);
        }
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let result = build(json!({
            "GROUP": ["sections_dept"],
            "APPLY": [{"x": {"MAX": "sections_avg"}}, {"x": {"MIN": "sections_avg"}}]
        }));
        assert!(result.is_err());
    }
}
