//! APPLY aggregates
//!
//! MAX, MIN, AVG and SUM read numbers only; COUNT counts distinct values of
//! either type. AVG and SUM are rounded to two decimal places, midpoint away
//! from zero.

use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::dataset::{number_value, Field, FieldValue, Record};
use crate::planner::{AggregateOp, ApplyRule};

use super::errors::{ExecutorError, ExecutorResult};
use super::grouping::GroupKeyPart;

pub struct Aggregator;

impl Aggregator {
    /// Computes one APPLY rule over the members of a group.
    pub fn compute<R: Record>(rule: &ApplyRule, members: &[&R]) -> ExecutorResult<Value> {
        let result = match rule.op {
            AggregateOp::Count => return Self::count(rule.field, members),
            AggregateOp::Max => numeric_values(rule.field, members)?
                .into_iter()
                .fold(f64::NEG_INFINITY, f64::max),
            AggregateOp::Min => numeric_values(rule.field, members)?
                .into_iter()
                .fold(f64::INFINITY, f64::min),
            AggregateOp::Sum => {
                let sum: f64 = numeric_values(rule.field, members)?.into_iter().sum();
                round2_f64(sum)?
            }
            AggregateOp::Avg => Self::average(rule, &numeric_values(rule.field, members)?)?,
        };
        Ok(number_value(result))
    }

    fn average(rule: &ApplyRule, values: &[f64]) -> ExecutorResult<f64> {
        let overflow = || ExecutorError::execution_failed(format!("AVG overflow in '{}'", rule.alias));

        let mut total = Decimal::ZERO;
        for &value in values {
            total = total.checked_add(to_decimal(value)?).ok_or_else(overflow)?;
        }
        let count = Decimal::from(values.len());
        let avg = total.checked_div(count).ok_or_else(overflow)?;

        to_f64(round2(avg)).ok_or_else(overflow)
    }

    fn count<R: Record>(field: Field, members: &[&R]) -> ExecutorResult<Value> {
        let mut distinct = HashSet::new();
        for record in members {
            let value = record
                .get(field)
                .ok_or_else(|| ExecutorError::missing_field(field))?;
            distinct.insert(GroupKeyPart::from(value));
        }
        Ok(Value::from(distinct.len()))
    }
}

fn numeric_values<R: Record>(field: Field, members: &[&R]) -> ExecutorResult<Vec<f64>> {
    members
        .iter()
        .map(|record| match record.get(field) {
            Some(FieldValue::Num(n)) => Ok(n),
            Some(other) => Err(ExecutorError::type_mismatch(field, "number", other.type_name())),
            None => Err(ExecutorError::missing_field(field)),
        })
        .collect()
}

/// Converts through the shortest decimal representation, so `93.45`
/// becomes exactly `93.45`.
fn to_decimal(value: f64) -> ExecutorResult<Decimal> {
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
        .ok_or_else(|| ExecutorError::execution_failed(format!("{} is not a finite decimal", value)))
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn round2_f64(value: f64) -> ExecutorResult<f64> {
    let rounded = round2(to_decimal(value)?);
    to_f64(rounded).ok_or_else(|| ExecutorError::execution_failed(format!("cannot round {}", value)))
}

/// Parses the decimal's text form, which yields the nearest f64.
fn to_f64(value: Decimal) -> Option<f64> {
    value.to_string().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Section;
    use serde_json::json;

    fn section(dept: &str, fail: u32, avg: f64) -> Section {
        Section {
            uuid: format!("{}-{}", dept, fail),
            id: "1".into(),
            title: "t".into(),
            instructor: "i".into(),
            dept: dept.into(),
            year: 2015,
            avg,
            pass: 0,
            fail,
            audit: 0,
        }
    }

    fn apply(op: AggregateOp, field: Field, rows: &[Section]) -> ExecutorResult<Value> {
        let refs: Vec<&Section> = rows.iter().collect();
        Aggregator::compute(&ApplyRule::new("x", op, field), &refs)
    }

    #[test]
    fn test_fail_values_zero_zero_five() {
        let rows = vec![section("a", 0, 0.0), section("b", 0, 0.0), section("c", 5, 0.0)];

        assert_eq!(apply(AggregateOp::Count, Field::Fail, &rows).unwrap(), json!(2));
        assert_eq!(apply(AggregateOp::Sum, Field::Fail, &rows).unwrap(), json!(5));
        assert_eq!(apply(AggregateOp::Avg, Field::Fail, &rows).unwrap(), json!(1.67));
        assert_eq!(apply(AggregateOp::Max, Field::Fail, &rows).unwrap(), json!(5));
        assert_eq!(apply(AggregateOp::Min, Field::Fail, &rows).unwrap(), json!(0));
    }

    #[test]
    fn test_avg_one_two_two() {
        let rows = vec![section("a", 1, 0.0), section("b", 2, 0.0), section("c", 2, 0.0)];
        assert_eq!(apply(AggregateOp::Avg, Field::Fail, &rows).unwrap(), json!(1.67));
    }

    #[test]
    fn test_avg_accumulates_in_decimal() {
        let rows = vec![section("a", 0, 0.1), section("b", 0, 0.2), section("c", 0, 0.3)];
        assert_eq!(apply(AggregateOp::Avg, Field::Avg, &rows).unwrap(), json!(0.2));
    }

    #[test]
    fn test_avg_midpoint_rounds_up() {
        let rows = vec![section("a", 0, 1.0), section("b", 0, 1.25)];
        assert_eq!(apply(AggregateOp::Avg, Field::Avg, &rows).unwrap(), json!(1.13));
    }

    #[test]
    fn test_sum_rounded() {
        let rows = vec![section("a", 0, 0.1), section("b", 0, 0.2)];
        assert_eq!(apply(AggregateOp::Sum, Field::Avg, &rows).unwrap(), json!(0.3));
    }

    #[test]
    fn test_count_strings() {
        let rows = vec![section("cpsc", 0, 0.0), section("cpsc", 1, 0.0), section("math", 2, 0.0)];
        assert_eq!(apply(AggregateOp::Count, Field::Dept, &rows).unwrap(), json!(2));
    }

    #[test]
    fn test_numeric_aggregate_on_string_fails() {
        let rows = vec![section("cpsc", 0, 0.0)];
        for op in [AggregateOp::Max, AggregateOp::Min, AggregateOp::Avg, AggregateOp::Sum] {
            assert!(apply(op, Field::Dept, &rows).is_err());
        }
    }

    #[test]
    fn test_absent_field_fails() {
        let rows = vec![section("cpsc", 0, 0.0)];
        assert!(apply(AggregateOp::Count, Field::Seats, &rows).is_err());
        assert!(apply(AggregateOp::Max, Field::Seats, &rows).is_err());
    }
}
