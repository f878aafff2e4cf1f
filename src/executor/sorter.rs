//! Result sorting for query execution
//!
//! Composite, stable sort over the ORDER keys.

use std::cmp::Ordering;

use serde_json::Value;

use super::result::ResultRow;
use crate::planner::{OrderSpec, SortDirection};

/// Sorts result rows
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts rows by the order specification.
    ///
    /// Ties on a key fall through to the next key; DOWN reverses every key.
    pub fn sort(rows: &mut [ResultRow], order: &OrderSpec, dataset: &str) {
        let names: Vec<String> = order.keys.iter().map(|k| k.output_name(dataset)).collect();

        rows.sort_by(|a, b| {
            for name in &names {
                let ordering = Self::compare_values(a.get(name), b.get(name));
                if ordering != Ordering::Equal {
                    return match order.direction {
                        SortDirection::Up => ordering,
                        SortDirection::Down => ordering.reverse(),
                    };
                }
            }
            Ordering::Equal
        });
    }

    /// Numbers compare numerically, strings by code point.
    ///
    /// A column holds one kind of value: a field's type, or a number for
    /// an APPLY alias.
    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (Some(Value::Number(x)), Some(Value::Number(y))) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
            _ => Ordering::Equal,
        }
    }
}
