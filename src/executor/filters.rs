//! Predicate filtering for query execution
//!
//! Comparisons require numbers, string matches require strings. Anything
//! else fails the query; there is no coercion.

use crate::dataset::{FieldValue, Record};
use crate::planner::{Filter, FilterNode};

use super::errors::{ExecutorError, ExecutorResult};

/// Evaluates predicate trees against records
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if a record matches the root filter.
    pub fn matches<R: Record>(filter: &Filter, record: &R) -> ExecutorResult<bool> {
        Self::all(&filter.nodes, record)
    }

    /// Evaluates a single node.
    ///
    /// AND/OR do not short-circuit: a type mismatch in any child fails
    /// the query.
    pub fn evaluate<R: Record>(node: &FilterNode, record: &R) -> ExecutorResult<bool> {
        match node {
            FilterNode::And(children) => Self::all(children, record),
            FilterNode::Or(children) => {
                let mut any = false;
                for child in children {
                    any |= Self::evaluate(child, record)?;
                }
                Ok(any)
            }
            FilterNode::Not(child) => Ok(!Self::evaluate(child, record)?),
            FilterNode::Comparison { op, field, value } => {
                match record.get(*field) {
                    Some(FieldValue::Num(actual)) => Ok(op.apply(actual, *value)),
                    Some(other) => Err(ExecutorError::type_mismatch(
                        field,
                        "number",
                        other.type_name(),
                    )),
                    None => Err(ExecutorError::missing_field(field)),
                }
            }
            FilterNode::StringMatch { field, pattern } => match record.get(*field) {
                Some(FieldValue::Str(actual)) => Ok(pattern.matches(actual)),
                Some(other) => Err(ExecutorError::type_mismatch(
                    field,
                    "string",
                    other.type_name(),
                )),
                None => Err(ExecutorError::missing_field(field)),
            },
        }
    }

    fn all<R: Record>(nodes: &[FilterNode], record: &R) -> ExecutorResult<bool> {
        let mut all = true;
        for node in nodes {
            all &= Self::evaluate(node, record)?;
        }
        Ok(all)
    }
}
