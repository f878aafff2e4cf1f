//! Record grouping
//!
//! Groups are keyed by the tuple of GROUP field values and emitted in the
//! order their first member was seen.

use std::collections::HashMap;

use serde_json::Value;

use crate::dataset::{Field, FieldValue, Record};
use crate::planner::ColumnKey;

use super::errors::{ExecutorError, ExecutorResult};

/// Hashable form of a single field value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKeyPart {
    Str(String),
    /// Bit pattern of the number, with -0.0 folded into 0.0
    Num(u64),
}

impl From<FieldValue<'_>> for GroupKeyPart {
    fn from(value: FieldValue<'_>) -> Self {
        match value {
            FieldValue::Str(s) => GroupKeyPart::Str(s.to_string()),
            FieldValue::Num(n) if n == 0.0 => GroupKeyPart::Num(0.0f64.to_bits()),
            FieldValue::Num(n) => GroupKeyPart::Num(n.to_bits()),
        }
    }
}

/// Records sharing one group key
#[derive(Debug)]
pub struct Group<'a, R> {
    /// GROUP fields with this group's values, in GROUP order
    pub key: Vec<(Field, FieldValue<'a>)>,
    pub members: Vec<&'a R>,
}

/// A synthetic row handed to projection: field or alias → value
pub type GroupedRow = HashMap<ColumnKey, Value>;

pub struct Grouper;

impl Grouper {
    /// Partitions `records` by the values of `fields`.
    pub fn partition<'a, R: Record>(
        records: &[&'a R],
        fields: &[Field],
    ) -> ExecutorResult<Vec<Group<'a, R>>> {
        let mut index: HashMap<Vec<GroupKeyPart>, usize> = HashMap::new();
        let mut groups: Vec<Group<'a, R>> = Vec::new();

        for &record in records {
            let mut key = Vec::with_capacity(fields.len());
            for &field in fields {
                let value = record
                    .get(field)
                    .ok_or_else(|| ExecutorError::missing_field(field))?;
                key.push((field, value));
            }

            let hash_key: Vec<GroupKeyPart> = key.iter().map(|(_, v)| (*v).into()).collect();
            match index.get(&hash_key) {
                Some(&slot) => groups[slot].members.push(record),
                None => {
                    index.insert(hash_key, groups.len());
                    groups.push(Group {
                        key,
                        members: vec![record],
                    });
                }
            }
        }

        Ok(groups)
    }

    /// Row for a record that is its own group: every field of its kind.
    pub fn identity_row<R: Record>(record: &R) -> ExecutorResult<GroupedRow> {
        R::KIND
            .fields()
            .iter()
            .map(|&field| {
                let value = record
                    .get(field)
                    .ok_or_else(|| ExecutorError::missing_field(field))?;
                Ok((ColumnKey::Field(field), value.to_json()))
            })
            .collect()
    }
}
