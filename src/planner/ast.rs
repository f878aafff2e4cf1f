//! Validated query structures
//!
//! Everything here is produced by the planner and is immutable once built.
//! Field references are already resolved to [`Field`].

use std::collections::BTreeSet;

use crate::dataset::Field;

use super::errors::{PlannerError, PlannerResult};

/// Numeric comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Lt,
    Gt,
    Eq,
}

impl ComparisonOp {
    /// Parses the query-language operator key
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "LT" => Some(ComparisonOp::Lt),
            "GT" => Some(ComparisonOp::Gt),
            "EQ" => Some(ComparisonOp::Eq),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Lt => "LT",
            ComparisonOp::Gt => "GT",
            ComparisonOp::Eq => "EQ",
        }
    }

    pub fn apply(&self, actual: f64, limit: f64) -> bool {
        match self {
            ComparisonOp::Lt => actual < limit,
            ComparisonOp::Gt => actual > limit,
            ComparisonOp::Eq => actual == limit,
        }
    }
}

/// String pattern with optional leading/trailing wildcard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringPattern {
    Exact(String),
    StartsWith(String),
    EndsWith(String),
    Contains(String),
}

impl StringPattern {
    /// Parses an `IS` value. A `*` is only allowed as the first or last
    /// character.
    pub fn parse(raw: &str) -> PlannerResult<Self> {
        let (leading, rest) = match raw.strip_prefix('*') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let (trailing, core) = match rest.strip_suffix('*') {
            Some(core) => (true, core),
            None => (false, rest),
        };

        if core.contains('*') {
            return Err(PlannerError::query_invalid(format!(
                "Asterisk may only appear at the start or end of '{}'",
                raw
            )));
        }

        let core = core.to_string();
        Ok(match (leading, trailing) {
            (true, true) => StringPattern::Contains(core),
            (true, false) => StringPattern::EndsWith(core),
            (false, true) => StringPattern::StartsWith(core),
            (false, false) => StringPattern::Exact(core),
        })
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            StringPattern::Exact(s) => value == s,
            StringPattern::StartsWith(s) => value.starts_with(s.as_str()),
            StringPattern::EndsWith(s) => value.ends_with(s.as_str()),
            StringPattern::Contains(s) => value.contains(s.as_str()),
        }
    }
}

/// Predicate tree node
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    Not(Box<FilterNode>),
    Comparison {
        op: ComparisonOp,
        field: Field,
        value: f64,
    },
    StringMatch {
        field: Field,
        pattern: StringPattern,
    },
}

impl FilterNode {
    pub fn lt(field: Field, value: f64) -> Self {
        FilterNode::Comparison {
            op: ComparisonOp::Lt,
            field,
            value,
        }
    }

    pub fn gt(field: Field, value: f64) -> Self {
        FilterNode::Comparison {
            op: ComparisonOp::Gt,
            field,
            value,
        }
    }

    pub fn eq(field: Field, value: f64) -> Self {
        FilterNode::Comparison {
            op: ComparisonOp::Eq,
            field,
            value,
        }
    }

    /// Builds a string match, parsing the wildcard pattern
    pub fn is(field: Field, pattern: &str) -> PlannerResult<Self> {
        Ok(FilterNode::StringMatch {
            field,
            pattern: StringPattern::parse(pattern)?,
        })
    }

    pub fn not(child: FilterNode) -> Self {
        FilterNode::Not(Box::new(child))
    }

    fn collect_fields(&self, out: &mut BTreeSet<Field>) {
        match self {
            FilterNode::And(children) | FilterNode::Or(children) => {
                for child in children {
                    child.collect_fields(out);
                }
            }
            FilterNode::Not(child) => child.collect_fields(out),
            FilterNode::Comparison { field, .. } | FilterNode::StringMatch { field, .. } => {
                out.insert(*field);
            }
        }
    }
}

/// Root of the predicate tree. No children matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub nodes: Vec<FilterNode>,
}

impl Filter {
    pub fn match_all() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn with_node(mut self, node: FilterNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn is_match_all(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Aggregate operators available in APPLY
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    Max,
    Min,
    Avg,
    Sum,
    Count,
}

impl AggregateOp {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "MAX" => Some(AggregateOp::Max),
            "MIN" => Some(AggregateOp::Min),
            "AVG" => Some(AggregateOp::Avg),
            "SUM" => Some(AggregateOp::Sum),
            "COUNT" => Some(AggregateOp::Count),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateOp::Max => "MAX",
            AggregateOp::Min => "MIN",
            AggregateOp::Avg => "AVG",
            AggregateOp::Sum => "SUM",
            AggregateOp::Count => "COUNT",
        }
    }

    /// COUNT is the only operator that accepts string values
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, AggregateOp::Count)
    }
}

/// One APPLY entry: `{alias: {OP: field}}`
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyRule {
    pub alias: String,
    pub op: AggregateOp,
    pub field: Field,
}

impl ApplyRule {
    pub fn new(alias: impl Into<String>, op: AggregateOp, field: Field) -> Self {
        Self {
            alias: alias.into(),
            op,
            field,
        }
    }
}

/// GROUP + APPLY
#[derive(Debug, Clone, PartialEq)]
pub struct Transformations {
    pub group: Vec<Field>,
    pub apply: Vec<ApplyRule>,
}

impl Transformations {
    pub fn has_alias(&self, alias: &str) -> bool {
        self.apply.iter().any(|rule| rule.alias == alias)
    }
}

/// A COLUMNS or ORDER entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    Field(Field),
    Alias(String),
}

impl ColumnKey {
    /// Output row key: `dataset_field` for fields, the alias verbatim
    /// otherwise
    pub fn output_name(&self, dataset: &str) -> String {
        match self {
            ColumnKey::Field(field) => field.qualified(dataset),
            ColumnKey::Alias(alias) => alias.clone(),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Up,
    Down,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Up => "UP",
            SortDirection::Down => "DOWN",
        }
    }
}

/// ORDER specification
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSpec {
    pub direction: SortDirection,
    pub keys: Vec<ColumnKey>,
}

impl OrderSpec {
    /// Single ascending key, the `ORDER: "key"` form
    pub fn ascending(key: ColumnKey) -> Self {
        Self {
            direction: SortDirection::Up,
            keys: vec![key],
        }
    }
}

/// Immutable, validated query (no runtime state)
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    /// The single dataset name the query is bound to
    pub dataset: String,
    pub filter: Filter,
    pub transformations: Option<Transformations>,
    pub columns: Vec<ColumnKey>,
    pub order: Option<OrderSpec>,
}

impl QueryPlan {
    /// Every field referenced anywhere in the query
    pub fn referenced_fields(&self) -> BTreeSet<Field> {
        let mut fields = BTreeSet::new();
        for node in &self.filter.nodes {
            node.collect_fields(&mut fields);
        }
        if let Some(t) = &self.transformations {
            fields.extend(t.group.iter().copied());
            fields.extend(t.apply.iter().map(|rule| rule.field));
        }
        let order_keys = self.order.iter().flat_map(|o| o.keys.iter());
        for key in self.columns.iter().chain(order_keys) {
            if let ColumnKey::Field(field) = key {
                fields.insert(*field);
            }
        }
        fields
    }

    /// Output row keys in COLUMNS order
    pub fn output_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.output_name(&self.dataset))
            .collect()
    }
}
