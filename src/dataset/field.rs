//! Closed field vocabulary shared by every dataset kind.
//!
//! Field names are resolved into [`Field`] once, at validation time. The
//! executor never looks fields up by string.

use serde_json::{Number, Value};

use super::kind::DatasetKind;

/// One of the 21 field names a query may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    // Sections
    Uuid,
    Id,
    Title,
    Instructor,
    Dept,
    Year,
    Avg,
    Pass,
    Fail,
    Audit,
    // Rooms
    Fullname,
    Shortname,
    Number,
    Name,
    Address,
    Lat,
    Lon,
    Seats,
    Type,
    Furniture,
    Href,
}

impl Field {
    /// Every field, sections first.
    pub const ALL: [Field; 21] = [
        Field::Uuid,
        Field::Id,
        Field::Title,
        Field::Instructor,
        Field::Dept,
        Field::Year,
        Field::Avg,
        Field::Pass,
        Field::Fail,
        Field::Audit,
        Field::Fullname,
        Field::Shortname,
        Field::Number,
        Field::Name,
        Field::Address,
        Field::Lat,
        Field::Lon,
        Field::Seats,
        Field::Type,
        Field::Furniture,
        Field::Href,
    ];

    /// Resolves a bare field name. Matching is case sensitive.
    pub fn parse(name: &str) -> Option<Field> {
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Uuid => "uuid",
            Field::Id => "id",
            Field::Title => "title",
            Field::Instructor => "instructor",
            Field::Dept => "dept",
            Field::Year => "year",
            Field::Avg => "avg",
            Field::Pass => "pass",
            Field::Fail => "fail",
            Field::Audit => "audit",
            Field::Fullname => "fullname",
            Field::Shortname => "shortname",
            Field::Number => "number",
            Field::Name => "name",
            Field::Address => "address",
            Field::Lat => "lat",
            Field::Lon => "lon",
            Field::Seats => "seats",
            Field::Type => "type",
            Field::Furniture => "furniture",
            Field::Href => "href",
        }
    }

    /// The dataset kind that owns this field.
    pub fn kind(&self) -> DatasetKind {
        match self {
            Field::Uuid
            | Field::Id
            | Field::Title
            | Field::Instructor
            | Field::Dept
            | Field::Year
            | Field::Avg
            | Field::Pass
            | Field::Fail
            | Field::Audit => DatasetKind::Sections,
            _ => DatasetKind::Rooms,
        }
    }

    /// Returns true if records carry a number under this field.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Field::Year
                | Field::Avg
                | Field::Pass
                | Field::Fail
                | Field::Audit
                | Field::Lat
                | Field::Lon
                | Field::Seats
        )
    }

    /// Output key for this field under a dataset name, e.g. `sections_avg`.
    pub fn qualified(&self, dataset: &str) -> String {
        format!("{}_{}", dataset, self.as_str())
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field value borrowed from a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Str(&'a str),
    Num(f64),
}

impl<'a> FieldValue<'a> {
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            FieldValue::Str(s) => Some(s),
            FieldValue::Num(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Num(n) => Some(*n),
            FieldValue::Str(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Str(_) => "string",
            FieldValue::Num(_) => "number",
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Str(s) => Value::String((*s).to_string()),
            FieldValue::Num(n) => number_value(*n),
        }
    }
}

/// Converts a number into JSON, keeping integral values integral so that
/// `2015.0` is written as `2015`.
pub fn number_value(n: f64) -> Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Value::from(n as i64);
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}
