//! Record shapes.
//!
//! Records are immutable once constructed and expose a typed accessor so
//! the executor can read any field without knowing the concrete shape.

use serde::{Deserialize, Serialize};

use super::field::{Field, FieldValue};
use super::kind::DatasetKind;

/// A read-only record of one dataset kind.
pub trait Record {
    /// Kind shared by every record of this type.
    const KIND: DatasetKind;

    /// Returns the value under `field`, or `None` if this shape has no such
    /// field.
    fn get(&self, field: Field) -> Option<FieldValue<'_>>;
}

/// One offering of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub uuid: String,
    pub id: String,
    pub title: String,
    pub instructor: String,
    pub dept: String,
    pub year: u32,
    pub avg: f64,
    pub pass: u32,
    pub fail: u32,
    pub audit: u32,
}

impl Record for Section {
    const KIND: DatasetKind = DatasetKind::Sections;

    fn get(&self, field: Field) -> Option<FieldValue<'_>> {
        let value = match field {
            Field::Uuid => FieldValue::Str(&self.uuid),
            Field::Id => FieldValue::Str(&self.id),
            Field::Title => FieldValue::Str(&self.title),
            Field::Instructor => FieldValue::Str(&self.instructor),
            Field::Dept => FieldValue::Str(&self.dept),
            Field::Year => FieldValue::Num(f64::from(self.year)),
            Field::Avg => FieldValue::Num(self.avg),
            Field::Pass => FieldValue::Num(f64::from(self.pass)),
            Field::Fail => FieldValue::Num(f64::from(self.fail)),
            Field::Audit => FieldValue::Num(f64::from(self.audit)),
            _ => return None,
        };
        Some(value)
    }
}

/// A bookable campus room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub fullname: String,
    pub shortname: String,
    pub number: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    pub seats: u32,
    #[serde(rename = "type")]
    pub room_type: String,
    pub furniture: String,
    pub href: String,
}

impl Record for Room {
    const KIND: DatasetKind = DatasetKind::Rooms;

    fn get(&self, field: Field) -> Option<FieldValue<'_>> {
        let value = match field {
            Field::Fullname => FieldValue::Str(&self.fullname),
            Field::Shortname => FieldValue::Str(&self.shortname),
            Field::Number => FieldValue::Str(&self.number),
            Field::Name => FieldValue::Str(&self.name),
            Field::Address => FieldValue::Str(&self.address),
            Field::Lat => FieldValue::Num(self.lat),
            Field::Lon => FieldValue::Num(self.lon),
            Field::Seats => FieldValue::Num(f64::from(self.seats)),
            Field::Type => FieldValue::Str(&self.room_type),
            Field::Furniture => FieldValue::Str(&self.furniture),
            Field::Href => FieldValue::Str(&self.href),
            _ => return None,
        };
        Some(value)
    }
}

/// The homogeneous record list of one dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetRecords {
    Sections(Vec<Section>),
    Rooms(Vec<Room>),
}

impl DatasetRecords {
    pub fn kind(&self) -> DatasetKind {
        match self {
            DatasetRecords::Sections(_) => DatasetKind::Sections,
            DatasetRecords::Rooms(_) => DatasetKind::Rooms,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DatasetRecords::Sections(rows) => rows.len(),
            DatasetRecords::Rooms(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<Section>> for DatasetRecords {
    fn from(rows: Vec<Section>) -> Self {
        DatasetRecords::Sections(rows)
    }
}

impl From<Vec<Room>> for DatasetRecords {
    fn from(rows: Vec<Room>) -> Self {
        DatasetRecords::Rooms(rows)
    }
}
