//! Dataset kinds and their field sets.

use serde::{Deserialize, Serialize};

use super::field::Field;

/// The shape every record of a dataset shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Sections,
    Rooms,
}

const SECTION_FIELDS: [Field; 10] = [
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
];

const ROOM_FIELDS: [Field; 11] = [
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

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Sections => "sections",
            DatasetKind::Rooms => "rooms",
        }
    }

    /// Fields carried by every record of this kind, in declaration order.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            DatasetKind::Sections => &SECTION_FIELDS,
            DatasetKind::Rooms => &ROOM_FIELDS,
        }
    }

    pub fn has_field(&self, field: Field) -> bool {
        field.kind() == *self
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
