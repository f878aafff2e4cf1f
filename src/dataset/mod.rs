//! Dataset model
//!
//! Two record shapes, Section and Room, over a closed vocabulary of 21
//! field names. Each dataset is homogeneous.

mod field;
mod kind;
mod record;

pub use field::{number_value, Field, FieldValue};
pub use kind::DatasetKind;
pub use record::{DatasetRecords, Record, Room, Section};
