//! Canonical data model.
//!
//! Every conversion passes through these types:
//!
//! - [`Value`] / [`Record`] - dynamic record contents
//! - [`LogicalType`] - the five field types a shape can report
//! - [`FieldDefinition`] / [`Shape`] - inferred schema of a record set
//! - [`CanonicalData`] - shape plus records

pub mod value;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use value::{format_number, Record, Value};

use crate::shape::infer_shape;

// =============================================================================
// Logical Type
// =============================================================================

/// Canonical field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl LogicalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalType::String => "string",
            LogicalType::Number => "number",
            LogicalType::Boolean => "boolean",
            LogicalType::Object => "object",
            LogicalType::Array => "array",
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Field Definitions
// =============================================================================

/// Optional validation constraints.
///
/// Carried through plans and shapes; nothing in this crate enforces them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl FieldConstraints {
    pub fn is_empty(&self) -> bool {
        self.minimum.is_none()
            && self.maximum.is_none()
            && self.enum_values.is_empty()
            && self.pattern.is_none()
    }
}

/// One field of a [`Shape`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Dotted path of the field.
    pub path: String,

    /// Resolved logical type.
    #[serde(rename = "type")]
    pub field_type: LogicalType,

    /// Null somewhere, or absent from at least one record.
    pub nullable: bool,

    /// An array was observed at this path.
    pub repeated: bool,

    #[serde(default, skip_serializing_if = "FieldConstraints::is_empty")]
    pub constraints: FieldConstraints,
}

/// Inferred schema of a record set, ordered by path.
///
/// Array items contribute fields under the array's own path (no index
/// segment), so a repeated object and a singular object at the same path
/// produce the same field list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub fields: Vec<FieldDefinition>,
}

impl Shape {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by its exact path.
    pub fn field(&self, path: &str) -> Option<&FieldDefinition> {
        self.fields
            .binary_search_by(|f| f.path.as_str().cmp(path))
            .ok()
            .map(|index| &self.fields[index])
    }

    /// All field paths, in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.path.as_str())
    }
}

// =============================================================================
// Canonical Data
// =============================================================================

/// Format-neutral data: a shape plus the records it describes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalData {
    pub shape: Shape,
    pub records: Vec<Record>,
}

impl CanonicalData {
    /// Build canonical data, inferring the shape from the records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let shape = infer_shape(&records);
        Self { shape, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
