//! Conversion plan definition.
//!
//! A plan is a set of declarative rewrite rules. The order rules are listed
//! in does not matter: [`ConversionPlan::normalize`] sorts every collection
//! so that applying the same plan twice always does the same thing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{LogicalType, Value};

/// Kind of lossy operation that needs explicit acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossyOperationKind {
    JoinArray,
    CoerceType,
    DropField,
}

impl LossyOperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LossyOperationKind::JoinArray => "join_array",
            LossyOperationKind::CoerceType => "coerce_type",
            LossyOperationKind::DropField => "drop_field",
        }
    }
}

impl fmt::Display for LossyOperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit approval for a lossy rule at one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossyOperation {
    pub path: String,
    pub operation: LossyOperationKind,
    /// Free-text justification, shown to whoever reviews the plan.
    #[serde(default)]
    pub reason: String,
}

/// Join the array at `path` into one delimited string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinArrayRule {
    pub path: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

/// Convert the value at `path` to `target_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCoercionRule {
    pub path: String,
    pub target_type: LogicalType,
}

/// Fill `path` with `value` wherever it is absent or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultValueRule {
    pub path: String,
    pub value: Value,
}

pub(crate) fn default_delimiter() -> String {
    ",".to_string()
}

/// A complete conversion plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionPlan {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flatten_fields: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub join_arrays: Vec<JoinArrayRule>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub explode_arrays: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_coercions: Vec<TypeCoercionRule>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_values: Vec<DefaultValueRule>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drop_fields: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lossy_operations: Vec<LossyOperation>,
}

impl ConversionPlan {
    /// Create an empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a plan from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// True when the plan contains no rule at all.
    pub fn is_empty(&self) -> bool {
        self.flatten_fields.is_empty()
            && self.join_arrays.is_empty()
            && self.explode_arrays.is_empty()
            && self.type_coercions.is_empty()
            && self.default_values.is_empty()
            && self.drop_fields.is_empty()
            && self.lossy_operations.is_empty()
    }

    /// Return a copy with every collection in canonical order.
    ///
    /// Path lists sort lexicographically, rules sort by path, and lossy
    /// operations sort by (operation, path). Sorts are stable, so rules
    /// sharing a path keep their relative order.
    pub fn normalize(&self) -> Self {
        let mut plan = self.clone();
        plan.flatten_fields.sort();
        plan.explode_arrays.sort();
        plan.drop_fields.sort();
        plan.join_arrays.sort_by(|a, b| a.path.cmp(&b.path));
        plan.type_coercions.sort_by(|a, b| a.path.cmp(&b.path));
        plan.default_values.sort_by(|a, b| a.path.cmp(&b.path));
        plan.lossy_operations.sort_by(|a, b| {
            a.operation
                .as_str()
                .cmp(b.operation.as_str())
                .then_with(|| a.path.cmp(&b.path))
        });
        plan
    }

    /// Whether a lossy operation of `operation` is acknowledged for `path`.
    pub fn acknowledges(&self, operation: LossyOperationKind, path: &str) -> bool {
        self.lossy_operations
            .iter()
            .any(|op| op.operation == operation && op.path == path)
    }

    // -------------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------------

    /// Add a flatten rule
    pub fn flatten(mut self, path: &str) -> Self {
        self.flatten_fields.push(path.to_string());
        self
    }

    /// Add an explode rule
    pub fn explode(mut self, path: &str) -> Self {
        self.explode_arrays.push(path.to_string());
        self
    }

    /// Add a join rule without acknowledging it
    pub fn join(mut self, path: &str, delimiter: &str) -> Self {
        self.join_arrays.push(JoinArrayRule {
            path: path.to_string(),
            delimiter: delimiter.to_string(),
        });
        self
    }

    /// Add a coercion rule without acknowledging it
    pub fn coerce(mut self, path: &str, target_type: LogicalType) -> Self {
        self.type_coercions.push(TypeCoercionRule {
            path: path.to_string(),
            target_type,
        });
        self
    }

    /// Add a default value rule
    pub fn default_value(mut self, path: &str, value: Value) -> Self {
        self.default_values.push(DefaultValueRule {
            path: path.to_string(),
            value,
        });
        self
    }

    /// Add a drop rule without acknowledging it
    pub fn drop_field(mut self, path: &str) -> Self {
        self.drop_fields.push(path.to_string());
        self
    }

    /// Acknowledge a lossy operation
    pub fn acknowledge(mut self, operation: LossyOperationKind, path: &str, reason: &str) -> Self {
        self.lossy_operations.push(LossyOperation {
            path: path.to_string(),
            operation,
            reason: reason.to_string(),
        });
        self
    }
}
