//! Heuristic plan inference.
//!
//! Proposes the rules needed to push nested data into a tabular target:
//! nested objects are flattened, arrays of objects exploded, and any other
//! array joined with `,` (with the matching lossy acknowledgment, so the
//! proposed plan passes validation as-is).

use std::collections::{BTreeMap, BTreeSet};

use crate::formats::Format;
use crate::models::{CanonicalData, LogicalType, Value};

use super::model::{default_delimiter, ConversionPlan, JoinArrayRule, LossyOperation, LossyOperationKind};

const JOIN_REASON: &str = "tabular output requires scalar values";

/// Type of the first non-null element, or `array` when there is none.
pub fn infer_array_element_type(items: &[Value]) -> LogicalType {
    items
        .iter()
        .find_map(Value::logical_type)
        .unwrap_or(LogicalType::Array)
}

/// Rule suggestions, deduplicated by path.
#[derive(Debug, Default)]
struct Suggestions {
    flatten: BTreeSet<String>,
    explode: BTreeSet<String>,
    join: BTreeMap<String, JoinArrayRule>,
}

impl Suggestions {
    fn visit(&mut self, value: &Value, path: &str) {
        match value {
            Value::Object(map) => {
                self.flatten.insert(path.to_string());
                for (key, nested) in map {
                    self.visit(nested, &format!("{path}.{key}"));
                }
            }
            Value::Array(items) => match infer_array_element_type(items) {
                LogicalType::Object => {
                    self.explode.insert(path.to_string());
                }
                _ => {
                    self.join.insert(
                        path.to_string(),
                        JoinArrayRule {
                            path: path.to_string(),
                            delimiter: default_delimiter(),
                        },
                    );
                }
            },
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
    }

    fn into_plan(self) -> ConversionPlan {
        let lossy_operations = self
            .join
            .keys()
            .map(|path| LossyOperation {
                path: path.clone(),
                operation: LossyOperationKind::JoinArray,
                reason: JOIN_REASON.to_string(),
            })
            .collect();

        ConversionPlan {
            flatten_fields: self.flatten.into_iter().collect(),
            explode_arrays: self.explode.into_iter().collect(),
            join_arrays: self.join.into_values().collect(),
            lossy_operations,
            ..ConversionPlan::default()
        }
        .normalize()
    }
}

/// Propose a conversion plan for rendering `data` as `target`.
///
/// Non-tabular targets need no rewriting and get an empty plan.
pub fn infer_plan(data: &CanonicalData, target: Format) -> ConversionPlan {
    if !target.is_tabular() {
        return ConversionPlan::default();
    }

    let mut suggestions = Suggestions::default();
    for record in &data.records {
        for (key, value) in record {
            suggestions.visit(value, key);
        }
    }

    let plan = suggestions.into_plan();
    log::info!(
        "inferred plan for {target}: {} flatten, {} explode, {} join",
        plan.flatten_fields.len(),
        plan.explode_arrays.len(),
        plan.join_arrays.len()
    );
    plan
}
