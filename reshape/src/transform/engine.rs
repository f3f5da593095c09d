//! Transform engine.
//!
//! Applies a conversion plan to canonical data. Stages always run in the
//! same order, whatever order the plan lists its rules in:
//!
//! ```text
//! flatten → explode → join → coerce → default → drop
//! ```
//!
//! The plan is normalized and validated first, and the engine works on a
//! copy of the input records: either the whole call succeeds or the caller
//! sees none of its effects.

use crate::error::{TransformError, TransformResult};
use crate::models::{CanonicalData, Record, Value};
use crate::path;
use crate::plan::{
    validate_lossy_operations, ConversionPlan, DefaultValueRule, JoinArrayRule,
    LossyOperationKind, TypeCoercionRule,
};
use crate::shape::infer_shape;

use super::coerce::coerce;
use super::warnings::{Warning, WarningCollector};

/// Result of applying a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    /// Transformed records with their recomputed shape.
    pub data: CanonicalData,
    /// Lossy operations that were performed, one per path.
    pub warnings: Vec<Warning>,
}

/// Apply `plan` to `input`.
///
/// The input is never modified. When the transformed record set is empty
/// the input shape is carried over unchanged.
pub fn apply(input: &CanonicalData, plan: &ConversionPlan) -> TransformResult<TransformOutput> {
    let plan = plan.normalize();
    validate_lossy_operations(&plan)?;

    let mut records = input.records.clone();
    let mut warnings = WarningCollector::new();

    for field in &plan.flatten_fields {
        log::debug!("flatten {field}");
        for record in records.iter_mut() {
            path::flatten(record, field)?;
        }
    }

    for field in &plan.explode_arrays {
        let before = records.len();
        records = explode(records, field)?;
        log::debug!("explode {field}: {before} -> {} records", records.len());
    }

    for rule in &plan.join_arrays {
        log::debug!("join {} with {:?}", rule.path, rule.delimiter);
        for record in records.iter_mut() {
            join_at(record, rule)?;
        }
        warnings.add_once(&rule.path, LossyOperationKind::JoinArray);
    }

    for rule in &plan.type_coercions {
        log::debug!("coerce {} to {}", rule.path, rule.target_type);
        for record in records.iter_mut() {
            coerce_at(record, rule)?;
        }
        warnings.add_once(&rule.path, LossyOperationKind::CoerceType);
    }

    for rule in &plan.default_values {
        log::debug!("default {}", rule.path);
        for record in records.iter_mut() {
            default_at(record, rule)?;
        }
    }

    for field in &plan.drop_fields {
        log::debug!("drop {field}");
        for record in records.iter_mut() {
            path::delete(record, field)?;
        }
        warnings.add_once(field, LossyOperationKind::DropField);
    }

    let shape = if records.is_empty() {
        input.shape.clone()
    } else {
        infer_shape(&records)
    };

    log::info!(
        "transformed {} records into {} ({} warnings)",
        input.records.len(),
        records.len(),
        warnings.len()
    );

    Ok(TransformOutput {
        data: CanonicalData { shape, records },
        warnings: warnings.into_vec(),
    })
}

/// Replace each record with one copy per element of the array at `field`.
///
/// Records where the field is absent, null or an empty array pass through
/// once, unchanged.
fn explode(records: Vec<Record>, field: &str) -> TransformResult<Vec<Record>> {
    let mut expanded = Vec::with_capacity(records.len());

    for record in records {
        let items = match path::get(&record, field)? {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) if items.is_empty() => None,
            Some(Value::Array(items)) => Some(items.clone()),
            Some(_) => return Err(TransformError::NotAnArray(field.to_string())),
        };

        match items {
            None => expanded.push(record),
            Some(items) => {
                for item in items {
                    let mut copy = record.clone();
                    path::set(&mut copy, field, item)?;
                    expanded.push(copy);
                }
            }
        }
    }

    Ok(expanded)
}

fn join_at(record: &mut Record, rule: &JoinArrayRule) -> TransformResult<()> {
    let joined = match path::get(record, &rule.path)? {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Array(items)) => join_items(items, &rule.delimiter, &rule.path)?,
        Some(_) => return Err(TransformError::NotAnArray(rule.path.clone())),
    };
    path::set(record, &rule.path, Value::String(joined))?;
    Ok(())
}

/// Join scalar items with `delimiter`; null items become empty text.
fn join_items(items: &[Value], delimiter: &str, field: &str) -> TransformResult<String> {
    let parts = items
        .iter()
        .map(|item| match item {
            Value::Null => Ok(String::new()),
            Value::Array(_) | Value::Object(_) => Err(TransformError::NonScalarJoinElement {
                path: field.to_string(),
            }),
            scalar => Ok(scalar.scalar_text().unwrap_or_default()),
        })
        .collect::<TransformResult<Vec<String>>>()?;
    Ok(parts.join(delimiter))
}

fn coerce_at(record: &mut Record, rule: &TypeCoercionRule) -> TransformResult<()> {
    let coerced = match path::get(record, &rule.path)? {
        None | Some(Value::Null) => return Ok(()),
        Some(value) => coerce(value, rule.target_type)?,
    };
    path::set(record, &rule.path, coerced)?;
    Ok(())
}

fn default_at(record: &mut Record, rule: &DefaultValueRule) -> TransformResult<()> {
    if matches!(path::get(record, &rule.path)?, None | Some(Value::Null)) {
        path::set(record, &rule.path, rule.value.clone())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PathError, PlanError};
    use crate::models::LogicalType;
    use serde_json::json;

    fn data(value: serde_json::Value) -> CanonicalData {
        let records: Vec<Record> = match Value::from(value) {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| item.as_object().cloned())
                .collect(),
            Value::Object(map) => vec![map],
            other => panic!("unexpected fixture {other:?}"),
        };
        CanonicalData::from_records(records)
    }

    fn json_of(record: &Record) -> serde_json::Value {
        Value::Object(record.clone()).into()
    }

    #[test]
    fn test_nested_json_to_flat_with_plan() {
        let input = data(json!({
            "user": {"email": "a@example.com", "name": "Ada"},
            "tags": ["alpha", "beta"],
            "metrics": {"scores": [1, 2], "active": true}
        }));
        let plan = ConversionPlan::new()
            .flatten("metrics")
            .flatten("user")
            .join("metrics.scores", ";")
            .join("tags", ";")
            .acknowledge(LossyOperationKind::JoinArray, "metrics.scores", "CSV requires scalars")
            .acknowledge(LossyOperationKind::JoinArray, "tags", "CSV requires scalars");

        let output = apply(&input, &plan).unwrap();
        assert_eq!(output.data.records.len(), 1);
        assert_eq!(
            json_of(&output.data.records[0]),
            json!({
                "metrics.active": true,
                "metrics.scores": "1;2",
                "tags": "alpha;beta",
                "user.email": "a@example.com",
                "user.name": "Ada"
            })
        );
        let paths: Vec<&str> = output.warnings.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(paths, vec!["metrics.scores", "tags"]);
    }

    #[test]
    fn test_unacknowledged_plan_is_rejected_before_mutation() {
        let input = data(json!({"secret": "x"}));
        let plan = ConversionPlan::new().drop_field("secret");
        assert_eq!(
            apply(&input, &plan),
            Err(TransformError::Plan(PlanError::MissingAcknowledgment {
                operation: LossyOperationKind::DropField,
                path: "secret".into(),
            }))
        );
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = data(json!({"user": {"name": "Ada"}}));
        let snapshot = input.clone();
        apply(&input, &ConversionPlan::new().flatten("user")).unwrap();
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_deterministic() {
        let input = data(json!([{"name": "Ada", "age": 30}, {"name": "Linus", "age": 55}]));
        let plan = ConversionPlan::new()
            .coerce("age", LogicalType::String)
            .acknowledge(LossyOperationKind::CoerceType, "age", "string output");

        let first = apply(&input, &plan).unwrap();
        let second = apply(&input, &plan).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.data.records[0]["age"], Value::from("30"));
    }

    #[test]
    fn test_explode() {
        let input = data(json!({"order": 7, "items": [{"sku": "1"}, {"sku": "2"}]}));
        let output = apply(&input, &ConversionPlan::new().explode("items")).unwrap();

        let records: Vec<serde_json::Value> = output.data.records.iter().map(json_of).collect();
        assert_eq!(
            records,
            vec![
                json!({"order": 7, "items": {"sku": "1"}}),
                json!({"order": 7, "items": {"sku": "2"}}),
            ]
        );
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_explode_passthrough() {
        let input = data(json!([{"id": 1, "items": []}, {"id": 2, "items": null}, {"id": 3}]));
        let output = apply(&input, &ConversionPlan::new().explode("items")).unwrap();
        assert_eq!(output.data.records, input.records);
    }

    #[test]
    fn test_explode_non_array_fails() {
        let input = data(json!({"items": "one"}));
        assert_eq!(
            apply(&input, &ConversionPlan::new().explode("items")),
            Err(TransformError::NotAnArray("items".into()))
        );
    }

    #[test]
    fn test_join_rejects_nested_values() {
        let input = data(json!({"matrix": [[1, 2], [3]]}));
        let plan = ConversionPlan::new()
            .join("matrix", ",")
            .acknowledge(LossyOperationKind::JoinArray, "matrix", "");
        assert_eq!(
            apply(&input, &plan),
            Err(TransformError::NonScalarJoinElement { path: "matrix".into() })
        );
    }

    #[test]
    fn test_join_null_items_and_absent_records() {
        let input = data(json!([{"tags": ["a", null, true, 2.5]}, {"other": 1}]));
        let plan = ConversionPlan::new()
            .join("tags", "|")
            .acknowledge(LossyOperationKind::JoinArray, "tags", "");
        let output = apply(&input, &plan).unwrap();
        assert_eq!(output.data.records[0]["tags"], Value::from("a||true|2.5"));
        assert!(!output.data.records[1].contains_key("tags"));
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn test_coercion_failure_aborts() {
        let input = data(json!([{"age": "30"}, {"age": "unknown"}]));
        let plan = ConversionPlan::new()
            .coerce("age", LogicalType::Number)
            .acknowledge(LossyOperationKind::CoerceType, "age", "");
        assert_eq!(
            apply(&input, &plan),
            Err(TransformError::InvalidNumericString("unknown".into()))
        );
    }

    #[test]
    fn test_defaults_fill_absent_and_null() {
        let input = data(json!([{"country": null}, {}, {"country": "DE"}]));
        let plan = ConversionPlan::new().default_value("country", Value::from("FR"));
        let output = apply(&input, &plan).unwrap();
        let countries: Vec<&Value> = output.data.records.iter().map(|r| &r["country"]).collect();
        assert_eq!(countries, vec![&Value::from("FR"), &Value::from("FR"), &Value::from("DE")]);
        assert!(output.warnings.is_empty());
        assert!(!output.data.shape.field("country").unwrap().nullable);
    }

    #[test]
    fn test_drop_flattened_field() {
        let input = data(json!({"user": {"name": "Ada", "password": "hunter2"}}));
        let plan = ConversionPlan::new()
            .flatten("user")
            .drop_field("user.password")
            .acknowledge(LossyOperationKind::DropField, "user.password", "privacy");
        let output = apply(&input, &plan).unwrap();
        assert_eq!(json_of(&output.data.records[0]), json!({"user.name": "Ada"}));
        assert_eq!(output.warnings[0].message, "dropped field");
    }

    #[test]
    fn test_stage_order_is_fixed() {
        // Default runs after coercion, so the default is not coerced
        let input = data(json!([{"n": "1"}, {}]));
        let plan = ConversionPlan::new()
            .default_value("n", Value::from("none"))
            .coerce("n", LogicalType::Number)
            .acknowledge(LossyOperationKind::CoerceType, "n", "");
        let output = apply(&input, &plan).unwrap();
        assert_eq!(output.data.records[0]["n"], Value::Number(1.0));
        assert_eq!(output.data.records[1]["n"], Value::from("none"));
    }

    #[test]
    fn test_flatten_failure_returns_error() {
        let input = data(json!({"user": "Ada"}));
        assert_eq!(
            apply(&input, &ConversionPlan::new().flatten("user")),
            Err(TransformError::Path(PathError::NotAnObject("user".into())))
        );
    }

    #[test]
    fn test_empty_output_keeps_input_shape() {
        let input = data(json!({"name": "Ada"}));
        let empty = CanonicalData {
            shape: input.shape.clone(),
            records: Vec::new(),
        };
        let output = apply(&empty, &ConversionPlan::new()).unwrap();
        assert_eq!(output.data.shape, input.shape);
    }

    #[test]
    fn test_shape_recomputed_after_transform() {
        let input = data(json!({"user": {"id": 1}}));
        let output = apply(&input, &ConversionPlan::new().flatten("user")).unwrap();
        let paths: Vec<&str> = output.data.shape.paths().collect();
        assert_eq!(paths, vec!["user.id"]);
    }
}
