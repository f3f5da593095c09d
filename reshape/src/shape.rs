//! Shape inference from heterogeneous records.
//!
//! Walks every reachable path of every record and folds what it sees into
//! per-path statistics, then resolves each path to a [`FieldDefinition`].

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{FieldConstraints, FieldDefinition, LogicalType, Record, Shape, Value};

/// Resolution order when one path holds several types.
const TYPE_PRIORITY: [LogicalType; 5] = [
    LogicalType::Object,
    LogicalType::Array,
    LogicalType::String,
    LogicalType::Number,
    LogicalType::Boolean,
];

/// Statistics gathered for one path.
#[derive(Debug, Default)]
struct FieldStats {
    /// Number of records in which the path appeared (including as null).
    present: usize,
    nulls: usize,
    types: BTreeMap<LogicalType, usize>,
    repeated: bool,
}

impl FieldStats {
    fn count(&mut self, logical_type: LogicalType) {
        *self.types.entry(logical_type).or_insert(0) += 1;
    }

    fn resolve_type(&self) -> LogicalType {
        let mut observed = self.types.iter().filter(|(_, count)| **count > 0);
        match (observed.next(), observed.next()) {
            (None, _) => LogicalType::String,
            (Some((only, _)), None) => *only,
            _ => TYPE_PRIORITY
                .iter()
                .copied()
                .find(|t| self.types.get(t).is_some_and(|c| *c > 0))
                .unwrap_or(LogicalType::String),
        }
    }
}

/// Accumulates statistics across records.
#[derive(Debug, Default)]
struct ShapeBuilder {
    stats: BTreeMap<String, FieldStats>,
}

impl ShapeBuilder {
    fn add_record(&mut self, record: &Record) {
        let mut seen = BTreeSet::new();
        for (key, value) in record {
            self.visit(value, key, false, &mut seen);
        }
        for path in seen {
            if let Some(stats) = self.stats.get_mut(&path) {
                stats.present += 1;
            }
        }
    }

    /// Fold one value into the statistics for `path`.
    ///
    /// `in_array` is set for array elements: nested arrays there count as
    /// the `array` type instead of marking the path repeated.
    fn visit(&mut self, value: &Value, path: &str, in_array: bool, seen: &mut BTreeSet<String>) {
        seen.insert(path.to_string());
        let stats = self.stats.entry(path.to_string()).or_default();

        match value {
            Value::Null => stats.nulls += 1,
            Value::Bool(_) => stats.count(LogicalType::Boolean),
            Value::Number(_) => stats.count(LogicalType::Number),
            Value::String(_) => stats.count(LogicalType::String),
            Value::Object(map) => {
                stats.count(LogicalType::Object);
                for (key, nested) in map {
                    let child = format!("{path}.{key}");
                    self.visit(nested, &child, false, seen);
                }
            }
            Value::Array(items) => {
                if in_array {
                    stats.count(LogicalType::Array);
                } else {
                    stats.repeated = true;
                    if items.is_empty() {
                        stats.count(LogicalType::Array);
                    }
                }
                for item in items {
                    self.visit(item, path, true, seen);
                }
            }
        }
    }

    fn build(self, total: usize) -> Shape {
        let fields = self
            .stats
            .into_iter()
            .map(|(path, stats)| FieldDefinition {
                field_type: stats.resolve_type(),
                nullable: stats.nulls > 0 || stats.present < total,
                repeated: stats.repeated,
                constraints: FieldConstraints::default(),
                path,
            })
            .collect();
        Shape { fields }
    }
}

/// Infer a [`Shape`] from a record set.
///
/// Fields come back sorted by path.
pub fn infer_shape(records: &[Record]) -> Shape {
    let mut builder = ShapeBuilder::default();
    for record in records {
        builder.add_record(record);
    }
    let shape = builder.build(records.len());
    log::debug!(
        "inferred shape with {} fields from {} records",
        shape.fields.len(),
        records.len()
    );
    shape
}
