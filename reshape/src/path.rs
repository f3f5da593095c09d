//! Dotted-path addressing over nested records.
//!
//! A path such as `user.address.city` is split on `.` and resolved one
//! segment at a time. At every step the *remaining* dotted suffix is first
//! looked up as a literal key, so flattened keys like `"user.name"` stay
//! addressable and win over `user` → `name`.

use crate::error::{PathError, PathResult};
use crate::models::{Record, Value};

/// Split a path into segments, rejecting paths that are empty after trimming.
fn split_path(path: &str) -> PathResult<Vec<&str>> {
    let cleaned = path.trim();
    if cleaned.is_empty() {
        return Err(PathError::EmptyPath);
    }
    Ok(cleaned.split('.').collect())
}

/// Read the value at `path`.
///
/// Returns `Ok(None)` when a segment is missing. A present null is
/// `Ok(Some(&Value::Null))`.
pub fn get<'a>(record: &'a Record, path: &str) -> PathResult<Option<&'a Value>> {
    let segments = split_path(path)?;
    let mut current = record;

    for (index, segment) in segments.iter().enumerate() {
        let remaining = segments[index..].join(".");
        if let Some(value) = current.get(&remaining) {
            return Ok(Some(value));
        }

        let Some(next) = current.get(*segment) else {
            return Ok(None);
        };

        // Report the segment that could not be resolved inside the scalar
        current = match next {
            Value::Object(map) => map,
            _ => {
                let unresolved = segments.get(index + 1).unwrap_or(segment);
                return Err(PathError::NotAnObject((*unresolved).to_string()));
            }
        };
    }

    // The last segment is always covered by the literal lookup above.
    Ok(None)
}

/// Write `value` at `path`, creating intermediate objects as needed.
pub fn set(record: &mut Record, path: &str, value: Value) -> PathResult<()> {
    let segments = split_path(path)?;
    let last = segments.len() - 1;
    let mut current = record;

    for (index, segment) in segments.iter().enumerate() {
        let remaining = segments[index..].join(".");
        if current.contains_key(&remaining) || index == last {
            current.insert(remaining, value);
            return Ok(());
        }

        let next = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Record::new()));

        current = match next {
            Value::Object(map) => map,
            _ => return Err(PathError::NotAnObject((*segment).to_string())),
        };
    }

    Ok(())
}

/// Remove the value at `path`.
///
/// Missing intermediate segments make this a no-op.
pub fn delete(record: &mut Record, path: &str) -> PathResult<()> {
    let segments = split_path(path)?;
    let last = segments.len() - 1;
    let mut current = record;

    for (index, segment) in segments.iter().enumerate() {
        let remaining = segments[index..].join(".");
        if current.remove(&remaining).is_some() || index == last {
            return Ok(());
        }

        current = match current.get_mut(*segment) {
            None => return Ok(()),
            Some(Value::Object(map)) => map,
            Some(_) => return Err(PathError::NotAnObject((*segment).to_string())),
        };
    }

    Ok(())
}

/// Promote the immediate children of the object at `path` to top-level
/// keys named `path.child`, then remove `path`.
///
/// Only one level is flattened: grandchildren stay nested under the new
/// keys. Absent or null targets are left alone.
pub fn flatten(record: &mut Record, path: &str) -> PathResult<()> {
    let prefix = path.trim();
    let children = match get(record, prefix)? {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => return Err(PathError::NotAnObject(prefix.to_string())),
    };

    delete(record, prefix)?;
    for (key, value) in children {
        record.insert(format!("{prefix}.{key}"), value);
    }
    Ok(())
}
