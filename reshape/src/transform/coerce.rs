//! Value coercion between logical types.
//!
//! | target  | string            | number        | boolean         |
//! |---------|-------------------|---------------|-----------------|
//! | string  | identity          | decimal text  | `true`/`false`  |
//! | number  | parse float       | identity      | `1` / `0`       |
//! | boolean | `true`/`false`    | nonzero       | identity        |
//!
//! Objects and arrays never coerce, and neither can be a target.

use crate::error::{TransformError, TransformResult};
use crate::models::{format_number, LogicalType, Value};

/// Convert a non-null `value` to `target`.
///
/// Null is returned unchanged; callers skip null before coercing.
pub fn coerce(value: &Value, target: LogicalType) -> TransformResult<Value> {
    let unsupported = |from: LogicalType| TransformError::UnsupportedCoercion { from, to: target };

    match (value, target) {
        (Value::Null, _) => Ok(Value::Null),
        (Value::Object(_), _) => Err(unsupported(LogicalType::Object)),
        (Value::Array(_), _) => Err(unsupported(LogicalType::Array)),
        (other, LogicalType::Object | LogicalType::Array) => {
            Err(unsupported(other.logical_type().unwrap_or(LogicalType::String)))
        }

        (Value::String(s), LogicalType::String) => Ok(Value::String(s.clone())),
        (Value::Number(n), LogicalType::String) => Ok(Value::String(format_number(*n))),
        (Value::Bool(b), LogicalType::String) => Ok(Value::String(b.to_string())),

        (Value::String(s), LogicalType::Number) => parse_number(s).map(Value::Number),
        (Value::Number(n), LogicalType::Number) => Ok(Value::Number(*n)),
        (Value::Bool(b), LogicalType::Number) => Ok(Value::Number(if *b { 1.0 } else { 0.0 })),

        (Value::String(s), LogicalType::Boolean) => parse_boolean(s).map(Value::Bool),
        (Value::Number(n), LogicalType::Boolean) => Ok(Value::Bool(*n != 0.0)),
        (Value::Bool(b), LogicalType::Boolean) => Ok(Value::Bool(*b)),
    }
}

/// Parse a decimal string. `NaN` and infinities have no JSON form and are
/// rejected like any other non-number.
fn parse_number(s: &str) -> TransformResult<f64> {
    match s.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(TransformError::InvalidNumericString(s.to_string())),
    }
}

fn parse_boolean(s: &str) -> TransformResult<bool> {
    let trimmed = s.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(TransformError::InvalidBooleanString(s.to_string()))
    }
}
