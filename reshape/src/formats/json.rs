//! JSON reader and writer.

use crate::error::{FormatError, FormatResult};
use crate::models::{CanonicalData, Record, Value};

/// Parse a JSON object or array of objects into canonical data.
pub fn parse_json(bytes: &[u8]) -> FormatResult<CanonicalData> {
    let decoded: serde_json::Value = serde_json::from_slice(bytes)?;

    let records = match Value::from(decoded) {
        Value::Object(record) => vec![record],
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(record) => Ok(record),
                _ => Err(FormatError::NonObjectElement { index }),
            })
            .collect::<FormatResult<Vec<Record>>>()?,
        _ => return Err(FormatError::InvalidRoot),
    };

    log::info!("read {} json records", records.len());
    Ok(CanonicalData::from_records(records))
}

/// Render canonical data as JSON.
///
/// No records render as `[]`, a single record as a bare object, and
/// anything more as an array of objects.
pub fn render_json(data: &CanonicalData, pretty: bool) -> FormatResult<Vec<u8>> {
    let bytes = match data.records.as_slice() {
        [] => encode(&Vec::<Record>::new(), pretty)?,
        [record] => encode(record, pretty)?,
        records => encode(&records, pretty)?,
    };
    Ok(bytes)
}

fn encode<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> FormatResult<Vec<u8>> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_object() {
        let data = parse_json(br#"{"name":"Ada","age":30}"#).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data.records[0]["age"], Value::Number(30.0));
        let paths: Vec<&str> = data.shape.paths().collect();
        assert_eq!(paths, vec!["age", "name"]);
    }

    #[test]
    fn test_parse_array_of_objects() {
        let data = parse_json(br#"[{"id":1},{"id":2},{"id":3}]"#).unwrap();
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_parse_rejects_non_object_element() {
        let err = parse_json(br#"[{"id":1}, 2]"#).unwrap_err();
        assert!(matches!(err, FormatError::NonObjectElement { index: 1 }));
    }

    #[test]
    fn test_parse_rejects_scalar_root() {
        assert!(matches!(parse_json(b"42"), Err(FormatError::InvalidRoot)));
        assert!(matches!(parse_json(b"\"text\""), Err(FormatError::InvalidRoot)));
    }

    #[test]
    fn test_parse_syntax_error() {
        assert!(matches!(parse_json(b"{\"a\":"), Err(FormatError::Json(_))));
    }

    #[test]
    fn test_render_cardinality() {
        let empty = CanonicalData::default();
        assert_eq!(render_json(&empty, false).unwrap(), b"[]");

        let one = parse_json(br#"{"b":true,"a":1.5}"#).unwrap();
        assert_eq!(render_json(&one, false).unwrap(), br#"{"a":1.5,"b":true}"#);

        let two = parse_json(br#"[{"a":1},{"a":null}]"#).unwrap();
        assert_eq!(render_json(&two, false).unwrap(), br#"[{"a":1},{"a":null}]"#);
    }

    #[test]
    fn test_render_pretty() {
        let data = parse_json(br#"{"a":{"b":2}}"#).unwrap();
        let out = String::from_utf8(render_json(&data, true).unwrap()).unwrap();
        assert_eq!(out, "{\n  \"a\": {\n    \"b\": 2\n  }\n}");
    }
}
