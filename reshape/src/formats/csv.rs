//! CSV reader and writer.
//!
//! The reader accepts any single-byte legacy encoding that spreadsheet
//! exports commonly use; everything is decoded to UTF-8 before parsing.
//! Cells are read as strings (empty cells as null) and typing is left to
//! coercion rules.

use crate::error::{FormatError, FormatResult};
use crate::models::{CanonicalData, Record, Value};
use crate::path;

/// Detect the charset of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, _confidence, _language) = chardet::detect(bytes);

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode input to UTF-8, detecting the charset when it is not UTF-8.
pub fn decode_content(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let encoding = detect_encoding(bytes);
            log::debug!("input is not utf-8, detected {encoding}");
            let decoder = match encoding.as_str() {
                "iso-8859-1" => encoding_rs::ISO_8859_15,
                "windows-1252" => encoding_rs::WINDOWS_1252,
                other => encoding_rs::Encoding::for_label(other.as_bytes())
                    .unwrap_or(encoding_rs::WINDOWS_1252),
            };
            decoder.decode(bytes).0.into_owned()
        }
    };

    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// Parse CSV bytes into canonical data.
///
/// The first row is the header. Every other row must have exactly as many
/// cells as the header.
pub fn parse_csv(bytes: &[u8]) -> FormatResult<CanonicalData> {
    let content = decode_content(bytes);
    if content.trim().is_empty() {
        return Err(FormatError::EmptyInput);
    }

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(FormatError::EmptyInput);
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.len() != headers.len() {
            return Err(FormatError::ColumnCountMismatch {
                line: row.position().map(|p| p.line()).unwrap_or_default(),
                expected: headers.len(),
                found: row.len(),
            });
        }

        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| {
                let value = if cell.is_empty() {
                    Value::Null
                } else {
                    Value::String(cell.to_string())
                };
                (header.clone(), value)
            })
            .collect();
        records.push(record);
    }

    log::info!("read {} csv rows with {} columns", records.len(), headers.len());
    Ok(CanonicalData::from_records(records))
}

/// Column headers: shape paths, or the union of record keys when the shape
/// is empty. Always sorted.
fn headers_for(data: &CanonicalData) -> Vec<String> {
    let mut headers: Vec<String> = data.shape.paths().map(str::to_string).collect();
    if headers.is_empty() {
        headers = data
            .records
            .iter()
            .flat_map(|record| record.keys().cloned())
            .collect();
    }
    headers.sort();
    headers.dedup();
    headers
}

/// Render canonical data as CSV.
///
/// Absent and null values become empty cells. An object or array under
/// any header fails with `ScalarRequired`. The header row is always
/// written, so data without any column renders one empty line per row.
pub fn render_csv(data: &CanonicalData) -> FormatResult<Vec<u8>> {
    let headers = headers_for(data);
    if headers.is_empty() {
        return Ok(vec![b'\n'; data.records.len() + 1]);
    }

    let mut writer = ::csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(&headers)?;

    for record in &data.records {
        let mut row = Vec::with_capacity(headers.len());
        for header in &headers {
            let cell = match path::get(record, header)? {
                None | Some(Value::Null) => String::new(),
                Some(Value::Object(_) | Value::Array(_)) => {
                    return Err(FormatError::ScalarRequired(header.clone()));
                }
                Some(scalar) => scalar.scalar_text().unwrap_or_default(),
            };
            row.push(cell);
        }
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| FormatError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogicalType;

    #[test]
    fn test_parse_basic() {
        let data = parse_csv(b"name,age\nAda,30\nLinus,\n").unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.records[0]["age"], Value::from("30"));
        assert_eq!(data.records[1]["age"], Value::Null);

        let age = data.shape.field("age").unwrap();
        assert_eq!(age.field_type, LogicalType::String);
        assert!(age.nullable);
    }

    #[test]
    fn test_parse_quoted_cells() {
        let data = parse_csv(b"tags,note\n\"a,b\",\"say \"\"hi\"\"\"\n").unwrap();
        assert_eq!(data.records[0]["tags"], Value::from("a,b"));
        assert_eq!(data.records[0]["note"], Value::from("say \"hi\""));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(parse_csv(b""), Err(FormatError::EmptyInput)));
        assert!(matches!(parse_csv(b"\n\n"), Err(FormatError::EmptyInput)));
    }

    #[test]
    fn test_parse_header_only() {
        let data = parse_csv(b"a,b\n").unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_parse_column_count_mismatch() {
        let err = parse_csv(b"a,b\n1,2\n3\n").unwrap_err();
        match err {
            FormatError::ColumnCountMismatch { line, expected, found } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_latin1() {
        let (bytes, _, _) = encoding_rs::WINDOWS_1252
            .encode("nom,ville\nRené,Orléans\nCélestine,Besançon\nFrançoise,Créteil\n");
        let data = parse_csv(&bytes).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.records[0]["nom"], Value::from("René"));
        assert_eq!(data.records[1]["ville"], Value::from("Besançon"));
    }

    #[test]
    fn test_decode_strips_bom() {
        assert_eq!(decode_content("\u{feff}a,b".as_bytes()), "a,b");
    }

    #[test]
    fn test_render_quotes_when_needed() {
        let mut record = Record::new();
        record.insert("tags".into(), Value::from("a,b"));
        record.insert("id".into(), Value::Number(1.0));
        record.insert("ok".into(), Value::Bool(false));
        let data = CanonicalData::from_records(vec![record]);

        let out = String::from_utf8(render_csv(&data).unwrap()).unwrap();
        assert_eq!(out, "id,ok,tags\n1,false,\"a,b\"\n");
    }

    #[test]
    fn test_render_rejects_nested_values() {
        let mut record = Record::new();
        record.insert("tags".into(), Value::Array(vec![Value::from("a")]));
        let data = CanonicalData::from_records(vec![record]);
        assert!(matches!(
            render_csv(&data),
            Err(FormatError::ScalarRequired(path)) if path == "tags"
        ));
    }

    #[test]
    fn test_render_headers_from_records_when_shape_empty() {
        let mut record = Record::new();
        record.insert("b".into(), Value::from("2"));
        record.insert("a".into(), Value::from("1"));
        let data = CanonicalData {
            shape: Default::default(),
            records: vec![record],
        };
        let out = String::from_utf8(render_csv(&data).unwrap()).unwrap();
        assert_eq!(out, "a,b\n1,2\n");
    }

    #[test]
    fn test_render_without_columns_keeps_header_line() {
        assert_eq!(render_csv(&CanonicalData::default()).unwrap(), b"\n");

        let data = CanonicalData::from_records(vec![Record::new(), Record::new()]);
        assert_eq!(render_csv(&data).unwrap(), b"\n\n\n");
    }

    #[test]
    fn test_render_header_only_for_empty_records_with_shape() {
        let source = parse_csv(b"x,y\n1,2\n").unwrap();
        let data = CanonicalData {
            shape: source.shape,
            records: Vec::new(),
        };
        let out = String::from_utf8(render_csv(&data).unwrap()).unwrap();
        assert_eq!(out, "x,y\n");
    }
}
