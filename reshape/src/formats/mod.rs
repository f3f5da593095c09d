//! Format codecs between raw bytes and canonical data.
//!
//! - `json`: object or array of objects
//! - `csv`: header row plus string cells, with charset detection
//!
//! Both readers infer the shape of what they read; both writers emit keys
//! in sorted order so output is byte-for-byte reproducible.

pub mod csv;
pub mod json;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FormatError, FormatResult};
use crate::models::CanonicalData;

pub use self::csv::{parse_csv, render_csv};
pub use self::json::{parse_json, render_json};

/// Supported input and output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Csv => "csv",
        }
    }

    /// Whether every cell of the format must hold a scalar.
    pub fn is_tabular(&self) -> bool {
        matches!(self, Format::Csv)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            _ => Err(FormatError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Read `bytes` as `format`.
pub fn parse(format: Format, bytes: &[u8]) -> FormatResult<CanonicalData> {
    match format {
        Format::Json => parse_json(bytes),
        Format::Csv => parse_csv(bytes),
    }
}

/// Render `data` as `format`. `pretty` only affects JSON.
pub fn render(format: Format, data: &CanonicalData, pretty: bool) -> FormatResult<Vec<u8>> {
    match format {
        Format::Json => render_json(data, pretty),
        Format::Csv => render_csv(data),
    }
}
