//! Error types for the reshape conversion pipeline.
//!
//! The hierarchy mirrors the layers of the crate:
//!
//! - [`PathError`] - dotted path resolution
//! - [`PlanError`] - conversion plan validation
//! - [`TransformError`] - transform engine and value coercion
//! - [`FormatError`] - JSON/CSV reading and rendering
//! - [`ConvertError`] - top-level pipeline orchestration
//!
//! Lower layers convert into higher ones through `From`, so `?` works
//! across boundaries.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::LogicalType;
use crate::plan::LossyOperationKind;

// =============================================================================
// Path Errors
// =============================================================================

/// Errors while resolving a dotted path inside a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path was empty after trimming.
    #[error("path is empty")]
    EmptyPath,

    /// A descent was required through a value that is not an object.
    #[error("path segment is not an object: {0}")]
    NotAnObject(String),
}

// =============================================================================
// Plan Errors
// =============================================================================

/// Errors raised by the lossy-operation acknowledgment gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A lossy rule has no matching `lossy_operations` entry.
    #[error("{operation} requires a lossy_operations entry for path: {path}")]
    MissingAcknowledgment {
        operation: LossyOperationKind,
        path: String,
    },
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors while applying a conversion plan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// Path resolution failed.
    #[error(transparent)]
    Path(#[from] PathError),

    /// The plan was rejected before any record was touched.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// An explode or join rule targets a value that is not an array.
    #[error("path is not an array: {0}")]
    NotAnArray(String),

    /// A joined array contains an object or a nested array.
    #[error("join array contains non-scalar value at path: {path}")]
    NonScalarJoinElement { path: String },

    /// A string could not be parsed as a number.
    #[error("cannot coerce string to number: {0:?}")]
    InvalidNumericString(String),

    /// A string could not be parsed as a boolean.
    #[error("cannot coerce string to boolean: {0:?}")]
    InvalidBooleanString(String),

    /// No coercion exists between the two logical types.
    #[error("cannot coerce {from} to {to}")]
    UnsupportedCoercion { from: LogicalType, to: LogicalType },
}

// =============================================================================
// Format Errors
// =============================================================================

/// Errors from the JSON and CSV codecs.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Unknown format name.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The input contained no bytes (CSV needs at least a header row).
    #[error("csv input is empty")]
    EmptyInput,

    /// A CSV row does not have as many cells as the header.
    #[error("csv line {line} has {found} columns, header has {expected}")]
    ColumnCountMismatch {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A CSV cell would have to hold an object or an array.
    #[error("csv output requires scalar at path {0}")]
    ScalarRequired(String),

    /// A JSON array contains something other than an object.
    #[error("json array contains non-object value at index {index}")]
    NonObjectElement { index: usize },

    /// The JSON root is neither an object nor an array.
    #[error("json input must be an object or array of objects")]
    InvalidRoot,

    /// Path resolution failed while rendering.
    #[error(transparent)]
    Path(#[from] PathError),

    /// JSON syntax or serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV syntax or serialization error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to flush rendered bytes.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Conversion Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error returned by [`crate::transform::pipeline::convert`].
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Reading or rendering failed.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The transform engine rejected the plan or the data.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// A plan file could not be decoded.
    #[error("invalid plan file {}: {source}", path.display())]
    PlanFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading input or writing output failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for path operations.
pub type PathResult<T> = Result<T, PathError>;

/// Result type for plan validation.
pub type PlanResult<T> = Result<T, PlanError>;

/// Result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for codec operations.
pub type FormatResult<T> = Result<T, FormatError>;

/// Result type for pipeline operations.
pub type ConvertResult<T> = Result<T, ConvertError>;
