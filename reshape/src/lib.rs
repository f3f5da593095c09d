//! # Reshape - explicit, plan-driven conversion between nested and tabular data
//!
//! Reshape reads JSON or CSV into a format-neutral model, rewrites it through
//! a declarative conversion plan, and renders it back out. Every operation
//! that loses information must be acknowledged in the plan and is reported
//! as a warning when it runs.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ JSON / CSV  │────▶│   Formats   │────▶│  Transform  │────▶│ JSON / CSV  │
//! │   (bytes)   │     │ (+ shape)   │     │   (plan)    │     │   (bytes)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                ▲
//!                                         ┌──────┴──────┐
//!                                         │    Plan     │
//!                                         │(file/infer) │
//!                                         └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use reshape::{convert, ConvertOptions, Format, PlanSource};
//!
//! let options = ConvertOptions::new(Format::Json, Format::Csv).with_plan(PlanSource::Infer);
//! let result = convert(br#"{"user":{"id":1,"name":"Ada"}}"#, &options)?;
//! assert_eq!(result.output, b"user.id,user.name\n1,Ada\n");
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Values, records, shapes and canonical data
//! - [`path`] - Dotted-path addressing with literal-key precedence
//! - [`shape`] - Shape inference
//! - [`plan`] - Conversion plans, validation and inference
//! - [`transform`] - Engine, coercion, warnings and pipeline
//! - [`formats`] - JSON and CSV codecs
//! - [`config`] - Environment configuration
//! - [`logs`] - Stderr log output

// Core modules
pub mod error;
pub mod models;

// Addressing and inference
pub mod path;
pub mod shape;

// Plans
pub mod plan;

// Transformation
pub mod transform;

// Codecs
pub mod formats;

// Runtime
pub mod config;
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConvertError, ConvertResult, FormatError, FormatResult, PathError, PathResult, PlanError,
    PlanResult, TransformError, TransformResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    CanonicalData, FieldConstraints, FieldDefinition, LogicalType, Record, Shape, Value,
};

// =============================================================================
// Re-exports - Shape inference
// =============================================================================

pub use shape::infer_shape;

// =============================================================================
// Re-exports - Plans
// =============================================================================

pub use plan::{
    infer_array_element_type, infer_plan, validate_lossy_operations, ConversionPlan,
    DefaultValueRule, JoinArrayRule, LossyOperation, LossyOperationKind, TypeCoercionRule,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{apply, coerce, TransformOutput, Warning, WarningCollector};

// =============================================================================
// Re-exports - Formats
// =============================================================================

pub use formats::{parse_csv, parse_json, render_csv, render_json, Format};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    convert, load_plan, save_plan, ConvertOptions, ConvertOutput, PlanSource,
};

pub mod pipeline {
    pub use crate::transform::pipeline::*;
}

pub use config::Config;
