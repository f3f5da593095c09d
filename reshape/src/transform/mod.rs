//! Transformation module.
//!
//! - `engine`: applies a conversion plan to canonical data
//! - `coerce`: value conversion between logical types
//! - `warnings`: lossy-operation notices
//! - `pipeline`: parse → plan → transform → render

pub mod coerce;
pub mod engine;
pub mod pipeline;
pub mod warnings;

pub use coerce::coerce;
pub use engine::{apply, TransformOutput};
pub use pipeline::{convert, load_plan, save_plan, ConvertOptions, ConvertOutput, PlanSource};
pub use warnings::{warning_message, Warning, WarningCollector};
