//! High-level pipeline API for format conversion.
//!
//! Combines every step: parsing, plan resolution, transformation and
//! rendering.
//!
//! # Example
//!
//! ```rust,ignore
//! use reshape::pipeline::{convert, ConvertOptions, PlanSource};
//! use reshape::Format;
//!
//! let options = ConvertOptions {
//!     from: Format::Json,
//!     to: Format::Csv,
//!     plan: PlanSource::Infer,
//!     pretty: false,
//! };
//! let result = convert(br#"{"user":{"id":1},"tags":["a","b"]}"#, &options)?;
//! for warning in &result.warnings {
//!     eprintln!("{warning}");
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, ConvertResult};
use crate::formats::{self, Format};
use crate::models::CanonicalData;
use crate::plan::{infer_plan, ConversionPlan};

use super::engine::apply;
use super::warnings::Warning;

/// Where the conversion plan comes from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PlanSource {
    /// No rewriting; data passes through as read.
    #[default]
    None,
    /// A plan built in code.
    Inline(ConversionPlan),
    /// A plan file on disk.
    File(PathBuf),
    /// Propose a plan from the input data and the target format.
    Infer,
}

/// Options for a single conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Input format.
    pub from: Format,
    /// Output format.
    pub to: Format,
    /// Plan to apply between reading and rendering.
    pub plan: PlanSource,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl ConvertOptions {
    pub fn new(from: Format, to: Format) -> Self {
        Self {
            from,
            to,
            plan: PlanSource::None,
            pretty: false,
        }
    }

    pub fn with_plan(mut self, plan: PlanSource) -> Self {
        self.plan = plan;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Result of a complete conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOutput {
    /// Rendered bytes in the target format.
    pub output: Vec<u8>,
    /// Effective plan, normalized.
    pub plan: ConversionPlan,
    /// Lossy operations that were performed.
    pub warnings: Vec<Warning>,
    /// Number of records rendered.
    pub record_count: usize,
}

/// Convert `input` from one format to another.
///
/// Steps:
/// 1. Parse the input with `options.from`
/// 2. Resolve the plan
/// 3. Apply the plan
/// 4. Render with `options.to`
///
/// The first failure aborts the whole conversion; nothing is rendered.
pub fn convert(input: &[u8], options: &ConvertOptions) -> ConvertResult<ConvertOutput> {
    log::info!("converting {} -> {}", options.from, options.to);
    let data = formats::parse(options.from, input)?;

    let plan = resolve_plan(&options.plan, &data, options.to)?.normalize();
    if plan.is_empty() {
        log::debug!("empty plan, data passes through");
    }

    let transformed = apply(&data, &plan)?;
    let output = formats::render(options.to, &transformed.data, options.pretty)?;

    log::info!(
        "rendered {} records ({} bytes)",
        transformed.data.len(),
        output.len()
    );

    Ok(ConvertOutput {
        output,
        plan,
        warnings: transformed.warnings,
        record_count: transformed.data.len(),
    })
}

fn resolve_plan(
    source: &PlanSource,
    data: &CanonicalData,
    target: Format,
) -> ConvertResult<ConversionPlan> {
    match source {
        PlanSource::None => Ok(ConversionPlan::default()),
        PlanSource::Inline(plan) => Ok(plan.clone()),
        PlanSource::File(path) => load_plan(path),
        PlanSource::Infer => Ok(infer_plan(data, target)),
    }
}

/// Read a plan file.
pub fn load_plan(path: &Path) -> ConvertResult<ConversionPlan> {
    log::debug!("loading plan from {}", path.display());
    let content = fs::read_to_string(path)?;
    ConversionPlan::from_json(&content).map_err(|source| ConvertError::PlanFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `plan` as pretty JSON, normalized so saved plans diff cleanly.
pub fn save_plan(path: &Path, plan: &ConversionPlan) -> ConvertResult<()> {
    let json = plan
        .normalize()
        .to_json()
        .map_err(|source| ConvertError::PlanFile {
            path: path.to_path_buf(),
            source,
        })?;
    fs::write(path, json + "\n")?;
    log::info!("saved plan to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FormatError, PlanError, TransformError};
    use crate::plan::LossyOperationKind;
    use tempfile::TempDir;

    const HOSTILE: &str = r#"[
        {"user":{"id":1,"name":"Ada"},"meta":{"active":true},"tags":["a,b","c"],"scores":[1,2,3],"notes":"first"},
        {"user":{"id":2,"name":"Linus"},"meta":{"active":false},"tags":["solo"],"scores":[4]}
    ]"#;

    fn text(output: &ConvertOutput) -> &str {
        std::str::from_utf8(&output.output).unwrap()
    }

    #[test]
    fn test_hostile_json_to_csv_with_inferred_plan() {
        let options = ConvertOptions::new(Format::Json, Format::Csv).with_plan(PlanSource::Infer);
        let result = convert(HOSTILE.as_bytes(), &options).unwrap();

        assert_eq!(
            text(&result),
            "meta.active,notes,scores,tags,user.id,user.name\n\
             true,first,\"1,2,3\",\"a,b,c\",1,Ada\n\
             false,,4,solo,2,Linus\n"
        );
        assert_eq!(result.record_count, 2);

        let warnings: Vec<(LossyOperationKind, &str)> = result
            .warnings
            .iter()
            .map(|w| (w.code, w.path.as_str()))
            .collect();
        assert_eq!(
            warnings,
            vec![
                (LossyOperationKind::JoinArray, "scores"),
                (LossyOperationKind::JoinArray, "tags"),
            ]
        );
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let options = ConvertOptions::new(Format::Json, Format::Csv).with_plan(PlanSource::Infer);
        let first = convert(HOSTILE.as_bytes(), &options).unwrap();
        let second = convert(HOSTILE.as_bytes(), &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_nested_csv_without_plan_fails() {
        let options = ConvertOptions::new(Format::Json, Format::Csv);
        let err = convert(HOSTILE.as_bytes(), &options).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Format(FormatError::ScalarRequired(ref path)) if path == "meta"
        ));
    }

    #[test]
    fn test_csv_to_json_with_coercion() {
        let plan = ConversionPlan::new()
            .coerce("age", crate::models::LogicalType::Number)
            .acknowledge(LossyOperationKind::CoerceType, "age", "numeric ages");
        let options =
            ConvertOptions::new(Format::Csv, Format::Json).with_plan(PlanSource::Inline(plan));

        let result = convert(b"name,age\nAda,30\nLinus,\n", &options).unwrap();
        assert_eq!(
            text(&result),
            r#"[{"age":30,"name":"Ada"},{"age":null,"name":"Linus"}]"#
        );
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_unacknowledged_inline_plan() {
        let plan = ConversionPlan::new().drop_field("name");
        let options =
            ConvertOptions::new(Format::Json, Format::Json).with_plan(PlanSource::Inline(plan));
        let err = convert(br#"{"name":"Ada"}"#, &options).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Transform(TransformError::Plan(PlanError::MissingAcknowledgment { .. }))
        ));
    }

    #[test]
    fn test_json_target_passes_through_with_inferred_plan() {
        let options = ConvertOptions::new(Format::Json, Format::Json).with_plan(PlanSource::Infer);
        let result = convert(br#"{"user":{"id":1},"tags":["a"]}"#, &options).unwrap();
        assert!(result.plan.is_empty());
        assert_eq!(text(&result), r#"{"tags":["a"],"user":{"id":1}}"#);
    }

    #[test]
    fn test_non_finite_coercion_fails_instead_of_rendering_null() {
        let plan = ConversionPlan::new()
            .coerce("v", crate::models::LogicalType::Number)
            .acknowledge(LossyOperationKind::CoerceType, "v", "");
        let options =
            ConvertOptions::new(Format::Json, Format::Json).with_plan(PlanSource::Inline(plan));

        let err = convert(br#"{"v":"NaN"}"#, &options).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Transform(TransformError::InvalidNumericString(ref text)) if text == "NaN"
        ));
    }

    #[test]
    fn test_save_and_load_plan() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plan.json");

        let plan = ConversionPlan::new()
            .join("tags", ";")
            .flatten("user")
            .acknowledge(LossyOperationKind::JoinArray, "tags", "csv");
        save_plan(&path, &plan).unwrap();

        let loaded = load_plan(&path).unwrap();
        assert_eq!(loaded, plan.normalize());

        let options = ConvertOptions::new(Format::Json, Format::Csv)
            .with_plan(PlanSource::File(path.clone()));
        let result = convert(br#"{"user":{"id":7},"tags":["x","y"]}"#, &options).unwrap();
        assert_eq!(text(&result), "tags,user.id\nx;y,7\n");
    }

    #[test]
    fn test_invalid_plan_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"flatten_fields\": 3}").unwrap();

        let err = load_plan(&path).unwrap_err();
        assert!(matches!(err, ConvertError::PlanFile { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_missing_plan_file() {
        let dir = TempDir::new().unwrap();
        let err = load_plan(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConvertError::Io(_)));
    }
}
