//! Conversion plans.
//!
//! - `model`: plan definition and deterministic normalization
//! - `validate`: lossy-operation acknowledgment gate
//! - `infer`: heuristic plan proposal for a target format
//!
//! ## Plan file example
//!
//! ```json
//! {
//!   "flatten_fields": ["user"],
//!   "join_arrays": [{"path": "tags", "delimiter": ";"}],
//!   "lossy_operations": [
//!     {"path": "tags", "operation": "join_array", "reason": "CSV requires scalars"}
//!   ]
//! }
//! ```

pub mod infer;
pub mod model;
pub mod validate;

pub use infer::{infer_array_element_type, infer_plan};
pub use model::{
    ConversionPlan, DefaultValueRule, JoinArrayRule, LossyOperation, LossyOperationKind,
    TypeCoercionRule,
};
pub use validate::validate_lossy_operations;
