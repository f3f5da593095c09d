//! Lossy-operation acknowledgment gate.
//!
//! Joining arrays, coercing types and dropping fields all discard
//! information. A plan may only do so for paths it explicitly lists in
//! `lossy_operations`; the check runs before any record is touched.

use crate::error::{PlanError, PlanResult};

use super::model::{ConversionPlan, LossyOperationKind};

/// Check that every lossy rule in `plan` is acknowledged.
///
/// Rules are checked joins first, then coercions, then drops, each in plan
/// order; the first unacknowledged one is reported.
pub fn validate_lossy_operations(plan: &ConversionPlan) -> PlanResult<()> {
    let required = plan
        .join_arrays
        .iter()
        .map(|rule| (LossyOperationKind::JoinArray, rule.path.as_str()))
        .chain(
            plan.type_coercions
                .iter()
                .map(|rule| (LossyOperationKind::CoerceType, rule.path.as_str())),
        )
        .chain(
            plan.drop_fields
                .iter()
                .map(|path| (LossyOperationKind::DropField, path.as_str())),
        );

    for (operation, path) in required {
        if !plan.acknowledges(operation, path) {
            return Err(PlanError::MissingAcknowledgment {
                operation,
                path: path.to_string(),
            });
        }
    }

    Ok(())
}
