//! User-facing notices for lossy actions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::plan::LossyOperationKind;

/// A successful but lossy operation, reported once per path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub code: LossyOperationKind,
    pub path: String,
    pub message: String,
}

impl Warning {
    /// Build the warning for `code` at `path` with its standard message.
    pub fn new(code: LossyOperationKind, path: &str) -> Self {
        Self {
            code,
            path: path.to_string(),
            message: warning_message(code).to_string(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "warning: {}", self.message)
        } else {
            write!(f, "warning: {} (path: {})", self.message, self.path)
        }
    }
}

/// Standard message for a warning code.
pub fn warning_message(code: LossyOperationKind) -> &'static str {
    match code {
        LossyOperationKind::JoinArray => "joined array into string",
        LossyOperationKind::CoerceType => "coerced type",
        LossyOperationKind::DropField => "dropped field",
    }
}

/// Collects warnings for a single transform call.
///
/// Holds at most one warning per (path, code) and keeps them ordered by
/// path, then message.
#[derive(Debug, Default)]
pub struct WarningCollector {
    warnings: Vec<Warning>,
}

impl WarningCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning unless an identical one is already present.
    pub fn add_once(&mut self, path: &str, code: LossyOperationKind) {
        let warning = Warning::new(code, path);
        let key = |w: &Warning| (w.path.clone(), w.message.clone());
        match self.warnings.binary_search_by_key(&key(&warning), key) {
            Ok(_) => {}
            Err(index) => self.warnings.insert(index, warning),
        }
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_vec(self) -> Vec<Warning> {
        self.warnings
    }
}
