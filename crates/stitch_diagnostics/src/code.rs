//! Stable `E`/`W` codes.
//!
//! Numbers are grouped by stage: `1xx` scanning, `2xx` joining, `3xx`
//! configuration and `9xx` broken wire-model contracts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a code names a fatal error or a warning.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Generation stops (`E`).
    Error,
    /// Wiring is degraded but generated (`W`).
    Warning,
}

/// A code such as `E105` or `W201`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// Error or warning.
    pub category: Category,
    /// Stage and ordinal, printed with three digits.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a code.
    pub fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self.category {
            Category::Error => 'E',
            Category::Warning => 'W',
        };
        write!(f, "{letter}{:03}", self.number)
    }
}
