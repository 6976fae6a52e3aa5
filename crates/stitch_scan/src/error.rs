//! Structural scan errors.

use crate::scope::ScopeKind;
use stitch_diagnostics::{Category, DiagnosticCode};

/// A fatal error in a scanned port list. Lines are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// A closing or branch marker without a matching opener.
    #[error("line {line}: `{marker}` without a matching opener")]
    UnbalancedScope {
        /// Line of the marker.
        line: usize,
        /// The offending marker.
        marker: String,
    },
    /// A scope still open at the end of input.
    #[error("line {line}: {scope} is never closed")]
    UnterminatedScope {
        /// Line where the scope was opened.
        line: usize,
        /// The open scope.
        scope: ScopeKind,
    },
    /// A declaration without a direction keyword.
    #[error("line {line}: no direction keyword in `{text}`")]
    UnknownDirection {
        /// Line of the declaration.
        line: usize,
        /// The normalized declaration text.
        text: String,
    },
    /// A declaration with more than one direction keyword.
    #[error("line {line}: more than one direction keyword in `{text}`")]
    AmbiguousDirection {
        /// Line of the declaration.
        line: usize,
        /// The normalized declaration text.
        text: String,
    },
    /// A configured forbidden token on a consumable line.
    #[error("line {line}: forbidden token `{token}`")]
    ForbiddenToken {
        /// Line of the token.
        line: usize,
        /// The matched token.
        token: String,
    },
    /// A declaration without an identifier.
    #[error("line {line}: no port name in `{text}`")]
    MissingIdentifier {
        /// Line of the declaration.
        line: usize,
        /// The normalized declaration text.
        text: String,
    },
    /// The requested module header does not occur in the source.
    #[error("module `{module}` not found")]
    ModuleNotFound {
        /// The requested module name.
        module: String,
    },
}

impl ScanError {
    /// The stable diagnostic code of this error.
    pub fn code(&self) -> DiagnosticCode {
        let number = match self {
            ScanError::UnbalancedScope { .. } => 101,
            ScanError::UnterminatedScope { .. } => 102,
            ScanError::UnknownDirection { .. } => 103,
            ScanError::AmbiguousDirection { .. } => 104,
            ScanError::ForbiddenToken { .. } => 105,
            ScanError::MissingIdentifier { .. } => 106,
            ScanError::ModuleNotFound { .. } => 107,
        };
        DiagnosticCode::new(Category::Error, number)
    }

    /// The source line the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ScanError::UnbalancedScope { line, .. }
            | ScanError::UnterminatedScope { line, .. }
            | ScanError::UnknownDirection { line, .. }
            | ScanError::AmbiguousDirection { line, .. }
            | ScanError::ForbiddenToken { line, .. }
            | ScanError::MissingIdentifier { line, .. } => Some(*line),
            ScanError::ModuleNotFound { .. } => None,
        }
    }
}
