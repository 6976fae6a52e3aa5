//! Port-list scanner for Verilog and SystemVerilog sources.
//!
//! This is not a Verilog parser. It recovers a flat, ordered list of
//! [`Port`](stitch_ir::Port)s from the text of an ANSI port list (or a bare
//! list of declarations) while tolerating line and block comments,
//! conditional-compilation blocks and macro definitions. Anything inside an
//! `` `ifdef``/`` `ifndef`` block is excluded.

#![warn(missing_docs)]

pub mod error;
pub mod header;
pub mod scanner;
pub mod scope;

pub use error::ScanError;
pub use header::{locate_port_list, PortList};
pub use scanner::{normalize, scan_module_ports, scan_ports, strip_line_comment};
pub use scope::{ScopeKind, ScopeStack};

/// Settings for one scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Name of the scanned source, used in diagnostics.
    pub source: String,
    /// Tokens that abort the scan when found on a consumable line.
    pub forbidden: Vec<String>,
}

impl ScanOptions {
    /// Options for `source` with no forbidden tokens.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            forbidden: Vec::new(),
        }
    }

    /// Replaces the forbidden token list.
    pub fn with_forbidden(mut self, forbidden: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.forbidden = forbidden.into_iter().map(Into::into).collect();
        self
    }
}
