//! Diagnostic creation, severity management, and rendering.
//!
//! Fatal scan and synthesis errors abort a run, but everything the generator
//! deliberately degrades (tied-off channels, undriven accelerator outputs,
//! defaulted array bounds) is reported as a [`Diagnostic`] collected in a
//! [`DiagnosticSink`] and rendered by a [`DiagnosticRenderer`].

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::{Diagnostic, Location};
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
