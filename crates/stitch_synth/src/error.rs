//! Join and mapping errors raised while wiring the three port sets.

use stitch_common::InternalError;
use stitch_diagnostics::{Category, DiagnosticCode};
use stitch_ir::PortRole;

/// A logical memory interface was left without a DDR slot.
pub const DEGRADED_INTERFACE: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 201,
};

/// An accelerator output has no shell counterpart.
pub const UNDRIVEN_OUTPUT: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 202,
};

/// An optional channel part has no counterpart in its slot.
pub const OPTIONAL_PART: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 203,
};

/// A fatal synthesis error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthError {
    /// An accelerator port whose prefix matches no role.
    #[error("port `{port}` does not match any interface role prefix")]
    UnrecognizedRole {
        /// The port name.
        port: String,
    },
    /// More than one interface class for a role wired one-to-one to the shell.
    #[error("expected one {role} interface, found {}", classes.join(", "))]
    MultipleInterfaces {
        /// The role.
        role: PortRole,
        /// The interface classes found, in port order.
        classes: Vec<String>,
    },
    /// A required channel part has no counterpart in its slot.
    #[error("`{port}` ({part}) has no counterpart on {slot}")]
    MissingCounterpart {
        /// The accelerator port.
        port: String,
        /// Its channel part.
        part: String,
        /// The slot it was bound to.
        slot: String,
    },
    /// Two joined ports flow the same way.
    #[error("`{port}` and `{counterpart}` do not have complementary directions")]
    DirectionMismatch {
        /// The accelerator or controller port.
        port: String,
        /// The port it was joined with.
        counterpart: String,
    },
    /// A controller fabric port that cannot be split into channels.
    #[error("`{port}` ([{width}] x {arity}) cannot be split into {channels} channels")]
    ChannelShape {
        /// The controller port.
        port: String,
        /// Its width.
        width: u32,
        /// Its arity.
        arity: u32,
        /// The channel count.
        channels: u32,
    },
    /// The controller has no training-complete signal.
    #[error("memory controller has no `{signal}` port")]
    MissingTrainingSignal {
        /// The configured signal suffix.
        signal: String,
    },
    /// A port that must pass straight through to the shell is missing there.
    #[error("shell has no port `{port}`")]
    MissingShellPin {
        /// The missing port name.
        port: String,
    },
    /// Two joined ports whose array shapes differ.
    #[error("`{port}` (x{arity}) cannot be joined with `{counterpart}` (x{counterpart_arity})")]
    ArityMismatch {
        /// The accelerator port.
        port: String,
        /// Its arity.
        arity: u32,
        /// The port it was joined with.
        counterpart: String,
        /// The counterpart's arity.
        counterpart_arity: u32,
    },
    /// A violated wire-model contract.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl SynthError {
    /// The stable diagnostic code of this error.
    pub fn code(&self) -> DiagnosticCode {
        let number = match self {
            SynthError::UnrecognizedRole { .. } => 201,
            SynthError::MultipleInterfaces { .. } => 202,
            SynthError::MissingCounterpart { .. } => 203,
            SynthError::DirectionMismatch { .. } => 204,
            SynthError::ChannelShape { .. } => 205,
            SynthError::MissingTrainingSignal { .. } => 206,
            SynthError::MissingShellPin { .. } => 207,
            SynthError::ArityMismatch { .. } => 208,
            SynthError::Internal(_) => 901,
        };
        DiagnosticCode::new(Category::Error, number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_interfaces_message() {
        let err = SynthError::MultipleInterfaces {
            role: PortRole::Slave,
            classes: vec!["S00".into(), "S01".into()],
        };
        assert_eq!(err.to_string(), "expected one slave interface, found S00, S01");
        assert_eq!(err.code().to_string(), "E202");
    }

    #[test]
    fn internal_is_transparent() {
        let err = SynthError::from(InternalError::new("`x` already driven 1 of 1 times"));
        assert_eq!(
            err.to_string(),
            "internal generator error: `x` already driven 1 of 1 times"
        );
        assert_eq!(err.code().to_string(), "E901");
    }

    #[test]
    fn warning_codes() {
        assert_eq!(DEGRADED_INTERFACE.to_string(), "W201");
        assert_eq!(UNDRIVEN_OUTPUT.to_string(), "W202");
        assert_eq!(OPTIONAL_PART.to_string(), "W203");
    }
}
