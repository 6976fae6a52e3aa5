//! Common result and error types for the stitch toolchain.

/// The result type for operations that can only fail through a contract violation.
///
/// `Err` indicates a broken internal invariant (a bug in the generator), not
/// bad input. Input problems are reported through the scan and synthesis
/// error enums of the crates that detect them.
pub type StitchResult<T> = Result<T, InternalError>;

/// An internal invariant breach, such as over-assigning a wire.
///
/// By the time a wire is assigned every width and arity has already been
/// checked against the port model, so reaching one of these means the
/// synthesizer itself is wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal generator error: {message}")]
pub struct InternalError {
    /// Description of the violated contract.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
