//! Error types for configuration loading and validation.

use stitch_diagnostics::{Category, DiagnosticCode};

/// Errors that can occur when loading or validating a `stitch.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// The stable diagnostic code of this error.
    pub fn code(&self) -> DiagnosticCode {
        let number = match self {
            ConfigError::IoError(_) => 301,
            ConfigError::ParseError(_) => 302,
            ConfigError::MissingField(_) => 303,
            ConfigError::ValidationError(_) => 304,
        };
        DiagnosticCode::new(Category::Error, number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_config_range() {
        assert_eq!(ConfigError::ParseError(String::new()).code().to_string(), "E302");
        assert_eq!(
            ConfigError::ValidationError(String::new()).code().to_string(),
            "E304"
        );
    }

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("top.source".to_string());
        assert_eq!(format!("{err}"), "missing required field: top.source");
    }

    #[test]
    fn display_parse_error() {
        let err = ConfigError::ParseError("expected '=' at line 3".to_string());
        assert_eq!(
            format!("{err}"),
            "failed to parse configuration: expected '=' at line 3"
        );
    }

    #[test]
    fn display_validation_error() {
        let err = ConfigError::ValidationError("duplicate role prefix `M`".to_string());
        assert_eq!(
            format!("{err}"),
            "validation error: duplicate role prefix `M`"
        );
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::IoError(io_err);
        assert!(format!("{err}").starts_with("failed to read configuration:"));
    }
}
