//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::collections::BTreeSet;
use std::path::Path;
use stitch_ir::PortRole;

/// File name looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "stitch.toml";

/// Loads and validates `stitch.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and values are consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.top.source.is_empty() {
        return Err(ConfigError::MissingField("top.source".to_string()));
    }
    if config.shell.source.is_empty() {
        return Err(ConfigError::MissingField("shell.source".to_string()));
    }

    let mut seen = BTreeSet::new();
    for (role, prefix) in config.top.prefixes.pairs() {
        if prefix.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "empty prefix for the {role} role"
            )));
        }
        if !seen.insert(prefix) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate role prefix `{prefix}`"
            )));
        }
    }

    if config.synth.gated_roles.contains(&PortRole::Master) {
        return Err(ConfigError::ValidationError(
            "memory master ports cannot be readiness-gated".to_string(),
        ));
    }
    if config.synth.wire_prefix.is_empty() {
        return Err(ConfigError::MissingField("synth.wire_prefix".to_string()));
    }

    if let Some(controller) = &config.controller {
        if controller.source.is_empty() {
            return Err(ConfigError::MissingField("controller.source".to_string()));
        }
        if controller.channels == Some(0) {
            return Err(ConfigError::ValidationError(
                "controller.channels must be at least 1".to_string(),
            ));
        }
        if controller.training_signal.is_empty() {
            return Err(ConfigError::MissingField(
                "controller.training_signal".to_string(),
            ));
        }
    }
    Ok(())
}
