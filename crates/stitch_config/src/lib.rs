//! Parsing and validation of `stitch.toml` generation configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`ProjectConfig`] naming the three port-list sources, the instance and
//! interface naming conventions, and the synthesis policies.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
