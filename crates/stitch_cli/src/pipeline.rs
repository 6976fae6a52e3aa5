//! Shared pipeline helpers for CLI commands.
//!
//! Project root resolution, config loading, scanning of configured sources
//! and diagnostic rendering.

use std::path::{Path, PathBuf};

use stitch_config::{ConfigError, PortSource, ProjectConfig, CONFIG_FILE_NAME};
use stitch_diagnostics::{
    Diagnostic, DiagnosticRenderer, DiagnosticSink, JsonRenderer, Location, TerminalRenderer,
};
use stitch_ir::Port;
use stitch_scan::{scan_module_ports, scan_ports, ScanError, ScanOptions};

use crate::{GlobalArgs, ReportFormat};

/// Walks up from `start` looking for the nearest directory containing `stitch.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE_NAME} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the config file from global CLI args.
///
/// If `--config` is specified it may name the file or its directory.
/// Otherwise walks up from the current directory looking for `stitch.toml`.
pub fn resolve_config_file(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match &global.config {
        Some(config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_dir() {
                Ok(p.join(CONFIG_FILE_NAME))
            } else {
                Ok(p)
            }
        }
        None => Ok(find_project_root(&std::env::current_dir()?)?.join(CONFIG_FILE_NAME)),
    }
}

/// The directory relative paths in `config_file` are resolved against.
pub fn project_dir(config_file: &Path) -> PathBuf {
    match config_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Loads the config, reporting a load failure to `sink` as a diagnostic.
pub fn load_project(config_file: &Path, sink: &DiagnosticSink) -> Option<ProjectConfig> {
    match stitch_config::load_config_file(config_file) {
        Ok(config) => Some(config),
        Err(err) => {
            sink.emit(config_diagnostic(&err, config_file));
            None
        }
    }
}

fn config_diagnostic(err: &ConfigError, config_file: &Path) -> Diagnostic {
    Diagnostic::error(err.code(), err.to_string())
        .with_note(format!("while loading {}", config_file.display()))
}

/// Converts a fatal scan error into a diagnostic located in `source`.
pub fn scan_diagnostic(err: &ScanError, source: &str) -> Diagnostic {
    let diag = Diagnostic::error(err.code(), err.to_string());
    match err.line() {
        Some(line) => diag.at(Location::new(source, line)),
        None => diag.with_note(format!("while scanning {source}")),
    }
}

/// Scans `path`, from the header of `module` when one is given.
///
/// Scan errors are reported to `sink` and yield `None`; I/O errors propagate.
pub fn scan_file(
    path: &Path,
    module: Option<&str>,
    forbidden: &[String],
    sink: &DiagnosticSink,
) -> Result<Option<Vec<Port>>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let source = path.display().to_string();
    let opts = ScanOptions::new(source.as_str()).with_forbidden(forbidden.iter().cloned());
    let result = match module {
        Some(module) => scan_module_ports(&text, module, &opts, sink),
        None => scan_ports(&text, &opts, sink),
    };
    match result {
        Ok(ports) => {
            log::debug!("{source}: {} ports", ports.len());
            Ok(Some(ports))
        }
        Err(err) => {
            sink.emit(scan_diagnostic(&err, &source));
            Ok(None)
        }
    }
}

/// Scans a configured source, resolving its path against `dir`.
pub fn scan_source(
    dir: &Path,
    source: &dyn PortSource,
    forbidden: &[String],
    sink: &DiagnosticSink,
) -> Result<Option<Vec<Port>>, Box<dyn std::error::Error>> {
    scan_file(&dir.join(source.source()), source.module(), forbidden, sink)
}

/// Writes every diagnostic in `sink` in the requested format.
///
/// Text goes to stderr, JSON lines to stdout.
pub fn render_diagnostics(sink: &DiagnosticSink, format: ReportFormat, global: &GlobalArgs) {
    let diagnostics = sink.take_all();
    match format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in &diagnostics {
                if global.quiet && !diag.severity.is_error() {
                    continue;
                }
                eprint!("{}", renderer.render(diag));
            }
        }
        ReportFormat::Json => {
            for diag in &diagnostics {
                print!("{}", JsonRenderer.render(diag));
            }
        }
    }
}
