//! Conformance test helpers for stitch.
//!
//! Provides the reference fixtures (an accelerator top, a three-channel DDR
//! controller and a shell port list) and pipeline functions that run them
//! through scan → synthesize → emit, returning structured results for
//! assertion in integration tests.

#![warn(missing_docs)]

use std::fs;
use std::path::Path;

use stitch_config::{PortSource, ProjectConfig};
use stitch_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use stitch_emit::{render, EmitOptions, ModuleBody};
use stitch_ir::Port;
use stitch_scan::{scan_module_ports, scan_ports, ScanOptions};
use stitch_synth::{synthesize, PortSets};

/// The reference accelerator top-level.
pub const TOP_SOURCE: &str = include_str!("../fixtures/composer_top.v");
/// The reference three-channel DDR controller.
pub const CONTROLLER_SOURCE: &str = include_str!("../fixtures/sh_ddr.sv");
/// The reference shell port list.
pub const SHELL_SOURCE: &str = include_str!("../fixtures/cl_ports.vh");
/// The reference `stitch.toml`.
pub const CONFIG_SOURCE: &str = include_str!("../fixtures/stitch.toml");

/// Result of running the scan → synthesize → emit pipeline.
pub struct PipelineResult {
    /// The synthesized body, `None` if any stage failed.
    pub body: Option<ModuleBody>,
    /// The rendered text, `None` if any stage failed.
    pub text: Option<String>,
    /// All diagnostics emitted during the pipeline.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether any errors were emitted.
    pub has_errors: bool,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl PipelineResult {
    fn finish(body: Option<ModuleBody>, sink: &DiagnosticSink) -> Self {
        let text = body.as_ref().map(|b| render(b, &EmitOptions::default()));
        PipelineResult {
            body,
            text,
            diagnostics: sink.diagnostics(),
            has_errors: sink.has_errors(),
            error_count: sink.error_count(),
            warning_count: sink.warning_count(),
        }
    }

    /// Diagnostics carrying `code`.
    pub fn with_code(&self, code: DiagnosticCode) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.code == code).collect()
    }

    /// The rendered text, panicking with the diagnostics if the run failed.
    pub fn text(&self) -> &str {
        match &self.text {
            Some(text) => text,
            None => panic!("pipeline failed: {:#?}", self.diagnostics),
        }
    }

    /// The right-hand side of the `assign` driving `target`, if any.
    pub fn driver_of(&self, target: &str) -> Option<&str> {
        let prefix = format!("assign {target} = ");
        self.text()
            .lines()
            .find_map(|line| line.strip_prefix(prefix.as_str()))
            .map(|rhs| rhs.trim_end_matches(';'))
    }

    /// How many statements and instance connections drive `net`.
    pub fn drivers_of(&self, net: &str) -> usize {
        let Some(body) = &self.body else {
            return 0;
        };
        let statements = body.statements().filter(|s| s.target() == net).count();
        let connections = body
            .instances
            .iter()
            .flat_map(|i| &i.connections)
            .filter(|c| c.net == net)
            .count();
        statements + connections
    }
}

/// Parses the reference config.
pub fn fixture_config() -> ProjectConfig {
    stitch_config::load_config_from_str(CONFIG_SOURCE).unwrap()
}

/// Parses the reference config after applying `edit` to its TOML table.
pub fn fixture_config_with(edit: impl FnOnce(&mut toml::Table)) -> ProjectConfig {
    let mut table: toml::Table = toml::from_str(CONFIG_SOURCE).unwrap();
    edit(&mut table);
    stitch_config::load_config_from_str(&toml::to_string(&table).unwrap()).unwrap()
}

/// Builds a config from a TOML snippet appended to a minimal project.
pub fn make_config(extra: &str) -> ProjectConfig {
    let toml_str = format!(
        r#"
[project]
name = "conformance_test"

[top]
source = "composer_top.v"
module = "ComposerTop"

[shell]
source = "cl_ports.vh"
{extra}
"#
    );
    stitch_config::load_config_from_str(&toml_str).unwrap()
}

/// Scans `text` as `source` would be scanned by the pipeline.
pub fn scan_text(
    text: &str,
    source: &dyn PortSource,
    config: &ProjectConfig,
    sink: &DiagnosticSink,
) -> Option<Vec<Port>> {
    let opts = ScanOptions::new(source.source()).with_forbidden(config.scan.forbidden.iter());
    let result = match source.module() {
        Some(module) => scan_module_ports(text, module, &opts, sink),
        None => scan_ports(text, &opts, sink),
    };
    match result {
        Ok(ports) => Some(ports),
        Err(err) => {
            sink.emit(Diagnostic::error(err.code(), err.to_string()));
            None
        }
    }
}

/// Runs the full pipeline on in-memory sources.
///
/// `controller` is only scanned when `config` has a `[controller]` table.
pub fn run_pipeline(
    top: &str,
    controller: &str,
    shell: &str,
    config: &ProjectConfig,
) -> PipelineResult {
    let sink = DiagnosticSink::new();
    let body = scan_all(top, controller, shell, config, &sink).and_then(|ports| {
        synthesize(&ports, config, &sink)
            .map_err(|err| sink.emit(Diagnostic::error(err.code(), err.to_string())))
            .ok()
    });
    PipelineResult::finish(body, &sink)
}

/// Runs the full pipeline on the reference fixtures with `config`.
pub fn run_fixtures(config: &ProjectConfig) -> PipelineResult {
    run_pipeline(TOP_SOURCE, CONTROLLER_SOURCE, SHELL_SOURCE, config)
}

/// Runs the full pipeline on a project directory holding `stitch.toml`.
pub fn run_project(dir: &Path) -> PipelineResult {
    let sink = DiagnosticSink::new();
    let config = match stitch_config::load_config(dir) {
        Ok(config) => config,
        Err(err) => {
            sink.emit(Diagnostic::error(err.code(), err.to_string()));
            return PipelineResult::finish(None, &sink);
        }
    };
    let controller = config
        .controller
        .as_ref()
        .map(|c| read_source(dir, c))
        .unwrap_or_default();
    run_pipeline(
        &read_source(dir, &config.top),
        &controller,
        &read_source(dir, &config.shell),
        &config,
    )
}

fn read_source(dir: &Path, source: &dyn PortSource) -> String {
    fs::read_to_string(dir.join(source.source())).unwrap()
}

/// Writes the reference fixtures into `dir`, optionally replacing the config.
pub fn write_fixtures(dir: &Path, config: Option<&str>) {
    fs::write(dir.join("composer_top.v"), TOP_SOURCE).unwrap();
    fs::write(dir.join("sh_ddr.sv"), CONTROLLER_SOURCE).unwrap();
    fs::write(dir.join("cl_ports.vh"), SHELL_SOURCE).unwrap();
    fs::write(
        dir.join(stitch_config::CONFIG_FILE_NAME),
        config.unwrap_or(CONFIG_SOURCE),
    )
    .unwrap();
}

fn scan_all(
    top: &str,
    controller: &str,
    shell: &str,
    config: &ProjectConfig,
    sink: &DiagnosticSink,
) -> Option<PortSets> {
    let top = scan_text(top, &config.top, config, sink)?;
    let controller = match &config.controller {
        Some(cfg) => scan_text(controller, cfg, config, sink)?,
        None => Vec::new(),
    };
    let shell = scan_text(shell, &config.shell, config, sink)?;
    Some(PortSets {
        top,
        controller,
        shell,
    })
}
