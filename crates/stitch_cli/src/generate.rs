//! `stitch generate`: the full scan, synthesize and emit pipeline.
//!
//! 1. Resolve and load `stitch.toml`
//! 2. Truncate the output file
//! 3. Scan the top, controller and shell sources
//! 4. Synthesize the interconnect
//! 5. Render and write the module body
//! 6. Render diagnostics

use std::fs;
use std::path::{Path, PathBuf};

use stitch_config::ProjectConfig;
use stitch_diagnostics::{Diagnostic, DiagnosticSink};
use stitch_emit::{render, EmitOptions};
use stitch_synth::{synthesize, PortSets};

use crate::pipeline::{
    load_project, project_dir, render_diagnostics, resolve_config_file, scan_source,
};
use crate::{GenerateArgs, GlobalArgs, ReportFormat};

/// Runs the `stitch generate` command.
///
/// Returns exit code 0 if the module was written, 1 on any fatal error. A
/// failed run leaves an empty output file behind, never a stale one.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config_file = resolve_config_file(global)?;
    let dir = project_dir(&config_file);
    let sink = DiagnosticSink::new();

    let Some(config) = load_project(&config_file, &sink) else {
        render_diagnostics(&sink, args.format, global);
        return Ok(1);
    };

    let output = output_path(args, &config, &dir);
    truncate(&output)?;

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Stitching {}", config.project.name);
    }

    let text = match build(&config, &dir, &sink)? {
        Some(text) => text,
        None => {
            render_diagnostics(&sink, args.format, global);
            return Ok(1);
        }
    };

    fs::write(&output, &text)
        .map_err(|e| format!("failed to write {}: {e}", output.display()))?;

    let warnings = sink.warning_count();
    render_diagnostics(&sink, args.format, global);
    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Wrote {} ({} bytes, {warnings} warning(s))",
            output.display(),
            text.len()
        );
    }
    Ok(0)
}

/// Scans, synthesizes and renders. Fatal findings are reported to `sink`
/// and yield `None`.
pub fn build(
    config: &ProjectConfig,
    dir: &Path,
    sink: &DiagnosticSink,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let forbidden = &config.scan.forbidden;

    let Some(top) = scan_source(dir, &config.top, forbidden, sink)? else {
        return Ok(None);
    };
    let controller = match &config.controller {
        Some(controller) => match scan_source(dir, controller, forbidden, sink)? {
            Some(ports) => ports,
            None => return Ok(None),
        },
        None => Vec::new(),
    };
    let Some(shell) = scan_source(dir, &config.shell, forbidden, sink)? else {
        return Ok(None);
    };

    let ports = PortSets {
        top,
        controller,
        shell,
    };
    let body = match synthesize(&ports, config, sink) {
        Ok(body) => body,
        Err(err) => {
            sink.emit(Diagnostic::error(err.code(), err.to_string()));
            return Ok(None);
        }
    };

    Ok(Some(render(&body, &emit_options(config))))
}

/// The preamble options for `config`.
pub fn emit_options(config: &ProjectConfig) -> EmitOptions {
    let header = if config.project.header {
        vec![
            format!("Generated by stitch for {}.", config.project.name),
            "Do not edit; rerun `stitch generate` instead.".to_string(),
        ]
    } else {
        Vec::new()
    };
    EmitOptions {
        header,
        includes: config.project.includes.clone(),
    }
}

fn output_path(args: &GenerateArgs, config: &ProjectConfig, dir: &Path) -> PathBuf {
    match &args.output {
        Some(path) => PathBuf::from(path),
        None => dir.join(&config.project.output),
    }
}

fn truncate(output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
        }
    }
    fs::File::create(output).map_err(|e| format!("failed to create {}: {e}", output.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOP: &str = "\
module ComposerTop(
  input clock,
  input reset,
  input S00_AXI_awvalid,
  output S00_AXI_awready
);
endmodule
";

    const SHELL: &str = "\
input sh_ocl_awvalid,
output logic ocl_sh_awready,
output logic [31:0] cl_sh_id0,
output logic ddr_sh_stat_ack0,
";

    const CONFIG: &str = r#"
[project]
name = "tiny"
output = "gen/tiny.sv"
includes = ["cl_defines.vh"]

[top]
source = "top.v"
module = "ComposerTop"

[shell]
source = "shell.vh"
identity = { cl_sh_id0 = "CL_SH_ID0" }
"#;

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("top.v"), TOP).unwrap();
        fs::write(dir.path().join("shell.vh"), SHELL).unwrap();
        fs::write(dir.path().join("stitch.toml"), CONFIG).unwrap();
        dir
    }

    fn global(dir: &Path) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: Some(dir.display().to_string()),
        }
    }

    fn args() -> GenerateArgs {
        GenerateArgs {
            output: None,
            format: ReportFormat::Text,
        }
    }

    #[test]
    fn writes_output_under_project_dir() {
        let dir = project();
        assert_eq!(run(&args(), &global(dir.path())).unwrap(), 0);
        let text = fs::read_to_string(dir.path().join("gen/tiny.sv")).unwrap();
        assert!(text.starts_with("// Generated by stitch for tiny.\n"));
        assert!(text.contains("`include \"cl_defines.vh\"\n"));
        assert!(text.contains("assign stitch_top_0 = sh_ocl_awvalid;\n"));
        assert!(text.contains("assign ocl_sh_awready = stitch_top_1;\n"));
        assert!(text.contains("assign cl_sh_id0 = `CL_SH_ID0;\n"));
        assert!(text.contains("assign ddr_sh_stat_ack0 = 1'b1;\n"));
    }

    #[test]
    fn failed_run_truncates_previous_output() {
        let dir = project();
        let output = dir.path().join("gen/tiny.sv");
        assert_eq!(run(&args(), &global(dir.path())).unwrap(), 0);
        assert!(!fs::read_to_string(&output).unwrap().is_empty());

        fs::write(dir.path().join("shell.vh"), "`ifdef X\ninput a,\n").unwrap();
        assert_eq!(run(&args(), &global(dir.path())).unwrap(), 1);
        assert_eq!(fs::read_to_string(&output).unwrap(), "");
    }

    #[test]
    fn explicit_output_path() {
        let dir = project();
        let output = dir.path().join("elsewhere.sv");
        let args = GenerateArgs {
            output: Some(output.display().to_string()),
            format: ReportFormat::Json,
        };
        assert_eq!(run(&args, &global(dir.path())).unwrap(), 0);
        assert!(output.exists());
        assert!(!dir.path().join("gen/tiny.sv").exists());
    }

    #[test]
    fn header_can_be_disabled() {
        let dir = project();
        let config = stitch_config::load_config_from_str(CONFIG).unwrap();
        assert_eq!(emit_options(&config).header.len(), 2);
        let plain = CONFIG.replace("name = \"tiny\"", "name = \"tiny\"\nheader = false");
        let config = stitch_config::load_config_from_str(&plain).unwrap();
        assert!(emit_options(&config).header.is_empty());
        let sink = DiagnosticSink::new();
        let text = build(&config, dir.path(), &sink).unwrap().unwrap();
        assert!(text.starts_with("`include"));
    }

    #[test]
    fn synthesis_errors_are_reported() {
        let dir = project();
        fs::write(
            dir.path().join("top.v"),
            TOP.replace("S00_AXI_awready", "X00_AXI_awready"),
        )
        .unwrap();
        let config = stitch_config::load_config(dir.path()).unwrap();
        let sink = DiagnosticSink::new();
        assert!(build(&config, dir.path(), &sink).unwrap().is_none());
        assert_eq!(sink.diagnostics()[0].code.to_string(), "E201");
    }
}
