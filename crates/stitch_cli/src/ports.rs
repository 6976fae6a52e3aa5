//! `stitch ports`: scan one file and list the recovered ports.

use std::fmt::Write;
use std::path::Path;

use stitch_config::ScanConfig;
use stitch_diagnostics::DiagnosticSink;
use stitch_ir::Port;

use crate::pipeline::{render_diagnostics, resolve_config_file, scan_file};
use crate::{GlobalArgs, PortsArgs, ReportFormat};

/// Runs the `stitch ports` command.
///
/// Forbidden tokens come from the project config when one is found,
/// otherwise from the defaults.
pub fn run(args: &PortsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let forbidden = forbidden_tokens(global);
    let sink = DiagnosticSink::new();
    let ports = scan_file(Path::new(&args.file), args.module.as_deref(), &forbidden, &sink)?;
    render_diagnostics(&sink, args.format, global);
    let Some(ports) = ports else {
        return Ok(1);
    };

    match args.format {
        ReportFormat::Text => print!("{}", port_table(&ports)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&ports)?),
    }
    Ok(0)
}

fn forbidden_tokens(global: &GlobalArgs) -> Vec<String> {
    let from_config = resolve_config_file(global)
        .ok()
        .and_then(|path| stitch_config::load_config_file(&path).ok())
        .map(|config| config.scan.forbidden);
    from_config.unwrap_or_else(|| ScanConfig::default().forbidden)
}

/// Formats ports as an aligned table, one port per line.
pub fn port_table(ports: &[Port]) -> String {
    let name_width = ports
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0)
        .max("name".len());
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_width$}  {:<6}  {:>5}  {:>5}  line",
        "name", "dir", "width", "arity"
    );
    for port in ports {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:<6}  {:>5}  {:>5}  {}",
            port.name,
            port.direction.keyword(),
            port.width,
            port.arity,
            port.line
        );
    }
    out
}
