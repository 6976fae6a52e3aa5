//! Stitch CLI. Generates the interconnect module joining an accelerator,
//! a DDR controller and a platform shell.
//!
//! Provides `stitch generate` for the full scan/synthesize/emit run and
//! `stitch ports` for inspecting the ports recovered from one source file.

#![warn(missing_docs)]

mod generate;
mod pipeline;
mod ports;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

/// Stitch: port scraping and interconnect generation for FPGA shells.
#[derive(Parser, Debug)]
#[command(name = "stitch", version, about = "Stitch interconnect generator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `stitch.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan the configured sources and write the generated module body.
    Generate(GenerateArgs),
    /// Scan one source file and list its ports.
    Ports(PortsArgs),
}

/// Arguments for the `stitch generate` subcommand.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Output path, overriding `project.output`.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `stitch ports` subcommand.
#[derive(Parser, Debug)]
pub struct PortsArgs {
    /// The Verilog or SystemVerilog file to scan.
    pub file: String,

    /// Module whose port list to scan; without it the file is a bare list.
    #[arg(short, long)]
    pub module: Option<String>,

    /// Output format for the port table and diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

impl GlobalArgs {
    /// The log level selected by `--quiet`/`--verbose`.
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    // RUST_LOG overrides the flag-derived level
    let _ = env_logger::Builder::new()
        .filter_level(global.log_level())
        .parse_default_env()
        .try_init();

    let result = match cli.command {
        Command::Generate(ref args) => generate::run(args, &global),
        Command::Ports(ref args) => ports::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
