//! Integration tests for on-disk project layouts.
//!
//! These tests write the reference sources into a temporary directory and
//! run the pipeline from `stitch.toml`, resolving sources relative to it.

use std::fs;
use std::path::Path;

use stitch_conformance::{
    fixture_config, run_fixtures, run_project, write_fixtures, CONFIG_SOURCE, SHELL_SOURCE,
    TOP_SOURCE,
};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helper: temporary project
// ---------------------------------------------------------------------------

fn create_temp_project(config: Option<&str>) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path(), config);
    dir
}

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn disk_project_matches_in_memory_run() {
    let dir = create_temp_project(None);
    let on_disk = run_project(dir.path());
    let in_memory = run_fixtures(&fixture_config());
    assert!(!on_disk.has_errors, "{:#?}", on_disk.diagnostics);
    assert_eq!(on_disk.text(), in_memory.text());
    assert_eq!(on_disk.warning_count, in_memory.warning_count);
}

#[test]
fn disk_project_sources_in_subdirectories() {
    let dir = tempfile::tempdir().unwrap();
    let config = CONFIG_SOURCE
        .replace("\"composer_top.v\"", "\"rtl/composer_top.v\"")
        .replace("\"cl_ports.vh\"", "\"shell/cl_ports.vh\"");
    let config = config
        .lines()
        .take_while(|l| !l.starts_with("[controller]"))
        .chain(config.lines().skip_while(|l| !l.starts_with("[shell]")))
        .map(|l| format!("{l}\n"))
        .collect::<String>();
    write(dir.path(), "stitch.toml", &config);
    write(dir.path(), "rtl/composer_top.v", TOP_SOURCE);
    write(dir.path(), "shell/cl_ports.vh", SHELL_SOURCE);

    let result = run_project(dir.path());
    assert!(!result.has_errors, "{:#?}", result.diagnostics);
    assert_eq!(result.body.as_ref().unwrap().instances.len(), 1);
    assert_eq!(result.driver_of("ddr_sh_stat_ack1"), Some("1'b1"));
}

#[test]
fn disk_project_invalid_config() {
    let dir = create_temp_project(Some("[project\nname = \"broken\"\n"));
    let result = run_project(dir.path());
    assert!(result.body.is_none());
    assert_eq!(result.error_count, 1);
    assert_eq!(result.diagnostics[0].code.to_string(), "E302");
}

#[test]
fn disk_project_missing_required_field() {
    let dir = create_temp_project(Some("[project]\nname = \"\"\n[top]\nsource = \"composer_top.v\"\n[shell]\nsource = \"cl_ports.vh\"\n"));
    let result = run_project(dir.path());
    assert!(result.has_errors);
    assert_eq!(result.diagnostics[0].code.to_string(), "E303");
}

#[test]
fn disk_project_without_config() {
    let dir = tempfile::tempdir().unwrap();
    let result = run_project(dir.path());
    assert!(result.has_errors);
    assert_eq!(result.diagnostics[0].code.to_string(), "E301");
}

#[test]
fn disk_project_scan_failure_stops_pipeline() {
    let dir = create_temp_project(None);
    write(dir.path(), "cl_ports.vh", &format!("`ifdef X\n{SHELL_SOURCE}"));
    let result = run_project(dir.path());
    assert!(result.body.is_none());
    assert_eq!(result.diagnostics[0].code.to_string(), "E102");
}
