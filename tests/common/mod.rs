//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Temp directory holding both the data dir and an empty config dir
pub fn setup_test_env() -> TempDir {
    TempDir::new().unwrap()
}

/// Helper to get a semitools command isolated inside `tmp`
pub fn semitools(tmp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("semitools"));
    cmd.env("SEMITOOLS_DATA_DIR", tmp.path().join("data"))
        .env("XDG_CONFIG_HOME", tmp.path().join("config"))
        .env("HOME", tmp.path())
        .env_remove("RUST_LOG");
    cmd
}

/// Run a command with `--format json` and parse its stdout
pub fn run_json(tmp: &TempDir, args: &[&str]) -> Value {
    let output = semitools(tmp)
        .args(args)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "command {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Helper to create a spec and return its short id
pub fn create_test_spec(tmp: &TempDir, name: &str, min: &str, max: &str) -> String {
    let output = semitools(tmp)
        .args([
            "spec", "add", "--name", name, "--test", "ft_param", "--min", min, "--max", max,
            "--unit", "V",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    extract_short_id(&String::from_utf8_lossy(&output.stdout), "SPEC@")
}

/// Helper to create a data set from inline values and return its short id
pub fn create_test_data_set(tmp: &TempDir, name: &str, values: &str) -> String {
    let output = semitools(tmp)
        .args(["stats", "add", "--name", name, "--values", values])
        .output()
        .unwrap();
    assert!(output.status.success());
    extract_short_id(&String::from_utf8_lossy(&output.stdout), "DS@")
}

/// First whitespace-separated word starting with `prefix`
pub fn extract_short_id(stdout: &str, prefix: &str) -> String {
    stdout
        .split_whitespace()
        .find(|w| w.starts_with(prefix))
        .map(|w| w.trim_end_matches(|c: char| !c.is_ascii_digit()).to_string())
        .unwrap_or_default()
}

/// Float comparison for JSON numbers
pub fn assert_close(value: &Value, expected: f64) {
    let actual = value.as_f64().unwrap();
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {}, got {}",
        expected,
        actual
    );
}
