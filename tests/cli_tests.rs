//! Top-level CLI, conversion, reference and test-time tests

mod common;

use std::fs;

use common::{assert_close, run_json, semitools, setup_test_env};
use predicates::prelude::*;

// ============================================================================
// Basic Command Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = setup_test_env();
    semitools(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("yield"))
        .stdout(predicate::str::contains("testtime"))
        .stdout(predicate::str::contains("freq"));
}

#[test]
fn test_version_displays() {
    let tmp = setup_test_env();
    semitools(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("semitools"));
}

#[test]
fn test_completions_bash() {
    let tmp = setup_test_env();
    semitools(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("semitools"));
}

#[test]
fn test_unknown_short_id_fails() {
    let tmp = setup_test_env();
    semitools(&tmp)
        .args(["yield", "show", "YLD@42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_corrupt_blob_is_treated_as_empty() {
    let tmp = setup_test_env();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("parametricSpecs.json"), "{ not json").unwrap();

    semitools(&tmp)
        .args(["spec", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No specs found."));
}

#[test]
fn test_data_dir_flag_overrides_env() {
    let tmp = setup_test_env();
    let other = tmp.path().join("elsewhere");

    semitools(&tmp)
        .arg("--data-dir")
        .arg(&other)
        .args(["bin", "list"])
        .assert()
        .success();

    assert!(other.join("yieldBins.json").exists());
    assert!(!tmp.path().join("data/yieldBins.json").exists());
}

#[test]
fn test_config_file_sets_decimals() {
    let tmp = setup_test_env();
    let config_dir = tmp.path().join("config/semitools");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.yaml"), "decimals: 2\n").unwrap();

    semitools(&tmp)
        .args(["freq", "to-frequency", "10", "--unit", "ns", "--to", "MHz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100.00 MHz"));
}

// ============================================================================
// Period/Frequency Command Tests
// ============================================================================

#[test]
fn test_freq_to_frequency() {
    let tmp = setup_test_env();
    semitools(&tmp)
        .args(["freq", "to-frequency", "10", "--unit", "ns", "--to", "MHz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100.0000 MHz"));
}

#[test]
fn test_freq_to_period() {
    let tmp = setup_test_env();
    semitools(&tmp)
        .args(["freq", "to-period", "1", "--unit", "GHz", "--to", "ns"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.0000 ns"));
}

#[test]
fn test_freq_rejects_zero_and_negative() {
    let tmp = setup_test_env();
    semitools(&tmp)
        .args(["freq", "to-frequency", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("greater than zero"));

    semitools(&tmp)
        .args(["freq", "to-period", "-5", "--unit", "MHz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("greater than zero"));
}

#[test]
fn test_freq_save_list_delete() {
    let tmp = setup_test_env();

    let saved = run_json(&tmp, &["freq", "save", "2", "--unit", "us", "--to", "kHz"]);
    assert_close(&saved["inputValue"], 2.0);
    assert_eq!(saved["inputUnit"], "μs");
    assert_close(&saved["frequencyValue"], 500.0);
    assert_eq!(saved["frequencyUnit"], "kHz");

    let listed = run_json(&tmp, &["freq", "list"]);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    semitools(&tmp)
        .args(["freq", "delete", "PFC@1"])
        .assert()
        .success();

    semitools(&tmp)
        .args(["freq", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved conversions found."));
}

// ============================================================================
// Reference Command Tests
// ============================================================================

#[test]
fn test_ref_search() {
    let tmp = setup_test_env();
    semitools(&tmp)
        .args(["ref", "search", "ddr4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Common Frequency Standards"));
}

#[test]
fn test_ref_search_json_carries_version() {
    let tmp = setup_test_env();
    let result = run_json(&tmp, &["ref", "search", "TEMPERATURE"]);
    assert_eq!(result["version"], 1);
    let tables = result["tables"].as_array().unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0]["title"], "Standard Temperature Ranges");
}

#[test]
fn test_ref_search_no_match() {
    let tmp = setup_test_env();
    semitools(&tmp)
        .args(["ref", "search", "flux capacitor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No reference tables found."));
}

#[test]
fn test_ref_categories() {
    let tmp = setup_test_env();
    let categories = run_json(&tmp, &["ref", "categories"]);
    let categories = categories.as_array().unwrap();
    assert_eq!(categories.len(), 8);
    assert_eq!(categories[0], "Voltage");
}

// ============================================================================
// Test-Time Command Tests
// ============================================================================

#[test]
fn test_testtime_estimate() {
    let tmp = setup_test_env();

    semitools(&tmp)
        .args([
            "testtime", "add", "--name", "Final test", "--step", "contact=2", "--step",
            "functional=3", "--step", "parametric=5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("PROF@1"));

    let estimate = run_json(
        &tmp,
        &["testtime", "estimate", "PROF@1", "--devices", "100", "--slots", "2"],
    );
    assert_close(&estimate["timePerDevice"], 10.0);
    assert_close(&estimate["totalTestTime"], 1000.0);
    assert_close(&estimate["parallelTime"], 500.0);
    assert_close(&estimate["throughput"], 360.0);
    assert_close(&estimate["parallelThroughput"], 720.0);
}

#[test]
fn test_testtime_zero_slots_means_serial() {
    let tmp = setup_test_env();

    semitools(&tmp)
        .args(["testtime", "add", "--name", "P", "--step", "a=4"])
        .assert()
        .success();

    let estimate = run_json(
        &tmp,
        &["testtime", "estimate", "PROF@1", "--devices", "10", "--slots", "0"],
    );
    assert_close(&estimate["parallelTime"], 40.0);
}

#[test]
fn test_testtime_rejects_negative_step() {
    let tmp = setup_test_env();

    semitools(&tmp)
        .args(["testtime", "add", "--name", "P", "--step", "a=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("negative"));
}
