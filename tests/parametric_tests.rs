//! Spec, measurement and statistics command tests

mod common;

use std::fs;

use common::{
    assert_close, create_test_data_set, create_test_spec, run_json, semitools, setup_test_env,
};
use predicates::prelude::*;

// ============================================================================
// Spec Command Tests
// ============================================================================

#[test]
fn test_spec_add_and_list() {
    let tmp = setup_test_env();

    let short = create_test_spec(&tmp, "VDD Core", "1.0", "2.0");
    assert_eq!(short, "SPEC@1");

    semitools(&tmp)
        .args(["spec", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VDD Core"))
        .stdout(predicate::str::contains("no data"));
}

#[test]
fn test_spec_add_rejects_inverted_limits() {
    let tmp = setup_test_env();

    semitools(&tmp)
        .args([
            "spec", "add", "--name", "Bad", "--test", "t", "--min", "2", "--max", "2",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be less than"));
}

#[test]
fn test_spec_add_accepts_negative_limits() {
    let tmp = setup_test_env();

    create_test_spec(&tmp, "Leakage", "-5e-6", "5e-6");

    let specs = run_json(&tmp, &["spec", "list"]);
    assert_close(&specs[0]["minLimit"], -5e-6);
    assert_close(&specs[0]["maxLimit"], 5e-6);
}

#[test]
fn test_spec_measure_pass_and_fail() {
    let tmp = setup_test_env();
    create_test_spec(&tmp, "VDD", "1.0", "2.0");

    semitools(&tmp)
        .args(["spec", "measure", "SPEC@1", "1.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pass"))
        .stdout(predicate::str::contains("100.00%"));

    let result = run_json(&tmp, &["spec", "measure", "SPEC@1", "0.5"]);
    assert_eq!(result["status"], "fail");
    assert_close(&result["margin"], -100.0);
    assert!(result["measurementId"].is_string());

    // Latest measurement decides the listed status
    let specs = run_json(&tmp, &["spec", "list"]);
    assert_eq!(specs[0]["latestStatus"], "fail");
    assert_close(&specs[0]["latestValue"], 0.5);

    let detail = run_json(&tmp, &["spec", "show", "SPEC@1"]);
    assert_eq!(detail["measurements"].as_array().unwrap().len(), 2);
}

#[test]
fn test_spec_boundaries_pass() {
    let tmp = setup_test_env();
    create_test_spec(&tmp, "VDD", "1.0", "2.0");

    for value in ["1.0", "2.0"] {
        let result = run_json(&tmp, &["spec", "check", "SPEC@1", value]);
        assert_eq!(result["status"], "pass");
        assert_close(&result["margin"], 0.0);
    }
}

#[test]
fn test_spec_check_does_not_record() {
    let tmp = setup_test_env();
    create_test_spec(&tmp, "VDD", "1.0", "2.0");

    let result = run_json(&tmp, &["spec", "check", "SPEC@1", "1.75"]);
    assert_eq!(result["status"], "pass");
    assert_close(&result["margin"], 50.0);
    assert!(result.get("measurementId").is_none());

    let detail = run_json(&tmp, &["spec", "show", "SPEC@1"]);
    assert_eq!(detail["latestStatus"], "noData");
    assert!(detail["measurements"].as_array().unwrap().is_empty());
}

#[test]
fn test_spec_list_status_filter_and_search() {
    let tmp = setup_test_env();
    create_test_spec(&tmp, "VDD", "1.0", "2.0");
    create_test_spec(&tmp, "IDD", "0.0", "0.1");

    semitools(&tmp)
        .args(["spec", "measure", "SPEC@1", "3.0"])
        .assert()
        .success();
    semitools(&tmp)
        .args(["spec", "measure", "SPEC@2", "0.05"])
        .assert()
        .success();

    let failing = run_json(&tmp, &["spec", "list", "--status", "fail"]);
    let failing = failing.as_array().unwrap();
    assert_eq!(failing.len(), 1);
    assert_eq!(failing[0]["name"], "VDD");

    let found = run_json(&tmp, &["spec", "list", "--search", "idd"]);
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["name"], "IDD");
}

#[test]
fn test_spec_delete_and_unknown_id() {
    let tmp = setup_test_env();
    create_test_spec(&tmp, "VDD", "1.0", "2.0");

    semitools(&tmp)
        .args(["spec", "delete", "SPEC@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted spec"));

    semitools(&tmp)
        .args(["spec", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No specs found."));

    semitools(&tmp)
        .args(["spec", "show", "SPEC@9"])
        .assert()
        .failure();
}

// ============================================================================
// Statistics Command Tests
// ============================================================================

#[test]
fn test_stats_show_summary() {
    let tmp = setup_test_env();
    let short = create_test_data_set(&tmp, "Vth lot 7", "1,2,3,4,5");
    assert_eq!(short, "DS@1");

    let detail = run_json(&tmp, &["stats", "show", "DS@1"]);
    assert_eq!(detail["name"], "Vth lot 7");
    let summary = &detail["summary"];
    assert_eq!(summary["count"], 5);
    assert_close(&summary["mean"], 3.0);
    assert_close(&summary["median"], 3.0);
    assert_close(&summary["stdDev"], 2.5_f64.sqrt());
    assert_close(&summary["range"], 4.0);
}

#[test]
fn test_stats_capability() {
    let tmp = setup_test_env();
    create_test_data_set(&tmp, "Vth", "1 2 3 4 5");

    let report = run_json(&tmp, &["stats", "capability", "DS@1", "--lsl", "0", "--usl", "6"]);
    assert_close(&report["cpk"], 3.0 / (3.0 * 2.5_f64.sqrt()));
    assert_close(&report["ppk"], 3.0 / (3.0 * 2.0_f64.sqrt()));
    assert_eq!(report["cpkRating"], "not_capable");

    semitools(&tmp)
        .args(["stats", "capability", "DS@1", "--lsl", "0", "--usl", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cpk"))
        .stdout(predicate::str::contains("0.6325"));
}

#[test]
fn test_stats_capability_rejects_inverted_limits() {
    let tmp = setup_test_env();
    create_test_data_set(&tmp, "Vth", "1,2,3");

    semitools(&tmp)
        .args(["stats", "capability", "DS@1", "--lsl", "5", "--usl", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be less than"));
}

#[test]
fn test_stats_single_value_has_zero_cpk() {
    let tmp = setup_test_env();
    create_test_data_set(&tmp, "One", "4.2");

    let report = run_json(&tmp, &["stats", "capability", "DS@1", "--lsl", "0", "--usl", "10"]);
    assert_close(&report["cpk"], 0.0);
}

#[test]
fn test_stats_add_rejects_bad_values() {
    let tmp = setup_test_env();

    semitools(&tmp)
        .args(["stats", "add", "--name", "Bad", "--values", "1,abc,3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a number"));

    semitools(&tmp)
        .args(["stats", "add", "--name", "Empty"])
        .assert()
        .failure();
}

#[test]
fn test_stats_add_from_csv() {
    let tmp = setup_test_env();
    let csv_path = tmp.path().join("vth.csv");
    fs::write(&csv_path, "die,vth\n1,0.41\n2,0.43\n3,\n4,0.45\n").unwrap();

    semitools(&tmp)
        .args(["stats", "add", "--name", "Vth", "--csv"])
        .arg(&csv_path)
        .args(["--column", "vth"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 values"));

    let sets = run_json(&tmp, &["stats", "list"]);
    let values = sets[0]["values"].as_array().unwrap();
    assert_eq!(values.len(), 3);
    assert_close(&values[2], 0.45);
}

#[test]
fn test_stats_delete() {
    let tmp = setup_test_env();
    create_test_data_set(&tmp, "A", "1,2");
    create_test_data_set(&tmp, "B", "3,4");

    semitools(&tmp)
        .args(["stats", "delete", "DS@1"])
        .assert()
        .success();

    let sets = run_json(&tmp, &["stats", "list"]);
    assert_eq!(sets.as_array().unwrap().len(), 1);
    assert_eq!(sets[0]["name"], "B");
}
