use assert_cmd::Command;
use predicates::prelude::*;

fn linestat() -> Command {
    Command::cargo_bin("linestat").unwrap()
}

#[test]
fn classify_working_query() {
    linestat()
        .args(["classify", "-k", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Votes: 3 working, 0 not working (k = 3)"))
        .stdout(predicate::str::contains("Predicted status: working"));
}

#[test]
fn classify_not_working_query() {
    linestat()
        .args(["classify", "-k", "3", "--query", "not-working"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Predicted status: not working"));
}

#[test]
fn classify_json_report() {
    let output = linestat()
        .args(["classify", "-k", "5", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["predicted_status"], true);
    assert_eq!(report["k"], 5);
    assert_eq!(report["neighbors"].as_array().unwrap().len(), 5);
    assert_eq!(report["tally"]["working"], 5);
}

#[test]
fn classify_rejects_oversized_k() {
    linestat()
        .args(["classify", "--working", "2", "--not-working", "1", "-k", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds the 3 labeled samples"));
}

#[test]
fn estimate_reports_small_error() {
    let output = linestat()
        .args(["estimate", "--rms", "120", "--angle", "30", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["samples"], 32_000);
    assert!(report["rms_error_pct"].as_f64().unwrap() < 0.5);
    assert!(report["angle_error_deg"].as_f64().unwrap() < 0.5);
}

#[test]
fn estimate_needs_positive_rate() {
    linestat()
        .args(["estimate", "--rms", "1", "--angle", "0", "--sample-rate", "0"])
        .assert()
        .failure();
}

#[test]
fn estimate_rejects_huge_waveform() {
    linestat()
        .args(["estimate", "--rms", "1", "--angle", "0", "--sample-rate", "1e12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("samples requested"));
}
