use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

fn settings_dir(json: Option<&str>) -> (TempDir, std::path::PathBuf) {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("summitcalc.json");
    if let Some(json) = json {
        fs::write(&path, json).expect("write settings");
    }
    (dir, path)
}

#[test]
fn calc_prints_total_time() {
    let (_dir, config) = settings_dir(None);

    let mut cmd = cargo_bin_cmd!("summitcalc");
    cmd.arg("--config")
        .arg(config)
        .args(["calc", "--red", "3", "--green", "3", "--blue", "1"])
        .assert()
        .success()
        .stdout("Total Time: 34 minutes\n");
}

#[test]
fn calc_with_no_people_is_zero() {
    let (_dir, config) = settings_dir(None);

    let mut cmd = cargo_bin_cmd!("summitcalc");
    cmd.arg("--config")
        .arg(config)
        .args(["calc", "--red", "0", "--green", "0", "--blue", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Time: 0 minutes"));
}

#[test]
fn calc_clamps_negative_and_fractional_input() {
    let (_dir, config) = settings_dir(None);

    let mut cmd = cargo_bin_cmd!("summitcalc");
    cmd.arg("--config")
        .arg(config)
        .args(["calc", "--red", "-3", "--green", "2.9", "--blue", "abc"])
        .assert()
        .success()
        .stdout("Total Time: 31 minutes\n");
}

#[test]
fn strict_mode_rejects_negative_input() {
    let (_dir, config) = settings_dir(None);

    let mut cmd = cargo_bin_cmd!("summitcalc");
    cmd.arg("--config")
        .arg(config)
        .args(["calc", "--strict", "--red", "-3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --red value"));
}

#[test]
fn breakdown_lists_trips_per_team() {
    let (_dir, config) = settings_dir(None);

    let mut cmd = cargo_bin_cmd!("summitcalc");
    cmd.arg("--config")
        .arg(config)
        .args(["calc", "--red", "5", "--green", "2", "--blue", "0", "--breakdown"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Process Details")
                .and(predicate::str::contains("Red Team: 3 trips"))
                .and(predicate::str::contains("Green Team: 1 trips"))
                .and(predicate::str::contains("Blue Team: 0 trips")),
        );
}

#[test]
fn json_output_contains_plan() {
    let (_dir, config) = settings_dir(None);

    let mut cmd = cargo_bin_cmd!("summitcalc");
    let output = cmd
        .arg("--config")
        .arg(config)
        .args(["calc", "--red", "1", "--green", "0", "--blue", "4", "--json"])
        .output()
        .expect("run summitcalc");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["total_time"], 35);
    assert_eq!(value["total_trips"], 3);
    assert_eq!(value["groups"][2]["color"], "blue");
    assert_eq!(value["groups"][2]["trips"], 2);
}

#[test]
fn arabic_output_uses_arabic_summary() {
    let (_dir, config) = settings_dir(None);

    let mut cmd = cargo_bin_cmd!("summitcalc");
    cmd.arg("--config")
        .arg(config)
        .args(["calc", "--red", "4", "--green", "0", "--blue", "0", "--lang", "ar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("الوقت الإجمالي: 33 دقيقة"));
}

#[test]
fn missing_counts_fall_back_to_settings_file() {
    let (_dir, config) = settings_dir(Some(
        r#"{ "version": 1, "language": "en", "groups": { "red": 0, "green": 0, "blue": 5 } }"#,
    ));

    let mut cmd = cargo_bin_cmd!("summitcalc");
    cmd.arg("--config")
        .arg(config)
        .arg("calc")
        .assert()
        .success()
        .stdout("Total Time: 38 minutes\n");
}

#[test]
fn malformed_settings_fail_with_clear_error() {
    let (_dir, config) = settings_dir(Some("{ not-valid-json "));

    let mut cmd = cargo_bin_cmd!("summitcalc");
    cmd.arg("--config")
        .arg(config)
        .args(["calc", "--red", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSON"));
}
