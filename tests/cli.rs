//! End-to-end coverage for the `navigator` binary's own argument parsing and
//! config-check behavior. These drive the compiled binary directly rather
//! than calling into library code, so they exercise exactly what a user
//! invokes.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;

fn navigator() -> Command {
    Command::cargo_bin("navigator").expect("navigator binary should build")
}

#[test]
fn run_without_a_task_is_rejected_by_argument_parsing() {
    navigator()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicates::str::contains("--task").or(predicates::str::contains("required")));
}

#[test]
fn config_schema_prints_a_json_schema_document() {
    let output = navigator().args(["config", "schema"]).output().expect("navigator should run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("schema output should be utf8");
    let schema: serde_json::Value = serde_json::from_str(&stdout).expect("schema output should be valid JSON");
    assert!(schema.get("properties").is_some(), "schema should describe AppConfig's top-level fields");
}

#[test]
#[serial]
fn config_check_accepts_the_built_in_defaults_with_no_file_on_disk() {
    navigator().args(["config", "check"]).assert().success().stdout(predicates::str::contains("configuration is valid"));
}

#[test]
#[serial]
fn config_check_rejects_a_zero_max_steps_override() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().expect("temp config file");
    writeln!(file, "agent:\n  max_steps: 0\n").expect("write temp config");

    navigator()
        .args(["--config", file.path().to_str().unwrap(), "config", "check"])
        .assert()
        .failure();
}

#[test]
#[serial]
fn config_check_reports_the_configured_endpoint_count() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().expect("temp config file");
    writeln!(
        file,
        "model:\n  endpoints:\n    - provider: open_ai_compatible\n      api_key: test-key\n      model: gpt-4o-mini\n"
    )
    .expect("write temp config");

    navigator()
        .args(["--config", file.path().to_str().unwrap(), "config", "check"])
        .assert()
        .success()
        .stdout(predicates::str::contains("endpoints configured: 1"));
}
