//! Binary-level tests for the study-assist command line.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

/// The binary with no credentials and no inherited configuration.
fn study_assist() -> Command {
    let mut cmd = Command::cargo_bin("study-assist").expect("binary built");
    cmd.env_remove("GROQ_API_KEY")
        .env_remove("STUDY_ASSIST_BASE_URL")
        .env_remove("STUDY_ASSIST_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_eval_prints_value() {
    study_assist()
        .args(["eval", "2+2"])
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn test_eval_leading_minus() {
    study_assist()
        .args(["eval", "-3*2"])
        .assert()
        .success()
        .stdout("-6\n");
}

#[test]
fn test_eval_error_exits_nonzero() {
    study_assist()
        .args(["eval", "2+"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: parse error"));
}

#[test]
fn test_json_error_goes_to_stdout() {
    study_assist()
        .args(["--format", "json", "eval", "2+"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"error\": \"parse\""));
}

#[test]
fn test_press_sequence() {
    study_assist()
        .args(["press", "3", "+", "4", "M+", "Clear", "MR", "="])
        .assert()
        .success()
        .stdout(predicate::str::contains("Result: 7"))
        .stdout(predicate::str::contains("Memory: 3+4"));
}

#[test]
fn test_graph_summary() {
    study_assist()
        .args(["graph", "x^2", "--from", "-2", "--to", "2", "--count", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("f(x) = x^2"))
        .stdout(predicate::str::contains("5 samples"));
}

#[test]
fn test_graph_missing_variable() {
    study_assist()
        .args(["graph", "2+2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing variable"));
}

#[test]
fn test_buttons() {
    study_assist()
        .arg("buttons")
        .assert()
        .success()
        .stdout(predicate::str::contains("graph"))
        .stdout(predicate::str::contains("MR"));
}

#[test]
fn test_calc_session_over_stdin() {
    study_assist()
        .arg("calc")
        .write_stdin("6 * 7 =\nM+ Clear MR\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("warning: remote solver unavailable"))
        .stdout(predicate::str::contains("Result: 42"))
        .stdout(predicate::str::contains("Memory: 6*7"));
}

#[test]
fn test_tip_without_credentials() {
    study_assist()
        .arg("tip")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GROQ_API_KEY"));
}

#[test]
fn test_eval_deep_nesting_fails_cleanly() {
    let expression = format!("{}1{}", "(".repeat(3000), ")".repeat(3000));
    study_assist()
        .args(["eval", &expression])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nested deeper than"));
}

#[test]
fn test_calc_session_survives_deep_nesting() {
    let line = "( ".repeat(3000);
    study_assist()
        .arg("calc")
        .write_stdin(format!("{line}=\nClear 2 + 2 =\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Error in solving math problem"))
        .stdout(predicate::str::contains("Result: 4"));
}

#[test]
fn test_graph_rejects_huge_sample_count() {
    study_assist()
        .args(["graph", "x", "--count", "18446744073709551615"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not plottable"));
}

#[test]
fn test_graph_rejects_overflowing_domain() {
    study_assist()
        .args(["graph", "x", "--from=-1e308", "--to=1e308"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid domain"));
}

#[test]
fn test_rust_log_sets_the_filter() {
    study_assist()
        .env("RUST_LOG", "debug")
        .args(["press", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("button pressed"));
}

#[test]
fn test_default_filter_hides_debug() {
    study_assist()
        .args(["press", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("button pressed").not());

    study_assist()
        .args(["--verbose", "press", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("button pressed"));
}
