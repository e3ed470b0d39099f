use assert_cmd::Command;

/// The name of the CLI binary
const BINARY: &str = "qry";

/// Check that "qry list" names the built-in scenarios
#[test]
fn list_command() {
    let mut cmd = Command::cargo_bin(BINARY).unwrap();
    let assert = cmd.arg("list").assert();
    let output = assert.success().get_output().stdout.clone();
    let stdout = String::from_utf8_lossy(&output);
    assert!(stdout.contains("trivial-filter"));
    assert!(stdout.contains("indexed-lookup"));
}

/// Check that "qry run trivial-filter" synthesizes the variable itself
#[test]
fn run_command() {
    let mut cmd = Command::cargo_bin(BINARY).unwrap();
    let assert = cmd.args(vec!["run", "trivial-filter"]).assert();
    let output = assert.success().get_output().stdout.clone();
    let stdout = String::from_utf8_lossy(&output);
    assert!(stdout.contains("improved: xs"));
    assert!(stdout.contains("converged."));
}

/// Unknown scenarios are reported as errors
#[test]
fn unknown_scenario_fails() {
    let mut cmd = Command::cargo_bin(BINARY).unwrap();
    cmd.args(vec!["run", "no-such-scenario"]).assert().failure();
}
