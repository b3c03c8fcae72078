//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with a throwaway HOME so the settings file
//! never touches the real config directory.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_wodtimer"))
        .args(args)
        .env("HOME", home)
        .env_remove("WODTIMER_ENV")
        .env_remove("WODTIMER_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
    stdout
}

/// The pretty-printed summary is the last thing a text-mode run prints.
fn trailing_summary(stdout: &str) -> serde_json::Value {
    let start = stdout.find("\n{").map(|i| i + 1).unwrap_or(0);
    serde_json::from_str(&stdout[start..]).expect("summary JSON")
}

#[test]
fn test_config_list_writes_defaults() {
    let home = TempDir::new().unwrap();
    let stdout = run_cli_success(home.path(), &["config", "list"]);
    assert!(stdout.contains("[engine]"));
    assert!(stdout.contains("with_pre_roll = true"));
    assert!(home.path().join(".config/wodtimer/config.toml").exists());
}

#[test]
fn test_config_set_then_get() {
    let home = TempDir::new().unwrap();
    run_cli_success(home.path(), &["config", "set", "engine.alert_seconds", "5"]);
    let stdout = run_cli_success(home.path(), &["config", "get", "engine.alert_seconds"]);
    assert_eq!(stdout.trim(), "5");

    run_cli_success(home.path(), &["config", "reset"]);
    let stdout = run_cli_success(home.path(), &["config", "get", "engine.alert_seconds"]);
    assert_eq!(stdout.trim(), "10");
}

#[test]
fn test_config_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "engine.volume", "3"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_plan_chained_amrap() {
    let home = TempDir::new().unwrap();
    let stdout = run_cli_success(
        home.path(),
        &["plan", "amrap", "--duration", "10", "--amrap-round", "5:1"],
    );
    assert!(stdout.contains("AMRAP 2"));
    assert!(stdout.contains("rest 01:00"));
    assert!(stdout.contains("total 15:00"));
}

#[test]
fn test_plan_json() {
    let home = TempDir::new().unwrap();
    let stdout = run_cli_success(home.path(), &["plan", "tabata", "--json"]);
    let plan: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let segments = plan["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0]["spec"]["rounds"], 8);
}

#[test]
fn test_plan_rejects_invalid_values() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["plan", "tabata", "--rounds", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid configuration"), "{stderr}");
}

#[test]
fn test_run_amrap_prints_summary() {
    let home = TempDir::new().unwrap();
    let stdout = run_cli_success(
        home.path(),
        &["run", "amrap", "--duration", "1", "--tick-ms", "0"],
    );
    assert!(stdout.starts_with("AMRAP get ready 00:09"));
    assert!(stdout.contains("AMRAP remaining 00:30"));
    let summary = trailing_summary(&stdout);
    assert_eq!(summary["discipline"], "AMRAP");
    assert_eq!(summary["segments"][0]["elapsed_secs"], 60);
}

#[test]
fn test_run_uncapped_for_time_with_finish_after() {
    let home = TempDir::new().unwrap();
    let stdout = run_cli_success(
        home.path(),
        &[
            "run",
            "for-time",
            "--no-cap",
            "--finish-after",
            "30",
            "--tick-ms",
            "0",
        ],
    );
    let summary = trailing_summary(&stdout);
    assert_eq!(summary["segments"][0]["elapsed_secs"], 30);
}

#[test]
fn test_run_open_ended_requires_finish_after() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["run", "for-time", "--no-cap", "--tick-ms", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("--finish-after"));
}

#[test]
fn test_run_json_event_stream() {
    let home = TempDir::new().unwrap();
    run_cli_success(home.path(), &["config", "set", "engine.with_pre_roll", "false"]);
    let stdout = run_cli_success(
        home.path(),
        &["run", "tabata", "--rounds", "2", "--tick-ms", "0", "--json"],
    );
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("every line is JSON"))
        .collect();
    let of_type = |t: &str| lines.iter().filter(|v| v["type"] == t).count();
    assert_eq!(of_type("SessionStarted"), 1);
    assert_eq!(of_type("TimeUpdate"), 60);
    assert_eq!(of_type("SessionCompleted"), 1);
    assert_eq!(of_type("PreRollStarted"), 0);
    assert!(lines
        .iter()
        .any(|v| v["segments"][0]["elapsed_secs"] == 60 && v.get("type").is_none()));
}

#[test]
fn test_run_without_wake_lock_warns_once_in_plain_text() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(
        home.path(),
        &["run", "amrap", "--duration", "1", "--tick-ms", "0"],
    );
    assert_eq!(code, 0, "{stderr}");
    assert_eq!(stderr.matches("wake-lock unavailable").count(), 1, "{stderr}");
    assert!(!stderr.contains('\x1b'), "no colour codes when stderr is piped");
}
