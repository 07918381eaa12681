//! Basic CLI E2E tests.
//!
//! Tests run the built binary and only cover commands that work offline.

use std::path::Path;
use std::process::Command;

/// Run a CLI command with HOME pointed at `home` and return output.
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_gandalf-connect"))
        .args(args)
        .env("HOME", home)
        .env_remove("GANDALF_CONNECT_ENV")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_data_key() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        home.path(),
        &["data-key", "https://example.com?dataKey=testDataKey"],
    );
    assert_eq!(code, 0, "data-key failed");
    assert_eq!(stdout.trim(), "testDataKey");
}

#[test]
fn test_data_key_missing() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["data-key", "https://example.com"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error: DataKeyNotFound"), "stderr: {stderr}");
}

#[test]
fn test_data_key_invalid_url() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["data-key", "invalid-url"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("InvalidRedirectURL"), "stderr: {stderr}");
}

#[test]
fn test_generate_rejects_malformed_services_json() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(
        home.path(),
        &[
            "generate",
            "--public-key",
            "0xabc",
            "--redirect-url",
            "https://example.com",
            "--services",
            "{not json",
        ],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("invalid services JSON"), "stderr: {stderr}");
}

#[test]
fn test_generate_requires_services() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(
        home.path(),
        &["generate", "--public-key", "0xabc", "--redirect-url", "https://example.com"],
    );
    assert_ne!(code, 0);
}

#[test]
fn test_config_set_get_list_reset() {
    let home = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "time_frame_service"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "amazon");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "request_timeout_secs", "12"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(home.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["request_timeout_secs"], 12);

    let (code, _, _) = run_cli(home.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "request_timeout_secs"]);
    assert_eq!(stdout.trim(), "30");

    assert!(home
        .path()
        .join(".config/gandalf-connect/config.toml")
        .exists());
}

#[test]
fn test_config_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["config", "set", "theme", "dark"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown configuration key"), "stderr: {stderr}");
}
