//! Integration tests for config warning behavior.
//!
//! These tests verify that the CLI properly warns users when config files have errors.

use std::fs;
use std::process::Command;

/// Test that an invalid config file produces a warning in stderr.
#[test]
fn test_config_warning_on_invalid_toml() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    fs::write(temp_dir.path().join("config.toml"), "invalid toml [[[")
        .expect("Failed to write invalid config");

    // `list` loads config via load_config_with_warning and still succeeds on defaults
    let output = Command::new(env!("CARGO_BIN_EXE_xsm"))
        .env("XSM_CONFIG_DIR", temp_dir.path())
        .arg("list")
        .output()
        .expect("Failed to execute xsm");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        stderr.contains("Warning: Could not load config"),
        "Expected warning in stderr, got: {}",
        stderr
    );
    assert!(
        stderr.contains("Tip: Check"),
        "Expected tip about config files in stderr, got: {}",
        stderr
    );
    assert!(output.status.success());
}

/// Test that a valid config file does not produce warnings.
#[test]
fn test_no_warning_on_valid_config() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    fs::write(
        temp_dir.path().join("config.toml"),
        r#"
[restore]
restoring_interval_ms = 500

[close]
interval_ms = 100
"#,
    )
    .expect("Failed to write valid config");

    let output = Command::new(env!("CARGO_BIN_EXE_xsm"))
        .env("XSM_CONFIG_DIR", temp_dir.path())
        .arg("list")
        .output()
        .expect("Failed to execute xsm");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        !stderr.contains("Warning: Could not load config"),
        "Unexpected config warning in stderr: {}",
        stderr
    );
}

/// `[paths] sessions_dir` relocates where sessions are listed from.
#[test]
fn test_sessions_dir_override() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let elsewhere = temp_dir.path().join("elsewhere");

    fs::write(
        temp_dir.path().join("config.toml"),
        format!("[paths]\nsessions_dir = {:?}\n", elsewhere.display().to_string()),
    )
    .expect("Failed to write config");

    let output = Command::new(env!("CARGO_BIN_EXE_xsm"))
        .env("XSM_CONFIG_DIR", temp_dir.path())
        .arg("list")
        .output()
        .expect("Failed to execute xsm");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(&elsewhere.display().to_string()),
        "Expected relocated sessions dir in output, got: {}",
        stdout
    );
}
