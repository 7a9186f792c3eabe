//! CLI integration tests

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

fn wla(args: &[&str], config: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wla"))
        .args(args)
        .env("WLA_CONFIG", config)
        .env_remove("WLA_API_URL")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute command")
}

/// Two weeks of hourly samples: near idle with a spike every 30 hours
fn sporadic_snapshot() -> String {
    let points: Vec<String> = (0..336)
        .map(|i| {
            let value = if i % 30 == 0 { 90.0 } else { 2.0 };
            format!(
                r#"{{"timestamp": "2024-01-{:02}T{:02}:00:00Z", "value": {}}}"#,
                1 + i / 24,
                i % 24,
                value
            )
        })
        .collect();
    let memory: Vec<String> = (0..336)
        .map(|i| {
            format!(
                r#"{{"timestamp": "2024-01-{:02}T{:02}:00:00Z", "value": 25.0}}"#,
                1 + i / 24,
                i % 24
            )
        })
        .collect();
    format!(
        r#"{{"instance_id": "i-sporadic", "instance_class": "t3.medium",
            "cpu_utilization": [{}], "memory_utilization": [{}]}}"#,
        points.join(","),
        memory.join(",")
    )
}

fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = wla(&["--help"], &dir.path().join("config.json"));

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Workload Advisor"), "Should show app name");
    assert!(stdout.contains("classify"), "Should show classify command");
    assert!(stdout.contains("patterns"), "Should show patterns command");
    assert!(stdout.contains("config"), "Should show config command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let dir = tempfile::tempdir().unwrap();
    let output = wla(&["--version"], &dir.path().join("config.json"));

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("wla"), "Should show binary name");
}

#[test]
fn test_classify_local_json() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write_temp(&sporadic_snapshot());
    let output = wla(
        &["--format", "json", "classify", snapshot.path().to_str().unwrap()],
        &dir.path().join("config.json"),
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["classification"]["instance_id"], "i-sporadic");
    assert_eq!(
        body["classification"]["classification"],
        "function_candidate"
    );
    assert_eq!(body["patterns"]["primary_pattern"], "idle_dominant");
}

#[test]
fn test_classify_array_table() {
    let dir = tempfile::tempdir().unwrap();
    let snapshots = format!(
        r#"[{}, {{"instance_id": "i-empty", "instance_class": "m5.large"}}]"#,
        sporadic_snapshot()
    );
    let file = write_temp(&snapshots);
    let output = wla(
        &["classify", file.path().to_str().unwrap()],
        &dir.path().join("config.json"),
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("i-sporadic"));
    assert!(stdout.contains("i-empty"));
    assert!(stdout.contains("keep_as_is"));
    assert!(stdout.contains("Limited data"));
}

#[test]
fn test_patterns_local_json() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write_temp(&sporadic_snapshot());
    let output = wla(
        &["-f", "json", "patterns", snapshot.path().to_str().unwrap()],
        &dir.path().join("config.json"),
    );

    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["primary_pattern"], "idle_dominant");
    assert_eq!(body["analysis_period_days"], 13);
}

#[test]
fn test_config_reflects_file_overrides() {
    let config = write_temp(r#"{"advisor": {"classifier": {"alternative_min_score": 0.45}}}"#);
    let output = wla(&["config"], config.path());

    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["classifier"]["alternative_min_score"], 0.45);
    assert_eq!(body["detector"]["idle_threshold_cpu"], 5.0);
}

#[test]
fn test_default_format_from_config_file() {
    let config = write_temp(r#"{"default_format": "json"}"#);
    let snapshot = write_temp(r#"{"instance_id": "i-1", "instance_class": "m5.large"}"#);
    let output = wla(&["classify", snapshot.path().to_str().unwrap()], config.path());

    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["classification"]["classification"], "keep_as_is");
}

#[test]
fn test_invalid_snapshot_fails() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write_temp(
        r#"{"instance_id": "i-1", "instance_class": "m5.large",
            "cpu_utilization": [
                {"timestamp": "2024-01-01T01:00:00Z", "value": 1.0},
                {"timestamp": "2024-01-01T00:00:00Z", "value": 2.0}
            ]}"#,
    );
    let output = wla(
        &["classify", snapshot.path().to_str().unwrap()],
        &dir.path().join("config.json"),
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not sorted"), "{stderr}");
}

#[test]
fn test_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = wla(
        &["patterns", dir.path().join("nope.json").to_str().unwrap()],
        &dir.path().join("config.json"),
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}
