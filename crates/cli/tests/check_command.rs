//! `detach check` as a subprocess

use std::process::Command;

#[test]
fn test_json_output_keeps_stdout_parseable() {
    let output = Command::new(env!("CARGO_BIN_EXE_detach"))
        .args(["check", "--quiet", "--json"])
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(report["metrics"].is_null());
    assert_eq!(report["summary"], "");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Checking setup..."));
    assert!(stderr.contains("Setup complete"));
}

#[test]
fn test_plain_output_goes_to_stdout() {
    let output = Command::new(env!("CARGO_BIN_EXE_detach"))
        .args(["check", "--quiet"])
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Checking setup...");
    assert!(lines[1].starts_with("Setup complete"));
}
