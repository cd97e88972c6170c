use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "ithaca-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_writes_a_json_report() {
    let exe = env!("CARGO_BIN_EXE_ithaca-tester");
    let output_path = temp_path("json");
    let output = Command::new(exe)
        .args([
            "--seeds",
            "1337,42",
            "--iterations",
            "2",
            "--players",
            "2",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{output:?}");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Ithaca Automated Tester"));

    let content = std::fs::read_to_string(&output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    // 2 seeds x 2 iterations x 3 strategies
    assert_eq!(report["games"].as_array().unwrap().len(), 12);
    assert_eq!(report["summary"].as_array().unwrap().len(), 3);
    let _ = std::fs::remove_file(output_path);
}

#[test]
fn cli_dumps_a_restorable_snapshot() {
    let exe = env!("CARGO_BIN_EXE_ithaca-tester");
    let report_path = temp_path("markdown");
    let state_path = temp_path("state");
    let status = Command::new(exe)
        .args([
            "--seeds",
            "0x2a",
            "--iterations",
            "1",
            "--strategies",
            "cautious",
            "--report",
            "markdown",
            "--output",
        ])
        .arg(&report_path)
        .arg("--dump-state")
        .arg(&state_path)
        .status()
        .expect("run cli");
    assert!(status.success());

    let markdown = std::fs::read_to_string(&report_path).expect("read report");
    assert!(markdown.starts_with("# Ithaca Voyage Test Results"));
    assert!(markdown.contains("| Cautious | 1 |"));

    let json = std::fs::read_to_string(&state_path).expect("read snapshot");
    let state = ithaca_game::snapshot::from_json(&json).expect("restorable snapshot");
    assert_eq!(state.players.len(), 3);
    let _ = std::fs::remove_file(report_path);
    let _ = std::fs::remove_file(state_path);
}

#[test]
fn cli_rejects_bad_seed_tokens() {
    let exe = env!("CARGO_BIN_EXE_ithaca-tester");
    let output = Command::new(exe)
        .args(["--seeds", "harbor", "--iterations", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unrecognized seed token"));
}

#[test]
fn cli_rejects_unsupported_tables() {
    let exe = env!("CARGO_BIN_EXE_ithaca-tester");
    let output = Command::new(exe)
        .args(["--players", "6"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--players"));
}
