#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::process::Command;
use tempfile::TempDir;

fn kmerpeak_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_kmerpeak"))
}

#[test]
fn cli_help_flag() {
    let output = kmerpeak_cmd()
        .arg("--help")
        .output()
        .expect("Failed to execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--forward_reads"));
    assert!(stdout.contains("--reverse_reads"));
    assert!(stdout.contains("--trim"));
}

#[test]
fn cli_version_flag() {
    let output = kmerpeak_cmd()
        .arg("--version")
        .output()
        .expect("Failed to execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_no_args_prints_usage_and_exits_1() {
    let output = kmerpeak_cmd().output().expect("Failed to execute");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"));
}

#[test]
fn cli_missing_reverse_reads_exits_1() {
    let output = kmerpeak_cmd()
        .args(["-1", "sample_405_R1.fastq.gz"])
        .output()
        .expect("Failed to execute");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--reverse_reads"));
}

#[test]
fn cli_zero_threads_exits_1() {
    let output = kmerpeak_cmd()
        .args(["-1", "a.fq", "-2", "b.fq", "-t", "0"])
        .output()
        .expect("Failed to execute");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn cli_invalid_axis_bound_is_usage_error() {
    let output = kmerpeak_cmd()
        .args(["-1", "a.fq", "-2", "b.fq", "--x-max", "-5"])
        .output()
        .expect("Failed to execute");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Problem parsing arguments"));
    // Rejected before the run header is printed.
    assert!(output.stdout.is_empty());
}

#[test]
fn cli_invalid_stem_exits_1() {
    let output = kmerpeak_cmd()
        .args(["-1", "a.fq", "-2", "b.fq", "-s", "../escape"])
        .output()
        .expect("Failed to execute");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Problem parsing arguments"));
}

#[test]
fn cli_bad_config_file_exits_1() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("kmerpeak.json");
    std::fs::write(&config, r#"{"threads": "many"}"#).unwrap();

    let output = kmerpeak_cmd()
        .args(["-1", "a.fq", "-2", "b.fq", "-c"])
        .arg(&config)
        .output()
        .expect("Failed to execute");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid config file"));
}

#[test]
fn cli_missing_khist_exits_1_without_outputs() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");

    let output = kmerpeak_cmd()
        .args(["-1", "a_R1.fq", "-2", "a_R2.fq", "--khist", "kmerpeak-no-such-khist", "-o"])
        .arg(&out)
        .output()
        .expect("Failed to execute");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("kmerpeak-no-such-khist"));
    assert!(stderr.contains("module load bbmap"));
    assert!(!out.exists());
}
