//! End-to-end CLI run with a shell script standing in for khist.sh.
//!
//! Kept in its own test binary so no other test forks while the script is
//! being written, which would make executing it fail with ETXTBSY.

#![cfg(unix)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{fs, os::unix::fs::PermissionsExt, path::Path, process::Command};
use tempfile::TempDir;

const FAKE_KHIST: &str = r#"#!/bin/sh
out=""
for arg in "$@"; do
    case "$arg" in
        khist=*) out="${arg#khist=}" ;;
    esac
done
[ -n "$out" ] || exit 0
printf '#Depth\tRaw_Count\tUnique_Kmers\n1\t900\t900\n2\t60\t30\n3\t30\t10\n4\t80\t20\n5\t25\t5\n' > "$out"
"#;

fn write_executable(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}

#[test]
fn cli_profiles_and_reports_json() {
    let dir = TempDir::new().unwrap();
    let khist = dir.path().join("khist.sh");
    write_executable(&khist, FAKE_KHIST);
    for name in ["sample_405_R1.fastq", "sample_405_R2.fastq"] {
        fs::write(dir.path().join(name), "@r\nACGT\n+\nIIII\n").unwrap();
    }
    let out = dir.path().join("out");

    let output = Command::new(env!("CARGO_BIN_EXE_kmerpeak"))
        .arg("-1")
        .arg(dir.path().join("sample_405_R1.fastq"))
        .arg("-2")
        .arg(dir.path().join("sample_405_R2.fastq"))
        .arg("--khist")
        .arg(&khist)
        .arg("-o")
        .arg(&out)
        .args(["--dpi", "50", "--bounds", "zoomed", "--json"])
        .output()
        .expect("Failed to execute");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["stage"], "rendered");
    assert_eq!(summary["stem"], "sample_405");
    assert_eq!(summary["stats"]["peak_depth"], 4);
    assert!(summary["trimmed"].is_null());

    let plot = out.join("sample_405.khist.png");
    assert!(fs::metadata(&plot).unwrap().len() > 0);
    // PNG signature.
    assert_eq!(&fs::read(&plot).unwrap()[..4], b"\x89PNG");
    assert!(out.join("sample_405.khist.txt").exists());
}
