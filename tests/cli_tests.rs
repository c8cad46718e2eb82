//! Command-line boundary tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn reelmix(work: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("reelmix").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("REELMIX_CONFIG")
        .env("REELMIX_WORK_ROOT", work.path().join("work"))
        .env("REELMIX_PUBLISH_DIR", work.path().join("out"));
    cmd
}

fn write_request(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("request.json");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_help_lists_commands() {
    let work = TempDir::new().unwrap();
    reelmix(&work)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compose"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("probe"));
}

#[test]
fn test_empty_timeline_is_bad_request() {
    let work = TempDir::new().unwrap();
    let request = write_request(&work, r#"{"timeline": []}"#);

    reelmix(&work)
        .args(["compose", "--request"])
        .arg(&request)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""status": "error""#))
        .stdout(predicate::str::contains(r#""kind": "bad_request""#))
        .stdout(predicate::str::contains("timeline cannot be empty"));
}

#[test]
fn test_missing_source_ref_names_entry() {
    let work = TempDir::new().unwrap();
    let request = write_request(
        &work,
        r#"{"timeline": [
            {"sourceRef": "a.mp4", "startTime": 0, "duration": 1},
            {"startTime": 1, "duration": 1}
        ]}"#,
    );

    reelmix(&work)
        .args(["plan", "--request"])
        .arg(&request)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("bad_request"))
        .stdout(predicate::str::contains("entry 1"));
}

#[test]
fn test_unknown_source_is_resolution_error() {
    let work = TempDir::new().unwrap();
    let sources = TempDir::new().unwrap();
    let request = write_request(
        &work,
        r#"{"timeline": [{"sourceRef": "videos/nowhere.mp4", "startTime": 0, "duration": 2}]}"#,
    );

    reelmix(&work)
        .args(["compose", "--request"])
        .arg(&request)
        .arg("--sources")
        .arg(sources.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("resolution_error"))
        .stdout(predicate::str::contains("videos/nowhere.mp4"));
}

#[test]
fn test_malformed_json_is_bad_request() {
    let work = TempDir::new().unwrap();
    let request = write_request(&work, "{not json");

    reelmix(&work)
        .args(["compose", "--request"])
        .arg(&request)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("bad_request"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let work = TempDir::new().unwrap();
    let config = work.path().join("reelmix.toml");
    std::fs::write(&config, "[encode]\ncrf = 99\n").unwrap();
    let request = write_request(&work, r#"{"timeline": []}"#);

    reelmix(&work)
        .arg("--config")
        .arg(&config)
        .args(["compose", "--request"])
        .arg(&request)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("config_error"));
}

#[test]
fn test_probe_missing_file() {
    let work = TempDir::new().unwrap();

    reelmix(&work)
        .args(["probe", "--input"])
        .arg(work.path().join("missing.mp4"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("fs_error"));
}
