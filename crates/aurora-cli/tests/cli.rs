//! # Aurora CLI Tests
//!
//! Runs the compiled `aurora` binary against files and stdin.

use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const AURORA_VARS: [&str; 3] = [
    "AURORA_EXPORT_POLICY",
    "AURORA_GLYPHCARDS",
    "AURORA_GLYPHCARD_REDACT",
];

fn aurora() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_aurora"));
    for var in AURORA_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Exports `artifact` through the CLI and returns the sealed document.
fn sealed_document(artifact: &Value) -> Value {
    let mut cmd = aurora();
    cmd.args(["export", "--policy", "off"]);
    let output = run_with_stdin(cmd, &artifact.to_string());
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    stdout_json(&output)["sealed"].clone()
}

fn run_on_file(args: &[&str], path: &Path) -> Output {
    aurora().args(args).arg(path).output().unwrap()
}

// =============================================================================
// EXPORT
// =============================================================================

#[test]
fn test_export_warns_without_manifest() {
    let output = run_with_stdin(
        {
            let mut cmd = aurora();
            cmd.arg("export");
            cmd
        },
        r#"{"test":"data"}"#,
    );

    assert!(output.status.success());
    let outcome = stdout_json(&output);
    assert!(outcome["warnings"][0]
        .as_str()
        .unwrap()
        .contains("Manifest missing"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("warning: Manifest missing"));
    assert_eq!(outcome["sealed"]["seal"]["algo"], "SHA256");
}

#[test]
fn test_export_strict_without_manifest_fails() {
    let mut cmd = aurora();
    cmd.args(["export", "--policy", "strict"]);
    let output = run_with_stdin(cmd, r#"{"test":"data"}"#);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: strict policy requires a manifest"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_export_strict_policy_from_environment() {
    let mut cmd = aurora();
    cmd.arg("export").env("AURORA_EXPORT_POLICY", "strict");
    let output = run_with_stdin(cmd, "[1,2,3]");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_export_with_manifest_file_and_glyphcard() {
    let dir = TempDir::new().unwrap();
    let manifest = json!({
        "version": "1.0.0",
        "anchor": "quantum.model",
        "ethics_protocol": "Picard_Delta_3",
        "srb_tags": ["SRB_Q"],
        "dlp": {"classification": "DLP_L1_OK", "context_tag": "AURORA_EXPORT"},
        "team": "AuroraOS",
        "export_time": "2024-01-01T00:00:00.000Z"
    });
    let manifest_path = write_file(&dir, "manifest.json", &manifest.to_string());
    let artifact_path = write_file(&dir, "artifact.json", r#"{"a":1,"b":2,"c":3}"#);

    let output = aurora()
        .args(["export", "--policy", "strict", "--glyphcard", "--manifest"])
        .arg(&manifest_path)
        .arg(&artifact_path)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let outcome = stdout_json(&output);
    assert_eq!(outcome["warnings"], json!([]));
    assert_eq!(outcome["glyphcard"]["anchor"], "quantum.model");
    assert_eq!(outcome["glyphcard"]["artifact_stats"]["keys"], 3);
    assert_eq!(outcome["glyphcard"]["redacted"], true);
}

// =============================================================================
// GLYPHCARD
// =============================================================================

#[test]
fn test_glyphcard_from_stdin() {
    let sealed = sealed_document(&json!([1, 2, 3, 4]));
    let output = run_with_stdin(
        {
            let mut cmd = aurora();
            cmd.arg("glyphcard");
            cmd
        },
        &sealed.to_string(),
    );

    assert!(output.status.success());
    let card = stdout_json(&output);
    assert_eq!(card["digest"], sealed["seal"]["digest"]);
    assert_eq!(card["artifact_stats"], json!({"byte_length": 9, "type": "array", "keys": 4}));
    assert_eq!(card["redacted"], true);
}

#[test]
fn test_glyphcard_from_file_unredacted_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let sealed = sealed_document(&json!("hello"));
    let path = write_file(&dir, "sealed.json", &sealed.to_string());

    let first = run_on_file(&["glyphcard", "--no-redact", "--title", "Greeting"], &path);
    let second = run_on_file(&["glyphcard", "--no-redact", "--title", "Greeting"], &path);

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
    let card = stdout_json(&first);
    assert_eq!(card["title"], "Greeting");
    assert_eq!(card["redacted"], false);
    assert_eq!(card["artifact_stats"]["type"], "string");
    assert!(!String::from_utf8_lossy(&first.stdout).contains("hello"));
}

#[test]
fn test_glyphcard_rejects_incomplete_document() {
    let mut cmd = aurora();
    cmd.arg("glyphcard");
    let output = run_with_stdin(cmd, r#"{"artifact": 1, "manifest": {}}"#);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing seal"));
}

#[test]
fn test_glyphcard_rejects_invalid_json() {
    let mut cmd = aurora();
    cmd.arg("glyphcard");
    let output = run_with_stdin(cmd, "{not json");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error:"));
}

#[test]
fn test_glyphcard_unreadable_file() {
    let dir = TempDir::new().unwrap();
    let output = run_on_file(&["glyphcard"], &dir.path().join("absent.json"));

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read"));
}

// =============================================================================
// VERIFY
// =============================================================================

#[test]
fn test_verify_valid_and_tampered() {
    let dir = TempDir::new().unwrap();
    let mut sealed = sealed_document(&json!({"reading": 0.93}));

    let path = write_file(&dir, "sealed.json", &sealed.to_string());
    let output = run_on_file(&["verify"], &path);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["valid"], true);

    sealed["artifact"]["reading"] = json!(0.99);
    let path = write_file(&dir, "tampered.json", &sealed.to_string());
    let output = run_on_file(&["verify"], &path);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["valid"], false);
}

#[test]
fn test_verify_rejects_injected_manifest_key() {
    let dir = TempDir::new().unwrap();
    let mut sealed = sealed_document(&json!({"reading": 0.93}));
    sealed["manifest"]["clearance_override"] = json!("PUBLIC");

    let path = write_file(&dir, "injected.json", &sealed.to_string());
    let output = run_on_file(&["verify"], &path);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["valid"], false);
}

#[test]
fn test_verify_rejects_unknown_top_level_key() {
    let mut sealed = sealed_document(&json!([1]));
    sealed["release_to"] = json!("anyone");

    let mut cmd = aurora();
    cmd.arg("verify");
    let output = run_with_stdin(cmd, &sealed.to_string());
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown keys: release_to"));
}

// =============================================================================
// DRIFT
// =============================================================================

#[test]
fn test_drift_scores_unique_observations() {
    let mut cmd = aurora();
    cmd.args(["drift", "--source", "monitor"]);
    let output = run_with_stdin(cmd, "Coherence dip\ncoherence dip\n\nphase slip\n");

    assert!(output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["source"], "monitor");
    assert_eq!(report["anchor"], "aurora.drift");
    assert_eq!(report["observations"].as_array().unwrap().len(), 3);

    let score = report["score"].as_f64().unwrap();
    let expected = (3f64).log10() / 2.0;
    assert!((score - expected).abs() < 1e-9);
}
