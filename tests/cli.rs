//! Command line behaviour of the `layergen` binary.

use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

const VALID: &str = "@Configurable<NetworkConfiguration>\nstruct Client {}\n";
const INVALID: &str = "@Entity\nclass User {\n    let id: UUID\n}\n";

/// Runs the binary inside `dir`, isolated from the user's own config.
fn layergen(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_layergen"))
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run layergen")
}

fn workspace(source: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Source.swift"), source).unwrap();
    dir
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_expand_success() {
    let dir = workspace(VALID);
    let output = layergen(dir.path(), &["expand", "Source.swift"]);

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.starts_with("== Configurable at Source.swift:1:1 ==\n// member\nlet configuration: NetworkConfiguration\n"));
    assert!(text.contains("public init(configuration: NetworkConfiguration) {"));
}

#[test]
fn test_expand_reports_diagnostics() {
    let dir = workspace(INVALID);
    let output = layergen(dir.path(), &["expand", "Source.swift"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout(&output),
        "Source.swift:1:1: error[layergen.notAStruct]: '@Entity' can only be applied to structs.\n  fix-it: Replace 'class' with 'struct'\n\n"
    );
}

#[test]
fn test_expand_json() {
    let dir = workspace(INVALID);
    let output = layergen(dir.path(), &["expand", "--format", "json", "Source.swift"]);

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["file"], "Source.swift");
    let expansion = &report["expansions"][0];
    assert_eq!(expansion["rule"], "Entity");
    assert_eq!(expansion["fragments"], serde_json::json!([]));
    assert_eq!(expansion["diagnostic"]["kind"], "notAStruct");
}

#[test]
fn test_format_from_project_config() {
    let dir = workspace(VALID);
    std::fs::write(dir.path().join(".layergen.toml"), "[output]\nformat = \"json\"\n").unwrap();
    let output = layergen(dir.path(), &["expand", "Source.swift"]);

    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["expansions"][0]["rule"], "Configurable");
}

#[test]
fn test_fix_rewrites_source() {
    let dir = workspace(INVALID);
    let output = layergen(dir.path(), &["expand", "--fix", "Source.swift"]);
    assert_eq!(output.status.code(), Some(1));

    let fixed = std::fs::read_to_string(dir.path().join("Source.swift")).unwrap();
    assert_eq!(fixed, "@Entity\nstruct User {\n    let id: UUID\n}\n");

    let rerun = layergen(dir.path(), &["expand", "Source.swift"]);
    assert_eq!(rerun.status.code(), Some(0));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = layergen(dir.path(), &["expand", "Missing.swift"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Missing.swift"));
}

#[test]
fn test_rules_listing() {
    let dir = tempfile::tempdir().unwrap();
    let output = layergen(dir.path(), &["rules"]);

    assert!(output.status.success());
    let text = stdout(&output);
    let names: Vec<_> = text
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    assert_eq!(
        names,
        vec![
            "@Injectable",
            "@Configurable",
            "@Entity",
            "@ModelConvertible",
            "@UseCase",
            "#MakeDataSource",
            "#MakeRepository",
            "#MakeUseCase",
            "@AppService",
            "@ServiceContainer",
        ]
    );
}
