//! Integration tests for the argbind binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const UNIT: &str = r#"
program = "Unit.exe"

[default]
value_description = "filename"
type = "string"

[[parameter]]
name = "test"
type = "boolean"
description = "For testing"

[[parameter]]
name = "outputfile"
type = "string"
value_description = "filename"
description = "results are written into"
default = "out.txt"

[[parameter]]
name = "pages"
type = "integer"
array = true
mandatory = true
value_description = "number"
description = "page numbers"
"#;

fn argbind_cmd() -> Command {
    Command::cargo_bin("argbind").unwrap()
}

fn write_manifest(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("unit.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_help_flag() {
    argbind_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--manifest"))
        .stdout(predicate::str::contains("--usage"));
}

#[test]
fn test_binds_tokens_to_json() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir, UNIT);

    argbind_cmd()
        .arg("--manifest")
        .arg(&manifest)
        .args(["--output", "raw", "--"])
        .args(["report.pdf", "-test", "-pages", "1", "2", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""default":"report.pdf""#))
        .stdout(predicate::str::contains(r#""test":true"#))
        .stdout(predicate::str::contains(r#""pages":[1,2,3]"#))
        .stdout(predicate::str::contains(r#""outputfile":"out.txt""#));
}

#[test]
fn test_usage() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir, UNIT);

    argbind_cmd()
        .arg("--manifest")
        .arg(&manifest)
        .arg("--usage")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "UNIT.EXE filename [-test] [-outputfile filename] -pages number number...\n",
        ))
        .stdout(predicate::str::contains("\t-pages number\tpage numbers\n"));
}

#[test]
fn test_usage_falls_back_to_the_manifest_name() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir, "[[parameter]]\nname = \"v\"\ntype = \"boolean\"\n");

    argbind_cmd()
        .arg("--manifest")
        .arg(&manifest)
        .arg("--usage")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("UNIT [-v]"));
}

#[test]
fn test_unregistered_flag_fails() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir, UNIT);

    argbind_cmd()
        .arg("--manifest")
        .arg(&manifest)
        .args(["--", "-pages", "1", "-nope"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Error: Not registered argument passed 'nope'",
        ));
}

#[test]
fn test_missing_mandatory_fails() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir, UNIT);

    argbind_cmd()
        .arg("--manifest")
        .arg(&manifest)
        .args(["--", "-test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Mandatory parameters pages are missing",
        ));
}

#[test]
fn test_missing_manifest_fails() {
    let dir = TempDir::new().unwrap();

    argbind_cmd()
        .arg("--manifest")
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read manifest"));
}
