//! Binary-level tests for the `cg` CLI

use cg_core::{ChangeLog, RanChangeSet};
use cg_meta::HistoryDb;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const CONFIG: &str = r#"name: shop
changelog: db/changelog.yml
history:
  path: target/history.duckdb
"#;

const CHANGELOG_V1: &str = r#"changesets:
  - id: "001"
    author: alice
    sql: CREATE TABLE invoices (id INTEGER, amount DECIMAL(10, 2));
  - id: "002"
    author: alice
    sql: CREATE TABLE customers (id INTEGER, name VARCHAR);
    contexts: [prod]
  - id: "100"
    author: bob
    sql: CREATE OR REPLACE VIEW open_invoices AS SELECT * FROM invoices;
    always_run: true
    run_on_change: true
"#;

const CHANGELOG_V2: &str = r#"changesets:
  - id: "001"
    author: alice
    sql: CREATE TABLE invoices (id INTEGER, amount DECIMAL(10, 2));
  - id: "002"
    author: alice
    sql: CREATE TABLE customers (id INTEGER, name VARCHAR);
    contexts: [prod]
  - id: "100"
    author: bob
    sql: CREATE OR REPLACE VIEW open_invoices AS SELECT * FROM invoices WHERE amount > 0;
    always_run: true
    run_on_change: true
"#;

fn cg(project: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cg"))
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .output()
        .expect("Failed to run cg")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Write the project files and an empty history store.
fn write_project(root: &Path, changelog: &str) {
    fs::create_dir_all(root.join("db")).unwrap();
    fs::create_dir_all(root.join("target")).unwrap();
    fs::write(root.join("changeguard.yml"), CONFIG).unwrap();
    fs::write(root.join("db/changelog.yml"), changelog).unwrap();
    drop(HistoryDb::create(&root.join("target/history.duckdb")).unwrap());
}

/// Record every changeset currently declared as executed.
fn record_current_changelog(root: &Path) {
    let changelog = ChangeLog::load(root, &root.join("db/changelog.yml")).unwrap();
    let records: Vec<RanChangeSet> = changelog
        .iter()
        .enumerate()
        .map(|(i, cs)| {
            let mut ran = RanChangeSet::new(
                cs.id.clone(),
                cs.author.clone(),
                cs.path.clone(),
                cs.checksum(),
            );
            ran.order_executed = i as i64 + 1;
            ran
        })
        .collect();
    let db = HistoryDb::create(&root.join("target/history.duckdb")).unwrap();
    db.record_all(&records).unwrap();
}

#[test]
fn init_then_check_passes() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_cg"))
        .current_dir(dir.path())
        .args(["init", "shop"])
        .output()
        .expect("Failed to run cg init");
    assert!(
        output.status.success(),
        "cg init failed.\nstdout: {}\nstderr: {}",
        stdout(&output),
        stderr(&output)
    );
    let project = dir.path().join("shop");
    assert!(project.join("changeguard.yml").exists());
    assert!(project.join("db/changelog.yml").exists());

    let output = cg(&project, &["check"]);
    assert!(
        output.status.success(),
        "cg check failed on an empty changelog.\nstdout: {}\nstderr: {}",
        stdout(&output),
        stderr(&output)
    );
    assert!(stdout(&output).contains("No pending changesets."));
}

#[test]
fn init_refuses_existing_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("shop")).unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_cg"))
        .current_dir(dir.path())
        .args(["init", "shop"])
        .output()
        .expect("Failed to run cg init");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("already exists"));
}

#[test]
fn check_fails_on_fresh_history() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), CHANGELOG_V1);

    let output = cg(dir.path(), &["check"]);
    assert_eq!(output.status.code(), Some(2), "stderr: {}", stderr(&output));
    let err = stderr(&output);
    assert!(err.contains("[G001]"), "stderr: {}", err);
    assert!(err.contains("2 changeset(s) has/have to run."), "stderr: {}", err);
    assert!(err.contains("\t001 (db/changelog.yml)\n"));
    assert!(err.contains("\t002 (db/changelog.yml)\n"));
    assert!(!err.contains("\t100 "));
}

#[test]
fn check_contexts_narrow_candidates() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), CHANGELOG_V1);

    let output = cg(dir.path(), &["check", "--contexts", "dev"]);
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("1 changeset(s) has/have to run."), "stderr: {}", err);
    assert!(!err.contains("\t002 "));
}

#[test]
fn check_passes_when_history_is_current() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), CHANGELOG_V1);
    record_current_changelog(dir.path());

    for args in [&["check"][..], &["check", "--strict"][..]] {
        let output = cg(dir.path(), args);
        assert!(
            output.status.success(),
            "cg {:?} failed.\nstdout: {}\nstderr: {}",
            args,
            stdout(&output),
            stderr(&output)
        );
    }
}

#[test]
fn altered_view_fails_only_with_strict() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), CHANGELOG_V1);
    record_current_changelog(dir.path());
    fs::write(dir.path().join("db/changelog.yml"), CHANGELOG_V2).unwrap();

    let output = cg(dir.path(), &["check"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = cg(dir.path(), &["check", "--strict"]);
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("\t100 (db/changelog.yml)\n"), "stderr: {}", err);
    assert!(err.contains("'runOnChange' and have been altered"));
}

#[test]
fn check_json_lists_pending() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), CHANGELOG_V1);

    let output = cg(dir.path(), &["check", "--output", "json"]);
    assert_eq!(output.status.code(), Some(2));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["passed"], false);
    assert_eq!(json["strict"], false);
    assert_eq!(json["pending"].as_array().unwrap().len(), 2);
    assert_eq!(json["pending"][0]["id"], "001");
    assert_eq!(json["pending"][0]["author"], "alice");
}

#[test]
fn status_reports_reasons() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), CHANGELOG_V1);
    record_current_changelog(dir.path());
    fs::write(dir.path().join("db/changelog.yml"), CHANGELOG_V2).unwrap();

    let output = cg(dir.path(), &["status", "-o", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], "100");
    assert_eq!(entries[0]["reason"], "always_run_ignored");
    assert_eq!(entries[0]["pending"], false);

    let output = cg(dir.path(), &["status", "--strict", "-o", "json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json[0]["reason"], "checksum_changed");
    assert_eq!(json[0]["pending"], true);
}

#[test]
fn history_lists_recorded_executions() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), CHANGELOG_V1);

    let output = cg(dir.path(), &["history"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("No recorded executions."));

    record_current_changelog(dir.path());
    let output = cg(dir.path(), &["history", "-o", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["001", "002", "100"]);
    assert_eq!(json[0]["exec_type"], "EXECUTED");
}

#[test]
fn missing_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = cg(dir.path(), &["check"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Failed to load project configuration"), "stderr: {}", err);
    assert!(err.contains("[E001]"), "stderr: {}", err);
}

#[test]
fn missing_history_store_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), CHANGELOG_V1);
    let store = dir.path().join("target/history.duckdb");
    fs::remove_file(&store).unwrap();

    let output = cg(dir.path(), &["check"]);
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));
    let err = stderr(&output);
    assert!(err.contains("Failed to open history store"), "stderr: {}", err);
    assert!(err.contains("[H005]"), "stderr: {}", err);
    assert!(!store.exists(), "check must not create the history store");
}
