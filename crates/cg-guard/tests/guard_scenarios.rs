//! End-to-end guard passes over a changelog engine

use cg_core::{ChangeLog, Checksum, ExecType, RanChangeSet};
use cg_guard::{ChangeLogEngine, GuardError, GuardPolicy, MigrationGuard};
use chrono::{TimeZone, Utc};

const CHANGELOG: &str = r#"
logical_path: classpath:db/changelog.yml
changesets:
  - id: "001-users"
    author: alice
    sql: CREATE TABLE users (id INTEGER, name VARCHAR);
  - id: "002-settings-seed"
    author: alice
    sql: INSERT OR REPLACE INTO settings VALUES ('theme', 'dark');
    always_run: true
  - id: "003-active-users"
    author: bob
    sql: CREATE OR REPLACE VIEW active_users AS SELECT * FROM users;
    always_run: true
    run_on_change: true
  - id: "004-prod-audit"
    author: bob
    sql: CREATE TABLE audit (id INTEGER);
    contexts: [prod]
"#;

fn changelog() -> ChangeLog {
    ChangeLog::from_yaml_str("db/changelog.yml", CHANGELOG).unwrap()
}

/// History where the first `count` changesets ran with their current bodies.
fn history(changelog: &ChangeLog, count: usize) -> Vec<RanChangeSet> {
    changelog
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, cs)| RanChangeSet {
            id: cs.id.clone(),
            author: cs.author.clone(),
            path: "db/changelog.yml".to_string(),
            last_checksum: cs.checksum(),
            executed_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            order_executed: i as i64 + 1,
            exec_type: ExecType::Executed,
        })
        .collect()
}

fn pending_count(result: Result<(), GuardError>) -> usize {
    match result {
        Ok(()) => 0,
        Err(GuardError::PendingMigrations(p)) => p.count(),
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[test]
fn fresh_database_reports_every_non_always_run_changeset() {
    let engine = ChangeLogEngine::new(changelog(), Vec::new(), "duckdb");
    let guard = MigrationGuard::default();
    let err = guard.check(&engine).unwrap_err();
    let GuardError::PendingMigrations(pending) = err else {
        panic!("expected pending migrations");
    };
    let ids: Vec<&str> = pending.pending().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["001-users", "004-prod-audit"]);
    assert!(pending
        .report()
        .contains("\t001-users (db/changelog.yml)\n"));
}

#[test]
fn strict_policy_on_fresh_database_also_counts_run_on_change_always_run() {
    let engine = ChangeLogEngine::new(changelog(), Vec::new(), "duckdb");
    let guard = MigrationGuard::new(GuardPolicy::strict());
    assert_eq!(pending_count(guard.check(&engine)), 3);
}

#[test]
fn contexts_limit_what_is_pending() {
    let log = changelog();
    let ran = history(&log, 3);
    let engine = ChangeLogEngine::new(log, ran, "duckdb");

    let dev = MigrationGuard::default().with_contexts(vec!["dev".to_string()]);
    assert!(dev.check(&engine).is_ok());

    let prod = MigrationGuard::default().with_contexts(vec!["prod".to_string()]);
    assert_eq!(pending_count(prod.check(&engine)), 1);
}

#[test]
fn up_to_date_database_passes_under_both_policies() {
    let log = changelog();
    let ran = history(&log, 4);
    let engine = ChangeLogEngine::new(log, ran, "duckdb");
    assert!(MigrationGuard::default().check(&engine).is_ok());
    assert!(MigrationGuard::new(GuardPolicy::strict())
        .check(&engine)
        .is_ok());
}

#[test]
fn altered_view_only_fails_strict_policy() {
    let log = changelog();
    let mut ran = history(&log, 4);
    ran[2].last_checksum = Checksum::parse("checksum-before-edit");
    let engine = ChangeLogEngine::new(log, ran, "duckdb");

    assert!(MigrationGuard::default().check(&engine).is_ok());

    let err = MigrationGuard::new(GuardPolicy::strict())
        .check(&engine)
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("1 changeset(s) has/have to run."));
    assert!(message.contains("\t003-active-users (db/changelog.yml)\n"));
    assert!(message.contains("and have been altered"));
}

#[test]
fn repeated_passes_agree() {
    let log = changelog();
    let ran = history(&log, 1);
    let engine = ChangeLogEngine::new(log, ran, "duckdb");
    let guard = MigrationGuard::new(GuardPolicy::strict());

    let first = guard.check(&engine).unwrap_err().to_string();
    let second = guard.check(&engine).unwrap_err().to_string();
    assert_eq!(first, second);
}
