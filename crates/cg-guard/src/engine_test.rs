use super::*;
use cg_core::Checksum;

const CHANGELOG: &str = r#"
changesets:
  - id: "1"
    author: alice
    sql: CREATE TABLE users (id INTEGER);
  - id: "2"
    author: alice
    sql: INSERT INTO settings VALUES ('theme', 'dark');
    always_run: true
  - id: "3"
    author: alice
    sql: CREATE VIEW active_users AS SELECT * FROM users;
    run_on_change: true
    always_run: true
  - id: "4"
    author: alice
    sql: CREATE TABLE audit (id INTEGER);
    contexts: [prod]
  - id: "5"
    author: alice
    sql: CREATE EXTENSION pgcrypto;
    dbms: [postgresql]
"#;

fn changelog() -> ChangeLog {
    ChangeLog::from_yaml_str("db/changelog.yml", CHANGELOG).unwrap()
}

/// History in which every changeset ran with its current body.
fn history_all_ran(changelog: &ChangeLog) -> Vec<RanChangeSet> {
    changelog
        .iter()
        .map(|cs| RanChangeSet::new(cs.id.clone(), cs.author.clone(), &cs.path, cs.checksum()))
        .collect()
}

fn ids(changesets: &[ChangeSet]) -> Vec<&str> {
    changesets.iter().map(|c| c.id.as_str()).collect()
}

struct FailingHistory;

impl HistorySource for FailingHistory {
    fn ran_changesets(&self) -> Result<Vec<RanChangeSet>, EngineError> {
        Err("history table unreadable".into())
    }
}

#[test]
fn empty_history_lists_everything_for_matching_dbms() {
    let engine = ChangeLogEngine::new(changelog(), Vec::new(), "duckdb");
    let unrun = engine
        .list_unrun_changesets(&[], CandidateSelection::Default)
        .unwrap();
    assert_eq!(ids(&unrun), vec!["1", "2", "3", "4"]);
}

#[test]
fn contexts_restrict_candidates() {
    let engine = ChangeLogEngine::new(changelog(), Vec::new(), "duckdb");
    let unrun = engine
        .list_unrun_changesets(&["test".to_string()], CandidateSelection::Default)
        .unwrap();
    assert_eq!(ids(&unrun), vec!["1", "2", "3"]);
}

#[test]
fn default_selection_lists_always_run_changesets() {
    let log = changelog();
    let history = history_all_ran(&log);
    let engine = ChangeLogEngine::new(log, history, "duckdb");
    let unrun = engine
        .list_unrun_changesets(&[], CandidateSelection::Default)
        .unwrap();
    assert_eq!(ids(&unrun), vec!["2", "3"]);
}

#[test]
fn dirty_selection_skips_unaltered_always_run_changesets() {
    let log = changelog();
    let history = history_all_ran(&log);
    let engine = ChangeLogEngine::new(log, history, "duckdb");
    let unrun = engine
        .list_unrun_changesets(&[], CandidateSelection::Dirty)
        .unwrap();
    assert!(unrun.is_empty());
}

#[test]
fn dirty_selection_lists_altered_run_on_change_changesets() {
    let log = changelog();
    let mut history = history_all_ran(&log);
    history[2].last_checksum = Checksum::parse("stale");
    let engine = ChangeLogEngine::new(log, history, "duckdb");
    let unrun = engine
        .list_unrun_changesets(&[], CandidateSelection::Dirty)
        .unwrap();
    assert_eq!(ids(&unrun), vec!["3"]);
}

#[test]
fn ran_changesets_passes_history_through() {
    let log = changelog();
    let history = history_all_ran(&log);
    let engine = ChangeLogEngine::new(log, history.clone(), "duckdb");
    assert_eq!(engine.ran_changesets().unwrap(), history);
}

#[test]
fn history_errors_propagate() {
    let engine = ChangeLogEngine::new(changelog(), FailingHistory, "duckdb");
    let err = engine
        .list_unrun_changesets(&[], CandidateSelection::Default)
        .unwrap_err();
    assert_eq!(err.to_string(), "history table unreadable");
}
