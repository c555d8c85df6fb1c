//! Integration tests for the combine pipeline: precedence, backups, failure isolation.

use super::test_utils::Fixture;
use mcpmerge::error::{CombineError, StoreError};
use mcpmerge::store::{Bucket, ConfigStore};
use mcpmerge::{deep_merge, MergeEngine};
use serde_json::{json, Value};
use std::fs;

fn read_value(path: &std::path::Path) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

#[test]
fn test_mcp_servers_from_separate_documents_are_merged() {
    let fx = Fixture::new();
    let store = fx.store();
    fx.activate(
        &store,
        "config1.json",
        r#"{"mcpServers": {"server1": {"command": "test-command1", "args": ["arg1", "arg2"], "env": {"TEST_VAR": "test-value1"}}}}"#,
    );
    fx.activate(
        &store,
        "config2.json",
        r#"{"mcpServers": {"server2": {"command": "test-command2", "args": ["arg3", "arg4"], "env": {"TEST_VAR": "test-value2"}}}}"#,
    );

    let outcome = MergeEngine::new(&store).combine().unwrap();
    let expected = json!({
        "mcpServers": {
            "server1": {"command": "test-command1", "args": ["arg1", "arg2"], "env": {"TEST_VAR": "test-value1"}},
            "server2": {"command": "test-command2", "args": ["arg3", "arg4"], "env": {"TEST_VAR": "test-value2"}}
        }
    });
    assert_eq!(outcome.merged, expected);
    assert_eq!(read_value(&fx.combined_path()), expected);
}

#[test]
fn test_precedence_follows_name_order() {
    let fx = Fixture::new();
    let store = fx.store();
    let a = fx.activate(&store, "a.json", r#"{"x": 1}"#);
    let b = fx.activate(&store, "b.json", r#"{"x": 2}"#);

    let outcome = MergeEngine::new(&store).combine().unwrap();
    assert_eq!(outcome.merged, json!({"x": 2}));
    assert_eq!(outcome.documents, vec![a.clone(), b.clone()]);

    // Renaming flips precedence: "b" now sorts before "c".
    store.disable(&a).unwrap();
    fx.activate(&store, "c.json", r#"{"x": 1}"#);
    let outcome = MergeEngine::new(&store).combine().unwrap();
    assert_eq!(outcome.merged, json!({"x": 1}));
}

#[test]
fn test_combine_equals_explicit_fold() {
    let fx = Fixture::new();
    let store = fx.store();
    let docs = [
        ("10-base.json", json!({"mcpServers": {"s": {"command": "a", "args": ["1"]}}, "theme": "dark"})),
        ("20-env.json", json!({"mcpServers": {"s": {"env": {"K": "V"}}}})),
        ("30-override.json", json!({"mcpServers": {"s": {"args": ["2"]}}, "theme": {"name": "light"}})),
    ];
    for (file, value) in &docs {
        fx.activate(&store, file, &value.to_string());
    }

    let folded = deep_merge(
        &deep_merge(&deep_merge(&json!({}), &docs[0].1), &docs[1].1),
        &docs[2].1,
    );
    let outcome = MergeEngine::new(&store).combine().unwrap();
    assert_eq!(outcome.merged, folded);
    assert_eq!(
        outcome.merged,
        json!({
            "mcpServers": {"s": {"command": "a", "args": ["2"], "env": {"K": "V"}}},
            "theme": {"name": "light"}
        })
    );
}

#[test]
fn test_empty_active_set_writes_empty_object_and_backs_up_prior() {
    let fx = Fixture::new();
    let store = fx.store();
    let only = fx.activate(&store, "only.json", r#"{"k": true}"#);
    let engine = MergeEngine::new(&store);
    engine.combine().unwrap();

    store.disable(&only).unwrap();
    let outcome = engine.combine().unwrap();

    assert_eq!(outcome.merged, json!({}));
    assert_eq!(read_value(&fx.combined_path()), json!({}));
    let backup = outcome.backup.expect("prior combined file should be backed up");
    assert_eq!(read_value(&backup.path), json!({"k": true}));
}

#[test]
fn test_failure_isolation_leaves_prior_state_untouched() {
    let fx = Fixture::new();
    let store = fx.store();
    fx.activate(&store, "a.json", r#"{"x": 1}"#);
    MergeEngine::new(&store).combine().unwrap();
    let prior = fs::read(fx.combined_path()).unwrap();
    let backups_before = fx.backup_files();

    // Corrupt bytes can only reach the active set by bypassing `add`.
    fx.plant(Bucket::Active, "b.json", "{\"x\": ");

    let err = MergeEngine::new(&store).combine().unwrap_err();
    match &err {
        CombineError::Document { name, source } => {
            assert_eq!(name.as_str(), "b");
            assert!(matches!(source, StoreError::Parse { path, .. } if path.ends_with("active/b.json")));
        }
        other => panic!("expected document error, got {other:?}"),
    }
    assert_eq!(fs::read(fx.combined_path()).unwrap(), prior);
    assert_eq!(fx.backup_files(), backups_before);
}

#[test]
fn test_idempotent_output_with_write_once_backups() {
    let fx = Fixture::new();
    let store = fx.store();
    fx.activate(&store, "a.json", r#"{"mcpServers": {"a": {"command": "x"}}}"#);
    let engine = MergeEngine::new(&store);

    engine.combine().unwrap();
    let first = fs::read(fx.combined_path()).unwrap();
    let second_outcome = engine.combine().unwrap();
    let second = fs::read(fx.combined_path()).unwrap();
    let third_outcome = engine.combine().unwrap();
    let third = fs::read(fx.combined_path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(second, third);

    let b2 = second_outcome.backup.unwrap();
    let b3 = third_outcome.backup.unwrap();
    assert_ne!(b2.path, b3.path);
    assert_eq!(fs::read(&b2.path).unwrap(), first);
    assert_eq!(fs::read(&b3.path).unwrap(), second);
    assert_eq!(fx.backup_files().len(), 2);
}

#[test]
fn test_backup_snapshots_content_before_each_call() {
    let fx = Fixture::new();
    let store = fx.store();
    let engine = MergeEngine::new(&store);

    fx.activate(&store, "a.json", r#"{"v": 1}"#);
    engine.combine().unwrap();
    fx.activate(&store, "b.json", r#"{"v": 2}"#);
    let second = engine.combine().unwrap();
    fx.activate(&store, "c.json", r#"{"v": 3}"#);
    let third = engine.combine().unwrap();

    assert_eq!(read_value(&second.backup.unwrap().path), json!({"v": 1}));
    assert_eq!(read_value(&third.backup.unwrap().path), json!({"v": 2}));
    assert_eq!(store.read_combined().unwrap(), Some(json!({"v": 3})));
}

#[test]
fn test_unparsable_combined_file_aborts_before_commit() {
    let fx = Fixture::new();
    let store = fx.store();
    fx.activate(&store, "a.json", r#"{"x": 1}"#);
    fs::write(fx.combined_path(), "garbage").unwrap();

    let err = MergeEngine::new(&store).combine().unwrap_err();
    assert!(matches!(err, CombineError::Store(StoreError::Parse { .. })));
    assert_eq!(fs::read_to_string(fx.combined_path()).unwrap(), "garbage");
    assert!(fx.backup_files().is_empty());
}

#[test]
fn test_large_integers_survive_combine_and_backup() {
    let fx = Fixture::new();
    let store = fx.store();
    fx.activate(&store, "a.json", r#"{"id": 123456789012345678901234567890}"#);
    let engine = MergeEngine::new(&store);

    engine.combine().unwrap();
    let combined = fs::read_to_string(fx.combined_path()).unwrap();
    assert!(combined.contains("\"id\": 123456789012345678901234567890"), "{combined}");

    let backup = engine.combine().unwrap().backup.unwrap();
    assert_eq!(fs::read_to_string(&backup.path).unwrap(), combined);
}

#[test]
fn test_file_names_with_surrounding_whitespace_combine() {
    let fx = Fixture::new();
    let store = fx.store();
    fx.plant(Bucket::Active, " a.json", r#"{"x": 1}"#);

    let outcome = MergeEngine::new(&store).combine().unwrap();
    assert_eq!(outcome.merged, json!({"x": 1}));
    let names: Vec<&str> = outcome.documents.iter().map(|n| n.as_str()).collect();
    assert_eq!(names, vec![" a"]);
}
