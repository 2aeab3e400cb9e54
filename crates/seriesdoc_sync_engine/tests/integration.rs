//! Integration tests for the sync engine against the in-memory store.

use proptest::prelude::*;
use seriesdoc_core::{MergeLabel, OutputModes, TimeSeriesPoint};
use seriesdoc_sync_engine::{
    BulkPhase, DeleteFailurePolicy, IndexStatus, MemoryStore, SyncConfig,
    SyncEngine, SyncError,
};
use seriesdoc_sync_protocol::ErrorCause;
use seriesdoc_testkit::prelude::*;
use serde_json::Value;
use std::sync::Arc;

const INDEX: &str = "d_kubernetes";

fn config(modes: OutputModes) -> SyncConfig {
    SyncConfig::new("kubernetes").with_modes(modes)
}

fn wide() -> OutputModes {
    OutputModes::none().with_wide(true)
}

fn types(store: &MemoryStore) -> Vec<String> {
    store
        .documents(INDEX)
        .into_iter()
        .filter_map(|(_, doc)| doc.get("type").and_then(Value::as_str).map(str::to_string))
        .collect()
}

#[test]
fn write_twice_count_once() {
    let store = MemoryStore::new();
    let engine = SyncEngine::new(config(OutputModes::all()), &store);
    let points = vec![
        mixed_point("prs", "2019-01-01 00:00:00"),
        mixed_point("prs", "2019-01-02 00:00:00"),
    ];

    engine.write_points(&points).unwrap();
    let once = store.documents(INDEX);

    let report = engine.write_points(&points).unwrap();
    let twice = store.documents(INDEX);

    assert_eq!(once, twice);
    assert_eq!(report.execution.deleted, once.len());
    assert_eq!(report.execution.not_found, 0);
    assert_eq!(report.index_status, Some(IndexStatus::Existing));
}

#[test]
fn first_write_tolerates_all_not_found() {
    let store = MemoryStore::new();
    let engine = SyncEngine::new(config(wide()), &store);

    let report = engine
        .write_points(&[tag_point("repos", "2019-01-01 00:00:00")])
        .unwrap();
    assert_eq!(report.execution.not_found, 1);
    assert_eq!(report.execution.inserted, 1);
    assert_eq!(store.document_count(INDEX), 1);
}

#[test]
fn wide_and_array_share_one_document() {
    let store = MemoryStore::new();
    let engine = SyncEngine::new(config(wide().with_array(true)), &store);
    engine
        .write_points(&[tag_point("repos", "2019-01-01 00:00:00")])
        .unwrap();

    let docs = store.documents(INDEX);
    assert_eq!(docs.len(), 1);
    let doc = &docs[0].1;
    assert_eq!(doc["type"], "trepos");
    assert_eq!(doc["repo"], "kubernetes/kubernetes");
    assert_eq!(doc["org"], "kubernetes");
    assert_eq!(doc["data"].as_array().unwrap().len(), 2);
}

#[test]
fn flat_fans_out_per_field() {
    let store = MemoryStore::new();
    let engine = SyncEngine::new(config(OutputModes::none().with_flat(true)), &store);
    engine
        .write_points(&[field_point("prs", "2019-01-01 00:00:00")])
        .unwrap();

    let docs = store.documents(INDEX);
    assert_eq!(docs.len(), 3);
    let mut names: Vec<&str> = docs
        .iter()
        .map(|(_, d)| {
            assert_eq!(d["type"], "isprs");
            d["name"].as_str().unwrap()
        })
        .collect();
    names.sort_unstable();
    assert_eq!(names, vec!["opened", "ratio", "top_author"]);
}

#[test]
fn merge_keeps_series_apart() {
    let store = MemoryStore::new();
    let config = config(wide()).with_merge(MergeLabel::new("all").unwrap());
    let engine = SyncEngine::new(config, &store);
    engine
        .write_points(&[
            field_point("prs", "2019-01-01 00:00:00"),
            field_point("issues", "2019-01-01 00:00:00"),
        ])
        .unwrap();

    let docs = store.documents(INDEX);
    assert_eq!(docs.len(), 2);
    let mut series: Vec<&str> = docs
        .iter()
        .map(|(_, d)| {
            assert_eq!(d["type"], "sall");
            d["series"].as_str().unwrap()
        })
        .collect();
    series.sort_unstable();
    assert_eq!(series, vec!["issues", "prs"]);
}

#[test]
fn dotted_names_are_stripped() {
    let store = MemoryStore::new();
    let engine = SyncEngine::new(config(wide()), &store);
    let t = ts("2019-01-01 00:00:00");
    let point = TimeSeriesPoint::new("prs", t, t)
        .with_period("d")
        .with_field("a.b.c", 1i64);
    engine.write_points(&[point]).unwrap();

    let docs = store.documents(INDEX);
    assert_eq!(docs[0].1["abc"], 1);
    assert!(docs[0].1.get("a.b.c").is_none());
}

#[test]
fn invalid_value_sends_nothing() {
    let store = MemoryStore::new();
    let engine = SyncEngine::new(config(OutputModes::all()), &store);
    let err = engine
        .write_points(&[
            mixed_point("prs", "2019-01-01 00:00:00"),
            invalid_point("prs", "2019-01-02 00:00:00"),
        ])
        .unwrap_err();

    assert!(matches!(err, SyncError::Build(_)));
    assert!(!err.is_retryable());
    assert_eq!(store.bulk_calls(), 0);
    assert!(store.index_names().is_empty());
}

#[test]
fn lost_index_race_still_writes() {
    let store = MemoryStore::new();
    let engine = SyncEngine::new(config(wide()), &store);
    engine
        .write_points(&[tag_point("repos", "2019-01-01 00:00:00")])
        .unwrap();

    store.hide_index_once();
    let report = engine
        .write_points(&[tag_point("repos", "2019-01-02 00:00:00")])
        .unwrap();
    assert_eq!(report.index_status, Some(IndexStatus::CreatedConcurrently));
    assert_eq!(store.document_count(INDEX), 2);
}

#[test]
fn unacknowledged_index_is_fatal() {
    let store = MemoryStore::new();
    store.refuse_next_create();
    let engine = SyncEngine::new(config(wide()), &store);
    let err = engine
        .write_points(&[tag_point("repos", "2019-01-01 00:00:00")])
        .unwrap_err();
    assert!(matches!(err, SyncError::IndexNotCreated { .. }));
    assert_eq!(store.bulk_calls(), 0);
}

#[test]
fn unexecuted_actions_are_fatal() {
    let store = MemoryStore::new();
    let engine = SyncEngine::new(config(OutputModes::none().with_flat(true)), &store);
    let points = [field_point("prs", "2019-01-01 00:00:00")];

    store.drop_items(0, 2);
    let err = engine.write_points(&points).unwrap_err();
    assert!(matches!(
        err,
        SyncError::UnexecutedActions {
            phase: BulkPhase::Delete,
            remaining: 2
        }
    ));
    assert_eq!(store.document_count(INDEX), 0);

    store.drop_items(1, 1);
    let err = engine.write_points(&points).unwrap_err();
    assert!(matches!(
        err,
        SyncError::UnexecutedActions {
            phase: BulkPhase::Insert,
            remaining: 1
        }
    ));
    assert_eq!(store.document_count(INDEX), 2);
}

#[test]
fn search_phase_on_fresh_index_skips_deletes() {
    let store = MemoryStore::new();
    store.fail_next_bulk(
        503,
        ErrorCause::new("search_phase_execution_exception", "all shards failed"),
    );
    let engine = SyncEngine::new(config(wide()), &store);
    let report = engine
        .write_points(&[field_point("prs", "2019-01-01 00:00:00")])
        .unwrap();
    assert!(report.execution.delete_skipped);
    assert_eq!(store.document_count(INDEX), 1);
}

#[test]
fn insert_failure_is_fatal_and_recorded() {
    let store = MemoryStore::new();
    let engine = SyncEngine::new(config(OutputModes::none().with_flat(true)), &store);
    let points = [field_point("prs", "2019-01-01 00:00:00")];
    let batches = engine.plan(&points).unwrap();
    let victim = batches.inserts().actions()[1].id().clone();
    store.fail_insert(
        &victim,
        400,
        ErrorCause::new("mapper_parsing_exception", "failed to parse field [ivalue]"),
        1,
    );

    let err = engine.write_points(&points).unwrap_err();
    match &err {
        SyncError::ItemFailures { phase, failures } => {
            assert_eq!(*phase, BulkPhase::Insert);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].position, 1);
            assert_eq!(failures[0].id, victim.as_str());
        }
        other => panic!("unexpected error: {other}"),
    }
    // Items before and after the failed one were applied.
    assert_eq!(store.document_count(INDEX), 2);

    let stats = engine.stats();
    assert_eq!(stats.failures, 1);
    assert!(stats.last_error.unwrap().contains("mapper_parsing_exception"));
}

#[test]
fn delete_conflict_policy() {
    let store = Arc::new(MemoryStore::new());
    let points = [field_point("prs", "2019-01-01 00:00:00")];

    let fatal = SyncEngine::from_arc(config(wide()), Arc::clone(&store));
    fatal.write_points(&points).unwrap();
    let id = fatal.plan(&points).unwrap().deletes().actions()[0].id().clone();
    let conflict = ErrorCause::new("version_conflict_engine_exception", "version conflict");

    store.fail_delete(&id, 409, conflict.clone(), 1);
    let err = fatal.write_points(&points).unwrap_err();
    assert!(matches!(
        err,
        SyncError::ItemFailures {
            phase: BulkPhase::Delete,
            ..
        }
    ));

    let retrying = SyncEngine::from_arc(
        config(wide()).with_delete_policy(DeleteFailurePolicy::RetryOnce),
        Arc::clone(&store),
    );
    store.fail_delete(&id, 409, conflict, 1);
    let report = retrying.write_points(&points).unwrap();
    assert_eq!(report.execution.retried_deletes, 1);
    assert_eq!(store.document_count(INDEX), 1);
}

#[test]
fn daily_series_accumulates() {
    let store = MemoryStore::new();
    let engine = SyncEngine::new(config(wide()), &store);
    engine
        .write_points(&daily_points("prs", "2019-01-01 00:00:00", 10))
        .unwrap();
    engine
        .write_points(&daily_points("prs", "2019-01-05 00:00:00", 10))
        .unwrap();
    assert_eq!(store.document_count(INDEX), 14);
    assert!(types(&store).iter().all(|t| t == "sprs"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn writes_are_idempotent(
        points in prop::collection::vec(point_strategy(), 0..6),
        modes in output_modes_strategy(),
    ) {
        let store = MemoryStore::new();
        let engine = SyncEngine::new(config(modes), &store);

        engine.write_points(&points).unwrap();
        let once = store.documents(INDEX);
        engine.write_points(&points).unwrap();
        prop_assert_eq!(once, store.documents(INDEX));
    }
}
