//! Tests for the persisted history store
//!
//! Covers the cap, ordering, write-through persistence and recovery from bad storage,
//! against both the in-memory backend and a real redb file.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;
use tempfile::NamedTempFile;

use shortener_client::database::init_db;
use shortener_client::error::StoreError;
use shortener_client::history::{HistoryBackend, HistoryStore, MemoryBackend, RedbBackend, HISTORY_LIMIT};
use shortener_client::model::ShortLinkRecord;

fn record(n: usize) -> ShortLinkRecord {
    ShortLinkRecord {
        original_url: format!("https://example.com/page{}", n),
        short_url: format!("http://sho.rt/code{}", n),
        code: format!("code{}", n),
        expiry_hours: 24,
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(n as i64),
    }
}

/// Parses the raw backend value into records
fn stored(backend: &MemoryBackend) -> Vec<ShortLinkRecord> {
    serde_json::from_str(&backend.contents().expect("nothing persisted")).expect("invalid JSON")
}

#[test]
fn test_empty_backend_loads_empty_history() {
    let store = HistoryStore::load(MemoryBackend::new());
    assert!(store.is_empty());
}

#[test]
fn test_append_prepends_newest_first() {
    let backend = MemoryBackend::new();
    let mut store = HistoryStore::load(backend.clone());

    store.append(record(1)).unwrap();
    store.append(record(2)).unwrap();

    assert_eq!(store.records(), &[record(2), record(1)]);
    assert_eq!(stored(&backend), store.records());
}

#[test]
fn test_append_caps_at_twenty() {
    let backend = MemoryBackend::new();
    let mut store = HistoryStore::load(backend.clone());

    for i in 1..=25 {
        store.append(record(i)).unwrap();
    }

    assert_eq!(store.len(), HISTORY_LIMIT);
    let expected: Vec<_> = (6..=25).rev().map(record).collect();
    assert_eq!(store.records(), expected.as_slice());
    assert_eq!(stored(&backend), expected);
}

#[test]
fn test_duplicate_urls_are_kept() {
    let mut store = HistoryStore::load(MemoryBackend::new());
    store.append(record(1)).unwrap();
    store.append(record(1)).unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn test_remove_at_survives_reload() {
    let backend = MemoryBackend::new();
    let mut store = HistoryStore::load(backend.clone());
    for i in 1..=3 {
        store.append(record(i)).unwrap();
    }

    let removed = store.remove_at(1).unwrap();
    assert_eq!(removed, record(2));

    let reloaded = HistoryStore::load(backend);
    assert_eq!(reloaded.records(), &[record(3), record(1)]);
    assert_eq!(reloaded.records(), store.records());
}

#[test]
fn test_remove_at_out_of_range_changes_nothing() {
    let backend = MemoryBackend::new();
    let mut store = HistoryStore::load(backend.clone());
    store.append(record(1)).unwrap();
    let before = backend.contents();

    let err = store.remove_at(5).unwrap_err();
    assert!(matches!(err, StoreError::IndexOutOfRange { index: 5, len: 1 }));
    assert_eq!(store.len(), 1);
    assert_eq!(backend.contents(), before);
}

#[test]
fn test_clear_persists_empty_array() {
    let backend = MemoryBackend::new();
    let mut store = HistoryStore::load(backend.clone());
    store.append(record(1)).unwrap();
    store.append(record(2)).unwrap();

    assert_eq!(store.clear().unwrap(), 2);
    assert!(store.is_empty());
    assert_eq!(backend.contents().as_deref(), Some("[]"));
    assert!(HistoryStore::load(backend).is_empty());
}

#[test]
fn test_corrupt_storage_starts_empty() {
    for contents in ["not json", "{\"a\":1}", "[{\"shortUrl\":1}]", ""] {
        let store = HistoryStore::load(MemoryBackend::with_contents(contents));
        assert!(store.is_empty(), "{contents:?} should load as empty");
    }
}

#[test]
fn test_corrupt_storage_is_overwritten_on_next_mutation() {
    let backend = MemoryBackend::with_contents("garbage");
    let mut store = HistoryStore::load(backend.clone());
    store.append(record(1)).unwrap();

    assert_eq!(stored(&backend), vec![record(1)]);
}

#[test]
fn test_legacy_field_names_are_accepted() {
    let legacy = r#"[{
        "url": "https://example.com/old",
        "short": "http://localhost:3000/abc",
        "code": "abc",
        "expiry": 48,
        "at": "2025-06-01T10:00:00.000Z"
    }]"#;

    let store = HistoryStore::load(MemoryBackend::with_contents(legacy));
    assert_eq!(store.len(), 1);
    let entry = &store.records()[0];
    assert_eq!(entry.original_url, "https://example.com/old");
    assert_eq!(entry.short_url, "http://localhost:3000/abc");
    assert_eq!(entry.expiry_hours, 48);
}

#[test]
fn test_legacy_numeric_code_is_read_as_text() {
    let legacy = r#"[
        {"url": "https://example.com/n", "short": "http://localhost:3000/42", "code": 42, "expiry": 24, "at": "2025-06-01T10:00:00.000Z"},
        {"url": "https://example.com/s", "short": "http://localhost:3000/x", "code": "x", "expiry": 6, "at": "2025-06-01T09:00:00.000Z"}
    ]"#;

    let store = HistoryStore::load(MemoryBackend::with_contents(legacy));
    assert_eq!(store.len(), 2);
    assert_eq!(store.records()[0].code, "42");
    assert_eq!(store.records()[1].code, "x");
}

#[test]
fn test_persist_rewrites_reloaded_history_in_current_format() {
    let records: Vec<_> = (0..30).map(record).collect();
    let mut oversized = serde_json::to_value(&records).unwrap();
    // Older entries kept a numeric code under the short field names
    oversized[0] = serde_json::json!({
        "url": "https://example.com/page0",
        "short": "http://sho.rt/code0",
        "code": 0,
        "expiry": 24,
        "at": "2026-01-01T00:00:00Z"
    });
    let backend = MemoryBackend::with_contents(&oversized.to_string());

    let store = HistoryStore::load(backend.clone());
    store.persist().unwrap();

    let rewritten = stored(&backend);
    assert_eq!(rewritten.len(), HISTORY_LIMIT);
    assert_eq!(rewritten.as_slice(), store.records());

    let value: Value = serde_json::from_str(&backend.contents().unwrap()).unwrap();
    assert_eq!(value[0]["originalUrl"], "https://example.com/page0");
    assert_eq!(value[0]["code"], "0");
    assert!(value[0].get("url").is_none());
}

#[test]
fn test_persisted_value_is_camel_case_json_array() {
    let backend = MemoryBackend::new();
    let mut store = HistoryStore::load(backend.clone());
    store.append(record(7)).unwrap();

    let value: Value = serde_json::from_str(&backend.contents().unwrap()).unwrap();
    let first = &value.as_array().unwrap()[0];
    assert_eq!(first["originalUrl"], "https://example.com/page7");
    assert_eq!(first["shortUrl"], "http://sho.rt/code7");
    assert_eq!(first["code"], "code7");
    assert_eq!(first["expiryHours"], 24);
    assert!(first["createdAt"].as_str().unwrap().starts_with("2026-01-01T00:07:00"));
}

#[test]
fn test_redb_backend_round_trips_through_reopen() {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_db.path().to_str().unwrap().to_string();

    {
        let db = init_db(&db_path).expect("Failed to initialize test database");
        let mut store = HistoryStore::load(RedbBackend::new(Arc::new(db)));
        for i in 1..=3 {
            store.append(record(i)).unwrap();
        }
        store.remove_at(0).unwrap();
    }

    let db = init_db(&db_path).expect("Failed to reopen test database");
    let store = HistoryStore::load(RedbBackend::new(Arc::new(db)));
    assert_eq!(store.records(), &[record(2), record(1)]);
}

#[test]
fn test_redb_backend_empty_before_first_write() {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let db = init_db(temp_db.path().to_str().unwrap()).expect("Failed to initialize test database");
    let backend = RedbBackend::new(Arc::new(db));

    assert_eq!(backend.read().unwrap(), None);
}
