use chrono::{TimeZone, Utc};
use fintrack_core::db::open_db_in_memory;
use fintrack_core::{
    BackupError, BackupService, MemoryStore, SqliteStore, Store, StoreError, StoreResult,
    BACKUP_DESCRIPTION, BACKUP_FORMAT_VERSION,
};
use serde_json::{json, Value};
use std::cell::Cell;

fn seeded_store() -> MemoryStore {
    MemoryStore::with_entries([
        ("transactions", "[]"),
        ("bankAccounts", r#"[{"id":1,"name":"HDFC Bank"}]"#),
        ("themeMode", "dark"),
    ])
}

#[test]
fn snapshot_decodes_json_and_keeps_raw_strings() {
    let store = seeded_store();
    let snapshot = BackupService::new(&store).snapshot().unwrap();

    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot["transactions"], json!([]));
    assert_eq!(snapshot["bankAccounts"], json!([{"id": 1, "name": "HDFC Bank"}]));
    assert_eq!(snapshot["themeMode"], json!("dark"));
}

#[test]
fn backup_document_wraps_snapshot_with_metadata() {
    let store = seeded_store();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap();
    let backup = BackupService::new(&store).create_backup_at(now).unwrap();

    assert_eq!(backup.metadata.version, "1.0");
    assert_eq!(backup.metadata.version, BACKUP_FORMAT_VERSION);
    assert_eq!(backup.metadata.description, BACKUP_DESCRIPTION);
    assert_eq!(backup.metadata.timestamp, "2024-06-01T12:30:00.000Z");

    let json = serde_json::to_value(&backup).unwrap();
    assert_eq!(json["metadata"]["version"], "1.0");
    assert_eq!(json["data"]["themeMode"], "dark");
}

#[test]
fn restoring_into_empty_store_reproduces_every_key() {
    let source = seeded_store();
    let backup = BackupService::new(&source).create_backup().unwrap();

    let target = MemoryStore::new();
    let service = BackupService::new(&target);
    let report = service.restore_document(&backup).unwrap();

    assert_eq!(report.keys_written.len(), 3);
    assert_eq!(report.version_warning, None);
    assert_eq!(service.snapshot().unwrap(), backup.data);
    assert_eq!(target.get("themeMode").unwrap().as_deref(), Some("dark"));
}

#[test]
fn export_then_import_round_trips_through_sqlite() {
    let source = seeded_store();
    source.set("sidebarCollapsed", "true").unwrap();
    source.set("monthlyLimit", "2500").unwrap();
    let exported = BackupService::new(&source).export_backup_string().unwrap();
    assert!(exported.contains("\n  \"metadata\""));

    let conn = open_db_in_memory().unwrap();
    let target = SqliteStore::new(&conn);
    BackupService::new(&target)
        .import_backup_text(&exported)
        .unwrap();

    for key in source.keys().unwrap() {
        assert_eq!(
            target.get_value(&key).unwrap(),
            source.get_value(&key).unwrap(),
            "key {key}"
        );
    }
}

#[test]
fn version_mismatch_warns_but_restores() {
    let store = MemoryStore::new();
    let service = BackupService::new(&store);
    let backup = json!({
        "metadata": {"version": "2.0", "timestamp": "2030-01-01T00:00:00.000Z", "description": "future"},
        "data": {"x": 1}
    });

    let report = service.restore_from_backup(&backup).unwrap();
    assert_eq!(report.keys_written, vec!["x".to_string()]);
    let warning = report.version_warning.unwrap();
    assert!(warning.contains("2.0"));
    assert_eq!(store.get("x").unwrap().as_deref(), Some("1"));
}

#[test]
fn validation_requires_both_envelope_fields() {
    let service = BackupService::new(MemoryStore::new());
    assert!(!service.validate_backup(&json!({})));
    assert!(!service.validate_backup(&json!({"metadata": {"version": "1.0"}})));
    assert!(!service.validate_backup(&json!({"data": {"x": 1}})));
    assert!(!service.validate_backup(&json!({"metadata": false, "data": {}})));
    assert!(!service.validate_backup(&json!({"metadata": "x", "data": {}})));
    assert!(service.validate_backup(&json!({"metadata": {"version": "1.0"}, "data": {}})));
    assert!(service.validate_backup(&json!({"metadata": {"version": "9.9"}, "data": {}})));
}

#[test]
fn invalid_backup_writes_nothing() {
    let store = MemoryStore::with_entries([("themeMode", "light")]);
    let err = BackupService::new(&store)
        .restore_from_backup(&json!({"data": {"themeMode": "dark"}}))
        .unwrap_err();

    assert!(matches!(err, BackupError::InvalidBackup(_)));
    assert!(err.to_string().starts_with("invalid backup file"));
    assert_eq!(store.get("themeMode").unwrap().as_deref(), Some("light"));
}

#[test]
fn scalar_metadata_is_rejected_before_any_write() {
    let store = MemoryStore::new();
    let service = BackupService::new(&store);
    for metadata in [json!(false), json!(""), json!(0), json!("garbage")] {
        let err = service
            .restore_from_backup(&json!({"metadata": metadata, "data": {"x": 1}}))
            .unwrap_err();
        assert!(matches!(err, BackupError::InvalidBackup(_)), "metadata {metadata}");
    }
    assert!(store.is_empty());
}

#[test]
fn restore_merges_instead_of_replacing() {
    let store = MemoryStore::with_entries([("themeMode", "light"), ("budgets", "[1]")]);
    BackupService::new(&store)
        .restore_from_backup(&json!({
            "metadata": {"version": "1.0"},
            "data": {"themeMode": "dark", "goals": {"house": 100}}
        }))
        .unwrap();

    assert_eq!(store.get("themeMode").unwrap().as_deref(), Some("dark"));
    assert_eq!(store.get("budgets").unwrap().as_deref(), Some("[1]"));
    assert_eq!(store.get("goals").unwrap().as_deref(), Some(r#"{"house":100}"#));
}

/// Store that fails every write after a fixed number of successes.
struct FlakyStore {
    inner: MemoryStore,
    writes_left: Cell<usize>,
}

impl Store for FlakyStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.writes_left.get() == 0 {
            return Err(StoreError::Unavailable("quota exceeded".to_string()));
        }
        self.writes_left.set(self.writes_left.get() - 1);
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        self.inner.keys()
    }

    fn clear(&self) -> StoreResult<()> {
        self.inner.clear()
    }
}

#[test]
fn failed_write_keeps_earlier_restored_keys() {
    let store = FlakyStore {
        inner: MemoryStore::new(),
        writes_left: Cell::new(1),
    };
    let err = BackupService::new(&store)
        .restore_from_backup(&json!({
            "metadata": {"version": "1.0"},
            "data": {"a": "first", "b": "second"}
        }))
        .unwrap_err();

    assert!(matches!(err, BackupError::Store(StoreError::Unavailable(_))));
    assert_eq!(store.get("a").unwrap().as_deref(), Some("first"));
    assert_eq!(store.get("b").unwrap(), None);
}

#[tokio::test]
async fn import_rejects_non_json_and_leaves_store_unmodified() {
    let store = seeded_store();
    let before = store.entries();

    let err = BackupService::new(&store)
        .import_backup(&b"this is not json"[..])
        .await
        .unwrap_err();

    assert!(matches!(err, BackupError::Parse(_)));
    assert!(err.to_string().contains("not valid JSON"));
    assert_eq!(store.entries(), before);
}

#[tokio::test]
async fn export_to_dir_then_import_file_restores_state() {
    let dir = tempfile::tempdir().unwrap();
    let source = seeded_store();
    let path = BackupService::new(&source)
        .export_backup_to_dir(dir.path())
        .unwrap();

    let file_name = path.file_name().unwrap().to_str().unwrap();
    assert!(file_name.starts_with("finance_backup_"));
    assert!(file_name.ends_with(".json"));

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["metadata"]["description"], BACKUP_DESCRIPTION);

    let target = MemoryStore::new();
    let report = BackupService::new(&target)
        .import_backup_file(&path)
        .await
        .unwrap();
    assert_eq!(report.keys_written.len(), 3);
    assert_eq!(target.entries(), source.entries());
}

#[tokio::test]
async fn import_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = BackupService::new(MemoryStore::new())
        .import_backup_file(dir.path().join("missing.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, BackupError::Io(_)));
}

#[test]
fn clear_all_data_erases_every_key() {
    let store = seeded_store();
    BackupService::new(&store).clear_all_data().unwrap();
    assert!(store.is_empty());
}
