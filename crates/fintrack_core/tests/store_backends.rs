use fintrack_core::db::migrations::latest_version;
use fintrack_core::db::{open_db, open_db_in_memory, DbError};
use fintrack_core::{MemoryStore, SqliteStore, Store, StoredValue};
use rusqlite::Connection;
use serde_json::json;

fn exercise_store(store: &dyn Store) {
    assert_eq!(store.get("themeMode").unwrap(), None);

    store.set("themeMode", "dark").unwrap();
    store.set("bankAccounts", r#"[{"id":1}]"#).unwrap();
    store.set("themeMode", "light").unwrap();

    assert_eq!(store.get("themeMode").unwrap().as_deref(), Some("light"));
    assert_eq!(store.keys().unwrap(), vec!["bankAccounts", "themeMode"]);
    assert_eq!(
        store.get_value("bankAccounts").unwrap(),
        Some(StoredValue::Json(json!([{"id": 1}])))
    );
    assert_eq!(
        store.get_value("themeMode").unwrap(),
        Some(StoredValue::Raw("light".to_string()))
    );

    store.remove("themeMode").unwrap();
    store.remove("never-written").unwrap();
    assert!(!store.contains("themeMode").unwrap());

    store.clear().unwrap();
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn memory_store_follows_store_contract() {
    exercise_store(&MemoryStore::new());
}

#[test]
fn sqlite_store_follows_store_contract() {
    let conn = open_db_in_memory().unwrap();
    exercise_store(&SqliteStore::new(&conn));
}

#[test]
fn sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        SqliteStore::new(&conn)
            .set("customColors", r##"{"primary":"#000000"}"##)
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteStore::new(&conn);
    assert_eq!(
        store.get("customColors").unwrap().as_deref(),
        Some(r##"{"primary":"#000000"}"##)
    );
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn opening_newer_schema_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion { found, supported } => {
            assert_eq!(found, 42);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
