//! Persisted key-value store contract shared by every core service.
//!
//! # Responsibility
//! - Define the `Store` capability (get/set/remove/enumerate/clear).
//! - Own the single JSON-or-raw encode/decode rule (`StoredValue`).
//!
//! # Invariants
//! - Keys are flat strings; any writer may overwrite any key.
//! - `keys()` enumerates in a stable order for identical contents.
//! - Decoding never fails: text that is not JSON is kept as `Raw`.

use crate::db::DbError;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod keys;
mod memory_store;
mod sqlite_store;

pub use keys::StorageKey;
pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a store backend.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// A stored text, tagged by whether it parsed as JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Json(Value),
    Raw(String),
}

impl StoredValue {
    /// Parses stored text as JSON, keeping it verbatim when that fails.
    pub fn decode(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Raw(text.to_string()),
        }
    }

    /// Text form written to the store.
    pub fn encode(&self) -> String {
        match self {
            Self::Json(value) => value.to_string(),
            Self::Raw(text) => text.clone(),
        }
    }

    /// JSON view used in snapshots; raw text becomes a JSON string.
    pub fn into_json(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Raw(text) => Value::String(text),
        }
    }

    /// Maps a value read from a backup onto what gets written back.
    ///
    /// Strings are written verbatim. Numbers and booleans are written as
    /// their literal text. Objects, arrays and `null` are JSON-encoded.
    pub fn from_restored(value: &Value) -> Self {
        match value {
            Value::String(text) => Self::Raw(text.clone()),
            Value::Number(number) => Self::Raw(number.to_string()),
            Value::Bool(flag) => Self::Raw(flag.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => Self::Json(value.clone()),
        }
    }
}

/// Durable string key-value storage.
///
/// Receivers are `&self`; backends use interior mutability the way a browser
/// storage object is shared by every caller.
pub trait Store {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
    fn keys(&self) -> StoreResult<Vec<String>>;
    fn clear(&self) -> StoreResult<()>;

    fn get_value(&self, key: &str) -> StoreResult<Option<StoredValue>> {
        Ok(self.get(key)?.map(|text| StoredValue::decode(&text)))
    }

    fn set_value(&self, key: &str, value: &StoredValue) -> StoreResult<()> {
        self.set(key, &value.encode())
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: Store + ?Sized> Store for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}

impl<S: Store + ?Sized> Store for std::rc::Rc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}
