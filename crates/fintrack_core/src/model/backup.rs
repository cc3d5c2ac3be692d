//! Versioned backup envelope.
//!
//! # Responsibility
//! - Define the on-disk backup shape `{ metadata, data }`.
//! - Decide whether an arbitrary JSON value is restorable.
//!
//! # Invariants
//! - `metadata` and `data` must both be JSON objects.
//! - A version other than [`BACKUP_FORMAT_VERSION`] is advisory only.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Version written into every new backup.
pub const BACKUP_FORMAT_VERSION: &str = "1.0";
/// Human-readable description written into every new backup.
pub const BACKUP_DESCRIPTION: &str = "Personal Finance App Backup";

/// Decoded copy of every store entry, keyed by store key.
pub type Snapshot = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupMetadata {
    pub version: String,
    /// ISO-8601 UTC, millisecond precision.
    pub timestamp: String,
    pub description: String,
}

impl BackupMetadata {
    pub fn current(now: DateTime<Utc>) -> Self {
        Self {
            version: BACKUP_FORMAT_VERSION.to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            description: BACKUP_DESCRIPTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    pub metadata: BackupMetadata,
    pub data: Snapshot,
}

/// Outcome of inspecting a candidate backup value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupCheck {
    Valid,
    /// Restorable, but written by a different format version.
    VersionMismatch { found: Option<String> },
    Invalid(String),
}

impl BackupCheck {
    pub fn is_restorable(&self) -> bool {
        !matches!(self, Self::Invalid(_))
    }
}

/// Inspects the envelope of an untrusted backup value.
pub fn check_backup_value(value: &Value) -> BackupCheck {
    let Some(envelope) = value.as_object() else {
        return BackupCheck::Invalid("backup is not a JSON object".to_string());
    };

    let metadata = match envelope.get("metadata") {
        None | Some(Value::Null) => {
            return BackupCheck::Invalid("backup is missing `metadata`".to_string());
        }
        Some(metadata @ Value::Object(_)) => metadata,
        Some(_) => {
            return BackupCheck::Invalid("backup `metadata` is not an object".to_string());
        }
    };

    match envelope.get("data") {
        Some(Value::Object(_)) => {}
        None | Some(Value::Null) => {
            return BackupCheck::Invalid("backup is missing `data`".to_string());
        }
        Some(_) => {
            return BackupCheck::Invalid("backup `data` is not an object".to_string());
        }
    }

    match metadata.get("version").and_then(Value::as_str) {
        Some(BACKUP_FORMAT_VERSION) => BackupCheck::Valid,
        found => BackupCheck::VersionMismatch {
            found: found.map(str::to_string),
        },
    }
}

/// `finance_backup_YYYY-MM-DD.json`.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("finance_backup_{}.json", date.format("%Y-%m-%d"))
}
