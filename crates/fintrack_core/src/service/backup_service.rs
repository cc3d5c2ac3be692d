//! Backup, restore and wipe of the whole persisted store.
//!
//! # Responsibility
//! - Snapshot every store entry into a versioned backup document.
//! - Export the document as pretty JSON, import it back from a file.
//! - Restore with merge semantics; clear the store on explicit request.
//!
//! # Invariants
//! - An invalid envelope is rejected before any key is written.
//! - Restore never removes keys that are absent from the backup.
//! - Restore is not atomic: a failed write keeps the keys written before it.
//! - Parse failures during import leave the store untouched.

use crate::model::backup::{
    backup_file_name, check_backup_value, BackupCheck, BackupDocument, BackupMetadata, Snapshot,
};
use crate::store::{Store, StoreError, StoredValue};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt};

pub type BackupResult<T> = Result<T, BackupError>;

#[derive(Debug)]
pub enum BackupError {
    /// Reading the import file or writing the export file failed.
    Io(std::io::Error),
    /// Import text is not JSON.
    Parse(serde_json::Error),
    InvalidBackup(String),
    Serialize(serde_json::Error),
    Store(StoreError),
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "backup file I/O failed: {err}"),
            Self::Parse(err) => write!(f, "backup file is not valid JSON: {err}"),
            Self::InvalidBackup(reason) => write!(f, "invalid backup file: {reason}"),
            Self::Serialize(err) => write!(f, "failed to serialize backup: {err}"),
            Self::Store(err) => write!(f, "failed to access store: {err}"),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) | Self::Serialize(err) => Some(err),
            Self::InvalidBackup(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BackupError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<StoreError> for BackupError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Summary of a successful restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    pub keys_written: Vec<String>,
    /// Set when the backup declared a different format version.
    pub version_warning: Option<String>,
}

/// Backup/restore use-case service.
pub struct BackupService<S: Store> {
    store: S,
}

impl<S: Store> BackupService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Decoded copy of every entry, known and incidental keys alike.
    pub fn snapshot(&self) -> BackupResult<Snapshot> {
        let mut snapshot = Snapshot::new();
        for key in self.store.keys()? {
            if let Some(stored) = self.store.get_value(&key)? {
                snapshot.insert(key, stored.into_json());
            }
        }
        Ok(snapshot)
    }

    pub fn create_backup(&self) -> BackupResult<BackupDocument> {
        self.create_backup_at(Utc::now())
    }

    /// Same as [`Self::create_backup`] with an explicit clock reading.
    pub fn create_backup_at(&self, now: DateTime<Utc>) -> BackupResult<BackupDocument> {
        Ok(BackupDocument {
            metadata: BackupMetadata::current(now),
            data: self.snapshot()?,
        })
    }

    /// Fresh backup rendered as pretty-printed JSON text.
    pub fn export_backup_string(&self) -> BackupResult<String> {
        let backup = self.create_backup()?;
        serde_json::to_string_pretty(&backup).map_err(BackupError::Serialize)
    }

    /// Writes a fresh backup to `<dir>/finance_backup_<today>.json`.
    pub fn export_backup_to_dir(&self, dir: impl AsRef<Path>) -> BackupResult<PathBuf> {
        let started_at = Instant::now();
        let now = Utc::now();
        let backup = self.create_backup_at(now)?;
        let text = serde_json::to_string_pretty(&backup).map_err(BackupError::Serialize)?;

        let dir = dir.as_ref();
        let path = dir.join(backup_file_name(now.date_naive()));
        let written = std::fs::create_dir_all(dir).and_then(|()| std::fs::write(&path, text));
        if let Err(err) = written {
            error!(
                "event=backup_export module=backup status=error error_code=write_failed error={err}"
            );
            return Err(err.into());
        }

        info!(
            "event=backup_export module=backup status=ok keys={} duration_ms={}",
            backup.data.len(),
            started_at.elapsed().as_millis()
        );
        Ok(path)
    }

    /// `true` when the envelope is restorable; warns on version mismatch.
    pub fn validate_backup(&self, backup: &Value) -> bool {
        let check = check_backup_value(backup);
        match &check {
            BackupCheck::Valid => {}
            BackupCheck::VersionMismatch { found } => warn!(
                "event=backup_validate module=backup status=warn reason=version_mismatch found={}",
                found.as_deref().unwrap_or("none")
            ),
            BackupCheck::Invalid(reason) => {
                warn!("event=backup_validate module=backup status=error reason=\"{reason}\"")
            }
        }
        check.is_restorable()
    }

    /// Writes every entry of `backup.data` into the store.
    ///
    /// # Errors
    /// - `InvalidBackup` when the envelope is incomplete; nothing is written.
    /// - `Store` on the first failed write; earlier writes are kept.
    pub fn restore_from_backup(&self, backup: &Value) -> BackupResult<RestoreReport> {
        let version_warning = match check_backup_value(backup) {
            BackupCheck::Valid => None,
            BackupCheck::VersionMismatch { found } => {
                let message = format!(
                    "backup version {} differs from supported version {}; some data may not load correctly",
                    found.as_deref().unwrap_or("(missing)"),
                    crate::model::backup::BACKUP_FORMAT_VERSION
                );
                warn!(
                    "event=backup_restore module=backup status=warn reason=version_mismatch found={}",
                    found.as_deref().unwrap_or("none")
                );
                Some(message)
            }
            BackupCheck::Invalid(reason) => {
                warn!("event=backup_restore module=backup status=error error_code=invalid_backup");
                return Err(BackupError::InvalidBackup(reason));
            }
        };

        let Some(data) = backup.get("data").and_then(Value::as_object) else {
            return Err(BackupError::InvalidBackup(
                "backup `data` is not an object".to_string(),
            ));
        };

        let mut keys_written = Vec::with_capacity(data.len());
        for (key, value) in data {
            if let Err(err) = self.store.set_value(key, &StoredValue::from_restored(value)) {
                error!(
                    "event=backup_restore module=backup status=error error_code=partial_write written={} error={err}",
                    keys_written.len()
                );
                return Err(err.into());
            }
            keys_written.push(key.clone());
        }

        info!(
            "event=backup_restore module=backup status=ok keys={}",
            keys_written.len()
        );
        Ok(RestoreReport {
            keys_written,
            version_warning,
        })
    }

    /// Typed variant of [`Self::restore_from_backup`].
    pub fn restore_document(&self, backup: &BackupDocument) -> BackupResult<RestoreReport> {
        let value = serde_json::to_value(backup).map_err(BackupError::Serialize)?;
        self.restore_from_backup(&value)
    }

    /// Reads the whole backup text from `reader`, parses it, then restores.
    pub async fn import_backup<R>(&self, mut reader: R) -> BackupResult<RestoreReport>
    where
        R: AsyncRead + Unpin,
    {
        let mut text = String::new();
        if let Err(err) = reader.read_to_string(&mut text).await {
            error!("event=backup_import module=backup status=error error_code=read_failed error={err}");
            return Err(err.into());
        }
        self.import_backup_text(&text)
    }

    /// Opens `path` and imports it.
    pub async fn import_backup_file(&self, path: impl AsRef<Path>) -> BackupResult<RestoreReport> {
        let file = tokio::fs::File::open(path.as_ref()).await.map_err(|err| {
            error!("event=backup_import module=backup status=error error_code=open_failed error={err}");
            BackupError::Io(err)
        })?;
        self.import_backup(file).await
    }

    /// Parses already-read backup text, then restores.
    pub fn import_backup_text(&self, text: &str) -> BackupResult<RestoreReport> {
        let backup: Value = serde_json::from_str(text).map_err(|err| {
            warn!("event=backup_import module=backup status=error error_code=parse_failed");
            BackupError::Parse(err)
        })?;
        self.restore_from_backup(&backup)
    }

    /// Erases every key in the store.
    pub fn clear_all_data(&self) -> BackupResult<()> {
        self.store.clear().map_err(|err| {
            error!("event=store_clear module=backup status=error error={err}");
            BackupError::Store(err)
        })?;
        info!("event=store_clear module=backup status=ok");
        Ok(())
    }
}
