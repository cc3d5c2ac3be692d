//! Core of the personal-finance tracker: preferences and backup/restore.
//! Every service works on one injected key-value `Store`.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod service;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::backup::{
    backup_file_name, check_backup_value, BackupCheck, BackupDocument, BackupMetadata, Snapshot,
    BACKUP_DESCRIPTION, BACKUP_FORMAT_VERSION,
};
pub use model::palette::{ColorPalette, ModeColors, PALETTE_FIELDS};
pub use model::theme::{resolve_appearance, Appearance, ThemeMode, ThemeModeParseError};
pub use presentation::{ColorSchemeHost, FixedHost, PresentationSurface, StyleSheet};
pub use service::backup_service::{BackupError, BackupResult, BackupService, RestoreReport};
pub use service::preference_service::{
    PreferenceError, PreferenceResult, PreferenceService, ThemeSnapshot,
};
pub use service::seed_service::initialize_default_data;
pub use store::{
    MemoryStore, SqliteStore, StorageKey, Store, StoreError, StoreResult, StoredValue,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
