//! Runtime configuration for core consumers.
//!
//! Values come from built-in defaults under the platform data directory,
//! optionally overridden by a `fintrack.toml` file. Callers (the CLI) apply
//! their own flags on top.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "fintrack.toml";
const APP_DIR_NAME: &str = "fintrack";
const DB_FILE_NAME: &str = "fintrack_store.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Resolved paths and levels used to wire up the core.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub backup_dir: PathBuf,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let root = default_app_dir();
        Self {
            db_path: root.join(DB_FILE_NAME),
            log_dir: root.join("logs"),
            log_level: default_log_level().as_str().to_string(),
            backup_dir: dirs::download_dir().unwrap_or_else(|| root.join("backups")),
        }
    }
}

impl CoreConfig {
    /// Loads `path` when it exists, falling back to defaults otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Missing fields keep their defaults.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// `<data dir>/fintrack/fintrack.toml`.
    pub fn default_path() -> PathBuf {
        default_app_dir().join(CONFIG_FILE_NAME)
    }
}

fn default_app_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::CoreConfig;
    use std::path::PathBuf;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = CoreConfig::from_toml("log_level = \"warn\"\n").unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.db_path, CoreConfig::default().db_path);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn file_values_override_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fintrack.toml");
        std::fs::write(&path, "db_path = \"/tmp/x.sqlite3\"\nbackup_dir = \"/tmp/b\"\n").unwrap();

        let config = CoreConfig::load(&path).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.sqlite3"));
        assert_eq!(config.backup_dir, PathBuf::from("/tmp/b"));
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fintrack.toml");
        std::fs::write(&path, "log_level = [").unwrap();
        assert!(CoreConfig::load(&path).is_err());
    }
}
