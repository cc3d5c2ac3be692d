//! Theme mode and resolved appearance.
//!
//! # Invariants
//! - `System` is stored as the word `system`; the resolved appearance is
//!   never persisted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// User's explicit theme choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the host's color-scheme preference.
    #[default]
    System,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 3] = [Self::Light, Self::Dark, Self::System];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl Display for ThemeMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected theme mode text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeModeParseError(pub String);

impl Display for ThemeModeParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown theme mode `{}`; expected light|dark|system",
            self.0
        )
    }
}

impl Error for ThemeModeParseError {}

impl FromStr for ThemeMode {
    type Err = ThemeModeParseError;

    /// Exact match only; persisted values are written lowercase.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(ThemeModeParseError(other.to_string())),
        }
    }
}

/// Concrete presentation derived from a mode and the host signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    Light,
    Dark,
}

impl Appearance {
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

impl Display for Appearance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
        })
    }
}

/// Resolves the appearance to render. Pure; safe to call per frame.
pub fn resolve_appearance(mode: ThemeMode, host_prefers_dark: bool) -> Appearance {
    match mode {
        ThemeMode::Dark => Appearance::Dark,
        ThemeMode::System if host_prefers_dark => Appearance::Dark,
        ThemeMode::Light | ThemeMode::System => Appearance::Light,
    }
}
