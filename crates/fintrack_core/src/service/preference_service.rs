//! Theme mode and color palette preferences.
//!
//! # Responsibility
//! - Read/write `themeMode` and `customColors` in the shared store.
//! - Push the resolved theme into the presentation surface.
//! - Publish every applied theme to subscribers instead of reloading views.
//!
//! # Invariants
//! - Reads never fail: missing or malformed data falls back to defaults.
//! - Unknown mode text is rejected before anything is persisted.
//! - Host preference changes only re-apply while the mode is `system`.

use crate::model::palette::ColorPalette;
use crate::model::theme::{resolve_appearance, Appearance, ThemeMode, ThemeModeParseError};
use crate::presentation::{ColorSchemeHost, PresentationSurface};
use crate::store::{Store, StoreError, StorageKey, StoredValue};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use tokio::sync::watch;

pub type PreferenceResult<T> = Result<T, PreferenceError>;

#[derive(Debug)]
pub enum PreferenceError {
    InvalidThemeMode(ThemeModeParseError),
    Serialize(serde_json::Error),
    Store(StoreError),
}

impl Display for PreferenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidThemeMode(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to encode color palette: {err}"),
            Self::Store(err) => write!(f, "failed to persist preference: {err}"),
        }
    }
}

impl Error for PreferenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidThemeMode(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ThemeModeParseError> for PreferenceError {
    fn from(value: ThemeModeParseError) -> Self {
        Self::InvalidThemeMode(value)
    }
}

impl From<StoreError> for PreferenceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Theme state as last pushed to the presentation surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSnapshot {
    pub mode: ThemeMode,
    pub appearance: Appearance,
    pub palette: ColorPalette,
}

/// Preference use-case service.
pub struct PreferenceService<S: Store, H: ColorSchemeHost, P: PresentationSurface> {
    store: S,
    host: H,
    surface: P,
    changes: watch::Sender<ThemeSnapshot>,
}

impl<S: Store, H: ColorSchemeHost, P: PresentationSurface> PreferenceService<S, H, P> {
    /// Builds the service. Nothing is applied until [`Self::initialize`].
    pub fn new(store: S, host: H, surface: P) -> Self {
        let mode = read_theme_mode(&store);
        let initial = ThemeSnapshot {
            mode,
            appearance: resolve_appearance(mode, host.prefers_dark()),
            palette: read_custom_colors(&store),
        };
        let (changes, _) = watch::channel(initial);
        Self {
            store,
            host,
            surface,
            changes,
        }
    }

    /// Applies the persisted theme and palette once at startup.
    pub fn initialize(&self) -> ThemeSnapshot {
        let snapshot = self.apply_theme();
        info!(
            "event=theme_init module=preferences status=ok mode={} appearance={}",
            snapshot.mode, snapshot.appearance
        );
        snapshot
    }

    /// Persisted mode, or `system` when absent or unrecognized.
    pub fn theme_mode(&self) -> ThemeMode {
        read_theme_mode(&self.store)
    }

    /// Persists `mode` and applies it immediately.
    pub fn set_theme_mode(&self, mode: ThemeMode) -> PreferenceResult<ThemeSnapshot> {
        self.store.set(StorageKey::Theme.as_str(), mode.as_str())?;
        let snapshot = self.apply_theme();
        info!(
            "event=theme_set module=preferences status=ok mode={} appearance={}",
            snapshot.mode, snapshot.appearance
        );
        Ok(snapshot)
    }

    /// String entry point for UI/CLI input; unknown modes are rejected.
    pub fn set_theme_mode_str(&self, mode: &str) -> PreferenceResult<ThemeSnapshot> {
        let mode = mode.parse::<ThemeMode>().map_err(|err| {
            warn!("event=theme_set module=preferences status=error error_code=invalid_mode");
            err
        })?;
        self.set_theme_mode(mode)
    }

    /// Appearance for the current mode and host signal.
    pub fn appearance(&self) -> Appearance {
        resolve_appearance(self.theme_mode(), self.host.prefers_dark())
    }

    pub fn is_dark_mode(&self) -> bool {
        self.appearance().is_dark()
    }

    /// Persisted palette, or the default palette when absent or malformed.
    pub fn custom_colors(&self) -> ColorPalette {
        read_custom_colors(&self.store)
    }

    /// Persists the full palette and re-applies the derived variables.
    pub fn set_custom_colors(&self, palette: &ColorPalette) -> PreferenceResult<ThemeSnapshot> {
        let encoded = serde_json::to_value(palette).map_err(PreferenceError::Serialize)?;
        self.store.set_value(
            StorageKey::CustomColors.as_str(),
            &StoredValue::Json(encoded),
        )?;
        let snapshot = self.apply_theme();
        info!("event=palette_set module=preferences status=ok");
        Ok(snapshot)
    }

    pub fn reset_custom_colors(&self) -> PreferenceResult<ThemeSnapshot> {
        self.set_custom_colors(&ColorPalette::default())
    }

    /// Re-applies the theme after the host's color scheme changed.
    ///
    /// Returns `None` when the mode is explicit and nothing was re-applied.
    pub fn handle_host_preference_change(&self) -> Option<ThemeSnapshot> {
        if self.theme_mode() != ThemeMode::System {
            debug!("event=host_scheme_change module=preferences status=ok action=ignored");
            return None;
        }
        let snapshot = self.apply_theme();
        info!(
            "event=host_scheme_change module=preferences status=ok action=reapplied appearance={}",
            snapshot.appearance
        );
        Some(snapshot)
    }

    /// Follows host preference changes until the host drops its sender.
    ///
    /// The watched value is the host's "prefers dark" flag; the host object
    /// passed to [`Self::new`] must report the same value when queried.
    pub async fn follow_host_preference(&self, mut changes: watch::Receiver<bool>) {
        while changes.changed().await.is_ok() {
            self.handle_host_preference_change();
        }
        debug!("event=host_scheme_watch module=preferences status=ok action=closed");
    }

    /// Receiver for every applied theme; starts at the latest one.
    pub fn subscribe(&self) -> watch::Receiver<ThemeSnapshot> {
        self.changes.subscribe()
    }

    /// Latest applied (or initially computed) theme.
    pub fn current(&self) -> ThemeSnapshot {
        self.changes.borrow().clone()
    }

    fn apply_theme(&self) -> ThemeSnapshot {
        let mode = self.theme_mode();
        let appearance = resolve_appearance(mode, self.host.prefers_dark());
        let palette = self.custom_colors();

        self.surface.set_dark_class(appearance.is_dark());
        self.surface
            .set_body_background(palette.background_for(appearance));
        for (name, value) in palette.css_variables(appearance) {
            self.surface.set_variable(name, value);
        }

        let snapshot = ThemeSnapshot {
            mode,
            appearance,
            palette,
        };
        self.changes.send_replace(snapshot.clone());
        snapshot
    }
}

fn read_theme_mode<S: Store>(store: &S) -> ThemeMode {
    match store.get(StorageKey::Theme.as_str()) {
        Ok(Some(text)) => text.parse().unwrap_or_else(|_| {
            warn!("event=theme_read module=preferences status=warn reason=unknown_mode fallback=system");
            ThemeMode::System
        }),
        Ok(None) => ThemeMode::System,
        Err(err) => {
            error!("event=theme_read module=preferences status=error fallback=system error={err}");
            ThemeMode::System
        }
    }
}

fn read_custom_colors<S: Store>(store: &S) -> ColorPalette {
    let stored = match store.get_value(StorageKey::CustomColors.as_str()) {
        Ok(Some(stored)) => stored,
        Ok(None) => return ColorPalette::default(),
        Err(err) => {
            error!("event=palette_read module=preferences status=error fallback=default error={err}");
            return ColorPalette::default();
        }
    };

    let parsed = match stored {
        StoredValue::Json(value) => serde_json::from_value::<ColorPalette>(value).ok(),
        StoredValue::Raw(_) => None,
    };
    parsed.unwrap_or_else(|| {
        warn!("event=palette_read module=preferences status=warn reason=malformed fallback=default");
        ColorPalette::default()
    })
}

#[cfg(test)]
mod tests {
    use super::PreferenceService;
    use crate::model::theme::{Appearance, ThemeMode};
    use crate::presentation::{FixedHost, StyleSheet};
    use crate::store::{MemoryStore, Store};

    #[test]
    fn unknown_persisted_mode_reads_as_system() {
        let store = MemoryStore::with_entries([("themeMode", "sepia")]);
        let service = PreferenceService::new(&store, FixedHost::new(false), StyleSheet::new());
        assert_eq!(service.theme_mode(), ThemeMode::System);
    }

    #[test]
    fn rejected_mode_is_not_persisted() {
        let store = MemoryStore::new();
        let service = PreferenceService::new(&store, FixedHost::new(false), StyleSheet::new());
        assert!(service.set_theme_mode_str("sepia").is_err());
        assert_eq!(store.get("themeMode").unwrap(), None);
    }

    #[test]
    fn initial_snapshot_reflects_store_without_applying() {
        let store = MemoryStore::with_entries([("themeMode", "dark")]);
        let sheet = StyleSheet::new();
        let service = PreferenceService::new(&store, FixedHost::new(false), &sheet);

        assert_eq!(service.current().appearance, Appearance::Dark);
        assert_eq!(sheet.variable("--color-primary"), None);

        service.initialize();
        assert!(sheet.is_dark());
        assert_eq!(sheet.variable("--color-primary").as_deref(), Some("#00af91"));
    }
}
