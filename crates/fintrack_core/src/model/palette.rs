//! User-customizable color palette.
//!
//! # Invariants
//! - Every field is always populated; partial palettes are not persisted.
//! - Color strings are passed through untouched (the settings form owns
//!   format validation).

use super::theme::Appearance;
use serde::{Deserialize, Serialize};

/// A color with one value per resolved appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeColors {
    pub light: String,
    pub dark: String,
}

impl ModeColors {
    pub fn new(light: impl Into<String>, dark: impl Into<String>) -> Self {
        Self {
            light: light.into(),
            dark: dark.into(),
        }
    }

    pub fn for_appearance(&self, appearance: Appearance) -> &str {
        match appearance {
            Appearance::Light => &self.light,
            Appearance::Dark => &self.dark,
        }
    }
}

/// Full palette persisted under `customColors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub success: String,
    pub warning: String,
    pub danger: String,
    pub background: ModeColors,
    pub text: ModeColors,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            primary: "#00af91".to_string(),
            secondary: "#0077C5".to_string(),
            accent: "#3b82f6".to_string(),
            success: "#22c55e".to_string(),
            warning: "#f59e0b".to_string(),
            danger: "#ef4444".to_string(),
            background: ModeColors::new("#f9fafb", "#111827"),
            text: ModeColors::new("#1f2937", "#f9fafb"),
        }
    }
}

/// Field names accepted by [`ColorPalette::set_field`].
pub const PALETTE_FIELDS: [&str; 10] = [
    "primary",
    "secondary",
    "accent",
    "success",
    "warning",
    "danger",
    "background.light",
    "background.dark",
    "text.light",
    "text.dark",
];

impl ColorPalette {
    pub fn background_for(&self, appearance: Appearance) -> &str {
        self.background.for_appearance(appearance)
    }

    pub fn text_for(&self, appearance: Appearance) -> &str {
        self.text.for_appearance(appearance)
    }

    /// Replaces one field, addressed as in [`PALETTE_FIELDS`].
    ///
    /// Returns `false` (and leaves the palette unchanged) for unknown names.
    pub fn set_field(&mut self, field: &str, color: impl Into<String>) -> bool {
        let slot = match field {
            "primary" => &mut self.primary,
            "secondary" => &mut self.secondary,
            "accent" => &mut self.accent,
            "success" => &mut self.success,
            "warning" => &mut self.warning,
            "danger" => &mut self.danger,
            "background.light" => &mut self.background.light,
            "background.dark" => &mut self.background.dark,
            "text.light" => &mut self.text.light,
            "text.dark" => &mut self.text.dark,
            _ => return false,
        };
        *slot = color.into();
        true
    }

    /// Every color addressed by its [`PALETTE_FIELDS`] name.
    pub fn fields(&self) -> [(&'static str, &str); 10] {
        [
            ("primary", self.primary.as_str()),
            ("secondary", self.secondary.as_str()),
            ("accent", self.accent.as_str()),
            ("success", self.success.as_str()),
            ("warning", self.warning.as_str()),
            ("danger", self.danger.as_str()),
            ("background.light", self.background.light.as_str()),
            ("background.dark", self.background.dark.as_str()),
            ("text.light", self.text.light.as_str()),
            ("text.dark", self.text.dark.as_str()),
        ]
    }

    /// Presentation variables derived for one appearance, in apply order.
    pub fn css_variables(&self, appearance: Appearance) -> Vec<(&'static str, &str)> {
        vec![
            ("--color-primary", self.primary.as_str()),
            ("--color-secondary", self.secondary.as_str()),
            ("--color-accent", self.accent.as_str()),
            ("--color-success", self.success.as_str()),
            ("--color-warning", self.warning.as_str()),
            ("--color-danger", self.danger.as_str()),
            ("--color-background", self.background_for(appearance)),
            ("--color-text", self.text_for(appearance)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorPalette, PALETTE_FIELDS};
    use crate::model::theme::Appearance;

    #[test]
    fn serializes_with_nested_mode_fields() {
        let json = serde_json::to_value(ColorPalette::default()).unwrap();
        assert_eq!(json["primary"], "#00af91");
        assert_eq!(json["background"]["dark"], "#111827");
        assert_eq!(json["text"]["light"], "#1f2937");
    }

    #[test]
    fn css_variables_follow_appearance() {
        let palette = ColorPalette::default();
        let dark = palette.css_variables(Appearance::Dark);
        assert_eq!(dark.len(), 8);
        assert!(dark.contains(&("--color-background", "#111827")));
        assert!(dark.contains(&("--color-text", "#f9fafb")));

        let light = palette.css_variables(Appearance::Light);
        assert!(light.contains(&("--color-background", "#f9fafb")));
    }

    #[test]
    fn set_field_addresses_nested_colors() {
        let mut palette = ColorPalette::default();
        for field in PALETTE_FIELDS {
            assert!(palette.set_field(field, "#000000"), "field {field}");
        }
        assert_eq!(palette.background.dark, "#000000");
        assert!(!palette.set_field("border", "#ffffff"));

        let names: Vec<&str> = palette.fields().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, PALETTE_FIELDS);
    }
}
