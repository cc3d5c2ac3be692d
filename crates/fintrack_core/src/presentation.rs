//! Host and presentation seams for the preference service.
//!
//! # Responsibility
//! - `ColorSchemeHost`: synchronous "does the host prefer dark?" query.
//! - `PresentationSurface`: one-way sink for the applied theme.
//!
//! # Invariants
//! - Core never reads presentation state back to make decisions.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Host color-scheme signal.
pub trait ColorSchemeHost {
    fn prefers_dark(&self) -> bool;
}

impl<H: ColorSchemeHost + ?Sized> ColorSchemeHost for &H {
    fn prefers_dark(&self) -> bool {
        (**self).prefers_dark()
    }
}

impl<H: ColorSchemeHost + ?Sized> ColorSchemeHost for std::rc::Rc<H> {
    fn prefers_dark(&self) -> bool {
        (**self).prefers_dark()
    }
}

/// Host whose preference is set explicitly (CLI flag, tests).
#[derive(Debug, Default)]
pub struct FixedHost {
    prefers_dark: Cell<bool>,
}

impl FixedHost {
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            prefers_dark: Cell::new(prefers_dark),
        }
    }

    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        self.prefers_dark.set(prefers_dark);
    }
}

impl ColorSchemeHost for FixedHost {
    fn prefers_dark(&self) -> bool {
        self.prefers_dark.get()
    }
}

/// Global presentation state written by theme application.
pub trait PresentationSurface {
    /// Toggles the top-level dark flag.
    fn set_dark_class(&self, dark: bool);
    fn set_body_background(&self, color: &str);
    fn set_variable(&self, name: &str, value: &str);
}

impl<P: PresentationSurface + ?Sized> PresentationSurface for &P {
    fn set_dark_class(&self, dark: bool) {
        (**self).set_dark_class(dark)
    }

    fn set_body_background(&self, color: &str) {
        (**self).set_body_background(color)
    }

    fn set_variable(&self, name: &str, value: &str) {
        (**self).set_variable(name, value)
    }
}

impl<P: PresentationSurface + ?Sized> PresentationSurface for std::rc::Rc<P> {
    fn set_dark_class(&self, dark: bool) {
        (**self).set_dark_class(dark)
    }

    fn set_body_background(&self, color: &str) {
        (**self).set_body_background(color)
    }

    fn set_variable(&self, name: &str, value: &str) {
        (**self).set_variable(name, value)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct SheetState {
    dark: bool,
    body_background: Option<String>,
    variables: BTreeMap<String, String>,
}

/// In-memory presentation surface that can render itself as CSS.
#[derive(Debug, Default)]
pub struct StyleSheet {
    state: RefCell<SheetState>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dark(&self) -> bool {
        self.state.borrow().dark
    }

    pub fn body_background(&self) -> Option<String> {
        self.state.borrow().body_background.clone()
    }

    pub fn variable(&self, name: &str) -> Option<String> {
        self.state.borrow().variables.get(name).cloned()
    }

    /// Renders the `:root` variables plus the body background.
    pub fn to_css(&self) -> String {
        let state = self.state.borrow();
        let mut css = String::new();
        let root_class = if state.dark { ":root.dark" } else { ":root" };
        let _ = writeln!(css, "{root_class} {{");
        for (name, value) in &state.variables {
            let _ = writeln!(css, "  {name}: {value};");
        }
        css.push_str("}\n");
        if let Some(background) = &state.body_background {
            let _ = writeln!(css, "body {{\n  background-color: {background};\n}}");
        }
        css
    }
}

impl PresentationSurface for StyleSheet {
    fn set_dark_class(&self, dark: bool) {
        self.state.borrow_mut().dark = dark;
    }

    fn set_body_background(&self, color: &str) {
        self.state.borrow_mut().body_background = Some(color.to_string());
    }

    fn set_variable(&self, name: &str, value: &str) {
        self.state
            .borrow_mut()
            .variables
            .insert(name.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::{PresentationSurface, StyleSheet};

    #[test]
    fn css_output_reflects_dark_flag_and_variables() {
        let sheet = StyleSheet::new();
        sheet.set_dark_class(true);
        sheet.set_body_background("#111827");
        sheet.set_variable("--color-primary", "#00af91");

        let css = sheet.to_css();
        assert!(css.starts_with(":root.dark {"));
        assert!(css.contains("  --color-primary: #00af91;"));
        assert!(css.contains("background-color: #111827;"));
    }
}
