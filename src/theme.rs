//! Dark/light/system theme selection.
//!
//! The user's choice is persisted as-is; what reaches the page is always a
//! concrete theme, with `system` resolved against the OS dark-mode signal.

use crate::config::{THEME_ATTRIBUTE, THEME_STORAGE_KEY};
use crate::storage::SettingsStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeSetting {
    #[default]
    Dark,
    Light,
    System,
}

impl ThemeSetting {
    pub const CYCLE: [ThemeSetting; 3] =
        [ThemeSetting::Dark, ThemeSetting::Light, ThemeSetting::System];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeSetting::Dark => "dark",
            ThemeSetting::Light => "light",
            ThemeSetting::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(ThemeSetting::Dark),
            "light" => Some(ThemeSetting::Light),
            "system" => Some(ThemeSetting::System),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            ThemeSetting::Dark => ThemeSetting::Light,
            ThemeSetting::Light => ThemeSetting::System,
            ThemeSetting::System => ThemeSetting::Dark,
        }
    }

    /// Tooltip for the toggle button.
    pub fn title(self) -> &'static str {
        match self {
            ThemeSetting::Dark => "Dark mode",
            ThemeSetting::Light => "Light mode",
            ThemeSetting::System => "System theme",
        }
    }

    pub fn resolve(self, os_prefers_dark: bool) -> ResolvedTheme {
        match self {
            ThemeSetting::Dark => ResolvedTheme::Dark,
            ThemeSetting::Light => ResolvedTheme::Light,
            ThemeSetting::System if os_prefers_dark => ResolvedTheme::Dark,
            ThemeSetting::System => ResolvedTheme::Light,
        }
    }
}

/// The theme actually applied to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Dark,
    Light,
}

impl ResolvedTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolvedTheme::Dark => "dark",
            ResolvedTheme::Light => "light",
        }
    }
}

/// Where a resolved theme gets written.
pub trait ThemeTarget {
    fn apply(&self, theme: ResolvedTheme);
}

/// Sets `data-theme` on the document element.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentTheme;

impl ThemeTarget for DocumentTheme {
    fn apply(&self, theme: ResolvedTheme) {
        let root = gloo_utils::document_element();
        if root.set_attribute(THEME_ATTRIBUTE, theme.as_str()).is_err() {
            log::warn!("Could not set {} on the document element", THEME_ATTRIBUTE);
        }
    }
}

pub struct ThemeController<S: SettingsStore, T: ThemeTarget> {
    store: S,
    target: T,
    setting: ThemeSetting,
    os_prefers_dark: bool,
}

impl<S: SettingsStore, T: ThemeTarget> ThemeController<S, T> {
    /// Load the persisted setting (dark when absent or unknown) and apply it.
    pub fn new(store: S, target: T, os_prefers_dark: bool) -> Self {
        let setting = store
            .load(THEME_STORAGE_KEY)
            .and_then(|raw| ThemeSetting::parse(&raw))
            .unwrap_or_default();
        let controller = Self { store, target, setting, os_prefers_dark };
        controller.target.apply(controller.applied());
        controller
    }

    pub fn setting(&self) -> ThemeSetting {
        self.setting
    }

    pub fn applied(&self) -> ResolvedTheme {
        self.setting.resolve(self.os_prefers_dark)
    }

    /// Advance dark → light → system, persist and apply.
    pub fn cycle(&mut self) -> ThemeSetting {
        self.setting = self.setting.next();
        self.store.save(THEME_STORAGE_KEY, self.setting.as_str());
        self.target.apply(self.applied());
        log::debug!("Theme set to {}", self.setting.as_str());
        self.setting
    }

    /// Record an OS signal change. Re-applies only while following the system.
    pub fn os_preference_changed(&mut self, prefers_dark: bool) -> bool {
        self.os_prefers_dark = prefers_dark;
        if self.setting == ThemeSetting::System {
            self.target.apply(self.applied());
            true
        } else {
            false
        }
    }
}
