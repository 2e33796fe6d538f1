//! Light/dark theme preference and its persistence.

use crate::config::THEME_STORAGE_KEY;
use crate::{AppError, AppResult};

/// Page color scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Parse a stored value; anything unknown falls back to dark.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Icon of the toggle button (shows the theme it switches to).
    pub fn toggle_icon(&self) -> &'static str {
        match self {
            Theme::Dark => "☀️",
            Theme::Light => "🌙",
        }
    }
}

/// Persisted single-value theme preference.
pub trait ThemeStore {
    fn load(&self) -> Option<String>;
    fn save(&self, theme: Theme) -> AppResult<()>;
}

/// Read the stored theme, defaulting to dark.
pub fn load_theme(store: &impl ThemeStore) -> Theme {
    Theme::from_stored(store.load().as_deref())
}

/// Flip the theme and persist the new value.
pub fn toggle_theme(store: &impl ThemeStore, current: Theme) -> Theme {
    let next = current.toggled();
    if let Err(e) = store.save(next) {
        log::warn!("Could not persist theme: {}", e);
    }
    next
}

/// `window.localStorage` backed store.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageThemeStore;

impl LocalStorageThemeStore {
    fn storage() -> AppResult<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| AppError::Storage("no global window".into()))?
            .local_storage()
            .map_err(|e| AppError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| AppError::Storage("localStorage unavailable".into()))
    }
}

impl ThemeStore for LocalStorageThemeStore {
    fn load(&self) -> Option<String> {
        Self::storage().ok()?.get_item(THEME_STORAGE_KEY).ok()?
    }

    fn save(&self, theme: Theme) -> AppResult<()> {
        Self::storage()?
            .set_item(THEME_STORAGE_KEY, theme.as_str())
            .map_err(|e| AppError::Storage(format!("{:?}", e)))
    }
}

/// Reflect the theme as a `dark` class on `<html>`.
pub fn apply_theme(theme: Theme) {
    let root = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element());

    if let Some(root) = root {
        if let Err(e) = root.class_list().toggle_with_force("dark", theme == Theme::Dark) {
            log::warn!("Could not apply theme: {:?}", e);
        }
    }
}
