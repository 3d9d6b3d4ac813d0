use std::sync::Arc;

use fretboard_storage::{keys, KeyValueStore};
use tracing::{debug, warn};

const DARK: &str = "dark";
const LIGHT: &str = "light";

/// Presentation layer the theme is applied to.
pub trait AppearanceHost: Send + Sync {
    /// The environment's light/dark preference, if it exposes one.
    fn prefers_dark(&self) -> Option<bool>;
    /// Adds or removes the global dark mode marker.
    fn apply_dark_mode(&self, dark: bool);
}

/// Host for contexts without a presentation layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessHost;

impl AppearanceHost for HeadlessHost {
    fn prefers_dark(&self) -> Option<bool> {
        None
    }

    fn apply_dark_mode(&self, _dark: bool) {}
}

pub struct ThemeStore {
    storage: Arc<dyn KeyValueStore>,
    host: Arc<dyn AppearanceHost>,
    dark: bool,
}

impl ThemeStore {
    /// Resolves the initial theme from the stored choice, then the host
    /// preference, then light.
    pub fn new(storage: Arc<dyn KeyValueStore>, host: Arc<dyn AppearanceHost>) -> Self {
        let stored = if storage.is_available() {
            storage.get_item(keys::THEME).unwrap_or_else(|err| {
                warn!(%err, "failed to read stored theme");
                None
            })
        } else {
            None
        };
        let dark = match stored.as_deref() {
            Some(value) if !value.is_empty() => value == DARK,
            _ => host.prefers_dark().unwrap_or(false),
        };
        debug!(dark, "resolved initial theme");
        Self {
            storage,
            host,
            dark,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// Stores the choice and applies it to the host before returning.
    pub fn set_dark(&mut self, dark: bool) {
        self.dark = dark;
        if self.storage.is_available() {
            if let Err(err) = self
                .storage
                .set_item(keys::THEME, if dark { DARK } else { LIGHT })
            {
                warn!(%err, "failed to persist theme");
            }
        }
        self.host.apply_dark_mode(dark);
    }

    pub fn toggle(&mut self) {
        self.set_dark(!self.dark);
    }
}
