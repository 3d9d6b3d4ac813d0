//! Fixed storage keys and collection names.

pub const INTERVAL_SETTINGS: &str = "intervalSettings";
pub const USER_SETTINGS: &str = "userSettings";
pub const THEME: &str = "theme";

/// Object store collection holding fretboard presets, keyed by name.
pub const PRESETS: &str = "presets";
