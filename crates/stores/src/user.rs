use std::sync::Arc;

use fretboard_domain::UserSettings;
use fretboard_storage::{keys, load_record, save_record, KeyValueStore};
use tracing::warn;

/// Audio calibration preferences.
pub struct UserSettingsStore {
    storage: Arc<dyn KeyValueStore>,
    settings: UserSettings,
}

impl UserSettingsStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let settings = load_record(storage.as_ref(), keys::USER_SETTINGS);
        Self { storage, settings }
    }

    pub fn load(&mut self) {
        self.settings = load_record(self.storage.as_ref(), keys::USER_SETTINGS);
    }

    fn persist(&self) {
        if let Err(err) = save_record(self.storage.as_ref(), keys::USER_SETTINGS, &self.settings) {
            warn!(%err, "failed to persist user settings");
        }
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn mic_gain(&self) -> f32 {
        self.settings.mic_gain
    }

    pub fn set_mic_gain(&mut self, value: f32) {
        self.settings.mic_gain = value;
        self.persist();
    }

    pub fn volume_gain(&self) -> f32 {
        self.settings.volume_gain
    }

    pub fn set_volume_gain(&mut self, value: f32) {
        self.settings.volume_gain = value;
        self.persist();
    }

    pub fn calibration_factor(&self) -> f32 {
        self.settings.calibration_factor
    }

    pub fn set_calibration_factor(&mut self, value: f32) {
        self.settings.calibration_factor = value;
        self.persist();
    }

    pub fn audio_input_device(&self) -> &str {
        &self.settings.audio_input_device
    }

    pub fn set_audio_input_device(&mut self, value: impl Into<String>) {
        self.settings.audio_input_device = value.into();
        self.persist();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fretboard_storage::MemoryKeyValue;

    #[test]
    fn defaults_without_record() {
        let store = UserSettingsStore::new(Arc::new(MemoryKeyValue::new()));
        assert_relative_eq!(store.mic_gain(), 4.0);
        assert_relative_eq!(store.volume_gain(), 1.0);
        assert_relative_eq!(store.calibration_factor(), 1.0);
        assert_eq!(store.audio_input_device(), "");
    }

    #[test]
    fn changes_survive_reload() {
        let storage = Arc::new(MemoryKeyValue::new());
        let mut store = UserSettingsStore::new(storage.clone());
        store.set_mic_gain(2.5);
        store.set_volume_gain(0.8);
        store.set_calibration_factor(1.02);
        store.set_audio_input_device("usb-interface");
        assert_relative_eq!(store.mic_gain(), 2.5);

        let reloaded = UserSettingsStore::new(storage);
        assert_relative_eq!(reloaded.mic_gain(), 2.5);
        assert_relative_eq!(reloaded.volume_gain(), 0.8);
        assert_relative_eq!(reloaded.calibration_factor(), 1.02);
        assert_eq!(reloaded.audio_input_device(), "usb-interface");
    }

    #[test]
    fn load_picks_up_external_writes() {
        let storage = Arc::new(MemoryKeyValue::new());
        let mut store = UserSettingsStore::new(storage.clone());
        storage
            .set_item(keys::USER_SETTINGS, r#"{"micGain": 6}"#)
            .unwrap();
        store.load();
        assert_relative_eq!(store.mic_gain(), 6.0);
        assert_relative_eq!(store.volume_gain(), 1.0);
    }
}
