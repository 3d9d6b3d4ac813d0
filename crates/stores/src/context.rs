use std::sync::Arc;

use fretboard_domain::ExerciseTable;
use fretboard_storage::{KeyValueStore, NullKeyValue, NullObjectStore, ObjectStore};
use tracing::debug;

use crate::interval::IntervalSettingsStore;
use crate::pitcher::PitcherStore;
use crate::presets::PresetStore;
use crate::theme::{AppearanceHost, HeadlessHost, ThemeStore};
use crate::user::UserSettingsStore;

/// Every store the trainer needs, built once per process and handed to the
/// screens that use them.
pub struct TrainerStores {
    pub interval: IntervalSettingsStore,
    pub user: UserSettingsStore,
    pub presets: Arc<PresetStore>,
    pub pitcher: PitcherStore,
    pub theme: ThemeStore,
    pub exercises: ExerciseTable,
}

impl TrainerStores {
    /// Builds the stores over the given backends. When called inside a tokio
    /// runtime the preset list starts loading in the background.
    pub fn with_backends(
        key_value: Arc<dyn KeyValueStore>,
        objects: Arc<dyn ObjectStore>,
        host: Arc<dyn AppearanceHost>,
    ) -> Self {
        let presets = Arc::new(PresetStore::new(objects));
        if tokio::runtime::Handle::try_current().is_ok() {
            presets.spawn_initial_load();
        } else {
            debug!("no runtime; presets load on demand");
        }
        Self {
            interval: IntervalSettingsStore::new(key_value.clone()),
            user: UserSettingsStore::new(key_value.clone()),
            presets,
            pitcher: PitcherStore::new(),
            theme: ThemeStore::new(key_value, host),
            exercises: ExerciseTable::builtin(),
        }
    }

    /// Stores for contexts without persistence, e.g. pre-rendering.
    pub fn headless() -> Self {
        Self::with_backends(
            Arc::new(NullKeyValue),
            Arc::new(NullObjectStore),
            Arc::new(HeadlessHost),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fretboard_domain::{FretboardPreset, PitchPhase};
    use fretboard_storage::{MemoryKeyValue, MemoryObjectStore};

    #[test]
    fn headless_stores_use_defaults() {
        let mut stores = TrainerStores::headless();
        assert_eq!(stores.interval.next_question_delay(), 1500);
        assert!(!stores.theme.is_dark());
        assert_eq!(stores.pitcher.phase(), PitchPhase::Idle);
        assert_eq!(stores.exercises.len(), 3);
        stores.theme.set_dark(true);
        assert!(stores.theme.is_dark());
    }

    #[tokio::test]
    async fn stores_share_backends() {
        let key_value = Arc::new(MemoryKeyValue::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let mut first =
            TrainerStores::with_backends(key_value.clone(), objects.clone(), Arc::new(HeadlessHost));
        first.interval.set_sleep_time(300);
        first.user.set_audio_input_device("line-in");
        first.theme.set_dark(true);
        first.presets.save_preset(&FretboardPreset::new("Standard")).await;

        let second = TrainerStores::with_backends(key_value, objects, Arc::new(HeadlessHost));
        second.presets.load_presets().await;
        assert_eq!(second.interval.sleep_time(), 300);
        assert_eq!(second.user.audio_input_device(), "line-in");
        assert!(second.theme.is_dark());
        assert_eq!(second.presets.presets().len(), 1);
    }
}
