use std::fmt;
use std::sync::Arc;

use fretboard_domain::{
    note_labels, pause_duration_ms, BaseNote, IntervalDirection, IntervalSettings, Mode,
    PageMode, PlayTargetNote,
};
use fretboard_storage::{keys, load_record, save_record, KeyValueStore};
use time::Duration;
use tracing::{debug, warn};

type Callback = Box<dyn Fn() + Send + Sync>;

/// Generates a getter and a persisting setter for each plain settings field.
macro_rules! settings_fields {
    ($($field:ident, $setter:ident: $ty:ty;)*) => {
        $(
            pub fn $field(&self) -> $ty {
                self.settings.$field
            }

            pub fn $setter(&mut self, value: $ty) {
                self.settings.$field = value;
                self.persist();
            }
        )*
    };
}

/// Interval and modal singing parameters, persisted on every change.
///
/// The note labels and interval list are regenerated whenever their bounds
/// change, so they always reflect the current settings.
pub struct IntervalSettingsStore {
    storage: Arc<dyn KeyValueStore>,
    settings: IntervalSettings,
    notes: Vec<String>,
    intervals: Vec<u32>,
    min_interval_index: u32,
    max_interval_index: u32,
    current_page: PageMode,
    on_correct: Callback,
}

impl IntervalSettingsStore {
    /// Creates the store and loads persisted settings immediately.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut store = Self {
            storage,
            settings: IntervalSettings::default(),
            notes: Vec::new(),
            intervals: Vec::new(),
            min_interval_index: 0,
            max_interval_index: 12,
            current_page: PageMode::default(),
            on_correct: Box::new(|| {}),
        };
        store.load();
        store
    }

    /// Replaces in-memory settings with the persisted record. Missing or
    /// unreadable fields fall back to their defaults.
    pub fn load(&mut self) {
        self.settings = load_record(self.storage.as_ref(), keys::INTERVAL_SETTINGS);
        self.generate_notes();
        self.generate_intervals();
        debug!(notes = self.notes.len(), "loaded interval settings");
    }

    fn persist(&self) {
        if let Err(err) = save_record(self.storage.as_ref(), keys::INTERVAL_SETTINGS, &self.settings) {
            warn!(%err, "failed to persist interval settings");
        }
    }

    fn generate_notes(&mut self) {
        self.notes = note_labels(self.settings.min_note_index, self.settings.max_note_index);
    }

    fn generate_intervals(&mut self) {
        self.intervals =
            (self.min_interval_index..=self.max_interval_index).collect();
    }

    pub fn settings(&self) -> &IntervalSettings {
        &self.settings
    }

    /// Applies several changes at once with a single write.
    pub fn update(&mut self, change: impl FnOnce(&mut IntervalSettings)) {
        change(&mut self.settings);
        self.generate_notes();
        self.persist();
    }

    /// Note labels between the minimum and maximum note index, inclusive.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn intervals(&self) -> &[u32] {
        &self.intervals
    }

    settings_fields! {
        main_note_play_time, set_main_note_play_time: u32;
        interval_note_play_time, set_interval_note_play_time: u32;
        both_note_play_time, set_both_note_play_time: u32;
        sleep_time, set_sleep_time: u32;
        selected_interval, set_selected_interval: u32;
        interval_direction, set_interval_direction: IntervalDirection;
        play_answer_after_correct, set_play_answer_after_correct: bool;
        play_harmonic_after_correct, set_play_harmonic_after_correct: bool;
        correct_feedback_timeout, set_correct_feedback_timeout: u32;
        next_question_delay, set_next_question_delay: u32;
        play_target_note, set_play_target_note: PlayTargetNote;
        play_target_note_interval, set_play_target_note_interval: u32;
        interval_tone, set_interval_tone: BaseNote;
        interval_mode, set_interval_mode: Mode;
    }

    pub fn min_note_index(&self) -> u32 {
        self.settings.min_note_index
    }

    pub fn set_min_note_index(&mut self, value: u32) {
        self.settings.min_note_index = value;
        self.generate_notes();
        self.persist();
    }

    pub fn max_note_index(&self) -> u32 {
        self.settings.max_note_index
    }

    pub fn set_max_note_index(&mut self, value: u32) {
        self.settings.max_note_index = value;
        self.generate_notes();
        self.persist();
    }

    /// Lower bound of the interval list. Kept in memory only.
    pub fn min_interval_index(&self) -> u32 {
        self.min_interval_index
    }

    pub fn set_min_interval_index(&mut self, value: u32) {
        self.min_interval_index = value;
        self.generate_intervals();
    }

    pub fn max_interval_index(&self) -> u32 {
        self.max_interval_index
    }

    pub fn set_max_interval_index(&mut self, value: u32) {
        self.max_interval_index = value;
        self.generate_intervals();
    }

    pub fn selected_intervals(&self) -> &[u32] {
        &self.settings.selected_intervals
    }

    pub fn set_selected_intervals(&mut self, value: Vec<u32>) {
        self.settings.selected_intervals = value;
        self.persist();
    }

    pub fn interval_mode_notes(&self) -> &[String] {
        &self.settings.interval_mode_notes
    }

    pub fn set_interval_mode_notes(&mut self, value: Vec<String>) {
        self.settings.interval_mode_notes = value;
        self.persist();
    }

    /// Page currently driving the exercise. Not persisted.
    pub fn current_page(&self) -> PageMode {
        self.current_page
    }

    pub fn set_current_page(&mut self, page: PageMode) {
        self.current_page = page;
    }

    /// Milliseconds to wait after a correct answer before the next question,
    /// computed from the current settings on every call.
    pub fn correct_answer_sleep_time(&self) -> u32 {
        pause_duration_ms(&self.settings.pause_inputs(self.current_page))
    }

    pub fn correct_answer_sleep(&self) -> Duration {
        Duration::milliseconds(self.correct_answer_sleep_time() as i64)
    }

    /// Registers the callback run by [`Self::trigger_next_question`],
    /// replacing any previous one.
    pub fn set_on_correct(&mut self, callback: impl Fn() + Send + Sync + 'static) {
        self.on_correct = Box::new(callback);
    }

    pub fn trigger_next_question(&self) {
        (self.on_correct)();
    }
}

impl fmt::Debug for IntervalSettingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalSettingsStore")
            .field("settings", &self.settings)
            .field("notes", &self.notes)
            .field("intervals", &self.intervals)
            .field("min_interval_index", &self.min_interval_index)
            .field("max_interval_index", &self.max_interval_index)
            .field("current_page", &self.current_page)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fretboard_storage::{MemoryKeyValue, NullKeyValue};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn memory() -> Arc<MemoryKeyValue> {
        Arc::new(MemoryKeyValue::new())
    }

    #[test]
    fn empty_storage_loads_defaults() {
        let store = IntervalSettingsStore::new(memory());
        assert_eq!(store.settings(), &IntervalSettings::default());
        assert_eq!(store.min_note_index(), 20);
        assert_eq!(store.max_note_index(), 24);
        assert_eq!(store.next_question_delay(), 1500);
        assert_eq!(store.play_target_note(), PlayTargetNote::Never);
        assert_eq!(store.interval_tone(), BaseNote::A);
        assert_eq!(store.selected_intervals(), (1..=12u32).collect::<Vec<_>>().as_slice());
        assert_eq!(store.notes(), ["Ab2", "A2", "Bb2", "B2", "C3"]);
        assert_eq!(store.intervals(), (0..=12u32).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn headless_store_keeps_defaults() {
        let mut store = IntervalSettingsStore::new(Arc::new(NullKeyValue));
        store.set_sleep_time(750);
        assert_eq!(store.sleep_time(), 750);
        store.load();
        assert_eq!(store.sleep_time(), 500);
    }

    #[test]
    fn set_is_visible_immediately() {
        let mut store = IntervalSettingsStore::new(memory());
        store.set_interval_direction(IntervalDirection::Descending);
        store.set_play_harmonic_after_correct(true);
        store.set_interval_mode(Mode::Dorian);
        store.set_interval_mode_notes(vec!["C".into(), "D".into()]);
        assert_eq!(store.interval_direction(), IntervalDirection::Descending);
        assert!(store.play_harmonic_after_correct());
        assert_eq!(store.interval_mode(), Mode::Dorian);
        assert_eq!(store.interval_mode_notes(), ["C", "D"]);
    }

    #[test]
    fn fresh_store_reads_persisted_values() {
        let storage = memory();
        let mut store = IntervalSettingsStore::new(storage.clone());
        store.set_main_note_play_time(3000);
        store.set_selected_intervals(vec![3, 4, 7]);
        store.set_play_target_note(PlayTargetNote::Interval);
        store.set_interval_tone(BaseNote::FSharp);

        let reloaded = IntervalSettingsStore::new(storage);
        assert_eq!(reloaded.settings(), store.settings());
    }

    #[test]
    fn interval_bounds_stay_in_memory() {
        let storage = memory();
        let mut store = IntervalSettingsStore::new(storage.clone());
        store.set_min_interval_index(2);
        store.set_max_interval_index(7);
        assert_eq!(store.intervals(), (2..=7u32).collect::<Vec<_>>().as_slice());
        assert_eq!(storage.get_item(keys::INTERVAL_SETTINGS).unwrap(), None);

        store.set_sleep_time(400);
        let stored = storage.get_item(keys::INTERVAL_SETTINGS).unwrap().unwrap();
        assert!(!stored.contains("IntervalIndex"));
        let reloaded = IntervalSettingsStore::new(storage);
        assert_eq!(reloaded.intervals(), (0..=12u32).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn fractional_stored_times_are_rounded() {
        let storage = Arc::new(MemoryKeyValue::with_item(
            keys::INTERVAL_SETTINGS,
            r#"{"sleepTime": 250.5, "nextQuestionDelay": 1200}"#,
        ));
        let store = IntervalSettingsStore::new(storage);
        assert_eq!(store.sleep_time(), 251);
        assert_eq!(store.next_question_delay(), 1200);
    }

    #[test]
    fn note_bounds_regenerate_labels() {
        let mut store = IntervalSettingsStore::new(memory());
        store.set_min_note_index(22);
        assert_eq!(store.notes(), ["Bb2", "B2", "C3"]);
        store.set_max_note_index(21);
        assert!(store.notes().is_empty());
    }

    #[test]
    fn write_failure_keeps_memory_state() {
        let storage = memory();
        let mut store = IntervalSettingsStore::new(storage.clone());
        storage.fail_writes(true);
        store.set_next_question_delay(900);
        assert_eq!(store.next_question_delay(), 900);

        storage.fail_writes(false);
        let reloaded = IntervalSettingsStore::new(storage);
        assert_eq!(reloaded.next_question_delay(), 1500);
    }

    #[test]
    fn partial_record_falls_back_per_field() {
        let storage = Arc::new(MemoryKeyValue::with_item(
            keys::INTERVAL_SETTINGS,
            r#"{"sleepTime": 250, "intervalDirection": "sideways", "minNoteIndex": null}"#,
        ));
        let store = IntervalSettingsStore::new(storage);
        assert_eq!(store.sleep_time(), 250);
        assert_eq!(store.interval_direction(), IntervalDirection::Ascending);
        assert_eq!(store.min_note_index(), 20);
    }

    #[test]
    fn pause_follows_interval_training_settings() {
        let mut store = IntervalSettingsStore::new(memory());
        store.set_next_question_delay(1500);
        store.set_play_answer_after_correct(true);
        store.set_interval_note_play_time(500);
        store.set_sleep_time(500);
        store.set_play_harmonic_after_correct(false);
        assert_eq!(store.correct_answer_sleep_time(), 2500);

        store.set_play_harmonic_after_correct(true);
        assert_eq!(store.correct_answer_sleep_time(), 5000);
        assert_eq!(store.correct_answer_sleep(), Duration::seconds(5));
    }

    #[test]
    fn pause_follows_modal_settings() {
        let mut store = IntervalSettingsStore::new(memory());
        store.set_current_page(PageMode::Modal);
        store.set_play_target_note(PlayTargetNote::OnCorrect);
        store.set_interval_note_play_time(500);
        store.set_next_question_delay(1500);
        assert_eq!(store.correct_answer_sleep_time(), 2000);

        store.update(|settings| settings.interval_note_play_time = 800);
        assert_eq!(store.correct_answer_sleep_time(), 2300);
    }

    #[test]
    fn trigger_runs_registered_callback() {
        let mut store = IntervalSettingsStore::new(memory());
        store.trigger_next_question();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        store.set_on_correct(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        store.trigger_next_question();
        store.trigger_next_question();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
