use std::fmt;

use fretboard_domain::PitchPhase;

type Subscriber = Box<dyn Fn() + Send + Sync>;

/// Live state of a pitch-matching round. Nothing here is persisted.
#[derive(Default)]
pub struct PitcherStore {
    current_note: String,
    target_note: String,
    input_level: f32,
    current_pitch: f32,
    progress_width: f32,
    deg: f32,
    phase: PitchPhase,
    current_note_subscribers: Vec<Subscriber>,
}

impl PitcherStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback run after every write to the current note, even
    /// when the value is unchanged. Callbacks run in registration order.
    pub fn on_change_current_note(&mut self, callback: impl Fn() + Send + Sync + 'static) {
        self.current_note_subscribers.push(Box::new(callback));
    }

    pub fn current_note(&self) -> &str {
        &self.current_note
    }

    pub fn set_current_note(&mut self, value: impl Into<String>) {
        self.current_note = value.into();
        for subscriber in &self.current_note_subscribers {
            subscriber();
        }
    }

    pub fn target_note(&self) -> &str {
        &self.target_note
    }

    pub fn set_target_note(&mut self, value: impl Into<String>) {
        self.target_note = value.into();
    }

    /// Normalized microphone level.
    pub fn input_level(&self) -> f32 {
        self.input_level
    }

    pub fn set_input_level(&mut self, value: f32) {
        self.input_level = value;
    }

    /// Detected frequency in Hz.
    pub fn current_pitch(&self) -> f32 {
        self.current_pitch
    }

    pub fn set_current_pitch(&mut self, value: f32) {
        self.current_pitch = value;
    }

    pub fn phase(&self) -> PitchPhase {
        self.phase
    }

    pub fn set_phase(&mut self, value: PitchPhase) {
        self.phase = value;
    }

    pub fn progress_width(&self) -> f32 {
        self.progress_width
    }

    pub fn set_progress_width(&mut self, value: f32) {
        self.progress_width = value;
    }

    /// Rotation of the tuning needle in degrees.
    pub fn deg(&self) -> f32 {
        self.deg
    }

    pub fn set_deg(&mut self, value: f32) {
        self.deg = value;
    }

    /// Clears the detected note, progress and rotation between rounds.
    /// Subscribers, target note, input level and phase are kept, and
    /// subscribers are not notified.
    pub fn reset(&mut self) {
        self.current_note.clear();
        self.progress_width = 0.0;
        self.deg = 0.0;
    }
}

impl fmt::Debug for PitcherStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PitcherStore")
            .field("current_note", &self.current_note)
            .field("target_note", &self.target_note)
            .field("input_level", &self.input_level)
            .field("current_pitch", &self.current_pitch)
            .field("progress_width", &self.progress_width)
            .field("deg", &self.deg)
            .field("phase", &self.phase)
            .field("subscribers", &self.current_note_subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn subscribers_run_in_order_on_every_write() {
        let mut store = PitcherStore::new();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let first = calls.clone();
        store.on_change_current_note(move || first.lock().unwrap().push("first"));
        let second = calls.clone();
        store.on_change_current_note(move || second.lock().unwrap().push("second"));

        store.set_current_note("A4");
        assert_eq!(*calls.lock().unwrap(), vec!["first", "second"]);

        store.set_current_note("A4");
        assert_eq!(calls.lock().unwrap().len(), 4);
    }

    #[test]
    fn reset_keeps_target_and_phase() {
        let mut store = PitcherStore::new();
        store.set_target_note("C3");
        store.set_phase(PitchPhase::Question);
        store.set_input_level(0.4);
        store.set_current_note("B2");
        store.set_progress_width(55.0);
        store.set_deg(-12.5);

        store.reset();
        assert_eq!(store.current_note(), "");
        assert_eq!(store.progress_width(), 0.0);
        assert_eq!(store.deg(), 0.0);
        assert_eq!(store.target_note(), "C3");
        assert_eq!(store.phase(), PitchPhase::Question);
        assert_eq!(store.input_level(), 0.4);
    }

    #[test]
    fn reset_keeps_subscribers_without_notifying() {
        let mut store = PitcherStore::new();
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        store.on_change_current_note(move || *counter.lock().unwrap() += 1);
        store.reset();
        assert_eq!(*calls.lock().unwrap(), 0);
        store.set_current_note("E2");
        assert_eq!(*calls.lock().unwrap(), 1);
    }
}
