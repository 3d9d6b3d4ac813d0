pub mod error;
pub mod exercise;
pub mod notes;
pub mod preset;
pub mod session;
pub mod settings;

pub use crate::error::DomainError;
pub use crate::exercise::{Exercise, ExerciseTable};
pub use crate::notes::{note_label, note_labels, BaseNote, IntervalDirection, Mode, NOTE_NAMES};
pub use crate::preset::FretboardPreset;
pub use crate::session::PitchPhase;
pub use crate::settings::{
    pause_duration, pause_duration_ms, IntervalSettings, PageMode, PauseInputs, PlayTargetNote,
    UserSettings,
};
