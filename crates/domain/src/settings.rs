use serde::{Deserialize, Deserializer, Serialize};
use time::Duration;

use crate::notes::{BaseNote, IntervalDirection, Mode};

/// When the target note of a modal exercise is sounded.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PlayTargetNote {
    #[default]
    Never,
    Interval,
    OnCorrect,
}

/// Which practice page is driving the interval settings.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PageMode {
    #[default]
    IntervalTraining,
    Modal,
}

/// Persisted parameters of the interval and modal singing exercises.
///
/// All times are in milliseconds. Stored times may be any JSON number; they
/// are rounded and clamped into `u32` on read.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntervalSettings {
    pub min_note_index: u32,
    pub max_note_index: u32,
    #[serde(deserialize_with = "millis")]
    pub main_note_play_time: u32,
    /// Time the interval note sounds.
    #[serde(deserialize_with = "millis")]
    pub interval_note_play_time: u32,
    /// Time both notes sound together.
    #[serde(deserialize_with = "millis")]
    pub both_note_play_time: u32,
    /// Gap between consecutive notes.
    #[serde(deserialize_with = "millis")]
    pub sleep_time: u32,
    pub selected_interval: u32,
    pub interval_direction: IntervalDirection,
    pub play_answer_after_correct: bool,
    pub play_harmonic_after_correct: bool,
    #[serde(deserialize_with = "millis")]
    pub correct_feedback_timeout: u32,
    /// Gap between questions.
    #[serde(deserialize_with = "millis")]
    pub next_question_delay: u32,
    pub selected_intervals: Vec<u32>,
    pub play_target_note: PlayTargetNote,
    #[serde(deserialize_with = "millis")]
    pub play_target_note_interval: u32,
    pub interval_tone: BaseNote,
    pub interval_mode: Mode,
    pub interval_mode_notes: Vec<String>,
}

impl Default for IntervalSettings {
    fn default() -> Self {
        Self {
            min_note_index: 20,
            max_note_index: 24,
            main_note_play_time: 4000,
            interval_note_play_time: 500,
            both_note_play_time: 2000,
            sleep_time: 500,
            selected_interval: 3,
            interval_direction: IntervalDirection::Ascending,
            play_answer_after_correct: false,
            play_harmonic_after_correct: false,
            correct_feedback_timeout: 1000,
            next_question_delay: 1500,
            selected_intervals: (1..=12).collect(),
            play_target_note: PlayTargetNote::Never,
            play_target_note_interval: 1000,
            interval_tone: BaseNote::A,
            interval_mode: Mode::Ionian,
            interval_mode_notes: [
                "Bb", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A",
            ]
            .iter()
            .map(|name| name.to_string())
            .collect(),
        }
    }
}

impl IntervalSettings {
    pub fn pause_inputs(&self, page: PageMode) -> PauseInputs {
        PauseInputs {
            next_question_delay: self.next_question_delay,
            play_answer_after_correct: self.play_answer_after_correct,
            play_harmonic_after_correct: self.play_harmonic_after_correct,
            interval_note_play_time: self.interval_note_play_time,
            both_note_play_time: self.both_note_play_time,
            sleep_time: self.sleep_time,
            page,
            play_target_note: self.play_target_note,
        }
    }
}

/// Reads a millisecond count written as any JSON number, rounding fractions
/// and clamping into `u32`.
fn millis<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(serde::de::Error::custom("time must be a finite number"));
    }
    Ok(value.round().clamp(0.0, u32::MAX as f64) as u32)
}

/// Every value the post-answer pause depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PauseInputs {
    pub next_question_delay: u32,
    pub play_answer_after_correct: bool,
    pub play_harmonic_after_correct: bool,
    pub interval_note_play_time: u32,
    pub both_note_play_time: u32,
    pub sleep_time: u32,
    pub page: PageMode,
    pub play_target_note: PlayTargetNote,
}

/// Milliseconds to wait after a correct answer before asking the next question.
///
/// Interval training waits for the optional answer replay and harmonic replay,
/// each followed by the inter-note gap. Modal singing only waits for the target
/// note when it is played on correct answers.
pub fn pause_duration_ms(inputs: &PauseInputs) -> u32 {
    let mut total = inputs.next_question_delay;
    match inputs.page {
        PageMode::IntervalTraining => {
            if inputs.play_answer_after_correct {
                total = total
                    .saturating_add(inputs.interval_note_play_time)
                    .saturating_add(inputs.sleep_time);
            }
            if inputs.play_harmonic_after_correct {
                total = total
                    .saturating_add(inputs.both_note_play_time)
                    .saturating_add(inputs.sleep_time);
            }
        }
        PageMode::Modal => {
            if inputs.play_target_note == PlayTargetNote::OnCorrect {
                total = total.saturating_add(inputs.interval_note_play_time);
            }
        }
    }
    total
}

pub fn pause_duration(inputs: &PauseInputs) -> Duration {
    Duration::milliseconds(pause_duration_ms(inputs) as i64)
}

/// Audio calibration preferences.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub mic_gain: f32,
    pub volume_gain: f32,
    pub calibration_factor: f32,
    /// Device identifier; empty selects the system default.
    pub audio_input_device: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            mic_gain: 4.0,
            volume_gain: 1.0,
            calibration_factor: 1.0,
            audio_input_device: String::new(),
        }
    }
}
