use serde::{Deserialize, Serialize};

/// Pitch-class spellings used when labelling generated notes.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
];

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BaseNote {
    C,
    #[serde(rename = "C#", alias = "Db")]
    CSharp,
    D,
    #[serde(rename = "Eb", alias = "D#")]
    EFlat,
    E,
    F,
    #[serde(rename = "F#", alias = "Gb")]
    FSharp,
    G,
    #[serde(rename = "Ab", alias = "G#")]
    AFlat,
    A,
    #[serde(rename = "Bb", alias = "A#")]
    BFlat,
    B,
}

impl BaseNote {
    pub const ALL: [BaseNote; 12] = [
        BaseNote::C,
        BaseNote::CSharp,
        BaseNote::D,
        BaseNote::EFlat,
        BaseNote::E,
        BaseNote::F,
        BaseNote::FSharp,
        BaseNote::G,
        BaseNote::AFlat,
        BaseNote::A,
        BaseNote::BFlat,
        BaseNote::B,
    ];

    /// Semitones above C.
    pub fn pitch_class(self) -> u8 {
        Self::ALL
            .iter()
            .position(|note| *note == self)
            .unwrap_or_default() as u8
    }

    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.pitch_class() as usize]
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IntervalDirection {
    #[default]
    Ascending,
    Descending,
}

/// Label for an absolute note index: pitch class name followed by octave,
/// where index 0 is `C1`.
pub fn note_label(index: u32) -> String {
    format!("{}{}", NOTE_NAMES[(index % 12) as usize], index / 12 + 1)
}

/// Labels for every index in `min..=max`; empty when `min > max`.
pub fn note_labels(min: u32, max: u32) -> Vec<String> {
    (min..=max).map(note_label).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_cover_inclusive_range() {
        assert_eq!(note_labels(20, 24), vec!["Ab2", "A2", "Bb2", "B2", "C3"]);
        assert!(note_labels(5, 4).is_empty());
        assert_eq!(note_label(0), "C1");
    }

    #[test]
    fn base_note_accepts_enharmonic_spellings() {
        let note: BaseNote = serde_json::from_str("\"G#\"").unwrap();
        assert_eq!(note, BaseNote::AFlat);
        assert_eq!(serde_json::to_string(&note).unwrap(), "\"Ab\"");
        assert_eq!(BaseNote::A.pitch_class(), 9);
    }
}
