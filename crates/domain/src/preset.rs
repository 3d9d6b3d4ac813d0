use serde::{Deserialize, Serialize};

use crate::DomainError;

/// A named snapshot of the fretboard display configuration.
///
/// The name is the identity key: saving a preset under an existing name
/// replaces the stored one.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FretboardPreset {
    pub name: String,
    pub selected_instrument: String,
    pub selected_key: String,
    pub lowest_note: String,
    pub string_range_start: u32,
    pub string_range_end: u32,
    pub fret_range_start: u32,
    pub fret_range_end: u32,
    pub anchor_mode_enabled: bool,
    pub anchor_degree: u32,
    pub anchor_frequency: f64,
}

impl FretboardPreset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selected_instrument: "guitar".into(),
            selected_key: "C".into(),
            lowest_note: "E".into(),
            string_range_start: 1,
            string_range_end: 6,
            fret_range_start: 0,
            fret_range_end: 12,
            anchor_mode_enabled: false,
            anchor_degree: 1,
            anchor_frequency: 440.0,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("preset name cannot be empty"));
        }
        if self.string_range_start > self.string_range_end {
            return Err(DomainError::validation(
                "string range start must not exceed its end",
            ));
        }
        if self.fret_range_start > self.fret_range_end {
            return Err(DomainError::validation(
                "fret range start must not exceed its end",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_round_trips_camel_case() {
        let preset = FretboardPreset::new("Standard");
        let json = serde_json::to_value(&preset).unwrap();
        assert_eq!(json["name"], "Standard");
        assert_eq!(json["anchorModeEnabled"], false);
        assert_eq!(json["fretRangeEnd"], 12);
        let back: FretboardPreset = serde_json::from_value(json).unwrap();
        assert_eq!(back, preset);
    }

    #[test]
    fn validation_rejects_inverted_ranges() {
        let mut preset = FretboardPreset::new("Drop D");
        assert!(preset.validate().is_ok());
        preset.fret_range_start = 15;
        assert!(preset.validate().is_err());
        assert!(FretboardPreset::new("  ").validate().is_err());
    }
}
