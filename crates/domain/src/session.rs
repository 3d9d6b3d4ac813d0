use serde::{Deserialize, Serialize};

/// Stage of a pitch-matching practice round.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PitchPhase {
    Question,
    PlayingAnswer,
    PlayingHarmonic,
    #[default]
    Idle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_defaults_to_idle() {
        assert_eq!(PitchPhase::default(), PitchPhase::Idle);
        assert_eq!(
            serde_json::to_string(&PitchPhase::PlayingAnswer).unwrap(),
            "\"playingAnswer\""
        );
    }
}
