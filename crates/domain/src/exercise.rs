use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::DomainError;

/// A chord or arpeggio shape played across the strings.
///
/// `structure[i]` lists the chord degrees fretted on string `i + 1`, in
/// playing order; an empty list leaves the string unplayed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(default, alias = "cordName")]
    pub chord_name: String,
    pub bass_string: u8,
    pub structure: Vec<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_string: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_string: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fifth_string: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seventh_string: Option<u8>,
}

impl Exercise {
    pub fn new(chord_name: impl Into<String>, bass_string: u8, structure: Vec<Vec<u8>>) -> Self {
        Self {
            chord_name: chord_name.into(),
            bass_string,
            structure,
            root_string: None,
            third_string: None,
            fifth_string: None,
            seventh_string: None,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let strings = self.structure.len();
        if self.bass_string == 0 || self.bass_string as usize > strings {
            return Err(DomainError::validation(format!(
                "bass string {} outside of {} strings",
                self.bass_string, strings
            )));
        }
        let degree_strings = [
            self.root_string,
            self.third_string,
            self.fifth_string,
            self.seventh_string,
        ];
        for string in degree_strings.into_iter().flatten() {
            if string == 0 || string as usize > strings {
                return Err(DomainError::validation(format!(
                    "degree string {} outside of {} strings",
                    string, strings
                )));
            }
        }
        Ok(())
    }
}

/// Named exercises in their declared order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExerciseTable {
    entries: Vec<(String, Exercise)>,
}

impl ExerciseTable {
    /// Exercises shipped with the trainer.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                (
                    "maj6/7 skipping".into(),
                    Exercise::new(
                        "6/7",
                        6,
                        vec![vec![1], vec![5], vec![6], vec![3], vec![5], vec![7, 1, 7]],
                    ),
                ),
                (
                    "root 7 chords (treble)".into(),
                    Exercise::new(
                        "7",
                        4,
                        vec![vec![], vec![], vec![1], vec![5], vec![7], vec![3]],
                    ),
                ),
                (
                    "root 7 chords (bass)".into(),
                    Exercise::new(
                        "7",
                        5,
                        vec![vec![], vec![1], vec![5], vec![7], vec![3], vec![]],
                    ),
                ),
            ],
        }
    }

    /// Parses a JSON object of `name -> exercise`, keeping key order and
    /// normalizing the field spellings found in older tables.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let table: ExerciseTable = serde_json::from_str(json)?;
        for (name, exercise) in &table.entries {
            exercise
                .validate()
                .map_err(|err| DomainError::validation(format!("{name}: {err}")))?;
        }
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&Exercise> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, exercise)| exercise)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Exercise)> {
        self.entries
            .iter()
            .map(|(name, exercise)| (name.as_str(), exercise))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for ExerciseTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = ExerciseTable;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of exercise names to exercises")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, Exercise)> = Vec::new();
                while let Some((name, exercise)) = access.next_entry::<String, Exercise>()? {
                    match entries.iter_mut().find(|(existing, _)| *existing == name) {
                        Some(slot) => slot.1 = exercise,
                        None => entries.push((name, exercise)),
                    }
                }
                Ok(ExerciseTable { entries })
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_valid() {
        let table = ExerciseTable::builtin();
        assert_eq!(table.len(), 3);
        for (_, exercise) in table.iter() {
            assert!(exercise.validate().is_ok());
        }
        let treble = table.get("root 7 chords (treble)").unwrap();
        assert_eq!(treble.bass_string, 4);
        assert!(treble.structure[0].is_empty());
        assert!(table.get("missing").is_none());
    }

    #[test]
    fn from_json_normalizes_legacy_keys_and_keeps_order() {
        let json = r#"{
            "z shape": { "cordName": "m7", "bassString": 2, "structure": [[1], [3]] },
            "a shape": { "bassString": 1, "structure": [[1], []], "rootString": 1 }
        }"#;
        let table = ExerciseTable::from_json(json).unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["z shape", "a shape"]);
        assert_eq!(table.get("z shape").unwrap().chord_name, "m7");
        let a = table.get("a shape").unwrap();
        assert_eq!(a.chord_name, "");
        assert_eq!(a.root_string, Some(1));
        assert_eq!(a.third_string, None);
    }

    #[test]
    fn from_json_rejects_bass_string_out_of_range() {
        let json = r#"{ "bad": { "chordName": "7", "bassString": 9, "structure": [[1]] } }"#;
        let err = ExerciseTable::from_json(json).unwrap_err();
        assert!(err.to_string().contains("bad"));
    }
}
