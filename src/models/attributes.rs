//! Measure attributes: divisions, key, time, clefs, transposition

use serde::{Deserialize, Serialize};

use crate::models::common::Mode;

/// The `<attributes>` entry. Every field is optional; an attributes entry
/// only restates what changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    /// Divisions per quarter note for all durations in this part. Opaque
    /// to the rest of the crate.
    pub divisions: Option<u32>,
    pub key: Option<Key>,
    pub time: Option<Time>,
    pub staves: Option<u32>,
    pub instruments: Option<u32>,
    pub clefs: Vec<Clef>,
    pub transpose: Option<Transpose>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Key {
    /// Position on the circle of fifths, flats negative.
    pub fifths: i8,
    pub mode: Option<Mode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Time {
    /// Textual to allow additive signatures like "3+2".
    pub beats: String,
    pub beat_type: String,
    pub senza_misura: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clef {
    /// Staff number in multi-staff parts.
    pub number: Option<u32>,
    pub sign: ClefSign,
    pub line: Option<u8>,
    pub clef_octave_change: Option<i8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClefSign {
    G,
    F,
    C,
    Percussion,
    Tab,
    None,
}

impl ClefSign {
    pub fn name(self) -> &'static str {
        match self {
            ClefSign::G => "G",
            ClefSign::F => "F",
            ClefSign::C => "C",
            ClefSign::Percussion => "percussion",
            ClefSign::Tab => "TAB",
            ClefSign::None => "none",
        }
    }

    pub fn from_name(s: &str) -> Option<ClefSign> {
        match s {
            "G" => Some(ClefSign::G),
            "F" => Some(ClefSign::F),
            "C" => Some(ClefSign::C),
            "percussion" => Some(ClefSign::Percussion),
            "TAB" => Some(ClefSign::Tab),
            "none" => Some(ClefSign::None),
            _ => None,
        }
    }
}

/// Written-to-sounding transposition for a transposing instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transpose {
    pub diatonic: Option<i8>,
    pub chromatic: i8,
    pub octave_change: Option<i8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clef_sign_names() {
        assert_eq!(ClefSign::from_name("G"), Some(ClefSign::G));
        assert_eq!(ClefSign::from_name("TAB"), Some(ClefSign::Tab));
        assert_eq!(ClefSign::from_name("X"), None);
        assert_eq!(ClefSign::Percussion.name(), "percussion");
    }
}
