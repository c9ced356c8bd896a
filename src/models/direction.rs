//! Directions: dynamics, wedges, metronome marks, words, and playback hints

use serde::{Deserialize, Serialize};

use crate::models::common::{Placement, StartStop};
use crate::models::note::NoteTypeValue;

/// A `<direction>` measure entry: one or more direction-type payloads plus
/// optional placement, voice, staff, and an attached sound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    pub placement: Option<Placement>,
    pub direction_types: Vec<DirectionType>,
    /// Offset in divisions from the current position, for playback.
    pub offset: Option<i32>,
    pub voice: Option<String>,
    pub staff: Option<String>,
    pub sound: Option<Sound>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DirectionType {
    Words(FormattedText),
    Dynamics(Dynamics),
    Wedge(Wedge),
    Metronome(Metronome),
    Segno,
    Coda,
    Rehearsal(String),
    OctaveShift { shift_type: OctaveShiftType, size: u8 },
    Pedal { pedal_type: PedalType, line: bool },
    Dashes { dashes_type: StartStop, number: Option<u8> },
    Bracket { bracket_type: StartStop, number: Option<u8>, line_end: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedText {
    pub text: String,
    pub lang: Option<String>,
}

/// A run of dynamic marks, e.g. a lone `f` or a composite `sfp`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dynamics {
    pub marks: Vec<DynamicMark>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DynamicMark {
    Ppp,
    Pp,
    P,
    Mp,
    Mf,
    F,
    Ff,
    Fff,
    Sf,
    Sfz,
    Fp,
    Fz,
    Rf,
    Other(String),
}

impl DynamicMark {
    pub fn name(&self) -> &str {
        match self {
            DynamicMark::Ppp => "ppp",
            DynamicMark::Pp => "pp",
            DynamicMark::P => "p",
            DynamicMark::Mp => "mp",
            DynamicMark::Mf => "mf",
            DynamicMark::F => "f",
            DynamicMark::Ff => "ff",
            DynamicMark::Fff => "fff",
            DynamicMark::Sf => "sf",
            DynamicMark::Sfz => "sfz",
            DynamicMark::Fp => "fp",
            DynamicMark::Fz => "fz",
            DynamicMark::Rf => "rf",
            DynamicMark::Other(name) => name,
        }
    }

    pub fn from_name(s: &str) -> DynamicMark {
        match s {
            "ppp" => DynamicMark::Ppp,
            "pp" => DynamicMark::Pp,
            "p" => DynamicMark::P,
            "mp" => DynamicMark::Mp,
            "mf" => DynamicMark::Mf,
            "f" => DynamicMark::F,
            "ff" => DynamicMark::Ff,
            "fff" => DynamicMark::Fff,
            "sf" => DynamicMark::Sf,
            "sfz" => DynamicMark::Sfz,
            "fp" => DynamicMark::Fp,
            "fz" => DynamicMark::Fz,
            "rf" => DynamicMark::Rf,
            other => DynamicMark::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wedge {
    pub wedge_type: WedgeType,
    pub number: Option<u8>,
    pub spread: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WedgeType {
    Crescendo,
    Diminuendo,
    Stop,
}

impl WedgeType {
    pub fn name(self) -> &'static str {
        match self {
            WedgeType::Crescendo => "crescendo",
            WedgeType::Diminuendo => "diminuendo",
            WedgeType::Stop => "stop",
        }
    }

    pub fn from_name(s: &str) -> Option<WedgeType> {
        match s {
            "crescendo" => Some(WedgeType::Crescendo),
            "diminuendo" => Some(WedgeType::Diminuendo),
            "stop" => Some(WedgeType::Stop),
            _ => None,
        }
    }
}

/// Metronome mark: beat unit equals a per-minute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metronome {
    pub beat_unit: NoteTypeValue,
    pub beat_unit_dot: bool,
    /// Textual; scores write ranges like "100-110" here.
    pub per_minute: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OctaveShiftType {
    Up,
    Down,
    Stop,
    Continue,
}

impl OctaveShiftType {
    pub fn name(self) -> &'static str {
        match self {
            OctaveShiftType::Up => "up",
            OctaveShiftType::Down => "down",
            OctaveShiftType::Stop => "stop",
            OctaveShiftType::Continue => "continue",
        }
    }

    pub fn from_name(s: &str) -> Option<OctaveShiftType> {
        match s {
            "up" => Some(OctaveShiftType::Up),
            "down" => Some(OctaveShiftType::Down),
            "stop" => Some(OctaveShiftType::Stop),
            "continue" => Some(OctaveShiftType::Continue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PedalType {
    Start,
    Stop,
    Change,
    Continue,
}

impl PedalType {
    pub fn name(self) -> &'static str {
        match self {
            PedalType::Start => "start",
            PedalType::Stop => "stop",
            PedalType::Change => "change",
            PedalType::Continue => "continue",
        }
    }

    pub fn from_name(s: &str) -> Option<PedalType> {
        match s {
            "start" => Some(PedalType::Start),
            "stop" => Some(PedalType::Stop),
            "change" => Some(PedalType::Change),
            "continue" => Some(PedalType::Continue),
            _ => None,
        }
    }
}

/// Playback hints. Appears both inside directions and as its own measure
/// entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sound {
    pub tempo: Option<f32>,
    pub dynamics: Option<f32>,
    pub dacapo: bool,
    pub segno: Option<String>,
    pub coda: Option<String>,
    pub fine: Option<String>,
    pub tocoda: Option<String>,
    pub pizzicato: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_mark_names() {
        assert_eq!(DynamicMark::from_name("sfz"), DynamicMark::Sfz);
        assert_eq!(DynamicMark::Sfz.name(), "sfz");
        // Unknown marks are preserved, not dropped
        let other = DynamicMark::from_name("sffz");
        assert_eq!(other.name(), "sffz");
    }
}
