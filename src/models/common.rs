//! Small enumerations shared by several element families
//!
//! Each enum mirrors a MusicXML attribute value set. The `name`/`from_name`
//! pairs are what the XML layer reads and writes; unknown names are handled
//! at the call site, not here.

use serde::{Deserialize, Serialize};

/// Vertical placement relative to the staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Above,
    Below,
}

impl Placement {
    pub fn name(self) -> &'static str {
        match self {
            Placement::Above => "above",
            Placement::Below => "below",
        }
    }

    pub fn from_name(s: &str) -> Option<Placement> {
        match s {
            "above" => Some(Placement::Above),
            "below" => Some(Placement::Below),
            _ => None,
        }
    }
}

/// Paired begin/end marker used by ties, slurs, wedges and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartStop {
    Start,
    Stop,
}

impl StartStop {
    pub fn name(self) -> &'static str {
        match self {
            StartStop::Start => "start",
            StartStop::Stop => "stop",
        }
    }

    pub fn from_name(s: &str) -> Option<StartStop> {
        match s {
            "start" => Some(StartStop::Start),
            "stop" => Some(StartStop::Stop),
            _ => None,
        }
    }
}

/// Begin/end marker with a middle state, for elements that may span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartStopContinue {
    Start,
    Stop,
    Continue,
}

impl StartStopContinue {
    pub fn name(self) -> &'static str {
        match self {
            StartStopContinue::Start => "start",
            StartStopContinue::Stop => "stop",
            StartStopContinue::Continue => "continue",
        }
    }

    pub fn from_name(s: &str) -> Option<StartStopContinue> {
        match s {
            "start" => Some(StartStopContinue::Start),
            "stop" => Some(StartStopContinue::Stop),
            "continue" => Some(StartStopContinue::Continue),
            _ => None,
        }
    }
}

/// Start/stop marker that also allows a self-contained single occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartStopSingle {
    Start,
    Stop,
    Single,
}

impl StartStopSingle {
    pub fn name(self) -> &'static str {
        match self {
            StartStopSingle::Start => "start",
            StartStopSingle::Stop => "stop",
            StartStopSingle::Single => "single",
        }
    }

    pub fn from_name(s: &str) -> Option<StartStopSingle> {
        match s {
            "start" => Some(StartStopSingle::Start),
            "stop" => Some(StartStopSingle::Stop),
            "single" => Some(StartStopSingle::Single),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpDown {
    Up,
    Down,
}

impl UpDown {
    pub fn name(self) -> &'static str {
        match self {
            UpDown::Up => "up",
            UpDown::Down => "down",
        }
    }

    pub fn from_name(s: &str) -> Option<UpDown> {
        match s {
            "up" => Some(UpDown::Up),
            "down" => Some(UpDown::Down),
            _ => None,
        }
    }
}

/// Repeat direction at a barline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackwardForward {
    Backward,
    Forward,
}

impl BackwardForward {
    pub fn name(self) -> &'static str {
        match self {
            BackwardForward::Backward => "backward",
            BackwardForward::Forward => "forward",
        }
    }

    pub fn from_name(s: &str) -> Option<BackwardForward> {
        match s {
            "backward" => Some(BackwardForward::Backward),
            "forward" => Some(BackwardForward::Forward),
            _ => None,
        }
    }
}

/// Key signature mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Major,
    Minor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Ionian,
    Locrian,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
            Mode::Dorian => "dorian",
            Mode::Phrygian => "phrygian",
            Mode::Lydian => "lydian",
            Mode::Mixolydian => "mixolydian",
            Mode::Aeolian => "aeolian",
            Mode::Ionian => "ionian",
            Mode::Locrian => "locrian",
        }
    }

    pub fn from_name(s: &str) -> Option<Mode> {
        match s {
            "major" => Some(Mode::Major),
            "minor" => Some(Mode::Minor),
            "dorian" => Some(Mode::Dorian),
            "phrygian" => Some(Mode::Phrygian),
            "lydian" => Some(Mode::Lydian),
            "mixolydian" => Some(Mode::Mixolydian),
            "aeolian" => Some(Mode::Aeolian),
            "ionian" => Some(Mode::Ionian),
            "locrian" => Some(Mode::Locrian),
            _ => None,
        }
    }
}

/// Font selection carried by defaults and credits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub font_family: Option<String>,
    pub font_size: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trips() {
        for v in [Placement::Above, Placement::Below] {
            assert_eq!(Placement::from_name(v.name()), Some(v));
        }
        for v in [StartStop::Start, StartStop::Stop] {
            assert_eq!(StartStop::from_name(v.name()), Some(v));
        }
        assert_eq!(Mode::from_name("major"), Some(Mode::Major));
        assert_eq!(Mode::from_name("xyz"), None);
    }
}
