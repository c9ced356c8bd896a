//! Note model and in-place mutation rules
//!
//! A note is pitched, a rest, or unpitched, and the three shapes are carried
//! by the [`NoteKind`] enum so the tag and payload can never disagree. The
//! pitched shape owns a cached MIDI number that is recomputed on every pitch
//! write and is never authoritative; the written pitch is.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::common::{Placement, StartStop};
use crate::models::notations::Notations;
use crate::theory::midi;

/// One of the seven natural note letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Step {
    /// The letter used as the lookup key in the chromatic step table.
    pub fn letter(self) -> &'static str {
        match self {
            Step::A => "A",
            Step::B => "B",
            Step::C => "C",
            Step::D => "D",
            Step::E => "E",
            Step::F => "F",
            Step::G => "G",
        }
    }

    /// Parse a step letter, rejecting anything outside A..G.
    pub fn from_letter(s: &str) -> Result<Step> {
        match s {
            "A" => Ok(Step::A),
            "B" => Ok(Step::B),
            "C" => Ok(Step::C),
            "D" => Ok(Step::D),
            "E" => Ok(Step::E),
            "F" => Ok(Step::F),
            "G" => Ok(Step::G),
            other => Err(Error::InvalidStep(other.to_string())),
        }
    }
}

/// Written pitch: step letter, semitone alteration, octave.
///
/// `alter` is a signed semitone offset; ±1 and ±2 cover sharps, flats and
/// their doubles, fractional values carry microtonal alterations. Octave 4
/// starts at middle C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pitch {
    pub step: Step,
    pub alter: f32,
    pub octave: i8,
}

impl Pitch {
    pub fn new(step: Step, alter: f32, octave: i8) -> Pitch {
        Pitch { step, alter, octave }
    }

    /// A natural pitch at the given octave.
    pub fn natural(step: Step, octave: i8) -> Pitch {
        Pitch::new(step, 0.0, octave)
    }
}

/// Pitch payload plus its derived MIDI number.
///
/// The MIDI field is a cache: it is computed when the payload is built and
/// there is no way to set it independently of the pitch.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchedNote {
    pitch: Pitch,
    midi: i32,
}

impl PitchedNote {
    pub fn new(pitch: Pitch) -> Result<PitchedNote> {
        let midi = midi::midi_lookup(&pitch)?;
        Ok(PitchedNote { pitch, midi })
    }

    pub fn pitch(&self) -> &Pitch {
        &self.pitch
    }

    pub fn midi(&self) -> i32 {
        self.midi
    }
}

// The cache is rebuilt on load so the written pitch stays authoritative.
impl Serialize for PitchedNote {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.pitch.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PitchedNote {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let pitch = Pitch::deserialize(deserializer)?;
        PitchedNote::new(pitch).map_err(serde::de::Error::custom)
    }
}

/// Rest payload. `measure` marks a whole-measure rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rest {
    pub display_step: Option<Step>,
    pub display_octave: Option<i8>,
    pub measure: bool,
}

/// Unpitched payload for percussion staves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Unpitched {
    pub display_step: Option<Step>,
    pub display_octave: Option<i8>,
}

/// The three mutually exclusive shapes a note can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NoteKind {
    Pitched(PitchedNote),
    Rest(Rest),
    Unpitched(Unpitched),
}

/// Notated duration class, independent of the duration in divisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteTypeValue {
    TwoFiftySixth,
    OneTwentyEighth,
    SixtyFourth,
    ThirtySecond,
    Sixteenth,
    Eighth,
    Quarter,
    Half,
    Whole,
    Breve,
    Long,
}

impl NoteTypeValue {
    pub fn name(self) -> &'static str {
        match self {
            NoteTypeValue::TwoFiftySixth => "256th",
            NoteTypeValue::OneTwentyEighth => "128th",
            NoteTypeValue::SixtyFourth => "64th",
            NoteTypeValue::ThirtySecond => "32nd",
            NoteTypeValue::Sixteenth => "16th",
            NoteTypeValue::Eighth => "eighth",
            NoteTypeValue::Quarter => "quarter",
            NoteTypeValue::Half => "half",
            NoteTypeValue::Whole => "whole",
            NoteTypeValue::Breve => "breve",
            NoteTypeValue::Long => "long",
        }
    }

    pub fn from_name(s: &str) -> Option<NoteTypeValue> {
        match s {
            "256th" => Some(NoteTypeValue::TwoFiftySixth),
            "128th" => Some(NoteTypeValue::OneTwentyEighth),
            "64th" => Some(NoteTypeValue::SixtyFourth),
            "32nd" => Some(NoteTypeValue::ThirtySecond),
            "16th" => Some(NoteTypeValue::Sixteenth),
            "eighth" => Some(NoteTypeValue::Eighth),
            "quarter" => Some(NoteTypeValue::Quarter),
            "half" => Some(NoteTypeValue::Half),
            "whole" => Some(NoteTypeValue::Whole),
            "breve" => Some(NoteTypeValue::Breve),
            "long" => Some(NoteTypeValue::Long),
            _ => None,
        }
    }
}

/// Written accidental mark, distinct from the pitch alteration it depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accidental {
    Sharp,
    Natural,
    Flat,
    DoubleSharp,
    FlatFlat,
    QuarterSharp,
    QuarterFlat,
}

impl Accidental {
    pub fn name(self) -> &'static str {
        match self {
            Accidental::Sharp => "sharp",
            Accidental::Natural => "natural",
            Accidental::Flat => "flat",
            Accidental::DoubleSharp => "double-sharp",
            Accidental::FlatFlat => "flat-flat",
            Accidental::QuarterSharp => "quarter-sharp",
            Accidental::QuarterFlat => "quarter-flat",
        }
    }

    pub fn from_name(s: &str) -> Option<Accidental> {
        match s {
            "sharp" => Some(Accidental::Sharp),
            "natural" => Some(Accidental::Natural),
            "flat" => Some(Accidental::Flat),
            "double-sharp" => Some(Accidental::DoubleSharp),
            "flat-flat" => Some(Accidental::FlatFlat),
            "quarter-sharp" => Some(Accidental::QuarterSharp),
            "quarter-flat" => Some(Accidental::QuarterFlat),
            _ => None,
        }
    }
}

/// Tuplet ratio: `actual_notes` played in the time of `normal_notes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeModification {
    pub actual_notes: u32,
    pub normal_notes: u32,
    pub normal_type: Option<NoteTypeValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stem {
    Up,
    Down,
    None,
    Double,
}

impl Stem {
    pub fn name(self) -> &'static str {
        match self {
            Stem::Up => "up",
            Stem::Down => "down",
            Stem::None => "none",
            Stem::Double => "double",
        }
    }

    pub fn from_name(s: &str) -> Option<Stem> {
        match s {
            "up" => Some(Stem::Up),
            "down" => Some(Stem::Down),
            "none" => Some(Stem::None),
            "double" => Some(Stem::Double),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamValue {
    Begin,
    Continue,
    End,
    ForwardHook,
    BackwardHook,
}

impl BeamValue {
    pub fn name(self) -> &'static str {
        match self {
            BeamValue::Begin => "begin",
            BeamValue::Continue => "continue",
            BeamValue::End => "end",
            BeamValue::ForwardHook => "forward hook",
            BeamValue::BackwardHook => "backward hook",
        }
    }

    pub fn from_name(s: &str) -> Option<BeamValue> {
        match s {
            "begin" => Some(BeamValue::Begin),
            "continue" => Some(BeamValue::Continue),
            "end" => Some(BeamValue::End),
            "forward hook" => Some(BeamValue::ForwardHook),
            "backward hook" => Some(BeamValue::BackwardHook),
            _ => None,
        }
    }
}

/// One beam level; eighth-note beams are number 1, sixteenth 2, and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    pub number: u8,
    pub value: BeamValue,
}

/// Grace note marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grace {
    pub slash: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Syllabic {
    Single,
    Begin,
    End,
    Middle,
}

impl Syllabic {
    pub fn name(self) -> &'static str {
        match self {
            Syllabic::Single => "single",
            Syllabic::Begin => "begin",
            Syllabic::End => "end",
            Syllabic::Middle => "middle",
        }
    }

    pub fn from_name(s: &str) -> Option<Syllabic> {
        match s {
            "single" => Some(Syllabic::Single),
            "begin" => Some(Syllabic::Begin),
            "end" => Some(Syllabic::End),
            "middle" => Some(Syllabic::Middle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lyric {
    pub number: Option<String>,
    pub placement: Option<Placement>,
    pub syllabic: Option<Syllabic>,
    pub text: String,
    pub extend: bool,
}

/// A single note, rest, or unpitched event inside a measure.
///
/// The kind and duration fields are private so that rest↔pitch switching and
/// duration writes go through [`Note::set_pitch`] and [`Note::set_duration`],
/// which keep the cached MIDI number in sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    kind: NoteKind,
    /// Duration in the owning part's divisions unit. Opaque to this crate.
    duration: u32,
    pub chord: bool,
    pub grace: Option<Grace>,
    pub cue: bool,
    pub ties: Vec<StartStop>,
    pub voice: Option<String>,
    pub note_type: Option<NoteTypeValue>,
    pub dots: u8,
    pub accidental: Option<Accidental>,
    pub time_modification: Option<TimeModification>,
    pub stem: Option<Stem>,
    /// Notehead shape text, e.g. "normal", "diamond", "x".
    pub notehead: Option<String>,
    pub staff: Option<String>,
    pub beams: Vec<Beam>,
    pub notations: Vec<Notations>,
    pub lyrics: Vec<Lyric>,
    pub instrument: Option<String>,
    pub dynamics: Option<f32>,
    pub end_dynamics: Option<f32>,
    pub attack: Option<f32>,
    pub release: Option<f32>,
    pub pizzicato: Option<bool>,
}

impl Note {
    fn with_kind(kind: NoteKind, duration: u32) -> Note {
        Note {
            kind,
            duration,
            chord: false,
            grace: None,
            cue: false,
            ties: Vec::new(),
            voice: None,
            note_type: None,
            dots: 0,
            accidental: None,
            time_modification: None,
            stem: None,
            notehead: None,
            staff: None,
            beams: Vec::new(),
            notations: Vec::new(),
            lyrics: Vec::new(),
            instrument: None,
            dynamics: None,
            end_dynamics: None,
            attack: None,
            release: None,
            pizzicato: None,
        }
    }

    /// Build a pitched note; computes the MIDI cache up front.
    pub fn pitched(pitch: Pitch, duration: u32) -> Result<Note> {
        Ok(Note::with_kind(NoteKind::Pitched(PitchedNote::new(pitch)?), duration))
    }

    pub fn rest(duration: u32) -> Note {
        Note::with_kind(NoteKind::Rest(Rest::default()), duration)
    }

    pub fn unpitched(duration: u32) -> Note {
        Note::with_kind(NoteKind::Unpitched(Unpitched::default()), duration)
    }

    pub(crate) fn from_parts(kind: NoteKind, duration: u32) -> Note {
        Note::with_kind(kind, duration)
    }

    pub fn kind(&self) -> &NoteKind {
        &self.kind
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn is_rest(&self) -> bool {
        matches!(self.kind, NoteKind::Rest(_))
    }

    /// The written pitch, if this note is pitched.
    pub fn pitch(&self) -> Option<&Pitch> {
        match &self.kind {
            NoteKind::Pitched(p) => Some(p.pitch()),
            _ => None,
        }
    }

    /// The cached MIDI number, if this note is pitched.
    pub fn midi(&self) -> Option<i32> {
        match &self.kind {
            NoteKind::Pitched(p) => Some(p.midi()),
            _ => None,
        }
    }

    /// Replace the current payload with `pitch`, whatever shape the note had.
    ///
    /// A rest or unpitched payload becomes pitched; an existing pitch is
    /// overwritten. The MIDI cache is recomputed on every call. No other
    /// field is touched.
    pub fn set_pitch(&mut self, pitch: Pitch) -> Result<()> {
        self.kind = NoteKind::Pitched(PitchedNote::new(pitch)?);
        Ok(())
    }

    /// Overwrite the duration, leaving the payload untouched.
    pub fn set_duration(&mut self, duration: u32) {
        self.duration = duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitched_note_caches_midi() {
        let note = Note::pitched(Pitch::natural(Step::C, 4), 4).unwrap();
        assert_eq!(note.midi(), Some(60));
        assert_eq!(note.pitch().unwrap().step, Step::C);
    }

    #[test]
    fn test_set_pitch_on_rest_switches_kind_only() {
        let mut note = Note::rest(8);
        note.voice = Some("1".to_string());
        note.set_pitch(Pitch::new(Step::A, 0.0, 4)).unwrap();

        assert!(!note.is_rest());
        assert_eq!(note.midi(), Some(69));
        // Untouched fields survive the switch
        assert_eq!(note.duration(), 8);
        assert_eq!(note.voice.as_deref(), Some("1"));
    }

    #[test]
    fn test_set_pitch_recomputes_cache() {
        let mut note = Note::pitched(Pitch::natural(Step::C, 4), 4).unwrap();
        note.set_pitch(Pitch::new(Step::C, 1.0, 4)).unwrap();
        assert_eq!(note.midi(), Some(61));
    }

    #[test]
    fn test_set_duration() {
        let mut note = Note::rest(4);
        note.set_duration(16);
        assert_eq!(note.duration(), 16);
        assert!(note.is_rest());
    }

    #[test]
    fn test_step_from_letter_rejects_garbage() {
        assert!(matches!(Step::from_letter("H"), Err(Error::InvalidStep(_))));
        assert!(Step::from_letter("G").is_ok());
    }
}
