//! Pitch ↔ MIDI note number mapping
//!
//! The forward direction looks the step letter up in a string-keyed
//! chromatic table and indexes a fixed octave-band matrix; the reverse
//! direction always spells black keys as sharps of the natural below. The
//! reverse spelling is lossy (Db comes back as C#), but re-encoding a
//! spelled pitch reproduces the same MIDI number.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::models::note::{Pitch, Step};

/// Semitone position of each chromatic step within one octave.
///
/// Keyed by string so a malformed key fails the lookup explicitly instead
/// of being defaulted.
static STEP_SEMITONES: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    HashMap::from([
        ("C", 0),
        ("C#", 1),
        ("D", 2),
        ("D#", 3),
        ("E", 4),
        ("F", 5),
        ("F#", 6),
        ("G", 7),
        ("G#", 8),
        ("A", 9),
        ("A#", 10),
        ("B", 11),
    ])
});

/// MIDI numbers by `[octave band][semitone]`.
///
/// Eleven bands of twelve semitones spanning 0..=131. Band 5 is the
/// middle-C row (60); written octave 4 selects it because the band index is
/// `octave + 1`. The table runs four semitones past the 0-127 wire range,
/// and callers rely on those top values being reachable.
const MIDI_TABLE: [[i32; 12]; 11] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
    [12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23],
    [24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35],
    [36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 47],
    [48, 49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 59],
    [60, 61, 62, 63, 64, 65, 66, 67, 68, 69, 70, 71],
    [72, 73, 74, 75, 76, 77, 78, 79, 80, 81, 82, 83],
    [84, 85, 86, 87, 88, 89, 90, 91, 92, 93, 94, 95],
    [96, 97, 98, 99, 100, 101, 102, 103, 104, 105, 106, 107],
    [108, 109, 110, 111, 112, 113, 114, 115, 116, 117, 118, 119],
    [120, 121, 122, 123, 124, 125, 126, 127, 128, 129, 130, 131],
];

/// MIDI number for a step key, alteration, and written octave.
///
/// The octave must lie in -1..=9 (the table's eleven bands); a step key
/// outside the chromatic table fails with [`Error::InvalidStep`]. A
/// fractional alteration truncates toward zero in the final conversion.
pub fn midi_for(step: &str, alter: f32, octave: i8) -> Result<i32> {
    let semitone = *STEP_SEMITONES
        .get(step)
        .ok_or_else(|| Error::InvalidStep(step.to_string()))?;
    let band = (octave + 1) as usize;
    let base = MIDI_TABLE[band][semitone];
    Ok((base as f32 + alter) as i32)
}

/// MIDI number for a written pitch.
pub fn midi_lookup(pitch: &Pitch) -> Result<i32> {
    midi_for(pitch.step.letter(), pitch.alter, pitch.octave)
}

/// Spell a MIDI number as (step, alteration, octave).
///
/// Black keys come back as sharps, never flats.
pub fn step_octave_for_midi(midi: i32) -> (Step, f32, i8) {
    let (step, alter) = match midi.rem_euclid(12) {
        0 => (Step::C, 0.0),
        1 => (Step::C, 1.0),
        2 => (Step::D, 0.0),
        3 => (Step::D, 1.0),
        4 => (Step::E, 0.0),
        5 => (Step::F, 0.0),
        6 => (Step::F, 1.0),
        7 => (Step::G, 0.0),
        8 => (Step::G, 1.0),
        9 => (Step::A, 0.0),
        10 => (Step::A, 1.0),
        _ => (Step::B, 0.0),
    };
    let octave = (midi.div_euclid(12) - 1) as i8;
    (step, alter, octave)
}

/// Spell a MIDI number as a [`Pitch`].
pub fn pitch_for_midi(midi: i32) -> Pitch {
    let (step, alter, octave) = step_octave_for_midi(midi);
    Pitch::new(step, alter, octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midi_lookup_naturals() {
        assert_eq!(midi_lookup(&Pitch::natural(Step::C, 4)).unwrap(), 60);
        assert_eq!(midi_lookup(&Pitch::natural(Step::D, 4)).unwrap(), 62);
        assert_eq!(midi_lookup(&Pitch::natural(Step::E, 4)).unwrap(), 64);
        assert_eq!(midi_lookup(&Pitch::natural(Step::F, 4)).unwrap(), 65);
        assert_eq!(midi_lookup(&Pitch::natural(Step::G, 4)).unwrap(), 67);
        assert_eq!(midi_lookup(&Pitch::natural(Step::A, 4)).unwrap(), 69);
        assert_eq!(midi_lookup(&Pitch::natural(Step::B, 4)).unwrap(), 71);
    }

    #[test]
    fn test_midi_lookup_alterations() {
        assert_eq!(midi_lookup(&Pitch::new(Step::C, 1.0, 4)).unwrap(), 61);
        assert_eq!(midi_lookup(&Pitch::new(Step::D, -1.0, 4)).unwrap(), 61);
        assert_eq!(midi_lookup(&Pitch::new(Step::C, 2.0, 4)).unwrap(), 62);
        assert_eq!(midi_lookup(&Pitch::new(Step::B, 0.0, 3)).unwrap(), 59);
    }

    #[test]
    fn test_midi_lookup_octave_bands() {
        // Band 0 starts at written octave -1
        assert_eq!(midi_lookup(&Pitch::natural(Step::C, -1)).unwrap(), 0);
        assert_eq!(midi_lookup(&Pitch::natural(Step::A, 0)).unwrap(), 21);
        // The top band runs past the 0-127 wire range
        assert_eq!(midi_lookup(&Pitch::natural(Step::B, 9)).unwrap(), 131);
        assert_eq!(midi_lookup(&Pitch::natural(Step::G, 9)).unwrap(), 127);
    }

    #[test]
    fn test_midi_for_rejects_bad_step() {
        assert!(matches!(midi_for("H", 0.0, 4), Err(Error::InvalidStep(_))));
        assert!(matches!(midi_for("c", 0.0, 4), Err(Error::InvalidStep(_))));
        // Chromatic keys are valid table entries in their own right
        assert_eq!(midi_for("C#", 0.0, 4).unwrap(), 61);
    }

    #[test]
    fn test_sharp_only_spelling() {
        let (step, alter, octave) = step_octave_for_midi(61);
        assert_eq!((step, alter, octave), (Step::C, 1.0, 4));

        let (step, alter, octave) = step_octave_for_midi(70);
        assert_eq!((step, alter, octave), (Step::A, 1.0, 4));

        let (step, alter, octave) = step_octave_for_midi(60);
        assert_eq!((step, alter, octave), (Step::C, 0.0, 4));
    }

    #[test]
    fn test_midi_to_pitch_to_midi_is_idempotent() {
        for midi in 0..=131 {
            let pitch = pitch_for_midi(midi);
            assert_eq!(midi_lookup(&pitch).unwrap(), midi, "midi {}", midi);
        }
    }

    #[test]
    fn test_fractional_alter_truncates() {
        assert_eq!(midi_lookup(&Pitch::new(Step::C, 0.5, 4)).unwrap(), 60);
        assert_eq!(midi_lookup(&Pitch::new(Step::C, 1.5, 4)).unwrap(), 61);
    }
}
