//! Interval classification between two MIDI note numbers
//!
//! The span is the generalized diatonic size (0 unison, 2 second, up to 8
//! octave), found by walking the cycle of natural letters from the lower
//! note to the upper. Quality compares the semitone distance against the
//! expected distance for that span; anything off the table collapses into
//! the diminished/augmented catch-all. Consonance is fully determined by
//! span and quality.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::note::{Pitch, Step};
use crate::theory::midi;

/// Interval quality. Diminished and augmented are not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    Perfect,
    Major,
    Minor,
    DiminishedAugmented,
}

/// A classified interval. Immutable once built; the consonance flag is
/// derived from span and quality and cannot be set independently, so the
/// type serializes but does not deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    span: u8,
    quality: Quality,
    consonant: bool,
}

/// Natural letters in ascending diatonic order, wrapping at the octave.
const LETTER_CYCLE: [Step; 7] = [
    Step::C,
    Step::D,
    Step::E,
    Step::F,
    Step::G,
    Step::A,
    Step::B,
];

fn cycle_index(step: Step) -> usize {
    match step {
        Step::C => 0,
        Step::D => 1,
        Step::E => 2,
        Step::F => 3,
        Step::G => 4,
        Step::A => 5,
        Step::B => 6,
    }
}

/// Count letter steps from `lower` up to `upper`, wrapping past B.
///
/// Equal letters count as unison-equivalent (0); otherwise the interval
/// number is one more than the steps walked.
fn diatonic_span(lower: Step, upper: Step) -> u8 {
    if lower == upper {
        return 0;
    }
    let mut idx = cycle_index(lower);
    let mut steps = 0u8;
    while LETTER_CYCLE[idx] != upper {
        idx = (idx + 1) % LETTER_CYCLE.len();
        steps += 1;
    }
    steps + 1
}

/// Expected semitone distances per span. Everything else is
/// diminished/augmented.
fn quality_for(span: u8, semitones: i32) -> Quality {
    match (span, semitones) {
        (0, 0) | (4, 5) | (5, 7) | (8, 12) => Quality::Perfect,
        (2, 2) | (3, 4) | (6, 9) | (7, 11) => Quality::Major,
        (2, 1) | (3, 3) | (6, 8) | (7, 10) => Quality::Minor,
        _ => Quality::DiminishedAugmented,
    }
}

/// Seconds and sevenths are the dissonant major/minor spans; perfect
/// intervals, the fourth included, are always consonant here.
fn consonant_for(span: u8, quality: Quality) -> bool {
    match quality {
        Quality::Perfect => true,
        Quality::DiminishedAugmented => false,
        Quality::Major | Quality::Minor => span != 2 && span != 7,
    }
}

impl Interval {
    fn from_parts(span: u8, quality: Quality) -> Interval {
        Interval {
            span,
            quality,
            consonant: consonant_for(span, quality),
        }
    }

    /// Classify the interval between two MIDI note numbers. Total over the
    /// table's range; argument order does not matter.
    pub fn between(a: i32, b: i32) -> Interval {
        if a == b {
            return Interval::from_parts(0, Quality::Perfect);
        }

        let distance = (b - a).abs();
        if distance == 12 {
            return Interval::from_parts(8, Quality::Perfect);
        }

        let (lower, upper) = if a < b { (a, b) } else { (b, a) };
        let (lower_step, _, _) = midi::step_octave_for_midi(lower);
        let (upper_step, _, _) = midi::step_octave_for_midi(upper);

        let span = diatonic_span(lower_step, upper_step);
        Interval::from_parts(span, quality_for(span, distance))
    }

    /// Classify the interval between two written pitches.
    pub fn between_pitches(a: &Pitch, b: &Pitch) -> Result<Interval> {
        Ok(Interval::between(midi::midi_lookup(a)?, midi::midi_lookup(b)?))
    }

    pub fn span(&self) -> u8 {
        self.span
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn is_consonant(&self) -> bool {
        self.consonant
    }

    /// Thirds and sixths of major or minor quality.
    pub fn is_imperfect_consonance(&self) -> bool {
        matches!(self.quality, Quality::Major | Quality::Minor)
            && (self.span == 3 || self.span == 6)
    }

    /// Perfect unisons and octaves, plus the fifth when `include_fifth` is
    /// set. The fourth is never included, whatever the flag says.
    pub fn is_perfect_consonance(&self, include_fifth: bool) -> bool {
        self.quality == Quality::Perfect
            && (self.span == 0 || self.span == 8 || (include_fifth && self.span == 5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unison() {
        let iv = Interval::between(60, 60);
        assert_eq!(iv.span(), 0);
        assert_eq!(iv.quality(), Quality::Perfect);
        assert!(iv.is_consonant());
    }

    #[test]
    fn test_octave() {
        let iv = Interval::between(60, 72);
        assert_eq!(iv.span(), 8);
        assert_eq!(iv.quality(), Quality::Perfect);
        assert!(iv.is_consonant());
    }

    #[test]
    fn test_major_third() {
        let iv = Interval::between(60, 64);
        assert_eq!(iv.span(), 3);
        assert_eq!(iv.quality(), Quality::Major);
        assert!(iv.is_consonant());
        assert!(iv.is_imperfect_consonance());
    }

    #[test]
    fn test_minor_third() {
        // D to F: both spell as naturals
        let iv = Interval::between(62, 65);
        assert_eq!(iv.span(), 3);
        assert_eq!(iv.quality(), Quality::Minor);
        assert!(iv.is_consonant());
    }

    #[test]
    fn test_sharp_spelling_narrows_the_letter_span() {
        // C up three semitones spells as D#, a second by letter, so the
        // classifier reads an augmented second rather than a minor third
        let iv = Interval::between(60, 63);
        assert_eq!(iv.span(), 2);
        assert_eq!(iv.quality(), Quality::DiminishedAugmented);
        assert!(!iv.is_consonant());
    }

    #[test]
    fn test_augmented_unison_is_dissonant() {
        // C to C#: same letter, one semitone, no table entry fits
        let iv = Interval::between(60, 61);
        assert_eq!(iv.quality(), Quality::DiminishedAugmented);
        assert!(!iv.is_consonant());
    }

    #[test]
    fn test_major_second_is_dissonant() {
        let iv = Interval::between(60, 62);
        assert_eq!(iv.span(), 2);
        assert_eq!(iv.quality(), Quality::Major);
        assert!(!iv.is_consonant());
    }

    #[test]
    fn test_sevenths_are_dissonant() {
        // D4 to C5: minor seventh across the letter wrap
        let minor = Interval::between(62, 72);
        assert_eq!(minor.span(), 7);
        assert_eq!(minor.quality(), Quality::Minor);
        assert!(!minor.is_consonant());

        let major = Interval::between(60, 71);
        assert_eq!(major.span(), 7);
        assert_eq!(major.quality(), Quality::Major);
        assert!(!major.is_consonant());
    }

    #[test]
    fn test_perfect_fourth_is_consonant() {
        let iv = Interval::between(60, 65);
        assert_eq!(iv.span(), 4);
        assert_eq!(iv.quality(), Quality::Perfect);
        assert!(iv.is_consonant());
    }

    #[test]
    fn test_tritone_is_dissonant() {
        // C to F#: a fourth by letter, six semitones
        let iv = Interval::between(60, 66);
        assert_eq!(iv.span(), 4);
        assert_eq!(iv.quality(), Quality::DiminishedAugmented);
        assert!(!iv.is_consonant());
    }

    #[test]
    fn test_perfect_consonance_flag_only_toggles_fifth() {
        let fifth = Interval::between(60, 67);
        assert!(fifth.is_perfect_consonance(true));
        assert!(!fifth.is_perfect_consonance(false));

        let fourth = Interval::between(60, 65);
        assert!(!fourth.is_perfect_consonance(true));
        assert!(!fourth.is_perfect_consonance(false));

        let octave = Interval::between(60, 72);
        assert!(octave.is_perfect_consonance(false));
    }

    #[test]
    fn test_argument_order_does_not_matter() {
        let up = Interval::between(60, 64);
        let down = Interval::between(64, 60);
        assert_eq!(up, down);
    }

    #[test]
    fn test_sixths() {
        let major = Interval::between(60, 69);
        assert_eq!(major.span(), 6);
        assert_eq!(major.quality(), Quality::Major);
        assert!(major.is_imperfect_consonance());

        // E4 to C5: minor sixth with natural letters on both ends
        let minor = Interval::between(64, 72);
        assert_eq!(minor.span(), 6);
        assert_eq!(minor.quality(), Quality::Minor);
        assert!(minor.is_consonant());
    }

    #[test]
    fn test_between_pitches() {
        use crate::models::note::Pitch;
        let c4 = Pitch::natural(Step::C, 4);
        let e4 = Pitch::natural(Step::E, 4);
        let iv = Interval::between_pitches(&c4, &e4).unwrap();
        assert_eq!(iv.span(), 3);
        assert_eq!(iv.quality(), Quality::Major);
    }
}
