//! Notations attached to notes: ties, slurs, tuplets, ornaments,
//! articulations, technical marks
//!
//! Ornament and articulation variants share one embedded [`Placed`] struct
//! for their placement attributes instead of any common base type; variant
//! specific fields sit alongside it.

use serde::{Deserialize, Serialize};

use crate::models::common::{Placement, StartStop, StartStopContinue, UpDown};

/// Placement attributes shared by most notation variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Placed {
    pub placement: Option<Placement>,
}

impl Placed {
    pub fn above() -> Placed {
        Placed { placement: Some(Placement::Above) }
    }

    pub fn below() -> Placed {
        Placed { placement: Some(Placement::Below) }
    }
}

/// One `<notations>` group on a note. A note may carry several groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notations {
    pub items: Vec<Notation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notation {
    Tied { tied_type: StartStopContinue },
    Slur { slur_type: StartStopContinue, number: u8, placed: Placed },
    Tuplet { tuplet_type: StartStop, number: Option<u8>, bracket: Option<bool> },
    Glissando { gliss_type: StartStop, text: Option<String> },
    Fermata { shape: Option<String>, inverted: bool },
    Arpeggiate { direction: Option<UpDown> },
    Ornaments(Vec<Ornament>),
    Articulations(Vec<Articulation>),
    Technical(Vec<Technical>),
}

/// Ornament marks. The mordent pair carries its trill attributes flattened
/// into [`MordentAttrs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Ornament {
    TrillMark(Placed),
    Turn(Placed),
    DelayedTurn(Placed),
    InvertedTurn(Placed),
    Shake(Placed),
    WavyLine { line_type: StartStopContinue, placed: Placed },
    Mordent(MordentAttrs),
    InvertedMordent(MordentAttrs),
    Schleifer(Placed),
    Tremolo { marks: u8 },
    AccidentalMark(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MordentAttrs {
    pub placed: Placed,
    /// A long mordent adds a second alternation.
    pub long: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Articulation {
    Accent(Placed),
    StrongAccent { placed: Placed, direction: UpDown },
    Staccato(Placed),
    Tenuto(Placed),
    DetachedLegato(Placed),
    Staccatissimo(Placed),
    Spiccato(Placed),
    Scoop(Placed),
    Plop(Placed),
    Doit(Placed),
    Falloff(Placed),
    BreathMark(Placed),
    Caesura(Placed),
    Stress(Placed),
    Unstress(Placed),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Technical {
    UpBow(Placed),
    DownBow(Placed),
    Harmonic(Placed),
    OpenString(Placed),
    ThumbPosition(Placed),
    Fingering { text: String, substitution: bool },
    Pluck(String),
    DoubleTongue(Placed),
    TripleTongue(Placed),
    Stopped(Placed),
    SnapPizzicato(Placed),
    Fret(u8),
    StringNumber(u8),
    Heel(Placed),
    Toe(Placed),
    Fingernails(Placed),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placed_constructors() {
        assert_eq!(Placed::above().placement, Some(Placement::Above));
        assert_eq!(Placed::default().placement, None);
    }

    #[test]
    fn test_notations_group_holds_mixed_items() {
        let notations = Notations {
            items: vec![
                Notation::Tied { tied_type: StartStopContinue::Start },
                Notation::Articulations(vec![Articulation::Staccato(Placed::above())]),
            ],
        };
        assert_eq!(notations.items.len(), 2);
    }
}
