//! Harmony symbols, frames, and figured bass

use serde::{Deserialize, Serialize};

use crate::models::note::Step;

/// A chord symbol: root, kind, optional bass and degree alterations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Harmony {
    pub root: Option<Root>,
    /// Functional notation (e.g. "V7") as an alternative to a root.
    pub function: Option<String>,
    /// Kind value text, e.g. "major", "dominant", "minor-seventh".
    pub kind: String,
    pub bass: Option<Bass>,
    pub degrees: Vec<Degree>,
    pub frame: Option<Frame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Root {
    pub step: Step,
    pub alter: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bass {
    pub step: Step,
    pub alter: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Degree {
    pub value: u8,
    pub alter: Option<f32>,
    pub degree_type: DegreeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegreeType {
    Add,
    Alter,
    Subtract,
}

impl DegreeType {
    pub fn name(self) -> &'static str {
        match self {
            DegreeType::Add => "add",
            DegreeType::Alter => "alter",
            DegreeType::Subtract => "subtract",
        }
    }

    pub fn from_name(s: &str) -> Option<DegreeType> {
        match s {
            "add" => Some(DegreeType::Add),
            "alter" => Some(DegreeType::Alter),
            "subtract" => Some(DegreeType::Subtract),
            _ => None,
        }
    }
}

/// Fretboard diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub strings: u8,
    pub frets: u8,
    pub first_fret: Option<u8>,
    pub notes: Vec<FrameNote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameNote {
    pub string: u8,
    pub fret: u8,
    pub fingering: Option<String>,
}

/// Figured bass numbers under a note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiguredBass {
    pub figures: Vec<Figure>,
    pub duration: Option<u32>,
    pub parentheses: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub prefix: Option<String>,
    pub number: Option<String>,
    pub suffix: Option<String>,
}
