//! Score root: header metadata, part list, and parts

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::common::{Font, StartStop};
use crate::models::layout::{Appearance, PageLayout, Scaling, StaffLayout, SystemLayout};
use crate::models::measure::Part;

/// The root of a partwise score document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePartwise {
    pub version: String,
    pub work: Option<Work>,
    pub movement_number: Option<String>,
    pub movement_title: Option<String>,
    pub identification: Option<Identification>,
    pub defaults: Option<Defaults>,
    pub credits: Vec<Credit>,
    pub part_list: PartList,
    pub parts: Vec<Part>,
}

impl ScorePartwise {
    pub fn new() -> ScorePartwise {
        ScorePartwise {
            version: "2.0".to_string(),
            work: None,
            movement_number: None,
            movement_title: None,
            identification: None,
            defaults: None,
            credits: Vec::new(),
            part_list: PartList::default(),
            parts: Vec::new(),
        }
    }

    /// Parse a partwise score from XML text.
    pub fn from_xml(xml: &str) -> Result<ScorePartwise> {
        crate::xml::read_document(xml)
    }

    /// Render the score as XML text with the partwise DOCTYPE header.
    pub fn to_xml(&self) -> String {
        crate::xml::write_document(self)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<ScorePartwise> {
        let text = fs::read_to_string(path)?;
        ScorePartwise::from_xml(&text)
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_xml())?;
        Ok(())
    }
}

impl Default for ScorePartwise {
    fn default() -> Self {
        ScorePartwise::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Work {
    pub work_number: Option<String>,
    pub work_title: Option<String>,
    /// Link to the opus document this work belongs to.
    pub opus: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    pub creators: Vec<Creator>,
    pub rights: Vec<String>,
    pub encoding: Option<Encoding>,
    pub source: Option<String>,
    pub miscellaneous: Vec<MiscellaneousField>,
}

/// A creator credit; `creator_type` is "composer", "lyricist", and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub creator_type: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    pub software: Vec<String>,
    pub encoding_date: Option<String>,
    pub supports: Vec<Supports>,
}

/// Declares whether the encoder supports a given element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supports {
    pub element: String,
    pub supported: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiscellaneousField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    pub scaling: Option<Scaling>,
    pub page_layout: Option<PageLayout>,
    pub system_layout: Option<SystemLayout>,
    pub staff_layouts: Vec<StaffLayout>,
    pub appearance: Option<Appearance>,
    pub music_font: Option<Font>,
    pub word_font: Option<Font>,
    pub lyric_fonts: Vec<Font>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credit {
    pub page: Option<u32>,
    pub credit_types: Vec<String>,
    pub credit_words: Vec<CreditWords>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditWords {
    pub text: String,
    pub default_x: Option<f32>,
    pub default_y: Option<f32>,
    pub font_size: Option<String>,
    pub justify: Option<String>,
}

/// Ordered part-list entries: score-parts interleaved with group
/// start/stop markers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartList {
    pub entries: Vec<PartListEntry>,
}

impl PartList {
    /// The score-part declarations, skipping group markers.
    pub fn score_parts(&self) -> impl Iterator<Item = &ScorePart> {
        self.entries.iter().filter_map(|entry| match entry {
            PartListEntry::ScorePart(part) => Some(part),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PartListEntry {
    PartGroup(PartGroup),
    ScorePart(ScorePart),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartGroup {
    pub group_type: StartStop,
    pub number: Option<String>,
    pub group_name: Option<String>,
    pub group_symbol: Option<GroupSymbol>,
    pub group_barline: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupSymbol {
    None,
    Brace,
    Line,
    Bracket,
}

impl GroupSymbol {
    pub fn name(self) -> &'static str {
        match self {
            GroupSymbol::None => "none",
            GroupSymbol::Brace => "brace",
            GroupSymbol::Line => "line",
            GroupSymbol::Bracket => "bracket",
        }
    }

    pub fn from_name(s: &str) -> Option<GroupSymbol> {
        match s {
            "none" => Some(GroupSymbol::None),
            "brace" => Some(GroupSymbol::Brace),
            "line" => Some(GroupSymbol::Line),
            "bracket" => Some(GroupSymbol::Bracket),
            _ => None,
        }
    }
}

/// Declares one part: its id, display names, and instruments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePart {
    pub id: String,
    pub part_name: String,
    pub part_abbreviation: Option<String>,
    pub score_instruments: Vec<ScoreInstrument>,
    pub midi_instruments: Vec<MidiInstrument>,
}

impl ScorePart {
    pub fn new(id: impl Into<String>, part_name: impl Into<String>) -> ScorePart {
        ScorePart {
            id: id.into(),
            part_name: part_name.into(),
            part_abbreviation: None,
            score_instruments: Vec::new(),
            midi_instruments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreInstrument {
    pub id: String,
    pub instrument_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MidiInstrument {
    pub id: String,
    pub midi_channel: Option<u8>,
    pub midi_program: Option<u8>,
    pub volume: Option<f32>,
    pub pan: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_parts_skips_group_markers() {
        let mut list = PartList::default();
        list.entries.push(PartListEntry::PartGroup(PartGroup {
            group_type: StartStop::Start,
            number: None,
            group_name: None,
            group_symbol: Some(GroupSymbol::Bracket),
            group_barline: None,
        }));
        list.entries.push(PartListEntry::ScorePart(ScorePart::new("P1", "Voice")));
        list.entries.push(PartListEntry::PartGroup(PartGroup {
            group_type: StartStop::Stop,
            number: None,
            group_name: None,
            group_symbol: None,
            group_barline: None,
        }));

        let ids: Vec<&str> = list.score_parts().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["P1"]);
    }
}
