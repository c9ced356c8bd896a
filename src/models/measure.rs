//! Parts, measures, and the ordered measure entry sequence
//!
//! A measure owns a heterogeneous sequence of entries whose order carries
//! meaning: notes and forwards consume time, a backup moves the implied
//! time cursor backward so a later voice or staff can be laid down against
//! the same beats.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::attributes::Attributes;
use crate::models::barline::Barline;
use crate::models::common::StartStopSingle;
use crate::models::direction::{Direction, Sound};
use crate::models::harmony::{FiguredBass, Harmony};
use crate::models::layout::Print;
use crate::models::note::Note;

/// One instrumental part: an id matching a part-list entry plus its
/// measures, owned exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: String,
    pub measures: Vec<Measure>,
}

impl Part {
    pub fn new(id: impl Into<String>) -> Part {
        Part { id: id.into(), measures: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    /// Display number; "X1" style numbers appear in some scores, so this
    /// stays textual.
    pub number: String,
    pub width: Option<f32>,
    pub implicit: bool,
    pub entries: Vec<MeasureEntry>,
}

/// Everything a measure can contain, in document order. Closed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeasureEntry {
    Attributes(Attributes),
    Backup(Backup),
    Barline(Barline),
    Bookmark(Bookmark),
    Direction(Direction),
    FiguredBass(FiguredBass),
    Forward(Forward),
    Grouping(Grouping),
    Harmony(Harmony),
    Link(Link),
    Note(Note),
    Print(Print),
    Sound(Sound),
}

/// Moves the time cursor backward by `duration` divisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backup {
    pub duration: u32,
}

/// Moves the time cursor forward without sounding anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forward {
    pub duration: u32,
    pub voice: Option<String>,
    pub staff: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grouping {
    pub grouping_type: StartStopSingle,
    pub number: Option<String>,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub feature_type: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub name: Option<String>,
    pub element: Option<String>,
    pub position: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub name: Option<String>,
}

impl Measure {
    pub fn new(number: impl Into<String>) -> Measure {
        Measure {
            number: number.into(),
            width: None,
            implicit: false,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: MeasureEntry) {
        self.entries.push(entry);
    }

    /// The measure's notes in document order.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.entries.iter().filter_map(|entry| match entry {
            MeasureEntry::Note(note) => Some(note),
            _ => None,
        })
    }

    pub fn notes_mut(&mut self) -> impl Iterator<Item = &mut Note> {
        self.entries.iter_mut().filter_map(|entry| match entry {
            MeasureEntry::Note(note) => Some(note),
            _ => None,
        })
    }

    /// Append a note, anchoring secondary staves behind the backup marker.
    ///
    /// A note on staff "1" (or with no staff) goes at the end of the
    /// sequence. Any other staff means a layered voice: the measure is cut
    /// back to its first backup entry and the note is appended right after
    /// it. Entries after that backup are dropped for good. Fails with
    /// [`Error::MissingBackup`] when a secondary-staff note arrives and no
    /// backup exists to anchor it.
    pub fn add_note(&mut self, note: Note) -> Result<()> {
        let primary = note.staff.as_deref().map_or(true, |s| s == "1");
        if primary {
            self.entries.push(MeasureEntry::Note(note));
            return Ok(());
        }

        let anchor = self
            .entries
            .iter()
            .position(|entry| matches!(entry, MeasureEntry::Backup(_)))
            .ok_or(Error::MissingBackup)?;

        let dropped = self.entries.len() - (anchor + 1);
        if dropped > 0 {
            debug!(
                "measure {}: dropping {} entries after backup anchor",
                self.number, dropped
            );
        }
        self.entries.truncate(anchor + 1);
        self.entries.push(MeasureEntry::Note(note));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::note::{Note, Pitch, Step};

    fn staffed(staff: &str, midi_step: Step) -> Note {
        let mut note = Note::pitched(Pitch::natural(midi_step, 4), 4).unwrap();
        note.staff = Some(staff.to_string());
        note
    }

    #[test]
    fn test_add_note_primary_staff_appends() {
        let mut measure = Measure::new("1");
        measure.push(MeasureEntry::Backup(Backup { duration: 4 }));
        measure.add_note(staffed("1", Step::C)).unwrap();

        // Nothing truncated, note lands at the end
        assert_eq!(measure.entries.len(), 2);
        assert!(matches!(measure.entries[1], MeasureEntry::Note(_)));
    }

    #[test]
    fn test_add_note_without_staff_appends() {
        let mut measure = Measure::new("1");
        measure
            .add_note(Note::pitched(Pitch::natural(Step::C, 4), 4).unwrap())
            .unwrap();
        assert_eq!(measure.entries.len(), 1);
    }

    #[test]
    fn test_add_note_secondary_staff_truncates_after_first_backup() {
        let mut measure = Measure::new("1");
        measure.add_note(staffed("1", Step::C)).unwrap();
        measure.push(MeasureEntry::Backup(Backup { duration: 4 }));
        measure.add_note(staffed("1", Step::E)).unwrap();
        measure.push(MeasureEntry::Backup(Backup { duration: 4 }));
        measure.add_note(staffed("1", Step::G)).unwrap();
        assert_eq!(measure.entries.len(), 5);

        measure.add_note(staffed("2", Step::A)).unwrap();

        // Cut back to the first backup; the later backup and notes are gone
        assert_eq!(measure.entries.len(), 3);
        assert!(matches!(measure.entries[0], MeasureEntry::Note(_)));
        assert!(matches!(measure.entries[1], MeasureEntry::Backup(_)));
        match &measure.entries[2] {
            MeasureEntry::Note(note) => assert_eq!(note.staff.as_deref(), Some("2")),
            other => panic!("expected note, got {:?}", other),
        }
    }

    #[test]
    fn test_add_note_secondary_staff_without_backup_fails() {
        let mut measure = Measure::new("1");
        measure.add_note(staffed("1", Step::C)).unwrap();

        let err = measure.add_note(staffed("2", Step::A)).unwrap_err();
        assert!(matches!(err, Error::MissingBackup));
        // The measure is untouched on failure
        assert_eq!(measure.entries.len(), 1);
    }

    #[test]
    fn test_notes_iterates_in_document_order() {
        let mut measure = Measure::new("1");
        measure.add_note(staffed("1", Step::C)).unwrap();
        measure.push(MeasureEntry::Backup(Backup { duration: 4 }));
        measure.add_note(staffed("1", Step::G)).unwrap();

        let midis: Vec<i32> = measure.notes().filter_map(|n| n.midi()).collect();
        assert_eq!(midis, vec![60, 67]);
    }
}
