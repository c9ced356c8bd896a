//! Data model for partwise score documents
//!
//! The graph runs `ScorePartwise` → `Part` → `Measure` → measure entries.
//! Measure entries and note payloads are tagged enums; order inside a
//! measure is part of the data.

pub mod attributes;
pub mod barline;
pub mod common;
pub mod direction;
pub mod harmony;
pub mod layout;
pub mod measure;
pub mod notations;
pub mod note;
pub mod score;

// Re-export commonly used types
pub use measure::{Backup, Forward, Measure, MeasureEntry, Part};
pub use note::{Note, NoteKind, Pitch, Step};
pub use score::{PartList, PartListEntry, ScorePart, ScorePartwise};
