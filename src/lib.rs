//! Typed object model for MusicXML "partwise" scores
//!
//! The crate has three layers:
//!
//! - **models**: the score graph (`ScorePartwise` → `Part` → `Measure` →
//!   measure entries), where each measure holds an ordered heterogeneous
//!   sequence of entries and a note is a tagged pitched/rest/unpitched value.
//! - **theory**: pitch ↔ MIDI mapping and interval classification.
//! - **xml**: MusicXML 2.0 partwise reading and writing.

pub mod error;
pub mod models;
pub mod theory;
pub mod xml;

// Re-export the types most callers need
pub use error::{Error, Result};
pub use models::measure::{Backup, Forward, Measure, MeasureEntry, Part};
pub use models::note::{Note, NoteKind, Pitch, Step};
pub use models::score::ScorePartwise;
pub use theory::interval::{Interval, Quality};
