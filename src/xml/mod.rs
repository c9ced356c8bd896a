//! MusicXML 2.0 partwise reading and writing
//!
//! Reading walks a roxmltree DOM; unknown elements are skipped with a
//! debug trace so newer documents still load. Writing emits indented,
//! escaped XML with the fixed partwise DOCTYPE header.

mod read;
mod write;

pub use read::read_document;
pub use write::write_document;

pub(crate) const DOCTYPE: &str = "<!DOCTYPE score-partwise PUBLIC \
\"-//Recordare//DTD MusicXML 2.0 Partwise//EN\" \
\"http://www.musicxml.org/dtds/partwise.dtd\">";
