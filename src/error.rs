//! Error types shared across the crate
//!
//! Model and theory failures are deterministic and never retried; XML
//! failures abort the read or write that produced them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A step lookup key was not one of the seven natural letters.
    #[error("{0} is not a valid step")]
    InvalidStep(String),

    /// The XML text is malformed.
    #[error("invalid xml: {0}")]
    Xml(String),

    /// Well-formed XML, but not a partwise score document.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// A required element is missing from an otherwise valid document.
    #[error("missing required element: {0}")]
    MissingElement(String),

    /// A secondary-staff note was added to a measure with no backup entry
    /// to anchor it.
    #[error("measure has no backup entry to anchor a secondary-staff note")]
    MissingBackup,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
