//! Error types for deck construction and presentation packaging.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or packaging a slide deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A color value was neither a palette name nor a `#rrggbb` hex triple.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A shape was placed at a negative offset or given a negative extent.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The course script could not be decoded.
    #[error("Course script error: {0}")]
    ScriptError(String),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// Failed to format generated XML.
    #[error("XML formatting error")]
    FmtError(#[from] std::fmt::Error),

    /// A package is missing a part or references one that does not exist.
    #[error("Invalid or corrupted file: {0}")]
    CorruptedFile(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::ScriptError(e.to_string())
    }
}
