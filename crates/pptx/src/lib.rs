//! PPTX (Office Open XML) backend for slide decks.
//!
//! Writes a [`deck_core::Document`] as a .pptx package and reads packages
//! back for inspection.

mod parts;
pub mod parser;
pub mod templates;
pub mod writer;

pub use parser::{ExtractedDeck, ExtractedSlide, PptxParser, SlideText};
pub use writer::PptxWriter;

use std::borrow::Cow;

/// Escape text for XML content and attribute values.
pub(crate) fn escape(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(raw)
}
