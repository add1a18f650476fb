//! PPTX package writer.

use crate::parts;
use crate::templates;
use deck_core::{Document, Error, Result};
use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writer for PPTX (Office Open XML) packages.
pub struct PptxWriter {
    application: String,
    font: String,
}

impl PptxWriter {
    /// Create a writer with the default application name and theme font.
    pub fn new() -> Self {
        Self {
            application: env!("CARGO_PKG_NAME").to_string(),
            font: "Calibri".to_string(),
        }
    }

    /// Set the application name recorded in the package properties.
    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = application.into();
        self
    }

    /// Set the theme font.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Serialize the document into a writer.
    pub fn write<W: Write + Seek>(&self, doc: &Document, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut put = |path: &str, content: String| -> Result<()> {
            log::debug!("Writing part {} ({} bytes)", path, content.len());
            zip.start_file(path, options)
                .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", path, e)))?;
            zip.write_all(content.as_bytes())
                .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", path, e)))?;
            Ok(())
        };

        put("[Content_Types].xml", parts::content_types_xml(doc)?)?;
        put("_rels/.rels", parts::root_rels_xml()?)?;
        put("docProps/core.xml", parts::core_props_xml(doc, &self.application)?)?;
        put("docProps/app.xml", parts::app_props_xml(doc, &self.application)?)?;

        put("ppt/presentation.xml", parts::presentation_xml(doc)?)?;
        put(
            "ppt/_rels/presentation.xml.rels",
            parts::presentation_rels_xml(doc)?,
        )?;
        put("ppt/presProps.xml", templates::pres_props_xml())?;
        put("ppt/viewProps.xml", templates::view_props_xml())?;
        put("ppt/tableStyles.xml", templates::table_styles_xml())?;

        put(
            "ppt/theme/theme1.xml",
            templates::theme_xml("Office Theme", &self.font),
        )?;
        put(
            "ppt/theme/theme2.xml",
            templates::theme_xml("Notes Theme", &self.font),
        )?;
        put(
            "ppt/slideMasters/slideMaster1.xml",
            templates::slide_master_xml(),
        )?;
        put(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            parts::relationships_xml(&[
                parts::Relationship::new(
                    1,
                    templates::rel::SLIDE_LAYOUT,
                    "../slideLayouts/slideLayout1.xml",
                ),
                parts::Relationship::new(2, templates::rel::THEME, "../theme/theme1.xml"),
            ])?,
        )?;
        put(
            "ppt/slideLayouts/slideLayout1.xml",
            templates::slide_layout_xml(),
        )?;
        put(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            parts::relationships_xml(&[parts::Relationship::new(
                1,
                templates::rel::SLIDE_MASTER,
                "../slideMasters/slideMaster1.xml",
            )])?,
        )?;
        put(
            "ppt/notesMasters/notesMaster1.xml",
            templates::notes_master_xml(),
        )?;
        put(
            "ppt/notesMasters/_rels/notesMaster1.xml.rels",
            parts::relationships_xml(&[parts::Relationship::new(
                1,
                templates::rel::THEME,
                "../theme/theme2.xml",
            )])?,
        )?;

        for slide in doc.slides() {
            let n = slide.number();
            put(&format!("ppt/slides/slide{}.xml", n), parts::slide_xml(slide)?)?;
            put(
                &format!("ppt/slides/_rels/slide{}.xml.rels", n),
                parts::slide_rels_xml(slide)?,
            )?;
            if slide.has_notes() {
                put(
                    &format!("ppt/notesSlides/notesSlide{}.xml", n),
                    parts::notes_slide_xml(slide)?,
                )?;
                put(
                    &format!("ppt/notesSlides/_rels/notesSlide{}.xml.rels", n),
                    parts::notes_rels_xml(slide)?,
                )?;
            }
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))
    }

    /// Serialize the document into an in-memory buffer.
    pub fn to_bytes(&self, doc: &Document) -> Result<Vec<u8>> {
        let cursor = self.write(doc, Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }

    /// Serialize the document to a file, returning the number of bytes
    /// written.
    ///
    /// The package is assembled in memory first, so a failure leaves no
    /// partial file behind.
    pub fn save(&self, doc: &Document, path: &Path) -> Result<u64> {
        let bytes = self.to_bytes(doc)?;
        let mut file = File::create(path)?;
        file.write_all(&bytes)?;
        log::info!(
            "Saved {} slides to {} ({} bytes)",
            doc.slide_count(),
            path.display(),
            bytes.len()
        );
        Ok(bytes.len() as u64)
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{DeckBuilder, Theme};
    use std::io::Read;
    use zip::ZipArchive;

    fn archive_names(bytes: Vec<u8>) -> Vec<String> {
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        archive.file_names().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_package_contains_required_parts() {
        let mut deck = DeckBuilder::new(Theme::default());
        deck.discussion_slide("?");
        let bytes = PptxWriter::new().to_bytes(&deck.finish()).unwrap();
        assert!(bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]));

        let names = archive_names(bytes);
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/notesMasters/notesMaster1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/_rels/slide1.xml.rels",
        ] {
            assert!(names.iter().any(|n| n == part), "missing {}", part);
        }
        assert!(!names.iter().any(|n| n.starts_with("ppt/notesSlides/")));
    }

    #[test]
    fn test_empty_document_still_valid() {
        let deck = DeckBuilder::new(Theme::default());
        let bytes = PptxWriter::new().to_bytes(&deck.finish()).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut presentation = String::new();
        archive
            .by_name("ppt/presentation.xml")
            .unwrap()
            .read_to_string(&mut presentation)
            .unwrap();
        assert!(!presentation.contains("sldIdLst"));
    }

    #[test]
    fn test_application_name_recorded() {
        let deck = DeckBuilder::new(Theme::default());
        let bytes = PptxWriter::new()
            .with_application("build-deck")
            .to_bytes(&deck.finish())
            .unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut app = String::new();
        archive
            .by_name("docProps/app.xml")
            .unwrap()
            .read_to_string(&mut app)
            .unwrap();
        assert!(app.contains("<Application>build-deck</Application>"));
    }
}
