//! PPTX reader used to inspect generated packages: slide order, shape text,
//! and speaker notes.

use deck_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Text content read back from a presentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedDeck {
    /// Slides in presentation order.
    pub slides: Vec<ExtractedSlide>,
}

impl ExtractedDeck {
    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Every shape text of every slide, flattened in order.
    pub fn all_text(&self) -> Vec<&str> {
        self.slides
            .iter()
            .flat_map(|s| s.shapes.iter().map(|t| t.text.as_str()))
            .collect()
    }
}

/// A single slide read back from a package.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedSlide {
    /// 1-based position in the presentation.
    pub number: usize,

    /// Shapes carrying text, in z-order.
    pub shapes: Vec<SlideText>,

    /// Speaker-note paragraphs.
    pub notes: Vec<String>,
}

impl ExtractedSlide {
    /// Texts of the shapes, in z-order.
    pub fn texts(&self) -> Vec<&str> {
        self.shapes.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Text of one shape and its offset in EMU.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideText {
    /// Paragraphs joined with `\n`; line breaks also read as `\n`.
    pub text: String,
    pub x: i64,
    pub y: i64,
}

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPTX file from disk.
    pub fn open(&self, path: &Path) -> Result<ExtractedDeck> {
        let file = File::open(path)?;
        self.parse(BufReader::new(file))
    }

    /// Parse a PPTX package from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<ExtractedDeck> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut deck = ExtractedDeck::default();
        let slide_order = self.get_slide_order(&mut archive)?;
        log::debug!("Package lists {} slides", slide_order.len());

        for (idx, slide_path) in slide_order.iter().enumerate() {
            let slide = self.parse_slide(&mut archive, slide_path, idx + 1)?;
            deck.slides.push(slide);
        }

        Ok(deck)
    }

    /// Get the ordered list of slide part paths from the presentation
    /// relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels = self.read_relationships(archive, "ppt/_rels/presentation.xml.rels")?;

        let mut slides: Vec<(String, Option<usize>)> = rels
            .into_iter()
            .filter(|r| r.rel_type.ends_with("/slide"))
            .map(|r| {
                let order = extract_slide_number(&r.target).or_else(|| extract_slide_number(&r.id));
                (resolve_target("ppt", &r.target), order)
            })
            .collect();

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Parse a single slide and its notes, if any.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<ExtractedSlide> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let shapes = extract_shapes_from_xml(&content)?;

        let mut slide = ExtractedSlide {
            number: slide_number,
            ..Default::default()
        };
        for shape in shapes {
            let text = shape.paragraphs.join("\n");
            if !text.trim().is_empty() {
                slide.shapes.push(SlideText {
                    text,
                    x: shape.x,
                    y: shape.y,
                });
            }
        }

        if let Some(notes_path) = self.notes_path_for(archive, slide_path)? {
            match self.read_file_from_archive(archive, &notes_path) {
                Ok(notes) => {
                    slide.notes = extract_shapes_from_xml(&notes)?
                        .into_iter()
                        .flat_map(|s| s.paragraphs)
                        .collect();
                }
                Err(e) => {
                    log::warn!("Slide {} notes unreadable (continuing): {}", slide_number, e);
                }
            }
        }

        Ok(slide)
    }

    /// Find the notes part referenced by a slide's relationships.
    fn notes_path_for<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
    ) -> Result<Option<String>> {
        let (dir, file) = slide_path.rsplit_once('/').unwrap_or(("", slide_path));
        let rels_path = format!("{}/_rels/{}.rels", dir, file);
        if archive.by_name(&rels_path).is_err() {
            return Ok(None);
        }

        let rels = self.read_relationships(archive, &rels_path)?;
        Ok(rels
            .into_iter()
            .find(|r| r.rel_type.ends_with("/notesSlide"))
            .map(|r| resolve_target(dir, &r.target)))
    }

    /// Read all `Relationship` elements from a rels part.
    fn read_relationships<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<Vec<Relationship>> {
        let content = self.read_file_from_archive(archive, path)?;
        let mut reader = Reader::from_str(&content);
        let mut rels = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut rel = Relationship::default();
                    for attr in e.attributes().flatten() {
                        let value = String::from_utf8_lossy(&attr.value).to_string();
                        match attr.key.as_ref() {
                            b"Type" => rel.rel_type = value,
                            b"Target" => rel.target = value,
                            b"Id" => rel.id = value,
                            _ => {}
                        }
                    }
                    rels.push(rel);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships in '{}': {}",
                        path, e
                    )));
                }
                _ => {}
            }
        }

        Ok(rels)
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::CorruptedFile(format!("Part not found '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
struct Relationship {
    id: String,
    rel_type: String,
    target: String,
}

/// A shape's offset and paragraph texts.
#[derive(Debug, Default)]
struct ShapeInfo {
    paragraphs: Vec<String>,
    x: i64,
    y: i64,
}

/// Extract shapes with their paragraphs and offsets from slide or notes XML.
fn extract_shapes_from_xml(xml_content: &str) -> Result<Vec<ShapeInfo>> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml_content);

    let mut current_shape: Option<ShapeInfo> = None;
    let mut paragraph: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => current_shape = Some(ShapeInfo::default()),
                b"off" => read_offset(e, current_shape.as_mut()),
                b"p" if current_shape.is_some() => paragraph = Some(String::new()),
                b"t" => in_text = true,
                b"br" => {
                    if let Some(p) = paragraph.as_mut() {
                        p.push('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"off" => read_offset(e, current_shape.as_mut()),
                b"br" => {
                    if let Some(p) = paragraph.as_mut() {
                        p.push('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|err| Error::XmlError(format!("Bad text content: {}", err)))?;
                if let Some(p) = paragraph.as_mut() {
                    p.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"p" => {
                    if let (Some(shape), Some(text)) = (current_shape.as_mut(), paragraph.take()) {
                        shape.paragraphs.push(text);
                    }
                }
                b"sp" => {
                    if let Some(shape) = current_shape.take() {
                        shapes.push(shape);
                    }
                    paragraph = None;
                    in_text = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing slide XML: {}", e)));
            }
            _ => {}
        }
    }

    Ok(shapes)
}

/// Copy `x`/`y` from an `a:off` element onto the current shape.
fn read_offset(e: &BytesStart<'_>, shape: Option<&mut ShapeInfo>) {
    let Some(shape) = shape else {
        return;
    };
    for attr in e.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value);
        match attr.key.as_ref() {
            b"x" => shape.x = value.parse().unwrap_or(shape.x),
            b"y" => shape.y = value.parse().unwrap_or(shape.y),
            _ => {}
        }
    }
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("rId1"), Some(1));
        assert_eq!(extract_slide_number("rId12"), Some(12));
        assert_eq!(extract_slide_number("slides/slide1.xml"), Some(1));
        assert_eq!(extract_slide_number("slides/slide123.xml"), Some(123));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("ppt", "slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(
            resolve_target("ppt/slides", "../notesSlides/notesSlide4.xml"),
            "ppt/notesSlides/notesSlide4.xml"
        );
        assert_eq!(resolve_target("ppt", "/ppt/slides/slide2.xml"), "ppt/slides/slide2.xml");
    }

    #[test]
    fn test_extract_shapes_paragraphs_and_breaks() {
        let xml = concat!(
            r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>"#,
            r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/></a:xfrm></p:grpSpPr>"#,
            r#"<p:sp><p:spPr><a:xfrm><a:off x="914400" y="457200"/></a:xfrm></p:spPr>"#,
            r#"<p:txBody><a:p><a:r><a:t>📱</a:t></a:r><a:r><a:t>  Use &amp; enjoy</a:t></a:r></a:p>"#,
            r#"<a:p><a:r><a:t>one</a:t></a:r><a:br><a:rPr/></a:br><a:r><a:t>two</a:t></a:r></a:p>"#,
            r#"</p:txBody></p:sp>"#,
            r#"<p:sp><p:spPr/><p:txBody><a:p><a:endParaRPr/></a:p></p:txBody></p:sp>"#,
            r#"</p:spTree></p:cSld></p:sld>"#
        );
        let shapes = extract_shapes_from_xml(xml).unwrap();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].paragraphs, vec!["📱  Use & enjoy", "one\ntwo"]);
        assert_eq!(shapes[0].x, 914_400);
        assert_eq!(shapes[0].y, 457_200);
        assert_eq!(shapes[1].paragraphs, vec![""]);
    }
}
