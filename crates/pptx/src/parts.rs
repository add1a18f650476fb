//! XML generation for the per-document parts: content types, relationships,
//! properties, the presentation part, slides, and notes slides.

use crate::escape;
use crate::templates::{content_type, rel, NS_A, NS_P, NS_R, SP_TREE_HEADER, XML_DECLARATION};
use deck_core::{AutoShape, Document, Emu, Error, Font, Paragraph, Result, Shape, Slide, TextBox};
use std::fmt::Write as FmtWrite;

/// Base id for `p:sldId`; ids below 256 are reserved.
const FIRST_SLIDE_ID: usize = 256;

/// A package relationship.
pub(crate) struct Relationship<'a> {
    pub id: String,
    pub rel_type: &'a str,
    pub target: String,
}

impl<'a> Relationship<'a> {
    pub fn new(id: usize, rel_type: &'a str, target: impl Into<String>) -> Self {
        Self {
            id: format!("rId{}", id),
            rel_type,
            target: target.into(),
        }
    }
}

/// Serialize a relationships part.
pub(crate) fn relationships_xml(rels: &[Relationship<'_>]) -> Result<String> {
    let mut xml = String::with_capacity(256 + rels.len() * 160);
    xml.push_str(XML_DECLARATION);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for r in rels {
        write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            r.id,
            r.rel_type,
            escape(&r.target)
        )?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

/// `[Content_Types].xml` covering every part the writer emits.
pub(crate) fn content_types_xml(doc: &Document) -> Result<String> {
    let mut xml = String::with_capacity(2048 + doc.slide_count() * 300);
    xml.push_str(XML_DECLARATION);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    write!(
        xml,
        r#"<Default Extension="rels" ContentType="{}"/><Default Extension="xml" ContentType="{}"/>"#,
        content_type::RELS,
        content_type::XML
    )?;

    let mut overrides: Vec<(String, &str)> = vec![
        ("/ppt/presentation.xml".into(), content_type::PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml".into(), content_type::SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml".into(), content_type::SLIDE_LAYOUT),
        ("/ppt/notesMasters/notesMaster1.xml".into(), content_type::NOTES_MASTER),
        ("/ppt/theme/theme1.xml".into(), content_type::THEME),
        ("/ppt/theme/theme2.xml".into(), content_type::THEME),
        ("/ppt/presProps.xml".into(), content_type::PRES_PROPS),
        ("/ppt/viewProps.xml".into(), content_type::VIEW_PROPS),
        ("/ppt/tableStyles.xml".into(), content_type::TABLE_STYLES),
        ("/docProps/core.xml".into(), content_type::CORE_PROPERTIES),
        ("/docProps/app.xml".into(), content_type::EXTENDED_PROPERTIES),
    ];
    for slide in doc.slides() {
        let n = slide.number();
        overrides.push((format!("/ppt/slides/slide{}.xml", n), content_type::SLIDE));
        if slide.has_notes() {
            overrides.push((
                format!("/ppt/notesSlides/notesSlide{}.xml", n),
                content_type::NOTES_SLIDE,
            ));
        }
    }

    for (part, ct) in overrides {
        write!(xml, r#"<Override PartName="{}" ContentType="{}"/>"#, part, ct)?;
    }
    xml.push_str("</Types>");
    Ok(xml)
}

/// Package-level `_rels/.rels`.
pub(crate) fn root_rels_xml() -> Result<String> {
    relationships_xml(&[
        Relationship::new(1, rel::OFFICE_DOCUMENT, "ppt/presentation.xml"),
        Relationship::new(2, rel::CORE_PROPERTIES, "docProps/core.xml"),
        Relationship::new(3, rel::EXTENDED_PROPERTIES, "docProps/app.xml"),
    ])
}

/// `docProps/core.xml`. No timestamps are written, so repeated builds of the
/// same document produce identical parts.
pub(crate) fn core_props_xml(doc: &Document, creator: &str) -> Result<String> {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECLARATION);
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
        r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
    ));
    if let Some(title) = &doc.title {
        write!(xml, "<dc:title>{}</dc:title>", escape(title))?;
    }
    write!(xml, "<dc:creator>{}</dc:creator>", escape(creator))?;
    xml.push_str("</cp:coreProperties>");
    Ok(xml)
}

/// `docProps/app.xml` with slide and notes counts.
pub(crate) fn app_props_xml(doc: &Document, application: &str) -> Result<String> {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECLARATION);
    xml.push_str(concat!(
        r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
        r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#
    ));
    write!(
        xml,
        "<Application>{}</Application><PresentationFormat>Custom</PresentationFormat>\
         <Slides>{}</Slides><Notes>{}</Notes>",
        escape(application),
        doc.slide_count(),
        doc.notes_count()
    )?;
    xml.push_str("</Properties>");
    Ok(xml)
}

/// Relationship id of the n-th slide (0-based) in `presentation.xml.rels`.
///
/// rId1 is the slide master and rId2 the notes master.
fn slide_rel_id(index: usize) -> usize {
    index + 3
}

/// `ppt/_rels/presentation.xml.rels`.
pub(crate) fn presentation_rels_xml(doc: &Document) -> Result<String> {
    let mut rels = vec![
        Relationship::new(1, rel::SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
        Relationship::new(2, rel::NOTES_MASTER, "notesMasters/notesMaster1.xml"),
    ];
    for (idx, slide) in doc.slides().iter().enumerate() {
        rels.push(Relationship::new(
            slide_rel_id(idx),
            rel::SLIDE,
            format!("slides/slide{}.xml", slide.number()),
        ));
    }
    let next = slide_rel_id(doc.slide_count());
    rels.push(Relationship::new(next, rel::THEME, "theme/theme1.xml"));
    rels.push(Relationship::new(next + 1, rel::PRES_PROPS, "presProps.xml"));
    rels.push(Relationship::new(next + 2, rel::VIEW_PROPS, "viewProps.xml"));
    rels.push(Relationship::new(next + 3, rel::TABLE_STYLES, "tableStyles.xml"));
    relationships_xml(&rels)
}

/// `ppt/presentation.xml`.
pub(crate) fn presentation_xml(doc: &Document) -> Result<String> {
    let mut xml = String::with_capacity(1024 + doc.slide_count() * 48);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
        NS_A, NS_R, NS_P
    )?;
    xml.push_str(
        r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
    );
    xml.push_str(r#"<p:notesMasterIdLst><p:notesMasterId r:id="rId2"/></p:notesMasterIdLst>"#);

    if doc.slide_count() > 0 {
        xml.push_str("<p:sldIdLst>");
        for idx in 0..doc.slide_count() {
            write!(
                xml,
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                FIRST_SLIDE_ID + idx,
                slide_rel_id(idx)
            )?;
        }
        xml.push_str("</p:sldIdLst>");
    }

    write!(
        xml,
        r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/>"#,
        doc.slide_width, doc.slide_height
    )?;
    xml.push_str("</p:presentation>");
    Ok(xml)
}

/// `ppt/slides/_rels/slideN.xml.rels`.
pub(crate) fn slide_rels_xml(slide: &Slide) -> Result<String> {
    let mut rels = vec![Relationship::new(
        1,
        rel::SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml",
    )];
    if slide.has_notes() {
        rels.push(Relationship::new(
            2,
            rel::NOTES_SLIDE,
            format!("../notesSlides/notesSlide{}.xml", slide.number()),
        ));
    }
    relationships_xml(&rels)
}

/// `ppt/notesSlides/_rels/notesSlideN.xml.rels`.
pub(crate) fn notes_rels_xml(slide: &Slide) -> Result<String> {
    relationships_xml(&[
        Relationship::new(1, rel::NOTES_MASTER, "../notesMasters/notesMaster1.xml"),
        Relationship::new(2, rel::SLIDE, format!("../slides/slide{}.xml", slide.number())),
    ])
}

/// `ppt/slides/slideN.xml`.
///
/// Fails with [`Error::InvalidGeometry`] when a shape has a negative
/// offset or extent.
pub(crate) fn slide_xml(slide: &Slide) -> Result<String> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        NS_A, NS_R, NS_P
    )?;
    xml.push_str("<p:cSld>");

    if let Some(bg) = slide.background {
        write!(
            xml,
            r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
            bg.hex()
        )?;
    }

    xml.push_str("<p:spTree>");
    xml.push_str(SP_TREE_HEADER);
    for (idx, shape) in slide.shapes().iter().enumerate() {
        let frame = shape.frame();
        if !frame.is_non_negative() {
            return Err(Error::InvalidGeometry(format!(
                "slide {} shape {} has a negative offset or extent ({:?})",
                slide.number(),
                idx + 1,
                frame
            )));
        }
        // id 1 is the group shape
        let shape_id = idx + 2;
        match shape {
            Shape::TextBox(tb) => write_text_box(&mut xml, shape_id, tb)?,
            Shape::AutoShape(s) => write_auto_shape(&mut xml, shape_id, s)?,
        }
    }
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    Ok(xml)
}

fn write_xfrm(xml: &mut String, left: Emu, top: Emu, width: Emu, height: Emu) -> Result<()> {
    write!(
        xml,
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        left, top, width, height
    )?;
    Ok(())
}

fn write_text_box(xml: &mut String, shape_id: usize, tb: &TextBox) -> Result<()> {
    xml.push_str("<p:sp><p:nvSpPr>");
    write!(
        xml,
        r#"<p:cNvPr id="{}" name="TextBox {}"/>"#,
        shape_id,
        shape_id - 1
    )?;
    xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);

    xml.push_str("<p:spPr>");
    let f = tb.frame;
    write_xfrm(xml, f.left, f.top, f.width, f.height)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);

    xml.push_str("<p:txBody>");
    let wrap = if tb.text_frame.word_wrap {
        "square"
    } else {
        "none"
    };
    write!(
        xml,
        r#"<a:bodyPr wrap="{}" rtlCol="0"><a:spAutoFit/></a:bodyPr><a:lstStyle/>"#,
        wrap
    )?;
    if tb.text_frame.paragraphs.is_empty() {
        xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#);
    }
    for paragraph in &tb.text_frame.paragraphs {
        write_paragraph(xml, paragraph)?;
    }
    xml.push_str("</p:txBody></p:sp>");
    Ok(())
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph) -> Result<()> {
    xml.push_str("<a:p>");

    let has_props = paragraph.alignment.is_some()
        || paragraph.space_before.is_some()
        || paragraph.space_after.is_some();
    if has_props {
        xml.push_str("<a:pPr");
        if let Some(align) = paragraph.alignment {
            write!(xml, r#" algn="{}""#, align.as_ooxml())?;
        }
        xml.push('>');
        if let Some(before) = paragraph.space_before {
            write!(xml, r#"<a:spcBef><a:spcPts val="{}"/></a:spcBef>"#, hundredths(before))?;
        }
        if let Some(after) = paragraph.space_after {
            write!(xml, r#"<a:spcAft><a:spcPts val="{}"/></a:spcAft>"#, hundredths(after))?;
        }
        xml.push_str("</a:pPr>");
    }

    for run in &paragraph.runs {
        for (idx, line) in run.text.split('\n').enumerate() {
            if idx > 0 {
                xml.push_str("<a:br>");
                write_run_props(xml, &run.font)?;
                xml.push_str("</a:br>");
            }
            if line.is_empty() {
                continue;
            }
            xml.push_str("<a:r>");
            write_run_props(xml, &run.font)?;
            write!(xml, "<a:t>{}</a:t>", escape(line))?;
            xml.push_str("</a:r>");
        }
    }

    xml.push_str("</a:p>");
    Ok(())
}

fn write_run_props(xml: &mut String, font: &Font) -> Result<()> {
    xml.push_str(r#"<a:rPr lang="en-US""#);
    if let Some(size) = font.size {
        write!(xml, r#" sz="{}""#, hundredths(size))?;
    }
    if let Some(bold) = font.bold {
        write!(xml, r#" b="{}""#, if bold { 1 } else { 0 })?;
    }
    xml.push_str(r#" dirty="0">"#);
    if let Some(color) = font.color {
        write!(
            xml,
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            color.hex()
        )?;
    }
    if let Some(name) = &font.name {
        let name = escape(name);
        write!(
            xml,
            r#"<a:latin typeface="{0}"/><a:cs typeface="{0}"/>"#,
            name
        )?;
    }
    xml.push_str("</a:rPr>");
    Ok(())
}

fn write_auto_shape(xml: &mut String, shape_id: usize, shape: &AutoShape) -> Result<()> {
    xml.push_str("<p:sp><p:nvSpPr>");
    write!(
        xml,
        r#"<p:cNvPr id="{}" name="{} {}"/>"#,
        shape_id,
        shape.geometry.display_name(),
        shape_id - 1
    )?;
    xml.push_str("<p:cNvSpPr/><p:nvPr/></p:nvSpPr>");

    xml.push_str("<p:spPr>");
    let f = shape.frame;
    write_xfrm(xml, f.left, f.top, f.width, f.height)?;
    write!(
        xml,
        r#"<a:prstGeom prst="{}"><a:avLst/></a:prstGeom>"#,
        shape.geometry.preset()
    )?;
    match shape.fill {
        Some(fill) => write!(
            xml,
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            fill.hex()
        )?,
        None => xml.push_str("<a:noFill/>"),
    }
    match shape.line {
        Some(line) => {
            xml.push_str("<a:ln");
            if let Some(width) = line.width {
                write!(xml, r#" w="{}""#, Emu::points(width))?;
            }
            write!(
                xml,
                r#"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:ln>"#,
                line.color.hex()
            )?;
        }
        None => xml.push_str("<a:ln><a:noFill/></a:ln>"),
    }
    xml.push_str("</p:spPr>");

    xml.push_str(concat!(
        r#"<p:txBody><a:bodyPr rtlCol="0" anchor="ctr"/><a:lstStyle/>"#,
        r#"<a:p><a:pPr algn="ctr"/><a:endParaRPr lang="en-US" dirty="0"/></a:p></p:txBody>"#
    ));
    xml.push_str("</p:sp>");
    Ok(())
}

/// `ppt/notesSlides/notesSlideN.xml`, one paragraph per note.
pub(crate) fn notes_slide_xml(slide: &Slide) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<p:notes xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        NS_A, NS_R, NS_P
    )?;
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(SP_TREE_HEADER);

    xml.push_str("<p:sp><p:nvSpPr>");
    xml.push_str(r#"<p:cNvPr id="2" name="Notes Placeholder 1"/>"#);
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
    xml.push_str(r#"<p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr>"#);
    xml.push_str("<p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>");

    for note in slide.notes() {
        let mut paragraph = Paragraph::default();
        paragraph.add_run(note.as_str(), Font::default());
        write_paragraph(&mut xml, &paragraph)?;
    }

    xml.push_str("</p:txBody></p:sp>");
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:notes>");
    Ok(xml)
}

/// Points to the hundredths used by `sz` and `spcPts`.
fn hundredths(points: f64) -> i64 {
    (points * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{palette, DeckBuilder, Geometry, Outline, QuizQuestion, QuizSlide, Rect, Theme};

    fn sample_document() -> Document {
        let mut deck = DeckBuilder::new(Theme::default()).with_title("Tom & Jerry");
        deck.discussion_slide("Why <this>?");
        deck.quiz_slide(&QuizSlide {
            title: "Quiz".into(),
            questions: vec![QuizQuestion {
                question: "Q1".into(),
                options: vec!["a".into(), "b".into()],
                correct: 0,
                explanation: "E1".into(),
            }],
        });
        deck.finish()
    }

    #[test]
    fn test_hundredths() {
        assert_eq!(hundredths(28.0), 2800);
        assert_eq!(hundredths(10.5), 1050);
    }

    #[test]
    fn test_content_types_lists_notes_only_where_present() {
        let xml = content_types_xml(&sample_document()).unwrap();
        assert!(xml.contains(r#"PartName="/ppt/slides/slide1.xml""#));
        assert!(xml.contains(r#"PartName="/ppt/slides/slide2.xml""#));
        assert!(!xml.contains("notesSlide1.xml"));
        assert!(xml.contains(r#"PartName="/ppt/notesSlides/notesSlide2.xml""#));
    }

    #[test]
    fn test_presentation_xml_slide_ids() {
        let doc = sample_document();
        let xml = presentation_xml(&doc).unwrap();
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId3"/>"#));
        assert!(xml.contains(r#"<p:sldId id="257" r:id="rId4"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="12191695" cy="6858000"/>"#));

        let rels = presentation_rels_xml(&doc).unwrap();
        assert!(rels.contains(r#"Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml""#));
        assert!(rels.contains(r#"Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme""#));
    }

    #[test]
    fn test_slide_xml_escapes_and_styles() {
        let doc = sample_document();
        let xml = slide_xml(&doc.slides()[0]).unwrap();
        assert!(xml.contains(r#"<a:srgbClr val="1A1A2E"/>"#));
        assert!(xml.contains("<a:t>Why &lt;this&gt;?</a:t>"));
        assert!(xml.contains(r#"prst="roundRect""#));
        assert!(xml.contains(r#"<a:ln w="25400"><a:solidFill><a:srgbClr val="A855F7"/>"#));
        assert!(xml.contains(r#"<a:bodyPr wrap="none" rtlCol="0">"#));
        assert!(xml.contains(r#"<a:pPr algn="r">"#));
    }

    #[test]
    fn test_line_breaks_become_br() {
        let mut deck = DeckBuilder::new(Theme::default());
        let mut canvas = deck.add_slide();
        canvas.add_text(
            Rect::inches(1.0, 1.0, 5.0, 1.0),
            "one\n\nthree",
            &deck_core::TextStyle::default(),
        );
        let doc = deck.finish();
        let xml = slide_xml(&doc.slides()[0]).unwrap();
        assert_eq!(xml.matches("<a:br>").count(), 2);
        assert!(xml.contains("<a:t>one</a:t>"));
        assert!(xml.contains("<a:t>three</a:t>"));
    }

    #[test]
    fn test_negative_geometry_rejected() {
        let mut deck = DeckBuilder::new(Theme::default());
        let mut canvas = deck.add_slide();
        canvas.add_panel(
            Geometry::Rectangle,
            Rect::inches(1.0, 1.0, -2.0, 1.0),
            palette::SURFACE,
            Some(Outline {
                color: palette::GREEN,
                width: None,
            }),
        );
        let doc = deck.finish();
        let err = slide_xml(&doc.slides()[0]).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
    }

    #[test]
    fn test_notes_slide_paragraphs() {
        let doc = sample_document();
        let slide = &doc.slides()[1];
        let xml = notes_slide_xml(slide).unwrap();
        assert!(xml.contains("<a:t>Q: Q1</a:t>"));
        assert!(xml.contains("<a:t>A: E1</a:t>"));

        let rels = slide_rels_xml(slide).unwrap();
        assert!(rels.contains("../notesSlides/notesSlide2.xml"));
        let rels = notes_rels_xml(slide).unwrap();
        assert!(rels.contains("../slides/slide2.xml"));
    }

    #[test]
    fn test_core_props_escape_title() {
        let xml = core_props_xml(&sample_document(), "deck").unwrap();
        assert!(xml.contains("<dc:title>Tom &amp; Jerry</dc:title>"));
        let xml = app_props_xml(&sample_document(), "deck").unwrap();
        assert!(xml.contains("<Slides>2</Slides><Notes>1</Notes>"));
    }
}
