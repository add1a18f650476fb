//! In-memory presentation document: slides, shapes, text frames, and notes.
//!
//! The model is write-oriented. Builders append to it and the package
//! writer serializes it once.

use crate::types::{Alignment, Color, Emu, Rect};

/// An ordered sequence of slides plus document-wide settings.
#[derive(Debug, Clone)]
pub struct Document {
    /// Title stored in the package core properties.
    pub title: Option<String>,

    /// Slide width shared by every slide.
    pub slide_width: Emu,

    /// Slide height shared by every slide.
    pub slide_height: Emu,

    slides: Vec<Slide>,
}

impl Document {
    /// Create an empty document with the given slide size.
    pub fn new(slide_width: Emu, slide_height: Emu) -> Self {
        Self {
            title: None,
            slide_width,
            slide_height,
            slides: Vec::new(),
        }
    }

    /// Append a slide and return a handle to it.
    pub fn push_slide(&mut self, slide: Slide) -> &mut Slide {
        self.slides.push(slide);
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    /// Slides in presentation order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Number of slides carrying speaker notes.
    pub fn notes_count(&self) -> usize {
        self.slides.iter().filter(|s| s.has_notes()).count()
    }
}

/// A single slide.
#[derive(Debug, Clone)]
pub struct Slide {
    number: usize,

    /// Solid background fill, or the master's background if `None`.
    pub background: Option<Color>,

    shapes: Vec<Shape>,
    notes: Vec<String>,
}

impl Slide {
    /// Create an empty slide with the given 1-based number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            background: None,
            shapes: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// 1-based slide number.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Shapes in z-order (first is bottom-most).
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Append a shape.
    pub fn add_shape(&mut self, shape: Shape) -> &mut Shape {
        self.shapes.push(shape);
        let last = self.shapes.len() - 1;
        &mut self.shapes[last]
    }

    /// Append an empty text box and return its text frame.
    pub fn add_text_box(&mut self, frame: Rect) -> &mut TextFrame {
        match self.add_shape(Shape::TextBox(TextBox {
            frame,
            text_frame: TextFrame::default(),
        })) {
            Shape::TextBox(tb) => &mut tb.text_frame,
            Shape::AutoShape(_) => unreachable!("just pushed a text box"),
        }
    }

    /// Speaker-note paragraphs.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Append a speaker-note paragraph.
    pub fn add_note(&mut self, text: impl Into<String>) {
        self.notes.push(text.into());
    }

    /// Whether any speaker notes are attached.
    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }
}

/// A positioned visual element.
#[derive(Debug, Clone)]
pub enum Shape {
    TextBox(TextBox),
    AutoShape(AutoShape),
}

impl Shape {
    /// Position and size.
    pub fn frame(&self) -> Rect {
        match self {
            Self::TextBox(tb) => tb.frame,
            Self::AutoShape(s) => s.frame,
        }
    }

    /// Plain text content; empty for shapes without text.
    pub fn text(&self) -> String {
        match self {
            Self::TextBox(tb) => tb.text_frame.text(),
            Self::AutoShape(_) => String::new(),
        }
    }

    /// Returns the text box if this shape is one.
    pub fn as_text_box(&self) -> Option<&TextBox> {
        match self {
            Self::TextBox(tb) => Some(tb),
            Self::AutoShape(_) => None,
        }
    }

    /// Returns the auto shape if this shape is one.
    pub fn as_auto_shape(&self) -> Option<&AutoShape> {
        match self {
            Self::AutoShape(s) => Some(s),
            Self::TextBox(_) => None,
        }
    }
}

/// A text box shape.
#[derive(Debug, Clone)]
pub struct TextBox {
    pub frame: Rect,
    pub text_frame: TextFrame,
}

/// Preset geometry for auto shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    Rectangle,
    RoundedRectangle,
}

impl Geometry {
    /// DrawingML preset name.
    pub fn preset(&self) -> &'static str {
        match self {
            Self::Rectangle => "rect",
            Self::RoundedRectangle => "roundRect",
        }
    }

    /// Human-readable shape name prefix.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Rectangle => "Rectangle",
            Self::RoundedRectangle => "Rounded Rectangle",
        }
    }
}

/// A filled preset shape without text.
#[derive(Debug, Clone)]
pub struct AutoShape {
    pub geometry: Geometry,
    pub frame: Rect,
    pub fill: Option<Color>,

    /// Outline; `None` renders with no line.
    pub line: Option<Outline>,
}

/// Shape outline.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub struct Outline {
    pub color: Color,

    /// Width in points; the renderer default applies when absent.
    #[serde(default)]
    pub width: Option<f64>,
}

/// Paragraphs inside a text box.
#[derive(Debug, Clone, Default)]
pub struct TextFrame {
    pub word_wrap: bool,
    pub paragraphs: Vec<Paragraph>,
}

impl TextFrame {
    /// Append an empty paragraph.
    pub fn add_paragraph(&mut self) -> &mut Paragraph {
        self.paragraphs.push(Paragraph::default());
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    /// Paragraph texts joined with newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A paragraph made of styled runs.
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    pub alignment: Option<Alignment>,

    /// Space before the paragraph, in points.
    pub space_before: Option<f64>,

    /// Space after the paragraph, in points.
    pub space_after: Option<f64>,

    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Append a run.
    pub fn add_run(&mut self, text: impl Into<String>, font: Font) -> &mut Run {
        self.runs.push(Run {
            text: text.into(),
            font,
        });
        let last = self.runs.len() - 1;
        &mut self.runs[last]
    }

    /// Concatenated run text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A contiguous span of text sharing one font. A `\n` in `text` is a line
/// break inside the paragraph.
#[derive(Debug, Clone)]
pub struct Run {
    pub text: String,
    pub font: Font,
}

/// Character formatting for a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Font {
    pub name: Option<String>,

    /// Size in points.
    pub size: Option<f64>,

    pub color: Option<Color>,
    pub bold: Option<bool>,
}
