//! Course script: the deck content as data, rendered through the builder.
//!
//! A script is a JSON document with a title and an ordered list of slides.
//! Each slide is tagged by `kind`; free-form `custom` slides list their
//! elements tagged by `type`. Frames are `[left, top, width, height]` in
//! inches.

use crate::builder::{DeckBuilder, SlideCanvas};
use crate::content::{Bullet, ContentSlide, QuizSlide, RichRun, TitleSlide};
use crate::document::{Document, Geometry, Outline};
use crate::error::Result;
use crate::style::{BulletStyle, CalloutStyle, TextStyle, Theme};
use crate::types::{Alignment, Color, Rect};
use serde::Deserialize;

/// The phone safety course bundled with the crate.
pub const PHONE_SAFETY_COURSE: &str = include_str!("../assets/phone_safety_course.json");

/// A complete deck description.
#[derive(Debug, Clone, Deserialize)]
pub struct DeckScript {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub slides: Vec<SlideSpec>,
}

/// One slide of a script.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlideSpec {
    Title(TitleSlide),
    Content(ContentSlide),
    Discussion { question: String },
    Quiz(QuizSlide),
    Custom { elements: Vec<Element> },
}

/// A free-form element on a custom slide.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Text {
        frame: Rect,
        text: String,
        #[serde(default)]
        style: TextStyle,
    },
    RichText {
        frame: Rect,
        runs: Vec<RichRun>,
        #[serde(default)]
        align: Alignment,
    },
    Bullets {
        frame: Rect,
        items: Vec<Bullet>,
        #[serde(default)]
        style: BulletStyle,
    },
    Callout {
        frame: Rect,
        label: String,
        text: String,
        #[serde(default)]
        style: CalloutStyle,
    },
    Discussion {
        frame: Rect,
        question: String,
    },
    Panel {
        frame: Rect,
        #[serde(default = "default_panel_geometry")]
        geometry: PanelGeometry,
        fill: Color,
        #[serde(default)]
        border: Option<Outline>,
    },
}

/// Geometry choices for panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelGeometry {
    Rectangle,
    RoundedRectangle,
}

impl From<PanelGeometry> for Geometry {
    fn from(value: PanelGeometry) -> Self {
        match value {
            PanelGeometry::Rectangle => Geometry::Rectangle,
            PanelGeometry::RoundedRectangle => Geometry::RoundedRectangle,
        }
    }
}

fn default_panel_geometry() -> PanelGeometry {
    PanelGeometry::RoundedRectangle
}

impl DeckScript {
    /// Decode a script from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The bundled phone safety course.
    pub fn phone_safety_course() -> Result<Self> {
        Self::from_json(PHONE_SAFETY_COURSE)
    }

    /// Run every slide through a fresh builder, in order.
    pub fn render(&self, theme: Theme) -> Document {
        let mut deck = DeckBuilder::new(theme).with_title(self.title.as_str());
        for spec in &self.slides {
            spec.render(&mut deck);
        }
        log::debug!("Rendered {} slides for '{}'", deck.slide_count(), self.title);
        deck.finish()
    }
}

impl SlideSpec {
    /// Append this slide to the deck.
    pub fn render(&self, deck: &mut DeckBuilder) {
        match self {
            Self::Title(content) => {
                deck.title_slide(content);
            }
            Self::Content(content) => {
                deck.content_slide(content);
            }
            Self::Discussion { question } => {
                deck.discussion_slide(question);
            }
            Self::Quiz(quiz) => {
                deck.quiz_slide(quiz);
            }
            Self::Custom { elements } => {
                let mut canvas = deck.add_slide();
                for element in elements {
                    element.render(&mut canvas);
                }
            }
        }
    }
}

impl Element {
    /// Draw this element on the slide.
    pub fn render(&self, canvas: &mut SlideCanvas<'_>) {
        match self {
            Self::Text { frame, text, style } => {
                canvas.add_text(*frame, text, style);
            }
            Self::RichText { frame, runs, align } => {
                canvas.add_rich_text(*frame, runs, *align);
            }
            Self::Bullets {
                frame,
                items,
                style,
            } => {
                canvas.add_bullets(*frame, items, style);
            }
            Self::Callout {
                frame,
                label,
                text,
                style,
            } => canvas.add_callout(*frame, label, text, style),
            Self::Discussion { frame, question } => canvas.add_discussion(*frame, question),
            Self::Panel {
                frame,
                geometry,
                fill,
                border,
            } => canvas.add_panel((*geometry).into(), *frame, *fill, *border),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::palette;

    #[test]
    fn test_bundled_course_parses() {
        let script = DeckScript::phone_safety_course().unwrap();
        assert_eq!(script.title, "Your First Phone");
        assert_eq!(script.slides.len(), 89);
    }

    #[test]
    fn test_bundled_course_slide_count_matches() {
        let script = DeckScript::phone_safety_course().unwrap();
        let doc = script.render(Theme::default());
        assert_eq!(doc.slide_count(), script.slides.len());
        for (idx, slide) in doc.slides().iter().enumerate() {
            assert_eq!(slide.number(), idx + 1);
            assert_eq!(slide.shapes()[0].text(), (idx + 1).to_string());
        }
    }

    #[test]
    fn test_bundled_course_quiz_notes() {
        let script = DeckScript::phone_safety_course().unwrap();
        let doc = script.render(Theme::default());
        let questions: Vec<usize> = script
            .slides
            .iter()
            .filter_map(|s| match s {
                SlideSpec::Quiz(quiz) => Some(quiz.questions.len()),
                _ => None,
            })
            .collect();
        let notes: Vec<usize> = doc
            .slides()
            .iter()
            .filter(|s| s.has_notes())
            .map(|s| s.notes().len())
            .collect();
        assert_eq!(questions, vec![2, 3, 3, 3]);
        assert_eq!(notes, questions);
    }

    #[test]
    fn test_render_is_stable() {
        let script = DeckScript::phone_safety_course().unwrap();
        let texts = |doc: &Document| -> Vec<String> {
            doc.slides()
                .iter()
                .flat_map(|s| s.shapes().iter().map(|sh| sh.text()))
                .collect()
        };
        let first = script.render(Theme::default());
        let second = script.render(Theme::default());
        assert_eq!(texts(&first), texts(&second));
    }

    #[test]
    fn test_custom_slide_elements() {
        let json = r##"{
            "title": "T",
            "slides": [
                { "kind": "custom", "elements": [
                    { "type": "text", "frame": [0.8, 0.5, 11.733, 0.8], "text": "Hi",
                      "style": { "size": 36, "color": "purple", "bold": true, "align": "center" } },
                    { "type": "panel", "frame": [1.5, 1.5, 10.333, 4.5], "fill": "#152a1f",
                      "border": { "color": "green", "width": 3 } },
                    { "type": "callout", "frame": [1.2, 1.0, 10.9, 2.5], "label": "Scenario",
                      "text": "Body", "style": { "label_color": "warn", "border_color": "warn" } },
                    { "type": "bullets", "frame": [1.2, 1.3, 10.9, 5.5],
                      "items": [["☐", "One"], ["☐", "Two"]], "style": { "font_size": 15 } },
                    { "type": "rich_text", "frame": [1, 1, 5, 1], "align": "center",
                      "runs": [{ "text": "a", "size": 12, "color": "white" }] },
                    { "type": "discussion", "frame": [1.5, 1.5, 10.333, 4.5], "question": "?" }
                ] }
            ]
        }"##;
        let doc = DeckScript::from_json(json).unwrap().render(Theme::default());
        let shapes = doc.slides()[0].shapes();
        // label + text + panel + callout(4) + bullets + rich text + discussion(3)
        assert_eq!(shapes.len(), 1 + 1 + 1 + 4 + 1 + 1 + 3);

        let panel = shapes[2].as_auto_shape().unwrap();
        assert_eq!(panel.geometry, Geometry::RoundedRectangle);
        assert_eq!(panel.fill, Some(Color::rgb(0x15, 0x2a, 0x1f)));
        assert_eq!(
            panel.line,
            Some(Outline {
                color: palette::GREEN,
                width: Some(3.0)
            })
        );
        assert_eq!(shapes[5].text(), "SCENARIO");
        assert_eq!(shapes[7].text(), "☐  One\n☐  Two");
    }

    #[test]
    fn test_malformed_script_is_error() {
        let err = DeckScript::from_json(r#"{ "title": "T", "slides": [{ "kind": "nope" }] }"#)
            .unwrap_err();
        assert!(matches!(err, crate::Error::ScriptError(_)));

        let err = DeckScript::from_json(
            r#"{ "title": "T", "slides": [{ "kind": "custom", "elements": [
                { "type": "panel", "frame": [0, 0, 1, 1], "fill": "mauve" }] }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, crate::Error::ScriptError(_)));
    }
}
