//! Structured content descriptors consumed by the slide composers.

use crate::style::CalloutKind;
use crate::types::Color;
use serde::Deserialize;

/// One bullet: a leading emoji and its text.
///
/// Deserializes from either `["🔒", "text"]` or `{ "icon": "🔒", "text": "text" }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Bullet {
    pub icon: String,
    pub text: String,
}

impl Bullet {
    pub fn new(icon: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            text: text.into(),
        }
    }
}

/// A styled span for rich text boxes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RichRun {
    pub text: String,
    /// Size in points.
    pub size: f64,
    pub color: Color,
    #[serde(default)]
    pub bold: bool,
}

/// A labelled callout on a content slide.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Callout {
    #[serde(default)]
    pub kind: CalloutKind,
    pub label: String,
    pub text: String,
}

/// Centered title layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TitleSlide {
    pub emoji: String,
    pub title: String,
    pub subtitle: String,
    /// Small uppercase line above the emoji.
    #[serde(default)]
    pub module_label: Option<String>,
}

/// Title plus any combination of body text, bullets, callouts, and a note.
///
/// Empty strings and empty lists are treated the same as absent sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContentSlide {
    pub emoji: Option<String>,
    pub title: String,
    pub body_text: Option<String>,
    pub body_items: Vec<Bullet>,
    pub callouts: Vec<Callout>,
    pub note: Option<String>,
}

impl ContentSlide {
    /// A content slide with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Zero-based index of the correct option.
    pub correct: usize,
    /// Answer explanation written to the speaker notes.
    pub explanation: String,
}

/// A slide of quiz questions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizSlide {
    #[serde(default = "default_quiz_title")]
    pub title: String,
    pub questions: Vec<QuizQuestion>,
}

fn default_quiz_title() -> String {
    "📝 Quiz".to_string()
}

/// Returns `Some` only for non-empty text.
pub(crate) fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|s| !s.is_empty())
}
