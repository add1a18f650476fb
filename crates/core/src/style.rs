//! Theme, palette, and per-call style configuration for the layout helpers.

use crate::types::{Alignment, Color, Emu};
use serde::Deserialize;

/// Named colors of the course theme.
pub mod palette {
    use crate::types::Color;

    pub const BACKGROUND: Color = Color::rgb(0x1a, 0x1a, 0x2e);
    pub const SURFACE: Color = Color::rgb(0x16, 0x21, 0x3e);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const DIM: Color = Color::rgb(0xa7, 0xa9, 0xbe);
    pub const PURPLE: Color = Color::rgb(0xa8, 0x55, 0xf7);
    pub const TEAL: Color = Color::rgb(0x06, 0xb6, 0xd4);
    pub const PINK: Color = Color::rgb(0xe0, 0x56, 0xa0);
    pub const WARN: Color = Color::rgb(0xff, 0x6b, 0x6b);
    pub const GREEN: Color = Color::rgb(0x2c, 0xb6, 0x7d);

    /// Fill behind discussion prompts.
    pub const DISCUSSION: Color = Color::rgb(0x1f, 0x1a, 0x3e);

    /// Look up a palette color by its lowercase name.
    pub fn named(name: &str) -> Option<Color> {
        let color = match name {
            "background" => BACKGROUND,
            "surface" => SURFACE,
            "white" => WHITE,
            "dim" => DIM,
            "purple" => PURPLE,
            "teal" => TEAL,
            "pink" => PINK,
            "warn" => WARN,
            "green" => GREEN,
            "discussion" => DISCUSSION,
            _ => return None,
        };
        Some(color)
    }
}

/// Document-wide settings applied by the builder.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Latin typeface for every run.
    pub font: String,
    pub slide_width: Emu,
    pub slide_height: Emu,

    /// Solid fill applied to every slide background.
    pub background: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font: "Calibri".to_string(),
            slide_width: Emu::inches(13.333),
            slide_height: Emu::inches(7.5),
            background: palette::BACKGROUND,
        }
    }
}

/// Style of a single-paragraph text box.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font size in points (default 28).
    pub size: f64,
    /// Text color (default white).
    pub color: Color,
    /// Bold weight (default off).
    pub bold: bool,
    /// Paragraph alignment (default left).
    pub align: Alignment,
    /// Typeface override; the theme font applies when `None`.
    pub font: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 28.0,
            color: palette::WHITE,
            bold: false,
            align: Alignment::Left,
            font: None,
        }
    }
}

impl TextStyle {
    /// Default style at the given size.
    pub fn sized(size: f64) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Set the text color.
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Use bold weight.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Set the alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Center the paragraph.
    pub fn centered(self) -> Self {
        self.align(Alignment::Center)
    }
}

/// Style of an emoji bullet list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BulletStyle {
    /// Font size in points (default 26).
    pub font_size: f64,
    /// Color of the leading emoji run (default purple).
    pub icon_color: Color,
    /// Color of the item text (default white).
    pub text_color: Color,
    /// Points before each paragraph (default 2).
    pub space_before: f64,
    /// Points after each paragraph (default 6).
    pub space_after: f64,
}

impl Default for BulletStyle {
    fn default() -> Self {
        Self {
            font_size: 26.0,
            icon_color: palette::PURPLE,
            text_color: palette::WHITE,
            space_before: 2.0,
            space_after: 6.0,
        }
    }
}

/// Colors of a callout box.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CalloutStyle {
    /// Label text color (default pink).
    pub label_color: Color,
    /// Accent bar color (default purple).
    pub border_color: Color,
}

impl Default for CalloutStyle {
    fn default() -> Self {
        Self {
            label_color: palette::PINK,
            border_color: palette::PURPLE,
        }
    }
}

/// Preset callout flavors used on content slides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalloutKind {
    #[default]
    RealTalk,
    Warning,
    #[serde(alias = "green")]
    Tip,
}

impl CalloutKind {
    /// Colors for this flavor.
    pub fn style(&self) -> CalloutStyle {
        match self {
            Self::RealTalk => CalloutStyle::default(),
            Self::Warning => CalloutStyle {
                label_color: palette::WARN,
                border_color: palette::WARN,
            },
            Self::Tip => CalloutStyle {
                label_color: palette::GREEN,
                border_color: palette::GREEN,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_style_defaults() {
        let style = TextStyle::default();
        assert_eq!(style.size, 28.0);
        assert_eq!(style.color, palette::WHITE);
        assert!(!style.bold);
        assert_eq!(style.align, Alignment::Left);
    }

    #[test]
    fn test_text_style_partial_json() {
        let style: TextStyle =
            serde_json::from_str(r#"{ "size": 36, "color": "purple", "bold": true }"#).unwrap();
        assert_eq!(style, TextStyle::sized(36.0).color(palette::PURPLE).bold());
    }

    #[test]
    fn test_callout_kind_colors() {
        assert_eq!(CalloutKind::RealTalk.style().label_color, palette::PINK);
        assert_eq!(CalloutKind::RealTalk.style().border_color, palette::PURPLE);
        assert_eq!(CalloutKind::Warning.style().border_color, palette::WARN);
        assert_eq!(CalloutKind::Tip.style().label_color, palette::GREEN);

        let kind: CalloutKind = serde_json::from_str(r#""green""#).unwrap();
        assert_eq!(kind, CalloutKind::Tip);
    }

    #[test]
    fn test_bullet_style_override() {
        let style: BulletStyle = serde_json::from_str(r#"{ "font_size": 15 }"#).unwrap();
        assert_eq!(style.font_size, 15.0);
        assert_eq!(style.space_after, 6.0);
    }

    #[test]
    fn test_palette_lookup() {
        assert_eq!(palette::named("teal"), Some(palette::TEAL));
        assert_eq!(palette::named("Teal"), None);
    }
}
