//! Slide builder: layout helpers that turn content descriptors into
//! positioned shapes.
//!
//! [`DeckBuilder`] owns the document and the running slide counter.
//! [`SlideCanvas`] is a short-lived handle to the slide under construction
//! and carries the primitive helpers (text boxes, bullet lists, callouts).

use crate::content::{non_empty, Bullet, ContentSlide, QuizSlide, RichRun, TitleSlide};
use crate::document::{AutoShape, Document, Font, Geometry, Outline, Shape, Slide, TextFrame};
use crate::style::{palette, BulletStyle, CalloutStyle, TextStyle, Theme};
use crate::types::{Alignment, Color, Emu, Rect};

/// Slide-number label frame, bottom right.
const NUMBER_LABEL: [f64; 4] = [12.3, 7.0, 0.8, 0.4];

/// Frame of the discussion callout on a discussion slide.
const DISCUSSION_FRAME: [f64; 4] = [1.5, 1.5, 10.333, 4.5];

/// Vertical space consumed by one bullet on a content slide, in inches.
const BULLET_ADVANCE: f64 = 0.38;

/// Builds a document slide by slide.
#[derive(Debug)]
pub struct DeckBuilder {
    document: Document,
    theme: Theme,
    slide_count: usize,
}

impl DeckBuilder {
    /// Create a builder for an empty document sized by the theme.
    pub fn new(theme: Theme) -> Self {
        Self {
            document: Document::new(theme.slide_width, theme.slide_height),
            theme,
            slide_count: 0,
        }
    }

    /// Set the document title stored in the package properties.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.document.title = Some(title.into());
        self
    }

    /// Number of slides created so far.
    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    /// The document under construction.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Consume the builder and return the finished document.
    pub fn finish(self) -> Document {
        self.document
    }

    /// Create a slide with the theme background and a number label in the
    /// bottom-right corner.
    pub fn add_slide(&mut self) -> SlideCanvas<'_> {
        self.slide_count += 1;
        let number = self.slide_count;
        log::debug!("Adding slide {}", number);

        let mut slide = Slide::new(number);
        slide.background = Some(self.theme.background);

        let theme = &self.theme;
        let slide = self.document.push_slide(slide);
        let mut canvas = SlideCanvas { slide, theme };

        let style = TextStyle::sized(10.0)
            .color(palette::DIM)
            .align(Alignment::Right);
        canvas.text_box(NUMBER_LABEL.into(), &number.to_string(), &style, false);
        canvas
    }

    /// Centered title layout: optional module label, large emoji, bold
    /// title, and dimmed subtitle.
    pub fn title_slide(&mut self, content: &TitleSlide) -> &Slide {
        let mut canvas = self.add_slide();
        let mut y = 1.0;

        if let Some(label) = non_empty(&content.module_label) {
            let style = TextStyle::sized(14.0).color(palette::TEAL).bold().centered();
            canvas.add_text(Rect::inches(1.0, y, 11.333, 0.4), &label.to_uppercase(), &style);
            y += 0.5;
        }

        canvas.add_text(
            Rect::inches(1.0, y, 11.333, 1.0),
            &content.emoji,
            &TextStyle::sized(72.0).centered(),
        );
        y += 1.1;

        canvas.add_text(
            Rect::inches(1.0, y, 11.333, 1.0),
            &content.title,
            &TextStyle::sized(48.0).color(palette::PURPLE).bold().centered(),
        );
        y += 1.0;

        canvas.add_text(
            Rect::inches(1.5, y, 10.333, 1.5),
            &content.subtitle,
            &TextStyle::sized(26.0).color(palette::DIM).centered(),
        );

        canvas.into_slide()
    }

    /// Title with optional emoji, body text, bullets, callouts, and a
    /// trailing note. Each section is emitted only when its input is
    /// non-empty and the cursor advances past it.
    pub fn content_slide(&mut self, content: &ContentSlide) -> &Slide {
        let mut canvas = self.add_slide();
        let mut y = 0.4;

        if let Some(emoji) = non_empty(&content.emoji) {
            canvas.add_text(
                Rect::inches(1.0, y, 11.333, 0.8),
                emoji,
                &TextStyle::sized(52.0).centered(),
            );
            y += 0.8;
        }

        canvas.add_text(
            Rect::inches(0.8, y, 11.733, 0.6),
            &content.title,
            &TextStyle::sized(36.0).color(palette::PURPLE).bold().centered(),
        );
        y += 0.7;

        if let Some(body) = non_empty(&content.body_text) {
            canvas.add_text(
                Rect::inches(1.5, y, 10.333, 0.8),
                body,
                &TextStyle::sized(28.0).color(palette::DIM).centered(),
            );
            y += 0.8;
        }

        if !content.body_items.is_empty() {
            canvas.add_bullets(
                Rect::inches(1.5, y, 10.333, 4.5),
                &content.body_items,
                &BulletStyle::default(),
            );
            y += content.body_items.len() as f64 * BULLET_ADVANCE;
        }

        for callout in &content.callouts {
            canvas.add_callout(
                Rect::inches(1.5, y, 10.333, 1.0),
                &callout.label,
                &callout.text,
                &callout.kind.style(),
            );
            y += 1.1;
        }

        if let Some(note) = non_empty(&content.note) {
            canvas.add_text(
                Rect::inches(1.5, y, 10.333, 0.5),
                note,
                &TextStyle::sized(18.0).color(palette::PURPLE).centered(),
            );
        }

        canvas.into_slide()
    }

    /// A slide holding a single discussion prompt.
    pub fn discussion_slide(&mut self, question: &str) -> &Slide {
        let mut canvas = self.add_slide();
        canvas.add_discussion(DISCUSSION_FRAME.into(), question);
        canvas.into_slide()
    }

    /// Quiz questions with their options; the correct option is checked and
    /// green. Explanations go to the speaker notes, one paragraph per
    /// question in input order.
    pub fn quiz_slide(&mut self, quiz: &QuizSlide) -> &Slide {
        let mut canvas = self.add_slide();
        canvas.add_text(
            Rect::inches(0.8, 0.3, 11.733, 0.6),
            &quiz.title,
            &TextStyle::sized(34.0).color(palette::PURPLE).bold().centered(),
        );

        let mut y = 1.0;
        for question in &quiz.questions {
            canvas.add_text(
                Rect::inches(1.2, y, 10.9, 0.5),
                &question.question,
                &TextStyle::sized(26.0).bold(),
            );
            y += 0.45;

            for (idx, option) in question.options.iter().enumerate() {
                let (marker, color) = if idx == question.correct {
                    ("✅ ", palette::GREEN)
                } else {
                    ("○ ", palette::DIM)
                };
                canvas.add_text(
                    Rect::inches(1.6, y, 10.5, 0.3),
                    &format!("{}{}", marker, option),
                    &TextStyle::sized(16.0).color(color),
                );
                y += 0.28;
            }
            y += 0.15;
        }

        for question in &quiz.questions {
            canvas.add_note(format!(
                "Q: {}\nA: {}\n",
                question.question, question.explanation
            ));
        }

        canvas.into_slide()
    }
}

/// Handle to the slide under construction.
#[derive(Debug)]
pub struct SlideCanvas<'a> {
    slide: &'a mut Slide,
    theme: &'a Theme,
}

impl<'a> SlideCanvas<'a> {
    /// The slide being built.
    pub fn slide(&self) -> &Slide {
        self.slide
    }

    /// Release the canvas, keeping a shared borrow of the slide.
    pub fn into_slide(self) -> &'a Slide {
        self.slide
    }

    /// Insert a word-wrapped, single-paragraph text box.
    pub fn add_text(&mut self, frame: Rect, text: &str, style: &TextStyle) -> &mut TextFrame {
        self.text_box(frame, text, style, true)
    }

    fn text_box(
        &mut self,
        frame: Rect,
        text: &str,
        style: &TextStyle,
        word_wrap: bool,
    ) -> &mut TextFrame {
        let font = Font {
            name: Some(style.font.clone().unwrap_or_else(|| self.theme.font.clone())),
            size: Some(style.size),
            color: Some(style.color),
            bold: Some(style.bold),
        };
        let tf = self.slide.add_text_box(frame);
        tf.word_wrap = word_wrap;
        let paragraph = tf.add_paragraph();
        paragraph.alignment = Some(style.align);
        paragraph.add_run(text, font);
        tf
    }

    /// Insert one paragraph made of differently styled runs, in order.
    pub fn add_rich_text(
        &mut self,
        frame: Rect,
        runs: &[RichRun],
        alignment: Alignment,
    ) -> &mut TextFrame {
        let font_name = self.theme.font.clone();
        let tf = self.slide.add_text_box(frame);
        tf.word_wrap = true;
        let paragraph = tf.add_paragraph();
        paragraph.alignment = Some(alignment);
        for run in runs {
            paragraph.add_run(
                run.text.as_str(),
                Font {
                    name: Some(font_name.clone()),
                    size: Some(run.size),
                    color: Some(run.color),
                    bold: Some(run.bold),
                },
            );
        }
        tf
    }

    /// Insert one paragraph per bullet, each led by its emoji.
    pub fn add_bullets(
        &mut self,
        frame: Rect,
        items: &[Bullet],
        style: &BulletStyle,
    ) -> &mut TextFrame {
        let font = |color| Font {
            name: Some(self.theme.font.clone()),
            size: Some(style.font_size),
            color: Some(color),
            bold: None,
        };
        let icon_font = font(style.icon_color);
        let text_font = font(style.text_color);

        let tf = self.slide.add_text_box(frame);
        tf.word_wrap = true;
        for item in items {
            let paragraph = tf.add_paragraph();
            paragraph.space_before = Some(style.space_before);
            paragraph.space_after = Some(style.space_after);
            paragraph.add_run(item.icon.as_str(), icon_font.clone());
            paragraph.add_run(format!("  {}", item.text), text_font.clone());
        }
        tf
    }

    /// Insert a filled preset shape.
    pub fn add_panel(
        &mut self,
        geometry: Geometry,
        frame: Rect,
        fill: Color,
        line: Option<Outline>,
    ) {
        self.slide.add_shape(Shape::AutoShape(AutoShape {
            geometry,
            frame,
            fill: Some(fill),
            line,
        }));
    }

    /// Insert a callout: rounded background, accent bar on the left edge,
    /// uppercase label, and body text.
    pub fn add_callout(&mut self, frame: Rect, label: &str, text: &str, style: &CalloutStyle) {
        let Rect {
            left,
            top,
            width,
            height,
        } = frame;

        self.add_panel(Geometry::RoundedRectangle, frame, palette::SURFACE, None);
        self.add_panel(
            Geometry::Rectangle,
            Rect::new(
                left,
                top + Emu::inches(0.05),
                Emu::inches(0.08),
                height - Emu::inches(0.1),
            ),
            style.border_color,
            None,
        );

        self.add_text(
            Rect::new(
                left + Emu::inches(0.25),
                top + Emu::inches(0.1),
                width - Emu::inches(0.4),
                Emu::inches(0.3),
            ),
            &label.to_uppercase(),
            &TextStyle::sized(12.0).color(style.label_color).bold(),
        );
        self.add_text(
            Rect::new(
                left + Emu::inches(0.25),
                top + Emu::inches(0.38),
                width - Emu::inches(0.4),
                height - Emu::inches(0.5),
            ),
            text,
            &TextStyle::sized(18.0).color(palette::DIM),
        );
    }

    /// Insert a discussion prompt: outlined box, fixed header, and the
    /// question in large type.
    pub fn add_discussion(&mut self, frame: Rect, question: &str) {
        let Rect {
            left,
            top,
            width,
            height,
        } = frame;

        self.add_panel(
            Geometry::RoundedRectangle,
            frame,
            palette::DISCUSSION,
            Some(Outline {
                color: palette::PURPLE,
                width: Some(2.0),
            }),
        );
        self.add_text(
            Rect::new(
                left + Emu::inches(0.3),
                top + Emu::inches(0.2),
                width - Emu::inches(0.6),
                Emu::inches(0.4),
            ),
            "💬 DISCUSSION PROMPT",
            &TextStyle::sized(19.0).color(palette::PURPLE).bold(),
        );
        self.add_text(
            Rect::new(
                left + Emu::inches(0.3),
                top + Emu::inches(0.55),
                width - Emu::inches(0.6),
                height - Emu::inches(0.7),
            ),
            question,
            &TextStyle::sized(28.0),
        );
    }

    /// Append a speaker-note paragraph.
    pub fn add_note(&mut self, text: impl Into<String>) {
        self.slide.add_note(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Callout, QuizQuestion};
    use crate::style::CalloutKind;

    fn builder() -> DeckBuilder {
        DeckBuilder::new(Theme::default())
    }

    fn question(text: &str, correct: usize) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct,
            explanation: format!("because {}", text),
        }
    }

    #[test]
    fn test_add_slide_numbers_monotonic() {
        let mut deck = builder();
        for expected in 1..=5 {
            let canvas = deck.add_slide();
            let slide = canvas.slide();
            assert_eq!(slide.number(), expected);
            assert_eq!(slide.shapes().len(), 1);
            assert_eq!(slide.shapes()[0].text(), expected.to_string());
            assert_eq!(slide.shapes()[0].frame(), Rect::inches(12.3, 7.0, 0.8, 0.4));
            assert_eq!(slide.background, Some(palette::BACKGROUND));
        }
        assert_eq!(deck.slide_count(), 5);
        assert_eq!(deck.document().slide_count(), 5);
    }

    #[test]
    fn test_number_label_style() {
        let mut deck = builder();
        let canvas = deck.add_slide();
        let label = canvas.slide().shapes()[0].as_text_box().unwrap();
        assert!(!label.text_frame.word_wrap);
        let paragraph = &label.text_frame.paragraphs[0];
        assert_eq!(paragraph.alignment, Some(Alignment::Right));
        assert_eq!(paragraph.runs[0].font.size, Some(10.0));
        assert_eq!(paragraph.runs[0].font.color, Some(palette::DIM));
        assert_eq!(paragraph.runs[0].font.name.as_deref(), Some("Calibri"));
    }

    #[test]
    fn test_add_text_applies_style() {
        let mut deck = builder();
        let mut canvas = deck.add_slide();
        let style = TextStyle::sized(36.0).color(palette::PURPLE).bold().centered();
        let tf = canvas.add_text(Rect::inches(1.0, 1.0, 5.0, 1.0), "Hello", &style);
        assert!(tf.word_wrap);
        assert_eq!(tf.paragraphs.len(), 1);
        let run = &tf.paragraphs[0].runs[0];
        assert_eq!(run.text, "Hello");
        assert_eq!(run.font.bold, Some(true));
        assert_eq!(run.font.size, Some(36.0));
        assert_eq!(tf.paragraphs[0].alignment, Some(Alignment::Center));
    }

    #[test]
    fn test_rich_text_preserves_run_order() {
        let mut deck = builder();
        let mut canvas = deck.add_slide();
        let runs = vec![
            RichRun {
                text: "Bold ".into(),
                size: 20.0,
                color: palette::PURPLE,
                bold: true,
            },
            RichRun {
                text: "plain".into(),
                size: 18.0,
                color: palette::DIM,
                bold: false,
            },
        ];
        let tf = canvas.add_rich_text(Rect::inches(1.0, 1.0, 5.0, 1.0), &runs, Alignment::Center);
        assert_eq!(tf.paragraphs.len(), 1);
        assert_eq!(tf.text(), "Bold plain");
        assert_eq!(tf.paragraphs[0].runs[0].font.bold, Some(true));
        assert_eq!(tf.paragraphs[0].runs[1].font.color, Some(palette::DIM));
    }

    #[test]
    fn test_bullets_one_paragraph_per_item() {
        let mut deck = builder();
        let mut canvas = deck.add_slide();
        let items = vec![Bullet::new("📱", "One"), Bullet::new("🔒", "Two")];
        let tf = canvas.add_bullets(
            Rect::inches(1.5, 1.0, 10.333, 4.5),
            &items,
            &BulletStyle::default(),
        );
        assert_eq!(tf.paragraphs.len(), 2);
        assert_eq!(tf.paragraphs[0].text(), "📱  One");
        assert_eq!(tf.paragraphs[1].text(), "🔒  Two");
        assert_eq!(tf.paragraphs[1].space_after, Some(6.0));
        assert_eq!(tf.paragraphs[1].space_before, Some(2.0));
        assert_eq!(tf.paragraphs[0].runs[0].font.color, Some(palette::PURPLE));
        assert_eq!(tf.paragraphs[0].runs[1].font.color, Some(palette::WHITE));
    }

    #[test]
    fn test_callout_layout() {
        let mut deck = builder();
        let mut canvas = deck.add_slide();
        canvas.add_callout(
            Rect::inches(1.5, 2.0, 10.333, 1.0),
            "Real Talk",
            "Body",
            &CalloutStyle::default(),
        );
        let shapes = canvas.slide().shapes();
        assert_eq!(shapes.len(), 5);

        let background = shapes[1].as_auto_shape().unwrap();
        assert_eq!(background.geometry, Geometry::RoundedRectangle);
        assert_eq!(background.fill, Some(palette::SURFACE));
        assert!(background.line.is_none());

        let bar = shapes[2].as_auto_shape().unwrap();
        assert_eq!(bar.geometry, Geometry::Rectangle);
        assert_eq!(bar.fill, Some(palette::PURPLE));
        assert_eq!(bar.frame.width, Emu::inches(0.08));
        assert_eq!(bar.frame.top, Emu::inches(2.0) + Emu::inches(0.05));

        assert_eq!(shapes[3].text(), "REAL TALK");
        assert_eq!(shapes[4].text(), "Body");
        assert!(shapes[3].frame().top < shapes[4].frame().top);
    }

    #[test]
    fn test_discussion_slide() {
        let mut deck = builder();
        let slide = deck.discussion_slide("What excites you?");
        let shapes = slide.shapes();
        assert_eq!(shapes.len(), 4);
        let panel = shapes[1].as_auto_shape().unwrap();
        assert_eq!(panel.fill, Some(palette::DISCUSSION));
        assert_eq!(panel.line.unwrap().width, Some(2.0));
        assert_eq!(shapes[2].text(), "💬 DISCUSSION PROMPT");
        assert_eq!(shapes[3].text(), "What excites you?");
    }

    #[test]
    fn test_title_slide_with_and_without_label() {
        let mut deck = builder();
        let content = TitleSlide {
            emoji: "⏰".into(),
            title: "Habits".into(),
            subtitle: "You control the phone.".into(),
            module_label: Some("Module 2 — Tech Habits".into()),
        };
        let slide = deck.title_slide(&content);
        let texts: Vec<String> = slide.shapes().iter().map(|s| s.text()).collect();
        assert_eq!(
            texts,
            vec!["1", "MODULE 2 — TECH HABITS", "⏰", "Habits", "You control the phone."]
        );

        let without = TitleSlide {
            module_label: None,
            ..content
        };
        let slide = deck.title_slide(&without);
        assert_eq!(slide.shapes().len(), 4);
        assert_eq!(slide.shapes()[1].frame().top, Emu::inches(1.0));
    }

    #[test]
    fn test_content_slide_title_only() {
        let mut deck = builder();
        let slide = deck.content_slide(&ContentSlide::titled("Only a title"));
        assert_eq!(slide.shapes().len(), 2);
        assert_eq!(slide.shapes()[1].frame().top, Emu::inches(0.4));
    }

    #[test]
    fn test_content_slide_section_deltas() {
        let base = ContentSlide::titled("T");
        let variants: Vec<(ContentSlide, usize)> = vec![
            (
                ContentSlide {
                    emoji: Some("🎉".into()),
                    ..base.clone()
                },
                1,
            ),
            (
                ContentSlide {
                    emoji: Some(String::new()),
                    ..base.clone()
                },
                0,
            ),
            (
                ContentSlide {
                    body_text: Some("body".into()),
                    ..base.clone()
                },
                1,
            ),
            (
                ContentSlide {
                    body_items: vec![Bullet::new("a", "b"), Bullet::new("c", "d")],
                    ..base.clone()
                },
                1,
            ),
            (
                ContentSlide {
                    callouts: vec![
                        Callout {
                            kind: CalloutKind::Tip,
                            label: "Pro Tip".into(),
                            text: "x".into(),
                        },
                        Callout {
                            kind: CalloutKind::Warning,
                            label: "Important".into(),
                            text: "y".into(),
                        },
                    ],
                    ..base.clone()
                },
                8,
            ),
            (
                ContentSlide {
                    note: Some("note".into()),
                    ..base.clone()
                },
                1,
            ),
        ];

        let mut deck = builder();
        let baseline = deck.content_slide(&base).shapes().len();
        for (content, delta) in variants {
            let count = deck.content_slide(&content).shapes().len();
            assert_eq!(count, baseline + delta, "{:?}", content);
        }
    }

    #[test]
    fn test_content_slide_one_bullet_one_callout() {
        let mut deck = builder();
        let content = ContentSlide {
            emoji: Some("😴".into()),
            title: "Sleep Hygiene".into(),
            body_items: vec![Bullet::new("🚫", "No phone in your bedroom at night")],
            callouts: vec![Callout {
                kind: CalloutKind::RealTalk,
                label: "Real Talk".into(),
                text: "Sleep matters.".into(),
            }],
            ..ContentSlide::default()
        };
        let slide = deck.content_slide(&content);
        // number label + emoji + title + bullets + (panel, bar, label, body)
        assert_eq!(slide.shapes().len(), 1 + 1 + 1 + 1 + 4);

        let callout_top = slide.shapes()[4].frame().top;
        assert_eq!(callout_top, Emu::inches(0.4 + 0.8 + 0.7 + 0.38));
    }

    #[test]
    fn test_quiz_slide_marks_and_notes() {
        let mut deck = builder();
        let quiz = QuizSlide {
            title: "📝 Quiz — Part 1".into(),
            questions: vec![question("first", 1), question("second", 2)],
        };
        let slide = deck.quiz_slide(&quiz);

        // label + title + 2 * (question + 3 options)
        assert_eq!(slide.shapes().len(), 2 + 2 * 4);
        assert_eq!(slide.shapes()[3].text(), "○ a");
        assert_eq!(slide.shapes()[4].text(), "✅ b");
        let correct = slide.shapes()[4].as_text_box().unwrap();
        assert_eq!(
            correct.text_frame.paragraphs[0].runs[0].font.color,
            Some(palette::GREEN)
        );

        assert_eq!(
            slide.notes(),
            &[
                "Q: first\nA: because first\n".to_string(),
                "Q: second\nA: because second\n".to_string(),
            ]
        );
    }

    #[test]
    fn test_quiz_notes_match_question_count() {
        let mut deck = builder();
        for n in 0..4 {
            let quiz = QuizSlide {
                title: "Quiz".into(),
                questions: (0..n).map(|i| question(&i.to_string(), 0)).collect(),
            };
            assert_eq!(deck.quiz_slide(&quiz).notes().len(), n);
        }
    }

    #[test]
    fn test_finish_keeps_title() {
        let mut deck = builder().with_title("Course");
        deck.discussion_slide("?");
        let doc = deck.finish();
        assert_eq!(doc.title.as_deref(), Some("Course"));
        assert_eq!(doc.slide_count(), 1);
    }
}
