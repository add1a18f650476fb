//! Document model, layout helpers, and course script for building
//! slide decks.

pub mod builder;
pub mod content;
pub mod document;
pub mod error;
pub mod script;
pub mod style;
pub mod types;

pub use builder::{DeckBuilder, SlideCanvas};
pub use content::{Bullet, Callout, ContentSlide, QuizQuestion, QuizSlide, RichRun, TitleSlide};
pub use document::{
    AutoShape, Document, Font, Geometry, Outline, Paragraph, Run, Shape, Slide, TextBox, TextFrame,
};
pub use error::{Error, Result};
pub use script::{DeckScript, Element, SlideSpec};
pub use style::{palette, BulletStyle, CalloutKind, CalloutStyle, TextStyle, Theme};
pub use types::{Alignment, Color, Emu, Rect};
