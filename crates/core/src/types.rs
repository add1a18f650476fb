//! Geometry, color, and alignment primitives shared by the document model
//! and the package writer.

use crate::error::Error;
use serde::Deserialize;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// A length in English Metric Units, the native unit of OOXML drawings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Emu(pub i64);

impl Emu {
    /// EMUs per inch.
    pub const PER_INCH: i64 = 914_400;

    /// EMUs per typographic point.
    pub const PER_POINT: i64 = 12_700;

    /// Convert a length in inches.
    pub fn inches(value: f64) -> Self {
        Self((value * Self::PER_INCH as f64).round() as i64)
    }

    /// Convert a length in points.
    pub fn points(value: f64) -> Self {
        Self((value * Self::PER_POINT as f64).round() as i64)
    }

    /// The raw EMU value.
    pub fn get(self) -> i64 {
        self.0
    }

    /// The value expressed in inches.
    pub fn as_inches(self) -> f64 {
        self.0 as f64 / Self::PER_INCH as f64
    }
}

impl Add for Emu {
    type Output = Emu;

    fn add(self, rhs: Emu) -> Emu {
        Emu(self.0 + rhs.0)
    }
}

impl Sub for Emu {
    type Output = Emu;

    fn sub(self, rhs: Emu) -> Emu {
        Emu(self.0 - rhs.0)
    }
}

impl fmt::Display for Emu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position and size of a shape on a slide.
///
/// Deserializes from `[left, top, width, height]` in inches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "[f64; 4]")]
pub struct Rect {
    pub left: Emu,
    pub top: Emu,
    pub width: Emu,
    pub height: Emu,
}

impl Rect {
    /// Create a rectangle from EMU values.
    pub fn new(left: Emu, top: Emu, width: Emu, height: Emu) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Create a rectangle from inch values.
    pub fn inches(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(
            Emu::inches(left),
            Emu::inches(top),
            Emu::inches(width),
            Emu::inches(height),
        )
    }

    /// Whether every coordinate is non-negative.
    pub fn is_non_negative(&self) -> bool {
        self.left.0 >= 0 && self.top.0 >= 0 && self.width.0 >= 0 && self.height.0 >= 0
    }
}

impl From<[f64; 4]> for Rect {
    fn from([left, top, width, height]: [f64; 4]) -> Self {
        Self::inches(left, top, width, height)
    }
}

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a color from its components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uppercase hex form as written into `a:srgbClr/@val`.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(color) = crate::style::palette::named(s) {
            return Ok(color);
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(s.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| Error::InvalidColor(s.to_string()))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Value of the DrawingML `algn` attribute.
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Self::Left => "l",
            Self::Center => "ctr",
            Self::Right => "r",
        }
    }
}
