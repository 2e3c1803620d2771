//! RGBA colors for die palettes and legends.
//!
//! Colors are written in description files as hex strings (`"#009900"`,
//! `"#009900ff"`, `"0x009900"`), bare integers (`0x009900` in YAML), or a
//! handful of CSS-style names.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{WaferError, WaferResult};

/// Color value in RGBA format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Fill for dies with no result.
    pub const NEUTRAL: Color = Color::from_rgb_hex(0xeeeeee);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Opaque color from a packed `0xRRGGBB` value.
    pub const fn from_rgb_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
            a: 255,
        }
    }

    /// Packed `0xRRGGBB` value, alpha dropped.
    pub const fn to_rgb_hex(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub fn to_rgba(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    /// Parse a hex string or color name.
    pub fn parse(s: &str) -> WaferResult<Self> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"));

        match hex {
            Some(hex) => parse_hex(hex).ok_or_else(|| WaferError::InvalidColor(s.to_string())),
            None => named_color(trimmed).ok_or_else(|| WaferError::InvalidColor(s.to_string())),
        }
    }
}

fn parse_hex(s: &str) -> Option<Color> {
    let channel = |range: std::ops::Range<usize>| -> Option<u8> {
        u8::from_str_radix(s.get(range)?, 16).ok()
    };

    match s.len() {
        6 => Some(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        8 => Some(Color::new(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name.to_lowercase().as_str() {
        "transparent" => Color::transparent(),
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "blue" => Color::rgb(0, 0, 255),
        "yellow" => Color::rgb(255, 255, 0),
        "cyan" => Color::rgb(0, 255, 255),
        "magenta" => Color::rgb(255, 0, 255),
        "orange" => Color::rgb(255, 165, 0),
        "purple" => Color::rgb(128, 0, 128),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "lightgray" | "lightgrey" => Color::rgb(211, 211, 211),
        _ => return None,
    };
    Some(color)
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Wire forms accepted when deserializing a [`Color`].
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Packed(u32),
    Text(String),
}

impl TryFrom<ColorRepr> for Color {
    type Error = WaferError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Packed(hex) if hex <= 0xff_ffff => Ok(Color::from_rgb_hex(hex)),
            ColorRepr::Packed(hex) => Err(WaferError::InvalidColor(format!("{:#x}", hex))),
            ColorRepr::Text(s) => Color::parse(&s),
        }
    }
}
