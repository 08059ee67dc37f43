use crate::utils::error::{FigError, Result};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const BLACK: Color = Color::rgb(0, 0, 0);

/// Paul Tol's colour-blind safe "bright" qualitative scheme, closed by black.
pub const TOL_BRIGHT: [Color; 8] = [
    Color::rgb(0x44, 0x77, 0xAA), // blue
    Color::rgb(0xEE, 0x66, 0x77), // red
    Color::rgb(0x22, 0x88, 0x33), // green
    Color::rgb(0xCC, 0xBB, 0x44), // yellow
    Color::rgb(0x66, 0xCC, 0xEE), // cyan
    Color::rgb(0xAA, 0x33, 0x77), // purple
    Color::rgb(0xBB, 0xBB, 0xBB), // grey
    BLACK,
];

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || FigError::ValidationError {
            message: format!("invalid hex color '{}'", hex),
        };
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Endless colour cycle over the bright scheme.
pub fn bright_cycle() -> impl Iterator<Item = Color> {
    TOL_BRIGHT.iter().copied().cycle()
}
