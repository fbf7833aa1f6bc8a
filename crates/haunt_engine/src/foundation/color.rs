//! RGB colors with `#rrggbb` parsing
//!
//! Colors are written in configuration files and panel edits as CSS-style hex
//! strings and stored as normalized floating point channels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::foundation::math::Vec3;

/// Normalized RGB color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel (0.0 to 1.0)
    pub r: f32,
    /// Green channel (0.0 to 1.0)
    pub g: f32,
    /// Blue channel (0.0 to 1.0)
    pub b: f32,
}

/// Errors produced when parsing a hex color
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// The string did not start with `#`
    #[error("color must start with '#': {0}")]
    MissingHash(String),

    /// The string was not exactly six hex digits
    #[error("color must have six hex digits: {0}")]
    InvalidDigits(String),
}

impl Color {
    /// White
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Create a color from normalized channels
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| f32::from(((hex >> shift) & 0xff) as u8) / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Pack into `0xRRGGBB`
    pub fn to_hex(self) -> u32 {
        // Channels are clamped to [0, 255] before the cast.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (quantize(self.r) << 16) | (quantize(self.g) << 8) | quantize(self.b)
    }

    /// Channels as a vector, for shading math
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if digits.len() != 6 {
            return Err(ColorParseError::InvalidDigits(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Self::from_hex)
            .map_err(|_| ColorParseError::InvalidDigits(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_hex_string() {
        let color: Color = "#ff7d46".parse().unwrap();
        assert_relative_eq!(color.r, 1.0);
        assert_relative_eq!(color.g, 125.0 / 255.0);
        assert_relative_eq!(color.b, 70.0 / 255.0);
        assert_eq!(color.to_string(), "#ff7d46");
    }

    #[test]
    fn test_reject_malformed() {
        assert!(matches!("ff7d46".parse::<Color>(), Err(ColorParseError::MissingHash(_))));
        assert!(matches!("#ff7d4".parse::<Color>(), Err(ColorParseError::InvalidDigits(_))));
        assert!(matches!("#gg7d46".parse::<Color>(), Err(ColorParseError::InvalidDigits(_))));
    }

    #[test]
    fn test_packed_hex_round_trip() {
        assert_eq!(Color::from_hex(0x00b9_d5ff).to_hex(), 0x00b9_d5ff);
    }
}
