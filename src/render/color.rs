//! RGBA colour values and their `#rrggbb` text form.

use embedded_graphics::pixelcolor::PixelColor;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AudiogramError;

/// An 8-bit RGBA colour. Serialized as `#rrggbb` (or `#rrggbbaa` when not opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// The colour channels without alpha.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

// Drawn through embedded-graphics without going through a raw bit format.
impl PixelColor for Color {
    type Raw = ();
}

impl FromStr for Color {
    type Err = AudiogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AudiogramError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl TryFrom<String> for Color {
    type Error = AudiogramError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(color: Color) -> Self {
        image::Rgba([color.r, color.g, color.b, color.a])
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(pixel: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = pixel.0;
        Color::rgba(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!("#1FD5F9".parse::<Color>().unwrap(), Color::rgb(0x1f, 0xd5, 0xf9));
        assert_eq!("#ff000080".parse::<Color>().unwrap(), Color::rgba(255, 0, 0, 128));
        assert!("1fd5f9".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        // Sign characters would otherwise slip through integer parsing.
        assert!("#+f+f+f".parse::<Color>().is_err());
        assert!("#-1ffff".parse::<Color>().is_err());
    }

    #[test]
    fn test_hex_round_trip() {
        for hex in ["#1a1a1a", "#ff0000", "#00000000"] {
            assert_eq!(hex.parse::<Color>().unwrap().to_hex(), hex);
        }
    }
}
