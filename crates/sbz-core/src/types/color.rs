//! Tag colors.
//!
//! Colors are stored as straight RGBA bytes and written to disk in hex
//! notation: `#rrggbb` when fully opaque, `#rrggbbaa` otherwise. Parsing
//! accepts the same forms with or without the leading `#`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// An RGBA color attached to a tag definition.
///
/// Defaults to opaque white.
///
/// # Examples
///
/// ```
/// use sbz_core::TagColor;
///
/// let color: TagColor = "#ff8000".parse().unwrap();
/// assert_eq!(color, TagColor::rgb(0xff, 0x80, 0x00));
/// assert_eq!(color.to_string(), "#ff8000");
/// assert_eq!(TagColor::default(), TagColor::WHITE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is opaque.
    pub a: u8,
}

impl TagColor {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    /// Creates an opaque color.
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Creates a color with an explicit alpha channel.
    #[inline]
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns `true` if the alpha channel is 255.
    #[inline]
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.a == 0xff
    }
}

impl Default for TagColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for TagColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if !self.is_opaque() {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for TagColor {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CatalogError::InvalidColor(s.to_owned()));
        }

        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| CatalogError::InvalidColor(s.to_owned()))
        };

        let a = if hex.len() == 8 { channel(6)? } else { 0xff };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for TagColor {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TagColor> for String {
    fn from(color: TagColor) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_hash_prefix_and_bare_hex() {
        assert_eq!("#102030".parse::<TagColor>().unwrap(), TagColor::rgb(0x10, 0x20, 0x30));
        assert_eq!("102030".parse::<TagColor>().unwrap(), TagColor::rgb(0x10, 0x20, 0x30));
        assert_eq!("FFffFF".parse::<TagColor>().unwrap(), TagColor::WHITE);
    }

    #[test]
    fn test_parse_alpha() {
        let color: TagColor = "#00000080".parse().unwrap();
        assert_eq!(color.a, 0x80);
        assert!(!color.is_opaque());
        assert_eq!(color.to_string(), "#00000080");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<TagColor>().is_err());
        assert!("#fff".parse::<TagColor>().is_err());
        assert!("#gg0000".parse::<TagColor>().is_err());
        assert!("#ff00ff0".parse::<TagColor>().is_err());
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let json = serde_json::to_string(&TagColor::rgb(0xab, 0xcd, 0xef)).unwrap();
        assert_eq!(json, "\"#abcdef\"");

        let parsed: TagColor = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(parsed, TagColor::rgb(0, 0xff, 0));

        assert!(serde_json::from_str::<TagColor>("\"blue\"").is_err());
    }
}
