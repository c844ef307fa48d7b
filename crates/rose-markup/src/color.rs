//! Text colours as written in markup.
//!
//! A colour is written `a,r,g,b` with decimal components. A zero alpha means
//! "no colour" so that callers fall back to the default text colour.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ColorError;

/// An ARGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Alpha channel.
    pub a: u8,
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Opaque black, the default text colour.
    pub const BLACK: Self = Self::argb(255, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::argb(255, 255, 255, 255);
    /// Colour used for resolvable hyperlinks.
    pub const LINK: Self = Self::argb(255, 255, 255, 0);
    /// Colour used for hyperlinks whose destination does not exist.
    pub const BROKEN_LINK: Self = Self::argb(255, 255, 0, 0);
    /// Named colour `hero`.
    pub const HERO: Self = Self::from_u32(0xff00_ff00);
    /// Named colour `object`.
    pub const OBJECT: Self = Self::from_u32(0xffff_ff00);
    /// Named colour `tactic`.
    pub const TACTIC: Self = Self::from_u32(0xff00_00ff);

    /// Build a colour from its channels.
    #[must_use]
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Build a colour from a packed `0xAARRGGBB` value.
    #[must_use]
    pub const fn from_u32(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        Self { a, r, g, b }
    }

    /// Pack into `0xAARRGGBB`.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }

    /// Channels in RGBA order, as image buffers want them.
    #[must_use]
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse `a,r,g,b`. Returns `None` for malformed input or zero alpha.
    #[must_use]
    pub fn decode(text: &str) -> Option<Self> {
        let mut parts = text.split(',').map(|p| p.trim().parse::<u8>());
        let (Some(Ok(a)), Some(Ok(r)), Some(Ok(g)), Some(Ok(b)), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return None;
        };
        (a != 0).then_some(Self { a, r, g, b })
    }

    /// Format as `a,r,g,b`.
    #[must_use]
    pub fn encode(self) -> String {
        self.to_string()
    }

    /// Look up one of the named colours.
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "hero" => Some(Self::HERO),
            "object" => Some(Self::OBJECT),
            "tactic" => Some(Self::TACTIC),
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.a, self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::named(value.trim())
            .or_else(|| Self::decode(&value))
            .ok_or(ColorError(value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_and_encode() {
        let c = Color::decode("255, 10,20,30").unwrap();
        assert_eq!(c, Color::argb(255, 10, 20, 30));
        assert_eq!(c.encode(), "255,10,20,30");
        assert_eq!(Color::decode(&c.encode()), Some(c));
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert_eq!(Color::decode("0,1,2,3"), None);
        assert_eq!(Color::decode("255,1,2"), None);
        assert_eq!(Color::decode("255,1,2,3,4"), None);
        assert_eq!(Color::decode("255,1,2,300"), None);
    }

    #[test]
    fn test_packed_round_trip() {
        assert_eq!(Color::HERO.to_u32(), 0xff00_ff00);
        assert_eq!(Color::from_u32(0x8010_2030), Color::argb(0x80, 0x10, 0x20, 0x30));
    }
}
