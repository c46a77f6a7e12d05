//! Notebook colour scheme.
//!
//! The same colours as the blog theme the notebooks are published to, plus
//! the order in which plot series cycle through them.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Components scaled to `0.0..=1.0`, as most plotting APIs take them.
    pub fn to_unit(self) -> [f64; 3] {
        [self.r, self.g, self.b].map(|c| f64::from(c) / 255.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidColor(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let rgb = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        Ok(Color::hex(rgb))
    }
}

pub const FG: Color = Color::hex(0xE6F6FE);
pub const BG: Color = Color::hex(0xFFFFFF);
pub const PRIMARY: Color = Color::hex(0xBF1616);
pub const SECONDARY: Color = Color::hex(0x615F5C);
pub const TERTIARY: Color = Color::hex(0xF6F7F7);
pub const BLACK: Color = Color::hex(0x000000);
pub const WHITE: Color = Color::hex(0xFFFFFF);
pub const GRAY: Color = Color::hex(0xAAB9C3);
pub const PINK: Color = Color::hex(0xF68DA6);
pub const RED: Color = Color::hex(0xCF2E2E);
pub const ORANGE: Color = Color::hex(0xFF6801);
pub const YELLOW: Color = Color::hex(0xFCB900);
pub const TURQUOISE: Color = Color::hex(0x7BDCB5);
pub const GREEN: Color = Color::hex(0x01D184);
pub const SKY_BLUE: Color = Color::hex(0x8ED1FC);
pub const BLUE: Color = Color::hex(0x0693E3);
pub const PURPLE: Color = Color::hex(0x9B50E1);

/// Order in which successive plot series are coloured.
pub const PLOT_CYCLE: [Color; 9] = [
    RED, BLUE, GREEN, PURPLE, YELLOW, ORANGE, PINK, TURQUOISE, SKY_BLUE,
];

/// Endless iterator over [`PLOT_CYCLE`].
pub fn cycle() -> impl Iterator<Item = Color> {
    PLOT_CYCLE.into_iter().cycle()
}
