//! Colors: RGBA values parsed from hex strings and HSL conversions.
//!
//! Hex parsing is the only fallible color operation. Everything else clamps
//! or wraps out-of-range input instead of failing, so the color-picker side of
//! the host can push raw slider values straight through.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::FULL_TURN_DEG;

/// Error returned by [`Color::from_hex`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    /// The input is not 3, 4, 6 or 8 hexadecimal digits (after an optional `#`).
    #[error("invalid hexadecimal color code: {0:?}")]
    InvalidHex(String),
}

/// An 8-bit RGBA color. Serialized as a `#rrggbb` / `#rrggbbaa` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Opaque color from its channels.
    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue, alpha: u8::MAX }
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` (the `#` is optional,
    /// digits are case-insensitive). Missing alpha means opaque.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidHex`] for any other input.
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        let invalid = || ColorError::InvalidHex(input.to_owned());

        if !matches!(digits.len(), 3 | 4 | 6 | 8) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let expanded: String = if digits.len() <= 4 {
            digits.chars().flat_map(|c| [c, c]).collect()
        } else {
            digits.to_owned()
        };

        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if expanded.len() == 8 { channel(6)? } else { u8::MAX };

        Ok(Self { red: channel(0)?, green: channel(2)?, blue: channel(4)?, alpha })
    }

    /// `#rrggbb`, lowercase. Alpha is appended only when not opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.alpha == u8::MAX {
            format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.red, self.green, self.blue, self.alpha)
        }
    }

    /// Convert from HSL. Hue wraps into `[0, 360)`; saturation and lightness
    /// are clamped into `[0, 100]`.
    #[must_use]
    pub fn from_hsl(hsl: Hsl) -> Self {
        let hue = hsl.hue.rem_euclid(FULL_TURN_DEG);
        let saturation = hsl.saturation.clamp(0.0, 100.0) / 100.0;
        let lightness = hsl.lightness.clamp(0.0, 100.0) / 100.0;

        let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let secondary = chroma * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
        let m = lightness - chroma / 2.0;

        let (red, green, blue) = match hue {
            h if h < 60.0 => (chroma, secondary, 0.0),
            h if h < 120.0 => (secondary, chroma, 0.0),
            h if h < 180.0 => (0.0, chroma, secondary),
            h if h < 240.0 => (0.0, secondary, chroma),
            h if h < 300.0 => (secondary, 0.0, chroma),
            _ => (chroma, 0.0, secondary),
        };

        Self::rgb(unit_to_channel(red + m), unit_to_channel(green + m), unit_to_channel(blue + m))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    #[must_use]
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self { hue, saturation, lightness }
    }

    /// Convert an RGB color; all three components are rounded to integers.
    #[must_use]
    pub fn from_rgb(color: Color) -> Self {
        let red = f64::from(color.red) / 255.0;
        let green = f64::from(color.green) / 255.0;
        let blue = f64::from(color.blue) / 255.0;

        let max = red.max(green).max(blue);
        let min = red.min(green).min(blue);
        let delta = max - min;
        let lightness = (max + min) / 2.0;

        let mut hue = 0.0;
        let mut saturation = 0.0;

        if delta > 0.0 {
            saturation = delta / (1.0 - (2.0 * lightness - 1.0).abs());
            hue = if max == red {
                ((green - blue) / delta) % 6.0
            } else if max == green {
                (blue - red) / delta + 2.0
            } else {
                (red - green) / delta + 4.0
            };
            hue *= 60.0;
            if hue < 0.0 {
                hue += FULL_TURN_DEG;
            }
        }

        Self {
            hue: hue.round(),
            saturation: (saturation * 100.0).round(),
            lightness: (lightness * 100.0).round(),
        }
    }

    /// Parse a hex string and convert it.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidHex`] when `input` is not a valid hex color.
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        Color::from_hex(input).map(Self::from_rgb)
    }

    /// Same hue at full saturation and 50% lightness (the picker's hue strip).
    #[must_use]
    pub fn normalize(self) -> Self {
        Self { hue: self.hue, saturation: 100.0, lightness: 50.0 }
    }

    #[must_use]
    pub fn to_color(self) -> Color {
        Color::from_hsl(self)
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}
