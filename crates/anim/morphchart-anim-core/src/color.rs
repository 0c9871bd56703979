//! RGBA color with components in 0..1.
//!
//! Serialized as a `#rrggbb` / `#rrggbbaa` string so palettes stay readable in
//! JSON configuration.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::blend::{lerp_f64, Lerp};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Default for Color {
    fn default() -> Self {
        Color::rgba(0.0, 0.0, 0.0, 1.0)
    }
}

impl Color {
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("color '{s}' must start with '#'"))?;
        let channel = |i: usize, width: usize| -> Result<f64, String> {
            let part = hex
                .get(i..i + width)
                .ok_or_else(|| format!("color '{s}' is truncated"))?;
            let v = u8::from_str_radix(part, 16).map_err(|_| format!("invalid hex in '{s}'"))?;
            Ok(if width == 1 {
                f64::from(v * 17) / 255.0
            } else {
                f64::from(v) / 255.0
            })
        };
        match hex.len() {
            3 => Ok(Color::rgb(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
            6 => Ok(Color::rgb(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
            8 => Ok(Color::rgba(
                channel(0, 2)?,
                channel(2, 2)?,
                channel(4, 2)?,
                channel(6, 2)?,
            )),
            _ => Err(format!("color '{s}' has an unsupported length")),
        }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Shift lightness by `amount` in -1..1: positive mixes toward white,
    /// negative toward black. Alpha is kept.
    pub fn lightened(self, amount: f64) -> Self {
        let amount = amount.clamp(-1.0, 1.0);
        let target = if amount >= 0.0 { 1.0 } else { 0.0 };
        let t = amount.abs();
        Color::rgba(
            lerp_f64(self.r, target, t),
            lerp_f64(self.g, target, t),
            lerp_f64(self.b, target, t),
            self.a,
        )
    }

    fn to_byte(v: f64) -> u8 {
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

impl Lerp for Color {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Color::rgba(
            lerp_f64(self.r, other.r, t),
            lerp_f64(self.g, other.g, t),
            lerp_f64(self.b, other.b, t),
            lerp_f64(self.a, other.a, t),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            Self::to_byte(self.r),
            Self::to_byte(self.g),
            Self::to_byte(self.b)
        )?;
        if self.a < 1.0 {
            write!(f, "{:02x}", Self::to_byte(self.a))?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Color, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(de::Error::custom)
    }
}
