//! Marker generation settings.

use morphchart_anim_core::Color;
use serde::{Deserialize, Serialize};

/// Colors and label formatting used by the marker generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Categorical colors, indexed by color-channel slot (wrapping).
    pub palette: Vec<Color>,
    /// Continuous color scale endpoints for a measure on the color channel.
    pub gradient_low: Color,
    pub gradient_high: Color,
    /// Color used when nothing is on the color channel.
    pub default_color: Color,
    /// Decimal places in label text.
    pub label_precision: usize,
    /// The lightness channel maps its range onto `-span..=span`.
    pub lightness_span: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            palette: vec![
                Color::rgb(0.310, 0.533, 0.906),
                Color::rgb(0.988, 0.463, 0.314),
                Color::rgb(0.176, 0.702, 0.459),
                Color::rgb(0.918, 0.259, 0.471),
                Color::rgb(0.604, 0.412, 0.831),
                Color::rgb(0.961, 0.757, 0.176),
                Color::rgb(0.251, 0.737, 0.847),
                Color::rgb(0.588, 0.588, 0.588),
            ],
            gradient_low: Color::rgb(0.216, 0.361, 0.675),
            gradient_high: Color::rgb(0.988, 0.773, 0.251),
            default_color: Color::rgb(0.310, 0.533, 0.906),
            label_precision: 1,
            lightness_span: 0.4,
        }
    }
}

impl GeneratorConfig {
    pub fn palette_color(&self, slot: usize) -> Color {
        if self.palette.is_empty() {
            return self.default_color;
        }
        self.palette[slot % self.palette.len()]
    }
}
