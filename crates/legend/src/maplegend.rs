//! Bucketed value-to-color legend.

use serde::{Deserialize, Serialize};
use wafer_common::Color;

use crate::palettes;

/// Color returned when the palette is empty.
pub const EMPTY_PALETTE_COLOR: Color = Color::WHITE;

/// Legend configuration as it appears in a wafer description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegendConfig {
    /// Built-in palette number, used when `colors` is absent
    #[serde(default)]
    pub pattern: u32,

    /// Explicit palette, lowest bucket first
    #[serde(default)]
    pub colors: Option<Vec<Color>>,

    /// Value mapped to the first bucket
    #[serde(default = "default_min")]
    pub min: f64,

    /// Value mapped past the last bucket
    #[serde(default = "default_max")]
    pub max: f64,

    /// Width in pixels
    #[serde(default = "default_legend_width")]
    pub width: u32,

    /// Height in pixels
    #[serde(default = "default_legend_height")]
    pub height: u32,
}

fn default_min() -> f64 {
    -1.0
}
fn default_max() -> f64 {
    4.0
}
fn default_legend_width() -> u32 {
    600
}
fn default_legend_height() -> u32 {
    20
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            pattern: 0,
            colors: None,
            min: default_min(),
            max: default_max(),
            width: default_legend_width(),
            height: default_legend_height(),
        }
    }
}

/// One painted band of the legend strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendBand {
    pub x1: f64,
    pub x2: f64,
    pub color: Color,
}

/// A color legend over `[min, max)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLegend {
    pub width: u32,
    pub height: u32,
    pub min: f64,
    pub max: f64,
    colors: Vec<Color>,
}

impl MapLegend {
    /// Legend with the built-in palette for `pattern` and the default range `[-1, 4]`.
    pub fn new(pattern: u32) -> Self {
        Self {
            width: default_legend_width(),
            height: default_legend_height(),
            min: default_min(),
            max: default_max(),
            colors: palettes::for_pattern(pattern),
        }
    }

    pub fn from_config(config: &LegendConfig) -> Self {
        let colors = config
            .colors
            .clone()
            .unwrap_or_else(|| palettes::for_pattern(config.pattern));
        Self {
            width: config.width,
            height: config.height,
            min: config.min,
            max: config.max,
            colors,
        }
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_palette(mut self, colors: Vec<Color>) -> Self {
        self.colors = colors;
        self
    }

    pub fn palette(&self) -> &[Color] {
        &self.colors
    }

    /// Index of the bucket `value` falls into.
    ///
    /// `floor(len * (value - min) / (max - min))`, clamped to the palette.
    /// A zero-width range saturates: values above `min` land in the last
    /// bucket, values below it and `min` itself in the first.
    pub fn bucket(&self, value: f64) -> Option<usize> {
        let len = self.colors.len();
        if len == 0 {
            return None;
        }
        let raw = (len as f64 * (value - self.min) / (self.max - self.min)).floor();
        // `as` saturates infinities and maps NaN to 0.
        let idx = (raw as i64).clamp(0, len as i64 - 1);
        Some(idx as usize)
    }

    /// Color for `value`; white when the palette is empty.
    pub fn select(&self, value: f64) -> Color {
        match self.bucket(value) {
            Some(idx) => self.colors[idx],
            None => {
                tracing::debug!(value, "Legend palette is empty");
                EMPTY_PALETTE_COLOR
            }
        }
    }

    /// Equal-width bands across the legend width, one per palette color.
    pub fn bands(&self) -> Vec<LegendBand> {
        let n = self.colors.len();
        let width = self.width as f64;
        let mut x1 = 0.0;
        self.colors
            .iter()
            .enumerate()
            .map(|(i, &color)| {
                let x2 = (i + 1) as f64 * width / n as f64;
                let band = LegendBand { x1, x2, color };
                x1 = x2;
                band
            })
            .collect()
    }
}

impl Default for MapLegend {
    fn default() -> Self {
        Self::new(0)
    }
}
