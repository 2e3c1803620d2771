//! Color legend for wafer maps.
//!
//! A legend splits a value range into equal-width buckets, one per palette
//! color, and answers which color a value falls into. It also exposes the
//! band geometry a renderer needs to paint the legend strip.

pub mod maplegend;
pub mod palettes;

pub use maplegend::{LegendBand, LegendConfig, MapLegend};
