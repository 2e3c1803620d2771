//! Wafer description files.
//!
//! A description is a YAML or JSON document naming the wafer bounds, the
//! origin, the aggregation mode and the layers to attach, plus optional
//! layout, palette, legend and highlight settings for renderers:
//!
//! ```yaml
//! name: LOT42-W07
//! bounds: { min_row: 1, max_row: 3, min_col: 1, max_col: 3 }
//! origin: left-down
//! mode: testing
//! layers:
//!   - id: cp1
//!     results:            # results[row offset][col offset], -1 = unknown
//!       - [-1, 0, -1]
//!       - [ 0, 1,  0]
//!       - [-1, 0, -1]
//!     data:               # optional payload per die, same shape
//!       - [null, null, null]
//!       - [null, {bin: 7}, null]
//!       - [null, null, null]
//!   - id: retest
//!     constant: 0
//!     enabled: false
//! highlight: { code: 7 }
//! ```

use legend::{LegendConfig, MapLegend};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use wafer_common::{Origin, WaferBounds, WaferError, WaferResult};

use crate::grading::AggregationMode;
use crate::layer::{ConstantLayer, Layer, MatrixLayer};
use crate::layout::{Highlight, PassFailPalette, ShotLayout};
use crate::wafer::WaferData;

/// Root wafer description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaferDescription {
    /// Free-form label, e.g. lot and wafer number
    #[serde(default)]
    pub name: Option<String>,

    pub bounds: WaferBounds,

    #[serde(default)]
    pub origin: Origin,

    /// `testing`, `counting` or `bincode`; anything else means `testing`
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Layers in attach order
    #[serde(default)]
    pub layers: Vec<LayerDescription>,

    #[serde(default)]
    pub layout: ShotLayout,

    #[serde(default)]
    pub palette: PassFailPalette,

    #[serde(default)]
    pub legend: Option<LegendConfig>,

    #[serde(default)]
    pub highlight: Option<Highlight>,
}

fn default_mode() -> String {
    "testing".to_string()
}

/// One layer: either a result matrix (with optional payloads) or a constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerDescription {
    pub id: String,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub results: Option<Vec<Vec<i32>>>,

    #[serde(default)]
    pub constant: Option<i32>,

    #[serde(default)]
    pub data: Option<Vec<Vec<Value>>>,
}

fn default_true() -> bool {
    true
}

impl WaferDescription {
    /// Load a description, picking the parser from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> WaferResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| WaferError::IoError(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            other => Err(WaferError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    pub fn from_yaml(yaml: &str) -> WaferResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| WaferError::ParseError(format!("YAML error: {}", e)))
    }

    pub fn from_json(json: &str) -> WaferResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check bounds and every layer definition.
    pub fn validate(&self) -> WaferResult<()> {
        self.bounds.validate()?;
        for layer in &self.layers {
            layer.validate(&self.bounds)?;
        }
        Ok(())
    }

    pub fn mode(&self) -> AggregationMode {
        AggregationMode::from_name(&self.mode)
    }

    /// Validate and build the wafer with all layers attached in order.
    pub fn build(&self) -> WaferResult<WaferData> {
        self.validate()?;

        let mut wafer = WaferData::new(self.bounds, self.origin, self.mode());
        for layer in &self.layers {
            wafer.attach_layer(layer.to_layer());
        }

        tracing::info!(
            name = self.name.as_deref().unwrap_or("-"),
            rows = wafer.rows(),
            cols = wafer.cols(),
            origin = %wafer.origin(),
            mode = wafer.mode().name(),
            layers = wafer.layer_count(),
            "Loaded wafer description"
        );
        Ok(wafer)
    }

    /// Legend for this wafer, defaults when none is configured.
    pub fn legend(&self) -> MapLegend {
        self.legend
            .as_ref()
            .map(MapLegend::from_config)
            .unwrap_or_default()
    }
}

impl LayerDescription {
    pub fn validate(&self, bounds: &WaferBounds) -> WaferResult<()> {
        let invalid = |message: &str| WaferError::InvalidLayer {
            id: self.id.clone(),
            message: message.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty"));
        }

        match (&self.results, self.constant) {
            (Some(_), Some(_)) => {
                return Err(invalid("set either 'results' or 'constant', not both"))
            }
            (None, None) => return Err(invalid("one of 'results' or 'constant' is required")),
            (None, Some(_)) if self.data.is_some() => {
                return Err(invalid("'data' needs a 'results' matrix"))
            }
            _ => {}
        }

        // A short matrix is legal (missing dies read as unknown) but usually a mistake.
        if let Some(results) = &self.results {
            let rows = bounds.rows() as usize;
            let cols = bounds.cols() as usize;
            if results.len() != rows || results.iter().any(|r| r.len() != cols) {
                tracing::warn!(
                    layer = %self.id,
                    expected_rows = rows,
                    expected_cols = cols,
                    actual_rows = results.len(),
                    "Layer result matrix does not match wafer bounds"
                );
            }
        }
        Ok(())
    }

    pub fn to_layer(&self) -> Layer {
        let layer = match (&self.results, self.constant) {
            (Some(results), _) => {
                let mut matrix = MatrixLayer::new(results.clone());
                if let Some(data) = &self.data {
                    matrix = matrix.with_data(data.clone());
                }
                Layer::new(self.id.as_str(), matrix)
            }
            (None, constant) => Layer::new(
                self.id.as_str(),
                ConstantLayer(constant.unwrap_or(crate::grading::UNKNOWN)),
            ),
        };
        layer.with_enabled(self.enabled)
    }
}
