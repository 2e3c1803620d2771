//! Wafer map data and grading core.
//!
//! A [`WaferData`] holds the logical bounds of a wafer, the physical origin
//! of its die numbering, an ordered stack of test-result layers and the
//! aggregation mode used to merge them. Renderers walk the drawing grid and
//! ask for merged grades ([`WaferData::grade`]), click payloads
//! ([`WaferData::pick`]) or a full export ([`WaferData::scan`]).
//!
//! Grading never fails: `-1` ([`grading::UNKNOWN`]) means no enabled layer
//! had a result for the die.

pub mod config;
pub mod grading;
pub mod layer;
pub mod layout;
pub mod scan;
pub mod wafer;

pub use config::{LayerDescription, WaferDescription};
pub use grading::{AggregationMode, MergeStrategy};
pub use layer::{ConstantLayer, DieLayer, FnLayer, Layer, MatrixLayer};
pub use layout::{
    DiePalette, DieRect, DieTile, Highlight, Notch, NotchSide, PassFailPalette, ShotLayout,
};
pub use scan::DieRecord;
pub use wafer::WaferData;

pub use wafer_common::{DieOffset, DiePos, DrawCell, LayerId, Origin, WaferBounds};
