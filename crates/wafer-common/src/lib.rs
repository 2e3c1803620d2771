//! Common types and utilities shared across the wafer map workspace.

pub mod color;
pub mod error;
pub mod grid;
pub mod layer;

pub use color::Color;
pub use error::{WaferError, WaferResult};
pub use grid::{DieOffset, DiePos, DrawCell, GridMapper, Origin, WaferBounds};
pub use layer::LayerId;
