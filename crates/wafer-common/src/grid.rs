//! Wafer grid bounds and the drawing ↔ logical die coordinate mapping.
//!
//! Drawing cells are laid out the way a renderer walks them: `row` 0 is the
//! top edge and `col` 0 the left edge, increasing down and to the right.
//! Logical die coordinates are the `(row, col)` numbers printed on a wafer
//! map, bounded by `[min_row, max_row] x [min_col, max_col]`. Which physical
//! corner holds `(min_row, min_col)` is decided by the [`Origin`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{WaferError, WaferResult};

/// Physical corner holding the first logical die.
///
/// Parsing never fails: names are case-insensitive, short aliases are
/// accepted, and anything unrecognized silently becomes [`Origin::LeftDown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "kebab-case")]
pub enum Origin {
    /// Rows count upward from the bottom edge, columns rightward.
    #[default]
    LeftDown,
    /// Rows count downward from the top edge, columns rightward.
    LeftUp,
    /// Rows count upward from the bottom edge, columns leftward.
    RightDown,
    /// Rows count downward from the top edge, columns leftward.
    RightUp,
}

impl Origin {
    pub const ALL: [Origin; 4] = [
        Origin::LeftDown,
        Origin::LeftUp,
        Origin::RightDown,
        Origin::RightUp,
    ];

    /// Parse an origin name, falling back to `LeftDown`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "left-down" | "leftdown" | "ld" => Origin::LeftDown,
            "left-up" | "leftup" | "lu" => Origin::LeftUp,
            "right-down" | "rightdown" | "rd" => Origin::RightDown,
            "right-up" | "rightup" | "ru" => Origin::RightUp,
            other => {
                tracing::debug!(origin = %other, "Unrecognized origin, using left-down");
                Origin::LeftDown
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::LeftDown => "left-down",
            Origin::LeftUp => "left-up",
            Origin::RightDown => "right-down",
            Origin::RightUp => "right-up",
        }
    }

    /// Whether drawing rows run opposite to logical rows.
    pub fn rows_flipped(&self) -> bool {
        matches!(self, Origin::LeftDown | Origin::RightDown)
    }

    /// Whether drawing columns run opposite to logical columns.
    pub fn cols_flipped(&self) -> bool {
        matches!(self, Origin::RightDown | Origin::RightUp)
    }
}

impl From<String> for Origin {
    fn from(name: String) -> Self {
        Origin::from_name(&name)
    }
}

impl From<&str> for Origin {
    fn from(name: &str) -> Self {
        Origin::from_name(name)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive logical bounds of a wafer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaferBounds {
    pub min_row: i32,
    pub max_row: i32,
    pub min_col: i32,
    pub max_col: i32,
}

impl WaferBounds {
    pub fn new(max_row: i32, max_col: i32, min_row: i32, min_col: i32) -> Self {
        Self {
            min_row,
            max_row,
            min_col,
            max_col,
        }
    }

    /// Number of die rows (0 for inverted bounds).
    pub fn rows(&self) -> u32 {
        span(self.min_row, self.max_row)
    }

    /// Number of die columns (0 for inverted bounds).
    pub fn cols(&self) -> u32 {
        span(self.min_col, self.max_col)
    }

    /// Total number of die positions.
    pub fn len(&self) -> usize {
        self.rows() as usize * self.cols() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.cols() == 0
    }

    pub fn contains(&self, pos: DiePos) -> bool {
        (self.min_row..=self.max_row).contains(&pos.row)
            && (self.min_col..=self.max_col).contains(&pos.col)
    }

    /// Offset of a die from `(min_row, min_col)`.
    pub fn offset(&self, pos: DiePos) -> DieOffset {
        DieOffset {
            row: pos.row - self.min_row,
            col: pos.col - self.min_col,
        }
    }

    pub fn validate(&self) -> WaferResult<()> {
        if self.max_row < self.min_row {
            return Err(WaferError::InvalidBounds(format!(
                "max_row {} is below min_row {}",
                self.max_row, self.min_row
            )));
        }
        if self.max_col < self.min_col {
            return Err(WaferError::InvalidBounds(format!(
                "max_col {} is below min_col {}",
                self.max_col, self.min_col
            )));
        }
        Ok(())
    }
}

/// A cell of the drawing grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrawCell {
    pub row: u32,
    pub col: u32,
}

impl DrawCell {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// A logical die position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiePos {
    pub row: i32,
    pub col: i32,
}

impl DiePos {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// A die position relative to `(min_row, min_col)`; what layers are asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DieOffset {
    pub row: i32,
    pub col: i32,
}

impl DieOffset {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Maps drawing cells to logical dies and back for one origin.
///
/// Cells and dies outside the bounds are a caller error. `to_logical` does
/// not check them and simply extends the formulas; `to_draw` reports them
/// as `None` because a drawing cell cannot be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridMapper {
    pub bounds: WaferBounds,
    pub origin: Origin,
}

impl GridMapper {
    pub fn new(bounds: WaferBounds, origin: Origin) -> Self {
        Self { bounds, origin }
    }

    /// Logical die drawn at `cell`.
    pub fn to_logical(&self, cell: DrawCell) -> DiePos {
        let row = flip(cell.row as i32, self.bounds.rows() as i32, self.origin.rows_flipped());
        let col = flip(cell.col as i32, self.bounds.cols() as i32, self.origin.cols_flipped());
        DiePos {
            row: self.bounds.min_row + row,
            col: self.bounds.min_col + col,
        }
    }

    /// Drawing cell of a logical die, `None` outside the bounds.
    pub fn to_draw(&self, pos: DiePos) -> Option<DrawCell> {
        if !self.bounds.contains(pos) {
            return None;
        }
        let offset = self.bounds.offset(pos);
        let row = flip(offset.row, self.bounds.rows() as i32, self.origin.rows_flipped());
        let col = flip(offset.col, self.bounds.cols() as i32, self.origin.cols_flipped());
        Some(DrawCell {
            row: row as u32,
            col: col as u32,
        })
    }

    /// Die offset drawn at `cell`.
    pub fn offset_at(&self, cell: DrawCell) -> DieOffset {
        self.bounds.offset(self.to_logical(cell))
    }

    /// Every drawing cell, row-major in drawing order.
    pub fn cells(&self) -> impl Iterator<Item = DrawCell> {
        let rows = self.bounds.rows();
        let cols = self.bounds.cols();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| DrawCell { row, col }))
    }
}

/// Inclusive extent of `[min, max]`, computed wide so `i32` extremes cannot overflow.
fn span(min: i32, max: i32) -> u32 {
    (i64::from(max) - i64::from(min) + 1).clamp(0, i64::from(u32::MAX)) as u32
}

/// Mirror an index within `extent` when `flipped`; its own inverse.
fn flip(index: i32, extent: i32, flipped: bool) -> i32 {
    if flipped {
        extent - index - 1
    } else {
        index
    }
}
