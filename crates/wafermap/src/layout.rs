//! Shot layout: where each die sits on a circular wafer and what color it
//! gets.
//!
//! This is the geometry a renderer needs and nothing more. The wafer is a
//! `diameter`-sized square with the usable circle inset by `margin`; dies
//! fill 94% of the usable width and height and the whole grid is nudged
//! away from the notch by `notch.offset` dies.

use legend::MapLegend;
use serde::{Deserialize, Serialize};
use wafer_common::{Color, DiePos, DrawCell, WaferBounds};

use crate::wafer::WaferData;

/// Share of the usable diameter covered by the die grid.
pub const DIE_AREA_RATIO: f64 = 0.94;

/// Default fill for passing dies.
pub const PASS_COLOR: Color = Color::from_rgb_hex(0x009900);
/// Default fill for failing dies.
pub const FAIL_COLOR: Color = Color::from_rgb_hex(0xff0000);
/// Default fill for highlighted dies.
pub const HIGHLIGHT_COLOR: Color = Color::from_rgb_hex(0xffff00);

/// Wafer edge carrying the notch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum NotchSide {
    Left,
    Right,
    Up,
    #[default]
    Down,
}

impl NotchSide {
    /// Parse a side name; anything unrecognized is `Down`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "left" | "l" => NotchSide::Left,
            "right" | "r" => NotchSide::Right,
            "up" | "u" => NotchSide::Up,
            _ => NotchSide::Down,
        }
    }
}

impl From<String> for NotchSide {
    fn from(name: String) -> Self {
        NotchSide::from_name(&name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Notch {
    #[serde(default)]
    pub side: NotchSide,

    /// Shift of the die grid, in dies
    #[serde(default = "default_notch_offset")]
    pub offset: f64,
}

fn default_notch_offset() -> f64 {
    1.0
}

impl Default for Notch {
    fn default() -> Self {
        Self {
            side: NotchSide::Down,
            offset: default_notch_offset(),
        }
    }
}

/// Axis-aligned die rectangle in wafer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DieRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DieRect {
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.x, self.y),
            (self.x + self.width, self.y),
            (self.x, self.y + self.height),
            (self.x + self.width, self.y + self.height),
        ]
    }
}

/// Fill colors by merged code.
pub trait DiePalette {
    /// Fill for `code`; `None` falls back to [`Color::NEUTRAL`].
    fn color(&self, code: i32) -> Option<Color>;
}

/// Green for pass (`0`), red for anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassFailPalette {
    #[serde(default = "default_pass_color")]
    pub pass: Color,
    #[serde(default = "default_fail_color")]
    pub fail: Color,
}

fn default_pass_color() -> Color {
    PASS_COLOR
}
fn default_fail_color() -> Color {
    FAIL_COLOR
}

impl Default for PassFailPalette {
    fn default() -> Self {
        Self {
            pass: PASS_COLOR,
            fail: FAIL_COLOR,
        }
    }
}

impl DiePalette for PassFailPalette {
    fn color(&self, code: i32) -> Option<Color> {
        Some(if code == 0 { self.pass } else { self.fail })
    }
}

// Counting and bin-code maps are usually colored through their legend.
impl DiePalette for MapLegend {
    fn color(&self, code: i32) -> Option<Color> {
        Some(self.select(code as f64))
    }
}

/// Dies whose bin code matches `code` are painted `color`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub code: i32,
    #[serde(default = "default_highlight_color")]
    pub color: Color,
}

fn default_highlight_color() -> Color {
    HIGHLIGHT_COLOR
}

impl Highlight {
    pub fn new(code: i32) -> Self {
        Self {
            code,
            color: HIGHLIGHT_COLOR,
        }
    }
}

/// One die ready to paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DieTile {
    pub cell: DrawCell,
    pub pos: DiePos,
    pub rect: DieRect,
    pub code: i32,
    pub color: Color,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotLayout {
    /// Wafer size in pixels
    #[serde(default = "default_diameter")]
    pub diameter: f64,

    /// Edge exclusion in pixels
    #[serde(default = "default_margin")]
    pub margin: f64,

    #[serde(default)]
    pub notch: Notch,

    /// Drop dies that poke out of the usable circle
    #[serde(default)]
    pub check_bounding: bool,
}

fn default_diameter() -> f64 {
    600.0
}
fn default_margin() -> f64 {
    10.0
}

impl Default for ShotLayout {
    fn default() -> Self {
        Self {
            diameter: default_diameter(),
            margin: default_margin(),
            notch: Notch::default(),
            check_bounding: false,
        }
    }
}

impl ShotLayout {
    pub fn new(diameter: f64, margin: f64) -> Self {
        Self {
            diameter,
            margin,
            ..Self::default()
        }
    }

    pub fn with_notch(mut self, side: NotchSide, offset: f64) -> Self {
        self.notch = Notch { side, offset };
        self
    }

    pub fn with_bounding(mut self, check_bounding: bool) -> Self {
        self.check_bounding = check_bounding;
        self
    }

    /// Center of the wafer on both axes.
    pub fn center(&self) -> f64 {
        self.diameter / 2.0
    }

    /// Radius of the usable circle.
    pub fn usable_radius(&self) -> f64 {
        (self.diameter - self.margin) / 2.0
    }

    /// Die `(width, height)` for a grid.
    pub fn die_size(&self, bounds: &WaferBounds) -> (f64, f64) {
        let w = DIE_AREA_RATIO * (self.diameter - self.margin);
        (w / bounds.cols() as f64, w / bounds.rows() as f64)
    }

    /// Top-left corner of drawing cell `(0, 0)`.
    pub fn grid_origin(&self, bounds: &WaferBounds) -> (f64, f64) {
        let (dw, dh) = self.die_size(bounds);
        let mut dx0 = (self.diameter - dw * bounds.cols() as f64) / 2.0;
        let mut dy0 = (self.diameter - dh * bounds.rows() as f64) / 2.0;
        let shift = self.notch.offset;
        match self.notch.side {
            NotchSide::Left => dx0 += dw * shift,
            NotchSide::Right => dx0 -= dw * shift,
            NotchSide::Up => dy0 += dh * shift,
            NotchSide::Down => dy0 -= dh * shift,
        }
        (dx0, dy0)
    }

    pub fn cell_rect(&self, bounds: &WaferBounds, cell: DrawCell) -> DieRect {
        let (dw, dh) = self.die_size(bounds);
        let (dx0, dy0) = self.grid_origin(bounds);
        DieRect {
            x: dx0 + dw * cell.col as f64,
            y: dy0 + dh * cell.row as f64,
            width: dw,
            height: dh,
        }
    }

    /// Whether all four corners lie strictly inside the usable circle.
    pub fn inside_wafer(&self, rect: &DieRect) -> bool {
        let c = self.center();
        let r2 = self.usable_radius().powi(2);
        rect.corners()
            .iter()
            .all(|&(x, y)| (x - c).powi(2) + (y - c).powi(2) < r2)
    }

    /// Tiles for every drawable die, in drawing order.
    ///
    /// Dies graded unknown by the active mode, and dies outside the circle
    /// when bounding is on, are left out. A highlight applies when the
    /// die's bin code equals the highlighted code, whatever the active mode.
    pub fn plan(
        &self,
        wafer: &WaferData,
        palette: &dyn DiePalette,
        highlight: Option<&Highlight>,
    ) -> Vec<DieTile> {
        let bounds = wafer.bounds();
        let mut tiles = Vec::with_capacity(bounds.len());

        for cell in wafer.mapper().cells() {
            let rect = self.cell_rect(&bounds, cell);
            if self.check_bounding && !self.inside_wafer(&rect) {
                continue;
            }
            let code = wafer.grade(cell);
            if code < 0 {
                continue;
            }

            let mut color = palette.color(code).unwrap_or(Color::NEUTRAL);
            let mut highlighted = false;
            if let Some(h) = highlight.filter(|h| wafer.bincode(cell) == h.code) {
                color = h.color;
                highlighted = true;
            }

            tiles.push(DieTile {
                cell,
                pos: wafer.to_logical(cell),
                rect,
                code,
                color,
                highlighted,
            });
        }

        tracing::debug!(tiles = tiles.len(), cells = bounds.len(), "Planned wafer tiles");
        tiles
    }

    /// Selection tile for a logical die, `None` outside the wafer bounds.
    pub fn select_die(&self, wafer: &WaferData, pos: DiePos, color: Color) -> Option<DieTile> {
        let cell = wafer.to_draw(pos)?;
        Some(DieTile {
            cell,
            pos,
            rect: self.cell_rect(&wafer.bounds(), cell),
            code: wafer.grade(cell),
            color,
            highlighted: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notch_side_aliases() {
        assert_eq!(NotchSide::from_name("L"), NotchSide::Left);
        assert_eq!(NotchSide::from_name("right"), NotchSide::Right);
        assert_eq!(NotchSide::from_name("u"), NotchSide::Up);
        assert_eq!(NotchSide::from_name("bottom"), NotchSide::Down);
    }

    #[test]
    fn test_default_palette() {
        let palette = PassFailPalette::default();
        assert_eq!(palette.color(0), Some(PASS_COLOR));
        assert_eq!(palette.color(1), Some(FAIL_COLOR));
        assert_eq!(palette.color(3), Some(FAIL_COLOR));
    }

    #[test]
    fn test_layout_defaults() {
        let layout: ShotLayout = serde_json::from_str("{}").unwrap();
        assert_eq!(layout, ShotLayout::default());
        assert_eq!(layout.notch.side, NotchSide::Down);
        assert_eq!(layout.notch.offset, 1.0);
    }
}
