//! The wafer data model: bounds, origin, ordered layers and merge mode.

use indexmap::IndexMap;
use serde_json::Value;
use wafer_common::{
    DieOffset, DiePos, DrawCell, GridMapper, LayerId, Origin, WaferBounds, WaferError,
    WaferResult,
};

use crate::grading::{self, AggregationMode};
use crate::layer::{DieLayer, Layer};
use crate::scan::{self, DieRecord};

/// Wafer-level result model driven by a renderer.
///
/// Bounds are not enforced: asking about a drawing cell outside
/// `rows x cols` is a caller error and yields whatever the layers answer
/// for the extrapolated offset (built-in layers answer `-1`).
#[derive(Debug)]
pub struct WaferData {
    mapper: GridMapper,
    layers: IndexMap<LayerId, Layer>,
    mode: AggregationMode,
}

impl WaferData {
    pub fn new(bounds: WaferBounds, origin: Origin, mode: AggregationMode) -> Self {
        Self {
            mapper: GridMapper::new(bounds, origin),
            layers: IndexMap::new(),
            mode,
        }
    }

    /// Convenience constructor in the classic argument order, with origin and
    /// mode given by name (unknown names fall back to defaults).
    pub fn with_names(
        max_row: i32,
        max_col: i32,
        min_row: i32,
        min_col: i32,
        origin: &str,
        mode: &str,
    ) -> Self {
        Self::new(
            WaferBounds::new(max_row, max_col, min_row, min_col),
            Origin::from_name(origin),
            AggregationMode::from_name(mode),
        )
    }

    pub fn bounds(&self) -> WaferBounds {
        self.mapper.bounds
    }

    pub fn origin(&self) -> Origin {
        self.mapper.origin
    }

    pub fn mapper(&self) -> &GridMapper {
        &self.mapper
    }

    pub fn rows(&self) -> u32 {
        self.mapper.bounds.rows()
    }

    pub fn cols(&self) -> u32 {
        self.mapper.bounds.cols()
    }

    pub fn to_logical(&self, cell: DrawCell) -> DiePos {
        self.mapper.to_logical(cell)
    }

    pub fn to_draw(&self, pos: DiePos) -> Option<DrawCell> {
        self.mapper.to_draw(pos)
    }

    // === Layers ===

    /// Attach an enabled layer, replacing any layer with the same id.
    pub fn attach(
        &mut self,
        id: impl Into<LayerId>,
        source: impl DieLayer + 'static,
    ) -> &mut Self {
        self.attach_layer(Layer::new(id, source))
    }

    /// Attach a prepared layer at the end of the stack.
    ///
    /// A layer with the same id is removed from its old position first, so
    /// the replacement takes the highest `bincode` priority.
    pub fn attach_layer(&mut self, layer: Layer) -> &mut Self {
        let id = layer.id().clone();
        if self.layers.shift_remove(&id).is_some() {
            tracing::debug!(layer = %id, "Replacing layer");
        } else {
            tracing::debug!(layer = %id, position = self.layers.len(), "Attaching layer");
        }
        self.layers.insert(id, layer);
        self
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.get(id)
    }

    pub fn layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.layers.get_mut(id)
    }

    /// Layers in insertion order.
    pub fn layers(&self) -> impl DoubleEndedIterator<Item = &Layer> + ExactSizeIterator {
        self.layers.values()
    }

    pub fn layer_ids(&self) -> impl Iterator<Item = &LayerId> {
        self.layers.keys()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> WaferResult<()> {
        let layer = self
            .layers
            .get_mut(id)
            .ok_or_else(|| WaferError::LayerNotFound(id.to_string()))?;
        layer.set_enabled(enabled);
        Ok(())
    }

    // === Grading ===

    pub fn mode(&self) -> &AggregationMode {
        &self.mode
    }

    /// Swap the merge strategy; layers are untouched.
    pub fn set_mode(&mut self, mode: AggregationMode) -> &mut Self {
        tracing::debug!(
            from = self.mode.name(),
            to = mode.name(),
            "Switching aggregation mode"
        );
        self.mode = mode;
        self
    }

    /// Merged grade of the die drawn at `cell`, using the active mode.
    pub fn grade(&self, cell: DrawCell) -> i32 {
        match &self.mode {
            AggregationMode::Testing => self.testing(cell),
            AggregationMode::Counting => self.counting(cell),
            AggregationMode::Bincode => self.bincode(cell),
            AggregationMode::Custom(strategy) => strategy.merge(self, cell),
        }
    }

    pub fn testing(&self, cell: DrawCell) -> i32 {
        grading::testing(self.layers.values(), self.offset_at(cell))
    }

    pub fn counting(&self, cell: DrawCell) -> i32 {
        grading::counting(self.layers.values(), self.offset_at(cell))
    }

    /// Bin-code merge, available whatever the active mode is.
    pub fn bincode(&self, cell: DrawCell) -> i32 {
        grading::bincode(self.layers.values(), self.offset_at(cell))
    }

    /// Merged grades of every drawing cell, `grid[draw_row][draw_col]`.
    pub fn grade_grid(&self) -> Vec<Vec<i32>> {
        (0..self.rows())
            .map(|row| {
                (0..self.cols())
                    .map(|col| self.grade(DrawCell::new(row, col)))
                    .collect()
            })
            .collect()
    }

    // === Inspection ===

    /// Payload of every attached layer for the die at `cell`, in insertion
    /// order. Mode and enabled state are ignored.
    pub fn pick(&self, cell: DrawCell) -> Vec<Option<Value>> {
        let offset = self.offset_at(cell);
        self.layers.values().map(|l| l.data(offset)).collect()
    }

    /// Graded record of every die some enabled layer knows about.
    pub fn scan(&self) -> Vec<DieRecord> {
        scan::scan(self)
    }

    pub fn offset_at(&self, cell: DrawCell) -> DieOffset {
        self.mapper.offset_at(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::ConstantLayer;

    #[test]
    fn test_replace_moves_layer_to_end() {
        let mut wafer = WaferData::new(
            WaferBounds::new(1, 1, 1, 1),
            Origin::LeftDown,
            AggregationMode::Bincode,
        );
        wafer
            .attach("a", ConstantLayer(1))
            .attach("b", ConstantLayer(2))
            .attach("a", ConstantLayer(3));

        let ids: Vec<&str> = wafer.layer_ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(wafer.grade(DrawCell::new(0, 0)), 3);
    }

    #[test]
    fn test_set_enabled_unknown_layer() {
        let mut wafer = WaferData::new(
            WaferBounds::new(1, 1, 1, 1),
            Origin::LeftDown,
            AggregationMode::Testing,
        );
        assert!(matches!(
            wafer.set_enabled("ghost", false),
            Err(WaferError::LayerNotFound(_))
        ));
    }

    #[test]
    fn test_with_names_falls_back() {
        let wafer = WaferData::with_names(3, 3, 1, 1, "sideways", "averaging");
        assert_eq!(wafer.origin(), Origin::LeftDown);
        assert_eq!(wafer.mode().name(), "testing");
        assert_eq!((wafer.rows(), wafer.cols()), (3, 3));
    }
}
