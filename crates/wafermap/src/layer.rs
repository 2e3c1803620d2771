//! Test-result layers.
//!
//! A layer answers two questions about a die, addressed by its offset from
//! `(min_row, min_col)`: what grade it got (`-1` unknown, `0` pass, `>0` a
//! fail code or count), and optionally what detail payload to show for it.

use serde_json::Value;
use std::fmt;
use wafer_common::{DieOffset, LayerId};

use crate::grading::UNKNOWN;

/// Result source behind a layer.
pub trait DieLayer: Send + Sync {
    /// Grade of the die at `offset`.
    fn result(&self, offset: DieOffset) -> i32;

    /// Detail payload for the die at `offset`. Layers without a data
    /// extractor keep the default and report `None`.
    fn data(&self, _offset: DieOffset) -> Option<Value> {
        None
    }
}

/// A named, switchable layer owned by a wafer.
pub struct Layer {
    id: LayerId,
    enabled: bool,
    source: Box<dyn DieLayer>,
}

impl Layer {
    /// Enabled layer over `source`.
    pub fn new(id: impl Into<LayerId>, source: impl DieLayer + 'static) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            source: Box::new(source),
        }
    }

    pub fn boxed(id: impl Into<LayerId>, source: Box<dyn DieLayer>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            source,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn id(&self) -> &LayerId {
        &self.id
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn result(&self, offset: DieOffset) -> i32 {
        self.source.result(offset)
    }

    pub fn data(&self, offset: DieOffset) -> Option<Value> {
        self.source.data(offset)
    }

    /// Grade of an enabled layer that knows the die, `None` otherwise.
    pub fn contribution(&self, offset: DieOffset) -> Option<i32> {
        if !self.enabled {
            return None;
        }
        let code = self.source.result(offset);
        (code >= 0).then_some(code)
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("id", &self.id)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// Same grade for every die.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantLayer(pub i32);

impl DieLayer for ConstantLayer {
    fn result(&self, _offset: DieOffset) -> i32 {
        self.0
    }
}

/// Grades (and optional payloads) stored row-major by die offset.
///
/// `results[r][c]` is the die at offset `(r, c)`. Offsets outside the
/// matrix grade as unknown; `null` payload cells read as `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatrixLayer {
    results: Vec<Vec<i32>>,
    data: Option<Vec<Vec<Value>>>,
}

impl MatrixLayer {
    pub fn new(results: Vec<Vec<i32>>) -> Self {
        Self {
            results,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Vec<Vec<Value>>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn rows(&self) -> usize {
        self.results.len()
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    fn cell<T>(matrix: &[Vec<T>], offset: DieOffset) -> Option<&T> {
        let row = usize::try_from(offset.row).ok()?;
        let col = usize::try_from(offset.col).ok()?;
        matrix.get(row)?.get(col)
    }
}

impl DieLayer for MatrixLayer {
    fn result(&self, offset: DieOffset) -> i32 {
        Self::cell(&self.results, offset).copied().unwrap_or(UNKNOWN)
    }

    fn data(&self, offset: DieOffset) -> Option<Value> {
        let data = self.data.as_ref()?;
        match Self::cell(data, offset)? {
            Value::Null => None,
            value => Some(value.clone()),
        }
    }
}

/// Closure-backed layer with an optional data extractor.
pub struct FnLayer<R> {
    result: R,
    data: Option<Box<dyn Fn(DieOffset) -> Option<Value> + Send + Sync>>,
}

impl<R> FnLayer<R>
where
    R: Fn(DieOffset) -> i32 + Send + Sync,
{
    pub fn new(result: R) -> Self {
        Self { result, data: None }
    }

    pub fn with_data<D>(mut self, data: D) -> Self
    where
        D: Fn(DieOffset) -> Option<Value> + Send + Sync + 'static,
    {
        self.data = Some(Box::new(data));
        self
    }
}

impl<R> DieLayer for FnLayer<R>
where
    R: Fn(DieOffset) -> i32 + Send + Sync,
{
    fn result(&self, offset: DieOffset) -> i32 {
        (self.result)(offset)
    }

    fn data(&self, offset: DieOffset) -> Option<Value> {
        self.data.as_ref().and_then(|extract| extract(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_matrix_layer_out_of_shape_is_unknown() {
        let layer = MatrixLayer::new(vec![vec![0, 1], vec![2]]);
        assert_eq!(layer.result(DieOffset::new(0, 1)), 1);
        assert_eq!(layer.result(DieOffset::new(1, 1)), UNKNOWN);
        assert_eq!(layer.result(DieOffset::new(-1, 0)), UNKNOWN);
        assert_eq!(layer.result(DieOffset::new(5, 0)), UNKNOWN);
    }

    #[test]
    fn test_matrix_layer_data() {
        let layer = MatrixLayer::new(vec![vec![0, 1]])
            .with_data(vec![vec![Value::Null, json!({"bin": 7})]]);
        assert_eq!(layer.data(DieOffset::new(0, 0)), None);
        assert_eq!(layer.data(DieOffset::new(0, 1)), Some(json!({"bin": 7})));
        assert_eq!(layer.data(DieOffset::new(3, 3)), None);
    }

    #[test]
    fn test_contribution_skips_disabled_and_unknown() {
        let on = Layer::new("a", ConstantLayer(4));
        let off = Layer::new("b", ConstantLayer(4)).with_enabled(false);
        let unknown = Layer::new("c", ConstantLayer(-1));
        let at = DieOffset::new(0, 0);
        assert_eq!(on.contribution(at), Some(4));
        assert_eq!(off.contribution(at), None);
        assert_eq!(unknown.contribution(at), None);
    }

    #[test]
    fn test_fn_layer_without_extractor_has_no_data() {
        let layer = FnLayer::new(|o: DieOffset| o.row + o.col);
        assert_eq!(layer.result(DieOffset::new(2, 3)), 5);
        assert_eq!(layer.data(DieOffset::new(2, 3)), None);

        let with = FnLayer::new(|_: DieOffset| 1).with_data(|o: DieOffset| Some(json!(o.col)));
        assert_eq!(with.data(DieOffset::new(0, 9)), Some(json!(9)));
    }
}
