//! Merging per-layer grades into one result per die.
//!
//! | mode       | order              | result                                              |
//! |------------|--------------------|-----------------------------------------------------|
//! | `testing`  | insertion          | `0` pass, `1` fail, `2` good-to-bad, `3` duo         |
//! | `counting` | any                | sum of contributing codes, saturating                |
//! | `bincode`  | reverse insertion  | code of the most recently attached contributing layer |
//! | custom     | caller's choice    | whatever the [`MergeStrategy`] returns              |
//!
//! Disabled layers and layers answering `-1` never contribute. Every mode
//! answers [`UNKNOWN`] when nothing contributed.

use std::fmt;
use std::sync::Arc;
use wafer_common::{DieOffset, DrawCell};

use crate::layer::Layer;
use crate::wafer::WaferData;

/// No enabled layer had a result for the die.
pub const UNKNOWN: i32 = -1;
/// Testing mode: the last contributing layer passed.
pub const PASS: i32 = 0;
/// Testing mode: the last contributing layer failed.
pub const FAIL: i32 = 1;
/// Testing mode: a later layer failed a die an earlier layer passed.
pub const GOOD_TO_BAD: i32 = 2;
/// Testing mode: a second layer passed a die an earlier layer passed.
pub const DUO: i32 = 3;

/// Caller-supplied merge over a wafer's layers.
pub trait MergeStrategy: Send + Sync {
    fn merge(&self, wafer: &WaferData, cell: DrawCell) -> i32;
}

impl<F> MergeStrategy for F
where
    F: Fn(&WaferData, DrawCell) -> i32 + Send + Sync,
{
    fn merge(&self, wafer: &WaferData, cell: DrawCell) -> i32 {
        self(wafer, cell)
    }
}

/// How a wafer merges its layers.
#[derive(Clone, Default)]
pub enum AggregationMode {
    #[default]
    Testing,
    Counting,
    Bincode,
    Custom(Arc<dyn MergeStrategy>),
}

impl AggregationMode {
    /// Parse a mode name; unknown names silently select `Testing`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "testing" => AggregationMode::Testing,
            "counting" => AggregationMode::Counting,
            "bincode" => AggregationMode::Bincode,
            other => {
                tracing::debug!(mode = %other, "Unrecognized aggregation mode, using testing");
                AggregationMode::Testing
            }
        }
    }

    pub fn custom(strategy: impl MergeStrategy + 'static) -> Self {
        AggregationMode::Custom(Arc::new(strategy))
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggregationMode::Testing => "testing",
            AggregationMode::Counting => "counting",
            AggregationMode::Bincode => "bincode",
            AggregationMode::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for AggregationMode {
    fn from(name: &str) -> Self {
        AggregationMode::from_name(name)
    }
}

/// Pass/fail merge in insertion order.
///
/// Short-circuits on the first contributor after a pass: a fail there gives
/// [`GOOD_TO_BAD`], anything else [`DUO`]. So pass, pass, fail is `DUO`
/// and fail, pass, fail is `GOOD_TO_BAD`.
pub fn testing<'a>(layers: impl IntoIterator<Item = &'a Layer>, offset: DieOffset) -> i32 {
    let mut found = false;
    let mut pass = false;
    for code in layers.into_iter().filter_map(|l| l.contribution(offset)) {
        if pass && code > 0 {
            return GOOD_TO_BAD;
        } else if pass && found {
            return DUO;
        }
        pass = code == 0;
        found = true;
    }

    match (found, pass) {
        (false, _) => UNKNOWN,
        (true, true) => PASS,
        (true, false) => FAIL,
    }
}

/// Sum of every contributing code, saturating at `i32::MAX`.
pub fn counting<'a>(layers: impl IntoIterator<Item = &'a Layer>, offset: DieOffset) -> i32 {
    layers
        .into_iter()
        .filter_map(|l| l.contribution(offset))
        .fold(None, |total: Option<i32>, code| {
            Some(total.unwrap_or(0).saturating_add(code))
        })
        .unwrap_or(UNKNOWN)
}

/// Code of the most recently attached contributing layer.
pub fn bincode<'a, I>(layers: I, offset: DieOffset) -> i32
where
    I: IntoIterator<Item = &'a Layer>,
    I::IntoIter: DoubleEndedIterator,
{
    layers
        .into_iter()
        .rev()
        .find_map(|l| l.contribution(offset))
        .unwrap_or(UNKNOWN)
}
