//! Full-wafer export of graded dies.
//!
//! Scanning uses its own fixed merge, independent of the wafer's mode: it
//! walks enabled layers in insertion order, keeps the latest known code,
//! and builds a tag describing how consecutive layers agreed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wafer_common::{DieOffset, DiePos};

use crate::grading::{PASS, UNKNOWN};
use crate::layer::Layer;
use crate::wafer::WaferData;

/// Tag for a die passed by two consecutive layers.
pub const TAG_GOOD_GOOD: &str = "GoodGood";
/// Suffix appended for each further pass after a tag exists.
pub const TAG_GOOD: &str = "Good";
/// Tag for a die failed by a layer right after a pass.
pub const TAG_GOOD_BAD: &str = "GoodBad";

/// One graded die.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DieRecord {
    /// Logical column
    pub x: i32,
    /// Logical row
    pub y: i32,
    /// Whether the latest contributing layer passed the die
    pub pass: bool,
    /// Latest non-negative code
    pub code: i32,
    /// Agreement tag across layers, see [`TAG_GOOD_GOOD`] and [`TAG_GOOD_BAD`]
    #[serde(rename = "type")]
    pub die_type: Option<String>,
    /// Payload of the failing layer, `None` once a later layer passes
    pub data: Option<Value>,
}

impl DieRecord {
    fn unknown(pos: DiePos) -> Self {
        Self {
            x: pos.col,
            y: pos.row,
            pass: false,
            code: UNKNOWN,
            die_type: None,
            data: None,
        }
    }

    /// Fold one contributing layer's code into the record.
    fn apply(&mut self, layer: &Layer, offset: DieOffset, code: i32) {
        self.code = code;
        if code == PASS {
            if self.pass {
                self.die_type = Some(match self.die_type.take() {
                    Some(tag) => tag + TAG_GOOD,
                    None => TAG_GOOD_GOOD.to_string(),
                });
            } else if let Some(tag) = self.die_type.as_mut() {
                tag.push_str(TAG_GOOD);
            }
            self.pass = true;
            self.data = None;
        } else {
            if self.pass {
                self.die_type = Some(TAG_GOOD_BAD.to_string());
            }
            self.pass = false;
            self.data = layer.data(offset);
        }
    }

    pub fn pos(&self) -> DiePos {
        DiePos::new(self.y, self.x)
    }
}

/// Records for every die with at least one contributing layer, in drawing
/// order (row-major from the top-left drawing cell).
pub fn scan(wafer: &WaferData) -> Vec<DieRecord> {
    let mapper = wafer.mapper();
    let mut dies = Vec::new();

    for cell in mapper.cells() {
        let pos = mapper.to_logical(cell);
        let offset = mapper.bounds.offset(pos);
        let mut die = DieRecord::unknown(pos);

        for layer in wafer.layers() {
            if let Some(code) = layer.contribution(offset) {
                die.apply(layer, offset, code);
            }
        }

        if die.code >= 0 {
            dies.push(die);
        }
    }

    tracing::debug!(
        dies = dies.len(),
        cells = mapper.bounds.len(),
        layers = wafer.layer_count(),
        "Scanned wafer"
    );
    dies
}
