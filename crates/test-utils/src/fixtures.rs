//! Common test fixtures for wafer map tests.
//!
//! Bounds are given as `(max_row, max_col, min_row, min_col)`, the argument
//! order of `WaferBounds::new`.

/// Wafer bounds fixtures.
pub mod bounds {
    /// One die at `(1, 1)`.
    pub const SINGLE_DIE: (i32, i32, i32, i32) = (1, 1, 1, 1);

    /// Small square wafer, rows and columns `1..=5`.
    pub const SMALL_5X5: (i32, i32, i32, i32) = (5, 5, 1, 1);

    /// Non-square wafer, 4 rows by 3 columns.
    pub const TALL_4X3: (i32, i32, i32, i32) = (4, 3, 1, 1);

    /// Bounds straddling zero, centered die numbering as probers report it.
    pub const CENTERED: (i32, i32, i32, i32) = (3, 4, -3, -4);

    /// Roughly a 300mm wafer of 5mm dies.
    pub const PRODUCTION: (i32, i32, i32, i32) = (60, 60, 1, 1);
}

/// Layer ids as they appear in a typical test flow.
pub mod layers {
    /// First wafer sort.
    pub const CP1: &str = "cp1";

    /// Second wafer sort.
    pub const CP2: &str = "cp2";

    /// Retest of failing dies.
    pub const RETEST: &str = "retest";

    /// Final test.
    pub const FT: &str = "ft";
}

/// Origin names, including the accepted aliases.
pub mod origins {
    pub const LEFT_DOWN: [&str; 3] = ["left-down", "leftdown", "ld"];
    pub const LEFT_UP: [&str; 3] = ["left-up", "leftup", "lu"];
    pub const RIGHT_DOWN: [&str; 3] = ["right-down", "rightdown", "rd"];
    pub const RIGHT_UP: [&str; 3] = ["right-up", "rightup", "ru"];
}

/// Wafer description documents.
pub mod descriptions {
    /// Bounds only; everything else defaulted.
    pub const MINIMAL_YAML: &str = "bounds: { min_row: 1, max_row: 3, min_col: 1, max_col: 3 }\n";

    /// Two sort layers on a 3x3 wafer, the second with payloads, plus a
    /// disabled retest layer.
    pub const TWO_SORTS_YAML: &str = r#"
name: LOT42-W07
bounds: { min_row: 1, max_row: 3, min_col: 1, max_col: 3 }
origin: left-down
mode: testing
layers:
  - id: cp1
    results:
      - [-1, 0, -1]
      - [ 0, 0,  1]
      - [-1, 0, -1]
  - id: cp2
    results:
      - [-1, 0, -1]
      - [ 1, 0,  0]
      - [-1, 4, -1]
    data:
      - [null, null, null]
      - [{bin: 7}, null, null]
      - [null, {bin: 4}, null]
  - id: retest
    constant: 0
    enabled: false
highlight: { code: 4 }
"#;

    /// Same wafer as JSON, in bincode mode with a custom legend.
    pub const TWO_SORTS_JSON: &str = r#"{
  "name": "LOT42-W07",
  "bounds": { "min_row": 1, "max_row": 3, "min_col": 1, "max_col": 3 },
  "origin": "ru",
  "mode": "bincode",
  "layers": [
    { "id": "cp1", "results": [[-1, 0, -1], [0, 0, 1], [-1, 0, -1]] },
    { "id": "cp2", "results": [[-1, 0, -1], [1, 0, 0], [-1, 4, -1]] }
  ],
  "legend": { "pattern": 1, "min": 0, "max": 8, "width": 400 },
  "layout": { "diameter": 300, "margin": 6, "notch": { "side": "up", "offset": 0.5 } }
}"#;

    /// A layer with both a matrix and a constant.
    pub const AMBIGUOUS_LAYER_YAML: &str = r#"
bounds: { min_row: 1, max_row: 1, min_col: 1, max_col: 1 }
layers:
  - id: cp1
    results: [[0]]
    constant: 1
"#;

    /// Inverted row bounds.
    pub const INVERTED_BOUNDS_YAML: &str =
        "bounds: { min_row: 5, max_row: 1, min_col: 1, max_col: 3 }\n";
}
