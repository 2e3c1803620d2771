//! Merge behavior of the wafer model across aggregation modes.

use serde_json::json;
use test_utils::{bounds, create_bin_matrix, create_result_matrix, layers};
use wafermap::grading::{DUO, FAIL, GOOD_TO_BAD, PASS, UNKNOWN};
use wafermap::{
    AggregationMode, ConstantLayer, DrawCell, FnLayer, Layer, MatrixLayer, Origin, WaferBounds,
    WaferData,
};

fn single_die(mode: AggregationMode) -> WaferData {
    let (max_row, max_col, min_row, min_col) = bounds::SINGLE_DIE;
    WaferData::new(
        WaferBounds::new(max_row, max_col, min_row, min_col),
        Origin::LeftDown,
        mode,
    )
}

fn die_a() -> DrawCell {
    DrawCell::new(0, 0)
}

// ============================================================================
// Testing mode
// ============================================================================

#[test]
fn test_testing_single_pass() {
    let mut wafer = single_die(AggregationMode::Testing);
    wafer.attach(layers::CP1, ConstantLayer(0));
    assert_eq!(wafer.grade(die_a()), PASS);
}

#[test]
fn test_testing_pass_then_fail_is_good_to_bad() {
    let mut wafer = single_die(AggregationMode::Testing);
    wafer
        .attach(layers::CP1, ConstantLayer(0))
        .attach(layers::CP2, ConstantLayer(1));
    assert_eq!(wafer.grade(die_a()), GOOD_TO_BAD);
}

#[test]
fn test_testing_two_passes_is_duo() {
    let mut wafer = single_die(AggregationMode::Testing);
    wafer
        .attach(layers::CP1, ConstantLayer(0))
        .attach(layers::CP2, ConstantLayer(0));
    assert_eq!(wafer.grade(die_a()), DUO);
}

#[test]
fn test_testing_unknown_only() {
    let mut wafer = single_die(AggregationMode::Testing);
    wafer.attach(layers::CP1, ConstantLayer(-1));
    assert_eq!(wafer.grade(die_a()), UNKNOWN);
}

#[test]
fn test_testing_no_layers() {
    let wafer = single_die(AggregationMode::Testing);
    assert_eq!(wafer.grade(die_a()), UNKNOWN);
}

#[test]
fn test_testing_short_circuits_left_to_right() {
    let mut wafer = single_die(AggregationMode::Testing);
    wafer
        .attach(layers::CP1, ConstantLayer(0))
        .attach(layers::CP2, ConstantLayer(0))
        .attach(layers::FT, ConstantLayer(1));
    assert_eq!(wafer.grade(die_a()), DUO);

    let mut wafer = single_die(AggregationMode::Testing);
    wafer
        .attach(layers::CP1, ConstantLayer(1))
        .attach(layers::CP2, ConstantLayer(0))
        .attach(layers::FT, ConstantLayer(1));
    assert_eq!(wafer.grade(die_a()), GOOD_TO_BAD);
}

#[test]
fn test_testing_fail_codes_collapse_to_fail() {
    let mut wafer = single_die(AggregationMode::Testing);
    wafer.attach(layers::CP1, ConstantLayer(17));
    assert_eq!(wafer.grade(die_a()), FAIL);
}

#[test]
fn test_testing_skips_disabled_layers() {
    let mut wafer = single_die(AggregationMode::Testing);
    wafer
        .attach(layers::CP1, ConstantLayer(0))
        .attach(layers::CP2, ConstantLayer(1));
    wafer.set_enabled(layers::CP2, false).unwrap();
    assert_eq!(wafer.grade(die_a()), PASS);

    wafer.set_enabled(layers::CP2, true).unwrap();
    assert_eq!(wafer.grade(die_a()), GOOD_TO_BAD);
}

// ============================================================================
// Counting mode
// ============================================================================

#[test]
fn test_counting_sums_known_codes() {
    let mut wafer = single_die(AggregationMode::Counting);
    wafer
        .attach("a", ConstantLayer(1))
        .attach("b", ConstantLayer(-1))
        .attach("c", ConstantLayer(2));
    assert_eq!(wafer.grade(die_a()), 3);
}

#[test]
fn test_counting_all_unknown() {
    let mut wafer = single_die(AggregationMode::Counting);
    wafer
        .attach("a", ConstantLayer(-1))
        .attach("b", ConstantLayer(-1));
    assert_eq!(wafer.grade(die_a()), UNKNOWN);
}

#[test]
fn test_counting_large_codes_saturate() {
    let mut wafer = single_die(AggregationMode::Counting);
    wafer
        .attach("a", ConstantLayer(i32::MAX))
        .attach("b", ConstantLayer(1));
    assert_eq!(wafer.grade(die_a()), i32::MAX);
}

// ============================================================================
// Bincode mode
// ============================================================================

#[test]
fn test_bincode_most_recent_enabled_layer_wins() {
    let mut wafer = single_die(AggregationMode::Bincode);
    wafer
        .attach("a", ConstantLayer(4))
        .attach("b", ConstantLayer(5))
        .attach("c", ConstantLayer(6));
    wafer.set_enabled("b", false).unwrap();
    assert_eq!(wafer.grade(die_a()), 6);

    wafer.set_enabled("c", false).unwrap();
    assert_eq!(wafer.grade(die_a()), 4);
}

#[test]
fn test_replacing_layer_moves_it_to_the_end() {
    let mut wafer = single_die(AggregationMode::Bincode);
    wafer
        .attach("a", ConstantLayer(1))
        .attach("b", ConstantLayer(2))
        .attach("c", ConstantLayer(3))
        .attach("a", ConstantLayer(9));

    let ids: Vec<&str> = wafer.layer_ids().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
    assert_eq!(wafer.layer_count(), 3);
    assert_eq!(wafer.grade(die_a()), 9);
}

#[test]
fn test_bincode_available_in_any_mode() {
    let mut wafer = single_die(AggregationMode::Testing);
    wafer
        .attach("a", ConstantLayer(0))
        .attach("b", ConstantLayer(7));
    assert_eq!(wafer.grade(die_a()), GOOD_TO_BAD);
    assert_eq!(wafer.bincode(die_a()), 7);
    assert_eq!(wafer.counting(die_a()), 7);
}

// ============================================================================
// Custom strategies and mode switching
// ============================================================================

#[test]
fn test_custom_strategy_receives_wafer_and_cell() {
    let worst = |wafer: &WaferData, cell: DrawCell| {
        let offset = wafer.offset_at(cell);
        wafer
            .layers()
            .filter_map(|l| l.contribution(offset))
            .max()
            .unwrap_or(UNKNOWN)
    };

    let mut wafer = single_die(AggregationMode::custom(worst));
    wafer
        .attach("a", ConstantLayer(2))
        .attach("b", ConstantLayer(8))
        .attach("c", ConstantLayer(3));
    assert_eq!(wafer.mode().name(), "custom");
    assert_eq!(wafer.grade(die_a()), 8);
}

#[test]
fn test_set_mode_keeps_layers() {
    let mut wafer = single_die(AggregationMode::Testing);
    wafer
        .attach("a", ConstantLayer(1))
        .attach("b", ConstantLayer(2));
    assert_eq!(wafer.grade(die_a()), FAIL);

    wafer.set_mode(AggregationMode::Counting);
    assert_eq!(wafer.grade(die_a()), 3);

    wafer.set_mode("bincode".into());
    assert_eq!(wafer.grade(die_a()), 2);
    assert_eq!(wafer.layer_count(), 2);
}

// ============================================================================
// Pick
// ============================================================================

#[test]
fn test_pick_one_entry_per_layer_in_order() {
    let mut wafer = single_die(AggregationMode::Testing);
    wafer
        .attach("plain", ConstantLayer(0))
        .attach(
            "matrix",
            MatrixLayer::new(vec![vec![3]]).with_data(vec![vec![json!({"bin": 3})]]),
        )
        .attach_layer(
            Layer::new(
                "fn",
                FnLayer::new(|_: wafermap::DieOffset| 0)
                    .with_data(|o: wafermap::DieOffset| Some(json!([o.row, o.col]))),
            )
            .with_enabled(false),
        );

    let picked = wafer.pick(die_a());
    assert_eq!(picked, vec![None, Some(json!({"bin": 3})), Some(json!([0, 0]))]);
}

// ============================================================================
// Whole grids
// ============================================================================

#[test]
fn test_grade_grid_respects_origin() {
    // results[row offset][col offset]; row offset 0 is min_row.
    let results = vec![vec![0, 1], vec![2, 3]];

    let mut wafer = WaferData::new(
        WaferBounds::new(2, 2, 1, 1),
        Origin::LeftDown,
        AggregationMode::Bincode,
    );
    wafer.attach("a", MatrixLayer::new(results.clone()));
    // Left-down draws min_row at the bottom.
    assert_eq!(wafer.grade_grid(), vec![vec![2, 3], vec![0, 1]]);

    let mut wafer = WaferData::new(
        WaferBounds::new(2, 2, 1, 1),
        Origin::RightUp,
        AggregationMode::Bincode,
    );
    wafer.attach("a", MatrixLayer::new(results));
    // Right-up draws min_col on the right.
    assert_eq!(wafer.grade_grid(), vec![vec![1, 0], vec![3, 2]]);
}

#[test]
fn test_generated_wafer_grades() {
    let (max_row, max_col, min_row, min_col) = bounds::SMALL_5X5;
    let mut wafer = WaferData::new(
        WaferBounds::new(max_row, max_col, min_row, min_col),
        Origin::LeftUp,
        AggregationMode::Counting,
    );
    wafer
        .attach(layers::CP1, MatrixLayer::new(create_result_matrix(5, 5, 0)))
        .attach(layers::CP2, MatrixLayer::new(create_bin_matrix(5, 5, 1)));

    let grid = wafer.grade_grid();
    // Every on-wafer die counts 0 + 1, corners stay unknown.
    assert_eq!(grid[0][0], UNKNOWN);
    assert_eq!(grid[2][2], 1);
    assert!(grid.iter().flatten().all(|&code| code == UNKNOWN || code == 1));
}
