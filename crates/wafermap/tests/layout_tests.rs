//! Shot layout geometry and render planning.

use legend::MapLegend;
use test_utils::{assert_approx_eq, assert_coords_approx_eq};
use wafer_common::Color;
use wafermap::layout::{FAIL_COLOR, HIGHLIGHT_COLOR, PASS_COLOR};
use wafermap::{
    AggregationMode, ConstantLayer, DiePos, DrawCell, Highlight, MatrixLayer, NotchSide,
    Origin, PassFailPalette, ShotLayout, WaferBounds, WaferData,
};

const EPS: f64 = 1e-9;

fn five_by_five(mode: AggregationMode) -> WaferData {
    WaferData::new(WaferBounds::new(5, 5, 1, 1), Origin::LeftDown, mode)
}

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_die_size_uses_area_ratio() {
    let layout = ShotLayout::default();
    let (dw, dh) = layout.die_size(&WaferBounds::new(5, 10, 1, 1));
    assert_approx_eq!(dw, 0.94 * 590.0 / 10.0, EPS);
    assert_approx_eq!(dh, 0.94 * 590.0 / 5.0, EPS);
}

#[test]
fn test_grid_origin_centered_without_notch_offset() {
    let bounds = WaferBounds::new(5, 5, 1, 1);
    for side in [NotchSide::Left, NotchSide::Right, NotchSide::Up, NotchSide::Down] {
        let layout = ShotLayout::default().with_notch(side, 0.0);
        assert_coords_approx_eq!(layout.grid_origin(&bounds), (22.7, 22.7), 1e-6);
    }
}

#[test]
fn test_notch_shifts_grid_away_by_offset_dies() {
    let bounds = WaferBounds::new(5, 5, 1, 1);
    let die = 0.94 * 590.0 / 5.0;
    let centered = 22.7;

    let shifted = |side| ShotLayout::default().with_notch(side, 1.0).grid_origin(&bounds);
    assert_coords_approx_eq!(shifted(NotchSide::Left), (centered + die, centered), 1e-6);
    assert_coords_approx_eq!(shifted(NotchSide::Right), (centered - die, centered), 1e-6);
    assert_coords_approx_eq!(shifted(NotchSide::Up), (centered, centered + die), 1e-6);
    assert_coords_approx_eq!(shifted(NotchSide::Down), (centered, centered - die), 1e-6);
}

#[test]
fn test_cell_rect() {
    let bounds = WaferBounds::new(5, 5, 1, 1);
    let layout = ShotLayout::new(600.0, 10.0).with_notch(NotchSide::Down, 0.0);
    let rect = layout.cell_rect(&bounds, DrawCell::new(1, 3));
    let die = 110.92;
    assert_coords_approx_eq!((rect.x, rect.y), (22.7 + 3.0 * die, 22.7 + die), 1e-6);
    assert_coords_approx_eq!((rect.width, rect.height), (die, die), 1e-6);
}

#[test]
fn test_inside_wafer_checks_all_corners() {
    let layout = ShotLayout::default();
    let bounds = WaferBounds::new(5, 5, 1, 1);
    let flat = layout.clone().with_notch(NotchSide::Down, 0.0);
    assert!(flat.inside_wafer(&flat.cell_rect(&bounds, DrawCell::new(2, 2))));
    assert!(!flat.inside_wafer(&flat.cell_rect(&bounds, DrawCell::new(0, 0))));
    assert!(!flat.inside_wafer(&flat.cell_rect(&bounds, DrawCell::new(4, 4))));
}

// ============================================================================
// Render plan
// ============================================================================

#[test]
fn test_plan_skips_unknown_dies() {
    let mut wafer = five_by_five(AggregationMode::Testing);
    wafer.attach("cp1", MatrixLayer::new(vec![vec![0, -1, 1]]));

    let tiles = ShotLayout::default().plan(&wafer, &PassFailPalette::default(), None);
    assert_eq!(tiles.len(), 2);
    // Row offset 0 is drawn at the bottom for left-down.
    assert!(tiles.iter().all(|t| t.cell.row == 4));
    assert_eq!(tiles[0].pos, DiePos::new(1, 1));
    assert_eq!(tiles[0].color, PASS_COLOR);
    assert_eq!(tiles[1].pos, DiePos::new(1, 3));
    assert_eq!(tiles[1].color, FAIL_COLOR);
}

#[test]
fn test_plan_with_bounding_drops_dies_off_the_circle() {
    let mut wafer = five_by_five(AggregationMode::Testing);
    wafer.attach("cp1", ConstantLayer(0));

    let flat = ShotLayout::default().with_notch(NotchSide::Down, 0.0);
    let palette = PassFailPalette::default();
    assert_eq!(flat.plan(&wafer, &palette, None).len(), 25);

    let bounded = flat.with_bounding(true);
    let tiles = bounded.plan(&wafer, &palette, None);
    assert_eq!(tiles.len(), 13);
    assert!(tiles.iter().all(|t| bounded.inside_wafer(&t.rect)));
}

#[test]
fn test_highlight_follows_bincode_not_active_mode() {
    let mut wafer = five_by_five(AggregationMode::Testing);
    wafer
        .attach("cp1", ConstantLayer(0))
        .attach("cp2", MatrixLayer::new(vec![vec![4, 0]]));

    let highlight = Highlight::new(4);
    let palette = PassFailPalette::default();
    let tiles = ShotLayout::default().plan(&wafer, &palette, Some(&highlight));

    let lit: Vec<_> = tiles.iter().filter(|t| t.highlighted).collect();
    assert_eq!(lit.len(), 1);
    assert_eq!(lit[0].pos, DiePos::new(1, 1));
    // Active testing grade is good-to-bad, the color comes from the highlight.
    assert_eq!(lit[0].code, 2);
    assert_eq!(lit[0].color, HIGHLIGHT_COLOR);
    assert!(tiles
        .iter()
        .filter(|t| !t.highlighted)
        .all(|t| t.color != HIGHLIGHT_COLOR));
}

#[test]
fn test_plan_with_legend_palette() {
    let mut wafer = five_by_five(AggregationMode::Counting);
    wafer
        .attach("a", ConstantLayer(1))
        .attach("b", ConstantLayer(2));

    let legend = MapLegend::new(0).range(0.0, 11.0);
    let tiles = ShotLayout::default().plan(&wafer, &legend, None);
    assert_eq!(tiles.len(), 25);
    assert!(tiles.iter().all(|t| t.code == 3 && t.color == legend.select(3.0)));
}

#[test]
fn test_custom_palette_colors() {
    let mut wafer = five_by_five(AggregationMode::Testing);
    wafer.attach("cp1", ConstantLayer(0));
    let palette = PassFailPalette {
        pass: Color::BLACK,
        fail: Color::WHITE,
    };
    let tiles = ShotLayout::default().plan(&wafer, &palette, None);
    assert!(tiles.iter().all(|t| t.color == Color::BLACK));
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_select_die() {
    let mut wafer = five_by_five(AggregationMode::Testing);
    wafer.attach("cp1", ConstantLayer(1));
    let layout = ShotLayout::default();

    let tile = layout
        .select_die(&wafer, DiePos::new(5, 1), HIGHLIGHT_COLOR)
        .expect("die inside bounds");
    assert_eq!(tile.cell, DrawCell::new(0, 0));
    assert_eq!(tile.rect, layout.cell_rect(&wafer.bounds(), DrawCell::new(0, 0)));
    assert_eq!(tile.code, 1);

    assert!(layout.select_die(&wafer, DiePos::new(6, 1), HIGHLIGHT_COLOR).is_none());
    assert!(layout.select_die(&wafer, DiePos::new(0, 0), HIGHLIGHT_COLOR).is_none());
}
