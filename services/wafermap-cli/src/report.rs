//! Output formatting for wafer scans, grids, payloads, legends and plans.

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use legend::MapLegend;
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use wafermap::{DieRecord, DieTile, DrawCell, WaferData, WaferDescription};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Formats wafer results for output.
pub struct WaferReport;

impl WaferReport {
    fn table(header: Vec<String>) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(header);
        table
    }

    /// Pretty JSON for anything serializable.
    pub fn format_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    // === Summary ===

    /// One-table overview of a loaded description.
    pub fn format_summary(desc: &WaferDescription, wafer: &WaferData) -> String {
        let bounds = wafer.bounds();
        let mut table = Self::table(vec![format!(
            "Wafer: {}",
            desc.name.as_deref().unwrap_or("(unnamed)")
        )]);

        table.add_row(vec![
            "Rows:".to_string(),
            format!("{} ({}..={})", wafer.rows(), bounds.min_row, bounds.max_row),
        ]);
        table.add_row(vec![
            "Columns:".to_string(),
            format!("{} ({}..={})", wafer.cols(), bounds.min_col, bounds.max_col),
        ]);
        table.add_row(vec!["Origin:".to_string(), wafer.origin().to_string()]);
        table.add_row(vec!["Mode:".to_string(), wafer.mode().name().to_string()]);

        for (i, layer) in wafer.layers().enumerate() {
            let state = if layer.enabled() { "enabled" } else { "disabled" };
            table.add_row(vec![
                format!("Layer {}:", i + 1),
                format!("{} ({})", layer.id(), state),
            ]);
        }

        table.to_string()
    }

    // === Scan ===

    pub fn format_scan_table(dies: &[DieRecord]) -> String {
        let mut table = Self::table(
            ["x", "y", "pass", "code", "type", "data"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        for die in dies {
            table.add_row(vec![
                die.x.to_string(),
                die.y.to_string(),
                die.pass.to_string(),
                die.code.to_string(),
                die.die_type.clone().unwrap_or_default(),
                die.data.as_ref().map(Value::to_string).unwrap_or_default(),
            ]);
        }
        table.to_string()
    }

    pub fn scan_csv_header() -> &'static str {
        "x,y,pass,code,type,data"
    }

    pub fn format_scan_csv(dies: &[DieRecord]) -> String {
        dies.iter()
            .map(|die| {
                let data = die.data.as_ref().map(Value::to_string).unwrap_or_default();
                format!(
                    "{},{},{},{},{},{}",
                    die.x,
                    die.y,
                    die.pass,
                    die.code,
                    csv_field(die.die_type.as_deref().unwrap_or("")),
                    csv_field(&data)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    // === Grid ===

    /// Merged grades in drawing order, labeled with logical rows and columns.
    /// Unknown dies print as `.`.
    pub fn format_grid_table(wafer: &WaferData) -> String {
        let mut header = vec![String::new()];
        header.extend(
            (0..wafer.cols()).map(|col| wafer.to_logical(DrawCell::new(0, col)).col.to_string()),
        );
        let mut table = Self::table(header);

        for (row, codes) in wafer.grade_grid().iter().enumerate() {
            let label = wafer.to_logical(DrawCell::new(row as u32, 0)).row.to_string();
            let mut cells = vec![label];
            cells.extend(codes.iter().map(|&code| grid_code(code)));
            table.add_row(cells);
        }
        table.to_string()
    }

    pub fn format_grid_csv(wafer: &WaferData) -> String {
        wafer
            .grade_grid()
            .iter()
            .map(|codes| {
                codes
                    .iter()
                    .map(|code| code.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    // === Pick ===

    /// Payload of every layer for one die, in layer order.
    pub fn format_pick_table(wafer: &WaferData, payloads: &[Option<Value>]) -> String {
        let mut table = Self::table(vec!["layer".to_string(), "data".to_string()]);
        for (id, payload) in wafer.layer_ids().zip(payloads) {
            table.add_row(vec![
                id.to_string(),
                payload
                    .as_ref()
                    .map(Value::to_string)
                    .unwrap_or_else(|| "null".to_string()),
            ]);
        }
        table.to_string()
    }

    /// `[{"layer": id, "data": payload}, ...]` in layer order.
    pub fn pick_json(wafer: &WaferData, payloads: &[Option<Value>]) -> Value {
        wafer
            .layer_ids()
            .zip(payloads)
            .map(|(id, payload)| {
                serde_json::json!({
                    "layer": id.as_str(),
                    "data": payload.clone().unwrap_or(Value::Null),
                })
            })
            .collect()
    }

    // === Legend ===

    pub fn format_legend_table(legend: &MapLegend) -> String {
        let mut table = Self::table(
            ["band", "x1", "x2", "color"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        for (i, band) in legend.bands().iter().enumerate() {
            table.add_row(vec![
                i.to_string(),
                format!("{:.1}", band.x1),
                format!("{:.1}", band.x2),
                band.color.to_string(),
            ]);
        }
        table.to_string()
    }

    // === Plan ===

    pub fn format_plan_table(tiles: &[DieTile]) -> String {
        let mut table = Self::table(
            ["row", "col", "x", "y", "w", "h", "code", "color"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        for tile in tiles {
            let color = if tile.highlighted {
                format!("{} *", tile.color)
            } else {
                tile.color.to_string()
            };
            table.add_row(vec![
                tile.pos.row.to_string(),
                tile.pos.col.to_string(),
                format!("{:.2}", tile.rect.x),
                format!("{:.2}", tile.rect.y),
                format!("{:.2}", tile.rect.width),
                format!("{:.2}", tile.rect.height),
                tile.code.to_string(),
                color,
            ]);
        }
        table.to_string()
    }

    pub fn plan_csv_header() -> &'static str {
        "row,col,x,y,width,height,code,color,highlighted"
    }

    pub fn format_plan_csv(tiles: &[DieTile]) -> String {
        tiles
            .iter()
            .map(|t| {
                format!(
                    "{},{},{:.4},{:.4},{:.4},{:.4},{},{},{}",
                    t.pos.row,
                    t.pos.col,
                    t.rect.x,
                    t.rect.y,
                    t.rect.width,
                    t.rect.height,
                    t.code,
                    t.color,
                    t.highlighted
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn grid_code(code: i32) -> String {
    if code < 0 {
        ".".to_string()
    } else {
        code.to_string()
    }
}

/// Quote a CSV field when it contains a separator, quote or newline.
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("GoodGood"), "GoodGood");
        assert_eq!(csv_field(r#"{"bin":7,"x":1}"#), r#""{""bin"":7,""x"":1}""#);
        assert_eq!(csv_field(""), "");
    }

    #[test]
    fn test_grid_code() {
        assert_eq!(grid_code(-1), ".");
        assert_eq!(grid_code(3), "3");
    }
}
