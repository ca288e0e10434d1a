//! Plain-text rendering of a heatmap snapshot for stdout

use std::fmt::Write;

use crossterm::style::{Color, Stylize};

use super::format::{format_count, format_updated_at};
use super::grid::HeatmapGrid;
use super::payload::HeatmapPayload;

/// Minimum cell width in characters
const MIN_CELL_WIDTH: usize = 10;

/// Shown in place of the grid when there is no batch to display
pub const NO_DATA: &str = "No heat values returned by the API yet.";

/// Whether to emit ANSI truecolor backgrounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotStyle {
    Color,
    Plain,
}

/// Render the grid followed by the meta lines (updated, total raw, samples).
pub fn render_snapshot(payload: &HeatmapPayload, max_columns: usize, style: SnapshotStyle) -> String {
    let mut out = String::new();

    if payload.is_empty() {
        out.push_str(NO_DATA);
        out.push('\n');
    } else {
        let grid = HeatmapGrid::build(&payload.heat_values, &payload.raw_counts, max_columns);
        render_grid(&mut out, &grid, style);
    }

    out.push('\n');
    let summary = payload.summary();
    let _ = writeln!(out, "Updated: {}", format_updated_at(payload.updated_at.as_deref()));
    if let Some(total) = summary.total_raw {
        let _ = writeln!(out, "Total raw count: {}", format_count(total));
    }
    let _ = writeln!(out, "Samples: {}", summary.samples);

    out
}

/// Machine-readable snapshot: the raw timestamp, the summary and the laid-out grid.
pub fn snapshot_json(payload: &HeatmapPayload, max_columns: usize) -> serde_json::Value {
    let grid = HeatmapGrid::build(&payload.heat_values, &payload.raw_counts, max_columns);
    serde_json::json!({
        "updated_at": &payload.updated_at,
        "summary": payload.summary(),
        "grid": grid,
    })
}

fn render_grid(out: &mut String, grid: &HeatmapGrid, style: SnapshotStyle) {
    let width = grid
        .cells
        .iter()
        .flat_map(|c| {
            [
                c.label.chars().count(),
                c.value_text.chars().count(),
                c.raw_text.as_ref().map_or(0, |r| r.chars().count()),
            ]
        })
        .max()
        .unwrap_or(0)
        .saturating_add(2)
        .max(MIN_CELL_WIDTH);

    for row in grid.rows() {
        let lines = [
            row.iter().map(|c| (c, c.label.as_str())).collect::<Vec<_>>(),
            row.iter().map(|c| (c, c.value_text.as_str())).collect(),
            row.iter().map(|c| (c, c.raw_text.as_deref().unwrap_or(""))).collect(),
        ];

        for line in lines {
            for (i, (cell, text)) in line.into_iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                let padded = format!("{:^width$}", text, width = width);
                match style {
                    SnapshotStyle::Plain => out.push_str(&padded),
                    SnapshotStyle::Color => {
                        let rgb = cell.color.to_rgb();
                        let bg = Color::Rgb { r: rgb.r, g: rgb.g, b: rgb.b };
                        let _ = write!(out, "{}", padded.with(Color::Black).on(bg));
                    }
                }
            }
            // Trailing padding is noise in plain output.
            let trimmed = out.trim_end_matches(' ').len();
            out.truncate(trimmed);
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_snapshot() {
        let payload = HeatmapPayload::new(vec![1.0, 2.0, 3.0], vec![1500.0, f64::NAN, 2.0])
            .updated_at("not a timestamp");
        let text = render_snapshot(&payload, 5, SnapshotStyle::Plain);

        assert!(text.contains("#1"));
        assert!(text.contains("#3"));
        assert!(text.contains("2.00"));
        assert!(text.contains("1,500 raw"));
        assert!(text.contains("2 raw"));
        assert!(text.contains("Updated: not a timestamp"));
        assert!(text.contains("Total raw count: 1,502"));
        assert!(text.contains("Samples: 3"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_rows_wrap_at_column_cap() {
        let payload = HeatmapPayload::new(vec![1.0, 2.0, 3.0, 4.0], vec![]);
        let text = render_snapshot(&payload, 2, SnapshotStyle::Plain);

        let label_lines: Vec<_> = text.lines().filter(|l| l.contains('#')).collect();
        assert_eq!(label_lines.len(), 2);
        assert!(label_lines[0].contains("#1") && label_lines[0].contains("#2"));
        assert!(label_lines[1].contains("#3") && label_lines[1].contains("#4"));
    }

    #[test]
    fn test_empty_snapshot() {
        let payload = HeatmapPayload::new(vec![], vec![]);
        let text = render_snapshot(&payload, 5, SnapshotStyle::Plain);

        assert!(text.starts_with(NO_DATA));
        assert!(text.contains("Updated: Not available"));
        assert!(!text.contains("Total raw count"));
        assert!(text.contains("Samples: 0"));
    }

    #[test]
    fn test_json_snapshot() {
        let payload = HeatmapPayload::new(vec![1.0, 2.0, 3.0, 4.0], vec![1000.0, f64::NAN])
            .updated_at("2024-05-01T12:00:00Z");
        let json = snapshot_json(&payload, 3);

        assert_eq!(json["updated_at"], "2024-05-01T12:00:00Z");
        assert_eq!(json["summary"]["samples"], 4);
        assert_eq!(json["summary"]["total_raw"], 1000.0);

        let grid = &json["grid"];
        assert_eq!(grid["columns"], 3);
        assert_eq!(grid["range"]["min"], 1.0);
        assert_eq!(grid["range"]["max"], 4.0);

        let cells = grid["cells"].as_array().unwrap();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0]["label"], "#1");
        assert_eq!(cells[0]["raw_text"], "1,000 raw");
        assert_eq!(cells[1]["raw_text"], "— raw");
        assert!(cells[2]["raw_text"].is_null());
        assert_eq!(cells[3]["value_text"], "4.00");
        assert_eq!(cells[3]["color"]["hue"], 0.0);
    }

    #[test]
    fn test_json_snapshot_without_data() {
        let json = snapshot_json(&HeatmapPayload::new(vec![], vec![]), 5);

        assert!(json["updated_at"].is_null());
        assert_eq!(json["summary"]["samples"], 0);
        assert!(json["summary"]["total_raw"].is_null());
        assert_eq!(json["grid"]["cells"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_color_snapshot_uses_truecolor() {
        let payload = HeatmapPayload::new(vec![0.0, 1.0], vec![]);
        let text = render_snapshot(&payload, 5, SnapshotStyle::Color);
        // Warm end of the ramp as a 24-bit background
        assert!(text.contains("48;2;217;38;38"));
    }
}
