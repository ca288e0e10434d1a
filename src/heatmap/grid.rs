//! Grid layout for heatmap cells

use serde::Serialize;

use super::color::{color_of, Hsl, ValueRange};
use super::format::{format_count, format_value};

/// Default column cap
pub const DEFAULT_MAX_COLUMNS: usize = 5;

/// Number of grid columns for `len` cells under a cap of `max_columns`.
///
/// Never returns 0: an empty batch still lays out as one column, and a cap of
/// 0 is treated as 1.
pub fn column_count(len: usize, max_columns: usize) -> usize {
    len.max(1).min(max_columns.max(1))
}

/// A single labeled cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    /// Zero-based position in the batch
    pub index: usize,
    /// `#1`, `#2`, ...
    pub label: String,
    pub value: f64,
    /// Two decimals, or the placeholder for non-finite values
    pub value_text: String,
    /// `"<count> raw"`, present only when `raw_counts` reaches this index
    pub raw_text: Option<String>,
    pub color: Hsl,
}

/// Cells of one heatmap batch arranged in row-major order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapGrid {
    pub columns: usize,
    pub range: ValueRange,
    pub cells: Vec<GridCell>,
}

impl HeatmapGrid {
    /// Lay out `values`, attaching `raw_counts[i]` to cell `i` where one exists.
    pub fn build(values: &[f64], raw_counts: &[f64], max_columns: usize) -> Self {
        let range = ValueRange::of(values);

        let cells = values
            .iter()
            .enumerate()
            .map(|(index, &value)| GridCell {
                index,
                label: format!("#{}", index + 1),
                value,
                value_text: format_value(value),
                raw_text: raw_counts
                    .get(index)
                    .map(|&count| format!("{} raw", format_count(count))),
                color: color_of(value, range),
            })
            .collect();

        Self {
            columns: column_count(values.len(), max_columns),
            range,
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells grouped into rows of `columns`
    pub fn rows(&self) -> std::slice::Chunks<'_, GridCell> {
        self.cells.chunks(self.columns)
    }

    /// Number of rows needed to show every cell
    pub fn row_count(&self) -> usize {
        self.cells.len().div_ceil(self.columns)
    }
}
