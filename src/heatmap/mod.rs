//! Heatmap model and rendering
//!
//! Pure, synchronous pieces of the dashboard: the payload served by the
//! backend, the cool-to-warm color mapping, the grid layout and the display
//! formatting of values, counts and timestamps.
//!
//! ## Color ramp
//!
//! | ratio | hue  | saturation | lightness |
//! |-------|------|------------|-----------|
//! | 0.0   | 210  | 70%        | 80%       |
//! | 0.5   | 105  | 70%        | 65%       |
//! | 1.0   | 0    | 70%        | 50%       |
//!
//! Non-finite values and constant batches use `hsl(210, 20%, 90%)`.

mod color;
mod format;
mod grid;
mod payload;
mod text;

pub use color::{color_of, color_scale, ramp, Hsl, Rgb, ValueRange, NEUTRAL};
pub use format::{
    format_count, format_updated_at, format_updated_at_in, format_value, parse_timestamp,
    NOT_AVAILABLE, PLACEHOLDER,
};
pub use grid::{column_count, GridCell, HeatmapGrid, DEFAULT_MAX_COLUMNS};
pub use payload::{HeatmapPayload, HeatmapSummary};
pub use text::{render_snapshot, snapshot_json, SnapshotStyle, NO_DATA};
