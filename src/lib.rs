//! # Heatwatch
//!
//! A terminal dashboard for a heatmap endpoint. Heatwatch fetches a
//! precomputed heatmap (intensity values, raw counts and an update
//! timestamp) and renders the values as a cool-to-warm colored grid.
//!
//! ## Features
//!
//! - **Color mapping**: intensities normalized into an HSL ramp from blue to red
//! - **Cancellable fetches**: a newer refresh always wins over an older one
//! - **Resilient display**: failed refreshes keep the last good grid visible
//! - **Two front ends**: interactive dashboard and one-shot snapshots
//!
//! ## Modules
//!
//! - [`heatmap`]: Payload, color mapping, grid layout and formatting
//! - [`fetcher`]: HTTP client and the fetch state machine
//! - [`dashboard`]: Terminal UI
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use heatwatch::fetcher::{ClientConfig, FetchController, FetchPhase, HeatmapClient};
//! use heatwatch::heatmap::HeatmapGrid;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HeatmapClient::new(ClientConfig::default())?;
//!     let controller = FetchController::new(Arc::new(client));
//!     let mut updates = controller.subscribe();
//!
//!     controller.refresh();
//!     let state = updates.wait_for(|s| !s.loading).await?.clone();
//!
//!     if let (FetchPhase::Loaded, Some(payload)) = (state.phase, state.payload) {
//!         let grid = HeatmapGrid::build(&payload.heat_values, &payload.raw_counts, 5);
//!         for cell in &grid.cells {
//!             println!("{} {} {}", cell.label, cell.value_text, cell.color.css());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dashboard;
pub mod fetcher;
pub mod heatmap;

// Re-export top-level types for convenience
pub use heatmap::{
    color_of, color_scale, GridCell, HeatmapGrid, HeatmapPayload, HeatmapSummary, Hsl, Rgb,
    ValueRange, DEFAULT_MAX_COLUMNS, NEUTRAL,
};

pub use fetcher::{
    ClientConfig, DashboardState, FetchController, FetchError, FetchPhase, FetchResult,
    HeatmapClient, HeatmapSource, RequestId,
};

pub use config::{Config, ConfigError, DashboardConfig, EndpointConfig, LoggingConfig};
