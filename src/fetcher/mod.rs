//! Heatmap fetching
//!
//! Retrieves heatmap payloads and tracks the loading / error / loaded state
//! the dashboard renders.
//!
//! ## Architecture
//!
//! - **HeatmapSource**: anything that can produce one payload per call
//! - **HeatmapClient**: HTTP implementation backed by `reqwest`
//! - **FetchController**: owns the dashboard state, issues requests and
//!   publishes every change on a watch channel
//!
//! ## Request lifecycle
//!
//! 1. `refresh()` issues a request id and aborts whatever was in flight
//! 2. The source is polled on a spawned task
//! 3. The result is committed only if its id is still the latest one

mod client;
mod controller;
mod error;

pub use client::{ClientConfig, HeatmapClient};
pub use controller::{DashboardState, FetchController, FetchPhase, RequestId};
pub use error::{FetchError, FetchResult};

use async_trait::async_trait;
use crate::heatmap::HeatmapPayload;

/// Common trait for heatmap sources
#[async_trait]
pub trait HeatmapSource: Send + Sync {
    /// Where the data comes from, for display
    fn endpoint(&self) -> &str;

    /// Fetch the current heatmap
    async fn fetch(&self) -> FetchResult<HeatmapPayload>;
}
