//! Heatwatch terminal dashboard
//!
//! Full-screen view of the heatmap endpoint: a cool-to-warm colored grid,
//! an error banner after failed fetches, and the update time, total raw
//! count and sample count underneath.
//!
//! # Usage
//!
//! ```bash
//! heatwatch watch --url http://localhost:8000/heatmap
//! ```
//!
//! # Architecture
//!
//! - [`app`] - Application state, event loop, and keyboard handling
//! - [`ui`] - Layout rendering
//! - [`widgets`] - The heatmap cell widget

pub mod app;
pub mod ui;
pub mod widgets;

pub use app::{run, App};
