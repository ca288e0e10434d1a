//! Fetch controller
//!
//! Owns the dashboard state machine:
//!
//! ```text
//! Idle -> Loading -> Loaded
//!            ^    \-> Errored
//!            |          |
//!            +-- refresh+
//! ```
//!
//! Every request gets a monotonically increasing [`RequestId`]. Only the most
//! recently issued id may commit its result; a superseded request is aborted
//! and anything it still reports is discarded.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::error::{FetchError, FetchResult};
use super::HeatmapSource;
use crate::heatmap::HeatmapPayload;

/// Identifier of one issued request
pub type RequestId = u64;

/// Where the dashboard is in its fetch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Snapshot of everything the presentation layer shows
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub phase: FetchPhase,
    /// A request is in flight
    pub loading: bool,
    /// Last successfully loaded payload; kept across failed refreshes
    pub payload: Option<HeatmapPayload>,
    /// Message of the last failure, cleared when a new request starts
    pub error: Option<String>,
    /// When `payload` was received
    pub last_success: Option<DateTime<Utc>>,
    /// Latest issued request
    pub request: Option<RequestId>,
}

impl DashboardState {
    /// Phase to fall back to when a request ends without a result
    fn settled_phase(&self) -> FetchPhase {
        if self.error.is_some() {
            FetchPhase::Errored
        } else if self.payload.is_some() {
            FetchPhase::Loaded
        } else {
            FetchPhase::Idle
        }
    }

    /// True while the very first load is outstanding
    pub fn is_initial_load(&self) -> bool {
        self.loading && self.payload.is_none()
    }

    /// Payload with at least one heat value
    pub fn displayable(&self) -> Option<&HeatmapPayload> {
        self.payload.as_ref().filter(|p| !p.is_empty())
    }
}

#[derive(Default)]
struct Inflight {
    latest: RequestId,
    handle: Option<JoinHandle<()>>,
}

struct Shared {
    source: Arc<dyn HeatmapSource>,
    state: watch::Sender<DashboardState>,
    inflight: Mutex<Inflight>,
}

/// Issues heatmap requests and owns the resulting state
#[derive(Clone)]
pub struct FetchController {
    shared: Arc<Shared>,
}

impl FetchController {
    /// Create a controller in the `Idle` state
    pub fn new(source: Arc<dyn HeatmapSource>) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        Self {
            shared: Arc::new(Shared {
                source,
                state,
                inflight: Mutex::new(Inflight::default()),
            }),
        }
    }

    /// Endpoint of the underlying source
    pub fn endpoint(&self) -> &str {
        self.shared.source.endpoint()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.shared.state.subscribe()
    }

    /// Current state
    pub fn state(&self) -> DashboardState {
        self.shared.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().loading
    }

    fn inflight(&self) -> MutexGuard<'_, Inflight> {
        // The guarded data stays consistent even if a holder panicked.
        self.shared
            .inflight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start a new request: supersede the previous one and enter `Loading`.
    pub fn begin(&self) -> RequestId {
        let mut inflight = self.inflight();
        inflight.latest += 1;
        let id = inflight.latest;

        if let Some(handle) = inflight.handle.take() {
            if !handle.is_finished() {
                tracing::debug!(request = id - 1, "Cancelling superseded heatmap request");
            }
            handle.abort();
        }

        self.shared.state.send_modify(|state| {
            state.phase = FetchPhase::Loading;
            state.loading = true;
            state.error = None;
            state.request = Some(id);
        });

        id
    }

    /// Commit the result of request `id`.
    ///
    /// Returns `true` if the result was applied. Results of superseded
    /// requests and cancellations are not applied.
    pub fn complete(&self, id: RequestId, result: FetchResult<HeatmapPayload>) -> bool {
        let mut inflight = self.inflight();
        if id != inflight.latest {
            tracing::debug!(request = id, latest = inflight.latest, "Discarding stale heatmap result");
            return false;
        }
        inflight.handle = None;

        match result {
            Ok(payload) => {
                tracing::info!(
                    request = id,
                    samples = payload.heat_values.len(),
                    "Heatmap loaded"
                );
                self.shared.state.send_modify(|state| {
                    state.payload = Some(payload);
                    state.error = None;
                    state.loading = false;
                    state.phase = FetchPhase::Loaded;
                    state.last_success = Some(Utc::now());
                });
                true
            }
            Err(FetchError::Cancelled) => {
                tracing::debug!(request = id, "Heatmap request cancelled");
                self.shared.state.send_modify(|state| {
                    state.loading = false;
                    state.phase = state.settled_phase();
                });
                false
            }
            Err(e) => {
                tracing::warn!(request = id, error = %e, "Heatmap request failed");
                self.shared.state.send_modify(|state| {
                    state.error = Some(e.to_string());
                    state.loading = false;
                    state.phase = FetchPhase::Errored;
                });
                true
            }
        }
    }

    /// Issue a request on a background task, cancelling any in-flight one.
    pub fn refresh(&self) -> RequestId {
        let id = self.begin();

        let this = self.clone();
        let handle = tokio::spawn(async move {
            let result = this.shared.source.fetch().await;
            this.complete(id, result);
        });

        let mut inflight = self.inflight();
        if inflight.latest == id {
            inflight.handle = Some(handle);
        } else {
            // Superseded before the handle could be recorded.
            handle.abort();
        }

        id
    }

    /// Cancel any in-flight request so its result is never committed.
    pub fn shutdown(&self) {
        let mut inflight = self.inflight();
        inflight.latest += 1;
        if let Some(handle) = inflight.handle.take() {
            handle.abort();
        }

        self.shared.state.send_modify(|state| {
            if state.loading {
                state.loading = false;
                state.phase = state.settled_phase();
            }
        });
        tracing::debug!("Fetch controller shut down");
    }
}
