//! Heatmap payload returned by the backend

use serde::{Deserialize, Deserializer, Serialize};

/// One heatmap snapshot as served by `GET /heatmap`.
///
/// `raw_counts` is aligned by index with `heat_values` but either may be
/// longer than the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPayload {
    #[serde(default)]
    pub updated_at: Option<String>,

    /// `null` entries decode as NaN
    #[serde(deserialize_with = "nullable_values")]
    pub heat_values: Vec<f64>,

    /// `null` entries decode as NaN; only indices past the end are missing
    #[serde(default, deserialize_with = "nullable_values")]
    pub raw_counts: Vec<f64>,
}

fn nullable_values<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
    Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// Aggregate figures shown beneath the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapSummary {
    /// Number of heat values
    pub samples: usize,
    /// Sum of the finite raw counts; `None` when no raw counts were sent
    pub total_raw: Option<f64>,
}

impl HeatmapPayload {
    pub fn new(heat_values: Vec<f64>, raw_counts: Vec<f64>) -> Self {
        Self {
            updated_at: None,
            heat_values,
            raw_counts,
        }
    }

    /// Set the timestamp
    pub fn updated_at(mut self, ts: impl Into<String>) -> Self {
        self.updated_at = Some(ts.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.heat_values.is_empty()
    }

    /// Raw count at `index`, if the array reaches that far
    pub fn raw_count(&self, index: usize) -> Option<f64> {
        self.raw_counts.get(index).copied()
    }

    /// Sum of the finite raw counts
    pub fn total_raw(&self) -> f64 {
        self.raw_counts.iter().filter(|c| c.is_finite()).sum()
    }

    pub fn summary(&self) -> HeatmapSummary {
        HeatmapSummary {
            samples: self.heat_values.len(),
            total_raw: (!self.raw_counts.is_empty()).then(|| self.total_raw()),
        }
    }
}
