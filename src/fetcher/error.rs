//! Fetch error types

use thiserror::Error;

/// Errors that can occur while fetching a heatmap
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not complete (connect failure, timeout, broken body)
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status
    #[error("Request failed with status {status}")]
    Http { status: u16 },

    /// The body was not valid JSON or did not have the heatmap shape
    #[error("Failed to parse heatmap payload: {0}")]
    Parse(String),

    /// Superseded by a newer request or torn down; never shown to the user
    #[error("Request cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Network("request timed out".to_string())
        } else if err.is_connect() {
            FetchError::Network(format!("could not connect: {}", err))
        } else if let Some(status) = err.status() {
            FetchError::Http {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// Result type alias for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;
