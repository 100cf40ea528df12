//! # Error Types Module
//!
//! Error types for coordinate validation and for calls to the external
//! places-search and geocoding providers.

use thiserror::Error;

/// Invalid coordinates
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

/// Failure talking to an external provider
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// Connection, DNS or TLS errors
    #[error("network error: {0}")]
    Transport(String),
    /// The request exceeded the configured timeout
    #[error("request timed out: {0}")]
    Timeout(String),
    /// The provider answered with a non-success status
    #[error("provider returned HTTP {status}")]
    Status { status: u16 },
    /// The response body was not the expected JSON
    #[error("unexpected response: {0}")]
    Decode(String),
    /// Too many recent failures, the provider is not being called
    #[error("provider temporarily disabled after repeated failures")]
    CircuitOpen,
}

impl SearchError {
    /// Whether the same request may succeed if sent again
    pub fn is_retryable(&self) -> bool {
        match self {
            SearchError::Transport(_) | SearchError::Timeout(_) => true,
            SearchError::Status { status } => *status >= 500 || *status == 429,
            SearchError::Decode(_) | SearchError::CircuitOpen => false,
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key in its query string
        let err = err.without_url();
        if err.is_timeout() {
            SearchError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            SearchError::Status {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            SearchError::Decode(err.to_string())
        } else {
            SearchError::Transport(err.to_string())
        }
    }
}
