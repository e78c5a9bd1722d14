//! Error types for the geopoints library.

use thiserror::Error;

/// Errors that can occur while loading a feature collection from the store.
#[derive(Error, Debug)]
pub enum PointsError {
    /// The collection query could not be executed.
    #[error("Failed to query points: {0}")]
    Query(#[source] sqlx::Error),

    /// A result row could not be read as a JSON payload.
    #[error("Failed to scan JSON result: {0}")]
    Scan(#[source] sqlx::Error),

    /// The payload was not a valid feature collection document.
    #[error("Failed to unmarshal JSON: {0}")]
    Unmarshal(#[from] serde_json::Error),
}

impl PointsError {
    /// Message safe to hand back to HTTP clients. Never includes the cause.
    pub fn public_message(&self) -> &'static str {
        match self {
            PointsError::Query(_) => "Failed to query points",
            PointsError::Scan(_) => "Failed to scan JSON result",
            PointsError::Unmarshal(_) => "Failed to unmarshal JSON",
        }
    }
}

/// Errors raised while reading configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but its value could not be parsed.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Result type alias using [`PointsError`].
pub type Result<T> = std::result::Result<T, PointsError>;
