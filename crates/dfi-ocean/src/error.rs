//! Error types for Ocean API operations.

/// Errors that can occur when interacting with the Ocean API.
#[derive(Debug, thiserror::Error)]
pub enum OceanError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to serialize or deserialize data.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The API answered with an error body.
    #[error("API error ({code}): {message}")]
    Api {
        /// The error code reported by the API (HTTP status when absent).
        code: i64,
        /// The message reported by the API, verbatim.
        message: String,
    },

    /// The API answered with something the client could not interpret.
    #[error("malformed response: {0}")]
    Response(String),

    /// A decimal amount string could not be converted exactly.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
