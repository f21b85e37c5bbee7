use poimap_core::ErrorKind;
use thiserror::Error;

/// Errors returned by the geo API client.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Transport failure, connection refused, or connect timeout.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("geo API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Arguments rejected before any request was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GeoError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeoError::Network(_) => ErrorKind::Network,
            GeoError::Api { .. } => ErrorKind::Api,
            GeoError::Decode { .. } => ErrorKind::Decode,
            GeoError::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }
}
