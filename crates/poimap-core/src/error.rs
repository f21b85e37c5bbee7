use thiserror::Error;

/// Errors raised while loading [`crate::AppConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Stable classification of a failed request, as reported to UI observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport failure or connection timeout.
    Network,
    /// The provider answered with a non-success status.
    Api,
    /// The response body did not have the expected shape.
    Decode,
    /// A request was issued while another one was still in flight.
    Busy,
    /// The request was rejected before any network call (empty keyword, page 0).
    InvalidRequest,
    /// The worker running the request stopped before producing a result.
    Cancelled,
    /// The location provider stopped without delivering a position.
    LocationUnavailable,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorKind::Network => "network",
            ErrorKind::Api => "api",
            ErrorKind::Decode => "decode",
            ErrorKind::Busy => "busy",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::LocationUnavailable => "location_unavailable",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_display_as_snake_case() {
        assert_eq!(ErrorKind::InvalidRequest.to_string(), "invalid_request");
        assert_eq!(
            ErrorKind::LocationUnavailable.to_string(),
            "location_unavailable"
        );
        assert_eq!(ErrorKind::Network.to_string(), "network");
    }
}
