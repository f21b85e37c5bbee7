use poimap_core::ErrorKind;
use poimap_geo::GeoError;
use thiserror::Error;

/// Errors returned by the search session and its orchestrator handle.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Another page request is still in flight.
    #[error("a search request is already in flight")]
    Busy,

    /// Rejected before any network call.
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Geo(#[from] GeoError),

    /// The worker task was aborted or panicked before producing a result.
    #[error("search worker stopped before finishing: {0}")]
    Cancelled(String),

    /// The orchestrator task has shut down.
    #[error("search orchestrator is no longer running")]
    Closed,
}

impl SearchError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::Busy => ErrorKind::Busy,
            SearchError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            SearchError::Geo(e) => e.kind(),
            SearchError::Cancelled(_) | SearchError::Closed => ErrorKind::Cancelled,
        }
    }
}

/// Errors returned by the locate-me flow.
#[derive(Debug, Error)]
pub enum LocateError {
    /// The location stream ended before delivering a fix.
    #[error("location provider ended without a position fix")]
    NoFix,

    #[error(transparent)]
    Geo(#[from] GeoError),
}

impl LocateError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            LocateError::NoFix => ErrorKind::LocationUnavailable,
            LocateError::Geo(e) => e.kind(),
        }
    }
}
