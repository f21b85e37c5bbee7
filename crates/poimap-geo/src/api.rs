use async_trait::async_trait;
use poimap_core::{Coordinate, ResultPage};

use crate::error::GeoError;

/// The two remote operations the search session and the locate-me flow
/// depend on. [`crate::GeoClient`] is the HTTP implementation; tests swap in
/// in-process fakes.
#[async_trait]
pub trait GeoApi: Send + Sync {
    /// Runs one keyword search and returns the requested 1-based page.
    async fn search(
        &self,
        keyword: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ResultPage, GeoError>;

    /// Resolves a coordinate into a human-readable full address.
    async fn reverse_geocode(&self, at: Coordinate) -> Result<String, GeoError>;
}
