//! Map-facing flows: plotting a selected result and "locate me".
//!
//! Rendering and positioning are external collaborators behind
//! [`MapView`] and [`LocationProvider`].

use std::time::Duration;

use futures::stream::BoxStream;
use futures::StreamExt;
use poimap_core::{AppConfig, Coordinate, SearchResult, MY_LOCATION};
use poimap_geo::GeoApi;

use crate::error::LocateError;

/// Interactive map capability.
pub trait MapView: Send {
    fn show_marker(&mut self, at: Coordinate, title: &str, subtitle: &str);

    fn move_camera(&mut self, at: Coordinate, zoom: f32);
}

/// Device positioning capability.
///
/// Dropping the returned stream unsubscribes from updates.
pub trait LocationProvider: Send + Sync {
    fn request_location_updates(
        &self,
        min_interval: Duration,
        min_distance_m: f32,
    ) -> BoxStream<'static, Coordinate>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocateOptions {
    pub min_interval: Duration,
    pub min_distance_m: f32,
    pub zoom: f32,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(3000),
            min_distance_m: 100.0,
            zoom: 17.0,
        }
    }
}

impl LocateOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            min_interval: Duration::from_millis(config.location_min_interval_ms),
            min_distance_m: config.location_min_distance_m,
            zoom: config.camera_zoom,
        }
    }
}

/// Centers the map on `result` and marks it with its name and address.
pub fn show_result(map: &mut dyn MapView, result: &SearchResult, zoom: f32) {
    map.move_camera(result.location, zoom);
    map.show_marker(result.location, &result.name, &result.full_address);
}

/// Takes one position fix, unsubscribes, centers the map on it, resolves
/// its address and marks it as [`MY_LOCATION`].
///
/// # Errors
///
/// - [`LocateError::NoFix`] if the stream ends before yielding a position.
/// - [`LocateError::Geo`] if reverse geocoding fails; the camera has already
///   moved, but no marker is placed.
pub async fn locate_me<G>(
    geo: &G,
    provider: &dyn LocationProvider,
    map: &mut dyn MapView,
    options: &LocateOptions,
) -> Result<SearchResult, LocateError>
where
    G: GeoApi + ?Sized,
{
    let fix = {
        let mut updates =
            provider.request_location_updates(options.min_interval, options.min_distance_m);
        updates.next().await.ok_or(LocateError::NoFix)?
    };
    tracing::info!(%fix, "position fix received");

    map.move_camera(fix, options.zoom);

    let full_address = geo.reverse_geocode(fix).await?;
    let mine = SearchResult {
        name: MY_LOCATION.to_owned(),
        full_address,
        location: fix,
    };
    map.show_marker(mine.location, &mine.name, &mine.full_address);
    Ok(mine)
}
