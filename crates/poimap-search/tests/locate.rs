//! Map flows with recording fakes for the map, the location provider and
//! the geo API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use poimap_core::{Coordinate, ErrorKind, ResultPage, SearchResult, MY_LOCATION};
use poimap_geo::{GeoApi, GeoError};
use poimap_search::{locate_me, show_result, LocateError, LocateOptions, LocationProvider, MapView};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
enum MapCall {
    Camera(Coordinate, f32),
    Marker(Coordinate, String, String),
}

#[derive(Default)]
struct RecordingMap {
    calls: Vec<MapCall>,
}

impl MapView for RecordingMap {
    fn show_marker(&mut self, at: Coordinate, title: &str, subtitle: &str) {
        self.calls
            .push(MapCall::Marker(at, title.to_owned(), subtitle.to_owned()));
    }

    fn move_camera(&mut self, at: Coordinate, zoom: f32) {
        self.calls.push(MapCall::Camera(at, zoom));
    }
}

/// Location provider backed by a channel the test feeds.
struct ChannelProvider {
    updates: Mutex<Option<mpsc::UnboundedReceiver<Coordinate>>>,
    requested: Mutex<Option<(Duration, f32)>>,
}

impl ChannelProvider {
    fn new() -> (Self, mpsc::UnboundedSender<Coordinate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let provider = Self {
            updates: Mutex::new(Some(rx)),
            requested: Mutex::new(None),
        };
        (provider, tx)
    }
}

impl LocationProvider for ChannelProvider {
    fn request_location_updates(
        &self,
        min_interval: Duration,
        min_distance_m: f32,
    ) -> BoxStream<'static, Coordinate> {
        *self.requested.lock().unwrap() = Some((min_interval, min_distance_m));
        let Some(rx) = self.updates.lock().unwrap().take() else {
            return stream::empty().boxed();
        };
        stream::unfold(rx, |mut rx| async move {
            let fix = rx.recv().await?;
            Some((fix, rx))
        })
        .boxed()
    }
}

struct FixedAddress(Result<&'static str, u16>);

#[async_trait]
impl GeoApi for FixedAddress {
    async fn search(&self, keyword: &str, page: u32, _size: u32) -> Result<ResultPage, GeoError> {
        Ok(ResultPage::empty(keyword, page))
    }

    async fn reverse_geocode(&self, _at: Coordinate) -> Result<String, GeoError> {
        match self.0 {
            Ok(address) => Ok(address.to_owned()),
            Err(status) => Err(GeoError::Api {
                status,
                message: "Internal Server Error".to_owned(),
            }),
        }
    }
}

const CITY_HALL: Coordinate = Coordinate {
    latitude: 37.5665,
    longitude: 126.978,
};

#[test]
fn show_result_centers_then_marks() {
    let mut map = RecordingMap::default();
    let result = SearchResult {
        name: "Seoul Station".to_owned(),
        full_address: "Seoul Jung-gu Bongnae-dong 2-ga 122".to_owned(),
        location: Coordinate::new(37.5546, 126.9706),
    };

    show_result(&mut map, &result, 17.0);

    assert_eq!(
        map.calls,
        [
            MapCall::Camera(result.location, 17.0),
            MapCall::Marker(
                result.location,
                "Seoul Station".to_owned(),
                "Seoul Jung-gu Bongnae-dong 2-ga 122".to_owned()
            ),
        ]
    );
}

#[tokio::test]
async fn locate_me_uses_first_fix_and_unsubscribes() {
    let (provider, tx) = ChannelProvider::new();
    tx.send(CITY_HALL).unwrap();
    tx.send(Coordinate::new(35.1796, 129.0756)).unwrap();

    let geo = FixedAddress(Ok("Seoul Jung-gu Taepyeongno 1-ga 31"));
    let mut map = RecordingMap::default();
    let options = LocateOptions::default();

    let mine = locate_me(&geo, &provider, &mut map, &options).await.unwrap();

    assert_eq!(mine.name, MY_LOCATION);
    assert_eq!(mine.full_address, "Seoul Jung-gu Taepyeongno 1-ga 31");
    assert_eq!(mine.location, CITY_HALL);
    assert_eq!(
        map.calls,
        [
            MapCall::Camera(CITY_HALL, 17.0),
            MapCall::Marker(
                CITY_HALL,
                MY_LOCATION.to_owned(),
                "Seoul Jung-gu Taepyeongno 1-ga 31".to_owned()
            ),
        ]
    );
    assert!(tx.is_closed(), "the location stream must be dropped after one fix");
    assert_eq!(
        *provider.requested.lock().unwrap(),
        Some((Duration::from_millis(3000), 100.0))
    );
}

#[tokio::test]
async fn locate_me_without_fix_touches_nothing() {
    let (provider, tx) = ChannelProvider::new();
    drop(tx);
    let mut map = RecordingMap::default();

    let err = locate_me(
        &FixedAddress(Ok("unused")),
        &provider,
        &mut map,
        &LocateOptions::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, LocateError::NoFix));
    assert_eq!(err.kind(), ErrorKind::LocationUnavailable);
    assert!(map.calls.is_empty());
}

#[tokio::test]
async fn reverse_geocode_failure_moves_camera_but_places_no_marker() {
    let (provider, tx) = ChannelProvider::new();
    tx.send(CITY_HALL).unwrap();
    let mut map = RecordingMap::default();
    let options = LocateOptions {
        zoom: 15.0,
        ..LocateOptions::default()
    };

    let geo: Arc<dyn GeoApi> = Arc::new(FixedAddress(Err(500)));
    let err = locate_me(geo.as_ref(), &provider, &mut map, &options)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(map.calls, [MapCall::Camera(CITY_HALL, 15.0)]);
}
