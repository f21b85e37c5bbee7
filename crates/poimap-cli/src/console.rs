//! Terminal stand-ins for the map view and the positioning service.

use std::time::Duration;

use futures::stream::{self, BoxStream, StreamExt};
use poimap_core::{Coordinate, SearchResult};
use poimap_search::{LocationProvider, MapView};

/// Prints map commands instead of drawing them.
#[derive(Debug, Default)]
pub(crate) struct ConsoleMap;

impl MapView for ConsoleMap {
    fn show_marker(&mut self, at: Coordinate, title: &str, subtitle: &str) {
        println!("marker  {at}  {title}");
        println!("        {subtitle}");
    }

    fn move_camera(&mut self, at: Coordinate, zoom: f32) {
        println!("camera  {at}  zoom {zoom}");
    }
}

/// Reports one fixed position, as if the device had a single fix.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedLocation(pub Coordinate);

impl LocationProvider for FixedLocation {
    fn request_location_updates(
        &self,
        min_interval: Duration,
        min_distance_m: f32,
    ) -> BoxStream<'static, Coordinate> {
        tracing::debug!(
            min_interval_ms = min_interval.as_millis(),
            min_distance_m,
            "location updates requested"
        );
        stream::iter([self.0]).boxed()
    }
}

/// Prints results as a numbered table.
pub(crate) fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("no results");
        return;
    }

    println!("{:<5}{:<30}{:<24}ADDRESS", "#", "NAME", "POSITION");
    for (index, result) in results.iter().enumerate() {
        println!(
            "{:<5}{:<30}{:<24}{}",
            index,
            truncate(&result.name, 28),
            result.location.to_string(),
            result.full_address
        );
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('\u{2026}');
    cut
}
