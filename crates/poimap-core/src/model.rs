//! Domain value types shared by the geo client and the search session.

use serde::{Deserialize, Serialize};

/// Label used when a point of interest arrives without a name.
pub const UNNAMED_PLACE: &str = "Unnamed place";

/// Label used when the provider omits an address.
pub const ADDRESS_UNAVAILABLE: &str = "Address unavailable";

/// Marker title for the device's own position in the locate-me flow.
pub const MY_LOCATION: &str = "My location";

/// A WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `true` when both components are finite and inside the valid
    /// latitude (±90) and longitude (±180) ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// One point of interest, normalized from a raw provider record.
///
/// `name` and `full_address` are never empty: missing source fields are
/// replaced with [`UNNAMED_PLACE`] and [`ADDRESS_UNAVAILABLE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub full_address: String,
    pub location: Coordinate,
}

/// One page of results returned by a single keyword search call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    pub items: Vec<SearchResult>,
    /// 1-based page number.
    pub page_number: u32,
    pub query_keyword: String,
    /// Total number of matches reported by the provider, when it says so.
    pub total_count: Option<u32>,
    /// Records the provider returned on this page that were dropped during
    /// normalization. A page with no items but skipped records is not the end.
    pub skipped: usize,
}

impl ResultPage {
    /// Number of records the provider sent for this page, kept or not.
    #[must_use]
    pub fn received(&self) -> usize {
        self.items.len() + self.skipped
    }

    /// An empty page, used when the provider reports no matches.
    #[must_use]
    pub fn empty(query_keyword: &str, page_number: u32) -> Self {
        Self {
            items: Vec::new(),
            page_number,
            query_keyword: query_keyword.to_owned(),
            total_count: Some(0),
            skipped: 0,
        }
    }
}
