//! Typed client for the map provider's point-of-interest search and
//! reverse-geocoding endpoints.

mod api;
pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use api::GeoApi;
pub use client::{GeoClient, DEFAULT_PAGE_SIZE};
pub use error::GeoError;
pub use normalize::{compose_address, normalize_page, normalize_poi};
