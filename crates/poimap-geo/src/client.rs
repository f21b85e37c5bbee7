//! HTTP client for the map provider's search and reverse-geocoding API.
//!
//! Every request carries the fixed `appKey` credential header and the fixed
//! `version` query parameter. Calls are single attempts: transport failures
//! surface as [`GeoError::Network`], non-2xx statuses as [`GeoError::Api`],
//! and bodies of the wrong shape as [`GeoError::Decode`].

use std::time::Duration;

use async_trait::async_trait;
use poimap_core::{AppConfig, Coordinate, ResultPage, ADDRESS_UNAVAILABLE};
use reqwest::{header, Client, StatusCode, Url};

use crate::api::GeoApi;
use crate::error::GeoError;
use crate::normalize::normalize_page;
use crate::types::{ErrorEnvelope, ReverseGeocodeEnvelope, SearchEnvelope};

const DEFAULT_BASE_URL: &str = "https://apis.openapi.sk.com/";
const SEARCH_PATH: &str = "tmap/pois";
const REVERSE_GEOCODE_PATH: &str = "tmap/geo/reversegeocoding";
const DEFAULT_API_VERSION: u32 = 1;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Results per page when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Client for the provider's point-of-interest API.
///
/// Use [`GeoClient::new`] for production, [`GeoClient::from_config`] to build
/// from [`AppConfig`], or [`GeoClient::with_base_url`] to point at a mock
/// server in tests.
pub struct GeoClient {
    client: Client,
    api_key: String,
    api_version: u32,
    search_url: Url,
    reverse_geocode_url: Url,
    log_bodies: bool,
}

impl std::fmt::Debug for GeoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoClient")
            .field("api_key", &"[redacted]")
            .field("api_version", &self.api_version)
            .field("search_url", &self.search_url.as_str())
            .field("reverse_geocode_url", &self.reverse_geocode_url.as_str())
            .field("log_bodies", &self.log_bodies)
            .finish_non_exhaustive()
    }
}

impl GeoClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Network`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str) -> Result<Self, GeoError> {
        Self::with_base_url(api_key, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_BASE_URL)
    }

    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`GeoClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, GeoError> {
        let client = Self::with_base_url(
            &config.api_key,
            config.connect_timeout_secs,
            &config.base_url,
        )?
        .with_api_version(config.api_version)
        .with_body_logging(config.log_response_bodies());
        Ok(client)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// Only the connection phase is bounded by `connect_timeout_secs`; a
    /// connected request waits for the provider's answer.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Network`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeoError::InvalidRequest`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        connect_timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeoError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .user_agent("poimap/0.1 (poi-search)")
            .build()?;

        // Exactly one trailing slash so `join` appends to the base path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalised)
            .map_err(|e| GeoError::InvalidRequest(format!("invalid base URL '{base_url}': {e}")))?;
        let search_url = endpoint(&base, SEARCH_PATH)?;
        let reverse_geocode_url = endpoint(&base, REVERSE_GEOCODE_PATH)?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            api_version: DEFAULT_API_VERSION,
            search_url,
            reverse_geocode_url,
            log_bodies: false,
        })
    }

    /// Overrides the protocol version sent with every call.
    #[must_use]
    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    /// Logs full response bodies at `debug` instead of just their size.
    #[must_use]
    pub fn with_body_logging(mut self, enabled: bool) -> Self {
        self.log_bodies = enabled;
        self
    }

    /// Searches points of interest by keyword and returns one page.
    ///
    /// A `204 No Content` answer means the provider has no matches and yields
    /// an empty page.
    ///
    /// # Errors
    ///
    /// - [`GeoError::InvalidRequest`] if `keyword` is blank, or `page` or
    ///   `page_size` is zero.
    /// - [`GeoError::Network`] on transport failure or connect timeout.
    /// - [`GeoError::Api`] if the provider returns a non-2xx status.
    /// - [`GeoError::Decode`] if the body is empty, `null`, or otherwise
    ///   does not match the expected shape.
    pub async fn search_page(
        &self,
        keyword: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ResultPage, GeoError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(GeoError::InvalidRequest(
                "search keyword must not be empty".to_owned(),
            ));
        }
        if page == 0 {
            return Err(GeoError::InvalidRequest("page numbers start at 1".to_owned()));
        }
        if page_size == 0 {
            return Err(GeoError::InvalidRequest(
                "page size must be at least 1".to_owned(),
            ));
        }

        let page_str = page.to_string();
        let count_str = page_size.to_string();
        let url = self.build_url(
            &self.search_url,
            &[
                ("page", &page_str),
                ("count", &count_str),
                ("searchKeyword", keyword),
            ],
        );
        let context = format!("search(keyword={keyword}, page={page})");

        let Some(body) = self.request_body("search", &url).await? else {
            tracing::debug!(keyword, page, "search returned no content");
            return Ok(ResultPage::empty(keyword, page));
        };

        let envelope: SearchEnvelope =
            serde_json::from_str(&body).map_err(|e| GeoError::Decode { context, source: e })?;
        let result = normalize_page(envelope.search_poi_info, keyword, page);
        tracing::debug!(
            keyword,
            page = result.page_number,
            items = result.items.len(),
            total = ?result.total_count,
            "search page decoded"
        );
        Ok(result)
    }

    /// Resolves a coordinate into a full address.
    ///
    /// Returns [`ADDRESS_UNAVAILABLE`] when the provider answers without an
    /// address (missing `fullAddress` or `204 No Content`).
    ///
    /// # Errors
    ///
    /// - [`GeoError::InvalidRequest`] if the coordinate is out of range.
    /// - [`GeoError::Network`] on transport failure or connect timeout.
    /// - [`GeoError::Api`] if the provider returns a non-2xx status.
    /// - [`GeoError::Decode`] if the body does not contain `addressInfo`.
    pub async fn reverse_geocode_address(&self, at: Coordinate) -> Result<String, GeoError> {
        if !at.is_valid() {
            return Err(GeoError::InvalidRequest(format!(
                "coordinate {at} is out of range"
            )));
        }

        let lat = at.latitude.to_string();
        let lon = at.longitude.to_string();
        let url = self.build_url(&self.reverse_geocode_url, &[("lat", &lat), ("lon", &lon)]);

        let Some(body) = self.request_body("reverse_geocode", &url).await? else {
            tracing::warn!(%at, "reverse geocode returned no content, using placeholder");
            return Ok(ADDRESS_UNAVAILABLE.to_owned());
        };

        let envelope: ReverseGeocodeEnvelope =
            serde_json::from_str(&body).map_err(|e| GeoError::Decode {
                context: format!("reverseGeocode(lat={lat}, lon={lon})"),
                source: e,
            })?;

        match envelope
            .address_info
            .full_address
            .filter(|a| !a.trim().is_empty())
        {
            Some(address) => Ok(address),
            None => {
                tracing::warn!(%at, "reverse geocode omitted fullAddress, using placeholder");
                Ok(ADDRESS_UNAVAILABLE.to_owned())
            }
        }
    }

    /// Builds the request URL: endpoint plus `version` and the per-call
    /// parameters, percent-encoded via [`Url::query_pairs_mut`].
    fn build_url(&self, endpoint: &Url, extra: &[(&str, &str)]) -> Url {
        let mut url = endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("version", &self.api_version.to_string());
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends one GET with the credential header and returns the raw body.
    ///
    /// `Ok(None)` means `204 No Content`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Network`] on transport failure and
    /// [`GeoError::Api`] on a non-2xx status.
    async fn request_body(&self, op: &'static str, url: &Url) -> Result<Option<String>, GeoError> {
        tracing::debug!(op, url = %url, "geo request");

        let response = self
            .client
            .get(url.clone())
            .header("appKey", &self.api_key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if self.log_bodies {
            tracing::debug!(op, status = status.as_u16(), body = %body, "geo response");
        } else {
            tracing::debug!(op, status = status.as_u16(), bytes = body.len(), "geo response");
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(GeoError::Api {
                status: status.as_u16(),
                message: api_error_message(status, &body),
            });
        }
        Ok(Some(body))
    }
}

fn endpoint(base: &Url, path: &str) -> Result<Url, GeoError> {
    base.join(path)
        .map_err(|e| GeoError::InvalidRequest(format!("invalid endpoint '{path}': {e}")))
}

/// Extracts the provider's error message from a failure body, falling back
/// to the HTTP reason phrase.
fn api_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|env| match (env.error.code, env.error.message) {
            (Some(code), Some(message)) => Some(format!("{code}: {message}")),
            (None, Some(message)) => Some(message),
            (Some(code), None) => Some(code),
            (None, None) => None,
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        })
}

#[async_trait]
impl GeoApi for GeoClient {
    async fn search(
        &self,
        keyword: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ResultPage, GeoError> {
        self.search_page(keyword, page, page_size).await
    }

    async fn reverse_geocode(&self, at: Coordinate) -> Result<String, GeoError> {
        self.reverse_geocode_address(at).await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
