use super::*;

fn test_client(base_url: &str) -> GeoClient {
    GeoClient::with_base_url("test-key", 5, base_url).expect("client construction should not fail")
}

#[test]
fn build_url_constructs_search_query_string() {
    let client = test_client("https://apis.openapi.sk.com");
    let url = client.build_url(
        &client.search_url,
        &[("page", "1"), ("count", "30"), ("searchKeyword", "station")],
    );
    assert_eq!(
        url.as_str(),
        "https://apis.openapi.sk.com/tmap/pois?version=1&page=1&count=30&searchKeyword=station"
    );
}

#[test]
fn build_url_strips_trailing_slash_and_keeps_base_path() {
    let client = test_client("http://localhost:8080/proxy/");
    let url = client.build_url(&client.reverse_geocode_url, &[("lat", "37.5"), ("lon", "127")]);
    assert_eq!(
        url.as_str(),
        "http://localhost:8080/proxy/tmap/geo/reversegeocoding?version=1&lat=37.5&lon=127"
    );
}

#[test]
fn build_url_encodes_special_characters() {
    let client = test_client("https://apis.openapi.sk.com");
    let url = client.build_url(&client.search_url, &[("searchKeyword", "seoul station & co")]);
    assert!(
        url.as_str().contains("seoul+station+%26+co")
            || url.as_str().contains("seoul%20station%20%26%20co"),
        "query param should be percent-encoded: {url}"
    );
}

#[test]
fn build_url_uses_configured_api_version() {
    let client = test_client("https://apis.openapi.sk.com").with_api_version(2);
    let url = client.build_url(&client.search_url, &[]);
    assert_eq!(url.query(), Some("version=2"));
}

#[test]
fn with_base_url_rejects_garbage() {
    let err = GeoClient::with_base_url("k", 5, "not a url").unwrap_err();
    assert!(matches!(err, GeoError::InvalidRequest(_)));
}

#[test]
fn debug_output_redacts_api_key() {
    let client = test_client("https://apis.openapi.sk.com");
    let rendered = format!("{client:?}");
    assert!(rendered.contains("[redacted]"));
    assert!(!rendered.contains("test-key"));
}

#[test]
fn api_error_message_prefers_provider_body() {
    let body = r#"{"error":{"id":"400","category":"tmap","code":"INVALID_PARAMETER","message":"searchKeyword is required"}}"#;
    assert_eq!(
        api_error_message(StatusCode::BAD_REQUEST, body),
        "INVALID_PARAMETER: searchKeyword is required"
    );
}

#[test]
fn api_error_message_falls_back_to_reason_phrase() {
    assert_eq!(
        api_error_message(StatusCode::SERVICE_UNAVAILABLE, "<html>down</html>"),
        "Service Unavailable"
    );
}

#[tokio::test]
async fn search_rejects_blank_keyword_without_a_request() {
    let client = test_client("http://127.0.0.1:9");
    let err = client.search_page("   ", 1, 30).await.unwrap_err();
    assert!(matches!(err, GeoError::InvalidRequest(_)));
    assert_eq!(err.kind(), poimap_core::ErrorKind::InvalidRequest);
}

#[tokio::test]
async fn search_rejects_page_zero() {
    let client = test_client("http://127.0.0.1:9");
    let err = client.search_page("station", 0, 30).await.unwrap_err();
    assert!(matches!(err, GeoError::InvalidRequest(_)));
}

#[tokio::test]
async fn reverse_geocode_rejects_out_of_range_coordinate() {
    let client = test_client("http://127.0.0.1:9");
    let err = client
        .reverse_geocode_address(Coordinate::new(95.0, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, GeoError::InvalidRequest(_)));
}
