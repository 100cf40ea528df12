//! # Venue Finder Tests
//!
//! Exercises the places search and geocoding fallback against mock
//! providers, including the degraded paths.

use barfinder::config::{ProviderConfig, RecoveryConfig};
use barfinder::geo::GeoPoint;
use barfinder::places::{SearchQuery, VenueFinder};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PLACES_PATH: &str = "/3.0/items";
const GEOCODER_PATH: &str = "/search";

fn provider_config(
    server: &MockServer,
    max_retries: u32,
    breaker_threshold: u32,
) -> ProviderConfig {
    ProviderConfig {
        places_api_url: format!("{}{PLACES_PATH}", server.uri()),
        places_api_key: "test-key".to_string(),
        geocoder_url: format!("{}{GEOCODER_PATH}", server.uri()),
        map_link_base: "https://yandex.ru/maps/".to_string(),
        recovery: RecoveryConfig {
            max_retries,
            base_retry_delay_ms: 1,
            max_retry_delay_ms: 5,
            request_timeout_secs: 5,
            circuit_breaker_threshold: breaker_threshold,
            circuit_breaker_reset_secs: 60,
        },
    }
}

fn moscow() -> GeoPoint {
    GeoPoint::new(55.7558, 37.6173).unwrap()
}

#[tokio::test]
async fn test_query_parameters_use_lon_lat_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PLACES_PATH))
        .and(query_param("q", "бар, клуб"))
        .and(query_param("point", "37.6173,55.7558"))
        .and(query_param("radius", "5000"))
        .and(query_param("key", "test-key"))
        .and(query_param("page_size", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "items": [{
                    "name": "Pub",
                    "address_name": "Tverskaya 1",
                    "geometry": {"location": {"lat": 55.76, "lon": 37.61}}
                }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    // Venues with coordinates must not hit the geocoder
    Mock::given(path(GEOCODER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let finder = VenueFinder::new(provider_config(&server, 0, 0)).unwrap();
    let text = finder.find(moscow(), Some("en")).await;

    assert_eq!(
        text,
        "Pub\nAddress: Tverskaya 1\nLink: https://yandex.ru/maps/?text=Pub&pt=37.61,55.76&z=16&l=map"
    );
}

#[tokio::test]
async fn test_missing_coordinates_fall_back_to_geocoder() {
    let server = MockServer::start().await;
    Mock::given(path(PLACES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"items": [{"name": "Hidden Bar", "address_name": "Nevsky 10"}]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(GEOCODER_PATH))
        .and(query_param("q", "Nevsky 10"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"lat": "59.9343", "lon": "30.3351"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let finder = VenueFinder::new(provider_config(&server, 0, 0)).unwrap();
    let text = finder.find(moscow(), Some("en")).await;

    assert!(text.contains("Hidden Bar\nAddress: Nevsky 10\n"));
    assert!(text.contains("text=Hidden%20Bar&pt=30.3351,59.9343&z=16&l=map"));
}

#[tokio::test]
async fn test_failed_geocoding_keeps_entry_without_link() {
    let server = MockServer::start().await;
    Mock::given(path(PLACES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"items": [
                {"name": "Lost", "address_name": "Unknown street"},
                {"name": "Found", "address_name": "Main 1",
                 "geometry": {"location": {"lat": 10.5, "lon": 20.25}}}
            ]}
        })))
        .mount(&server)
        .await;
    Mock::given(path(GEOCODER_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let finder = VenueFinder::new(provider_config(&server, 0, 0)).unwrap();
    let text = finder.find(moscow(), Some("ru")).await;

    assert_eq!(
        text,
        "Lost\nАдрес: Unknown street\nСсылка: Ссылка не доступна\n\n\
         Found\nАдрес: Main 1\nСсылка: https://yandex.ru/maps/?text=Found&pt=20.25,10.5&z=16&l=map"
    );
}

#[tokio::test]
async fn test_empty_geocoder_answer_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(path(PLACES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"items": [{"address_name": "Somewhere"}]}
        })))
        .mount(&server)
        .await;
    Mock::given(path(GEOCODER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let finder = VenueFinder::new(provider_config(&server, 0, 0)).unwrap();
    let text = finder.find(moscow(), Some("en")).await;

    assert_eq!(text, "Unnamed\nAddress: Somewhere\nLink: Link unavailable");
}

#[tokio::test]
async fn test_unparsable_geocoder_coordinates_are_unavailable() {
    let server = MockServer::start().await;
    Mock::given(path(PLACES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"items": [
                {"name": "Garbled", "address_name": "Nowhere 1"},
                {"name": "Offworld", "address_name": "Nowhere 2"}
            ]}
        })))
        .mount(&server)
        .await;
    Mock::given(path(GEOCODER_PATH))
        .and(query_param("q", "Nowhere 1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"lat": "abc", "lon": "1"}])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path(GEOCODER_PATH))
        .and(query_param("q", "Nowhere 2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"lat": "95.0", "lon": "1"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let finder = VenueFinder::new(provider_config(&server, 0, 0)).unwrap();
    let text = finder.find(moscow(), Some("en")).await;

    assert_eq!(
        text,
        "Garbled\nAddress: Nowhere 1\nLink: Link unavailable\n\n\
         Offworld\nAddress: Nowhere 2\nLink: Link unavailable"
    );
}

#[tokio::test]
async fn test_no_items_renders_not_found() {
    let server = MockServer::start().await;
    Mock::given(path(PLACES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"code": 404, "error": {"type": "itemNotFound"}}
        })))
        .mount(&server)
        .await;

    let finder = VenueFinder::new(provider_config(&server, 0, 0)).unwrap();

    assert_eq!(
        finder.find(moscow(), Some("ru")).await,
        "Бары и клубы не найдены рядом с вами."
    );
}

#[tokio::test]
async fn test_transport_error_becomes_message() {
    let server = MockServer::start().await;
    let mut config = provider_config(&server, 0, 0);
    // Nothing listens on port 1
    config.places_api_url = "http://127.0.0.1:1/3.0/items".to_string();

    let finder = VenueFinder::new(config).unwrap();
    let text = finder.find(moscow(), Some("ru")).await;

    assert!(text.starts_with("Ошибка при поиске: network error"), "{text}");
    assert!(text.ends_with(". Попробуйте позже."));
}

#[tokio::test]
async fn test_error_message_does_not_expose_api_key() {
    let server = MockServer::start().await;
    let mut config = provider_config(&server, 0, 0);
    config.places_api_key = "PLACES-KEY-4f9c2a".to_string();
    config.places_api_url = "http://127.0.0.1:1/3.0/items".to_string();

    let finder = VenueFinder::new(config).unwrap();
    let text = finder.find(moscow(), Some("en")).await;

    assert!(text.starts_with("Search failed: network error"), "{text}");
    assert!(!text.contains("PLACES-KEY-4f9c2a"), "{text}");
    assert!(!text.contains("127.0.0.1"), "{text}");
}

#[tokio::test]
async fn test_server_errors_are_retried_up_to_the_bound() {
    let server = MockServer::start().await;
    Mock::given(path(PLACES_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let finder = VenueFinder::new(provider_config(&server, 2, 0)).unwrap();
    let text = finder.find(moscow(), Some("en")).await;

    assert_eq!(
        text,
        "Search failed: provider returned HTTP 503. Please try again later."
    );
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(path(PLACES_PATH))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let finder = VenueFinder::new(provider_config(&server, 3, 0)).unwrap();
    let err = finder
        .search(&SearchQuery::around(moscow()))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "provider returned HTTP 403");
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(path(PLACES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let finder = VenueFinder::new(provider_config(&server, 0, 0)).unwrap();
    let text = finder.find(moscow(), Some("en")).await;

    assert!(text.starts_with("Search failed: "), "{text}");
}

#[tokio::test]
async fn test_circuit_breaker_stops_calling_provider() {
    let server = MockServer::start().await;
    Mock::given(path(PLACES_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let finder = VenueFinder::new(provider_config(&server, 0, 1)).unwrap();

    let first = finder.find(moscow(), Some("ru")).await;
    assert!(first.starts_with("Ошибка при поиске"));
    assert!(finder.circuit_breaker().is_open());

    let second = finder.find(moscow(), Some("ru")).await;
    assert_eq!(second, "Поиск временно недоступен. Попробуйте позже.");
}
