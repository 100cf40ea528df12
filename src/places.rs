//! # Venue Finder Module
//!
//! Queries the places-search provider (2GIS catalog API) for bars and clubs
//! around a point and renders the result for the chat.
//!
//! [`VenueFinder::find`] never fails: provider errors are turned into a
//! user-facing message. Requests are bounded by a timeout, retried with
//! exponential backoff on transient failures, and guarded by a circuit
//! breaker.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::circuit_breaker::CircuitBreaker;
use crate::config::{ProviderConfig, RecoveryConfig, USER_AGENT};
use crate::errors::SearchError;
use crate::geo::GeoPoint;
use crate::geocoding::{AddressResolver, NominatimGeocoder};
use crate::localization::{t_args_lang, t_lang};
use crate::normalizer::{ResultNormalizer, VenueRecord};

pub const SEARCH_TERM: &str = "бар, клуб";
pub const SEARCH_RADIUS_METERS: u32 = 5000;
pub const SEARCH_PAGE_SIZE: u32 = 5;

/// Provider code meaning "nothing matched"
const CATALOG_NOT_FOUND: u16 = 404;

/// Parameters of one places search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchQuery {
    pub center: GeoPoint,
    pub radius_meters: u32,
    pub max_results: u32,
}

impl SearchQuery {
    pub fn around(center: GeoPoint) -> Self {
        Self {
            center,
            radius_meters: SEARCH_RADIUS_METERS,
            max_results: SEARCH_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    meta: Option<CatalogMeta>,
    #[serde(default)]
    result: Option<CatalogResult>,
}

#[derive(Debug, Deserialize)]
struct CatalogMeta {
    code: u16,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogResult {
    #[serde(default)]
    items: Vec<CatalogItem>,
}

#[derive(Debug, Deserialize)]
struct CatalogItem {
    name: Option<String>,
    address_name: Option<String>,
    geometry: Option<CatalogGeometry>,
}

#[derive(Debug, Deserialize)]
struct CatalogGeometry {
    location: Option<CatalogLocation>,
}

#[derive(Debug, Deserialize)]
struct CatalogLocation {
    lat: Option<f64>,
    lon: Option<f64>,
}

impl From<CatalogItem> for VenueRecord {
    fn from(item: CatalogItem) -> Self {
        let location = item
            .geometry
            .and_then(|geometry| geometry.location)
            .and_then(|location| match (location.lat, location.lon) {
                (Some(lat), Some(lon)) => GeoPoint::new(lat, lon).ok(),
                _ => None,
            });

        VenueRecord {
            name: item.name,
            address: item.address_name,
            location,
        }
    }
}

impl CatalogResponse {
    fn into_records(self) -> Result<Vec<VenueRecord>, SearchError> {
        if let Some(meta) = &self.meta {
            if meta.code >= 400 && meta.code != CATALOG_NOT_FOUND {
                return Err(SearchError::Status { status: meta.code });
            }
        }
        Ok(self
            .result
            .map(|result| result.items.into_iter().map(VenueRecord::from).collect())
            .unwrap_or_default())
    }
}

/// Build the HTTP client shared by the places and geocoding providers
pub fn build_http_client(recovery: &RecoveryConfig) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(recovery.request_timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}

/// Delay before retry number `attempt` (starting at 0)
fn retry_delay(recovery: &RecoveryConfig, attempt: u32) -> Duration {
    let exponential = recovery
        .base_retry_delay_ms
        .saturating_mul(1u64 << attempt.min(16));
    let capped = exponential.min(recovery.max_retry_delay_ms);
    let jitter = rand::thread_rng().gen_range(0..=capped / 4);
    Duration::from_millis(capped + jitter)
}

pub struct VenueFinder {
    client: Client,
    config: ProviderConfig,
    normalizer: ResultNormalizer,
    circuit_breaker: CircuitBreaker,
}

impl VenueFinder {
    /// Create a finder using Nominatim as the fallback geocoder
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = build_http_client(&config.recovery)?;
        let geocoder = NominatimGeocoder::new(client.clone(), config.geocoder_url.clone());
        Ok(Self::with_resolver(config, client, Arc::new(geocoder)))
    }

    pub fn with_resolver(
        config: ProviderConfig,
        client: Client,
        resolver: Arc<dyn AddressResolver>,
    ) -> Self {
        let normalizer = ResultNormalizer::new(resolver, config.map_link_base.clone());
        let circuit_breaker = CircuitBreaker::new(&config.recovery);
        Self {
            client,
            config,
            normalizer,
            circuit_breaker,
        }
    }

    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.circuit_breaker
    }

    /// Search venues around `center` and render them for the user
    pub async fn find(&self, center: GeoPoint, language_code: Option<&str>) -> String {
        match self.search(&SearchQuery::around(center)).await {
            Ok(records) => self.normalizer.normalize(&records, language_code).await,
            Err(SearchError::CircuitOpen) => t_lang("search-unavailable", language_code),
            Err(e) => {
                let description = e.to_string();
                t_args_lang("search-error", &[("error", description.as_str())], language_code)
            }
        }
    }

    /// Raw provider search with retries and circuit breaking
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<VenueRecord>, SearchError> {
        if self.circuit_breaker.is_open() {
            warn!("Places search skipped, circuit breaker is open");
            return Err(SearchError::CircuitOpen);
        }

        info!(
            latitude = query.center.latitude,
            longitude = query.center.longitude,
            radius = query.radius_meters,
            "Searching venues"
        );

        let recovery = &self.config.recovery;
        let mut attempt = 0;
        let outcome = loop {
            match self.fetch_once(query).await {
                Ok(records) => break Ok(records),
                Err(e) if e.is_retryable() && attempt < recovery.max_retries => {
                    let delay = retry_delay(recovery, attempt);
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Places search failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => break Err(e),
            }
        };

        match &outcome {
            Ok(records) => {
                self.circuit_breaker.record_success();
                info!(venues_found = records.len(), "Places search completed");
            }
            Err(e) => {
                self.circuit_breaker.record_failure();
                error!(error = %e, attempts = attempt + 1, "Places search failed");
            }
        }
        outcome
    }

    async fn fetch_once(&self, query: &SearchQuery) -> Result<Vec<VenueRecord>, SearchError> {
        let radius = query.radius_meters.to_string();
        let page_size = query.max_results.to_string();
        let point = query.center.lon_lat();

        let response = self
            .client
            .get(&self.config.places_api_url)
            .query(&[
                ("q", SEARCH_TERM),
                ("point", point.as_str()),
                ("radius", radius.as_str()),
                ("key", self.config.places_api_key.as_str()),
                ("page_size", page_size.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: CatalogResponse = response.json().await?;
        debug!(meta_code = ?body.meta.as_ref().map(|m| m.code), "Places response decoded");
        body.into_records()
    }
}
