//! # Fallback Geocoding Module
//!
//! Resolves a free-text address to coordinates when the places provider
//! omits them. Failures are logged and reported as "no match" so a single
//! unresolved venue never aborts a search.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::SearchError;
use crate::geo::GeoPoint;

#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Best single match for `address`, `None` when nothing usable was found
    async fn resolve(&self, address: &str) -> Option<GeoPoint>;
}

/// One element of the Nominatim search response; coordinates are strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// [`AddressResolver`] backed by the OpenStreetMap Nominatim search API
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    url: String,
}

impl NominatimGeocoder {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    async fn lookup(&self, address: &str) -> Result<Option<GeoPoint>, SearchError> {
        let places: Vec<NominatimPlace> = self
            .client
            .get(&self.url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let latitude: f64 = place
            .lat
            .trim()
            .parse()
            .map_err(|_| SearchError::Decode(format!("invalid latitude {:?}", place.lat)))?;
        let longitude: f64 = place
            .lon
            .trim()
            .parse()
            .map_err(|_| SearchError::Decode(format!("invalid longitude {:?}", place.lon)))?;

        GeoPoint::new(latitude, longitude)
            .map(Some)
            .map_err(|e| SearchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AddressResolver for NominatimGeocoder {
    async fn resolve(&self, address: &str) -> Option<GeoPoint> {
        match self.lookup(address).await {
            Ok(Some(point)) => {
                debug!(address = %address, ?point, "Resolved address location");
                Some(point)
            }
            Ok(None) => {
                debug!(address = %address, "No geocoding match for address");
                None
            }
            Err(e) => {
                warn!(address = %address, error = %e, "Failed to resolve address location");
                None
            }
        }
    }
}
