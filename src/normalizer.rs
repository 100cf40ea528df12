//! # Result Normalizer Module
//!
//! Turns raw venue records from the places provider into display text.
//! Records without coordinates are resolved through the fallback geocoder;
//! records that still have none are kept, with the map link marked
//! unavailable.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::geo::GeoPoint;
use crate::geocoding::AddressResolver;
use crate::localization::{t_args_lang, t_lang};

/// Zoom level of generated map links
pub const MAP_ZOOM: u8 = 16;
/// Layer selector of generated map links
pub const MAP_LAYER: &str = "map";

/// A venue as returned by the places provider
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VenueRecord {
    pub name: Option<String>,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapLink {
    Url(String),
    Unavailable,
}

impl MapLink {
    pub fn url(&self) -> Option<&str> {
        match self {
            MapLink::Url(url) => Some(url),
            MapLink::Unavailable => None,
        }
    }
}

/// A venue ready to be shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct VenueResult {
    pub name: String,
    pub address: String,
    pub map_link: MapLink,
}

/// Where a venue's coordinates came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoordinateSource {
    Provider,
    Geocoder,
    Unresolved,
}

impl fmt::Display for CoordinateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match self {
            CoordinateSource::Provider => "provider",
            CoordinateSource::Geocoder => "geocoder",
            CoordinateSource::Unresolved => "unresolved",
        };
        f.write_str(source)
    }
}

/// Build a map link pointing at `point` and labelled with `name`
///
/// # Examples
///
/// ```rust
/// use barfinder::geo::GeoPoint;
/// use barfinder::normalizer::map_link;
///
/// let point = GeoPoint::new(55.7558, 37.6173).unwrap();
/// assert_eq!(
///     map_link("https://yandex.ru/maps/", "Bar & Grill", point),
///     "https://yandex.ru/maps/?text=Bar%20%26%20Grill&pt=37.6173,55.7558&z=16&l=map"
/// );
/// ```
pub fn map_link(base: &str, name: &str, point: GeoPoint) -> String {
    format!(
        "{base}?text={}&pt={}&z={MAP_ZOOM}&l={MAP_LAYER}",
        urlencoding::encode(name),
        point.lon_lat()
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub struct ResultNormalizer {
    resolver: Arc<dyn AddressResolver>,
    map_link_base: String,
}

impl ResultNormalizer {
    pub fn new(resolver: Arc<dyn AddressResolver>, map_link_base: impl Into<String>) -> Self {
        Self {
            resolver,
            map_link_base: map_link_base.into(),
        }
    }

    /// Resolve every record, preserving provider order
    pub async fn resolve(
        &self,
        records: &[VenueRecord],
        language_code: Option<&str>,
    ) -> Vec<VenueResult> {
        let mut results = Vec::with_capacity(records.len());
        for record in records {
            results.push(self.resolve_one(record, language_code).await);
        }
        results
    }

    async fn resolve_one(&self, record: &VenueRecord, language_code: Option<&str>) -> VenueResult {
        let name = non_blank(record.name.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| t_lang("venue-unnamed", language_code));
        let address = non_blank(record.address.as_deref());

        let (point, source) = match (record.location, address) {
            (Some(point), _) => (Some(point), CoordinateSource::Provider),
            (None, Some(address)) => match self.resolver.resolve(address).await {
                Some(point) => (Some(point), CoordinateSource::Geocoder),
                None => (None, CoordinateSource::Unresolved),
            },
            (None, None) => (None, CoordinateSource::Unresolved),
        };
        debug!(venue = %name, source = %source, "Venue coordinates");

        let map_link = match point {
            Some(point) => MapLink::Url(map_link(&self.map_link_base, &name, point)),
            None => MapLink::Unavailable,
        };

        VenueResult {
            name,
            address: address
                .map(str::to_string)
                .unwrap_or_else(|| t_lang("venue-no-address", language_code)),
            map_link,
        }
    }

    /// Resolve and render records as one message
    pub async fn normalize(&self, records: &[VenueRecord], language_code: Option<&str>) -> String {
        let results = self.resolve(records, language_code).await;
        render_results(&results, language_code)
    }
}

/// Render venues separated by blank lines, or the "nothing found" message
pub fn render_results(results: &[VenueResult], language_code: Option<&str>) -> String {
    if results.is_empty() {
        return t_lang("venues-not-found", language_code);
    }

    let unavailable = t_lang("venue-link-unavailable", language_code);
    results
        .iter()
        .map(|venue| {
            let link = venue.map_link.url().unwrap_or(unavailable.as_str());
            t_args_lang(
                "venue-entry",
                &[
                    ("name", venue.name.as_str()),
                    ("address", venue.address.as_str()),
                    ("link", link),
                ],
                language_code,
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
