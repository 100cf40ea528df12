//! # Geographic Primitives Module
//!
//! Latitude/longitude points and the simple averaging used to pick a
//! meeting point for a group of users.

use crate::errors::GeoError;

/// A validated latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting non-finite or out-of-range coordinates
    ///
    /// # Examples
    ///
    /// ```rust
    /// use barfinder::geo::GeoPoint;
    ///
    /// let moscow = GeoPoint::new(55.7558, 37.6173).unwrap();
    /// assert_eq!(moscow.latitude, 55.7558);
    /// assert!(GeoPoint::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Coordinates in the `lon,lat` order used by the places provider and map links
    pub fn lon_lat(&self) -> String {
        format!("{},{}", self.longitude, self.latitude)
    }
}

/// Compute the representative point of a group
///
/// Latitudes and longitudes are averaged independently. This is not a
/// spherical centroid: it is only meaningful for points close to each other
/// and away from the antimeridian.
///
/// Returns `None` for an empty slice. The result does not depend on the
/// order of `points`.
pub fn centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }

    let count = points.len() as f64;
    let latitude = ordered_sum(points.iter().map(|p| p.latitude)) / count;
    let longitude = ordered_sum(points.iter().map(|p| p.longitude)) / count;

    // The mean of in-range values stays in range
    Some(GeoPoint {
        latitude,
        longitude,
    })
}

/// Float addition is not associative, so sum in a canonical order
fn ordered_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}
