//! Geodetic positions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point on (or above) the WGS-84 ellipsoid.
///
/// Latitude and longitude are in degrees, altitude in metres. Serialized as
/// `lat`/`lon`/`alt`; the long names are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint {
    #[cfg_attr(feature = "serde", serde(rename = "lat", alias = "latitude"))]
    pub latitude: f64,
    #[cfg_attr(feature = "serde", serde(rename = "lon", alias = "longitude"))]
    pub longitude: f64,
    #[cfg_attr(feature = "serde", serde(default, rename = "alt", alias = "altitude"))]
    pub altitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Same horizontal position, shifted along the local vertical.
    pub fn raised(self, dz: f64) -> Self {
        Self {
            altitude: self.altitude + dz,
            ..self
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.altitude.is_finite()
    }
}
