//! Geographic coordinates and search radii
//!
//! Two radii exist for two different purposes and are kept as distinct types
//! so one cannot be passed where the other is expected:
//! - [`DuplicateCheckRadius`]: registration-time search for poles already on record
//! - [`FieldVerificationRadius`]: post-hoc check that a contributor stood near a pole

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Mean Earth radius (IUGG), meters
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Default registration-time duplicate search radius, meters
pub const DEFAULT_DUPLICATE_CHECK_RADIUS_M: f64 = 30.0;

/// Default field verification radius, meters
pub const DEFAULT_FIELD_VERIFICATION_RADIUS_M: f64 = 100.0;

/// WGS84 position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self { latitude, longitude })
    }

    /// Great-circle (haversine) distance in meters
    pub fn distance_meters(&self, other: &GeoCoordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
    }
}

fn validate_radius(meters: f64, name: &str) -> Result<f64> {
    if meters.is_finite() && meters > 0.0 {
        Ok(meters)
    } else {
        Err(Error::Config(format!(
            "{} must be a positive number of meters, got {}",
            name, meters
        )))
    }
}

/// Radius used to look for existing poles when a new one is registered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DuplicateCheckRadius(f64);

impl DuplicateCheckRadius {
    pub fn new(meters: f64) -> Result<Self> {
        validate_radius(meters, "duplicate_check_radius_m").map(Self)
    }

    pub fn meters(self) -> f64 {
        self.0
    }
}

impl Default for DuplicateCheckRadius {
    fn default() -> Self {
        Self(DEFAULT_DUPLICATE_CHECK_RADIUS_M)
    }
}

impl TryFrom<f64> for DuplicateCheckRadius {
    type Error = Error;

    fn try_from(meters: f64) -> Result<Self> {
        Self::new(meters)
    }
}

impl From<DuplicateCheckRadius> for f64 {
    fn from(radius: DuplicateCheckRadius) -> f64 {
        radius.0
    }
}

/// Radius within which a contributor counts as physically at a pole
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FieldVerificationRadius(f64);

impl FieldVerificationRadius {
    pub fn new(meters: f64) -> Result<Self> {
        validate_radius(meters, "field_verification_radius_m").map(Self)
    }

    pub fn meters(self) -> f64 {
        self.0
    }

    /// Whether `observer` is close enough to `pole` to verify it on site
    pub fn contains(self, pole: &GeoCoordinate, observer: &GeoCoordinate) -> bool {
        pole.distance_meters(observer) <= self.0
    }
}

impl Default for FieldVerificationRadius {
    fn default() -> Self {
        Self(DEFAULT_FIELD_VERIFICATION_RADIUS_M)
    }
}

impl TryFrom<f64> for FieldVerificationRadius {
    type Error = Error;

    fn try_from(meters: f64) -> Result<Self> {
        Self::new(meters)
    }
}

impl From<FieldVerificationRadius> for f64 {
    fn from(radius: FieldVerificationRadius) -> f64 {
        radius.0
    }
}
