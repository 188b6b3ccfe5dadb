//! Geographic coordinates

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const MAX_LAT: f64 = 90.0;
pub const MAX_LNG: f64 = 180.0;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("latitude {0} is outside -90..=90")]
    Latitude(f64),
    #[error("longitude {0} is outside -180..=180")]
    Longitude(f64),
}

/// A point on the globe in decimal degrees.
///
/// Fields are private so every value has passed through [`Coordinate::new`]
/// or [`Coordinate::clamped`]; deserialized values are range-checked too.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

/// Unchecked wire form of [`Coordinate`].
#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lng)
    }
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        // NaN fails both range checks
        if !(-MAX_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        if !(-MAX_LNG..=MAX_LNG).contains(&lng) {
            return Err(CoordinateError::Longitude(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Build a coordinate, pulling out-of-range components back onto the globe.
    pub fn clamped(lat: f64, lng: f64) -> Self {
        let lat = if lat.is_nan() { 0.0 } else { lat };
        let lng = if lng.is_nan() { 0.0 } else { lng };
        Self {
            lat: lat.clamp(-MAX_LAT, MAX_LAT),
            lng: lng.clamp(-MAX_LNG, MAX_LNG),
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Shift by a delta in degrees, clamped to the valid range.
    pub fn offset(&self, d_lat: f64, d_lng: f64) -> Self {
        Self::clamped(self.lat + d_lat, self.lng + d_lng)
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self { lat: 0.0, lng: 0.0 }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds_inclusive() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(CoordinateError::Latitude(90.5))
        );
        assert_eq!(
            Coordinate::new(0.0, -181.0),
            Err(CoordinateError::Longitude(-181.0))
        );
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn clamped_stays_on_globe() {
        let c = Coordinate::clamped(120.0, -400.0);
        assert_eq!(c.lat(), 90.0);
        assert_eq!(c.lng(), -180.0);

        let c = Coordinate::clamped(f64::NAN, 10.0);
        assert_eq!(c.lat(), 0.0);
    }

    #[test]
    fn deserialize_checks_range() {
        let ok: Coordinate = serde_json::from_str(r#"{"lat":-33.9,"lng":18.4}"#).unwrap();
        assert_eq!(ok, Coordinate::new(-33.9, 18.4).unwrap());

        assert!(serde_json::from_str::<Coordinate>(r#"{"lat":500.0,"lng":0.0}"#).is_err());
        assert!(serde_json::from_str::<Coordinate>(r#"{"lat":0.0,"lng":-999.0}"#).is_err());
    }

    #[test]
    fn offset_clamps() {
        let c = Coordinate::clamped(89.0, 179.0).offset(5.0, 5.0);
        assert_eq!((c.lat(), c.lng()), (90.0, 180.0));
    }
}
