use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo;

use crate::ValidationError;

/// Decimal places routes are stored with, about 0.1 m at the equator.
const STORED_PRECISION: f64 = 1e6;

/// A position on earth in degrees.
///
/// Fields are public so positions coming from a location provider can be
/// built directly; anything entering a route or a tracking session goes
/// through `validate` first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng")]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        let point = Self {
            latitude,
            longitude,
        };
        point.validate()?;
        Ok(point)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if geo::is_valid_coordinate(self.latitude, self.longitude) {
            Ok(())
        } else {
            Err(ValidationError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        geo::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        geo::haversine_distance_m(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    pub fn rounded(&self) -> Self {
        Self {
            latitude: (self.latitude * STORED_PRECISION).round() / STORED_PRECISION,
            longitude: (self.longitude * STORED_PRECISION).round() / STORED_PRECISION,
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(19.4326, -99.1332)]
    #[case(-90.0, 180.0)]
    fn test_accepts_valid(#[case] latitude: f64, #[case] longitude: f64) {
        assert!(GeoPoint::new(latitude, longitude).is_ok());
    }

    #[rstest]
    #[case(91.0, 0.0)]
    #[case(0.0, 181.0)]
    #[case(f64::NAN, 0.0)]
    fn test_rejects_out_of_range(#[case] latitude: f64, #[case] longitude: f64) {
        assert!(matches!(
            GeoPoint::new(latitude, longitude),
            Err(ValidationError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_reads_stored_route_format() {
        let point: GeoPoint =
            serde_json::from_str(r#"{"lat": 19.4326, "lng": -99.1332}"#).unwrap();
        assert_eq!(GeoPoint::new(19.4326, -99.1332).unwrap(), point);
    }

    #[test]
    fn test_rounded_to_six_decimals() {
        let point = GeoPoint {
            latitude: 19.432_612_345,
            longitude: -99.133_298_765,
        };
        let rounded = point.rounded();
        assert_eq!(19.432_612, rounded.latitude);
        assert_eq!(-99.133_299, rounded.longitude);
    }
}
