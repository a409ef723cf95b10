use itertools::Itertools;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const METERS_PER_KM: f64 = 1000.0;

pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Checks that a coordinate pair lies within the valid degree ranges.
/// NaN and infinite values are never valid.
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-MAX_LATITUDE..=MAX_LATITUDE).contains(&latitude)
        && (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&longitude)
}

/// Great-circle distance in kilometers between two coordinates given in degrees.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = latitude_1.to_radians();
    let lat2_rad = latitude_2.to_radians();

    let dlat = (latitude_2 - latitude_1).to_radians();
    let dlon = (longitude_2 - longitude_1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    // rounding can push `a` marginally above 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Same as `haversine_distance`, in meters.
pub fn haversine_distance_m(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    haversine_distance(latitude_1, longitude_1, latitude_2, longitude_2)
        * METERS_PER_KM
}

/// Sum of the pairwise distances along a path of `(latitude, longitude)`
/// pairs, in kilometers. Paths with fewer than two points have length zero.
pub fn path_length<I>(points: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    points
        .into_iter()
        .tuple_windows()
        .map(|((lat1, lon1), (lat2, lon2))| haversine_distance(lat1, lon1, lat2, lon2))
        .sum()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn coordinate() -> impl Strategy<Value = (f64, f64)> {
        (-90.0f64..=90.0, -180.0f64..=180.0)
    }

    #[rstest]
    #[case(0.0, 0.0, true)]
    #[case(90.0, 180.0, true)]
    #[case(-90.0, -180.0, true)]
    #[case(90.1, 0.0, false)]
    #[case(0.0, -180.5, false)]
    #[case(f64::NAN, 0.0, false)]
    #[case(0.0, f64::INFINITY, false)]
    fn test_is_valid_coordinate(
        #[case] latitude: f64,
        #[case] longitude: f64,
        #[case] valid: bool,
    ) {
        assert_eq!(valid, is_valid_coordinate(latitude, longitude));
    }

    #[test]
    fn test_one_hundredth_degree_at_equator() {
        let d = haversine_distance(0.0, 0.0, 0.0, 0.01);
        assert!((d - 1.1119).abs() < 1e-3, "got {d}");
    }

    #[test]
    fn test_meters_match_kilometers() {
        let km = haversine_distance(19.4326, -99.1332, 19.4270, -99.1677);
        let m = haversine_distance_m(19.4326, -99.1332, 19.4270, -99.1677);
        assert!((km * 1000.0 - m).abs() < 1e-9);
    }

    #[test]
    fn test_antipodes_are_half_circumference() {
        let d = haversine_distance(0.0, 0.0, 0.0, 180.0);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[rstest]
    #[case(vec![], 0.0)]
    #[case(vec![(0.0, 0.0)], 0.0)]
    #[case(vec![(0.0, 0.0), (0.0, 0.01), (0.0, 0.02)], 2.0 * 1.111_949)]
    fn test_path_length(#[case] points: Vec<(f64, f64)>, #[case] expected: f64) {
        assert!((path_length(points) - expected).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn haversine_is_symmetric((lat1, lon1) in coordinate(), (lat2, lon2) in coordinate()) {
            let ab = haversine_distance(lat1, lon1, lat2, lon2);
            let ba = haversine_distance(lat2, lon2, lat1, lon1);
            prop_assert!((ab - ba).abs() <= 1e-9 * ab.max(1.0));
        }

        #[test]
        fn haversine_of_same_point_is_zero((lat, lon) in coordinate()) {
            prop_assert_eq!(haversine_distance(lat, lon, lat, lon), 0.0);
        }

        #[test]
        fn haversine_obeys_triangle_inequality(
            (lat1, lon1) in coordinate(),
            (lat2, lon2) in coordinate(),
            (lat3, lon3) in coordinate(),
        ) {
            let ac = haversine_distance(lat1, lon1, lat3, lon3);
            let ab = haversine_distance(lat1, lon1, lat2, lon2);
            let bc = haversine_distance(lat2, lon2, lat3, lon3);
            prop_assert!(ac <= ab + bc + 1e-6);
        }
    }
}
