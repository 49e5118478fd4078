//! Great-circle distances between WGS84 coordinates.
//!
//! Coordinates follow the `geo` convention used across the engine:
//! `x = longitude` and `y = latitude`, both in degrees.

use geo::Coord;

/// A `(longitude, latitude)` pair in degrees.
pub type Coordinate = Coord<f64>;

/// Mean Earth radius used by [`haversine_distance`], in metres.
pub const EARTH_RADIUS_METRES: f64 = 6_371_000.0;

/// Haversine distance between two coordinates, in metres.
///
/// The function is pure and symmetric. Out-of-range or non-finite input
/// propagates as `NaN`; callers are expected to validate coordinates first
/// (see [`crate::Poi::validate`]).
///
/// # Examples
/// ```
/// use geo::Coord;
/// use gatewalk_core::haversine_distance;
///
/// let a = Coord { x: 0.0, y: 0.0 };
/// let b = Coord { x: 0.0, y: 1.0 };
/// let metres = haversine_distance(a, b);
/// assert!((metres - 111_194.9).abs() < 1.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the haversine formula is floating-point trigonometry"
)]
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.y.to_radians();
    let lat_b = b.y.to_radians();
    let delta_lat = (b.y - a.y).to_radians();
    let delta_lng = (b.x - a.x).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lng / 2.0).sin().powi(2);
    let central_angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METRES * central_angle
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn same_point_is_zero() {
        let here = Coord {
            x: 116.397_428,
            y: 39.909_23,
        };
        assert!(haversine_distance(here, here).abs() < f64::EPSILON);
    }

    #[rstest]
    fn one_degree_of_latitude() {
        let metres = haversine_distance(Coord { x: 10.0, y: 0.0 }, Coord { x: 10.0, y: 1.0 });
        assert!((metres - 111_194.93).abs() < 0.5, "got {metres}");
    }

    #[rstest]
    #[case(Coord { x: 116.397_428, y: 39.909_23 }, Coord { x: 116.407_428, y: 39.919_23 })]
    #[case(Coord { x: -0.1278, y: 51.5074 }, Coord { x: 2.3522, y: 48.8566 })]
    #[case(Coord { x: 179.9, y: -45.0 }, Coord { x: -179.9, y: -45.2 })]
    fn distance_is_symmetric(#[case] a: Coordinate, #[case] b: Coordinate) {
        assert_eq!(haversine_distance(a, b), haversine_distance(b, a));
    }

    #[rstest]
    fn nan_input_propagates() {
        let metres = haversine_distance(Coord { x: f64::NAN, y: 0.0 }, Coord { x: 0.0, y: 0.0 });
        assert!(metres.is_nan());
    }
}
