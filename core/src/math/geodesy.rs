use serde::{Deserialize, Serialize};
use std::fmt;

use crate::math::bearing::normalize_bearing;

/// WGS84 equatorial radius, in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.latitude, self.longitude)
    }
}

/// Spherical-earth geodesy on a sphere of fixed radius.
///
/// Pins sit a few tens of meters from their camera, so the sphere is far
/// more accurate than the placement itself needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodesy {
    earth_radius_m: f64,
}

impl Geodesy {
    pub fn new(earth_radius_m: f64) -> Self {
        Self { earth_radius_m }
    }

    /// Point reached by travelling `distance_m` from `origin` along the
    /// great circle leaving it at `bearing_deg` (clockwise from north).
    pub fn destination(&self, origin: GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
        let lat1 = origin.latitude.to_radians();
        let lon1 = origin.longitude.to_radians();
        let theta = bearing_deg.to_radians();
        let delta = distance_m / self.earth_radius_m;

        let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
        let lon2 = lon1
            + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

        let mut longitude = lon2.to_degrees();
        if !(-180.0..=180.0).contains(&longitude) {
            longitude = (longitude + 180.0).rem_euclid(360.0) - 180.0;
        }
        GeoPoint::new(lat2.to_degrees(), longitude)
    }

    /// Great-circle distance in meters.
    pub fn haversine_distance(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        let lat1 = a.latitude.to_radians();
        let lat2 = b.latitude.to_radians();
        let d_lat = (b.latitude - a.latitude).to_radians();
        let d_lon = (b.longitude - a.longitude).to_radians();

        let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * self.earth_radius_m * h.sqrt().atan2((1.0 - h).sqrt())
    }

    /// Initial bearing of the great circle from `from` to `to`, in `[0, 360)`.
    pub fn initial_bearing(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        let lat1 = from.latitude.to_radians();
        let lat2 = to.latitude.to_radians();
        let d_lon = (to.longitude - from.longitude).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
        normalize_bearing(y.atan2(x).to_degrees())
    }
}

impl Default for Geodesy {
    fn default() -> Self {
        Self::new(EARTH_RADIUS_M)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANILA: GeoPoint = GeoPoint {
        latitude: 14.5995,
        longitude: 120.9842,
    };

    #[test]
    fn destination_due_east_moves_longitude_only() {
        let geo = Geodesy::default();
        let result = geo.destination(MANILA, 90.0, 5.0);

        let expected_dlon = (5.0 / (EARTH_RADIUS_M * MANILA.latitude.to_radians().cos())).to_degrees();
        assert!((result.latitude - MANILA.latitude).abs() < 1e-9);
        assert!((result.longitude - MANILA.longitude - expected_dlon).abs() < 1e-9);
    }

    #[test]
    fn destination_across_antimeridian_wraps_longitude() {
        let geo = Geodesy::default();
        let fiji = GeoPoint::new(-16.5, 179.99995);
        let east = geo.destination(fiji, 90.0, 25.0);
        assert!(east.longitude < -179.9 && east.longitude >= -180.0);
        assert!((geo.haversine_distance(fiji, east) - 25.0).abs() < 1e-6);

        let west = geo.destination(GeoPoint::new(-16.5, -179.99995), 270.0, 25.0);
        assert!(west.longitude > 179.9 && west.longitude <= 180.0);
    }

    #[test]
    fn destination_zero_distance_is_origin() {
        let geo = Geodesy::default();
        let result = geo.destination(MANILA, 123.0, 0.0);
        assert!((result.latitude - MANILA.latitude).abs() < 1e-12);
        assert!((result.longitude - MANILA.longitude).abs() < 1e-12);
    }

    #[test]
    fn primitives_are_deterministic() {
        let geo = Geodesy::default();
        let first = geo.destination(MANILA, 47.5, 18.0);
        let second = geo.destination(MANILA, 47.5, 18.0);
        assert_eq!(first, second);
        assert_eq!(
            geo.haversine_distance(MANILA, first),
            geo.haversine_distance(MANILA, second)
        );
    }

    #[test]
    fn haversine_is_symmetric() {
        let geo = Geodesy::default();
        let other = GeoPoint::new(14.6091, 121.0223);
        let forward = geo.haversine_distance(MANILA, other);
        let backward = geo.haversine_distance(other, MANILA);
        assert!((forward - backward).abs() < 1e-9);
        assert!(forward > 4_000.0 && forward < 4_500.0);
    }

    #[test]
    fn destination_round_trips_through_haversine() {
        let geo = Geodesy::default();
        for bearing in [0.0, 45.0, 90.0, 181.0, 270.0, 359.0, -30.0, 400.0] {
            for distance in [1.0, 5.0, 12.5, 25.0] {
                let point = geo.destination(MANILA, bearing, distance);
                let measured = geo.haversine_distance(MANILA, point);
                assert!(
                    (measured - distance).abs() < 1e-6,
                    "bearing {bearing} distance {distance} measured {measured}"
                );
            }
        }
    }

    #[test]
    fn initial_bearing_recovers_projection_bearing() {
        let geo = Geodesy::default();
        for bearing in [0.0, 30.0, 90.0, 200.0, 359.5] {
            let point = geo.destination(MANILA, bearing, 10.0);
            let measured = geo.initial_bearing(MANILA, point);
            let diff = crate::math::bearing::angular_offset(measured, bearing);
            assert!(diff.abs() < 1e-6, "bearing {bearing} measured {measured}");
        }
    }
}
