//! Measurements between picked world positions
//!
//! These are the quantities the sketch tools put on labels. Positions are
//! projected onto the WGS84 surface before measuring, so picked heights
//! (terrain) do not affect distances. Geodesics are solved with Karney's
//! algorithm through [`geo::Geodesic`].

use std::f64::consts::PI;

use geo::{Distance, Geodesic, InterpolatePoint, Point};

use crate::{Ellipsoid, GeographicPosition, WorldPosition};

/// Longitude/latitude point in degrees, the form [`geo`] measures on
fn lon_lat(position: WorldPosition) -> Point {
    let geographic = Ellipsoid::WGS84.cartesian_to_geographic(position);
    Point::new(geographic.longitude_degrees(), geographic.latitude_degrees())
}

/// Surface position for a longitude/latitude point in degrees
fn from_lon_lat(point: Point) -> WorldPosition {
    Ellipsoid::WGS84.geographic_to_cartesian(GeographicPosition::from_degrees(point.x(), point.y()))
}

/// Length of the geodesic between `a` and `b` along the ellipsoid, in meters
pub fn surface_distance(a: WorldPosition, b: WorldPosition) -> f64 {
    if a == b {
        return 0.0;
    }
    Geodesic.distance(lon_lat(a), lon_lat(b))
}

/// Straight-line distance through space, in meters
pub fn chord_distance(a: WorldPosition, b: WorldPosition) -> f64 {
    a.distance(b)
}

/// Point at `fraction` of the way along the geodesic from `a` to `b`, on the surface
pub fn interpolate(a: WorldPosition, b: WorldPosition, fraction: f64) -> WorldPosition {
    if a == b {
        return a;
    }
    from_lon_lat(Geodesic.point_at_ratio_between(lon_lat(a), lon_lat(b), fraction))
}

/// Geodesic midpoint between `a` and `b` (not the chord midpoint)
pub fn midpoint(a: WorldPosition, b: WorldPosition) -> WorldPosition {
    interpolate(a, b, 0.5)
}

/// Initial bearing from `from` toward `to`, radians in [0, 2π)
///
/// Uses the spherical great-circle formula on geodetic coordinates.
pub fn bearing(from: WorldPosition, to: WorldPosition) -> f64 {
    let wgs84 = Ellipsoid::WGS84;
    let from = wgs84.cartesian_to_geographic(from);
    let to = wgs84.cartesian_to_geographic(to);
    let (lat1, lon1) = (from.latitude, from.longitude);
    let (lat2, lon2) = (to.latitude, to.longitude);

    let angle = -((lon1 - lon2).sin() * lat2.cos())
        .atan2(lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * (lon1 - lon2).cos());
    normalize_angle(angle)
}

/// Angle at vertex `p2` between the directions to `p1` and `p3`, radians in [0, 2π)
pub fn turn_angle(p1: WorldPosition, p2: WorldPosition, p3: WorldPosition) -> f64 {
    normalize_angle(bearing(p2, p1) - bearing(p2, p3))
}

/// Approximate polygon area in square kilometers
///
/// Fan triangulation anchored at the first vertex: for every consecutive
/// vertex triple the edge lengths to vertex 0 (kilometers, rounded to two
/// decimals) are combined with the turn angle at the middle vertex. The sum
/// is rounded to two decimals and returned as an absolute value.
///
/// This is not a spherical-excess area. It is exact only for special
/// triangles and drifts for non-convex or large polygons, and the result
/// depends on which vertex comes first.
pub fn polygon_area(points: &[WorldPosition]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n - 2 {
        let j = (i + 1) % n;
        let k = (i + 2) % n;
        let angle = turn_angle(points[i], points[j], points[k]);
        let length1 = round_to_hundredths(surface_distance(points[j], points[0]) / 1000.0);
        let length2 = round_to_hundredths(surface_distance(points[k], points[0]) / 1000.0);
        area += length1 * length2 * angle.sin() / 2.0;
    }

    round_to_hundredths(area).abs()
}

/// Normalize an angle into [0, 2π)
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(2.0 * PI);
    // rem_euclid can round up to exactly 2π for tiny negative inputs
    if wrapped >= 2.0 * PI { 0.0 } else { wrapped }
}

/// Round to two decimal places
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
