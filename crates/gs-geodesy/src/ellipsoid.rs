//! Reference ellipsoid and coordinate conversion

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::WorldPosition;

/// Geodetic coordinates on the reference ellipsoid
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeographicPosition {
    /// Geodetic latitude in radians
    pub latitude: f64,
    /// Longitude in radians, in [-π, π]
    pub longitude: f64,
    /// Height above the ellipsoid in meters
    pub height: f64,
}

impl GeographicPosition {
    pub fn new(latitude: f64, longitude: f64, height: f64) -> Self {
        Self {
            latitude,
            longitude,
            height,
        }
    }

    /// Create from degrees, with zero height
    pub fn from_degrees(longitude: f64, latitude: f64) -> Self {
        Self::new(latitude.to_radians(), longitude.to_radians(), 0.0)
    }

    pub fn latitude_degrees(&self) -> f64 {
        self.latitude.to_degrees()
    }

    pub fn longitude_degrees(&self) -> f64 {
        self.longitude.to_degrees()
    }
}

/// An oblate ellipsoid of revolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// Equatorial radius in meters
    pub semi_major_axis: f64,
    /// Flattening (a - b) / a
    pub flattening: f64,
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

impl Ellipsoid {
    /// The WGS84 ellipsoid, the only datum the sketch tools measure on
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major_axis: 6_378_137.0,
        flattening: 1.0 / 298.257_223_563,
    };

    /// Polar radius in meters
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.flattening)
    }

    /// First eccentricity squared
    pub fn eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    /// Prime vertical radius of curvature at the given latitude
    fn prime_vertical_radius(&self, latitude: f64) -> f64 {
        let sin_lat = latitude.sin();
        self.semi_major_axis / (1.0 - self.eccentricity_squared() * sin_lat * sin_lat).sqrt()
    }

    /// Convert geodetic coordinates to an Earth-fixed Cartesian position
    pub fn geographic_to_cartesian(&self, geo: GeographicPosition) -> WorldPosition {
        let n = self.prime_vertical_radius(geo.latitude);
        let (sin_lat, cos_lat) = geo.latitude.sin_cos();
        let (sin_lon, cos_lon) = geo.longitude.sin_cos();

        DVec3::new(
            (n + geo.height) * cos_lat * cos_lon,
            (n + geo.height) * cos_lat * sin_lon,
            (n * (1.0 - self.eccentricity_squared()) + geo.height) * sin_lat,
        )
    }

    /// Convert an Earth-fixed Cartesian position to geodetic coordinates
    ///
    /// Solves for latitude iteratively; converges to well below a millimeter
    /// in a handful of steps for anything near the surface.
    pub fn cartesian_to_geographic(&self, position: WorldPosition) -> GeographicPosition {
        let e2 = self.eccentricity_squared();
        let p = (position.x * position.x + position.y * position.y).sqrt();
        let longitude = position.y.atan2(position.x);

        // On the polar axis the latitude is fixed and the height is along z
        if p < 1e-9 {
            let latitude = if position.z >= 0.0 {
                std::f64::consts::FRAC_PI_2
            } else {
                -std::f64::consts::FRAC_PI_2
            };
            return GeographicPosition::new(
                latitude,
                0.0,
                position.z.abs() - self.semi_minor_axis(),
            );
        }

        let mut latitude = position.z.atan2(p * (1.0 - e2));
        let mut height = 0.0;
        for _ in 0..16 {
            let n = self.prime_vertical_radius(latitude);
            height = p / latitude.cos() - n;
            let next = position.z.atan2(p * (1.0 - e2 * n / (n + height)));
            let delta = (next - latitude).abs();
            latitude = next;
            if delta < 1e-14 {
                break;
            }
        }

        GeographicPosition::new(latitude, longitude, height)
    }
}
