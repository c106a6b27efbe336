//! Geodesy for GlobeSketch
//!
//! Provides the measurement math behind the sketch tools:
//! - WGS84 reference ellipsoid and Cartesian/geographic conversion
//! - Ellipsoidal geodesics through the `geo` crate (Karney's algorithm)
//! - Distance, midpoint, bearing, turn angle and polygon-area helpers
//! - Label formatting for distances and areas
//!
//! Every function here is pure. Inputs are assumed finite; validate picked
//! positions with [`check_finite`] at the boundary where they enter.

mod ellipsoid;
mod format;
mod measure;

pub use ellipsoid::*;
pub use format::*;
pub use measure::*;

use glam::DVec3;
use thiserror::Error;

/// A point in the Earth-fixed Cartesian frame of the reference ellipsoid (meters)
pub type WorldPosition = DVec3;

/// Geodesy-related errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeodesyError {
    #[error("Non-finite position: {0}")]
    NonFinite(DVec3),
}

/// Reject positions with NaN or infinite components
pub fn check_finite(position: WorldPosition) -> Result<WorldPosition, GeodesyError> {
    if position.is_finite() {
        Ok(position)
    } else {
        Err(GeodesyError::NonFinite(position))
    }
}
