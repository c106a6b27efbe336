//! Flat stand-in for a globe view
//!
//! Maps screen pixels linearly onto a longitude/latitude rectangle, with y
//! growing downward like host pixel coordinates.

use gs_geodesy::{Ellipsoid, GeographicPosition};
use gs_sketch::{ScreenPoint, WorldPosition};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatViewport {
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
    /// Longitude of the left edge, degrees
    pub west: f64,
    /// Latitude of the bottom edge, degrees
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Default for FlatViewport {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            west: 0.0,
            south: 0.0,
            east: 1.0,
            north: 1.0,
        }
    }
}

impl FlatViewport {
    /// Geographic position under a pixel, or `None` outside the view
    pub fn to_geographic(&self, screen: ScreenPoint) -> Option<GeographicPosition> {
        if !(0.0..=self.width).contains(&screen.x) || !(0.0..=self.height).contains(&screen.y) {
            return None;
        }
        let lon = self.west + screen.x / self.width * (self.east - self.west);
        let lat = self.north - screen.y / self.height * (self.north - self.south);
        Some(GeographicPosition::from_degrees(lon, lat))
    }

    /// Surface position under a pixel
    pub fn pick(&self, screen: ScreenPoint) -> Option<WorldPosition> {
        self.to_geographic(screen)
            .map(|geo| Ellipsoid::WGS84.geographic_to_cartesian(geo))
    }

    /// Picker closure for a recording overlay
    pub fn picker(self) -> impl FnMut(ScreenPoint) -> Option<WorldPosition> + Send + 'static {
        move |screen| self.pick(screen)
    }
}
