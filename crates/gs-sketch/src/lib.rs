//! Interactive geodesic sketching
//!
//! Turns pointer events on a globe into measured, labeled geometry:
//! - Two-point distance, multi-segment path and polygon area tools
//! - Live preview that follows the pointer until a click commits a vertex
//! - Atomic teardown of everything a cancelled sketch drew
//!
//! The engine never renders anything itself. Hosts implement [`OverlayPort`]
//! for their scene (picking plus entity creation/removal) and forward
//! [`PointerEvent`]s into a [`SketchEngine`].

pub mod config;
mod engine;
mod error;
pub mod overlay;
mod session;
pub mod style;
pub mod theme;

pub use config::{ConfigError, ConfigManager, LabelConfig, SketchConfig};
pub use engine::{EventOutcome, PointerEvent, SharedEngine, SketchEngine, SketchState, create_shared_engine};
pub use error::SketchError;
pub use overlay::{EntityHandle, OverlayPort, RecordedEntity, RecordingOverlay, ScreenPoint};
pub use session::{FloatingPoint, Point, Segment, Shape, ShapeKind, SketchSession};

pub use gs_geodesy::WorldPosition;
