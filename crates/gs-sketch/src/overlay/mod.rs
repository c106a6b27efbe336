//! Overlay port
//!
//! The boundary between the sketch engine and the host's 3D scene. The host
//! implements [`OverlayPort`] on top of its renderer; the engine only ever
//! picks positions and adds, updates or removes entities through it.

mod recording;

pub use recording::{RecordedEntity, RecordingOverlay};

use glam::DVec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::WorldPosition;
use crate::style::{FillStyle, LabelStyle, LineStyle, MarkerStyle};

/// Pointer position in host pixels
pub type ScreenPoint = DVec2;

/// Opaque handle of an entity living in the host scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityHandle(pub Uuid);

impl EntityHandle {
    /// Create a fresh, unique handle
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capabilities the engine needs from the host scene
///
/// Entities added with `dynamic = true` are live previews; the engine keeps
/// them current through [`OverlayPort::update_positions`] and
/// [`OverlayPort::update_position`]. Static entities are snapshots and are
/// never updated.
pub trait OverlayPort {
    /// Intersect the pointer ray with the globe surface
    ///
    /// Returns `None` when the ray misses. Implementations must not return
    /// non-finite positions.
    fn pick_surface_position(&mut self, screen: ScreenPoint) -> Option<WorldPosition>;

    /// Add a point marker, optionally with a text label
    fn add_point_marker(
        &mut self,
        position: WorldPosition,
        label: Option<&str>,
        style: &MarkerStyle,
    ) -> EntityHandle;

    /// Add a polyline through `positions`
    fn add_line(&mut self, positions: &[WorldPosition], dynamic: bool, style: &LineStyle) -> EntityHandle;

    /// Add a filled polygon over `positions`
    fn add_polygon(&mut self, positions: &[WorldPosition], dynamic: bool, style: &FillStyle) -> EntityHandle;

    /// Add a text label anchored at `position`
    fn add_label(&mut self, position: WorldPosition, text: &str, style: &LabelStyle) -> EntityHandle;

    /// Replace the text of a label
    fn update_label_text(&mut self, handle: EntityHandle, text: &str);

    /// Move a marker or label
    fn update_position(&mut self, handle: EntityHandle, position: WorldPosition);

    /// Replace the vertices of a dynamic line or polygon
    fn update_positions(&mut self, handle: EntityHandle, positions: &[WorldPosition]);

    /// Remove a single entity
    fn remove_entity(&mut self, handle: EntityHandle);

    /// Remove every entity from the scene
    fn remove_all(&mut self);
}
