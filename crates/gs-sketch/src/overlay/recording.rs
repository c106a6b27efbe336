//! In-memory overlay that records every entity it is asked to draw.
//!
//! Used by tests and by headless hosts. Picks come from a queue of scripted
//! results first and then from an optional picker closure.

use std::collections::{HashMap, VecDeque};

use gs_geodesy::check_finite;

use super::{EntityHandle, OverlayPort, ScreenPoint};
use crate::WorldPosition;
use crate::style::{FillStyle, LabelStyle, LineStyle, MarkerStyle};
use crate::theme::{ThemeFilter, ThemePort};

/// Picker closure mapping a screen point to a surface position
pub type Picker = Box<dyn FnMut(ScreenPoint) -> Option<WorldPosition> + Send>;

/// An entity as recorded by [`RecordingOverlay`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEntity {
    Marker {
        position: WorldPosition,
        label: Option<String>,
    },
    Line {
        positions: Vec<WorldPosition>,
        dynamic: bool,
    },
    Polygon {
        positions: Vec<WorldPosition>,
        dynamic: bool,
    },
    Label {
        position: WorldPosition,
        text: String,
    },
}

impl RecordedEntity {
    /// Get the type name of this entity
    pub fn type_name(&self) -> &'static str {
        match self {
            RecordedEntity::Marker { .. } => "Marker",
            RecordedEntity::Line { .. } => "Line",
            RecordedEntity::Polygon { .. } => "Polygon",
            RecordedEntity::Label { .. } => "Label",
        }
    }

    /// Whether the entity is a live preview
    pub fn is_dynamic(&self) -> bool {
        match self {
            RecordedEntity::Line { dynamic, .. } | RecordedEntity::Polygon { dynamic, .. } => *dynamic,
            _ => false,
        }
    }
}

/// Overlay that keeps entities in memory instead of drawing them
#[derive(Default)]
pub struct RecordingOverlay {
    entities: HashMap<EntityHandle, RecordedEntity>,
    /// Creation order of live entities
    order: Vec<EntityHandle>,
    scripted_picks: VecDeque<Option<WorldPosition>>,
    picker: Option<Picker>,
    filter: Option<ThemeFilter>,
    stale_operations: usize,
}

impl RecordingOverlay {
    /// Create an overlay whose picks all miss until scripted
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an overlay that picks through `picker`
    pub fn with_picker(picker: impl FnMut(ScreenPoint) -> Option<WorldPosition> + Send + 'static) -> Self {
        Self {
            picker: Some(Box::new(picker)),
            ..Self::default()
        }
    }

    /// Queue the result of the next pick; scripted results take priority over the picker
    pub fn push_pick(&mut self, result: Option<WorldPosition>) {
        self.scripted_picks.push_back(result);
    }

    /// Get an entity by handle
    pub fn entity(&self, handle: EntityHandle) -> Option<&RecordedEntity> {
        self.entities.get(&handle)
    }

    /// Check whether an entity is still in the scene
    pub fn contains(&self, handle: EntityHandle) -> bool {
        self.entities.contains_key(&handle)
    }

    /// Number of entities in the scene
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over live entities in creation order
    pub fn entities(&self) -> impl Iterator<Item = (EntityHandle, &RecordedEntity)> {
        self.order
            .iter()
            .filter_map(|handle| self.entities.get(handle).map(|entity| (*handle, entity)))
    }

    /// Count live entities of the given type name
    pub fn count(&self, type_name: &str) -> usize {
        self.entities
            .values()
            .filter(|entity| entity.type_name() == type_name)
            .count()
    }

    /// Texts of all free-standing labels, in creation order
    pub fn label_texts(&self) -> Vec<&str> {
        self.entities()
            .filter_map(|(_, entity)| match entity {
                RecordedEntity::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of dynamic entities in the scene
    pub fn dynamic_count(&self) -> usize {
        self.entities.values().filter(|entity| entity.is_dynamic()).count()
    }

    /// Updates or removals that targeted a handle not in the scene
    pub fn stale_operations(&self) -> usize {
        self.stale_operations
    }

    /// The last base-map filter applied, if any
    pub fn applied_filter(&self) -> Option<&ThemeFilter> {
        self.filter.as_ref()
    }

    fn insert(&mut self, entity: RecordedEntity) -> EntityHandle {
        let handle = EntityHandle::new();
        self.entities.insert(handle, entity);
        self.order.push(handle);
        handle
    }

    fn stale(&mut self, operation: &str, handle: EntityHandle) {
        tracing::debug!("{} on unknown entity {}", operation, handle);
        self.stale_operations += 1;
    }
}

impl OverlayPort for RecordingOverlay {
    fn pick_surface_position(&mut self, screen: ScreenPoint) -> Option<WorldPosition> {
        let picked = match self.scripted_picks.pop_front() {
            Some(result) => result,
            None => self.picker.as_mut().and_then(|picker| picker(screen)),
        }?;

        match check_finite(picked) {
            Ok(position) => Some(position),
            Err(e) => {
                tracing::debug!("Discarding pick at {}: {}", screen, e);
                None
            }
        }
    }

    fn add_point_marker(
        &mut self,
        position: WorldPosition,
        label: Option<&str>,
        _style: &MarkerStyle,
    ) -> EntityHandle {
        self.insert(RecordedEntity::Marker {
            position,
            label: label.map(str::to_owned),
        })
    }

    fn add_line(&mut self, positions: &[WorldPosition], dynamic: bool, _style: &LineStyle) -> EntityHandle {
        self.insert(RecordedEntity::Line {
            positions: positions.to_vec(),
            dynamic,
        })
    }

    fn add_polygon(&mut self, positions: &[WorldPosition], dynamic: bool, _style: &FillStyle) -> EntityHandle {
        self.insert(RecordedEntity::Polygon {
            positions: positions.to_vec(),
            dynamic,
        })
    }

    fn add_label(&mut self, position: WorldPosition, text: &str, _style: &LabelStyle) -> EntityHandle {
        self.insert(RecordedEntity::Label {
            position,
            text: text.to_owned(),
        })
    }

    fn update_label_text(&mut self, handle: EntityHandle, new_text: &str) {
        match self.entities.get_mut(&handle) {
            Some(RecordedEntity::Label { text, .. }) => *text = new_text.to_owned(),
            Some(RecordedEntity::Marker { label, .. }) => *label = Some(new_text.to_owned()),
            _ => self.stale("update_label_text", handle),
        }
    }

    fn update_position(&mut self, handle: EntityHandle, new_position: WorldPosition) {
        match self.entities.get_mut(&handle) {
            Some(RecordedEntity::Label { position, .. }) | Some(RecordedEntity::Marker { position, .. }) => {
                *position = new_position;
            }
            _ => self.stale("update_position", handle),
        }
    }

    fn update_positions(&mut self, handle: EntityHandle, new_positions: &[WorldPosition]) {
        match self.entities.get_mut(&handle) {
            Some(RecordedEntity::Line {
                positions,
                dynamic: true,
            })
            | Some(RecordedEntity::Polygon {
                positions,
                dynamic: true,
            }) => {
                positions.clear();
                positions.extend_from_slice(new_positions);
            }
            _ => self.stale("update_positions", handle),
        }
    }

    fn remove_entity(&mut self, handle: EntityHandle) {
        if self.entities.remove(&handle).is_some() {
            self.order.retain(|h| *h != handle);
        } else {
            self.stale("remove_entity", handle);
        }
    }

    fn remove_all(&mut self) {
        self.entities.clear();
        self.order.clear();
    }
}

impl ThemePort for RecordingOverlay {
    fn set_filter(&mut self, filter: &ThemeFilter) {
        self.filter = Some(*filter);
    }
}
