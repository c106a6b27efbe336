//! Sketch state machine
//!
//! [`SketchEngine`] owns the overlay, the configuration and at most one
//! [`SketchSession`]. Hosts call [`SketchEngine::start_draw`] from their
//! toolbar and forward pointer input through [`SketchEngine::handle_event`].
//!
//! ```text
//! Idle ─start_draw─▶ AwaitingFirstPoint ─click─▶ Sketching ─right click─▶ Finalized
//!                            │                       │                  └▶ Cancelled
//!                            └──────── cancel / clear_all ──────────────▶ Cancelled / Idle
//! ```

mod distance;
mod finish;
mod pointer;

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::SketchConfig;
use crate::overlay::{EntityHandle, OverlayPort, ScreenPoint};
use crate::session::{Shape, ShapeKind, SketchSession};
use crate::theme::{ThemeFilter, ThemePort};
use crate::SketchError;

/// Engine shared between host callbacks
pub type SharedEngine<O> = Arc<Mutex<SketchEngine<O>>>;

/// Wrap an engine for sharing between host callbacks
pub fn create_shared_engine<O: OverlayPort>(engine: SketchEngine<O>) -> SharedEngine<O> {
    Arc::new(Mutex::new(engine))
}

/// Lifecycle state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SketchState {
    #[default]
    Idle,
    AwaitingFirstPoint,
    Sketching,
    Finalized,
    Cancelled,
}

impl SketchState {
    /// Whether a session is open and accepting pointer input
    pub fn is_active(&self) -> bool {
        matches!(self, SketchState::AwaitingFirstPoint | SketchState::Sketching)
    }
}

impl std::fmt::Display for SketchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SketchState::Idle => "idle",
            SketchState::AwaitingFirstPoint => "awaiting first point",
            SketchState::Sketching => "sketching",
            SketchState::Finalized => "finalized",
            SketchState::Cancelled => "cancelled",
        })
    }
}

/// Pointer input forwarded by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Left click, commits a vertex
    PrimaryClick(ScreenPoint),
    PointerMove(ScreenPoint),
    /// Right click, finishes or cancels the sketch
    SecondaryClick(ScreenPoint),
}

impl PointerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PointerEvent::PrimaryClick(_) => "primary click",
            PointerEvent::PointerMove(_) => "pointer move",
            PointerEvent::SecondaryClick(_) => "secondary click",
        }
    }

    pub fn screen_point(&self) -> ScreenPoint {
        match *self {
            PointerEvent::PrimaryClick(p) | PointerEvent::PointerMove(p) | PointerEvent::SecondaryClick(p) => p,
        }
    }
}

/// What handling a pointer event did
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// Nothing changed
    Ignored(SketchError),
    /// A vertex was committed with this 1-based index
    PointCommitted { index: usize },
    PreviewMoved,
    /// The sketch is complete and stays on the map
    Finalized(Shape),
    /// The sketch was discarded and its entities removed
    Cancelled,
    /// The request was rejected; the sketch is still open
    ValidationFailed(SketchError),
}

impl EventOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, EventOutcome::Ignored(_))
    }

    /// Error to show to the user, if any
    pub fn user_error(&self) -> Option<&SketchError> {
        match self {
            EventOutcome::ValidationFailed(e) if e.is_user_facing() => Some(e),
            _ => None,
        }
    }
}

/// Pointer-driven sketch engine over a host overlay
pub struct SketchEngine<O: OverlayPort> {
    overlay: O,
    config: SketchConfig,
    state: SketchState,
    session: Option<SketchSession>,
    /// Whether pointer events are being accepted
    handler_attached: bool,
    /// Running vertex number shown on markers, reset by clear_all
    point_counter: usize,
    finalized: Vec<Shape>,
    /// Entities of finalized shapes, left on the map until clear_all
    persistent: HashSet<EntityHandle>,
}

impl<O: OverlayPort> SketchEngine<O> {
    /// Create an engine with the default configuration
    pub fn new(overlay: O) -> Self {
        Self::with_config(overlay, SketchConfig::new())
    }

    pub fn with_config(overlay: O, config: SketchConfig) -> Self {
        Self {
            overlay,
            config,
            state: SketchState::Idle,
            session: None,
            handler_attached: false,
            point_counter: 0,
            finalized: Vec::new(),
            persistent: HashSet::new(),
        }
    }

    pub fn state(&self) -> SketchState {
        self.state
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Replace the configuration; styles apply to entities drawn afterwards
    pub fn set_config(&mut self, config: SketchConfig) {
        self.config = config;
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut O {
        &mut self.overlay
    }

    pub fn session(&self) -> Option<&SketchSession> {
        self.session.as_ref()
    }

    pub fn point_counter(&self) -> usize {
        self.point_counter
    }

    pub fn is_handler_attached(&self) -> bool {
        self.handler_attached
    }

    /// Shapes finalized since the last clear
    pub fn finalized_shapes(&self) -> &[Shape] {
        &self.finalized
    }

    /// Number of entities the engine currently has on the map
    pub fn owned_entity_count(&self) -> usize {
        self.persistent.len() + self.session.as_ref().map_or(0, |s| s.owned_handles().len())
    }

    /// Start sketching a new shape
    ///
    /// An open session is cancelled first, removing everything it drew.
    pub fn start_draw(&mut self, kind: ShapeKind) {
        if self.session.is_some() {
            tracing::warn!("Starting a {} sketch while one is open, cancelling it", kind);
            self.cancel_session();
        }

        self.session = Some(SketchSession::new(kind));
        self.attach_handler();
        self.state = SketchState::AwaitingFirstPoint;
        tracing::info!("Started {} sketch", kind);
    }

    /// Cancel the open session, if any
    pub fn cancel(&mut self) -> bool {
        if self.session.is_none() {
            return false;
        }
        self.cancel_session();
        true
    }

    /// Remove everything the engine has drawn and reset the vertex counter
    pub fn clear_all(&mut self) {
        if self.session.is_some() {
            self.cancel_session();
        }
        self.overlay.remove_all();
        self.persistent.clear();
        self.finalized.clear();
        self.point_counter = 0;
        self.state = SketchState::Idle;
        tracing::info!("Cleared all sketches");
    }

    /// Feed one pointer event through the state machine
    pub fn handle_event(&mut self, event: PointerEvent) -> EventOutcome {
        let kind = match &self.session {
            Some(session) if self.handler_attached => session.kind(),
            _ => return self.reject(event),
        };

        let outcome = match (kind, event) {
            (ShapeKind::Distance, event) => self.handle_distance_event(event),
            (_, PointerEvent::PrimaryClick(screen)) => self.primary_click(screen),
            (_, PointerEvent::PointerMove(screen)) => self.pointer_move(screen),
            (_, PointerEvent::SecondaryClick(screen)) => self.secondary_click(screen),
        };

        if let EventOutcome::Ignored(reason) = &outcome {
            tracing::debug!("Ignored {} at {}: {}", event.name(), event.screen_point(), reason);
        }
        outcome
    }

    /// Push the configured base-map filter to the host renderer
    ///
    /// Returns the applied filter, or `None` when the filter is disabled.
    pub fn apply_theme(&mut self) -> Result<Option<ThemeFilter>, SketchError>
    where
        O: ThemePort,
    {
        let filter = ThemeFilter::from_config(&self.config.theme)?;
        if let Some(filter) = &filter {
            self.overlay.set_filter(filter);
            tracing::info!("Applied base-map filter {:?}", filter);
        }
        Ok(filter)
    }

    fn reject(&self, event: PointerEvent) -> EventOutcome {
        EventOutcome::Ignored(SketchError::InvalidTransition {
            state: self.state,
            event: event.name(),
        })
    }

    fn pick(&mut self, screen: ScreenPoint) -> Result<crate::WorldPosition, SketchError> {
        self.overlay.pick_surface_position(screen).ok_or(SketchError::PickMiss)
    }

    fn attach_handler(&mut self) {
        self.handler_attached = true;
    }

    /// Stop accepting pointer events; returns `false` if already detached
    fn detach_handler(&mut self) -> bool {
        if !self.handler_attached {
            tracing::warn!("Pointer handler already detached");
            return false;
        }
        self.handler_attached = false;
        true
    }

    /// Close the session, keeping its entities on the map
    fn finalize(&mut self) -> EventOutcome {
        let Some(session) = self.session.take() else {
            return EventOutcome::Ignored(SketchError::InvalidTransition {
                state: self.state,
                event: "finalize",
            });
        };

        let (shape, owned) = session.into_parts();
        self.persistent.extend(owned);
        self.detach_handler();
        self.state = SketchState::Finalized;
        tracing::info!(
            "Finalized {} with {} points, {:.2} m total",
            shape.kind,
            shape.points.len(),
            shape.total_distance()
        );
        self.finalized.push(shape.clone());
        EventOutcome::Finalized(shape)
    }

    /// Discard the session and everything it drew
    fn cancel_session(&mut self) -> EventOutcome {
        if let Some(mut session) = self.session.take() {
            let removed = session.teardown(&mut self.overlay);
            tracing::info!("Cancelled {} sketch, removed {} entities", session.kind(), removed);
        }
        self.detach_handler();
        self.state = SketchState::Cancelled;
        EventOutcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::RecordingOverlay;
    use glam::DVec2;
    use gs_geodesy::{Ellipsoid, GeographicPosition};

    fn at(lon: f64, lat: f64) -> crate::WorldPosition {
        Ellipsoid::WGS84.geographic_to_cartesian(GeographicPosition::from_degrees(lon, lat))
    }

    fn click() -> PointerEvent {
        PointerEvent::PrimaryClick(DVec2::ZERO)
    }

    fn pointer_move() -> PointerEvent {
        PointerEvent::PointerMove(DVec2::ZERO)
    }

    fn right_click() -> PointerEvent {
        PointerEvent::SecondaryClick(DVec2::ZERO)
    }

    /// Commit a point at (lon, lat)
    fn commit(engine: &mut SketchEngine<RecordingOverlay>, lon: f64, lat: f64) -> EventOutcome {
        engine.overlay_mut().push_pick(Some(at(lon, lat)));
        engine.handle_event(click())
    }

    fn hover(engine: &mut SketchEngine<RecordingOverlay>, lon: f64, lat: f64) -> EventOutcome {
        engine.overlay_mut().push_pick(Some(at(lon, lat)));
        engine.handle_event(pointer_move())
    }

    #[test]
    fn test_events_ignored_while_idle() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        let outcome = engine.handle_event(click());
        assert_eq!(
            outcome,
            EventOutcome::Ignored(SketchError::InvalidTransition {
                state: SketchState::Idle,
                event: "primary click"
            })
        );
        assert!(engine.overlay().is_empty());
    }

    #[test]
    fn test_pick_miss_changes_nothing() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        engine.start_draw(ShapeKind::Polyline);
        engine.overlay_mut().push_pick(None);

        assert_eq!(engine.handle_event(click()), EventOutcome::Ignored(SketchError::PickMiss));
        assert_eq!(engine.state(), SketchState::AwaitingFirstPoint);
        assert_eq!(engine.point_counter(), 0);
        assert!(engine.overlay().is_empty());
    }

    #[test]
    fn test_polyline_three_points_two_segments() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        engine.start_draw(ShapeKind::Polyline);

        assert_eq!(commit(&mut engine, 0.0, 0.0), EventOutcome::PointCommitted { index: 1 });
        assert_eq!(engine.state(), SketchState::Sketching);
        assert_eq!(hover(&mut engine, 0.5, 0.0), EventOutcome::PreviewMoved);
        commit(&mut engine, 1.0, 0.0);
        commit(&mut engine, 1.0, 1.0);

        let session = engine.session().unwrap();
        assert_eq!(session.shape().segments.len(), 2);
        assert!(session.shape().segments.iter().all(|s| session.owns(s.label)));
        // Two segment labels plus the live readout of the trailing edge
        assert_eq!(engine.overlay().label_texts().len(), 3);

        let outcome = engine.handle_event(right_click());
        let EventOutcome::Finalized(shape) = outcome else {
            panic!("expected finalized, got {:?}", outcome);
        };
        assert_eq!(shape.points.len(), 3);
        assert_eq!(shape.segments.len(), 2);
        assert!(shape.closing_segment.is_none() && shape.area_km2.is_none());
        assert_eq!(engine.state(), SketchState::Finalized);
        assert_eq!(engine.overlay().dynamic_count(), 0);
        // 3 markers, 2 lines, 2 labels
        assert_eq!(engine.overlay().len(), 7);
        assert_eq!(engine.owned_entity_count(), 7);
    }

    #[test]
    fn test_polyline_live_readout_tracks_pointer() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        engine.start_draw(ShapeKind::Polyline);
        commit(&mut engine, 0.0, 0.0);

        hover(&mut engine, 0.5, 0.0);
        let label = engine.session().and_then(|s| s.floating()).map(|f| f.label).unwrap();
        assert_eq!(engine.overlay().label_texts(), vec!["55.66km"]);

        hover(&mut engine, 1.0, 0.0);
        assert_eq!(engine.overlay().label_texts(), vec!["111.32km"]);
        match engine.overlay().entity(label) {
            Some(crate::RecordedEntity::Label { position, .. }) => {
                assert!(position.distance(at(0.5, 0.0)) < 1e-2);
            }
            other => panic!("expected label, got {:?}", other),
        }

        engine.handle_event(right_click());
        assert!(!engine.overlay().contains(label));
    }

    #[test]
    fn test_polyline_cancel_with_one_point() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        engine.start_draw(ShapeKind::Polyline);
        commit(&mut engine, 0.0, 0.0);
        hover(&mut engine, 0.1, 0.1);

        assert_eq!(engine.handle_event(right_click()), EventOutcome::Cancelled);
        assert_eq!(engine.state(), SketchState::Cancelled);
        assert!(engine.overlay().is_empty());
        assert!(engine.finalized_shapes().is_empty());
        assert_eq!(engine.owned_entity_count(), 0);
    }

    #[test]
    fn test_polygon_needs_three_points() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        engine.start_draw(ShapeKind::Polygon);
        commit(&mut engine, 0.0, 0.0);
        commit(&mut engine, 0.1, 0.0);
        let before = engine.session().unwrap().owned_handles().clone();

        let outcome = engine.handle_event(right_click());
        assert_eq!(
            outcome,
            EventOutcome::ValidationFailed(SketchError::InsufficientVertices {
                required: 3,
                actual: 2
            })
        );
        assert!(outcome.user_error().is_some());
        assert_eq!(engine.state(), SketchState::Sketching);
        assert_eq!(engine.session().unwrap().owned_handles(), &before);

        commit(&mut engine, 0.05, 0.05);
        let EventOutcome::Finalized(shape) = engine.handle_event(right_click()) else {
            panic!("polygon did not close");
        };
        let closing = shape.closing_segment.as_ref().unwrap();
        assert_eq!((closing.from, closing.to), (3, 1));
        assert!(shape.area_km2.unwrap() > 0.0);
        assert_eq!(engine.overlay().count("Polygon"), 1);
        let area_labels = engine
            .overlay()
            .label_texts()
            .into_iter()
            .filter(|t| t.ends_with(" km²"))
            .count();
        assert_eq!(area_labels, 1);
    }

    #[test]
    fn test_duplicate_finalize_is_ignored() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        engine.start_draw(ShapeKind::Polygon);
        commit(&mut engine, 0.0, 0.0);
        commit(&mut engine, 0.1, 0.0);
        commit(&mut engine, 0.05, 0.05);
        assert!(matches!(engine.handle_event(right_click()), EventOutcome::Finalized(_)));
        let entities = engine.overlay().len();

        let outcome = engine.handle_event(right_click());
        assert_eq!(
            outcome,
            EventOutcome::Ignored(SketchError::InvalidTransition {
                state: SketchState::Finalized,
                event: "secondary click"
            })
        );
        assert!(engine.handle_event(pointer_move()).is_ignored());
        assert_eq!(engine.overlay().len(), entities);
        assert_eq!(engine.overlay().count("Polygon"), 1);
        assert_eq!(engine.finalized_shapes().len(), 1);
        assert!(!engine.is_handler_attached());
    }

    #[test]
    fn test_start_draw_cancels_open_session() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        engine.start_draw(ShapeKind::Polyline);
        commit(&mut engine, 0.0, 0.0);
        commit(&mut engine, 1.0, 0.0);
        assert!(!engine.overlay().is_empty());

        engine.start_draw(ShapeKind::Polygon);
        assert!(engine.overlay().is_empty());
        assert_eq!(engine.state(), SketchState::AwaitingFirstPoint);
        assert!(engine.is_handler_attached());
        assert_eq!(engine.session().map(|s| s.kind()), Some(ShapeKind::Polygon));
    }

    #[test]
    fn test_clear_all_resets_counter() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        engine.start_draw(ShapeKind::Polyline);
        commit(&mut engine, 0.0, 0.0);
        commit(&mut engine, 1.0, 0.0);
        engine.handle_event(right_click());
        engine.start_draw(ShapeKind::Polygon);
        commit(&mut engine, 2.0, 0.0);
        assert_eq!(engine.point_counter(), 3);

        engine.clear_all();
        assert_eq!(engine.point_counter(), 0);
        assert_eq!(engine.state(), SketchState::Idle);
        assert_eq!(engine.owned_entity_count(), 0);
        assert!(engine.overlay().is_empty());
        assert!(engine.handle_event(click()).is_ignored());

        engine.clear_all();
        assert_eq!(engine.state(), SketchState::Idle);
    }

    #[test]
    fn test_vertex_labels_follow_global_counter() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        engine.start_draw(ShapeKind::Polyline);
        commit(&mut engine, 0.0, 0.0);
        commit(&mut engine, 1.0, 0.0);
        engine.handle_event(right_click());

        engine.start_draw(ShapeKind::Polyline);
        assert_eq!(commit(&mut engine, 2.0, 0.0), EventOutcome::PointCommitted { index: 1 });
        let marker = engine.session().unwrap().shape().points[0].marker;
        assert_eq!(
            engine.overlay().entity(marker),
            Some(&crate::RecordedEntity::Marker {
                position: at(2.0, 0.0),
                label: Some("3".into())
            })
        );
    }

    #[test]
    fn test_cancel() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        assert!(!engine.cancel());
        engine.start_draw(ShapeKind::Distance);
        commit(&mut engine, 0.0, 0.0);
        assert!(engine.cancel());
        assert_eq!(engine.state(), SketchState::Cancelled);
        assert!(engine.overlay().is_empty());
    }

    #[test]
    fn test_apply_theme() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        assert_eq!(engine.apply_theme(), Ok(None));
        assert!(engine.overlay().applied_filter().is_none());

        let mut config = SketchConfig::new();
        config.theme.enabled = true;
        engine.set_config(config);
        let applied = engine.apply_theme().unwrap();
        assert!(applied.is_some());
        assert_eq!(engine.overlay().applied_filter(), applied.as_ref());

        let mut config = SketchConfig::new();
        config.theme.enabled = true;
        config.theme.color = "#12".into();
        engine.set_config(config);
        assert!(matches!(engine.apply_theme(), Err(SketchError::InvalidColor(_))));
    }

    #[test]
    fn test_shared_engine() {
        let shared = create_shared_engine(SketchEngine::new(RecordingOverlay::new()));
        shared.lock().start_draw(ShapeKind::Polyline);
        assert!(shared.lock().state().is_active());
    }
}
