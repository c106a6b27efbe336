//! Two-point distance tool
//!
//! The first click fixes the start point. Moving the pointer draws a live
//! line and a straight-line distance readout; the second click (or a right
//! click with a live preview) fixes the end point and finishes.

use super::{EventOutcome, PointerEvent, SketchEngine, SketchState};
use crate::overlay::{OverlayPort, ScreenPoint};
use crate::{SketchError, WorldPosition};

impl<O: OverlayPort> SketchEngine<O> {
    pub(super) fn handle_distance_event(&mut self, event: PointerEvent) -> EventOutcome {
        match event {
            PointerEvent::PrimaryClick(screen) => match self.pick(screen) {
                Ok(position) => self.place_distance_point(position),
                Err(e) => EventOutcome::Ignored(e),
            },
            PointerEvent::PointerMove(screen) => self.track_distance_pointer(screen),
            PointerEvent::SecondaryClick(_) => {
                let preview = self
                    .session
                    .as_ref()
                    .and_then(|s| s.floating())
                    .map(|f| f.position);
                match preview {
                    Some(position) => self.place_distance_point(position),
                    None => self.cancel_session(),
                }
            }
        }
    }

    fn place_distance_point(&mut self, position: WorldPosition) -> EventOutcome {
        let Some(session) = self.session.as_mut() else {
            return EventOutcome::Ignored(SketchError::InvalidTransition {
                state: self.state,
                event: "distance point",
            });
        };

        let styles = &self.config.styles;
        session.drop_floating(&mut self.overlay);
        let index = session
            .push_point(&mut self.overlay, position, None, &styles.vertex)
            .index;

        if index == 1 {
            self.state = SketchState::Sketching;
            return EventOutcome::PointCommitted { index };
        }

        if let Some(segment) = session.connect(&mut self.overlay, 1, index, styles) {
            tracing::debug!("Measured {:.2} m", segment.distance_meters);
            session.push_segment(segment);
        }
        self.finalize()
    }

    fn track_distance_pointer(&mut self, screen: ScreenPoint) -> EventOutcome {
        if self.state != SketchState::Sketching {
            return self.reject(PointerEvent::PointerMove(screen));
        }

        let position = match self.pick(screen) {
            Ok(position) => position,
            Err(e) => return EventOutcome::Ignored(e),
        };
        if let Some(session) = self.session.as_mut() {
            session.spawn_floating(&mut self.overlay, position, &self.config.styles);
        }
        EventOutcome::PreviewMoved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{RecordedEntity, RecordingOverlay};
    use crate::session::ShapeKind;
    use glam::DVec2;
    use gs_geodesy::{Ellipsoid, GeographicPosition, chord_distance};

    fn at(lon: f64, lat: f64) -> WorldPosition {
        Ellipsoid::WGS84.geographic_to_cartesian(GeographicPosition::from_degrees(lon, lat))
    }

    fn send(engine: &mut SketchEngine<RecordingOverlay>, event: PointerEvent, pick: WorldPosition) -> EventOutcome {
        engine.overlay_mut().push_pick(Some(pick));
        engine.handle_event(event)
    }

    const CLICK: PointerEvent = PointerEvent::PrimaryClick(DVec2::ZERO);
    const MOVE: PointerEvent = PointerEvent::PointerMove(DVec2::ZERO);
    const RIGHT_CLICK: PointerEvent = PointerEvent::SecondaryClick(DVec2::ZERO);

    #[test]
    fn test_move_before_first_point_is_ignored() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        engine.start_draw(ShapeKind::Distance);
        assert!(send(&mut engine, MOVE, at(0.0, 0.0)).is_ignored());
        assert!(engine.overlay().is_empty());
    }

    #[test]
    fn test_live_readout_switches_units() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        engine.start_draw(ShapeKind::Distance);
        assert_eq!(send(&mut engine, CLICK, at(0.0, 0.0)), EventOutcome::PointCommitted { index: 1 });

        assert_eq!(send(&mut engine, MOVE, at(0.001, 0.0)), EventOutcome::PreviewMoved);
        let texts = engine.overlay().label_texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].ends_with('m') && !texts[0].ends_with("km"));

        send(&mut engine, MOVE, at(0.1, 0.0));
        let texts = engine.overlay().label_texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].ends_with("km"));
        assert_eq!(engine.overlay().dynamic_count(), 1);
    }

    #[test]
    fn test_second_click_finalizes() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        engine.start_draw(ShapeKind::Distance);
        let (start, end) = (at(0.0, 0.0), at(0.01, 0.0));
        send(&mut engine, CLICK, start);
        send(&mut engine, MOVE, at(0.005, 0.0));

        let EventOutcome::Finalized(shape) = send(&mut engine, CLICK, end) else {
            panic!("distance did not finalize");
        };
        assert_eq!(shape.points.len(), 2);
        assert_eq!(shape.segments.len(), 1);
        assert_eq!(shape.segments[0].distance_meters, chord_distance(start, end));

        let overlay = engine.overlay();
        assert_eq!(overlay.dynamic_count(), 0);
        // two markers, one line, one label
        assert_eq!(overlay.len(), 4);
        assert_eq!(overlay.label_texts(), vec![format!("{:.2}km", chord_distance(start, end) / 1000.0)]);
        assert!(
            overlay
                .entities()
                .all(|(_, e)| !matches!(e, RecordedEntity::Marker { label: Some(_), .. }))
        );
        assert_eq!(engine.point_counter(), 0);
    }

    #[test]
    fn test_right_click_commits_preview() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        engine.start_draw(ShapeKind::Distance);
        send(&mut engine, CLICK, at(0.0, 0.0));
        send(&mut engine, MOVE, at(0.0, 0.002));

        let EventOutcome::Finalized(shape) = engine.handle_event(RIGHT_CLICK) else {
            panic!("right click did not finish");
        };
        assert_eq!(shape.points[1].position, at(0.0, 0.002));
    }

    #[test]
    fn test_right_click_without_preview_cancels() {
        let mut engine = SketchEngine::new(RecordingOverlay::new());
        engine.start_draw(ShapeKind::Distance);
        send(&mut engine, CLICK, at(0.0, 0.0));

        assert_eq!(engine.handle_event(RIGHT_CLICK), EventOutcome::Cancelled);
        assert!(engine.overlay().is_empty());
    }
}
