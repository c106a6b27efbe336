//! Vertex placement and live preview for the path and polygon tools

use super::{EventOutcome, PointerEvent, SketchEngine, SketchState};
use crate::SketchError;
use crate::overlay::{OverlayPort, ScreenPoint};

impl<O: OverlayPort> SketchEngine<O> {
    /// Commit a vertex under the pointer and measure the edge to the previous one
    pub(super) fn primary_click(&mut self, screen: ScreenPoint) -> EventOutcome {
        let position = match self.pick(screen) {
            Ok(position) => position,
            Err(e) => return EventOutcome::Ignored(e),
        };
        let Some(session) = self.session.as_mut() else {
            return self.reject(PointerEvent::PrimaryClick(screen));
        };

        self.point_counter += 1;
        let label = self.point_counter.to_string();
        let styles = &self.config.styles;
        let index = session
            .push_point(&mut self.overlay, position, Some(&label), &styles.vertex)
            .index;

        if index >= 2 {
            if let Some(segment) = session.connect(&mut self.overlay, index - 1, index, styles) {
                session.push_segment(segment);
            }
        }

        if session.floating().is_some() {
            session.move_floating(&mut self.overlay, position);
        } else {
            session.spawn_floating(&mut self.overlay, position, styles);
        }

        self.state = SketchState::Sketching;
        tracing::debug!("Committed {} point {}", session.kind(), index);
        EventOutcome::PointCommitted { index }
    }

    /// Drag the floating vertex and its preview to the pointer
    pub(super) fn pointer_move(&mut self, screen: ScreenPoint) -> EventOutcome {
        let has_floating = self.session.as_ref().is_some_and(|s| s.floating().is_some());
        if self.state != SketchState::Sketching || !has_floating {
            return EventOutcome::Ignored(SketchError::InvalidTransition {
                state: self.state,
                event: "pointer move",
            });
        }

        let position = match self.pick(screen) {
            Ok(position) => position,
            Err(e) => return EventOutcome::Ignored(e),
        };
        if let Some(session) = self.session.as_mut() {
            session.move_floating(&mut self.overlay, position);
        }
        EventOutcome::PreviewMoved
    }
}
