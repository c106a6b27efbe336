//! Finishing a path or polygon on secondary click

use gs_geodesy::{format_area, polygon_area};

use super::{EventOutcome, PointerEvent, SketchEngine};
use crate::SketchError;
use crate::overlay::{OverlayPort, ScreenPoint};
use crate::session::ShapeKind;

impl<O: OverlayPort> SketchEngine<O> {
    pub(super) fn secondary_click(&mut self, screen: ScreenPoint) -> EventOutcome {
        let Some(session) = self.session.as_mut() else {
            return self.reject(PointerEvent::SecondaryClick(screen));
        };
        let kind = session.kind();
        let actual = session.point_count();

        if kind != ShapeKind::Polygon {
            session.drop_floating(&mut self.overlay);
            if actual < kind.min_points() {
                tracing::info!("{} closed with {} point(s), discarding", kind, actual);
                return self.cancel_session();
            }
            return self.finalize();
        }

        let required = kind.min_points();
        if actual < required {
            let error = SketchError::InsufficientVertices { required, actual };
            tracing::warn!("{}", error);
            return EventOutcome::ValidationFailed(error);
        }

        session.drop_floating(&mut self.overlay);
        let styles = &self.config.styles;
        if let Some(closing) = session.connect(&mut self.overlay, actual, 1, styles) {
            session.set_closing_segment(closing);
        }

        let positions = session.shape().positions();
        let fill = session.add_polygon(&mut self.overlay, &positions, false, &styles.fill);
        let area = polygon_area(&positions);
        let text = format_area(area, &self.config.labels.area_suffix);
        let label = session.add_label(&mut self.overlay, positions[actual - 1], &text, &styles.area_label);
        session.set_area(area, label, fill);

        self.finalize()
    }
}
