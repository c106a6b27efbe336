//! Sketch session
//!
//! The in-progress shape of one draw operation together with every entity
//! drawn for it. All overlay calls made on behalf of a session go through
//! [`SketchSession`] so the owned handle set stays complete and a cancel can
//! remove everything in one pass.

use std::collections::HashSet;

use gs_geodesy::{chord_distance, format_distance, format_kilometers, midpoint, surface_distance};
use serde::{Deserialize, Serialize};

use crate::WorldPosition;
use crate::overlay::{EntityHandle, OverlayPort};
use crate::style::{FillStyle, LabelStyle, LineStyle, MarkerStyle, StyleConfig};

/// Kind of shape being sketched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Straight-line distance between two points
    Distance,
    /// Open multi-segment path
    Polyline,
    /// Closed polygon with area
    Polygon,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Distance => "distance",
            ShapeKind::Polyline => "polyline",
            ShapeKind::Polygon => "polygon",
        }
    }

    /// Committed points needed to finish a shape of this kind
    pub fn min_points(&self) -> usize {
        match self {
            ShapeKind::Distance | ShapeKind::Polyline => 2,
            ShapeKind::Polygon => 3,
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A committed vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub position: WorldPosition,
    /// 1-based position in the shape
    pub index: usize,
    pub marker: EntityHandle,
}

/// A measured edge between two committed points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Index of the start point
    pub from: usize,
    /// Index of the end point
    pub to: usize,
    pub distance_meters: f64,
    pub midpoint: WorldPosition,
    pub label: EntityHandle,
    pub line: EntityHandle,
}

/// A sketched shape, complete or in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub points: Vec<Point>,
    pub segments: Vec<Segment>,
    /// Polygon edge from the last point back to the first
    pub closing_segment: Option<Segment>,
    pub area_km2: Option<f64>,
    pub area_label: Option<EntityHandle>,
    pub fill: Option<EntityHandle>,
}

impl Shape {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            points: Vec::new(),
            segments: Vec::new(),
            closing_segment: None,
            area_km2: None,
            area_label: None,
            fill: None,
        }
    }

    /// Positions of the committed points in click order
    pub fn positions(&self) -> Vec<WorldPosition> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// Get a point by its 1-based index
    pub fn point(&self, index: usize) -> Option<&Point> {
        index.checked_sub(1).and_then(|i| self.points.get(i))
    }

    /// Sum of all segment lengths including the closing segment
    pub fn total_distance(&self) -> f64 {
        self.segments
            .iter()
            .chain(self.closing_segment.iter())
            .map(|s| s.distance_meters)
            .sum()
    }

    /// Every entity the shape refers to
    pub fn handles(&self) -> Vec<EntityHandle> {
        let mut handles: Vec<EntityHandle> = self.points.iter().map(|p| p.marker).collect();
        for segment in self.segments.iter().chain(self.closing_segment.iter()) {
            handles.push(segment.line);
            handles.push(segment.label);
        }
        handles.extend(self.fill);
        handles.extend(self.area_label);
        handles
    }
}

/// The provisional vertex following the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingPoint {
    pub position: WorldPosition,
    pub marker: EntityHandle,
    /// Live line or polygon through the floating position
    pub preview: EntityHandle,
    /// Live distance readout of the edge ending at the floating position
    pub label: EntityHandle,
}

/// State of one active draw operation
#[derive(Debug)]
pub struct SketchSession {
    shape: Shape,
    floating: Option<FloatingPoint>,
    owned: HashSet<EntityHandle>,
}

impl SketchSession {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            shape: Shape::new(kind),
            floating: None,
            owned: HashSet::new(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn point_count(&self) -> usize {
        self.shape.points.len()
    }

    pub fn floating(&self) -> Option<&FloatingPoint> {
        self.floating.as_ref()
    }

    /// Handles of every live entity drawn for this session
    pub fn owned_handles(&self) -> &HashSet<EntityHandle> {
        &self.owned
    }

    pub fn owns(&self, handle: EntityHandle) -> bool {
        self.owned.contains(&handle)
    }

    fn track(&mut self, handle: EntityHandle) -> EntityHandle {
        self.owned.insert(handle);
        handle
    }

    fn release(&mut self, overlay: &mut dyn OverlayPort, handle: EntityHandle) {
        overlay.remove_entity(handle);
        self.owned.remove(&handle);
    }

    pub fn add_marker(
        &mut self,
        overlay: &mut dyn OverlayPort,
        position: WorldPosition,
        label: Option<&str>,
        style: &MarkerStyle,
    ) -> EntityHandle {
        let handle = overlay.add_point_marker(position, label, style);
        self.track(handle)
    }

    pub fn add_line(
        &mut self,
        overlay: &mut dyn OverlayPort,
        positions: &[WorldPosition],
        dynamic: bool,
        style: &LineStyle,
    ) -> EntityHandle {
        let handle = overlay.add_line(positions, dynamic, style);
        self.track(handle)
    }

    pub fn add_polygon(
        &mut self,
        overlay: &mut dyn OverlayPort,
        positions: &[WorldPosition],
        dynamic: bool,
        style: &FillStyle,
    ) -> EntityHandle {
        let handle = overlay.add_polygon(positions, dynamic, style);
        self.track(handle)
    }

    pub fn add_label(
        &mut self,
        overlay: &mut dyn OverlayPort,
        position: WorldPosition,
        text: &str,
        style: &LabelStyle,
    ) -> EntityHandle {
        let handle = overlay.add_label(position, text, style);
        self.track(handle)
    }

    /// Commit a vertex and draw its marker
    pub fn push_point(
        &mut self,
        overlay: &mut dyn OverlayPort,
        position: WorldPosition,
        label: Option<&str>,
        style: &MarkerStyle,
    ) -> &Point {
        let marker = self.add_marker(overlay, position, label, style);
        let index = self.shape.points.len() + 1;
        self.shape.points.push(Point {
            position,
            index,
            marker,
        });
        &self.shape.points[index - 1]
    }

    /// Draw and measure the edge between two committed points
    ///
    /// The two-point tool measures the straight chord and labels the end
    /// point; the path tools measure along the surface in kilometers and
    /// label the geodesic midpoint. Returns `None` if either index is not a
    /// committed point.
    pub fn connect(
        &mut self,
        overlay: &mut dyn OverlayPort,
        from: usize,
        to: usize,
        styles: &StyleConfig,
    ) -> Option<Segment> {
        let start = self.shape.point(from)?.position;
        let end = self.shape.point(to)?.position;
        let mid = midpoint(start, end);

        let (distance_meters, line, label) = if self.kind() == ShapeKind::Distance {
            let distance = chord_distance(start, end);
            let line = self.add_line(overlay, &[start, end], false, &styles.measure_line);
            let label = self.add_label(overlay, end, &format_distance(distance), &styles.measure_label);
            (distance, line, label)
        } else {
            let distance = surface_distance(start, end);
            let line = self.add_line(overlay, &[start, end], false, &styles.segment);
            let label = self.add_label(overlay, mid, &format_kilometers(distance), &styles.distance_label);
            (distance, line, label)
        };

        Some(Segment {
            from,
            to,
            distance_meters,
            midpoint: mid,
            label,
            line,
        })
    }

    pub fn push_segment(&mut self, segment: Segment) {
        self.shape.segments.push(segment);
    }

    pub fn set_closing_segment(&mut self, segment: Segment) {
        self.shape.closing_segment = Some(segment);
    }

    pub fn set_area(&mut self, area_km2: f64, label: EntityHandle, fill: EntityHandle) {
        self.shape.area_km2 = Some(area_km2);
        self.shape.area_label = Some(label);
        self.shape.fill = Some(fill);
    }

    /// Vertices of the live preview with the pointer at `pointer`
    pub fn preview_positions(&self, pointer: WorldPosition) -> Vec<WorldPosition> {
        match self.kind() {
            ShapeKind::Polygon => {
                let mut positions = self.shape.positions();
                positions.push(pointer);
                positions
            }
            ShapeKind::Polyline => self
                .shape
                .points
                .last()
                .map(|last| vec![last.position, pointer])
                .unwrap_or_else(|| vec![pointer]),
            ShapeKind::Distance => self
                .shape
                .points
                .first()
                .map(|first| vec![first.position, pointer])
                .unwrap_or_else(|| vec![pointer]),
        }
    }

    /// Create the floating marker and the kind's live preview at `position`
    pub fn spawn_floating(&mut self, overlay: &mut dyn OverlayPort, position: WorldPosition, styles: &StyleConfig) {
        if self.floating.is_some() {
            self.move_floating(overlay, position);
            return;
        }

        let marker = self.add_marker(overlay, position, None, &styles.floating);
        let positions = self.preview_positions(position);
        let preview = match self.kind() {
            ShapeKind::Polyline => self.add_line(overlay, &positions, true, &styles.preview_line),
            ShapeKind::Polygon => self.add_polygon(overlay, &positions, true, &styles.preview_fill),
            ShapeKind::Distance => self.add_line(overlay, &positions, true, &styles.measure_line),
        };
        let (anchor, text) = self.live_readout(position);
        let label_style = match self.kind() {
            ShapeKind::Distance => &styles.measure_label,
            _ => &styles.distance_label,
        };
        let label = self.add_label(overlay, anchor, &text, label_style);

        self.floating = Some(FloatingPoint {
            position,
            marker,
            preview,
            label,
        });
    }

    /// Move the floating point and refresh its preview
    ///
    /// Returns `false` if there is no floating point.
    pub fn move_floating(&mut self, overlay: &mut dyn OverlayPort, position: WorldPosition) -> bool {
        let positions = self.preview_positions(position);
        let (anchor, text) = self.live_readout(position);
        let Some(floating) = self.floating.as_mut() else {
            return false;
        };

        floating.position = position;
        overlay.update_position(floating.marker, position);
        overlay.update_positions(floating.preview, &positions);
        overlay.update_position(floating.label, anchor);
        overlay.update_label_text(floating.label, &text);
        true
    }

    /// Anchor and text of the measurement shown for the edge being drawn
    ///
    /// The two-point tool shows the chord from the first point at the
    /// pointer; the path tools show the surface length of the trailing edge
    /// at its geodesic midpoint.
    fn live_readout(&self, pointer: WorldPosition) -> (WorldPosition, String) {
        if self.kind() == ShapeKind::Distance {
            let start = self.shape.points.first().map_or(pointer, |p| p.position);
            return (pointer, format_distance(chord_distance(start, pointer)));
        }
        let last = self.shape.points.last().map_or(pointer, |p| p.position);
        (midpoint(last, pointer), format_kilometers(surface_distance(last, pointer)))
    }

    /// Remove the floating marker and everything previewing it
    pub fn drop_floating(&mut self, overlay: &mut dyn OverlayPort) -> Option<FloatingPoint> {
        let floating = self.floating.take()?;
        self.release(overlay, floating.marker);
        self.release(overlay, floating.preview);
        self.release(overlay, floating.label);
        Some(floating)
    }

    /// Remove every entity drawn for this session
    pub fn teardown(&mut self, overlay: &mut dyn OverlayPort) -> usize {
        self.floating = None;
        let removed = self.owned.len();
        for handle in self.owned.drain() {
            overlay.remove_entity(handle);
        }
        removed
    }

    /// Hand over the finished shape and the handles that stay on the map
    pub fn into_parts(self) -> (Shape, HashSet<EntityHandle>) {
        (self.shape, self.owned)
    }
}
