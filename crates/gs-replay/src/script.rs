//! Pointer scripts and their replay

use std::path::Path;

use gs_geodesy::Ellipsoid;
use gs_sketch::{EventOutcome, PointerEvent, RecordingOverlay, Shape, ShapeKind, SketchEngine};
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::ReplayError;
use crate::viewport::FlatViewport;

/// One host action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScriptStep {
    /// Pick a tool
    Start(ShapeKind),
    Click(f64, f64),
    Move(f64, f64),
    RightClick(f64, f64),
    Cancel,
    ClearAll,
}

impl ScriptStep {
    /// Pointer event for this step, if it is one
    pub fn pointer_event(&self) -> Option<PointerEvent> {
        match *self {
            ScriptStep::Click(x, y) => Some(PointerEvent::PrimaryClick(DVec2::new(x, y))),
            ScriptStep::Move(x, y) => Some(PointerEvent::PointerMove(DVec2::new(x, y))),
            ScriptStep::RightClick(x, y) => Some(PointerEvent::SecondaryClick(DVec2::new(x, y))),
            _ => None,
        }
    }
}

/// A replayable session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub viewport: FlatViewport,
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn parse(source: &str) -> Result<Self, ReplayError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }
}

/// What one step did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub action: String,
    pub outcome: String,
    pub state: String,
}

/// A finished shape in geographic terms
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeSummary {
    pub kind: ShapeKind,
    /// (longitude, latitude) in degrees
    pub points: Vec<[f64; 2]>,
    pub segment_meters: Vec<f64>,
    pub total_meters: f64,
    pub area_km2: Option<f64>,
}

impl From<&Shape> for ShapeSummary {
    fn from(shape: &Shape) -> Self {
        let points = shape
            .points
            .iter()
            .map(|p| {
                let geo = Ellipsoid::WGS84.cartesian_to_geographic(p.position);
                [geo.longitude_degrees(), geo.latitude_degrees()]
            })
            .collect();
        Self {
            kind: shape.kind,
            points,
            segment_meters: shape
                .segments
                .iter()
                .chain(shape.closing_segment.iter())
                .map(|s| s.distance_meters)
                .collect(),
            total_meters: shape.total_distance(),
            area_km2: shape.area_km2,
        }
    }
}

fn describe(outcome: &EventOutcome) -> String {
    match outcome {
        EventOutcome::Ignored(reason) => format!("ignored ({})", reason),
        EventOutcome::PointCommitted { index } => format!("point {} committed", index),
        EventOutcome::PreviewMoved => "preview moved".into(),
        EventOutcome::Finalized(shape) => format!("{} finalized", shape.kind),
        EventOutcome::Cancelled => "cancelled".into(),
        EventOutcome::ValidationFailed(error) => format!("rejected: {}", error),
    }
}

/// Apply every step to the engine in order
pub fn replay(script: &Script, engine: &mut SketchEngine<RecordingOverlay>) -> Vec<StepReport> {
    script
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let outcome = match step {
                ScriptStep::Start(kind) => {
                    engine.start_draw(*kind);
                    format!("{} started", kind)
                }
                ScriptStep::Cancel => match engine.cancel() {
                    true => "cancelled".to_string(),
                    false => "nothing to cancel".to_string(),
                },
                ScriptStep::ClearAll => {
                    engine.clear_all();
                    "cleared".to_string()
                }
                pointer => match pointer.pointer_event() {
                    Some(event) => {
                        let outcome = engine.handle_event(event);
                        if let Some(error) = outcome.user_error() {
                            tracing::warn!("Step {}: {}", i + 1, error);
                        }
                        describe(&outcome)
                    }
                    None => "skipped".to_string(),
                },
            };
            tracing::debug!("Step {} {:?}: {}", i + 1, step, outcome);
            StepReport {
                step: i + 1,
                action: format!("{:?}", step),
                outcome,
                state: engine.state().to_string(),
            }
        })
        .collect()
}
