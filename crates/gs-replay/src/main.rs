//! GlobeSketch replay entry point
//!
//! Drives the sketch engine from a RON pointer script over a flat viewport
//! and reports every step and finished shape.

mod cli;
mod error;
mod script;
mod viewport;

use clap::Parser;
use gs_sketch::{ConfigManager, RecordingOverlay, SketchEngine, create_shared_engine};
use serde::Serialize;

use crate::cli::CliArgs;
use crate::error::ReplayError;
use crate::script::{Script, ShapeSummary, StepReport, replay};

#[derive(Debug, Serialize)]
struct ReplaySummary {
    steps: Vec<StepReport>,
    shapes: Vec<ShapeSummary>,
    entities: usize,
}

fn main() -> Result<(), ReplayError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gs_replay=debug,gs_sketch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    if args.init_config {
        let mut manager = ConfigManager::new();
        manager.reset_to_defaults();
        manager.save()?;
        println!("{}", manager.config_file_path().display());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => ConfigManager::read(path)?,
        None => ConfigManager::new().config().clone(),
    };

    let Some(script_path) = &args.script else {
        return Ok(());
    };
    let script = Script::load(script_path)?;
    tracing::info!("Replaying {} steps from {:?}", script.steps.len(), script_path);

    let overlay = RecordingOverlay::with_picker(script.viewport.picker());
    let engine = create_shared_engine(SketchEngine::with_config(overlay, config));

    let summary = {
        let mut engine = engine.lock();
        if let Some(filter) = engine.apply_theme()? {
            tracing::debug!("Base-map shader patch:\n{}", filter.shader_snippet());
        }

        let steps = replay(&script, &mut engine);
        ReplaySummary {
            steps,
            shapes: engine.finalized_shapes().iter().map(ShapeSummary::from).collect(),
            entities: engine.overlay().len(),
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &ReplaySummary) {
    for report in &summary.steps {
        println!("{:>3}  {:<28} {} [{}]", report.step, report.action, report.outcome, report.state);
    }
    for shape in &summary.shapes {
        let area = shape
            .area_km2
            .map(|a| format!(", {:.2} km²", a))
            .unwrap_or_default();
        println!(
            "{}: {} points, {:.2} m{}",
            shape.kind,
            shape.points.len(),
            shape.total_meters,
            area
        );
    }
    println!("{} entities on the map", summary.entities);
}
