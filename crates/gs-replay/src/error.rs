use gs_sketch::{ConfigError, SketchError};
use thiserror::Error;

/// Replay errors
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid script: {0}")]
    Script(#[from] ron::error::SpannedError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sketch(#[from] SketchError),

    #[error("Failed to write summary: {0}")]
    Summary(#[from] serde_json::Error),
}
