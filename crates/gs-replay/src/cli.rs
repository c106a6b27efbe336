//! Command line interface for the replay tool

use std::path::PathBuf;

use clap::Parser;

/// Replay a pointer script through the sketch engine
///
/// Examples:
///   gs-replay scripts/triangle.ron
///   gs-replay scripts/triangle.ron --json
///   gs-replay scripts/triangle.ron --config my-styles.ron
///   gs-replay --init-config
#[derive(Parser, Debug, Clone)]
#[clap(name = "gs-replay", version, about = "Replay pointer scripts through the GlobeSketch engine")]
pub struct CliArgs {
    /// RON script to replay
    #[clap(required_unless_present = "init_config")]
    pub script: Option<PathBuf>,

    /// Engine configuration to use instead of the one in the user config directory
    #[clap(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Print the replay summary as JSON
    #[clap(long)]
    pub json: bool,

    /// Write the default configuration to the user config directory and exit
    #[clap(long = "init-config")]
    pub init_config: bool,
}
