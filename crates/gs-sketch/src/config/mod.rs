//! Engine configuration
//!
//! Styles, label text and the base-map filter, stored as RON in the user's
//! config directory.

mod manager;

pub use manager::{ConfigError, ConfigManager};

use serde::{Deserialize, Serialize};

use crate::style::StyleConfig;
use crate::theme::ThemeConfig;

/// Label text settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LabelConfig {
    /// Appended to the polygon area value
    pub area_suffix: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            area_suffix: " km²".into(),
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SketchConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub styles: StyleConfig,
    #[serde(default)]
    pub labels: LabelConfig,
    /// Base-map filter
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl SketchConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            ..Default::default()
        }
    }
}
