//! Base-map color filter
//!
//! Computes the invert-and-tint filter for the globe imagery and the shader
//! lines that apply it. Applying the filter is up to the host renderer
//! through [`ThemePort`].

use serde::{Deserialize, Serialize};

use crate::SketchError;

/// Line of the globe fragment shader the filter code is inserted after
pub const SATURATION_ANCHOR: &str = "color = czm_saturation(color, textureSaturation);\n#endif\n";

/// Renderer capability for applying a base-map filter
pub trait ThemePort {
    fn set_filter(&mut self, filter: &ThemeFilter);
}

/// Base-map filter settings as stored in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Apply the filter at all
    pub enabled: bool,
    /// Invert imagery colors before tinting
    pub invert: bool,
    /// Tint color as `#rgb` or `#rrggbb`
    pub color: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            invert: true,
            color: "#4e70a6".into(),
        }
    }
}

/// A resolved base-map filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeFilter {
    pub invert: bool,
    /// Per-channel multiplier, 255 leaves the channel unchanged
    pub rgb: [u8; 3],
}

impl ThemeFilter {
    /// Build a filter from a hex tint color
    ///
    /// Black and white tints are treated as "no tint".
    pub fn from_hex(invert: bool, color: &str) -> Result<Self, SketchError> {
        let rgb = match parse_hex_color(color)? {
            [0, 0, 0] => [255, 255, 255],
            rgb => rgb,
        };
        Ok(Self { invert, rgb })
    }

    /// Build the configured filter, or `None` when disabled
    pub fn from_config(config: &ThemeConfig) -> Result<Option<Self>, SketchError> {
        if !config.enabled {
            return Ok(None);
        }
        Self::from_hex(config.invert, &config.color).map(Some)
    }

    /// Shader statements applying the filter to `color`
    ///
    /// Empty when the filter does not invert; tinting only happens together
    /// with inversion.
    pub fn shader_snippet(&self) -> String {
        if !self.invert {
            return String::new();
        }
        let [r, g, b] = self.rgb;
        format!(
            "color.r = 1.0 - color.r;\n\
             color.g = 1.0 - color.g;\n\
             color.b = 1.0 - color.b;\n\
             color.r = color.r * {r}.0/255.0;\n\
             color.g = color.g * {g}.0/255.0;\n\
             color.b = color.b * {b}.0/255.0;\n"
        )
    }

    /// Insert the filter into a globe fragment shader source
    ///
    /// Returns `None` if the source has no saturation anchor.
    pub fn patch_fragment_source(&self, source: &str) -> Option<String> {
        if !source.contains(SATURATION_ANCHOR) {
            return None;
        }
        let replacement = format!("{}{}", SATURATION_ANCHOR, self.shader_snippet());
        Some(source.replacen(SATURATION_ANCHOR, &replacement, 1))
    }
}

/// Parse `#rgb` or `#rrggbb` (case-insensitive) into channel values
pub fn parse_hex_color(color: &str) -> Result<[u8; 3], SketchError> {
    let invalid = || SketchError::InvalidColor(color.to_owned());
    let digits = color.strip_prefix('#').ok_or_else(invalid)?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_owned(),
        _ => return Err(invalid()),
    };

    let mut rgb = [0u8; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        *channel = u8::from_str_radix(&expanded[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
    }
    Ok(rgb)
}
