//! Visual styles handed to the overlay with every entity
//!
//! Defaults follow the measurement look: wheat-colored vertices and glowing
//! path lines with white-on-black labels, and a thin yellow line with a dark
//! translucent label for the two-point tool.

use serde::{Deserialize, Serialize};

/// Linear RGBA color, components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    pub const WHITE: Rgba = Rgba([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Rgba = Rgba([0.0, 0.0, 0.0, 1.0]);
    pub const YELLOW: Rgba = Rgba([1.0, 1.0, 0.0, 1.0]);
    pub const WHEAT: Rgba = Rgba([0.961, 0.871, 0.702, 1.0]);
    pub const CHARCOAL: Rgba = Rgba([0.165, 0.165, 0.165, 0.8]);

    /// Same color with a different alpha
    pub fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, _] = self.0;
        Rgba([r, g, b, alpha])
    }
}

/// Text label appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    /// CSS-like font description
    pub font: String,
    pub fill_color: Rgba,
    /// Background box color, or none for bare text
    pub background: Option<Rgba>,
    /// Screen-space offset from the anchor, in pixels
    pub pixel_offset: [f32; 2],
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font: "20px sans-serif".into(),
            fill_color: Rgba::WHITE,
            background: Some(Rgba::BLACK),
            pixel_offset: [0.0, 0.0],
        }
    }
}

/// Point marker appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub color: Rgba,
    pub pixel_size: f32,
    pub outline_width: f32,
    /// Style of the vertex number drawn with the marker
    pub label: LabelStyle,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: Rgba::WHEAT,
            pixel_size: 5.0,
            outline_width: 3.0,
            label: LabelStyle {
                font: "30px sans-serif".into(),
                ..LabelStyle::default()
            },
        }
    }
}

/// Polyline appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Rgba,
    pub width: f32,
    /// Draw with a glow material
    pub glow: bool,
    /// Drape the line over terrain
    pub clamp_to_ground: bool,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Rgba::WHEAT,
            width: 5.0,
            glow: true,
            clamp_to_ground: true,
        }
    }
}

/// Filled polygon appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillStyle {
    pub color: Rgba,
}

impl Default for FillStyle {
    fn default() -> Self {
        Self {
            color: Rgba::WHEAT.with_alpha(0.4),
        }
    }
}

/// All styles the engine draws with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Committed vertices
    pub vertex: MarkerStyle,
    /// The point following the pointer
    pub floating: MarkerStyle,
    /// Committed path and polygon edges
    pub segment: LineStyle,
    /// Live edge from the last vertex to the pointer
    pub preview_line: LineStyle,
    /// Finished polygon fill
    pub fill: FillStyle,
    /// Live polygon fill while sketching
    pub preview_fill: FillStyle,
    /// Edge length labels of the path and polygon tools
    pub distance_label: LabelStyle,
    /// Polygon area label
    pub area_label: LabelStyle,
    /// Two-point tool line
    pub measure_line: LineStyle,
    /// Two-point tool label
    pub measure_label: LabelStyle,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            vertex: MarkerStyle::default(),
            floating: MarkerStyle::default(),
            segment: LineStyle::default(),
            preview_line: LineStyle::default(),
            fill: FillStyle::default(),
            preview_fill: FillStyle::default(),
            distance_label: LabelStyle::default(),
            area_label: LabelStyle {
                pixel_offset: [60.0, -60.0],
                ..LabelStyle::default()
            },
            measure_line: LineStyle {
                color: Rgba::YELLOW,
                width: 2.0,
                glow: false,
                clamp_to_ground: true,
            },
            measure_label: LabelStyle {
                font: "14px sans-serif".into(),
                fill_color: Rgba::YELLOW,
                background: Some(Rgba::CHARCOAL),
                pixel_offset: [0.0, -25.0],
            },
        }
    }
}
