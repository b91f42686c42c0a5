//! Raw design-tree records as exported by the host design tool.
//!
//! These are deliberately loose: every field except `type` is optional and the
//! normalizer fills in defaults. Field names follow the host's camelCase JSON.

use crate::types::{Color, Rect};
use serde::Deserialize;
use std::collections::HashMap;

/// A document as handed to the converter: selected roots plus the data the
/// static host answers collaborator calls from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub nodes: Vec<DesignNode>,
    /// Variable id → resolved variable.
    #[serde(default)]
    pub variables: HashMap<String, RawVariable>,
    /// Node id → exported vector markup.
    #[serde(default)]
    pub vector_markup: HashMap<String, String>,
}

impl RawDocument {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A variable as stored in a raw document.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVariable {
    pub name: String,
    pub value: Color,
}

/// One node of the raw design tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub visible: Option<bool>,
    /// Axis-aligned box enclosing the rotated shape, in document coordinates.
    pub absolute_bounding_box: Option<Rect>,
    /// Rotation in design-tool degrees (counter-clockwise positive).
    pub rotation: f64,
    pub opacity: Option<f64>,
    pub fills: Vec<RawPaint>,
    pub strokes: Vec<RawPaint>,
    pub stroke_weight: Option<f64>,
    pub stroke_align: Option<String>,
    pub corner_radius: Option<f64>,
    /// Top-left, top-right, bottom-right, bottom-left.
    pub rectangle_corner_radii: Option<[f64; 4]>,
    pub effects: Vec<RawEffect>,
    pub clips_content: bool,

    // Auto-layout
    pub layout_mode: Option<String>,
    pub layout_wrap: Option<String>,
    pub primary_axis_align_items: Option<String>,
    pub counter_axis_align_items: Option<String>,
    pub primary_axis_sizing_mode: Option<String>,
    pub counter_axis_sizing_mode: Option<String>,
    pub layout_sizing_horizontal: Option<String>,
    pub layout_sizing_vertical: Option<String>,
    pub layout_positioning: Option<String>,
    pub item_spacing: Option<f64>,
    pub padding_top: Option<f64>,
    pub padding_right: Option<f64>,
    pub padding_bottom: Option<f64>,
    pub padding_left: Option<f64>,

    // Text
    pub characters: Option<String>,
    pub segments: Vec<RawTextSegment>,
    pub font_size: Option<f64>,
    pub font_weight: Option<u16>,
    pub font_name: Option<RawFontName>,
    pub text_align_horizontal: Option<String>,
    pub text_auto_resize: Option<String>,

    // Export
    pub export_settings: Vec<RawExportSetting>,
    /// Explicit "always export as vector" marker.
    pub is_asset: bool,

    pub children: Vec<DesignNode>,
}

impl DesignNode {
    /// Hidden nodes are dropped by the normalizer.
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    /// Whether the host flags this node for SVG export.
    pub fn exports_as_vector(&self) -> bool {
        self.is_asset
            || self
                .export_settings
                .iter()
                .any(|s| s.format.eq_ignore_ascii_case("SVG"))
    }
}

/// A fill or stroke paint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPaint {
    #[serde(rename = "type")]
    pub kind: String,
    pub visible: Option<bool>,
    pub opacity: Option<f64>,
    pub color: Option<Color>,
    pub gradient_stops: Vec<RawGradientStop>,
    /// Start, end, and width handles in normalized node space.
    pub gradient_handle_positions: Vec<RawVector>,
    pub image_ref: Option<String>,
    pub scale_mode: Option<String>,
    /// Symbolic variable id bound to this paint.
    pub bound_variable: Option<String>,
}

impl RawPaint {
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawVector {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawGradientStop {
    pub position: f64,
    pub color: Color,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEffect {
    #[serde(rename = "type")]
    pub kind: String,
    pub visible: Option<bool>,
    pub color: Option<Color>,
    pub offset: Option<RawVector>,
    pub radius: f64,
    pub spread: Option<f64>,
}

impl RawEffect {
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }
}

/// A run of uniformly styled characters as reported by the host.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTextSegment {
    pub characters: String,
    pub font_size: Option<f64>,
    pub font_weight: Option<u16>,
    pub font_name: Option<RawFontName>,
    pub text_decoration: Option<String>,
    pub text_case: Option<String>,
    pub letter_spacing: Option<RawUnitValue>,
    pub line_height: Option<RawUnitValue>,
    pub fills: Vec<RawPaint>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawFontName {
    pub family: String,
    #[serde(default)]
    pub style: String,
}

/// A value with a unit (`PIXELS`, `PERCENT`, or `AUTO`).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct RawUnitValue {
    pub value: f64,
    pub unit: RawUnit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RawUnit {
    #[default]
    Pixels,
    Percent,
    Auto,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawExportSetting {
    pub format: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_node_defaults() {
        let node: DesignNode = serde_json::from_str(r#"{"type": "FRAME"}"#).unwrap();
        assert_eq!(node.kind, "FRAME");
        assert!(node.is_visible());
        assert!(node.children.is_empty());
        assert!(node.absolute_bounding_box.is_none());
    }

    #[test]
    fn test_document_with_host_data() {
        let doc = RawDocument::from_json(
            r##"{
                "nodes": [{"id": "1:1", "name": "Icon", "type": "VECTOR",
                           "exportSettings": [{"format": "SVG"}]}],
                "variables": {"v1": {"name": "brand/primary", "value": {"r": 1, "g": 0, "b": 0}}},
                "vectorMarkup": {"1:1": "<svg/>"}
            }"##,
        )
        .unwrap();
        assert_eq!(doc.nodes.len(), 1);
        assert!(doc.nodes[0].exports_as_vector());
        assert_eq!(doc.variables["v1"].value.a, 1.0);
        assert_eq!(doc.vector_markup["1:1"], "<svg/>");
    }
}
