//! Raw paints and effects into IR entries.

use crate::gradient::normalize_gradient;
use altcode_core::raw::{RawEffect, RawPaint};
use altcode_core::{
    Color, Diagnostics, Effect, ImageFill, ImageScaleMode, NodeId, PaintEntry, PaintKind, Shadow,
};

/// Convert one raw fill or stroke. Hidden paints yield `None`; unusable ones
/// are reported and dropped.
pub fn convert_paint(
    raw: &RawPaint,
    node: NodeId,
    diagnostics: &mut Diagnostics,
) -> Option<PaintEntry> {
    if !raw.is_visible() {
        return None;
    }

    let kind = match raw.kind.as_str() {
        "SOLID" => match raw.color {
            Some(color) => PaintKind::Solid(color),
            None => {
                diagnostics.warn(Some(node), "solid paint without a color; skipped");
                return None;
            }
        },
        "IMAGE" => PaintKind::Image(ImageFill {
            image_ref: raw.image_ref.clone().unwrap_or_default(),
            scale_mode: match raw.scale_mode.as_deref() {
                Some("FIT") => ImageScaleMode::Fit,
                Some("TILE") => ImageScaleMode::Tile,
                Some("CROP") => ImageScaleMode::Crop,
                _ => ImageScaleMode::Fill,
            },
        }),
        kind if kind.starts_with("GRADIENT_") => match normalize_gradient(raw) {
            Some(gradient) => PaintKind::Gradient(gradient),
            None => {
                diagnostics.warn(Some(node), format!("unusable {} paint; skipped", kind));
                return None;
            }
        },
        other => {
            diagnostics.warn(Some(node), format!("unsupported paint type: {}", other));
            return None;
        }
    };

    // Gradient stops already carry the paint opacity.
    let opacity = match kind {
        PaintKind::Gradient(_) => 1.0,
        _ => raw.opacity.unwrap_or(1.0),
    };

    Some(PaintEntry {
        kind,
        opacity,
        variable: None,
        variable_ref: raw.bound_variable.clone(),
    })
}

/// Convert one raw effect. Hidden or unknown effects yield `None`.
pub fn convert_effect(raw: &RawEffect, node: NodeId, diagnostics: &mut Diagnostics) -> Option<Effect> {
    if !raw.is_visible() {
        return None;
    }
    let shadow = || {
        let offset = raw.offset.unwrap_or_default();
        Shadow {
            color: raw.color.unwrap_or(Color::rgba(0.0, 0.0, 0.0, 0.25)),
            offset_x: offset.x,
            offset_y: offset.y,
            radius: raw.radius,
            spread: raw.spread.unwrap_or(0.0),
        }
    };
    match raw.kind.as_str() {
        "DROP_SHADOW" => Some(Effect::DropShadow(shadow())),
        "INNER_SHADOW" => Some(Effect::InnerShadow(shadow())),
        "LAYER_BLUR" => Some(Effect::LayerBlur { radius: raw.radius }),
        "BACKGROUND_BLUR" => Some(Effect::BackgroundBlur { radius: raw.radius }),
        other => {
            diagnostics.warn(Some(node), format!("unsupported effect type: {}", other));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_with_variable() {
        let raw = RawPaint {
            kind: "SOLID".to_string(),
            color: Some(Color::WHITE),
            opacity: Some(0.5),
            bound_variable: Some("VariableID:1".to_string()),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        let entry = convert_paint(&raw, NodeId(0), &mut diags).unwrap();
        assert_eq!(entry.kind, PaintKind::Solid(Color::WHITE));
        assert_eq!(entry.opacity, 0.5);
        assert_eq!(entry.variable_ref.as_deref(), Some("VariableID:1"));
        assert_eq!(entry.solid_color().map(|c| c.to_hex()), Some("#ffffff80".to_string()));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_hidden_paint_is_dropped_silently() {
        let raw = RawPaint {
            kind: "SOLID".to_string(),
            color: Some(Color::BLACK),
            visible: Some(false),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        assert!(convert_paint(&raw, NodeId(0), &mut diags).is_none());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_image_paint() {
        let raw = RawPaint {
            kind: "IMAGE".to_string(),
            image_ref: Some("abc123".to_string()),
            scale_mode: Some("FIT".to_string()),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        let entry = convert_paint(&raw, NodeId(0), &mut diags).unwrap();
        assert_eq!(
            entry.kind,
            PaintKind::Image(ImageFill {
                image_ref: "abc123".to_string(),
                scale_mode: ImageScaleMode::Fit,
            })
        );
    }

    #[test]
    fn test_unknown_paint_warns() {
        let raw = RawPaint {
            kind: "VIDEO".to_string(),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        assert!(convert_paint(&raw, NodeId(3), &mut diags).is_none());
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_effects() {
        let mut diags = Diagnostics::new();
        let raw = RawEffect {
            kind: "DROP_SHADOW".to_string(),
            radius: 4.0,
            ..Default::default()
        };
        let Some(Effect::DropShadow(shadow)) = convert_effect(&raw, NodeId(0), &mut diags) else {
            panic!("expected a drop shadow");
        };
        assert_eq!(shadow.radius, 4.0);
        assert_eq!(shadow.offset_x, 0.0);

        let blur = RawEffect {
            kind: "LAYER_BLUR".to_string(),
            radius: 8.0,
            ..Default::default()
        };
        assert_eq!(
            convert_effect(&blur, NodeId(0), &mut diags),
            Some(Effect::LayerBlur { radius: 8.0 })
        );
        assert!(diags.is_empty());
    }
}
