//! Framework backends.
//!
//! Each backend is a stateless unit struct implementing [`Backend`]; the
//! engine looks them up in a static table.
//!
//! [`Backend`]: crate::engine::Backend

mod compose;
mod flutter;
mod html;
mod markup;
mod swiftui;
mod tailwind;

pub use compose::ComposeBackend;
pub use flutter::FlutterBackend;
pub use html::HtmlBackend;
pub use swiftui::SwiftUiBackend;
pub use tailwind::TailwindBackend;

use crate::engine::EmitContext;
use crate::format::top_paint;
use altcode_core::{
    AltNode, Color, Direction, PaintEntry, PaintKind, SizingMode, TextAutoResize, TextCase,
    TextRun,
};

/// Resolved size along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Dim {
    Fixed(f64),
    /// Sized by content.
    Hug,
    /// Stretches along the parent's flow.
    Fill,
}

/// Horizontal and vertical size of `node` as its backend should express it.
pub(crate) fn dims(node: &AltNode) -> (Dim, Dim) {
    let resize = node.text.as_ref().map(|t| t.auto_resize).unwrap_or_default();
    let axis = |mode: SizingMode, fixed: f64, hugs_text: bool| match mode {
        SizingMode::Fill => Dim::Fill,
        SizingMode::Hug => Dim::Hug,
        SizingMode::Fixed if hugs_text => Dim::Hug,
        SizingMode::Fixed => Dim::Fixed(fixed),
    };
    (
        axis(
            node.sizing.horizontal,
            node.geometry.width,
            resize == TextAutoResize::WidthAndHeight,
        ),
        axis(
            node.sizing.vertical,
            node.geometry.height,
            resize != TextAutoResize::None,
        ),
    )
}

/// Whether a `Fill` axis of `node` runs along its parent's main axis.
pub(crate) fn fills_main_axis(node: &AltNode, horizontal: bool, cx: &EmitContext) -> bool {
    match cx.parent_layout(node).map(|layout| layout.direction) {
        Some(Direction::Row) => horizontal,
        Some(Direction::Column) => !horizontal,
        None => false,
    }
}

/// Start and end points of a linear gradient in unit coordinates (y down),
/// from a CSS angle.
pub(crate) fn unit_points(angle_degrees: f64) -> ((f64, f64), (f64, f64)) {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    (
        (0.5 - sin / 2.0, 0.5 + cos / 2.0),
        (0.5 + sin / 2.0, 0.5 - cos / 2.0),
    )
}

/// The fill painting a text run: its own, or the node's top fill.
pub(crate) fn run_fill<'a>(node: &'a AltNode, run: &TextRun) -> Option<&'a PaintEntry> {
    run.fill_ref
        .and_then(|index| node.paint.fills.get(index))
        .or_else(|| top_paint(&node.paint.fills))
}

/// Solid color of a text run for toolkits without gradient text. Gradients
/// fall back to their first stop.
pub(crate) fn native_text_color(
    node: &AltNode,
    run: &TextRun,
    toolkit: &str,
    cx: &mut EmitContext,
) -> Option<Color> {
    let fill = run_fill(node, run)?;
    match &fill.kind {
        PaintKind::Solid(_) => fill.solid_color(),
        PaintKind::Gradient(gradient) => {
            cx.warn(
                node,
                format!("gradient text fills are not supported by {}; using the first stop", toolkit),
            );
            gradient.stops().first().map(|stop| stop.effective_color())
        }
        PaintKind::Image(_) => {
            cx.warn(node, "image fills on text are not supported; skipped");
            None
        }
    }
}

/// Characters with the run's case transform applied, for toolkits that
/// cannot transform at render time.
pub(crate) fn apply_case(text: &str, case: TextCase) -> String {
    match case {
        TextCase::Original => text.to_string(),
        TextCase::Upper => text.to_uppercase(),
        TextCase::Lower => text.to_lowercase(),
        TextCase::Title => {
            let mut out = String::with_capacity(text.len());
            let mut at_word_start = true;
            for c in text.chars() {
                if at_word_start {
                    out.extend(c.to_uppercase());
                } else {
                    out.push(c);
                }
                at_word_start = c.is_whitespace();
            }
            out
        }
    }
}

/// Identifier-safe lowercase resource name: `Icon 01` becomes `icon_01`.
pub(crate) fn resource_name(unique_name: &str) -> String {
    let name: String = unique_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) || name.is_empty() {
        format!("ic_{}", name)
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use altcode_core::{NodeKind, TextContent};

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_unit_points() {
        let (start, end) = unit_points(180.0);
        assert!(close(start, (0.5, 0.0)));
        assert!(close(end, (0.5, 1.0)));
        let (start, end) = unit_points(90.0);
        assert!(close(start, (0.0, 0.5)));
        assert!(close(end, (1.0, 0.5)));
    }

    #[test]
    fn test_auto_width_text_hugs() {
        let node = AltNode::new(NodeKind::Text, "Label")
            .with_size(80.0, 20.0)
            .with_text(TextContent {
                auto_resize: TextAutoResize::WidthAndHeight,
                ..Default::default()
            });
        assert_eq!(dims(&node), (Dim::Hug, Dim::Hug));

        let fixed = AltNode::new(NodeKind::Rectangle, "Box").with_size(80.0, 20.0);
        assert_eq!(dims(&fixed), (Dim::Fixed(80.0), Dim::Fixed(20.0)));
    }

    #[test]
    fn test_apply_case() {
        assert_eq!(apply_case("hello big world", TextCase::Title), "Hello Big World");
        assert_eq!(apply_case("Mixed", TextCase::Upper), "MIXED");
        assert_eq!(apply_case("Mixed", TextCase::Original), "Mixed");
    }

    #[test]
    fn test_resource_name() {
        assert_eq!(resource_name("Icon 01"), "icon_01");
        assert_eq!(resource_name("3D"), "ic_3d");
    }
}
