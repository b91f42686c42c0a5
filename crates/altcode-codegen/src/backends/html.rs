//! HTML with inline CSS, or a React component in JSX mode.

use super::markup::{self, StyleAttr};
use super::{dims, fills_main_axis, run_fill, Dim};
use crate::engine::{Backend, EmitContext};
use crate::error::Result;
use crate::format::{css_color, css_gradient, css_solid, css_string, escape_html, num, px, top_paint};
use crate::fragment::Fragment;
use altcode_core::{
    AltNode, BackendKind, CornerRadius, CounterAlign, Direction, Effect, ImageScaleMode,
    LayoutDescriptor, LineHeight, NodeKind, Padding, PaintEntry, PaintKind, PrimaryAlign,
    RunConfig, StrokeAlign, TextAlign, TextCase, TextDecoration, TextRun,
};

pub struct HtmlBackend;

impl HtmlBackend {
    fn with_size(fragment: Fragment, property: &str, dim: Dim, main_axis: bool) -> Fragment {
        match dim {
            Dim::Fixed(value) => fragment.with_style(property, px(value)),
            Dim::Hug => fragment,
            Dim::Fill if main_axis => fragment.with_style("flex", "1 1 0"),
            Dim::Fill => fragment.with_style("align-self", "stretch"),
        }
    }

    fn with_layout(fragment: Fragment, node: &AltNode, layout: &LayoutDescriptor, cx: &mut EmitContext) -> Fragment {
        let mut f = fragment.with_style("display", "flex");
        if layout.direction == Direction::Column {
            f = f.with_style("flex-direction", "column");
        }
        if layout.wrap {
            f = f.with_style("flex-wrap", "wrap");
        }
        f = match layout.primary_align {
            PrimaryAlign::Start => f,
            PrimaryAlign::Center => f.with_style("justify-content", "center"),
            PrimaryAlign::End => f.with_style("justify-content", "flex-end"),
            PrimaryAlign::SpaceBetween => f.with_style("justify-content", "space-between"),
        };
        f = f.with_style(
            "align-items",
            match layout.counter_align {
                CounterAlign::Start => "flex-start",
                CounterAlign::Center => "center",
                CounterAlign::End => "flex-end",
                CounterAlign::Baseline => "baseline",
            },
        );
        if layout.primary_align != PrimaryAlign::SpaceBetween {
            if layout.gap < 0.0 {
                cx.warn(node, format!("negative gap {} clamped to 0", num(layout.gap)));
            } else if layout.gap > 0.0 {
                f = f.with_style("gap", px(layout.gap));
            }
        }
        match css_padding(&layout.padding) {
            Some(padding) => f.with_style("padding", padding),
            None => f,
        }
    }

    fn run_styles(fragment: Fragment, node: &AltNode, run: &TextRun, cx: &mut EmitContext) -> Fragment {
        let mut f = fragment
            .with_style("font-family", css_string(&run.font_family))
            .with_style("font-size", px(run.font_size));
        if run.font_weight != 400 {
            f = f.with_style("font-weight", run.font_weight.to_string());
        }
        if run.italic {
            f = f.with_style("font-style", "italic");
        }
        f = match run.decoration {
            TextDecoration::None => f,
            TextDecoration::Underline => f.with_style("text-decoration", "underline"),
            TextDecoration::Strikethrough => f.with_style("text-decoration", "line-through"),
        };
        f = match run.case_transform {
            TextCase::Original => f,
            TextCase::Upper => f.with_style("text-transform", "uppercase"),
            TextCase::Lower => f.with_style("text-transform", "lowercase"),
            TextCase::Title => f.with_style("text-transform", "capitalize"),
        };
        if run.letter_spacing != 0.0 {
            f = f.with_style("letter-spacing", px(run.letter_spacing));
        }
        f = match run.line_height {
            LineHeight::Auto => f,
            LineHeight::Pixels(value) => f.with_style("line-height", px(value)),
            LineHeight::Percent(value) => f.with_style("line-height", format!("{}%", num(value))),
        };
        match run_fill(node, run) {
            Some(fill) => text_fill(f, node, fill, cx),
            None => f,
        }
    }
}

fn text_fill(fragment: Fragment, node: &AltNode, fill: &PaintEntry, cx: &mut EmitContext) -> Fragment {
    match &fill.kind {
        PaintKind::Solid(_) => match css_solid(fill, cx.config.use_variables) {
            Some(color) => fragment.with_style("color", color),
            None => fragment,
        },
        PaintKind::Gradient(gradient) => fragment
            .with_style("background", css_gradient(gradient))
            .with_style("-webkit-background-clip", "text")
            .with_style("color", "transparent"),
        PaintKind::Image(_) => {
            cx.warn(node, "image fills on text are not supported; skipped");
            fragment
        }
    }
}

/// Shorthand `padding` value, or `None` when there is none.
pub(crate) fn css_padding(padding: &Padding) -> Option<String> {
    if padding.is_zero() {
        None
    } else if padding.is_uniform() {
        Some(px(padding.top))
    } else if padding.is_symmetric() {
        Some(format!("{} {}", px(padding.top), px(padding.left)))
    } else {
        Some(format!(
            "{} {} {} {}",
            px(padding.top),
            px(padding.right),
            px(padding.bottom),
            px(padding.left)
        ))
    }
}

pub(crate) fn css_shadow(effect: &Effect) -> Option<String> {
    let (shadow, inset) = match effect {
        Effect::DropShadow(shadow) => (shadow, ""),
        Effect::InnerShadow(shadow) => (shadow, "inset "),
        _ => return None,
    };
    Some(format!(
        "{}{} {} {} {} {}",
        inset,
        px(shadow.offset_x),
        px(shadow.offset_y),
        px(shadow.radius),
        px(shadow.spread),
        css_color(&shadow.color)
    ))
}

impl Backend for HtmlBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Html
    }

    fn with_position_styles(&self, fragment: Fragment, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let mut f = fragment;
        if cx.is_absolute(node) {
            f = f
                .with_style("position", "absolute")
                .with_style("left", px(node.geometry.x))
                .with_style("top", px(node.geometry.y));
        }
        let (width, height) = dims(node);
        f = Self::with_size(f, "width", width, fills_main_axis(node, true, cx));
        f = Self::with_size(f, "height", height, fills_main_axis(node, false, cx));
        if node.geometry.is_rotated() {
            f = f.with_style("transform", format!("rotate({}deg)", num(node.geometry.rotation_degrees)));
        }
        if node.opacity < 1.0 {
            f = f.with_style("opacity", num(node.opacity));
        }
        f
    }

    fn with_shape_styles(&self, fragment: Fragment, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let mut f = fragment;

        if node.kind != NodeKind::Text {
            if let Some(fill) = top_paint(&node.paint.fills) {
                f = match &fill.kind {
                    PaintKind::Solid(_) => match css_solid(fill, cx.config.use_variables) {
                        Some(color) => f.with_style("background-color", color),
                        None => f,
                    },
                    PaintKind::Gradient(gradient) => f.with_style("background", css_gradient(gradient)),
                    PaintKind::Image(image) => {
                        let f = f.with_style("background-image", format!("url('{}')", image.image_ref));
                        match image.scale_mode {
                            ImageScaleMode::Fill | ImageScaleMode::Crop => {
                                f.with_style("background-size", "cover")
                            }
                            ImageScaleMode::Fit => f
                                .with_style("background-size", "contain")
                                .with_style("background-repeat", "no-repeat"),
                            ImageScaleMode::Tile => f.with_style("background-repeat", "repeat"),
                        }
                    }
                };
            }
        }

        if node.has_visible_stroke() {
            let stroke = node
                .paint
                .strokes
                .iter()
                .rev()
                .find_map(|entry| css_solid(entry, cx.config.use_variables));
            match stroke {
                Some(color) => {
                    let property = match node.stroke.align {
                        StrokeAlign::Outside => "outline",
                        StrokeAlign::Inside | StrokeAlign::Center => "border",
                    };
                    f = f.with_style(property, format!("{} solid {}", px(node.stroke.weight), color));
                }
                None => cx.warn(node, "only solid strokes are supported; stroke skipped"),
            }
        }

        if node.kind == NodeKind::Ellipse {
            f = f.with_style("border-radius", "50%");
        } else if !node.corner_radius.is_zero() {
            f = match node.corner_radius {
                CornerRadius::Uniform(r) => f.with_style("border-radius", px(r)),
                CornerRadius::PerCorner([tl, tr, br, bl]) => f.with_style(
                    "border-radius",
                    format!("{} {} {} {}", px(tl), px(tr), px(br), px(bl)),
                ),
            };
        }

        let shadows: Vec<String> = node.effects.iter().filter_map(css_shadow).collect();
        if !shadows.is_empty() {
            if node.kind == NodeKind::Text {
                let text_shadows: Vec<String> = node
                    .effects
                    .iter()
                    .filter_map(|effect| match effect {
                        Effect::DropShadow(s) => Some(format!(
                            "{} {} {} {}",
                            px(s.offset_x),
                            px(s.offset_y),
                            px(s.radius),
                            css_color(&s.color)
                        )),
                        _ => None,
                    })
                    .collect();
                if text_shadows.len() < shadows.len() {
                    cx.warn(node, "inner shadows on text are not supported; skipped");
                }
                if !text_shadows.is_empty() {
                    f = f.with_style("text-shadow", text_shadows.join(", "));
                }
            } else {
                f = f.with_style("box-shadow", shadows.join(", "));
            }
        }
        for effect in &node.effects {
            f = match effect {
                Effect::LayerBlur { radius } => f.with_style("filter", format!("blur({})", px(*radius))),
                Effect::BackgroundBlur { radius } => {
                    f.with_style("backdrop-filter", format!("blur({})", px(*radius)))
                }
                _ => f,
            };
        }

        if node.clips_content {
            f = f.with_style("overflow", "hidden");
        }
        f
    }

    fn text(&self, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let mode = cx.config.markup_mode;
        let mut f = Fragment::new("p").with_style("margin", "0");
        if let Some(text) = &node.text {
            f = match text.align {
                TextAlign::Left => f,
                TextAlign::Center => f.with_style("text-align", "center"),
                TextAlign::Right => f.with_style("text-align", "right"),
                TextAlign::Justified => f.with_style("text-align", "justify"),
            };
            match text.runs.as_slice() {
                [] => {}
                [run] => {
                    f = Self::run_styles(f, node, run, cx)
                        .with_content(markup::escape_text(&run.characters, mode));
                }
                runs => {
                    for run in runs {
                        let span = Fragment::new("span")
                            .with_content(markup::escape_text(&run.characters, mode));
                        f = f.with_child(Self::run_styles(span, node, run, cx));
                    }
                }
            }
        }
        let f = self.with_shape_styles(f, node, cx);
        self.with_position_styles(f, node, cx)
    }

    fn vector(&self, node: &AltNode, markup: &str, cx: &mut EmitContext) -> Fragment {
        let f = markup::vector_fragment(markup, cx.config.markup_mode);
        self.with_position_styles(f, node, cx)
    }

    fn shape(&self, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let f = self.with_shape_styles(Fragment::new("div"), node, cx);
        self.with_position_styles(f, node, cx)
    }

    fn container(
        &self,
        node: &AltNode,
        children: Vec<(&AltNode, Fragment)>,
        cx: &mut EmitContext,
    ) -> Fragment {
        let mut f = Fragment::new("div");
        if let Some(layout) = &node.layout {
            f = Self::with_layout(f, node, layout, cx);
        }
        if children.iter().any(|(child, _)| cx.is_absolute(child)) {
            f = f.with_style("position", "relative");
        }
        f = f.with_children(children.into_iter().map(|(_, fragment)| fragment));
        let f = self.with_shape_styles(f, node, cx);
        self.with_position_styles(f, node, cx)
    }

    fn with_layer_name(&self, fragment: Fragment, node: &AltNode) -> Fragment {
        fragment.with_arg("data-layer", escape_html(&node.name))
    }

    fn render(&self, fragment: &Fragment, cx: &EmitContext) -> String {
        markup::render(fragment, cx.config.markup_mode, StyleAttr::Inline)
    }

    fn document(&self, name: &str, bodies: &[String], config: &RunConfig) -> Result<String> {
        markup::document(name, bodies, config.markup_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::emit;
    use altcode_core::{
        AltTree, CancellationFlag, Color, MarkupMode, Positioning, Shadow, TextContent,
        VariableBinding,
    };
    use altcode_resolver::Palette;
    use pretty_assertions::assert_eq;

    fn label(text: &str) -> AltNode {
        let mut node = AltNode::new(NodeKind::Text, "Label").with_text(TextContent {
            runs: vec![TextRun {
                characters: text.to_string(),
                font_size: 14.0,
                font_weight: 600,
                font_family: "Inter".to_string(),
                italic: false,
                decoration: TextDecoration::None,
                case_transform: TextCase::Original,
                fill_ref: Some(0),
                letter_spacing: 0.0,
                line_height: LineHeight::Auto,
            }],
            auto_resize: altcode_core::TextAutoResize::WidthAndHeight,
            ..Default::default()
        });
        node.paint.fills.push(PaintEntry::solid(Color::from_rgb8(17, 24, 39)));
        node.unique_name = "Label".to_string();
        node
    }

    fn card() -> AltTree {
        let mut tree = AltTree::new();
        let mut layout = LayoutDescriptor::new(Direction::Column);
        layout.gap = 8.0;
        layout.padding = Padding::uniform(16.0);
        let mut root = AltNode::new(NodeKind::Container, "Card")
            .with_size(240.0, 120.0)
            .with_layout(layout)
            .with_fill(PaintEntry::solid(Color::WHITE));
        root.unique_name = "Card".to_string();
        root.corner_radius = CornerRadius::Uniform(8.0);
        root.effects.push(Effect::DropShadow(Shadow {
            color: Color::rgba(0.0, 0.0, 0.0, 0.25),
            offset_x: 0.0,
            offset_y: 4.0,
            radius: 8.0,
            spread: 0.0,
        }));
        let root = tree.insert(root, None);
        tree.insert(label("Hello & welcome"), Some(root));
        let mut badge = AltNode::new(NodeKind::Ellipse, "Badge").with_size(8.0, 8.0);
        badge.unique_name = "Badge".to_string();
        badge.positioning = Positioning::Absolute;
        badge.geometry.x = 228.0;
        badge.geometry.y = 4.0;
        badge.paint.fills.push(PaintEntry {
            variable: Some(VariableBinding {
                name: "Accent".to_string(),
                fallback_hex: "#ef4444".to_string(),
            }),
            ..PaintEntry::solid(Color::from_rgb8(239, 68, 68))
        });
        tree.insert(badge, Some(root));
        tree
    }

    fn run(tree: &AltTree, config: &RunConfig) -> (String, altcode_core::Diagnostics) {
        let out = emit(tree, config, &Palette::tailwind(), &CancellationFlag::new()).unwrap();
        (out.code, out.diagnostics)
    }

    #[test]
    fn test_card_markup() {
        let (code, diagnostics) = run(&card(), &RunConfig::default());
        assert_eq!(
            code,
            "<div style=\"display: flex; flex-direction: column; align-items: flex-start; gap: 8px; \
             padding: 16px; position: relative; background-color: #ffffff; border-radius: 8px; \
             box-shadow: 0px 4px 8px 0px rgba(0, 0, 0, 0.25); width: 240px; height: 120px\">\n  \
             <p style=\"margin: 0; font-family: 'Inter'; font-size: 14px; font-weight: 600; \
             color: #111827\">Hello &amp; welcome</p>\n  \
             <div style=\"background-color: var(--accent, #ef4444); border-radius: 50%; \
             position: absolute; left: 228px; top: 4px; width: 8px; height: 8px\"></div>\n\
             </div>"
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_variables_disabled_use_literals() {
        let config = RunConfig {
            use_variables: false,
            ..RunConfig::default()
        };
        let (code, _) = run(&card(), &config);
        assert!(code.contains("background-color: #ef4444"));
        assert!(!code.contains("var(--"));
    }

    #[test]
    fn test_jsx_component() {
        let config = RunConfig {
            markup_mode: MarkupMode::Jsx,
            show_layer_names: true,
            ..RunConfig::default()
        };
        let (code, _) = run(&card(), &config);
        assert!(code.starts_with("export default function Card() {\n  return (\n    <div style={{ display: \"flex\""));
        assert!(code.contains("data-layer=\"Badge\""));
        assert!(code.contains("backgroundColor: \"var(--accent, #ef4444)\""));
    }

    #[test]
    fn test_negative_gap_is_clamped() {
        let mut tree = card();
        if let Some(layout) = tree.get_mut(altcode_core::NodeId(0)).and_then(|n| n.layout.as_mut()) {
            layout.gap = -4.0;
        }
        let (code, diagnostics) = run(&tree, &RunConfig::default());
        assert!(!code.contains("gap:"));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_vector_markup_is_inlined() {
        let mut tree = AltTree::new();
        let mut icon = AltNode::new(NodeKind::Vector, "Icon").with_size(16.0, 16.0);
        icon.unique_name = "Icon".to_string();
        icon.can_flatten_to_vector = true;
        icon.embedded_vector_markup =
            Some("<svg width=\"16\" height=\"16\">\n  <path d=\"M0 0\"/>\n</svg>".to_string());
        tree.insert(icon, None);
        let (code, _) = run(&tree, &RunConfig::default());
        assert_eq!(
            code,
            "<div style=\"width: 16px; height: 16px\">\n  <svg width=\"16\" height=\"16\">\n    <path d=\"M0 0\"/>\n  </svg>\n</div>"
        );
    }

    #[test]
    fn test_font_family_is_escaped() {
        let mut node = label("Hi");
        if let Some(text) = node.text.as_mut() {
            text.runs[0].font_family = "O'Brien \"Sans\"".to_string();
        }
        let mut tree = AltTree::new();
        tree.insert(node, None);
        let (code, _) = run(&tree, &RunConfig::default());
        assert!(code.contains("font-family: 'O\\27 Brien \\22 Sans\\22 ';"));
        assert_eq!(code.matches('"').count(), 2);
    }
}
