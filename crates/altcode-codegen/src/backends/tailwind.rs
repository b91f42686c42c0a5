//! Utility-class markup.
//!
//! Numeric values snap onto the configured scales when within the rounding
//! threshold and fall back to arbitrary values (`w-[137px]`) otherwise.
//! Solid colors snap onto the named palette the same way.

use super::html::{css_shadow, HtmlBackend};
use super::markup::{self, StyleAttr};
use super::{dims, fills_main_axis, run_fill, Dim};
use crate::engine::{Backend, EmitContext};
use crate::error::Result;
use crate::format::{css_color, css_gradient, css_string, num, px, token_ident, top_paint};
use crate::fragment::Fragment;
use altcode_core::{
    AltNode, BackendKind, Color, CornerRadius, CounterAlign, Direction, Effect, ImageScaleMode,
    LayoutDescriptor, LineHeight, NodeKind, NumericScale, PaintEntry, PaintKind, PrimaryAlign,
    RunConfig, StrokeAlign, TextAlign, TextCase, TextDecoration, TextRun,
};

pub struct TailwindBackend;

const ROTATIONS: [f64; 9] = [0.0, 1.0, 2.0, 3.0, 6.0, 12.0, 45.0, 90.0, 180.0];

/// An arbitrary-value class; spaces become underscores.
fn arbitrary(prefix: &str, value: &str) -> String {
    format!("{}-[{}]", prefix, value.replace(' ', "_"))
}

/// Scale class for `value`, negated with a leading `-`.
fn scaled(prefix: &str, value: f64, scale: Option<&NumericScale>, threshold: f64) -> String {
    let class = match scale.and_then(|s| s.nearest(value.abs(), threshold)) {
        Some(("DEFAULT", _)) => prefix.to_string(),
        Some((token, _)) => format!("{}-{}", prefix, token),
        None => arbitrary(prefix, &px(value.abs())),
    };
    if value < 0.0 && !class.ends_with("-0") {
        format!("-{}", class)
    } else {
        class
    }
}

struct Scales<'a> {
    spacing: Option<&'a NumericScale>,
    font_size: Option<&'a NumericScale>,
    radius: Option<&'a NumericScale>,
    threshold: f64,
}

impl<'a> Scales<'a> {
    fn new(config: &'a RunConfig) -> Self {
        let table = config.scale_table(BackendKind::Tailwind);
        Self {
            spacing: table.map(|t| &t.spacing),
            font_size: table.map(|t| &t.font_size),
            radius: table.map(|t| &t.radius),
            threshold: config.scale_threshold,
        }
    }

    fn spacing(&self, prefix: &str, value: f64) -> String {
        scaled(prefix, value, self.spacing, self.threshold)
    }
}

/// Color class for a solid paint: a palette name, a custom property, or an
/// arbitrary value.
fn color_class(prefix: &str, entry: &PaintEntry, cx: &EmitContext) -> Option<String> {
    let color = entry.solid_color()?;
    if let (Some(binding), true) = (&entry.variable, cx.config.use_variables) {
        let value = format!("var(--{},{})", token_ident(&binding.name), css_color(&color));
        return Some(arbitrary(prefix, &value.replace(", ", ",")));
    }
    let opaque = Color { a: 1.0, ..color };
    match cx.palette.nearest(&opaque, cx.config.palette_threshold) {
        Some(named) if color.is_opaque() => Some(format!("{}-{}", prefix, named.name)),
        Some(named) => {
            let percent = (color.a as f64 * 100.0).round() as u32;
            if percent % 5 == 0 {
                Some(format!("{}-{}/{}", prefix, named.name, percent))
            } else {
                Some(format!("{}-{}/[{}]", prefix, named.name, num(color.a as f64)))
            }
        }
        None => Some(arbitrary(prefix, &css_color(&color).replace(", ", ","))),
    }
}

impl TailwindBackend {
    fn with_size(fragment: Fragment, prefix: &str, dim: Dim, main_axis: bool, scales: &Scales) -> Fragment {
        match dim {
            Dim::Fixed(value) => fragment.with_class(scales.spacing(prefix, value)),
            Dim::Hug => fragment,
            Dim::Fill if main_axis => fragment.with_class("flex-1"),
            Dim::Fill => fragment.with_class("self-stretch"),
        }
    }

    fn with_layout(fragment: Fragment, node: &AltNode, layout: &LayoutDescriptor, cx: &mut EmitContext) -> Fragment {
        let scales = Scales::new(cx.config);
        let mut f = fragment.with_class("flex");
        if layout.direction == Direction::Column {
            f = f.with_class("flex-col");
        }
        if layout.wrap {
            f = f.with_class("flex-wrap");
        }
        f = match layout.primary_align {
            PrimaryAlign::Start => f,
            PrimaryAlign::Center => f.with_class("justify-center"),
            PrimaryAlign::End => f.with_class("justify-end"),
            PrimaryAlign::SpaceBetween => f.with_class("justify-between"),
        };
        f = f.with_class(match layout.counter_align {
            CounterAlign::Start => "items-start",
            CounterAlign::Center => "items-center",
            CounterAlign::End => "items-end",
            CounterAlign::Baseline => "items-baseline",
        });
        if layout.primary_align != PrimaryAlign::SpaceBetween {
            if layout.gap < 0.0 {
                cx.warn(node, format!("negative gap {} clamped to 0", num(layout.gap)));
            } else if layout.gap > 0.0 {
                f = f.with_class(scales.spacing("gap", layout.gap));
            }
        }

        let p = layout.padding;
        if p.is_zero() {
            f
        } else if p.is_uniform() {
            f.with_class(scales.spacing("p", p.top))
        } else if p.is_symmetric() {
            f.with_class(scales.spacing("px", p.left))
                .with_class(scales.spacing("py", p.top))
        } else {
            [("pt", p.top), ("pr", p.right), ("pb", p.bottom), ("pl", p.left)]
                .into_iter()
                .filter(|(_, value)| *value != 0.0)
                .fold(f, |f, (prefix, value)| f.with_class(scales.spacing(prefix, value)))
        }
    }

    fn run_classes(fragment: Fragment, node: &AltNode, run: &TextRun, cx: &mut EmitContext) -> Fragment {
        let scales = Scales::new(cx.config);
        let mut f = fragment
            .with_class(arbitrary("font", &css_string(&run.font_family)))
            .with_class(scaled("text", run.font_size, scales.font_size, scales.threshold));
        f = match run.font_weight {
            400 => f,
            100 => f.with_class("font-thin"),
            200 => f.with_class("font-extralight"),
            300 => f.with_class("font-light"),
            500 => f.with_class("font-medium"),
            600 => f.with_class("font-semibold"),
            700 => f.with_class("font-bold"),
            800 => f.with_class("font-extrabold"),
            900 => f.with_class("font-black"),
            other => f.with_class(format!("font-[{}]", other)),
        };
        if run.italic {
            f = f.with_class("italic");
        }
        f = match run.decoration {
            TextDecoration::None => f,
            TextDecoration::Underline => f.with_class("underline"),
            TextDecoration::Strikethrough => f.with_class("line-through"),
        };
        f = match run.case_transform {
            TextCase::Original => f,
            TextCase::Upper => f.with_class("uppercase"),
            TextCase::Lower => f.with_class("lowercase"),
            TextCase::Title => f.with_class("capitalize"),
        };
        if run.letter_spacing != 0.0 {
            f = f.with_class(arbitrary("tracking", &px(run.letter_spacing)));
        }
        f = match run.line_height {
            LineHeight::Auto => f,
            LineHeight::Pixels(value) => f.with_class(arbitrary("leading", &px(value))),
            LineHeight::Percent(value) => f.with_class(arbitrary("leading", &format!("{}%", num(value)))),
        };
        let Some(fill) = run_fill(node, run) else {
            return f;
        };
        match &fill.kind {
            PaintKind::Solid(_) => match color_class("text", fill, cx) {
                Some(class) => f.with_class(class),
                None => f,
            },
            PaintKind::Gradient(gradient) => f
                .with_class(arbitrary("bg", &css_gradient(gradient).replace(", ", ",")))
                .with_class("bg-clip-text")
                .with_class("text-transparent"),
            PaintKind::Image(_) => {
                cx.warn(node, "image fills on text are not supported; skipped");
                f
            }
        }
    }
}

impl Backend for TailwindBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Tailwind
    }

    fn with_position_styles(&self, fragment: Fragment, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let scales = Scales::new(cx.config);
        let mut f = fragment;
        if cx.is_absolute(node) {
            f = f
                .with_class("absolute")
                .with_class(scales.spacing("left", node.geometry.x))
                .with_class(scales.spacing("top", node.geometry.y));
        }
        let (width, height) = dims(node);
        f = Self::with_size(f, "w", width, fills_main_axis(node, true, cx), &scales);
        f = Self::with_size(f, "h", height, fills_main_axis(node, false, cx), &scales);

        if node.geometry.is_rotated() {
            let degrees = node.geometry.rotation_degrees;
            let class = if ROTATIONS.contains(&degrees.abs()) {
                format!("rotate-{}", num(degrees.abs()))
            } else {
                arbitrary("rotate", &format!("{}deg", num(degrees.abs())))
            };
            f = f.with_class(if degrees < 0.0 { format!("-{}", class) } else { class });
        }
        if node.opacity < 1.0 {
            let percent = (node.opacity * 100.0).round() as u32;
            f = if percent % 5 == 0 {
                f.with_class(format!("opacity-{}", percent))
            } else {
                f.with_class(arbitrary("opacity", &num(node.opacity)))
            };
        }
        f
    }

    fn with_shape_styles(&self, fragment: Fragment, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let scales = Scales::new(cx.config);
        let mut f = fragment;

        if node.kind != NodeKind::Text {
            if let Some(fill) = top_paint(&node.paint.fills) {
                f = match &fill.kind {
                    PaintKind::Solid(_) => match color_class("bg", fill, cx) {
                        Some(class) => f.with_class(class),
                        None => f,
                    },
                    PaintKind::Gradient(gradient) => {
                        f.with_class(arbitrary("bg", &css_gradient(gradient).replace(", ", ",")))
                    }
                    PaintKind::Image(image) => {
                        let f = f.with_class(arbitrary("bg", &format!("url('{}')", image.image_ref)));
                        match image.scale_mode {
                            ImageScaleMode::Fill | ImageScaleMode::Crop => f.with_class("bg-cover"),
                            ImageScaleMode::Fit => f.with_class("bg-contain").with_class("bg-no-repeat"),
                            ImageScaleMode::Tile => f.with_class("bg-repeat"),
                        }
                    }
                };
            }
        }

        if node.has_visible_stroke() {
            let color = node
                .paint
                .strokes
                .iter()
                .rev()
                .find_map(|entry| color_class("border", entry, cx));
            match color {
                Some(color) => {
                    let weight = node.stroke.weight;
                    f = if node.stroke.align == StrokeAlign::Outside {
                        f.with_class("outline")
                            .with_class(arbitrary("outline", &px(weight)))
                            .with_class(color.replacen("border", "outline", 1))
                    } else {
                        let width = match weight {
                            w if w == 1.0 => "border".to_string(),
                            w if [2.0, 4.0, 8.0].contains(&w) => format!("border-{}", num(w)),
                            w => arbitrary("border", &px(w)),
                        };
                        f.with_class(width).with_class(color)
                    };
                }
                None => cx.warn(node, "only solid strokes are supported; stroke skipped"),
            }
        }

        if node.kind == NodeKind::Ellipse {
            f = f.with_class("rounded-full");
        } else if !node.corner_radius.is_zero() {
            f = match node.corner_radius {
                CornerRadius::Uniform(r) => f.with_class(scaled("rounded", r, scales.radius, scales.threshold)),
                CornerRadius::PerCorner(corners) => ["rounded-tl", "rounded-tr", "rounded-br", "rounded-bl"]
                    .into_iter()
                    .zip(corners)
                    .filter(|(_, r)| *r != 0.0)
                    .fold(f, |f, (prefix, r)| f.with_class(scaled(prefix, r, scales.radius, scales.threshold))),
            };
        }

        let shadows: Vec<String> = node.effects.iter().filter_map(css_shadow).collect();
        if !shadows.is_empty() {
            let value = shadows.join(",").replace(", ", ",");
            f = if node.kind == NodeKind::Text {
                f.with_class(format!("[text-shadow:{}]", value.replace(' ', "_")))
            } else {
                f.with_class(arbitrary("shadow", &value))
            };
        }
        for effect in &node.effects {
            f = match effect {
                Effect::LayerBlur { radius } => f.with_class(arbitrary("blur", &px(*radius))),
                Effect::BackgroundBlur { radius } => f.with_class(arbitrary("backdrop-blur", &px(*radius))),
                _ => f,
            };
        }
        if node.clips_content {
            f = f.with_class("overflow-hidden");
        }
        f
    }

    fn text(&self, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let mode = cx.config.markup_mode;
        let mut f = Fragment::new("p");
        if let Some(text) = &node.text {
            f = match text.align {
                TextAlign::Left => f,
                TextAlign::Center => f.with_class("text-center"),
                TextAlign::Right => f.with_class("text-right"),
                TextAlign::Justified => f.with_class("text-justify"),
            };
            match text.runs.as_slice() {
                [] => {}
                [run] => {
                    f = Self::run_classes(f, node, run, cx)
                        .with_content(markup::escape_text(&run.characters, mode));
                }
                runs => {
                    for run in runs {
                        let span = Fragment::new("span")
                            .with_content(markup::escape_text(&run.characters, mode));
                        f = f.with_child(Self::run_classes(span, node, run, cx));
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
        if children.iter().any(|(child, _)| cx.is_absolute(child)) && !cx.is_absolute(node) {
            f = f.with_class("relative");
        }
        f = f.with_children(children.into_iter().map(|(_, fragment)| fragment));
        let f = self.with_shape_styles(f, node, cx);
        self.with_position_styles(f, node, cx)
    }

    fn with_layer_name(&self, fragment: Fragment, node: &AltNode) -> Fragment {
        HtmlBackend.with_layer_name(fragment, node)
    }

    fn render(&self, fragment: &Fragment, cx: &EmitContext) -> String {
        markup::render(fragment, cx.config.markup_mode, StyleAttr::Classes)
    }

    fn document(&self, name: &str, bodies: &[String], config: &RunConfig) -> Result<String> {
        markup::document(name, bodies, config.markup_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::emit;
    use crate::format::escape_html;
    use altcode_core::{AltTree, CancellationFlag, Padding, Positioning, VariableBinding};
    use altcode_resolver::Palette;
    use pretty_assertions::assert_eq;

    fn config() -> RunConfig {
        RunConfig::new(BackendKind::Tailwind)
    }

    #[test]
    fn test_scaled_classes() {
        let config = config();
        let scales = Scales::new(&config);
        assert_eq!(scales.spacing("w", 64.0), "w-16");
        assert_eq!(scales.spacing("gap", 9.0), "gap-2");
        assert_eq!(scales.spacing("w", 1000.0), "w-[1000px]");
        assert_eq!(scales.spacing("left", -16.0), "-left-4");
        assert_eq!(scaled("rounded", 4.0, scales.radius, 15.0), "rounded");
        assert_eq!(scaled("text", 14.0, scales.font_size, 15.0), "text-sm");
    }

    #[test]
    fn test_rounding_disabled_uses_arbitrary_values() {
        let config = RunConfig {
            round_values: false,
            ..config()
        };
        let scales = Scales::new(&config);
        assert_eq!(scales.spacing("w", 64.0), "w-[64px]");
    }

    #[test]
    fn test_card_classes() {
        let mut tree = AltTree::new();
        let mut layout = LayoutDescriptor::new(Direction::Row);
        layout.gap = 16.0;
        layout.padding = Padding {
            top: 8.0,
            right: 16.0,
            bottom: 8.0,
            left: 16.0,
        };
        layout.counter_align = CounterAlign::Center;
        let mut root = AltNode::new(NodeKind::Container, "Toolbar")
            .with_size(320.0, 48.0)
            .with_layout(layout)
            .with_fill(PaintEntry::solid(Color::from_rgb8(59, 130, 246)));
        root.unique_name = "Toolbar".to_string();
        root.corner_radius = CornerRadius::Uniform(8.0);
        let root = tree.insert(root, None);

        let mut dot = AltNode::new(NodeKind::Ellipse, "Dot").with_size(8.0, 8.0);
        dot.unique_name = "Dot".to_string();
        dot.positioning = Positioning::Absolute;
        dot.geometry.x = 4.0;
        dot.geometry.y = 4.0;
        dot.paint.fills.push(PaintEntry {
            variable: Some(VariableBinding {
                name: "Status/Online".to_string(),
                fallback_hex: "#22c55e".to_string(),
            }),
            ..PaintEntry::solid(Color::from_rgb8(34, 197, 94))
        });
        tree.insert(dot, Some(root));

        let out = emit(&tree, &config(), &Palette::tailwind(), &CancellationFlag::new()).unwrap();
        assert_eq!(
            out.code,
            "<div class=\"flex items-center gap-4 px-4 py-2 relative bg-blue-500 rounded-lg w-80 h-12\">\n  \
             <div class=\"bg-[var(--status-online,#22c55e)] rounded-full absolute left-1 top-1 w-2 h-2\"></div>\n\
             </div>"
        );
    }

    #[test]
    fn test_translucent_palette_color() {
        let palette = Palette::tailwind();
        let config = config();
        let tree = AltTree::new();
        let cx = EmitContext::new(&tree, &config, &palette);
        let entry = PaintEntry {
            opacity: 0.5,
            ..PaintEntry::solid(Color::BLACK)
        };
        assert_eq!(color_class("bg", &entry, &cx).as_deref(), Some("bg-black/50"));
        let off_palette = PaintEntry::solid(Color::from_rgb8(18, 52, 86));
        assert_eq!(color_class("bg", &off_palette, &cx).as_deref(), Some("bg-[#123456]"));
    }

    #[test]
    fn test_layer_names_and_escaping() {
        let mut tree = AltTree::new();
        let mut node = AltNode::new(NodeKind::Rectangle, "A & B").with_size(16.0, 16.0);
        node.unique_name = "A_B".to_string();
        tree.insert(node, None);
        let config = RunConfig {
            show_layer_names: true,
            ..config()
        };
        let out = emit(&tree, &config, &Palette::tailwind(), &CancellationFlag::new()).unwrap();
        assert_eq!(out.code, format!("<div class=\"w-4 h-4\" data-layer=\"{}\"></div>", escape_html("A & B")));
    }
}
