//! Flutter widgets.
//!
//! Fragments map onto widget constructors: `args` are named arguments (the
//! empty key is the positional one) and `modifiers` are wrapper widgets,
//! innermost first.

use super::{apply_case, dims, fills_main_axis, native_text_color, unit_points, Dim};
use crate::engine::{partition_children, Backend, EmitContext};
use crate::error::Result;
use crate::format::{argb_hex, escape_literal, fixed, num, top_paint};
use crate::fragment::Fragment;
use crate::templates::{indent_block, DocumentData, TemplateEngine};
use altcode_core::{
    AltNode, BackendKind, Color, CornerRadius, CounterAlign, Direction, Effect, FlutterMode,
    Gradient, ImageScaleMode, LayoutDescriptor, LineHeight, NodeKind, Padding, PaintKind,
    PrimaryAlign, RunConfig, SizingMode, StrokeAlign, TextAlign, TextDecoration, TextRun,
};

pub struct FlutterBackend;

const MULTI_CHILD: [&str; 4] = ["Row", "Column", "Stack", "Wrap"];
const INLINE_WIDTH: usize = 80;

const STATELESS: &str = "{{header}}class {{pascal_case name}} extends StatelessWidget {
  const {{pascal_case name}}({super.key});

  @override
  Widget build(BuildContext context) {
    return {{body}};
  }
}
";

const FULL_APP: &str = "{{header}}void main() {
  runApp(const MyApp());
}

class MyApp extends StatelessWidget {
  const MyApp({super.key});

  @override
  Widget build(BuildContext context) {
    return MaterialApp(
      debugShowCheckedModeBanner: false,
      home: Scaffold(
        body: SingleChildScrollView(
          child: {{pascal_case name}}(),
        ),
      ),
    );
  }
}

class {{pascal_case name}} extends StatelessWidget {
  const {{pascal_case name}}({super.key});

  @override
  Widget build(BuildContext context) {
    return {{body}};
  }
}
";

fn color(c: &Color) -> String {
    format!("Color({})", argb_hex(c))
}

/// Radians with four decimals, trailing zeros trimmed.
fn radians(degrees: f64) -> String {
    fixed(degrees.to_radians(), 4)
}

fn alignment(x: f64, y: f64) -> String {
    format!("Alignment({}, {})", num(x * 2.0 - 1.0), num(y * 2.0 - 1.0))
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }
    let body: Vec<String> = items.iter().map(|item| format!("{},", item)).collect();
    format!("[\n{}\n]", indent_block(&body.join("\n"), 2))
}

/// `Name(a, b: c)` on one line when it fits, one argument per line otherwise.
fn invocation(name: &str, parts: &[String]) -> String {
    let inline = parts.join(", ");
    if !inline.contains('\n') && name.len() + inline.len() + 2 <= INLINE_WIDTH {
        format!("{}({})", name, inline)
    } else {
        let body: Vec<String> = parts.iter().map(|part| format!("{},", part)).collect();
        format!("{}(\n{}\n)", name, indent_block(&body.join("\n"), 2))
    }
}

fn call(fragment: &Fragment) -> String {
    let mut parts: Vec<String> = fragment
        .args
        .iter()
        .map(|(name, value)| {
            if name.is_empty() {
                value.clone()
            } else {
                format!("{}: {}", name, value)
            }
        })
        .collect();
    if MULTI_CHILD.contains(&fragment.element.as_str()) {
        let children: Vec<String> = fragment.children.iter().map(widget).collect();
        parts.push(format!("children: {}", list(&children)));
    } else if let Some(child) = fragment.children.first() {
        parts.push(format!("child: {}", widget(child)));
    }
    invocation(&fragment.element, &parts)
}

/// The widget inside its wrappers.
fn widget(fragment: &Fragment) -> String {
    let mut out = call(fragment);
    for (name, args) in &fragment.modifiers {
        let mut parts = Vec::with_capacity(2);
        if !args.is_empty() {
            parts.push(args.clone());
        }
        parts.push(format!("child: {}", out));
        out = invocation(name, &parts);
    }
    match &fragment.comment {
        Some(comment) => format!("// {}\n{}", comment, out),
        None => out,
    }
}

fn edge_insets(p: &Padding) -> String {
    if p.is_uniform() {
        format!("EdgeInsets.all({})", num(p.top))
    } else if p.is_symmetric() {
        format!(
            "EdgeInsets.symmetric(horizontal: {}, vertical: {})",
            num(p.left),
            num(p.top)
        )
    } else {
        format!(
            "EdgeInsets.fromLTRB({}, {}, {}, {})",
            num(p.left),
            num(p.top),
            num(p.right),
            num(p.bottom)
        )
    }
}

fn gradient(g: &Gradient) -> String {
    let colors: Vec<String> = g.stops().iter().map(|s| color(&s.effective_color())).collect();
    let stops: Vec<String> = g.stops().iter().map(|s| num(s.offset)).collect();
    let f = match g {
        Gradient::Linear(linear) => {
            let ((sx, sy), (ex, ey)) = unit_points(linear.angle);
            Fragment::new("LinearGradient")
                .with_arg("begin", alignment(sx, sy))
                .with_arg("end", alignment(ex, ey))
        }
        Gradient::Radial(radial) => Fragment::new("RadialGradient")
            .with_arg("center", alignment(radial.center_x, radial.center_y))
            .with_arg("radius", num(radial.radius_x)),
        Gradient::Angular(angular) => Fragment::new("SweepGradient")
            .with_arg("center", alignment(angular.center_x, angular.center_y))
            .with_arg(
                "transform",
                format!("GradientRotation({})", radians(angular.start_angle - 90.0)),
            ),
    };
    call(
        &f.with_arg("colors", format!("[{}]", colors.join(", ")))
            .with_arg("stops", format!("[{}]", stops.join(", "))),
    )
}

fn radius(r: f64) -> String {
    format!("Radius.circular({})", num(r))
}

impl FlutterBackend {
    /// `width`/`height` arguments for widgets that take them.
    fn sized(fragment: Fragment, node: &AltNode, cx: &EmitContext) -> Fragment {
        let (width, height) = dims(node);
        let mut f = fragment;
        for (name, dim, horizontal) in [("width", width, true), ("height", height, false)] {
            match dim {
                Dim::Fixed(value) => f = f.with_arg(name, num(value)),
                Dim::Fill if !fills_main_axis(node, horizontal, cx) => {
                    f = f.with_arg(name, "double.infinity")
                }
                _ => {}
            }
        }
        f
    }

    fn decoration(node: &AltNode, cx: &mut EmitContext) -> Option<Fragment> {
        let mut d = Fragment::new("BoxDecoration");

        if let Some(fill) = top_paint(&node.paint.fills) {
            d = match &fill.kind {
                PaintKind::Solid(_) => match fill.solid_color() {
                    Some(c) => d.with_arg("color", color(&c)),
                    None => d,
                },
                PaintKind::Gradient(g) => d.with_arg("gradient", gradient(g)),
                PaintKind::Image(image) => {
                    let mut img = Fragment::new("DecorationImage")
                        .with_arg("image", format!("AssetImage(\"{}\")", escape_literal(&image.image_ref, true)));
                    img = match image.scale_mode {
                        ImageScaleMode::Fill | ImageScaleMode::Crop => img.with_arg("fit", "BoxFit.cover"),
                        ImageScaleMode::Fit => img.with_arg("fit", "BoxFit.contain"),
                        ImageScaleMode::Tile => img.with_arg("repeat", "ImageRepeat.repeat"),
                    };
                    d.with_arg("image", call(&img))
                }
            };
        }

        if node.has_visible_stroke() {
            match node.paint.strokes.iter().rev().find_map(|s| s.solid_color()) {
                Some(c) => {
                    let mut border = Fragment::new("Border.all")
                        .with_arg("color", color(&c))
                        .with_arg("width", num(node.stroke.weight));
                    border = match node.stroke.align {
                        StrokeAlign::Inside => border,
                        StrokeAlign::Center => border.with_arg("strokeAlign", "BorderSide.strokeAlignCenter"),
                        StrokeAlign::Outside => border.with_arg("strokeAlign", "BorderSide.strokeAlignOutside"),
                    };
                    d = d.with_arg("border", call(&border));
                }
                None => cx.warn(node, "only solid strokes are supported; stroke skipped"),
            }
        }

        if node.kind == NodeKind::Ellipse {
            d = d.with_arg(
                "borderRadius",
                format!(
                    "BorderRadius.all(Radius.elliptical({}, {}))",
                    num(node.geometry.width / 2.0),
                    num(node.geometry.height / 2.0)
                ),
            );
        } else if !node.corner_radius.is_zero() {
            d = match node.corner_radius {
                CornerRadius::Uniform(r) => d.with_arg("borderRadius", format!("BorderRadius.circular({})", num(r))),
                CornerRadius::PerCorner([tl, tr, br, bl]) => d.with_arg(
                    "borderRadius",
                    call(
                        &Fragment::new("BorderRadius.only")
                            .with_arg("topLeft", radius(tl))
                            .with_arg("topRight", radius(tr))
                            .with_arg("bottomRight", radius(br))
                            .with_arg("bottomLeft", radius(bl)),
                    ),
                ),
            };
        }

        let mut shadows = Vec::new();
        for effect in &node.effects {
            match effect {
                Effect::DropShadow(s) => shadows.push(call(
                    &Fragment::new("BoxShadow")
                        .with_arg("color", color(&s.color))
                        .with_arg("offset", format!("Offset({}, {})", num(s.offset_x), num(s.offset_y)))
                        .with_arg("blurRadius", num(s.radius))
                        .with_arg("spreadRadius", num(s.spread)),
                )),
                Effect::InnerShadow(_) => cx.warn(node, "inner shadows are not supported by Flutter; skipped"),
                _ => {}
            }
        }
        if !shadows.is_empty() {
            d = d.with_arg("boxShadow", list(&shadows));
        }

        (!d.args.is_empty()).then_some(d)
    }

    fn text_style(node: &AltNode, run: &TextRun, shadows: &[String], cx: &mut EmitContext) -> Fragment {
        let mut style = Fragment::new("TextStyle")
            .with_arg("fontFamily", format!("\"{}\"", escape_literal(&run.font_family, true)))
            .with_arg("fontSize", num(run.font_size));
        if run.font_weight != 400 {
            let weight = ((run.font_weight as f64 / 100.0).round() * 100.0).clamp(100.0, 900.0);
            style = style.with_arg("fontWeight", format!("FontWeight.w{}", weight as u16));
        }
        if run.italic {
            style = style.with_arg("fontStyle", "FontStyle.italic");
        }
        style = match run.decoration {
            TextDecoration::None => style,
            TextDecoration::Underline => style.with_arg("decoration", "TextDecoration.underline"),
            TextDecoration::Strikethrough => style.with_arg("decoration", "TextDecoration.lineThrough"),
        };
        if run.letter_spacing != 0.0 {
            style = style.with_arg("letterSpacing", num(run.letter_spacing));
        }
        style = match run.line_height {
            LineHeight::Auto => style,
            LineHeight::Pixels(value) if run.font_size > 0.0 => {
                style.with_arg("height", num(value / run.font_size))
            }
            LineHeight::Pixels(_) => style,
            LineHeight::Percent(value) => style.with_arg("height", num(value / 100.0)),
        };
        if let Some(c) = native_text_color(node, run, "Flutter", cx) {
            style = style.with_arg("color", color(&c));
        }
        if !shadows.is_empty() {
            style = style.with_arg("shadows", list(shadows));
        }
        style
    }

    fn flex(node: &AltNode, layout: &LayoutDescriptor, flow: Vec<Fragment>, cx: &mut EmitContext) -> Fragment {
        let gap = if layout.gap < 0.0 {
            cx.warn(node, format!("negative gap {} clamped to 0", num(layout.gap)));
            0.0
        } else {
            layout.gap
        };

        let f = if layout.wrap {
            let mut f = Fragment::new("Wrap");
            if layout.direction == Direction::Column {
                f = f.with_arg("direction", "Axis.vertical");
            }
            f = match layout.primary_align {
                PrimaryAlign::Start => f,
                PrimaryAlign::Center => f.with_arg("alignment", "WrapAlignment.center"),
                PrimaryAlign::End => f.with_arg("alignment", "WrapAlignment.end"),
                PrimaryAlign::SpaceBetween => f.with_arg("alignment", "WrapAlignment.spaceBetween"),
            };
            f = match layout.counter_align {
                CounterAlign::Start => f,
                CounterAlign::Center => f.with_arg("crossAxisAlignment", "WrapCrossAlignment.center"),
                CounterAlign::End => f.with_arg("crossAxisAlignment", "WrapCrossAlignment.end"),
                CounterAlign::Baseline => {
                    cx.warn(node, "baseline alignment is not supported by Wrap; using start");
                    f
                }
            };
            if gap > 0.0 {
                f = f.with_arg("spacing", num(gap)).with_arg("runSpacing", num(gap));
            }
            f
        } else {
            let mut f = Fragment::new(match layout.direction {
                Direction::Row => "Row",
                Direction::Column => "Column",
            });
            f = match layout.primary_align {
                PrimaryAlign::Start => f,
                PrimaryAlign::Center => f.with_arg("mainAxisAlignment", "MainAxisAlignment.center"),
                PrimaryAlign::End => f.with_arg("mainAxisAlignment", "MainAxisAlignment.end"),
                PrimaryAlign::SpaceBetween => f.with_arg("mainAxisAlignment", "MainAxisAlignment.spaceBetween"),
            };
            f = match layout.counter_align {
                CounterAlign::Center => f,
                CounterAlign::Start => f.with_arg("crossAxisAlignment", "CrossAxisAlignment.start"),
                CounterAlign::End => f.with_arg("crossAxisAlignment", "CrossAxisAlignment.end"),
                CounterAlign::Baseline => f
                    .with_arg("crossAxisAlignment", "CrossAxisAlignment.baseline")
                    .with_arg("textBaseline", "TextBaseline.alphabetic"),
            };
            if layout.primary_sizing == SizingMode::Hug {
                f = f.with_arg("mainAxisSize", "MainAxisSize.min");
            }
            if gap > 0.0 && layout.primary_align != PrimaryAlign::SpaceBetween {
                f = f.with_arg("spacing", num(gap));
            }
            f
        };

        let f = f.with_children(flow);
        if layout.padding.is_zero() {
            f
        } else {
            f.with_modifier("Padding", format!("padding: {}", edge_insets(&layout.padding)))
        }
    }
}

impl Backend for FlutterBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Flutter
    }

    fn with_position_styles(&self, fragment: Fragment, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let mut f = fragment;
        let sized_by_args = matches!(f.element.as_str(), "Container" | "SvgPicture.string");
        if !sized_by_args {
            let sized = Self::sized(Fragment::new("SizedBox"), node, cx);
            if !sized.args.is_empty() {
                let args: Vec<String> = sized.args.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                f = f.with_modifier("SizedBox", args.join(", "));
            }
        }
        if node.geometry.is_rotated() {
            f = f.with_modifier(
                "Transform.rotate",
                format!("angle: {}", radians(node.geometry.rotation_degrees)),
            );
        }
        if node.opacity < 1.0 {
            f = f.with_modifier("Opacity", format!("opacity: {}", num(node.opacity)));
        }

        let (width, height) = dims(node);
        let expands = (width == Dim::Fill && fills_main_axis(node, true, cx))
            || (height == Dim::Fill && fills_main_axis(node, false, cx));
        if expands {
            f = f.with_modifier("Expanded", "");
        }
        if cx.is_absolute(node) {
            f = f.with_modifier(
                "Positioned",
                format!("left: {}, top: {}", num(node.geometry.x), num(node.geometry.y)),
            );
        }
        f
    }

    fn with_shape_styles(&self, fragment: Fragment, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let mut f = fragment;
        let boxed = f.element == "Container";
        if boxed {
            match Self::decoration(node, cx) {
                Some(decoration) => {
                    f = f.with_arg("decoration", call(&decoration));
                    if node.clips_content {
                        f = f.with_arg("clipBehavior", "Clip.hardEdge");
                    }
                }
                None if node.clips_content => f = f.with_modifier("ClipRect", ""),
                None => {}
            }
        }
        for effect in &node.effects {
            match effect {
                Effect::LayerBlur { radius } => {
                    f = f.with_modifier(
                        "ImageFiltered",
                        format!("imageFilter: ImageFilter.blur(sigmaX: {0}, sigmaY: {0})", num(*radius / 2.0)),
                    );
                }
                Effect::BackgroundBlur { .. } => {
                    cx.warn(node, "background blur is not supported by Flutter; skipped")
                }
                _ => {}
            }
        }
        f
    }

    fn text(&self, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let Some(text) = &node.text else {
            return self.shape(node, cx);
        };

        let mut shadows = Vec::new();
        for effect in &node.effects {
            match effect {
                Effect::DropShadow(s) => shadows.push(format!(
                    "Shadow(color: {}, offset: Offset({}, {}), blurRadius: {})",
                    color(&s.color),
                    num(s.offset_x),
                    num(s.offset_y),
                    num(s.radius)
                )),
                Effect::InnerShadow(_) => cx.warn(node, "inner shadows on text are not supported; skipped"),
                _ => {}
            }
        }

        let literal = |run: &TextRun| {
            format!("\"{}\"", escape_literal(&apply_case(&run.characters, run.case_transform), true))
        };
        let mut f = match text.runs.as_slice() {
            [] => Fragment::new("Text").with_arg("", "\"\""),
            [run] => Fragment::new("Text")
                .with_arg("", literal(run))
                .with_arg("style", call(&Self::text_style(node, run, &shadows, cx))),
            runs => {
                let mut spans = Vec::with_capacity(runs.len());
                for run in runs {
                    let style = Self::text_style(node, run, &shadows, cx);
                    spans.push(call(
                        &Fragment::new("TextSpan")
                            .with_arg("text", literal(run))
                            .with_arg("style", call(&style)),
                    ));
                }
                let root = Fragment::new("TextSpan").with_arg("children", list(&spans));
                Fragment::new("Text.rich").with_arg("", call(&root))
            }
        };
        f = match text.align {
            TextAlign::Left => f,
            TextAlign::Center => f.with_arg("textAlign", "TextAlign.center"),
            TextAlign::Right => f.with_arg("textAlign", "TextAlign.right"),
            TextAlign::Justified => f.with_arg("textAlign", "TextAlign.justify"),
        };

        let f = self.with_shape_styles(f, node, cx);
        self.with_position_styles(f, node, cx)
    }

    fn vector(&self, node: &AltNode, markup: &str, cx: &mut EmitContext) -> Fragment {
        let f = Fragment::new("SvgPicture.string").with_arg("", format!("r'''{}'''", markup.trim()));
        let f = Self::sized(f, node, cx);
        self.with_position_styles(f, node, cx)
    }

    fn shape(&self, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let f = Self::sized(Fragment::new("Container"), node, cx);
        let f = self.with_shape_styles(f, node, cx);
        self.with_position_styles(f, node, cx)
    }

    fn container(
        &self,
        node: &AltNode,
        children: Vec<(&AltNode, Fragment)>,
        cx: &mut EmitContext,
    ) -> Fragment {
        let (flow, absolute) = partition_children(children);
        let body = match &node.layout {
            Some(layout) => {
                let flex = Self::flex(node, layout, flow, cx);
                if absolute.is_empty() {
                    flex
                } else {
                    Fragment::new("Stack").with_child(flex).with_children(absolute)
                }
            }
            None if flow.is_empty() && absolute.is_empty() => Fragment::empty(),
            None => Fragment::new("Stack").with_children(flow).with_children(absolute),
        };

        let f = Self::sized(Fragment::new("Container"), node, cx);
        let f = self.with_shape_styles(f, node, cx).with_child(body);
        self.with_position_styles(f, node, cx)
    }

    fn render(&self, fragment: &Fragment, _cx: &EmitContext) -> String {
        widget(fragment)
    }

    fn document(&self, name: &str, bodies: &[String], config: &RunConfig) -> Result<String> {
        if config.flutter_mode == FlutterMode::Snippet {
            return Ok(bodies.join("\n\n"));
        }

        let body = match bodies {
            [] => "const SizedBox.shrink()".to_string(),
            [single] => single.clone(),
            many => invocation(
                "Column",
                &[
                    "crossAxisAlignment: CrossAxisAlignment.start".to_string(),
                    format!("children: {}", list(many)),
                ],
            ),
        };

        let mut imports = vec!["package:flutter/material.dart"];
        if body.contains("SvgPicture") {
            imports.push("package:flutter_svg/flutter_svg.dart");
        }
        if body.contains("ImageFilter") {
            imports.insert(0, "dart:ui");
        }
        let header: String = imports
            .iter()
            .map(|import| format!("import '{}';\n", import))
            .collect::<String>()
            + "\n";

        let hung = indent_block(&body, 4);
        let data = DocumentData {
            name,
            body: hung.trim_start(),
            header: &header,
        };
        let mut engine = TemplateEngine::new();
        match config.flutter_mode {
            FlutterMode::FullApp => engine.render_wrapper("flutter-app", FULL_APP, &data),
            _ => engine.render_wrapper("flutter-stateless", STATELESS, &data),
        }
    }
}
