//! SwiftUI views.
//!
//! `args` are initializer arguments, `children` go in the trailing view
//! builder of a stack, and `modifiers` are the `.modifier(…)` chain in
//! application order. A fragment with `content` renders it as a raw
//! expression in place of the initializer.

use super::{apply_case, dims, native_text_color, resource_name, unit_points, Dim};
use crate::engine::{partition_children, Backend, EmitContext};
use crate::error::Result;
use crate::format::{escape_literal, fixed, num, top_paint};
use crate::fragment::Fragment;
use crate::templates::{indent_block, DocumentData, TemplateEngine};
use altcode_core::{
    AltNode, BackendKind, Color, CornerRadius, CounterAlign, Direction, Effect, Gradient,
    LayoutDescriptor, LineHeight, NodeKind, Padding, PaintKind, PrimaryAlign, RunConfig,
    StrokeAlign, SwiftUiMode, TextAlign, TextDecoration, TextRun,
};

pub struct SwiftUiBackend;

const STACKS: [&str; 3] = ["VStack", "HStack", "ZStack"];

const VIEW_STRUCT: &str = "import SwiftUI

struct {{pascal_case name}}: View {
    var body: some View {
{{indent body 8}}
    }
}
";

const PREVIEW: &str = "
#Preview {
    {{pascal_case name}}()
}
";

fn color(c: &Color) -> String {
    let unit = |v: f32| fixed(v as f64, 3);
    if c.is_opaque() {
        format!("Color(red: {}, green: {}, blue: {})", unit(c.r), unit(c.g), unit(c.b))
    } else {
        format!(
            "Color(red: {}, green: {}, blue: {}, opacity: {})",
            unit(c.r),
            unit(c.g),
            unit(c.b),
            unit(c.a)
        )
    }
}

fn unit_point(x: f64, y: f64) -> String {
    format!("UnitPoint(x: {}, y: {})", num(x), num(y))
}

fn gradient(g: &Gradient, width: f64) -> String {
    let stops: Vec<String> = g
        .stops()
        .iter()
        .map(|s| format!(".init(color: {}, location: {})", color(&s.effective_color()), num(s.offset)))
        .collect();
    let stops = stops.join(", ");
    match g {
        Gradient::Linear(linear) => {
            let ((sx, sy), (ex, ey)) = unit_points(linear.angle);
            format!(
                "LinearGradient(stops: [{}], startPoint: {}, endPoint: {})",
                stops,
                unit_point(sx, sy),
                unit_point(ex, ey)
            )
        }
        Gradient::Radial(radial) => format!(
            "RadialGradient(stops: [{}], center: {}, startRadius: 0, endRadius: {})",
            stops,
            unit_point(radial.center_x, radial.center_y),
            num(radial.radius_x * width)
        ),
        Gradient::Angular(angular) => format!(
            "AngularGradient(stops: [{}], center: {}, angle: .degrees({}))",
            stops,
            unit_point(angular.center_x, angular.center_y),
            num(angular.start_angle - 90.0)
        ),
    }
}

/// The node's outline as a SwiftUI shape view.
fn outline_view(node: &AltNode) -> Fragment {
    if node.kind == NodeKind::Ellipse {
        return Fragment::new("Ellipse");
    }
    match node.corner_radius {
        CornerRadius::Uniform(r) if r > 0.0 => {
            Fragment::new("RoundedRectangle").with_arg("cornerRadius", num(r))
        }
        CornerRadius::PerCorner([tl, tr, br, bl]) if !node.corner_radius.is_zero() => {
            Fragment::new("UnevenRoundedRectangle")
                .with_arg("topLeadingRadius", num(tl))
                .with_arg("bottomLeadingRadius", num(bl))
                .with_arg("bottomTrailingRadius", num(br))
                .with_arg("topTrailingRadius", num(tr))
        }
        _ => Fragment::new("Rectangle"),
    }
}

fn outline(node: &AltNode) -> String {
    view(&outline_view(node))
}

fn frame_alignment(layout: &LayoutDescriptor) -> &'static str {
    let primary = match layout.primary_align {
        PrimaryAlign::Start | PrimaryAlign::SpaceBetween => 0,
        PrimaryAlign::Center => 1,
        PrimaryAlign::End => 2,
    };
    let counter = match layout.counter_align {
        CounterAlign::Start | CounterAlign::Baseline => 0,
        CounterAlign::Center => 1,
        CounterAlign::End => 2,
    };
    let (horizontal, vertical) = match layout.direction {
        Direction::Row => (primary, counter),
        Direction::Column => (counter, primary),
    };
    const NAMES: [[&str; 3]; 3] = [
        ["topLeading", "top", "topTrailing"],
        ["leading", "center", "trailing"],
        ["bottomLeading", "bottom", "bottomTrailing"],
    ];
    NAMES[vertical][horizontal]
}

fn padding_modifiers(fragment: Fragment, p: &Padding) -> Fragment {
    if p.is_zero() {
        fragment
    } else if p.is_uniform() {
        fragment.with_modifier("padding", num(p.top))
    } else if p.is_symmetric() {
        let mut f = fragment;
        if p.left != 0.0 {
            f = f.with_modifier("padding", format!(".horizontal, {}", num(p.left)));
        }
        if p.top != 0.0 {
            f = f.with_modifier("padding", format!(".vertical, {}", num(p.top)));
        }
        f
    } else {
        fragment.with_modifier(
            "padding",
            format!(
                "EdgeInsets(top: {}, leading: {}, bottom: {}, trailing: {})",
                num(p.top),
                num(p.left),
                num(p.bottom),
                num(p.right)
            ),
        )
    }
}

fn font_weight(weight: u16) -> &'static str {
    match ((weight as f64 / 100.0).round() as u16).clamp(1, 9) {
        1 => "ultraLight",
        2 => "thin",
        3 => "light",
        4 => "regular",
        5 => "medium",
        6 => "semibold",
        7 => "bold",
        8 => "heavy",
        _ => "black",
    }
}

fn view(fragment: &Fragment) -> String {
    let is_stack = STACKS.contains(&fragment.element.as_str());
    let args: Vec<String> = fragment
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

    let mut out = if !fragment.content.is_empty() {
        fragment.content.join("\n")
    } else if is_stack && args.is_empty() {
        format!("{} {{", fragment.element)
    } else if is_stack {
        format!("{}({}) {{", fragment.element, args.join(", "))
    } else {
        format!("{}({})", fragment.element, args.join(", "))
    };

    if is_stack {
        for child in &fragment.children {
            out.push('\n');
            out.push_str(&indent_block(&view(child), 4));
        }
        out.push_str("\n}");
    }

    let modifier_indent = if is_stack { "" } else { "    " };
    for (name, args) in &fragment.modifiers {
        out.push_str(&format!("\n{}.{}({})", modifier_indent, name, args));
    }

    match &fragment.comment {
        Some(comment) => format!("// {}\n{}", comment, out),
        None => out,
    }
}

impl SwiftUiBackend {
    /// `.frame(…)` from the node's sizing; `alignment` places content
    /// inside a fixed frame.
    fn framed(fragment: Fragment, node: &AltNode, alignment: Option<&str>) -> Fragment {
        let (width, height) = dims(node);
        let mut args = Vec::new();
        for (fixed_name, fill_name, dim) in [("width", "maxWidth", width), ("height", "maxHeight", height)] {
            match dim {
                Dim::Fixed(value) => args.push(format!("{}: {}", fixed_name, num(value))),
                Dim::Fill => args.push(format!("{}: .infinity", fill_name)),
                Dim::Hug => {}
            }
        }
        if args.is_empty() {
            return fragment;
        }
        if let Some(alignment) = alignment.filter(|a| *a != "center") {
            args.push(format!("alignment: .{}", alignment));
        }
        fragment.with_modifier("frame", args.join(", "))
    }

    fn run_text(node: &AltNode, run: &TextRun, cx: &mut EmitContext) -> Fragment {
        let characters = apply_case(&run.characters, run.case_transform);
        let mut f = Fragment::new("Text")
            .with_arg("", format!("\"{}\"", escape_literal(&characters, false)))
            .with_modifier(
                "font",
                format!(
                    ".custom(\"{}\", size: {})",
                    escape_literal(&run.font_family, false),
                    num(run.font_size)
                ),
            );
        if run.font_weight != 400 {
            f = f.with_modifier("fontWeight", format!(".{}", font_weight(run.font_weight)));
        }
        if run.italic {
            f = f.with_modifier("italic", "");
        }
        f = match run.decoration {
            TextDecoration::None => f,
            TextDecoration::Underline => f.with_modifier("underline", ""),
            TextDecoration::Strikethrough => f.with_modifier("strikethrough", ""),
        };
        if run.letter_spacing != 0.0 {
            f = f.with_modifier("tracking", num(run.letter_spacing));
        }
        if let Some(c) = native_text_color(node, run, "SwiftUI", cx) {
            f = f.with_modifier("foregroundColor", color(&c));
        }
        f
    }

    /// Line spacing beyond the font's own height.
    fn line_spacing(run: &TextRun) -> Option<f64> {
        let height = match run.line_height {
            LineHeight::Auto => return None,
            LineHeight::Pixels(value) => value,
            LineHeight::Percent(value) => run.font_size * value / 100.0,
        };
        let extra = height - run.font_size;
        (extra > 0.0).then_some(extra)
    }

    fn stack(node: &AltNode, layout: &LayoutDescriptor, flow: Vec<Fragment>, cx: &mut EmitContext) -> Fragment {
        if layout.wrap {
            cx.warn(node, "wrapping layouts are not supported by SwiftUI; emitted a non-wrapping stack");
        }
        let gap = if layout.gap < 0.0 {
            cx.warn(node, format!("negative gap {} clamped to 0", num(layout.gap)));
            0.0
        } else {
            layout.gap
        };

        let mut f = match layout.direction {
            Direction::Column => {
                let f = Fragment::new("VStack");
                match layout.counter_align {
                    CounterAlign::Start | CounterAlign::Baseline => f.with_arg("alignment", ".leading"),
                    CounterAlign::Center => f,
                    CounterAlign::End => f.with_arg("alignment", ".trailing"),
                }
            }
            Direction::Row => {
                let f = Fragment::new("HStack");
                match layout.counter_align {
                    CounterAlign::Start => f.with_arg("alignment", ".top"),
                    CounterAlign::Center => f,
                    CounterAlign::End => f.with_arg("alignment", ".bottom"),
                    CounterAlign::Baseline => f.with_arg("alignment", ".firstTextBaseline"),
                }
            }
        };

        if layout.primary_align == PrimaryAlign::SpaceBetween {
            f = f.with_arg("spacing", "0");
            let count = flow.len();
            for (index, child) in flow.into_iter().enumerate() {
                f = f.with_child(child);
                if index + 1 < count {
                    f = f.with_child(Fragment::new("Spacer").with_arg("minLength", "0"));
                }
            }
        } else {
            f = f.with_arg("spacing", num(gap)).with_children(flow);
        }
        padding_modifiers(f, &layout.padding)
    }
}

impl Backend for SwiftUiBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::SwiftUi
    }

    fn with_position_styles(&self, fragment: Fragment, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let mut f = fragment;
        if node.opacity < 1.0 {
            f = f.with_modifier("opacity", num(node.opacity));
        }
        if node.geometry.is_rotated() {
            f = f.with_modifier("rotationEffect", format!(".degrees({})", num(node.geometry.rotation_degrees)));
        }
        if cx.is_absolute(node) {
            f = f.with_modifier(
                "offset",
                format!("x: {}, y: {}", num(node.geometry.x), num(node.geometry.y)),
            );
        }
        f
    }

    fn with_shape_styles(&self, fragment: Fragment, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let mut f = fragment;
        let is_shape = node.kind.is_shape();
        let shape = outline(node);

        if node.kind != NodeKind::Text {
            if let Some(fill) = top_paint(&node.paint.fills) {
                let style = match &fill.kind {
                    PaintKind::Solid(_) => fill.solid_color().map(|c| color(&c)),
                    PaintKind::Gradient(g) => Some(gradient(g, node.geometry.width)),
                    PaintKind::Image(_) => {
                        cx.warn(node, "image fills are not supported by SwiftUI; skipped");
                        None
                    }
                };
                if let Some(style) = style {
                    f = if is_shape {
                        f.with_modifier("fill", style)
                    } else if shape == "Rectangle()" {
                        f.with_modifier("background", style)
                    } else {
                        f.with_modifier("background", format!("{}, in: {}", style, shape))
                    };
                }
            }
        }

        if !is_shape && node.clips_content && node.kind != NodeKind::Text {
            if shape != "Rectangle()" {
                f = f.with_modifier("clipShape", shape.clone());
            } else {
                f = f.with_modifier("clipped", "");
            }
        }

        if node.has_visible_stroke() {
            match node.paint.strokes.iter().rev().find_map(|s| s.solid_color()) {
                Some(c) => {
                    let weight = num(node.stroke.weight);
                    let overlay = match node.stroke.align {
                        StrokeAlign::Inside => format!("{}.strokeBorder({}, lineWidth: {})", shape, color(&c), weight),
                        StrokeAlign::Center => format!("{}.stroke({}, lineWidth: {})", shape, color(&c), weight),
                        StrokeAlign::Outside => format!(
                            "{}.stroke({}, lineWidth: {}).padding({})",
                            shape,
                            color(&c),
                            weight,
                            num(-node.stroke.weight / 2.0)
                        ),
                    };
                    f = f.with_modifier("overlay", overlay);
                }
                None => cx.warn(node, "only solid strokes are supported; stroke skipped"),
            }
        }

        for effect in &node.effects {
            match effect {
                Effect::DropShadow(s) => {
                    f = f.with_modifier(
                        "shadow",
                        format!(
                            "color: {}, radius: {}, x: {}, y: {}",
                            color(&s.color),
                            num(s.radius / 2.0),
                            num(s.offset_x),
                            num(s.offset_y)
                        ),
                    );
                }
                Effect::InnerShadow(_) => cx.warn(node, "inner shadows are not supported by SwiftUI; skipped"),
                Effect::LayerBlur { radius } => f = f.with_modifier("blur", format!("radius: {}", num(radius / 2.0))),
                Effect::BackgroundBlur { .. } => f = f.with_modifier("background", ".ultraThinMaterial"),
            }
        }
        f
    }

    fn text(&self, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let Some(text) = &node.text else {
            return self.shape(node, cx);
        };
        let mut f = match text.runs.as_slice() {
            [] => Fragment::new("Text").with_arg("", "\"\""),
            [run] => Self::run_text(node, run, cx),
            runs => {
                let mut parts = Vec::with_capacity(runs.len());
                for run in runs {
                    let run_fragment = Self::run_text(node, run, cx);
                    let expression = view(&Fragment {
                        modifiers: Vec::new(),
                        ..run_fragment.clone()
                    }) + &run_fragment
                        .modifiers
                        .iter()
                        .map(|(name, args)| format!(".{}({})", name, args))
                        .collect::<String>();
                    parts.push(expression);
                }
                let mut lines = Vec::with_capacity(parts.len());
                for (index, part) in parts.into_iter().enumerate() {
                    lines.push(if index == 0 { part } else { format!("+ {}", part) });
                }
                Fragment {
                    content: lines,
                    ..Fragment::new("Text")
                }
            }
        };

        if let Some(spacing) = text.runs.first().and_then(Self::line_spacing) {
            f = f.with_modifier("lineSpacing", num(spacing));
        }
        f = match text.align {
            TextAlign::Left => f,
            TextAlign::Center => f.with_modifier("multilineTextAlignment", ".center"),
            TextAlign::Right => f.with_modifier("multilineTextAlignment", ".trailing"),
            TextAlign::Justified => {
                cx.warn(node, "justified text is not supported by SwiftUI; using leading alignment");
                f
            }
        };
        let f = Self::framed(f, node, None);
        let f = self.with_shape_styles(f, node, cx);
        self.with_position_styles(f, node, cx)
    }

    fn vector(&self, node: &AltNode, _markup: &str, cx: &mut EmitContext) -> Fragment {
        cx.warn(
            node,
            "inline SVG is not supported by SwiftUI; emitted an asset image placeholder",
        );
        let f = Fragment::new("Image")
            .with_arg("", format!("\"{}\"", resource_name(&node.unique_name)))
            .with_modifier("resizable", "");
        let f = Self::framed(f, node, None);
        self.with_position_styles(f, node, cx)
    }

    fn shape(&self, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let f = outline_view(node);
        let f = self.with_shape_styles(f, node, cx);
        let f = Self::framed(f, node, None);
        self.with_position_styles(f, node, cx)
    }

    fn container(
        &self,
        node: &AltNode,
        children: Vec<(&AltNode, Fragment)>,
        cx: &mut EmitContext,
    ) -> Fragment {
        let (flow, absolute) = partition_children(children);
        let (f, alignment) = match &node.layout {
            Some(layout) => {
                let stack = Self::stack(node, layout, flow, cx);
                let alignment = frame_alignment(layout);
                if absolute.is_empty() {
                    (stack, alignment)
                } else {
                    let overlay = Fragment::new("ZStack")
                        .with_arg("alignment", ".topLeading")
                        .with_child(stack)
                        .with_children(absolute);
                    (overlay, "topLeading")
                }
            }
            None => (
                Fragment::new("ZStack")
                    .with_arg("alignment", ".topLeading")
                    .with_children(flow)
                    .with_children(absolute),
                "topLeading",
            ),
        };
        let f = Self::framed(f, node, Some(alignment));
        let f = self.with_shape_styles(f, node, cx);
        self.with_position_styles(f, node, cx)
    }

    fn render(&self, fragment: &Fragment, _cx: &EmitContext) -> String {
        view(fragment)
    }

    fn document(&self, name: &str, bodies: &[String], config: &RunConfig) -> Result<String> {
        if config.swiftui_mode == SwiftUiMode::Snippet {
            return Ok(bodies.join("\n\n"));
        }
        let body = match bodies {
            [] => "EmptyView()".to_string(),
            [single] => single.clone(),
            many => format!(
                "VStack(alignment: .leading, spacing: 0) {{\n{}\n}}",
                indent_block(&many.join("\n"), 4)
            ),
        };
        let data = DocumentData {
            name,
            body: &body,
            header: "",
        };
        let mut engine = TemplateEngine::new();
        let mut out = engine.render_wrapper("swiftui-view", VIEW_STRUCT, &data)?;
        if config.swiftui_mode == SwiftUiMode::Preview {
            let preview = engine.render_wrapper("swiftui-preview", PREVIEW, &data)?;
            out.push_str(&preview);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::emit;
    use altcode_core::{AltTree, CancellationFlag, PaintEntry, Positioning, TextCase, TextContent};
    use altcode_resolver::Palette;
    use pretty_assertions::assert_eq;

    fn config(mode: SwiftUiMode) -> RunConfig {
        RunConfig {
            swiftui_mode: mode,
            ..RunConfig::new(BackendKind::SwiftUi)
        }
    }

    fn text_run(characters: &str, weight: u16) -> TextRun {
        TextRun {
            characters: characters.to_string(),
            font_size: 17.0,
            font_weight: weight,
            font_family: "SF Pro".to_string(),
            italic: false,
            decoration: TextDecoration::None,
            case_transform: TextCase::Original,
            fill_ref: None,
            letter_spacing: 0.0,
            line_height: LineHeight::Auto,
        }
    }

    fn profile() -> AltTree {
        let mut tree = AltTree::new();
        let mut layout = LayoutDescriptor::new(Direction::Column);
        layout.gap = 4.0;
        layout.padding = Padding::uniform(12.0);
        let mut root = AltNode::new(NodeKind::Container, "Profile")
            .with_size(200.0, 80.0)
            .with_layout(layout)
            .with_fill(PaintEntry::solid(Color::WHITE));
        root.unique_name = "Profile".to_string();
        root.corner_radius = CornerRadius::Uniform(12.0);
        let root = tree.insert(root, None);

        let mut name = AltNode::new(NodeKind::Text, "Name").with_text(TextContent {
            runs: vec![text_run("Ada ", 400), text_run("Lovelace", 700)],
            auto_resize: altcode_core::TextAutoResize::WidthAndHeight,
            ..Default::default()
        });
        name.unique_name = "Name".to_string();
        tree.insert(name, Some(root));
        tree
    }

    #[test]
    fn test_snippet() {
        let out = emit(&profile(), &config(SwiftUiMode::Snippet), &Palette::tailwind(), &CancellationFlag::new())
            .unwrap();
        assert_eq!(
            out.code,
            "VStack(alignment: .leading, spacing: 4) {
    Text(\"Ada \").font(.custom(\"SF Pro\", size: 17))
    + Text(\"Lovelace\").font(.custom(\"SF Pro\", size: 17)).fontWeight(.bold)
}
.padding(12)
.frame(width: 200, height: 80, alignment: .topLeading)
.background(Color(red: 1, green: 1, blue: 1), in: RoundedRectangle(cornerRadius: 12))"
        );
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_preview_mode() {
        let out = emit(&profile(), &config(SwiftUiMode::Preview), &Palette::tailwind(), &CancellationFlag::new())
            .unwrap();
        assert!(out.code.starts_with("import SwiftUI\n\nstruct Profile: View {\n    var body: some View {\n        VStack("));
        assert!(out.code.ends_with("    }\n}\n\n#Preview {\n    Profile()\n}\n"));
    }

    #[test]
    fn test_capability_gaps() {
        let mut tree = AltTree::new();
        let mut layout = LayoutDescriptor::new(Direction::Row);
        layout.wrap = true;
        let mut root = AltNode::new(NodeKind::Container, "Tags")
            .with_size(120.0, 40.0)
            .with_layout(layout);
        root.unique_name = "Tags".to_string();
        let root = tree.insert(root, None);

        let mut icon = AltNode::new(NodeKind::Vector, "Star Icon").with_size(16.0, 16.0);
        icon.unique_name = "Star_Icon".to_string();
        icon.can_flatten_to_vector = true;
        icon.embedded_vector_markup = Some("<svg/>".to_string());
        icon.positioning = Positioning::Absolute;
        icon.geometry.x = 100.0;
        tree.insert(icon, Some(root));

        let out = emit(&tree, &config(SwiftUiMode::Snippet), &Palette::tailwind(), &CancellationFlag::new())
            .unwrap();
        assert!(out.code.starts_with("ZStack(alignment: .topLeading) {\n    HStack(alignment: .top, spacing: 0) {\n    }"));
        assert!(out.code.contains("Image(\"star_icon\")\n        .resizable()\n        .frame(width: 16, height: 16)\n        .offset(x: 100, y: 0)"));
        assert_eq!(out.diagnostics.len(), 2);
    }

    #[test]
    fn test_frame_alignment() {
        let mut layout = LayoutDescriptor::new(Direction::Row);
        layout.primary_align = PrimaryAlign::End;
        layout.counter_align = CounterAlign::Center;
        assert_eq!(frame_alignment(&layout), "trailing");
        layout.direction = Direction::Column;
        assert_eq!(frame_alignment(&layout), "bottom");
    }
}
