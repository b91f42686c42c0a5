//! Jetpack Compose composables.
//!
//! `args` are named arguments (the empty key is positional), `modifiers` are
//! the `Modifier` chain in call order, and `children` form the trailing
//! content lambda.

use super::{apply_case, dims, fills_main_axis, native_text_color, resource_name, unit_points, Dim};
use crate::engine::{partition_children, Backend, EmitContext};
use crate::error::Result;
use crate::format::{argb_hex, escape_literal, num, top_paint};
use crate::fragment::Fragment;
use crate::templates::{indent_block, DocumentData, TemplateEngine};
use altcode_core::{
    AltNode, BackendKind, Color, ComposeMode, CornerRadius, CounterAlign, Direction, Effect,
    Gradient, LayoutDescriptor, LineHeight, NodeKind, Padding, PaintKind, PrimaryAlign, RunConfig,
    TextAlign, TextDecoration, TextRun,
};

pub struct ComposeBackend;

const CONTAINERS: [&str; 5] = ["Row", "Column", "Box", "FlowRow", "FlowColumn"];
const INLINE_WIDTH: usize = 100;
const CHAIN_WIDTH: usize = 80;

const COMPOSABLE: &str = "{{header}}@Composable
fun {{pascal_case name}}() {
{{indent body 4}}
}
";

/// Imports keyed by the text that makes them necessary.
const IMPORTS: &[(&[&str], &str)] = &[
    (&["Image("], "androidx.compose.foundation.Image"),
    (&[".background("], "androidx.compose.foundation.background"),
    (&[".border("], "androidx.compose.foundation.border"),
    (&["Arrangement."], "androidx.compose.foundation.layout.Arrangement"),
    (&["Box(", "Box {"], "androidx.compose.foundation.layout.Box"),
    (&["Column(", "Column {"], "androidx.compose.foundation.layout.Column"),
    (&["FlowColumn("], "androidx.compose.foundation.layout.FlowColumn"),
    (&["FlowRow("], "androidx.compose.foundation.layout.FlowRow"),
    (&["Row(", "Row {"], "androidx.compose.foundation.layout.Row"),
    (&[".fillMaxHeight("], "androidx.compose.foundation.layout.fillMaxHeight"),
    (&[".fillMaxWidth("], "androidx.compose.foundation.layout.fillMaxWidth"),
    (&[".height("], "androidx.compose.foundation.layout.height"),
    (&[".offset("], "androidx.compose.foundation.layout.offset"),
    (&[".padding("], "androidx.compose.foundation.layout.padding"),
    (&[".size("], "androidx.compose.foundation.layout.size"),
    (&[".width("], "androidx.compose.foundation.layout.width"),
    (&["CircleShape"], "androidx.compose.foundation.shape.CircleShape"),
    (&["RoundedCornerShape"], "androidx.compose.foundation.shape.RoundedCornerShape"),
    (&["Text("], "androidx.compose.material3.Text"),
    (&["@Composable"], "androidx.compose.runtime.Composable"),
    (&["Alignment."], "androidx.compose.ui.Alignment"),
    (&["Modifier"], "androidx.compose.ui.Modifier"),
    (&[".alpha("], "androidx.compose.ui.draw.alpha"),
    (&[".blur("], "androidx.compose.ui.draw.blur"),
    (&[".clip("], "androidx.compose.ui.draw.clip"),
    (&[".clipToBounds("], "androidx.compose.ui.draw.clipToBounds"),
    (&[".rotate("], "androidx.compose.ui.draw.rotate"),
    (&[".shadow("], "androidx.compose.ui.draw.shadow"),
    (&["Offset("], "androidx.compose.ui.geometry.Offset"),
    (&["Brush."], "androidx.compose.ui.graphics.Brush"),
    (&["Color("], "androidx.compose.ui.graphics.Color"),
    (&["Shadow("], "androidx.compose.ui.graphics.Shadow"),
    (&["painterResource("], "androidx.compose.ui.res.painterResource"),
    (&["SpanStyle("], "androidx.compose.ui.text.SpanStyle"),
    (&["TextStyle("], "androidx.compose.ui.text.TextStyle"),
    (&["buildAnnotatedString"], "androidx.compose.ui.text.buildAnnotatedString"),
    (&["FontStyle."], "androidx.compose.ui.text.font.FontStyle"),
    (&["FontWeight"], "androidx.compose.ui.text.font.FontWeight"),
    (&["TextAlign."], "androidx.compose.ui.text.style.TextAlign"),
    (&["TextDecoration."], "androidx.compose.ui.text.style.TextDecoration"),
    (&["withStyle("], "androidx.compose.ui.text.withStyle"),
    (&[".dp"], "androidx.compose.ui.unit.dp"),
    (&[".sp,", ".sp)", ".sp\n"], "androidx.compose.ui.unit.sp"),
];

fn color(c: &Color) -> String {
    format!("Color({})", argb_hex(c))
}

fn dp(value: f64) -> String {
    format!("{}.dp", num(value))
}

fn sp(value: f64) -> String {
    format!("{}.sp", num(value))
}

fn float(value: f64) -> String {
    format!("{}f", num(value))
}

/// `Name(a, b = c)` on one line when it fits, one argument per line otherwise.
fn invocation(name: &str, parts: &[String]) -> String {
    let inline = parts.join(", ");
    if !inline.contains('\n') && name.len() + inline.len() + 2 <= INLINE_WIDTH {
        format!("{}({})", name, inline)
    } else {
        let body: Vec<String> = parts.iter().map(|part| format!("{},", part)).collect();
        format!("{}(\n{}\n)", name, indent_block(&body.join("\n"), 4))
    }
}

fn modifier_chain(modifiers: &[(String, String)]) -> Option<String> {
    if modifiers.is_empty() {
        return None;
    }
    let calls: Vec<String> = modifiers
        .iter()
        .map(|(name, args)| format!(".{}({})", name, args))
        .collect();
    let inline = format!("Modifier{}", calls.concat());
    if inline.len() <= CHAIN_WIDTH {
        Some(inline)
    } else {
        Some(format!("Modifier\n{}", indent_block(&calls.join("\n"), 4)))
    }
}

fn composable(fragment: &Fragment) -> String {
    let mut parts: Vec<String> = fragment
        .args
        .iter()
        .filter(|(name, _)| name.is_empty())
        .map(|(_, value)| value.clone())
        .collect();
    if let Some(chain) = modifier_chain(&fragment.modifiers) {
        parts.push(format!("modifier = {}", chain));
    }
    parts.extend(
        fragment
            .args
            .iter()
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| format!("{} = {}", name, value)),
    );

    let has_lambda = CONTAINERS.contains(&fragment.element.as_str()) && !fragment.children.is_empty();
    let out = if has_lambda {
        let head = if parts.is_empty() {
            fragment.element.clone()
        } else {
            invocation(&fragment.element, &parts)
        };
        let body: Vec<String> = fragment.children.iter().map(composable).collect();
        format!("{} {{\n{}\n}}", head, indent_block(&body.join("\n"), 4))
    } else {
        invocation(&fragment.element, &parts)
    };
    match &fragment.comment {
        Some(comment) => format!("// {}\n{}", comment, out),
        None => out,
    }
}

fn corner_shape(node: &AltNode) -> Option<String> {
    if node.kind == NodeKind::Ellipse {
        return Some("CircleShape".to_string());
    }
    match node.corner_radius {
        CornerRadius::Uniform(r) if r > 0.0 => Some(format!("RoundedCornerShape({})", dp(r))),
        CornerRadius::PerCorner([tl, tr, br, bl]) if !node.corner_radius.is_zero() => Some(format!(
            "RoundedCornerShape(topStart = {}, topEnd = {}, bottomEnd = {}, bottomStart = {})",
            dp(tl),
            dp(tr),
            dp(br),
            dp(bl)
        )),
        _ => None,
    }
}

/// A gradient brush in the node's pixel space.
fn brush(g: &Gradient, node: &AltNode) -> String {
    let (width, height) = (node.geometry.width, node.geometry.height);
    let offset = |x: f64, y: f64| format!("Offset({}, {})", float(x * width), float(y * height));
    let stops: Vec<String> = g
        .stops()
        .iter()
        .map(|s| format!("{} to {}", float(s.offset), color(&s.effective_color())))
        .collect();
    let stops = stops.join(", ");
    match g {
        Gradient::Linear(linear) => {
            let ((sx, sy), (ex, ey)) = unit_points(linear.angle);
            format!(
                "Brush.linearGradient({}, start = {}, end = {})",
                stops,
                offset(sx, sy),
                offset(ex, ey)
            )
        }
        Gradient::Radial(radial) => format!(
            "Brush.radialGradient({}, center = {}, radius = {})",
            stops,
            offset(radial.center_x, radial.center_y),
            float(radial.radius_x * width)
        ),
        Gradient::Angular(angular) => format!(
            "Brush.sweepGradient({}, center = {})",
            stops,
            offset(angular.center_x, angular.center_y)
        ),
    }
}

fn padding_modifier(fragment: Fragment, p: &Padding) -> Fragment {
    if p.is_zero() {
        fragment
    } else if p.is_uniform() {
        fragment.with_modifier("padding", dp(p.top))
    } else if p.is_symmetric() {
        fragment.with_modifier(
            "padding",
            format!("horizontal = {}, vertical = {}", dp(p.left), dp(p.top)),
        )
    } else {
        fragment.with_modifier(
            "padding",
            format!(
                "start = {}, top = {}, end = {}, bottom = {}",
                dp(p.left),
                dp(p.top),
                dp(p.right),
                dp(p.bottom)
            ),
        )
    }
}

fn font_weight(weight: u16) -> String {
    let named = match weight {
        100 => "Thin",
        200 => "ExtraLight",
        300 => "Light",
        400 => "Normal",
        500 => "Medium",
        600 => "SemiBold",
        700 => "Bold",
        800 => "ExtraBold",
        900 => "Black",
        other => return format!("FontWeight({})", other),
    };
    format!("FontWeight.{}", named)
}

/// Main-axis arrangement, or `None` for the default packed start.
fn arrangement(layout: &LayoutDescriptor, horizontal: bool) -> Option<String> {
    let gap = layout.gap;
    let anchor = match (layout.primary_align, horizontal) {
        (PrimaryAlign::SpaceBetween, _) => return Some("Arrangement.SpaceBetween".to_string()),
        (PrimaryAlign::Start, true) => "Alignment.Start",
        (PrimaryAlign::Center, true) => "Alignment.CenterHorizontally",
        (PrimaryAlign::End, true) => "Alignment.End",
        (PrimaryAlign::Start, false) => "Alignment.Top",
        (PrimaryAlign::Center, false) => "Alignment.CenterVertically",
        (PrimaryAlign::End, false) => "Alignment.Bottom",
    };
    match layout.primary_align {
        _ if gap != 0.0 && layout.primary_align == PrimaryAlign::Start => {
            Some(format!("Arrangement.spacedBy({})", dp(gap)))
        }
        _ if gap != 0.0 => Some(format!("Arrangement.spacedBy({}, {})", dp(gap), anchor)),
        PrimaryAlign::Start => None,
        PrimaryAlign::Center => Some("Arrangement.Center".to_string()),
        _ if horizontal => Some("Arrangement.End".to_string()),
        _ => Some("Arrangement.Bottom".to_string()),
    }
}

impl ComposeBackend {
    fn sized(fragment: Fragment, node: &AltNode, cx: &EmitContext) -> Fragment {
        let (width, height) = dims(node);
        match (width, height) {
            (Dim::Fixed(w), Dim::Fixed(h)) if w == h => return fragment.with_modifier("size", dp(w)),
            (Dim::Fixed(w), Dim::Fixed(h)) => {
                return fragment.with_modifier("size", format!("{}, {}", dp(w), dp(h)))
            }
            _ => {}
        }
        let mut f = fragment;
        for (horizontal, dim) in [(true, width), (false, height)] {
            f = match dim {
                Dim::Fixed(value) => f.with_modifier(if horizontal { "width" } else { "height" }, dp(value)),
                Dim::Fill if fills_main_axis(node, horizontal, cx) => f.with_modifier("weight", "1f"),
                Dim::Fill => f.with_modifier(if horizontal { "fillMaxWidth" } else { "fillMaxHeight" }, ""),
                Dim::Hug => f,
            };
        }
        f
    }

    fn span_args(node: &AltNode, run: &TextRun, cx: &mut EmitContext) -> Vec<(String, String)> {
        let mut args = Vec::new();
        if let Some(c) = native_text_color(node, run, "Compose", cx) {
            args.push(("color".to_string(), color(&c)));
        }
        args.push(("fontSize".to_string(), sp(run.font_size)));
        if run.font_weight != 400 {
            args.push(("fontWeight".to_string(), font_weight(run.font_weight)));
        }
        if run.italic {
            args.push(("fontStyle".to_string(), "FontStyle.Italic".to_string()));
        }
        match run.decoration {
            TextDecoration::None => {}
            TextDecoration::Underline => {
                args.push(("textDecoration".to_string(), "TextDecoration.Underline".to_string()))
            }
            TextDecoration::Strikethrough => {
                args.push(("textDecoration".to_string(), "TextDecoration.LineThrough".to_string()))
            }
        }
        if run.letter_spacing != 0.0 {
            args.push(("letterSpacing".to_string(), sp(run.letter_spacing)));
        }
        args
    }

    fn literal(run: &TextRun) -> String {
        format!("\"{}\"", escape_literal(&apply_case(&run.characters, run.case_transform), true))
    }

    fn text_shadow(node: &AltNode, cx: &mut EmitContext) -> Option<String> {
        let mut shadows = node.effects.iter().filter_map(|effect| match effect {
            Effect::DropShadow(s) => Some(s),
            _ => None,
        });
        let first = shadows.next()?;
        if shadows.next().is_some() {
            cx.warn(node, "Compose supports one shadow per element; extra shadows skipped");
        }
        Some(format!(
            "TextStyle(shadow = Shadow(color = {}, offset = Offset({}, {}), blurRadius = {}))",
            color(&first.color),
            float(first.offset_x),
            float(first.offset_y),
            float(first.radius)
        ))
    }

    fn flow(node: &AltNode, layout: &LayoutDescriptor, flow: Vec<Fragment>, cx: &mut EmitContext) -> Fragment {
        let horizontal = layout.direction == Direction::Row;
        let element = match (layout.direction, layout.wrap) {
            (Direction::Row, false) => "Row",
            (Direction::Column, false) => "Column",
            (Direction::Row, true) => "FlowRow",
            (Direction::Column, true) => "FlowColumn",
        };
        let mut f = Fragment::new(element);
        let main = if horizontal { "horizontalArrangement" } else { "verticalArrangement" };
        if let Some(arrangement) = arrangement(layout, horizontal) {
            f = f.with_arg(main, arrangement);
        }
        if layout.wrap && layout.gap != 0.0 {
            let cross = if horizontal { "verticalArrangement" } else { "horizontalArrangement" };
            f = f.with_arg(cross, format!("Arrangement.spacedBy({})", dp(layout.gap)));
        }
        let counter = match (layout.counter_align, horizontal) {
            (CounterAlign::Start, _) => None,
            (CounterAlign::Center, true) => Some("Alignment.CenterVertically"),
            (CounterAlign::End, true) => Some("Alignment.Bottom"),
            (CounterAlign::Center, false) => Some("Alignment.CenterHorizontally"),
            (CounterAlign::End, false) => Some("Alignment.End"),
            (CounterAlign::Baseline, _) => {
                cx.warn(node, "baseline alignment is not supported by Compose; using start");
                None
            }
        };
        if let (Some(counter), false) = (counter, layout.wrap) {
            let name = if horizontal { "verticalAlignment" } else { "horizontalAlignment" };
            f = f.with_arg(name, counter);
        }
        f.with_children(flow)
    }
}

impl Backend for ComposeBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Compose
    }

    fn with_position_styles(&self, fragment: Fragment, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let mut f = fragment;
        if cx.is_absolute(node) {
            f = f.with_modifier(
                "offset",
                format!("x = {}, y = {}", dp(node.geometry.x), dp(node.geometry.y)),
            );
        }
        if node.geometry.is_rotated() {
            f = f.with_modifier("rotate", float(node.geometry.rotation_degrees));
        }
        if node.opacity < 1.0 {
            f = f.with_modifier("alpha", float(node.opacity));
        }
        Self::sized(f, node, cx)
    }

    fn with_shape_styles(&self, fragment: Fragment, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let mut f = fragment;
        let shape = corner_shape(node);
        let with_shape = |value: String| match &shape {
            Some(shape) => format!("{}, {}", value, shape),
            None => value,
        };
        let is_text = node.kind == NodeKind::Text;

        if !is_text {
            let mut shadows = 0;
            for effect in &node.effects {
                match effect {
                    Effect::DropShadow(s) => {
                        shadows += 1;
                        if shadows == 1 {
                            f = f.with_modifier("shadow", with_shape(dp(s.radius / 2.0)));
                        }
                    }
                    Effect::InnerShadow(_) => {
                        cx.warn(node, "inner shadows are not supported by Compose; skipped")
                    }
                    _ => {}
                }
            }
            if shadows > 1 {
                cx.warn(node, "Compose supports one shadow per element; extra shadows skipped");
            }
        }

        if node.clips_content {
            f = match &shape {
                Some(shape) => f.with_modifier("clip", shape.clone()),
                None => f.with_modifier("clipToBounds", ""),
            };
        }

        if !is_text {
            if let Some(fill) = top_paint(&node.paint.fills) {
                match &fill.kind {
                    PaintKind::Solid(_) => {
                        if let Some(c) = fill.solid_color() {
                            f = f.with_modifier("background", with_shape(color(&c)));
                        }
                    }
                    PaintKind::Gradient(g) => f = f.with_modifier("background", with_shape(brush(g, node))),
                    PaintKind::Image(_) => cx.warn(node, "image fills are not supported by Compose; skipped"),
                }
            }
        }

        if node.has_visible_stroke() {
            match node.paint.strokes.iter().rev().find_map(|s| s.solid_color()) {
                Some(c) => {
                    f = f.with_modifier(
                        "border",
                        with_shape(format!("{}, {}", dp(node.stroke.weight), color(&c))),
                    )
                }
                None => cx.warn(node, "only solid strokes are supported; stroke skipped"),
            }
        }

        for effect in &node.effects {
            match effect {
                Effect::LayerBlur { radius } => f = f.with_modifier("blur", dp(radius / 2.0)),
                Effect::BackgroundBlur { .. } => {
                    cx.warn(node, "background blur is not supported by Compose; skipped")
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
        let f = self.with_position_styles(Fragment::new("Text"), node, cx);
        let mut f = self.with_shape_styles(f, node, cx);

        f = match text.runs.as_slice() {
            [] => f.with_arg("text", "\"\""),
            [run] => {
                let mut f = f.with_arg("text", Self::literal(run));
                for (name, value) in Self::span_args(node, run, cx) {
                    f = f.with_arg(name, value);
                }
                f
            }
            runs => {
                let mut spans = Vec::with_capacity(runs.len());
                for run in runs {
                    let args: Vec<String> = Self::span_args(node, run, cx)
                        .into_iter()
                        .map(|(name, value)| format!("{} = {}", name, value))
                        .collect();
                    spans.push(format!(
                        "withStyle({}) {{\n    append({})\n}}",
                        invocation("SpanStyle", &args),
                        Self::literal(run)
                    ));
                }
                f.with_arg(
                    "text",
                    format!("buildAnnotatedString {{\n{}\n}}", indent_block(&spans.join("\n"), 4)),
                )
            }
        };

        if let Some(run) = text.runs.first() {
            let height = match run.line_height {
                LineHeight::Auto => None,
                LineHeight::Pixels(value) => Some(value),
                LineHeight::Percent(value) => Some(run.font_size * value / 100.0),
            };
            if let Some(height) = height {
                f = f.with_arg("lineHeight", sp(height));
            }
        }
        f = match text.align {
            TextAlign::Left => f,
            TextAlign::Center => f.with_arg("textAlign", "TextAlign.Center"),
            TextAlign::Right => f.with_arg("textAlign", "TextAlign.End"),
            TextAlign::Justified => f.with_arg("textAlign", "TextAlign.Justify"),
        };
        for effect in &node.effects {
            if let Effect::InnerShadow(_) = effect {
                cx.warn(node, "inner shadows on text are not supported; skipped");
            }
        }
        match Self::text_shadow(node, cx) {
            Some(style) => f.with_arg("style", style),
            None => f,
        }
    }

    fn vector(&self, node: &AltNode, _markup: &str, cx: &mut EmitContext) -> Fragment {
        cx.warn(
            node,
            "inline SVG is not supported by Compose; emitted a drawable resource placeholder",
        );
        let f = Fragment::new("Image").with_arg(
            "painter",
            format!("painterResource(id = R.drawable.{})", resource_name(&node.unique_name)),
        );
        self.with_position_styles(f, node, cx)
            .with_arg("contentDescription", format!("\"{}\"", escape_literal(&node.name, true)))
    }

    fn shape(&self, node: &AltNode, cx: &mut EmitContext) -> Fragment {
        let f = self.with_position_styles(Fragment::new("Box"), node, cx);
        self.with_shape_styles(f, node, cx)
    }

    fn container(
        &self,
        node: &AltNode,
        children: Vec<(&AltNode, Fragment)>,
        cx: &mut EmitContext,
    ) -> Fragment {
        let (flow, absolute) = partition_children(children);
        let outer = |element: &str, cx: &mut EmitContext| {
            let f = self.with_position_styles(Fragment::new(element), node, cx);
            self.with_shape_styles(f, node, cx)
        };
        match &node.layout {
            Some(layout) if absolute.is_empty() => {
                let inner = Self::flow(node, layout, flow, cx);
                let styled = outer(inner.element.as_str(), cx);
                let merged = Fragment {
                    args: inner.args,
                    children: inner.children,
                    ..styled
                };
                padding_modifier(merged, &layout.padding)
            }
            Some(layout) => {
                let mut inner = Self::flow(node, layout, flow, cx);
                if matches!(dims(node), (Dim::Fixed(_), Dim::Fixed(_))) {
                    inner = inner.with_modifier("matchParentSize", "");
                }
                let inner = padding_modifier(inner, &layout.padding);
                outer("Box", cx).with_child(inner).with_children(absolute)
            }
            None => outer("Box", cx).with_children(flow).with_children(absolute),
        }
    }

    fn render(&self, fragment: &Fragment, _cx: &EmitContext) -> String {
        composable(fragment)
    }

    fn document(&self, name: &str, bodies: &[String], config: &RunConfig) -> Result<String> {
        if config.compose_mode == ComposeMode::Snippet {
            return Ok(bodies.join("\n\n"));
        }
        let body = match bodies {
            [] => "Box(modifier = Modifier)".to_string(),
            [single] => single.clone(),
            many => format!("Column {{\n{}\n}}", indent_block(&many.join("\n"), 4)),
        };

        let scanned = format!("@Composable\n{}\n", body);
        let header: String = IMPORTS
            .iter()
            .filter(|(needles, _)| needles.iter().any(|needle| scanned.contains(needle)))
            .map(|(_, import)| format!("import {}\n", import))
            .collect::<String>()
            + "\n";

        let data = DocumentData {
            name,
            body: &body,
            header: &header,
        };
        TemplateEngine::new().render_wrapper("compose-composable", COMPOSABLE, &data)
    }
}
