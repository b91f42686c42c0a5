//! Value formatting shared by the backends.

use altcode_core::{Color, Gradient, GradientStop, PaintEntry, PaintKind};
use convert_case::{Case, Casing};

/// A number with at most two decimals and no trailing zeros.
pub fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 || !rounded.is_finite() {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}

/// A number with at most `places` decimals and no trailing zeros.
pub fn fixed(value: f64, places: usize) -> String {
    let formatted = format!("{:.*}", places, value);
    if !formatted.contains('.') {
        return formatted;
    }
    match formatted.trim_end_matches('0').trim_end_matches('.') {
        "" | "-" | "-0" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// A single-quoted CSS string. Quotes, backslashes and markup-significant
/// characters become hex escapes so the value is safe inside an attribute.
pub fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' | '"' | '\\' | '<' | '>' | '&' | '\n' => {
                out.push_str(&format!("\\{:x} ", c as u32))
            }
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

pub fn px(value: f64) -> String {
    format!("{}px", num(value))
}

fn percent(fraction: f64) -> String {
    format!("{}%", num(fraction * 100.0))
}

/// `#rrggbb` when opaque, `rgba(…)` otherwise.
pub fn css_color(color: &Color) -> String {
    let (r, g, b, a) = color.to_rgba8();
    if a == 255 {
        color.to_hex_rgb()
    } else {
        format!("rgba({}, {}, {}, {})", r, g, b, num(a as f64 / 255.0))
    }
}

/// `0xAARRGGBB`, as the native toolkits spell color literals.
pub fn argb_hex(color: &Color) -> String {
    let (r, g, b, a) = color.to_rgba8();
    format!("0x{:02X}{:02X}{:02X}{:02X}", a, r, g, b)
}

/// A design-token name as a kebab-case identifier: `Colors/Primary 500`
/// becomes `colors-primary-500`.
pub fn token_ident(name: &str) -> String {
    let spaced: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    spaced.to_case(Case::Kebab)
}

/// CSS value of a solid paint, as a custom property with the literal as
/// fallback when a variable is bound.
pub fn css_solid(entry: &PaintEntry, use_variables: bool) -> Option<String> {
    let color = entry.solid_color()?;
    match &entry.variable {
        Some(binding) if use_variables => Some(format!(
            "var(--{}, {})",
            token_ident(&binding.name),
            css_color(&color)
        )),
        _ => Some(css_color(&color)),
    }
}

fn css_stops(stops: &[GradientStop]) -> String {
    stops
        .iter()
        .map(|stop| format!("{} {}", css_color(&stop.effective_color()), percent(stop.offset)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn css_gradient(gradient: &Gradient) -> String {
    match gradient {
        Gradient::Linear(g) => format!("linear-gradient({}deg, {})", num(g.angle), css_stops(&g.stops)),
        Gradient::Radial(g) => format!(
            "radial-gradient({} {} at {} {}, {})",
            percent(g.radius_x),
            percent(g.radius_y),
            percent(g.center_x),
            percent(g.center_y),
            css_stops(&g.stops)
        ),
        Gradient::Angular(g) => format!(
            "conic-gradient(from {}deg at {} {}, {})",
            num(g.start_angle),
            percent(g.center_x),
            percent(g.center_y),
            css_stops(&g.stops)
        ),
    }
}

/// The paint that ends up on top: the host lists fills bottom to top.
pub fn top_paint(entries: &[PaintEntry]) -> Option<&PaintEntry> {
    entries.last()
}

/// First solid color among `entries`, from the top.
pub fn top_solid(entries: &[PaintEntry]) -> Option<Color> {
    entries.iter().rev().find_map(PaintEntry::solid_color)
}

pub fn has_image(entries: &[PaintEntry]) -> bool {
    entries.iter().any(|e| matches!(e.kind, PaintKind::Image(_)))
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Double-quoted string literal body. `$` is escaped for languages that
/// interpolate it.
pub fn escape_literal(text: &str, escape_dollar: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '$' if escape_dollar => out.push_str("\\$"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use altcode_core::{LinearGradient, VariableBinding};

    #[test]
    fn test_num() {
        assert_eq!(num(16.0), "16");
        assert_eq!(num(12.346), "12.35");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(-4.5), "-4.5");
    }

    #[test]
    fn test_fixed() {
        assert_eq!(fixed(0.23137, 3), "0.231");
        assert_eq!(fixed(1.0, 3), "1");
        assert_eq!(fixed(-0.0001, 3), "0");
        assert_eq!(fixed(120.0, 0), "120");
    }

    #[test]
    fn test_css_string() {
        assert_eq!(css_string("Inter"), "'Inter'");
        assert_eq!(css_string("O'Brien \"Sans\""), "'O\\27 Brien \\22 Sans\\22 '");
        assert_eq!(css_string("A&B"), "'A\\26 B'");
    }

    #[test]
    fn test_colors() {
        assert_eq!(css_color(&Color::from_rgb8(59, 130, 246)), "#3b82f6");
        assert_eq!(css_color(&Color::rgba(0.0, 0.0, 0.0, 0.5)), "rgba(0, 0, 0, 0.5)");
        assert_eq!(argb_hex(&Color::from_rgb8(59, 130, 246)), "0xFF3B82F6");
    }

    #[test]
    fn test_variable_fallback() {
        let entry = PaintEntry {
            variable: Some(VariableBinding {
                name: "Colors/Primary 500".to_string(),
                fallback_hex: "#3b82f6".to_string(),
            }),
            ..PaintEntry::solid(Color::from_rgb8(59, 130, 246))
        };
        assert_eq!(
            css_solid(&entry, true).as_deref(),
            Some("var(--colors-primary-500, #3b82f6)")
        );
        assert_eq!(css_solid(&entry, false).as_deref(), Some("#3b82f6"));
    }

    #[test]
    fn test_linear_gradient() {
        let gradient = Gradient::Linear(LinearGradient {
            angle: 90.0,
            stops: vec![
                GradientStop::new(0.0, Color::BLACK, 1.0),
                GradientStop::new(1.0, Color::WHITE, 1.0),
            ],
        });
        assert_eq!(
            css_gradient(&gradient),
            "linear-gradient(90deg, #000000 0%, #ffffff 100%)"
        );
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_html("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_literal("say \"$5\"\n", true), "say \\\"\\$5\\\"\\n");
    }
}
