//! Core value types: colors, gradients, rectangles.

use serde::{Deserialize, Serialize};

/// An RGBA color with normalized components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 8-bit RGB values.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Create from hex string (e.g., "#FF5733", "FF5733", or "#FF573380").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?)),
            8 => {
                let mut color = Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?);
                color.a = channel(6)? as f32 / 255.0;
                Some(color)
            }
            _ => None,
        }
    }

    /// Convert to 8-bit RGBA tuple.
    pub fn to_rgba8(&self) -> (u8, u8, u8, u8) {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b), q(self.a))
    }

    /// Lowercase hex, `#rrggbb` when opaque and `#rrggbbaa` otherwise.
    pub fn to_hex(&self) -> String {
        let (r, g, b, a) = self.to_rgba8();
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }

    /// Hex of the color channels only, ignoring alpha.
    pub fn to_hex_rgb(&self) -> String {
        let (r, g, b, _) = self.to_rgba8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Return the color with its alpha multiplied by `opacity`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        Self {
            a: (self.a as f64 * opacity.clamp(0.0, 1.0)) as f32,
            ..self
        }
    }

    /// Euclidean distance in normalized RGB space (alpha ignored).
    pub fn rgb_distance(&self, other: &Color) -> f64 {
        let dr = (self.r - other.r) as f64;
        let dg = (self.g - other.g) as f64;
        let db = (self.b - other.b) as f64;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    pub fn is_opaque(&self) -> bool {
        self.to_rgba8().3 == 255
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Finite coordinates and non-negative size.
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// A normalized gradient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Gradient {
    Linear(LinearGradient),
    Radial(RadialGradient),
    Angular(AngularGradient),
}

impl Gradient {
    pub fn stops(&self) -> &[GradientStop] {
        match self {
            Gradient::Linear(g) => &g.stops,
            Gradient::Radial(g) => &g.stops,
            Gradient::Angular(g) => &g.stops,
        }
    }
}

/// A linear gradient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearGradient {
    /// CSS angle in degrees (0 = towards top, 90 = towards right)
    pub angle: f64,
    pub stops: Vec<GradientStop>,
}

/// A radial gradient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadialGradient {
    /// Center X position (0.0 to 1.0, relative to bounds)
    pub center_x: f64,
    /// Center Y position (0.0 to 1.0, relative to bounds)
    pub center_y: f64,
    /// Horizontal radius relative to the width
    pub radius_x: f64,
    /// Vertical radius relative to the height
    pub radius_y: f64,
    pub stops: Vec<GradientStop>,
}

/// An angular (conic) gradient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngularGradient {
    pub center_x: f64,
    pub center_y: f64,
    /// Starting angle in CSS degrees
    pub start_angle: f64,
    pub stops: Vec<GradientStop>,
}

/// A color stop in a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    /// Position along the gradient (0.0 to 1.0)
    pub offset: f64,
    pub color: Color,
    pub opacity: f64,
}

impl GradientStop {
    pub fn new(offset: f64, color: Color, opacity: f64) -> Self {
        Self {
            offset,
            color,
            opacity,
        }
    }

    /// The stop color with the stop opacity folded into alpha.
    pub fn effective_color(&self) -> Color {
        Color {
            a: self.opacity as f32,
            ..self.color
        }
    }
}
