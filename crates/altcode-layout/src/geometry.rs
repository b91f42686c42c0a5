//! Rotation-aware bounding-box reconstruction.
//!
//! A node of size `W × H` rotated by θ has the axis-aligned bounding box
//!
//! ```text
//! bw = W·|cos θ| + H·|sin θ|
//! bh = W·|sin θ| + H·|cos θ|
//! ```
//!
//! Solving the 2×2 system gives back `W` and `H`. The system is singular where
//! `cos²θ = sin²θ` (odd multiples of 45°); there the bounding box itself is
//! the best available answer.

use altcode_core::Rect;
use glam::DVec2;

/// `|cos²θ − sin²θ|` below this is treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-6;

/// Un-rotated box of a node, in the coordinate space of its bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedBox {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
    /// CSS convention (positive = clockwise).
    pub rotation_degrees: f64,
    /// The angle was singular and the bounding-box size was used as is.
    pub singular: bool,
}

/// Sine and cosine, exact for multiples of 90°.
fn sin_cos_degrees(degrees: f64) -> (f64, f64) {
    let normalized = degrees.rem_euclid(360.0);
    if normalized % 90.0 == 0.0 {
        return match (normalized / 90.0) as u32 % 4 {
            0 => (0.0, 1.0),
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            _ => (-1.0, 0.0),
        };
    }
    degrees.to_radians().sin_cos()
}

/// Recover width, height and top-left of a node from its rotated bounding
/// box and its design-tool angle (counter-clockwise degrees).
pub fn resolve_rotated_box(bounds: Rect, design_angle: f64) -> ResolvedBox {
    let css_angle = -design_angle;
    let (sin, cos) = sin_cos_degrees(css_angle);
    let (s, c) = (sin.abs(), cos.abs());
    let det = c * c - s * s;

    let (width, height, singular) = if det.abs() < SINGULAR_EPSILON {
        (bounds.width, bounds.height, true)
    } else {
        let width = (bounds.width * c - bounds.height * s) / det;
        let height = (bounds.height * c - bounds.width * s) / det;
        (width.max(0.0), height.max(0.0), false)
    };

    // Rotate the un-rotated box's corners about its center; the most
    // negative corner is where the bounding box starts.
    let center = DVec2::new(width / 2.0, height / 2.0);
    let rotation = DVec2::new(cos, sin);
    let corners = [
        DVec2::ZERO,
        DVec2::new(width, 0.0),
        DVec2::new(0.0, height),
        DVec2::new(width, height),
    ];
    let min = corners
        .iter()
        .map(|corner| rotation.rotate(*corner - center) + center)
        .fold(DVec2::splat(f64::INFINITY), DVec2::min);

    ResolvedBox {
        width,
        height,
        left: bounds.x - min.x,
        top: bounds.y - min.y,
        rotation_degrees: css_angle,
        singular,
    }
}

/// Un-rotated top-left of `child` in the local frame of `parent`.
///
/// Both boxes come from [`resolve_rotated_box`] in absolute space. The
/// child's center is rotated back about the parent's center by the parent's
/// angle, so offsets stay node-local under a rotated parent.
pub fn offset_in_parent(child: &ResolvedBox, parent: &ResolvedBox) -> (f64, f64) {
    let (sin, cos) = sin_cos_degrees(parent.rotation_degrees);
    let parent_half = DVec2::new(parent.width, parent.height) / 2.0;
    let child_half = DVec2::new(child.width, child.height) / 2.0;
    let delta = (DVec2::new(child.left, child.top) + child_half)
        - (DVec2::new(parent.left, parent.top) + parent_half);
    let local = DVec2::new(cos, -sin).rotate(delta) + parent_half - child_half;
    (local.x, local.y)
}
