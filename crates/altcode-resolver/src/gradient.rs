//! Gradient normalization.
//!
//! The host describes gradients by three handle positions in normalized node
//! space (y down): the start (or center), the end (or first radius), and the
//! width handle. Backends want CSS-style geometry instead.

use altcode_core::raw::{RawPaint, RawVector};
use altcode_core::{
    AngularGradient, Gradient, GradientStop, LinearGradient, RadialGradient,
};

const DEFAULT_HANDLES: [RawVector; 3] = [
    RawVector { x: 0.5, y: 0.0 },
    RawVector { x: 0.5, y: 1.0 },
    RawVector { x: 0.0, y: 0.0 },
];

/// CSS bearing of the vector `from → to`: 0 points up, 90 points right.
fn bearing_degrees(from: RawVector, to: RawVector) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0.0 && dy == 0.0 {
        return 180.0;
    }
    dx.atan2(-dy).to_degrees().rem_euclid(360.0)
}

fn distance(a: RawVector, b: RawVector) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Stops in declaration order. Offsets are clamped, never reordered.
fn stops(paint: &RawPaint) -> Vec<GradientStop> {
    let opacity = paint.opacity.unwrap_or(1.0);
    paint
        .gradient_stops
        .iter()
        .map(|stop| {
            GradientStop::new(
                stop.position.clamp(0.0, 1.0),
                stop.color,
                stop.color.a as f64 * opacity,
            )
        })
        .collect()
}

/// Convert a gradient paint into stops plus geometry.
///
/// Returns `None` for non-gradient paints and gradients without stops.
pub fn normalize_gradient(paint: &RawPaint) -> Option<Gradient> {
    let stops = stops(paint);
    if stops.is_empty() {
        return None;
    }

    let handle = |i: usize| {
        paint
            .gradient_handle_positions
            .get(i)
            .copied()
            .unwrap_or(DEFAULT_HANDLES[i])
    };
    let (start, end, width) = if paint.gradient_handle_positions.len() >= 2 {
        (handle(0), handle(1), handle(2))
    } else {
        (DEFAULT_HANDLES[0], DEFAULT_HANDLES[1], DEFAULT_HANDLES[2])
    };

    let gradient = match paint.kind.as_str() {
        "GRADIENT_LINEAR" => Gradient::Linear(LinearGradient {
            angle: bearing_degrees(start, end),
            stops,
        }),
        "GRADIENT_RADIAL" | "GRADIENT_DIAMOND" => {
            let (center, radius_x, radius_y) = if paint.gradient_handle_positions.len() >= 3 {
                (start, distance(start, end), distance(start, width))
            } else {
                (RawVector { x: 0.5, y: 0.5 }, 0.5, 0.5)
            };
            Gradient::Radial(RadialGradient {
                center_x: center.x,
                center_y: center.y,
                radius_x,
                radius_y,
                stops,
            })
        }
        "GRADIENT_ANGULAR" => {
            let (center, start_angle) = if paint.gradient_handle_positions.len() >= 2 {
                (start, bearing_degrees(start, end))
            } else {
                (RawVector { x: 0.5, y: 0.5 }, 0.0)
            };
            Gradient::Angular(AngularGradient {
                center_x: center.x,
                center_y: center.y,
                start_angle,
                stops,
            })
        }
        _ => return None,
    };
    Some(gradient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use altcode_core::raw::RawGradientStop;
    use altcode_core::Color;

    fn gradient(kind: &str, handles: &[(f64, f64)]) -> RawPaint {
        RawPaint {
            kind: kind.to_string(),
            gradient_stops: vec![
                RawGradientStop {
                    position: 1.0,
                    color: Color::WHITE,
                },
                RawGradientStop {
                    position: 0.0,
                    color: Color::rgba(0.0, 0.0, 0.0, 0.5),
                },
            ],
            gradient_handle_positions: handles
                .iter()
                .map(|&(x, y)| RawVector { x, y })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_linear_left_to_right() {
        let paint = gradient("GRADIENT_LINEAR", &[(0.0, 0.5), (1.0, 0.5), (0.0, 1.0)]);
        let Some(Gradient::Linear(linear)) = normalize_gradient(&paint) else {
            panic!("expected a linear gradient");
        };
        assert!((linear.angle - 90.0).abs() < 1e-9);
        assert_eq!(linear.stops[0].offset, 1.0);
        assert_eq!(linear.stops[0].color, Color::WHITE);
        assert_eq!(linear.stops[1].offset, 0.0);
        assert_eq!(linear.stops[1].opacity, 0.5);
    }

    #[test]
    fn test_linear_default_is_top_to_bottom() {
        let paint = gradient("GRADIENT_LINEAR", &[]);
        let Some(Gradient::Linear(linear)) = normalize_gradient(&paint) else {
            panic!("expected a linear gradient");
        };
        assert!((linear.angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_radial_center_and_radii() {
        let paint = gradient("GRADIENT_RADIAL", &[(0.5, 0.5), (1.0, 0.5), (0.5, 0.75)]);
        let Some(Gradient::Radial(radial)) = normalize_gradient(&paint) else {
            panic!("expected a radial gradient");
        };
        assert_eq!((radial.center_x, radial.center_y), (0.5, 0.5));
        assert_eq!(radial.radius_x, 0.5);
        assert_eq!(radial.radius_y, 0.25);
    }

    #[test]
    fn test_angular_start_angle() {
        let paint = gradient("GRADIENT_ANGULAR", &[(0.5, 0.5), (0.5, 1.0), (1.0, 0.5)]);
        let Some(Gradient::Angular(angular)) = normalize_gradient(&paint) else {
            panic!("expected an angular gradient");
        };
        assert!((angular.start_angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_paint_opacity_scales_stops() {
        let mut paint = gradient("GRADIENT_LINEAR", &[]);
        paint.opacity = Some(0.5);
        let gradient = normalize_gradient(&paint).unwrap();
        assert_eq!(gradient.stops()[0].opacity, 0.5);
        assert_eq!(gradient.stops()[1].opacity, 0.25);
    }

    #[test]
    fn test_stops_keep_declaration_order() {
        let mut paint = gradient("GRADIENT_RADIAL", &[]);
        paint.gradient_stops.push(RawGradientStop {
            position: 1.5,
            color: Color::BLACK,
        });
        let gradient = normalize_gradient(&paint).unwrap();
        let offsets: Vec<f64> = gradient.stops().iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_not_a_gradient() {
        assert!(normalize_gradient(&gradient("SOLID", &[])).is_none());
        let empty = RawPaint {
            kind: "GRADIENT_LINEAR".to_string(),
            ..Default::default()
        };
        assert!(normalize_gradient(&empty).is_none());
    }
}
