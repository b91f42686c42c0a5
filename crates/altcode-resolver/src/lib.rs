//! Color and host-data resolution for altcode.
//!
//! This crate resolves:
//! - Raw paints (solid, gradient, image) into IR paint entries
//! - Gradient handle positions into CSS-style gradient geometry
//! - Literal colors into the nearest named palette color
//! - Variable bindings and vector markup through the [`DesignHost`]
//!
//! [`DesignHost`]: altcode_core::DesignHost

mod annotate;
mod gradient;
mod paint;
mod palette;

pub use annotate::{annotate_subtree, apply_annotations, Annotations};
pub use gradient::normalize_gradient;
pub use paint::{convert_effect, convert_paint};
pub use palette::{NamedColor, Palette};
