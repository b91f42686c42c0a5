//! Geometry and layout semantics for altcode.
//!
//! The design tool reports the axis-aligned bounding box of a rotated node and
//! its auto-layout settings as loose strings. This crate turns both into the
//! IR's vocabulary:
//!
//! 1. **Geometry**: recover the un-rotated box from the rotated bounding box
//! 2. **Layout**: map auto-layout settings to a [`LayoutDescriptor`]
//! 3. **Child placement**: flow vs. absolute positioning and FIXED/HUG/FILL sizing
//!
//! [`LayoutDescriptor`]: altcode_core::LayoutDescriptor

mod classify;
mod geometry;

pub use classify::{classify_child, classify_layout, mark_absolute_children};
pub use geometry::{offset_in_parent, resolve_rotated_box, ResolvedBox, SINGULAR_EPSILON};
