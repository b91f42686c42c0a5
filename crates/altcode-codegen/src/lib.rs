//! Code generation for altcode IR trees.
//!
//! The engine walks a normalized, annotated [`AltTree`] post-order and asks a
//! [`Backend`] for one immutable [`Fragment`] per node. Fragments are rendered
//! to source text and wrapped by the backend's generation-mode template.
//!
//! Supported backends:
//! - `html`: inline-styled HTML or a JSX component
//! - `tailwind`: utility classes, rounded through the scale tables and palette
//! - `flutter`: widget trees, snippet or stateless widget or full app
//! - `swiftui`: view hierarchies, snippet or struct or struct with preview
//! - `compose`: Jetpack Compose, snippet or `@Composable` function
//!
//! [`AltTree`]: altcode_core::AltTree

pub mod backends;
pub mod engine;
pub mod error;
pub mod format;
pub mod fragment;
pub mod templates;

pub use engine::{backend_for, emit, emit_node, lookup, Backend, EmitContext, Emitted};
pub use error::{CodegenError, Result};
pub use fragment::Fragment;
pub use templates::TemplateEngine;
