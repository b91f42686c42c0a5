//! Core types, IR definitions, and utilities shared by every altcode crate.
//!
//! This crate provides:
//! - Raw design-tree records as exported by the host design tool
//! - The canonical `AltNode` IR and its arena
//! - Value types (colors, gradients, rectangles)
//! - Diagnostics, error types, and run configuration
//! - The generic scale matcher and the host collaborator contract

pub mod cancel;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod host;
pub mod ir;
pub mod raw;
pub mod scale;
pub mod types;

pub use cancel::CancellationFlag;
pub use config::*;
pub use diagnostics::*;
pub use errors::*;
pub use host::{DesignHost, HostError, ResolvedVariable};
pub use ir::*;
pub use types::*;
