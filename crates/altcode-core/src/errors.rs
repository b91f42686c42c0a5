//! Error types for altcode.
//!
//! Only contract violations, unreadable input, and cancellation are errors.
//! Everything recoverable is reported as a [`Diagnostic`](crate::Diagnostic).

use crate::ir::NodeId;
use thiserror::Error;

/// Top-level error type for the core pipeline stages.
#[derive(Debug, Error)]
pub enum AltError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("conversion cancelled")]
    Cancelled,
}

/// Broken IR invariants. These point at a bug upstream, not a bad design.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("cycle detected at node {id}")]
    CycleDetected { id: NodeId },

    #[error("node {id} is referenced but not in the tree")]
    DanglingNode { id: NodeId },

    #[error("node {id} is stored in slot {slot}")]
    MisplacedNode { id: NodeId, slot: usize },

    #[error("root {id} has a parent")]
    RootHasParent { id: NodeId },

    #[error("node {id} does not point back at its parent {expected}")]
    BrokenParentLink { id: NodeId, expected: NodeId },

    #[error("emission requested for a tree that was not normalized")]
    NotNormalized,
}

/// Problems with the raw input as a whole.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid design document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no visible nodes selected")]
    EmptySelection,
}
