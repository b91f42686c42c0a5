//! The host design tool, seen from the converter.
//!
//! Both calls are asynchronous because they cross into the host application.
//! The converter treats every failure as recoverable.

use crate::types::Color;
use futures::future::BoxFuture;
use thiserror::Error;

/// A symbolic variable as resolved by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVariable {
    pub name: String,
    pub value: Color,
}

/// Failures reported by the host collaborator.
#[derive(Debug, Clone, Error)]
pub enum HostError {
    #[error("'{0}' not found")]
    NotFound(String),

    #[error("host unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Failed(String),
}

/// Collaborator contract implemented by the host application.
pub trait DesignHost: Send + Sync {
    /// Resolve a variable id to its symbolic name and literal value.
    fn resolve_variable<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<ResolvedVariable, HostError>>;

    /// Export the subtree rooted at `source_id` as inline vector markup.
    fn export_vector_markup<'a>(
        &'a self,
        source_id: &'a str,
    ) -> BoxFuture<'a, Result<String, HostError>>;
}
