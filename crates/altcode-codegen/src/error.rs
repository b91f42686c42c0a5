//! Error types for code generation.

use altcode_core::{AltError, ContractError};
use thiserror::Error;

/// Result type alias for codegen operations.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that abort emission. Backend capability gaps are diagnostics,
/// never errors.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// Broken IR invariants or cancellation.
    #[error(transparent)]
    Core(#[from] AltError),

    /// No backend registered under this identifier.
    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    TemplateError(#[from] handlebars::RenderError),

    /// Invalid template.
    #[error("Invalid template: {0}")]
    InvalidTemplate(#[from] handlebars::TemplateError),
}

impl From<ContractError> for CodegenError {
    fn from(err: ContractError) -> Self {
        CodegenError::Core(AltError::Contract(err))
    }
}
