//! Design tree to framework source conversion.
//!
//! A run goes through four phases:
//! 1. Normalization of the raw selection into the IR, with vector
//!    classification
//! 2. Annotation, where every root asks the [`DesignHost`] for variables and
//!    vector markup concurrently
//! 3. A single writer applies the host's answers to the tree
//! 4. Emission with the configured backend
//!
//! ## Example
//!
//! ```no_run
//! use altcode::{convert_document, BackendKind, CancellationFlag, RawDocument, RunConfig};
//!
//! # async fn run(json: &str) -> Result<(), altcode::ConvertError> {
//! let doc = altcode::parse_document(json)?;
//! let config = RunConfig::new(BackendKind::Tailwind);
//! let output = convert_document(&doc, &config, &CancellationFlag::new()).await?;
//! println!("{}", output.code);
//! # Ok(())
//! # }
//! ```

mod host;
mod summary;

pub use altcode_core::raw::RawDocument;
pub use altcode_core::{
    BackendKind, CancellationFlag, ComposeMode, DesignHost, Diagnostic, FlutterMode, HostError,
    MarkupMode, ResolvedVariable, RunConfig, Severity, SwiftUiMode,
};
pub use host::StaticHost;
pub use summary::{palette_summary, PaletteEntry};

use altcode_codegen::{emit, CodegenError};
use altcode_core::{AltError, InputError};
use altcode_normalizer::{classify_vectors, normalize, Normalized};
use altcode_resolver::{annotate_subtree, apply_annotations, Palette};
use futures::future;
use serde::Serialize;
use thiserror::Error;

/// Errors that abort a run.
///
/// Everything recoverable is reported through
/// [`ConversionOutput::diagnostics`] instead.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Bad input, broken IR invariants or cancellation.
    #[error(transparent)]
    Core(#[from] AltError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

impl From<InputError> for ConvertError {
    fn from(err: InputError) -> Self {
        ConvertError::Core(AltError::Input(err))
    }
}

impl ConvertError {
    /// The failure as the single fatal diagnostic of the run.
    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic {
            message: self.to_string(),
            severity: Severity::Fatal,
            node: None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            ConvertError::Core(AltError::Cancelled)
                | ConvertError::Codegen(CodegenError::Core(AltError::Cancelled))
        )
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    pub code: String,
    /// Every recoverable issue, in traversal order.
    pub diagnostics: Vec<Diagnostic>,
    /// Colors used by the emitted tree, most frequent first.
    pub palette: Vec<PaletteEntry>,
}

/// Parse a raw document from the host's JSON export.
pub fn parse_document(json: &str) -> Result<RawDocument, ConvertError> {
    RawDocument::from_json(json).map_err(|err| InputError::Json(err).into())
}

/// Convert the document's selection, answering host calls from the
/// document itself.
pub async fn convert_document(
    doc: &RawDocument,
    config: &RunConfig,
    cancel: &CancellationFlag,
) -> Result<ConversionOutput, ConvertError> {
    let host = StaticHost::new(doc);
    convert(doc, &host, config, cancel).await
}

/// Run the full pipeline.
///
/// Dropping the returned future abandons in-flight host calls; `cancel`
/// aborts at the next node boundary. Neither leaves anything behind.
pub async fn convert(
    doc: &RawDocument,
    host: &dyn DesignHost,
    config: &RunConfig,
    cancel: &CancellationFlag,
) -> Result<ConversionOutput, ConvertError> {
    let Normalized {
        mut tree,
        mut diagnostics,
    } = normalize(&doc.nodes, cancel)?;
    if tree.roots().is_empty() {
        return Err(InputError::EmptySelection.into());
    }

    classify_vectors(&mut tree, config.icon_size_threshold);
    cancel.check()?;

    let roots = tree.roots().to_vec();
    log::debug!("annotating {} roots", roots.len());
    let annotated = {
        let tree = &tree;
        future::join_all(roots.into_iter().map(|root| async move {
            (root, annotate_subtree(tree, root, host, config).await)
        }))
        .await
    };
    cancel.check()?;
    for (root, annotations) in annotated {
        diagnostics.append(apply_annotations(&mut tree, root, annotations));
    }

    let palette = Palette::tailwind();
    let emitted = emit(&tree, config, &palette, cancel)?;
    diagnostics.append(emitted.diagnostics);
    log::debug!(
        "{} backend produced {} bytes and {} diagnostics",
        config.backend,
        emitted.code.len(),
        diagnostics.len()
    );

    Ok(ConversionOutput {
        code: emitted.code,
        palette: palette_summary(&tree),
        diagnostics: diagnostics.into_sorted(),
    })
}
