//! Raw design tree → canonical IR.
//!
//! Normalization walks the host's loosely typed tree once, in document order:
//! 1. Hidden nodes are dropped and groups are spliced into their parent
//! 2. Geometry is resolved against the cumulative rotation
//! 3. Paints, effects, text runs and layout are converted
//! 4. Every node gets a run-unique name
//!
//! The vector classifier then marks subtrees that can be emitted as a single
//! inline vector graphic.

mod classify;
mod naming;
mod normalizer;
mod text;

pub use classify::{classify_vectors, VectorClassifier};
pub use naming::UniqueNames;
pub use normalizer::{normalize, Normalized};
