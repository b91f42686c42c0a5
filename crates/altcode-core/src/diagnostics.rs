//! Non-fatal diagnostics collected during a conversion run.

use crate::ir::NodeId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

/// One reported issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    /// The IR node the issue belongs to, if any.
    pub node: Option<NodeId>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.node {
            Some(node) => write!(f, "{} [{}]: {}", self.severity, node, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Ordered diagnostics sink.
///
/// Every entry is mirrored to the `log` facade at the matching level.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Info => log::info!("{}", diagnostic),
            Severity::Warning => log::warn!("{}", diagnostic),
            Severity::Error | Severity::Fatal => log::error!("{}", diagnostic),
        }
        self.entries.push(diagnostic);
    }

    pub fn info(&mut self, node: Option<NodeId>, message: impl Into<String>) {
        self.push(Diagnostic {
            message: message.into(),
            severity: Severity::Info,
            node,
        });
    }

    pub fn warn(&mut self, node: Option<NodeId>, message: impl Into<String>) {
        self.push(Diagnostic {
            message: message.into(),
            severity: Severity::Warning,
            node,
        });
    }

    pub fn error(&mut self, node: Option<NodeId>, message: impl Into<String>) {
        self.push(Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            node,
        });
    }

    /// Move all entries of `other` to the end of this sink.
    pub fn append(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        self.entries.iter().any(|d| d.severity >= Severity::Warning)
    }

    /// Entries in traversal order. Node ids are preorder, so a stable sort
    /// by id interleaves the per-phase lists; run-level entries come first.
    pub fn into_sorted(self) -> Vec<Diagnostic> {
        let mut entries = self.entries;
        entries.sort_by_key(|d| d.node.map(|n| n.0 as i64).unwrap_or(-1));
        entries
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
