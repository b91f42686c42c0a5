//! Palette summary of a converted tree.

use altcode_core::{AltTree, PaintKind};
use indexmap::IndexMap;
use serde::Serialize;

/// One distinct color of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    /// Lowercase `#rrggbb`, or `#rrggbbaa` when translucent.
    pub hex: String,
    /// Bound variable name, if the color came from one.
    pub variable: Option<String>,
    pub occurrences: usize,
}

/// Colors of every fill, stroke and gradient stop, most frequent first.
/// Ties keep traversal order.
///
/// The same hex bound to different variables (or to none) yields separate
/// entries.
pub fn palette_summary(tree: &AltTree) -> Vec<PaletteEntry> {
    let mut counts: IndexMap<(String, Option<String>), usize> = IndexMap::new();
    for &root in tree.roots() {
        for id in tree.preorder(root) {
            for entry in tree[id].paint.entries() {
                let variable = entry.variable.as_ref().map(|binding| binding.name.clone());
                match &entry.kind {
                    PaintKind::Solid(_) => {
                        if let Some(color) = entry.solid_color() {
                            *counts.entry((color.to_hex(), variable)).or_default() += 1;
                        }
                    }
                    PaintKind::Gradient(gradient) => {
                        for stop in gradient.stops() {
                            let hex = stop.effective_color().with_opacity(entry.opacity).to_hex();
                            *counts.entry((hex, None)).or_default() += 1;
                        }
                    }
                    PaintKind::Image(_) => {}
                }
            }
        }
    }

    let mut entries: Vec<PaletteEntry> = counts
        .into_iter()
        .map(|((hex, variable), occurrences)| PaletteEntry {
            hex,
            variable,
            occurrences,
        })
        .collect();
    entries.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
    entries
}
