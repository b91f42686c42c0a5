//! Host-backed annotation of a normalized subtree.
//!
//! Annotation is split in two: [`annotate_subtree`] only reads the tree and
//! asks the host for variables and vector markup, while [`apply_annotations`]
//! writes the answers back. Subtrees can therefore be annotated concurrently
//! and applied by a single writer afterwards.

use altcode_core::{
    AltTree, DesignHost, Diagnostics, NodeId, ResolvedVariable, RunConfig, VariableBinding,
};
use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Host answers for one subtree.
#[derive(Debug, Default)]
pub struct Annotations {
    /// Successfully resolved variables, by variable id.
    pub variables: HashMap<String, ResolvedVariable>,
    /// Exported markup for maximal flattenable nodes.
    pub vectors: Vec<(NodeId, String)>,
    /// Failures reported while collecting.
    pub diagnostics: Diagnostics,
}

/// Variable ids referenced in the subtree, each with the first node that
/// references it.
fn variable_refs(tree: &AltTree, order: &[NodeId]) -> IndexMap<String, NodeId> {
    let mut refs = IndexMap::new();
    for &id in order {
        for entry in tree[id].paint.entries() {
            if let Some(var) = &entry.variable_ref {
                refs.entry(var.clone()).or_insert(id);
            }
        }
    }
    refs
}

/// Flattenable nodes whose parent is not flattenable. Only these are
/// exported; their descendants render from the exported markup.
fn vector_roots(tree: &AltTree, order: &[NodeId]) -> Vec<NodeId> {
    order
        .iter()
        .copied()
        .filter(|&id| {
            tree[id].can_flatten_to_vector
                && !tree.parent(id).is_some_and(|p| p.can_flatten_to_vector)
        })
        .collect()
}

/// Ask the host for every variable and vector the subtree needs.
///
/// Lookups run through an ordered stream with at most
/// `config.max_concurrency` calls in flight. Each variable id is requested
/// once per subtree.
pub async fn annotate_subtree(
    tree: &AltTree,
    root: NodeId,
    host: &dyn DesignHost,
    config: &RunConfig,
) -> Annotations {
    let order = tree.preorder(root);
    let limit = config.max_concurrency.max(1);
    let mut annotations = Annotations::default();

    if config.use_variables {
        let refs = variable_refs(tree, &order);
        log::debug!("resolving {} variables under {}", refs.len(), root);
        let results: Vec<_> = stream::iter(refs)
            .map(|(var, node)| async move {
                let result = host.resolve_variable(&var).await;
                (var, node, result)
            })
            .buffered(limit)
            .collect()
            .await;

        for (var, node, result) in results {
            match result {
                Ok(resolved) => {
                    annotations.variables.insert(var, resolved);
                }
                Err(err) => annotations.diagnostics.warn(
                    Some(node),
                    format!("could not resolve variable {}: {}; using the literal color", var, err),
                ),
            }
        }
    }

    if config.embed_vectors {
        let targets = vector_roots(tree, &order);
        log::debug!("exporting {} vector subtrees under {}", targets.len(), root);
        let results: Vec<_> = stream::iter(targets)
            .map(|id| async move {
                let result = host.export_vector_markup(&tree[id].source_id).await;
                (id, result)
            })
            .buffered(limit)
            .collect()
            .await;

        for (id, result) in results {
            match result {
                Ok(markup) => annotations.vectors.push((id, markup)),
                Err(err) => annotations.diagnostics.warn(
                    Some(id),
                    format!("vector export failed for '{}': {}", tree[id].name, err),
                ),
            }
        }
    }

    annotations
}

/// Write one subtree's annotations into the tree.
pub fn apply_annotations(tree: &mut AltTree, root: NodeId, annotations: Annotations) -> Diagnostics {
    let Annotations {
        variables,
        vectors,
        diagnostics,
    } = annotations;

    if !variables.is_empty() {
        for id in tree.preorder(root) {
            let Some(node) = tree.get_mut(id) else {
                continue;
            };
            for entry in node.paint.fills.iter_mut().chain(node.paint.strokes.iter_mut()) {
                let Some(resolved) = entry.variable_ref.as_ref().and_then(|v| variables.get(v))
                else {
                    continue;
                };
                let fallback = entry
                    .solid_color()
                    .unwrap_or(resolved.value)
                    .to_hex();
                entry.variable = Some(VariableBinding {
                    name: resolved.name.clone(),
                    fallback_hex: fallback,
                });
            }
        }
    }

    for (id, markup) in vectors {
        if let Some(node) = tree.get_mut(id) {
            node.embedded_vector_markup = Some(markup);
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use altcode_core::{AltNode, Color, HostError, NodeKind, PaintEntry};
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingHost {
        variables: HashMap<String, ResolvedVariable>,
        vectors: HashMap<String, String>,
        variable_calls: AtomicUsize,
        vector_calls: AtomicUsize,
    }

    impl DesignHost for CountingHost {
        fn resolve_variable<'a>(
            &'a self,
            id: &'a str,
        ) -> BoxFuture<'a, Result<ResolvedVariable, HostError>> {
            self.variable_calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                self.variables
                    .get(id)
                    .cloned()
                    .ok_or_else(|| HostError::NotFound(id.to_string()))
            })
        }

        fn export_vector_markup<'a>(
            &'a self,
            source_id: &'a str,
        ) -> BoxFuture<'a, Result<String, HostError>> {
            self.vector_calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                self.vectors
                    .get(source_id)
                    .cloned()
                    .ok_or_else(|| HostError::NotFound(source_id.to_string()))
            })
        }
    }

    fn bound_fill(var: &str) -> PaintEntry {
        PaintEntry {
            variable_ref: Some(var.to_string()),
            ..PaintEntry::solid(Color::from_rgb8(0x3b, 0x82, 0xf6))
        }
    }

    /// Root(Card) with two children bound to the same variable, one to a
    /// missing variable, and an icon made of two flattenable vectors.
    fn sample() -> (AltTree, NodeId) {
        let mut tree = AltTree::new();
        let root = tree.insert(AltNode::new(NodeKind::Container, "Card"), None);
        tree.insert(
            AltNode::new(NodeKind::Rectangle, "A").with_fill(bound_fill("v:primary")),
            Some(root),
        );
        tree.insert(
            AltNode::new(NodeKind::Rectangle, "B").with_fill(bound_fill("v:primary")),
            Some(root),
        );
        tree.insert(
            AltNode::new(NodeKind::Rectangle, "C").with_fill(bound_fill("v:missing")),
            Some(root),
        );
        let mut icon = AltNode::new(NodeKind::Container, "Icon");
        icon.source_id = "1:9".to_string();
        icon.can_flatten_to_vector = true;
        let icon = tree.insert(icon, Some(root));
        let mut path = AltNode::new(NodeKind::Vector, "Path");
        path.can_flatten_to_vector = true;
        tree.insert(path, Some(icon));
        (tree, root)
    }

    fn host() -> CountingHost {
        let mut host = CountingHost::default();
        host.variables.insert(
            "v:primary".to_string(),
            ResolvedVariable {
                name: "colors/primary".to_string(),
                value: Color::from_rgb8(0x3b, 0x82, 0xf6),
            },
        );
        host.vectors
            .insert("1:9".to_string(), "<svg></svg>".to_string());
        host
    }

    #[tokio::test]
    async fn test_variables_are_deduplicated() {
        let (mut tree, root) = sample();
        let host = host();
        let annotations = annotate_subtree(&tree, root, &host, &RunConfig::default()).await;

        assert_eq!(host.variable_calls.load(Ordering::SeqCst), 2);
        assert_eq!(annotations.diagnostics.len(), 1);

        let diags = apply_annotations(&mut tree, root, annotations);
        assert_eq!(diags.len(), 1);
        let binding = tree[NodeId(1)].paint.fills[0].variable.clone().unwrap();
        assert_eq!(binding.name, "colors/primary");
        assert_eq!(binding.fallback_hex, "#3b82f6");
        assert!(tree[NodeId(2)].paint.fills[0].variable.is_some());
        assert!(tree[NodeId(3)].paint.fills[0].variable.is_none());
    }

    #[tokio::test]
    async fn test_only_maximal_vectors_are_exported() {
        let (mut tree, root) = sample();
        let host = host();
        let annotations = annotate_subtree(&tree, root, &host, &RunConfig::default()).await;
        assert_eq!(host.vector_calls.load(Ordering::SeqCst), 1);

        apply_annotations(&mut tree, root, annotations);
        assert_eq!(
            tree[NodeId(4)].embedded_vector_markup.as_deref(),
            Some("<svg></svg>")
        );
        assert!(tree[NodeId(5)].embedded_vector_markup.is_none());
    }

    #[tokio::test]
    async fn test_disabled_features_skip_the_host() {
        let (tree, root) = sample();
        let host = host();
        let config = RunConfig {
            use_variables: false,
            embed_vectors: false,
            ..RunConfig::default()
        };
        let annotations = annotate_subtree(&tree, root, &host, &config).await;
        assert_eq!(host.variable_calls.load(Ordering::SeqCst), 0);
        assert_eq!(host.vector_calls.load(Ordering::SeqCst), 0);
        assert!(annotations.variables.is_empty());
        assert!(annotations.vectors.is_empty());
    }

    #[tokio::test]
    async fn test_failed_export_is_a_diagnostic() {
        let (tree, root) = sample();
        let host = CountingHost::default();
        let config = RunConfig {
            use_variables: false,
            ..RunConfig::default()
        };
        let annotations = annotate_subtree(&tree, root, &host, &config).await;
        assert!(annotations.vectors.is_empty());
        let messages: Vec<_> = annotations.diagnostics.iter().map(|d| d.node).collect();
        assert_eq!(messages, vec![Some(NodeId(4))]);
    }
}
