//! Vector/icon classification.
//!
//! A node is flattenable when it can be emitted as one inline vector graphic
//! instead of a native element tree:
//!
//! 1. Vectors and boolean operations always are; rectangles and ellipses are
//!    when both sides fit within the icon size threshold.
//! 2. Otherwise a node the host marks for vector export is.
//! 3. Otherwise a container is when it has children, none of them text or
//!    containers, and all of them flattenable.

use altcode_core::{AltTree, NodeId, NodeKind};
use std::collections::HashMap;

/// Memoized flattenability predicate.
#[derive(Debug)]
pub struct VectorClassifier {
    icon_size_threshold: f64,
    memo: HashMap<NodeId, bool>,
}

impl VectorClassifier {
    pub fn new(icon_size_threshold: f64) -> Self {
        Self {
            icon_size_threshold,
            memo: HashMap::new(),
        }
    }

    pub fn is_flattenable(&mut self, tree: &AltTree, id: NodeId) -> bool {
        if let Some(&cached) = self.memo.get(&id) {
            return cached;
        }
        let Some(node) = tree.get(id) else {
            return false;
        };

        let flattenable = match node.kind {
            NodeKind::Vector | NodeKind::BooleanOp => true,
            NodeKind::Rectangle | NodeKind::Ellipse
                if node.geometry.width <= self.icon_size_threshold
                    && node.geometry.height <= self.icon_size_threshold =>
            {
                true
            }
            _ if node.export_as_vector => true,
            NodeKind::Container => {
                !node.children.is_empty()
                    && node.children.iter().all(|&child| {
                        !matches!(tree[child].kind, NodeKind::Text | NodeKind::Container)
                            && self.is_flattenable(tree, child)
                    })
            }
            _ => false,
        };

        self.memo.insert(id, flattenable);
        flattenable
    }
}

/// Set `can_flatten_to_vector` on every node of the tree.
pub fn classify_vectors(tree: &mut AltTree, icon_size_threshold: f64) {
    let mut classifier = VectorClassifier::new(icon_size_threshold);
    let ids: Vec<NodeId> = tree.iter().map(|node| node.id).collect();
    let flags: Vec<bool> = ids
        .iter()
        .map(|&id| classifier.is_flattenable(tree, id))
        .collect();
    for (id, flattenable) in ids.into_iter().zip(flags) {
        if let Some(node) = tree.get_mut(id) {
            node.can_flatten_to_vector = flattenable;
        }
    }
    log::debug!(
        "{} of {} nodes flatten to vectors",
        tree.iter().filter(|n| n.can_flatten_to_vector).count(),
        tree.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use altcode_core::AltNode;

    fn icon(extra: Option<AltNode>) -> (AltTree, NodeId) {
        let mut tree = AltTree::new();
        let root = tree.insert(AltNode::new(NodeKind::Container, "Icon"), None);
        tree.insert(
            AltNode::new(NodeKind::Vector, "Path").with_size(20.0, 20.0),
            Some(root),
        );
        tree.insert(
            AltNode::new(NodeKind::Ellipse, "Dot").with_size(10.0, 10.0),
            Some(root),
        );
        if let Some(node) = extra {
            tree.insert(node, Some(root));
        }
        (tree, root)
    }

    #[test]
    fn test_shapes_make_an_icon() {
        let (tree, root) = icon(None);
        assert!(VectorClassifier::new(64.0).is_flattenable(&tree, root));
    }

    #[test]
    fn test_text_child_prevents_flattening() {
        let (tree, root) = icon(Some(AltNode::new(NodeKind::Text, "Label")));
        assert!(!VectorClassifier::new(64.0).is_flattenable(&tree, root));
    }

    #[test]
    fn test_large_rectangle_is_not_an_icon() {
        let (tree, root) = icon(Some(
            AltNode::new(NodeKind::Rectangle, "Background").with_size(200.0, 100.0),
        ));
        let mut classifier = VectorClassifier::new(64.0);
        assert!(!classifier.is_flattenable(&tree, root));
        assert!(!classifier.is_flattenable(&tree, NodeId(3)));
    }

    #[test]
    fn test_export_marker() {
        let mut tree = AltTree::new();
        let mut big = AltNode::new(NodeKind::Rectangle, "Logo").with_size(300.0, 300.0);
        big.export_as_vector = true;
        let id = tree.insert(big, None);
        assert!(VectorClassifier::new(64.0).is_flattenable(&tree, id));
    }

    #[test]
    fn test_empty_container_and_nested_container() {
        let mut tree = AltTree::new();
        let outer = tree.insert(AltNode::new(NodeKind::Container, "Outer"), None);
        let inner = tree.insert(AltNode::new(NodeKind::Container, "Inner"), Some(outer));
        let mut classifier = VectorClassifier::new(64.0);
        assert!(!classifier.is_flattenable(&tree, inner));
        tree.insert(AltNode::new(NodeKind::Vector, "Path"), Some(inner));
        let mut classifier = VectorClassifier::new(64.0);
        assert!(classifier.is_flattenable(&tree, inner));
        assert!(!classifier.is_flattenable(&tree, outer));
    }

    #[test]
    fn test_classify_marks_tree() {
        let (mut tree, root) = icon(None);
        classify_vectors(&mut tree, 64.0);
        assert!(tree[root].can_flatten_to_vector);
        assert!(tree[NodeId(1)].can_flatten_to_vector);
    }
}
