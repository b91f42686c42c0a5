//! The normalization pass.

use crate::naming::UniqueNames;
use crate::text::build_text;
use altcode_core::raw::DesignNode;
use altcode_core::{
    AltError, AltNode, AltTree, CancellationFlag, CornerRadius, Diagnostics, Geometry,
    LayoutDescriptor, NodeId, NodeKind, Paint, Positioning, Rect, Stroke, StrokeAlign,
};
use altcode_layout::{
    classify_child, classify_layout, mark_absolute_children, offset_in_parent, resolve_rotated_box,
    ResolvedBox,
};
use altcode_resolver::{convert_effect, convert_paint};

/// Result of normalizing one selection.
#[derive(Debug, Default)]
pub struct Normalized {
    pub tree: AltTree,
    pub diagnostics: Diagnostics,
}

/// Normalize the selected raw roots into one IR forest.
///
/// Only cancellation aborts the pass; everything else is a diagnostic.
pub fn normalize(roots: &[DesignNode], cancel: &CancellationFlag) -> Result<Normalized, AltError> {
    let mut normalizer = Normalizer::new(cancel);
    normalizer.visit_children(roots, None, 0.0)?;
    log::debug!(
        "normalized {} nodes into {} roots",
        normalizer.tree.len(),
        normalizer.tree.roots().len()
    );
    Ok(Normalized {
        tree: normalizer.tree,
        diagnostics: normalizer.diagnostics,
    })
}

/// What a child needs to know about the node it is placed in.
#[derive(Debug, Clone, Copy)]
struct ParentContext {
    id: NodeId,
    /// Absolute un-rotated box; children are placed in its local frame.
    frame: ResolvedBox,
    layout: Option<LayoutDescriptor>,
    /// Design-tool convention (counter-clockwise).
    cumulative_rotation: f64,
}

fn map_kind(raw_kind: &str) -> Option<NodeKind> {
    match raw_kind {
        "FRAME" | "COMPONENT" | "COMPONENT_SET" | "INSTANCE" | "SECTION" => {
            Some(NodeKind::Container)
        }
        "RECTANGLE" => Some(NodeKind::Rectangle),
        "ELLIPSE" => Some(NodeKind::Ellipse),
        "TEXT" => Some(NodeKind::Text),
        "VECTOR" | "STAR" | "POLYGON" | "LINE" | "REGULAR_POLYGON" => Some(NodeKind::Vector),
        "BOOLEAN_OPERATION" => Some(NodeKind::BooleanOp),
        _ => None,
    }
}

fn stroke_align(value: Option<&str>) -> StrokeAlign {
    match value {
        Some("CENTER") => StrokeAlign::Center,
        Some("OUTSIDE") => StrokeAlign::Outside,
        _ => StrokeAlign::Inside,
    }
}

fn corner_radius(raw: &DesignNode) -> CornerRadius {
    match raw.rectangle_corner_radii {
        Some(radii) if radii.iter().any(|r| *r != radii[0]) => CornerRadius::PerCorner(radii),
        Some(radii) => CornerRadius::Uniform(radii[0]),
        None => CornerRadius::Uniform(raw.corner_radius.unwrap_or(0.0)),
    }
}

struct Normalizer<'a> {
    cancel: &'a CancellationFlag,
    tree: AltTree,
    names: UniqueNames,
    diagnostics: Diagnostics,
}

impl<'a> Normalizer<'a> {
    fn new(cancel: &'a CancellationFlag) -> Self {
        Self {
            cancel,
            tree: AltTree::new(),
            names: UniqueNames::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Visit `children` in order, splicing groups in place. `absorbed` is the
    /// rotation of the groups dissolved on the way down.
    fn visit_children(
        &mut self,
        children: &[DesignNode],
        parent: Option<ParentContext>,
        absorbed: f64,
    ) -> Result<(), AltError> {
        for child in children {
            if !child.is_visible() {
                log::trace!("skipping hidden node '{}'", child.name);
                continue;
            }
            if child.kind == "GROUP" {
                self.cancel.check()?;
                self.visit_children(&child.children, parent, absorbed + child.rotation)?;
            } else {
                self.visit_node(child, parent, absorbed)?;
            }
        }
        Ok(())
    }

    fn visit_node(
        &mut self,
        raw: &DesignNode,
        parent: Option<ParentContext>,
        absorbed: f64,
    ) -> Result<(), AltError> {
        self.cancel.check()?;
        let id = self.tree.next_id();
        log::trace!("normalizing {} '{}' as {}", raw.kind, raw.name, id);

        let kind = map_kind(&raw.kind).unwrap_or_else(|| {
            self.diagnostics
                .warn(Some(id), format!("unsupported node type: {}", raw.kind));
            NodeKind::Container
        });

        let base = if raw.name.trim().is_empty() {
            kind.name()
        } else {
            raw.name.trim()
        };
        let mut node = AltNode::new(kind, raw.name.clone());
        node.unique_name = self.names.assign(base);
        node.source_id = raw.id.clone();
        node.source_kind = raw.kind.clone();

        // Geometry: solve with the absolute angle, then move into the
        // parent's local frame.
        let parent_rotation = parent.map_or(0.0, |p| p.cumulative_rotation);
        let own_rotation = raw.rotation + absorbed;
        let cumulative_rotation = parent_rotation + own_rotation;
        let (bounds, well_formed) = match raw.absolute_bounding_box {
            Some(bounds) if bounds.is_well_formed() => (bounds, true),
            _ => {
                self.diagnostics.warn(
                    Some(id),
                    "missing or malformed bounding box; using an empty box at the parent origin",
                );
                let origin = parent.map_or(Rect::new(0.0, 0.0, 0.0, 0.0), |p| {
                    Rect::new(p.frame.left, p.frame.top, 0.0, 0.0)
                });
                (origin, false)
            }
        };
        let resolved = resolve_rotated_box(bounds, cumulative_rotation);
        if resolved.singular {
            self.diagnostics.warn(
                Some(id),
                format!(
                    "rotation of {}° cannot be solved exactly; using the bounding box size",
                    cumulative_rotation
                ),
            );
        }
        let (x, y) = match parent {
            Some(p) if well_formed => offset_in_parent(&resolved, &p.frame),
            _ => (0.0, 0.0),
        };
        node.geometry = Geometry {
            x,
            y,
            width: resolved.width,
            height: resolved.height,
            rotation_degrees: -own_rotation,
            cumulative_rotation_degrees: -cumulative_rotation,
        };

        // Paint and decoration.
        let mut paint = Paint {
            fills: raw
                .fills
                .iter()
                .filter_map(|p| convert_paint(p, id, &mut self.diagnostics))
                .collect(),
            strokes: raw
                .strokes
                .iter()
                .filter_map(|p| convert_paint(p, id, &mut self.diagnostics))
                .collect(),
        };
        node.stroke = Stroke {
            weight: raw
                .stroke_weight
                .unwrap_or(if paint.strokes.is_empty() { 0.0 } else { 1.0 }),
            align: stroke_align(raw.stroke_align.as_deref()),
        };
        node.effects = raw
            .effects
            .iter()
            .filter_map(|e| convert_effect(e, id, &mut self.diagnostics))
            .collect();
        node.corner_radius = corner_radius(raw);
        node.opacity = raw.opacity.unwrap_or(1.0).clamp(0.0, 1.0);
        node.clips_content = raw.clips_content;
        node.export_as_vector = raw.exports_as_vector();

        if kind == NodeKind::Text {
            node.text = Some(build_text(raw, &mut paint.fills, id, &mut self.diagnostics));
        }
        node.paint = paint;

        // Layout and placement.
        if kind == NodeKind::Container {
            node.layout = classify_layout(raw, id, &mut self.diagnostics);
        }
        let parent_layout = parent.and_then(|p| p.layout);
        let (positioning, sizing) = classify_child(
            raw,
            node.layout.as_ref(),
            parent_layout.as_ref(),
            id,
            &mut self.diagnostics,
        );
        node.positioning = match parent {
            Some(_) => positioning,
            None => Positioning::Flow,
        };
        node.sizing = sizing;

        let context = ParentContext {
            id,
            frame: resolved,
            layout: node.layout,
            cumulative_rotation,
        };
        let inserted = self.tree.insert(node, parent.map(|p| p.id));
        debug_assert_eq!(inserted, id);

        if matches!(kind, NodeKind::Container | NodeKind::BooleanOp) {
            self.visit_children(&raw.children, Some(context), 0.0)?;
        }

        if context.layout.is_some() {
            let positions: Vec<Positioning> =
                self.tree.children(id).map(|c| c.positioning).collect();
            if let Some(layout) = self.tree.get_mut(id).and_then(|n| n.layout.as_mut()) {
                mark_absolute_children(layout, positions);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use altcode_core::raw::RawPaint;
    use altcode_core::{Color, SizingMode};
    use pretty_assertions::assert_eq;

    fn node(kind: &str, name: &str, bounds: (f64, f64, f64, f64)) -> DesignNode {
        DesignNode {
            id: format!("id:{}", name),
            kind: kind.to_string(),
            name: name.to_string(),
            absolute_bounding_box: Some(Rect::new(bounds.0, bounds.1, bounds.2, bounds.3)),
            ..Default::default()
        }
    }

    fn with_children(mut parent: DesignNode, children: Vec<DesignNode>) -> DesignNode {
        parent.children = children;
        parent
    }

    fn run(roots: &[DesignNode]) -> Normalized {
        normalize(roots, &CancellationFlag::new()).unwrap()
    }

    fn names(tree: &AltTree, id: NodeId) -> Vec<String> {
        tree.children(id).map(|n| n.unique_name.clone()).collect()
    }

    #[test]
    fn test_three_icons_get_unique_names() {
        let root = with_children(
            node("FRAME", "Toolbar", (0.0, 0.0, 100.0, 20.0)),
            vec![
                node("VECTOR", "Icon", (0.0, 0.0, 20.0, 20.0)),
                node("VECTOR", "Icon", (30.0, 0.0, 20.0, 20.0)),
                node("VECTOR", "Icon", (60.0, 0.0, 20.0, 20.0)),
            ],
        );
        let out = run(&[root]);
        assert_eq!(names(&out.tree, NodeId(0)), vec!["Icon", "Icon_01", "Icon_02"]);
    }

    #[test]
    fn test_nested_groups_are_spliced() {
        let root = with_children(
            node("FRAME", "Container", (0.0, 0.0, 100.0, 100.0)),
            vec![with_children(
                node("GROUP", "Outer", (0.0, 0.0, 50.0, 50.0)),
                vec![
                    node("RECTANGLE", "A", (0.0, 0.0, 10.0, 10.0)),
                    with_children(
                        node("GROUP", "Inner", (10.0, 10.0, 40.0, 40.0)),
                        vec![
                            node("RECTANGLE", "B", (10.0, 10.0, 10.0, 10.0)),
                            node("ELLIPSE", "C", (30.0, 30.0, 10.0, 10.0)),
                        ],
                    ),
                ],
            )],
        );
        let out = run(&[root]);
        assert_eq!(out.tree.len(), 4);
        assert_eq!(names(&out.tree, NodeId(0)), vec!["A", "B", "C"]);
        assert!(out.tree.find_by_name("Outer").is_none());
        assert!(out.tree.validate().is_ok());
    }

    #[test]
    fn test_group_root_promotes_children() {
        let group = with_children(
            node("GROUP", "Selection", (0.0, 0.0, 50.0, 50.0)),
            vec![
                node("RECTANGLE", "A", (0.0, 0.0, 10.0, 10.0)),
                node("TEXT", "B", (20.0, 0.0, 10.0, 10.0)),
            ],
        );
        let out = run(&[group]);
        assert_eq!(out.tree.roots(), &[NodeId(0), NodeId(1)]);
    }

    #[test]
    fn test_group_rotation_is_absorbed() {
        let mut group = with_children(
            node("GROUP", "G", (0.0, 0.0, 20.0, 20.0)),
            vec![node("RECTANGLE", "R", (0.0, 0.0, 20.0, 10.0))],
        );
        group.rotation = 10.0;
        let mut frame = node("FRAME", "F", (0.0, 0.0, 100.0, 100.0));
        frame.rotation = 5.0;
        let frame = with_children(frame, vec![group]);
        let out = run(&[frame]);
        let rect = &out.tree[NodeId(1)];
        assert_eq!(rect.geometry.rotation_degrees, -10.0);
        assert_eq!(rect.geometry.cumulative_rotation_degrees, -15.0);
    }

    #[test]
    fn test_hidden_nodes_consume_no_name() {
        let mut hidden = node("RECTANGLE", "Box", (0.0, 0.0, 10.0, 10.0));
        hidden.visible = Some(false);
        let root = with_children(
            node("FRAME", "Root", (0.0, 0.0, 100.0, 100.0)),
            vec![hidden, node("RECTANGLE", "Box", (0.0, 0.0, 10.0, 10.0))],
        );
        let out = run(&[root]);
        assert_eq!(names(&out.tree, NodeId(0)), vec!["Box"]);
    }

    #[test]
    fn test_unknown_kind_becomes_container() {
        let out = run(&[node("STICKY", "Note", (0.0, 0.0, 10.0, 10.0))]);
        assert_eq!(out.tree[NodeId(0)].kind, NodeKind::Container);
        let messages: Vec<_> = out.diagnostics.iter().map(|d| d.message.clone()).collect();
        assert_eq!(messages, vec!["unsupported node type: STICKY".to_string()]);
    }

    #[test]
    fn test_child_geometry_is_parent_relative() {
        let root = with_children(
            node("FRAME", "Root", (100.0, 200.0, 300.0, 300.0)),
            vec![node("RECTANGLE", "R", (110.0, 230.0, 50.0, 40.0))],
        );
        let out = run(&[root]);
        let root = &out.tree[NodeId(0)];
        assert_eq!((root.geometry.x, root.geometry.y), (0.0, 0.0));
        let rect = &out.tree[NodeId(1)];
        assert_eq!(
            (rect.geometry.x, rect.geometry.y, rect.geometry.width, rect.geometry.height),
            (10.0, 30.0, 50.0, 40.0)
        );
        assert_eq!(rect.positioning, Positioning::Absolute);
    }

    #[test]
    fn test_children_of_rotated_parent_are_node_local() {
        // A 100 × 50 frame turned 90°: its bounding box is 50 × 100.
        let mut frame = node("FRAME", "Turned", (0.0, 0.0, 50.0, 100.0));
        frame.rotation = 90.0;
        let root = with_children(
            frame,
            vec![
                node("RECTANGLE", "Corner", (0.0, 90.0, 10.0, 10.0)),
                node("RECTANGLE", "Bar", (30.0, 0.0, 10.0, 20.0)),
            ],
        );
        let out = run(&[root]);

        let turned = &out.tree[NodeId(0)];
        assert_eq!((turned.geometry.width, turned.geometry.height), (100.0, 50.0));
        let corner = &out.tree[NodeId(1)];
        assert_eq!(
            (corner.geometry.x, corner.geometry.y, corner.geometry.width, corner.geometry.height),
            (0.0, 0.0, 10.0, 10.0)
        );
        let bar = &out.tree[NodeId(2)];
        assert_eq!(
            (bar.geometry.x, bar.geometry.y, bar.geometry.width, bar.geometry.height),
            (80.0, 30.0, 20.0, 10.0)
        );
        assert_eq!(bar.geometry.rotation_degrees, 0.0);
        assert_eq!(bar.geometry.cumulative_rotation_degrees, -90.0);
    }

    #[test]
    fn test_empty_name_falls_back_to_kind() {
        let out = run(&[node("ELLIPSE", "  ", (0.0, 0.0, 10.0, 10.0))]);
        assert_eq!(out.tree[NodeId(0)].unique_name, "Ellipse");
    }

    #[test]
    fn test_malformed_bounds_warn() {
        let mut raw = node("RECTANGLE", "Bad", (0.0, 0.0, -5.0, 10.0));
        raw.fills = vec![RawPaint {
            kind: "SOLID".to_string(),
            color: Some(Color::BLACK),
            ..Default::default()
        }];
        let out = run(&[raw]);
        assert_eq!(out.tree[NodeId(0)].geometry.width, 0.0);
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.tree[NodeId(0)].paint.fills.len(), 1);
    }

    #[test]
    fn test_auto_layout_children() {
        let mut frame = node("FRAME", "Stack", (0.0, 0.0, 200.0, 100.0));
        frame.layout_mode = Some("VERTICAL".to_string());
        frame.item_spacing = Some(8.0);
        let mut floating = node("RECTANGLE", "Badge", (180.0, 0.0, 20.0, 20.0));
        floating.layout_positioning = Some("ABSOLUTE".to_string());
        let mut fill = node("RECTANGLE", "Row", (0.0, 0.0, 200.0, 20.0));
        fill.layout_sizing_horizontal = Some("FILL".to_string());
        let out = run(&[with_children(frame, vec![fill, floating])]);

        let layout = out.tree[NodeId(0)].layout.unwrap();
        assert_eq!(layout.gap, 8.0);
        assert!(layout.has_absolute_children);
        assert_eq!(out.tree[NodeId(1)].positioning, Positioning::Flow);
        assert_eq!(out.tree[NodeId(1)].sizing.horizontal, SizingMode::Fill);
        assert_eq!(out.tree[NodeId(2)].positioning, Positioning::Absolute);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_cancellation_aborts() {
        let cancel = CancellationFlag::new();
        cancel.cancel();
        let result = normalize(&[node("FRAME", "Root", (0.0, 0.0, 1.0, 1.0))], &cancel);
        assert!(matches!(result, Err(AltError::Cancelled)));
    }
}
