//! The canonical, framework-agnostic IR.
//!
//! Nodes live in an arena (`AltTree`) and refer to each other by `NodeId`.
//! Ownership runs strictly parent → children; `parent` is a lookup index only.
//! Ids are assigned in preorder, so sorting by id gives traversal order.

use crate::errors::ContractError;
use crate::types::{Color, Gradient};
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::HashSet;

/// Index of a node in its `AltTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// IR node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Container,
    Rectangle,
    Ellipse,
    Text,
    Vector,
    BooleanOp,
}

impl NodeKind {
    /// Rectangles and ellipses.
    pub fn is_primitive_shape(self) -> bool {
        matches!(self, NodeKind::Rectangle | NodeKind::Ellipse)
    }

    /// Kinds that describe drawable geometry rather than structure or text.
    pub fn is_shape(self) -> bool {
        matches!(
            self,
            NodeKind::Rectangle | NodeKind::Ellipse | NodeKind::Vector | NodeKind::BooleanOp
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Container => "Container",
            NodeKind::Rectangle => "Rectangle",
            NodeKind::Ellipse => "Ellipse",
            NodeKind::Text => "Text",
            NodeKind::Vector => "Vector",
            NodeKind::BooleanOp => "BooleanOp",
        }
    }
}

/// Resolved, node-local, un-rotated geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Geometry {
    /// Offset from the parent's un-rotated top-left.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Own rotation, CSS convention (positive = clockwise).
    pub rotation_degrees: f64,
    /// Own rotation plus every ancestor's, CSS convention.
    pub cumulative_rotation_degrees: f64,
}

impl Geometry {
    pub fn is_rotated(&self) -> bool {
        self.rotation_degrees.abs() > f64::EPSILON
    }
}

/// A symbolic design token bound to a paint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableBinding {
    pub name: String,
    pub fallback_hex: String,
}

/// How an image fill is scaled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ImageScaleMode {
    #[default]
    Fill,
    Fit,
    Tile,
    Crop,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageFill {
    pub image_ref: String,
    pub scale_mode: ImageScaleMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PaintKind {
    Solid(Color),
    Gradient(Gradient),
    Image(ImageFill),
}

/// One fill or stroke entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaintEntry {
    pub kind: PaintKind,
    pub opacity: f64,
    /// Set by the color resolver once the variable reference resolves.
    pub variable: Option<VariableBinding>,
    /// Host variable id awaiting resolution.
    pub variable_ref: Option<String>,
}

impl PaintEntry {
    pub fn solid(color: Color) -> Self {
        Self {
            kind: PaintKind::Solid(color),
            opacity: 1.0,
            variable: None,
            variable_ref: None,
        }
    }

    /// Solid color with the entry opacity folded into alpha.
    pub fn solid_color(&self) -> Option<Color> {
        match &self.kind {
            PaintKind::Solid(color) => Some(color.with_opacity(self.opacity)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Paint {
    pub fills: Vec<PaintEntry>,
    pub strokes: Vec<PaintEntry>,
}

impl Paint {
    pub fn entries(&self) -> impl Iterator<Item = &PaintEntry> {
        self.fills.iter().chain(self.strokes.iter())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum StrokeAlign {
    #[default]
    Inside,
    Center,
    Outside,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Stroke {
    pub weight: f64,
    pub align: StrokeAlign,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CornerRadius {
    Uniform(f64),
    /// Top-left, top-right, bottom-right, bottom-left.
    PerCorner([f64; 4]),
}

impl Default for CornerRadius {
    fn default() -> Self {
        CornerRadius::Uniform(0.0)
    }
}

impl CornerRadius {
    pub fn is_zero(&self) -> bool {
        match self {
            CornerRadius::Uniform(r) => *r == 0.0,
            CornerRadius::PerCorner(r) => r.iter().all(|v| *v == 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shadow {
    pub color: Color,
    pub offset_x: f64,
    pub offset_y: f64,
    pub radius: f64,
    pub spread: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Effect {
    DropShadow(Shadow),
    InnerShadow(Shadow),
    LayerBlur { radius: f64 },
    BackgroundBlur { radius: f64 },
}

/// Main-axis direction of an auto-flow container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Row,
    Column,
}

/// Distribution of items on the main axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PrimaryAlign {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
}

/// Alignment of items on the cross axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum CounterAlign {
    #[default]
    Start,
    Center,
    End,
    Baseline,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SizingMode {
    #[default]
    Fixed,
    Hug,
    Fill,
}

/// Padding on all sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    /// Create uniform padding.
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }

    pub fn is_uniform(&self) -> bool {
        self.top == self.right && self.right == self.bottom && self.bottom == self.left
    }

    /// Left and right equal, top and bottom equal.
    pub fn is_symmetric(&self) -> bool {
        self.left == self.right && self.top == self.bottom
    }
}

/// A container's declarative child arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutDescriptor {
    pub direction: Direction,
    pub primary_align: PrimaryAlign,
    pub counter_align: CounterAlign,
    pub wrap: bool,
    pub gap: f64,
    pub padding: Padding,
    pub primary_sizing: SizingMode,
    pub counter_sizing: SizingMode,
    /// Some children opt out of the flow and need an overlay wrapper.
    pub has_absolute_children: bool,
}

impl LayoutDescriptor {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            primary_align: PrimaryAlign::Start,
            counter_align: CounterAlign::Start,
            wrap: false,
            gap: 0.0,
            padding: Padding::default(),
            primary_sizing: SizingMode::Fixed,
            counter_sizing: SizingMode::Fixed,
            has_absolute_children: false,
        }
    }

    /// Sizing along the horizontal axis.
    pub fn horizontal_sizing(&self) -> SizingMode {
        match self.direction {
            Direction::Row => self.primary_sizing,
            Direction::Column => self.counter_sizing,
        }
    }

    /// Sizing along the vertical axis.
    pub fn vertical_sizing(&self) -> SizingMode {
        match self.direction {
            Direction::Row => self.counter_sizing,
            Direction::Column => self.primary_sizing,
        }
    }
}

/// How a node is placed inside its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Positioning {
    /// Placed by the parent's flow (or a root).
    #[default]
    Flow,
    /// Placed at `geometry.x`/`geometry.y`.
    Absolute,
}

/// A node's own sizing behaviour as a child.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChildSizing {
    pub horizontal: SizingMode,
    pub vertical: SizingMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    Strikethrough,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum TextCase {
    #[default]
    Original,
    Upper,
    Lower,
    Title,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum TextAutoResize {
    #[default]
    None,
    Height,
    WidthAndHeight,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub enum LineHeight {
    #[default]
    Auto,
    Pixels(f64),
    Percent(f64),
}

/// A maximal span of uniformly styled characters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub characters: String,
    pub font_size: f64,
    pub font_weight: u16,
    pub font_family: String,
    pub italic: bool,
    pub decoration: TextDecoration,
    pub case_transform: TextCase,
    /// Index into the node's `paint.fills`.
    pub fill_ref: Option<usize>,
    /// In pixels.
    pub letter_spacing: f64,
    pub line_height: LineHeight,
}

impl TextRun {
    /// Same styling, ignoring the characters.
    pub fn same_style(&self, other: &TextRun) -> bool {
        self.font_size == other.font_size
            && self.font_weight == other.font_weight
            && self.font_family == other.font_family
            && self.italic == other.italic
            && self.decoration == other.decoration
            && self.case_transform == other.case_transform
            && self.fill_ref == other.fill_ref
            && self.letter_spacing == other.letter_spacing
            && self.line_height == other.line_height
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextContent {
    pub runs: Vec<TextRun>,
    pub align: TextAlign,
    pub auto_resize: TextAutoResize,
}

impl TextContent {
    /// The full string, reconstructed from the runs.
    pub fn characters(&self) -> String {
        self.runs.iter().map(|r| r.characters.as_str()).collect()
    }
}

/// A node of the canonical IR.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AltNode {
    pub id: NodeId,
    /// Host identifier, used for collaborator calls.
    pub source_id: String,
    /// Raw kind discriminator, kept for diagnostics.
    pub source_kind: String,
    pub kind: NodeKind,
    pub name: String,
    pub unique_name: String,
    pub parent: Option<NodeId>,
    pub children: SmallVec<[NodeId; 4]>,
    pub geometry: Geometry,
    pub paint: Paint,
    pub stroke: Stroke,
    pub corner_radius: CornerRadius,
    pub opacity: f64,
    pub clips_content: bool,
    pub layout: Option<LayoutDescriptor>,
    pub positioning: Positioning,
    pub sizing: ChildSizing,
    pub effects: Vec<Effect>,
    pub text: Option<TextContent>,
    pub export_as_vector: bool,
    pub can_flatten_to_vector: bool,
    pub embedded_vector_markup: Option<String>,
}

impl AltNode {
    /// A node with every field at its neutral default.
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            id: NodeId(0),
            source_id: String::new(),
            source_kind: String::new(),
            kind,
            name: name.into(),
            unique_name: String::new(),
            parent: None,
            children: SmallVec::new(),
            geometry: Geometry::default(),
            paint: Paint::default(),
            stroke: Stroke::default(),
            corner_radius: CornerRadius::default(),
            opacity: 1.0,
            clips_content: false,
            layout: None,
            positioning: Positioning::Flow,
            sizing: ChildSizing::default(),
            effects: Vec::new(),
            text: None,
            export_as_vector: false,
            can_flatten_to_vector: false,
            embedded_vector_markup: None,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.geometry.width = width;
        self.geometry.height = height;
        self
    }

    pub fn with_fill(mut self, fill: PaintEntry) -> Self {
        self.paint.fills.push(fill);
        self
    }

    pub fn with_layout(mut self, layout: LayoutDescriptor) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_text(mut self, text: TextContent) -> Self {
        self.text = Some(text);
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn has_visible_stroke(&self) -> bool {
        self.stroke.weight > 0.0 && !self.paint.strokes.is_empty()
    }
}

/// Arena holding one conversion run's IR forest.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AltTree {
    nodes: Vec<AltNode>,
    roots: Vec<NodeId>,
}

impl AltTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node under `parent` (or as a root) and return its id.
    pub fn insert(&mut self, mut node: AltNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        node.id = id;
        node.parent = parent;
        node.children.clear();
        self.nodes.push(node);
        match parent {
            Some(parent) => self.nodes[parent.index()].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// The id the next `insert` will assign.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len() as u32)
    }

    pub fn get(&self, id: NodeId) -> Option<&AltNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut AltNode> {
        self.nodes.get_mut(id.index())
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AltNode> {
        self.nodes.iter()
    }

    pub fn parent(&self, id: NodeId) -> Option<&AltNode> {
        self.get(id)?.parent.and_then(|p| self.get(p))
    }

    /// Children of `id`, in paint order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &AltNode> {
        self.get(id)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(move |c| self.get(*c))
    }

    /// Find a node by its unique name.
    pub fn find_by_name(&self, unique_name: &str) -> Option<&AltNode> {
        self.nodes.iter().find(|n| n.unique_name == unique_name)
    }

    /// Ids of the subtree rooted at `root`, in preorder.
    pub fn preorder(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                out.push(id);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Check the structural contract every consumer relies on: ids match
    /// their slots, roots have no parent, links are mutual, and no cycles.
    pub fn validate(&self) -> Result<(), ContractError> {
        for (index, node) in self.nodes.iter().enumerate() {
            if node.id.index() != index {
                return Err(ContractError::MisplacedNode {
                    id: node.id,
                    slot: index,
                });
            }
        }

        let mut visited = HashSet::new();
        for &root in &self.roots {
            let node = self.get(root).ok_or(ContractError::DanglingNode { id: root })?;
            if node.parent.is_some() {
                return Err(ContractError::RootHasParent { id: root });
            }
            self.validate_subtree(root, &mut visited)?;
        }
        Ok(())
    }

    fn validate_subtree(
        &self,
        root: NodeId,
        visited: &mut HashSet<NodeId>,
    ) -> Result<(), ContractError> {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                return Err(ContractError::CycleDetected { id });
            }
            let node = self.get(id).ok_or(ContractError::DanglingNode { id })?;
            for &child in &node.children {
                let child_node = self
                    .get(child)
                    .ok_or(ContractError::DanglingNode { id: child })?;
                if child_node.parent != Some(id) {
                    return Err(ContractError::BrokenParentLink {
                        id: child,
                        expected: id,
                    });
                }
                stack.push(child);
            }
        }
        Ok(())
    }
}

impl std::ops::Index<NodeId> for AltTree {
    type Output = AltNode;

    fn index(&self, id: NodeId) -> &AltNode {
        &self.nodes[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> AltTree {
        let mut tree = AltTree::new();
        let root = tree.insert(AltNode::new(NodeKind::Container, "Root"), None);
        let a = tree.insert(AltNode::new(NodeKind::Rectangle, "A"), Some(root));
        tree.insert(AltNode::new(NodeKind::Ellipse, "B"), Some(a));
        tree.insert(AltNode::new(NodeKind::Text, "C"), Some(root));
        tree
    }

    #[test]
    fn test_insert_links_parent_and_children() {
        let tree = sample_tree();
        assert_eq!(tree.roots(), &[NodeId(0)]);
        assert_eq!(tree[NodeId(0)].children.as_slice(), &[NodeId(1), NodeId(3)]);
        assert_eq!(tree[NodeId(2)].parent, Some(NodeId(1)));
        assert_eq!(tree.parent(NodeId(3)).map(|n| n.name.as_str()), Some("Root"));
    }

    #[test]
    fn test_preorder_matches_ids() {
        let tree = sample_tree();
        assert_eq!(
            tree.preorder(NodeId(0)),
            vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3)]
        );
    }

    #[test]
    fn test_validate_accepts_well_formed_tree() {
        assert!(sample_tree().validate().is_ok());
    }

    #[test]
    fn test_validate_detects_cycle() {
        let mut tree = sample_tree();
        // Make B point back at the root.
        tree.get_mut(NodeId(2)).unwrap().children.push(NodeId(0));
        tree.get_mut(NodeId(0)).unwrap().parent = None;
        let err = tree.validate().unwrap_err();
        assert!(matches!(
            err,
            ContractError::CycleDetected { .. } | ContractError::BrokenParentLink { .. }
        ));
    }

    #[test]
    fn test_validate_detects_dangling_child() {
        let mut tree = sample_tree();
        tree.get_mut(NodeId(3)).unwrap().children.push(NodeId(42));
        assert!(matches!(
            tree.validate(),
            Err(ContractError::DanglingNode { id: NodeId(42) })
        ));
    }

    #[test]
    fn test_text_characters_concatenate_runs() {
        let run = |s: &str| TextRun {
            characters: s.to_string(),
            font_size: 14.0,
            font_weight: 400,
            font_family: "Inter".to_string(),
            italic: false,
            decoration: TextDecoration::None,
            case_transform: TextCase::Original,
            fill_ref: None,
            letter_spacing: 0.0,
            line_height: LineHeight::Auto,
        };
        let text = TextContent {
            runs: vec![run("Hello, "), run("world")],
            ..Default::default()
        };
        assert_eq!(text.characters(), "Hello, world");
    }
}
