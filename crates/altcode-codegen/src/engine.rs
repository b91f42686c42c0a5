//! The emission engine: post-order traversal and backend dispatch.

use crate::backends::{ComposeBackend, FlutterBackend, HtmlBackend, SwiftUiBackend, TailwindBackend};
use crate::error::{CodegenError, Result};
use crate::fragment::Fragment;
use altcode_core::{
    AltNode, AltTree, BackendKind, CancellationFlag, ContractError, Diagnostics, LayoutDescriptor,
    NodeId, NodeKind, Positioning, RunConfig,
};
use altcode_resolver::Palette;

/// Read-only view of the run plus the diagnostics sink backends report to.
pub struct EmitContext<'a> {
    pub tree: &'a AltTree,
    pub config: &'a RunConfig,
    pub palette: &'a Palette,
    pub diagnostics: Diagnostics,
}

impl<'a> EmitContext<'a> {
    pub fn new(tree: &'a AltTree, config: &'a RunConfig, palette: &'a Palette) -> Self {
        Self {
            tree,
            config,
            palette,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn parent_layout(&self, node: &AltNode) -> Option<&'a LayoutDescriptor> {
        let tree: &'a AltTree = self.tree;
        tree.parent(node.id).and_then(|p| p.layout.as_ref())
    }

    /// Placed at explicit coordinates inside a parent.
    pub fn is_absolute(&self, node: &AltNode) -> bool {
        !node.is_root() && node.positioning == Positioning::Absolute
    }

    pub fn warn(&mut self, node: &AltNode, message: impl Into<String>) {
        self.diagnostics.warn(Some(node.id), message);
    }
}

/// A target framework.
///
/// Backends read the IR and return fragments; they never mutate the tree.
/// Constructs a backend cannot express produce a best-effort fragment plus a
/// diagnostic.
pub trait Backend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Placement, rotation and opacity. Backends whose styling is order
    /// independent apply size here as well.
    fn with_position_styles(&self, fragment: Fragment, node: &AltNode, cx: &mut EmitContext) -> Fragment;

    /// Fills, strokes, corners and effects.
    fn with_shape_styles(&self, fragment: Fragment, node: &AltNode, cx: &mut EmitContext) -> Fragment;

    fn text(&self, node: &AltNode, cx: &mut EmitContext) -> Fragment;

    /// A flattenable subtree rendered from its exported markup.
    fn vector(&self, node: &AltNode, markup: &str, cx: &mut EmitContext) -> Fragment;

    /// Rectangles, ellipses, and vectors without markup.
    fn shape(&self, node: &AltNode, cx: &mut EmitContext) -> Fragment;

    /// A container with its already emitted children, in paint order.
    fn container(
        &self,
        node: &AltNode,
        children: Vec<(&AltNode, Fragment)>,
        cx: &mut EmitContext,
    ) -> Fragment;

    fn with_layer_name(&self, fragment: Fragment, node: &AltNode) -> Fragment {
        fragment.with_comment(node.name.clone())
    }

    /// Source text of one root fragment.
    fn render(&self, fragment: &Fragment, cx: &EmitContext) -> String;

    /// Wrap the rendered roots according to the configured generation mode.
    fn document(&self, name: &str, bodies: &[String], config: &RunConfig) -> Result<String>;
}

static HTML: HtmlBackend = HtmlBackend;
static TAILWIND: TailwindBackend = TailwindBackend;
static FLUTTER: FlutterBackend = FlutterBackend;
static SWIFTUI: SwiftUiBackend = SwiftUiBackend;
static COMPOSE: ComposeBackend = ComposeBackend;

static BACKENDS: [(BackendKind, &'static dyn Backend); 5] = [
    (BackendKind::Html, &HTML),
    (BackendKind::Tailwind, &TAILWIND),
    (BackendKind::Flutter, &FLUTTER),
    (BackendKind::SwiftUi, &SWIFTUI),
    (BackendKind::Compose, &COMPOSE),
];

pub fn backend_for(kind: BackendKind) -> &'static dyn Backend {
    BACKENDS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, backend)| *backend)
        .unwrap_or(&HTML)
}

/// Look a backend up by its identifier (`html`, `tailwind`, …).
pub fn lookup(id: &str) -> Result<&'static dyn Backend> {
    let kind: BackendKind = id
        .parse()
        .map_err(|_| CodegenError::UnknownBackend(id.to_string()))?;
    Ok(backend_for(kind))
}

/// Emit one node and its subtree.
pub fn emit_node(
    backend: &dyn Backend,
    id: NodeId,
    cx: &mut EmitContext,
    cancel: &CancellationFlag,
) -> Result<Fragment> {
    cancel.check()?;
    let tree = cx.tree;
    let node = tree.get(id).ok_or(ContractError::DanglingNode { id })?;
    log::trace!("emitting {} '{}'", id, node.unique_name);

    let fragment = if node.can_flatten_to_vector && cx.config.embed_vectors {
        match &node.embedded_vector_markup {
            Some(markup) => backend.vector(node, markup, cx),
            // The export failure was reported during annotation.
            None => return Ok(Fragment::empty()),
        }
    } else {
        match node.kind {
            NodeKind::Text => backend.text(node, cx),
            NodeKind::Container => {
                let mut children = Vec::with_capacity(node.children.len());
                for &child in &node.children {
                    let fragment = emit_node(backend, child, cx, cancel)?;
                    children.push((&tree[child], fragment));
                }
                backend.container(node, children, cx)
            }
            _ => backend.shape(node, cx),
        }
    };

    if cx.config.show_layer_names && !fragment.is_empty() {
        return Ok(backend.with_layer_name(fragment, node));
    }
    Ok(fragment)
}

/// Emitted code plus what the backend reported.
#[derive(Debug)]
pub struct Emitted {
    pub code: String,
    pub diagnostics: Diagnostics,
}

/// Emit every root of `tree` with the configured backend.
///
/// The tree must be normalized: structurally valid and fully named.
pub fn emit(
    tree: &AltTree,
    config: &RunConfig,
    palette: &Palette,
    cancel: &CancellationFlag,
) -> Result<Emitted> {
    tree.validate()?;
    if tree.iter().any(|node| node.unique_name.is_empty()) {
        return Err(ContractError::NotNormalized.into());
    }

    let backend = backend_for(config.backend);
    log::debug!("emitting {} roots with the {} backend", tree.roots().len(), backend.kind());

    let mut cx = EmitContext::new(tree, config, palette);
    let mut bodies = Vec::with_capacity(tree.roots().len());
    for &root in tree.roots() {
        let fragment = emit_node(backend, root, &mut cx, cancel)?;
        if !fragment.is_empty() {
            bodies.push(backend.render(&fragment, &cx));
        }
    }

    let name = tree
        .roots()
        .first()
        .map(|&root| tree[root].unique_name.as_str())
        .unwrap_or("Component");
    let code = backend.document(name, &bodies, config)?;
    Ok(Emitted {
        code,
        diagnostics: cx.diagnostics,
    })
}

/// Children that take part in the flow and those placed on top of it.
pub(crate) fn partition_children(
    children: Vec<(&AltNode, Fragment)>,
) -> (Vec<Fragment>, Vec<Fragment>) {
    let mut flow = Vec::new();
    let mut absolute = Vec::new();
    for (child, fragment) in children {
        if fragment.is_empty() {
            continue;
        }
        match child.positioning {
            Positioning::Flow => flow.push(fragment),
            Positioning::Absolute => absolute.push(fragment),
        }
    }
    (flow, absolute)
}
