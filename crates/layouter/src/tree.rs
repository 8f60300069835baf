//! Host storage for a tree of styled nodes.

use core::mem;

use anyhow::{Context as _, Result, bail};
use css_block::compute_block_layout;
use css_flexbox::compute_flexbox_layout;
use css_grid::compute_grid_layout;
use css_orchestrator::style_model::{Display, Style};
use css_orchestrator::{
    AvailableSpace, Cache, ClearState, Layout, LayoutInput, LayoutOutput, LayoutPartialTree,
    NodeId, RunMode, Size, TraversePartialTree, TraverseTree,
};
use log::debug;

use crate::compute::{compute_cached_layout, compute_hidden_layout, compute_root_layout};
use crate::config::LayoutConfig;
use crate::leaf::compute_leaf_layout;
use crate::printing::print_tree;
use crate::round::round_layout;

/// Content measurement for leaves: content-box known dimensions and available space in, content
/// size out.
pub type MeasureFunction = Box<dyn Fn(Size<Option<f32>>, Size<AvailableSpace>) -> Size<f32>>;

/// One node of the arena.
struct NodeData {
    style: Style,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    measure: Option<MeasureFunction>,
    unrounded_layout: Layout,
    final_layout: Layout,
    cache: Cache,
}

impl NodeData {
    fn new(style: Style) -> Self {
        Self {
            style,
            children: Vec::new(),
            parent: None,
            measure: None,
            unrounded_layout: Layout::new(),
            final_layout: Layout::new(),
            cache: Cache::new(),
        }
    }
}

/// The node arena the layout algorithms run against.
///
/// Ids handed to the algorithms always come from the arena itself, so lookups index directly.
pub struct NodeArena {
    nodes: Vec<NodeData>,
}

impl NodeArena {
    fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.index()]
    }

    fn data_mut(&mut self, node: NodeId) -> &mut NodeData {
        &mut self.nodes[node.index()]
    }

    /// Final (possibly rounded) layout of `node`.
    pub fn final_layout(&self, node: NodeId) -> Layout {
        self.data(node).final_layout
    }

    /// Store the final layout of `node`.
    pub fn set_final_layout(&mut self, node: NodeId, layout: Layout) {
        self.data_mut(node).final_layout = layout;
    }

    /// Display of `node`.
    pub fn display(&self, node: NodeId) -> Display {
        self.data(node).style.display
    }

    fn compute_leaf(&self, node: NodeId, inputs: LayoutInput) -> LayoutOutput {
        let data = self.data(node);
        compute_leaf_layout(inputs, &data.style, |known_dimensions, available_space| {
            data.measure
                .as_ref()
                .map_or(Size::ZERO, |measure| measure(known_dimensions, available_space))
        })
    }
}

impl TraversePartialTree for NodeArena {
    fn child_ids(&self, parent: NodeId) -> &[NodeId] {
        &self.data(parent).children
    }
}

impl TraverseTree for NodeArena {
    fn parent_id(&self, child: NodeId) -> Option<NodeId> {
        self.data(child).parent
    }
}

impl LayoutPartialTree for NodeArena {
    fn style(&self, node: NodeId) -> &Style {
        &self.data(node).style
    }

    fn unrounded_layout(&self, node: NodeId) -> Layout {
        self.data(node).unrounded_layout
    }

    fn set_unrounded_layout(&mut self, node: NodeId, layout: &Layout) {
        self.data_mut(node).unrounded_layout = *layout;
    }

    fn cache_mut(&mut self, node: NodeId) -> &mut Cache {
        &mut self.data_mut(node).cache
    }

    fn compute_child_layout(&mut self, node: NodeId, inputs: LayoutInput) -> LayoutOutput {
        if inputs.run_mode == RunMode::PerformHiddenLayout {
            return compute_hidden_layout(self, node);
        }
        compute_cached_layout(self, node, inputs, |arena, node, inputs| {
            let display = arena.data(node).style.display;
            let is_leaf = arena.data(node).children.is_empty();
            match (display, is_leaf) {
                (Display::None, _) => compute_hidden_layout(arena, node),
                (_, true) => arena.compute_leaf(node, inputs),
                (Display::Block, false) => compute_block_layout(arena, node, inputs),
                (Display::Flex, false) => compute_flexbox_layout(arena, node, inputs),
                (Display::Grid, false) => compute_grid_layout(arena, node, inputs),
            }
        })
    }
}

/// A tree of styled nodes with their computed layouts.
///
/// Every mutation clears the cached results of the touched node and its ancestors, so the next
/// [`LayoutTree::compute_layout`] only redoes work that can have changed.
pub struct LayoutTree {
    arena: NodeArena,
    config: LayoutConfig,
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTree {
    /// An empty tree with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    /// An empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: NodeArena {
                nodes: Vec::with_capacity(capacity),
            },
            config: LayoutConfig::default(),
        }
    }

    /// An empty tree with the given configuration.
    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            arena: NodeArena { nodes: Vec::new() },
            config,
        }
    }

    /// Round final layouts to whole pixels.
    pub fn enable_rounding(&mut self) {
        self.config.use_rounding = true;
    }

    /// Keep final layouts fractional.
    pub fn disable_rounding(&mut self) {
        self.config.use_rounding = false;
    }

    /// Current configuration.
    pub const fn config(&self) -> LayoutConfig {
        self.config
    }

    fn node(&self, node: NodeId) -> Result<&NodeData> {
        self.arena
            .nodes
            .get(node.index())
            .with_context(|| format!("unknown node {node:?}"))
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut NodeData> {
        self.arena
            .nodes
            .get_mut(node.index())
            .with_context(|| format!("unknown node {node:?}"))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId::new(self.arena.nodes.len());
        self.arena.nodes.push(data);
        id
    }

    /// Add a childless node.
    pub fn new_leaf(&mut self, style: Style) -> NodeId {
        self.push(NodeData::new(style))
    }

    /// Add a childless node whose content is sized by `measure`.
    pub fn new_leaf_with_measure<MeasureFn>(&mut self, style: Style, measure: MeasureFn) -> NodeId
    where
        MeasureFn: Fn(Size<Option<f32>>, Size<AvailableSpace>) -> Size<f32> + 'static,
    {
        let mut data = NodeData::new(style);
        data.measure = Some(Box::new(measure));
        self.push(data)
    }

    /// Add a node owning `children`. Children are detached from any previous parent.
    ///
    /// # Errors
    /// Fails if any child id is unknown.
    pub fn new_with_children(&mut self, style: Style, children: &[NodeId]) -> Result<NodeId> {
        for child in children {
            self.node(*child)
                .context("cannot adopt child into new node")?;
        }
        let parent = self.push(NodeData::new(style));
        for child in children {
            self.detach(*child)?;
            self.node_mut(*child)?.parent = Some(parent);
        }
        self.node_mut(parent)?.children = children.to_vec();
        Ok(parent)
    }

    /// Remove `child` from its current parent's child list, if it has one.
    fn detach(&mut self, child: NodeId) -> Result<()> {
        let Some(old_parent) = self.node(child)?.parent else {
            return Ok(());
        };
        self.node_mut(old_parent)?
            .children
            .retain(|sibling| *sibling != child);
        self.node_mut(child)?.parent = None;
        self.mark_dirty(old_parent)
    }

    /// Fail if adopting `child` under `parent` would close a cycle.
    fn ensure_not_ancestor(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(child)?;
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                bail!("{child:?} is {parent:?} or one of its ancestors and cannot become its child");
            }
            current = self.node(id)?.parent;
        }
        Ok(())
    }

    /// Append `child` to `parent`'s children.
    ///
    /// # Errors
    /// Fails if either id is unknown or if `child` is `parent` or one of its ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.ensure_not_ancestor(parent, child)?;
        self.detach(child)?;
        let count = self.child_count(parent)?;
        self.insert_child_at_index(parent, count, child)
    }

    /// Insert `child` at `index` among `parent`'s children.
    ///
    /// # Errors
    /// Fails if either id is unknown, if `index` is past the end, or if `child` is `parent` or
    /// one of its ancestors.
    pub fn insert_child_at_index(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<()> {
        self.ensure_not_ancestor(parent, child)?;
        let already_child = self.node(child)?.parent == Some(parent);
        let count = self.child_count(parent)? - usize::from(already_child);
        if index > count {
            bail!("child index {index} out of range for {parent:?} with {count} other children");
        }
        self.detach(child)?;
        self.node_mut(parent)?.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        self.mark_dirty(parent)
    }

    /// Replace `parent`'s children.
    ///
    /// # Errors
    /// Fails if any id is unknown or if a child is `parent` or one of its ancestors.
    pub fn set_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<()> {
        for child in children {
            self.ensure_not_ancestor(parent, *child)
                .with_context(|| format!("cannot set children of {parent:?}"))?;
        }
        let previous = mem::take(&mut self.node_mut(parent)?.children);
        for old_child in previous {
            self.node_mut(old_child)?.parent = None;
        }
        for child in children {
            self.detach(*child)?;
            self.node_mut(*child)?.parent = Some(parent);
        }
        self.node_mut(parent)?.children = children.to_vec();
        self.mark_dirty(parent)
    }

    /// Detach `child` from `parent` and return it.
    ///
    /// # Errors
    /// Fails if either id is unknown or `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        if self.node(child)?.parent != Some(parent) {
            bail!("{child:?} is not a child of {parent:?}");
        }
        self.detach(child)?;
        Ok(child)
    }

    /// Replace the style of `node`.
    ///
    /// # Errors
    /// Fails if `node` is unknown.
    pub fn set_style(&mut self, node: NodeId, style: Style) -> Result<()> {
        self.node_mut(node)?.style = style;
        self.mark_dirty(node)
    }

    /// The style of `node`.
    ///
    /// # Errors
    /// Fails if `node` is unknown.
    pub fn style(&self, node: NodeId) -> Result<&Style> {
        Ok(&self.node(node)?.style)
    }

    /// Replace (or remove) the measure function of `node`.
    ///
    /// # Errors
    /// Fails if `node` is unknown.
    pub fn set_measure(&mut self, node: NodeId, measure: Option<MeasureFunction>) -> Result<()> {
        self.node_mut(node)?.measure = measure;
        self.mark_dirty(node)
    }

    /// The children of `node`, in order.
    ///
    /// # Errors
    /// Fails if `node` is unknown.
    pub fn children(&self, node: NodeId) -> Result<&[NodeId]> {
        Ok(&self.node(node)?.children)
    }

    /// Number of children of `node`.
    ///
    /// # Errors
    /// Fails if `node` is unknown.
    pub fn child_count(&self, node: NodeId) -> Result<usize> {
        Ok(self.node(node)?.children.len())
    }

    /// The parent of `node`, if it has one.
    ///
    /// # Errors
    /// Fails if `node` is unknown.
    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(node)?.parent)
    }

    /// Drop the cached results of `node` and its ancestors. The walk up stops at the first
    /// ancestor whose cache was already empty.
    ///
    /// # Errors
    /// Fails if `node` is unknown.
    pub fn mark_dirty(&mut self, node: NodeId) -> Result<()> {
        let data = self.node_mut(node)?;
        data.cache.clear();
        let mut current = data.parent;
        while let Some(id) = current {
            let ancestor = self.node_mut(id)?;
            if ancestor.cache.clear() == ClearState::AlreadyEmpty {
                break;
            }
            current = ancestor.parent;
        }
        Ok(())
    }

    /// Whether `node` has no cached results and will be laid out afresh.
    ///
    /// # Errors
    /// Fails if `node` is unknown.
    pub fn dirty(&self, node: NodeId) -> Result<bool> {
        Ok(self.node(node)?.cache.is_empty())
    }

    /// The final layout of `node`, rounded when rounding is enabled.
    ///
    /// # Errors
    /// Fails if `node` is unknown.
    pub fn layout(&self, node: NodeId) -> Result<&Layout> {
        Ok(&self.node(node)?.final_layout)
    }

    /// The layout of `node` before rounding.
    ///
    /// # Errors
    /// Fails if `node` is unknown.
    pub fn unrounded_layout(&self, node: NodeId) -> Result<&Layout> {
        Ok(&self.node(node)?.unrounded_layout)
    }

    /// Lay out the tree under `root` inside `available_space`.
    ///
    /// # Errors
    /// Fails if `root` is unknown.
    pub fn compute_layout(
        &mut self,
        root: NodeId,
        available_space: Size<AvailableSpace>,
    ) -> Result<()> {
        self.node(root).context("cannot lay out")?;
        debug!(
            target: "layouter",
            "[LAYOUT root={root:?}] available={available_space:?} rounding={}",
            self.config.use_rounding
        );
        compute_root_layout(&mut self.arena, root, available_space);
        if self.config.use_rounding {
            round_layout(&mut self.arena, root);
        } else {
            copy_unrounded_layouts(&mut self.arena, root);
        }
        Ok(())
    }

    /// Render the laid-out tree under `root` as indented text and log it.
    ///
    /// # Errors
    /// Fails if `root` is unknown.
    pub fn print_tree(&self, root: NodeId) -> Result<String> {
        self.node(root).context("cannot print")?;
        let rendered = print_tree(&self.arena, root)?;
        debug!(target: "layouter::print", "\n{rendered}");
        Ok(rendered)
    }
}

/// Make the unrounded layouts of the subtree under `node` final as they are.
fn copy_unrounded_layouts(arena: &mut NodeArena, node: NodeId) {
    let layout = arena.unrounded_layout(node);
    arena.set_final_layout(node, layout);
    let children = arena.child_ids(node).to_vec();
    for child in children {
        copy_unrounded_layouts(arena, child);
    }
}
