//! Tests for the flex layout algorithm, driven through `compute_flexbox_layout`.

use css_orchestrator::style_model::{Dimension, Display, Style};
use css_orchestrator::{
    AvailableSpace, Cache, Layout, LayoutInput, LayoutOutput, LayoutPartialTree, Line, NodeId,
    RequestedAxis, RunMode, Size, SizingMode, TraversePartialTree, TraverseTree,
};
use css_sizing::resolve_style_sizes_for_mode;

use crate::compute_flexbox_layout;

mod alignment_tests;
mod multi_line_tests;

/// A tree of flex containers and leaves. Leaves report a fixed content size.
pub struct FlexTree {
    styles: Vec<Style>,
    contents: Vec<Size<f32>>,
    children: Vec<Vec<NodeId>>,
    parents: Vec<Option<NodeId>>,
    layouts: Vec<Layout>,
    caches: Vec<Cache>,
}

impl FlexTree {
    pub const fn new() -> Self {
        Self {
            styles: Vec::new(),
            contents: Vec::new(),
            children: Vec::new(),
            parents: Vec::new(),
            layouts: Vec::new(),
            caches: Vec::new(),
        }
    }

    /// Add a node with the given style and children.
    pub fn add(&mut self, style: Style, children: &[NodeId]) -> NodeId {
        let id = NodeId::new(self.styles.len());
        self.styles.push(style);
        self.contents.push(Size::ZERO);
        self.children.push(children.to_vec());
        self.parents.push(None);
        self.layouts.push(Layout::new());
        self.caches.push(Cache::new());
        for child in children {
            self.parents[child.index()] = Some(id);
        }
        id
    }

    /// Add a leaf with the given style whose content measures `content`.
    pub fn add_leaf(&mut self, style: Style, content: Size<f32>) -> NodeId {
        let id = self.add(style, &[]);
        self.contents[id.index()] = content;
        id
    }

    /// Lay out `root` from its own styles.
    pub fn layout(&mut self, root: NodeId) -> LayoutOutput {
        self.layout_in(root, Size::MAX_CONTENT)
    }

    /// Lay out `root` under `available_space`.
    pub fn layout_in(
        &mut self,
        root: NodeId,
        available_space: Size<AvailableSpace>,
    ) -> LayoutOutput {
        compute_flexbox_layout(
            self,
            root,
            LayoutInput {
                run_mode: RunMode::PerformLayout,
                sizing_mode: SizingMode::InherentSize,
                axis: RequestedAxis::Both,
                known_dimensions: Size::NONE,
                parent_size: Size::NONE,
                available_space,
                vertical_margins_are_collapsible: Line::FALSE,
            },
        )
    }

    /// The layout written for `node`.
    pub fn get(&self, node: NodeId) -> Layout {
        self.layouts[node.index()]
    }

    fn leaf_output(&self, node: NodeId, inputs: LayoutInput) -> LayoutOutput {
        let style = &self.styles[node.index()];
        let sizes = resolve_style_sizes_for_mode(
            style,
            inputs.parent_size,
            Size::ZERO,
            inputs.sizing_mode,
        );
        let size = sizes
            .known_dimensions(inputs.known_dimensions)
            .unwrap_or(self.contents[node.index()]);
        LayoutOutput::from_outer_size(size)
    }
}

impl TraversePartialTree for FlexTree {
    fn child_ids(&self, parent: NodeId) -> &[NodeId] {
        &self.children[parent.index()]
    }
}

impl TraverseTree for FlexTree {
    fn parent_id(&self, child: NodeId) -> Option<NodeId> {
        self.parents[child.index()]
    }
}

impl LayoutPartialTree for FlexTree {
    fn style(&self, node: NodeId) -> &Style {
        &self.styles[node.index()]
    }

    fn unrounded_layout(&self, node: NodeId) -> Layout {
        self.layouts[node.index()]
    }

    fn set_unrounded_layout(&mut self, node: NodeId, layout: &Layout) {
        self.layouts[node.index()] = *layout;
    }

    fn cache_mut(&mut self, node: NodeId) -> &mut Cache {
        &mut self.caches[node.index()]
    }

    fn compute_child_layout(&mut self, node: NodeId, inputs: LayoutInput) -> LayoutOutput {
        let display = self.styles[node.index()].display;
        if inputs.run_mode == RunMode::PerformHiddenLayout || display == Display::None {
            return LayoutOutput::HIDDEN;
        }
        if display == Display::Flex && !self.children[node.index()].is_empty() {
            return compute_flexbox_layout(self, node, inputs);
        }
        self.leaf_output(node, inputs)
    }
}

/// A flex container style with the given border-box size.
pub fn container(width: Option<f32>, height: Option<f32>) -> Style {
    Style {
        display: Display::Flex,
        size: Size {
            width: width.map_or(Dimension::Auto, Dimension::Length),
            height: height.map_or(Dimension::Auto, Dimension::Length),
        },
        ..Style::default()
    }
}

/// A leaf style with the given border-box size.
pub fn fixed(width: f32, height: f32) -> Style {
    Style {
        size: Size {
            width: Dimension::Length(width),
            height: Dimension::Length(height),
        },
        ..Style::default()
    }
}

/// Whether `actual` is within rounding distance of `expected`.
pub fn approx(actual: f32, expected: f32) -> bool {
    (actual - expected).abs() < 0.01
}
