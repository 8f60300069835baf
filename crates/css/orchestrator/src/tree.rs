//! The contract between layout algorithms and the tree they lay out.
//!
//! Solvers never own the tree. They receive `&mut impl LayoutPartialTree` and call back into it
//! for every child, which keeps the dispatcher/solver recursion free of ownership cycles.

use crate::available_space::AvailableSpace;
use crate::cache::Cache;
use crate::geometry::{AbsoluteAxis, Line, Point, Size};
use crate::layout::{CollapsibleMarginSet, Layout};
use crate::style_model::{Direction, Style};

/// An opaque handle to a node in the host's tree storage.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct NodeId(usize);

impl NodeId {
    /// Wrap a raw index.
    #[inline]
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// The raw index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(raw: usize) -> Self {
        Self(raw)
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(node: NodeId) -> Self {
        node.0
    }
}

/// What a layout call must produce.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RunMode {
    /// Full layout: size the node and write the final layout of every child
    PerformLayout,
    /// Only compute the node's size
    ComputeSize,
    /// The node generates no box: write zero layouts for the whole subtree
    PerformHiddenLayout,
}

/// Whether style-specified sizes are honored for this call.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SizingMode {
    /// Ignore `size`/`min_size`/`max_size` and size purely from content
    ContentSize,
    /// Honor the node's own size styles
    InherentSize,
}

/// The axis a size-only call is interested in.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RequestedAxis {
    /// Only the width
    Horizontal,
    /// Only the height
    Vertical,
    /// Both dimensions
    Both,
}

impl From<AbsoluteAxis> for RequestedAxis {
    #[inline]
    fn from(axis: AbsoluteAxis) -> Self {
        match axis {
            AbsoluteAxis::Horizontal => Self::Horizontal,
            AbsoluteAxis::Vertical => Self::Vertical,
        }
    }
}

/// The immutable request passed from a parent to a child.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LayoutInput {
    /// Full layout or size only
    pub run_mode: RunMode,
    /// Whether the child's own size styles apply
    pub sizing_mode: SizingMode,
    /// Which axis a size-only call needs
    pub axis: RequestedAxis,
    /// Border-box dimensions the parent has already fixed
    pub known_dimensions: Size<Option<f32>>,
    /// Basis for percentage resolution
    pub parent_size: Size<Option<f32>>,
    /// Space offered in each axis
    pub available_space: Size<AvailableSpace>,
    /// Whether the child's top/bottom margins may collapse with its parent's
    pub vertical_margins_are_collapsible: Line<bool>,
}

impl LayoutInput {
    /// The input used for hidden layout.
    pub const HIDDEN: Self = Self {
        run_mode: RunMode::PerformHiddenLayout,
        sizing_mode: SizingMode::InherentSize,
        axis: RequestedAxis::Both,
        known_dimensions: Size::NONE,
        parent_size: Size::NONE,
        available_space: Size::MAX_CONTENT,
        vertical_margins_are_collapsible: Line::FALSE,
    };
}

/// The result of laying out (or sizing) one node.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LayoutOutput {
    /// Border-box size
    pub size: Size<f32>,
    /// Size of the content, used for scroll extents
    pub content_size: Size<f32>,
    /// First baseline in each axis, relative to the border box
    pub first_baselines: Point<Option<f32>>,
    /// Margins that may collapse through the node's top edge
    pub top_margin: CollapsibleMarginSet,
    /// Margins that may collapse through the node's bottom edge
    pub bottom_margin: CollapsibleMarginSet,
    /// Whether the node's top and bottom margins collapse through it
    pub margins_can_collapse_through: bool,
}

impl LayoutOutput {
    /// The output of hidden layout.
    pub const HIDDEN: Self = Self {
        size: Size::ZERO,
        content_size: Size::ZERO,
        first_baselines: Point::NONE,
        top_margin: CollapsibleMarginSet::ZERO,
        bottom_margin: CollapsibleMarginSet::ZERO,
        margins_can_collapse_through: false,
    };

    /// A zero-sized output.
    pub const DEFAULT: Self = Self::HIDDEN;

    /// An output with the given sizes and baselines and non-collapsing margins.
    #[inline]
    pub const fn from_sizes_and_baselines(
        size: Size<f32>,
        content_size: Size<f32>,
        first_baselines: Point<Option<f32>>,
    ) -> Self {
        Self {
            size,
            content_size,
            first_baselines,
            top_margin: CollapsibleMarginSet::ZERO,
            bottom_margin: CollapsibleMarginSet::ZERO,
            margins_can_collapse_through: false,
        }
    }

    /// An output with the given sizes and no baselines.
    #[inline]
    pub const fn from_sizes(size: Size<f32>, content_size: Size<f32>) -> Self {
        Self::from_sizes_and_baselines(size, content_size, Point::NONE)
    }

    /// An output with the given border-box size and no content.
    #[inline]
    pub const fn from_outer_size(size: Size<f32>) -> Self {
        Self::from_sizes(size, Size::ZERO)
    }
}

impl Default for LayoutOutput {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Read access to the children of a node.
pub trait TraversePartialTree {
    /// The ordered children of `parent`.
    fn child_ids(&self, parent: NodeId) -> &[NodeId];

    /// The number of children of `parent`.
    #[inline]
    fn child_count(&self, parent: NodeId) -> usize {
        self.child_ids(parent).len()
    }

    /// The child of `parent` at `index`.
    #[inline]
    fn get_child_id(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.child_ids(parent).get(index).copied()
    }
}

/// Full traversal, including parent links.
pub trait TraverseTree: TraversePartialTree {
    /// The parent of `child`, or `None` at the root.
    fn parent_id(&self, child: NodeId) -> Option<NodeId>;
}

/// The capability interface solvers use to read styles, store results and lay out children.
pub trait LayoutPartialTree: TraverseTree {
    /// The computed style of `node`.
    fn style(&self, node: NodeId) -> &Style;

    /// The unrounded layout last written for `node`.
    fn unrounded_layout(&self, node: NodeId) -> Layout;

    /// Store the unrounded layout of `node`.
    fn set_unrounded_layout(&mut self, node: NodeId, layout: &Layout);

    /// The layout cache of `node`.
    fn cache_mut(&mut self, node: NodeId) -> &mut Cache;

    /// Lay out or size `node` (through the cache).
    fn compute_child_layout(&mut self, node: NodeId, inputs: LayoutInput) -> LayoutOutput;

    /// Size one axis of a child.
    #[inline]
    fn measure_child_size(
        &mut self,
        node: NodeId,
        known_dimensions: Size<Option<f32>>,
        parent_size: Size<Option<f32>>,
        available_space: Size<AvailableSpace>,
        sizing_mode: SizingMode,
        axis: AbsoluteAxis,
    ) -> f32 {
        self.compute_child_layout(
            node,
            LayoutInput {
                run_mode: RunMode::ComputeSize,
                sizing_mode,
                axis: axis.into(),
                known_dimensions,
                parent_size,
                available_space,
                vertical_margins_are_collapsible: Line::FALSE,
            },
        )
        .size
        .get_abs(axis)
    }

    /// Fully lay out a child.
    #[inline]
    fn perform_child_layout(
        &mut self,
        node: NodeId,
        known_dimensions: Size<Option<f32>>,
        parent_size: Size<Option<f32>>,
        available_space: Size<AvailableSpace>,
        sizing_mode: SizingMode,
        vertical_margins_are_collapsible: Line<bool>,
    ) -> LayoutOutput {
        self.compute_child_layout(
            node,
            LayoutInput {
                run_mode: RunMode::PerformLayout,
                sizing_mode,
                axis: RequestedAxis::Both,
                known_dimensions,
                parent_size,
                available_space,
                vertical_margins_are_collapsible,
            },
        )
    }

    /// The used `direction` of `node`, following `inherit` up the ancestor chain.
    #[inline]
    fn resolve_direction(&self, node: NodeId) -> Direction {
        let mut current = Some(node);
        while let Some(id) = current {
            match self.style(id).direction {
                Direction::Inherit => current = self.parent_id(id),
                resolved @ (Direction::Ltr | Direction::Rtl) => return resolved,
            }
        }
        Direction::Ltr
    }
}
