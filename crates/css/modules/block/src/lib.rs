//! CSS 2.2 §9.4.1: Block formatting contexts.
//! Spec: <https://www.w3.org/TR/CSS21/visuren.html#block-formatting>
//!
//! In-flow children are stacked vertically with adjoining margins collapsed. Children whose
//! margins collapse through them add no vertical space. Absolutely positioned children are placed
//! against the padding box afterwards, and children that generate no box get a zero layout.

mod absolute;
mod flow;
mod items;

use css_box::{compute_box_sides, resolve_border, resolve_padding};
use css_orchestrator::style_model::{BoxGenerationMode, Display, Position};
use css_orchestrator::{
    CollapsibleMarginSet, Layout, LayoutInput, LayoutOutput, LayoutPartialTree, Line,
    MaybeMath as _, NodeId, Point, Rect, ResolveOrZero as _, RunMode, Size, SizingMode,
};
use css_sizing::resolve_style_sizes_for_mode;
use log::debug;

use absolute::{AbsoluteArea, perform_absolute_layout_on_absolute_children};
use flow::{FlowContext, FlowOutput, perform_final_layout_on_in_flow_children};
use items::{determine_content_based_container_width, generate_item_list};

/// Lay out (or size) a block container.
///
/// The container's known dimensions are first completed from its own size styles. A size-only
/// request whose dimensions are then both known returns immediately without touching children.
pub fn compute_block_layout(
    tree: &mut impl LayoutPartialTree,
    node: NodeId,
    inputs: LayoutInput,
) -> LayoutOutput {
    let LayoutInput {
        known_dimensions,
        parent_size,
        run_mode,
        sizing_mode,
        ..
    } = inputs;

    let styled_based_known_dimensions = {
        let style = tree.style(node);
        let sides = compute_box_sides(style, parent_size.width);
        let padding_border_size = sides.padding_border_sum();
        let sizes =
            resolve_style_sizes_for_mode(style, parent_size, padding_border_size, sizing_mode);

        // A max at or below the min pins the size in that axis.
        let min_max_definite_size =
            sizes
                .min_size
                .zip_map(sizes.max_size, |min, max| match (min, max) {
                    (Some(min), Some(max)) if max <= min => Some(min),
                    _ => None,
                });

        known_dimensions
            .or(min_max_definite_size)
            .or(sizes.clamped_size())
            .maybe_max(padding_border_size)
    };

    if run_mode == RunMode::ComputeSize
        && let Size {
            width: Some(width),
            height: Some(height),
        } = styled_based_known_dimensions
    {
        debug!("[BLOCK node={node:?}] size fully determined by styles: {width}x{height}");
        return LayoutOutput::from_outer_size(Size { width, height });
    }

    compute_inner(
        tree,
        node,
        LayoutInput {
            known_dimensions: styled_based_known_dimensions,
            ..inputs
        },
    )
}

/// Container facts read from its style before children are laid out.
struct ContainerStyle {
    /// Resolved padding
    padding: Rect<f32>,
    /// Resolved border
    border: Rect<f32>,
    /// Scrollbar gutter
    scrollbar_gutter: Size<f32>,
    /// Minimum border-box size
    min_size: Size<Option<f32>>,
    /// Maximum border-box size
    max_size: Size<Option<f32>>,
    /// Preferred border-box size
    size: Size<Option<f32>>,
    /// Whether the container's margins may collapse with its first/last child
    own_margins_collapse_with_children: Line<bool>,
    /// Whether anything about the container stops margins collapsing through it
    has_styles_preventing_being_collapsed_through: bool,
}

fn resolve_container_style(
    tree: &impl LayoutPartialTree,
    node: NodeId,
    inputs: &LayoutInput,
) -> ContainerStyle {
    let style = tree.style(node);
    let sides = compute_box_sides(style, inputs.parent_size.width);
    let sizes = resolve_style_sizes_for_mode(
        style,
        inputs.parent_size,
        sides.padding_border_sum(),
        inputs.sizing_mode,
    );
    let padding = sides.padding;
    let border = sides.border;

    let is_scroll_container = style.is_scroll_container();
    let is_relative = style.position == Position::Relative;
    let collapsible = inputs.vertical_margins_are_collapsible;
    let own_margins_collapse_with_children = Line {
        start: collapsible.start
            && !is_scroll_container
            && is_relative
            && padding.top == 0.0
            && border.top == 0.0,
        end: collapsible.end
            && !is_scroll_container
            && is_relative
            && padding.bottom == 0.0
            && border.bottom == 0.0
            && sizes.size.height.is_none(),
    };

    let has_styles_preventing_being_collapsed_through = style.display != Display::Block
        || is_scroll_container
        || style.position == Position::Absolute
        || padding.top > 0.0
        || padding.bottom > 0.0
        || border.top > 0.0
        || border.bottom > 0.0
        || sizes.size.height.is_some_and(|height| height > 0.0)
        || sizes.min_size.height.is_some_and(|height| height > 0.0)
        || style.aspect_ratio.is_some();

    ContainerStyle {
        padding,
        border,
        scrollbar_gutter: sides.scrollbar_gutter,
        min_size: sizes.min_size,
        max_size: sizes.max_size,
        size: sizes.size,
        own_margins_collapse_with_children,
        has_styles_preventing_being_collapsed_through,
    }
}

/// Lay out children that generate no box so their subtrees get zero layouts.
fn perform_hidden_layout_on_children(tree: &mut impl LayoutPartialTree, node: NodeId) {
    let children = tree.child_ids(node).to_vec();
    for (order, child) in children.into_iter().enumerate() {
        if tree.style(child).box_generation_mode() == BoxGenerationMode::None {
            tree.perform_child_layout(
                child,
                Size::NONE,
                Size::NONE,
                Size::MAX_CONTENT,
                SizingMode::InherentSize,
                Line::FALSE,
            );
            tree.set_unrounded_layout(
                child,
                &Layout::with_order(u32::try_from(order).unwrap_or(u32::MAX)),
            );
        }
    }
}

/// The margins a container passes to its parent for collapsing: its children's escaping margins
/// where its edges are transparent, otherwise its own margin.
fn outgoing_margin_sets(
    tree: &impl LayoutPartialTree,
    node: NodeId,
    parent_width: Option<f32>,
    collapses: Line<bool>,
    flow: &FlowOutput,
) -> Line<CollapsibleMarginSet> {
    let margin = tree.style(node).margin;
    Line {
        start: if collapses.start {
            flow.first_child_top_margin_set
        } else {
            CollapsibleMarginSet::from_margin(margin.top.resolve_or_zero(parent_width))
        },
        end: if collapses.end {
            flow.last_child_bottom_margin_set
        } else {
            CollapsibleMarginSet::from_margin(margin.bottom.resolve_or_zero(parent_width))
        },
    }
}

fn compute_inner(
    tree: &mut impl LayoutPartialTree,
    node: NodeId,
    inputs: LayoutInput,
) -> LayoutOutput {
    let LayoutInput {
        known_dimensions,
        parent_size,
        available_space,
        run_mode,
        ..
    } = inputs;

    let container = resolve_container_style(tree, node, &inputs);
    let text_align = tree.style(node).text_align;
    let is_rtl = tree.resolve_direction(node).is_rtl();

    let padding_border_size = (container.padding + container.border).sum_axes();
    let gutter = Rect {
        left: 0.0,
        right: container.scrollbar_gutter.width,
        top: 0.0,
        bottom: container.scrollbar_gutter.height,
    };
    let content_box_inset = container.padding + container.border + gutter;

    debug!(
        "[BLOCK node={node:?}] run_mode={run_mode:?} known={known_dimensions:?} available={available_space:?}"
    );

    // 1. Generate items
    let mut items = generate_item_list(
        tree,
        node,
        known_dimensions.maybe_sub(content_box_inset.sum_axes()),
    );

    // 2. Compute the container width
    let container_outer_width = known_dimensions.width.unwrap_or_else(|| {
        let horizontal_inset = content_box_inset.horizontal_axis_sum();
        let intrinsic_width = determine_content_based_container_width(
            tree,
            &items,
            available_space.width.maybe_sub(horizontal_inset),
        ) + horizontal_inset;
        intrinsic_width
            .maybe_clamp(container.min_size.width, container.max_size.width)
            .max(padding_border_size.width)
    });

    if let (RunMode::ComputeSize, Some(container_outer_height)) =
        (run_mode, known_dimensions.height)
    {
        return LayoutOutput::from_outer_size(Size {
            width: container_outer_width,
            height: container_outer_height,
        });
    }

    // 3. Final layout of in-flow children
    let (resolved_padding, resolved_border) = {
        let style = tree.style(node);
        (
            resolve_padding(style, Some(container_outer_width)),
            resolve_border(style, Some(container_outer_width)),
        )
    };
    let resolved_content_box_inset = resolved_padding + resolved_border + gutter;
    let flow = perform_final_layout_on_in_flow_children(
        tree,
        &mut items,
        FlowContext {
            container_outer_width,
            content_box_inset,
            resolved_content_box_inset,
            text_align,
            is_rtl,
            own_margins_collapse_with_children: container.own_margins_collapse_with_children,
        },
    );

    let final_outer_size = Size {
        width: container_outer_width,
        height: known_dimensions
            .height
            .unwrap_or_else(|| {
                flow.intrinsic_outer_height
                    .maybe_clamp(container.min_size.height, container.max_size.height)
            })
            .max(padding_border_size.height),
    };

    if run_mode == RunMode::ComputeSize {
        return LayoutOutput::from_outer_size(final_outer_size);
    }

    // 4. Absolutely positioned children, against the padding box
    let absolute_position_inset = resolved_border + gutter;
    let absolute_content_size = perform_absolute_layout_on_absolute_children(
        tree,
        &items,
        AbsoluteArea {
            size: final_outer_size - absolute_position_inset.sum_axes(),
            offset: Point {
                x: absolute_position_inset.left,
                y: absolute_position_inset.top,
            },
            static_right_edge: is_rtl
                .then_some(container_outer_width - resolved_content_box_inset.right),
        },
    );

    // 5. Children that generate no box
    perform_hidden_layout_on_children(tree, node);

    // 6. Whether margins collapse through this container
    let can_be_collapsed_through = !container.has_styles_preventing_being_collapsed_through
        && items
            .iter()
            .all(|item| item.is_absolute() || item.can_be_collapsed_through);
    let margin_sets = outgoing_margin_sets(
        tree,
        node,
        parent_size.width,
        container.own_margins_collapse_with_children,
        &flow,
    );

    debug!(
        "[BLOCK node={node:?}] final size={}x{} collapse_through={can_be_collapsed_through}",
        final_outer_size.width, final_outer_size.height
    );

    LayoutOutput {
        size: final_outer_size,
        content_size: flow.content_size.f32_max(absolute_content_size),
        first_baselines: Point::NONE,
        top_margin: margin_sets.start,
        bottom_margin: margin_sets.end,
        margins_can_collapse_through: can_be_collapsed_through,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_orchestrator::style_model::{Dimension, LengthPercentageAuto, Style};
    use css_orchestrator::{
        AvailableSpace, Cache, RequestedAxis, TraversePartialTree, TraverseTree,
    };

    /// A tree in which every node is a block container.
    struct BlockTree {
        styles: Vec<Style>,
        children: Vec<Vec<NodeId>>,
        parents: Vec<Option<NodeId>>,
        layouts: Vec<Layout>,
        caches: Vec<Cache>,
        child_layout_calls: usize,
    }

    impl BlockTree {
        fn new() -> Self {
            Self {
                styles: Vec::new(),
                children: Vec::new(),
                parents: Vec::new(),
                layouts: Vec::new(),
                caches: Vec::new(),
                child_layout_calls: 0,
            }
        }

        fn add(&mut self, style: Style, children: &[NodeId]) -> NodeId {
            let id = NodeId::new(self.styles.len());
            self.styles.push(style);
            self.children.push(children.to_vec());
            self.parents.push(None);
            self.layouts.push(Layout::new());
            self.caches.push(Cache::new());
            for child in children {
                self.parents[child.index()] = Some(id);
            }
            id
        }
    }

    impl TraversePartialTree for BlockTree {
        fn child_ids(&self, parent: NodeId) -> &[NodeId] {
            &self.children[parent.index()]
        }
    }

    impl TraverseTree for BlockTree {
        fn parent_id(&self, child: NodeId) -> Option<NodeId> {
            self.parents[child.index()]
        }
    }

    impl LayoutPartialTree for BlockTree {
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
            self.child_layout_calls += 1;
            if inputs.run_mode == RunMode::PerformHiddenLayout
                || self.styles[node.index()].display == Display::None
            {
                return LayoutOutput::HIDDEN;
            }
            compute_block_layout(self, node, inputs)
        }
    }

    fn sized(height: f32, margin_top: f32, margin_bottom: f32) -> Style {
        Style {
            size: Size {
                width: Dimension::Auto,
                height: Dimension::Length(height),
            },
            margin: Rect {
                left: LengthPercentageAuto::ZERO,
                right: LengthPercentageAuto::ZERO,
                top: LengthPercentageAuto::Length(margin_top),
                bottom: LengthPercentageAuto::Length(margin_bottom),
            },
            ..Style::default()
        }
    }

    fn root_input(width: f32) -> LayoutInput {
        LayoutInput {
            run_mode: RunMode::PerformLayout,
            sizing_mode: SizingMode::InherentSize,
            axis: RequestedAxis::Both,
            known_dimensions: Size::new(Some(width), None),
            parent_size: Size::new(Some(width), None),
            available_space: Size {
                width: AvailableSpace::Definite(width),
                height: AvailableSpace::MaxContent,
            },
            vertical_margins_are_collapsible: Line::FALSE,
        }
    }

    #[test]
    /// # Panics
    /// Panics if adjacent sibling margins add up instead of collapsing.
    fn sibling_margins_collapse_to_the_larger() {
        let mut tree = BlockTree::new();
        let first = tree.add(sized(50.0, 0.0, 10.0), &[]);
        let second = tree.add(sized(50.0, 20.0, 0.0), &[]);
        let root = tree.add(Style::default(), &[first, second]);
        let output = compute_block_layout(&mut tree, root, root_input(200.0));

        let gap = tree.unrounded_layout(second).location.y
            - (tree.unrounded_layout(first).location.y + 50.0);
        assert!((gap - 20.0).abs() < f32::EPSILON);
        assert!((output.size.height - 120.0).abs() < f32::EPSILON);
        assert!((tree.unrounded_layout(first).size.width - 200.0).abs() < f32::EPSILON);
    }

    #[test]
    /// # Panics
    /// Panics if an empty child does not let margins collapse through it.
    fn empty_child_collapses_through() {
        let mut tree = BlockTree::new();
        let first = tree.add(sized(10.0, 0.0, 15.0), &[]);
        let empty = tree.add(
            Style {
                margin: Rect {
                    left: LengthPercentageAuto::ZERO,
                    right: LengthPercentageAuto::ZERO,
                    top: LengthPercentageAuto::Length(25.0),
                    bottom: LengthPercentageAuto::Length(5.0),
                },
                ..Style::default()
            },
            &[],
        );
        let last = tree.add(sized(10.0, 10.0, 0.0), &[]);
        let root = tree.add(Style::default(), &[first, empty, last]);
        compute_block_layout(&mut tree, root, root_input(100.0));

        let last_y = tree.unrounded_layout(last).location.y;
        assert!((last_y - 35.0).abs() < f32::EPSILON);
    }

    #[test]
    /// # Panics
    /// Panics if a fully sized size-only request recurses into children.
    fn known_size_short_circuits() {
        let mut tree = BlockTree::new();
        let child = tree.add(sized(500.0, 0.0, 0.0), &[]);
        let root = tree.add(Style::default(), &[child]);
        let output = compute_block_layout(
            &mut tree,
            root,
            LayoutInput {
                run_mode: RunMode::ComputeSize,
                known_dimensions: Size::new(Some(40.0), Some(30.0)),
                ..root_input(40.0)
            },
        );
        assert_eq!(tree.child_layout_calls, 0);
        assert!((output.size.height - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    /// # Panics
    /// Panics if auto margins do not center a narrow child.
    fn auto_margins_center_child() {
        let mut tree = BlockTree::new();
        let child = tree.add(
            Style {
                size: Size {
                    width: Dimension::Length(60.0),
                    height: Dimension::Length(10.0),
                },
                margin: Rect {
                    left: LengthPercentageAuto::Auto,
                    right: LengthPercentageAuto::Auto,
                    top: LengthPercentageAuto::ZERO,
                    bottom: LengthPercentageAuto::ZERO,
                },
                ..Style::default()
            },
            &[],
        );
        let root = tree.add(Style::default(), &[child]);
        compute_block_layout(&mut tree, root, root_input(100.0));
        let layout = tree.unrounded_layout(child);
        assert!((layout.location.x - 20.0).abs() < f32::EPSILON);
        assert!((layout.margin.right - 20.0).abs() < f32::EPSILON);
    }
}
