//! Entry points shared by every layout algorithm: the cache wrapper, hidden layout and root
//! layout.

use css_box::compute_box_sides;
use css_orchestrator::style_model::Display;
use css_orchestrator::{
    AvailableSpace, Layout, LayoutInput, LayoutOutput, LayoutPartialTree, Line, MaybeMath as _,
    NodeId, Point, Size, SizingMode,
};
use css_sizing::resolve_style_sizes;
use log::{debug, trace};

/// Answer `inputs` from the node's cache, or run `compute` and remember its result.
///
/// Hidden layout always runs and is never stored.
pub fn compute_cached_layout<Tree, ComputeFn>(
    tree: &mut Tree,
    node: NodeId,
    inputs: LayoutInput,
    compute: ComputeFn,
) -> LayoutOutput
where
    Tree: LayoutPartialTree + ?Sized,
    ComputeFn: FnOnce(&mut Tree, NodeId, LayoutInput) -> LayoutOutput,
{
    let LayoutInput {
        known_dimensions,
        available_space,
        run_mode,
        ..
    } = inputs;

    if let Some(cached) = tree
        .cache_mut(node)
        .get(known_dimensions, available_space, run_mode)
    {
        trace!(target: "layouter::cache", "[CACHE node={node:?}] hit run_mode={run_mode:?}");
        return cached;
    }
    trace!(
        target: "layouter::cache",
        "[CACHE node={node:?}] miss run_mode={run_mode:?} known={known_dimensions:?} available={available_space:?}"
    );

    let output = compute(tree, node, inputs);
    tree.cache_mut(node)
        .store(known_dimensions, available_space, run_mode, output);
    output
}

/// Give `node` and its whole subtree a zero layout and drop their cached results.
pub fn compute_hidden_layout(tree: &mut impl LayoutPartialTree, node: NodeId) -> LayoutOutput {
    tree.cache_mut(node).clear();
    tree.set_unrounded_layout(node, &Layout::with_order(0));
    let children = tree.child_ids(node).to_vec();
    for child in children {
        tree.compute_child_layout(child, LayoutInput::HIDDEN);
    }
    LayoutOutput::HIDDEN
}

/// Lay out `root` as the top of a tree inside `available_space` and write its own layout.
///
/// The root's size comes from its styles where they are definite. A block root with an auto
/// width fills the available width less its margins.
pub fn compute_root_layout(
    tree: &mut impl LayoutPartialTree,
    root: NodeId,
    available_space: Size<AvailableSpace>,
) {
    let parent_size = available_space.into_options();
    let (known_dimensions, sides) = {
        let style = tree.style(root);
        let sides = compute_box_sides(style, parent_size.width);
        let padding_border_sum = sides.padding_border_sum();
        let sizes = resolve_style_sizes(style, parent_size, padding_border_sum);
        let mut known_dimensions = sizes.clamped_size().maybe_max(padding_border_sum);
        if style.display == Display::Block && known_dimensions.width.is_none() {
            known_dimensions.width = parent_size
                .width
                .map(|width| width - sides.margin.horizontal_axis_sum())
                .maybe_clamp(sizes.min_size.width, sizes.max_size.width)
                .maybe_max(padding_border_sum.width);
        }
        (known_dimensions, sides)
    };

    let output = tree.perform_child_layout(
        root,
        known_dimensions,
        parent_size,
        available_space,
        SizingMode::InherentSize,
        Line::FALSE,
    );

    debug!(
        target: "layouter",
        "[ROOT node={root:?}] size={}x{} content={}x{}",
        output.size.width,
        output.size.height,
        output.content_size.width,
        output.content_size.height
    );

    tree.set_unrounded_layout(
        root,
        &Layout {
            order: 0,
            location: Point {
                x: sides.margin.left,
                y: sides.margin.top,
            },
            size: output.size,
            content_size: output.content_size,
            scrollbar_size: sides.scrollbar_gutter,
            border: sides.border,
            padding: sides.padding,
            margin: sides.margin,
        },
    );
}

