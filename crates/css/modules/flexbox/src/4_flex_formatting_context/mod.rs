//! Flex Formatting Context (FFC)
//! Spec: <https://www.w3.org/TR/css-flexbox-1/#flex-containers>
//!
//! Entry point of the flex layout algorithm. The container's own box is resolved once into
//! [`AlgoConstants`], then the §9 steps run in order against the generated items.

use css_box::compute_box_sides;
use css_orchestrator::style_model::{
    AlignContent, AlignItems, Display, FlexDirection, FlexWrap, JustifyContent, LengthPercentage,
    Style,
};
use css_orchestrator::{
    AvailableSpace, LayoutInput, LayoutOutput, LayoutPartialTree, MaybeMath as _, MaybeResolve as _, NodeId,
    Point, Rect, ResolveOrZero as _, RunMode, Size,
};
use css_sizing::{resolve_style_sizes, resolve_style_sizes_for_mode};
use log::debug;

use crate::chapter6::{determine_available_space, determine_flex_base_size, generate_anonymous_flex_items};
use crate::chapter9::{
    align_flex_lines_per_align_content, calculate_children_base_lines, calculate_cross_size,
    collect_flex_lines, determine_container_cross_size, determine_container_main_size,
    determine_hypothetical_cross_size, determine_used_cross_size, distribute_remaining_free_space,
    final_layout_pass, first_baseline, handle_align_content_stretch,
    perform_absolute_layout_on_absolute_children, perform_hidden_layout_on_children,
    resolve_cross_axis_auto_margins, resolve_flexible_lengths, FlexLine,
};

/// Returns true when `display` establishes a Flex Formatting Context (FFC).
///
/// Spec: <https://www.w3.org/TR/css-flexbox-1/#flex-containers>
#[inline]
pub const fn establishes_flex_formatting_context(display: Display) -> bool {
    matches!(display, Display::Flex)
}

/// Values derived from the container's style and size that stay fixed for one layout call,
/// except for the container sizes which are filled in as the algorithm determines them.
#[derive(Debug, Clone, Copy)]
pub struct AlgoConstants {
    /// Direction of the main axis
    pub dir: FlexDirection,
    /// Whether the main axis is horizontal
    pub is_row: bool,
    /// Whether items may wrap onto several lines
    pub is_wrap: bool,
    /// Whether lines stack from cross-end
    pub is_wrap_reverse: bool,
    /// Container minimum border-box size
    pub min_size: Size<Option<f32>>,
    /// Container maximum border-box size
    pub max_size: Size<Option<f32>>,
    /// Container margin
    pub margin: Rect<f32>,
    /// Container border
    pub border: Rect<f32>,
    /// Padding, border and scrollbar gutter
    pub content_box_inset: Rect<f32>,
    /// Space reserved for scrollbars
    pub scrollbar_gutter: Size<f32>,
    /// Resolved gaps (`width` is the column gap)
    pub gap: Size<f32>,
    /// Default cross-axis alignment of items
    pub align_items: AlignItems,
    /// Distribution of lines in the cross axis
    pub align_content: AlignContent,
    /// Distribution of items in the main axis
    pub justify_content: Option<JustifyContent>,
    /// Border-box size as far as it is known
    pub node_outer_size: Size<Option<f32>>,
    /// Content-box size as far as it is known
    pub node_inner_size: Size<Option<f32>>,
    /// Final border-box size
    pub container_size: Size<f32>,
    /// Final content-box size
    pub inner_container_size: Size<f32>,
}

/// Resolve the container's own box.
fn compute_constants(
    style: &Style,
    known_dimensions: Size<Option<f32>>,
    parent_size: Size<Option<f32>>,
) -> AlgoConstants {
    let dir = style.flex_direction;
    let sides = compute_box_sides(style, parent_size.width);
    let sizes = resolve_style_sizes(style, parent_size, sides.padding_border_sum());
    let content_box_inset = sides.content_box_inset();
    let node_inner_size = known_dimensions.maybe_sub(content_box_inset.sum_axes());

    AlgoConstants {
        dir,
        is_row: dir.is_row(),
        is_wrap: style.flex_wrap != FlexWrap::NoWrap,
        is_wrap_reverse: style.flex_wrap == FlexWrap::WrapReverse,
        min_size: sizes.min_size,
        max_size: sizes.max_size,
        margin: sides.margin,
        border: sides.border,
        content_box_inset,
        scrollbar_gutter: sides.scrollbar_gutter,
        gap: style.gap.resolve_or_zero(node_inner_size),
        align_items: style.align_items.unwrap_or(AlignItems::Stretch),
        align_content: style.align_content.unwrap_or(AlignContent::Stretch),
        justify_content: style.justify_content,
        node_outer_size: known_dimensions,
        node_inner_size,
        container_size: Size::ZERO,
        inner_container_size: Size::ZERO,
    }
}

/// Lay out (or size) a flex container.
///
/// Spec: <https://www.w3.org/TR/css-flexbox-1/#layout-algorithm>
pub fn compute_flexbox_layout(
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
        let padding_border_sum = compute_box_sides(style, parent_size.width).padding_border_sum();
        let sizes =
            resolve_style_sizes_for_mode(style, parent_size, padding_border_sum, sizing_mode);
        // A max at or below the min pins the size in that axis.
        let min_max_definite_size =
            sizes
                .min_size
                .zip_map(sizes.max_size, |min, max| match (min, max) {
                    (Some(min), Some(max)) if max <= min => Some(min),
                    _ => None,
                });
        known_dimensions.or(min_max_definite_size
            .or(sizes.clamped_size())
            .maybe_max(padding_border_sum))
    };

    // Short-circuit layout if the container's size is fully determined by its size styles.
    if run_mode == RunMode::ComputeSize
        && let Size {
            width: Some(width),
            height: Some(height),
        } = styled_based_known_dimensions
    {
        return LayoutOutput::from_outer_size(Size { width, height });
    }

    debug!(
        target: "css::flexbox",
        "[FLEX node={node:?}] run_mode={run_mode:?} known={styled_based_known_dimensions:?}"
    );

    compute_preliminary(
        tree,
        node,
        LayoutInput {
            known_dimensions: styled_based_known_dimensions,
            ..inputs
        },
    )
}

/// Run the §9 steps once the container's known dimensions are settled.
fn compute_preliminary(
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

    let (mut constants, main_gap) = {
        let style = tree.style(node);
        (
            compute_constants(style, known_dimensions, parent_size),
            style.gap,
        )
    };

    // 9.1. Initial Setup
    // 1. Generate anonymous flex items
    let mut flex_items = generate_anonymous_flex_items(tree, node, &constants);

    // 9.2. Line Length Determination
    // 2. Determine the available main and cross space for the flex items
    let available_space = determine_available_space(known_dimensions, available_space, &constants);

    // 3. Determine the flex base size and hypothetical main size of each item.
    determine_flex_base_size(tree, &constants, available_space, &mut flex_items);

    // 9.3. Main Size Determination
    // 5. Collect flex items into flex lines.
    let mut flex_lines = collect_flex_lines(&constants, available_space, &mut flex_items);

    // 4. Determine the main size of the flex container.
    resolve_container_main_size(tree, available_space, &mut flex_lines, &mut constants, main_gap);

    // 6. Resolve the flexible lengths of all the flex items to find their used main size.
    for line in &mut flex_lines {
        resolve_flexible_lengths(line, &constants);
    }

    // 9.4. Cross Size Determination
    // 7. Determine the hypothetical cross size of each item.
    for line in &mut flex_lines {
        determine_hypothetical_cross_size(tree, line, &constants, available_space);
    }
    calculate_children_base_lines(tree, known_dimensions, available_space, &mut flex_lines, &constants);

    // 8. Calculate the cross size of each flex line.
    calculate_cross_size(&mut flex_lines, known_dimensions, &constants);

    // 9. Handle 'align-content: stretch'.
    handle_align_content_stretch(&mut flex_lines, known_dimensions, &constants);

    // 11. Determine the used cross size of each flex item.
    determine_used_cross_size(&mut flex_lines, &constants);

    // 9.5. Main-Axis Alignment
    // 12. Distribute any remaining free space.
    distribute_remaining_free_space(&mut flex_lines, &constants);

    // 9.6. Cross-Axis Alignment
    // 13. Resolve cross-axis auto margins (also includes 14).
    resolve_cross_axis_auto_margins(&mut flex_lines, &constants);

    // 15. Determine the flex container's used cross size.
    let total_line_cross_size =
        determine_container_cross_size(&flex_lines, known_dimensions, &mut constants);

    if run_mode == RunMode::ComputeSize {
        return LayoutOutput::from_outer_size(constants.container_size);
    }

    // 16. Align all flex lines per align-content.
    align_flex_lines_per_align_content(&mut flex_lines, &constants, total_line_cross_size);

    let inflow_content_size = final_layout_pass(tree, &mut flex_lines, &constants);
    let absolute_content_size = perform_absolute_layout_on_absolute_children(tree, node, &constants);
    perform_hidden_layout_on_children(tree, node);

    let first_vertical_baseline = first_baseline(&flex_lines, &constants);
    debug!(
        target: "css::flexbox",
        "[FLEX node={node:?}] lines={} size={}x{} baseline={first_vertical_baseline:?}",
        flex_lines.len(),
        constants.container_size.width,
        constants.container_size.height
    );

    LayoutOutput::from_sizes_and_baselines(
        constants.container_size,
        inflow_content_size.f32_max(absolute_content_size),
        Point {
            x: None,
            y: first_vertical_baseline,
        },
    )
}

/// Step 4: fix the container's main size, measuring the lines when the style leaves it open.
fn resolve_container_main_size(
    tree: &mut impl LayoutPartialTree,
    available_space: Size<AvailableSpace>,
    flex_lines: &mut [FlexLine<'_>],
    constants: &mut AlgoConstants,
    main_gap: Size<LengthPercentage>,
) {
    let dir = constants.dir;
    if let Some(inner_main_size) = constants.node_inner_size.main(dir) {
        let outer_main_size = inner_main_size + constants.content_box_inset.main_axis_sum(dir);
        constants.inner_container_size.set_main(dir, inner_main_size);
        constants.container_size.set_main(dir, outer_main_size);
        return;
    }

    determine_container_main_size(tree, available_space, flex_lines, constants);
    constants
        .node_inner_size
        .set_main(dir, Some(constants.inner_container_size.main(dir)));
    constants
        .node_outer_size
        .set_main(dir, Some(constants.container_size.main(dir)));

    // Percentage gaps resolve against the now-known main size.
    let new_gap = main_gap
        .main(dir)
        .maybe_resolve(Some(constants.inner_container_size.main(dir)))
        .unwrap_or(0.0);
    constants.gap.set_main(dir, new_gap);
}
