//! §9.3 Main size determination: line collection and the container's main size.

use core::mem;

use css_orchestrator::style_model::AlignSelf;
use css_orchestrator::{AvailableSpace, LayoutPartialTree, MaybeMath as _, Size, SizingMode};
use log::debug;

use crate::chapter4::AlgoConstants;
use crate::chapter6::FlexItem;

/// One flex line: a run of consecutive items plus the line's cross size and offset.
#[derive(Debug)]
pub struct FlexLine<'items> {
    /// Items placed on this line
    pub items: &'items mut [FlexItem],
    /// Used cross size of the line
    pub cross_size: f32,
    /// Cross-axis offset from the previous line
    pub offset_cross: f32,
}

impl<'items> FlexLine<'items> {
    fn new(items: &'items mut [FlexItem]) -> Self {
        Self {
            items,
            cross_size: 0.0,
            offset_cross: 0.0,
        }
    }
}

/// Total gap space between `count` items.
#[inline]
pub fn sum_axis_gaps(gap: f32, count: usize) -> f32 {
    if count <= 1 {
        0.0
    } else {
        gap * (count - 1) as f32
    }
}

/// 9.3.5 Collect flex items into flex lines.
///
/// Single-line containers and max-content sizing put every item on one line; min-content sizing
/// of a multi-line container breaks after every item. Otherwise an item starts a new line when
/// adding it (and the gap before it) would overflow the available main space. A line always
/// takes at least one item.
pub fn collect_flex_lines<'items>(
    constants: &AlgoConstants,
    available_space: Size<AvailableSpace>,
    flex_items: &'items mut [FlexItem],
) -> Vec<FlexLine<'items>> {
    if !constants.is_wrap {
        return vec![FlexLine::new(flex_items)];
    }

    let dir = constants.dir;
    match available_space.main(dir) {
        AvailableSpace::MaxContent => vec![FlexLine::new(flex_items)],
        AvailableSpace::MinContent => flex_items.chunks_exact_mut(1).map(FlexLine::new).collect(),
        AvailableSpace::Definite(main_axis_available_space) => {
            let main_axis_gap = constants.gap.main(dir);
            let mut lines = Vec::with_capacity(1);
            let mut remaining = flex_items;
            while !remaining.is_empty() {
                let mut line_length = 0.0;
                let split_index = remaining
                    .iter()
                    .enumerate()
                    .find(|&(index, child)| {
                        let gap_contribution = if index == 0 { 0.0 } else { main_axis_gap };
                        line_length += child.hypothetical_outer_size.main(dir) + gap_contribution;
                        line_length > main_axis_available_space && index != 0
                    })
                    .map_or(remaining.len(), |(index, _)| index);

                let (items, rest) = mem::take(&mut remaining).split_at_mut(split_index);
                lines.push(FlexLine::new(items));
                remaining = rest;
            }
            debug!(
                target: "css::flexbox",
                "[FLEX-LINES] available_main={main_axis_available_space} lines={}",
                lines.len()
            );
            lines
        }
    }
}

/// The longest line measured by flex base sizes (floored by min sizes), margins and gaps.
fn longest_line_length(lines: &[FlexLine<'_>], constants: &AlgoConstants) -> f32 {
    let dir = constants.dir;
    lines
        .iter()
        .map(|line| {
            let line_gap = sum_axis_gaps(constants.gap.main(dir), line.items.len());
            let items_length: f32 = line
                .items
                .iter()
                .map(|child| {
                    let padding_border_sum = (child.padding + child.border).main_axis_sum(dir);
                    (child.flex_basis.maybe_max(child.min_size.main(dir))
                        + child.margin.main_axis_sum(dir))
                    .max(padding_border_sum)
                })
                .sum();
            items_length + line_gap
        })
        .fold(0.0, f32::max)
}

/// An item's min- or max-content contribution in the main axis, margins included.
fn main_content_contribution(
    tree: &mut impl LayoutPartialTree,
    item: &FlexItem,
    available_space: Size<AvailableSpace>,
    constants: &AlgoConstants,
) -> f32 {
    let dir = constants.dir;
    let margin_sum = item.margin.main_axis_sum(dir);
    let style_min = item.min_size.main(dir);
    let style_preferred = item.size.main(dir);
    let style_max = item.max_size.main(dir);

    // Inflexible items are clamped to their basis in the direction they cannot flex.
    let clamping_basis = Some(item.flex_basis).maybe_max(style_preferred);
    let flex_basis_min = clamping_basis.filter(|_| item.flex_shrink == 0.0);
    let flex_basis_max = clamping_basis.filter(|_| item.flex_grow == 0.0);
    let min_main_size = style_min
        .maybe_max(flex_basis_min)
        .or(flex_basis_min)
        .unwrap_or(item.resolved_minimum_main_size)
        .max(item.resolved_minimum_main_size);
    let max_main_size = style_max
        .maybe_min(flex_basis_max)
        .or(flex_basis_max)
        .unwrap_or(f32::INFINITY);

    // Clamps that pin the size make measuring unnecessary.
    match style_preferred {
        Some(preferred) if max_main_size <= min_main_size || max_main_size <= preferred => {
            return preferred.min(max_main_size).max(min_main_size) + margin_sum;
        }
        _ if max_main_size <= min_main_size => return min_main_size + margin_sum,
        _ => {}
    }
    if item.overflow.x.is_scroll_container() || item.overflow.y.is_scroll_container() {
        return item.flex_basis + margin_sum;
    }

    let cross_axis_parent_size = constants.node_inner_size.cross(dir);
    let cross_margin_sum = constants.margin.cross_axis_sum(dir);
    let cross_available_space = available_space
        .cross(dir)
        .map_definite_value(|value| cross_axis_parent_size.unwrap_or(value))
        .maybe_clamp(
            item.min_size.cross(dir).maybe_add(cross_margin_sum),
            item.max_size.cross(dir).maybe_add(cross_margin_sum),
        );
    let mut known_dimensions = item.size.with_main(dir, None);
    if item.align_self == AlignSelf::Stretch && known_dimensions.cross(dir).is_none() {
        known_dimensions.set_cross(
            dir,
            cross_available_space
                .into_option()
                .maybe_sub(item.margin.cross_axis_sum(dir)),
        );
    }

    let content_main_size = tree.measure_child_size(
        item.node,
        known_dimensions,
        constants.node_inner_size,
        available_space.with_cross(dir, cross_available_space),
        SizingMode::InherentSize,
        dir.main_axis(),
    ) + margin_sum;

    let padding_border_sum = (item.padding + item.border).main_axis_sum(dir);
    // Column items never shrink below their basis: the block-axis automatic size is max-content.
    if constants.is_row {
        content_main_size
            .maybe_clamp(style_min, style_max)
            .max(padding_border_sum)
    } else {
        content_main_size
            .max(item.flex_basis)
            .maybe_clamp(style_min, style_max)
            .max(padding_border_sum)
    }
}

/// How far an item wants to flex away from its basis to reach `contribution`, per unit of flex
/// factor.
fn content_flex_fraction(item: &FlexItem, contribution: f32) -> f32 {
    let diff = contribution - item.flex_basis;
    if diff > 0.0 {
        diff / item.flex_grow.max(1.0)
    } else if diff < 0.0 {
        diff / (item.flex_shrink * item.inner_flex_basis).max(1.0)
    } else {
        0.0
    }
}

/// The container's intrinsic main size: the largest line once every item has flexed by its
/// own content flex fraction.
fn intrinsic_main_size(
    tree: &mut impl LayoutPartialTree,
    available_space: Size<AvailableSpace>,
    lines: &mut [FlexLine<'_>],
    constants: &AlgoConstants,
) -> f32 {
    let dir = constants.dir;
    let mut main_size: f32 = 0.0;
    for line in lines.iter_mut() {
        for item in line.items.iter_mut() {
            let contribution = main_content_contribution(tree, item, available_space, constants);
            item.content_flex_fraction = content_flex_fraction(item, contribution);
        }

        let items_size: f32 = line
            .items
            .iter()
            .map(|item| {
                let flex_fraction = item.content_flex_fraction;
                let flex_contribution = if flex_fraction > 0.0 {
                    item.flex_grow.max(1.0) * flex_fraction
                } else if flex_fraction < 0.0 {
                    item.flex_shrink.max(1.0) * item.inner_flex_basis * flex_fraction
                } else {
                    0.0
                };
                item.flex_basis + flex_contribution
            })
            .sum();
        let line_gap = sum_axis_gaps(constants.gap.main(dir), line.items.len());
        main_size = main_size.max(items_size + line_gap);
    }
    main_size
}

/// 9.3.4 Determine the main size of the flex container when its style leaves it open.
pub fn determine_container_main_size(
    tree: &mut impl LayoutPartialTree,
    available_space: Size<AvailableSpace>,
    lines: &mut [FlexLine<'_>],
    constants: &mut AlgoConstants,
) {
    let dir = constants.dir;
    let main_content_box_inset = constants.content_box_inset.main_axis_sum(dir);

    let outer_main_size = constants.node_outer_size.main(dir).unwrap_or_else(|| {
        match available_space.main(dir) {
            AvailableSpace::Definite(main_axis_available_space) => {
                let size = longest_line_length(lines, constants) + main_content_box_inset;
                if lines.len() > 1 {
                    size.max(main_axis_available_space)
                } else {
                    size
                }
            }
            AvailableSpace::MinContent if constants.is_wrap => {
                longest_line_length(lines, constants) + main_content_box_inset
            }
            AvailableSpace::MinContent | AvailableSpace::MaxContent => {
                intrinsic_main_size(tree, available_space, lines, constants)
                    + main_content_box_inset
            }
        }
    });

    let outer_main_size = outer_main_size
        .maybe_clamp(constants.min_size.main(dir), constants.max_size.main(dir))
        .max(main_content_box_inset - constants.scrollbar_gutter.main(dir));
    let inner_main_size = (outer_main_size - main_content_box_inset).max(0.0);

    debug!(
        target: "css::flexbox",
        "[FLEX-MAIN] outer={outer_main_size} inner={inner_main_size}"
    );

    constants.container_size.set_main(dir, outer_main_size);
    constants.inner_container_size.set_main(dir, inner_main_size);
}
