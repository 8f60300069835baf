//! §9.4 Cross size determination.
//! Spec: <https://www.w3.org/TR/css-flexbox-1/#cross-sizing>

use css_orchestrator::style_model::{AlignContent, AlignSelf};
use css_orchestrator::{AvailableSpace, LayoutPartialTree, Line, MaybeMath as _, Size, SizingMode};
use log::trace;

use super::lines::{FlexLine, sum_axis_gaps};
use crate::chapter4::AlgoConstants;

/// 9.4.7 Determine the hypothetical cross size of each item by laying it out with its used
/// main size.
pub fn determine_hypothetical_cross_size(
    tree: &mut impl LayoutPartialTree,
    line: &mut FlexLine<'_>,
    constants: &AlgoConstants,
    available_space: Size<AvailableSpace>,
) {
    let dir = constants.dir;
    for child in line.items.iter_mut() {
        let padding_border_sum = (child.padding + child.border).cross_axis_sum(dir);
        let min_cross = child.min_size.cross(dir);
        let max_cross = child.max_size.cross(dir);
        let child_cross = child
            .size
            .cross(dir)
            .maybe_clamp(min_cross, max_cross)
            .maybe_max(padding_border_sum);
        let child_available_cross = available_space
            .cross(dir)
            .maybe_clamp(min_cross, max_cross)
            .maybe_max(padding_border_sum);

        let child_inner_cross = child_cross.unwrap_or_else(|| {
            tree.measure_child_size(
                child.node,
                Size::NONE.with_main(dir, Some(child.target_size.main(dir))),
                constants.node_inner_size,
                Size::MAX_CONTENT
                    .with_main(
                        dir,
                        AvailableSpace::Definite(constants.container_size.main(dir)),
                    )
                    .with_cross(dir, child_available_cross),
                SizingMode::ContentSize,
                dir.cross_axis(),
            )
            .maybe_clamp(min_cross, max_cross)
            .max(padding_border_sum)
        });

        child.hypothetical_inner_size.set_cross(dir, child_inner_cross);
        child
            .hypothetical_outer_size
            .set_cross(dir, child_inner_cross + child.margin.cross_axis_sum(dir));
    }
}

/// Compute the baseline of every baseline-aligned item on lines where baseline alignment can
/// move something. Baselines are only meaningful for rows.
pub fn calculate_children_base_lines(
    tree: &mut impl LayoutPartialTree,
    node_size: Size<Option<f32>>,
    available_space: Size<AvailableSpace>,
    flex_lines: &mut [FlexLine<'_>],
    constants: &AlgoConstants,
) {
    if !constants.is_row {
        return;
    }

    for line in flex_lines.iter_mut() {
        let baseline_child_count = line
            .items
            .iter()
            .filter(|child| child.align_self == AlignSelf::Baseline)
            .count();
        if baseline_child_count <= 1 {
            continue;
        }

        for child in line
            .items
            .iter_mut()
            .filter(|child| child.align_self == AlignSelf::Baseline)
        {
            let output = tree.perform_child_layout(
                child.node,
                Size {
                    width: Some(child.target_size.width),
                    height: Some(child.hypothetical_inner_size.height),
                },
                constants.node_inner_size,
                Size {
                    width: AvailableSpace::Definite(constants.container_size.width),
                    height: available_space.height.maybe_set(node_size.height),
                },
                SizingMode::ContentSize,
                Line::FALSE,
            );
            child.baseline = output.first_baselines.y.unwrap_or(output.size.height) + child.margin.top;
        }
    }
}

/// 9.4.8 Calculate the cross size of each flex line.
pub fn calculate_cross_size(
    flex_lines: &mut [FlexLine<'_>],
    node_size: Size<Option<f32>>,
    constants: &AlgoConstants,
) {
    let dir = constants.dir;
    let cross_axis_inset = constants.content_box_inset.cross_axis_sum(dir);
    let cross_min_size = constants.min_size.cross(dir);
    let cross_max_size = constants.max_size.cross(dir);

    // A single line in a definite container fills its inner cross size. `align-content` is
    // ignored for single-line containers, and the space-distributing values act like stretch
    // for a single line.
    let single_definite_line = flex_lines.len() == 1
        && node_size.cross(dir).is_some()
        && (!constants.is_wrap
            || matches!(
                constants.align_content,
                AlignContent::Stretch | AlignContent::SpaceEvenly | AlignContent::SpaceAround
            ));
    if single_definite_line {
        if let Some(line) = flex_lines.first_mut() {
            line.cross_size = node_size
                .cross(dir)
                .maybe_clamp(cross_min_size, cross_max_size)
                .maybe_sub(cross_axis_inset)
                .maybe_max(0.0)
                .unwrap_or(0.0);
        }
        return;
    }

    for line in flex_lines.iter_mut() {
        let max_baseline = line
            .items
            .iter()
            .map(|child| child.baseline)
            .fold(0.0, f32::max);
        line.cross_size = line
            .items
            .iter()
            .map(|child| {
                let cross_size = child.hypothetical_outer_size.cross(dir);
                if child.align_self == AlignSelf::Baseline
                    && !child.margin_is_auto.cross_start(dir)
                    && !child.margin_is_auto.cross_end(dir)
                {
                    max_baseline - child.baseline + cross_size
                } else {
                    cross_size
                }
            })
            .fold(0.0, f32::max);
    }

    // A single-line container clamps its line by its own min and max cross sizes.
    if !constants.is_wrap
        && let Some(line) = flex_lines.first_mut()
    {
        line.cross_size = line.cross_size.maybe_clamp(
            cross_min_size.maybe_sub(cross_axis_inset),
            cross_max_size.maybe_sub(cross_axis_inset),
        );
    }
}

/// 9.4.9 Handle `align-content: stretch`: grow every line equally to fill the container's
/// (minimum) inner cross size.
pub fn handle_align_content_stretch(
    flex_lines: &mut [FlexLine<'_>],
    node_size: Size<Option<f32>>,
    constants: &AlgoConstants,
) {
    if constants.align_content != AlignContent::Stretch || flex_lines.is_empty() {
        return;
    }

    let dir = constants.dir;
    let cross_min_size = constants.min_size.cross(dir);
    let cross_max_size = constants.max_size.cross(dir);
    let container_min_inner_cross = node_size
        .cross(dir)
        .or(cross_min_size)
        .maybe_clamp(cross_min_size, cross_max_size)
        .maybe_sub(constants.content_box_inset.cross_axis_sum(dir))
        .maybe_max(0.0)
        .unwrap_or(0.0);

    let total_cross_axis_gap = sum_axis_gaps(constants.gap.cross(dir), flex_lines.len());
    let lines_total_cross: f32 =
        flex_lines.iter().map(|line| line.cross_size).sum::<f32>() + total_cross_axis_gap;

    if lines_total_cross < container_min_inner_cross {
        let addition = (container_min_inner_cross - lines_total_cross) / flex_lines.len() as f32;
        for line in flex_lines.iter_mut() {
            line.cross_size += addition;
        }
    }
}

/// 9.4.11 Determine the used cross size of each item. Stretched items with an auto cross size
/// and no auto cross margins fill their line.
pub fn determine_used_cross_size(flex_lines: &mut [FlexLine<'_>], constants: &AlgoConstants) {
    let dir = constants.dir;
    for line in flex_lines.iter_mut() {
        let line_cross_size = line.cross_size;
        for child in line.items.iter_mut() {
            let is_stretched = child.align_self == AlignSelf::Stretch
                && !child.margin_is_auto.cross_start(dir)
                && !child.margin_is_auto.cross_end(dir)
                && child.size_is_auto.cross(dir);
            let target_cross = if is_stretched {
                (line_cross_size - child.margin.cross_axis_sum(dir))
                    .maybe_clamp(child.min_size.cross(dir), child.max_size.cross(dir))
            } else {
                child.hypothetical_inner_size.cross(dir)
            };
            child.target_size.set_cross(dir, target_cross);
            child
                .outer_target_size
                .set_cross(dir, target_cross + child.margin.cross_axis_sum(dir));
        }
    }
}

/// 9.4.15 Determine the container's used cross size. Returns the summed cross size of all
/// lines, gaps excluded.
pub fn determine_container_cross_size(
    flex_lines: &[FlexLine<'_>],
    node_size: Size<Option<f32>>,
    constants: &mut AlgoConstants,
) -> f32 {
    let dir = constants.dir;
    let total_cross_axis_gap = sum_axis_gaps(constants.gap.cross(dir), flex_lines.len());
    let total_line_cross_size: f32 = flex_lines.iter().map(|line| line.cross_size).sum();
    let cross_axis_inset = constants.content_box_inset.cross_axis_sum(dir);

    let outer_container_size = node_size
        .cross(dir)
        .unwrap_or(total_line_cross_size + total_cross_axis_gap + cross_axis_inset)
        .maybe_clamp(constants.min_size.cross(dir), constants.max_size.cross(dir))
        .max(cross_axis_inset - constants.scrollbar_gutter.cross(dir));
    let inner_container_size = (outer_container_size - cross_axis_inset).max(0.0);

    trace!(
        target: "css::flexbox",
        "[FLEX-CROSS] lines={} outer={outer_container_size}",
        flex_lines.len()
    );

    constants.container_size.set_cross(dir, outer_container_size);
    constants.inner_container_size.set_cross(dir, inner_container_size);
    total_line_cross_size
}
