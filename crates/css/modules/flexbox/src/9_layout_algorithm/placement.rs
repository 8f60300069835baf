//! Final placement of in-flow items, absolutely positioned children and hidden children.
//! Spec: <https://www.w3.org/TR/css-flexbox-1/#abspos-items>

use css_box::{compute_box_sides, content_size_contribution, resolve_margin_auto};
use css_orchestrator::style_model::{
    AlignSelf, BoxGenerationMode, JustifyContent, Overflow, Position,
};
use css_orchestrator::{
    AvailableSpace, Layout, LayoutOutput, LayoutPartialTree, Line, MaybeMath as _,
    MaybeResolve as _, NodeId, Point, Rect, Size, SizingMode,
};
use css_sizing::resolve_style_sizes;
use log::trace;

use super::lines::FlexLine;
use crate::chapter4::AlgoConstants;
use crate::chapter6::FlexItem;

/// Running offsets while placing the items of one line.
struct LineCursor {
    /// Main-axis position of the next item
    offset_main: f32,
    /// Cross-axis position of the line
    offset_cross: f32,
    /// Offset of the line from `align-content`
    line_offset_cross: f32,
}

/// Lay out one item at its final size and write its layout. Returns its content-size
/// contribution.
fn calculate_flex_item(
    tree: &mut impl LayoutPartialTree,
    item: &mut FlexItem,
    cursor: &mut LineCursor,
    constants: &AlgoConstants,
) -> Size<f32> {
    let dir = constants.dir;
    let LayoutOutput {
        size,
        content_size,
        first_baselines,
        ..
    } = tree.perform_child_layout(
        item.node,
        item.target_size.map(Some),
        constants.node_inner_size,
        constants.container_size.map(AvailableSpace::Definite),
        SizingMode::ContentSize,
        Line::FALSE,
    );

    // Relative positioning: start insets win over end insets.
    let relative_main = item
        .inset
        .main_start(dir)
        .or(item.inset.main_end(dir).map(|end| -end))
        .unwrap_or(0.0);
    let relative_cross = item
        .inset
        .cross_start(dir)
        .or(item.inset.cross_end(dir).map(|end| -end))
        .unwrap_or(0.0);

    let margin_box_main = cursor.offset_main + item.offset_main + item.margin.main_start(dir);
    let margin_box_cross = cursor.offset_cross
        + cursor.line_offset_cross
        + item.offset_cross
        + item.margin.cross_start(dir);
    let offset_main = margin_box_main + relative_main;
    let offset_cross = margin_box_cross + relative_cross;

    let inner_baseline = first_baselines.y.unwrap_or(size.height);
    item.baseline = if constants.is_row {
        margin_box_cross + inner_baseline
    } else {
        margin_box_main + inner_baseline
    };

    let location = if constants.is_row {
        Point {
            x: offset_main,
            y: offset_cross,
        }
    } else {
        Point {
            x: offset_cross,
            y: offset_main,
        }
    };

    trace!(
        target: "css::flexbox",
        "[FLEX-PLACE child={:?}] location=({}, {}) size={}x{}",
        item.node,
        location.x,
        location.y,
        size.width,
        size.height
    );

    tree.set_unrounded_layout(
        item.node,
        &Layout {
            order: item.order,
            location,
            size,
            content_size,
            scrollbar_size: item.scrollbar_size,
            border: item.border,
            padding: item.padding,
            margin: item.margin,
        },
    );

    cursor.offset_main += item.offset_main + item.margin.main_axis_sum(dir) + size.main(dir);

    content_size_contribution(location, size, content_size, item.overflow)
}

/// Place the items of one line in visual order.
fn calculate_layout_line(
    tree: &mut impl LayoutPartialTree,
    line: &mut FlexLine<'_>,
    total_offset_cross: &mut f32,
    constants: &AlgoConstants,
) -> Size<f32> {
    let mut cursor = LineCursor {
        offset_main: constants.content_box_inset.main_start(constants.dir),
        offset_cross: *total_offset_cross,
        line_offset_cross: line.offset_cross,
    };
    let mut content_size = Size::ZERO;
    if constants.dir.is_reverse() {
        for item in line.items.iter_mut().rev() {
            content_size =
                content_size.f32_max(calculate_flex_item(tree, item, &mut cursor, constants));
        }
    } else {
        for item in line.items.iter_mut() {
            content_size =
                content_size.f32_max(calculate_flex_item(tree, item, &mut cursor, constants));
        }
    }
    *total_offset_cross += line.offset_cross + line.cross_size;
    content_size
}

/// Lay out every in-flow item at its final position. Returns the scrollable content size.
pub fn final_layout_pass(
    tree: &mut impl LayoutPartialTree,
    flex_lines: &mut [FlexLine<'_>],
    constants: &AlgoConstants,
) -> Size<f32> {
    let mut total_offset_cross = constants.content_box_inset.cross_start(constants.dir);
    let mut content_size = Size::ZERO;

    if constants.is_wrap_reverse {
        for line in flex_lines.iter_mut().rev() {
            content_size = content_size
                .f32_max(calculate_layout_line(tree, line, &mut total_offset_cross, constants));
        }
    } else {
        for line in flex_lines.iter_mut() {
            content_size = content_size
                .f32_max(calculate_layout_line(tree, line, &mut total_offset_cross, constants));
        }
    }

    // The trailing padding counts toward the scrollable area.
    content_size.width +=
        constants.content_box_inset.right - constants.border.right - constants.scrollbar_gutter.width;
    content_size.height += constants.content_box_inset.bottom
        - constants.border.bottom
        - constants.scrollbar_gutter.height;
    content_size
}

/// The container's first baseline: from the first baseline-aligned item of the first line
/// (any item in columns), else from the line's first item.
pub fn first_baseline(flex_lines: &[FlexLine<'_>], constants: &AlgoConstants) -> Option<f32> {
    let first_line = flex_lines.first()?;
    first_line
        .items
        .iter()
        .find(|item| !constants.is_row || item.align_self == AlignSelf::Baseline)
        .or_else(|| first_line.items.first())
        .map(|item| item.baseline)
}

/// Resolved inputs for one absolutely positioned child.
struct AbsoluteChild {
    margin: Rect<Option<f32>>,
    padding: Rect<f32>,
    border: Rect<f32>,
    inset: Rect<Option<f32>>,
    min_size: Size<Option<f32>>,
    max_size: Size<Option<f32>>,
    known_dimensions: Size<Option<f32>>,
    align_self: AlignSelf,
    overflow: Point<Overflow>,
    scrollbar_size: Size<f32>,
}

/// Read the child's style against the container's padding box.
fn resolve_absolute_child(
    tree: &impl LayoutPartialTree,
    child: NodeId,
    inset_relative_size: Size<f32>,
    constants: &AlgoConstants,
) -> AbsoluteChild {
    let style = tree.style(child);
    let sides = compute_box_sides(style, Some(inset_relative_size.width));
    let padding_border_sum = sides.padding_border_sum();
    let sizes = resolve_style_sizes(style, inset_relative_size.map(Some), padding_border_sum);
    let margin = resolve_margin_auto(style, Some(inset_relative_size.width));
    let inset = style
        .inset
        .zip_size(inset_relative_size, |value, basis| value.maybe_resolve(Some(basis)));
    let min_size = sizes
        .min_size
        .or(padding_border_sum.map(Some))
        .maybe_max(padding_border_sum);
    let mut known_dimensions = sizes.size.maybe_clamp(min_size, sizes.max_size);

    // Opposing insets fix the size in their axis.
    if let (None, Some(left), Some(right)) = (known_dimensions.width, inset.left, inset.right) {
        let width = inset_relative_size
            .width
            .maybe_sub(margin.left)
            .maybe_sub(margin.right)
            - left
            - right;
        known_dimensions.width = Some(width.max(0.0));
        known_dimensions = known_dimensions
            .maybe_apply_aspect_ratio(sizes.aspect_ratio)
            .maybe_clamp(min_size, sizes.max_size);
    }
    if let (None, Some(top), Some(bottom)) = (known_dimensions.height, inset.top, inset.bottom) {
        let height = inset_relative_size
            .height
            .maybe_sub(margin.top)
            .maybe_sub(margin.bottom)
            - top
            - bottom;
        known_dimensions.height = Some(height.max(0.0));
        known_dimensions = known_dimensions
            .maybe_apply_aspect_ratio(sizes.aspect_ratio)
            .maybe_clamp(min_size, sizes.max_size);
    }

    AbsoluteChild {
        margin,
        padding: sides.padding,
        border: sides.border,
        inset,
        min_size,
        max_size: sizes.max_size,
        known_dimensions,
        align_self: style.align_self.unwrap_or(constants.align_items),
        overflow: style.overflow,
        scrollbar_size: sides.scrollbar_gutter,
    }
}

/// Main-axis position of an absolutely positioned child. Without insets the child is placed as
/// if it were the sole item of the container, using `justify-content`.
fn absolute_offset_main(
    start: Option<f32>,
    end: Option<f32>,
    final_size: Size<f32>,
    margin: Rect<f32>,
    constants: &AlgoConstants,
) -> f32 {
    let dir = constants.dir;
    let container_main = constants.container_size.main(dir);
    let inset = constants.content_box_inset;
    if let Some(start) = start {
        return start + constants.border.main_start(dir) + margin.main_start(dir);
    }
    if let Some(end) = end {
        return container_main
            - constants.border.main_end(dir)
            - constants.scrollbar_gutter.main(dir)
            - final_size.main(dir)
            - end
            - margin.main_end(dir);
    }

    let start_position = inset.main_start(dir) + margin.main_start(dir);
    let end_position =
        container_main - inset.main_end(dir) - final_size.main(dir) - margin.main_end(dir);
    let is_reverse = dir.is_reverse();
    match constants.justify_content.unwrap_or(JustifyContent::Start) {
        JustifyContent::SpaceEvenly | JustifyContent::SpaceAround | JustifyContent::Center => {
            (container_main + inset.main_start(dir)
                - inset.main_end(dir)
                - final_size.main(dir)
                + margin.main_start(dir)
                - margin.main_end(dir))
                / 2.0
        }
        JustifyContent::Start | JustifyContent::SpaceBetween => start_position,
        JustifyContent::End => end_position,
        // Stretch does not apply to absolutely positioned children.
        JustifyContent::FlexStart | JustifyContent::Stretch => {
            if is_reverse {
                end_position
            } else {
                start_position
            }
        }
        JustifyContent::FlexEnd => {
            if is_reverse {
                start_position
            } else {
                end_position
            }
        }
    }
}

/// Cross-axis position of an absolutely positioned child. Without insets `align-self` applies;
/// stretch and baseline act as flex-start.
fn absolute_offset_cross(
    start: Option<f32>,
    end: Option<f32>,
    final_size: Size<f32>,
    margin: Rect<f32>,
    align_self: AlignSelf,
    constants: &AlgoConstants,
) -> f32 {
    let dir = constants.dir;
    let container_cross = constants.container_size.cross(dir);
    let inset = constants.content_box_inset;
    if let Some(start) = start {
        return start + constants.border.cross_start(dir) + margin.cross_start(dir);
    }
    if let Some(end) = end {
        return container_cross
            - constants.border.cross_end(dir)
            - constants.scrollbar_gutter.cross(dir)
            - final_size.cross(dir)
            - end
            - margin.cross_end(dir);
    }

    let cross_end_position =
        container_cross - inset.cross_end(dir) - final_size.cross(dir) - margin.cross_end(dir);
    let cross_start_position = inset.cross_start(dir) + margin.cross_start(dir);
    match align_self {
        AlignSelf::Center => {
            (container_cross + inset.cross_start(dir)
                - inset.cross_end(dir)
                - final_size.cross(dir)
                + margin.cross_start(dir)
                - margin.cross_end(dir))
                / 2.0
        }
        AlignSelf::Start => cross_start_position,
        AlignSelf::End => cross_end_position,
        AlignSelf::FlexEnd => {
            if constants.is_wrap_reverse {
                cross_start_position
            } else {
                cross_end_position
            }
        }
        AlignSelf::FlexStart | AlignSelf::Baseline | AlignSelf::Stretch => {
            if constants.is_wrap_reverse {
                cross_end_position
            } else {
                cross_start_position
            }
        }
    }
}

/// Lay out absolutely positioned children against the container's padding box. Returns their
/// content-size contribution.
pub fn perform_absolute_layout_on_absolute_children(
    tree: &mut impl LayoutPartialTree,
    node: NodeId,
    constants: &AlgoConstants,
) -> Size<f32> {
    let container_size = constants.container_size;
    let inset_relative_size =
        container_size - constants.border.sum_axes() - constants.scrollbar_gutter;
    let mut content_size = Size::ZERO;

    let children = tree.child_ids(node).to_vec();
    for (order, child) in children.into_iter().enumerate() {
        let is_absolute = {
            let style = tree.style(child);
            style.box_generation_mode() != BoxGenerationMode::None
                && style.position == Position::Absolute
        };
        if !is_absolute {
            continue;
        }

        let abs = resolve_absolute_child(tree, child, inset_relative_size, constants);
        let layout_output = tree.perform_child_layout(
            child,
            abs.known_dimensions,
            constants.node_inner_size,
            Size {
                width: AvailableSpace::Definite(
                    container_size.width.maybe_clamp(abs.min_size.width, abs.max_size.width),
                ),
                height: AvailableSpace::Definite(
                    container_size.height.maybe_clamp(abs.min_size.height, abs.max_size.height),
                ),
            },
            SizingMode::InherentSize,
            Line::FALSE,
        );
        let final_size = abs
            .known_dimensions
            .unwrap_or(layout_output.size)
            .maybe_clamp(abs.min_size, abs.max_size);

        let resolved_margin = resolve_absolute_margins(&abs, final_size, container_size);
        let (start_main, end_main, start_cross, end_cross) = if constants.is_row {
            (abs.inset.left, abs.inset.right, abs.inset.top, abs.inset.bottom)
        } else {
            (abs.inset.top, abs.inset.bottom, abs.inset.left, abs.inset.right)
        };
        let offset_main =
            absolute_offset_main(start_main, end_main, final_size, resolved_margin, constants);
        let offset_cross = absolute_offset_cross(
            start_cross,
            end_cross,
            final_size,
            resolved_margin,
            abs.align_self,
            constants,
        );
        let location = if constants.is_row {
            Point {
                x: offset_main,
                y: offset_cross,
            }
        } else {
            Point {
                x: offset_cross,
                y: offset_main,
            }
        };

        tree.set_unrounded_layout(
            child,
            &Layout {
                order: u32::try_from(order).unwrap_or(u32::MAX),
                location,
                size: final_size,
                content_size: layout_output.content_size,
                scrollbar_size: abs.scrollbar_size,
                border: abs.border,
                padding: abs.padding,
                margin: resolved_margin,
            },
        );

        content_size = content_size.f32_max(content_size_contribution(
            location,
            final_size,
            layout_output.content_size,
            abs.overflow,
        ));
    }

    content_size
}

/// Auto margins of an absolutely positioned child split the container's free space.
fn resolve_absolute_margins(
    abs: &AbsoluteChild,
    final_size: Size<f32>,
    container_size: Size<f32>,
) -> Rect<f32> {
    let margin = abs.margin;
    let non_auto_margin = margin.map(|value| value.unwrap_or(0.0));
    let free_space = Size {
        width: container_size.width - final_size.width - non_auto_margin.horizontal_axis_sum(),
        height: container_size.height - final_size.height - non_auto_margin.vertical_axis_sum(),
    }
    .f32_max(Size::ZERO);
    let share = |start: Option<f32>, end: Option<f32>, space: f32| {
        let auto_margin_count = u8::from(start.is_none()) + u8::from(end.is_none());
        if auto_margin_count > 0 {
            space / f32::from(auto_margin_count)
        } else {
            0.0
        }
    };
    let auto_width = share(margin.left, margin.right, free_space.width);
    let auto_height = share(margin.top, margin.bottom, free_space.height);
    Rect {
        left: margin.left.unwrap_or(auto_width),
        right: margin.right.unwrap_or(auto_width),
        top: margin.top.unwrap_or(auto_height),
        bottom: margin.bottom.unwrap_or(auto_height),
    }
}

/// Lay out children that generate no box so their subtrees get zero layouts.
pub fn perform_hidden_layout_on_children(tree: &mut impl LayoutPartialTree, node: NodeId) {
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
