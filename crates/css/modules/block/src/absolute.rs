//! Absolutely positioned children of a block container.
//!
//! Spec: <https://www.w3.org/TR/CSS21/visudet.html#abs-non-replaced-width>

use css_box::{compute_box_sides, content_size_contribution, resolve_margin_auto, scrollbar_gutter};
use css_orchestrator::{
    AvailableSpace, Layout, LayoutPartialTree, Line, MaybeMath as _, MaybeResolve as _, Point,
    Rect, Size, SizingMode,
};
use css_sizing::resolve_style_sizes;
use log::trace;

use crate::items::BlockItem;

/// Resolved inputs for one absolutely positioned child.
#[derive(Debug, Clone, Copy)]
struct AbsoluteChild {
    /// Margins with `auto` kept as `None`
    margin: Rect<Option<f32>>,
    /// Resolved padding
    padding: Rect<f32>,
    /// Resolved border
    border: Rect<f32>,
    /// Resolved insets (`None` for `auto`)
    inset: Rect<Option<f32>>,
    /// Preferred border-box size
    style_size: Size<Option<f32>>,
    /// Minimum border-box size (at least padding plus border)
    min_size: Size<Option<f32>>,
    /// Maximum border-box size
    max_size: Size<Option<f32>>,
    /// Preferred aspect ratio
    aspect_ratio: Option<f32>,
    /// Space reserved for scrollbars
    scrollbar_size: Size<f32>,
}

/// Read everything needed from the child's style so the tree can be borrowed mutably afterwards.
fn resolve_absolute_child(
    tree: &impl LayoutPartialTree,
    item: &BlockItem,
    area_size: Size<f32>,
) -> AbsoluteChild {
    let style = tree.style(item.node_id);
    let sides = compute_box_sides(style, Some(area_size.width));
    let padding_border_sum = sides.padding_border_sum();
    let sizes = resolve_style_sizes(style, area_size.map(Some), padding_border_sum);
    AbsoluteChild {
        margin: resolve_margin_auto(style, Some(area_size.width)),
        padding: sides.padding,
        border: sides.border,
        inset: style.inset.zip_size(area_size, |value, basis| value.maybe_resolve(Some(basis))),
        style_size: sizes.size,
        min_size: sizes
            .min_size
            .or(padding_border_sum.map(Some))
            .maybe_max(padding_border_sum),
        max_size: sizes.max_size,
        aspect_ratio: sizes.aspect_ratio,
        scrollbar_size: scrollbar_gutter(style),
    }
}

/// The size each pair of auto margins absorbs in one axis.
///
/// With both margins auto the child is centered, unless its preferred size is unset or already
/// fills the space, in which case both margins are zero.
fn auto_margin_share(
    start: Option<f32>,
    end: Option<f32>,
    style_size: Option<f32>,
    free_space: f32,
) -> f32 {
    let auto_margin_count = u8::from(start.is_none()) + u8::from(end.is_none());
    let fills_space = style_size.is_none_or(|size| size >= free_space);
    if auto_margin_count == 0 || (auto_margin_count == 2 && fills_space) {
        0.0
    } else {
        free_space / f32::from(auto_margin_count)
    }
}

/// Border-box dimensions fixed by the child's own sizes or by a pair of opposing insets.
fn resolve_known_dimensions(child: &AbsoluteChild, area_size: Size<f32>) -> Size<Option<f32>> {
    let AbsoluteChild {
        margin,
        inset,
        min_size,
        max_size,
        aspect_ratio,
        ..
    } = *child;
    let mut known_dimensions = child.style_size.maybe_clamp(min_size, max_size);

    // Both horizontal insets set: the width is whatever they leave over.
    if let (None, Some(left), Some(right)) = (known_dimensions.width, inset.left, inset.right) {
        let new_width_raw =
            area_size.width.maybe_sub(margin.left).maybe_sub(margin.right) - left - right;
        known_dimensions.width = Some(new_width_raw.max(0.0));
        known_dimensions = known_dimensions
            .maybe_apply_aspect_ratio(aspect_ratio)
            .maybe_clamp(min_size, max_size);
    }

    if let (None, Some(top), Some(bottom)) = (known_dimensions.height, inset.top, inset.bottom) {
        let new_height_raw =
            area_size.height.maybe_sub(margin.top).maybe_sub(margin.bottom) - top - bottom;
        known_dimensions.height = Some(new_height_raw.max(0.0));
        known_dimensions = known_dimensions
            .maybe_apply_aspect_ratio(aspect_ratio)
            .maybe_clamp(min_size, max_size);
    }

    known_dimensions
}

/// Margins with `auto` replaced by their share of the free space.
///
/// Auto margins only absorb space when the opposite inset pins the box.
fn resolve_auto_margins(
    child: &AbsoluteChild,
    final_size: Size<f32>,
    area_size: Size<f32>,
) -> Rect<f32> {
    let AbsoluteChild { margin, inset, .. } = *child;
    let non_auto_margin = Rect {
        left: inset.left.and(margin.left).unwrap_or(0.0),
        right: inset.right.and(margin.right).unwrap_or(0.0),
        top: inset.top.and(margin.top).unwrap_or(0.0),
        bottom: inset.bottom.and(margin.bottom).unwrap_or(0.0),
    };
    let auto_margin_space = Size {
        width: inset.right.map_or(final_size.width, |right| {
            area_size.width - right - inset.left.unwrap_or(0.0)
        }),
        height: inset.bottom.map_or(final_size.height, |bottom| {
            area_size.height - bottom - inset.top.unwrap_or(0.0)
        }),
    };
    let free_space = Size {
        width: auto_margin_space.width - final_size.width - non_auto_margin.horizontal_axis_sum(),
        height: auto_margin_space.height - final_size.height - non_auto_margin.vertical_axis_sum(),
    };
    let auto_margin_size = Size {
        width: auto_margin_share(margin.left, margin.right, child.style_size.width, free_space.width),
        height: auto_margin_share(
            margin.top,
            margin.bottom,
            child.style_size.height,
            free_space.height,
        ),
    };
    Rect {
        left: margin.left.unwrap_or(auto_margin_size.width),
        right: margin.right.unwrap_or(auto_margin_size.width),
        top: margin.top.unwrap_or(auto_margin_size.height),
        bottom: margin.bottom.unwrap_or(auto_margin_size.height),
    }
}

/// Where the padding box sits inside the container and where the static position is anchored.
#[derive(Debug, Clone, Copy)]
pub struct AbsoluteArea {
    /// Size of the padding box
    pub size: Size<f32>,
    /// Position of the padding box inside the border box
    pub offset: Point<f32>,
    /// Right edge of the content box in right-to-left containers
    pub static_right_edge: Option<f32>,
}

/// Lay out absolutely positioned children against the padding box and return their content
/// extent.
///
/// Children with auto insets in an axis keep their static position in that axis; in
/// right-to-left containers the static position is anchored to the right edge of the content box.
pub fn perform_absolute_layout_on_absolute_children(
    tree: &mut impl LayoutPartialTree,
    items: &[BlockItem],
    area: AbsoluteArea,
) -> Size<f32> {
    let area_size = area.size;
    let mut absolute_content_size = Size::ZERO;

    for item in items.iter().filter(|item| item.is_absolute()) {
        let child = resolve_absolute_child(tree, item, area_size);
        let AbsoluteChild {
            inset,
            min_size,
            max_size,
            ..
        } = child;
        let known_dimensions = resolve_known_dimensions(&child, area_size);

        let layout_output = tree.perform_child_layout(
            item.node_id,
            known_dimensions,
            area_size.map(Some),
            Size {
                width: AvailableSpace::Definite(
                    area_size.width.maybe_clamp(min_size.width, max_size.width),
                ),
                height: AvailableSpace::Definite(
                    area_size.height.maybe_clamp(min_size.height, max_size.height),
                ),
            },
            SizingMode::ContentSize,
            Line::FALSE,
        );
        let final_size = known_dimensions
            .unwrap_or(layout_output.size)
            .maybe_clamp(min_size, max_size);
        let resolved_margin = resolve_auto_margins(&child, final_size, area_size);

        let static_x = match area.static_right_edge {
            Some(right_edge) => right_edge - final_size.width - resolved_margin.right,
            None => item.static_position.x + resolved_margin.left,
        };
        let location = Point {
            x: inset
                .left
                .map(|left| left + resolved_margin.left)
                .or_else(|| {
                    inset.right.map(|right| {
                        area_size.width - final_size.width - right - resolved_margin.right
                    })
                })
                .map_or(static_x, |offset| offset + area.offset.x),
            y: inset
                .top
                .map(|top| top + resolved_margin.top)
                .or_else(|| {
                    inset.bottom.map(|bottom| {
                        area_size.height - final_size.height - bottom - resolved_margin.bottom
                    })
                })
                .map_or(item.static_position.y + resolved_margin.top, |offset| {
                    offset + area.offset.y
                }),
        };

        trace!(
            "[BLOCK-ABS child={:?}] location=({}, {}) size={}x{}",
            item.node_id, location.x, location.y, final_size.width, final_size.height
        );

        tree.set_unrounded_layout(
            item.node_id,
            &Layout {
                order: item.order,
                location,
                size: final_size,
                content_size: layout_output.content_size,
                scrollbar_size: child.scrollbar_size,
                border: child.border,
                padding: child.padding,
                margin: resolved_margin,
            },
        );

        absolute_content_size = absolute_content_size.f32_max(content_size_contribution(
            location,
            final_size,
            layout_output.content_size,
            item.overflow,
        ));
    }

    absolute_content_size
}
