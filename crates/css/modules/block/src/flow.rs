//! Final layout of in-flow children: vertical stacking with margin collapsing.
//!
//! Spec: <https://www.w3.org/TR/CSS21/box.html#collapsing-margins>

use css_box::content_size_contribution;
use css_orchestrator::style_model::TextAlign;
use css_orchestrator::{
    AvailableSpace, CollapsibleMarginSet, Layout, LayoutPartialTree, Line, MaybeMath as _,
    MaybeResolve as _, Point, Rect, Size, SizingMode,
};
use log::trace;

use crate::items::BlockItem;

/// Container facts the in-flow pass needs.
#[derive(Debug, Clone, Copy)]
pub struct FlowContext {
    /// Border-box width of the container
    pub container_outer_width: f32,
    /// Content-box inset used for sizing children
    pub content_box_inset: Rect<f32>,
    /// Content-box inset re-resolved against the final container width
    pub resolved_content_box_inset: Rect<f32>,
    /// Legacy alignment of children narrower than the container
    pub text_align: TextAlign,
    /// Whether the container is right-to-left
    pub is_rtl: bool,
    /// Whether the container's own top/bottom margins collapse with its children's
    pub own_margins_collapse_with_children: Line<bool>,
}

/// What the in-flow pass reports back to the container.
#[derive(Debug, Clone, Copy)]
pub struct FlowOutput {
    /// Extent of in-flow content
    pub content_size: Size<f32>,
    /// Border-box height implied by the stacked children
    pub intrinsic_outer_height: f32,
    /// Margins that escape through the container's top edge
    pub first_child_top_margin_set: CollapsibleMarginSet,
    /// Margins that escape through the container's bottom edge
    pub last_child_bottom_margin_set: CollapsibleMarginSet,
}

/// Running vertical state of the in-flow pass.
struct FlowState {
    /// Offset below the last child that did not collapse through
    committed_y_offset: f32,
    /// Where the next absolutely positioned child would sit if it were in flow
    y_offset_for_absolute: f32,
    /// Margins collapsing through the container's top edge
    first_child_top_margin_set: CollapsibleMarginSet,
    /// Margins not yet committed to a vertical gap
    active_collapsible_margin_set: CollapsibleMarginSet,
    /// Whether every child so far collapsed through
    is_collapsing_with_first_margin_set: bool,
}

impl FlowState {
    fn new(top_inset: f32) -> Self {
        Self {
            committed_y_offset: top_inset,
            y_offset_for_absolute: top_inset,
            first_child_top_margin_set: CollapsibleMarginSet::ZERO,
            active_collapsible_margin_set: CollapsibleMarginSet::ZERO,
            is_collapsing_with_first_margin_set: true,
        }
    }

    /// The gap above a child whose own top margin resolves to `top_margin`.
    fn y_margin_offset(&self, top_margin: f32, collapses_with_parent_top: bool) -> f32 {
        if self.is_collapsing_with_first_margin_set && collapses_with_parent_top {
            0.0
        } else {
            self.active_collapsible_margin_set
                .collapse_with_margin(top_margin)
                .resolve()
        }
    }

    /// Account for a laid-out child.
    fn advance(
        &mut self,
        can_be_collapsed_through: bool,
        margin_sets: Line<CollapsibleMarginSet>,
        height: f32,
        y_margin_offset: f32,
    ) {
        if self.is_collapsing_with_first_margin_set {
            self.first_child_top_margin_set = self
                .first_child_top_margin_set
                .collapse_with_set(margin_sets.start);
            if can_be_collapsed_through {
                self.first_child_top_margin_set = self
                    .first_child_top_margin_set
                    .collapse_with_set(margin_sets.end);
            } else {
                self.is_collapsing_with_first_margin_set = false;
            }
        }

        if can_be_collapsed_through {
            self.active_collapsible_margin_set = self
                .active_collapsible_margin_set
                .collapse_with_set(margin_sets.start)
                .collapse_with_set(margin_sets.end);
            self.y_offset_for_absolute = self.committed_y_offset + height + y_margin_offset;
        } else {
            self.committed_y_offset += height + y_margin_offset;
            self.active_collapsible_margin_set = margin_sets.end;
            self.y_offset_for_absolute =
                self.committed_y_offset + self.active_collapsible_margin_set.resolve();
        }
    }
}

/// Horizontal shift of a child narrower than the container under legacy `text-align`.
fn text_align_shift(text_align: TextAlign, is_rtl: bool, slack: f32) -> f32 {
    match text_align {
        TextAlign::LegacyRight => slack,
        TextAlign::LegacyCenter => slack / 2.0,
        TextAlign::Auto if is_rtl => slack,
        TextAlign::Auto | TextAlign::LegacyLeft => 0.0,
    }
}

/// The visual offset of a relatively positioned child. `left` wins over `right` and `top` over
/// `bottom`.
fn relative_offset(item: &BlockItem, container_inner_width: f32) -> Point<f32> {
    let inset = item.inset.zip_size(
        Size {
            width: Some(container_inner_width),
            height: None,
        },
        |value, basis| value.maybe_resolve(basis),
    );
    Point {
        x: inset.left.or(inset.right.map(|right| -right)).unwrap_or(0.0),
        y: inset.top.or(inset.bottom.map(|bottom| -bottom)).unwrap_or(0.0),
    }
}

/// Lay out one in-flow child and return its contribution to the container's content size.
fn layout_in_flow_item(
    tree: &mut impl LayoutPartialTree,
    item: &mut BlockItem,
    context: &FlowContext,
    state: &mut FlowState,
) -> Size<f32> {
    let container_outer_width = context.container_outer_width;
    let container_inner_width =
        container_outer_width - context.content_box_inset.horizontal_axis_sum();

    let item_margin = item
        .margin
        .map(|margin| margin.resolve_to_option(container_outer_width));
    let item_non_auto_x_margin_sum = item_margin
        .map(|margin| margin.unwrap_or(0.0))
        .horizontal_axis_sum();

    // Block-level boxes with an auto width stretch to fill the container.
    let known_dimensions = item
        .size
        .map_width(|width| {
            Some(
                width
                    .unwrap_or(container_inner_width - item_non_auto_x_margin_sum)
                    .maybe_clamp(item.min_size.width, item.max_size.width),
            )
        })
        .maybe_clamp(item.min_size, item.max_size);

    let item_layout = tree.perform_child_layout(
        item.node_id,
        known_dimensions,
        Size::new(Some(container_outer_width), None),
        Size {
            width: AvailableSpace::Definite(container_inner_width - item_non_auto_x_margin_sum),
            height: AvailableSpace::MinContent,
        },
        SizingMode::InherentSize,
        Line::TRUE,
    );
    let final_size = item_layout.size;

    let margin_sets = Line {
        start: item_layout
            .top_margin
            .collapse_with_margin(item_margin.top.unwrap_or(0.0)),
        end: item_layout
            .bottom_margin
            .collapse_with_margin(item_margin.bottom.unwrap_or(0.0)),
    };

    // Auto horizontal margins split the remaining width. Vertical auto margins are zero.
    let free_x_space =
        (container_inner_width - final_size.width - item_non_auto_x_margin_sum).max(0.0);
    let auto_margin_count =
        u8::from(item_margin.left.is_none()) + u8::from(item_margin.right.is_none());
    let x_axis_auto_margin_size = if auto_margin_count > 0 {
        free_x_space / f32::from(auto_margin_count)
    } else {
        0.0
    };
    let resolved_margin = Rect {
        left: item_margin.left.unwrap_or(x_axis_auto_margin_size),
        right: item_margin.right.unwrap_or(x_axis_auto_margin_size),
        top: margin_sets.start.resolve(),
        bottom: margin_sets.end.resolve(),
    };

    let y_margin_offset = state.y_margin_offset(
        resolved_margin.top,
        context.own_margins_collapse_with_children.start,
    );

    item.computed_size = final_size;
    item.can_be_collapsed_through = item_layout.margins_can_collapse_through;
    item.static_position = Point {
        x: context.resolved_content_box_inset.left,
        y: state.committed_y_offset + state.active_collapsible_margin_set.resolve(),
    };

    let inset_offset = relative_offset(item, container_inner_width);
    let mut location = Point {
        x: context.resolved_content_box_inset.left + inset_offset.x + resolved_margin.left,
        y: state.committed_y_offset + inset_offset.y + y_margin_offset,
    };
    let item_outer_width = final_size.width + resolved_margin.horizontal_axis_sum();
    if item_outer_width < container_inner_width {
        location.x += text_align_shift(
            context.text_align,
            context.is_rtl,
            container_inner_width - item_outer_width,
        );
    }

    trace!(
        "[BLOCK-FLOW child={:?}] location=({}, {}) size={}x{} collapse_through={}",
        item.node_id,
        location.x,
        location.y,
        final_size.width,
        final_size.height,
        item.can_be_collapsed_through
    );

    tree.set_unrounded_layout(
        item.node_id,
        &Layout {
            order: item.order,
            location,
            size: final_size,
            content_size: item_layout.content_size,
            scrollbar_size: item.scrollbar_size,
            border: item.border,
            padding: item.padding,
            margin: resolved_margin,
        },
    );

    state.advance(
        item.can_be_collapsed_through,
        margin_sets,
        final_size.height,
        y_margin_offset,
    );

    content_size_contribution(location, final_size, item_layout.content_size, item.overflow)
}

/// Lay out in-flow children top to bottom, writing their final layouts, and record the static
/// position of absolutely positioned children.
pub fn perform_final_layout_on_in_flow_children(
    tree: &mut impl LayoutPartialTree,
    items: &mut [BlockItem],
    context: FlowContext,
) -> FlowOutput {
    let mut state = FlowState::new(context.resolved_content_box_inset.top);
    let mut inflow_content_size = Size::ZERO;

    for item in items.iter_mut() {
        if item.is_absolute() {
            item.static_position = Point {
                x: context.resolved_content_box_inset.left,
                y: state.y_offset_for_absolute,
            };
        } else {
            inflow_content_size = inflow_content_size
                .f32_max(layout_in_flow_item(tree, item, &context, &mut state));
        }
    }

    let last_child_bottom_margin_set = state.active_collapsible_margin_set;
    let bottom_y_margin_offset = if context.own_margins_collapse_with_children.end {
        0.0
    } else {
        last_child_bottom_margin_set.resolve()
    };
    let intrinsic_outer_height = state.committed_y_offset
        + context.resolved_content_box_inset.bottom
        + bottom_y_margin_offset;

    FlowOutput {
        content_size: inflow_content_size,
        intrinsic_outer_height: intrinsic_outer_height.max(0.0),
        first_child_top_margin_set: state.first_child_top_margin_set,
        last_child_bottom_margin_set,
    }
}
