//! Grid layout algorithm.
//!
//! Spec: <https://www.w3.org/TR/css-grid-2/#layout-algorithm>
//!
//! The container's own box is resolved once into [`GridConstants`]. Items are then placed,
//! columns and rows are sized (each possibly a second time once the other axis is known), the
//! tracks are aligned and every child is laid out in its area.

use css_box::compute_box_sides;
use css_orchestrator::style_model::{
    AlignContent, AlignItems, BoxGenerationMode, GridAutoFlow, LengthPercentage, Position,
    Style,
};
use css_orchestrator::{
    AbsoluteAxis, AvailableSpace, Layout, LayoutInput, LayoutOutput, LayoutPartialTree, Line,
    MaybeMath as _, NodeId, Point, Rect, ResolveOrZero as _, RunMode, Size, SizingMode,
};
use css_sizing::{resolve_style_sizes, resolve_style_sizes_for_mode};
use tracing::debug;

use crate::absolute::{PositionedGrid, perform_absolute_layout_on_absolute_children};
use crate::alignment::{align_and_position_item, align_tracks, area_of};
use crate::explicit::{
    AutoRepeatSpace, auto_repetition_count, explicit_track_count, initialize_grid_tracks,
};
use crate::items::{GridItem, ItemDefaults, other_axis_space};
use crate::placement::CellOccupancyMatrix;
use crate::placement::{
    AxisPlacement, ExplicitAxis, ItemPlacement, compute_grid_size_estimate, place_grid_items,
};
use crate::track_sizing::{AxisSizing, track_sizing_algorithm};
use crate::types::{GridTrack, TrackCounts, sum_of_track_sizes};

/// Values derived from the container's style and known size for one layout call.
#[derive(Debug, Clone, Copy)]
struct GridConstants {
    /// Container margin
    margin: Rect<f32>,
    /// Container border
    border: Rect<f32>,
    /// Padding, border and scrollbar gutter
    content_box_inset: Rect<f32>,
    /// Space reserved for scrollbars
    scrollbar_gutter: Size<f32>,
    /// Container minimum border-box size
    min_size: Size<Option<f32>>,
    /// Container maximum border-box size
    max_size: Size<Option<f32>>,
    /// Content-box size as far as it is known
    node_inner_size: Size<Option<f32>>,
    /// Resolved gaps (`width` is the column gap)
    gap: Size<f32>,
    /// Gaps as they count toward an intrinsic container size
    intrinsic_gap: Size<f32>,
    /// Specified gaps, re-resolved once an indefinite inner size is settled
    gap_style: Size<LengthPercentage>,
    /// Placement direction
    auto_flow: GridAutoFlow,
    /// `align-content`
    align_content: Option<AlignContent>,
    /// `justify-content`
    justify_content: Option<AlignContent>,
    /// Default `align-self` of the items
    align_items: Option<AlignItems>,
    /// Default `justify-self` of the items
    justify_items: Option<AlignItems>,
}

impl GridConstants {
    /// Content-box minimum size.
    fn inner_min_size(&self) -> Size<Option<f32>> {
        self.min_size.maybe_sub(self.content_box_inset.sum_axes())
    }

    /// Content-box maximum size.
    fn inner_max_size(&self) -> Size<Option<f32>> {
        self.max_size.maybe_sub(self.content_box_inset.sum_axes())
    }
}

/// Resolve the container's own box.
fn compute_constants(
    style: &Style,
    known_dimensions: Size<Option<f32>>,
    parent_size: Size<Option<f32>>,
) -> GridConstants {
    let sides = compute_box_sides(style, parent_size.width);
    let sizes = resolve_style_sizes(style, parent_size, sides.padding_border_sum());
    let content_box_inset = sides.content_box_inset();
    let node_inner_size = known_dimensions.maybe_sub(content_box_inset.sum_axes());
    let gap = style.gap.resolve_or_zero(node_inner_size);
    GridConstants {
        margin: sides.margin,
        border: sides.border,
        content_box_inset,
        scrollbar_gutter: sides.scrollbar_gutter,
        min_size: sizes.min_size,
        max_size: sizes.max_size,
        node_inner_size,
        gap,
        intrinsic_gap: gap,
        gap_style: style.gap,
        auto_flow: style.grid_auto_flow,
        align_content: style.align_content,
        justify_content: style.justify_content,
        align_items: style.align_items,
        justify_items: style.justify_items,
    }
}

/// Lay out (or size) a grid container.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#layout-algorithm>
pub fn compute_grid_layout(
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

    if run_mode == RunMode::ComputeSize
        && let Size {
            width: Some(width),
            height: Some(height),
        } = styled_based_known_dimensions
    {
        return LayoutOutput::from_outer_size(Size { width, height });
    }

    debug!(
        target: "css::grid",
        "[GRID node={node:?}] run_mode={run_mode:?} known={styled_based_known_dimensions:?}"
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

/// Items and tracks of a placed grid.
struct PlacedGrid {
    items: Vec<GridItem>,
    columns: Vec<GridTrack>,
    rows: Vec<GridTrack>,
    column_counts: TrackCounts,
    row_counts: TrackCounts,
}

/// Run the grid algorithm once the container's known dimensions are settled.
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

    let mut constants = compute_constants(tree.style(node), known_dimensions, parent_size);
    let mut grid = place_items_and_build_tracks(&*tree, node, &constants);

    // Space the tracks may fill: the inner size if known, else what the parent offers.
    let outer_margin_inset = constants.content_box_inset.sum_axes() + constants.margin.sum_axes();
    let available_grid_space = Size {
        width: available_space
            .width
            .maybe_sub(outer_margin_inset.width)
            .maybe_set(constants.node_inner_size.width),
        height: available_space
            .height
            .maybe_sub(outer_margin_inset.height)
            .maybe_set(constants.node_inner_size.height),
    };

    size_tracks(tree, &mut constants, available_grid_space, &mut grid);

    let container_size = container_size(&constants, known_dimensions, &grid);
    let padding_border_floor = constants.content_box_inset.sum_axes();

    if run_mode == RunMode::ComputeSize {
        return LayoutOutput::from_outer_size(container_size);
    }

    perform_hidden_layout_on_children(tree, node);

    let inner_container_size = container_size - padding_border_floor;
    align_tracks(
        inner_container_size.width,
        constants.content_box_inset.left,
        &mut grid.columns,
        constants.gap.width,
        constants.justify_content.unwrap_or(AlignContent::Start),
    );
    align_tracks(
        inner_container_size.height,
        constants.content_box_inset.top,
        &mut grid.rows,
        constants.gap.height,
        constants.align_content.unwrap_or(AlignContent::Start),
    );

    let (inflow_content_size, first_baseline) =
        position_items(tree, &grid, inner_container_size.map(Some));
    let absolute_content_size = perform_absolute_layout_on_absolute_children(
        tree,
        node,
        &PositionedGrid {
            container_size,
            border: constants.border,
            scrollbar_gutter: constants.scrollbar_gutter,
            columns: &grid.columns,
            rows: &grid.rows,
            column_counts: grid.column_counts,
            row_counts: grid.row_counts,
        },
        inner_container_size.map(Some),
    );

    let content_size =
        with_trailing_padding(&constants, inflow_content_size.f32_max(absolute_content_size));

    debug!(
        target: "css::grid",
        "[GRID node={node:?}] tracks={}x{} size={}x{} baseline={first_baseline:?}",
        grid.columns.len(),
        grid.rows.len(),
        container_size.width,
        container_size.height
    );

    LayoutOutput::from_sizes_and_baselines(
        container_size,
        content_size,
        Point {
            x: None,
            y: first_baseline,
        },
    )
}

/// The container's border-box size: known dimensions win, otherwise the tracks plus padding and
/// border, clamped by the container's min and max sizes.
fn container_size(
    constants: &GridConstants,
    known_dimensions: Size<Option<f32>>,
    grid: &PlacedGrid,
) -> Size<f32> {
    let padding_border_floor = constants.content_box_inset.sum_axes();
    let grid_size = Size {
        width: sum_of_track_sizes(&grid.columns, constants.intrinsic_gap.width),
        height: sum_of_track_sizes(&grid.rows, constants.intrinsic_gap.height),
    };
    let outer = |axis: AbsoluteAxis| {
        known_dimensions.get_abs(axis).unwrap_or_else(|| {
            (grid_size.get_abs(axis) + padding_border_floor.get_abs(axis))
                .maybe_clamp(constants.min_size.get_abs(axis), constants.max_size.get_abs(axis))
                .max(padding_border_floor.get_abs(axis))
        })
    };
    Size {
        width: outer(AbsoluteAxis::Horizontal),
        height: outer(AbsoluteAxis::Vertical),
    }
}

/// The trailing padding counts toward the scrollable area.
fn with_trailing_padding(constants: &GridConstants, content_size: Size<f32>) -> Size<f32> {
    Size {
        width: content_size.width + constants.content_box_inset.right
            - constants.border.right
            - constants.scrollbar_gutter.width,
        height: content_size.height + constants.content_box_inset.bottom
            - constants.border.bottom
            - constants.scrollbar_gutter.height,
    }
}

/// Expand the templates, place the in-flow children and build the tracks of both axes.
fn place_items_and_build_tracks(
    tree: &impl LayoutPartialTree,
    node: NodeId,
    constants: &GridConstants,
) -> PlacedGrid {
    let style = tree.style(node);
    let repeat_space = |axis: AbsoluteAxis| AutoRepeatSpace {
        definite: constants
            .node_inner_size
            .get_abs(axis)
            .or(constants.inner_max_size().get_abs(axis)),
        minimum: constants.inner_min_size().get_abs(axis),
    };
    let column_repetitions = auto_repetition_count(
        &style.grid_template_columns,
        style.gap.width,
        repeat_space(AbsoluteAxis::Horizontal),
    );
    let row_repetitions = auto_repetition_count(
        &style.grid_template_rows,
        style.gap.height,
        repeat_space(AbsoluteAxis::Vertical),
    );
    let explicit_columns = explicit_track_count(&style.grid_template_columns, column_repetitions);
    let explicit_rows = explicit_track_count(&style.grid_template_rows, row_repetitions);

    let mut children = Vec::new();
    let mut placements = Vec::new();
    for (order, &child) in tree.child_ids(node).iter().enumerate() {
        let child_style = tree.style(child);
        if child_style.box_generation_mode() == BoxGenerationMode::None
            || child_style.position == Position::Absolute
        {
            continue;
        }
        placements.push(ItemPlacement {
            column: AxisPlacement::resolve(
                &child_style.grid_column,
                ExplicitAxis {
                    track_count: explicit_columns,
                    line_names: &style.grid_template_column_names,
                },
            ),
            row: AxisPlacement::resolve(
                &child_style.grid_row,
                ExplicitAxis {
                    track_count: explicit_rows,
                    line_names: &style.grid_template_row_names,
                },
            ),
        });
        children.push((child, u16::try_from(order).unwrap_or(u16::MAX)));
    }

    let (column_estimate, row_estimate) =
        compute_grid_size_estimate(explicit_columns, explicit_rows, &placements);
    let mut matrix = CellOccupancyMatrix::with_track_counts(column_estimate, row_estimate);
    let areas = place_grid_items(&mut matrix, &placements, constants.auto_flow);
    let column_counts = *matrix.track_counts(AbsoluteAxis::Horizontal);
    let row_counts = *matrix.track_counts(AbsoluteAxis::Vertical);

    let mut columns = initialize_grid_tracks(
        column_counts,
        &style.grid_template_columns,
        &style.grid_auto_columns,
        column_repetitions,
    );
    let mut rows = initialize_grid_tracks(
        row_counts,
        &style.grid_template_rows,
        &style.grid_auto_rows,
        row_repetitions,
    );

    let defaults = ItemDefaults {
        align_items: constants.align_items,
        justify_items: constants.justify_items,
        inner_width: constants.node_inner_size.width,
    };
    let mut items: Vec<GridItem> = children
        .into_iter()
        .zip(areas)
        .map(|((child, order), area)| {
            let mut item = GridItem::new(child, order, tree.style(child), area, defaults);
            item.update_track_indexes(column_counts, row_counts);
            item
        })
        .collect();

    collapse_empty_auto_fit_tracks(&mut columns, &items, AbsoluteAxis::Horizontal);
    collapse_empty_auto_fit_tracks(&mut rows, &items, AbsoluteAxis::Vertical);
    for item in &mut items {
        item.update_track_flags(&columns, &rows);
    }

    PlacedGrid {
        items,
        columns,
        rows,
        column_counts,
        row_counts,
    }
}

/// `auto-fit` tracks that no item occupies collapse to zero.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#auto-repeat>
fn collapse_empty_auto_fit_tracks(tracks: &mut [GridTrack], items: &[GridItem], axis: AbsoluteAxis) {
    for (index, track) in tracks.iter_mut().enumerate() {
        if track.is_auto_fit && !items.iter().any(|item| item.track_range(axis).contains(&index)) {
            track.collapse();
        }
    }
}

/// The sizing inputs of one axis.
fn axis_sizing(
    constants: &GridConstants,
    axis: AbsoluteAxis,
    available_grid_space: Size<AvailableSpace>,
    other_axis_sized: bool,
) -> AxisSizing {
    let (alignment, gap, other_axis_gap) = match axis {
        AbsoluteAxis::Horizontal => (
            constants.justify_content,
            constants.gap.width,
            constants.gap.height,
        ),
        AbsoluteAxis::Vertical => (
            constants.align_content,
            constants.gap.height,
            constants.gap.width,
        ),
    };
    AxisSizing {
        axis,
        inner_node_size: constants.node_inner_size,
        min_size: constants.inner_min_size().get_abs(axis),
        max_size: constants.inner_max_size().get_abs(axis),
        alignment,
        available_space: available_grid_space.get_abs(axis),
        gap,
        other_axis_gap,
        other_axis_sized,
    }
}

/// Once an axis with an unknown inner size is sized, its tracks decide that size. Percentage
/// gaps counted as zero toward that size and resolve against it from then on.
fn settle_inner_size(
    constants: &mut GridConstants,
    original_inner_size: Size<Option<f32>>,
    tracks: &[GridTrack],
    axis: AbsoluteAxis,
) {
    if original_inner_size.get_abs(axis).is_none() {
        let size = sum_of_track_sizes(tracks, constants.intrinsic_gap.get_abs(axis)).maybe_clamp(
            constants.inner_min_size().get_abs(axis),
            constants.inner_max_size().get_abs(axis),
        );
        constants.node_inner_size.set_abs(axis, Some(size));
        let gap = constants.gap_style.get_abs(axis).resolve_or_zero(Some(size));
        constants.gap.set_abs(axis, gap);
    }
}

/// Whether sizing `axis` again can change its tracks once its inner size is settled.
fn depends_on_settled_size(
    constants: &GridConstants,
    original_inner_size: Size<Option<f32>>,
    tracks: &[GridTrack],
    axis: AbsoluteAxis,
) -> bool {
    original_inner_size.get_abs(axis).is_none()
        && (tracks.iter().any(GridTrack::uses_percentage)
            || matches!(constants.gap_style.get_abs(axis), LengthPercentage::Percent(_)))
}

/// Size columns then rows, re-running either axis once when the other axis changed what it
/// depends on.
fn size_tracks(
    tree: &mut impl LayoutPartialTree,
    constants: &mut GridConstants,
    available_grid_space: Size<AvailableSpace>,
    grid: &mut PlacedGrid,
) {
    let original_inner_size = constants.node_inner_size;
    let PlacedGrid {
        items,
        columns,
        rows,
        ..
    } = grid;

    let column_sizing = axis_sizing(constants, AbsoluteAxis::Horizontal, available_grid_space, false);
    track_sizing_algorithm(tree, &column_sizing, columns, rows, items);
    let column_min_content: Vec<Option<f32>> = items
        .iter()
        .map(|item| item.min_content_contribution_cache.width)
        .collect();
    settle_inner_size(constants, original_inner_size, columns, AbsoluteAxis::Horizontal);

    let row_sizing = axis_sizing(constants, AbsoluteAxis::Vertical, available_grid_space, true);
    track_sizing_algorithm(tree, &row_sizing, rows, columns, items);
    let row_min_content: Vec<Option<f32>> = items
        .iter()
        .map(|item| item.min_content_contribution_cache.height)
        .collect();
    settle_inner_size(constants, original_inner_size, rows, AbsoluteAxis::Vertical);

    let rerun_columns =
        depends_on_settled_size(constants, original_inner_size, columns, AbsoluteAxis::Horizontal)
            || min_content_changed(
                tree,
                constants,
                AbsoluteAxis::Horizontal,
                items,
                rows,
                &column_min_content,
            );
    if !rerun_columns {
        return;
    }
    debug!(target: "css::grid", "[GRID] re-running column sizing");
    let column_sizing = axis_sizing(constants, AbsoluteAxis::Horizontal, available_grid_space, true);
    track_sizing_algorithm(tree, &column_sizing, columns, rows, items);
    settle_inner_size(constants, original_inner_size, columns, AbsoluteAxis::Horizontal);

    let rerun_rows =
        depends_on_settled_size(constants, original_inner_size, rows, AbsoluteAxis::Vertical)
            || min_content_changed(
                tree,
                constants,
                AbsoluteAxis::Vertical,
                items,
                columns,
                &row_min_content,
            );
    if rerun_rows {
        debug!(target: "css::grid", "[GRID] re-running row sizing");
        let row_sizing = axis_sizing(constants, AbsoluteAxis::Vertical, available_grid_space, true);
        track_sizing_algorithm(tree, &row_sizing, rows, columns, items);
        settle_inner_size(constants, original_inner_size, rows, AbsoluteAxis::Vertical);
    }
}

/// Whether any item crossing an intrinsic track of `axis` now has a different min-content
/// contribution than it had when `axis` was sized, given the sized tracks of the other axis.
fn min_content_changed(
    tree: &mut impl LayoutPartialTree,
    constants: &GridConstants,
    axis: AbsoluteAxis,
    items: &mut [GridItem],
    other_tracks: &[GridTrack],
    previous: &[Option<f32>],
) -> bool {
    let other_axis = axis.other_axis();
    let mut changed = false;
    for (item, before) in items.iter_mut().zip(previous) {
        if !item.crosses_intrinsic_track(axis) {
            continue;
        }
        let Some(before) = *before else {
            continue;
        };
        let space = other_axis_space(
            item,
            axis,
            other_tracks,
            constants.gap.get_abs(other_axis),
            constants.node_inner_size.get_abs(other_axis),
            true,
        );
        item.refresh_cache(space);
        let after = item.min_content_contribution(tree, axis, space, constants.node_inner_size);
        if (after - before).abs() > f32::EPSILON {
            changed = true;
        }
    }
    changed
}

/// Lay out every in-flow item in its area. Returns the content size and the first baseline.
fn position_items(
    tree: &mut impl LayoutPartialTree,
    grid: &PlacedGrid,
    inner_node_size: Size<Option<f32>>,
) -> (Size<f32>, Option<f32>) {
    let mut content_size = Size::ZERO;
    let mut baselines = Vec::with_capacity(grid.items.len());
    for item in &grid.items {
        let area = area_of(item, &grid.columns, &grid.rows);
        let placed = align_and_position_item(tree, item, area, inner_node_size);
        content_size = content_size.f32_max(placed.content_size_contribution);
        baselines.push(placed.baseline);
    }

    // The first row with items supplies the baseline: its first baseline-aligned item, else its
    // first item.
    let first_row = grid.items.iter().map(|item| item.row_indexes.start).min();
    let in_first_row = |item: &GridItem| Some(item.row_indexes.start) == first_row;
    let baseline_item = grid
        .items
        .iter()
        .position(|item| in_first_row(item) && item.align_self == AlignItems::Baseline)
        .or_else(|| grid.items.iter().position(in_first_row));
    let first_baseline = baseline_item.and_then(|index| baselines.get(index).copied());
    (content_size, first_baseline)
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
