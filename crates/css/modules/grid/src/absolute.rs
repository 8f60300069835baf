//! Absolutely positioned children of a grid container.
//!
//! The containing block is the area between the child's grid lines. Lines that are `auto` or
//! fall outside the implicit grid resolve to the container's padding edge.
//!
//! Spec: <https://www.w3.org/TR/css-grid-2/#abspos-items>

use css_box::{compute_box_sides, content_size_contribution, resolve_margin_auto};
use css_orchestrator::style_model::{BoxGenerationMode, Position};
use css_orchestrator::{
    AvailableSpace, Layout, LayoutPartialTree, Line, MaybeMath as _, MaybeResolve as _, NodeId,
    Point, Rect, Size, SizingMode,
};
use css_sizing::resolve_style_sizes;
use tracing::trace;

use crate::placement::{AxisPlacement, ExplicitAxis, OriginZeroPlacement};
use crate::types::{GridTrack, TrackCounts};

/// The sized grid an absolutely positioned child is placed against.
#[derive(Debug, Clone, Copy)]
pub struct PositionedGrid<'grid> {
    /// Final border-box size of the container
    pub container_size: Size<f32>,
    /// Container border
    pub border: Rect<f32>,
    /// Space reserved for scrollbars
    pub scrollbar_gutter: Size<f32>,
    /// Aligned columns
    pub columns: &'grid [GridTrack],
    /// Aligned rows
    pub rows: &'grid [GridTrack],
    /// Column counts of the implicit grid
    pub column_counts: TrackCounts,
    /// Row counts of the implicit grid
    pub row_counts: TrackCounts,
}

/// Offset of grid line `line` from the container's border-box edge. The start line of a track
/// is that track's start; the end line is the end of the track before it.
fn line_offset(line: i16, is_end: bool, counts: TrackCounts, tracks: &[GridTrack]) -> Option<f32> {
    let next = counts.oz_line_to_next_track(line);
    let track_end = |index: i16| {
        usize::try_from(index)
            .ok()
            .and_then(|index| tracks.get(index))
            .map(|track| track.offset + track.base_size)
    };
    let track_start = |index: i16| {
        usize::try_from(index)
            .ok()
            .and_then(|index| tracks.get(index))
            .map(|track| track.offset)
    };
    if is_end {
        track_end(next - 1).or_else(|| track_start(next))
    } else {
        track_start(next).or_else(|| track_end(next - 1))
    }
}

/// Definite lines of an absolutely positioned child. A span next to a definite line extends
/// from it; anything else is `auto`.
fn absolute_lines(placement: AxisPlacement) -> Line<Option<i16>> {
    let span = |count: u16| i16::try_from(count).unwrap_or(i16::MAX);
    match (placement.start, placement.end) {
        (OriginZeroPlacement::Line(start), OriginZeroPlacement::Line(end)) => Line {
            start: Some(start.min(end)),
            end: Some(start.max(end)),
        },
        (OriginZeroPlacement::Line(start), OriginZeroPlacement::Span(count)) => Line {
            start: Some(start),
            end: Some(start + span(count)),
        },
        (OriginZeroPlacement::Span(count), OriginZeroPlacement::Line(end)) => Line {
            start: Some(end - span(count)),
            end: Some(end),
        },
        (OriginZeroPlacement::Line(start), _) => Line {
            start: Some(start),
            end: None,
        },
        (_, OriginZeroPlacement::Line(end)) => Line {
            start: None,
            end: Some(end),
        },
        _ => Line {
            start: None,
            end: None,
        },
    }
}

/// The containing block of a child with the given placements.
fn containing_area(
    grid: &PositionedGrid<'_>,
    column: AxisPlacement,
    row: AxisPlacement,
) -> Rect<f32> {
    let columns = absolute_lines(column);
    let rows = absolute_lines(row);
    let horizontal = |line: Option<i16>, is_end: bool| {
        line.and_then(|line| line_offset(line, is_end, grid.column_counts, grid.columns))
    };
    let vertical = |line: Option<i16>, is_end: bool| {
        line.and_then(|line| line_offset(line, is_end, grid.row_counts, grid.rows))
    };
    Rect {
        left: horizontal(columns.start, false).unwrap_or(grid.border.left),
        right: horizontal(columns.end, true).unwrap_or(
            grid.container_size.width - grid.border.right - grid.scrollbar_gutter.width,
        ),
        top: vertical(rows.start, false).unwrap_or(grid.border.top),
        bottom: vertical(rows.end, true).unwrap_or(
            grid.container_size.height - grid.border.bottom - grid.scrollbar_gutter.height,
        ),
    }
}

/// Offset of a child along one axis: a start inset wins, then an end inset, then the area start.
fn absolute_offset(
    area: Line<f32>,
    inset: Line<Option<f32>>,
    margin: Line<f32>,
    size: f32,
) -> f32 {
    match (inset.start, inset.end) {
        (Some(start), _) => area.start + start + margin.start,
        (None, Some(end)) => area.end - end - size - margin.end,
        (None, None) => area.start + margin.start,
    }
}

/// Auto margins share the free space only when both insets of the axis are set.
fn resolve_auto_margins(
    margin: Line<Option<f32>>,
    inset: Line<Option<f32>>,
    area_size: f32,
    size: f32,
) -> Line<f32> {
    let (Some(start_inset), Some(end_inset)) = (inset.start, inset.end) else {
        return Line {
            start: margin.start.unwrap_or(0.0),
            end: margin.end.unwrap_or(0.0),
        };
    };
    let free_space = (area_size
        - start_inset
        - end_inset
        - size
        - margin.start.unwrap_or(0.0)
        - margin.end.unwrap_or(0.0))
    .max(0.0);
    match (margin.start, margin.end) {
        (None, None) => Line {
            start: free_space / 2.0,
            end: free_space / 2.0,
        },
        (None, Some(end)) => Line {
            start: free_space,
            end,
        },
        (Some(start), None) => Line {
            start,
            end: free_space,
        },
        (Some(start), Some(end)) => Line { start, end },
    }
}

/// The size left between two set insets and the non-auto margins.
fn size_between_insets(
    area_size: f32,
    inset: Line<Option<f32>>,
    margin: Line<Option<f32>>,
) -> Option<f32> {
    let (Some(start), Some(end)) = (inset.start, inset.end) else {
        return None;
    };
    let size = area_size - margin.start.unwrap_or(0.0) - margin.end.unwrap_or(0.0) - start - end;
    Some(size.max(0.0))
}

/// Location and resolved margins of a child of border-box `size` inside `area`.
fn place_in_area(
    area: Rect<f32>,
    inset: Rect<Option<f32>>,
    margin: Rect<Option<f32>>,
    size: Size<f32>,
) -> (Point<f32>, Rect<f32>) {
    let area_size = Size {
        width: (area.right - area.left).max(0.0),
        height: (area.bottom - area.top).max(0.0),
    };
    let horizontal_inset = Line {
        start: inset.left,
        end: inset.right,
    };
    let vertical_inset = Line {
        start: inset.top,
        end: inset.bottom,
    };
    let horizontal_margin = resolve_auto_margins(
        Line {
            start: margin.left,
            end: margin.right,
        },
        horizontal_inset,
        area_size.width,
        size.width,
    );
    let vertical_margin = resolve_auto_margins(
        Line {
            start: margin.top,
            end: margin.bottom,
        },
        vertical_inset,
        area_size.height,
        size.height,
    );
    let location = Point {
        x: absolute_offset(
            Line {
                start: area.left,
                end: area.right,
            },
            horizontal_inset,
            horizontal_margin,
            size.width,
        ),
        y: absolute_offset(
            Line {
                start: area.top,
                end: area.bottom,
            },
            vertical_inset,
            vertical_margin,
            size.height,
        ),
    };
    let resolved_margin = Rect {
        left: horizontal_margin.start,
        right: horizontal_margin.end,
        top: vertical_margin.start,
        bottom: vertical_margin.end,
    };
    (location, resolved_margin)
}

/// Lay out one absolutely positioned child inside `area`. Returns its content contribution.
fn layout_absolute_child(
    tree: &mut impl LayoutPartialTree,
    child: NodeId,
    order: u32,
    area: Rect<f32>,
    inner_node_size: Size<Option<f32>>,
) -> Size<f32> {
    let area_size = Size {
        width: (area.right - area.left).max(0.0),
        height: (area.bottom - area.top).max(0.0),
    };
    let (sides, sizes, margin, inset, overflow) = {
        let style = tree.style(child);
        let sides = compute_box_sides(style, Some(area_size.width));
        let sizes = resolve_style_sizes(style, area_size.map(Some), sides.padding_border_sum());
        let margin = resolve_margin_auto(style, Some(area_size.width));
        let inset = style
            .inset
            .zip_size(area_size, |value, basis| value.maybe_resolve(Some(basis)));
        (sides, sizes, margin, inset, style.overflow)
    };
    let padding_border_sum = sides.padding_border_sum();
    let min_size = sizes
        .min_size
        .or(padding_border_sum.map(Some))
        .maybe_max(padding_border_sum);
    let mut known_dimensions = sizes.size.maybe_clamp(min_size, sizes.max_size);

    // Opposing insets fix the size in their axis.
    if known_dimensions.width.is_none() {
        known_dimensions.width = size_between_insets(
            area_size.width,
            Line {
                start: inset.left,
                end: inset.right,
            },
            Line {
                start: margin.left,
                end: margin.right,
            },
        );
    }
    if known_dimensions.height.is_none() {
        known_dimensions.height = size_between_insets(
            area_size.height,
            Line {
                start: inset.top,
                end: inset.bottom,
            },
            Line {
                start: margin.top,
                end: margin.bottom,
            },
        );
    }
    known_dimensions = known_dimensions
        .maybe_apply_aspect_ratio(sizes.aspect_ratio)
        .maybe_clamp(min_size, sizes.max_size);

    let output = tree.perform_child_layout(
        child,
        known_dimensions,
        inner_node_size,
        Size {
            width: AvailableSpace::Definite(
                area_size.width.maybe_clamp(min_size.width, sizes.max_size.width),
            ),
            height: AvailableSpace::Definite(
                area_size.height.maybe_clamp(min_size.height, sizes.max_size.height),
            ),
        },
        SizingMode::InherentSize,
        Line::FALSE,
    );
    let size = known_dimensions
        .unwrap_or(output.size)
        .maybe_clamp(min_size, sizes.max_size);

    let (location, resolved_margin) = place_in_area(area, inset, margin, size);
    tree.set_unrounded_layout(
        child,
        &Layout {
            order,
            location,
            size,
            content_size: output.content_size,
            scrollbar_size: sides.scrollbar_gutter,
            border: sides.border,
            padding: sides.padding,
            margin: resolved_margin,
        },
    );
    content_size_contribution(location, size, output.content_size, overflow)
}

/// Lay out every absolutely positioned child of `node`. Returns their content-size contribution.
pub fn perform_absolute_layout_on_absolute_children(
    tree: &mut impl LayoutPartialTree,
    node: NodeId,
    grid: &PositionedGrid<'_>,
    inner_node_size: Size<Option<f32>>,
) -> Size<f32> {
    let mut content_size = Size::ZERO;
    let children = tree.child_ids(node).to_vec();
    for (order, child) in children.into_iter().enumerate() {
        let placement = {
            let child_style = tree.style(child);
            if child_style.box_generation_mode() == BoxGenerationMode::None
                || child_style.position != Position::Absolute
            {
                continue;
            }
            let container = tree.style(node);
            let column = AxisPlacement::resolve(
                &child_style.grid_column,
                ExplicitAxis {
                    track_count: grid.column_counts.explicit,
                    line_names: &container.grid_template_column_names,
                },
            );
            let row = AxisPlacement::resolve(
                &child_style.grid_row,
                ExplicitAxis {
                    track_count: grid.row_counts.explicit,
                    line_names: &container.grid_template_row_names,
                },
            );
            (column, row)
        };
        let area = containing_area(grid, placement.0, placement.1);
        trace!(target: "css::grid", "[GRID-ABS child={child:?}] area={area:?}");
        let order = u32::try_from(order).unwrap_or(u32::MAX);
        content_size = content_size.f32_max(layout_absolute_child(
            tree,
            child,
            order,
            area,
            inner_node_size,
        ));
    }
    content_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_orchestrator::style_model::NonRepeatedTrackSizingFunction;

    fn placed(offset: f32, size: f32) -> GridTrack {
        let mut track = GridTrack::new(NonRepeatedTrackSizingFunction::length(size));
        track.offset = offset;
        track.base_size = size;
        track
    }

    #[test]
    /// # Panics
    /// Panics if grid lines do not map to track edges or missing lines are not `None`.
    fn lines_map_to_track_edges() {
        let counts = TrackCounts::from_explicit(2);
        let tracks = [placed(10.0, 50.0), placed(70.0, 30.0)];
        assert_eq!(line_offset(0, false, counts, &tracks), Some(10.0));
        assert_eq!(line_offset(1, false, counts, &tracks), Some(70.0));
        assert_eq!(line_offset(1, true, counts, &tracks), Some(60.0));
        assert_eq!(line_offset(2, true, counts, &tracks), Some(100.0));
        assert_eq!(line_offset(2, false, counts, &tracks), Some(100.0));
        assert_eq!(line_offset(5, false, counts, &tracks), None);
    }

    #[test]
    /// # Panics
    /// Panics if a span next to a definite line is not extended from that line.
    fn spans_extend_from_definite_lines() {
        let lines = absolute_lines(AxisPlacement {
            start: OriginZeroPlacement::Span(2),
            end: OriginZeroPlacement::Line(3),
        });
        assert_eq!(lines.start, Some(1));
        assert_eq!(lines.end, Some(3));

        let auto = absolute_lines(AxisPlacement::default());
        assert_eq!(auto.start, None);
    }
}
