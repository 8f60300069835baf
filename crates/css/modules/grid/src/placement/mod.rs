//! Grid item placement.
//!
//! Spec: <https://www.w3.org/TR/css-grid-2/#placement>
//!
//! Style placements are first converted to origin-zero lines: line 0 is the start of the explicit
//! grid and negative lines lie before it, so the implicit grid can grow in both directions
//! without renumbering anything. Placement then runs the three passes of the auto-placement
//! algorithm against a [`CellOccupancyMatrix`].

mod occupancy;

use css_orchestrator::style_model::{GridAutoFlow, GridPlacement};
use css_orchestrator::{AbsoluteAxis, Line};
use tracing::{debug, trace};

pub use occupancy::{CellOccupancyMatrix, CellOccupancyState};

use crate::explicit::{resolve_named_line, resolve_named_span};
use crate::types::TrackCounts;

/// One end of a placement in origin-zero coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OriginZeroPlacement {
    /// Placed automatically
    #[default]
    Auto,
    /// A definite origin-zero line
    Line(i16),
    /// Span a number of tracks
    Span(u16),
}

/// What an axis of the explicit grid needs for resolving style placements.
#[derive(Debug, Clone, Copy)]
pub struct ExplicitAxis<'names> {
    /// Number of explicit tracks
    pub track_count: u16,
    /// Names of the explicit lines, `line_names[i]` being line `i + 1`
    pub line_names: &'names [Vec<String>],
}

impl ExplicitAxis<'_> {
    /// Convert a CSS line number to an origin-zero line. Line `0` is invalid and means `auto`.
    fn line(&self, number: i16) -> OriginZeroPlacement {
        let explicit = i16::try_from(self.track_count).unwrap_or(i16::MAX);
        match number {
            0 => OriginZeroPlacement::Auto,
            positive if positive > 0 => OriginZeroPlacement::Line(positive - 1),
            negative => OriginZeroPlacement::Line(explicit + 1 + negative),
        }
    }

    fn named_line(&self, name: &str, nth: i16) -> OriginZeroPlacement {
        resolve_named_line(self.line_names, name, nth, self.track_count).map_or_else(
            || {
                debug!(
                    target: "css::grid",
                    "[GRID-PLACE] unknown line name {name:?}, treating as auto"
                );
                OriginZeroPlacement::Auto
            },
            OriginZeroPlacement::Line,
        )
    }
}

/// The start and end placement of an item in one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisPlacement {
    /// Start of the item
    pub start: OriginZeroPlacement,
    /// End of the item
    pub end: OriginZeroPlacement,
}

impl AxisPlacement {
    /// Resolve a style placement against the explicit grid.
    ///
    /// A named span is resolved by searching from the opposite line when that line is definite;
    /// otherwise it counts as a span of one.
    pub fn resolve(placement: &Line<GridPlacement>, axis: ExplicitAxis<'_>) -> Self {
        let simple = |value: &GridPlacement| match value {
            GridPlacement::Auto => OriginZeroPlacement::Auto,
            GridPlacement::Line(number) => axis.line(*number),
            GridPlacement::Span(count) => OriginZeroPlacement::Span((*count).max(1)),
            GridPlacement::NamedLine(name, nth) => axis.named_line(name, *nth),
            GridPlacement::NamedSpan(_, _) => OriginZeroPlacement::Span(1),
        };
        let mut resolved = Self {
            start: simple(&placement.start),
            end: simple(&placement.end),
        };

        if let (GridPlacement::NamedSpan(name, count), OriginZeroPlacement::Line(end)) =
            (&placement.start, resolved.end)
        {
            resolved.start =
                resolve_named_span(axis.line_names, name, *count, end, false, axis.track_count)
                    .map_or(OriginZeroPlacement::Span(1), OriginZeroPlacement::Line);
        }
        if let (OriginZeroPlacement::Line(start), GridPlacement::NamedSpan(name, count)) =
            (resolved.start, &placement.end)
        {
            resolved.end =
                resolve_named_span(axis.line_names, name, *count, start, true, axis.track_count)
                    .map_or(OriginZeroPlacement::Span(1), OriginZeroPlacement::Line);
        }
        resolved
    }

    /// Whether at least one end is a definite line.
    #[inline]
    pub const fn is_definite(&self) -> bool {
        matches!(self.start, OriginZeroPlacement::Line(_))
            || matches!(self.end, OriginZeroPlacement::Line(_))
    }

    /// The number of tracks the item spans when its position is not definite.
    #[inline]
    pub const fn indefinite_span(&self) -> u16 {
        match (self.start, self.end) {
            (OriginZeroPlacement::Span(span), _) | (_, OriginZeroPlacement::Span(span)) => span,
            _ => 1,
        }
    }

    /// The lines of a definite placement. Equal lines span one track and reversed lines swap.
    ///
    /// Spec: <https://www.w3.org/TR/css-grid-2/#grid-placement-errors>
    pub fn resolve_definite_grid_lines(&self) -> Line<i16> {
        let span = |count: u16| i16::try_from(count).unwrap_or(i16::MAX);
        match (self.start, self.end) {
            (OriginZeroPlacement::Line(start), OriginZeroPlacement::Line(end)) => {
                if start == end {
                    Line {
                        start,
                        end: start + 1,
                    }
                } else {
                    Line {
                        start: start.min(end),
                        end: start.max(end),
                    }
                }
            }
            (OriginZeroPlacement::Line(start), OriginZeroPlacement::Span(count)) => Line {
                start,
                end: start + span(count),
            },
            (OriginZeroPlacement::Line(start), OriginZeroPlacement::Auto) => Line {
                start,
                end: start + 1,
            },
            (OriginZeroPlacement::Span(count), OriginZeroPlacement::Line(end)) => Line {
                start: end - span(count),
                end,
            },
            (OriginZeroPlacement::Auto, OriginZeroPlacement::Line(end)) => Line {
                start: end - 1,
                end,
            },
            (
                OriginZeroPlacement::Auto | OriginZeroPlacement::Span(_),
                OriginZeroPlacement::Auto | OriginZeroPlacement::Span(_),
            ) => Line { start: 0, end: 1 },
        }
    }

    /// The extent of the placement in lines: (first line, last line, span).
    fn extent(&self) -> (i16, i16, u16) {
        if self.is_definite() {
            let lines = self.resolve_definite_grid_lines();
            (lines.start, lines.end, (lines.end - lines.start).unsigned_abs())
        } else {
            (0, 0, self.indefinite_span())
        }
    }
}

/// The placement of one item in both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemPlacement {
    /// Column placement
    pub column: AxisPlacement,
    /// Row placement
    pub row: AxisPlacement,
}

impl ItemPlacement {
    /// The placement in `axis` (`Horizontal` is the columns).
    #[inline]
    pub const fn get(&self, axis: AbsoluteAxis) -> AxisPlacement {
        match axis {
            AbsoluteAxis::Horizontal => self.column,
            AbsoluteAxis::Vertical => self.row,
        }
    }
}

/// The grid area an item was placed into, in origin-zero lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridArea {
    /// Column lines
    pub column: Line<i16>,
    /// Row lines
    pub row: Line<i16>,
}

impl GridArea {
    fn from_primary(primary_axis: AbsoluteAxis, primary: Line<i16>, secondary: Line<i16>) -> Self {
        match primary_axis {
            AbsoluteAxis::Horizontal => Self {
                column: primary,
                row: secondary,
            },
            AbsoluteAxis::Vertical => Self {
                column: secondary,
                row: primary,
            },
        }
    }

    /// The (primary, secondary) lines for a flow whose primary axis is `primary_axis`.
    #[inline]
    pub const fn primary_and_secondary(&self, primary_axis: AbsoluteAxis) -> (Line<i16>, Line<i16>) {
        match primary_axis {
            AbsoluteAxis::Horizontal => (self.column, self.row),
            AbsoluteAxis::Vertical => (self.row, self.column),
        }
    }
}

/// Estimate the track counts of one axis from the explicit grid and the items' placements, so
/// the occupancy matrix rarely has to grow.
fn estimate_axis(explicit: u16, placements: &[AxisPlacement]) -> TrackCounts {
    let explicit_end = i16::try_from(explicit).unwrap_or(i16::MAX);
    let (min_line, max_line, max_span) = placements.iter().fold(
        (0i16, explicit_end, 0u16),
        |(min_line, max_line, max_span), placement| {
            let (start, end, span) = placement.extent();
            (min_line.min(start), max_line.max(end), max_span.max(span))
        },
    );
    let negative_implicit = min_line.saturating_neg().max(0).unsigned_abs();
    let mut positive_implicit = (max_line - explicit_end).max(0).unsigned_abs();
    let total = negative_implicit + explicit + positive_implicit;
    if total < max_span {
        positive_implicit = max_span - explicit - negative_implicit;
    }
    TrackCounts {
        negative_implicit,
        explicit,
        positive_implicit,
    }
}

/// Initial (columns, rows) track counts for the occupancy matrix.
pub fn compute_grid_size_estimate(
    explicit_columns: u16,
    explicit_rows: u16,
    placements: &[ItemPlacement],
) -> (TrackCounts, TrackCounts) {
    let columns: Vec<AxisPlacement> = placements.iter().map(|placement| placement.column).collect();
    let rows: Vec<AxisPlacement> = placements.iter().map(|placement| placement.row).collect();
    (
        estimate_axis(explicit_columns, &columns),
        estimate_axis(explicit_rows, &rows),
    )
}

/// Find room for an item whose secondary-axis position is definite and whose primary-axis
/// position is not.
fn place_definite_secondary_axis_item(
    matrix: &CellOccupancyMatrix,
    placement: &ItemPlacement,
    auto_flow: GridAutoFlow,
) -> GridArea {
    let primary_axis = auto_flow.primary_axis();
    let secondary = placement
        .get(primary_axis.other_axis())
        .resolve_definite_grid_lines();
    let span = i16::try_from(placement.get(primary_axis).indefinite_span()).unwrap_or(i16::MAX);
    let grid_start = matrix.track_counts(primary_axis).implicit_start_line();
    let mut position = if auto_flow.is_dense() {
        grid_start
    } else {
        matrix
            .last_of_type(primary_axis, secondary.start, CellOccupancyState::AutoPlaced)
            .unwrap_or(grid_start)
    };
    loop {
        let primary = Line {
            start: position,
            end: position + span,
        };
        if matrix.line_area_is_unoccupied(primary_axis, primary, secondary) {
            return GridArea::from_primary(primary_axis, primary, secondary);
        }
        position += 1;
    }
}

/// Find room for an item with no definite secondary-axis position, starting at the cursor.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#auto-placement-algo> step 4
fn place_indefinitely_positioned_item(
    matrix: &CellOccupancyMatrix,
    placement: &ItemPlacement,
    auto_flow: GridAutoFlow,
    cursor: Line<i16>,
) -> GridArea {
    let primary_axis = auto_flow.primary_axis();
    let primary_placement = placement.get(primary_axis);
    let secondary_span =
        i16::try_from(placement.get(primary_axis.other_axis()).indefinite_span()).unwrap_or(i16::MAX);
    let primary_counts = *matrix.track_counts(primary_axis);
    let secondary_start = matrix.track_counts(primary_axis.other_axis()).implicit_start_line();
    let Line {
        start: mut primary_index,
        end: mut secondary_index,
    } = cursor;

    if primary_placement.is_definite() {
        let primary = primary_placement.resolve_definite_grid_lines();
        secondary_index = if auto_flow.is_dense() {
            secondary_start
        } else if primary.start < primary_index {
            secondary_index + 1
        } else {
            secondary_index
        };
        loop {
            let secondary = Line {
                start: secondary_index,
                end: secondary_index + secondary_span,
            };
            if matrix.line_area_is_unoccupied(primary_axis, primary, secondary) {
                return GridArea::from_primary(primary_axis, primary, secondary);
            }
            secondary_index += 1;
        }
    }

    let primary_span = i16::try_from(primary_placement.indefinite_span()).unwrap_or(i16::MAX);
    let grid_start = primary_counts.implicit_start_line();
    let grid_end = primary_counts.implicit_end_line();
    loop {
        let primary = Line {
            start: primary_index,
            end: primary_index + primary_span,
        };
        let secondary = Line {
            start: secondary_index,
            end: secondary_index + secondary_span,
        };
        // An item wider than the grid still fits at the first line of a track.
        let out_of_bounds = primary.end > grid_end && primary_index > grid_start;
        if !out_of_bounds && matrix.line_area_is_unoccupied(primary_axis, primary, secondary) {
            return GridArea::from_primary(primary_axis, primary, secondary);
        }
        if out_of_bounds {
            secondary_index += 1;
            primary_index = grid_start;
        } else {
            primary_index += 1;
        }
    }
}

/// Place every item, returning their areas in input order.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#auto-placement-algo>
pub fn place_grid_items(
    matrix: &mut CellOccupancyMatrix,
    placements: &[ItemPlacement],
    auto_flow: GridAutoFlow,
) -> Vec<GridArea> {
    let primary_axis = auto_flow.primary_axis();
    let secondary_axis = primary_axis.other_axis();
    let mut areas = vec![GridArea::default(); placements.len()];

    let mark = |grid: &mut CellOccupancyMatrix, area: GridArea, state: CellOccupancyState| {
        let (primary, secondary) = area.primary_and_secondary(primary_axis);
        grid.mark_area_as(primary_axis, primary, secondary, state);
    };

    // 1. Items with a definite position in both axes.
    for (index, placement) in placements.iter().enumerate() {
        if placement.column.is_definite() && placement.row.is_definite() {
            let area = GridArea {
                column: placement.column.resolve_definite_grid_lines(),
                row: placement.row.resolve_definite_grid_lines(),
            };
            mark(matrix, area, CellOccupancyState::DefinitelyPlaced);
            areas[index] = area;
        }
    }

    // 2. Items locked to a track of the secondary axis.
    for (index, placement) in placements.iter().enumerate() {
        if placement.get(secondary_axis).is_definite() && !placement.get(primary_axis).is_definite() {
            let area = place_definite_secondary_axis_item(matrix, placement, auto_flow);
            mark(matrix, area, CellOccupancyState::AutoPlaced);
            areas[index] = area;
        }
    }

    // 3. Everything else, in order, following the cursor.
    let start_cursor = |grid: &CellOccupancyMatrix| Line {
        start: grid.track_counts(primary_axis).implicit_start_line(),
        end: grid.track_counts(secondary_axis).implicit_start_line(),
    };
    let mut cursor = start_cursor(matrix);
    for (index, placement) in placements.iter().enumerate() {
        if placement.get(secondary_axis).is_definite() {
            continue;
        }
        if auto_flow.is_dense() {
            cursor = start_cursor(matrix);
        }
        let area = place_indefinitely_positioned_item(matrix, placement, auto_flow, cursor);
        mark(matrix, area, CellOccupancyState::AutoPlaced);
        let (primary, secondary) = area.primary_and_secondary(primary_axis);
        cursor = Line {
            start: primary.end,
            end: secondary.start,
        };
        trace!(target: "css::grid", "[GRID-PLACE item={index}] area={area:?}");
        areas[index] = area;
    }

    areas
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_NAMES: ExplicitAxis<'static> = ExplicitAxis {
        track_count: 3,
        line_names: &[],
    };

    fn auto() -> ItemPlacement {
        ItemPlacement::default()
    }

    fn place(placements: &[ItemPlacement], auto_flow: GridAutoFlow) -> Vec<GridArea> {
        let (columns, rows) = compute_grid_size_estimate(3, 0, placements);
        let mut matrix = CellOccupancyMatrix::with_track_counts(columns, rows);
        place_grid_items(&mut matrix, placements, auto_flow)
    }

    #[test]
    /// # Panics
    /// Panics if CSS line numbers are not converted to origin-zero lines.
    fn line_numbers_become_origin_zero() {
        let placement = AxisPlacement::resolve(&Line::from_lines(1, -1), NO_NAMES);
        assert_eq!(placement.resolve_definite_grid_lines(), Line { start: 0, end: 3 });
        let reversed = AxisPlacement::resolve(&Line::from_lines(3, 2), NO_NAMES);
        assert_eq!(reversed.resolve_definite_grid_lines(), Line { start: 1, end: 2 });
        let spanning = AxisPlacement::resolve(
            &Line {
                start: GridPlacement::Span(2),
                end: GridPlacement::Line(3),
            },
            NO_NAMES,
        );
        assert_eq!(spanning.resolve_definite_grid_lines(), Line { start: 0, end: 2 });
        assert!(!AxisPlacement::resolve(&Line::span(2), NO_NAMES).is_definite());
    }

    #[test]
    /// # Panics
    /// Panics if auto-placed items do not fill rows left to right.
    fn sparse_row_flow_fills_rows() {
        let areas = place(&[auto(), auto(), auto(), auto()], GridAutoFlow::Row);
        assert_eq!(areas[2].column, Line { start: 2, end: 3 });
        assert_eq!(areas[3].column, Line { start: 0, end: 1 });
        assert_eq!(areas[3].row, Line { start: 1, end: 2 });
    }

    #[test]
    /// # Panics
    /// Panics if sparse packing back-fills a hole or dense packing leaves it open.
    fn dense_flow_backfills_holes() {
        let wide = ItemPlacement {
            column: AxisPlacement {
                start: OriginZeroPlacement::Span(2),
                end: OriginZeroPlacement::Auto,
            },
            row: AxisPlacement::default(),
        };
        let items = [auto(), auto(), wide, auto()];
        let sparse = place(&items, GridAutoFlow::Row);
        assert_eq!(sparse[2].row, Line { start: 1, end: 2 });
        assert_eq!(sparse[2].column, Line { start: 0, end: 2 });
        assert_eq!(sparse[3].row, Line { start: 1, end: 2 });
        assert_eq!(sparse[3].column, Line { start: 2, end: 3 });

        let dense = place(&items, GridAutoFlow::RowDense);
        assert_eq!(dense[3].row, Line { start: 0, end: 1 });
        assert_eq!(dense[3].column, Line { start: 2, end: 3 });
    }

    #[test]
    /// # Panics
    /// Panics if auto-placed items overlap a definitely placed one.
    fn auto_items_skip_definite_cells() {
        let pinned = ItemPlacement {
            column: AxisPlacement::resolve(&Line::from_lines(1, 2), NO_NAMES),
            row: AxisPlacement::resolve(&Line::from_lines(1, 2), NO_NAMES),
        };
        let areas = place(&[auto(), pinned], GridAutoFlow::Row);
        assert_eq!(areas[1].column, Line { start: 0, end: 1 });
        assert_eq!(areas[0].column, Line { start: 1, end: 2 });
        assert_eq!(areas[0].row, Line { start: 0, end: 1 });
    }

    #[test]
    /// # Panics
    /// Panics if column flow does not fill columns first.
    fn column_flow_fills_columns() {
        let placements = [auto(), auto()];
        let (columns, rows) = compute_grid_size_estimate(0, 2, &placements);
        let mut matrix = CellOccupancyMatrix::with_track_counts(columns, rows);
        let areas = place_grid_items(&mut matrix, &placements, GridAutoFlow::Column);
        assert_eq!(areas[1].row, Line { start: 1, end: 2 });
        assert_eq!(areas[1].column, Line { start: 0, end: 1 });
    }
}
