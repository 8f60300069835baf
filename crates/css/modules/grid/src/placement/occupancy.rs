//! Which grid cells are taken, growing as items land outside the current grid.

use core::ops::Range;

use css_orchestrator::{AbsoluteAxis, Line};

use crate::types::TrackCounts;

/// The state of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellOccupancyState {
    /// Free for auto-placement
    #[default]
    Unoccupied,
    /// Taken by an item with a definite position in both axes
    DefinitelyPlaced,
    /// Taken by an auto-placed item
    AutoPlaced,
}

/// Row-major occupancy of every cell of the implicit grid.
#[derive(Debug, Clone)]
pub struct CellOccupancyMatrix {
    cells: Vec<CellOccupancyState>,
    columns: TrackCounts,
    rows: TrackCounts,
}

impl CellOccupancyMatrix {
    /// An empty matrix covering `columns` x `rows` tracks.
    pub fn with_track_counts(columns: TrackCounts, rows: TrackCounts) -> Self {
        Self {
            cells: vec![CellOccupancyState::Unoccupied; columns.len() * rows.len()],
            columns,
            rows,
        }
    }

    /// Track counts of `axis` (`Horizontal` is the columns).
    #[inline]
    pub const fn track_counts(&self, axis: AbsoluteAxis) -> &TrackCounts {
        match axis {
            AbsoluteAxis::Horizontal => &self.columns,
            AbsoluteAxis::Vertical => &self.rows,
        }
    }

    /// The state of the cell at the given track indexes.
    #[inline]
    fn cell(&self, row: usize, column: usize) -> CellOccupancyState {
        self.cells
            .get(row * self.columns.len() + column)
            .copied()
            .unwrap_or_default()
    }

    /// Grow the grid so that the line ranges `rows` and `columns` fit inside it, keeping the
    /// state of every existing cell.
    pub fn expand_to_fit_range(&mut self, rows: Line<i16>, columns: Line<i16>) {
        let grow = |counts: TrackCounts, lines: Line<i16>| {
            let before = (counts.implicit_start_line() - lines.start).max(0).unsigned_abs();
            let after = (lines.end - counts.implicit_end_line()).max(0).unsigned_abs();
            (before, after)
        };
        let (rows_before, rows_after) = grow(self.rows, rows);
        let (columns_before, columns_after) = grow(self.columns, columns);
        if rows_before == 0 && rows_after == 0 && columns_before == 0 && columns_after == 0 {
            return;
        }

        let new_rows = TrackCounts {
            negative_implicit: self.rows.negative_implicit + rows_before,
            explicit: self.rows.explicit,
            positive_implicit: self.rows.positive_implicit + rows_after,
        };
        let new_columns = TrackCounts {
            negative_implicit: self.columns.negative_implicit + columns_before,
            explicit: self.columns.explicit,
            positive_implicit: self.columns.positive_implicit + columns_after,
        };
        let mut cells = vec![CellOccupancyState::Unoccupied; new_columns.len() * new_rows.len()];
        for row in 0..self.rows.len() {
            for column in 0..self.columns.len() {
                let target = (row + usize::from(rows_before)) * new_columns.len()
                    + column
                    + usize::from(columns_before);
                cells[target] = self.cell(row, column);
            }
        }
        self.cells = cells;
        self.rows = new_rows;
        self.columns = new_columns;
    }

    /// Orient a primary/secondary area as (rows, columns).
    #[inline]
    const fn rows_and_columns(
        primary_axis: AbsoluteAxis,
        primary: Line<i16>,
        secondary: Line<i16>,
    ) -> (Line<i16>, Line<i16>) {
        match primary_axis {
            AbsoluteAxis::Horizontal => (secondary, primary),
            AbsoluteAxis::Vertical => (primary, secondary),
        }
    }

    /// Track index ranges covered by an area, clamped to the grid.
    fn track_ranges(&self, rows: Line<i16>, columns: Line<i16>) -> (Range<usize>, Range<usize>) {
        (
            self.rows.oz_line_range_to_track_range(rows),
            self.columns.oz_line_range_to_track_range(columns),
        )
    }

    /// Mark an area, expanding the grid first if it lies partly outside.
    pub fn mark_area_as(
        &mut self,
        primary_axis: AbsoluteAxis,
        primary: Line<i16>,
        secondary: Line<i16>,
        value: CellOccupancyState,
    ) {
        let (rows, columns) = Self::rows_and_columns(primary_axis, primary, secondary);
        self.expand_to_fit_range(rows, columns);
        let (row_range, column_range) = self.track_ranges(rows, columns);
        let width = self.columns.len();
        for row in row_range {
            for column in column_range.clone() {
                if let Some(cell) = self.cells.get_mut(row * width + column) {
                    *cell = value;
                }
            }
        }
    }

    /// Whether every cell of the area is free. Cells outside the grid count as free.
    pub fn line_area_is_unoccupied(
        &self,
        primary_axis: AbsoluteAxis,
        primary: Line<i16>,
        secondary: Line<i16>,
    ) -> bool {
        let (rows, columns) = Self::rows_and_columns(primary_axis, primary, secondary);
        let (row_range, column_range) = self.track_ranges(rows, columns);
        row_range.into_iter().all(|row| {
            column_range
                .clone()
                .all(|column| self.cell(row, column) == CellOccupancyState::Unoccupied)
        })
    }

    /// The end line, along `axis`, of the last cell of kind `kind` in the track of the other
    /// axis that starts at `start_line`.
    pub fn last_of_type(
        &self,
        axis: AbsoluteAxis,
        start_line: i16,
        kind: CellOccupancyState,
    ) -> Option<i16> {
        let other = self.track_counts(axis.other_axis()).oz_line_to_track(start_line)?;
        let counts = *self.track_counts(axis);
        let last = (0..counts.len()).rev().find(|index| {
            let state = match axis {
                AbsoluteAxis::Horizontal => self.cell(other, *index),
                AbsoluteAxis::Vertical => self.cell(*index, other),
            };
            state == kind
        })?;
        Some(counts.track_to_prev_oz_line(u16::try_from(last + 1).unwrap_or(u16::MAX)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// # Panics
    /// Panics if marking outside the grid loses existing cells or fails to grow it.
    fn marking_outside_grows_grid() {
        let mut matrix =
            CellOccupancyMatrix::with_track_counts(TrackCounts::from_explicit(2), TrackCounts::from_explicit(1));
        matrix.mark_area_as(
            AbsoluteAxis::Horizontal,
            Line { start: 0, end: 1 },
            Line { start: 0, end: 1 },
            CellOccupancyState::DefinitelyPlaced,
        );
        matrix.mark_area_as(
            AbsoluteAxis::Horizontal,
            Line { start: -1, end: 0 },
            Line { start: 1, end: 3 },
            CellOccupancyState::AutoPlaced,
        );
        let columns = *matrix.track_counts(AbsoluteAxis::Horizontal);
        let rows = *matrix.track_counts(AbsoluteAxis::Vertical);
        assert_eq!(columns.negative_implicit, 1);
        assert_eq!(rows.positive_implicit, 2);
        assert!(!matrix.line_area_is_unoccupied(
            AbsoluteAxis::Horizontal,
            Line { start: 0, end: 1 },
            Line { start: 0, end: 1 },
        ));
        assert!(matrix.line_area_is_unoccupied(
            AbsoluteAxis::Horizontal,
            Line { start: 1, end: 4 },
            Line { start: 0, end: 1 },
        ));
        assert_eq!(
            matrix.last_of_type(AbsoluteAxis::Horizontal, 2, CellOccupancyState::AutoPlaced),
            Some(0)
        );
        assert_eq!(
            matrix.last_of_type(AbsoluteAxis::Horizontal, 0, CellOccupancyState::AutoPlaced),
            None
        );
    }
}
