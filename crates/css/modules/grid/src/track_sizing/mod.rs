//! The grid sizing algorithm for one axis.
//!
//! Spec: <https://www.w3.org/TR/css-grid-2/#algo-track-sizing>
//!
//! ```text
//! initialize base sizes and growth limits
//!   ↓ (rows) baseline shims
//!   ↓ resolve intrinsic track sizes
//!   ↓ maximize tracks
//!   ↓ expand flexible tracks
//!   ↓ stretch auto tracks
//! ```

mod flexible;
mod intrinsic;

use css_orchestrator::style_model::{AlignContent, AlignItems, MaxTrackSizingFunction};
use css_orchestrator::{
    AbsoluteAxis, AvailableSpace, LayoutPartialTree, Line, ResolveOrZero as _, Size, SizingMode,
};
use tracing::trace;

use crate::items::{GridItem, other_axis_space};
use crate::types::{GridTrack, sum_of_gaps};

pub use flexible::find_size_of_fr;

/// Space below which distribution loops stop.
const DISTRIBUTION_THRESHOLD: f32 = 0.01;

/// Everything about the container that sizing one axis depends on.
#[derive(Debug, Clone, Copy)]
pub struct AxisSizing {
    /// The axis being sized
    pub axis: AbsoluteAxis,
    /// Container content-box size as far as it is known
    pub inner_node_size: Size<Option<f32>>,
    /// Container content-box minimum in this axis
    pub min_size: Option<f32>,
    /// Container content-box maximum in this axis
    pub max_size: Option<f32>,
    /// `justify-content` for columns, `align-content` for rows
    pub alignment: Option<AlignContent>,
    /// Space the tracks of this axis may fill
    pub available_space: AvailableSpace,
    /// Gutter between tracks of this axis
    pub gap: f32,
    /// Gutter between tracks of the other axis
    pub other_axis_gap: f32,
    /// Whether the other axis has been sized already
    pub other_axis_sized: bool,
}

impl AxisSizing {
    /// The container's content-box size in this axis, the percentage basis for tracks.
    #[inline]
    pub const fn inner_size(&self) -> Option<f32> {
        self.inner_node_size.get_abs(self.axis)
    }

    /// The space an item is measured under in this axis.
    pub fn item_space(&self, item: &GridItem, other_tracks: &[GridTrack]) -> Size<Option<f32>> {
        other_axis_space(
            item,
            self.axis,
            other_tracks,
            self.other_axis_gap,
            self.inner_node_size.get_abs(self.axis.other_axis()),
            self.other_axis_sized,
        )
    }
}

/// Size the tracks of one axis in place.
pub fn track_sizing_algorithm(
    tree: &mut impl LayoutPartialTree,
    sizing: &AxisSizing,
    tracks: &mut [GridTrack],
    other_tracks: &[GridTrack],
    items: &mut [GridItem],
) {
    initialize_track_sizes(tracks, sizing.inner_size());

    if sizing.axis == AbsoluteAxis::Vertical {
        resolve_item_baselines(tree, sizing, other_tracks, items);
    }

    intrinsic::resolve_intrinsic_track_sizes(tree, sizing, tracks, other_tracks, items);
    maximize_tracks(tracks, sizing);
    flexible::expand_flexible_tracks(tree, sizing, tracks, other_tracks, items);
    stretch_auto_tracks(tracks, sizing);

    trace!(
        target: "css::grid",
        "[GRID-TRACKS axis={:?}] sizes={:?}",
        sizing.axis,
        tracks.iter().map(|track| track.base_size).collect::<Vec<_>>()
    );
}

/// Initial base sizes come from fixed minimums, initial growth limits from fixed maximums.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#algo-init>
fn initialize_track_sizes(tracks: &mut [GridTrack], inner_size: Option<f32>) {
    for track in tracks {
        track.base_size = track
            .min_track_sizing_function
            .definite_value(inner_size)
            .unwrap_or(0.0);
        track.growth_limit = track
            .max_track_sizing_function
            .definite_value(inner_size)
            .unwrap_or(f32::INFINITY)
            .max(track.base_size);
        track.infinitely_growable = false;
    }
}

/// Measure baseline-aligned items of each row and shim them so that their baselines line up.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#algo-baseline-shims>
fn resolve_item_baselines(
    tree: &mut impl LayoutPartialTree,
    sizing: &AxisSizing,
    column_tracks: &[GridTrack],
    items: &mut [GridItem],
) {
    let mut row_starts: Vec<u16> = items.iter().map(|item| item.row_indexes.start).collect();
    row_starts.sort_unstable();
    row_starts.dedup();

    for row_start in row_starts {
        let in_row = |item: &GridItem| item.row_indexes.start == row_start;
        let has_baseline_item = items
            .iter()
            .any(|item| in_row(item) && item.align_self == AlignItems::Baseline);
        if !has_baseline_item {
            continue;
        }

        for item in items.iter_mut().filter(|item| in_row(item)) {
            let space = sizing.item_space(item, column_tracks);
            let known_dimensions = item.known_dimensions(sizing.inner_node_size, space);
            let output = tree.perform_child_layout(
                item.node,
                known_dimensions,
                sizing.inner_node_size,
                space.map(AvailableSpace::from),
                SizingMode::InherentSize,
                Line::FALSE,
            );
            let margin_top = item.margin.top.resolve_or_zero(sizing.inner_node_size.width);
            item.baseline = Some(output.first_baselines.y.unwrap_or(output.size.height) + margin_top);
            item.height = output.size.height;
        }

        let row_baseline = items
            .iter()
            .filter(|item| in_row(item) && item.align_self == AlignItems::Baseline)
            .filter_map(|item| item.baseline)
            .fold(0.0f32, f32::max);
        for item in items
            .iter_mut()
            .filter(|item| in_row(item) && item.align_self == AlignItems::Baseline)
        {
            item.baseline_shim = row_baseline - item.baseline.unwrap_or(row_baseline);
        }
    }
}

/// Grow base sizes into the free space, up to the growth limits.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#algo-grow-tracks>
fn maximize_tracks(tracks: &mut [GridTrack], sizing: &AxisSizing) {
    let used_space = tracks.iter().map(|track| track.base_size).sum::<f32>()
        + sum_of_gaps(tracks, sizing.gap);
    let free_space = sizing.available_space.compute_free_space(used_space);
    if free_space == f32::INFINITY {
        for track in tracks.iter_mut() {
            track.base_size = track.growth_limit;
        }
    } else if free_space > 0.0 {
        let inner_size = sizing.inner_size();
        distribute_space_up_to_limits(
            free_space,
            tracks,
            |_| true,
            |_| 1.0,
            |track| track.base_size,
            |track| track.fit_content_limited_growth_limit(inner_size),
        );
        for track in tracks.iter_mut() {
            track.base_size += track.item_incurred_increase;
            track.item_incurred_increase = 0.0;
        }
    }
}

/// With `align-content`/`justify-content` of `normal` or `stretch`, share the free space
/// equally between the tracks with an `auto` maximum.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#algo-stretch>
fn stretch_auto_tracks(tracks: &mut [GridTrack], sizing: &AxisSizing) {
    if !matches!(sizing.alignment, None | Some(AlignContent::Stretch)) {
        return;
    }
    let is_auto = |track: &GridTrack| {
        !track.is_collapsed && track.max_track_sizing_function == MaxTrackSizingFunction::Auto
    };
    let auto_track_count = tracks.iter().filter(|track| is_auto(track)).count();
    if auto_track_count == 0 {
        return;
    }

    let used_space = tracks.iter().map(|track| track.base_size).sum::<f32>()
        + sum_of_gaps(tracks, sizing.gap);
    let Some(space) = sizing.available_space.into_option().or(sizing.min_size) else {
        return;
    };
    let free_space = space - used_space;
    if free_space <= 0.0 {
        return;
    }
    let share = free_space / auto_track_count as f32;
    for track in tracks.iter_mut().filter(|track| is_auto(track)) {
        track.base_size += share;
    }
}

/// Hand `space` out to the affected tracks in proportion to `proportion`, recording each
/// track's share in `item_incurred_increase` and freezing tracks whose `property` reaches
/// `limit`. Returns the space that could not be distributed.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#extra-space>
pub fn distribute_space_up_to_limits(
    space: f32,
    tracks: &mut [GridTrack],
    is_affected: impl Fn(&GridTrack) -> bool,
    proportion: impl Fn(&GridTrack) -> f32,
    property: impl Fn(&GridTrack) -> f32,
    limit: impl Fn(&GridTrack) -> f32,
) -> f32 {
    let headroom = |track: &GridTrack| limit(track) - (property(track) + track.item_incurred_increase);
    let can_grow = |track: &GridTrack| is_affected(track) && headroom(track) > 0.0 && proportion(track) > 0.0;

    let mut remaining = space;
    while remaining > DISTRIBUTION_THRESHOLD {
        let proportion_sum: f32 = tracks
            .iter()
            .filter(|track| can_grow(track))
            .map(&proportion)
            .sum();
        if proportion_sum <= 0.0 {
            break;
        }
        let smallest_headroom = tracks
            .iter()
            .filter(|track| can_grow(track))
            .map(|track| headroom(track) / proportion(track))
            .fold(f32::INFINITY, f32::min);
        let step = smallest_headroom.min(remaining / proportion_sum);

        for track in tracks.iter_mut() {
            if can_grow(track) {
                let increase = step * proportion(track);
                track.item_incurred_increase += increase;
                remaining -= increase;
            }
        }
    }
    remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_orchestrator::style_model::{
        LengthPercentage, MinTrackSizingFunction, NonRepeatedTrackSizingFunction,
    };

    fn sizing(available_space: AvailableSpace, alignment: Option<AlignContent>) -> AxisSizing {
        AxisSizing {
            axis: AbsoluteAxis::Horizontal,
            inner_node_size: Size::NONE,
            min_size: None,
            max_size: None,
            alignment,
            available_space,
            gap: 0.0,
            other_axis_gap: 0.0,
            other_axis_sized: false,
        }
    }

    #[test]
    /// # Panics
    /// Panics if distribution overshoots a limit or fails to spread the rest.
    fn distribution_freezes_tracks_at_their_limit() {
        let mut tracks = [GridTrack::new(NonRepeatedTrackSizingFunction::AUTO); 2];
        tracks[0].growth_limit = 10.0;
        tracks[1].growth_limit = 100.0;
        let remaining = distribute_space_up_to_limits(
            60.0,
            &mut tracks,
            |_| true,
            |_| 1.0,
            |track| track.base_size,
            |track| track.growth_limit,
        );
        assert!(remaining.abs() < 0.01);
        assert!((tracks[0].item_incurred_increase - 10.0).abs() < 0.01);
        assert!((tracks[1].item_incurred_increase - 50.0).abs() < 0.01);
    }

    #[test]
    /// # Panics
    /// Panics if auto tracks are not stretched into definite free space.
    fn auto_tracks_stretch_into_free_space() {
        let mut tracks = [
            GridTrack::new(NonRepeatedTrackSizingFunction::AUTO),
            GridTrack::new(NonRepeatedTrackSizingFunction::length(40.0)),
        ];
        initialize_track_sizes(&mut tracks, None);
        stretch_auto_tracks(&mut tracks, &sizing(AvailableSpace::Definite(100.0), None));
        assert!((tracks[0].base_size - 60.0).abs() < 0.01);

        let mut packed = [GridTrack::new(NonRepeatedTrackSizingFunction::AUTO)];
        initialize_track_sizes(&mut packed, None);
        stretch_auto_tracks(
            &mut packed,
            &sizing(AvailableSpace::Definite(100.0), Some(AlignContent::Start)),
        );
        assert!(packed[0].base_size.abs() < 0.01);
    }

    #[test]
    /// # Panics
    /// Panics if percentage tracks ignore the container size or growth limits end below base sizes.
    fn initial_sizes_resolve_fixed_functions() {
        let mut tracks = [GridTrack::new(NonRepeatedTrackSizingFunction::minmax(
            MinTrackSizingFunction::Fixed(LengthPercentage::Percent(0.5)),
            MaxTrackSizingFunction::Fixed(LengthPercentage::Length(10.0)),
        ))];
        initialize_track_sizes(&mut tracks, Some(200.0));
        assert!((tracks[0].base_size - 100.0).abs() < 0.01);
        assert!((tracks[0].growth_limit - 100.0).abs() < 0.01);
    }
}
