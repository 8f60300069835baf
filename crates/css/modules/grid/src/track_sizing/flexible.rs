//! Expand flexible (`fr`) tracks.
//!
//! Spec: <https://www.w3.org/TR/css-grid-2/#algo-flex-tracks>

use css_orchestrator::{AvailableSpace, LayoutPartialTree, MaybeMath as _};
use smallvec::SmallVec;
use tracing::trace;

use super::AxisSizing;
use crate::items::GridItem;
use crate::types::{GridTrack, sum_of_gaps};

/// The used length of one `fr` when `space_to_fill` is shared between `tracks`.
///
/// Flexible tracks whose base size exceeds their share are treated as inflexible and the
/// share is recomputed until it is stable.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#algo-find-fr-size>
pub fn find_size_of_fr(tracks: &[GridTrack], space_to_fill: f32, gap: f32) -> f32 {
    let mut inflexible: SmallVec<bool, 16> = tracks.iter().map(|track| !track.is_flexible()).collect();
    let gaps = sum_of_gaps(tracks, gap);
    loop {
        let (used_space, flex_sum) = tracks.iter().zip(&inflexible).fold(
            (gaps, 0.0f32),
            |(used, flex), (track, &is_inflexible)| {
                if is_inflexible {
                    (used + track.base_size, flex)
                } else {
                    (used, flex + track.flex_factor())
                }
            },
        );
        let leftover = space_to_fill - used_space;
        let hypothetical_fr_size = leftover / flex_sum.max(1.0);

        let mut changed = false;
        for (track, is_inflexible) in tracks.iter().zip(inflexible.iter_mut()) {
            if !*is_inflexible && hypothetical_fr_size * track.flex_factor() < track.base_size {
                *is_inflexible = true;
                changed = true;
            }
        }
        if !changed {
            return hypothetical_fr_size.max(0.0);
        }
    }
}

/// Grow flexible tracks to their share of the free space, or to the size their items need when
/// the free space is indefinite.
pub(super) fn expand_flexible_tracks(
    tree: &mut impl LayoutPartialTree,
    sizing: &AxisSizing,
    tracks: &mut [GridTrack],
    other_tracks: &[GridTrack],
    items: &mut [GridItem],
) {
    if !tracks.iter().any(GridTrack::is_flexible) {
        return;
    }
    let axis = sizing.axis;

    let flex_fraction = match sizing.available_space {
        AvailableSpace::MinContent => return,
        AvailableSpace::Definite(space) => find_size_of_fr(tracks, space, sizing.gap),
        AvailableSpace::MaxContent => {
            let from_tracks = tracks
                .iter()
                .filter(|track| track.is_flexible())
                .map(|track| {
                    let factor = track.flex_factor();
                    if factor > 1.0 {
                        track.base_size / factor
                    } else {
                        track.base_size
                    }
                })
                .fold(0.0f32, f32::max);

            let mut from_items = 0.0f32;
            for item in items.iter_mut().filter(|item| item.crosses_flexible_track(axis)) {
                let space = sizing.item_space(item, other_tracks);
                let contribution = item.max_content_contribution(
                    tree,
                    axis,
                    space,
                    sizing.inner_node_size,
                );
                let spanned = tracks.get(item.track_range(axis)).unwrap_or_default();
                from_items = from_items.max(find_size_of_fr(spanned, contribution, sizing.gap));
            }
            let fraction = from_tracks.max(from_items);

            // Redo against the container limits if the grid would overflow them.
            let grid_size = grid_size_with_fraction(tracks, fraction, sizing.gap);
            let clamped = grid_size.maybe_clamp(sizing.min_size, sizing.max_size);
            if (clamped - grid_size).abs() > f32::EPSILON {
                find_size_of_fr(tracks, clamped, sizing.gap)
            } else {
                fraction
            }
        }
    };

    trace!(target: "css::grid", "[GRID-FR axis={axis:?}] fr={flex_fraction}");
    for track in tracks.iter_mut().filter(|track| track.is_flexible()) {
        track.base_size = track.base_size.max(flex_fraction * track.flex_factor());
    }
}

/// The grid's size in this axis if every flexible track were `fraction` per `fr`.
fn grid_size_with_fraction(tracks: &[GridTrack], fraction: f32, gap: f32) -> f32 {
    tracks
        .iter()
        .map(|track| {
            if track.is_flexible() {
                track.base_size.max(fraction * track.flex_factor())
            } else {
                track.base_size
            }
        })
        .sum::<f32>()
        + sum_of_gaps(tracks, gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_orchestrator::style_model::NonRepeatedTrackSizingFunction;

    #[test]
    /// # Panics
    /// Panics if free space is not split by flex factor after gutters and fixed tracks.
    fn fr_share_excludes_fixed_tracks_and_gaps() {
        let mut fixed = GridTrack::new(NonRepeatedTrackSizingFunction::length(40.0));
        fixed.base_size = 40.0;
        let tracks = [
            fixed,
            GridTrack::new(NonRepeatedTrackSizingFunction::fr(1.0)),
            GridTrack::new(NonRepeatedTrackSizingFunction::fr(2.0)),
        ];
        // 200 - 40 - 2 * 10 = 140 over 3fr.
        let fraction = find_size_of_fr(&tracks, 200.0, 10.0);
        assert!((fraction - 140.0 / 3.0).abs() < 0.01);
    }

    #[test]
    /// # Panics
    /// Panics if a flexible track larger than its share is not treated as inflexible.
    fn oversized_flexible_track_is_frozen() {
        let mut wide = GridTrack::new(NonRepeatedTrackSizingFunction::fr(1.0));
        wide.base_size = 150.0;
        let tracks = [wide, GridTrack::new(NonRepeatedTrackSizingFunction::fr(1.0))];
        let fraction = find_size_of_fr(&tracks, 200.0, 0.0);
        assert!((fraction - 50.0).abs() < 0.01);
    }

    #[test]
    /// # Panics
    /// Panics if fractional flex sums below one inflate the share.
    fn small_flex_sum_counts_as_one() {
        let tracks = [GridTrack::new(NonRepeatedTrackSizingFunction::fr(0.5))];
        assert!((find_size_of_fr(&tracks, 100.0, 0.0) - 100.0).abs() < 0.01);
    }
}
