//! Resolve intrinsic track sizes from item contributions.
//!
//! Spec: <https://www.w3.org/TR/css-grid-2/#algo-content>

use core::ops::Range;

use css_orchestrator::style_model::{MaxTrackSizingFunction, MinTrackSizingFunction};
use css_orchestrator::{AvailableSpace, LayoutPartialTree, MaybeMath as _, Size};

use super::{AxisSizing, distribute_space_up_to_limits};
use crate::items::GridItem;
use crate::types::GridTrack;

/// Which item size a distribution step reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contribution {
    /// The minimum contribution
    Minimum,
    /// The min-content contribution limited by the spanned maximums, floored at the minimum
    LimitedMinContent,
    /// The min-content contribution
    MinContent,
    /// The max-content contribution
    MaxContent,
}

/// Which track property a distribution step grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    BaseSize,
    GrowthLimit { mark_infinitely_growable: bool },
}

/// One distribution step: which tracks it touches and where overflowing space goes.
struct Step<Affects, Beyond> {
    contribution: Contribution,
    target: Target,
    affects: Affects,
    beyond_limits: Beyond,
    /// Share space by flex factor instead of equally
    by_flex_factor: bool,
}

/// The item's contribution of the given kind in the axis being sized.
fn item_contribution(
    tree: &mut impl LayoutPartialTree,
    sizing: &AxisSizing,
    tracks: &[GridTrack],
    item: &mut GridItem,
    space: Size<Option<f32>>,
    kind: Contribution,
) -> f32 {
    let axis = sizing.axis;
    let inner = sizing.inner_node_size;
    match kind {
        Contribution::Minimum => {
            item.minimum_contribution(tree, axis, tracks, sizing.gap, space, inner)
        }
        Contribution::LimitedMinContent => {
            let minimum = item.minimum_contribution(tree, axis, tracks, sizing.gap, space, inner);
            let limit = item.spanned_track_limit(axis, tracks, sizing.gap, sizing.inner_size());
            item.min_content_contribution(tree, axis, space, inner)
                .maybe_min(limit)
                .max(minimum)
        }
        Contribution::MinContent => item.min_content_contribution(tree, axis, space, inner),
        Contribution::MaxContent => item.max_content_contribution(tree, axis, space, inner),
    }
}

/// A growth limit as a finite number: infinite limits read as the base size.
#[inline]
fn finite_growth_limit(track: &GridTrack) -> f32 {
    if track.growth_limit == f32::INFINITY {
        track.base_size
    } else {
        track.growth_limit
    }
}

/// Raise growth limits that ended up below their base size.
fn floor_growth_limits(tracks: &mut [GridTrack]) {
    for track in tracks {
        if track.growth_limit < track.base_size {
            track.growth_limit = track.base_size;
        }
    }
}

/// Run every intrinsic sizing step for one axis.
pub(super) fn resolve_intrinsic_track_sizes(
    tree: &mut impl LayoutPartialTree,
    sizing: &AxisSizing,
    tracks: &mut [GridTrack],
    other_tracks: &[GridTrack],
    items: &mut [GridItem],
) {
    let axis = sizing.axis;
    let spaces: Vec<Size<Option<f32>>> = items
        .iter_mut()
        .map(|item| {
            let space = sizing.item_space(item, other_tracks);
            item.refresh_cache(space);
            space
        })
        .collect();

    size_single_span_items(tree, sizing, tracks, items, &spaces);

    let span_of = |index: usize| items.get(index).map_or(0, |item| item.span(axis));
    let mut spanning: Vec<usize> = (0..items.len())
        .filter(|&index| {
            items
                .get(index)
                .is_some_and(|item| item.span(axis) > 1 && !item.crosses_flexible_track(axis))
        })
        .collect();
    spanning.sort_by_key(|&index| span_of(index));
    let groups: Vec<Vec<usize>> = spanning
        .chunk_by(|&first, &second| span_of(first) == span_of(second))
        .map(<[usize]>::to_vec)
        .collect();
    for group in &groups {
        size_spanning_group(tree, sizing, tracks, items, &spaces, group);
    }

    let flexible: Vec<usize> = (0..items.len())
        .filter(|&index| {
            items
                .get(index)
                .is_some_and(|item| item.crosses_flexible_track(axis))
        })
        .collect();
    if !flexible.is_empty() {
        size_flexible_crossing_items(tree, sizing, tracks, items, &spaces, &flexible);
    }

    for track in tracks.iter_mut() {
        if track.growth_limit == f32::INFINITY {
            track.growth_limit = track.base_size;
        }
    }
    floor_growth_limits(tracks);
}

/// Items spanning one non-flexible track size that track directly.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#algo-single-span-items>
fn size_single_span_items(
    tree: &mut impl LayoutPartialTree,
    sizing: &AxisSizing,
    tracks: &mut [GridTrack],
    items: &mut [GridItem],
    spaces: &[Size<Option<f32>>],
) {
    let axis = sizing.axis;
    let constrained = !sizing.available_space.is_definite();
    for (item, &space) in items.iter_mut().zip(spaces) {
        if item.span(axis) != 1 || item.crosses_flexible_track(axis) {
            continue;
        }
        let index = item.track_range(axis).start;
        let Some(track) = tracks.get(index).copied() else {
            continue;
        };
        let mut contribution = |kind| item_contribution(tree, sizing, tracks, item, space, kind);

        let base_size = match track.min_track_sizing_function {
            MinTrackSizingFunction::Fixed(_) => None,
            MinTrackSizingFunction::MinContent => Some(contribution(Contribution::MinContent)),
            MinTrackSizingFunction::MaxContent => Some(contribution(Contribution::MaxContent)),
            MinTrackSizingFunction::Auto if constrained => {
                Some(contribution(Contribution::LimitedMinContent))
            }
            MinTrackSizingFunction::Auto => Some(contribution(Contribution::Minimum)),
        };
        let growth_limit = match track.max_track_sizing_function {
            MaxTrackSizingFunction::MinContent => Some(contribution(Contribution::MinContent)),
            MaxTrackSizingFunction::MaxContent | MaxTrackSizingFunction::Auto => {
                Some(contribution(Contribution::MaxContent))
            }
            MaxTrackSizingFunction::FitContent(_) => {
                let min_content = contribution(Contribution::MinContent);
                let max_content = contribution(Contribution::MaxContent);
                let limit = track.fit_content_limit(sizing.inner_size());
                Some(max_content.min(limit).max(min_content))
            }
            MaxTrackSizingFunction::Fixed(_) | MaxTrackSizingFunction::Fraction(_) => None,
        };

        let Some(target) = tracks.get_mut(index) else {
            continue;
        };
        if let Some(size) = base_size {
            target.base_size = target.base_size.max(size);
        }
        if let Some(size) = growth_limit {
            target.growth_limit = if target.growth_limit == f32::INFINITY {
                size
            } else {
                target.growth_limit.max(size)
            };
        }
    }
    floor_growth_limits(tracks);
}

/// Items of equal span, none crossing a flexible track, distribute their contributions over
/// the spanned tracks in five steps.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#algo-spanning-items>
fn size_spanning_group(
    tree: &mut impl LayoutPartialTree,
    sizing: &AxisSizing,
    tracks: &mut [GridTrack],
    items: &mut [GridItem],
    spaces: &[Size<Option<f32>>],
    group: &[usize],
) {
    let constrained = !sizing.available_space.is_definite();
    let under_max_content = sizing.available_space == AvailableSpace::MaxContent;
    let intrinsic_max = |track: &GridTrack| track.max_track_sizing_function.is_intrinsic();
    let max_content_alike =
        |track: &GridTrack| track.max_track_sizing_function.is_max_content_alike();

    let intrinsic_minimums = Step {
        contribution: if constrained {
            Contribution::LimitedMinContent
        } else {
            Contribution::Minimum
        },
        target: Target::BaseSize,
        affects: |track: &GridTrack| track.min_track_sizing_function.is_intrinsic(),
        beyond_limits: intrinsic_max,
        by_flex_factor: false,
    };
    run_step(tree, sizing, tracks, items, spaces, group, &intrinsic_minimums);

    let content_based_minimums = Step {
        contribution: Contribution::MinContent,
        target: Target::BaseSize,
        affects: |track: &GridTrack| {
            matches!(
                track.min_track_sizing_function,
                MinTrackSizingFunction::MinContent | MinTrackSizingFunction::MaxContent
            )
        },
        beyond_limits: intrinsic_max,
        by_flex_factor: false,
    };
    run_step(tree, sizing, tracks, items, spaces, group, &content_based_minimums);

    let max_content_minimums = Step {
        contribution: Contribution::MaxContent,
        target: Target::BaseSize,
        affects: |track: &GridTrack| match track.min_track_sizing_function {
            MinTrackSizingFunction::MaxContent => true,
            MinTrackSizingFunction::Auto => under_max_content,
            MinTrackSizingFunction::Fixed(_) | MinTrackSizingFunction::MinContent => false,
        },
        beyond_limits: max_content_alike,
        by_flex_factor: false,
    };
    run_step(tree, sizing, tracks, items, spaces, group, &max_content_minimums);

    floor_growth_limits(tracks);

    let intrinsic_maximums = Step {
        contribution: Contribution::MinContent,
        target: Target::GrowthLimit {
            mark_infinitely_growable: true,
        },
        affects: intrinsic_max,
        beyond_limits: intrinsic_max,
        by_flex_factor: false,
    };
    run_step(tree, sizing, tracks, items, spaces, group, &intrinsic_maximums);

    let max_content_maximums = Step {
        contribution: Contribution::MaxContent,
        target: Target::GrowthLimit {
            mark_infinitely_growable: false,
        },
        affects: max_content_alike,
        beyond_limits: max_content_alike,
        by_flex_factor: false,
    };
    run_step(tree, sizing, tracks, items, spaces, group, &max_content_maximums);
}

/// Items crossing a flexible track grow only the flexible tracks with an intrinsic minimum,
/// in proportion to their flex factors.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#algo-spanning-flex-items>
fn size_flexible_crossing_items(
    tree: &mut impl LayoutPartialTree,
    sizing: &AxisSizing,
    tracks: &mut [GridTrack],
    items: &mut [GridItem],
    spaces: &[Size<Option<f32>>],
    group: &[usize],
) {
    let steps: [(Contribution, fn(MinTrackSizingFunction) -> bool); 3] = [
        (Contribution::Minimum, MinTrackSizingFunction::is_intrinsic),
        (Contribution::MinContent, |function| {
            matches!(
                function,
                MinTrackSizingFunction::MinContent | MinTrackSizingFunction::MaxContent
            )
        }),
        (Contribution::MaxContent, |function| {
            function == MinTrackSizingFunction::MaxContent
        }),
    ];
    for (contribution, accepts) in steps {
        let affects =
            |track: &GridTrack| track.is_flexible() && accepts(track.min_track_sizing_function);
        let step = Step {
            contribution,
            target: Target::BaseSize,
            affects,
            beyond_limits: affects,
            by_flex_factor: true,
        };
        run_step(tree, sizing, tracks, items, spaces, group, &step);
    }
    floor_growth_limits(tracks);
}

/// Distribute each item's extra space over its affected tracks, then commit the largest planned
/// increase per track.
fn run_step<Affects, Beyond>(
    tree: &mut impl LayoutPartialTree,
    sizing: &AxisSizing,
    tracks: &mut [GridTrack],
    items: &mut [GridItem],
    spaces: &[Size<Option<f32>>],
    group: &[usize],
    step: &Step<Affects, Beyond>,
) where
    Affects: Fn(&GridTrack) -> bool,
    Beyond: Fn(&GridTrack) -> bool,
{
    let axis = sizing.axis;
    for &index in group {
        let (Some(item), Some(&space)) = (items.get_mut(index), spaces.get(index)) else {
            continue;
        };
        let range: Range<usize> = item.track_range(axis);
        let spans_affected_track = tracks
            .get(range.clone())
            .is_some_and(|spanned| spanned.iter().any(|track| (step.affects)(track)));
        if !spans_affected_track {
            continue;
        }
        let contribution = item_contribution(tree, sizing, tracks, item, space, step.contribution);
        if let Some(spanned) = tracks.get_mut(range) {
            distribute_item_space(sizing, spanned, contribution, step);
        }
    }

    for track in tracks.iter_mut() {
        match step.target {
            Target::BaseSize => {
                track.base_size += track.base_size_planned_increase;
                track.base_size_planned_increase = 0.0;
            }
            Target::GrowthLimit {
                mark_infinitely_growable,
            } => {
                let increase = track.growth_limit_planned_increase;
                track.growth_limit_planned_increase = 0.0;
                if increase > 0.0 {
                    if track.growth_limit == f32::INFINITY {
                        track.growth_limit = track.base_size + increase;
                        track.infinitely_growable = mark_infinitely_growable;
                    } else {
                        track.growth_limit += increase;
                    }
                }
                if !mark_infinitely_growable {
                    track.infinitely_growable = false;
                }
            }
        }
    }
}

/// Spread one item's contribution over the tracks it spans and record the planned increase.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#extra-space>
fn distribute_item_space<Affects, Beyond>(
    sizing: &AxisSizing,
    spanned: &mut [GridTrack],
    contribution: f32,
    step: &Step<Affects, Beyond>,
) where
    Affects: Fn(&GridTrack) -> bool,
    Beyond: Fn(&GridTrack) -> bool,
{
    let inner_size = sizing.inner_size();
    let gaps = sizing.gap * spanned.len().saturating_sub(1) as f32;
    let current: f32 = match step.target {
        Target::BaseSize => spanned.iter().map(|track| track.base_size).sum(),
        Target::GrowthLimit { .. } => spanned.iter().map(finite_growth_limit).sum(),
    };
    let space = contribution - current - gaps;
    if space <= 0.0 {
        return;
    }

    let flex_sum: f32 = spanned
        .iter()
        .filter(|track| (step.affects)(track))
        .map(GridTrack::flex_factor)
        .sum();
    let proportion = |track: &GridTrack| {
        if step.by_flex_factor && flex_sum > 0.0 {
            track.flex_factor()
        } else {
            1.0
        }
    };

    let any_beyond = spanned
        .iter()
        .any(|track| (step.affects)(track) && (step.beyond_limits)(track));
    let receives_beyond = |track: &GridTrack| {
        (step.affects)(track) && (!any_beyond || (step.beyond_limits)(track))
    };

    match step.target {
        Target::BaseSize => {
            let remaining = distribute_space_up_to_limits(
                space,
                spanned,
                &step.affects,
                proportion,
                |track| track.base_size,
                |track| track.fit_content_limited_growth_limit(inner_size),
            );
            if remaining > 0.0 {
                distribute_space_up_to_limits(
                    remaining,
                    spanned,
                    receives_beyond,
                    proportion,
                    |track| track.base_size,
                    |_| f32::INFINITY,
                );
            }
        }
        Target::GrowthLimit { .. } => {
            let remaining = distribute_space_up_to_limits(
                space,
                spanned,
                &step.affects,
                proportion,
                finite_growth_limit,
                |track| {
                    if track.infinitely_growable || track.growth_limit == f32::INFINITY {
                        track.fit_content_limit(inner_size)
                    } else {
                        track.growth_limit
                    }
                },
            );
            if remaining > 0.0 {
                distribute_space_up_to_limits(
                    remaining,
                    spanned,
                    receives_beyond,
                    proportion,
                    finite_growth_limit,
                    |track| track.fit_content_limit(inner_size),
                );
            }
        }
    }

    for track in spanned.iter_mut() {
        match step.target {
            Target::BaseSize => {
                track.base_size_planned_increase =
                    track.base_size_planned_increase.max(track.item_incurred_increase);
            }
            Target::GrowthLimit { .. } => {
                track.growth_limit_planned_increase = track
                    .growth_limit_planned_increase
                    .max(track.item_incurred_increase);
            }
        }
        track.item_incurred_increase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_orchestrator::AbsoluteAxis;
    use css_orchestrator::style_model::NonRepeatedTrackSizingFunction;

    fn sizing() -> AxisSizing {
        AxisSizing {
            axis: AbsoluteAxis::Horizontal,
            inner_node_size: Size::NONE,
            min_size: None,
            max_size: None,
            alignment: None,
            available_space: AvailableSpace::Definite(500.0),
            gap: 10.0,
            other_axis_gap: 0.0,
            other_axis_sized: false,
        }
    }

    #[test]
    /// # Panics
    /// Panics if extra space is not shared equally or gutters are not subtracted.
    fn spanning_space_is_shared_between_intrinsic_tracks() {
        let mut tracks = [
            GridTrack::new(NonRepeatedTrackSizingFunction::AUTO),
            GridTrack::new(NonRepeatedTrackSizingFunction::AUTO),
            GridTrack::new(NonRepeatedTrackSizingFunction::length(20.0)),
        ];
        tracks[0].growth_limit = f32::INFINITY;
        tracks[1].growth_limit = f32::INFINITY;
        tracks[2].base_size = 20.0;
        tracks[2].growth_limit = 20.0;
        let step = Step {
            contribution: Contribution::Minimum,
            target: Target::BaseSize,
            affects: |track: &GridTrack| track.min_track_sizing_function.is_intrinsic(),
            beyond_limits: |track: &GridTrack| track.max_track_sizing_function.is_intrinsic(),
            by_flex_factor: false,
        };
        // 100 - 20 fixed - 2 gutters of 10 leaves 60 for the two auto tracks.
        distribute_item_space(&sizing(), &mut tracks, 100.0, &step);
        assert!((tracks[0].base_size_planned_increase - 30.0).abs() < 0.01);
        assert!((tracks[1].base_size_planned_increase - 30.0).abs() < 0.01);
        assert!(tracks[2].base_size_planned_increase.abs() < 0.01);
    }

    #[test]
    /// # Panics
    /// Panics if flexible tracks are not grown in proportion to their flex factors.
    fn flexible_tracks_grow_by_flex_factor() {
        let mut tracks = [
            GridTrack::new(NonRepeatedTrackSizingFunction::fr(1.0)),
            GridTrack::new(NonRepeatedTrackSizingFunction::fr(3.0)),
        ];
        for track in &mut tracks {
            track.growth_limit = f32::INFINITY;
        }
        let affects =
            |track: &GridTrack| track.is_flexible() && track.min_track_sizing_function.is_intrinsic();
        let step = Step {
            contribution: Contribution::Minimum,
            target: Target::BaseSize,
            affects,
            beyond_limits: affects,
            by_flex_factor: true,
        };
        distribute_item_space(&sizing(), &mut tracks, 90.0, &step);
        assert!((tracks[0].base_size_planned_increase - 20.0).abs() < 0.01);
        assert!((tracks[1].base_size_planned_increase - 60.0).abs() < 0.01);
    }
}
