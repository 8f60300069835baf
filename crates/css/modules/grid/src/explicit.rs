//! The explicit grid: `repeat()` expansion, implicit track patterns and named lines.
//!
//! Spec: <https://www.w3.org/TR/css-grid-2/#explicit-grids>

use css_orchestrator::style_model::{
    GridTrackRepetition, LengthPercentage, NonRepeatedTrackSizingFunction, TrackSizingFunction,
};
use css_orchestrator::ResolveOrZero as _;
use smallvec::SmallVec;
use tracing::trace;

use crate::types::{GridTrack, TrackCounts};

/// The space an auto repetition has to fit into.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AutoRepeatSpace {
    /// Inner size or max size of the container: repeat as often as fits without overflowing
    pub definite: Option<f32>,
    /// Inner min size of the container: repeat until the minimum is reached
    pub minimum: Option<f32>,
}

/// The size a track counts as when fitting repetitions: its max sizing function if definite,
/// otherwise its min sizing function.
fn fixed_track_size(track: &NonRepeatedTrackSizingFunction, basis: Option<f32>) -> Option<f32> {
    track
        .max
        .definite_value(basis)
        .or_else(|| track.min.definite_value(basis))
}

/// Number of times a `repeat(auto-fill | auto-fit, ...)` entry repeats.
///
/// Returns zero when the template has no auto repetition and one when the repeated tracks have
/// no definite size or the container offers no definite space.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#auto-repeat>
pub fn auto_repetition_count(
    template: &[TrackSizingFunction],
    gap: LengthPercentage,
    space: AutoRepeatSpace,
) -> u16 {
    let Some(repeated) = template.iter().find_map(|entry| match entry {
        TrackSizingFunction::Repeat(
            GridTrackRepetition::AutoFill | GridTrackRepetition::AutoFit,
            tracks,
        ) => Some(tracks),
        TrackSizingFunction::Single(_) | TrackSizingFunction::Repeat(_, _) => None,
    }) else {
        return 0;
    };
    let Some(available) = space.definite.or(space.minimum) else {
        return 1;
    };

    let basis = space.definite;
    let gap = gap.resolve_or_zero(basis);
    let Some(repetition_tracks_size) = repeated
        .iter()
        .map(|track| fixed_track_size(track, basis))
        .sum::<Option<f32>>()
    else {
        return 1;
    };

    let mut fixed_tracks_size = 0.0;
    let mut fixed_track_count = 0usize;
    for entry in template {
        match entry {
            TrackSizingFunction::Single(track) => {
                fixed_tracks_size += fixed_track_size(track, basis).unwrap_or(0.0);
                fixed_track_count += 1;
            }
            TrackSizingFunction::Repeat(GridTrackRepetition::Count(count), tracks) => {
                let once: f32 = tracks
                    .iter()
                    .map(|track| fixed_track_size(track, basis).unwrap_or(0.0))
                    .sum();
                fixed_tracks_size += once * f32::from(*count);
                fixed_track_count += tracks.len() * usize::from(*count);
            }
            TrackSizingFunction::Repeat(_, _) => {}
        }
    }

    // Gutters between the fixed tracks; with no fixed tracks one gutter too many is counted
    // per repetition, which this cancels.
    let fixed_space = fixed_tracks_size + gap * (fixed_track_count as f32 - 1.0);
    let per_repetition = repetition_tracks_size + gap * repeated.len() as f32;
    if per_repetition <= 0.0 {
        return 1;
    }

    let fitting = (available - fixed_space) / per_repetition;
    let count = if space.definite.is_some() {
        fitting.floor()
    } else {
        fitting.ceil()
    };
    trace!(target: "css::grid", "[GRID-REPEAT] available={available} repetitions={count}");
    count.clamp(1.0, f32::from(u16::MAX)) as u16
}

/// Number of explicit tracks the template defines once auto repetitions are expanded.
pub fn explicit_track_count(template: &[TrackSizingFunction], auto_repetitions: u16) -> u16 {
    let count: usize = template
        .iter()
        .map(|entry| match entry {
            TrackSizingFunction::Single(_) => 1,
            TrackSizingFunction::Repeat(GridTrackRepetition::Count(count), tracks) => {
                usize::from(*count) * tracks.len()
            }
            TrackSizingFunction::Repeat(_, tracks) => usize::from(auto_repetitions) * tracks.len(),
        })
        .sum();
    u16::try_from(count).unwrap_or(u16::MAX)
}

/// Build the tracks of one axis: implicit tracks before the explicit grid, the expanded template,
/// then implicit tracks after it.
///
/// Implicit tracks cycle through `auto_tracks`; before the explicit grid the pattern runs
/// backwards so the track adjacent to the explicit grid gets the last size.
pub fn initialize_grid_tracks(
    counts: TrackCounts,
    template: &[TrackSizingFunction],
    auto_tracks: &[NonRepeatedTrackSizingFunction],
    auto_repetitions: u16,
) -> Vec<GridTrack> {
    let mut tracks = Vec::with_capacity(counts.len());
    let pattern_len = auto_tracks.len();
    let implicit = |index: usize| {
        auto_tracks
            .get(index % pattern_len.max(1))
            .copied()
            .unwrap_or(NonRepeatedTrackSizingFunction::AUTO)
    };

    for distance in (1..=usize::from(counts.negative_implicit)).rev() {
        let index = (pattern_len - distance % pattern_len.max(1)) % pattern_len.max(1);
        tracks.push(GridTrack::new(implicit(index)));
    }

    for entry in template {
        match entry {
            TrackSizingFunction::Single(track) => tracks.push(GridTrack::new(*track)),
            TrackSizingFunction::Repeat(GridTrackRepetition::Count(count), repeated) => {
                for _ in 0..*count {
                    tracks.extend(repeated.iter().copied().map(GridTrack::new));
                }
            }
            TrackSizingFunction::Repeat(GridTrackRepetition::AutoFill, repeated) => {
                for _ in 0..auto_repetitions {
                    tracks.extend(repeated.iter().copied().map(GridTrack::new));
                }
            }
            TrackSizingFunction::Repeat(GridTrackRepetition::AutoFit, repeated) => {
                for _ in 0..auto_repetitions {
                    tracks.extend(repeated.iter().copied().map(GridTrack::auto_fit));
                }
            }
        }
    }

    for index in 0..usize::from(counts.positive_implicit) {
        tracks.push(GridTrack::new(implicit(index)));
    }
    tracks
}

/// Origin-zero lines of the explicit grid that carry `name`, in ascending order.
///
/// `line_names[i]` lists the names of explicit line `i + 1`, which is origin-zero line `i`.
pub fn lines_named(line_names: &[Vec<String>], name: &str) -> SmallVec<i16, 4> {
    line_names
        .iter()
        .enumerate()
        .filter(|(_, names)| names.iter().any(|candidate| candidate == name))
        .map(|(index, _)| i16::try_from(index).unwrap_or(i16::MAX))
        .collect()
}

/// Resolve `name nth` to an origin-zero line.
///
/// When fewer than `nth` explicit lines carry the name, every implicit line is assumed to carry
/// it. A name no explicit line carries resolves to `None`.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#line-placement>
pub fn resolve_named_line(
    line_names: &[Vec<String>],
    name: &str,
    nth: i16,
    explicit: u16,
) -> Option<i16> {
    let lines = lines_named(line_names, name);
    if lines.is_empty() {
        return None;
    }
    let found = i16::try_from(lines.len()).unwrap_or(i16::MAX);
    let explicit_end = i16::try_from(explicit).unwrap_or(i16::MAX);
    if nth >= 0 {
        let nth = nth.max(1);
        Some(if nth <= found {
            lines[usize::from(nth.unsigned_abs()) - 1]
        } else {
            explicit_end + (nth - found)
        })
    } else {
        let from_end = nth.saturating_neg();
        Some(if from_end <= found {
            lines[lines.len() - usize::from(from_end.unsigned_abs())]
        } else {
            -(from_end - found)
        })
    }
}

/// Resolve `span name count` relative to the definite line `from`, searching forwards (towards
/// the end) or backwards. Returns `None` if no explicit line carries the name.
pub fn resolve_named_span(
    line_names: &[Vec<String>],
    name: &str,
    count: u16,
    from: i16,
    forwards: bool,
    explicit: u16,
) -> Option<i16> {
    let lines = lines_named(line_names, name);
    if lines.is_empty() {
        return None;
    }
    let count = usize::from(count.max(1));
    let explicit_end = i16::try_from(explicit).unwrap_or(i16::MAX);
    let candidates: SmallVec<i16, 4> = if forwards {
        lines.iter().copied().filter(|line| *line > from).collect()
    } else {
        lines.iter().rev().copied().filter(|line| *line < from).collect()
    };
    if let Some(line) = candidates.get(count - 1) {
        return Some(*line);
    }
    let missing = i16::try_from(count - candidates.len()).unwrap_or(i16::MAX);
    Some(if forwards {
        explicit_end.max(from) + missing
    } else {
        0.min(from) - missing
    })
}
