//! Track bookkeeping shared by placement and track sizing.
//!
//! Spec: CSS Grid Layout Module Level 2
//! <https://www.w3.org/TR/css-grid-2/#grid-definition>

use core::ops::Range;

use css_orchestrator::style_model::{
    LengthPercentage, MaxTrackSizingFunction, MinTrackSizingFunction,
    NonRepeatedTrackSizingFunction,
};
use css_orchestrator::{Line, MaybeResolve as _};

/// Track counts of one axis: implicit tracks before the explicit grid, explicit tracks and
/// implicit tracks after it.
///
/// Lines are addressed in origin-zero coordinates inside the solver: line 0 starts the explicit
/// grid, lines before it are negative. Track indexes count from the first implicit track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackCounts {
    /// Implicit tracks before the explicit grid
    pub negative_implicit: u16,
    /// Explicit tracks
    pub explicit: u16,
    /// Implicit tracks after the explicit grid
    pub positive_implicit: u16,
}

impl TrackCounts {
    /// Counts for a grid with only explicit tracks.
    #[inline]
    pub const fn from_explicit(explicit: u16) -> Self {
        Self {
            negative_implicit: 0,
            explicit,
            positive_implicit: 0,
        }
    }

    /// Total number of tracks.
    #[inline]
    pub const fn len(&self) -> usize {
        self.negative_implicit as usize + self.explicit as usize + self.positive_implicit as usize
    }

    /// Whether the axis has no tracks at all.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first line of the implicit grid.
    #[inline]
    pub const fn implicit_start_line(&self) -> i16 {
        -(self.negative_implicit as i16)
    }

    /// The last line of the implicit grid.
    #[inline]
    pub const fn implicit_end_line(&self) -> i16 {
        (self.explicit + self.positive_implicit) as i16
    }

    /// Index of the track that starts at `line`. May be out of range.
    #[inline]
    pub const fn oz_line_to_next_track(&self, line: i16) -> i16 {
        line + self.negative_implicit as i16
    }

    /// Index of the track that starts at `line`, if that track exists.
    #[inline]
    pub fn oz_line_to_track(&self, line: i16) -> Option<usize> {
        usize::try_from(self.oz_line_to_next_track(line))
            .ok()
            .filter(|index| *index < self.len())
    }

    /// The line that starts the track at `index`.
    #[inline]
    pub const fn track_to_prev_oz_line(&self, index: u16) -> i16 {
        index as i16 - self.negative_implicit as i16
    }

    /// Track indexes covered by the lines `start..end`, clamped to the grid.
    #[inline]
    pub fn oz_line_range_to_track_range(&self, lines: Line<i16>) -> Range<usize> {
        let to_index = |line: i16| {
            usize::try_from(self.oz_line_to_next_track(line))
                .unwrap_or(0)
                .min(self.len())
        };
        to_index(lines.start)..to_index(lines.end)
    }
}

/// One row or column being sized.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#algo-terms>
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTrack {
    /// Generated by an `auto-fit` repetition (collapsed when empty)
    pub is_auto_fit: bool,
    /// Collapsed: zero size and no gutters
    pub is_collapsed: bool,
    /// Minimum track sizing function
    pub min_track_sizing_function: MinTrackSizingFunction,
    /// Maximum track sizing function
    pub max_track_sizing_function: MaxTrackSizingFunction,
    /// Distance from the container's border-box start, set by track alignment
    pub offset: f32,
    /// Base size
    pub base_size: f32,
    /// Growth limit (`f32::INFINITY` while unbounded)
    pub growth_limit: f32,
    /// Scratch increase contributed by the item currently being distributed
    pub item_incurred_increase: f32,
    /// Largest increase to the base size planned by the current span group
    pub base_size_planned_increase: f32,
    /// Largest increase to the growth limit planned by the current span group
    pub growth_limit_planned_increase: f32,
    /// The growth limit was infinite before the intrinsic maximums step
    pub infinitely_growable: bool,
}

impl GridTrack {
    /// A track sized by `sizing`.
    #[inline]
    pub const fn new(sizing: NonRepeatedTrackSizingFunction) -> Self {
        Self {
            is_auto_fit: false,
            is_collapsed: false,
            min_track_sizing_function: sizing.min,
            max_track_sizing_function: sizing.max,
            offset: 0.0,
            base_size: 0.0,
            growth_limit: 0.0,
            item_incurred_increase: 0.0,
            base_size_planned_increase: 0.0,
            growth_limit_planned_increase: 0.0,
            infinitely_growable: false,
        }
    }

    /// A track generated by `repeat(auto-fit, ...)`.
    #[inline]
    pub const fn auto_fit(sizing: NonRepeatedTrackSizingFunction) -> Self {
        let mut track = Self::new(sizing);
        track.is_auto_fit = true;
        track
    }

    /// Collapse an empty `auto-fit` track to a fixed zero size.
    #[inline]
    pub const fn collapse(&mut self) {
        self.is_collapsed = true;
        self.min_track_sizing_function = MinTrackSizingFunction::Fixed(LengthPercentage::ZERO);
        self.max_track_sizing_function = MaxTrackSizingFunction::Fixed(LengthPercentage::ZERO);
        self.base_size = 0.0;
        self.growth_limit = 0.0;
    }

    /// Whether the max sizing function is an `fr` value.
    #[inline]
    pub const fn is_flexible(&self) -> bool {
        self.max_track_sizing_function.is_flexible()
    }

    /// The `fr` factor, or zero.
    #[inline]
    pub const fn flex_factor(&self) -> f32 {
        self.max_track_sizing_function.flex_factor()
    }

    /// Whether either sizing function depends on a percentage.
    #[inline]
    pub const fn uses_percentage(&self) -> bool {
        self.min_track_sizing_function.uses_percentage()
            || self.max_track_sizing_function.uses_percentage()
    }

    /// Whether either sizing function depends on content.
    #[inline]
    pub const fn has_intrinsic_sizing_function(&self) -> bool {
        self.min_track_sizing_function.is_intrinsic()
            || self.max_track_sizing_function.is_intrinsic()
    }

    /// The `fit-content()` argument, or infinity for any other function.
    #[inline]
    pub fn fit_content_limit(&self, axis_inner_size: Option<f32>) -> f32 {
        match self.max_track_sizing_function {
            MaxTrackSizingFunction::FitContent(limit) => {
                limit.maybe_resolve(axis_inner_size).unwrap_or(f32::INFINITY)
            }
            MaxTrackSizingFunction::Fixed(_)
            | MaxTrackSizingFunction::MinContent
            | MaxTrackSizingFunction::MaxContent
            | MaxTrackSizingFunction::Auto
            | MaxTrackSizingFunction::Fraction(_) => f32::INFINITY,
        }
    }

    /// The growth limit capped by the `fit-content()` argument.
    #[inline]
    pub fn fit_content_limited_growth_limit(&self, axis_inner_size: Option<f32>) -> f32 {
        self.growth_limit.min(self.fit_content_limit(axis_inner_size))
    }
}

/// Total gutter space between the visible tracks of `tracks`. Collapsed tracks take no gutters.
#[inline]
pub fn sum_of_gaps(tracks: &[GridTrack], gap: f32) -> f32 {
    let visible = tracks.iter().filter(|track| !track.is_collapsed).count();
    gap * visible.saturating_sub(1) as f32
}

/// Sum of the base sizes of `tracks` plus the gutters between them.
#[inline]
pub fn sum_of_track_sizes(tracks: &[GridTrack], gap: f32) -> f32 {
    tracks.iter().map(|track| track.base_size).sum::<f32>() + sum_of_gaps(tracks, gap)
}
