//! Grid container and grid item style values.
//!
//! Spec: <https://www.w3.org/TR/css-grid-2/>

use crate::geometry::{AbsoluteAxis, Line};
use crate::style_model::dimension::LengthPercentage;

/// `grid-auto-flow`
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#grid-auto-flow-property>
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum GridAutoFlow {
    /// Fill each row in turn, adding rows as necessary
    #[default]
    Row,
    /// Fill each column in turn, adding columns as necessary
    Column,
    /// Row flow with dense packing
    RowDense,
    /// Column flow with dense packing
    ColumnDense,
}

impl GridAutoFlow {
    /// Whether holes earlier in the grid may be back-filled.
    #[inline]
    pub const fn is_dense(self) -> bool {
        matches!(self, Self::RowDense | Self::ColumnDense)
    }

    /// The axis that auto-placement walks along first.
    #[inline]
    pub const fn primary_axis(self) -> AbsoluteAxis {
        match self {
            Self::Row | Self::RowDense => AbsoluteAxis::Horizontal,
            Self::Column | Self::ColumnDense => AbsoluteAxis::Vertical,
        }
    }
}

/// One end of a grid item placement (`grid-row-start`, `grid-column-end`, ...).
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#line-placement>
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum GridPlacement {
    /// Place automatically
    #[default]
    Auto,
    /// A CSS line number (1-based; negative numbers count from the end of the explicit grid)
    Line(i16),
    /// Span a number of tracks
    Span(u16),
    /// The nth line carrying the given name (negative counts from the end)
    NamedLine(String, i16),
    /// Span until the nth line carrying the given name
    NamedSpan(String, u16),
}

impl GridPlacement {
    /// A line placement.
    #[inline]
    pub const fn line(index: i16) -> Self {
        Self::Line(index)
    }

    /// A span placement.
    #[inline]
    pub const fn span(count: u16) -> Self {
        Self::Span(count)
    }

    /// The first line called `name`.
    #[inline]
    pub fn named(name: &str) -> Self {
        Self::NamedLine(name.to_owned(), 1)
    }
}

impl Line<GridPlacement> {
    /// `auto / auto`
    #[inline]
    pub const fn auto() -> Self {
        Self {
            start: GridPlacement::Auto,
            end: GridPlacement::Auto,
        }
    }

    /// `span count / auto`
    #[inline]
    pub const fn span(count: u16) -> Self {
        Self {
            start: GridPlacement::Span(count),
            end: GridPlacement::Auto,
        }
    }

    /// `start / end` from CSS line numbers.
    #[inline]
    pub const fn from_lines(start: i16, end: i16) -> Self {
        Self {
            start: GridPlacement::Line(start),
            end: GridPlacement::Line(end),
        }
    }
}

/// The minimum half of a track sizing function.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#min-track-sizing-function>
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum MinTrackSizingFunction {
    /// A fixed length or percentage
    Fixed(LengthPercentage),
    /// `min-content`
    MinContent,
    /// `max-content`
    MaxContent,
    /// `auto`
    Auto,
}

impl MinTrackSizingFunction {
    /// Whether sizing depends on the content of the track.
    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        matches!(self, Self::MinContent | Self::MaxContent | Self::Auto)
    }

    /// Resolve a fixed function against the grid container's inner size in this axis.
    #[inline]
    pub fn definite_value(self, parent_size: Option<f32>) -> Option<f32> {
        match self {
            Self::Fixed(LengthPercentage::Length(length)) => Some(length),
            Self::Fixed(LengthPercentage::Percent(fraction)) => {
                parent_size.map(|basis| fraction * basis)
            }
            Self::MinContent | Self::MaxContent | Self::Auto => None,
        }
    }

    /// Whether the function uses a percentage.
    #[inline]
    pub const fn uses_percentage(self) -> bool {
        matches!(self, Self::Fixed(LengthPercentage::Percent(_)))
    }
}

/// The maximum half of a track sizing function.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#max-track-sizing-function>
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum MaxTrackSizingFunction {
    /// A fixed length or percentage
    Fixed(LengthPercentage),
    /// `min-content`
    MinContent,
    /// `max-content`
    MaxContent,
    /// `fit-content(limit)`
    FitContent(LengthPercentage),
    /// `auto`
    Auto,
    /// A flexible `fr` factor
    Fraction(f32),
}

impl MaxTrackSizingFunction {
    /// Whether sizing depends on the content of the track.
    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        matches!(
            self,
            Self::MinContent | Self::MaxContent | Self::FitContent(_) | Self::Auto
        )
    }

    /// Whether the function is `max-content` or `auto` (both size to max-content).
    #[inline]
    pub const fn is_max_content_alike(self) -> bool {
        matches!(self, Self::MaxContent | Self::FitContent(_) | Self::Auto)
    }

    /// Whether the function is an `fr` value.
    #[inline]
    pub const fn is_flexible(self) -> bool {
        matches!(self, Self::Fraction(_))
    }

    /// The `fr` factor, or zero.
    #[inline]
    pub const fn flex_factor(self) -> f32 {
        match self {
            Self::Fraction(factor) => factor,
            _ => 0.0,
        }
    }

    /// Resolve a fixed function against the grid container's inner size in this axis.
    #[inline]
    pub fn definite_value(self, parent_size: Option<f32>) -> Option<f32> {
        match self {
            Self::Fixed(LengthPercentage::Length(length)) => Some(length),
            Self::Fixed(LengthPercentage::Percent(fraction)) => {
                parent_size.map(|basis| fraction * basis)
            }
            Self::MinContent
            | Self::MaxContent
            | Self::FitContent(_)
            | Self::Auto
            | Self::Fraction(_) => None,
        }
    }

    /// The `fit-content()` limit resolved against the container's inner size.
    #[inline]
    pub fn definite_limit(self, parent_size: Option<f32>) -> Option<f32> {
        match self {
            Self::FitContent(LengthPercentage::Length(length)) => Some(length),
            Self::FitContent(LengthPercentage::Percent(fraction)) => {
                parent_size.map(|basis| fraction * basis)
            }
            other => other.definite_value(parent_size),
        }
    }

    /// Whether the function uses a percentage.
    #[inline]
    pub const fn uses_percentage(self) -> bool {
        matches!(
            self,
            Self::Fixed(LengthPercentage::Percent(_)) | Self::FitContent(LengthPercentage::Percent(_))
        )
    }
}

/// A single (non-repeated) track sizing function: `minmax(min, max)` in canonical form.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct NonRepeatedTrackSizingFunction {
    /// The minimum sizing function
    pub min: MinTrackSizingFunction,
    /// The maximum sizing function
    pub max: MaxTrackSizingFunction,
}

impl NonRepeatedTrackSizingFunction {
    /// `auto`
    pub const AUTO: Self = Self {
        min: MinTrackSizingFunction::Auto,
        max: MaxTrackSizingFunction::Auto,
    };

    /// A fixed length track.
    #[inline]
    pub const fn length(value: f32) -> Self {
        Self {
            min: MinTrackSizingFunction::Fixed(LengthPercentage::Length(value)),
            max: MaxTrackSizingFunction::Fixed(LengthPercentage::Length(value)),
        }
    }

    /// A percentage track.
    #[inline]
    pub const fn percent(value: f32) -> Self {
        Self {
            min: MinTrackSizingFunction::Fixed(LengthPercentage::Percent(value)),
            max: MaxTrackSizingFunction::Fixed(LengthPercentage::Percent(value)),
        }
    }

    /// An `fr` track (`minmax(auto, <flex>)`).
    #[inline]
    pub const fn fr(factor: f32) -> Self {
        Self {
            min: MinTrackSizingFunction::Auto,
            max: MaxTrackSizingFunction::Fraction(factor),
        }
    }

    /// A `min-content` track.
    #[inline]
    pub const fn min_content() -> Self {
        Self {
            min: MinTrackSizingFunction::MinContent,
            max: MaxTrackSizingFunction::MinContent,
        }
    }

    /// A `max-content` track.
    #[inline]
    pub const fn max_content() -> Self {
        Self {
            min: MinTrackSizingFunction::MaxContent,
            max: MaxTrackSizingFunction::MaxContent,
        }
    }

    /// A `fit-content(limit)` track.
    #[inline]
    pub const fn fit_content(limit: LengthPercentage) -> Self {
        Self {
            min: MinTrackSizingFunction::Auto,
            max: MaxTrackSizingFunction::FitContent(limit),
        }
    }

    /// A `minmax(min, max)` track.
    #[inline]
    pub const fn minmax(min: MinTrackSizingFunction, max: MaxTrackSizingFunction) -> Self {
        Self { min, max }
    }

    /// Whether either half depends on a percentage.
    #[inline]
    pub const fn uses_percentage(self) -> bool {
        self.min.uses_percentage() || self.max.uses_percentage()
    }
}

impl Default for NonRepeatedTrackSizingFunction {
    #[inline]
    fn default() -> Self {
        Self::AUTO
    }
}

/// The repetition count of a `repeat()` track list.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#repeat-notation>
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum GridTrackRepetition {
    /// As many repetitions as fit, keeping empty ones
    AutoFill,
    /// As many repetitions as fit, collapsing empty ones
    AutoFit,
    /// A fixed number of repetitions
    Count(u16),
}

/// One entry of `grid-template-rows` / `grid-template-columns`.
#[derive(Clone, PartialEq, Debug)]
pub enum TrackSizingFunction {
    /// A single track
    Single(NonRepeatedTrackSizingFunction),
    /// `repeat(count, tracks...)`
    Repeat(GridTrackRepetition, Vec<NonRepeatedTrackSizingFunction>),
}

impl TrackSizingFunction {
    /// A single fixed-length track.
    #[inline]
    pub const fn length(value: f32) -> Self {
        Self::Single(NonRepeatedTrackSizingFunction::length(value))
    }

    /// A single percentage track.
    #[inline]
    pub const fn percent(value: f32) -> Self {
        Self::Single(NonRepeatedTrackSizingFunction::percent(value))
    }

    /// A single `fr` track.
    #[inline]
    pub const fn fr(factor: f32) -> Self {
        Self::Single(NonRepeatedTrackSizingFunction::fr(factor))
    }

    /// A single `auto` track.
    #[inline]
    pub const fn auto() -> Self {
        Self::Single(NonRepeatedTrackSizingFunction::AUTO)
    }

    /// A single `minmax()` track.
    #[inline]
    pub const fn minmax(min: MinTrackSizingFunction, max: MaxTrackSizingFunction) -> Self {
        Self::Single(NonRepeatedTrackSizingFunction::minmax(min, max))
    }

    /// `repeat(repetition, tracks...)`
    #[inline]
    pub const fn repeat(
        repetition: GridTrackRepetition,
        tracks: Vec<NonRepeatedTrackSizingFunction>,
    ) -> Self {
        Self::Repeat(repetition, tracks)
    }

    /// Whether this is an `auto-fill`/`auto-fit` repetition.
    #[inline]
    pub const fn is_auto_repetition(&self) -> bool {
        matches!(
            self,
            Self::Repeat(GridTrackRepetition::AutoFill | GridTrackRepetition::AutoFit, _)
        )
    }
}
