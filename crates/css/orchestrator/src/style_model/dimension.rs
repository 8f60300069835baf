//! Length, percentage and `auto` values as consumed by layout.
//!
//! Values arrive here already computed: lengths are CSS pixels and percentages are fractions
//! (`0.5` is `50%`). Parsing units is the host's job.

/// A `<length-percentage>` value.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum LengthPercentage {
    /// An absolute length in CSS pixels
    Length(f32),
    /// A fraction of the percentage basis
    Percent(f32),
}

impl LengthPercentage {
    /// `0px`
    pub const ZERO: Self = Self::Length(0.0);

    /// An absolute length.
    #[inline]
    pub const fn length(value: f32) -> Self {
        Self::Length(value)
    }

    /// A percentage (`0.25` is `25%`).
    #[inline]
    pub const fn percent(value: f32) -> Self {
        Self::Percent(value)
    }
}

impl Default for LengthPercentage {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

/// A `<length-percentage> | auto` value.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum LengthPercentageAuto {
    /// An absolute length in CSS pixels
    Length(f32),
    /// A fraction of the percentage basis
    Percent(f32),
    /// `auto`: resolved by the layout algorithm
    Auto,
}

impl LengthPercentageAuto {
    /// `0px`
    pub const ZERO: Self = Self::Length(0.0);
    /// `auto`
    pub const AUTO: Self = Self::Auto;

    /// An absolute length.
    #[inline]
    pub const fn length(value: f32) -> Self {
        Self::Length(value)
    }

    /// A percentage (`0.25` is `25%`).
    #[inline]
    pub const fn percent(value: f32) -> Self {
        Self::Percent(value)
    }

    /// Whether the value is `auto`.
    #[inline]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Resolve against a definite percentage basis, returning `None` for `auto`.
    #[inline]
    pub fn resolve_to_option(self, basis: f32) -> Option<f32> {
        match self {
            Self::Length(length) => Some(length),
            Self::Percent(fraction) => Some(basis * fraction),
            Self::Auto => None,
        }
    }
}

impl Default for LengthPercentageAuto {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<LengthPercentage> for LengthPercentageAuto {
    #[inline]
    fn from(value: LengthPercentage) -> Self {
        match value {
            LengthPercentage::Length(length) => Self::Length(length),
            LengthPercentage::Percent(fraction) => Self::Percent(fraction),
        }
    }
}

/// A `<length-percentage> | auto` value used by `width`/`height`/`flex-basis` and friends.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Dimension {
    /// An absolute length in CSS pixels
    Length(f32),
    /// A fraction of the percentage basis
    Percent(f32),
    /// `auto` (or `none` for max sizes)
    Auto,
}

impl Dimension {
    /// `0px`
    pub const ZERO: Self = Self::Length(0.0);
    /// `auto`
    pub const AUTO: Self = Self::Auto;

    /// An absolute length.
    #[inline]
    pub const fn length(value: f32) -> Self {
        Self::Length(value)
    }

    /// A percentage (`0.25` is `25%`).
    #[inline]
    pub const fn percent(value: f32) -> Self {
        Self::Percent(value)
    }

    /// Whether the value is `auto`.
    #[inline]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// The length if this is an absolute length.
    #[inline]
    pub const fn into_option(self) -> Option<f32> {
        match self {
            Self::Length(length) => Some(length),
            Self::Percent(_) | Self::Auto => None,
        }
    }
}

impl Default for Dimension {
    #[inline]
    fn default() -> Self {
        Self::Auto
    }
}

impl From<LengthPercentage> for Dimension {
    #[inline]
    fn from(value: LengthPercentage) -> Self {
        match value {
            LengthPercentage::Length(length) => Self::Length(length),
            LengthPercentage::Percent(fraction) => Self::Percent(fraction),
        }
    }
}

impl From<LengthPercentageAuto> for Dimension {
    #[inline]
    fn from(value: LengthPercentageAuto) -> Self {
        match value {
            LengthPercentageAuto::Length(length) => Self::Length(length),
            LengthPercentageAuto::Percent(fraction) => Self::Percent(fraction),
            LengthPercentageAuto::Auto => Self::Auto,
        }
    }
}
