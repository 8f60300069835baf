//! The three-state space a parent offers to a child in one axis.

use crate::geometry::Size;

/// Space available to a node in one axis.
///
/// A definite amount acts as a soft wrapping/growth constraint. `MinContent` and `MaxContent`
/// ask the node to size itself under the corresponding intrinsic sizing constraint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AvailableSpace {
    /// A definite number of pixels
    Definite(f32),
    /// Size under a min-content constraint
    MinContent,
    /// Size under a max-content constraint
    MaxContent,
}

impl AvailableSpace {
    /// The zero definite space.
    pub const ZERO: Self = Self::Definite(0.0);

    /// Construct from an absolute length.
    #[inline]
    pub const fn from_length(value: f32) -> Self {
        Self::Definite(value)
    }

    /// Whether this is a definite amount.
    #[inline]
    pub const fn is_definite(self) -> bool {
        matches!(self, Self::Definite(_))
    }

    /// The definite amount, if any.
    #[inline]
    pub const fn into_option(self) -> Option<f32> {
        match self {
            Self::Definite(value) => Some(value),
            Self::MinContent | Self::MaxContent => None,
        }
    }

    /// The definite amount, or `default`.
    #[inline]
    pub fn unwrap_or(self, default: f32) -> f32 {
        self.into_option().unwrap_or(default)
    }

    /// Replace with a definite value when `value` is present.
    #[inline]
    pub fn maybe_set(self, value: Option<f32>) -> Self {
        value.map_or(self, Self::Definite)
    }

    /// Map the definite amount, leaving intrinsic constraints untouched.
    #[inline]
    pub fn map_definite_value(self, mapper: impl FnOnce(f32) -> f32) -> Self {
        match self {
            Self::Definite(value) => Self::Definite(mapper(value)),
            other => other,
        }
    }

    /// Free space remaining after `used_space`. Max-content offers unlimited space and
    /// min-content offers none.
    #[inline]
    pub fn compute_free_space(self, used_space: f32) -> f32 {
        match self {
            Self::MaxContent => f32::INFINITY,
            Self::MinContent => 0.0,
            Self::Definite(available) => available - used_space,
        }
    }

    /// Whether two values describe the same constraint: equal definite amounts (within
    /// `f32::EPSILON`) or the same intrinsic kind.
    #[inline]
    pub fn is_roughly_equal(self, other: Self) -> bool {
        match (self, other) {
            (Self::Definite(lhs), Self::Definite(rhs)) => (lhs - rhs).abs() < f32::EPSILON,
            (Self::MinContent, Self::MinContent) | (Self::MaxContent, Self::MaxContent) => true,
            _ => false,
        }
    }
}

impl From<f32> for AvailableSpace {
    #[inline]
    fn from(value: f32) -> Self {
        Self::Definite(value)
    }
}

impl From<Option<f32>> for AvailableSpace {
    #[inline]
    fn from(value: Option<f32>) -> Self {
        value.map_or(Self::MaxContent, Self::Definite)
    }
}

impl Size<AvailableSpace> {
    /// Max-content in both axes.
    pub const MAX_CONTENT: Self = Self {
        width: AvailableSpace::MaxContent,
        height: AvailableSpace::MaxContent,
    };

    /// Min-content in both axes.
    pub const MIN_CONTENT: Self = Self {
        width: AvailableSpace::MinContent,
        height: AvailableSpace::MinContent,
    };

    /// Definite space in both axes.
    #[inline]
    pub const fn from_lengths(width: f32, height: f32) -> Self {
        Self {
            width: AvailableSpace::Definite(width),
            height: AvailableSpace::Definite(height),
        }
    }

    /// The definite amounts, if any.
    #[inline]
    pub fn into_options(self) -> Size<Option<f32>> {
        Size {
            width: self.width.into_option(),
            height: self.height.into_option(),
        }
    }

    /// Replace each axis with a definite value where `value` is present.
    #[inline]
    pub fn maybe_set(self, value: Size<Option<f32>>) -> Self {
        Self {
            width: self.width.maybe_set(value.width),
            height: self.height.maybe_set(value.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// # Panics
    /// Panics if rough equality treats different kinds as equal.
    fn rough_equality_by_kind() {
        assert!(AvailableSpace::Definite(10.0).is_roughly_equal(AvailableSpace::Definite(10.0)));
        assert!(!AvailableSpace::Definite(10.0).is_roughly_equal(AvailableSpace::Definite(11.0)));
        assert!(AvailableSpace::MinContent.is_roughly_equal(AvailableSpace::MinContent));
        assert!(!AvailableSpace::MinContent.is_roughly_equal(AvailableSpace::MaxContent));
        assert!(!AvailableSpace::MaxContent.is_roughly_equal(AvailableSpace::Definite(0.0)));
    }

    #[test]
    /// # Panics
    /// Panics if free space ignores the intrinsic constraint.
    fn free_space_per_constraint() {
        assert!(AvailableSpace::MaxContent.compute_free_space(50.0).is_infinite());
        assert!(AvailableSpace::MinContent.compute_free_space(50.0).abs() < f32::EPSILON);
        let definite = AvailableSpace::Definite(80.0).compute_free_space(50.0);
        assert!((definite - 30.0).abs() < f32::EPSILON);
    }
}
