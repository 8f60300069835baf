//! Arithmetic on optional values.
//!
//! Layout constantly combines values that may be absent (an `auto` size, an indefinite
//! percentage basis). These traits spell out how absence propagates: `min`/`max`/`clamp` treat
//! an absent bound as no bound, `add`/`sub` treat an absent right-hand side as zero, and an
//! absent left-hand side stays absent.

use crate::available_space::AvailableSpace;
use crate::geometry::{Rect, Size};
use crate::style_model::{Dimension, LengthPercentage, LengthPercentageAuto};

/// Min/max/clamp/add/sub where either operand may be absent.
pub trait MaybeMath<In, Out> {
    /// Minimum, ignoring an absent `rhs`.
    fn maybe_min(self, rhs: In) -> Out;
    /// Maximum, ignoring an absent `rhs`.
    fn maybe_max(self, rhs: In) -> Out;
    /// Clamp between `min` and `max`, ignoring absent bounds. `min` wins over `max`.
    fn maybe_clamp(self, min: In, max: In) -> Out;
    /// Add, treating an absent `rhs` as zero.
    fn maybe_add(self, rhs: In) -> Out;
    /// Subtract, treating an absent `rhs` as zero.
    fn maybe_sub(self, rhs: In) -> Out;
}

impl MaybeMath<Self, Self> for Option<f32> {
    #[inline]
    fn maybe_min(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Some(lhs), Some(other)) => Some(lhs.min(other)),
            (Some(lhs), None) => Some(lhs),
            (None, _) => None,
        }
    }

    #[inline]
    fn maybe_max(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Some(lhs), Some(other)) => Some(lhs.max(other)),
            (Some(lhs), None) => Some(lhs),
            (None, _) => None,
        }
    }

    #[inline]
    fn maybe_clamp(self, min: Self, max: Self) -> Self {
        self.map(|value| value.maybe_clamp(min, max))
    }

    #[inline]
    fn maybe_add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Some(lhs), Some(other)) => Some(lhs + other),
            (Some(lhs), None) => Some(lhs),
            (None, _) => None,
        }
    }

    #[inline]
    fn maybe_sub(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Some(lhs), Some(other)) => Some(lhs - other),
            (Some(lhs), None) => Some(lhs),
            (None, _) => None,
        }
    }
}

impl MaybeMath<f32, Self> for Option<f32> {
    #[inline]
    fn maybe_min(self, rhs: f32) -> Self {
        self.map(|value| value.min(rhs))
    }

    #[inline]
    fn maybe_max(self, rhs: f32) -> Self {
        self.map(|value| value.max(rhs))
    }

    #[inline]
    fn maybe_clamp(self, min: f32, max: f32) -> Self {
        self.map(|value| value.min(max).max(min))
    }

    #[inline]
    fn maybe_add(self, rhs: f32) -> Self {
        self.map(|value| value + rhs)
    }

    #[inline]
    fn maybe_sub(self, rhs: f32) -> Self {
        self.map(|value| value - rhs)
    }
}

impl MaybeMath<Option<f32>, Self> for f32 {
    #[inline]
    fn maybe_min(self, rhs: Option<f32>) -> Self {
        rhs.map_or(self, |bound| self.min(bound))
    }

    #[inline]
    fn maybe_max(self, rhs: Option<f32>) -> Self {
        rhs.map_or(self, |bound| self.max(bound))
    }

    #[inline]
    fn maybe_clamp(self, min: Option<f32>, max: Option<f32>) -> Self {
        // `min` wins when the bounds cross, as in CSS min/max resolution.
        self.maybe_min(max).maybe_max(min)
    }

    #[inline]
    fn maybe_add(self, rhs: Option<f32>) -> Self {
        rhs.map_or(self, |other| self + other)
    }

    #[inline]
    fn maybe_sub(self, rhs: Option<f32>) -> Self {
        rhs.map_or(self, |other| self - other)
    }
}

impl MaybeMath<f32, Self> for AvailableSpace {
    #[inline]
    fn maybe_min(self, rhs: f32) -> Self {
        match self {
            Self::Definite(value) => Self::Definite(value.min(rhs)),
            Self::MinContent | Self::MaxContent => Self::Definite(rhs),
        }
    }

    #[inline]
    fn maybe_max(self, rhs: f32) -> Self {
        match self {
            Self::Definite(value) => Self::Definite(value.max(rhs)),
            other => other,
        }
    }

    #[inline]
    fn maybe_clamp(self, min: f32, max: f32) -> Self {
        match self {
            Self::Definite(value) => Self::Definite(value.min(max).max(min)),
            other => other,
        }
    }

    #[inline]
    fn maybe_add(self, rhs: f32) -> Self {
        self.map_definite_value(|value| value + rhs)
    }

    #[inline]
    fn maybe_sub(self, rhs: f32) -> Self {
        self.map_definite_value(|value| value - rhs)
    }
}

impl MaybeMath<Option<f32>, Self> for AvailableSpace {
    #[inline]
    fn maybe_min(self, rhs: Option<f32>) -> Self {
        match (self, rhs) {
            (Self::Definite(value), Some(bound)) => Self::Definite(value.min(bound)),
            (Self::MinContent | Self::MaxContent, Some(bound)) => Self::Definite(bound),
            (other, None) => other,
        }
    }

    #[inline]
    fn maybe_max(self, rhs: Option<f32>) -> Self {
        match (self, rhs) {
            (Self::Definite(value), Some(bound)) => Self::Definite(value.max(bound)),
            (other, _) => other,
        }
    }

    #[inline]
    fn maybe_clamp(self, min: Option<f32>, max: Option<f32>) -> Self {
        match self {
            Self::Definite(value) => Self::Definite(value.maybe_clamp(min, max)),
            other => other,
        }
    }

    #[inline]
    fn maybe_add(self, rhs: Option<f32>) -> Self {
        match (self, rhs) {
            (Self::Definite(value), Some(other)) => Self::Definite(value + other),
            (other, _) => other,
        }
    }

    #[inline]
    fn maybe_sub(self, rhs: Option<f32>) -> Self {
        match (self, rhs) {
            (Self::Definite(value), Some(other)) => Self::Definite(value - other),
            (other, _) => other,
        }
    }
}

impl<In: Copy, Out, Lhs: MaybeMath<In, Out>> MaybeMath<Size<In>, Size<Out>> for Size<Lhs> {
    #[inline]
    fn maybe_min(self, rhs: Size<In>) -> Size<Out> {
        Size {
            width: self.width.maybe_min(rhs.width),
            height: self.height.maybe_min(rhs.height),
        }
    }

    #[inline]
    fn maybe_max(self, rhs: Size<In>) -> Size<Out> {
        Size {
            width: self.width.maybe_max(rhs.width),
            height: self.height.maybe_max(rhs.height),
        }
    }

    #[inline]
    fn maybe_clamp(self, min: Size<In>, max: Size<In>) -> Size<Out> {
        Size {
            width: self.width.maybe_clamp(min.width, max.width),
            height: self.height.maybe_clamp(min.height, max.height),
        }
    }

    #[inline]
    fn maybe_add(self, rhs: Size<In>) -> Size<Out> {
        Size {
            width: self.width.maybe_add(rhs.width),
            height: self.height.maybe_add(rhs.height),
        }
    }

    #[inline]
    fn maybe_sub(self, rhs: Size<In>) -> Size<Out> {
        Size {
            width: self.width.maybe_sub(rhs.width),
            height: self.height.maybe_sub(rhs.height),
        }
    }
}

/// Resolve a length-percentage style value against an optional percentage basis.
pub trait MaybeResolve<In, Out> {
    /// Resolve, yielding `None` for `auto` or when a percentage has no basis.
    fn maybe_resolve(self, context: In) -> Out;
}

impl MaybeResolve<Option<f32>, Option<f32>> for LengthPercentage {
    #[inline]
    fn maybe_resolve(self, context: Option<f32>) -> Option<f32> {
        match self {
            Self::Length(length) => Some(length),
            Self::Percent(fraction) => context.map(|basis| basis * fraction),
        }
    }
}

impl MaybeResolve<Option<f32>, Option<f32>> for LengthPercentageAuto {
    #[inline]
    fn maybe_resolve(self, context: Option<f32>) -> Option<f32> {
        match self {
            Self::Length(length) => Some(length),
            Self::Percent(fraction) => context.map(|basis| basis * fraction),
            Self::Auto => None,
        }
    }
}

impl MaybeResolve<Option<f32>, Option<f32>> for Dimension {
    #[inline]
    fn maybe_resolve(self, context: Option<f32>) -> Option<f32> {
        match self {
            Self::Length(length) => Some(length),
            Self::Percent(fraction) => context.map(|basis| basis * fraction),
            Self::Auto => None,
        }
    }
}

impl<In: Copy, Out, Value: MaybeResolve<In, Out>> MaybeResolve<Size<In>, Size<Out>>
    for Size<Value>
{
    #[inline]
    fn maybe_resolve(self, context: Size<In>) -> Size<Out> {
        Size {
            width: self.width.maybe_resolve(context.width),
            height: self.height.maybe_resolve(context.height),
        }
    }
}

/// Resolve a style value, falling back to zero when it cannot be resolved.
pub trait ResolveOrZero<In, Out> {
    /// Resolve against `context`, or zero.
    fn resolve_or_zero(self, context: In) -> Out;
}

impl<Value: MaybeResolve<Option<f32>, Option<f32>>> ResolveOrZero<Option<f32>, f32> for Value {
    #[inline]
    fn resolve_or_zero(self, context: Option<f32>) -> f32 {
        self.maybe_resolve(context).unwrap_or(0.0)
    }
}

impl<Value: ResolveOrZero<Option<f32>, f32>> ResolveOrZero<Size<Option<f32>>, Size<f32>>
    for Size<Value>
{
    #[inline]
    fn resolve_or_zero(self, context: Size<Option<f32>>) -> Size<f32> {
        Size {
            width: self.width.resolve_or_zero(context.width),
            height: self.height.resolve_or_zero(context.height),
        }
    }
}

impl<Value: ResolveOrZero<Option<f32>, f32>> ResolveOrZero<Size<Option<f32>>, Rect<f32>>
    for Rect<Value>
{
    #[inline]
    fn resolve_or_zero(self, context: Size<Option<f32>>) -> Rect<f32> {
        Rect {
            left: self.left.resolve_or_zero(context.width),
            right: self.right.resolve_or_zero(context.width),
            top: self.top.resolve_or_zero(context.height),
            bottom: self.bottom.resolve_or_zero(context.height),
        }
    }
}

impl<Value: ResolveOrZero<Option<f32>, f32>> ResolveOrZero<Option<f32>, Rect<f32>>
    for Rect<Value>
{
    #[inline]
    fn resolve_or_zero(self, context: Option<f32>) -> Rect<f32> {
        Rect {
            left: self.left.resolve_or_zero(context),
            right: self.right.resolve_or_zero(context),
            top: self.top.resolve_or_zero(context),
            bottom: self.bottom.resolve_or_zero(context),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// # Panics
    /// Panics if absent bounds are not ignored.
    fn absent_bounds_are_ignored() {
        assert_eq!(Some(5.0f32).maybe_min(None), Some(5.0));
        assert_eq!(None.maybe_max(Some(3.0f32)), None);
        assert!((5.0f32.maybe_clamp(None, Some(4.0)) - 4.0).abs() < f32::EPSILON);
        assert!((5.0f32.maybe_clamp(Some(6.0), Some(4.0)) - 6.0).abs() < f32::EPSILON);
        assert_eq!(Some(2.0f32).maybe_sub(None), Some(2.0));
    }

    #[test]
    /// # Panics
    /// Panics if percentages resolve without a basis.
    fn percentages_need_a_basis() {
        assert_eq!(Dimension::Percent(0.5).maybe_resolve(None), None);
        assert_eq!(Dimension::Percent(0.5).maybe_resolve(Some(200.0)), Some(100.0));
        assert!(LengthPercentageAuto::Auto.resolve_or_zero(Some(10.0)).abs() < f32::EPSILON);
        let insets = Rect {
            left: LengthPercentage::Percent(0.1),
            right: LengthPercentage::Length(3.0),
            top: LengthPercentage::ZERO,
            bottom: LengthPercentage::ZERO,
        }
        .resolve_or_zero(Some(100.0));
        assert!((insets.horizontal_axis_sum() - 13.0).abs() < f32::EPSILON);
    }
}
