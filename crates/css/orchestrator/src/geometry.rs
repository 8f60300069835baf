//! Geometric value types shared by every layout algorithm.
//!
//! `Rect`, `Size`, `Point` and `Line` are plain generic aggregates. Axis-aware accessors
//! (`main`/`cross`, `get_abs`) let the flexbox and grid solvers write a single code path for
//! both orientations.

use core::ops::{Add, Sub};

use crate::style_model::FlexDirection;

/// The simple absolute horizontal and vertical axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AbsoluteAxis {
    /// The horizontal axis
    Horizontal,
    /// The vertical axis
    Vertical,
}

impl AbsoluteAxis {
    /// Returns the other variant of the enum.
    #[inline]
    pub const fn other_axis(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// The CSS abstract axis.
///
/// Spec: <https://www.w3.org/TR/css-writing-modes-3/#abstract-axes>
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AbstractAxis {
    /// The axis in the inline dimension, i.e. the horizontal axis in horizontal writing modes.
    Inline,
    /// The axis in the block dimension, i.e. the vertical axis in horizontal writing modes.
    Block,
}

impl AbstractAxis {
    /// Returns the other variant of the enum.
    #[inline]
    pub const fn other(self) -> Self {
        match self {
            Self::Inline => Self::Block,
            Self::Block => Self::Inline,
        }
    }

    /// Convert an abstract axis into an absolute axis assuming `horizontal-tb`.
    #[inline]
    pub const fn as_abs_naive(self) -> AbsoluteAxis {
        match self {
            Self::Inline => AbsoluteAxis::Horizontal,
            Self::Block => AbsoluteAxis::Vertical,
        }
    }
}

/// An axis-aligned rectangle described by its four edges.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Rect<T> {
    /// Left edge value
    pub left: T,
    /// Right edge value
    pub right: T,
    /// Top edge value
    pub top: T,
    /// Bottom edge value
    pub bottom: T,
}

impl<T> Rect<T> {
    /// Apply `mapper` to every edge.
    #[inline]
    pub fn map<R, F>(self, mapper: F) -> Rect<R>
    where
        F: Fn(T) -> R,
    {
        Rect {
            left: mapper(self.left),
            right: mapper(self.right),
            top: mapper(self.top),
            bottom: mapper(self.bottom),
        }
    }

    /// Apply `mapper` to every edge, passing the matching axis component of `size`
    /// (width for left/right, height for top/bottom).
    #[inline]
    pub fn zip_size<R, F, U>(self, size: Size<U>, mapper: F) -> Rect<R>
    where
        F: Fn(T, U) -> R,
        U: Copy,
    {
        Rect {
            left: mapper(self.left, size.width),
            right: mapper(self.right, size.width),
            top: mapper(self.top, size.height),
            bottom: mapper(self.bottom, size.height),
        }
    }

    /// The left and right edges as a [`Line`].
    #[inline]
    pub fn horizontal_components(self) -> Line<T> {
        Line {
            start: self.left,
            end: self.right,
        }
    }

    /// The top and bottom edges as a [`Line`].
    #[inline]
    pub fn vertical_components(self) -> Line<T> {
        Line {
            start: self.top,
            end: self.bottom,
        }
    }
}

impl<T: Copy> Rect<T> {
    /// The edge at the start of the main axis of `direction`.
    #[inline]
    pub fn main_start(&self, direction: FlexDirection) -> T {
        if direction.is_row() {
            self.left
        } else {
            self.top
        }
    }

    /// The edge at the end of the main axis of `direction`.
    #[inline]
    pub fn main_end(&self, direction: FlexDirection) -> T {
        if direction.is_row() {
            self.right
        } else {
            self.bottom
        }
    }

    /// The edge at the start of the cross axis of `direction`.
    #[inline]
    pub fn cross_start(&self, direction: FlexDirection) -> T {
        if direction.is_row() {
            self.top
        } else {
            self.left
        }
    }

    /// The edge at the end of the cross axis of `direction`.
    #[inline]
    pub fn cross_end(&self, direction: FlexDirection) -> T {
        if direction.is_row() {
            self.bottom
        } else {
            self.right
        }
    }
}

impl<T: Add<Output = T> + Copy> Rect<T> {
    /// Sum of the left and right edges.
    #[inline]
    pub fn horizontal_axis_sum(&self) -> T {
        self.left + self.right
    }

    /// Sum of the top and bottom edges.
    #[inline]
    pub fn vertical_axis_sum(&self) -> T {
        self.top + self.bottom
    }

    /// Per-axis sums as a [`Size`].
    #[inline]
    pub fn sum_axes(&self) -> Size<T> {
        Size {
            width: self.horizontal_axis_sum(),
            height: self.vertical_axis_sum(),
        }
    }

    /// Sum of the two edges perpendicular to `axis`.
    #[inline]
    pub fn grid_axis_sum(&self, axis: AbsoluteAxis) -> T {
        match axis {
            AbsoluteAxis::Horizontal => self.horizontal_axis_sum(),
            AbsoluteAxis::Vertical => self.vertical_axis_sum(),
        }
    }

    /// Sum of the main-axis edges for `direction`.
    #[inline]
    pub fn main_axis_sum(&self, direction: FlexDirection) -> T {
        if direction.is_row() {
            self.horizontal_axis_sum()
        } else {
            self.vertical_axis_sum()
        }
    }

    /// Sum of the cross-axis edges for `direction`.
    #[inline]
    pub fn cross_axis_sum(&self, direction: FlexDirection) -> T {
        if direction.is_row() {
            self.vertical_axis_sum()
        } else {
            self.horizontal_axis_sum()
        }
    }
}

impl<T: Add<Output = T>> Add<Self> for Rect<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            left: self.left + rhs.left,
            right: self.right + rhs.right,
            top: self.top + rhs.top,
            bottom: self.bottom + rhs.bottom,
        }
    }
}

impl Rect<f32> {
    /// A rect with every edge set to zero.
    pub const ZERO: Self = Self {
        left: 0.0,
        right: 0.0,
        top: 0.0,
        bottom: 0.0,
    };
}

impl Rect<Option<f32>> {
    /// A rect with every edge absent.
    pub const NONE: Self = Self {
        left: None,
        right: None,
        top: None,
        bottom: None,
    };
}

/// An abstract "line" with a start and an end. Used both for pairs of edges along one axis
/// and for grid placements (`grid-row: start / end`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Line<T> {
    /// The start position of a line
    pub start: T,
    /// The end position of a line
    pub end: T,
}

impl Line<bool> {
    /// Both ends `true`.
    pub const TRUE: Self = Self {
        start: true,
        end: true,
    };
    /// Both ends `false`.
    pub const FALSE: Self = Self {
        start: false,
        end: false,
    };
}

impl<T> Line<T> {
    /// Apply `mapper` to both ends.
    #[inline]
    pub fn map<R, F>(self, mapper: F) -> Line<R>
    where
        F: Fn(T) -> R,
    {
        Line {
            start: mapper(self.start),
            end: mapper(self.end),
        }
    }
}

impl Line<f32> {
    /// Sum of `start` and `end`.
    #[inline]
    pub fn sum(&self) -> f32 {
        self.start + self.end
    }
}

/// The width and height of a box.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Size<T> {
    /// The x extent of the rectangle
    pub width: T,
    /// The y extent of the rectangle
    pub height: T,
}

impl<T> Size<T> {
    /// Apply `mapper` to both dimensions.
    #[inline]
    pub fn map<R, F>(self, mapper: F) -> Size<R>
    where
        F: Fn(T) -> R,
    {
        Size {
            width: mapper(self.width),
            height: mapper(self.height),
        }
    }

    /// Apply `mapper` to the width only.
    #[inline]
    pub fn map_width<F>(self, mapper: F) -> Self
    where
        F: Fn(T) -> T,
    {
        Self {
            width: mapper(self.width),
            height: self.height,
        }
    }

    /// Apply `mapper` to the height only.
    #[inline]
    pub fn map_height<F>(self, mapper: F) -> Self
    where
        F: Fn(T) -> T,
    {
        Self {
            width: self.width,
            height: mapper(self.height),
        }
    }

    /// Combine with `other` dimension-wise.
    #[inline]
    pub fn zip_map<Other, Ret, F>(self, other: Size<Other>, mapper: F) -> Size<Ret>
    where
        F: Fn(T, Other) -> Ret,
    {
        Size {
            width: mapper(self.width, other.width),
            height: mapper(self.height, other.height),
        }
    }
}

impl<T: Copy> Size<T> {
    /// Value along an absolute axis.
    #[inline]
    pub const fn get_abs(self, axis: AbsoluteAxis) -> T {
        match axis {
            AbsoluteAxis::Horizontal => self.width,
            AbsoluteAxis::Vertical => self.height,
        }
    }

    /// Set the value along an absolute axis.
    #[inline]
    pub fn set_abs(&mut self, axis: AbsoluteAxis, value: T) {
        match axis {
            AbsoluteAxis::Horizontal => self.width = value,
            AbsoluteAxis::Vertical => self.height = value,
        }
    }

    /// Value along an abstract axis (assuming `horizontal-tb`).
    #[inline]
    pub const fn get(self, axis: AbstractAxis) -> T {
        match axis {
            AbstractAxis::Inline => self.width,
            AbstractAxis::Block => self.height,
        }
    }

    /// Set the value along an abstract axis (assuming `horizontal-tb`).
    #[inline]
    pub fn set(&mut self, axis: AbstractAxis, value: T) {
        match axis {
            AbstractAxis::Inline => self.width = value,
            AbstractAxis::Block => self.height = value,
        }
    }

    /// Main-axis component for `direction`.
    #[inline]
    pub fn main(self, direction: FlexDirection) -> T {
        if direction.is_row() {
            self.width
        } else {
            self.height
        }
    }

    /// Cross-axis component for `direction`.
    #[inline]
    pub fn cross(self, direction: FlexDirection) -> T {
        if direction.is_row() {
            self.height
        } else {
            self.width
        }
    }

    /// Set the main-axis component for `direction`.
    #[inline]
    pub fn set_main(&mut self, direction: FlexDirection, value: T) {
        if direction.is_row() {
            self.width = value;
        } else {
            self.height = value;
        }
    }

    /// Set the cross-axis component for `direction`.
    #[inline]
    pub fn set_cross(&mut self, direction: FlexDirection, value: T) {
        if direction.is_row() {
            self.height = value;
        } else {
            self.width = value;
        }
    }

    /// Copy with the main-axis component replaced.
    #[inline]
    pub fn with_main(self, direction: FlexDirection, value: T) -> Self {
        let mut copy = self;
        copy.set_main(direction, value);
        copy
    }

    /// Copy with the cross-axis component replaced.
    #[inline]
    pub fn with_cross(self, direction: FlexDirection, value: T) -> Self {
        let mut copy = self;
        copy.set_cross(direction, value);
        copy
    }
}

impl Size<f32> {
    /// A size with both dimensions zero.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Dimension-wise maximum.
    #[inline]
    pub fn f32_max(self, rhs: Self) -> Self {
        Self {
            width: self.width.max(rhs.width),
            height: self.height.max(rhs.height),
        }
    }

    /// Dimension-wise minimum.
    #[inline]
    pub fn f32_min(self, rhs: Self) -> Self {
        Self {
            width: self.width.min(rhs.width),
            height: self.height.min(rhs.height),
        }
    }

    /// Whether both dimensions are strictly positive.
    #[inline]
    pub fn has_non_zero_area(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Wrap both dimensions in `Some`.
    #[inline]
    pub const fn into_options(self) -> Size<Option<f32>> {
        Size {
            width: Some(self.width),
            height: Some(self.height),
        }
    }
}

impl Size<Option<f32>> {
    /// A size with both dimensions absent.
    pub const NONE: Self = Self {
        width: None,
        height: None,
    };

    /// Construct a size from two optional dimensions.
    #[inline]
    pub const fn new(width: Option<f32>, height: Option<f32>) -> Self {
        Self { width, height }
    }

    /// Fill absent dimensions from `alt`.
    #[inline]
    pub fn unwrap_or(self, alt: Size<f32>) -> Size<f32> {
        Size {
            width: self.width.unwrap_or(alt.width),
            height: self.height.unwrap_or(alt.height),
        }
    }

    /// Fill absent dimensions from another optional size.
    #[inline]
    pub fn or(self, alt: Self) -> Self {
        Self {
            width: self.width.or(alt.width),
            height: self.height.or(alt.height),
        }
    }

    /// Whether both dimensions are present.
    #[inline]
    pub const fn both_axis_defined(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }

    /// Fill a single absent dimension from the other one using `aspect_ratio` (width / height).
    #[inline]
    pub fn maybe_apply_aspect_ratio(self, aspect_ratio: Option<f32>) -> Self {
        match aspect_ratio {
            Some(ratio) => match (self.width, self.height) {
                (Some(width), None) => Self {
                    width: Some(width),
                    height: Some(width / ratio),
                },
                (None, Some(height)) => Self {
                    width: Some(height * ratio),
                    height: Some(height),
                },
                _ => self,
            },
            None => self,
        }
    }
}

impl<T: Add<Output = T>> Add<Self> for Size<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            width: self.width + rhs.width,
            height: self.height + rhs.height,
        }
    }
}

impl<T: Sub<Output = T>> Sub<Self> for Size<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            width: self.width - rhs.width,
            height: self.height - rhs.height,
        }
    }
}

/// A 2-dimensional coordinate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Point<T> {
    /// The x-coordinate
    pub x: T,
    /// The y-coordinate
    pub y: T,
}

impl Point<f32> {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
}

impl Point<Option<f32>> {
    /// A point with both coordinates absent.
    pub const NONE: Self = Self { x: None, y: None };
}

impl<T> Point<T> {
    /// Apply `mapper` to both coordinates.
    #[inline]
    pub fn map<R, F>(self, mapper: F) -> Point<R>
    where
        F: Fn(T) -> R,
    {
        Point {
            x: mapper(self.x),
            y: mapper(self.y),
        }
    }

    /// Swap the coordinates.
    #[inline]
    pub fn transpose(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }
}

impl<T: Copy> Point<T> {
    /// Coordinate along an absolute axis.
    #[inline]
    pub const fn get_abs(self, axis: AbsoluteAxis) -> T {
        match axis {
            AbsoluteAxis::Horizontal => self.x,
            AbsoluteAxis::Vertical => self.y,
        }
    }

    /// Set the coordinate along an absolute axis.
    #[inline]
    pub fn set_abs(&mut self, axis: AbsoluteAxis, value: T) {
        match axis {
            AbsoluteAxis::Horizontal => self.x = value,
            AbsoluteAxis::Vertical => self.y = value,
        }
    }
}

impl<T: Add<Output = T>> Add<Self> for Point<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

/// A pair of a minimum and a maximum value (e.g. the two halves of `minmax()`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MinMax<Min, Max> {
    /// The value representing the minimum
    pub min: Min,
    /// The value representing the maximum
    pub max: Max,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// # Panics
    /// Panics if aspect ratio is not applied to the missing dimension only.
    fn aspect_ratio_fills_missing_dimension() {
        let width_only = Size::new(Some(100.0), None).maybe_apply_aspect_ratio(Some(2.0));
        assert_eq!(width_only, Size::new(Some(100.0), Some(50.0)));
        let height_only = Size::new(None, Some(10.0)).maybe_apply_aspect_ratio(Some(2.0));
        assert_eq!(height_only, Size::new(Some(20.0), Some(10.0)));
        let both = Size::new(Some(1.0), Some(1.0)).maybe_apply_aspect_ratio(Some(2.0));
        assert_eq!(both, Size::new(Some(1.0), Some(1.0)));
    }

    #[test]
    /// # Panics
    /// Panics if main/cross accessors disagree with the flex direction.
    fn main_and_cross_follow_direction() {
        let size = Size {
            width: 1.0f32,
            height: 2.0f32,
        };
        assert!((size.main(FlexDirection::Row) - 1.0).abs() < f32::EPSILON);
        assert!((size.cross(FlexDirection::Row) - 2.0).abs() < f32::EPSILON);
        assert!((size.main(FlexDirection::ColumnReverse) - 2.0).abs() < f32::EPSILON);
        let swapped = size.with_main(FlexDirection::Column, 5.0);
        assert!((swapped.height - 5.0).abs() < f32::EPSILON);
    }
}
