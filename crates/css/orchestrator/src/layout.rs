//! Per-node layout results and the values passed between parents and children during layout.

use crate::geometry::{Point, Rect, Size};

/// The final geometry of one node, relative to its parent's border box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Layout {
    /// Paint order among siblings
    pub order: u32,
    /// Top-left corner of the border box, relative to the parent's border box
    pub location: Point<f32>,
    /// Border-box size
    pub size: Size<f32>,
    /// Size of the content (descendants included), used for scroll extents
    pub content_size: Size<f32>,
    /// Space reserved for scrollbars (`width` is the vertical scrollbar's thickness)
    pub scrollbar_size: Size<f32>,
    /// Resolved border widths
    pub border: Rect<f32>,
    /// Resolved padding
    pub padding: Rect<f32>,
    /// Resolved margins
    pub margin: Rect<f32>,
}

impl Default for Layout {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    /// A zero layout with order `0`.
    #[inline]
    pub const fn new() -> Self {
        Self::with_order(0)
    }

    /// A zero layout with the given order, as written for nodes that generate no box.
    #[inline]
    pub const fn with_order(order: u32) -> Self {
        Self {
            order,
            location: Point { x: 0.0, y: 0.0 },
            size: Size {
                width: 0.0,
                height: 0.0,
            },
            content_size: Size {
                width: 0.0,
                height: 0.0,
            },
            scrollbar_size: Size {
                width: 0.0,
                height: 0.0,
            },
            border: Rect::ZERO,
            padding: Rect::ZERO,
            margin: Rect::ZERO,
        }
    }

    /// Width of the content box.
    #[inline]
    pub fn content_box_width(&self) -> f32 {
        self.size.width
            - self.padding.horizontal_axis_sum()
            - self.border.horizontal_axis_sum()
            - self.scrollbar_size.width
    }

    /// Height of the content box.
    #[inline]
    pub fn content_box_height(&self) -> f32 {
        self.size.height
            - self.padding.vertical_axis_sum()
            - self.border.vertical_axis_sum()
            - self.scrollbar_size.height
    }
}

/// The running state of adjoining vertical margins.
///
/// Spec: <https://www.w3.org/TR/CSS2/box.html#collapsing-margins>
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CollapsibleMarginSet {
    /// Largest positive margin seen so far
    positive: f32,
    /// Most negative margin seen so far (zero or less)
    negative: f32,
}

impl Default for CollapsibleMarginSet {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl CollapsibleMarginSet {
    /// The empty set.
    pub const ZERO: Self = Self {
        positive: 0.0,
        negative: 0.0,
    };

    /// A set holding a single margin.
    #[inline]
    pub fn from_margin(margin: f32) -> Self {
        if margin >= 0.0 {
            Self {
                positive: margin,
                negative: 0.0,
            }
        } else {
            Self {
                positive: 0.0,
                negative: margin,
            }
        }
    }

    /// Collapse a single margin into the set.
    #[inline]
    pub fn collapse_with_margin(mut self, margin: f32) -> Self {
        if margin >= 0.0 {
            self.positive = self.positive.max(margin);
        } else {
            self.negative = self.negative.min(margin);
        }
        self
    }

    /// Collapse another set into this one.
    #[inline]
    pub fn collapse_with_set(mut self, other: Self) -> Self {
        self.positive = self.positive.max(other.positive);
        self.negative = self.negative.min(other.negative);
        self
    }

    /// The single margin the set collapses to.
    #[inline]
    pub fn resolve(&self) -> f32 {
        self.positive + self.negative
    }
}
