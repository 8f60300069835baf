//! Flex container keywords.
//!
//! Spec: <https://www.w3.org/TR/css-flexbox-1/#flex-containers>

use crate::geometry::AbsoluteAxis;

/// `flex-direction`
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum FlexDirection {
    /// Main axis is horizontal, start to end
    #[default]
    Row,
    /// Main axis is vertical, top to bottom
    Column,
    /// Main axis is horizontal, end to start
    RowReverse,
    /// Main axis is vertical, bottom to top
    ColumnReverse,
}

impl FlexDirection {
    /// Whether the main axis is horizontal.
    #[inline]
    pub const fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// Whether the main axis is vertical.
    #[inline]
    pub const fn is_column(self) -> bool {
        matches!(self, Self::Column | Self::ColumnReverse)
    }

    /// Whether items are laid out end to start.
    #[inline]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }

    /// The absolute main axis.
    #[inline]
    pub const fn main_axis(self) -> AbsoluteAxis {
        if self.is_row() {
            AbsoluteAxis::Horizontal
        } else {
            AbsoluteAxis::Vertical
        }
    }

    /// The absolute cross axis.
    #[inline]
    pub const fn cross_axis(self) -> AbsoluteAxis {
        if self.is_row() {
            AbsoluteAxis::Vertical
        } else {
            AbsoluteAxis::Horizontal
        }
    }
}

/// `flex-wrap`
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum FlexWrap {
    /// Single line
    #[default]
    NoWrap,
    /// Multi-line, lines stacked from cross-start
    Wrap,
    /// Multi-line, lines stacked from cross-end
    WrapReverse,
}
