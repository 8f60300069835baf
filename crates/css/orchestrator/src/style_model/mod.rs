//! Computed style values consumed by the layout algorithms.
//!
//! The style is read-only input to layout: the host computes it (cascade, inheritance, unit
//! conversion) and layout never writes it. Every field defaults to the CSS initial value with the
//! exception of `box-sizing`, which defaults to `border-box` as most UI hosts reset it that way.

mod alignment;
mod dimension;
mod flex;
mod grid;

pub use alignment::{
    AlignContent, AlignItems, AlignSelf, JustifyContent, JustifyItems, JustifySelf, TextAlign,
};
pub use dimension::{Dimension, LengthPercentage, LengthPercentageAuto};
pub use flex::{FlexDirection, FlexWrap};
pub use grid::{
    GridAutoFlow, GridPlacement, GridTrackRepetition, MaxTrackSizingFunction,
    MinTrackSizingFunction, NonRepeatedTrackSizingFunction, TrackSizingFunction,
};

use crate::geometry::{Line, Point, Rect, Size};

/// `display`, reduced to the inner display types layout distinguishes.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Display {
    /// Block flow layout
    #[default]
    Block,
    /// Flexbox layout
    Flex,
    /// Grid layout
    Grid,
    /// The node and its subtree generate no boxes
    None,
}

/// Whether a node generates a box at all.
///
/// This is kept separate from [`Display`] so that item collection can filter on box generation
/// without caring about the inner display type.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum BoxGenerationMode {
    /// The node generates a box
    #[default]
    Normal,
    /// The node generates no box
    None,
}

/// `position`
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Position {
    /// In-flow, offset visually by insets
    #[default]
    Relative,
    /// Out of flow, positioned against the containing block
    Absolute,
}

/// `box-sizing`
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum BoxSizing {
    /// `width`/`height` include padding and border
    #[default]
    BorderBox,
    /// `width`/`height` describe the content box only
    ContentBox,
}

/// `overflow` in one axis.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Overflow {
    /// Content overflows visibly and contributes to the automatic minimum size
    #[default]
    Visible,
    /// Like `Visible` for layout, but painting is clipped
    Clip,
    /// Scroll container without a reserved scrollbar
    Hidden,
    /// Scroll container with a reserved scrollbar gutter
    Scroll,
}

impl Overflow {
    /// Whether the node becomes a scroll container in this axis.
    #[inline]
    pub const fn is_scroll_container(self) -> bool {
        matches!(self, Self::Hidden | Self::Scroll)
    }

    /// The automatic minimum size for this overflow value (zero for scroll containers).
    #[inline]
    pub const fn maybe_into_automatic_min_size(self) -> Option<f32> {
        if self.is_scroll_container() {
            Some(0.0)
        } else {
            None
        }
    }
}

/// `direction`
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Direction {
    /// Inherit from the parent (left-to-right at the root)
    #[default]
    Inherit,
    /// Left-to-right
    Ltr,
    /// Right-to-left
    Rtl,
}

impl Direction {
    /// Whether this is `rtl`.
    #[inline]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }
}

/// The computed style of one node.
#[derive(Clone, PartialEq, Debug)]
pub struct Style {
    /// Inner display type
    pub display: Display,
    /// Whether the node is a scroll container in each axis
    pub overflow: Point<Overflow>,
    /// Thickness reserved for a scrollbar in axes where `overflow: scroll`
    pub scrollbar_width: f32,
    /// Positioning scheme
    pub position: Position,
    /// Inline base direction
    pub direction: Direction,
    /// Legacy alignment of block-level children in block layout
    pub text_align: TextAlign,
    /// How `size`/`min_size`/`max_size` are interpreted
    pub box_sizing: BoxSizing,
    /// Offsets for positioned boxes
    pub inset: Rect<LengthPercentageAuto>,
    /// Preferred size
    pub size: Size<Dimension>,
    /// Minimum size
    pub min_size: Size<Dimension>,
    /// Maximum size
    pub max_size: Size<Dimension>,
    /// Preferred width / height ratio
    pub aspect_ratio: Option<f32>,
    /// Margins
    pub margin: Rect<LengthPercentageAuto>,
    /// Padding
    pub padding: Rect<LengthPercentage>,
    /// Border widths
    pub border: Rect<LengthPercentage>,
    /// Gutters between items/lines (`column-gap` as width, `row-gap` as height)
    pub gap: Size<LengthPercentage>,
    /// Default cross-axis alignment of children
    pub align_items: Option<AlignItems>,
    /// Cross-axis alignment override for this item
    pub align_self: Option<AlignSelf>,
    /// Default inline-axis alignment of grid children
    pub justify_items: Option<JustifyItems>,
    /// Inline-axis alignment override for this grid item
    pub justify_self: Option<JustifySelf>,
    /// Distribution of lines (flex) or tracks (grid) in the cross/block axis
    pub align_content: Option<AlignContent>,
    /// Distribution of items (flex) or tracks (grid) in the main/inline axis
    pub justify_content: Option<JustifyContent>,
    /// Flex main axis
    pub flex_direction: FlexDirection,
    /// Flex line wrapping
    pub flex_wrap: FlexWrap,
    /// Initial main size of a flex item
    pub flex_basis: Dimension,
    /// Share of positive free space
    pub flex_grow: f32,
    /// Share of negative free space (weighted by basis)
    pub flex_shrink: f32,
    /// Explicit row tracks
    pub grid_template_rows: Vec<TrackSizingFunction>,
    /// Explicit column tracks
    pub grid_template_columns: Vec<TrackSizingFunction>,
    /// Names of explicit row lines; entry `i` lists the names of line `i + 1`
    pub grid_template_row_names: Vec<Vec<String>>,
    /// Names of explicit column lines; entry `i` lists the names of line `i + 1`
    pub grid_template_column_names: Vec<Vec<String>>,
    /// Sizes of implicit rows (cycled)
    pub grid_auto_rows: Vec<NonRepeatedTrackSizingFunction>,
    /// Sizes of implicit columns (cycled)
    pub grid_auto_columns: Vec<NonRepeatedTrackSizingFunction>,
    /// Auto-placement direction and packing
    pub grid_auto_flow: GridAutoFlow,
    /// Row placement of this grid item
    pub grid_row: Line<GridPlacement>,
    /// Column placement of this grid item
    pub grid_column: Line<GridPlacement>,
}

impl Style {
    /// The CSS initial values (with `box-sizing: border-box`).
    pub const DEFAULT: Self = Self {
        display: Display::Block,
        overflow: Point {
            x: Overflow::Visible,
            y: Overflow::Visible,
        },
        scrollbar_width: 0.0,
        position: Position::Relative,
        direction: Direction::Inherit,
        text_align: TextAlign::Auto,
        box_sizing: BoxSizing::BorderBox,
        inset: Rect {
            left: LengthPercentageAuto::Auto,
            right: LengthPercentageAuto::Auto,
            top: LengthPercentageAuto::Auto,
            bottom: LengthPercentageAuto::Auto,
        },
        size: Size {
            width: Dimension::Auto,
            height: Dimension::Auto,
        },
        min_size: Size {
            width: Dimension::Auto,
            height: Dimension::Auto,
        },
        max_size: Size {
            width: Dimension::Auto,
            height: Dimension::Auto,
        },
        aspect_ratio: None,
        margin: Rect {
            left: LengthPercentageAuto::ZERO,
            right: LengthPercentageAuto::ZERO,
            top: LengthPercentageAuto::ZERO,
            bottom: LengthPercentageAuto::ZERO,
        },
        padding: Rect {
            left: LengthPercentage::ZERO,
            right: LengthPercentage::ZERO,
            top: LengthPercentage::ZERO,
            bottom: LengthPercentage::ZERO,
        },
        border: Rect {
            left: LengthPercentage::ZERO,
            right: LengthPercentage::ZERO,
            top: LengthPercentage::ZERO,
            bottom: LengthPercentage::ZERO,
        },
        gap: Size {
            width: LengthPercentage::ZERO,
            height: LengthPercentage::ZERO,
        },
        align_items: None,
        align_self: None,
        justify_items: None,
        justify_self: None,
        align_content: None,
        justify_content: None,
        flex_direction: FlexDirection::Row,
        flex_wrap: FlexWrap::NoWrap,
        flex_basis: Dimension::Auto,
        flex_grow: 0.0,
        flex_shrink: 1.0,
        grid_template_rows: Vec::new(),
        grid_template_columns: Vec::new(),
        grid_template_row_names: Vec::new(),
        grid_template_column_names: Vec::new(),
        grid_auto_rows: Vec::new(),
        grid_auto_columns: Vec::new(),
        grid_auto_flow: GridAutoFlow::Row,
        grid_row: Line {
            start: GridPlacement::Auto,
            end: GridPlacement::Auto,
        },
        grid_column: Line {
            start: GridPlacement::Auto,
            end: GridPlacement::Auto,
        },
    };

    /// Whether this node generates a box.
    #[inline]
    pub const fn box_generation_mode(&self) -> BoxGenerationMode {
        match self.display {
            Display::None => BoxGenerationMode::None,
            Display::Block | Display::Flex | Display::Grid => BoxGenerationMode::Normal,
        }
    }

    /// Whether this node is a scroll container in either axis.
    #[inline]
    pub const fn is_scroll_container(&self) -> bool {
        self.overflow.x.is_scroll_container() || self.overflow.y.is_scroll_container()
    }

    /// Whether this node is absolutely positioned.
    #[inline]
    pub const fn is_absolutely_positioned(&self) -> bool {
        matches!(self.position, Position::Absolute)
    }

    /// Whether this node participates in its parent's flow (boxed and not absolutely positioned).
    #[inline]
    pub const fn is_in_flow(&self) -> bool {
        matches!(self.box_generation_mode(), BoxGenerationMode::Normal)
            && !self.is_absolutely_positioned()
    }
}

impl Default for Style {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// # Panics
    /// Panics if the initial values drift from CSS defaults.
    fn defaults_match_initial_values() {
        let style = Style::default();
        assert_eq!(style.display, Display::Block);
        assert_eq!(style.box_generation_mode(), BoxGenerationMode::Normal);
        assert!((style.flex_shrink - 1.0).abs() < f32::EPSILON);
        assert!(style.flex_grow.abs() < f32::EPSILON);
        assert!(style.is_in_flow());
        assert!(!style.is_scroll_container());
    }

    #[test]
    /// # Panics
    /// Panics if `display: none` or absolute positioning are treated as in-flow.
    fn out_of_flow_detection() {
        let hidden = Style {
            display: Display::None,
            ..Style::default()
        };
        assert_eq!(hidden.box_generation_mode(), BoxGenerationMode::None);
        assert!(!hidden.is_in_flow());
        let absolute = Style {
            position: Position::Absolute,
            ..Style::default()
        };
        assert!(!absolute.is_in_flow());
    }
}
