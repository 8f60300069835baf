//! Box alignment keywords shared by flexbox and grid.
//!
//! Spec: <https://www.w3.org/TR/css-align-3/>

/// `align-items` / `align-self` / `justify-items` / `justify-self` values.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AlignItems {
    /// Items are packed toward the start of the axis
    Start,
    /// Items are packed toward the end of the axis
    End,
    /// Items are packed towards the flex-relative start of the axis
    FlexStart,
    /// Items are packed towards the flex-relative end of the axis
    FlexEnd,
    /// Items are packed along the center of the cross axis
    Center,
    /// Items are aligned such as their baselines align
    Baseline,
    /// Stretch to fill the container
    Stretch,
}

/// Self-alignment of one item in the block/cross axis.
pub type AlignSelf = AlignItems;
/// Default inline-axis alignment for grid items.
pub type JustifyItems = AlignItems;
/// Self-alignment of one item in the inline axis.
pub type JustifySelf = AlignItems;

/// `align-content` / `justify-content` values.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AlignContent {
    /// Items are packed toward the start of the axis
    Start,
    /// Items are packed toward the end of the axis
    End,
    /// Items are packed towards the flex-relative start of the axis
    FlexStart,
    /// Items are packed towards the flex-relative end of the axis
    FlexEnd,
    /// Items are centered around the middle of the axis
    Center,
    /// Items are stretched to fill the container
    Stretch,
    /// The first and last items are aligned flush with the edges of the container
    SpaceBetween,
    /// Equal space before, between and after every item
    SpaceEvenly,
    /// Half-size gaps at the edges, full-size gaps between items
    SpaceAround,
}

/// Distribution of free space along the main axis (flexbox) or inline axis (grid).
pub type JustifyContent = AlignContent;

impl AlignContent {
    /// Apply the distributed-alignment fallback when there is at most one alignment subject
    /// or no positive free space.
    ///
    /// Spec: <https://www.w3.org/TR/css-align-3/#distribution-values>
    #[inline]
    pub fn with_fallback(self, free_space: f32, subject_count: usize) -> Self {
        if subject_count > 1 && free_space > 0.0 {
            return self;
        }
        match self {
            Self::SpaceBetween | Self::Stretch => Self::FlexStart,
            Self::SpaceAround | Self::SpaceEvenly => Self::Center,
            other => other,
        }
    }
}

/// The legacy `text-align` values that affect block-level children.
///
/// Spec: <https://drafts.csswg.org/css-text/#text-align-property>
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum TextAlign {
    /// No special legacy text align behaviour; start-aligned per `direction`.
    #[default]
    Auto,
    /// `-webkit-left`
    LegacyLeft,
    /// `-webkit-right`
    LegacyRight,
    /// `-webkit-center`
    LegacyCenter,
}
