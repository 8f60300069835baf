//! CSS Sizing Module - size resolution shared by every formatting context.
//!
//! [Spec: CSS Box Sizing Module Level 3](https://www.w3.org/TR/css-sizing-3/)
//!
//! ## Design
//!
//! ```text
//! style size / min-size / max-size
//!   ↓ resolve percentages against the parent size
//!   ↓ apply aspect-ratio to fill a missing axis
//!   ↓ add padding + border for `box-sizing: content-box`
//! border-box sizes, clamped so that min beats max
//! ```
//!
//! The solvers only ever deal in border-box sizes; `box-sizing` is handled once, here.

use css_orchestrator::style_model::{BoxSizing, Style};
use css_orchestrator::{MaybeMath as _, MaybeResolve as _, Size, SizingMode};

/// Transform a content-box size to border-box based on `box-sizing`.
///
/// [Spec: CSS Box Sizing Level 3 §3 Box Sizing]
///
/// ```
/// # use css_sizing::apply_box_sizing;
/// # use css_orchestrator::style_model::BoxSizing;
/// assert!((apply_box_sizing(100.0, BoxSizing::ContentBox, 20.0) - 120.0).abs() < f32::EPSILON);
/// assert!((apply_box_sizing(100.0, BoxSizing::BorderBox, 20.0) - 100.0).abs() < f32::EPSILON);
/// ```
#[inline]
pub fn apply_box_sizing(content_size: f32, box_sizing: BoxSizing, padding_border: f32) -> f32 {
    match box_sizing {
        BoxSizing::ContentBox => content_size + padding_border,
        BoxSizing::BorderBox => content_size,
    }
}

/// The amount added to style sizes to turn them into border-box sizes.
#[inline]
pub fn box_sizing_adjustment(style: &Style, padding_border_sum: Size<f32>) -> Size<f32> {
    match style.box_sizing {
        BoxSizing::ContentBox => padding_border_sum,
        BoxSizing::BorderBox => Size::ZERO,
    }
}

/// Apply min/max constraints to a border-box size. When the constraints cross, `min` wins.
///
/// [Spec: CSS Sizing Level 3 §4.5 Min/Max Constraints]
#[inline]
pub fn apply_constraints(size: f32, min: Option<f32>, max: Option<f32>) -> f32 {
    size.maybe_clamp(min, max)
}

/// The border-box size, min-size and max-size a node's style asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleSizes {
    /// Preferred size
    pub size: Size<Option<f32>>,
    /// Minimum size
    pub min_size: Size<Option<f32>>,
    /// Maximum size
    pub max_size: Size<Option<f32>>,
    /// Preferred aspect ratio
    pub aspect_ratio: Option<f32>,
}

impl StyleSizes {
    /// No constraints at all.
    pub const NONE: Self = Self {
        size: Size::NONE,
        min_size: Size::NONE,
        max_size: Size::NONE,
        aspect_ratio: None,
    };

    /// The preferred size clamped by min and max.
    #[inline]
    pub fn clamped_size(&self) -> Size<Option<f32>> {
        Size {
            width: self.size.width.map(|width| {
                apply_constraints(width, self.min_size.width, self.max_size.width)
            }),
            height: self.size.height.map(|height| {
                apply_constraints(height, self.min_size.height, self.max_size.height)
            }),
        }
    }

    /// Fill absent `known_dimensions` from the clamped preferred size.
    #[inline]
    pub fn known_dimensions(&self, known_dimensions: Size<Option<f32>>) -> Size<Option<f32>> {
        known_dimensions.or(self.clamped_size())
    }

    /// Clamp a content-derived border-box size by min/max and floor it at padding plus border.
    #[inline]
    pub fn clamp_outer(&self, size: Size<f32>, padding_border_sum: Size<f32>) -> Size<f32> {
        Size {
            width: apply_constraints(size.width, self.min_size.width, self.max_size.width),
            height: apply_constraints(size.height, self.min_size.height, self.max_size.height),
        }
        .f32_max(padding_border_sum)
    }
}

/// Resolve the style sizes of a node against its parent's size.
///
/// `min_size` and `size` get the aspect ratio applied; `max_size` does not, since a maximum in
/// one axis must not invent a maximum in the other.
#[inline]
pub fn resolve_style_sizes(
    style: &Style,
    parent_size: Size<Option<f32>>,
    padding_border_sum: Size<f32>,
) -> StyleSizes {
    let aspect_ratio = style.aspect_ratio;
    let to_border_box = |size: Size<Option<f32>>| Size {
        width: size
            .width
            .map(|width| apply_box_sizing(width, style.box_sizing, padding_border_sum.width)),
        height: size
            .height
            .map(|height| apply_box_sizing(height, style.box_sizing, padding_border_sum.height)),
    };
    StyleSizes {
        size: to_border_box(
            style
                .size
                .maybe_resolve(parent_size)
                .maybe_apply_aspect_ratio(aspect_ratio),
        ),
        min_size: to_border_box(
            style
                .min_size
                .maybe_resolve(parent_size)
                .maybe_apply_aspect_ratio(aspect_ratio),
        ),
        max_size: to_border_box(style.max_size.maybe_resolve(parent_size)),
        aspect_ratio,
    }
}

/// Like [`resolve_style_sizes`], but honoring the sizing mode: content-size requests ignore the
/// node's own size styles.
#[inline]
pub fn resolve_style_sizes_for_mode(
    style: &Style,
    parent_size: Size<Option<f32>>,
    padding_border_sum: Size<f32>,
    sizing_mode: SizingMode,
) -> StyleSizes {
    match sizing_mode {
        SizingMode::InherentSize => resolve_style_sizes(style, parent_size, padding_border_sum),
        SizingMode::ContentSize => StyleSizes {
            aspect_ratio: style.aspect_ratio,
            ..StyleSizes::NONE
        },
    }
}

/// The automatic minimum size implied by `overflow`: zero for scroll containers, otherwise
/// content-based (`None`).
///
/// Spec: <https://www.w3.org/TR/css-sizing-4/#automatic-minimum-size>
#[inline]
pub fn automatic_min_size(style: &Style) -> Size<Option<f32>> {
    Size {
        width: style.overflow.x.maybe_into_automatic_min_size(),
        height: style.overflow.y.maybe_into_automatic_min_size(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_orchestrator::style_model::Dimension;

    #[test]
    /// # Panics
    /// Panics if content-box sizes are not converted to border-box.
    fn content_box_adds_padding_border() {
        let style = Style {
            box_sizing: BoxSizing::ContentBox,
            size: Size {
                width: Dimension::Length(100.0),
                height: Dimension::Auto,
            },
            ..Style::default()
        };
        let sizes = resolve_style_sizes(
            &style,
            Size::NONE,
            Size {
                width: 30.0,
                height: 10.0,
            },
        );
        assert_eq!(sizes.size.width, Some(130.0));
        assert_eq!(sizes.size.height, None);
    }

    #[test]
    /// # Panics
    /// Panics if aspect ratio or percentages are resolved incorrectly.
    fn aspect_ratio_and_percentages() {
        let style = Style {
            size: Size {
                width: Dimension::Percent(0.5),
                height: Dimension::Auto,
            },
            aspect_ratio: Some(2.0),
            ..Style::default()
        };
        let sizes = resolve_style_sizes(&style, Size::new(Some(400.0), None), Size::ZERO);
        assert_eq!(sizes.size, Size::new(Some(200.0), Some(100.0)));
        let indefinite = resolve_style_sizes(&style, Size::NONE, Size::ZERO);
        assert_eq!(indefinite.size, Size::NONE);
    }

    #[test]
    /// # Panics
    /// Panics if min does not win over max, or content sizing keeps style sizes.
    fn clamping_rules() {
        assert!((apply_constraints(50.0, Some(80.0), Some(60.0)) - 80.0).abs() < f32::EPSILON);
        let crossed = Style {
            size: Size {
                width: Dimension::Length(50.0),
                height: Dimension::Auto,
            },
            min_size: Size {
                width: Dimension::Length(80.0),
                height: Dimension::Auto,
            },
            max_size: Size {
                width: Dimension::Length(60.0),
                height: Dimension::Auto,
            },
            ..Style::default()
        };
        let crossed_sizes = resolve_style_sizes(&crossed, Size::NONE, Size::ZERO);
        assert_eq!(crossed_sizes.clamped_size(), Size::new(Some(80.0), None));
        let style = Style {
            size: Size {
                width: Dimension::Length(10.0),
                height: Dimension::Length(10.0),
            },
            ..Style::default()
        };
        let content =
            resolve_style_sizes_for_mode(&style, Size::NONE, Size::ZERO, SizingMode::ContentSize);
        assert_eq!(content.clamped_size(), Size::NONE);
        let floored = StyleSizes::NONE.clamp_outer(
            Size::ZERO,
            Size {
                width: 4.0,
                height: 6.0,
            },
        );
        assert!((floored.height - 6.0).abs() < f32::EPSILON);
    }
}
