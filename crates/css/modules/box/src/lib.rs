//! CSS Box Model Module Level 3: Box dimensions, margins, borders, padding.
//! Spec: <https://www.w3.org/TR/css-box-3/>
//!
//! Every formatting context starts by resolving the same edges of its own box. The helpers here
//! turn the style's length-percentage edges into pixels against the containing block's inline
//! size, which is the percentage basis CSS uses for all four sides of margin and padding.

use css_orchestrator::style_model::{LengthPercentageAuto, Overflow, Style};
use css_orchestrator::{Point, Rect, ResolveOrZero as _, Size};

/// The resolved edges of one box, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxSides {
    /// Margins, with `auto` resolved to zero
    pub margin: Rect<f32>,
    /// Padding, floored at zero
    pub padding: Rect<f32>,
    /// Border widths, floored at zero
    pub border: Rect<f32>,
    /// Space reserved for scrollbars (`width` is taken by a vertical scrollbar)
    pub scrollbar_gutter: Size<f32>,
}

impl BoxSides {
    /// Padding plus border.
    #[inline]
    pub fn padding_border(&self) -> Rect<f32> {
        self.padding + self.border
    }

    /// Per-axis sums of padding and border.
    #[inline]
    pub fn padding_border_sum(&self) -> Size<f32> {
        self.padding_border().sum_axes()
    }

    /// Offsets from the border box to the content box: padding, border and scrollbar gutter.
    #[inline]
    pub fn content_box_inset(&self) -> Rect<f32> {
        content_box_inset(self.padding, self.border, self.scrollbar_gutter)
    }
}

/// Resolve margin, padding, border and scrollbar gutter of `style`.
///
/// `parent_width` is the percentage basis; it is `None` when the containing block's inline size
/// is indefinite, in which case percentages resolve to zero.
/// Spec: CSS 2.2 §8.1 (box model) and CSS Box Sizing L3.
#[inline]
pub fn compute_box_sides(style: &Style, parent_width: Option<f32>) -> BoxSides {
    BoxSides {
        margin: resolve_margin(style, parent_width),
        padding: resolve_padding(style, parent_width),
        border: resolve_border(style, parent_width),
        scrollbar_gutter: scrollbar_gutter(style),
    }
}

/// Padding edges, floored at zero.
#[inline]
pub fn resolve_padding(style: &Style, parent_width: Option<f32>) -> Rect<f32> {
    let padding: Rect<f32> = style.padding.resolve_or_zero(parent_width);
    padding.map(|edge| edge.max(0.0))
}

/// Border widths, floored at zero.
#[inline]
pub fn resolve_border(style: &Style, parent_width: Option<f32>) -> Rect<f32> {
    let border: Rect<f32> = style.border.resolve_or_zero(parent_width);
    border.map(|edge| edge.max(0.0))
}

/// Margins with `auto` treated as zero. Margins may be negative.
#[inline]
pub fn resolve_margin(style: &Style, parent_width: Option<f32>) -> Rect<f32> {
    style.margin.resolve_or_zero(parent_width)
}

/// Margins with `auto` kept as `None` so the caller can distribute free space into them.
#[inline]
pub fn resolve_margin_auto(style: &Style, parent_width: Option<f32>) -> Rect<Option<f32>> {
    style.margin.map(|edge| match edge {
        LengthPercentageAuto::Auto => None,
        other => Some(other.resolve_or_zero(parent_width)),
    })
}

/// Which margins are `auto`.
#[inline]
pub fn auto_margins(style: &Style) -> Rect<bool> {
    style.margin.map(LengthPercentageAuto::is_auto)
}

/// Space reserved for scrollbars.
///
/// Only `overflow: scroll` reserves a gutter. A vertical scrollbar (`overflow-y`) takes
/// horizontal space and a horizontal scrollbar (`overflow-x`) takes vertical space.
#[inline]
pub fn scrollbar_gutter(style: &Style) -> Size<f32> {
    let reserve = |overflow: Overflow| {
        if overflow == Overflow::Scroll {
            style.scrollbar_width
        } else {
            0.0
        }
    };
    Size {
        width: reserve(style.overflow.y),
        height: reserve(style.overflow.x),
    }
}

/// Offsets from the border box to the content box.
///
/// The scrollbar gutter sits between the padding box and the border on the right and bottom.
#[inline]
pub fn content_box_inset(
    padding: Rect<f32>,
    border: Rect<f32>,
    scrollbar_gutter: Size<f32>,
) -> Rect<f32> {
    let mut inset = padding + border;
    inset.right += scrollbar_gutter.width;
    inset.bottom += scrollbar_gutter.height;
    inset
}

/// How far a child extends its parent's scrollable content, measured from the parent's
/// border-box origin.
///
/// Visible overflow lets the child's own content extend past its border box; any other overflow
/// value clips it. Children with an empty border box contribute nothing.
#[inline]
pub fn content_size_contribution(
    location: Point<f32>,
    size: Size<f32>,
    content_size: Size<f32>,
    overflow: Point<Overflow>,
) -> Size<f32> {
    let extent = Size {
        width: if overflow.x == Overflow::Visible {
            size.width.max(content_size.width)
        } else {
            size.width
        },
        height: if overflow.y == Overflow::Visible {
            size.height.max(content_size.height)
        } else {
            size.height
        },
    };
    if extent.has_non_zero_area() {
        Size {
            width: location.x + extent.width,
            height: location.y + extent.height,
        }
    } else {
        Size::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_orchestrator::style_model::LengthPercentage;

    fn edges(left: f32, right: f32, top: f32, bottom: f32) -> Rect<LengthPercentage> {
        Rect {
            left: LengthPercentage::Length(left),
            right: LengthPercentage::Length(right),
            top: LengthPercentage::Length(top),
            bottom: LengthPercentage::Length(bottom),
        }
    }

    #[test]
    /// # Panics
    /// Panics if negative padding or border survive resolution.
    fn padding_and_border_are_floored() {
        let style = Style {
            padding: edges(-4.0, 4.0, 3.5, 2.0),
            border: edges(1.0, -2.0, 0.0, 2.0),
            ..Style::default()
        };
        let sides = compute_box_sides(&style, Some(100.0));
        assert!(sides.padding.left.abs() < f32::EPSILON);
        assert!((sides.padding.top - 3.5).abs() < f32::EPSILON);
        assert!(sides.border.right.abs() < f32::EPSILON);
        assert!((sides.padding_border_sum().height - 7.5).abs() < f32::EPSILON);
    }

    #[test]
    /// # Panics
    /// Panics if percentage margins use the wrong basis or auto is not preserved.
    fn margins_resolve_against_parent_width() {
        let style = Style {
            margin: Rect {
                left: LengthPercentageAuto::Auto,
                right: LengthPercentageAuto::Percent(0.1),
                top: LengthPercentageAuto::Percent(0.5),
                bottom: LengthPercentageAuto::Length(-5.0),
            },
            ..Style::default()
        };
        let margin = resolve_margin(&style, Some(200.0));
        assert!(margin.left.abs() < f32::EPSILON);
        assert!((margin.right - 20.0).abs() < f32::EPSILON);
        assert!((margin.top - 100.0).abs() < f32::EPSILON);
        assert!((margin.bottom + 5.0).abs() < f32::EPSILON);
        let with_auto = resolve_margin_auto(&style, Some(200.0));
        assert_eq!(with_auto.left, None);
        assert!(auto_margins(&style).left);
    }

    #[test]
    /// # Panics
    /// Panics if the gutter is reserved in the wrong axis.
    fn scroll_reserves_gutter_in_cross_axis() {
        let style = Style {
            overflow: Point {
                x: Overflow::Visible,
                y: Overflow::Scroll,
            },
            scrollbar_width: 15.0,
            padding: edges(5.0, 5.0, 5.0, 5.0),
            ..Style::default()
        };
        let sides = compute_box_sides(&style, None);
        assert!((sides.scrollbar_gutter.width - 15.0).abs() < f32::EPSILON);
        assert!(sides.scrollbar_gutter.height.abs() < f32::EPSILON);
        let inset = sides.content_box_inset();
        assert!((inset.right - 20.0).abs() < f32::EPSILON);
        assert!((inset.left - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    /// # Panics
    /// Panics if clipped overflow still contributes the child's content.
    fn clipped_overflow_contributes_border_box_only() {
        let location = Point { x: 10.0, y: 5.0 };
        let size = Size {
            width: 20.0,
            height: 20.0,
        };
        let content = Size {
            width: 100.0,
            height: 10.0,
        };
        let visible = content_size_contribution(location, size, content, Point {
            x: Overflow::Visible,
            y: Overflow::Visible,
        });
        assert!((visible.width - 110.0).abs() < f32::EPSILON);
        let clipped = content_size_contribution(location, size, content, Point {
            x: Overflow::Hidden,
            y: Overflow::Visible,
        });
        assert!((clipped.width - 30.0).abs() < f32::EPSILON);
        assert!((clipped.height - 25.0).abs() < f32::EPSILON);
    }
}
