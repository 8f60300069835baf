//! Measurement of nodes without children.

use css_box::compute_box_sides;
use css_orchestrator::style_model::{Display, Style};
use css_orchestrator::{
    AvailableSpace, CollapsibleMarginSet, LayoutInput, LayoutOutput, MaybeMath as _, Point,
    RunMode, Size,
};
use css_sizing::resolve_style_sizes_for_mode;
use log::trace;

/// Size a leaf from its styles, asking `measure` for the content size only when the styles leave
/// a dimension open.
///
/// `measure` receives the content-box known dimensions and the space left for content once the
/// leaf's padding, border, scrollbar gutter and margins are taken out.
pub fn compute_leaf_layout<MeasureFn>(
    inputs: LayoutInput,
    style: &Style,
    measure: MeasureFn,
) -> LayoutOutput
where
    MeasureFn: FnOnce(Size<Option<f32>>, Size<AvailableSpace>) -> Size<f32>,
{
    let LayoutInput {
        known_dimensions,
        parent_size,
        available_space,
        sizing_mode,
        run_mode,
        ..
    } = inputs;

    let sides = compute_box_sides(style, parent_size.width);
    let padding_border_sum = sides.padding_border_sum();
    let content_box_inset = sides.content_box_inset().sum_axes();
    let sizes = resolve_style_sizes_for_mode(style, parent_size, padding_border_sum, sizing_mode);
    let node_size = sizes
        .known_dimensions(known_dimensions)
        .maybe_apply_aspect_ratio(sizes.aspect_ratio);

    if run_mode == RunMode::ComputeSize
        && let Size {
            width: Some(width),
            height: Some(height),
        } = node_size
    {
        return LayoutOutput::from_outer_size(
            Size { width, height }.f32_max(padding_border_sum),
        );
    }

    // Margins come out of the parent's space, the content-box inset out of the border box.
    let content_available_space = available_space
        .maybe_sub(sides.margin.sum_axes())
        .maybe_set(node_size)
        .maybe_min(sizes.max_size)
        .maybe_clamp(sizes.min_size, sizes.max_size)
        .maybe_sub(content_box_inset);
    let measured = measure(
        node_size.maybe_sub(content_box_inset),
        content_available_space,
    );

    let outer = node_size.unwrap_or(measured + content_box_inset);
    let width = outer.width.maybe_clamp(sizes.min_size.width, sizes.max_size.width);
    let height = match (node_size.height, sizes.aspect_ratio) {
        (None, Some(ratio)) => outer.height.max(width / ratio),
        _ => outer.height,
    };
    let size = Size {
        width,
        height: height.maybe_clamp(sizes.min_size.height, sizes.max_size.height),
    }
    .f32_max(padding_border_sum);
    let content_size = measured + sides.padding.sum_axes();

    trace!(
        target: "layouter::leaf",
        "[LEAF] run_mode={run_mode:?} measured={}x{} size={}x{}",
        measured.width,
        measured.height,
        size.width,
        size.height
    );

    let collapses_through = style.display == Display::Block
        && !style.overflow.y.is_scroll_container()
        && style.aspect_ratio.is_none()
        && padding_border_sum.height <= 0.0
        && size.height <= 0.0
        && measured.height <= 0.0;

    LayoutOutput {
        size,
        content_size,
        first_baselines: Point::NONE,
        top_margin: CollapsibleMarginSet::ZERO,
        bottom_margin: CollapsibleMarginSet::ZERO,
        margins_can_collapse_through: collapses_through,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_orchestrator::style_model::{Dimension, LengthPercentage, LengthPercentageAuto};
    use css_orchestrator::{Line, Rect, RequestedAxis, SizingMode};

    fn inputs(run_mode: RunMode, available_space: Size<AvailableSpace>) -> LayoutInput {
        LayoutInput {
            run_mode,
            sizing_mode: SizingMode::InherentSize,
            axis: RequestedAxis::Both,
            known_dimensions: Size::NONE,
            parent_size: Size::NONE,
            available_space,
            vertical_margins_are_collapsible: Line::FALSE,
        }
    }

    #[test]
    /// # Panics
    /// Panics if a size-only request with a fully styled size still calls the measure function.
    fn styled_size_skips_measurement() {
        let style = Style {
            size: Size {
                width: Dimension::Length(40.0),
                height: Dimension::Length(30.0),
            },
            ..Style::default()
        };
        let output = compute_leaf_layout(
            inputs(RunMode::ComputeSize, Size::MAX_CONTENT),
            &style,
            |_, _| Size {
                width: 999.0,
                height: 999.0,
            },
        );
        assert!((output.size.width - 40.0).abs() < f32::EPSILON);
        assert!((output.size.height - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    /// # Panics
    /// Panics if a leaf's own margins are taken out of its styled width before measuring.
    fn styled_width_is_offered_without_margins() {
        let margin = LengthPercentageAuto::Length(10.0);
        let style = Style {
            size: Size {
                width: Dimension::Length(100.0),
                height: Dimension::Auto,
            },
            margin: Rect {
                left: margin,
                right: margin,
                top: LengthPercentageAuto::ZERO,
                bottom: LengthPercentageAuto::ZERO,
            },
            ..Style::default()
        };
        let mut seen = None;
        let output = compute_leaf_layout(
            inputs(RunMode::PerformLayout, Size::from_lengths(500.0, 500.0)),
            &style,
            |_, available| {
                seen = Some(available.width);
                Size {
                    width: 100.0,
                    height: 12.0,
                }
            },
        );
        assert_eq!(seen, Some(AvailableSpace::Definite(100.0)));
        assert!((output.size.width - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    /// # Panics
    /// Panics if an auto-sized leaf is offered more than its max width, or if the parent's space
    /// is not reduced by the leaf's margins.
    fn offered_space_respects_margins_and_max_width() {
        let margin = LengthPercentageAuto::Length(10.0);
        let style = Style {
            max_size: Size {
                width: Dimension::Length(200.0),
                height: Dimension::Auto,
            },
            margin: Rect {
                left: margin,
                right: margin,
                top: LengthPercentageAuto::ZERO,
                bottom: LengthPercentageAuto::ZERO,
            },
            ..Style::default()
        };
        let mut offered = Vec::new();
        for available in [Size::from_lengths(500.0, 500.0), Size::from_lengths(150.0, 500.0)] {
            let _output = compute_leaf_layout(
                inputs(RunMode::PerformLayout, available),
                &style,
                |_, space| {
                    offered.push(space.width);
                    Size::ZERO
                },
            );
        }
        assert_eq!(
            offered,
            [AvailableSpace::Definite(200.0), AvailableSpace::Definite(130.0)]
        );
    }

    #[test]
    /// # Panics
    /// Panics if a measured width does not drive the height through the aspect ratio.
    fn aspect_ratio_derives_height_from_measured_width() {
        let style = Style {
            aspect_ratio: Some(2.0),
            ..Style::default()
        };
        let output = compute_leaf_layout(
            inputs(RunMode::PerformLayout, Size::MAX_CONTENT),
            &style,
            |_, _| Size {
                width: 80.0,
                height: 10.0,
            },
        );
        assert!((output.size.width - 80.0).abs() < f32::EPSILON);
        assert!((output.size.height - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    /// # Panics
    /// Panics if the measured content is not wrapped in padding and border, or if the measure
    /// function sees space that still includes them.
    fn measured_content_gets_padding() {
        let padding = LengthPercentage::Length(5.0);
        let style = Style {
            padding: Rect {
                left: padding,
                right: padding,
                top: padding,
                bottom: padding,
            },
            ..Style::default()
        };
        let output = compute_leaf_layout(
            inputs(
                RunMode::PerformLayout,
                Size::from_lengths(100.0, 100.0),
            ),
            &style,
            |known, available| {
                assert_eq!(known, Size::NONE);
                assert_eq!(available.width, AvailableSpace::Definite(90.0));
                Size {
                    width: 20.0,
                    height: 10.0,
                }
            },
        );
        assert!((output.size.width - 30.0).abs() < f32::EPSILON);
        assert!((output.size.height - 20.0).abs() < f32::EPSILON);
        assert!(!output.margins_can_collapse_through);
    }

    #[test]
    /// # Panics
    /// Panics if an empty block leaf cannot have its margins collapsed through.
    fn empty_leaf_collapses_through() {
        let output = compute_leaf_layout(
            inputs(RunMode::PerformLayout, Size::MAX_CONTENT),
            &Style::default(),
            |_, _| Size::ZERO,
        );
        assert!(output.margins_can_collapse_through);
    }
}
