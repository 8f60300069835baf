//! Track alignment and the final placement of items inside their grid areas.
//!
//! Spec: <https://www.w3.org/TR/css-grid-2/#alignment>

use core::ops::Range;

use css_box::{content_size_contribution, scrollbar_gutter};
use css_orchestrator::style_model::{AlignContent, AlignItems, LengthPercentageAuto};
use css_orchestrator::{
    AbsoluteAxis, AvailableSpace, Layout, LayoutPartialTree, Line, MaybeResolve as _, Point, Rect, Size,
    SizingMode,
};

use crate::items::GridItem;
use crate::types::{GridTrack, sum_of_track_sizes};

/// Position tracks along one axis with `align-content`/`justify-content`.
///
/// Offsets are measured from the container's border-box edge; `start_inset` is the padding
/// and border before the first track. Collapsed tracks sit at the current position and take no
/// gutter.
pub fn align_tracks(
    inner_size: f32,
    start_inset: f32,
    tracks: &mut [GridTrack],
    gap: f32,
    alignment: AlignContent,
) {
    let free_space = inner_size - sum_of_track_sizes(tracks, gap);
    let visible = tracks.iter().filter(|track| !track.is_collapsed).count();
    let count = visible as f32;
    let (leading, between) = match alignment.with_fallback(free_space, visible) {
        AlignContent::Start | AlignContent::FlexStart | AlignContent::Stretch => (0.0, 0.0),
        AlignContent::End | AlignContent::FlexEnd => (free_space, 0.0),
        AlignContent::Center => (free_space / 2.0, 0.0),
        AlignContent::SpaceBetween => (0.0, free_space / (count - 1.0)),
        AlignContent::SpaceAround => (free_space / count / 2.0, free_space / count),
        AlignContent::SpaceEvenly => (free_space / (count + 1.0), free_space / (count + 1.0)),
    };

    let mut offset = start_inset + leading;
    let mut after_visible = false;
    for track in tracks.iter_mut() {
        if track.is_collapsed {
            track.offset = offset;
            continue;
        }
        if after_visible {
            offset += gap + between;
        }
        track.offset = offset;
        offset += track.base_size;
        after_visible = true;
    }
}

/// The border-box rectangle of a grid area, from the offsets of its first and last tracks.
pub fn area_of(item: &GridItem, columns: &[GridTrack], rows: &[GridTrack]) -> Rect<f32> {
    let span = |tracks: &[GridTrack], range: Range<usize>| {
        let spanned = tracks.get(range).unwrap_or_default();
        match (spanned.first(), spanned.last()) {
            (Some(first), Some(last)) => (first.offset, last.offset + last.base_size),
            _ => (0.0, 0.0),
        }
    };
    let (left, right) = span(columns, item.track_range(AbsoluteAxis::Horizontal));
    let (top, bottom) = span(rows, item.track_range(AbsoluteAxis::Vertical));
    Rect {
        left,
        right,
        top,
        bottom,
    }
}

/// Where an item ended up.
#[derive(Debug, Clone, Copy)]
pub struct PlacedItem {
    /// How far the item extends the container's scrollable content
    pub content_size_contribution: Size<f32>,
    /// The item's first baseline from the container's border-box top
    pub baseline: f32,
}

/// Offset of an item's margin box start within its area along one axis, and the resolved
/// margins. Auto margins absorb free space before self-alignment applies.
fn align_in_area(
    area_size: f32,
    size: f32,
    margin: Line<LengthPercentageAuto>,
    percentage_basis: Option<f32>,
    alignment: AlignItems,
    baseline_shim: f32,
) -> (f32, Line<f32>) {
    let start = margin.start.maybe_resolve(percentage_basis);
    let end = margin.end.maybe_resolve(percentage_basis);
    let free_space = area_size - size - start.unwrap_or(0.0) - end.unwrap_or(0.0);
    let auto_free = free_space.max(0.0);
    match (start, end) {
        (None, None) => (0.0, Line {
            start: auto_free / 2.0,
            end: auto_free / 2.0,
        }),
        (None, Some(end)) => (0.0, Line {
            start: auto_free,
            end,
        }),
        (Some(start), None) => (0.0, Line {
            start,
            end: auto_free,
        }),
        (Some(start), Some(end)) => {
            let offset = match alignment {
                AlignItems::Start | AlignItems::FlexStart | AlignItems::Stretch => 0.0,
                AlignItems::Baseline => baseline_shim,
                AlignItems::End | AlignItems::FlexEnd => free_space,
                AlignItems::Center => free_space / 2.0,
            };
            (offset, Line { start, end })
        }
    }
}

/// Lay out one item inside its area, write its layout and report its contribution.
///
/// Spec: <https://www.w3.org/TR/css-grid-2/#grid-item-sizing>
pub fn align_and_position_item(
    tree: &mut impl LayoutPartialTree,
    item: &GridItem,
    area: Rect<f32>,
    inner_node_size: Size<Option<f32>>,
) -> PlacedItem {
    let area_size = Size {
        width: area.right - area.left,
        height: area.bottom - area.top,
    };
    let known_dimensions = item.known_dimensions(inner_node_size, area_size.map(Some));
    let output = tree.perform_child_layout(
        item.node,
        known_dimensions,
        inner_node_size,
        area_size.map(AvailableSpace::Definite),
        SizingMode::InherentSize,
        Line::FALSE,
    );
    let size = known_dimensions.unwrap_or(output.size);

    let (x_offset, horizontal_margin) = align_in_area(
        area_size.width,
        size.width,
        Line {
            start: item.margin.left,
            end: item.margin.right,
        },
        inner_node_size.width,
        item.justify_self,
        0.0,
    );
    let (y_offset, vertical_margin) = align_in_area(
        area_size.height,
        size.height,
        Line {
            start: item.margin.top,
            end: item.margin.bottom,
        },
        inner_node_size.width,
        item.align_self,
        item.baseline_shim,
    );

    // Relative offsets: start insets win over end insets.
    let inset = |start: LengthPercentageAuto, end: LengthPercentageAuto, basis: f32| {
        start
            .maybe_resolve(Some(basis))
            .or_else(|| end.maybe_resolve(Some(basis)).map(|value| -value))
            .unwrap_or(0.0)
    };
    let location = Point {
        x: area.left
            + horizontal_margin.start
            + x_offset
            + inset(item.inset.left, item.inset.right, area_size.width),
        y: area.top
            + vertical_margin.start
            + y_offset
            + inset(item.inset.top, item.inset.bottom, area_size.height),
    };

    let scrollbar_size = scrollbar_gutter(tree.style(item.node));
    tree.set_unrounded_layout(
        item.node,
        &Layout {
            order: u32::from(item.source_order),
            location,
            size,
            content_size: output.content_size,
            scrollbar_size,
            border: item.border,
            padding: item.padding,
            margin: Rect {
                left: horizontal_margin.start,
                right: horizontal_margin.end,
                top: vertical_margin.start,
                bottom: vertical_margin.end,
            },
        },
    );

    PlacedItem {
        content_size_contribution: content_size_contribution(
            location,
            size,
            output.content_size,
            item.overflow,
        ),
        baseline: location.y + output.first_baselines.y.unwrap_or(size.height),
    }
}
