//! Grid items and their size contributions.
//!
//! Spec: <https://www.w3.org/TR/css-grid-2/#grid-items>

use core::ops::Range;

use css_box::{resolve_border, resolve_padding};
use css_orchestrator::style_model::{
    AlignItems, AlignSelf, Dimension, JustifySelf, LengthPercentageAuto, MinTrackSizingFunction,
    Overflow, Style,
};
use css_orchestrator::{
    AbsoluteAxis, AvailableSpace, LayoutPartialTree, Line, MaybeMath as _, MaybeResolve as _,
    NodeId, Point, Rect, ResolveOrZero as _, Size, SizingMode,
};
use css_sizing::box_sizing_adjustment;

use crate::placement::GridArea;
use crate::types::{GridTrack, TrackCounts};

/// Container-level inputs shared by every item.
#[derive(Debug, Clone, Copy)]
pub struct ItemDefaults {
    /// `align-items` of the container
    pub align_items: Option<AlignItems>,
    /// `justify-items` of the container
    pub justify_items: Option<AlignItems>,
    /// Content-box width of the container, the percentage basis for item padding and border
    pub inner_width: Option<f32>,
}

/// One in-flow child of a grid container.
#[derive(Debug, Clone)]
pub struct GridItem {
    /// The child node
    pub node: NodeId,
    /// Position among the container's children
    pub source_order: u16,
    /// Row lines (origin-zero)
    pub row: Line<i16>,
    /// Column lines (origin-zero)
    pub column: Line<i16>,
    /// Row track indexes covered, end exclusive
    pub row_indexes: Line<u16>,
    /// Column track indexes covered, end exclusive
    pub column_indexes: Line<u16>,
    /// Overflow per axis
    pub overflow: Point<Overflow>,
    /// Added to style sizes to get border-box sizes
    pub box_sizing_adjustment: Size<f32>,
    /// Preferred size
    pub size: Size<Dimension>,
    /// Minimum size
    pub min_size: Size<Dimension>,
    /// Maximum size
    pub max_size: Size<Dimension>,
    /// Preferred aspect ratio
    pub aspect_ratio: Option<f32>,
    /// Resolved padding
    pub padding: Rect<f32>,
    /// Resolved border
    pub border: Rect<f32>,
    /// Margins as styled
    pub margin: Rect<LengthPercentageAuto>,
    /// Insets as styled (relative positioning)
    pub inset: Rect<LengthPercentageAuto>,
    /// Block-axis alignment within the grid area
    pub align_self: AlignSelf,
    /// Inline-axis alignment within the grid area
    pub justify_self: JustifySelf,
    /// First baseline relative to the item's margin-box top
    pub baseline: Option<f32>,
    /// Extra top margin that lines the baseline up with the rest of the row
    pub baseline_shim: f32,
    /// Spans a flexible row
    pub crosses_flexible_row: bool,
    /// Spans a row with an intrinsic sizing function
    pub crosses_intrinsic_row: bool,
    /// Spans a flexible column
    pub crosses_flexible_column: bool,
    /// Spans a column with an intrinsic sizing function
    pub crosses_intrinsic_column: bool,
    /// The space the contribution caches were computed under
    pub available_space_cache: Option<Size<Option<f32>>>,
    /// Cached min-content contributions
    pub min_content_contribution_cache: Size<Option<f32>>,
    /// Cached minimum contributions
    pub minimum_contribution_cache: Size<Option<f32>>,
    /// Cached max-content contributions
    pub max_content_contribution_cache: Size<Option<f32>>,
    /// Top of the item's row, used while resolving baselines
    pub y_position: f32,
    /// Height measured while resolving baselines
    pub height: f32,
}

/// Default self-alignment: items with a preferred size (or aspect ratio for the block axis)
/// keep it instead of stretching.
fn default_alignment(has_preferred_size: bool) -> AlignItems {
    if has_preferred_size {
        AlignItems::Start
    } else {
        AlignItems::Stretch
    }
}

impl GridItem {
    /// Build an item from its style and placed area.
    pub fn new(
        node: NodeId,
        source_order: u16,
        style: &Style,
        area: GridArea,
        defaults: ItemDefaults,
    ) -> Self {
        let padding = resolve_padding(style, defaults.inner_width);
        let border = resolve_border(style, defaults.inner_width);
        let padding_border_sum = (padding + border).sum_axes();
        let justify_self = style
            .justify_self
            .or(defaults.justify_items)
            .unwrap_or_else(|| default_alignment(!style.size.width.is_auto()));
        let align_self = style.align_self.or(defaults.align_items).unwrap_or_else(|| {
            default_alignment(!style.size.height.is_auto() || style.aspect_ratio.is_some())
        });
        Self {
            node,
            source_order,
            row: area.row,
            column: area.column,
            row_indexes: Line::default(),
            column_indexes: Line::default(),
            overflow: style.overflow,
            box_sizing_adjustment: box_sizing_adjustment(style, padding_border_sum),
            size: style.size,
            min_size: style.min_size,
            max_size: style.max_size,
            aspect_ratio: style.aspect_ratio,
            padding,
            border,
            margin: style.margin,
            inset: style.inset,
            align_self,
            justify_self,
            baseline: None,
            baseline_shim: 0.0,
            crosses_flexible_row: false,
            crosses_intrinsic_row: false,
            crosses_flexible_column: false,
            crosses_intrinsic_column: false,
            available_space_cache: None,
            min_content_contribution_cache: Size::NONE,
            minimum_contribution_cache: Size::NONE,
            max_content_contribution_cache: Size::NONE,
            y_position: 0.0,
            height: 0.0,
        }
    }

    /// Origin-zero lines in `axis`.
    #[inline]
    pub const fn placement(&self, axis: AbsoluteAxis) -> Line<i16> {
        match axis {
            AbsoluteAxis::Horizontal => self.column,
            AbsoluteAxis::Vertical => self.row,
        }
    }

    /// Convert the item's lines to track indexes once the final track counts are known.
    pub fn update_track_indexes(&mut self, columns: TrackCounts, rows: TrackCounts) {
        let to_indexes = |counts: TrackCounts, lines: Line<i16>| {
            let range = counts.oz_line_range_to_track_range(lines);
            Line {
                start: u16::try_from(range.start).unwrap_or(u16::MAX),
                end: u16::try_from(range.end).unwrap_or(u16::MAX),
            }
        };
        self.column_indexes = to_indexes(columns, self.column);
        self.row_indexes = to_indexes(rows, self.row);
    }

    /// Track indexes covered in `axis`.
    #[inline]
    pub fn track_range(&self, axis: AbsoluteAxis) -> Range<usize> {
        let indexes = match axis {
            AbsoluteAxis::Horizontal => self.column_indexes,
            AbsoluteAxis::Vertical => self.row_indexes,
        };
        usize::from(indexes.start)..usize::from(indexes.end)
    }

    /// Number of tracks spanned in `axis`.
    #[inline]
    pub fn span(&self, axis: AbsoluteAxis) -> u16 {
        let lines = self.placement(axis);
        (lines.end - lines.start).max(0).unsigned_abs()
    }

    /// Whether the item spans a flexible track in `axis`.
    #[inline]
    pub const fn crosses_flexible_track(&self, axis: AbsoluteAxis) -> bool {
        match axis {
            AbsoluteAxis::Horizontal => self.crosses_flexible_column,
            AbsoluteAxis::Vertical => self.crosses_flexible_row,
        }
    }

    /// Whether the item spans a track with an intrinsic sizing function in `axis`.
    #[inline]
    pub const fn crosses_intrinsic_track(&self, axis: AbsoluteAxis) -> bool {
        match axis {
            AbsoluteAxis::Horizontal => self.crosses_intrinsic_column,
            AbsoluteAxis::Vertical => self.crosses_intrinsic_row,
        }
    }

    /// Record which kinds of track the item spans.
    pub fn update_track_flags(&mut self, columns: &[GridTrack], rows: &[GridTrack]) {
        let spanned = |tracks: &[GridTrack], range: Range<usize>| {
            let covered = tracks.get(range).unwrap_or_default();
            (
                covered.iter().any(GridTrack::is_flexible),
                covered.iter().any(GridTrack::has_intrinsic_sizing_function),
            )
        };
        (self.crosses_flexible_column, self.crosses_intrinsic_column) =
            spanned(columns, self.track_range(AbsoluteAxis::Horizontal));
        (self.crosses_flexible_row, self.crosses_intrinsic_row) =
            spanned(rows, self.track_range(AbsoluteAxis::Vertical));
    }

    /// Margin sums per axis (`auto` as zero) with the baseline shim added to the height.
    pub fn margins_axis_sums_with_baseline_shims(&self, inner_width: Option<f32>) -> Size<f32> {
        let margin: Rect<f32> = self.margin.resolve_or_zero(inner_width);
        Size {
            width: margin.horizontal_axis_sum(),
            height: margin.vertical_axis_sum() + self.baseline_shim,
        }
    }

    /// The border-box size fixed by style or by stretching into `grid_area_size`.
    ///
    /// Spec: <https://www.w3.org/TR/css-grid-2/#grid-item-sizing>
    pub fn known_dimensions(
        &self,
        inner_node_size: Size<Option<f32>>,
        grid_area_size: Size<Option<f32>>,
    ) -> Size<Option<f32>> {
        let margins = self.margins_axis_sums_with_baseline_shims(inner_node_size.width);
        let aspect_ratio = self.aspect_ratio;
        let inherent_size = self
            .size
            .maybe_resolve(grid_area_size)
            .maybe_apply_aspect_ratio(aspect_ratio)
            .maybe_add(self.box_sizing_adjustment);
        let min_size = self
            .min_size
            .maybe_resolve(grid_area_size)
            .maybe_apply_aspect_ratio(aspect_ratio)
            .maybe_add(self.box_sizing_adjustment);
        let max_size = self
            .max_size
            .maybe_resolve(grid_area_size)
            .maybe_add(self.box_sizing_adjustment);
        let area_minus_margins = grid_area_size.maybe_sub(margins.map(Some));

        let stretches =
            |alignment: AlignItems, start: LengthPercentageAuto, end: LengthPercentageAuto| {
                alignment == AlignItems::Stretch && !start.is_auto() && !end.is_auto()
            };
        let width = inherent_size.width.or_else(|| {
            stretches(self.justify_self, self.margin.left, self.margin.right)
                .then_some(area_minus_margins.width)
                .flatten()
        });
        // A stretched width may imply the height through the aspect ratio.
        let Size {
            width,
            height: ratio_height,
        } = Size {
            width,
            height: inherent_size.height,
        }
        .maybe_apply_aspect_ratio(aspect_ratio);
        let height = ratio_height.or_else(|| {
            stretches(self.align_self, self.margin.top, self.margin.bottom)
                .then_some(area_minus_margins.height)
                .flatten()
        });

        Size { width, height }
            .maybe_apply_aspect_ratio(aspect_ratio)
            .maybe_clamp(min_size, max_size)
    }

    /// Sum of the definite max sizing functions of the spanned tracks and the gutters between
    /// them, or `None` if any spanned track has a non-fixed maximum.
    pub fn spanned_track_limit(
        &self,
        axis: AbsoluteAxis,
        tracks: &[GridTrack],
        gap: f32,
        axis_inner_size: Option<f32>,
    ) -> Option<f32> {
        let spanned = tracks.get(self.track_range(axis)).unwrap_or_default();
        let limit = spanned
            .iter()
            .map(|track| track.max_track_sizing_function.definite_limit(axis_inner_size))
            .sum::<Option<f32>>()?;
        Some(limit + gap * spanned.len().saturating_sub(1) as f32)
    }

    /// Forget cached contributions if the space they were computed under changed.
    pub fn refresh_cache(&mut self, available_space: Size<Option<f32>>) {
        if self.available_space_cache != Some(available_space) {
            self.available_space_cache = Some(available_space);
            self.min_content_contribution_cache = Size::NONE;
            self.minimum_contribution_cache = Size::NONE;
            self.max_content_contribution_cache = Size::NONE;
        }
    }

    /// Measure the item's outer size in `axis` under an intrinsic sizing constraint.
    fn measure_contribution(
        &self,
        tree: &mut impl LayoutPartialTree,
        axis: AbsoluteAxis,
        available_space: Size<Option<f32>>,
        inner_node_size: Size<Option<f32>>,
        constraint: AvailableSpace,
    ) -> f32 {
        let known_dimensions = self.known_dimensions(inner_node_size, available_space);
        let available =
            available_space.map(|space| space.map_or(constraint, AvailableSpace::Definite));
        tree.measure_child_size(
            self.node,
            known_dimensions,
            inner_node_size,
            available,
            SizingMode::InherentSize,
            axis,
        ) + self
            .margins_axis_sums_with_baseline_shims(inner_node_size.width)
            .get_abs(axis)
    }

    /// The outer min-content contribution in `axis`.
    pub fn min_content_contribution(
        &mut self,
        tree: &mut impl LayoutPartialTree,
        axis: AbsoluteAxis,
        available_space: Size<Option<f32>>,
        inner_node_size: Size<Option<f32>>,
    ) -> f32 {
        if let Some(cached) = self.min_content_contribution_cache.get_abs(axis) {
            return cached;
        }
        let contribution = self.measure_contribution(
            tree,
            axis,
            available_space,
            inner_node_size,
            AvailableSpace::MinContent,
        );
        self.min_content_contribution_cache.set_abs(axis, Some(contribution));
        contribution
    }

    /// The outer max-content contribution in `axis`.
    pub fn max_content_contribution(
        &mut self,
        tree: &mut impl LayoutPartialTree,
        axis: AbsoluteAxis,
        available_space: Size<Option<f32>>,
        inner_node_size: Size<Option<f32>>,
    ) -> f32 {
        if let Some(cached) = self.max_content_contribution_cache.get_abs(axis) {
            return cached;
        }
        let contribution = self.measure_contribution(
            tree,
            axis,
            available_space,
            inner_node_size,
            AvailableSpace::MaxContent,
        );
        self.max_content_contribution_cache.set_abs(axis, Some(contribution));
        contribution
    }

    /// The outer minimum contribution in `axis`: the preferred size, else the minimum size, else
    /// the automatic minimum size.
    ///
    /// Spec: <https://www.w3.org/TR/css-grid-2/#min-size-auto>
    pub fn minimum_contribution(
        &mut self,
        tree: &mut impl LayoutPartialTree,
        axis: AbsoluteAxis,
        tracks: &[GridTrack],
        gap: f32,
        available_space: Size<Option<f32>>,
        inner_node_size: Size<Option<f32>>,
    ) -> f32 {
        if let Some(cached) = self.minimum_contribution_cache.get_abs(axis) {
            return cached;
        }
        let margins = self
            .margins_axis_sums_with_baseline_shims(inner_node_size.width)
            .get_abs(axis);
        let style_size = |dimension: Size<Dimension>| {
            dimension
                .maybe_resolve(available_space)
                .maybe_apply_aspect_ratio(self.aspect_ratio)
                .maybe_add(self.box_sizing_adjustment)
                .get_abs(axis)
        };
        let fixed = style_size(self.size)
            .or_else(|| style_size(self.min_size))
            .or_else(|| self.overflow.get_abs(axis).maybe_into_automatic_min_size());

        let contribution = if let Some(size) = fixed {
            size + margins
        } else if self.uses_content_based_minimum(axis, tracks) {
            let axis_inner_size = inner_node_size.get_abs(axis);
            let max_size = self
                .max_size
                .maybe_resolve(available_space)
                .maybe_add(self.box_sizing_adjustment)
                .get_abs(axis)
                .map(|max| max + margins);
            self.min_content_contribution(tree, axis, available_space, inner_node_size)
                .maybe_min(self.spanned_track_limit(axis, tracks, gap, axis_inner_size))
                .maybe_min(max_size)
        } else {
            margins
        };
        self.minimum_contribution_cache.set_abs(axis, Some(contribution));
        contribution
    }

    /// Whether the automatic minimum size is content-based: the item spans an `auto` minimum
    /// track and either spans a single track or no flexible one.
    fn uses_content_based_minimum(&self, axis: AbsoluteAxis, tracks: &[GridTrack]) -> bool {
        let spans_auto_min_track = tracks
            .get(self.track_range(axis))
            .unwrap_or_default()
            .iter()
            .any(|track| track.min_track_sizing_function == MinTrackSizingFunction::Auto);
        spans_auto_min_track && (self.span(axis) == 1 || !self.crosses_flexible_track(axis))
    }
}

/// Space for measuring an item in `axis`: the item's extent in the other axis is known from the
/// other axis' track sizes once that axis has been sized, and estimated from definite track
/// maximums before.
pub fn other_axis_space(
    item: &GridItem,
    axis: AbsoluteAxis,
    other_tracks: &[GridTrack],
    other_gap: f32,
    other_inner_size: Option<f32>,
    other_axis_sized: bool,
) -> Size<Option<f32>> {
    let other_axis = axis.other_axis();
    let spanned = other_tracks
        .get(item.track_range(other_axis))
        .unwrap_or_default();
    let gaps = other_gap * spanned.len().saturating_sub(1) as f32;
    let extent = if other_axis_sized {
        Some(spanned.iter().map(|track| track.base_size).sum::<f32>() + gaps)
    } else {
        spanned
            .iter()
            .map(|track| track.max_track_sizing_function.definite_value(other_inner_size))
            .sum::<Option<f32>>()
            .map(|sum| sum + gaps)
    };
    let mut space = Size::NONE;
    space.set_abs(other_axis, extent);
    space
}
