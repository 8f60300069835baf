//! Flex Items
//! Spec: <https://www.w3.org/TR/css-flexbox-1/#flex-items>
//!
//! Item generation, the available space offered to items, and the flex base size together with
//! the automatic minimum size (§4.5).

use css_box::compute_box_sides;
use css_orchestrator::style_model::{AlignSelf, BoxGenerationMode, Overflow, Position};
use css_orchestrator::{
    AvailableSpace, LayoutPartialTree, MaybeMath as _, MaybeResolve as _, NodeId, Point, Rect,
    Size, SizingMode,
};
use css_sizing::{automatic_min_size, box_sizing_adjustment, resolve_style_sizes};
use log::trace;

use crate::chapter4::AlgoConstants;

/// A box-generating, in-flow child of a flex container and the values the algorithm computes
/// for it.
#[derive(Debug, Clone)]
pub struct FlexItem {
    /// The child node
    pub node: NodeId,
    /// Index of the child among all children of the container
    pub order: u32,
    /// Preferred border-box size
    pub size: Size<Option<f32>>,
    /// Minimum border-box size
    pub min_size: Size<Option<f32>>,
    /// Maximum border-box size
    pub max_size: Size<Option<f32>>,
    /// Whether the preferred size is `auto` in each axis
    pub size_is_auto: Size<bool>,
    /// The `flex-basis` style resolved to a border-box length, if definite
    pub style_flex_basis: Option<f32>,
    /// Cross-axis alignment
    pub align_self: AlignSelf,
    /// Overflow per axis
    pub overflow: Point<Overflow>,
    /// Minimum size implied by `overflow`
    pub automatic_min_size: Size<Option<f32>>,
    /// Space reserved for scrollbars
    pub scrollbar_size: Size<f32>,
    /// Share of positive free space
    pub flex_grow: f32,
    /// Share of negative free space
    pub flex_shrink: f32,
    /// Lower bound of the main size during flexing
    pub resolved_minimum_main_size: f32,
    /// Resolved insets for relative positioning
    pub inset: Rect<Option<f32>>,
    /// Margins with `auto` resolved to zero until alignment
    pub margin: Rect<f32>,
    /// Which margins are `auto`
    pub margin_is_auto: Rect<bool>,
    /// Resolved padding
    pub padding: Rect<f32>,
    /// Resolved border
    pub border: Rect<f32>,
    /// Flex base size (border box)
    pub flex_basis: f32,
    /// Flex base size minus padding and border
    pub inner_flex_basis: f32,
    /// Clamping adjustment from the last flexing iteration
    pub violation: f32,
    /// Whether the main size is final
    pub frozen: bool,
    /// Flex fraction used when sizing the container from content
    pub content_flex_fraction: f32,
    /// Hypothetical border-box size
    pub hypothetical_inner_size: Size<f32>,
    /// Hypothetical margin-box size
    pub hypothetical_outer_size: Size<f32>,
    /// Used border-box size
    pub target_size: Size<f32>,
    /// Used margin-box size
    pub outer_target_size: Size<f32>,
    /// Distance from the item's margin-box top to its first baseline
    pub baseline: f32,
    /// Main-axis offset from the previous item
    pub offset_main: f32,
    /// Cross-axis offset within the line
    pub offset_cross: f32,
}

/// 9.1.1 Generate a flex item for each in-flow, box-generating child.
pub fn generate_anonymous_flex_items(
    tree: &impl LayoutPartialTree,
    node: NodeId,
    constants: &AlgoConstants,
) -> Vec<FlexItem> {
    let dir = constants.dir;
    let node_inner_size = constants.node_inner_size;
    tree.child_ids(node)
        .iter()
        .enumerate()
        .map(|(index, &child)| (index, child, tree.style(child)))
        .filter(|(_, _, style)| style.position != Position::Absolute)
        .filter(|(_, _, style)| style.box_generation_mode() != BoxGenerationMode::None)
        .map(|(index, child, style)| {
            let sides = compute_box_sides(style, node_inner_size.width);
            let padding_border_sum = sides.padding_border_sum();
            let sizes = resolve_style_sizes(style, node_inner_size, padding_border_sum);
            let style_flex_basis = style
                .flex_basis
                .maybe_resolve(node_inner_size.main(dir))
                .maybe_add(box_sizing_adjustment(style, padding_border_sum).main(dir));
            FlexItem {
                node: child,
                order: u32::try_from(index).unwrap_or(u32::MAX),
                size: sizes.size,
                min_size: sizes.min_size,
                max_size: sizes.max_size,
                size_is_auto: style.size.map(|dimension| dimension.is_auto()),
                style_flex_basis,
                align_self: style.align_self.unwrap_or(constants.align_items),
                overflow: style.overflow,
                automatic_min_size: automatic_min_size(style),
                scrollbar_size: sides.scrollbar_gutter,
                flex_grow: style.flex_grow,
                flex_shrink: style.flex_shrink,
                resolved_minimum_main_size: 0.0,
                inset: style
                    .inset
                    .zip_size(node_inner_size, |value, basis| value.maybe_resolve(basis)),
                margin: sides.margin,
                margin_is_auto: style.margin.map(|margin| margin.is_auto()),
                padding: sides.padding,
                border: sides.border,
                flex_basis: 0.0,
                inner_flex_basis: 0.0,
                violation: 0.0,
                frozen: false,
                content_flex_fraction: 0.0,
                hypothetical_inner_size: Size::ZERO,
                hypothetical_outer_size: Size::ZERO,
                target_size: Size::ZERO,
                outer_target_size: Size::ZERO,
                baseline: 0.0,
                offset_main: 0.0,
                offset_cross: 0.0,
            }
        })
        .collect()
}

/// 9.2.2 Determine the available main and cross space for the flex items.
///
/// A definite container size gives its content box; otherwise the space offered to the container
/// minus its margins and content-box inset.
pub fn determine_available_space(
    known_dimensions: Size<Option<f32>>,
    outer_available_space: Size<AvailableSpace>,
    constants: &AlgoConstants,
) -> Size<AvailableSpace> {
    let inset_sum = constants.content_box_inset.sum_axes();
    let margin_sum = constants.margin.sum_axes();
    Size {
        width: known_dimensions.width.map_or_else(
            || {
                outer_available_space
                    .width
                    .maybe_sub(margin_sum.width)
                    .maybe_sub(inset_sum.width)
            },
            |width| AvailableSpace::Definite(width - inset_sum.width),
        ),
        height: known_dimensions.height.map_or_else(
            || {
                outer_available_space
                    .height
                    .maybe_sub(margin_sum.height)
                    .maybe_sub(inset_sum.height)
            },
            |height| AvailableSpace::Definite(height - inset_sum.height),
        ),
    }
}

/// Inputs shared by the content measurements of one item.
struct MeasureContext {
    known_dimensions: Size<Option<f32>>,
    parent_size: Size<Option<f32>>,
    cross_available_space: AvailableSpace,
}

/// 9.2.3 Determine the flex base size and hypothetical main size of each item, then its
/// automatic minimum main size.
pub fn determine_flex_base_size(
    tree: &mut impl LayoutPartialTree,
    constants: &AlgoConstants,
    available_space: Size<AvailableSpace>,
    flex_items: &mut [FlexItem],
) {
    let dir = constants.dir;
    for child in flex_items.iter_mut() {
        let context = measure_context(child, constants, available_space);

        // A. A definite flex basis (or, with `flex-basis: auto`, a definite main size) is the
        // flex base size. E. Otherwise size the item under max-content in the main axis.
        let flex_basis = child
            .style_flex_basis
            .or(child.size.main(dir))
            .unwrap_or_else(|| {
                let main_available_space = if available_space.main(dir) == AvailableSpace::MinContent
                {
                    AvailableSpace::MinContent
                } else {
                    AvailableSpace::MaxContent
                };
                measure_main_content(tree, child.node, &context, main_available_space, constants)
            });

        let padding_border_sum = (child.padding + child.border).sum_axes();
        let main_padding_border = padding_border_sum.main(dir);
        child.flex_basis = flex_basis.max(main_padding_border);
        child.inner_flex_basis = child.flex_basis - main_padding_border;

        let hypothetical_min_main = child.min_size.main(dir).maybe_max(main_padding_border);
        let hypothetical_inner_size =
            child.flex_basis.maybe_clamp(hypothetical_min_main, child.max_size.main(dir));
        child.hypothetical_inner_size.set_main(dir, hypothetical_inner_size);
        child
            .hypothetical_outer_size
            .set_main(dir, hypothetical_inner_size + child.margin.main_axis_sum(dir));

        // 4.5. Automatic Minimum Size of Flex Items
        let style_min_main_size = child.min_size.or(child.automatic_min_size).main(dir);
        child.resolved_minimum_main_size = style_min_main_size.unwrap_or_else(|| {
            measure_main_content(tree, child.node, &context, AvailableSpace::MinContent, constants)
                .maybe_min(child.size.main(dir))
                .maybe_min(child.max_size.main(dir))
                .max(main_padding_border)
        });

        trace!(
            target: "css::flexbox",
            "[FLEX-BASIS child={:?}] basis={} hypothetical_main={} min_main={}",
            child.node,
            child.flex_basis,
            hypothetical_inner_size,
            child.resolved_minimum_main_size
        );
    }
}

/// Known dimensions, percentage basis and cross-axis space used to measure one item.
fn measure_context(
    child: &FlexItem,
    constants: &AlgoConstants,
    available_space: Size<AvailableSpace>,
) -> MeasureContext {
    let dir = constants.dir;
    let cross_axis_parent_size = constants.node_inner_size.cross(dir);
    let cross_margin_sum = constants.margin.cross_axis_sum(dir);
    let cross_available_space = available_space
        .cross(dir)
        .map_definite_value(|value| cross_axis_parent_size.unwrap_or(value))
        .maybe_clamp(
            child.min_size.cross(dir).maybe_add(cross_margin_sum),
            child.max_size.cross(dir).maybe_add(cross_margin_sum),
        );

    // Stretched items are measured at the cross size they will be stretched to.
    let mut known_dimensions = child.size.with_main(dir, None);
    if child.align_self == AlignSelf::Stretch && known_dimensions.cross(dir).is_none() {
        known_dimensions.set_cross(
            dir,
            cross_available_space
                .into_option()
                .maybe_sub(child.margin.cross_axis_sum(dir)),
        );
    }

    MeasureContext {
        known_dimensions,
        parent_size: Size::NONE.with_cross(dir, cross_axis_parent_size),
        cross_available_space,
    }
}

/// The content-based main size of an item under `main_available_space`.
fn measure_main_content(
    tree: &mut impl LayoutPartialTree,
    node: NodeId,
    context: &MeasureContext,
    main_available_space: AvailableSpace,
    constants: &AlgoConstants,
) -> f32 {
    let dir = constants.dir;
    tree.measure_child_size(
        node,
        context.known_dimensions,
        context.parent_size,
        Size::MAX_CONTENT
            .with_main(dir, main_available_space)
            .with_cross(dir, context.cross_available_space),
        SizingMode::ContentSize,
        dir.main_axis(),
    )
}
