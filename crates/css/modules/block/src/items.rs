//! Block-level children of a block container.

use css_box::{compute_box_sides, scrollbar_gutter};
use css_orchestrator::style_model::{
    BoxGenerationMode, LengthPercentageAuto, Overflow, Position,
};
use css_orchestrator::{
    AbsoluteAxis, AvailableSpace, LayoutPartialTree, MaybeMath as _, NodeId, Point, Rect,
    ResolveOrZero as _, Size, SizingMode,
};
use css_sizing::resolve_style_sizes;

/// A box-generating child, resolved once per container layout and mutated as layout proceeds.
#[derive(Debug, Clone)]
pub struct BlockItem {
    /// The child node
    pub node_id: NodeId,
    /// Paint order among box-generating siblings
    pub order: u32,
    /// Border-box preferred size
    pub size: Size<Option<f32>>,
    /// Border-box minimum size
    pub min_size: Size<Option<f32>>,
    /// Border-box maximum size
    pub max_size: Size<Option<f32>>,
    /// Overflow per axis
    pub overflow: Point<Overflow>,
    /// Space reserved for scrollbars
    pub scrollbar_size: Size<f32>,
    /// Positioning scheme
    pub position: Position,
    /// Raw insets
    pub inset: Rect<LengthPercentageAuto>,
    /// Raw margins
    pub margin: Rect<LengthPercentageAuto>,
    /// Resolved padding
    pub padding: Rect<f32>,
    /// Resolved border
    pub border: Rect<f32>,
    /// Padding plus border per axis
    pub padding_border_sum: Size<f32>,
    /// Border-box size after final layout
    pub computed_size: Size<f32>,
    /// Where the child would sit if it were in flow
    pub static_position: Point<f32>,
    /// Whether the child's margins collapsed through it during final layout
    pub can_be_collapsed_through: bool,
}

impl BlockItem {
    /// Whether the child is absolutely positioned.
    #[inline]
    pub fn is_absolute(&self) -> bool {
        self.position == Position::Absolute
    }
}

/// Collect the box-generating children of `node`, resolving their sizes against the container's
/// content box.
pub fn generate_item_list(
    tree: &impl LayoutPartialTree,
    node: NodeId,
    node_inner_size: Size<Option<f32>>,
) -> Vec<BlockItem> {
    tree.child_ids(node)
        .iter()
        .map(|&child| (child, tree.style(child)))
        .filter(|(_, style)| style.box_generation_mode() != BoxGenerationMode::None)
        .enumerate()
        .map(|(order, (child, style))| {
            let sides = compute_box_sides(style, node_inner_size.width);
            let padding_border_sum = sides.padding_border_sum();
            let sizes = resolve_style_sizes(style, node_inner_size, padding_border_sum);
            BlockItem {
                node_id: child,
                order: u32::try_from(order).unwrap_or(u32::MAX),
                size: sizes.size,
                min_size: sizes.min_size,
                max_size: sizes.max_size,
                overflow: style.overflow,
                scrollbar_size: scrollbar_gutter(style),
                position: style.position,
                inset: style.inset,
                margin: style.margin,
                padding: sides.padding,
                border: sides.border,
                padding_border_sum,
                computed_size: Size::ZERO,
                static_position: Point::ZERO,
                can_be_collapsed_through: false,
            }
        })
        .collect()
}

/// The width of the widest in-flow child, used when the container's own width is not known.
///
/// Children are sized under the offered width with a min-content height, margins included.
pub fn determine_content_based_container_width(
    tree: &mut impl LayoutPartialTree,
    items: &[BlockItem],
    available_width: AvailableSpace,
) -> f32 {
    let available_space = Size {
        width: available_width,
        height: AvailableSpace::MinContent,
    };

    let mut max_child_width: f32 = 0.0;
    for item in items.iter().filter(|item| !item.is_absolute()) {
        let known_dimensions = item.size.maybe_clamp(item.min_size, item.max_size);
        let width = known_dimensions.width.unwrap_or_else(|| {
            let margin: Rect<f32> = item.margin.resolve_or_zero(available_width.into_option());
            let x_margin_sum = margin.horizontal_axis_sum();
            let content_width = tree.measure_child_size(
                item.node_id,
                known_dimensions,
                Size::NONE,
                available_space.map_width(|width| width.maybe_sub(x_margin_sum)),
                SizingMode::InherentSize,
                AbsoluteAxis::Horizontal,
            );
            content_width + x_margin_sum
        });
        max_child_width = max_child_width.max(width.max(item.padding_border_sum.width));
    }
    max_child_width
}
