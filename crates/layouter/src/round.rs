//! Pixel rounding of final layouts.
//!
//! Edges are rounded in absolute coordinates and sizes are taken as the difference of rounded
//! edges, so boxes that touch before rounding still touch afterwards and never overlap.

use css_orchestrator::{LayoutPartialTree, NodeId, TraversePartialTree};

use crate::tree::NodeArena;

/// Round the layouts of the subtree under `root` into its final layouts.
pub fn round_layout(arena: &mut NodeArena, root: NodeId) {
    round_layout_inner(arena, root, 0.0, 0.0);
}

/// Rounded length of the span `[start, start + length]`.
fn round_span(start: f32, length: f32) -> f32 {
    (start + length).round() - start.round()
}

fn round_layout_inner(arena: &mut NodeArena, node: NodeId, cumulative_x: f32, cumulative_y: f32) {
    let unrounded = arena.unrounded_layout(node);
    let mut layout = unrounded;

    let left = cumulative_x + unrounded.location.x;
    let top = cumulative_y + unrounded.location.y;
    let right = left + unrounded.size.width;
    let bottom = top + unrounded.size.height;

    layout.location.x = unrounded.location.x.round();
    layout.location.y = unrounded.location.y.round();
    layout.size.width = round_span(left, unrounded.size.width);
    layout.size.height = round_span(top, unrounded.size.height);

    // Content extents and scrollbars are lengths from the box origin.
    layout.content_size.width = round_span(left, unrounded.content_size.width);
    layout.content_size.height = round_span(top, unrounded.content_size.height);
    layout.scrollbar_size.width = unrounded.scrollbar_size.width.round();
    layout.scrollbar_size.height = unrounded.scrollbar_size.height.round();

    layout.border.left = round_span(left, unrounded.border.left);
    layout.border.right = round_span(right - unrounded.border.right, unrounded.border.right);
    layout.border.top = round_span(top, unrounded.border.top);
    layout.border.bottom = round_span(bottom - unrounded.border.bottom, unrounded.border.bottom);

    let padding_left = left + unrounded.border.left;
    let padding_right = right - unrounded.border.right;
    let padding_top = top + unrounded.border.top;
    let padding_bottom = bottom - unrounded.border.bottom;
    layout.padding.left = round_span(padding_left, unrounded.padding.left);
    layout.padding.right =
        round_span(padding_right - unrounded.padding.right, unrounded.padding.right);
    layout.padding.top = round_span(padding_top, unrounded.padding.top);
    layout.padding.bottom =
        round_span(padding_bottom - unrounded.padding.bottom, unrounded.padding.bottom);

    layout.margin = unrounded.margin.map(f32::round);

    arena.set_final_layout(node, layout);

    let children = arena.child_ids(node).to_vec();
    for child in children {
        round_layout_inner(arena, child, left, top);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// # Panics
    /// Panics if rounding adjacent thirds loses or gains a pixel.
    fn adjacent_spans_share_edges() {
        let third = 100.0 / 3.0;
        let widths = [
            round_span(0.0, third),
            round_span(third, third),
            round_span(2.0 * third, third),
        ];
        assert!((widths.iter().sum::<f32>() - 100.0).abs() < f32::EPSILON);
        assert!(widths.iter().all(|width| (width - width.round()).abs() < f32::EPSILON));
    }
}
