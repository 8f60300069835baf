//! Tests for line breaking and `align-content` in multi-line containers.

use css_orchestrator::style_model::{AlignContent, FlexWrap};

use super::*;

fn wrapping(width: f32, height: Option<f32>, flex_wrap: FlexWrap) -> Style {
    Style {
        flex_wrap,
        ..container(Some(width), height)
    }
}

#[test]
/// # Panics
/// Panics if items that do not fit are not moved to a new line.
fn overflowing_item_wraps_to_next_line() {
    let mut tree = FlexTree::new();
    let items: Vec<NodeId> = (0..3)
        .map(|_| tree.add_leaf(fixed(80.0, 20.0), Size::ZERO))
        .collect();
    let root = tree.add(wrapping(200.0, None, FlexWrap::Wrap), &items);
    let output = tree.layout(root);

    assert!(approx(tree.get(items[1]).location.x, 80.0));
    assert!(approx(tree.get(items[2]).location.x, 0.0));
    assert!(approx(tree.get(items[2]).location.y, 20.0));
    assert!(approx(output.size.height, 40.0));
}

#[test]
/// # Panics
/// Panics if a single-line container breaks lines.
fn nowrap_keeps_one_line() {
    let mut tree = FlexTree::new();
    let items: Vec<NodeId> = (0..3)
        .map(|_| {
            tree.add_leaf(
                Style {
                    flex_shrink: 0.0,
                    ..fixed(80.0, 20.0)
                },
                Size::ZERO,
            )
        })
        .collect();
    let root = tree.add(wrapping(200.0, None, FlexWrap::NoWrap), &items);
    let output = tree.layout(root);

    assert!(approx(tree.get(items[2]).location.x, 160.0));
    assert!(approx(tree.get(items[2]).location.y, 0.0));
    assert!(approx(output.size.height, 20.0));
}

#[test]
/// # Panics
/// Panics if `wrap-reverse` does not stack lines from the cross end.
fn wrap_reverse_stacks_from_bottom() {
    let mut tree = FlexTree::new();
    let items: Vec<NodeId> = (0..3)
        .map(|_| tree.add_leaf(fixed(80.0, 20.0), Size::ZERO))
        .collect();
    let root = tree.add(wrapping(200.0, None, FlexWrap::WrapReverse), &items);
    tree.layout(root);

    assert!(approx(tree.get(items[0]).location.y, 20.0));
    assert!(approx(tree.get(items[2]).location.y, 0.0));
}

#[test]
/// # Panics
/// Panics if stretched lines do not share the leftover cross space.
fn align_content_stretch_grows_lines() {
    let mut tree = FlexTree::new();
    let items: Vec<NodeId> = (0..3)
        .map(|_| tree.add_leaf(fixed(80.0, 20.0), Size::ZERO))
        .collect();
    let root = tree.add(
        Style {
            align_content: Some(AlignContent::Stretch),
            ..wrapping(200.0, Some(100.0), FlexWrap::Wrap)
        },
        &items,
    );
    tree.layout(root);

    // Two lines of 20 grow to 50 each.
    assert!(approx(tree.get(items[2]).location.y, 50.0));
}

#[test]
/// # Panics
/// Panics if `align-content: center` does not center the block of lines.
fn align_content_center_offsets_lines() {
    let mut tree = FlexTree::new();
    let items: Vec<NodeId> = (0..3)
        .map(|_| tree.add_leaf(fixed(80.0, 20.0), Size::ZERO))
        .collect();
    let root = tree.add(
        Style {
            align_content: Some(AlignContent::Center),
            ..wrapping(200.0, Some(100.0), FlexWrap::Wrap)
        },
        &items,
    );
    tree.layout(root);

    assert!(approx(tree.get(items[0]).location.y, 30.0));
    assert!(approx(tree.get(items[2]).location.y, 50.0));
}
