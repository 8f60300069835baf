//! Tests for main-axis justification, cross-axis alignment and out-of-flow children.

use css_orchestrator::Rect;
use css_orchestrator::style_model::{
    AlignItems, FlexDirection, JustifyContent, LengthPercentage, LengthPercentageAuto, Position,
};

use super::*;

fn justified(justify_content: JustifyContent) -> Style {
    Style {
        justify_content: Some(justify_content),
        ..container(Some(300.0), Some(100.0))
    }
}

#[test]
/// # Panics
/// Panics if centered items are not offset by half the free space.
fn justify_center_splits_free_space() {
    let mut tree = FlexTree::new();
    let first = tree.add_leaf(fixed(50.0, 20.0), Size::ZERO);
    let second = tree.add_leaf(fixed(50.0, 20.0), Size::ZERO);
    let root = tree.add(justified(JustifyContent::Center), &[first, second]);
    tree.layout(root);

    assert!(approx(tree.get(first).location.x, 100.0));
    assert!(approx(tree.get(second).location.x, 150.0));
}

#[test]
/// # Panics
/// Panics if space-between does not pin the outer items to the container edges.
fn justify_space_between_pins_edges() {
    let mut tree = FlexTree::new();
    let items: Vec<NodeId> = (0..3)
        .map(|_| tree.add_leaf(fixed(50.0, 20.0), Size::ZERO))
        .collect();
    let root = tree.add(justified(JustifyContent::SpaceBetween), &items);
    tree.layout(root);

    let xs: Vec<f32> = items.iter().map(|item| tree.get(*item).location.x).collect();
    assert!(approx(xs[0], 0.0));
    assert!(approx(xs[1], 125.0));
    assert!(approx(xs[2], 250.0));
}

#[test]
/// # Panics
/// Panics if `align-items: center` does not center items in the line.
fn align_items_center() {
    let mut tree = FlexTree::new();
    let item = tree.add_leaf(fixed(50.0, 20.0), Size::ZERO);
    let root = tree.add(
        Style {
            align_items: Some(AlignItems::Center),
            ..container(Some(300.0), Some(100.0))
        },
        &[item],
    );
    tree.layout(root);

    assert!(approx(tree.get(item).location.y, 40.0));
    assert!(approx(tree.get(item).size.height, 20.0));
}

#[test]
/// # Panics
/// Panics if an auto-height item is not stretched to the line.
fn auto_cross_size_stretches() {
    let mut tree = FlexTree::new();
    let item = tree.add_leaf(
        Style {
            size: Size {
                width: Dimension::Length(50.0),
                height: Dimension::Auto,
            },
            ..Style::default()
        },
        Size::ZERO,
    );
    let root = tree.add(container(Some(300.0), Some(100.0)), &[item]);
    tree.layout(root);

    assert!(approx(tree.get(item).size.height, 100.0));
    assert!(approx(tree.get(item).location.y, 0.0));
}

#[test]
/// # Panics
/// Panics if a column container does not stack items and grow to fit them.
fn column_stacks_items() {
    let mut tree = FlexTree::new();
    let tall = |height: f32| Style {
        size: Size {
            width: Dimension::Auto,
            height: Dimension::Length(height),
        },
        ..Style::default()
    };
    let first = tree.add_leaf(tall(30.0), Size::ZERO);
    let second = tree.add_leaf(tall(40.0), Size::ZERO);
    let root = tree.add(
        Style {
            flex_direction: FlexDirection::Column,
            ..container(Some(100.0), None)
        },
        &[first, second],
    );
    let output = tree.layout(root);

    assert!(approx(output.size.height, 70.0));
    assert!(approx(tree.get(first).location.y, 0.0));
    assert!(approx(tree.get(second).location.y, 30.0));
    assert!(approx(tree.get(second).size.width, 100.0));
}

#[test]
/// # Panics
/// Panics if an auto main-start margin does not absorb the free space.
fn auto_margin_pushes_item_to_end() {
    let mut tree = FlexTree::new();
    let item = tree.add_leaf(
        Style {
            margin: Rect {
                left: LengthPercentageAuto::Auto,
                ..Style::DEFAULT.margin
            },
            ..fixed(50.0, 20.0)
        },
        Size::ZERO,
    );
    let root = tree.add(justified(JustifyContent::Center), &[item]);
    tree.layout(root);

    assert!(approx(tree.get(item).location.x, 250.0));
}

#[test]
/// # Panics
/// Panics if a reversed row does not start from the right edge.
fn row_reverse_starts_at_main_end() {
    let mut tree = FlexTree::new();
    let first = tree.add_leaf(fixed(50.0, 20.0), Size::ZERO);
    let second = tree.add_leaf(fixed(50.0, 20.0), Size::ZERO);
    let root = tree.add(
        Style {
            flex_direction: FlexDirection::RowReverse,
            ..container(Some(300.0), Some(100.0))
        },
        &[first, second],
    );
    tree.layout(root);

    assert!(approx(tree.get(first).location.x, 250.0));
    assert!(approx(tree.get(second).location.x, 200.0));
}

#[test]
/// # Panics
/// Panics if the column gap is not inserted between adjacent items.
fn column_gap_separates_items() {
    let mut tree = FlexTree::new();
    let first = tree.add_leaf(fixed(50.0, 20.0), Size::ZERO);
    let second = tree.add_leaf(fixed(50.0, 20.0), Size::ZERO);
    let root = tree.add(
        Style {
            gap: Size {
                width: LengthPercentage::Length(10.0),
                height: LengthPercentage::ZERO,
            },
            ..container(Some(300.0), Some(100.0))
        },
        &[first, second],
    );
    tree.layout(root);

    assert!(approx(tree.get(first).location.x, 0.0));
    assert!(approx(tree.get(second).location.x, 60.0));
}

#[test]
/// # Panics
/// Panics if an absolutely positioned child ignores its insets.
fn absolute_child_uses_insets() {
    let mut tree = FlexTree::new();
    let flowing = tree.add_leaf(fixed(50.0, 20.0), Size::ZERO);
    let absolute = tree.add_leaf(
        Style {
            position: Position::Absolute,
            inset: Rect {
                left: LengthPercentageAuto::Auto,
                right: LengthPercentageAuto::Length(10.0),
                top: LengthPercentageAuto::Length(5.0),
                bottom: LengthPercentageAuto::Auto,
            },
            ..fixed(20.0, 20.0)
        },
        Size::ZERO,
    );
    let root = tree.add(container(Some(300.0), Some(100.0)), &[flowing, absolute]);
    tree.layout(root);

    assert!(approx(tree.get(absolute).location.x, 270.0));
    assert!(approx(tree.get(absolute).location.y, 5.0));
    // Out-of-flow children do not take part in line layout.
    assert!(approx(tree.get(flowing).location.x, 0.0));
}

#[test]
/// # Panics
/// Panics if a `display: none` child gets a non-zero layout.
fn hidden_child_collapses() {
    let mut tree = FlexTree::new();
    let hidden = tree.add_leaf(
        Style {
            display: Display::None,
            ..fixed(50.0, 20.0)
        },
        Size::ZERO,
    );
    let visible = tree.add_leaf(fixed(50.0, 20.0), Size::ZERO);
    let root = tree.add(container(Some(300.0), Some(100.0)), &[hidden, visible]);
    tree.layout(root);

    assert!(approx(tree.get(hidden).size.width, 0.0));
    assert!(approx(tree.get(visible).location.x, 0.0));
}
