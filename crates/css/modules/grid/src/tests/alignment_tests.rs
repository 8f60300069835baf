//! Tests for self-alignment, auto margins, baselines and absolutely positioned children.

use css_orchestrator::Rect;
use css_orchestrator::style_model::{AlignItems, LengthPercentageAuto, Position};

use super::*;

fn square(size: f32) -> Style {
    Style {
        grid_template_rows: vec![TrackSizingFunction::length(size)],
        ..container(Some(size), Some(size), vec![TrackSizingFunction::length(size)])
    }
}

#[test]
/// # Panics
/// Panics if `justify-items` and `align-self` do not place the item inside its area.
fn self_alignment_within_area() {
    let mut tree = GridTree::new();
    let item = tree.add_leaf(
        Style {
            align_self: Some(AlignItems::End),
            ..fixed(40.0, 20.0)
        },
        Size::ZERO,
    );
    let root = tree.add(
        Style {
            justify_items: Some(AlignItems::Center),
            ..square(100.0)
        },
        &[item],
    );
    tree.layout(root);

    assert!(approx(tree.get(item).location.x, 30.0));
    assert!(approx(tree.get(item).location.y, 80.0));
}

#[test]
/// # Panics
/// Panics if an auto start margin does not push the item to the end of its area.
fn auto_margin_absorbs_free_space() {
    let mut tree = GridTree::new();
    let item = tree.add_leaf(
        Style {
            margin: Rect {
                left: LengthPercentageAuto::Auto,
                ..Style::default().margin
            },
            ..fixed(40.0, 20.0)
        },
        Size::ZERO,
    );
    let root = tree.add(square(100.0), &[item]);
    tree.layout(root);

    assert!(approx(tree.get(item).location.x, 60.0));
    assert!(approx(tree.get(item).margin.left, 60.0));
}

#[test]
/// # Panics
/// Panics if the grid does not report the first row's item baseline.
fn first_baseline_comes_from_first_row() {
    let mut tree = GridTree::new();
    let first = tree.add_leaf(fixed(40.0, 20.0), Size::ZERO);
    let second = tree.add_leaf(fixed(40.0, 30.0), Size::ZERO);
    let root = tree.add(
        container(Some(100.0), None, vec![TrackSizingFunction::length(100.0)]),
        &[first, second],
    );
    let output = tree.layout(root);

    assert_eq!(output.first_baselines.y, Some(20.0));
    assert!(approx(output.size.height, 50.0));
}

#[test]
/// # Panics
/// Panics if absolutely positioned children are not placed against their grid lines.
fn absolute_children_use_grid_lines() {
    let mut tree = GridTree::new();
    let flowing = tree.add_leaf(fixed(10.0, 10.0), Size::ZERO);
    let anchored = tree.add_leaf(
        Style {
            position: Position::Absolute,
            grid_column: Line::from_lines(2, 3),
            grid_row: Line::from_lines(2, 3),
            inset: Rect {
                left: LengthPercentageAuto::ZERO,
                right: LengthPercentageAuto::ZERO,
                top: LengthPercentageAuto::ZERO,
                bottom: LengthPercentageAuto::ZERO,
            },
            ..Style::default()
        },
        Size::ZERO,
    );
    let loose = tree.add_leaf(
        Style {
            position: Position::Absolute,
            ..fixed(10.0, 10.0)
        },
        Size::ZERO,
    );
    let two_by_two = vec![
        TrackSizingFunction::length(100.0),
        TrackSizingFunction::length(100.0),
    ];
    let root = tree.add(
        Style {
            grid_template_rows: two_by_two.clone(),
            ..container(Some(200.0), Some(200.0), two_by_two)
        },
        &[flowing, anchored, loose],
    );
    tree.layout(root);

    let anchored_layout = tree.get(anchored);
    assert!(approx(anchored_layout.location.x, 100.0));
    assert!(approx(anchored_layout.location.y, 100.0));
    assert!(approx(anchored_layout.size.width, 100.0));
    assert!(approx(anchored_layout.size.height, 100.0));

    let loose_layout = tree.get(loose);
    assert!(approx(loose_layout.location.x, 0.0));
    assert!(approx(loose_layout.location.y, 0.0));
    assert_eq!(tree.get(flowing).order, 0);
}
