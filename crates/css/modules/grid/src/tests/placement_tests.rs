//! Tests for line resolution, named lines and auto-placement.

use css_orchestrator::style_model::{GridAutoFlow, GridPlacement};

use super::*;

fn lengths(sizes: &[f32]) -> Vec<TrackSizingFunction> {
    sizes
        .iter()
        .map(|size| TrackSizingFunction::length(*size))
        .collect()
}

#[test]
/// # Panics
/// Panics if auto-placed items do not fill a row before starting the next one.
fn auto_placement_fills_rows_in_order() {
    let mut tree = GridTree::new();
    let items: Vec<NodeId> = (0..3)
        .map(|_| tree.add_leaf(fixed(50.0, 20.0), Size::ZERO))
        .collect();
    let root = tree.add(container(Some(100.0), None, lengths(&[50.0, 50.0])), &items);
    let output = tree.layout(root);

    assert!(approx(tree.get(items[1]).location.x, 50.0));
    assert!(approx(tree.get(items[1]).location.y, 0.0));
    assert!(approx(tree.get(items[2]).location.x, 0.0));
    assert!(approx(tree.get(items[2]).location.y, 20.0));
    assert!(approx(output.size.height, 40.0));
}

#[test]
/// # Panics
/// Panics if a spanning item that does not fit after the cursor is not moved to the next row.
fn spanning_item_wraps_to_next_row() {
    let mut tree = GridTree::new();
    let first = tree.add_leaf(fixed(50.0, 20.0), Size::ZERO);
    let wide = tree.add_leaf(
        Style {
            grid_column: Line::span(3),
            size: Size {
                width: Dimension::Auto,
                height: Dimension::Length(20.0),
            },
            ..Style::default()
        },
        Size::ZERO,
    );
    let root = tree.add(
        container(Some(150.0), None, lengths(&[50.0, 50.0, 50.0])),
        &[first, wide],
    );
    tree.layout(root);

    assert!(approx(tree.get(wide).location.x, 0.0));
    assert!(approx(tree.get(wide).location.y, 20.0));
    assert!(approx(tree.get(wide).size.width, 150.0));
}

#[test]
/// # Panics
/// Panics if named lines do not resolve to their explicit line numbers.
fn named_lines_resolve_to_their_tracks() {
    let mut tree = GridTree::new();
    let item = tree.add_leaf(
        Style {
            grid_column: Line {
                start: GridPlacement::named("content"),
                end: GridPlacement::named("end"),
            },
            ..Style::default()
        },
        Size {
            width: 0.0,
            height: 10.0,
        },
    );
    let root = tree.add(
        Style {
            grid_template_column_names: vec![
                vec!["start".to_owned()],
                vec!["content".to_owned()],
                Vec::new(),
                vec!["end".to_owned()],
            ],
            ..container(Some(150.0), None, lengths(&[50.0, 70.0, 30.0]))
        },
        &[item],
    );
    tree.layout(root);

    assert!(approx(tree.get(item).location.x, 50.0));
    assert!(approx(tree.get(item).size.width, 100.0));
}

#[test]
/// # Panics
/// Panics if negative line numbers do not count back from the end of the explicit grid.
fn negative_lines_count_from_the_end() {
    let mut tree = GridTree::new();
    let item = tree.add_leaf(
        Style {
            grid_column: Line::from_lines(-2, -1),
            ..Style::default()
        },
        Size::ZERO,
    );
    let root = tree.add(
        container(Some(150.0), Some(20.0), lengths(&[50.0, 70.0, 30.0])),
        &[item],
    );
    tree.layout(root);

    assert!(approx(tree.get(item).location.x, 120.0));
    assert!(approx(tree.get(item).size.width, 30.0));
}

#[test]
/// # Panics
/// Panics if column flow does not fill columns before adding implicit ones.
fn column_flow_fills_columns() {
    let mut tree = GridTree::new();
    let items: Vec<NodeId> = (0..3)
        .map(|_| tree.add_leaf(fixed(30.0, 20.0), Size::ZERO))
        .collect();
    let root = tree.add(
        Style {
            grid_auto_flow: GridAutoFlow::Column,
            grid_template_rows: lengths(&[20.0, 20.0]),
            ..container(None, None, Vec::new())
        },
        &items,
    );
    let output = tree.layout(root);

    assert!(approx(tree.get(items[1]).location.y, 20.0));
    assert!(approx(tree.get(items[2]).location.x, 30.0));
    assert!(approx(tree.get(items[2]).location.y, 0.0));
    assert!(approx(output.size.width, 60.0));
}

#[test]
/// # Panics
/// Panics if a `display: none` child takes a grid cell.
fn hidden_children_take_no_cell() {
    let mut tree = GridTree::new();
    let hidden = tree.add_leaf(
        Style {
            display: Display::None,
            ..fixed(50.0, 20.0)
        },
        Size::ZERO,
    );
    let shown = tree.add_leaf(fixed(50.0, 20.0), Size::ZERO);
    let root = tree.add(
        container(Some(100.0), None, lengths(&[50.0, 50.0])),
        &[hidden, shown],
    );
    tree.layout(root);

    assert!(approx(tree.get(shown).location.x, 0.0));
    assert!(approx(tree.get(hidden).size.width, 0.0));
}
