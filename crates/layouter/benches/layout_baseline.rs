//! Baseline timings for full layout passes over synthetic trees.

use std::hint::black_box;

use anyhow::Result;
use criterion::{Criterion, criterion_group, criterion_main};
use css_orchestrator::style_model::{Dimension, Display, Style, TrackSizingFunction};
use css_orchestrator::{NodeId, Size};
use layouter::LayoutTree;

fn leaf_style(height: f32) -> Style {
    Style {
        size: Size {
            width: Dimension::Auto,
            height: Dimension::Length(height),
        },
        ..Style::default()
    }
}

/// A chain of nested blocks `depth` levels deep with a measured leaf at the bottom.
fn build_deep_tree(depth: usize) -> Result<(LayoutTree, NodeId)> {
    let mut tree = LayoutTree::with_capacity(depth + 1);
    let mut node = tree.new_leaf_with_measure(Style::default(), |_, available| Size {
        width: available.width.unwrap_or(120.0).min(120.0),
        height: 18.0,
    });
    for level in 0..depth {
        let display = match level % 3 {
            0 => Display::Block,
            1 => Display::Flex,
            _ => Display::Grid,
        };
        node = tree.new_with_children(
            Style {
                display,
                ..Style::default()
            },
            &[node],
        )?;
    }
    Ok((tree, node))
}

/// A flex row of `rows` block rows, each holding a four-column grid of `cells` leaves.
fn build_wide_tree(rows: usize, cells: usize) -> Result<(LayoutTree, NodeId)> {
    let mut tree = LayoutTree::with_capacity(rows * (cells + 1) + 1);
    let mut row_nodes = Vec::with_capacity(rows);
    for row in 0..rows {
        let leaves: Vec<_> = (0..cells)
            .map(|cell| tree.new_leaf(leaf_style(10.0 + ((row + cell) % 7) as f32)))
            .collect();
        let grid = tree.new_with_children(
            Style {
                display: Display::Grid,
                grid_template_columns: vec![TrackSizingFunction::fr(1.0); 4],
                ..Style::default()
            },
            &leaves,
        )?;
        row_nodes.push(grid);
    }
    let root = tree.new_with_children(Style::default(), &row_nodes)?;
    Ok((tree, root))
}

fn bench_layout(criterion: &mut Criterion) {
    let viewport = Size::from_lengths(1024.0, 768.0);

    if let Ok((mut tree, root)) = build_deep_tree(60) {
        criterion.bench_function("layout_deep_cold", |bencher| {
            bencher.iter(|| {
                let _marked = tree.mark_dirty(root).is_ok();
                black_box(tree.compute_layout(root, viewport).is_ok())
            });
        });
    }

    if let Ok((mut tree, root)) = build_wide_tree(50, 16) {
        criterion.bench_function("layout_wide_cold", |bencher| {
            bencher.iter(|| {
                for child in tree.children(root).map(<[NodeId]>::to_vec).unwrap_or_default() {
                    let _marked = tree.mark_dirty(child).is_ok();
                }
                black_box(tree.compute_layout(root, viewport).is_ok())
            });
        });
        criterion.bench_function("layout_wide_cached", |bencher| {
            bencher.iter(|| black_box(tree.compute_layout(root, viewport).is_ok()));
        });
    }
}

criterion_group!(layout_benches, bench_layout);
criterion_main!(layout_benches);
