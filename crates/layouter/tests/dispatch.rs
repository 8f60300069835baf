//! Dispatch to the block, flexbox and grid algorithms, leaf measurement and caching.
#![allow(clippy::tests_outside_test_module, reason = "integration tests")]

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use css_orchestrator::style_model::{
    Dimension, Display, LengthPercentageAuto, Style, TrackSizingFunction,
};
use css_orchestrator::{AvailableSpace, Rect, Size};
use layouter::LayoutTree;

fn init_logging() {
    let _logger_ready = env_logger::builder().is_test(true).try_init().is_ok();
}

fn approx(actual: f32, expected: f32) -> bool {
    (actual - expected).abs() < 0.01
}

fn sized(width: f32, height: f32) -> Style {
    Style {
        size: Size {
            width: Dimension::Length(width),
            height: Dimension::Length(height),
        },
        ..Style::default()
    }
}

fn viewport(width: f32, height: f32) -> Size<AvailableSpace> {
    Size::from_lengths(width, height)
}

#[test]
fn block_root_fills_available_width_and_stacks_children() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let first = tree.new_leaf(Style {
        size: Size {
            width: Dimension::Auto,
            height: Dimension::Length(30.0),
        },
        ..Style::default()
    });
    let second = tree.new_leaf(sized(50.0, 20.0));
    let root = tree.new_with_children(Style::default(), &[first, second])?;
    tree.compute_layout(root, viewport(400.0, 300.0))?;

    assert!(approx(tree.layout(root)?.size.width, 400.0));
    assert!(approx(tree.layout(root)?.size.height, 50.0));
    assert!(approx(tree.layout(first)?.size.width, 400.0));
    assert!(approx(tree.layout(second)?.location.y, 30.0));
    Ok(())
}

#[test]
fn adjoining_block_margins_collapse() -> Result<()> {
    init_logging();
    let margin = |top: f32, bottom: f32| Rect {
        left: LengthPercentageAuto::ZERO,
        right: LengthPercentageAuto::ZERO,
        top: LengthPercentageAuto::Length(top),
        bottom: LengthPercentageAuto::Length(bottom),
    };
    let mut tree = LayoutTree::new();
    let upper = tree.new_leaf(Style {
        margin: margin(0.0, 20.0),
        ..sized(10.0, 10.0)
    });
    let lower = tree.new_leaf(Style {
        margin: margin(30.0, 0.0),
        ..sized(10.0, 10.0)
    });
    let root = tree.new_with_children(Style::default(), &[upper, lower])?;
    tree.compute_layout(root, viewport(100.0, 100.0))?;

    assert!(approx(tree.layout(lower)?.location.y, 40.0));
    Ok(())
}

#[test]
fn flex_items_grow_into_free_space() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let grow = |flex_grow: f32| Style {
        flex_grow,
        flex_basis: Dimension::Length(0.0),
        ..Style::default()
    };
    let one = tree.new_leaf(grow(1.0));
    let two = tree.new_leaf(grow(2.0));
    let root = tree.new_with_children(
        Style {
            display: Display::Flex,
            ..sized(300.0, 100.0)
        },
        &[one, two],
    )?;
    tree.compute_layout(root, Size::MAX_CONTENT)?;

    assert!(approx(tree.layout(one)?.size.width, 100.0));
    assert!(approx(tree.layout(two)?.size.width, 200.0));
    assert!(approx(tree.layout(two)?.location.x, 100.0));
    Ok(())
}

#[test]
fn grid_fr_tracks_split_the_width() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let first = tree.new_leaf(Style::default());
    let second = tree.new_leaf(Style::default());
    let root = tree.new_with_children(
        Style {
            display: Display::Grid,
            grid_template_columns: vec![TrackSizingFunction::fr(1.0), TrackSizingFunction::fr(1.0)],
            ..sized(200.0, 50.0)
        },
        &[first, second],
    )?;
    tree.compute_layout(root, Size::MAX_CONTENT)?;

    assert!(approx(tree.layout(first)?.size.width, 100.0));
    assert!(approx(tree.layout(second)?.location.x, 100.0));
    Ok(())
}

#[test]
fn hidden_subtrees_get_zero_layouts() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let nested = tree.new_leaf(sized(40.0, 40.0));
    let hidden = tree.new_with_children(
        Style {
            display: Display::None,
            ..sized(80.0, 80.0)
        },
        &[nested],
    )?;
    let shown = tree.new_leaf(sized(20.0, 20.0));
    let root = tree.new_with_children(Style::default(), &[hidden, shown])?;
    tree.compute_layout(root, viewport(200.0, 200.0))?;

    assert!(approx(tree.layout(hidden)?.size.width, 0.0));
    assert!(approx(tree.layout(nested)?.size.width, 0.0));
    assert!(approx(tree.layout(shown)?.location.y, 0.0));
    assert!(approx(tree.layout(shown)?.size.width, 20.0));
    Ok(())
}

#[test]
fn measure_function_sizes_leaves_and_is_cached() -> Result<()> {
    init_logging();
    let calls = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&calls);
    let mut tree = LayoutTree::new();
    let text = tree.new_leaf_with_measure(Style::default(), move |_, _| {
        counter.set(counter.get() + 1);
        Size {
            width: 60.0,
            height: 15.0,
        }
    });
    let root = tree.new_with_children(
        Style {
            display: Display::Flex,
            ..Style::default()
        },
        &[text],
    )?;

    tree.compute_layout(root, Size::MAX_CONTENT)?;
    assert!(approx(tree.layout(text)?.size.width, 60.0));
    assert!(approx(tree.layout(root)?.size.height, 15.0));
    let after_first = calls.get();
    assert!(after_first > 0);

    tree.compute_layout(root, Size::MAX_CONTENT)?;
    assert_eq!(calls.get(), after_first);

    tree.mark_dirty(text)?;
    tree.compute_layout(root, Size::MAX_CONTENT)?;
    assert!(calls.get() > after_first);
    Ok(())
}

#[test]
fn repeated_layout_is_idempotent() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let children: Vec<_> = [10.0, 11.0, 12.0, 13.0]
        .into_iter()
        .map(|width| tree.new_leaf(sized(width, 12.5)))
        .collect();
    let root = tree.new_with_children(
        Style {
            display: Display::Flex,
            ..Style::default()
        },
        &children,
    )?;
    tree.compute_layout(root, viewport(500.0, 500.0))?;
    let first: Vec<_> = children
        .iter()
        .map(|child| tree.layout(*child).copied())
        .collect::<Result<_>>()?;

    tree.compute_layout(root, viewport(500.0, 500.0))?;
    let second: Vec<_> = children
        .iter()
        .map(|child| tree.layout(*child).copied())
        .collect::<Result<_>>()?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn style_changes_invalidate_results() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let child = tree.new_leaf(sized(30.0, 30.0));
    let root = tree.new_with_children(Style::default(), &[child])?;
    tree.compute_layout(root, viewport(100.0, 100.0))?;
    assert!(approx(tree.layout(root)?.size.height, 30.0));

    tree.set_style(child, sized(30.0, 70.0))?;
    tree.compute_layout(root, viewport(100.0, 100.0))?;
    assert!(approx(tree.layout(root)?.size.height, 70.0));
    Ok(())
}
