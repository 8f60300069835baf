//! Host tree mutations, error reporting and cache invalidation.
#![allow(clippy::tests_outside_test_module, reason = "integration tests")]

use anyhow::Result;
use css_orchestrator::style_model::Style;
use css_orchestrator::{NodeId, Size};
use layouter::LayoutTree;

fn init_logging() {
    let _logger_ready = env_logger::builder().is_test(true).try_init().is_ok();
}

#[test]
fn unknown_ids_are_reported() {
    init_logging();
    let mut tree = LayoutTree::new();
    let missing = NodeId::new(42);
    assert!(tree.style(missing).is_err());
    assert!(tree.children(missing).is_err());
    assert!(tree.mark_dirty(missing).is_err());
    assert!(tree.compute_layout(missing, Size::MAX_CONTENT).is_err());

    let leaf = tree.new_leaf(Style::default());
    let error = tree.add_child(leaf, missing).err();
    assert!(error.is_some_and(|error| error.to_string().contains("unknown node")));
}

#[test]
fn children_keep_order_and_parents() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let first = tree.new_leaf(Style::default());
    let second = tree.new_leaf(Style::default());
    let third = tree.new_leaf(Style::default());
    let root = tree.new_with_children(Style::default(), &[first, third])?;

    tree.insert_child_at_index(root, 1, second)?;
    assert_eq!(tree.children(root)?, &[first, second, third]);
    assert_eq!(tree.parent(second)?, Some(root));
    assert_eq!(tree.child_count(root)?, 3);

    assert!(tree.insert_child_at_index(root, 9, second).is_err());
    assert_eq!(tree.children(root)?, &[first, second, third]);
    assert!(tree.remove_child(first, second).is_err());

    assert_eq!(tree.remove_child(root, second)?, second);
    assert_eq!(tree.parent(second)?, None);
    assert_eq!(tree.children(root)?, &[first, third]);
    Ok(())
}

#[test]
fn adopting_a_child_detaches_it() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let child = tree.new_leaf(Style::default());
    let old_parent = tree.new_with_children(Style::default(), &[child])?;
    let new_parent = tree.new_leaf(Style::default());

    tree.add_child(new_parent, child)?;
    assert!(tree.children(old_parent)?.is_empty());
    assert_eq!(tree.parent(child)?, Some(new_parent));

    tree.set_children(old_parent, &[child])?;
    assert!(tree.children(new_parent)?.is_empty());
    assert!(tree.set_children(old_parent, &[old_parent]).is_err());
    Ok(())
}

#[test]
fn ancestors_cannot_become_descendants() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let leaf = tree.new_leaf(Style::default());
    let middle = tree.new_with_children(Style::default(), &[leaf])?;
    let root = tree.new_with_children(Style::default(), &[middle])?;

    assert!(tree.add_child(leaf, root).is_err());
    assert!(tree.add_child(leaf, middle).is_err());
    assert!(tree.insert_child_at_index(middle, 0, root).is_err());
    assert!(tree.set_children(leaf, &[root]).is_err());

    assert_eq!(tree.parent(middle)?, Some(root));
    assert_eq!(tree.children(middle)?, &[leaf]);
    assert!(tree.children(leaf)?.is_empty());
    tree.compute_layout(root, Size::MAX_CONTENT)?;
    Ok(())
}

#[test]
fn mark_dirty_clears_ancestor_caches() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let leaf = tree.new_leaf_with_measure(Style::default(), |_, _| Size {
        width: 10.0,
        height: 10.0,
    });
    let middle = tree.new_with_children(Style::default(), &[leaf])?;
    let root = tree.new_with_children(Style::default(), &[middle])?;

    tree.compute_layout(root, Size::MAX_CONTENT)?;
    assert!(!tree.dirty(root)?);
    assert!(!tree.dirty(middle)?);
    assert!(!tree.dirty(leaf)?);

    tree.mark_dirty(leaf)?;
    assert!(tree.dirty(leaf)?);
    assert!(tree.dirty(middle)?);
    assert!(tree.dirty(root)?);
    Ok(())
}

#[test]
fn print_tree_lists_every_node() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let leaf = tree.new_leaf(Style::default());
    let root = tree.new_with_children(Style::default(), &[leaf])?;
    tree.compute_layout(root, Size::MAX_CONTENT)?;

    let printed = tree.print_tree(root)?;
    assert!(printed.starts_with("TREE"));
    assert!(printed.contains("BLOCK"));
    assert!(printed.contains("LEAF"));
    Ok(())
}
