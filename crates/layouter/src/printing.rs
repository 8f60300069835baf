//! Text rendering of a laid-out tree, for debugging.

use core::fmt::{self, Write as _};

use css_orchestrator::style_model::Display;
use css_orchestrator::{NodeId, TraversePartialTree};

use crate::tree::NodeArena;

/// Render the subtree under `root`, one line per node with its final layout.
pub fn print_tree(arena: &NodeArena, root: NodeId) -> Result<String, fmt::Error> {
    let mut out = String::from("TREE\n");
    print_node(arena, &mut out, root, "", true)?;
    Ok(out)
}

fn print_node(
    arena: &NodeArena,
    out: &mut String,
    node: NodeId,
    prefix: &str,
    is_last: bool,
) -> fmt::Result {
    let layout = arena.final_layout(node);
    let children = arena.child_ids(node);
    let kind = match arena.display(node) {
        Display::None => "NONE",
        _ if children.is_empty() => "LEAF",
        Display::Block => "BLOCK",
        Display::Flex => "FLEX",
        Display::Grid => "GRID",
    };
    let branch = if is_last { "└── " } else { "├── " };
    writeln!(
        out,
        "{prefix}{branch}{kind} [x: {} y: {} w: {} h: {} content_w: {} content_h: {}] ({node:?})",
        layout.location.x,
        layout.location.y,
        layout.size.width,
        layout.size.height,
        layout.content_size.width,
        layout.content_size.height,
    )?;

    let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
    let count = children.len();
    for (index, child) in children.iter().enumerate() {
        print_node(arena, out, *child, &child_prefix, index + 1 == count)?;
    }
    Ok(())
}
