//! Layout driver.
//!
//! [`LayoutTree`] stores styled nodes and drives the block, flexbox and grid algorithms over
//! them. Every recursive request goes through the node's cache; nodes without children are
//! measured as leaves, optionally through a caller-supplied measure function. Final layouts are
//! rounded to whole pixels unless [`LayoutConfig::use_rounding`] is off.

mod compute;
mod config;
mod leaf;
mod printing;
mod round;
mod tree;

pub use compute::{compute_cached_layout, compute_hidden_layout, compute_root_layout};
pub use config::LayoutConfig;
pub use leaf::compute_leaf_layout;
pub use tree::{LayoutTree, MeasureFunction};
