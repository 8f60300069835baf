//! Shared contracts of the layout engine.
//!
//! This crate owns everything the layout algorithms agree on: geometric value types, optional
//! arithmetic, the computed style model, the parent/child request and result types, the tree
//! capability traits and the per-node cache. The algorithms themselves live in the
//! `css_block`, `css_flexbox` and `css_grid` crates; `layouter` drives them.

pub mod available_space;
pub mod cache;
pub mod geometry;
pub mod layout;
pub mod maybe;
pub mod style_model;
pub mod tree;

pub use available_space::AvailableSpace;
pub use cache::{Cache, ClearState};
pub use geometry::{AbsoluteAxis, AbstractAxis, Line, MinMax, Point, Rect, Size};
pub use layout::{CollapsibleMarginSet, Layout};
pub use maybe::{MaybeMath, MaybeResolve, ResolveOrZero};
pub use style_model::Style;
pub use tree::{
    LayoutInput, LayoutOutput, LayoutPartialTree, NodeId, RequestedAxis, RunMode, SizingMode,
    TraversePartialTree, TraverseTree,
};
