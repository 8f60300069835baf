//! CSS Grid Layout Module Level 2
//! Spec: <https://www.w3.org/TR/css-grid-2/>
//!
//! Two-dimensional layout of children into rows and columns: the explicit grid is expanded from
//! the templates, items are placed (explicitly or by auto-placement), tracks are sized in both
//! axes and every item is aligned inside its grid area.

// Track counts and per-track sizing state
mod types;
// Explicit grid expansion and named lines
mod explicit;
// Line resolution and auto-placement
mod placement;
// In-flow grid items and their contributions
mod items;
// Track sizing algorithm (§11.4 to §11.8)
mod track_sizing;
// Track and item alignment
mod alignment;
// Absolutely positioned children
mod absolute;
// Entry point
mod layout;

#[cfg(test)]
mod tests;

pub use layout::compute_grid_layout;
pub use track_sizing::find_size_of_fr;
pub use types::GridTrack;
