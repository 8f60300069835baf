//! Layout configuration.

/// Knobs of a [`LayoutTree`](crate::LayoutTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Round final layouts to whole pixels
    pub use_rounding: bool,
}

impl Default for LayoutConfig {
    #[inline]
    fn default() -> Self {
        Self { use_rounding: true }
    }
}
