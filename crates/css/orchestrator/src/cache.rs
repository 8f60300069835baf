//! Per-node memo of layout results.
//!
//! A node is often asked for its size several times during one pass (a min-content probe, a
//! max-content probe, then a final layout with the width fixed). The cache keeps one entry for the
//! final layout plus a fixed set of measurement slots, chosen so that these probes do not evict
//! each other.

use crate::available_space::AvailableSpace;
use crate::geometry::Size;
use crate::tree::{LayoutOutput, RunMode};

/// Number of measurement slots.
const MEASURE_SLOTS: usize = 9;

/// One cached result together with the inputs it was computed for.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CacheEntry {
    /// Known dimensions of the request
    known_dimensions: Size<Option<f32>>,
    /// Available space of the request
    available_space: Size<AvailableSpace>,
    /// The result
    content: LayoutOutput,
}

impl CacheEntry {
    /// Whether this entry answers a request.
    ///
    /// A known dimension matches when it equals the entry's known dimension or the size the entry
    /// resolved to. Axes without a known dimension must have roughly equal available space.
    #[inline]
    fn matches(
        &self,
        known_dimensions: Size<Option<f32>>,
        available_space: Size<AvailableSpace>,
    ) -> bool {
        let cached_size = self.content.size;
        (known_dimensions.width == self.known_dimensions.width
            || known_dimensions.width == Some(cached_size.width))
            && (known_dimensions.height == self.known_dimensions.height
                || known_dimensions.height == Some(cached_size.height))
            && (known_dimensions.width.is_some()
                || self
                    .available_space
                    .width
                    .is_roughly_equal(available_space.width))
            && (known_dimensions.height.is_some()
                || self
                    .available_space
                    .height
                    .is_roughly_equal(available_space.height))
    }
}

/// Outcome of [`Cache::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearState {
    /// At least one entry was removed
    Cleared,
    /// The cache held nothing
    AlreadyEmpty,
}

/// The layout cache of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Cache {
    /// The result of the most recent full layout
    final_layout_entry: Option<CacheEntry>,
    /// Results of size-only requests
    measure_entries: [Option<CacheEntry>; MEASURE_SLOTS],
    /// Whether every entry is empty
    is_empty: bool,
}

impl Default for Cache {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Cache {
    /// An empty cache.
    #[inline]
    pub const fn new() -> Self {
        Self {
            final_layout_entry: None,
            measure_entries: [None; MEASURE_SLOTS],
            is_empty: true,
        }
    }

    /// The measurement slot for a request.
    ///
    /// - Slot 0: both dimensions known
    /// - Slots 1-2: only the width known; 2 when the height is sized under min-content
    /// - Slots 3-4: only the height known; 4 when the width is sized under min-content
    /// - Slots 5-8: nothing known; one bit per axis sized under min-content
    #[inline]
    fn compute_cache_slot(
        known_dimensions: Size<Option<f32>>,
        available_space: Size<AvailableSpace>,
    ) -> usize {
        let width_is_min_content = usize::from(available_space.width == AvailableSpace::MinContent);
        let height_is_min_content =
            usize::from(available_space.height == AvailableSpace::MinContent);

        match (known_dimensions.width, known_dimensions.height) {
            (Some(_), Some(_)) => 0,
            (Some(_), None) => 1 + height_is_min_content,
            (None, Some(_)) => 3 + width_is_min_content,
            (None, None) => 5 + width_is_min_content + 2 * height_is_min_content,
        }
    }

    /// Look up a result.
    ///
    /// A full-layout request only matches the final-layout entry. A size request is answered by
    /// the final-layout entry when it matches, else by its measurement slot, else by any other
    /// measurement entry that matches.
    #[inline]
    pub fn get(
        &self,
        known_dimensions: Size<Option<f32>>,
        available_space: Size<AvailableSpace>,
        run_mode: RunMode,
    ) -> Option<LayoutOutput> {
        match run_mode {
            RunMode::PerformLayout => self
                .final_layout_entry
                .filter(|entry| entry.matches(known_dimensions, available_space))
                .map(|entry| entry.content),
            RunMode::ComputeSize => {
                if let Some(entry) = self
                    .final_layout_entry
                    .filter(|entry| entry.matches(known_dimensions, available_space))
                {
                    return Some(entry.content);
                }
                // The request's own slot is the likely hit. An entry in another slot still
                // matches when its resolved size equals the requested known dimension.
                let slot = Self::compute_cache_slot(known_dimensions, available_space);
                let own_slot = self.measure_entries.get(slot).copied().flatten();
                own_slot
                    .into_iter()
                    .chain(self.measure_entries.iter().flatten().copied())
                    .find(|entry| entry.matches(known_dimensions, available_space))
                    .map(|entry| entry.content)
            }
            RunMode::PerformHiddenLayout => None,
        }
    }

    /// Store a result. Hidden layout is never cached.
    #[inline]
    pub fn store(
        &mut self,
        known_dimensions: Size<Option<f32>>,
        available_space: Size<AvailableSpace>,
        run_mode: RunMode,
        layout_output: LayoutOutput,
    ) {
        let entry = CacheEntry {
            known_dimensions,
            available_space,
            content: layout_output,
        };
        match run_mode {
            RunMode::PerformLayout => {
                self.is_empty = false;
                self.final_layout_entry = Some(entry);
            }
            RunMode::ComputeSize => {
                let slot = Self::compute_cache_slot(known_dimensions, available_space);
                if let Some(target) = self.measure_entries.get_mut(slot) {
                    self.is_empty = false;
                    *target = Some(entry);
                }
            }
            RunMode::PerformHiddenLayout => {}
        }
    }

    /// Remove every entry.
    #[inline]
    pub fn clear(&mut self) -> ClearState {
        if self.is_empty {
            return ClearState::AlreadyEmpty;
        }
        self.is_empty = true;
        self.final_layout_entry = None;
        self.measure_entries = [None; MEASURE_SLOTS];
        ClearState::Cleared
    }

    /// Whether the cache holds no entries.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.is_empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn output(width: f32, height: f32) -> LayoutOutput {
        LayoutOutput::from_sizes_and_baselines(
            Size { width, height },
            Size::ZERO,
            Point {
                x: None,
                y: Some(height / 2.0),
            },
        )
    }

    #[test]
    /// # Panics
    /// Panics if a stored entry is not returned for identical inputs.
    fn identical_inputs_hit() {
        let mut cache = Cache::new();
        let known = Size::new(Some(100.0), None);
        let space = Size::MAX_CONTENT;
        cache.store(known, space, RunMode::ComputeSize, output(100.0, 40.0));
        assert_eq!(
            cache.get(known, space, RunMode::ComputeSize),
            Some(output(100.0, 40.0))
        );
        assert!(cache.get(known, space, RunMode::PerformLayout).is_none());
        assert!(!cache.is_empty());
    }

    #[test]
    /// # Panics
    /// Panics if a known dimension equal to the cached size does not match.
    fn known_dimension_matches_resolved_size() {
        let mut cache = Cache::new();
        cache.store(
            Size::NONE,
            Size::MAX_CONTENT,
            RunMode::PerformLayout,
            output(80.0, 20.0),
        );
        let hit = cache.get(
            Size::new(Some(80.0), None),
            Size::MAX_CONTENT,
            RunMode::ComputeSize,
        );
        assert_eq!(hit, Some(output(80.0, 20.0)));
    }

    #[test]
    /// # Panics
    /// Panics if a measurement stored with nothing known does not answer a later request whose
    /// known width equals the measured width.
    fn measurement_answers_requests_from_other_slots() {
        let mut cache = Cache::new();
        cache.store(Size::NONE, Size::MAX_CONTENT, RunMode::ComputeSize, output(80.0, 20.0));
        let hit = cache.get(
            Size::new(Some(80.0), None),
            Size::MAX_CONTENT,
            RunMode::ComputeSize,
        );
        assert_eq!(hit, Some(output(80.0, 20.0)));
        assert!(
            cache
                .get(Size::new(Some(70.0), None), Size::MAX_CONTENT, RunMode::ComputeSize)
                .is_none()
        );
    }

    #[test]
    /// # Panics
    /// Panics if min-content and max-content probes evict each other.
    fn intrinsic_probes_use_distinct_slots() {
        let mut cache = Cache::new();
        cache.store(Size::NONE, Size::MIN_CONTENT, RunMode::ComputeSize, output(10.0, 50.0));
        cache.store(Size::NONE, Size::MAX_CONTENT, RunMode::ComputeSize, output(60.0, 10.0));
        assert_eq!(
            cache.get(Size::NONE, Size::MIN_CONTENT, RunMode::ComputeSize),
            Some(output(10.0, 50.0))
        );
        assert_eq!(
            cache.get(Size::NONE, Size::MAX_CONTENT, RunMode::ComputeSize),
            Some(output(60.0, 10.0))
        );
        assert!(
            cache
                .get(Size::NONE, Size::from_lengths(30.0, 30.0), RunMode::ComputeSize)
                .is_none()
        );
    }

    #[test]
    /// # Panics
    /// Panics if clearing leaves entries behind or misreports its state.
    fn clear_empties_everything() {
        let mut cache = Cache::new();
        assert_eq!(cache.clear(), ClearState::AlreadyEmpty);
        cache.store(Size::NONE, Size::MAX_CONTENT, RunMode::PerformLayout, output(1.0, 1.0));
        assert_eq!(cache.clear(), ClearState::Cleared);
        assert!(cache.is_empty());
        assert!(
            cache
                .get(Size::NONE, Size::MAX_CONTENT, RunMode::ComputeSize)
                .is_none()
        );
        assert_eq!(cache.clear(), ClearState::AlreadyEmpty);
    }

    #[test]
    /// # Panics
    /// Panics if hidden layout is cached.
    fn hidden_layout_is_never_cached() {
        let mut cache = Cache::new();
        cache.store(
            Size::NONE,
            Size::MAX_CONTENT,
            RunMode::PerformHiddenLayout,
            LayoutOutput::HIDDEN,
        );
        assert!(cache.is_empty());
    }

    #[test]
    /// # Panics
    /// Panics if the slot function departs from the documented mapping.
    fn slot_mapping() {
        let both = Size::new(Some(1.0), Some(1.0));
        let width = Size::new(Some(1.0), None);
        let height = Size::new(None, Some(1.0));
        let mixed = Size {
            width: AvailableSpace::MinContent,
            height: AvailableSpace::Definite(5.0),
        };
        assert_eq!(Cache::compute_cache_slot(both, Size::MIN_CONTENT), 0);
        assert_eq!(Cache::compute_cache_slot(width, Size::MAX_CONTENT), 1);
        assert_eq!(Cache::compute_cache_slot(width, Size::MIN_CONTENT), 2);
        assert_eq!(Cache::compute_cache_slot(height, Size::MAX_CONTENT), 3);
        assert_eq!(Cache::compute_cache_slot(height, mixed), 4);
        assert_eq!(Cache::compute_cache_slot(Size::NONE, Size::MAX_CONTENT), 5);
        assert_eq!(Cache::compute_cache_slot(Size::NONE, mixed), 6);
        assert_eq!(Cache::compute_cache_slot(Size::NONE, Size::MIN_CONTENT), 8);
    }
}
