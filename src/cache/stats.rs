//! Cache Statistics Module
//!
//! Tracks how an attribute cache is used: hits, misses and computations.

use serde::Serialize;

// == Cache Stats ==
/// Usage counters for one attribute cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads answered from a populated slot
    pub hits: u64,
    /// Reads that found the slot unset
    pub misses: u64,
    /// Compute closures actually invoked
    pub computations: u64,
    /// Computed values routed through an owner setter
    pub write_throughs: u64,
    /// Current number of populated slots
    pub populated_slots: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing was read yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Computation ==
    /// Increments the computation counter.
    pub fn record_computation(&mut self) {
        self.computations += 1;
    }

    // == Record Write Through ==
    /// Increments the write-through counter.
    pub fn record_write_through(&mut self) {
        self.write_throughs += 1;
    }

    // == Update Slot Count ==
    /// Updates the populated slots count.
    pub fn set_populated_slots(&mut self, count: usize) {
        self.populated_slots = count;
    }
}
