//! Cache Module
//!
//! Per-instance slot storage for lazy attributes.

mod slot;
mod stats;
mod store;


// Re-export public types
pub use slot::Slot;
pub use stats::CacheStats;
pub use store::AttributeCache;
