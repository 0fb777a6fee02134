//! Attribute Cache Module
//!
//! Per-instance slot map backing lazy attributes.

use std::any::Any;
use std::collections::HashMap;

use tracing::trace;

use crate::cache::{CacheStats, Slot};
use crate::error::Result;

// == Attribute Cache ==
/// Private slot storage owned by one instance.
///
/// Slots are keyed by attribute name. Values of different types can live side
/// by side; each read names the type it expects.
#[derive(Debug, Default)]
pub struct AttributeCache {
    /// Attribute slots by name
    slots: HashMap<String, Slot>,
    /// Usage counters
    stats: CacheStats,
}

impl AttributeCache {
    // == Constructor ==
    /// Creates an empty cache where every slot is unset.
    pub fn new() -> Self {
        Self::default()
    }

    // == Is Set ==
    /// Returns true if the slot for `name` holds a value.
    pub fn is_set(&self, name: &str) -> bool {
        self.slots.get(name).is_some_and(Slot::is_set)
    }

    // == Get ==
    /// Reads the slot for `name` without touching the counters.
    ///
    /// Returns `Ok(None)` if the slot is unset.
    pub fn get<T: Any + Clone>(&self, name: &str) -> Result<Option<T>> {
        match self.slots.get(name) {
            Some(slot) => slot.read(name),
            None => Ok(None),
        }
    }

    // == Set ==
    /// Stores `value` in the slot for `name`, replacing whatever was there.
    ///
    /// This is plain assignment: owner setters call it, and external code may
    /// call it to overwrite a cached value.
    pub fn set<T: Any + Send + Sync>(&mut self, name: &str, value: T) {
        self.slots.insert(name.to_string(), Slot::new(value));
        self.refresh_populated();
    }

    // == Clear ==
    /// Resets the slot for `name` to unset.
    ///
    /// Returns true if the slot held a value.
    pub fn clear(&mut self, name: &str) -> bool {
        let was_set = self
            .slots
            .get_mut(name)
            .is_some_and(|slot| std::mem::take(slot).is_set());
        self.refresh_populated();
        was_set
    }

    // == Length ==
    /// Returns the number of populated slots.
    pub fn len(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_set()).count()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Names ==
    /// Returns the names of populated slots, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.is_set())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    // == Stats ==
    /// Returns current usage counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    // == Lookup ==
    /// Reads the slot for `name` on behalf of a memoizing entry point,
    /// counting the outcome as a hit or a miss.
    pub(crate) fn lookup<T: Any + Clone>(&mut self, name: &str) -> Result<Option<T>> {
        let cached = self.get::<T>(name)?;
        if cached.is_some() {
            trace!(attribute = name, "lazy attribute hit");
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        Ok(cached)
    }

    pub(crate) fn record_computation(&mut self) {
        self.stats.record_computation();
    }

    pub(crate) fn record_write_through(&mut self) {
        self.stats.record_write_through();
    }

    fn refresh_populated(&mut self) {
        let count = self.len();
        self.stats.set_populated_slots(count);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AttrError;

    #[test]
    fn test_cache_new() {
        let cache = AttributeCache::new();
        assert!(cache.is_empty());
        assert!(!cache.is_set("anything"));
        assert_eq!(cache.get::<String>("anything").unwrap(), None);
    }

    #[test]
    fn test_cache_set_and_get() {
        let mut cache = AttributeCache::new();

        cache.set("name", "Ada".to_string());
        cache.set("age", 36u32);

        assert_eq!(cache.get::<String>("name").unwrap().as_deref(), Some("Ada"));
        assert_eq!(cache.get::<u32>("age").unwrap(), Some(36));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.names(), vec!["age", "name"]);
    }

    #[test]
    fn test_cache_falsy_value_is_set() {
        let mut cache = AttributeCache::new();

        cache.set("flag", false);

        assert!(cache.is_set("flag"));
        assert_eq!(cache.get::<bool>("flag").unwrap(), Some(false));
    }

    #[test]
    fn test_cache_overwrite() {
        let mut cache = AttributeCache::new();

        cache.set("count", 1i64);
        cache.set("count", 2i64);

        assert_eq!(cache.get::<i64>("count").unwrap(), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_clear() {
        let mut cache = AttributeCache::new();
        cache.set("count", 1i64);

        assert!(cache.clear("count"));
        assert!(!cache.is_set("count"));
        assert!(!cache.clear("count"));
        assert!(!cache.clear("never_set"));
        assert!(cache.is_empty());
        assert_eq!(cache.stats().populated_slots, 0);
    }

    #[test]
    fn test_cache_clear_unknown_names_adds_no_slots() {
        let mut cache = AttributeCache::new();
        cache.set("kept", 1u8);

        for i in 0..1000 {
            assert!(!cache.clear(&format!("missing_{}", i)));
        }

        assert_eq!(cache.slots.len(), 1);
        assert_eq!(cache.names(), vec!["kept"]);
    }

    #[test]
    fn test_cache_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<AttributeCache>();
        assert_sync::<AttributeCache>();
    }

    #[test]
    fn test_cache_get_wrong_type() {
        let mut cache = AttributeCache::new();
        cache.set("count", 1i64);

        let result = cache.get::<String>("count");
        assert!(matches!(result, Err(AttrError::TypeMismatch { .. })));
    }

    #[test]
    fn test_cache_lookup_counts() {
        let mut cache = AttributeCache::new();

        assert_eq!(cache.lookup::<u8>("x").unwrap(), None);
        cache.set("x", 7u8);
        assert_eq!(cache.lookup::<u8>("x").unwrap(), Some(7));
        assert_eq!(cache.get::<u8>("x").unwrap(), Some(7));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.populated_slots, 1);
    }
}
