//! Cache source - volatile tier with an availability toggle

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use bankfuse_core::Record;

use crate::error::SourceError;
use crate::source::DataSource;

/// Cache tier standing in front of slower backends.
///
/// Type-agnostic: a cache serves whatever was put into it, so
/// [`supports`](DataSource::supports) is always true. The availability
/// toggle models the tier being down (evicted node, cold start) without
/// the entries being gone.
#[derive(Debug)]
pub struct CacheSource {
    name: String,
    priority: u32,
    available: AtomicBool,
    entries: RwLock<HashMap<(String, String), Record>>,
}

impl CacheSource {
    /// Create an empty, available cache source
    pub fn new(name: impl Into<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            priority,
            available: AtomicBool::new(true),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Store a record
    pub fn put(&self, record_type: impl Into<String>, id: impl Into<String>, record: Record) {
        let mut entries = self.entries.write().unwrap();
        entries.insert((record_type.into(), id.into()), record);
    }

    /// Drop one entry
    pub fn invalidate(&self, record_type: &str, id: &str) {
        let mut entries = self.entries.write().unwrap();
        entries.remove(&(record_type.to_string(), id.to_string()));
    }

    /// Drop all entries
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    /// Flip the liveness probe
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DataSource for CacheSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn supports(&self, _record_type: &str) -> bool {
        true
    }

    async fn fetch(&self, record_type: &str, id: &str) -> Result<Option<Record>, SourceError> {
        let entries = self.entries.read().unwrap();
        Ok(entries
            .get(&(record_type.to_string(), id.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_fetch_invalidate() {
        let cache = CacheSource::new("cache", 20);
        cache.put("customer", "C-1", Record::new().with("name", "Bo"));

        let hit = cache.fetch("customer", "C-1").await.unwrap();
        assert!(hit.is_some());

        cache.invalidate("customer", "C-1");
        let miss = cache.fetch("customer", "C-1").await.unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn test_availability_toggle() {
        let cache = CacheSource::new("cache", 20);
        assert!(cache.is_available());

        cache.set_available(false);
        assert!(!cache.is_available());

        cache.set_available(true);
        assert!(cache.is_available());
    }

    #[test]
    fn test_supports_any_type() {
        let cache = CacheSource::new("cache", 20);
        assert!(cache.supports("customer"));
        assert!(cache.supports("risk"));
        assert!(cache.supports("anything-at-all"));
    }

    #[test]
    fn test_clear() {
        let cache = CacheSource::new("cache", 20);
        cache.put("customer", "C-1", Record::new());
        cache.put("product", "P-1", Record::new());
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
