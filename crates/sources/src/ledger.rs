//! Ledger source - in-memory stand-in for the core banking system of record

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use bankfuse_core::Record;

use crate::error::SourceError;
use crate::source::DataSource;

/// System-of-record source keyed by `(record_type, id)`.
///
/// Serves only the record types it was declared for; seeding is
/// programmatic, standing in for the repository layer that is out of scope
/// here.
#[derive(Debug)]
pub struct LedgerSource {
    name: String,
    priority: u32,
    supported: BTreeSet<String>,
    records: RwLock<HashMap<(String, String), Record>>,
}

impl LedgerSource {
    /// Create an empty ledger source serving no record types yet
    pub fn new(name: impl Into<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            priority,
            supported: BTreeSet::new(),
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Declare a record type this source serves
    pub fn with_type(mut self, record_type: impl Into<String>) -> Self {
        self.supported.insert(record_type.into());
        self
    }

    /// Seed one record
    pub fn seed(&self, record_type: impl Into<String>, id: impl Into<String>, record: Record) {
        let mut records = self.records.write().unwrap();
        records.insert((record_type.into(), id.into()), record);
    }

    /// Builder-style seeding
    pub fn with_record(
        self,
        record_type: impl Into<String>,
        id: impl Into<String>,
        record: Record,
    ) -> Self {
        self.seed(record_type, id, record);
        self
    }

    /// Remove one record (for testing misses)
    pub fn remove(&self, record_type: &str, id: &str) {
        let mut records = self.records.write().unwrap();
        records.remove(&(record_type.to_string(), id.to_string()));
    }

    /// Number of seeded records
    pub fn record_count(&self) -> usize {
        self.records.read().unwrap().len()
    }
}

#[async_trait]
impl DataSource for LedgerSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn supports(&self, record_type: &str) -> bool {
        self.supported.contains(record_type)
    }

    async fn fetch(&self, record_type: &str, id: &str) -> Result<Option<Record>, SourceError> {
        let records = self.records.read().unwrap();
        Ok(records
            .get(&(record_type.to_string(), id.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Record {
        Record::new().with("customerId", "C-100").with("name", "Alice")
    }

    #[tokio::test]
    async fn test_seed_and_fetch() {
        let source = LedgerSource::new("internal", 10)
            .with_type("customer")
            .with_record("customer", "C-100", customer());

        let record = source.fetch("customer", "C-100").await.unwrap().unwrap();
        assert_eq!(record.get("name").unwrap().as_str(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_miss_is_none_not_error() {
        let source = LedgerSource::new("internal", 10).with_type("customer");
        let result = source.fetch("customer", "C-404").await.unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_supports_only_declared_types() {
        let source = LedgerSource::new("internal", 10).with_type("customer");
        assert!(source.supports("customer"));
        assert!(!source.supports("risk"));
    }

    #[tokio::test]
    async fn test_remove() {
        let source = LedgerSource::new("internal", 10)
            .with_type("customer")
            .with_record("customer", "C-100", customer());
        assert_eq!(source.record_count(), 1);

        source.remove("customer", "C-100");
        assert!(source.fetch("customer", "C-100").await.unwrap().is_none());
    }
}
