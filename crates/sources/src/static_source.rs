//! Static source - always-on defaults of last resort

use std::collections::HashMap;

use async_trait::async_trait;

use bankfuse_core::Record;

use crate::error::SourceError;
use crate::source::DataSource;

/// Default-record source, typically registered at the lowest priority so a
/// fallback walk always ends with *some* answer for known record types.
///
/// Holds one template record per record type and returns it for any id,
/// stamping the requested id into the `id` field so downstream consumers
/// can still tell which entity the defaults stand in for.
#[derive(Debug)]
pub struct StaticSource {
    name: String,
    priority: u32,
    defaults: HashMap<String, Record>,
}

impl StaticSource {
    /// Create a static source with no templates yet
    pub fn new(name: impl Into<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            priority,
            defaults: HashMap::new(),
        }
    }

    /// Set the template record for a record type
    pub fn with_default(mut self, record_type: impl Into<String>, record: Record) -> Self {
        self.defaults.insert(record_type.into(), record);
        self
    }

    /// Record types this source has templates for
    pub fn template_count(&self) -> usize {
        self.defaults.len()
    }
}

#[async_trait]
impl DataSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn supports(&self, record_type: &str) -> bool {
        self.defaults.contains_key(record_type)
    }

    async fn fetch(&self, record_type: &str, id: &str) -> Result<Option<Record>, SourceError> {
        Ok(self.defaults.get(record_type).map(|template| {
            let mut record = template.clone();
            record.insert("id", id);
            record
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_template_for_any_id() {
        let source = StaticSource::new("default", 1)
            .with_default("customer", Record::new().with("segment", "standard"));

        let a = source.fetch("customer", "C-1").await.unwrap().unwrap();
        let b = source.fetch("customer", "C-2").await.unwrap().unwrap();

        assert_eq!(a.get("segment").unwrap().as_str(), Some("standard"));
        assert_eq!(a.get("id").unwrap().as_str(), Some("C-1"));
        assert_eq!(b.get("id").unwrap().as_str(), Some("C-2"));
    }

    #[tokio::test]
    async fn test_unknown_type_is_absent() {
        let source = StaticSource::new("default", 1)
            .with_default("customer", Record::new());

        assert!(!source.supports("risk"));
        assert!(source.fetch("risk", "R-1").await.unwrap().is_none());
    }

    #[test]
    fn test_always_available() {
        let source = StaticSource::new("default", 1);
        assert!(source.is_available());
    }
}
