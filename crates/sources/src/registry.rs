//! Source registry - long-lived set of registered backends
//!
//! Registered once at process start, then shared read-only behind `Arc`
//! across requests. Registration order matters: it is the tie-breaker for
//! equal priorities during selection.

use std::sync::Arc;

use crate::error::RegistryError;
use crate::source::DataSource;

/// Registry of all data sources known to the process.
#[derive(Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn DataSource>>,
}

impl SourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source, keeping registration order.
    ///
    /// Names must be unique; a duplicate is a wiring bug and is rejected.
    pub fn register(&mut self, source: Arc<dyn DataSource>) -> Result<(), RegistryError> {
        if self.sources.iter().any(|s| s.name() == source.name()) {
            return Err(RegistryError::DuplicateName {
                name: source.name().to_string(),
            });
        }

        tracing::debug!(
            source = source.name(),
            priority = source.priority(),
            "registered data source"
        );
        self.sources.push(source);
        Ok(())
    }

    /// All sources in registration order
    pub fn snapshot(&self) -> Vec<Arc<dyn DataSource>> {
        self.sources.clone()
    }

    /// Look up one source by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn DataSource>> {
        self.sources.iter().find(|s| s.name() == name).cloned()
    }

    /// Registered source names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
