//! Scripted source for exercising executor behavior in tests
//!
//! Public (not `cfg(test)`) so downstream crates can drive their own
//! fallback and reconciliation tests with it.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use bankfuse_core::Record;

use crate::error::SourceError;
use crate::source::DataSource;

/// What a [`ScriptedSource`] answers on every fetch.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Always return this record
    Record(Record),
    /// Always answer "no data"
    Empty,
    /// Always fail with a backend error carrying this message
    Fail(String),
}

/// A source with a fixed, scripted reply and a fetch-call counter.
///
/// The counter is what short-circuit tests assert on: a source that was
/// never reached has `fetch_count() == 0`.
#[derive(Debug)]
pub struct ScriptedSource {
    name: String,
    priority: u32,
    available: AtomicBool,
    supported: Option<BTreeSet<String>>,
    reply: Reply,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn build(name: impl Into<String>, priority: u32, reply: Reply) -> Self {
        Self {
            name: name.into(),
            priority,
            available: AtomicBool::new(true),
            supported: None,
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    /// Source that always returns `record`
    pub fn with_record(name: impl Into<String>, priority: u32, record: Record) -> Self {
        Self::build(name, priority, Reply::Record(record))
    }

    /// Source that always answers "no data"
    pub fn empty(name: impl Into<String>, priority: u32) -> Self {
        Self::build(name, priority, Reply::Empty)
    }

    /// Source whose fetch always fails
    pub fn failing(name: impl Into<String>, priority: u32, message: impl Into<String>) -> Self {
        Self::build(name, priority, Reply::Fail(message.into()))
    }

    /// Restrict the supported record types (default: all)
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Flip the liveness probe
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Start unavailable
    pub fn unavailable(self) -> Self {
        self.available.store(false, Ordering::SeqCst);
        self
    }

    /// How many times `fetch` was invoked
    pub fn fetch_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn supports(&self, record_type: &str) -> bool {
        match &self.supported {
            Some(types) => types.contains(record_type),
            None => true,
        }
    }

    async fn fetch(&self, _record_type: &str, _id: &str) -> Result<Option<Record>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Record(record) => Ok(Some(record.clone())),
            Reply::Empty => Ok(None),
            Reply::Fail(message) => Err(SourceError::backend(&self.name, message.clone())),
        }
    }
}
