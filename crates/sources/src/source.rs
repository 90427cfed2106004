//! Source capability contract

use async_trait::async_trait;

use bankfuse_core::Record;

use crate::error::SourceError;

/// A named, prioritized provider of records for one or more record types.
///
/// Implementations may call databases, caches, flat files or remote
/// services internally; the pipeline only sees this contract. All
/// operations besides [`fetch`](DataSource::fetch) are side-effect-free.
///
/// `Ok(None)` from `fetch` is an explicit "no data" signal and is distinct
/// from `Err(_)`: both cause the fallback executor to move on, but failures
/// are logged at error level so operators can tell a miss from an outage.
#[async_trait]
pub trait DataSource: std::fmt::Debug + Send + Sync {
    /// Unique source name; the resolver selects by name
    fn name(&self) -> &str;

    /// Static ranking; higher value = tried first
    fn priority(&self) -> u32;

    /// Liveness probe; `false` means "skip me". Must not panic.
    fn is_available(&self) -> bool {
        true
    }

    /// Whether this source can answer for a given record type
    fn supports(&self, record_type: &str) -> bool;

    /// Fetch one record, or `Ok(None)` if this source has no data for it
    async fn fetch(&self, record_type: &str, id: &str) -> Result<Option<Record>, SourceError>;
}

/// Tagged result of one source attempt, as classified by the fallback
/// executor.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The source returned a record; terminal for a fallback walk
    Success(Record),
    /// Skipped: liveness probe said no
    Unavailable,
    /// Skipped: source does not serve this record type
    Unsupported,
    /// Skipped: source answered, but has no data for this id
    Empty,
    /// Skipped: fetch failed; isolated at the source boundary
    Failed(SourceError),
}

impl FetchOutcome {
    /// Whether this attempt produced a record
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// Short label for logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Success(_) => "success",
            FetchOutcome::Unavailable => "unavailable",
            FetchOutcome::Unsupported => "unsupported",
            FetchOutcome::Empty => "empty",
            FetchOutcome::Failed(_) => "failed",
        }
    }

    /// Extract the record, if any
    pub fn into_record(self) -> Option<Record> {
        match self {
            FetchOutcome::Success(record) => Some(record),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(FetchOutcome::Success(Record::new()).label(), "success");
        assert_eq!(FetchOutcome::Unavailable.label(), "unavailable");
        assert_eq!(FetchOutcome::Unsupported.label(), "unsupported");
        assert_eq!(FetchOutcome::Empty.label(), "empty");
        assert_eq!(
            FetchOutcome::Failed(SourceError::backend("x", "boom")).label(),
            "failed"
        );
    }

    #[test]
    fn test_into_record() {
        let record = Record::new().with("x", 1);
        assert_eq!(
            FetchOutcome::Success(record.clone()).into_record(),
            Some(record)
        );
        assert!(FetchOutcome::Empty.into_record().is_none());
    }
}
