//! Resolution report
//!
//! One fallback walk produces a `Resolution`: the record (if any source
//! answered), which source won, and the per-source attempt trail for
//! observability.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::Display;
use uuid::Uuid;

use bankfuse_core::Record;
use bankfuse_sources::FetchOutcome;

/// How one source attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttemptStatus {
    Success,
    Unavailable,
    Unsupported,
    Empty,
    Failed,
    /// Aborted before completion by an earlier-priority success
    /// (concurrent executor only)
    Cancelled,
}

impl From<&FetchOutcome> for AttemptStatus {
    fn from(outcome: &FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Success(_) => AttemptStatus::Success,
            FetchOutcome::Unavailable => AttemptStatus::Unavailable,
            FetchOutcome::Unsupported => AttemptStatus::Unsupported,
            FetchOutcome::Empty => AttemptStatus::Empty,
            FetchOutcome::Failed(_) => AttemptStatus::Failed,
        }
    }
}

/// One entry in the attempt trail.
#[derive(Debug, Clone, Serialize)]
pub struct Attempt {
    /// Source name
    pub source: String,
    /// How the attempt ended
    pub status: AttemptStatus,
    /// Failure message, for failed attempts
    pub detail: Option<String>,
}

impl Attempt {
    pub(crate) fn from_outcome(source: &str, outcome: &FetchOutcome) -> Self {
        let detail = match outcome {
            FetchOutcome::Failed(err) => Some(err.to_string()),
            _ => None,
        };
        Self {
            source: source.to_string(),
            status: AttemptStatus::from(outcome),
            detail,
        }
    }

    pub(crate) fn cancelled(source: &str) -> Self {
        Self {
            source: source.to_string(),
            status: AttemptStatus::Cancelled,
            detail: None,
        }
    }
}

/// Outcome of one resolution request.
///
/// "No record anywhere" is a normal outcome (`record == None`), not an
/// error; the attempt trail says why each source was passed over.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// Correlation ID for tracing; the pipeline stamps the caller's
    pub correlation_id: String,
    /// Requested record type
    pub record_type: String,
    /// Requested record id
    pub id: String,
    /// Per-source attempts in walk order
    pub attempts: Vec<Attempt>,
    /// Name of the source that answered, if any
    pub source: Option<String>,
    /// The resolved (and later masked) record, if any
    pub record: Option<Record>,
    /// When the walk finished
    pub resolved_at: DateTime<Utc>,
}

impl Resolution {
    pub(crate) fn resolved(
        record_type: &str,
        id: &str,
        attempts: Vec<Attempt>,
        source: &str,
        record: Record,
    ) -> Self {
        Self {
            correlation_id: Uuid::new_v4().to_string(),
            record_type: record_type.to_string(),
            id: id.to_string(),
            attempts,
            source: Some(source.to_string()),
            record: Some(record),
            resolved_at: Utc::now(),
        }
    }

    pub(crate) fn exhausted(record_type: &str, id: &str, attempts: Vec<Attempt>) -> Self {
        Self {
            correlation_id: Uuid::new_v4().to_string(),
            record_type: record_type.to_string(),
            id: id.to_string(),
            attempts,
            source: None,
            record: None,
            resolved_at: Utc::now(),
        }
    }

    /// Adopt the caller's correlation id
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = id.into();
        self
    }

    /// Whether any source produced a record
    pub fn is_resolved(&self) -> bool {
        self.record.is_some()
    }

    /// Number of sources attempted (cancelled ones included)
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }
}
