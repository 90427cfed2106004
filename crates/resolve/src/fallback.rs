//! Fallback execution over an ordered source list
//!
//! The central correctness requirement here is failure isolation: one
//! misbehaving backend must never prevent the others from being tried.
//! Every per-source failure is caught at the source boundary, logged, and
//! turned into a skip.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use bankfuse_core::Record;
use bankfuse_sources::{DataSource, FetchOutcome};

use crate::error::{validate_request, ResolveError};
use crate::report::{Attempt, Resolution};

/// Default cap on concurrent fetches for the fan-out executors.
const DEFAULT_CONCURRENCY: usize = 4;

/// Walks ordered source lists, sequentially or fanned out.
pub struct FallbackExecutor {
    max_concurrent: usize,
}

impl Default for FallbackExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackExecutor {
    pub fn new() -> Self {
        Self {
            max_concurrent: DEFAULT_CONCURRENCY,
        }
    }

    /// Override the concurrency cap for the fan-out executors
    pub fn with_concurrency(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Classify one attempt against one source, catching its failure.
    async fn try_source(source: &dyn DataSource, record_type: &str, id: &str) -> FetchOutcome {
        if !source.is_available() {
            return FetchOutcome::Unavailable;
        }
        if !source.supports(record_type) {
            return FetchOutcome::Unsupported;
        }
        match source.fetch(record_type, id).await {
            Ok(Some(record)) => FetchOutcome::Success(record),
            Ok(None) => FetchOutcome::Empty,
            Err(err) => FetchOutcome::Failed(err),
        }
    }

    fn log_outcome(source: &str, record_type: &str, id: &str, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Success(_) => {
                tracing::debug!(source, record_type, id, "source answered");
            }
            FetchOutcome::Unavailable => {
                tracing::warn!(source, record_type, id, "source unavailable, skipping");
            }
            FetchOutcome::Unsupported => {
                tracing::debug!(source, record_type, id, "record type unsupported, skipping");
            }
            FetchOutcome::Empty => {
                tracing::debug!(source, record_type, id, "no data at source, skipping");
            }
            FetchOutcome::Failed(err) => {
                tracing::error!(
                    source,
                    record_type,
                    id,
                    error = %err,
                    "source fetch failed, skipping"
                );
            }
        }
    }

    /// Try each source in order, returning the first record found.
    ///
    /// Exhausting the list is a normal outcome (`record == None`); the
    /// only error is a malformed request.
    pub async fn fetch_with_fallback(
        &self,
        sources: &[Arc<dyn DataSource>],
        record_type: &str,
        id: &str,
    ) -> Result<Resolution, ResolveError> {
        validate_request(record_type, id)?;

        let mut attempts = Vec::with_capacity(sources.len());
        for source in sources {
            let outcome = Self::try_source(source.as_ref(), record_type, id).await;
            Self::log_outcome(source.name(), record_type, id, &outcome);
            attempts.push(Attempt::from_outcome(source.name(), &outcome));

            if let FetchOutcome::Success(record) = outcome {
                return Ok(Resolution::resolved(
                    record_type,
                    id,
                    attempts,
                    source.name(),
                    record,
                ));
            }
        }

        tracing::error!(
            record_type,
            id,
            count = sources.len(),
            "all sources exhausted without data"
        );
        Ok(Resolution::exhausted(record_type, id, attempts))
    }

    /// Concurrent twin of [`fetch_with_fallback`](Self::fetch_with_fallback).
    ///
    /// Fans out every fetch at once (bounded by the concurrency cap) and
    /// still returns the first success *in list order*, not completion
    /// order. A success aborts in-flight fetches of lower-priority
    /// sources; failures never cancel anything.
    pub async fn fetch_racing(
        &self,
        sources: &[Arc<dyn DataSource>],
        record_type: &str,
        id: &str,
    ) -> Result<Resolution, ResolveError> {
        validate_request(record_type, id)?;

        let outcomes = self.fan_out(sources, record_type, id, true).await;
        let mut attempts = Vec::with_capacity(sources.len());
        let mut winner: Option<(usize, Record)> = None;

        for (idx, (source, slot)) in sources.iter().zip(outcomes).enumerate() {
            match slot {
                Some(outcome) => {
                    attempts.push(Attempt::from_outcome(source.name(), &outcome));
                    if winner.is_none() {
                        if let FetchOutcome::Success(record) = outcome {
                            winner = Some((idx, record));
                        }
                    }
                }
                None => attempts.push(Attempt::cancelled(source.name())),
            }
        }

        match winner {
            Some((idx, record)) => Ok(Resolution::resolved(
                record_type,
                id,
                attempts,
                sources[idx].name(),
                record,
            )),
            None => {
                tracing::error!(
                    record_type,
                    id,
                    count = sources.len(),
                    "all sources exhausted without data"
                );
                Ok(Resolution::exhausted(record_type, id, attempts))
            }
        }
    }

    /// Fetch from every source, keeping per-source answers in list order.
    ///
    /// Feeds the conflict reconciler: only successes are kept, and a
    /// failure or miss at one source does not disturb the rest.
    pub async fn fetch_all(
        &self,
        sources: &[Arc<dyn DataSource>],
        record_type: &str,
        id: &str,
    ) -> Result<Vec<(String, Record)>, ResolveError> {
        validate_request(record_type, id)?;

        let outcomes = self.fan_out(sources, record_type, id, false).await;
        let mut results = Vec::new();
        for (source, slot) in sources.iter().zip(outcomes) {
            if let Some(FetchOutcome::Success(record)) = slot {
                results.push((source.name().to_string(), record));
            }
        }

        tracing::debug!(
            record_type,
            id,
            queried = sources.len(),
            answered = results.len(),
            "multi-source fetch complete"
        );
        Ok(results)
    }

    /// Spawn one bounded task per source; reassemble outcomes by original
    /// index so callers see list order, not completion order.
    ///
    /// With `cancel_on_success`, a success at index `i` aborts tasks for
    /// every index after `i`; their slots stay `None`.
    async fn fan_out(
        &self,
        sources: &[Arc<dyn DataSource>],
        record_type: &str,
        id: &str,
        cancel_on_success: bool,
    ) -> Vec<Option<FetchOutcome>> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();
        let mut handles = Vec::with_capacity(sources.len());

        for (idx, source) in sources.iter().enumerate() {
            let source = source.clone();
            let record_type = record_type.to_string();
            let id = id.to_string();
            let semaphore = semaphore.clone();
            let handle = tasks.spawn(async move {
                let _permit = semaphore.acquire().await.unwrap();
                let outcome = Self::try_source(source.as_ref(), &record_type, &id).await;
                Self::log_outcome(source.name(), &record_type, &id, &outcome);
                (idx, outcome)
            });
            handles.push(handle);
        }

        let mut outcomes: Vec<Option<FetchOutcome>> =
            sources.iter().map(|_| None).collect();
        let mut best: Option<usize> = None;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, outcome)) => {
                    if cancel_on_success
                        && outcome.is_success()
                        && best.map_or(true, |b| idx < b)
                    {
                        best = Some(idx);
                        for handle in &handles[idx + 1..] {
                            handle.abort();
                        }
                    }
                    outcomes[idx] = Some(outcome);
                }
                Err(err) if err.is_cancelled() => {
                    // aborted lower-priority fetch; slot stays None
                }
                Err(err) => {
                    tracing::error!(error = %err, "source fetch task panicked");
                }
            }
        }

        outcomes
    }
}

/// Read-only derived view of a fallback chain.
///
/// The ordered source list owned by the executor is the single mechanism;
/// this view exists for code paths that want to inspect "what comes after
/// source X" without holding the sources themselves. Being derived from a
/// list, it cannot cycle or drift from the executor's ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackChain {
    names: Vec<String>,
}

impl FallbackChain {
    /// Derive the chain from an ordered source list
    pub fn from_sources(sources: &[Arc<dyn DataSource>]) -> Self {
        Self {
            names: sources.iter().map(|s| s.name().to_string()).collect(),
        }
    }

    /// First source to try
    pub fn first(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    /// The source tried after `name`, if any
    pub fn next_after(&self, name: &str) -> Option<&str> {
        let idx = self.names.iter().position(|n| n == name)?;
        self.names.get(idx + 1).map(String::as_str)
    }

    /// Walk the chain in try order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::AttemptStatus;
    use bankfuse_sources::testing::ScriptedSource;

    fn record(marker: &str) -> Record {
        Record::new().with("from", marker)
    }

    fn as_sources(sources: Vec<Arc<ScriptedSource>>) -> Vec<Arc<dyn DataSource>> {
        sources
            .into_iter()
            .map(|s| s as Arc<dyn DataSource>)
            .collect()
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let a = Arc::new(ScriptedSource::with_record("a", 20, record("a")));
        let b = Arc::new(ScriptedSource::with_record("b", 10, record("b")));
        let sources = as_sources(vec![a.clone(), b.clone()]);

        let resolution = FallbackExecutor::new()
            .fetch_with_fallback(&sources, "customer", "C-1")
            .await
            .unwrap();

        assert_eq!(resolution.source.as_deref(), Some("a"));
        assert_eq!(
            resolution.record.unwrap().get("from").unwrap().as_str(),
            Some("a")
        );
        // short-circuit: b was never fetched
        assert_eq!(b.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let bad = Arc::new(ScriptedSource::failing("bad", 20, "backend down"));
        let good = Arc::new(ScriptedSource::with_record("good", 10, record("good")));
        let sources = as_sources(vec![bad.clone(), good.clone()]);

        let resolution = FallbackExecutor::new()
            .fetch_with_fallback(&sources, "customer", "C-1")
            .await
            .unwrap();

        assert_eq!(resolution.source.as_deref(), Some("good"));
        assert_eq!(bad.fetch_count(), 1);
        assert_eq!(good.fetch_count(), 1);
        assert_eq!(resolution.attempts[0].status, AttemptStatus::Failed);
        assert!(resolution.attempts[0]
            .detail
            .as_deref()
            .unwrap()
            .contains("backend down"));
    }

    #[tokio::test]
    async fn test_unavailable_and_empty_skipped() {
        let down = Arc::new(
            ScriptedSource::with_record("down", 30, record("down")).unavailable(),
        );
        let hollow = Arc::new(ScriptedSource::empty("hollow", 20));
        let good = Arc::new(ScriptedSource::with_record("good", 10, record("good")));
        let sources = as_sources(vec![down.clone(), hollow.clone(), good.clone()]);

        let resolution = FallbackExecutor::new()
            .fetch_with_fallback(&sources, "customer", "C-1")
            .await
            .unwrap();

        assert_eq!(resolution.source.as_deref(), Some("good"));
        // liveness is probed before fetch; down was never fetched
        assert_eq!(down.fetch_count(), 0);
        assert_eq!(resolution.attempts[0].status, AttemptStatus::Unavailable);
        assert_eq!(resolution.attempts[1].status, AttemptStatus::Empty);
    }

    #[tokio::test]
    async fn test_exhaustion_is_not_an_error() {
        let a = Arc::new(ScriptedSource::empty("a", 20));
        let b = Arc::new(ScriptedSource::failing("b", 10, "boom"));
        let sources = as_sources(vec![a, b]);

        let resolution = FallbackExecutor::new()
            .fetch_with_fallback(&sources, "customer", "C-1")
            .await
            .unwrap();

        assert!(!resolution.is_resolved());
        assert_eq!(resolution.attempt_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_source_list_exhausts() {
        let resolution = FallbackExecutor::new()
            .fetch_with_fallback(&[], "customer", "C-1")
            .await
            .unwrap();
        assert!(!resolution.is_resolved());
        assert_eq!(resolution.attempt_count(), 0);
    }

    #[tokio::test]
    async fn test_contract_violations() {
        let executor = FallbackExecutor::new();
        assert_eq!(
            executor.fetch_with_fallback(&[], "", "C-1").await.unwrap_err(),
            ResolveError::EmptyRecordType
        );
        assert_eq!(
            executor
                .fetch_with_fallback(&[], "customer", "")
                .await
                .unwrap_err(),
            ResolveError::EmptyRecordId
        );
    }

    #[tokio::test]
    async fn test_racing_matches_sequential_result() {
        let bad = Arc::new(ScriptedSource::failing("bad", 30, "boom"));
        let first = Arc::new(ScriptedSource::with_record("first", 20, record("first")));
        let second = Arc::new(ScriptedSource::with_record("second", 10, record("second")));
        let sources = as_sources(vec![bad, first, second]);

        let executor = FallbackExecutor::new();
        let sequential = executor
            .fetch_with_fallback(&sources, "customer", "C-1")
            .await
            .unwrap();
        let racing = executor
            .fetch_racing(&sources, "customer", "C-1")
            .await
            .unwrap();

        assert_eq!(racing.source, sequential.source);
        assert_eq!(racing.record, sequential.record);
    }

    #[tokio::test]
    async fn test_racing_exhaustion() {
        let a = Arc::new(ScriptedSource::empty("a", 20));
        let b = Arc::new(ScriptedSource::failing("b", 10, "boom"));
        let sources = as_sources(vec![a, b]);

        let resolution = FallbackExecutor::new()
            .fetch_racing(&sources, "customer", "C-1")
            .await
            .unwrap();
        assert!(!resolution.is_resolved());
    }

    #[tokio::test]
    async fn test_fetch_all_preserves_list_order() {
        let low = Arc::new(ScriptedSource::with_record("low", 1, record("low")));
        let high = Arc::new(ScriptedSource::with_record("high", 30, record("high")));
        let bad = Arc::new(ScriptedSource::failing("bad", 20, "boom"));
        // caller passes an already-ordered list: high, bad, low
        let sources = as_sources(vec![high, bad, low]);

        let results = FallbackExecutor::new()
            .with_concurrency(2)
            .fetch_all(&sources, "customer", "C-1")
            .await
            .unwrap();

        let names: Vec<&str> = results.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["high", "low"]);
    }

    #[test]
    fn test_chain_view() {
        let sources = as_sources(vec![
            Arc::new(ScriptedSource::empty("a", 30)),
            Arc::new(ScriptedSource::empty("b", 20)),
            Arc::new(ScriptedSource::empty("c", 10)),
        ]);
        let chain = FallbackChain::from_sources(&sources);

        assert_eq!(chain.first(), Some("a"));
        assert_eq!(chain.next_after("a"), Some("b"));
        assert_eq!(chain.next_after("b"), Some("c"));
        assert_eq!(chain.next_after("c"), None);
        assert_eq!(chain.next_after("missing"), None);
        assert_eq!(chain.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(chain.len(), 3);
    }
}
