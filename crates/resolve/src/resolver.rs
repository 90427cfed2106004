//! Source selection
//!
//! Turns "record type + caller context" into the ordered source list the
//! executors walk. Two independent concerns decide the order: technical
//! priority first, then the caller segment's preference list on top of the
//! eligible set.

use std::cmp::Reverse;
use std::sync::Arc;

use bankfuse_core::RequestContext;
use bankfuse_sources::{DataSource, SourceRegistry};

use crate::config::SegmentPolicy;
use crate::error::ResolveError;

/// Segment-aware source selector over a shared registry.
pub struct Resolver {
    registry: Arc<SourceRegistry>,
    policy: SegmentPolicy,
}

impl Resolver {
    /// Create a resolver with the default segment policy
    pub fn new(registry: Arc<SourceRegistry>) -> Self {
        Self {
            registry,
            policy: SegmentPolicy::default(),
        }
    }

    /// Replace the segment policy
    pub fn with_policy(mut self, policy: SegmentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The registry this resolver selects from
    pub fn registry(&self) -> &Arc<SourceRegistry> {
        &self.registry
    }

    /// Select and order the sources applicable to this request.
    ///
    /// Unavailable sources are dropped for the whole request, never
    /// retried. Equal priorities keep registration order (stable sort).
    pub fn select(
        &self,
        record_type: &str,
        ctx: &RequestContext,
    ) -> Result<Vec<Arc<dyn DataSource>>, ResolveError> {
        if record_type.trim().is_empty() {
            return Err(ResolveError::EmptyRecordType);
        }

        let mut eligible: Vec<Arc<dyn DataSource>> = Vec::new();
        for source in self.registry.snapshot() {
            if !source.supports(record_type) {
                continue;
            }
            if !source.is_available() {
                tracing::warn!(
                    source = source.name(),
                    record_type,
                    correlation_id = %ctx.correlation_id,
                    "source unavailable, dropped for this request"
                );
                continue;
            }
            eligible.push(source);
        }

        eligible.sort_by_key(|s| Reverse(s.priority()));

        let selected = match self.policy.preferences(ctx.segment.as_deref()) {
            Some(preferred) => preferred
                .iter()
                .filter_map(|name| eligible.iter().find(|s| s.name() == name).cloned())
                .collect(),
            None => eligible,
        };

        tracing::debug!(
            record_type,
            segment = ctx.segment.as_deref().unwrap_or("-"),
            count = selected.len(),
            correlation_id = %ctx.correlation_id,
            "selected sources"
        );

        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankfuse_core::{Record, Role};
    use bankfuse_sources::testing::ScriptedSource;

    fn registry_with(sources: Vec<ScriptedSource>) -> Arc<SourceRegistry> {
        let mut registry = SourceRegistry::new();
        for source in sources {
            registry.register(Arc::new(source)).unwrap();
        }
        Arc::new(registry)
    }

    fn names(selected: &[Arc<dyn DataSource>]) -> Vec<&str> {
        selected.iter().map(|s| s.name()).collect()
    }

    #[test]
    fn test_priority_order_with_permissive_policy() {
        let registry = registry_with(vec![
            ScriptedSource::with_record("low", 1, Record::new()),
            ScriptedSource::with_record("high", 30, Record::new()),
            ScriptedSource::with_record("mid", 10, Record::new()),
        ]);
        let resolver = Resolver::new(registry).with_policy(SegmentPolicy::permissive());
        let ctx = RequestContext::new(Role::User);

        let selected = resolver.select("customer", &ctx).unwrap();
        assert_eq!(names(&selected), vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_equal_priority_keeps_registration_order() {
        let registry = registry_with(vec![
            ScriptedSource::with_record("first", 10, Record::new()),
            ScriptedSource::with_record("second", 10, Record::new()),
            ScriptedSource::with_record("third", 10, Record::new()),
        ]);
        let resolver = Resolver::new(registry).with_policy(SegmentPolicy::permissive());
        let ctx = RequestContext::new(Role::User);

        let selected = resolver.select("customer", &ctx).unwrap();
        assert_eq!(names(&selected), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_selection_is_reproducible() {
        let registry = registry_with(vec![
            ScriptedSource::with_record("a", 5, Record::new()),
            ScriptedSource::with_record("b", 7, Record::new()),
        ]);
        let resolver = Resolver::new(registry).with_policy(SegmentPolicy::permissive());
        let ctx = RequestContext::new(Role::User);

        let first = names(&resolver.select("customer", &ctx).unwrap())
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        for _ in 0..3 {
            let again = resolver.select("customer", &ctx).unwrap();
            assert_eq!(names(&again), first);
        }
    }

    #[test]
    fn test_unavailable_sources_dropped() {
        let registry = registry_with(vec![
            ScriptedSource::with_record("up", 1, Record::new()),
            ScriptedSource::with_record("down", 99, Record::new()).unavailable(),
        ]);
        let resolver = Resolver::new(registry).with_policy(SegmentPolicy::permissive());
        let ctx = RequestContext::new(Role::User);

        let selected = resolver.select("customer", &ctx).unwrap();
        assert_eq!(names(&selected), vec!["up"]);
    }

    #[test]
    fn test_unsupported_type_filtered() {
        let registry = registry_with(vec![
            ScriptedSource::with_record("customers-only", 10, Record::new())
                .with_types(["customer"]),
            ScriptedSource::with_record("everything", 1, Record::new()),
        ]);
        let resolver = Resolver::new(registry).with_policy(SegmentPolicy::permissive());
        let ctx = RequestContext::new(Role::User);

        let selected = resolver.select("risk", &ctx).unwrap();
        assert_eq!(names(&selected), vec!["everything"]);
    }

    #[test]
    fn test_segment_preference_overrides_priority() {
        let registry = registry_with(vec![
            ScriptedSource::with_record("internal", 10, Record::new()),
            ScriptedSource::with_record("cache", 20, Record::new()),
            ScriptedSource::with_record("default", 1, Record::new()),
        ]);
        // premium-style list puts internal before cache despite priority
        let policy = SegmentPolicy::permissive().with_segment(
            "premium",
            ["internal", "cache", "default"],
        );
        let resolver = Resolver::new(registry).with_policy(policy);
        let ctx = RequestContext::new(Role::User).with_segment("premium");

        let selected = resolver.select("customer", &ctx).unwrap();
        assert_eq!(names(&selected), vec!["internal", "cache", "default"]);
    }

    #[test]
    fn test_sources_not_in_segment_list_dropped() {
        let registry = registry_with(vec![
            ScriptedSource::with_record("internal", 10, Record::new()),
            ScriptedSource::with_record("experimental", 50, Record::new()),
        ]);
        let policy = SegmentPolicy::permissive()
            .with_segment("standard", ["internal"])
            .with_default(["internal"]);
        let resolver = Resolver::new(registry).with_policy(policy);
        let ctx = RequestContext::new(Role::User).with_segment("standard");

        let selected = resolver.select("customer", &ctx).unwrap();
        assert_eq!(names(&selected), vec!["internal"]);
    }

    #[test]
    fn test_empty_record_type_rejected() {
        let registry = registry_with(vec![]);
        let resolver = Resolver::new(registry);
        let ctx = RequestContext::new(Role::Admin);

        assert_eq!(
            resolver.select("  ", &ctx).unwrap_err(),
            ResolveError::EmptyRecordType
        );
    }
}
