//! Resolution pipeline - orchestrates select → fetch → reconcile → mask
//!
//! The entry point boundary layers call. Wires the resolver, the fallback
//! executor and the masking engine together so callers deal with one
//! object:
//!
//! ```text
//! resolve()         select → fallback walk → mask
//! resolve_merged()  select → fan-out to all → reconcile → mask
//! resolve_batch()   resolve(), one id at a time
//! ```

use std::sync::Arc;

use bankfuse_core::{Record, RequestContext};
use bankfuse_masking::{MaskingContext, MaskingEngine};
use bankfuse_sources::SourceRegistry;

use crate::config::SegmentPolicy;
use crate::error::ResolveError;
use crate::fallback::FallbackExecutor;
use crate::reconcile::{reconcile, MergeStrategy};
use crate::report::Resolution;
use crate::resolver::Resolver;

/// End-to-end resolution pipeline.
pub struct ResolutionPipeline {
    resolver: Resolver,
    executor: FallbackExecutor,
    masking: MaskingEngine,
}

impl ResolutionPipeline {
    /// Pipeline with default policy, concurrency and masking rules
    pub fn new(registry: Arc<SourceRegistry>) -> Self {
        Self {
            resolver: Resolver::new(registry),
            executor: FallbackExecutor::new(),
            masking: MaskingEngine::standard(),
        }
    }

    /// Resolve one record through the fallback walk, then mask it for the
    /// caller.
    pub async fn resolve(
        &self,
        record_type: &str,
        id: &str,
        ctx: &RequestContext,
    ) -> Result<Resolution, ResolveError> {
        let sources = self.resolver.select(record_type, ctx)?;
        let mut resolution = self
            .executor
            .fetch_with_fallback(&sources, record_type, id)
            .await?
            .with_correlation_id(&ctx.correlation_id);

        if let Some(record) = resolution.record.take() {
            let masking_ctx = MaskingContext::from(ctx);
            resolution.record = Some(self.masking.apply(record, &masking_ctx, record_type));
        }
        Ok(resolution)
    }

    /// Query every applicable source, reconcile the answers with the given
    /// strategy, and mask the merged record.
    ///
    /// `Ok(None)` when no source had data.
    pub async fn resolve_merged(
        &self,
        record_type: &str,
        id: &str,
        ctx: &RequestContext,
        strategy: MergeStrategy,
    ) -> Result<Option<Record>, ResolveError> {
        let sources = self.resolver.select(record_type, ctx)?;
        let by_source = self.executor.fetch_all(&sources, record_type, id).await?;

        if by_source.is_empty() {
            tracing::debug!(
                record_type,
                id,
                correlation_id = %ctx.correlation_id,
                "no source had data to reconcile"
            );
            return Ok(None);
        }

        let merged = reconcile(&by_source, strategy);
        let masking_ctx = MaskingContext::from(ctx);
        Ok(Some(self.masking.apply(merged, &masking_ctx, record_type)))
    }

    /// Resolve a batch of ids sequentially, one [`Resolution`] per id.
    pub async fn resolve_batch(
        &self,
        record_type: &str,
        ids: &[&str],
        ctx: &RequestContext,
    ) -> Result<Vec<Resolution>, ResolveError> {
        let mut resolutions = Vec::with_capacity(ids.len());
        for id in ids {
            resolutions.push(self.resolve(record_type, id, ctx).await?);
        }
        Ok(resolutions)
    }

    /// The resolver, for callers that only need selection
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }
}

/// Builder for [`ResolutionPipeline`].
pub struct PipelineBuilder {
    registry: SourceRegistry,
    policy: SegmentPolicy,
    masking: MaskingEngine,
    concurrency: Option<usize>,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            registry: SourceRegistry::new(),
            policy: SegmentPolicy::default(),
            masking: MaskingEngine::standard(),
            concurrency: None,
        }
    }

    /// Set the source registry
    pub fn with_registry(mut self, registry: SourceRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the segment policy
    pub fn with_policy(mut self, policy: SegmentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the masking engine
    pub fn with_masking(mut self, masking: MaskingEngine) -> Self {
        self.masking = masking;
        self
    }

    /// Cap concurrent fetches for the fan-out paths
    pub fn with_concurrency(mut self, max_concurrent: usize) -> Self {
        self.concurrency = Some(max_concurrent);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> ResolutionPipeline {
        let registry = Arc::new(self.registry);
        let mut executor = FallbackExecutor::new();
        if let Some(n) = self.concurrency {
            executor = executor.with_concurrency(n);
        }

        ResolutionPipeline {
            resolver: Resolver::new(registry).with_policy(self.policy),
            executor,
            masking: self.masking,
        }
    }
}
