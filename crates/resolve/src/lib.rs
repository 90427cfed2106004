//! BankFuse resolution pipeline
//!
//! Answers "give me customer/product/risk record X" against several
//! heterogeneous, unreliable backends:
//!
//! ```text
//! RequestContext
//!       │
//!       ▼
//! ┌─────────────────┐
//! │ Resolver        │──► ordered [Arc<dyn DataSource>]
//! │ (segment-aware) │    (priority desc, segment preference on top)
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐     one record needed          all answers wanted
//! │ FallbackExecutor│──► fetch_with_fallback    or   fetch_all
//! └────────┬────────┘         │                         │
//!          │                  ▼                         ▼
//!          │             first success            Reconciler::reconcile
//!          │                  │                         │
//!          ▼                  ▼                         ▼
//! ┌─────────────────┐   ┌───────────────────────────────────┐
//! │ Resolution      │   │ MaskingEngine (bankfuse-masking)  │
//! │ (attempt trail) │   └───────────────────────────────────┘
//! └─────────────────┘
//! ```
//!
//! Failures inside one source never abort the walk over the rest; the
//! pipeline raises an error only for contract violations (empty record
//! type or id). "No data anywhere" is a normal, non-error outcome.

pub mod config;
pub mod error;
pub mod fallback;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod resolver;

pub use config::SegmentPolicy;
pub use error::ResolveError;
pub use fallback::{FallbackChain, FallbackExecutor};
pub use pipeline::{PipelineBuilder, ResolutionPipeline};
pub use reconcile::{reconcile, MergeStrategy};
pub use report::{Attempt, AttemptStatus, Resolution};
pub use resolver::Resolver;
