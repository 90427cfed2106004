//! BankFuse data sources
//!
//! Capability contract for heterogeneous record backends plus the registry
//! they are wired into at startup:
//!
//! ```text
//! SourceRegistry
//!     │ snapshot()
//!     ▼
//! [Arc<dyn DataSource>]  ── fetch(record_type, id) ──► Record | absent | error
//! ```
//!
//! Reference implementations cover the three tiers a deployment typically
//! runs: [`LedgerSource`] (system of record), [`CacheSource`] (volatile
//! tier with an availability toggle) and [`StaticSource`] (always-on
//! defaults of last resort). Real deployments add their own backends by
//! implementing [`DataSource`].

pub mod cache;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod source;
pub mod static_source;
pub mod testing;

pub use cache::CacheSource;
pub use error::{RegistryError, SourceError};
pub use ledger::LedgerSource;
pub use registry::SourceRegistry;
pub use source::{DataSource, FetchOutcome};
pub use static_source::StaticSource;
