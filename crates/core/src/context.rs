//! Caller context supplied with each resolution request
//!
//! The pipeline never computes roles, segments or feature flags itself;
//! the boundary layer (HTTP/session handling, out of scope) builds a
//! [`RequestContext`] and passes it down.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Caller privilege level, from least to most restricted output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// Full visibility, masking is a no-op
    Admin,
    /// PII masked, details visible
    Manager,
    /// PII masked and detail fields aggregated
    User,
}

/// Named boolean toggles supplied by the caller.
///
/// The pipeline only ever asks [`is_enabled`](FeatureFlags::is_enabled);
/// where flags come from (tenant config, experiments) is not its concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags {
    enabled: BTreeSet<String>,
}

impl FeatureFlags {
    /// No flags enabled
    pub fn none() -> Self {
        Self::default()
    }

    /// Check whether a flag is enabled
    pub fn is_enabled(&self, flag: &str) -> bool {
        self.enabled.contains(flag)
    }

    /// Enable a flag
    pub fn enable(&mut self, flag: impl Into<String>) {
        self.enabled.insert(flag.into());
    }

    /// Number of enabled flags
    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    /// Whether no flags are enabled
    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FeatureFlags {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            enabled: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Per-request context: who is asking, and under which toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Correlation ID for tracing one resolution across log lines
    pub correlation_id: String,

    /// Caller privilege level
    pub role: Role,

    /// Business segment biasing source preference (e.g. "premium");
    /// `None` falls back to the default segment policy
    pub segment: Option<String>,

    /// Feature flags conditioning masking behavior
    pub flags: FeatureFlags,
}

impl RequestContext {
    /// Create a context with a fresh correlation ID and no flags
    pub fn new(role: Role) -> Self {
        Self {
            correlation_id: Uuid::new_v4().to_string(),
            role,
            segment: None,
            flags: FeatureFlags::none(),
        }
    }

    /// Set the caller segment
    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    /// Enable a single feature flag
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.enable(flag);
        self
    }

    /// Replace the flag set wholesale
    pub fn with_flags(mut self, flags: FeatureFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Override the generated correlation ID
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = id.into();
        self
    }
}
