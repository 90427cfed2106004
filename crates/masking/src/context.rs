//! Masking context - the slice of the request the engine cares about

use serde::{Deserialize, Serialize};

use bankfuse_core::{FeatureFlags, RequestContext, Role};

/// Read-only, per-request view of caller role and feature flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskingContext {
    pub role: Role,
    pub flags: FeatureFlags,
}

impl MaskingContext {
    pub fn new(role: Role, flags: FeatureFlags) -> Self {
        Self { role, flags }
    }
}

impl From<&RequestContext> for MaskingContext {
    fn from(ctx: &RequestContext) -> Self {
        Self {
            role: ctx.role,
            flags: ctx.flags.clone(),
        }
    }
}
