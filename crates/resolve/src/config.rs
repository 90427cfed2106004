//! Segment policy configuration
//!
//! Maps business segments to ordered source-name preference lists. Loaded
//! from whatever configuration layer the deployment uses (out of scope);
//! deserializable from JSON/YAML-shaped data and carrying workable
//! defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-segment source preference lists.
///
/// Selection walks the matching list in order and keeps, per name, the
/// source of that name from the eligible set; unnamed sources are dropped.
/// An unknown or absent segment uses `default`. A policy with no lists at
/// all (see [`permissive`](SegmentPolicy::permissive)) leaves priority
/// order untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentPolicy {
    /// Segment name -> ordered source-name preferences
    #[serde(default)]
    pub segments: BTreeMap<String, Vec<String>>,

    /// Preferences used when the segment is absent or unrecognized
    #[serde(default)]
    pub default: Vec<String>,
}

impl Default for SegmentPolicy {
    fn default() -> Self {
        let mut segments = BTreeMap::new();
        segments.insert(
            "standard".to_string(),
            vec!["internal".into(), "cache".into(), "default".into()],
        );
        segments.insert(
            "premium".to_string(),
            vec![
                "partner".into(),
                "internal".into(),
                "cache".into(),
                "default".into(),
            ],
        );
        segments.insert(
            "corporate".to_string(),
            vec!["internal".into(), "default".into()],
        );

        Self {
            segments,
            default: vec!["internal".into(), "cache".into(), "default".into()],
        }
    }
}

impl SegmentPolicy {
    /// A policy that never filters or re-orders.
    pub fn permissive() -> Self {
        Self {
            segments: BTreeMap::new(),
            default: Vec::new(),
        }
    }

    /// Set or replace one segment's preference list
    pub fn with_segment<I, S>(mut self, segment: impl Into<String>, preferred: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments.insert(
            segment.into(),
            preferred.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Replace the default preference list
    pub fn with_default<I, S>(mut self, preferred: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default = preferred.into_iter().map(Into::into).collect();
        self
    }

    /// Preference list for a segment, falling back to the default list.
    ///
    /// `None` means "no preference configured": selection keeps priority
    /// order as-is.
    pub fn preferences(&self, segment: Option<&str>) -> Option<&[String]> {
        if let Some(name) = segment {
            if let Some(list) = self.segments.get(name) {
                return Some(list);
            }
            tracing::debug!(segment = name, "unrecognized segment, using default list");
        }

        if self.default.is_empty() {
            None
        } else {
            Some(&self.default)
        }
    }
}
