//! Conflict reconciliation
//!
//! When callers deliberately query several sources for the same logical
//! entity, the per-source answers are merged into one record. Sources
//! disagree not only on values but on shape, so every strategy works
//! key-by-key rather than assuming a common schema.
//!
//! All strategies are pure functions, deterministic for a fixed input
//! order. Input order is resolution order: the first entry is the
//! most-preferred source.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use bankfuse_core::{Record, RiskLevel, Value};

/// How disagreeing records are reconciled.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MergeStrategy {
    /// Most-preferred source wins wholesale
    #[default]
    Priority,
    /// Deep-merge in order; later sources override key-by-key
    Merge,
    /// Numeric fields become the mean of their numeric contributions
    Average,
    /// Field-by-field, keep the most cautious estimate seen
    Conservative,
}

impl MergeStrategy {
    /// Parse a strategy name; unknown names fall back to `Priority`
    /// rather than failing, so a bad caller-supplied string degrades to
    /// the safest behavior.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(strategy = name, "unknown strategy, using priority");
            MergeStrategy::Priority
        })
    }
}

/// Merge per-source records into one, per the chosen strategy.
///
/// Degenerate inputs bypass strategy logic entirely: no records yield an
/// empty record, a single record passes through unchanged.
pub fn reconcile(inputs: &[(String, Record)], strategy: MergeStrategy) -> Record {
    match inputs {
        [] => Record::new(),
        [(_, only)] => only.clone(),
        _ => {
            tracing::debug!(
                strategy = %strategy,
                count = inputs.len(),
                "reconciling multi-source records"
            );
            match strategy {
                MergeStrategy::Priority => inputs[0].1.clone(),
                MergeStrategy::Merge => merge_all(inputs),
                MergeStrategy::Average => average_all(inputs),
                MergeStrategy::Conservative => conservative_all(inputs),
            }
        }
    }
}

fn merge_all(inputs: &[(String, Record)]) -> Record {
    let mut fields = BTreeMap::new();
    for (_, record) in inputs {
        deep_merge(&mut fields, record);
    }
    fields.into()
}

/// Nested maps merge recursively; scalars and lists replace outright.
fn deep_merge(base: &mut BTreeMap<String, Value>, overlay: &Record) {
    for (key, incoming) in overlay.iter() {
        merge_value(base, key, incoming);
    }
}

fn merge_value(base: &mut BTreeMap<String, Value>, key: &str, incoming: &Value) {
    match base.entry(key.to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(incoming.clone());
        }
        Entry::Occupied(mut slot) => match (slot.get_mut(), incoming) {
            (Value::Map(existing), Value::Map(nested)) => {
                for (k, v) in nested {
                    merge_value(existing, k, v);
                }
            }
            (existing, incoming) => *existing = incoming.clone(),
        },
    }
}

fn average_all(inputs: &[(String, Record)]) -> Record {
    struct FieldAcc {
        first: Value,
        sum: f64,
        count: u32,
    }

    let mut acc: BTreeMap<String, FieldAcc> = BTreeMap::new();
    for (_, record) in inputs {
        for (field, value) in record.iter() {
            let entry = acc.entry(field.clone()).or_insert_with(|| FieldAcc {
                first: value.clone(),
                sum: 0.0,
                count: 0,
            });
            if let Some(n) = value.as_number() {
                entry.sum += n;
                entry.count += 1;
            }
        }
    }

    acc.into_iter()
        .map(|(field, a)| {
            let value = if a.count > 0 {
                Value::Number(a.sum / f64::from(a.count))
            } else {
                a.first
            };
            (field, value)
        })
        .collect()
}

const SCORE_PATTERNS: &[&str] = &["score", "rating", "grade"];

/// Case-insensitive substring heuristics over field names. A name matching
/// both (e.g. `riskScore`) is treated as a score field.
fn is_score_field(name: &str) -> bool {
    let lower = name.to_lowercase();
    SCORE_PATTERNS.iter().any(|p| lower.contains(p))
}

fn is_risk_field(name: &str) -> bool {
    name.to_lowercase().contains("risk")
}

fn risk_rank(value: &Value) -> u8 {
    value.as_str().map(RiskLevel::rank).unwrap_or(0)
}

/// Lower numeric value preferred; a numeric contribution displaces a
/// non-numeric first value so the minimum is taken over numbers only.
fn keep_min_numeric(kept: &mut Value, incoming: &Value) {
    match (kept.as_number(), incoming.as_number()) {
        (Some(k), Some(n)) if n < k => *kept = incoming.clone(),
        (None, Some(_)) => *kept = incoming.clone(),
        _ => {}
    }
}

fn conservative_all(inputs: &[(String, Record)]) -> Record {
    let mut fields: BTreeMap<String, Value> = BTreeMap::new();

    for (_, record) in inputs {
        for (field, value) in record.iter() {
            match fields.entry(field.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(value.clone());
                }
                Entry::Occupied(mut slot) => {
                    let kept = slot.get_mut();
                    if is_score_field(field) {
                        keep_min_numeric(kept, value);
                    } else if is_risk_field(field) {
                        // highest rank = most severe; ties keep the
                        // earlier value, unknown labels rank 0
                        if risk_rank(value) > risk_rank(kept) {
                            *kept = value.clone();
                        }
                    } else if value.is_numeric() || kept.is_numeric() {
                        keep_min_numeric(kept, value);
                    }
                    // non-numeric, non-risk: first value seen stands
                }
            }
        }
    }

    fields.into()
}
