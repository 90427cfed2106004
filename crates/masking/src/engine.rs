//! Masking policy engine
//!
//! Policy is a declarative ordered list of rules, each a predicate over
//! (context, record type) plus a transform over the record. Rules run in
//! list order; Admin callers short-circuit past all of them.

use bankfuse_core::{Record, Role, Value};

use crate::band::ScoreBand;
use crate::context::MaskingContext;
use crate::pii::{mask_full, mask_partial, DETAIL_FIELDS, PII_FIELDS, RISK_DETAIL_FIELDS};

/// Flag: replace PII values with a fixed mask run instead of a partial mask.
pub const FLAG_MASK_PII: &str = "mask_pii_data";
/// Flag: keep detailed-risk fields on risk records.
pub const FLAG_SHOW_DETAILED_RISK: &str = "show_detailed_risk";
/// Flag: keep raw numeric credit scores on risk records.
pub const FLAG_SHOW_CREDIT_SCORE: &str = "show_credit_score";

/// Record type that carries the extra risk-specific rules.
pub const RISK_RECORD_TYPE: &str = "risk";

/// One masking rule: a named predicate/transform pair.
pub struct MaskRule {
    /// Rule name for logging
    pub name: &'static str,
    /// Whether the rule applies for this caller and record type
    pub applies: fn(&MaskingContext, &str) -> bool,
    /// In-place transform over the record
    pub transform: fn(&mut Record, &MaskingContext),
}

/// Role- and flag-conditioned redaction engine.
pub struct MaskingEngine {
    rules: Vec<MaskRule>,
}

impl Default for MaskingEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl MaskingEngine {
    /// The standard rule set, in contract order.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                MaskRule {
                    name: "pii_masking",
                    applies: |ctx, _| matches!(ctx.role, Role::Manager | Role::User),
                    transform: mask_pii_fields,
                },
                MaskRule {
                    name: "detail_aggregation",
                    applies: |ctx, _| ctx.role == Role::User,
                    transform: aggregate_detail_fields,
                },
                MaskRule {
                    name: "risk_detail_removal",
                    applies: |ctx, record_type| {
                        record_type == RISK_RECORD_TYPE
                            && !ctx.flags.is_enabled(FLAG_SHOW_DETAILED_RISK)
                    },
                    transform: strip_risk_details,
                },
                MaskRule {
                    name: "score_banding",
                    applies: |ctx, record_type| {
                        record_type == RISK_RECORD_TYPE
                            && !(ctx.flags.is_enabled(FLAG_SHOW_CREDIT_SCORE)
                                && ctx.role != Role::Manager)
                    },
                    transform: band_score_fields,
                },
            ],
        }
    }

    /// An engine with a custom rule list, for policies beyond the standard
    /// contract.
    pub fn with_rules(rules: Vec<MaskRule>) -> Self {
        Self { rules }
    }

    /// Number of rules in the policy
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Apply the policy. Identity for Admin callers.
    pub fn apply(&self, record: Record, ctx: &MaskingContext, record_type: &str) -> Record {
        if ctx.role == Role::Admin {
            return record;
        }

        let mut masked = record;
        for rule in &self.rules {
            if (rule.applies)(ctx, record_type) {
                tracing::debug!(
                    rule = rule.name,
                    role = %ctx.role,
                    record_type,
                    "applying masking rule"
                );
                (rule.transform)(&mut masked, ctx);
            }
        }
        masked
    }
}

fn mask_pii_fields(record: &mut Record, ctx: &MaskingContext) {
    let full = ctx.flags.is_enabled(FLAG_MASK_PII);

    for field in PII_FIELDS {
        let masked = match record.get(field) {
            Some(Value::String(s)) => {
                if full {
                    Some(mask_full())
                } else {
                    Some(mask_partial(s))
                }
            }
            // a non-string PII value still leaks; replace outright
            Some(v) if !v.is_null() => Some(mask_full()),
            _ => None,
        };
        if let Some(masked) = masked {
            record.insert(*field, masked);
        }
    }
}

fn aggregate_detail_fields(record: &mut Record, _ctx: &MaskingContext) {
    for field in DETAIL_FIELDS {
        let count = match record.get(field) {
            Some(Value::List(items)) => Some(items.len()),
            _ => None,
        };
        if let Some(count) = count {
            record.remove(field);
            record.insert(format!("{field}Count"), count);
        }
    }
}

fn strip_risk_details(record: &mut Record, _ctx: &MaskingContext) {
    for field in RISK_DETAIL_FIELDS {
        record.remove(field);
    }
}

fn band_score_fields(record: &mut Record, _ctx: &MaskingContext) {
    // counts produced by detail aggregation also contain "score"
    // (scoresCount); they are sizes, not scores, and stay as-is
    let scores: Vec<(String, f64)> = record
        .iter()
        .filter(|(name, _)| name.to_lowercase().contains("score") && !name.ends_with("Count"))
        .filter_map(|(name, value)| value.as_number().map(|n| (name.clone(), n)))
        .collect();

    for (field, score) in scores {
        record.remove(&field);
        record.insert(
            format!("{field}Range"),
            ScoreBand::from_score(score).to_string(),
        );
    }
}
