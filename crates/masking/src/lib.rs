//! BankFuse masking - record redaction by caller privilege
//!
//! Strips or degrades fields a caller is not entitled to see, after
//! resolution and reconciliation have produced a record:
//!
//! ```text
//! resolved Record
//!     │
//!     ▼
//! ┌──────────────────────────┐
//! │ MaskingEngine            │  ordered (predicate, transform) rules
//! │  1. PII masking          │  Manager + User
//! │  2. detail aggregation   │  User only
//! │  3. risk detail removal  │  record_type == "risk"
//! │  4. score banding        │  record_type == "risk"
//! └──────────────────────────┘
//!     │
//!     ▼
//! masked Record → hydrator (out of scope)
//! ```
//!
//! Admin callers bypass every rule; the engine is the identity for them.

mod band;
mod context;
mod engine;
mod pii;

pub use band::ScoreBand;
pub use context::MaskingContext;
pub use engine::{
    MaskRule, MaskingEngine, FLAG_MASK_PII, FLAG_SHOW_CREDIT_SCORE, FLAG_SHOW_DETAILED_RISK,
    RISK_RECORD_TYPE,
};
