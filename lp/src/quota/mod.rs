//! Quota governance
//!
//! Tracks per-user monthly AI-call usage and the free-tier one-shot
//! restriction, and gates every generation call. Counter state lives behind
//! the [`quotastore::UsageBackend`] seam; this module owns the policy.

mod decision;
mod error;
mod governor;

pub use decision::{DenyCode, GuardDecision};
pub use error::QuotaError;
pub use governor::{QuotaGovernor, UsageCounter};
