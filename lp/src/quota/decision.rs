//! Guard decisions returned by quota checks

use std::fmt;

use serde::{Deserialize, Serialize};

/// Machine-readable denial code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenyCode {
    /// Monthly AI-call ceiling reached for the user's plan
    #[serde(rename = "PLAN_LIMIT_AI")]
    PlanLimitAi,

    /// Free-plan one-shot allowance already consumed for this launch
    #[serde(rename = "FREE_PLAN_RESTRICTION")]
    FreePlanRestriction,
}

impl fmt::Display for DenyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PlanLimitAi => "PLAN_LIMIT_AI",
            Self::FreePlanRestriction => "FREE_PLAN_RESTRICTION",
        };
        f.write_str(s)
    }
}

/// Outcome of a quota or restriction check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardDecision {
    /// Whether the action may proceed
    pub allowed: bool,

    /// Human-readable explanation for denials
    pub reason: Option<String>,

    /// Machine-readable denial code
    pub code: Option<DenyCode>,
}

impl GuardDecision {
    /// An allowing decision
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
            code: None,
        }
    }

    /// A denying decision with a code and reason
    pub fn deny(code: DenyCode, reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            code: Some(code),
        }
    }
}
