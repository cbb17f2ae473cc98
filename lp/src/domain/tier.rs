//! Plan tier

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Subscription tier, stored as snake_case text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    #[default]
    Free,
    Starter,
    Growth,
    Pro,
}

impl PlanTier {
    /// Whether this tier is subject to the free-plan one-shot restriction
    pub fn is_free(&self) -> bool {
        matches!(self, PlanTier::Free)
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Free => "free",
            Self::Starter => "starter",
            Self::Growth => "growth",
            Self::Pro => "pro",
        };
        f.write_str(s)
    }
}

/// Error returned when parsing an invalid [`PlanTier`] string
#[derive(Debug, Clone, Error)]
#[error("invalid plan tier: {0:?}")]
pub struct PlanTierParseError(pub String);

impl FromStr for PlanTier {
    type Err = PlanTierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "starter" => Ok(Self::Starter),
            "growth" => Ok(Self::Growth),
            "pro" => Ok(Self::Pro),
            other => Err(PlanTierParseError(other.to_owned())),
        }
    }
}
