//! Quota governor
//!
//! Policy over the persistent usage counter: monthly ceilings with lazy
//! calendar-month reset, and the free-tier one-shot restriction.
//!
//! The check-then-record sequence is two separate store round trips, not a
//! transaction: two concurrent requests can both pass `check_allowance`
//! before either records usage. Closing that window needs an atomic
//! compare-and-increment in the backend.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use quotastore::{CounterRow, UsageBackend, UsageLogEntry};
use tracing::{debug, warn};

use crate::config::QuotaConfig;
use crate::domain::{AiActionKind, PlanTier};

use super::decision::{DenyCode, GuardDecision};
use super::error::QuotaError;

/// Action label recorded in the usage log
const USAGE_LOG_ACTION: &str = "ai_generation";

/// Typed view of a user's stored usage counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageCounter {
    pub plan: PlanTier,
    pub ai_calls_used: u32,
    pub ai_calls_reset_date: NaiveDate,
}

impl UsageCounter {
    fn from_row(row: &CounterRow) -> Result<Self, QuotaError> {
        let plan = row
            .plan
            .parse::<PlanTier>()
            .map_err(|_| QuotaError::UnknownTier(row.plan.clone()))?;
        Ok(Self {
            plan,
            ai_calls_used: row.ai_calls_used,
            ai_calls_reset_date: row.ai_calls_reset_date,
        })
    }
}

/// Gates AI calls behind per-user monthly quotas and plan restrictions
pub struct QuotaGovernor {
    store: Arc<dyn UsageBackend>,
    config: QuotaConfig,
}

impl QuotaGovernor {
    /// Create a governor over a usage store
    pub fn new(store: Arc<dyn UsageBackend>, config: QuotaConfig) -> Self {
        Self { store, config }
    }

    /// Check whether the user may make one more AI call this month
    pub fn check_allowance(&self, user_id: &str) -> Result<GuardDecision, QuotaError> {
        self.check_allowance_on(user_id, today())
    }

    /// [`Self::check_allowance`] evaluated at an explicit date
    ///
    /// A reset date in a prior calendar month reads as zero usage for this
    /// check only; nothing is written until the next `record_usage`.
    pub fn check_allowance_on(&self, user_id: &str, today: NaiveDate) -> Result<GuardDecision, QuotaError> {
        authenticate(user_id)?;
        let counter = self.load_counter(user_id, today)?;

        let effective_used = if same_month(counter.ai_calls_reset_date, today) {
            counter.ai_calls_used
        } else {
            0
        };

        let ceiling = self.config.monthly_ceiling(counter.plan);
        debug!(user_id, %counter.plan, effective_used, ceiling, "checked allowance");

        if effective_used < ceiling {
            Ok(GuardDecision::allow())
        } else {
            Ok(GuardDecision::deny(
                DenyCode::PlanLimitAi,
                format!(
                    "monthly AI call limit of {ceiling} reached for the {} plan",
                    counter.plan
                ),
            ))
        }
    }

    /// Record one AI call against the user's counter
    ///
    /// Non-throwing: returns false if the counter could not be persisted.
    /// This is the only path that physically resets a stale counter. The
    /// usage-log append is best-effort; its failure never fails the
    /// increment.
    pub fn record_usage(&self, user_id: &str) -> bool {
        self.record_usage_on(user_id, today())
    }

    /// [`Self::record_usage`] evaluated at an explicit date
    pub fn record_usage_on(&self, user_id: &str, today: NaiveDate) -> bool {
        if user_id.trim().is_empty() {
            warn!("record_usage called without a user id");
            return false;
        }

        let mut row = match self.store.fetch_counter(user_id) {
            Ok(Some(row)) => row,
            Ok(None) => CounterRow::new(user_id, PlanTier::Free.to_string(), today),
            Err(e) => {
                warn!(user_id, error = %e, "usage counter fetch failed");
                return false;
            }
        };

        row.ai_calls_used = if same_month(row.ai_calls_reset_date, today) {
            row.ai_calls_used.saturating_add(1)
        } else {
            1
        };
        row.ai_calls_reset_date = today;

        if let Err(e) = self.store.save_counter(&row) {
            warn!(user_id, error = %e, "usage counter write failed");
            return false;
        }

        if let Err(e) = self.store.append_usage(&UsageLogEntry::new(user_id, USAGE_LOG_ACTION)) {
            warn!(user_id, error = %e, "usage log append failed");
        }

        debug!(user_id, used = row.ai_calls_used, "recorded AI usage");
        true
    }

    /// Check an AI action against plan-tier restrictions
    ///
    /// Paid tiers delegate entirely to the quota check. Free-tier accounts
    /// keep generation-class actions while quota remains; every other
    /// action kind is denied outright once the launch has completed a
    /// generation.
    pub fn check_free_tier_action(
        &self,
        user_id: &str,
        launch_id: &str,
        kind: AiActionKind,
    ) -> Result<GuardDecision, QuotaError> {
        self.check_free_tier_action_on(user_id, launch_id, kind, today())
    }

    /// [`Self::check_free_tier_action`] evaluated at an explicit date
    pub fn check_free_tier_action_on(
        &self,
        user_id: &str,
        launch_id: &str,
        kind: AiActionKind,
        today: NaiveDate,
    ) -> Result<GuardDecision, QuotaError> {
        authenticate(user_id)?;
        let counter = self.load_counter(user_id, today)?;

        if !counter.plan.is_free() {
            return self.check_allowance_on(user_id, today);
        }

        let launch = self
            .store
            .fetch_launch(launch_id)?
            .ok_or_else(|| QuotaError::LaunchNotFound(launch_id.to_string()))?;

        if launch.owner_id != user_id {
            return Err(QuotaError::OwnershipMismatch {
                launch_id: launch_id.to_string(),
            });
        }

        if !kind.is_generation_class() && launch.initial_ai_generated {
            debug!(user_id, launch_id, %kind, "free-tier restriction hit");
            return Ok(GuardDecision::deny(
                DenyCode::FreePlanRestriction,
                format!("the free plan only includes plan generation; {kind} requires an upgrade"),
            ));
        }

        self.check_allowance_on(user_id, today)
    }

    /// Load the user's counter, creating an unpersisted default on first use
    fn load_counter(&self, user_id: &str, today: NaiveDate) -> Result<UsageCounter, QuotaError> {
        match self.store.fetch_counter(user_id)? {
            Some(row) => UsageCounter::from_row(&row),
            None => Ok(UsageCounter {
                plan: PlanTier::Free,
                ai_calls_used: 0,
                ai_calls_reset_date: today,
            }),
        }
    }
}

fn authenticate(user_id: &str) -> Result<(), QuotaError> {
    if user_id.trim().is_empty() {
        return Err(QuotaError::NotAuthenticated);
    }
    Ok(())
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
