//! Governed generation service
//!
//! Wires the quota governor in front of the generation pipeline: the
//! governor runs before the completion client is ever invoked, so a
//! request doomed to be rejected never pays for a model call. After a
//! successful generation the launch is flagged and usage recorded.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use quotastore::UsageBackend;
use tracing::{debug, warn};

use crate::domain::{AiActionKind, LaunchContext, ScheduledTask};
use crate::error::GenerationError;
use crate::generator::PlanGenerator;
use crate::quota::QuotaGovernor;

/// Quota-governed launch-plan generation
pub struct LaunchPlanner {
    generator: PlanGenerator,
    governor: QuotaGovernor,
    store: Arc<dyn UsageBackend>,
}

impl LaunchPlanner {
    /// Create a planner from its parts
    ///
    /// `store` must be the same backend the governor reads, so the
    /// generation flag the governor checks is the one this service sets.
    pub fn new(generator: PlanGenerator, governor: QuotaGovernor, store: Arc<dyn UsageBackend>) -> Self {
        Self {
            generator,
            governor,
            store,
        }
    }

    /// Generate a plan for a user's launch, enforcing quota and plan rules
    ///
    /// The returned tasks are not persisted here; the caller stores them
    /// and owns transactional concerns. Usage is recorded after the
    /// generation succeeds, so a failed generation costs no quota. The
    /// check and the record are separate round trips: two concurrent
    /// requests can both pass the check (see the governor's notes).
    pub async fn generate_for_user(
        &self,
        user_id: &str,
        launch_id: &str,
        kind: AiActionKind,
        context: &LaunchContext,
    ) -> Result<Vec<ScheduledTask>, GenerationError> {
        self.generate_for_user_on(user_id, launch_id, kind, context, Utc::now().date_naive())
            .await
    }

    /// [`Self::generate_for_user`] with an explicit evaluation date
    pub async fn generate_for_user_on(
        &self,
        user_id: &str,
        launch_id: &str,
        kind: AiActionKind,
        context: &LaunchContext,
        today: NaiveDate,
    ) -> Result<Vec<ScheduledTask>, GenerationError> {
        let decision = self
            .governor
            .check_free_tier_action_on(user_id, launch_id, kind, today)?;
        if !decision.allowed {
            debug!(user_id, launch_id, %kind, code = ?decision.code, "generation denied before model call");
            return Err(GenerationError::Denied(decision));
        }

        let tasks = self.generator.generate_on(context, today).await?;

        if kind.is_generation_class() {
            if let Err(e) = self.store.mark_launch_generated(launch_id) {
                warn!(launch_id, error = %e, "failed to flag launch as generated");
            }
        }
        if !self.governor.record_usage_on(user_id, today) {
            warn!(user_id, "usage was not recorded for a completed generation");
        }

        Ok(tasks)
    }
}
