//! Plan generation pipeline
//!
//! compose -> complete -> recover -> normalize -> schedule. The pipeline is
//! pure apart from the completion call: no quota, no persistence, and no
//! retry around the model (the caller owns retry and cancellation).

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::domain::{LaunchContext, ScheduledTask};
use crate::error::GenerationError;
use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::{parser, prompt, schedule};

/// Default response budget for a plan generation
const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Turns a launch context into an ordered, dated task list
pub struct PlanGenerator {
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl PlanGenerator {
    /// Create a generator over a completion client
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Override the response token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Generate a launch plan for the context
    pub async fn generate(&self, context: &LaunchContext) -> Result<Vec<ScheduledTask>, GenerationError> {
        self.generate_on(context, Utc::now().date_naive()).await
    }

    /// [`Self::generate`] with an explicit "today" for runway computation
    pub async fn generate_on(
        &self,
        context: &LaunchContext,
        today: NaiveDate,
    ) -> Result<Vec<ScheduledTask>, GenerationError> {
        let days_to_launch = context.days_to_launch(today);
        debug!(launch = %context.launch.name, days_to_launch, "generating launch plan");

        let user_prompt = prompt::compose(context, days_to_launch)?;
        let request = CompletionRequest {
            system_prompt: prompt::system_prompt().to_string(),
            messages: vec![Message::user(user_prompt)],
            max_tokens: self.max_tokens,
        };

        let response = self.llm.complete(request).await?;
        debug!(
            output_tokens = response.usage.output_tokens,
            ?response.stop_reason,
            "completion finished"
        );

        let records = parser::recover(&response.content)?;
        let normalized = schedule::normalize(records);
        let scheduled = schedule::schedule(normalized, context);

        info!(
            launch = %context.launch.name,
            task_count = scheduled.len(),
            "launch plan generated"
        );
        Ok(scheduled)
    }
}
