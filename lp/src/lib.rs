//! Launchplan - AI launch-plan synthesis and quota governance
//!
//! Turns a brand/launch description into a dated task list by prompting a
//! generative model, recovering a structured task list from its unreliable
//! text output, scheduling tasks to calendar dates, and gating every call
//! behind per-user monthly quotas with free-tier restrictions.
//!
//! # Core Concepts
//!
//! - **Recover, never fabricate**: the parser accepts whenever the model
//!   output is structurally recoverable and fails loudly otherwise; an
//!   empty plan is a failure, not a result
//! - **Deterministic schedules**: tasks order by `(offset, original index)`
//!   and date from the launch reference date, so the same output always
//!   yields the same plan
//! - **Check before you spend**: quota and plan restrictions run before
//!   the completion client is invoked
//! - **Lazy monthly reset**: stale counters read as zero but are only
//!   physically reset on the next recorded usage
//!
//! # Modules
//!
//! - [`prompt`] - runway buckets and prompt composition
//! - [`llm`] - completion client trait and Anthropic implementation
//! - [`parser`] - response recovery fallback chain
//! - [`schedule`] - phase-based offset defaults and calendar scheduling
//! - [`quota`] - usage counters, ceilings, and free-tier rules
//! - [`config`] - configuration types and loading

pub mod config;
pub mod domain;
pub mod error;
pub mod generator;
pub mod llm;
pub mod parser;
pub mod planner;
pub mod prompt;
pub mod quota;
pub mod schedule;

// Re-export commonly used types
pub use config::{Config, LlmConfig, QuotaConfig};
pub use domain::{
    AiActionKind, Beat, BrandProfile, LaunchContext, LaunchDetails, LaunchTemplate, NormalizedTask, PlanTier,
    RawTaskRecord, ScheduledTask,
};
pub use error::GenerationError;
pub use generator::PlanGenerator;
pub use llm::{AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError, create_client};
pub use parser::{ParseError, recover};
pub use planner::LaunchPlanner;
pub use prompt::{RunwayBucket, compose};
pub use quota::{DenyCode, GuardDecision, QuotaError, QuotaGovernor, UsageCounter};
pub use schedule::{normalize, schedule as schedule_tasks};
