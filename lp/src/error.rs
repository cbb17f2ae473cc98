//! Generation error type

use thiserror::Error;

use crate::llm::LlmError;
use crate::parser::ParseError;
use crate::quota::{GuardDecision, QuotaError};

/// Failure of one launch-plan generation
///
/// Parsing and scheduling failures abort the generation entirely; no
/// partial plan ever reaches the caller.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Prompt template rendering failed
    #[error("prompt rendering failed: {0}")]
    Template(#[from] handlebars::RenderError),

    /// The completion call failed in transport or at the provider
    #[error("completion request failed: {0}")]
    Completion(#[from] LlmError),

    /// No task list could be recovered from the model output
    #[error("task list recovery failed: {0}")]
    Parse(#[from] ParseError),

    /// A quota operation itself failed
    #[error("quota check failed: {0}")]
    Quota(#[from] QuotaError),

    /// The quota governor denied the request before any model call
    #[error("generation denied: {}", .0.reason.as_deref().unwrap_or("plan restriction"))]
    Denied(GuardDecision),
}
