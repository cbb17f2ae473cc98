//! LLM completion client
//!
//! The pipeline only needs `complete(request) -> text`; everything else
//! (timeouts, retry, cancellation) belongs to the caller. Requests are
//! single-attempt by design: a transport failure propagates immediately.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

mod anthropic;
mod error;
mod types;

pub use anthropic::AnthropicClient;
pub use error::LlmError;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage};

use crate::config::LlmConfig;

/// Completion client boundary
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one completion request
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Create an LLM client for the provider named in config
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "anthropic" => Ok(Arc::new(AnthropicClient::from_config(config)?)),
        other => Err(LlmError::InvalidResponse(format!(
            "Unknown LLM provider: '{}'. Supported: anthropic",
            other
        ))),
    }
}
