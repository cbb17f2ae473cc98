//! Parse error type

use thiserror::Error;

/// Maximum number of characters of raw model output quoted in errors
const EXCERPT_LEN: usize = 240;

/// Failure to recover a non-empty task list from model output
#[derive(Debug, Error)]
pub enum ParseError {
    /// No fallback stage produced a parseable task container
    #[error("no task list could be recovered from model output (excerpt: {excerpt:?})")]
    Unrecoverable { excerpt: String },

    /// A container parsed but held zero tasks
    #[error("model output parsed to an empty task list")]
    EmptyPlan,
}

impl ParseError {
    /// Build a [`ParseError::Unrecoverable`] carrying a bounded excerpt of
    /// the original text
    pub fn unrecoverable(raw: &str) -> Self {
        let trimmed = raw.trim();
        let excerpt = if trimmed.chars().count() > EXCERPT_LEN {
            let head: String = trimmed.chars().take(EXCERPT_LEN).collect();
            format!("{head}…")
        } else {
            trimmed.to_string()
        };
        ParseError::Unrecoverable { excerpt }
    }
}
