//! AI action kinds gated by the quota governor

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of AI action a caller is asking to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiActionKind {
    /// First generation of a launch plan
    InitialGeneration,
    /// Full-plan regeneration, quota-wise the same class as the initial run
    FullRegeneration,
    /// Suggest additional tasks for an existing plan
    TaskSuggestion,
    /// Rewrite a single task
    TaskRewrite,
    /// Polish a task description
    DescriptionPolish,
}

impl AiActionKind {
    /// Generation-class actions stay available to free-tier accounts while
    /// quota remains; everything else falls under the one-shot restriction
    pub fn is_generation_class(&self) -> bool {
        matches!(self, Self::InitialGeneration | Self::FullRegeneration)
    }
}

impl fmt::Display for AiActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InitialGeneration => "initial_generation",
            Self::FullRegeneration => "full_regeneration",
            Self::TaskSuggestion => "task_suggestion",
            Self::TaskRewrite => "task_rewrite",
            Self::DescriptionPolish => "description_polish",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_class() {
        assert!(AiActionKind::InitialGeneration.is_generation_class());
        assert!(AiActionKind::FullRegeneration.is_generation_class());
        assert!(!AiActionKind::TaskSuggestion.is_generation_class());
        assert!(!AiActionKind::TaskRewrite.is_generation_class());
        assert!(!AiActionKind::DescriptionPolish.is_generation_class());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&AiActionKind::InitialGeneration).unwrap();
        assert_eq!(json, "\"initial_generation\"");
    }
}
