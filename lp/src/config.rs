//! Configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::PlanTier;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Per-tier quota ceilings
    pub quota: QuotaConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .launchplan.yml
        let local_config = PathBuf::from(".launchplan.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/launchplan/launchplan.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("launchplan").join("launchplan.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "anthropic" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env).context(format!("environment variable {} not set", self.api_key_env))
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 8192,
            timeout_ms: 300_000,
        }
    }
}

/// Monthly AI-call ceilings per plan tier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaConfig {
    #[serde(rename = "free-monthly-ai-calls")]
    pub free_monthly_ai_calls: u32,

    #[serde(rename = "starter-monthly-ai-calls")]
    pub starter_monthly_ai_calls: u32,

    #[serde(rename = "growth-monthly-ai-calls")]
    pub growth_monthly_ai_calls: u32,

    #[serde(rename = "pro-monthly-ai-calls")]
    pub pro_monthly_ai_calls: u32,
}

impl QuotaConfig {
    /// Monthly ceiling for a tier
    pub fn monthly_ceiling(&self, tier: PlanTier) -> u32 {
        match tier {
            PlanTier::Free => self.free_monthly_ai_calls,
            PlanTier::Starter => self.starter_monthly_ai_calls,
            PlanTier::Growth => self.growth_monthly_ai_calls,
            PlanTier::Pro => self.pro_monthly_ai_calls,
        }
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free_monthly_ai_calls: 3,
            starter_monthly_ai_calls: 25,
            growth_monthly_ai_calls: 100,
            pro_monthly_ai_calls: 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.llm.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(config.quota.free_monthly_ai_calls, 3);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  provider: anthropic
  model: claude-opus-4
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 4096
  timeout-ms: 60000

quota:
  free-monthly-ai-calls: 5
  pro-monthly-ai-calls: 1000
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "claude-opus-4");
        assert_eq!(config.llm.api_key_env, "MY_API_KEY");
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.quota.free_monthly_ai_calls, 5);
        assert_eq!(config.quota.pro_monthly_ai_calls, 1000);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: claude-haiku
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "claude-haiku");
        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.quota.starter_monthly_ai_calls, 25);
    }

    #[test]
    fn test_monthly_ceiling_per_tier() {
        let quota = QuotaConfig::default();

        assert_eq!(quota.monthly_ceiling(PlanTier::Free), 3);
        assert_eq!(quota.monthly_ceiling(PlanTier::Starter), 25);
        assert_eq!(quota.monthly_ceiling(PlanTier::Growth), 100);
        assert_eq!(quota.monthly_ceiling(PlanTier::Pro), 400);
    }
}
