//! Server configuration
//!
//! Read once at startup from shuttle secrets (`Secrets.toml` when running
//! locally) and injected into the chat relay.

use persona_chat::{ApiKey, InstructionStrategy, DEFAULT_MAX_OUTPUT_TOKENS};

use crate::adapters::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::application::RelayConfig;

/// Largest output cap accepted for the Gemini 2.x flash/pro models
pub const MAX_OUTPUT_TOKENS_CEILING: u32 = 8192;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gemini credential; `None` when missing or still the placeholder
    pub api_key: Option<ApiKey>,
    pub model: String,
    pub base_url: String,
    pub max_output_tokens: u32,
    pub instruction_strategy: InstructionStrategy,
    /// Append the provider's model list to error messages
    pub list_models_on_error: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            instruction_strategy: InstructionStrategy::default(),
            list_models_on_error: false,
        }
    }
}

impl AppConfig {
    pub fn from_secrets(secrets: &shuttle_runtime::SecretStore) -> Self {
        Self::from_lookup(|key| secrets.get(key))
    }

    /// Build configuration from any key/value source. Invalid values are
    /// logged and replaced by their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_output_tokens = match non_empty("MAX_OUTPUT_TOKENS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(value) if value > MAX_OUTPUT_TOKENS_CEILING => {
                    tracing::warn!(
                        "⚠️  MAX_OUTPUT_TOKENS {} exceeds provider maximum, using {}",
                        value,
                        MAX_OUTPUT_TOKENS_CEILING
                    );
                    MAX_OUTPUT_TOKENS_CEILING
                }
                Ok(value) if value > 0 => value,
                _ => {
                    tracing::warn!("⚠️  Invalid MAX_OUTPUT_TOKENS '{}', using {}", raw, defaults.max_output_tokens);
                    defaults.max_output_tokens
                }
            },
            None => defaults.max_output_tokens,
        };

        let instruction_strategy = match non_empty("PERSONA_INSTRUCTION_MODE") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("⚠️  {} - using {}", e, defaults.instruction_strategy);
                defaults.instruction_strategy
            }),
            None => defaults.instruction_strategy,
        };

        let list_models_on_error = non_empty("LIST_MODELS_ON_ERROR")
            .map(|raw| parse_flag(&raw))
            .unwrap_or(defaults.list_models_on_error);

        Self {
            api_key: ApiKey::parse(lookup("GEMINI_API_KEY").as_deref()),
            model: non_empty("GEMINI_MODEL")
                .map(|m| m.trim().to_string())
                .unwrap_or(defaults.model),
            base_url: non_empty("GEMINI_BASE_URL")
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            max_output_tokens,
            instruction_strategy,
            list_models_on_error,
        }
    }

    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            max_output_tokens: self.max_output_tokens,
            instruction_strategy: self.instruction_strategy,
            list_models_on_error: self.list_models_on_error,
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
