//! Chat Relay Application Service (Use Case)
//!
//! Resolves the persona for a mode, assembles the provider request and turns
//! provider failures into messages that are safe to show to end users.

use std::sync::Arc;

use persona_chat::{
    echoes_fragment, redact, ApiKey, ChatError, ChatProvider, GenerationRequest,
    InstructionStrategy, Persona, PersonaRegistry, Turn, DEFAULT_MAX_OUTPUT_TOKENS,
    SYNTHETIC_ACKNOWLEDGEMENT, SYNTHETIC_INSTRUCTION_PREFIX, UNKNOWN_ERROR_MESSAGE,
};

use crate::adapters::gemini::DEFAULT_MODEL;

/// Shortest run of instruction text treated as leaked in an error message
const INSTRUCTION_FRAGMENT_CHARS: usize = 20;

/// Relay settings, built once at startup
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_key: Option<ApiKey>,
    pub model: String,
    pub max_output_tokens: u32,
    pub instruction_strategy: InstructionStrategy,
    pub list_models_on_error: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            instruction_strategy: InstructionStrategy::Native,
            list_models_on_error: false,
        }
    }
}

/// Application service relaying chat messages to the model provider
pub struct ChatRelay<P: ChatProvider + ?Sized> {
    provider: Arc<P>,
    registry: Arc<PersonaRegistry>,
    config: RelayConfig,
}

impl<P: ChatProvider + ?Sized> ChatRelay<P> {
    pub fn new(provider: Arc<P>, registry: Arc<PersonaRegistry>, config: RelayConfig) -> Self {
        Self {
            provider,
            registry,
            config,
        }
    }

    /// Send `message` with its prior `history` under the persona for `mode`
    pub async fn handle_chat(
        &self,
        message: &str,
        history: &[Turn],
        mode: &str,
    ) -> Result<String, ChatError> {
        let Some(key) = self.config.api_key.as_ref() else {
            tracing::warn!("Chat rejected: no usable GEMINI_API_KEY configured");
            return Err(ChatError::Configuration);
        };

        let persona = self.registry.resolve(mode);
        let request = self.build_request(persona, message, history);

        tracing::info!(
            persona = persona.id,
            history_len = history.len(),
            model = %request.model,
            provider = self.provider.provider_name(),
            "Relaying chat message"
        );

        match self.provider.generate(key, &request).await {
            Ok(text) => Ok(text),
            Err(err) => {
                let secrets = [key.expose(), persona.system_instruction()];
                tracing::error!(
                    persona = persona.id,
                    error = %redact(&err.to_string(), &secrets),
                    "Chat API error"
                );

                let mut user_message = err.user_message(&self.config.model);
                if echoes_fragment(
                    &user_message,
                    persona.system_instruction(),
                    INSTRUCTION_FRAGMENT_CHARS,
                ) {
                    user_message = UNKNOWN_ERROR_MESSAGE.to_string();
                }
                if self.config.list_models_on_error {
                    user_message.push_str(&self.model_diagnostics(key).await);
                }

                Err(ChatError::Provider {
                    message: redact(&user_message, &secrets),
                })
            }
        }
    }

    /// Assemble the provider request for a persona
    pub fn build_request(
        &self,
        persona: &Persona,
        message: &str,
        history: &[Turn],
    ) -> GenerationRequest {
        let instruction = persona.system_instruction();
        let mut contents = Vec::with_capacity(history.len() + 3);

        if self.config.instruction_strategy == InstructionStrategy::Synthetic {
            contents.push(Turn::user(format!(
                "{}{}",
                SYNTHETIC_INSTRUCTION_PREFIX, instruction
            )));
            contents.push(Turn::model(SYNTHETIC_ACKNOWLEDGEMENT));
        }
        contents.extend(history.iter().cloned());
        contents.push(Turn::user(message));

        let request = GenerationRequest::new(self.config.model.clone(), contents)
            .with_max_output_tokens(self.config.max_output_tokens);

        match self.config.instruction_strategy {
            InstructionStrategy::Native => request.with_system_instruction(instruction),
            InstructionStrategy::Synthetic => request,
        }
    }

    /// Best-effort list of available models. Never fails.
    async fn model_diagnostics(&self, key: &ApiKey) -> String {
        match self.provider.list_models(key).await {
            Ok(models) if models.is_empty() => "\n(Available models: None found)".to_string(),
            Ok(models) => format!("\n(Available models: {})", models.join(", ")),
            Err(err) => {
                tracing::debug!("Model listing failed: {}", err);
                "\n(Could not list models)".to_string()
            }
        }
    }
}
