//! LLM Provider Port
//!
//! Abstract interface for model invocations. The hosted provider is an
//! opaque collaborator; the chat relay only sees this trait.

use async_trait::async_trait;

use crate::domain::entities::Turn;
use crate::domain::errors::ProviderError;
use crate::domain::value_objects::ApiKey;

/// Default cap on generated tokens
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1000;

/// A fully assembled generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Model identifier (e.g. "gemini-2.0-flash")
    pub model: String,
    /// Instruction passed through the provider's dedicated parameter
    pub system_instruction: Option<String>,
    /// Ordered turns, ending with the new user message
    pub contents: Vec<Turn>,
    /// Maximum tokens to generate
    pub max_output_tokens: u32,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, contents: Vec<Turn>) -> Self {
        Self {
            model: model.into(),
            system_instruction: None,
            contents,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// Chat model provider interface
///
/// # Example
///
/// ```rust,ignore
/// use persona_chat::ports::ChatProvider;
///
/// struct GeminiProvider { /* ... */ }
///
/// #[async_trait]
/// impl ChatProvider for GeminiProvider {
///     async fn generate(&self, key: &ApiKey, request: &GenerationRequest)
///         -> Result<String, ProviderError> {
///         // Call generateContent
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Generate a complete (non-streaming) reply
    async fn generate(
        &self,
        key: &ApiKey,
        request: &GenerationRequest,
    ) -> Result<String, ProviderError>;

    /// List model identifiers available to this credential
    async fn list_models(&self, key: &ApiKey) -> Result<Vec<String>, ProviderError>;

    /// Provider name (e.g. "google")
    fn provider_name(&self) -> &str;
}
