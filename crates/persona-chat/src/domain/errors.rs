//! Domain Errors
//!
//! Error types for chat operations.

use thiserror::Error;

/// Generic message used when provider text cannot be shown
pub const UNKNOWN_ERROR_MESSAGE: &str = "서버 에러: 알 수 없는 오류";

/// Failure reported by a model provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Invalid API credential: {0}")]
    InvalidCredential(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Provider returned no text")]
    EmptyResponse,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl ProviderError {
    /// Message suitable for showing to the end user
    pub fn user_message(&self, model: &str) -> String {
        match self {
            ProviderError::InvalidCredential(_) => {
                "인증 오류: API 키가 유효하지 않습니다. 서버 설정을 확인해주세요.".to_string()
            }
            ProviderError::ModelNotFound(_) => {
                format!("서버 에러: 모델을 찾을 수 없습니다 ({}).", model)
            }
            ProviderError::QuotaExceeded(_) => {
                "요청 한도를 초과했습니다. 잠시 후 다시 시도해주세요.".to_string()
            }
            ProviderError::Transport(_) => {
                "서버 에러: AI 서비스에 연결할 수 없습니다.".to_string()
            }
            ProviderError::EmptyResponse => {
                "서버 에러: AI가 응답을 생성하지 못했습니다.".to_string()
            }
            ProviderError::Parse(message) | ProviderError::Api { message, .. } => {
                if message.trim().is_empty() {
                    UNKNOWN_ERROR_MESSAGE.to_string()
                } else {
                    format!("서버 에러: {}", message)
                }
            }
        }
    }
}

/// Errors returned by the chat relay
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// Credential missing or still the placeholder; nothing was sent upstream
    #[error("인증 설정 오류: 서버 환경 변수에 API 키를 등록해주세요.")]
    Configuration,

    /// Upstream call failed. `message` is already safe to show to users.
    #[error("{message}")]
    Provider { message: String },
}

/// Errors building a persona registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Registry must contain at least one persona")]
    Empty,

    #[error("Duplicate persona id: {0}")]
    DuplicateId(String),

    #[error("Default persona not registered: {0}")]
    UnknownDefault(String),
}

/// Replace every occurrence of each secret with a mask
pub fn redact(text: &str, secrets: &[&str]) -> String {
    secrets
        .iter()
        .filter(|secret| !secret.is_empty())
        .fold(text.to_string(), |acc, secret| acc.replace(secret, "[REDACTED]"))
}

/// True when `text` contains any run of at least `min_chars` characters
/// taken from `secret` (or all of `secret` when it is shorter)
pub fn echoes_fragment(text: &str, secret: &str, min_chars: usize) -> bool {
    if secret.is_empty() || min_chars == 0 {
        return false;
    }

    let boundaries: Vec<usize> = secret
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(secret.len()))
        .collect();
    let char_count = boundaries.len() - 1;

    if char_count <= min_chars {
        return text.contains(secret);
    }

    (0..=char_count - min_chars)
        .any(|start| text.contains(&secret[boundaries[start]..boundaries[start + min_chars]]))
}
