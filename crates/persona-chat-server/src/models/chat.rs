//! Chat request/response bodies

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use persona_chat::{Role, Turn};

/// One `{text}` part of a history entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TextPart {
    pub text: String,
}

/// History entry in the provider's `{role, parts}` shape
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    #[schema(value_type = String, example = "user")]
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<TextPart>,
}

/// Chat request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
    /// Prior turns, oldest first. Defaults to empty.
    #[serde(default)]
    pub history: Option<Vec<HistoryEntry>>,
    /// Persona id. Unknown or missing modes use the default persona.
    #[serde(default)]
    pub mode: Option<String>,
}

/// Successful chat response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatReply {
    pub text: String,
}

/// Failed chat response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatErrorBody {
    pub error: String,
}

impl From<HistoryEntry> for Turn {
    fn from(entry: HistoryEntry) -> Self {
        let text = entry
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");
        Turn::new(entry.role, text)
    }
}

impl ChatRequest {
    pub fn turns(&mut self) -> Vec<Turn> {
        self.history
            .take()
            .unwrap_or_default()
            .into_iter()
            .map(Turn::from)
            .collect()
    }

    pub fn mode(&self) -> &str {
        self.mode.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_request() {
        let mut request: ChatRequest = serde_json::from_str(
            r#"{"message":"Hi","history":[{"role":"user","parts":[{"text":"a"},{"text":"b"}]},{"role":"model","parts":[{"text":"c"}]}],"mode":"lover"}"#,
        )
        .unwrap();

        assert_eq!(request.mode(), "lover");
        assert_eq!(request.turns(), vec![Turn::user("ab"), Turn::model("c")]);
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let mut request: ChatRequest =
            serde_json::from_str(r#"{"message":"Hi","history":null,"mode":null}"#).unwrap();
        assert_eq!(request.mode(), "");
        assert!(request.turns().is_empty());

        let mut bare: ChatRequest = serde_json::from_str(r#"{"message":"Hi"}"#).unwrap();
        assert!(bare.turns().is_empty());
    }

    #[test]
    fn test_rejects_unknown_role() {
        let result = serde_json::from_str::<ChatRequest>(
            r#"{"message":"Hi","history":[{"role":"system","parts":[{"text":"x"}]}]}"#,
        );
        assert!(result.is_err());
    }
}
