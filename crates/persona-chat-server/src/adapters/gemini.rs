//! Gemini chat provider
//!
//! Calls the Generative Language API `generateContent` endpoint. The key is
//! sent in the `x-goog-api-key` header, never in the URL.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use persona_chat::{ApiKey, ChatProvider, GenerationRequest, ProviderError, Turn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// ChatProvider backed by Google Gemini
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("persona-chat/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    async fn generate(
        &self,
        key: &ApiKey,
        request: &GenerationRequest,
    ) -> Result<String, ProviderError> {
        let url = format!(
            "{}/models/{model}:generateContent",
            self.base_url,
            model = request.model
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, key.expose())
            .json(&GenerateContentRequest::from(request))
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, &body));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| ProviderError::Parse(err.without_url().to_string()))?;

        extract_reply(&payload).ok_or(ProviderError::EmptyResponse)
    }

    async fn list_models(&self, key: &ApiKey) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("pageSize", "1000")])
            .header(API_KEY_HEADER, key.expose())
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body));
        }

        let listing: ModelList = response
            .json()
            .await
            .map_err(|err| ProviderError::Parse(err.without_url().to_string()))?;

        Ok(listing.model_ids())
    }

    fn provider_name(&self) -> &str {
        "google"
    }
}

// ============================================
// Request/Response Types
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

impl From<&Turn> for Content {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role.as_str().to_string(),
            parts: vec![Part {
                text: turn.text.clone(),
            }],
        }
    }
}

impl From<&GenerationRequest> for GenerateContentRequest {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            contents: request.contents.iter().map(Content::from).collect(),
            system_instruction: request
                .system_instruction
                .as_ref()
                .map(|text| SystemInstruction {
                    parts: vec![Part { text: text.clone() }],
                }),
            generation_config: GenerationConfig {
                max_output_tokens: request.max_output_tokens,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
}

impl ModelList {
    /// "models/gemini-2.0-flash" → "gemini-2.0-flash"
    fn model_ids(self) -> Vec<String> {
        self.models
            .into_iter()
            .filter_map(|m| m.name.rsplit('/').next().map(|s| s.to_string()))
            .filter(|name| !name.is_empty())
            .collect()
    }
}

// ============================================
// Helper Functions
// ============================================

/// Concatenate the text parts of the first candidate
fn extract_reply(root: &Value) -> Option<String> {
    let parts = root
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn map_http_error(status: StatusCode, body: &str) -> ProviderError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|err| err.get("message"))
                .and_then(|msg| msg.as_str())
                .map(|msg| msg.to_string())
        })
        .unwrap_or_else(|| body.trim().to_string());

    let invalid_key = body.contains("API_KEY_INVALID")
        || message.contains("API key not valid")
        || message.contains("API key expired");

    if invalid_key || status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return ProviderError::InvalidCredential(message);
    }

    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::QuotaExceeded(message),
        StatusCode::NOT_FOUND => ProviderError::ModelNotFound(message),
        _ => ProviderError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::HeaderMap, routing::get, routing::post, Json, Router};
    use serde_json::json;

    #[test]
    fn test_request_body_with_native_instruction() {
        let request = GenerationRequest::new("gemini-2.0-flash", vec![Turn::user("Hi")])
            .with_system_instruction("Be nice")
            .with_max_output_tokens(1000);

        let body = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "Hi"}]}],
                "systemInstruction": {"parts": [{"text": "Be nice"}]},
                "generationConfig": {"maxOutputTokens": 1000}
            })
        );
    }

    #[test]
    fn test_request_body_without_instruction_omits_field() {
        let request = GenerationRequest::new(
            "m",
            vec![Turn::user("a"), Turn::model("b"), Turn::user("c")],
        );
        let body = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();
        assert!(body.get("systemInstruction").is_none());
        assert_eq!(body["contents"][1]["role"], "model");
    }

    #[test]
    fn test_extract_reply_joins_parts() {
        let payload = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello"}, {"text": " there\n"}]}
            }]
        });
        assert_eq!(extract_reply(&payload).as_deref(), Some("Hello there\n"));
    }

    #[test]
    fn test_extract_reply_keeps_indentation() {
        let payload = json!({
            "candidates": [{"content": {"parts": [{"text": "    fn main() {}\n"}]}}]
        });
        assert_eq!(extract_reply(&payload).as_deref(), Some("    fn main() {}\n"));
    }

    #[test]
    fn test_extract_reply_none_when_blocked() {
        let payload = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        assert!(extract_reply(&payload).is_none());

        let empty = json!({"candidates": [{"content": {"parts": [{"text": "  "}]}}]});
        assert!(extract_reply(&empty).is_none());
    }

    #[test]
    fn test_invalid_key_detected_from_body() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#;
        assert!(matches!(
            map_http_error(StatusCode::BAD_REQUEST, body),
            ProviderError::InvalidCredential(_)
        ));
    }

    #[test]
    fn test_status_classification() {
        let body = r#"{"error":{"message":"boom"}}"#;
        assert_eq!(
            map_http_error(StatusCode::TOO_MANY_REQUESTS, body),
            ProviderError::QuotaExceeded("boom".into())
        );
        assert_eq!(
            map_http_error(StatusCode::NOT_FOUND, body),
            ProviderError::ModelNotFound("boom".into())
        );
        assert_eq!(
            map_http_error(StatusCode::FORBIDDEN, body),
            ProviderError::InvalidCredential("boom".into())
        );
        assert_eq!(
            map_http_error(StatusCode::BAD_GATEWAY, "not json"),
            ProviderError::Api {
                status: 502,
                message: "not json".into()
            }
        );
    }

    #[test]
    fn test_model_ids_strip_prefix() {
        let list: ModelList = serde_json::from_value(json!({
            "models": [{"name": "models/gemini-2.0-flash"}, {"name": "gemini-pro"}]
        }))
        .unwrap();
        assert_eq!(list.model_ids(), vec!["gemini-2.0-flash", "gemini-pro"]);

        let empty: ModelList = serde_json::from_value(json!({})).unwrap();
        assert!(empty.model_ids().is_empty());
    }

    async fn spawn_fake_gemini() -> String {
        async fn generate(
            Path(model): Path<String>,
            headers: HeaderMap,
            Json(body): Json<Value>,
        ) -> Json<Value> {
            let key = headers
                .get(API_KEY_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let last = body["contents"]
                .as_array()
                .and_then(|c| c.last())
                .and_then(|c| c["parts"][0]["text"].as_str())
                .unwrap_or_default()
                .to_string();
            Json(json!({
                "candidates": [{"content": {"parts": [{"text": format!("{model}|{key}|{last}")}]}}]
            }))
        }

        async fn models() -> Json<Value> {
            Json(json!({"models": [{"name": "models/gemini-2.0-flash"}]}))
        }

        let app = Router::new()
            .route("/v1beta/models/:model", post(generate))
            .route("/v1beta/models", get(models));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/v1beta", addr)
    }

    #[tokio::test]
    async fn test_generate_against_local_server() {
        let base_url = spawn_fake_gemini().await;
        let provider = GeminiProvider::new(&base_url).unwrap();
        let key = ApiKey::parse(Some("test-key")).unwrap();
        let request = GenerationRequest::new("gemini-2.0-flash", vec![Turn::user("Hi")]);

        let reply = provider.generate(&key, &request).await.unwrap();
        assert_eq!(reply, "gemini-2.0-flash:generateContent|test-key|Hi");

        let models = provider.list_models(&key).await.unwrap();
        assert_eq!(models, vec!["gemini-2.0-flash"]);
    }

    #[tokio::test]
    async fn test_transport_error_is_classified() {
        // Port 9 (discard) is not served locally
        let provider = GeminiProvider::new("http://127.0.0.1:9/v1beta").unwrap();
        let key = ApiKey::parse(Some("test-key")).unwrap();
        let request = GenerationRequest::new("m", vec![Turn::user("Hi")]);

        let err = provider.generate(&key, &request).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
        assert!(!err.to_string().contains("test-key"));
    }
}
