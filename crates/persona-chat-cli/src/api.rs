//! Persona Chat API Client

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::session::Role;

/// Transcript text used when the server could not be reached at all
pub const UNREACHABLE_MESSAGE: &str = "Error: Could not connect to the AI. Please try again.";

/// API Client for the chat relay
pub struct ChatApiClient {
    client: Client,
    base_url: String,
}

// ============================================
// API Request/Response Types
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPart {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<HistoryEntry>,
    pub mode: String,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ChatErrorBody {
    error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonaSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub theme: String,
}

/// Why a chat request produced no reply
#[derive(Debug)]
pub enum ChatFailure {
    /// The server answered with an `{error}` body
    Rejected(String),
    /// No usable answer from the server
    Unreachable(anyhow::Error),
}

impl ChatFailure {
    /// Text appended to the transcript as a model turn
    pub fn transcript_text(&self) -> String {
        match self {
            ChatFailure::Rejected(message) => format!("Error: {}", message),
            ChatFailure::Unreachable(_) => UNREACHABLE_MESSAGE.to_string(),
        }
    }
}

/// Chat endpoint seam, so the session controller can run against a double
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn send_chat(&self, request: &ChatRequest) -> Result<String, ChatFailure>;
}

impl ChatApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// List selectable personas
    pub async fn list_personas(&self) -> Result<Vec<PersonaSummary>> {
        let url = format!("{}/api/personas", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to connect to Persona Chat API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        let personas: Vec<PersonaSummary> =
            resp.json().await.context("Failed to parse response")?;

        Ok(personas)
    }
}

#[async_trait]
impl ChatApi for ChatApiClient {
    async fn send_chat(&self, request: &ChatRequest) -> Result<String, ChatFailure> {
        let url = format!("{}/api/chat", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ChatFailure::Unreachable(e.into()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ChatFailure::Unreachable(e.into()))?;

        parse_chat_body(status.is_success(), &body)
    }
}

fn parse_chat_body(success: bool, body: &str) -> Result<String, ChatFailure> {
    if let Ok(error) = serde_json::from_str::<ChatErrorBody>(body) {
        return Err(ChatFailure::Rejected(error.error));
    }

    if success {
        if let Ok(reply) = serde_json::from_str::<ChatReply>(body) {
            return Ok(reply.text);
        }
    }

    Err(ChatFailure::Unreachable(anyhow::anyhow!(
        "Unexpected response: {}",
        body
    )))
}
