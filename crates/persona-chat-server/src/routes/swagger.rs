//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{ChatErrorBody, ChatReply, ChatRequest, HistoryEntry, PersonaSummary, TextPart};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Chat endpoints
        super::chat::chat,
        // Persona endpoints
        super::persona::list_personas,
    ),
    info(
        title = "Persona Chat API",
        version = "0.1.0",
        description = "Persona chat relay\n\nMaps a persona mode to a hidden system instruction and relays the conversation to Gemini.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Chat", description = "Chat - Persona chat relay"),
        (name = "Persona", description = "Persona - Selectable chat characters"),
    ),
    components(
        schemas(
            // Chat
            ChatRequest,
            HistoryEntry,
            TextPart,
            ChatReply,
            ChatErrorBody,
            // Persona
            PersonaSummary,
        )
    ),
)]
pub struct ApiDoc;
