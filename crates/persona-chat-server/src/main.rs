use axum::{routing::get, Json, Router};
use persona_chat::{ChatProvider, PersonaRegistry};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod config;
mod models;
mod routes;
#[cfg(test)]
mod testing;

use adapters::GeminiProvider;
use application::ChatRelay;
use config::AppConfig;

/// Chat relay with the provider chosen at startup
pub type AppChatRelay = ChatRelay<dyn ChatProvider>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<AppChatRelay>,
    pub registry: Arc<PersonaRegistry>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Persona Chat API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("💬 Persona Chat API initializing...");

    let config = AppConfig::from_secrets(&secrets);

    if config.api_key.is_some() {
        tracing::info!("🔐 Gemini API key configured (model: {})", config.model);
    } else {
        tracing::warn!("⚠️  No GEMINI_API_KEY set - chat requests will return a configuration error");
    }
    tracing::info!(
        "🎭 Persona instructions delivered via {} strategy (max {} output tokens)",
        config.instruction_strategy,
        config.max_output_tokens
    );
    if config.list_models_on_error {
        tracing::info!("🔍 Model listing diagnostics enabled on provider errors");
    }

    let provider: Arc<dyn ChatProvider> = Arc::new(GeminiProvider::new(&config.base_url)?);
    let registry = Arc::new(PersonaRegistry::builtin());
    let relay = Arc::new(ChatRelay::new(
        provider,
        registry.clone(),
        config.relay_config(),
    ));

    let state = AppState { relay, registry };

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(routes::chat::router())
        .merge(routes::persona::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Persona Chat API ready");

    Ok(router.into())
}
