//! Persona Routes - Public persona listing

use axum::{extract::State, routing::get, Json, Router};

use crate::models::PersonaSummary;
use crate::AppState;

/// List selectable personas
#[utoipa::path(
    get,
    path = "/api/personas",
    responses(
        (status = 200, description = "Personas in display order", body = Vec<PersonaSummary>)
    ),
    tag = "Persona"
)]
pub async fn list_personas(State(state): State<AppState>) -> Json<Vec<PersonaSummary>> {
    Json(
        state
            .registry
            .all()
            .iter()
            .map(PersonaSummary::from)
            .collect(),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/personas", get(list_personas))
}
