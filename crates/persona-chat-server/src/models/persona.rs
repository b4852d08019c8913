//! Public persona view
//!
//! The only persona representation serialized to clients. It has no field
//! for the system instruction.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use persona_chat::Persona;

/// Persona summary
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PersonaSummary {
    pub id: String,
    pub name: String,
    pub tagline: String,
    #[schema(example = "blue")]
    pub theme: String,
}

impl From<&Persona> for PersonaSummary {
    fn from(persona: &Persona) -> Self {
        Self {
            id: persona.id.to_string(),
            name: persona.name.to_string(),
            tagline: persona.tagline.to_string(),
            theme: persona.theme.to_string(),
        }
    }
}
