//! Persona Registry - Static mode → persona lookup
//!
//! Read-only after construction, so a single registry can be shared by
//! every request handler.

use std::collections::HashSet;

use crate::domain::entities::Persona;
use crate::domain::errors::RegistryError;
use crate::domain::value_objects::Theme;

/// Mode used when the client sends nothing or something unknown
pub const DEFAULT_MODE: &str = "friend";

const FRIEND_INSTRUCTION: &str = "You are the user's close friend. \
Talk casually and cheerfully, like texting someone you have known for years. \
Keep replies short, warm and upbeat, use light humor, and ask follow-up questions \
about their day. Never mention that you are an AI unless asked directly. \
Always reply in the language the user writes in.";

const LOVER_INSTRUCTION: &str = "You are the user's affectionate partner. \
Speak warmly and tenderly, show genuine care for their feelings, remember what \
they shared earlier in the conversation and gently encourage them. \
Keep the tone sweet but respectful and never explicit. \
Always reply in the language the user writes in.";

const ASSISTANT_INSTRUCTION: &str = "You are a professional personal assistant. \
Answer precisely and concisely, structure longer answers with short lists, \
state assumptions when a request is ambiguous and avoid small talk. \
Always reply in the language the user writes in.";

const BUILTIN_PERSONAS: [Persona; 3] = [
    Persona::new(
        "friend",
        "Friend",
        "Cheerful & Casual",
        Theme::Blue,
        FRIEND_INSTRUCTION,
    ),
    Persona::new(
        "lover",
        "Lover",
        "Warm & Loving",
        Theme::Pink,
        LOVER_INSTRUCTION,
    ),
    Persona::new(
        "assistant",
        "Assistant",
        "Professional",
        Theme::Slate,
        ASSISTANT_INSTRUCTION,
    ),
];

/// Registry of selectable personas
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    personas: Vec<Persona>,
    default_index: usize,
}

impl PersonaRegistry {
    /// Build a registry, checking ids are unique and the default exists
    pub fn new(personas: Vec<Persona>, default_id: &str) -> Result<Self, RegistryError> {
        if personas.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::new();
        for persona in &personas {
            if !seen.insert(persona.id) {
                return Err(RegistryError::DuplicateId(persona.id.to_string()));
            }
        }

        let default_index = personas
            .iter()
            .position(|p| p.id == default_id)
            .ok_or_else(|| RegistryError::UnknownDefault(default_id.to_string()))?;

        Ok(Self {
            personas,
            default_index,
        })
    }

    /// The personas shipped with the application, defaulting to `friend`
    pub fn builtin() -> Self {
        Self {
            personas: BUILTIN_PERSONAS.to_vec(),
            default_index: 0,
        }
    }

    /// Resolve a client mode. Unknown or empty modes yield the default persona.
    pub fn resolve(&self, mode: &str) -> &Persona {
        self.get(mode).unwrap_or_else(|| self.default_persona())
    }

    pub fn get(&self, id: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == id)
    }

    pub fn default_persona(&self) -> &Persona {
        &self.personas[self.default_index]
    }

    /// All personas in registration order
    pub fn all(&self) -> &[Persona] {
        &self.personas
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
