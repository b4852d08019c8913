//! Persona - A selectable chat character
//!
//! Pure domain entity. Personas are defined at process start and never
//! change afterwards.

use crate::domain::value_objects::Theme;

/// Persona - id, presentation and the hidden system instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub id: &'static str,
    pub name: &'static str,
    pub tagline: &'static str,
    pub theme: Theme,
    system_instruction: &'static str,
}

impl Persona {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        tagline: &'static str,
        theme: Theme,
        system_instruction: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            tagline,
            theme,
            system_instruction,
        }
    }

    /// The instruction steering the model. Server-side only.
    pub fn system_instruction(&self) -> &'static str {
        self.system_instruction
    }
}
