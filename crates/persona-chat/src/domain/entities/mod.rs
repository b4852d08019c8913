//! Domain Entities
//!
//! - Persona: Selectable chat character with a hidden instruction
//! - Turn: One message of a conversation

mod persona;
mod turn;

pub use persona::*;
pub use turn::*;
