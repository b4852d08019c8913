//! Domain Services
//!
//! Stateless domain logic that does not belong to a single entity.

mod persona_registry;

pub use persona_registry::*;
