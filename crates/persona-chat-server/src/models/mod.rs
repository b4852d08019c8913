//! API Data Models
//!
//! - Chat: relay request/response bodies
//! - Persona: public persona summaries

mod chat;
mod persona;

pub use chat::*;
pub use persona::*;
