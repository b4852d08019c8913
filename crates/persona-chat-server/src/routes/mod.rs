//! Persona Chat API Routes
//!
//! - /api/chat - Relay a message to the model under a persona
//! - /api/personas - Public persona list

pub mod chat;
pub mod persona;
pub mod swagger;
