//! Persona Chat Domain Library
//!
//! Core domain types and interfaces for the persona chat relay.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Persona, Turn)
//!   - `value_objects/`: Immutable value types (Role, Theme, ApiKey, InstructionStrategy)
//!   - `services/`: Persona registry
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `services/`: Model provider interface
//!
//! # Usage
//!
//! ```rust,ignore
//! use persona_chat::{PersonaRegistry, Turn};
//!
//! let registry = PersonaRegistry::builtin();
//! let persona = registry.resolve("lover");
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    echoes_fragment, redact, ApiKey, ChatError, InstructionStrategy, Persona, PersonaRegistry,
    ProviderError, RegistryError, Role, Theme, Turn, DEFAULT_MODE, PLACEHOLDER_API_KEY,
    SYNTHETIC_ACKNOWLEDGEMENT, SYNTHETIC_INSTRUCTION_PREFIX, UNKNOWN_ERROR_MESSAGE,
};
pub use ports::{ChatProvider, GenerationRequest, DEFAULT_MAX_OUTPUT_TOKENS};
