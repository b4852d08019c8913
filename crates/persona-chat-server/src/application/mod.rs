//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! the persona registry and external services.

mod chat_relay;

pub use chat_relay::{ChatRelay, RelayConfig};
