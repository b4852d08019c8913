//! Value Objects
//!
//! Immutable value types without identity.

mod api_key;
mod instruction_strategy;
mod role;
mod theme;

pub use api_key::*;
pub use instruction_strategy::*;
pub use role::*;
pub use theme::*;
