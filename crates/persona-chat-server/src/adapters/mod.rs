//! Infrastructure Adapters
//!
//! Implementations of the domain ports.

pub mod gemini;

pub use gemini::GeminiProvider;
