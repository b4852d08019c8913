//! InstructionStrategy - How a persona's system instruction reaches the model

use serde::{Deserialize, Serialize};

/// Text of the synthetic user turn that carries the instruction.
pub const SYNTHETIC_INSTRUCTION_PREFIX: &str = "System Instruction: ";

/// Text of the synthetic model turn acknowledging the instruction.
pub const SYNTHETIC_ACKNOWLEDGEMENT: &str = "Understood. I will act according to your instructions.";

/// Strategy for delivering the hidden system instruction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructionStrategy {
    /// Use the provider's dedicated system instruction parameter
    #[default]
    Native,
    /// Prepend a user/model turn pair ahead of the real history, for
    /// provider versions without system instruction support
    Synthetic,
}

impl std::fmt::Display for InstructionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstructionStrategy::Native => write!(f, "native"),
            InstructionStrategy::Synthetic => write!(f, "synthetic"),
        }
    }
}

impl std::str::FromStr for InstructionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "native" => Ok(InstructionStrategy::Native),
            "synthetic" => Ok(InstructionStrategy::Synthetic),
            _ => Err(format!("Unknown instruction strategy: {}", s)),
        }
    }
}
