//! Task value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A natural-language task handed to the orchestrator (Value Object)
///
/// The instruction is set once and never mutated for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Task {
    instruction: String,
}

impl Task {
    /// Create a task, rejecting empty or whitespace-only instructions
    pub fn try_new(instruction: impl Into<String>) -> Result<Self, DomainError> {
        let instruction = instruction.into();
        if instruction.trim().is_empty() {
            return Err(DomainError::InvalidTask(
                "task instruction cannot be empty".to_string(),
            ));
        }
        Ok(Self { instruction })
    }

    /// Get the instruction text
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Consume and return the inner instruction
    pub fn into_instruction(self) -> String {
        self.instruction
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.instruction)
    }
}

impl TryFrom<&str> for Task {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Task::try_new(s)
    }
}

impl TryFrom<String> for Task {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Task::try_new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let task = Task::try_new("Write a hello world function").unwrap();
        assert_eq!(task.instruction(), "Write a hello world function");
    }

    #[test]
    fn test_empty_task_rejected() {
        assert!(Task::try_new("").is_err());
        assert!(Task::try_new("   \n\t").is_err());
    }

    #[test]
    fn test_task_keeps_surrounding_whitespace() {
        let task = Task::try_from("  padded  ").unwrap();
        assert_eq!(task.to_string(), "  padded  ");
    }
}
