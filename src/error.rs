//! Crate-level error type.
//!
//! The engine itself never returns these: expected failures become a
//! [`Suggestion`](crate::suggestion::Suggestion). They surface from setup
//! code (configuration, client construction) and the binary.

use thiserror::Error;

/// Main error type that encompasses all possible errors in the system
#[derive(Debug, Error)]
pub enum ShellSenseError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::command::ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("AI service error: {0}")]
    AI(#[from] crate::ai::AIError),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

/// Result type alias for crate operations
pub type ShellSenseResult<T> = Result<T, ShellSenseError>;

impl ShellSenseError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether retrying the same operation could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            ShellSenseError::AI(e) => e.is_retryable(),
            ShellSenseError::IO(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AIError;
    use crate::command::ParseError;

    #[test]
    fn test_conversions() {
        let err: ShellSenseError = ParseError::Empty.into();
        assert_eq!(err.to_string(), "Parse error: Command cannot be empty");

        let err: ShellSenseError = AIError::Timeout(30_000).into();
        assert!(err.is_recoverable());

        let err: ShellSenseError = AIError::ModelNotFound("llama3.2".to_string()).into();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_invalid_input() {
        let err = ShellSenseError::invalid_input("no command given");
        assert_eq!(err.to_string(), "Invalid input: no command given");
        assert!(!err.is_recoverable());
    }
}
