//! The single output type of the correction engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict produced for one command line or task description.
///
/// Exactly one kind is ever populated; a suggestion is never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Suggestion {
    /// The command needs no change
    Valid { original: String },
    /// A corrected command line with a human-readable reason
    Correction {
        original: String,
        corrected: String,
        explanation: String,
    },
    /// A command generated from a natural-language task
    SmartCommand {
        task_description: String,
        generated_command: String,
    },
    /// The input could not be handled
    Error { message: String },
}

impl Suggestion {
    pub fn valid(original: impl Into<String>) -> Self {
        Self::Valid {
            original: original.into(),
        }
    }

    pub fn correction(
        original: impl Into<String>,
        corrected: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self::Correction {
            original: original.into(),
            corrected: corrected.into(),
            explanation: explanation.into(),
        }
    }

    pub fn smart_command(
        task_description: impl Into<String>,
        generated_command: impl Into<String>,
    ) -> Self {
        Self::SmartCommand {
            task_description: task_description.into(),
            generated_command: generated_command.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    pub fn is_correction(&self) -> bool {
        matches!(self, Self::Correction { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// The command line the user should run, if this suggestion proposes one
    pub fn suggested_command(&self) -> Option<&str> {
        match self {
            Self::Correction { corrected, .. } => Some(corrected),
            Self::SmartCommand {
                generated_command, ..
            } => Some(generated_command),
            _ => None,
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid { original } => write!(f, "'{}' looks good", original),
            Self::Correction {
                corrected,
                explanation,
                ..
            } => write!(f, "{} ({})", corrected, explanation),
            Self::SmartCommand {
                generated_command, ..
            } => write!(f, "{}", generated_command),
            Self::Error { message } => write!(f, "error: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_command_by_kind() {
        assert_eq!(Suggestion::valid("ls").suggested_command(), None);
        assert_eq!(
            Suggestion::correction("gti", "git", "typo").suggested_command(),
            Some("git")
        );
        assert_eq!(
            Suggestion::smart_command("list files", "ls -la").suggested_command(),
            Some("ls -la")
        );
        assert_eq!(Suggestion::error("boom").suggested_command(), None);
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let json = serde_json::to_value(Suggestion::correction("gti st", "git st", "typo")).unwrap();
        assert_eq!(json["type"], "CORRECTION");
        assert_eq!(json["corrected"], "git st");

        let json = serde_json::to_value(Suggestion::valid("ls")).unwrap();
        assert_eq!(json["type"], "VALID");
    }
}
