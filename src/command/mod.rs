//! Structural model of a single shell command line.
//!
//! A [`CommandStructure`] is produced once per request by the
//! [`CommandParser`] and never mutated afterwards. Corrections build new
//! instances through the `with_*` methods.

pub mod parser;

pub use parser::{CommandParser, DEFAULT_SUBCOMMAND_COMMANDS};

use std::fmt;

/// Errors raised while tokenizing a command line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Command cannot be empty")]
    Empty,

    #[error("Command has no base command: {0}")]
    MissingBase(String),
}

/// A token following the base command (and subcommand, if any)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandPart {
    Flag(String),
    Argument(String),
}

impl CommandPart {
    pub fn as_str(&self) -> &str {
        match self {
            CommandPart::Flag(s) | CommandPart::Argument(s) => s,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, CommandPart::Flag(_))
    }
}

/// Parsed command line: base command, optional subcommand, then flags and
/// positional arguments in their original interleaved order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStructure {
    raw: String,
    base_command: String,
    subcommand: Option<String>,
    parts: Vec<CommandPart>,
}

impl CommandStructure {
    /// Build a structure, rejecting an empty base command
    pub fn new(
        raw: impl Into<String>,
        base_command: impl Into<String>,
        subcommand: Option<String>,
        parts: Vec<CommandPart>,
    ) -> Result<Self, ParseError> {
        let raw = raw.into();
        let base_command = base_command.into();
        if base_command.trim().is_empty() {
            return Err(ParseError::MissingBase(raw));
        }

        Ok(Self {
            raw,
            base_command,
            subcommand: subcommand.filter(|s| !s.is_empty()),
            parts,
        })
    }

    /// The input this structure was parsed from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn base_command(&self) -> &str {
        &self.base_command
    }

    pub fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    pub fn parts(&self) -> &[CommandPart] {
        &self.parts
    }

    /// Flag tokens in insertion order, duplicates included
    pub fn flags(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                CommandPart::Flag(f) => Some(f.as_str()),
                CommandPart::Argument(_) => None,
            })
            .collect()
    }

    /// Positional arguments in insertion order, duplicates included
    pub fn arguments(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                CommandPart::Argument(a) => Some(a.as_str()),
                CommandPart::Flag(_) => None,
            })
            .collect()
    }

    /// Subcommand and parts as plain tokens
    pub fn tokens_after_base(&self) -> impl Iterator<Item = &str> {
        self.subcommand
            .as_deref()
            .into_iter()
            .chain(self.parts.iter().map(CommandPart::as_str))
    }

    /// Rebuild a command line. Words that are empty or contain whitespace
    /// are re-wrapped in single quotes.
    pub fn to_command_line(&self) -> String {
        let mut words: Vec<String> = Vec::with_capacity(self.parts.len() + 2);
        words.push(quote_argument(&self.base_command));
        if let Some(sub) = &self.subcommand {
            words.push(quote_argument(sub));
        }
        for part in &self.parts {
            match part {
                CommandPart::Flag(f) => words.push(f.clone()),
                CommandPart::Argument(a) => words.push(quote_argument(a)),
            }
        }
        words.join(" ")
    }

    /// Copy with a different base command
    pub fn with_base_command(&self, base_command: impl Into<String>) -> Self {
        self.rebuilt(|s| s.base_command = base_command.into())
    }

    /// Copy with a different subcommand
    pub fn with_subcommand(&self, subcommand: impl Into<String>) -> Self {
        self.rebuilt(|s| s.subcommand = Some(subcommand.into()))
    }

    /// Copy with the part at `index` replaced by the flag `flag`
    pub fn with_flag_replaced(&self, index: usize, flag: impl Into<String>) -> Self {
        self.rebuilt(|s| {
            if let Some(part) = s.parts.get_mut(index) {
                *part = CommandPart::Flag(flag.into());
            }
        })
    }

    /// Copy whose subcommand slot matches whether the base command takes
    /// one. A leading single-word argument is promoted into the slot, or an
    /// existing subcommand moves back to the front of the parts.
    pub fn with_subcommand_layout(&self, takes_subcommand: bool) -> Self {
        self.rebuilt(|s| {
            if !takes_subcommand {
                if let Some(sub) = s.subcommand.take() {
                    s.parts.insert(0, CommandPart::Argument(sub));
                }
                return;
            }

            let promotable = s.subcommand.is_none()
                && matches!(
                    s.parts.first(),
                    Some(CommandPart::Argument(a)) if !a.is_empty() && !a.chars().any(char::is_whitespace)
                );
            if promotable {
                if let CommandPart::Argument(sub) = s.parts.remove(0) {
                    s.subcommand = Some(sub);
                }
            }
        })
    }

    fn rebuilt<F>(&self, edit: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut next = self.clone();
        edit(&mut next);
        next.raw = next.to_command_line();
        next
    }
}

impl fmt::Display for CommandStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_command_line())
    }
}

fn quote_argument(arg: &str) -> String {
    if arg.is_empty() || arg.chars().any(char::is_whitespace) {
        shell_words::quote(arg).into_owned()
    } else {
        arg.to_string()
    }
}
