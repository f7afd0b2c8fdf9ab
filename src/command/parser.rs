//! Command line tokenizer.
//!
//! Tokens are matched in priority order: single-quoted spans, double-quoted
//! spans, flag-shaped tokens (`-x`, `--name`, `--name=value`), then plain
//! whitespace-delimited words.

use super::{CommandPart, CommandStructure, ParseError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"'([^']*)'|"([^"]*)"|(--?[A-Za-z0-9][^\s=]*(?:=\S*)?)|(\S+)"#)
        .expect("token pattern is a valid regex")
});

/// Commands whose second word is treated as a subcommand
pub const DEFAULT_SUBCOMMAND_COMMANDS: &[&str] = &[
    "git",
    "docker",
    "docker-compose",
    "podman",
    "kubectl",
    "helm",
    "npm",
    "yarn",
    "pnpm",
    "cargo",
    "go",
    "pip",
    "pip3",
    "apt",
    "apt-get",
    "brew",
    "dnf",
    "yum",
    "systemctl",
    "gh",
    "terraform",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Quoted(String),
    Flag(String),
    Word(String),
}

impl Token {
    fn into_text(self) -> String {
        match self {
            Token::Quoted(s) | Token::Flag(s) | Token::Word(s) => s,
        }
    }
}

/// Splits raw command lines into [`CommandStructure`]s
#[derive(Debug, Clone)]
pub struct CommandParser {
    subcommand_commands: HashSet<String>,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new(DEFAULT_SUBCOMMAND_COMMANDS.iter().copied())
    }
}

impl CommandParser {
    /// Create a parser that recognizes subcommands for the given base commands
    pub fn new<I, S>(subcommand_commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            subcommand_commands: subcommand_commands
                .into_iter()
                .map(|c| c.as_ref().trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    /// Whether `base_command` is expected to take a subcommand
    pub fn takes_subcommands(&self, base_command: &str) -> bool {
        self.subcommand_commands
            .contains(&base_command.to_lowercase())
    }

    /// Parse a raw command line
    pub fn parse(&self, raw: &str) -> Result<CommandStructure, ParseError> {
        if raw.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let mut tokens = tokenize(raw).into_iter();
        let base_command = tokens
            .next()
            .map(Token::into_text)
            .ok_or(ParseError::Empty)?;

        let mut rest: Vec<Token> = tokens.collect();
        let subcommand = if self.takes_subcommands(&base_command)
            && matches!(rest.first(), Some(Token::Word(_)))
        {
            Some(rest.remove(0).into_text())
        } else {
            None
        };

        let parts = rest
            .into_iter()
            .map(|token| match token {
                Token::Flag(f) => CommandPart::Flag(f),
                Token::Quoted(a) | Token::Word(a) => CommandPart::Argument(a),
            })
            .collect();

        CommandStructure::new(raw.trim(), base_command, subcommand, parts)
    }
}

fn tokenize(raw: &str) -> Vec<Token> {
    TOKEN_PATTERN
        .captures_iter(raw)
        .filter_map(|caps| {
            if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
                Some(Token::Quoted(m.as_str().to_string()))
            } else if let Some(m) = caps.get(3) {
                Some(Token::Flag(m.as_str().to_string()))
            } else {
                caps.get(4).map(|m| Token::Word(m.as_str().to_string()))
            }
        })
        .collect()
}

/// Whether a bare token has the shape of a flag
pub fn is_flag_shaped(token: &str) -> bool {
    let body = token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'));
    matches!(body.and_then(|b| b.chars().next()), Some(c) if c.is_ascii_alphanumeric())
}
