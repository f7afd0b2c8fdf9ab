//! shellsense - catch typos in shell commands before they run
//!
//! Checks a command line against known command metadata and, when that is
//! not enough, asks a local Ollama model. Degrades to a static table when
//! the model is unreachable.

// External crate imports
use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

// Internal imports
use shellsense::ai::{AiValidationClient, OllamaClient, OllamaConfig};
use shellsense::{CommandEngine, ConfigManager, ShellSenseError, ShellSenseResult, Suggestion};

/// shellsense - shell command typo correction CLI
#[derive(Parser)]
#[command(name = "shellsense")]
#[command(about = "Detects typos in shell commands and suggests corrections")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); defaults to the config value
    #[arg(short, long)]
    log_level: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Check a command line for typos
    Check {
        /// The command to check, e.g. `shellsense check -- docker sp -a`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },

    /// Generate a command from a natural-language task description
    Generate {
        /// What the command should do
        #[arg(trailing_var_arg = true, required = true)]
        task: Vec<String>,
    },

    /// Show AI service health and circuit breaker state
    Status,

    /// Manage the configuration file
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Reset to default configuration
        #[arg(long)]
        reset: bool,

        /// Export configuration to JSON
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

/// Main application state
struct ShellSense {
    config_manager: ConfigManager,
    engine: CommandEngine,
    json: bool,
}

impl ShellSense {
    fn new(config_manager: ConfigManager, json: bool) -> ShellSenseResult<Self> {
        let config = config_manager.config();
        let ollama = OllamaClient::new(OllamaConfig::from(&config.ai))?;
        let client = AiValidationClient::from_config(Arc::new(ollama), &config.ai);
        let engine = CommandEngine::from_config(config, client);
        debug!("Engine ready: {:?}", engine);

        Ok(Self {
            config_manager,
            engine,
            json,
        })
    }

    async fn check(&self, words: Vec<String>) -> ShellSenseResult<()> {
        let raw = command_line(&words);
        info!("Checking command: {}", raw);
        let suggestion = self.engine.resolve(&raw).await;
        self.print_suggestion(&suggestion)
    }

    async fn generate(&self, words: Vec<String>) -> ShellSenseResult<()> {
        // Prose, not a command line: no shell quoting
        let task = words.join(" ");
        let suggestion = self.engine.resolve_smart_command(&task).await;
        self.print_suggestion(&suggestion)
    }

    async fn status(&self) -> ShellSenseResult<()> {
        let healthy = self.engine.ai_client().health_check().await;
        let snapshot = self.engine.breaker().snapshot();

        if self.json {
            let status = serde_json::json!({
                "ai_endpoint": self.config_manager.config().ai.endpoint,
                "ai_model": self.engine.ai_client().model(),
                "ai_healthy": healthy,
                "circuit_breaker": snapshot,
                "cache_size": self.engine.cache_size(),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
            return Ok(());
        }

        let health = if healthy {
            "reachable".green()
        } else {
            "unreachable".red()
        };
        println!(
            "AI service: {} ({}, model {})",
            health,
            self.config_manager.config().ai.endpoint,
            self.engine.ai_client().model()
        );
        println!(
            "Circuit breaker: {:?} ({}/{} consecutive failures)",
            snapshot.state, snapshot.consecutive_failures, snapshot.failure_threshold
        );
        if let Some(at) = snapshot.last_failure {
            println!("Last failure: {}", at.to_rfc3339());
        }
        Ok(())
    }

    /// Handle configuration commands
    fn handle_config_command(
        &mut self,
        show: bool,
        reset: bool,
        export: Option<PathBuf>,
    ) -> ShellSenseResult<()> {
        if show {
            println!("{}", self.config_manager.export_as_json()?);
            return Ok(());
        }

        if reset {
            self.config_manager.reset_to_default();
            self.config_manager.save()?;
            println!(
                "{} Configuration reset to defaults at {:?}",
                "✓".green(),
                self.config_manager.config_path()
            );
            return Ok(());
        }

        if let Some(export_path) = export {
            let json = self.config_manager.export_as_json()?;
            std::fs::write(&export_path, json)?;
            println!("{} Configuration exported to: {:?}", "✓".green(), export_path);
            return Ok(());
        }

        Err(ShellSenseError::invalid_input(
            "Use --show, --reset, or --export <path>",
        ))
    }

    fn print_suggestion(&self, suggestion: &Suggestion) -> ShellSenseResult<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(suggestion)?);
            return Ok(());
        }

        match suggestion {
            Suggestion::Valid { .. } => {
                println!("{} Command looks good", "✓".green());
            }
            Suggestion::Correction {
                corrected,
                explanation,
                ..
            } => {
                println!("{} {}", "Did you mean:".yellow(), corrected.bold());
                println!("  {}", explanation.dimmed());
            }
            Suggestion::SmartCommand {
                generated_command, ..
            } => {
                println!("{}", generated_command.cyan().bold());
            }
            Suggestion::Error { message } => {
                println!("{} {}", "✗".red(), message);
            }
        }
        Ok(())
    }
}

/// Rejoin argv words into one command line. Words that are empty or hold
/// whitespace are quoted; flag values such as `--name=value` stay bare.
fn command_line(words: &[String]) -> String {
    words
        .iter()
        .map(String::as_str)
        .map(quote_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_word(word: &str) -> Cow<'_, str> {
    if !word.is_empty() && !word.contains(char::is_whitespace) {
        Cow::Borrowed(word)
    } else if !word.contains('\'') {
        Cow::Owned(format!("'{}'", word))
    } else if !word.contains('"') {
        Cow::Owned(format!("\"{}\"", word))
    } else {
        shell_words::quote(word)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(cli.config)
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // Initialize logging
    let level_name = cli
        .log_level
        .unwrap_or_else(|| config_manager.config().general.log_level.clone());
    let log_level = match level_name.as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let mut app = ShellSense::new(config_manager, cli.json)
        .map_err(|e| anyhow::anyhow!("Failed to initialize: {}", e))?;

    // Handle commands
    match cli.command {
        Commands::Check { command } => app.check(command).await?,
        Commands::Generate { task } => app.generate(task).await?,
        Commands::Status => app.status().await?,
        Commands::Config {
            show,
            reset,
            export,
        } => app.handle_config_command(show, reset, export)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_command_line_keeps_argument_boundaries() {
        let line = command_line(&words(&["git", "commit", "-m", "fix bug"]));
        assert_eq!(line, "git commit -m 'fix bug'");

        let structure = shellsense::CommandParser::default().parse(&line).unwrap();
        assert_eq!(structure.arguments(), vec!["fix bug"]);
    }

    #[test]
    fn test_command_line_plain_words() {
        assert_eq!(command_line(&words(&["docker", "ps", "-a"])), "docker ps -a");
        assert_eq!(
            command_line(&words(&["kubectl", "get", "pods", "--namespac=prod"])),
            "kubectl get pods --namespac=prod"
        );
    }

    #[test]
    fn test_command_line_word_with_apostrophe() {
        let line = command_line(&words(&["git", "commit", "-m", "it's done"]));
        assert_eq!(line, r#"git commit -m "it's done""#);

        let structure = shellsense::CommandParser::default().parse(&line).unwrap();
        assert_eq!(structure.arguments(), vec!["it's done"]);
    }
}
