// Shell command typo-correction engine
//
// Parses a typed command line, checks it against known command metadata,
// and escalates unresolved cases to an AI service behind a circuit breaker
// with a static fallback table.

pub mod ai;
pub mod cache;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod metadata;
pub mod suggestion;
pub mod validation;

#[cfg(test)]
pub mod testing;

// Re-export commonly used types
pub use ai::{AIClient, AIError, AiValidationClient, OllamaClient, OllamaConfig};
pub use cache::{CacheScope, QuickCorrectionCache};
pub use command::{CommandParser, CommandStructure, ParseError};
pub use config::{Config, ConfigError, ConfigManager};
pub use engine::{BreakerState, CircuitBreaker, CommandEngine, StaticFallback};
pub use error::{ShellSenseError, ShellSenseResult};
pub use metadata::{CommandMetadata, MetadataStore, StaticMetadataStore};
pub use suggestion::Suggestion;
pub use validation::StructuralValidator;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
