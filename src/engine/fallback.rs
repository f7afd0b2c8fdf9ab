//! Static verdicts used when the AI tier is skipped or fails.

use crate::cache::{CacheScope, QuickCorrectionCache};
use crate::command::{CommandStructure, ParseError};
use crate::config::FallbackConfig;
use crate::metadata::MetadataStore;
use crate::suggestion::Suggestion;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Known commands and a base-command typo table
#[derive(Debug, Clone, Default)]
pub struct StaticFallback {
    known_commands: HashSet<String>,
    base_typos: HashMap<String, String>,
}

impl StaticFallback {
    pub fn new<K, S>(known_commands: K, base_typos: HashMap<String, String>) -> Self
    where
        K: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            known_commands: known_commands
                .into_iter()
                .map(|c| c.as_ref().trim().to_lowercase())
                .collect(),
            base_typos: base_typos
                .into_iter()
                .map(|(typo, fix)| (typo.trim().to_lowercase(), fix.trim().to_string()))
                .collect(),
        }
    }

    pub fn from_config(config: &FallbackConfig) -> Self {
        Self::new(config.known_commands.iter(), config.base_typos.clone())
    }

    pub fn is_known(&self, base_command: &str) -> bool {
        self.known_commands.contains(&base_command.to_lowercase())
    }

    pub fn typo_fix(&self, base_command: &str) -> Option<&str> {
        self.base_typos
            .get(&base_command.to_lowercase())
            .map(String::as_str)
    }

    /// Verdict for input that could not be parsed
    pub fn for_parse_error(&self, error: &ParseError) -> Suggestion {
        Suggestion::error(error.to_string())
    }

    /// Verdict for a parsed command. Typo hits are written to `cache`.
    pub fn verdict(
        &self,
        structure: &CommandStructure,
        metadata: &dyn MetadataStore,
        cache: &QuickCorrectionCache,
    ) -> Suggestion {
        let base = structure.base_command();

        if let Some(fix) = self.typo_fix(base) {
            debug!("Static typo table maps '{}' to '{}'", base, fix);
            cache.store(CacheScope::Base, base, fix);
            return Suggestion::correction(
                structure.raw(),
                structure.with_base_command(fix).to_command_line(),
                format!("'{}' looks like a typo of '{}'", base, fix),
            );
        }

        if self.is_known(base) || metadata.knows(base) {
            return Suggestion::valid(structure.raw());
        }

        Suggestion::error(format!("Unknown command: '{}'", base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandParser;
    use crate::config::FallbackConfig;
    use crate::metadata::StaticMetadataStore;
    use pretty_assertions::assert_eq;

    fn verdict(raw: &str, cache: &QuickCorrectionCache) -> Suggestion {
        let fallback = StaticFallback::from_config(&FallbackConfig::default());
        let store = StaticMetadataStore::with_builtin();
        let structure = CommandParser::default().parse(raw).unwrap();
        fallback.verdict(&structure, &store, cache)
    }

    #[test]
    fn test_typo_becomes_correction_and_is_cached() {
        let cache = QuickCorrectionCache::new();
        assert_eq!(
            verdict("gti status", &cache),
            Suggestion::correction("gti status", "git status", "'gti' looks like a typo of 'git'")
        );
        assert_eq!(cache.lookup(CacheScope::Base, "gti"), Some("git".to_string()));
    }

    #[test]
    fn test_known_and_unknown_commands() {
        let cache = QuickCorrectionCache::new();
        assert_eq!(verdict("grep -r foo .", &cache), Suggestion::valid("grep -r foo ."));
        assert_eq!(
            verdict("frobnicate --all", &cache),
            Suggestion::error("Unknown command: 'frobnicate'")
        );
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_metadata_counts_as_known() {
        let fallback = StaticFallback::new(Vec::<String>::new(), HashMap::new());
        let store = StaticMetadataStore::with_builtin();
        let structure = CommandParser::default().parse("kubectl get pods").unwrap();
        assert!(fallback
            .verdict(&structure, &store, &QuickCorrectionCache::new())
            .is_valid());
    }

    #[test]
    fn test_parse_error_message() {
        let fallback = StaticFallback::default();
        assert_eq!(
            fallback.for_parse_error(&ParseError::Empty),
            Suggestion::error("Command cannot be empty")
        );
    }
}
