//! Known-command metadata: valid subcommands and flags per base command.
//!
//! The engine only reads metadata. Lookups are case-insensitive on the base
//! command name.

mod builtin;

use crate::config::Config;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Valid subcommands and flags for one base command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandMetadata {
    subcommands: BTreeSet<String>,
    flags: BTreeSet<String>,
}

impl CommandMetadata {
    /// Subcommands are stored lower-cased; short and long flag forms are
    /// stored independently, as given.
    pub fn new<S, F>(subcommands: S, flags: F) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        Self {
            subcommands: subcommands
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            flags: flags
                .into_iter()
                .map(|f| f.as_ref().trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
        }
    }

    pub fn has_subcommand(&self, subcommand: &str) -> bool {
        self.subcommands.contains(&subcommand.to_lowercase())
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Valid subcommands in lexicographic order
    pub fn subcommands(&self) -> impl Iterator<Item = &str> {
        self.subcommands.iter().map(String::as_str)
    }

    /// Valid flags in lexicographic order
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.subcommands.is_empty() && self.flags.is_empty()
    }

    /// Union of both entries
    pub fn merged(&self, other: &CommandMetadata) -> CommandMetadata {
        CommandMetadata {
            subcommands: self.subcommands.union(&other.subcommands).cloned().collect(),
            flags: self.flags.union(&other.flags).cloned().collect(),
        }
    }
}

/// Source of command metadata consulted by the structural tier
pub trait MetadataStore: Send + Sync {
    /// Metadata for `base_command`, or `None` if the command is unknown
    fn get_metadata(&self, base_command: &str) -> Option<Arc<CommandMetadata>>;

    fn knows(&self, base_command: &str) -> bool {
        self.get_metadata(base_command).is_some()
    }
}

/// In-memory metadata table
#[derive(Debug, Clone, Default)]
pub struct StaticMetadataStore {
    entries: HashMap<String, Arc<CommandMetadata>>,
}

impl StaticMetadataStore {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with metadata for common tools
    pub fn with_builtin() -> Self {
        let mut store = Self::new();
        for (command, subcommands, flags) in builtin::BUILTIN_COMMANDS {
            store.insert(
                command,
                CommandMetadata::new(subcommands.iter(), flags.iter()),
            );
        }
        store
    }

    /// Built-in metadata with the `[commands]` section of the config merged on top
    pub fn from_config(config: &Config) -> Self {
        let mut store = Self::with_builtin();
        for (command, entry) in &config.commands {
            let extra = CommandMetadata::new(entry.subcommands.iter(), entry.flags.iter());
            store.merge(command, extra);
        }
        store
    }

    /// Replace the metadata for `base_command`
    pub fn insert(&mut self, base_command: &str, metadata: CommandMetadata) {
        self.entries
            .insert(base_command.trim().to_lowercase(), Arc::new(metadata));
    }

    /// Union `metadata` into any existing entry for `base_command`
    pub fn merge(&mut self, base_command: &str, metadata: CommandMetadata) {
        let key = base_command.trim().to_lowercase();
        let merged = match self.entries.get(&key) {
            Some(existing) => existing.merged(&metadata),
            None => metadata,
        };
        self.entries.insert(key, Arc::new(merged));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MetadataStore for StaticMetadataStore {
    fn get_metadata(&self, base_command: &str) -> Option<Arc<CommandMetadata>> {
        self.entries.get(&base_command.trim().to_lowercase()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CommandMetadataConfig;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let store = StaticMetadataStore::with_builtin();
        assert!(store.get_metadata("DOCKER").is_some());
        assert!(store.get_metadata("Git").is_some());
        assert!(store.get_metadata("definitely-not-a-tool").is_none());
    }

    #[test]
    fn test_subcommands_are_lowercased() {
        let metadata = CommandMetadata::new(["Status", "PUSH"], ["-v"]);
        assert!(metadata.has_subcommand("status"));
        assert!(metadata.has_subcommand("Push"));
        assert_eq!(metadata.subcommands().collect::<Vec<_>>(), vec!["push", "status"]);
    }

    #[test]
    fn test_flags_keep_short_and_long_forms() {
        let metadata = CommandMetadata::new(Vec::<String>::new(), ["-a", "--all"]);
        assert!(metadata.has_flag("-a"));
        assert!(metadata.has_flag("--all"));
        assert!(!metadata.has_flag("-A"));
    }

    #[test]
    fn test_config_entries_merge_over_builtin() {
        let mut config = Config::default();
        config.commands.insert(
            "git".to_string(),
            CommandMetadataConfig {
                subcommands: vec!["lg".to_string()],
                flags: vec![],
            },
        );
        config.commands.insert(
            "mytool".to_string(),
            CommandMetadataConfig {
                subcommands: vec!["run".to_string()],
                flags: vec!["--fast".to_string()],
            },
        );

        let store = StaticMetadataStore::from_config(&config);
        let git = store.get_metadata("git").unwrap();
        assert!(git.has_subcommand("lg"));
        assert!(git.has_subcommand("status"));
        assert!(store.get_metadata("mytool").unwrap().has_flag("--fast"));
    }
}
