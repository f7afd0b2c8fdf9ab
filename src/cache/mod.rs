//! Quick-correction cache consulted before the heavier tiers.
//!
//! Keys are namespaced by scope (`base:<cmd>` or `subcmd:<cmd>:<sub>`) and
//! lower-cased. Entries never map a token to itself and are never evicted.

use std::collections::HashMap;
use std::sync::RwLock;
use tracing::trace;

/// Namespace of a cached correction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheScope<'a> {
    /// Corrections of the base command itself
    Base,
    /// Corrections of a subcommand of `base_command`
    Subcommand { base_command: &'a str },
}

impl CacheScope<'_> {
    fn key(&self, token: &str) -> String {
        let token = normalize(token);
        match self {
            CacheScope::Base => format!("base:{}", token),
            CacheScope::Subcommand { base_command } => {
                format!("subcmd:{}:{}", normalize(base_command), token)
            }
        }
    }
}

fn normalize(token: &str) -> String {
    token.trim().to_lowercase()
}

/// Thread-safe map of previously discovered corrections
#[derive(Debug, Default)]
pub struct QuickCorrectionCache {
    entries: RwLock<HashMap<String, String>>,
}

impl QuickCorrectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached correction for `token` in `scope`
    pub fn lookup(&self, scope: CacheScope<'_>, token: &str) -> Option<String> {
        let key = scope.key(token);
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&key).cloned()
    }

    /// Remember a correction. Returns `false` (and stores nothing) when the
    /// correction is empty or equal to the token.
    pub fn store(&self, scope: CacheScope<'_>, token: &str, correction: &str) -> bool {
        let correction = correction.trim();
        if correction.is_empty() || normalize(correction) == normalize(token) {
            return false;
        }

        let key = scope.key(token);
        trace!("Caching quick correction {} -> {}", key, correction);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, correction.to_string());
        true
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn size(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
