//! Structural validation of parsed commands against known metadata.
//!
//! The validator checks the subcommand first and the flags second, and
//! corrects only the first problem it can fix. Candidates are ranked with
//! [`similarity::score`]; equal scores resolve to the lexicographically
//! smallest candidate.

pub mod similarity;

use crate::command::{CommandPart, CommandStructure};
use crate::config::ValidationConfig;
use crate::metadata::CommandMetadata;
use crate::suggestion::Suggestion;
use similarity::{similarity_score, DistanceMemo};
use std::collections::HashSet;
use tracing::debug;

/// Flags accepted by every command
pub const DEFAULT_UNIVERSAL_FLAGS: &[&str] = &["-h", "--help", "--version"];

/// What a structural correction changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionTarget {
    Subcommand { from: String, to: String },
    Flag { index: usize, from: String, to: String },
}

/// A fix found by the structural tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralCorrection {
    pub target: CorrectionTarget,
    pub corrected: CommandStructure,
    pub explanation: String,
}

impl StructuralCorrection {
    pub fn into_suggestion(self, original: &CommandStructure) -> Suggestion {
        Suggestion::correction(
            original.raw(),
            self.corrected.to_command_line(),
            self.explanation,
        )
    }
}

/// Fuzzy validator for subcommands and flags
#[derive(Debug)]
pub struct StructuralValidator {
    memo: DistanceMemo,
    universal_flags: HashSet<String>,
}

impl Default for StructuralValidator {
    fn default() -> Self {
        Self::new(similarity::DEFAULT_MEMO_CAPACITY, DEFAULT_UNIVERSAL_FLAGS.iter().copied())
    }
}

impl StructuralValidator {
    pub fn new<I, S>(memo_capacity: usize, universal_flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            memo: DistanceMemo::new(memo_capacity),
            universal_flags: universal_flags
                .into_iter()
                .map(|f| f.as_ref().to_string())
                .collect(),
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(config.memo_capacity, config.universal_flags.iter())
    }

    /// Validate `structure` and turn the first fixable problem into a
    /// [`Suggestion::Correction`]. `None` means no metadata, or nothing to fix.
    pub fn validate(
        &self,
        structure: &CommandStructure,
        metadata: Option<&CommandMetadata>,
    ) -> Option<Suggestion> {
        self.inspect(structure, metadata)
            .map(|correction| correction.into_suggestion(structure))
    }

    /// Like [`validate`](Self::validate) but reports what was corrected
    pub fn inspect(
        &self,
        structure: &CommandStructure,
        metadata: Option<&CommandMetadata>,
    ) -> Option<StructuralCorrection> {
        let metadata = metadata?;
        let base = structure.base_command();

        if let Some(subcommand) = structure.subcommand() {
            let has_subcommands = metadata.subcommands().next().is_some();
            if has_subcommands && !metadata.has_subcommand(subcommand) {
                let typed = subcommand.to_lowercase();
                let best = self.closest_match(&typed, metadata.subcommands())?;
                debug!("Subcommand '{}' for {} corrected to '{}'", subcommand, base, best);
                return Some(StructuralCorrection {
                    target: CorrectionTarget::Subcommand {
                        from: subcommand.to_string(),
                        to: best.to_string(),
                    },
                    corrected: structure.with_subcommand(best),
                    explanation: format!(
                        "Unknown subcommand '{}' for {}; did you mean '{}'?",
                        subcommand, base, best
                    ),
                });
            }
        }

        if metadata.flags().next().is_none() {
            return None;
        }

        for (index, part) in structure.parts().iter().enumerate() {
            let CommandPart::Flag(flag) = part else {
                continue;
            };
            let (name, value) = split_flag(flag);
            if self.universal_flags.contains(name)
                || metadata.has_flag(name)
                || is_valid_short_cluster(name, metadata)
            {
                continue;
            }

            if let Some(best) = self.closest_match(name, metadata.flags()) {
                let replacement = match value {
                    Some(value) => format!("{}={}", best, value),
                    None => best.to_string(),
                };
                debug!("Flag '{}' for {} corrected to '{}'", flag, base, replacement);
                return Some(StructuralCorrection {
                    target: CorrectionTarget::Flag {
                        index,
                        from: flag.clone(),
                        to: replacement.clone(),
                    },
                    corrected: structure.with_flag_replaced(index, replacement),
                    explanation: format!(
                        "Unknown flag '{}' for {}; did you mean '{}'?",
                        name,
                        command_label(structure),
                        best
                    ),
                });
            }
        }

        None
    }

    /// Candidate with the lowest similarity score within edit distance 2.
    ///
    /// Ties go to the lexicographically smallest candidate.
    pub fn closest_match<'a, I>(&self, input: &str, candidates: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        candidates
            .into_iter()
            .filter_map(|candidate| {
                self.memo
                    .distance(input, candidate)
                    .map(|d| (similarity_score(input, candidate, d), candidate))
            })
            .min()
            .map(|(_, candidate)| candidate)
    }

    /// Number of memoized distance pairs
    pub fn memo_size(&self) -> usize {
        self.memo.len()
    }

    pub fn clear_memo(&self) {
        self.memo.clear();
    }
}

fn split_flag(flag: &str) -> (&str, Option<&str>) {
    match flag.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (flag, None),
    }
}

/// `-la` is fine when both `-l` and `-a` are valid
fn is_valid_short_cluster(flag: &str, metadata: &CommandMetadata) -> bool {
    let Some(letters) = flag.strip_prefix('-') else {
        return false;
    };
    if letters.starts_with('-') || letters.chars().count() < 2 {
        return false;
    }
    letters
        .chars()
        .all(|c| c.is_ascii_alphanumeric() && metadata.has_flag(&format!("-{}", c)))
}

fn command_label(structure: &CommandStructure) -> String {
    match structure.subcommand() {
        Some(sub) => format!("{} {}", structure.base_command(), sub),
        None => structure.base_command().to_string(),
    }
}
