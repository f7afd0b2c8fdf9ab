//! Escalation orchestrator.
//!
//! A request runs through the quick-correction cache, then the structural
//! validator, then the AI tier guarded by the circuit breaker. The static
//! fallback answers whenever the AI tier is skipped, fails or is abandoned.
//! Every expected failure ends up as a [`Suggestion`].

pub mod breaker;
pub mod fallback;
pub mod prompts;

pub use breaker::{BreakerSnapshot, BreakerState, CircuitBreaker};
pub use fallback::StaticFallback;

use crate::ai::{parse_token_reply, parse_verdict, strip_code_fences, AiValidationClient, VerdictType};
use crate::cache::{CacheScope, QuickCorrectionCache};
use crate::command::{CommandParser, CommandStructure};
use crate::config::Config;
use crate::metadata::{MetadataStore, StaticMetadataStore};
use crate::suggestion::Suggestion;
use crate::validation::{CorrectionTarget, StructuralValidator};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

const AI_UNREACHABLE: &str = "AI service is unreachable; cannot generate a command right now";

/// Result of one guarded AI call
enum AiOutcome {
    Reply(Option<String>),
    Failed,
    Cancelled,
}

/// The command correction engine
pub struct CommandEngine {
    parser: CommandParser,
    metadata: Arc<dyn MetadataStore>,
    validator: StructuralValidator,
    cache: QuickCorrectionCache,
    breaker: Arc<CircuitBreaker>,
    fallback: StaticFallback,
    ai: AiValidationClient,
    quick_correction: bool,
}

impl CommandEngine {
    pub fn new(
        parser: CommandParser,
        metadata: Arc<dyn MetadataStore>,
        validator: StructuralValidator,
        fallback: StaticFallback,
        breaker: Arc<CircuitBreaker>,
        ai: AiValidationClient,
    ) -> Self {
        Self {
            parser,
            metadata,
            validator,
            cache: QuickCorrectionCache::new(),
            breaker,
            fallback,
            ai,
            quick_correction: true,
        }
    }

    /// Wire every component from `config`
    pub fn from_config(config: &Config, ai: AiValidationClient) -> Self {
        Self::new(
            CommandParser::new(config.parser.subcommand_commands.iter()),
            Arc::new(StaticMetadataStore::from_config(config)),
            StructuralValidator::from_config(&config.validation),
            StaticFallback::from_config(&config.fallback),
            Arc::new(CircuitBreaker::from_config(&config.circuit_breaker)),
            ai,
        )
        .with_quick_correction(config.ai.quick_correction)
    }

    /// Toggle the bare base-command prompt for unknown commands
    pub fn with_quick_correction(mut self, enabled: bool) -> Self {
        self.quick_correction = enabled;
        self
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn ai_client(&self) -> &AiValidationClient {
        &self.ai
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.size()
    }

    /// Resolve a raw command line into a single suggestion
    pub async fn resolve(&self, raw: &str) -> Suggestion {
        self.resolve_with_cancel(raw, &CancellationToken::new()).await
    }

    /// Like [`resolve`](Self::resolve), abandoning the AI call when `cancel`
    /// fires. An abandoned call is not counted against the circuit breaker.
    pub async fn resolve_with_cancel(&self, raw: &str, cancel: &CancellationToken) -> Suggestion {
        let span = info_span!("resolve", request_id = %Uuid::new_v4());
        async move {
            let suggestion = self.run_tiers(raw, cancel).await;
            debug!("Resolved {:?} -> {}", raw, suggestion);
            suggestion
        }
        .instrument(span)
        .await
    }

    /// Turn a natural-language task into a shell command via the AI tier
    pub async fn resolve_smart_command(&self, task_description: &str) -> Suggestion {
        let task = task_description.trim();
        if task.is_empty() {
            return Suggestion::error("Task description cannot be empty");
        }

        let span = info_span!("smart_command", request_id = %Uuid::new_v4());
        async move {
            if !self.breaker.allows_request() {
                info!("Circuit open, not generating a command");
                return Suggestion::error(AI_UNREACHABLE);
            }

            let never = CancellationToken::new();
            match self.call_ai(task, prompts::smart_command_prompt(), &never).await {
                AiOutcome::Reply(Some(text)) => {
                    let text = strip_code_fences(&text);
                    match text.lines().map(str::trim).find(|l| !l.is_empty()) {
                        Some(command) => Suggestion::smart_command(task, command),
                        None => Suggestion::error(AI_UNREACHABLE),
                    }
                }
                _ => Suggestion::error(AI_UNREACHABLE),
            }
        }
        .instrument(span)
        .await
    }

    async fn run_tiers(&self, raw: &str, cancel: &CancellationToken) -> Suggestion {
        let structure = match self.parser.parse(raw) {
            Ok(structure) => structure,
            Err(e) => {
                debug!("Parse failed: {}", e);
                return self.fallback.for_parse_error(&e);
            }
        };

        if let Some(suggestion) = self.cached_correction(&structure) {
            return suggestion;
        }

        let metadata = self.metadata.get_metadata(structure.base_command());
        if let Some(correction) = self.validator.inspect(&structure, metadata.as_deref()) {
            if let CorrectionTarget::Subcommand { from, to } = &correction.target {
                self.cache.store(
                    CacheScope::Subcommand {
                        base_command: structure.base_command(),
                    },
                    from,
                    to,
                );
            }
            info!("Structural correction: {}", correction.explanation);
            return correction.into_suggestion(&structure);
        }

        if !self.breaker.allows_request() {
            debug!("Circuit open, using static fallback");
            return self.static_verdict(&structure);
        }

        self.escalate(&structure, metadata.is_some(), cancel).await
    }

    /// Corrections remembered from earlier requests, base command first
    fn cached_correction(&self, structure: &CommandStructure) -> Option<Suggestion> {
        let mut corrected = structure.clone();
        let mut notes = Vec::new();

        if let Some(fix) = self.cache.lookup(CacheScope::Base, structure.base_command()) {
            // The corrected base decides whether a subcommand exists
            corrected = structure
                .with_base_command(fix.as_str())
                .with_subcommand_layout(self.parser.takes_subcommands(&fix));
            notes.push(format!("'{}' -> '{}'", structure.base_command(), fix));
        }

        let subcommand_fix = corrected.subcommand().and_then(|subcommand| {
            let scope = CacheScope::Subcommand {
                base_command: corrected.base_command(),
            };
            self.cache
                .lookup(scope, subcommand)
                .map(|fix| (subcommand.to_string(), fix))
        });
        if let Some((subcommand, fix)) = subcommand_fix {
            notes.push(format!("'{}' -> '{}'", subcommand, fix));
            corrected = corrected.with_subcommand(fix);
        }

        let line = corrected.to_command_line();
        if notes.is_empty() || line == structure.to_command_line() {
            return None;
        }

        debug!("Quick cache hit for {:?}", structure.raw());
        Some(Suggestion::correction(
            structure.raw(),
            line,
            format!("Previously corrected: {}", notes.join(", ")),
        ))
    }

    async fn escalate(
        &self,
        structure: &CommandStructure,
        has_metadata: bool,
        cancel: &CancellationToken,
    ) -> Suggestion {
        let raw = structure.raw();
        let base = structure.base_command();

        if self.quick_correction && !has_metadata && !self.fallback.is_known(base) {
            let prompt = prompts::quick_base_prompt(base);
            match self.call_ai(raw, &prompt, cancel).await {
                AiOutcome::Reply(reply) => {
                    let token = reply.as_deref().and_then(parse_token_reply);
                    if let Some(token) = token.filter(|t| !t.eq_ignore_ascii_case(base)) {
                        self.cache.store(CacheScope::Base, base, &token);
                        return Suggestion::correction(
                            raw,
                            structure.with_base_command(token.as_str()).to_command_line(),
                            format!("Unknown command '{}'; did you mean '{}'?", base, token),
                        );
                    }
                }
                AiOutcome::Failed | AiOutcome::Cancelled => {
                    return self.static_verdict(structure);
                }
            }

            if !self.breaker.allows_request() {
                return self.static_verdict(structure);
            }
        }

        let prompt = prompts::semantic_validation_prompt(structure);
        match self.call_ai(raw, &prompt, cancel).await {
            AiOutcome::Reply(reply) => self.interpret_verdict(structure, reply.as_deref().unwrap_or("")),
            AiOutcome::Failed | AiOutcome::Cancelled => self.static_verdict(structure),
        }
    }

    fn interpret_verdict(&self, structure: &CommandStructure, reply: &str) -> Suggestion {
        let raw = structure.raw();
        let verdict = parse_verdict(reply);

        let suggestion = match verdict.verdict {
            VerdictType::Valid => None,
            VerdictType::Correction | VerdictType::Suggestion => verdict
                .suggestion
                .filter(|s| s != raw && *s != structure.to_command_line()),
        };

        match suggestion {
            Some(corrected) => {
                self.remember_ai_correction(structure, &corrected);
                let explanation = verdict
                    .message
                    .unwrap_or_else(|| "Suggested by AI validation".to_string());
                Suggestion::correction(raw, corrected, explanation)
            }
            None => Suggestion::valid(raw),
        }
    }

    /// Cache AI corrections that touch only the base command or only the subcommand
    fn remember_ai_correction(&self, original: &CommandStructure, corrected: &str) {
        let Ok(fixed) = self.parser.parse(corrected) else {
            return;
        };

        let same_base = fixed.base_command().eq_ignore_ascii_case(original.base_command());
        if !same_base {
            // A corrected base may move the second word into the subcommand slot
            if fixed.tokens_after_base().eq(original.tokens_after_base()) {
                self.cache
                    .store(CacheScope::Base, original.base_command(), fixed.base_command());
            }
            return;
        }

        if fixed.parts() != original.parts() {
            return;
        }
        if let (Some(sub), Some(fixed_sub)) = (original.subcommand(), fixed.subcommand()) {
            self.cache.store(
                CacheScope::Subcommand {
                    base_command: original.base_command(),
                },
                sub,
                fixed_sub,
            );
        }
    }

    fn static_verdict(&self, structure: &CommandStructure) -> Suggestion {
        self.fallback
            .verdict(structure, self.metadata.as_ref(), &self.cache)
    }

    /// One AI call with breaker bookkeeping
    async fn call_ai(&self, input: &str, prompt: &str, cancel: &CancellationToken) -> AiOutcome {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Request cancelled, abandoning AI call");
                AiOutcome::Cancelled
            }
            result = self.ai.generate(input, prompt) => match result {
                Ok(reply) => {
                    self.breaker.record_success();
                    AiOutcome::Reply(reply)
                }
                Err(e) => {
                    warn!("AI call failed: {}", e);
                    self.breaker.record_failure();
                    AiOutcome::Failed
                }
            },
        }
    }
}

impl std::fmt::Debug for CommandEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEngine")
            .field("parser", &self.parser)
            .field("validator", &self.validator)
            .field("cache_size", &self.cache.size())
            .field("breaker", &self.breaker.state())
            .field("ai", &self.ai)
            .field("quick_correction", &self.quick_correction)
            .finish()
    }
}
