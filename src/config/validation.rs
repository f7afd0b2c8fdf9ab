//! Configuration validation utilities.

use crate::config::{AIConfig, CircuitBreakerConfig, Config, ConfigError, FallbackConfig, ValidationConfig};
use std::collections::HashSet;

/// Validation function to check that typo fixes do not point back at typos
fn validate_typo_targets(config: &Config) -> Result<(), ConfigError> {
    for (typo, fix) in &config.fallback.base_typos {
        if config.fallback.base_typos.contains_key(fix) {
            return Err(ConfigError::ValidationError(format!(
                "Typo fix '{}' for '{}' is itself listed as a typo",
                fix, typo
            )));
        }
    }
    Ok(())
}

/// Validation function to check the backoff base does not exceed its cap
fn validate_backoff_bounds(config: &Config) -> Result<(), ConfigError> {
    if config.ai.backoff_base_ms > config.ai.backoff_max_ms {
        return Err(ConfigError::ValidationError(format!(
            "ai.backoff_base_ms ({}) cannot exceed ai.backoff_max_ms ({})",
            config.ai.backoff_base_ms, config.ai.backoff_max_ms
        )));
    }
    Ok(())
}

/// Configuration validator with comprehensive validation rules
pub struct ConfigValidator {
    valid_log_levels: HashSet<String>,
    interdependent_validations: Vec<fn(&Config) -> Result<(), ConfigError>>,
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator {
    /// Creates a new configuration validator with all validation rules
    pub fn new() -> Self {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let interdependent_validations: Vec<fn(&Config) -> Result<(), ConfigError>> =
            vec![validate_typo_targets, validate_backoff_bounds];

        Self {
            valid_log_levels,
            interdependent_validations,
        }
    }

    /// Comprehensive configuration validation
    pub fn validate(&self, config: &Config) -> Result<(), ConfigError> {
        self.validate_allowed_value(&config.general.log_level, &self.valid_log_levels, "general.log_level")?;
        self.validate_ai(&config.ai)?;
        self.validate_circuit_breaker(&config.circuit_breaker)?;
        self.validate_validation(&config.validation)?;
        self.validate_fallback(&config.fallback)?;

        for (command, _) in &config.commands {
            self.validate_non_empty(command.trim(), "commands.<name>")?;
        }

        for validation in &self.interdependent_validations {
            validation(config)?;
        }

        Ok(())
    }

    fn validate_ai(&self, ai: &AIConfig) -> Result<(), ConfigError> {
        self.validate_non_empty(&ai.model, "ai.model")?;

        let endpoint = url::Url::parse(&ai.endpoint).map_err(|e| {
            ConfigError::ValidationError(format!("ai.endpoint '{}' is not a valid URL: {}", ai.endpoint, e))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "ai.endpoint must use http or https, got '{}'",
                endpoint.scheme()
            )));
        }

        self.validate_range(ai.timeout_seconds, 1, 600, "ai.timeout_seconds")?;
        self.validate_range(ai.max_retries, 0, 10, "ai.max_retries")?;
        self.validate_range(ai.backoff_factor, 1, 10, "ai.backoff_factor")?;
        self.validate_range(ai.max_tokens, 1, 32_768, "ai.max_tokens")?;
        if !(0.0..=2.0).contains(&ai.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "ai.temperature={} must be between 0.0 and 2.0",
                ai.temperature
            )));
        }
        Ok(())
    }

    fn validate_circuit_breaker(&self, breaker: &CircuitBreakerConfig) -> Result<(), ConfigError> {
        self.validate_range(breaker.failure_threshold, 1, 100, "circuit_breaker.failure_threshold")?;
        self.validate_range(breaker.cooldown_seconds, 1, 86_400, "circuit_breaker.cooldown_seconds")
    }

    fn validate_validation(&self, validation: &ValidationConfig) -> Result<(), ConfigError> {
        self.validate_range(validation.memo_capacity, 1, 10_000_000, "validation.memo_capacity")?;
        for flag in &validation.universal_flags {
            if !flag.starts_with('-') {
                return Err(ConfigError::ValidationError(format!(
                    "validation.universal_flags entry '{}' must start with '-'",
                    flag
                )));
            }
        }
        Ok(())
    }

    fn validate_fallback(&self, fallback: &FallbackConfig) -> Result<(), ConfigError> {
        for (typo, fix) in &fallback.base_typos {
            self.validate_non_empty(typo.trim(), "fallback.base_typos key")?;
            self.validate_non_empty(fix.trim(), "fallback.base_typos value")?;
            if typo.trim().eq_ignore_ascii_case(fix.trim()) {
                return Err(ConfigError::ValidationError(format!(
                    "fallback.base_typos maps '{}' to itself",
                    typo
                )));
            }
        }
        Ok(())
    }

    /// Validates a numeric field is within range
    fn validate_range<T>(&self, value: T, min: T, max: T, field_name: &str) -> Result<(), ConfigError>
    where
        T: PartialOrd + std::fmt::Display,
    {
        if value < min || value > max {
            return Err(ConfigError::ValidationError(format!(
                "{}={} must be between {} and {}",
                field_name, value, min, max
            )));
        }
        Ok(())
    }

    /// Validates a string field is not empty
    fn validate_non_empty(&self, value: &str, field_name: &str) -> Result<(), ConfigError> {
        if value.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field_name
            )));
        }
        Ok(())
    }

    /// Validates that a string value is in a set of allowed values
    fn validate_allowed_value(
        &self,
        value: &str,
        allowed: &HashSet<String>,
        field_name: &str,
    ) -> Result<(), ConfigError> {
        if !allowed.contains(value) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid {} '{}'. Valid options are: {:?}",
                field_name, value, allowed
            )));
        }
        Ok(())
    }
}

// Manually implement Debug since we can't derive it due to the function pointers
impl std::fmt::Debug for ConfigValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigValidator")
            .field("valid_log_levels", &self.valid_log_levels)
            .field(
                "interdependent_validations",
                &format!(
                    "[{} validation functions]",
                    self.interdependent_validations.len()
                ),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::new().validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_bad_log_level() {
        let mut config = Config::default();
        config.general.log_level = "loud".to_string();
        assert!(ConfigValidator::new().validate(&config).is_err());
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        let mut config = Config::default();
        config.ai.endpoint = "not a url".to_string();
        assert!(ConfigValidator::new().validate(&config).is_err());

        config.ai.endpoint = "ftp://localhost:11434".to_string();
        assert!(ConfigValidator::new().validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_threshold() {
        let mut config = Config::default();
        config.circuit_breaker.failure_threshold = 0;
        assert!(ConfigValidator::new().validate(&config).is_err());
    }

    #[test]
    fn test_rejects_chained_typos() {
        let mut config = Config::default();
        config.fallback.base_typos.insert("gitt".to_string(), "gti".to_string());
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert!(err.to_string().contains("itself listed as a typo"));
    }

    #[test]
    fn test_rejects_self_mapping_typo() {
        let mut config = Config::default();
        config.fallback.base_typos.insert("Ls".to_string(), "ls".to_string());
        assert!(ConfigValidator::new().validate(&config).is_err());
    }

    #[test]
    fn test_rejects_inverted_backoff() {
        let mut config = Config::default();
        config.ai.backoff_base_ms = 10_000;
        config.ai.backoff_max_ms = 1_000;
        assert!(ConfigValidator::new().validate(&config).is_err());
    }
}
