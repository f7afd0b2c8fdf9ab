//! Interpretation of raw model replies.
//!
//! Replies may arrive wrapped in markdown code fences or backticks. Parsing
//! never fails: malformed verdicts degrade to [`VerdictType::Valid`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static FENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_+-]*[ \t]*\n?(.*?)\n?[ \t]*```$")
        .expect("fence pattern is a valid regex")
});

/// Kind of verdict returned by the semantic validation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictType {
    Valid,
    Correction,
    Suggestion,
}

/// Parsed semantic validation reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiVerdict {
    pub verdict: VerdictType,
    pub suggestion: Option<String>,
    pub message: Option<String>,
}

impl AiVerdict {
    fn valid() -> Self {
        Self {
            verdict: VerdictType::Valid,
            suggestion: None,
            message: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawVerdict {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    suggestion: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Remove surrounding markdown fences (```, ```bash, ...) and backticks
pub fn strip_code_fences(reply: &str) -> String {
    let mut text = reply.trim();

    if let Some(caps) = FENCE_PATTERN.captures(text) {
        if let Some(inner) = caps.get(1) {
            text = inner.as_str().trim();
        }
    }

    text.trim_matches('`').trim().to_string()
}

/// Interpret a JSON verdict `{"type": ..., "suggestion": ..., "message": ...}`
pub fn parse_verdict(reply: &str) -> AiVerdict {
    let text = strip_code_fences(reply);
    let json = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => return AiVerdict::valid(),
    };

    let raw: RawVerdict = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!("Malformed verdict treated as valid: {}", e);
            return AiVerdict::valid();
        }
    };

    let verdict = match raw.kind.as_deref().map(|k| k.trim().to_uppercase()).as_deref() {
        Some("CORRECTION") => VerdictType::Correction,
        Some("SUGGESTION") => VerdictType::Suggestion,
        _ => VerdictType::Valid,
    };

    AiVerdict {
        verdict,
        suggestion: non_empty(raw.suggestion.map(|s| strip_code_fences(&s))),
        message: non_empty(raw.message),
    }
}

/// Interpret a bare corrected token (first word of the first line)
pub fn parse_token_reply(reply: &str) -> Option<String> {
    let text = strip_code_fences(reply);
    let first_line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    let token = first_line
        .split_whitespace()
        .next()?
        .trim_matches(|c: char| c == '`' || c == '"' || c == '\'');
    (!token.is_empty()).then(|| token.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```bash\ngit status\n```"), "git status");
        assert_eq!(strip_code_fences("```\nls -la\n```"), "ls -la");
        assert_eq!(strip_code_fences("`docker ps`"), "docker ps");
        assert_eq!(strip_code_fences("  plain  "), "plain");
    }

    #[test]
    fn test_parse_correction_verdict() {
        let verdict = parse_verdict(
            "```json\n{ \"type\": \"CORRECTION\", \"suggestion\": \"git push\", \"message\": \"typo\" }\n```",
        );
        assert_eq!(
            verdict,
            AiVerdict {
                verdict: VerdictType::Correction,
                suggestion: Some("git push".to_string()),
                message: Some("typo".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_verdict_with_surrounding_prose() {
        let verdict = parse_verdict("Sure! {\"type\":\"suggestion\",\"suggestion\":\"ls -lh\"} Hope that helps");
        assert_eq!(verdict.verdict, VerdictType::Suggestion);
        assert_eq!(verdict.suggestion.as_deref(), Some("ls -lh"));
        assert_eq!(verdict.message, None);
    }

    #[test]
    fn test_malformed_verdicts_are_valid() {
        for reply in ["", "not json", "{\"type\": ", "{\"type\": 42}", "{\"type\":\"WHATEVER\"}"] {
            assert_eq!(parse_verdict(reply).verdict, VerdictType::Valid, "reply: {}", reply);
        }
    }

    #[test]
    fn test_parse_token_reply() {
        assert_eq!(parse_token_reply("git"), Some("git".to_string()));
        assert_eq!(parse_token_reply("```\ndocker\n```"), Some("docker".to_string()));
        assert_eq!(parse_token_reply("  `kubectl` is what you meant"), Some("kubectl".to_string()));
        assert_eq!(parse_token_reply("   \n  "), None);
    }
}
