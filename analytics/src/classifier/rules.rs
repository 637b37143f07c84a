//! Deterministic rule-based classification backend
//!
//! Keyword rules over gcc/clang diagnostic text. Rules are checked in order
//! and the first match wins, so the more specific categories come first.

use super::{ClassificationBackend, ClassificationRequest, ClassifierError};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

/// Answer for messages no rule matches. Not a taxonomy key.
pub const UNMATCHED_TOKEN: &str = "OTHER";

static RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)(no such file or directory|#include nested|\bheader\b)", "HEADER"),
        (
            r"(?i)(undefined reference|multiple definition|ld returned|collect2|\blinker\b|cannot find -l)",
            "LINKER",
        ),
        (
            r"(?i)(#\s*(define|if|ifdef|ifndef|endif|else|elif|pragma|error)\b|\bmacro\b|preprocess|directive)",
            "PREPROCESSING",
        ),
        (
            r"(?i)(not declared in this scope|was not declared|undeclared \(first use|out of scope)",
            "SCOPE",
        ),
        (r"(?i)overflow", "OVERFLOW"),
        (
            r"(?i)(\bfree\b|malloc|calloc|realloc|null pointer|dereferenc|address of local|memory|dangling|use after)",
            "MEMORY",
        ),
        (
            r"(?i)(ISO C|C\+\+\d{2}|-std=|pedantic|forbids|deprecated|\bstd::)",
            "STANDARD",
        ),
        (r"(?i)(uninitiali[sz]ed|initiali[sz])", "INITIALIZATION"),
        (r"(?i)(too (few|many) arguments|\bargument|\bparameter)", "PARAMETER"),
        (
            r"(?i)(implicit declaration|conflicting types|redeclar|redefinition|previous declaration|\bdeclar|\bunused\b)",
            "DECLARATION",
        ),
        (
            r"(?i)(sizeof|size of|storage size|array (size|subscript|bound)|too large)",
            "SIZE",
        ),
        (r"(?i)(\boperator|\boperand)", "OPERATOR"),
        (
            r"(?i)(\bexpected\b|syntax|\bstray\b|missing terminating|unterminated|before .* token)",
            "SYNTAX",
        ),
        (r"(?i)(incompatible|conversion|cannot convert|\btype\b|\bcast\b|format '%)", "TYPE"),
        (r"(?i)(identifier|shadow|\bname\b|reserved)", "NAMING"),
    ]
    .into_iter()
    .map(|(pattern, key)| (Regex::new(pattern).unwrap(), key))
    .collect()
});

/// Keyword-rule backend, usable offline and in tests
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBackend;

impl RuleBackend {
    pub fn new() -> Self {
        Self
    }

    /// First matching rule's token, or [`UNMATCHED_TOKEN`]
    pub fn token_for(message: &str) -> &'static str {
        RULES
            .iter()
            .find(|(pattern, _)| pattern.is_match(message))
            .map(|(_, key)| *key)
            .unwrap_or(UNMATCHED_TOKEN)
    }
}

#[async_trait]
impl ClassificationBackend for RuleBackend {
    fn name(&self) -> &str {
        "rules"
    }

    async fn label(&self, request: &ClassificationRequest<'_>) -> Result<String, ClassifierError> {
        Ok(Self::token_for(request.message).to_string())
    }
}
