//! Compiler error taxonomy
//!
//! A closed set of categories for gcc/clang diagnostics. Classifiers answer
//! with a key (`SYNTAX`, `TYPE`, ...); two sentinels cover answers outside
//! the key set and failed classifications.

use serde::{Deserialize, Serialize};

/// Error categories for aggregation and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed tokens, missing punctuation, unbalanced braces
    Syntax,
    /// Incompatible types, invalid conversions
    Type,
    /// Undefined references, duplicate symbols at link time
    Linker,
    /// Implicit, conflicting or missing declarations
    Declaration,
    /// Macro and directive problems
    Preprocessing,
    /// Allocation, pointer and lifetime misuse
    Memory,
    /// Missing or invalid initializers
    Initialization,
    /// Wrong argument count or argument types
    Parameter,
    /// Identifiers used outside their scope
    Scope,
    /// Language-standard conformance (ISO C, -std=, pedantic)
    Standard,
    /// Missing or broken headers
    Header,
    /// Identifier naming conflicts and shadowing
    Naming,
    /// Invalid operator or operand use
    Operator,
    /// Array bounds and sizeof misuse
    Size,
    /// Arithmetic or buffer overflow
    Overflow,
    /// The classifier answered with a token outside the key set
    Other,
    /// The classifier failed to answer
    Uncategorized,
}

impl ErrorCategory {
    /// Categories a classifier may answer with, in prompt order.
    pub const KEYED: [ErrorCategory; 15] = [
        Self::Syntax,
        Self::Type,
        Self::Linker,
        Self::Declaration,
        Self::Preprocessing,
        Self::Memory,
        Self::Initialization,
        Self::Parameter,
        Self::Scope,
        Self::Standard,
        Self::Header,
        Self::Naming,
        Self::Operator,
        Self::Size,
        Self::Overflow,
    ];

    /// Classifier token for this category; `None` for the sentinels.
    pub fn key(&self) -> Option<&'static str> {
        let key = match self {
            Self::Syntax => "SYNTAX",
            Self::Type => "TYPE",
            Self::Linker => "LINKER",
            Self::Declaration => "DECLARATION",
            Self::Preprocessing => "PREPROCESSING",
            Self::Memory => "MEMORY",
            Self::Initialization => "INITIALIZATION",
            Self::Parameter => "PARAMETER",
            Self::Scope => "SCOPE",
            Self::Standard => "STANDARD",
            Self::Header => "HEADER",
            Self::Naming => "NAMING",
            Self::Operator => "OPERATOR",
            Self::Size => "SIZE",
            Self::Overflow => "OVERFLOW",
            Self::Other | Self::Uncategorized => return None,
        };
        Some(key)
    }

    /// All classifier tokens, in prompt order.
    pub fn keys() -> Vec<&'static str> {
        Self::KEYED.iter().filter_map(|c| c.key()).collect()
    }

    /// Resolve an already-normalized token. Exact match only.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::KEYED.into_iter().find(|c| c.key() == Some(key))
    }

    /// Human-readable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Syntax => "Syntax Error",
            Self::Type => "Type Error",
            Self::Linker => "Linker Error",
            Self::Declaration => "Declaration Error",
            Self::Preprocessing => "Preprocessing Error",
            Self::Memory => "Memory Error",
            Self::Initialization => "Initialization Error",
            Self::Parameter => "Parameter Error",
            Self::Scope => "Scope Error",
            Self::Standard => "Standard Error",
            Self::Header => "Header Error",
            Self::Naming => "Naming Error",
            Self::Operator => "Operator Error",
            Self::Size => "Size Error",
            Self::Overflow => "Overflow Error",
            Self::Other => "Other Error",
            Self::Uncategorized => "Uncategorized Error",
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Other | Self::Uncategorized)
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
