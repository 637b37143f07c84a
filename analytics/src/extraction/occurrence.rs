//! Error and warning extraction from a single log block
//!
//! A message starts right after its marker and runs to the first line break,
//! the next marker, or the end of the block, whichever comes first. Several
//! markers on one physical line therefore produce one message each.

use crate::extraction::context::{ContextWindow, DEFAULT_CONTEXT_LINES};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// All markers in one alternation. Leftmost-first matching picks
/// `fatal error:` over the `error:` it contains.
static MARKER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"fatal error:|error:|warning:").unwrap());

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "Error"),
            Self::Warning => write!(f, "Warning"),
        }
    }
}

/// The literal marker that introduced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Error,
    FatalError,
    Warning,
}

impl MarkerKind {
    fn from_marker(marker: &str) -> Self {
        match marker {
            "fatal error:" => Self::FatalError,
            "warning:" => Self::Warning,
            _ => Self::Error,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Error | Self::FatalError => Severity::Error,
            Self::Warning => Severity::Warning,
        }
    }
}

/// Byte range of a match inside its block: marker start to message end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A single extracted error or warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Which marker introduced the message
    pub marker: MarkerKind,
    /// Trimmed message text following the marker
    pub message: String,
    /// Log file the block came from
    pub file: String,
    /// Match span within the block
    pub span: Span,
    /// Surrounding lines with the matched line marked
    pub context: ContextWindow,
}

impl Occurrence {
    pub fn severity(&self) -> Severity {
        self.marker.severity()
    }

    pub fn is_fatal(&self) -> bool {
        self.marker == MarkerKind::FatalError
    }
}

/// Extract occurrences using the default context size.
pub fn extract_occurrences(block: &str, file: &str) -> Vec<Occurrence> {
    extract_occurrences_with_context(block, file, DEFAULT_CONTEXT_LINES)
}

/// Extract every error/warning occurrence from a block.
///
/// Errors (including fatal errors) come first in position order, followed by
/// warnings in position order. Markers without trailing text are dropped.
pub fn extract_occurrences_with_context(
    block: &str,
    file: &str,
    context_lines: usize,
) -> Vec<Occurrence> {
    let markers: Vec<_> = MARKER_PATTERN.find_iter(block).collect();

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (i, marker) in markers.iter().enumerate() {
        let message_start = marker.end();
        let next_marker = markers
            .get(i + 1)
            .map(|next| next.start())
            .unwrap_or(block.len());
        let line_break = block[message_start..]
            .find('\n')
            .map(|offset| message_start + offset)
            .unwrap_or(block.len());
        let message_end = next_marker.min(line_break);

        let message = block[message_start..message_end].trim();
        if message.is_empty() {
            continue;
        }

        let span = Span {
            start: marker.start(),
            end: message_end,
        };
        let kind = MarkerKind::from_marker(marker.as_str());
        let occurrence = Occurrence {
            marker: kind,
            message: message.to_string(),
            file: file.to_string(),
            span,
            context: ContextWindow::capture(block, span, context_lines),
        };

        match kind.severity() {
            Severity::Error => errors.push(occurrence),
            Severity::Warning => warnings.push(occurrence),
        }
    }

    errors.extend(warnings);
    errors
}
