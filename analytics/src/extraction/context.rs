//! Context windows around matched occurrences
//!
//! Rendering marks lines that overlap the match span with `>>> ` and indents
//! the surrounding context lines by four spaces:
//!
//! ```text
//!     main.c: In function 'main':
//! >>> main.c:4:5: error: 'foo' undeclared
//!     4 |     foo = 1;
//! ```

use crate::extraction::occurrence::Span;
use serde::{Deserialize, Serialize};

/// Lines of context captured before and after a match by default
pub const DEFAULT_CONTEXT_LINES: usize = 3;

const INSIDE_PREFIX: &str = ">>> ";
const CONTEXT_PREFIX: &str = "    ";

/// One line of a context window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextLine {
    pub text: String,
    /// Whether the line overlaps the match span
    pub inside: bool,
}

/// Ordered lines surrounding a match, clamped to the block boundaries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWindow {
    pub lines: Vec<ContextLine>,
}

impl ContextWindow {
    /// Capture up to `context_lines` lines before the line holding the span
    /// start and after the line holding the span end.
    pub fn capture(block: &str, span: Span, context_lines: usize) -> Self {
        let span_start = span.start.min(block.len());
        let span_end = span.end.clamp(span_start, block.len());

        let mut start = line_start(block, span_start);
        for _ in 0..context_lines {
            if start == 0 {
                break;
            }
            start = line_start(block, start - 1);
        }

        let mut end = line_end(block, span_end);
        for _ in 0..context_lines {
            if end >= block.len() {
                break;
            }
            end = line_end(block, end + 1);
        }

        let mut lines = Vec::new();
        let mut offset = start;
        for raw in block[start..end].split('\n') {
            let line_end = offset + raw.len();
            lines.push(ContextLine {
                text: raw.trim_end_matches('\r').to_string(),
                inside: offset < span_end && span_start <= line_end,
            });
            offset = line_end + 1;
        }

        Self { lines }
    }

    /// Lines overlapping the match span
    pub fn inside_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|line| line.inside)
            .map(|line| line.text.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render with inside lines marked
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                let prefix = if line.inside {
                    INSIDE_PREFIX
                } else {
                    CONTEXT_PREFIX
                };
                format!("{prefix}{}", line.text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Display for ContextWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Byte index where the line containing `pos` starts
fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Byte index of the line break ending the line containing `pos`, or the text length
fn line_end(text: &str, pos: usize) -> usize {
    text[pos..]
        .find('\n')
        .map(|offset| pos + offset)
        .unwrap_or(text.len())
}
