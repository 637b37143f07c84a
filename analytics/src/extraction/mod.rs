//! Log Extraction Module
//!
//! Turns raw compiler log text into discrete occurrences:
//! - Split a log file into dash-rule delimited blocks
//! - Find every `error:` / `fatal error:` / `warning:` message in a block
//! - Recover the lines surrounding each message for human review
//!
//! # Architecture
//!
//! ```text
//! log text → split_blocks → extract_occurrences → ContextWindow::capture
//!                 │                 │                      │
//!              Vec<&str>      Vec<Occurrence>        marked lines
//! ```
//!
//! Nothing here performs I/O or keeps state between calls.

pub mod blocks;
pub mod context;
pub mod occurrence;

pub use blocks::split_blocks;
pub use context::{ContextLine, ContextWindow, DEFAULT_CONTEXT_LINES};
pub use occurrence::{
    extract_occurrences, extract_occurrences_with_context, MarkerKind, Occurrence, Severity, Span,
};
