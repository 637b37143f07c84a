//! Category-keyed aggregation
//!
//! The aggregator is owned by a single corpus run. Each category keeps the set
//! of distinct files that produced it and the first example observed. Later
//! examples for the same category are discarded.

use crate::extraction::{ContextWindow, Occurrence, Severity};
use crate::taxonomy::ErrorCategory;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Representative occurrence kept for a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleRecord {
    pub file: String,
    pub severity: Severity,
    pub message: String,
    pub context: ContextWindow,
}

impl ExampleRecord {
    pub fn from_occurrence(occurrence: &Occurrence) -> Self {
        Self {
            file: occurrence.file.clone(),
            severity: occurrence.severity(),
            message: occurrence.message.clone(),
            context: occurrence.context.clone(),
        }
    }
}

impl std::fmt::Display for ExampleRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "File: {}\nContext:\n{}\n{} Message: {}",
            self.file, self.context, self.severity, self.message
        )
    }
}

/// Per-category state
#[derive(Debug, Clone, Default)]
pub struct AggregateEntry {
    files: BTreeSet<String>,
    example: Option<ExampleRecord>,
}

impl AggregateEntry {
    pub fn files(&self) -> &BTreeSet<String> {
        &self.files
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn example(&self) -> Option<&ExampleRecord> {
        self.example.as_ref()
    }
}

/// Running per-category statistics for one corpus scan
#[derive(Debug, Default)]
pub struct Aggregator {
    entries: BTreeMap<ErrorCategory, AggregateEntry>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `file` under `category`, keeping `example` only if the category
    /// has none yet. Returns whether the example was stored.
    pub fn merge(&mut self, category: ErrorCategory, file: &str, example: ExampleRecord) -> bool {
        self.merge_with(category, file, || example)
    }

    /// Like [`merge`](Self::merge), building the example only when it will be kept.
    pub fn merge_with(
        &mut self,
        category: ErrorCategory,
        file: &str,
        example: impl FnOnce() -> ExampleRecord,
    ) -> bool {
        let entry = self.entries.entry(category).or_default();
        if !entry.files.contains(file) {
            entry.files.insert(file.to_string());
        }
        if entry.example.is_some() {
            return false;
        }
        entry.example = Some(example());
        true
    }

    /// Merge one classified occurrence
    pub fn merge_occurrence(&mut self, category: ErrorCategory, occurrence: &Occurrence) -> bool {
        self.merge_with(category, &occurrence.file, || {
            ExampleRecord::from_occurrence(occurrence)
        })
    }

    pub fn entry(&self, category: ErrorCategory) -> Option<&AggregateEntry> {
        self.entries.get(&category)
    }

    /// Number of categories seen so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current counts and examples. Does not mutate; usable mid-run.
    pub fn snapshot(&self) -> CorpusResult {
        let counts = self
            .entries
            .iter()
            .map(|(category, entry)| (*category, entry.file_count()))
            .collect();
        let examples = self
            .entries
            .iter()
            .filter_map(|(category, entry)| entry.example.clone().map(|e| (*category, e)))
            .collect();
        CorpusResult { counts, examples }
    }
}

/// Final per-category file counts and examples
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusResult {
    pub counts: BTreeMap<ErrorCategory, usize>,
    pub examples: BTreeMap<ErrorCategory, ExampleRecord>,
}

impl CorpusResult {
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty() && self.examples.is_empty()
    }

    /// Categories by file count descending, ties in taxonomy order
    pub fn ranked(&self) -> Vec<(ErrorCategory, usize)> {
        let mut ranked: Vec<_> = self.counts.iter().map(|(c, n)| (*c, *n)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }

    /// Counts keyed by category label
    pub fn count_labels(&self) -> BTreeMap<String, usize> {
        self.counts
            .iter()
            .map(|(category, count)| (category.label().to_string(), *count))
            .collect()
    }

    /// Formatted examples keyed by category label
    pub fn example_texts(&self) -> BTreeMap<String, String> {
        self.examples
            .iter()
            .map(|(category, example)| (category.label().to_string(), example.to_string()))
            .collect()
    }
}
