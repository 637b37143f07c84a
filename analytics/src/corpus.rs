//! Corpus driver
//!
//! Scans a flat directory of compiler logs and feeds every file through
//! split → extract → classify → merge. One bad file never stops the run: read,
//! decode and timeout failures are logged, recorded and skipped.
//!
//! Classification calls for one file may run concurrently, but merges happen
//! afterwards on the driver in file → block → match order, so the first-wins
//! examples are stable for a deterministic classifier.

use crate::aggregate::{Aggregator, CorpusResult};
use crate::classifier::Classifier;
use crate::config::CorpusConfig;
use crate::error::{AnalyticsError, Result};
use crate::extraction::{extract_occurrences_with_context, split_blocks, Occurrence};
use crate::taxonomy::ErrorCategory;
use futures::stream::{self, StreamExt};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// A file that was skipped because it could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub file: String,
    pub reason: String,
}

/// Log files selected for a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    /// Files to process, in listing order
    pub files: Vec<PathBuf>,
    /// Matching files left out by the cap
    pub skipped: usize,
}

/// Outcome of one corpus scan
#[derive(Debug, Clone)]
pub struct CorpusReport {
    pub result: CorpusResult,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub failures: Vec<FileFailure>,
    /// Occurrences classified and merged
    pub occurrences: usize,
    pub elapsed: Duration,
}

impl CorpusReport {
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }
}

/// Drives a corpus scan with a given classifier
pub struct CorpusDriver<C> {
    classifier: C,
    config: CorpusConfig,
}

impl<C: Classifier> CorpusDriver<C> {
    pub fn new(classifier: C, config: CorpusConfig) -> Self {
        Self { classifier, config }
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    /// List log files in `dir`, sorted by name, truncated to the configured cap.
    ///
    /// Fails only when the directory itself is missing or unreadable.
    pub fn select_files(&self, dir: &Path) -> Result<FileSelection> {
        let metadata =
            std::fs::metadata(dir).map_err(|e| AnalyticsError::input_directory(dir, e))?;
        if !metadata.is_dir() {
            return Err(AnalyticsError::input_directory(
                dir,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            ));
        }
        std::fs::read_dir(dir).map_err(|e| AnalyticsError::input_directory(dir, e))?;

        let walker = WalkBuilder::new(dir)
            .max_depth(Some(1))
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(self.config.extension.as_str())
            {
                files.push(path.to_path_buf());
            }
        }

        let skipped = files.len().saturating_sub(self.config.max_files);
        files.truncate(self.config.max_files);
        Ok(FileSelection { files, skipped })
    }

    /// Scan `dir` and aggregate every occurrence found
    pub async fn run(&self, dir: &Path) -> Result<CorpusReport> {
        let start = Instant::now();
        let selection = self.select_files(dir)?;
        let total = selection.files.len();

        if selection.skipped > 0 {
            warn!(
                processing = total,
                skipped = selection.skipped,
                max_files = self.config.max_files,
                "More log files than the cap; processing only the first files"
            );
        }
        info!(dir = %dir.display(), files = total, "Processing log files");

        let mut aggregator = Aggregator::new();
        let mut failures = Vec::new();
        let mut occurrences = 0;

        for (index, path) in selection.files.iter().enumerate() {
            let name = display_name(path);
            match self.process_file_bounded(path, &name).await {
                Ok(classified) => {
                    occurrences += classified.len();
                    for (category, occurrence) in &classified {
                        aggregator.merge_occurrence(*category, occurrence);
                    }
                    info!(
                        file = %name,
                        index = index + 1,
                        total,
                        occurrences = classified.len(),
                        categories = aggregator.len(),
                        "Processed file"
                    );
                }
                Err(reason) => {
                    warn!(file = %name, %reason, "Skipping file");
                    failures.push(FileFailure { file: name, reason });
                }
            }
        }

        let result = aggregator.snapshot();
        let elapsed = start.elapsed();
        info!(
            categories = result.counts.len(),
            occurrences,
            failures = failures.len(),
            elapsed_secs = elapsed.as_secs_f64(),
            "Corpus analysis complete"
        );

        Ok(CorpusReport {
            result,
            files_processed: total - failures.len(),
            files_skipped: selection.skipped,
            failures,
            occurrences,
            elapsed,
        })
    }

    async fn process_file_bounded(
        &self,
        path: &Path,
        name: &str,
    ) -> std::result::Result<Vec<(ErrorCategory, Occurrence)>, String> {
        match self.config.file_timeout() {
            Some(limit) => tokio::time::timeout(limit, self.process_file(path, name))
                .await
                .unwrap_or_else(|_| Err(format!("timed out after {limit:?}"))),
            None => self.process_file(path, name).await,
        }
    }

    /// Read, extract and classify one file. Nothing is merged here.
    async fn process_file(
        &self,
        path: &Path,
        name: &str,
    ) -> std::result::Result<Vec<(ErrorCategory, Occurrence)>, String> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| e.to_string())?;
        let found = self.extract(&content, name);
        debug!(file = %name, occurrences = found.len(), "Extracted occurrences");
        Ok(self.classify_all(found).await)
    }

    /// All occurrences of one file's content, in block then match order
    pub fn extract(&self, content: &str, file: &str) -> Vec<Occurrence> {
        split_blocks(content)
            .into_iter()
            .flat_map(|block| {
                extract_occurrences_with_context(block, file, self.config.context_lines)
            })
            .collect()
    }

    /// Classify with bounded concurrency, preserving input order
    async fn classify_all(&self, found: Vec<Occurrence>) -> Vec<(ErrorCategory, Occurrence)> {
        stream::iter(found)
            .map(|occurrence| async move {
                let category = self.classifier.classify(&occurrence.message).await;
                (category, occurrence)
            })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
