//! Report artifacts
//!
//! Plain data handed to whatever renders the final documents: a serializable
//! [`ReportDocument`] plus markdown renderings of the statistics table and the
//! per-category examples.

use crate::corpus::{CorpusReport, FileFailure};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const REPORT_JSON: &str = "report.json";
pub const STATISTICS_MARKDOWN: &str = "error_statistics.md";
pub const EXAMPLES_MARKDOWN: &str = "error_examples.md";

/// Serializable summary of one corpus run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub generated_at: DateTime<Utc>,
    pub log_dir: PathBuf,
    pub files_processed: usize,
    pub files_skipped: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FileFailure>,
    pub occurrences: usize,
    pub elapsed_secs: f64,
    /// Category label → distinct file count
    pub counts: BTreeMap<String, usize>,
    /// Category label → formatted example
    pub examples: BTreeMap<String, String>,
}

impl ReportDocument {
    pub fn from_report(log_dir: impl Into<PathBuf>, report: &CorpusReport) -> Self {
        Self {
            generated_at: Utc::now(),
            log_dir: log_dir.into(),
            files_processed: report.files_processed,
            files_skipped: report.files_skipped,
            failures: report.failures.clone(),
            occurrences: report.occurrences,
            elapsed_secs: report.elapsed.as_secs_f64(),
            counts: report.result.count_labels(),
            examples: report.result.example_texts(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Markdown table of categories ranked by file count
pub fn render_statistics(report: &CorpusReport) -> String {
    let mut out = String::from("# Error Type Distribution\n\n");
    out.push_str("| Error Type | File Count |\n");
    out.push_str("|------------|------------|\n");
    for (category, count) in report.result.ranked() {
        out.push_str(&format!("| {} | {} |\n", category, count));
    }
    out.push_str(&format!(
        "\nFiles processed: {}, skipped by cap: {}, failed: {}\n",
        report.files_processed,
        report.files_skipped,
        report.failures.len()
    ));
    out
}

/// Markdown document with one example per ranked category
pub fn render_examples(report: &CorpusReport) -> String {
    let mut out = String::from("# Error Examples\n");
    for (category, _) in report.result.ranked() {
        if let Some(example) = report.result.examples.get(&category) {
            out.push_str(&format!("\n## {}\n\n```text\n{}\n```\n", category, example));
        }
    }
    out
}

/// Write all report artifacts into `output_dir`, creating it if needed.
/// Returns the written paths.
pub fn write_reports(
    output_dir: &Path,
    log_dir: &Path,
    report: &CorpusReport,
) -> crate::error::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let document = ReportDocument::from_report(log_dir, report);
    let artifacts = [
        (REPORT_JSON, document.to_json()?),
        (STATISTICS_MARKDOWN, render_statistics(report)),
        (EXAMPLES_MARKDOWN, render_examples(report)),
    ];

    let mut written = Vec::with_capacity(artifacts.len());
    for (name, contents) in artifacts {
        let path = output_dir.join(name);
        std::fs::write(&path, contents)?;
        written.push(path);
    }
    Ok(written)
}
