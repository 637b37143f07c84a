//! Source-size histogram
//!
//! Buckets generated source files by non-blank line count. Useful next to the
//! error report to see how large the programs behind the logs were.

use crate::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

pub const DEFAULT_BUCKETS: [usize; 4] = [50, 100, 200, 500];
pub const DEFAULT_MAX_FILES: usize = 1200;

/// One histogram bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

/// Line-count distribution over a directory of source files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocHistogram {
    /// Ascending upper bounds; the final bucket is open-ended
    thresholds: Vec<usize>,
    pub buckets: Vec<Bucket>,
    /// Non-blank line count per processed file
    pub file_counts: Vec<usize>,
    pub processed: usize,
    /// Matching files beyond the cap
    pub skipped: usize,
}

impl LocHistogram {
    /// Empty histogram for ascending `thresholds`
    pub fn new(thresholds: &[usize]) -> Result<Self> {
        if thresholds.is_empty() {
            return Err(AnalyticsError::config("histogram needs at least one bucket"));
        }
        if thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(AnalyticsError::config(
                "histogram buckets must be strictly ascending",
            ));
        }

        let mut buckets = Vec::with_capacity(thresholds.len() + 1);
        for (i, threshold) in thresholds.iter().enumerate() {
            let label = match i {
                0 => format!("<{threshold}"),
                _ => format!("{}-{}", thresholds[i - 1], threshold),
            };
            buckets.push(Bucket { label, count: 0 });
        }
        let last = thresholds[thresholds.len() - 1];
        buckets.push(Bucket {
            label: format!("≥{last}"),
            count: 0,
        });

        Ok(Self {
            thresholds: thresholds.to_vec(),
            buckets,
            file_counts: Vec::new(),
            processed: 0,
            skipped: 0,
        })
    }

    pub fn thresholds(&self) -> &[usize] {
        &self.thresholds
    }

    /// Place a file with `loc` lines in the first bucket it is below
    pub fn record(&mut self, loc: usize) {
        let index = self
            .thresholds
            .iter()
            .position(|threshold| loc < *threshold)
            .unwrap_or(self.thresholds.len());
        self.buckets[index].count += 1;
        self.file_counts.push(loc);
        self.processed += 1;
    }

    pub fn total_loc(&self) -> usize {
        self.file_counts.iter().sum()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.file_counts.is_empty() {
            return None;
        }
        Some(self.total_loc() as f64 / self.file_counts.len() as f64)
    }

    pub fn smallest(&self) -> Option<usize> {
        self.file_counts.iter().copied().min()
    }

    pub fn largest(&self) -> Option<usize> {
        self.file_counts.iter().copied().max()
    }

    /// Share of recorded files in `bucket`, in percent
    pub fn percentage(&self, bucket: &Bucket) -> f64 {
        if self.processed == 0 {
            return 0.0;
        }
        bucket.count as f64 / self.processed as f64 * 100.0
    }

    /// Plain-text table followed by summary statistics
    pub fn render(&self) -> String {
        let mut out = String::from("Lines of Code | Files\n");
        for bucket in &self.buckets {
            out.push_str(&format!(
                "{:>13} | {} ({:.1}%)\n",
                bucket.label,
                bucket.count,
                self.percentage(bucket)
            ));
        }
        out.push_str(&format!(
            "\nprocessed: {}, skipped: {}\ntotal lines: {}",
            self.processed,
            self.skipped,
            self.total_loc()
        ));
        if let (Some(mean), Some(smallest), Some(largest)) =
            (self.mean(), self.smallest(), self.largest())
        {
            out.push_str(&format!(
                "\nmean: {mean:.1}, smallest: {smallest}, largest: {largest}"
            ));
        }
        out
    }
}

/// Non-blank lines in `text`
pub fn count_loc(text: &str) -> usize {
    text.lines().filter(|line| !line.trim().is_empty()).count()
}

/// Build a histogram over files with `extension` directly inside `dir`
pub fn histogram_dir(
    dir: &Path,
    extension: &str,
    thresholds: &[usize],
    max_files: usize,
) -> Result<LocHistogram> {
    let mut histogram = LocHistogram::new(thresholds)?;

    let entries = std::fs::read_dir(dir).map_err(|e| AnalyticsError::input_directory(dir, e))?;
    let mut files: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension))
        .collect();
    files.sort();

    if files.len() > max_files {
        warn!(
            found = files.len(),
            max_files, "Too many source files; processing only the first files"
        );
        histogram.skipped = files.len() - max_files;
        files.truncate(max_files);
    }

    for path in files {
        match std::fs::read_to_string(&path) {
            Ok(text) => histogram.record(count_loc(&text)),
            Err(e) => warn!(file = %path.display(), error = %e, "Skipping unreadable source file"),
        }
    }

    Ok(histogram)
}
