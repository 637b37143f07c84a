//! Compiler Log Analytics Library
//!
//! Batch analysis of compiler output logs from a code-generation pipeline:
//! - Split each log into dash-rule delimited blocks
//! - Extract every `error:` / `fatal error:` / `warning:` message with context
//! - Classify each message into a closed compiler-error taxonomy
//! - Aggregate distinct files and a first example per category
//!
//! # Features
//!
//! ## Classification backends
//! - `OllamaBackend`: local model via the Ollama generate API
//! - `RuleBackend`: deterministic keyword rules, no network
//!
//! Both sit behind [`TaxonomyClassifier`], which maps answers outside the
//! taxonomy to `Other` and failures to `Uncategorized`.
//!
//! ## Reports
//! - `report.json`: counts and formatted examples keyed by category label
//! - `error_statistics.md` / `error_examples.md`: markdown renderings
//!
//! # Usage
//!
//! ```rust,ignore
//! use analytics::{CorpusConfig, CorpusDriver, RuleBackend, TaxonomyClassifier};
//!
//! let classifier = TaxonomyClassifier::new(RuleBackend::new());
//! let driver = CorpusDriver::new(classifier, CorpusConfig::default());
//! let report = driver.run(Path::new("logs")).await?;
//! for (category, files) in report.result.ranked() {
//!     println!("{category}: {files}");
//! }
//! ```

pub mod aggregate;
pub mod classifier;
pub mod config;
pub mod corpus;
pub mod error;
pub mod extraction;
pub mod histogram;
pub mod report;
pub mod taxonomy;

pub use aggregate::{AggregateEntry, Aggregator, CorpusResult, ExampleRecord};
pub use classifier::{
    ClassificationBackend, ClassificationRequest, Classifier, ClassifierError, OllamaBackend,
    RuleBackend, TaxonomyClassifier,
};
pub use config::{AnalyticsConfig, BackendKind, ClassifierConfig, CorpusConfig};
pub use corpus::{CorpusDriver, CorpusReport, FileFailure, FileSelection};
pub use error::{AnalyticsError, Result};
pub use extraction::{
    extract_occurrences, extract_occurrences_with_context, split_blocks, ContextLine,
    ContextWindow, Occurrence, Severity, Span,
};
pub use histogram::{histogram_dir, LocHistogram};
pub use report::{write_reports, ReportDocument};
pub use taxonomy::ErrorCategory;
