//! End-to-end tests for the corpus driver
//!
//! These tests build throwaway log directories and run the full
//! split → extract → classify → aggregate pipeline with deterministic
//! classifiers.

use analytics::{
    extract_occurrences, extract_occurrences_with_context, split_blocks, AnalyticsError,
    Classifier, CorpusConfig, CorpusDriver, ErrorCategory, RuleBackend, Severity,
    TaxonomyClassifier,
};
use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const RULE: &str = "----------------------------------------";

/// Keyword stub: scope → Scope, unused → Declaration, anything else → Syntax
struct StubClassifier {
    calls: AtomicUsize,
}

impl StubClassifier {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Classifier for StubClassifier {
    async fn classify(&self, message: &str) -> ErrorCategory {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if message.contains("scope") {
            ErrorCategory::Scope
        } else if message.contains("unused") {
            ErrorCategory::Declaration
        } else {
            ErrorCategory::Syntax
        }
    }
}

/// Sleeps longer for earlier messages so completions arrive out of order
struct JitteryClassifier;

#[async_trait]
impl Classifier for JitteryClassifier {
    async fn classify(&self, message: &str) -> ErrorCategory {
        let delay = 40u64.saturating_sub(message.len() as u64 % 40);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        ErrorCategory::Syntax
    }
}

/// Never answers messages mentioning "hang"
struct HangingClassifier;

#[async_trait]
impl Classifier for HangingClassifier {
    async fn classify(&self, message: &str) -> ErrorCategory {
        if message.contains("hang") {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        ErrorCategory::Syntax
    }
}

fn config(max_files: usize) -> CorpusConfig {
    CorpusConfig {
        max_files,
        ..Default::default()
    }
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_two_blocks_yield_error_and_warning() {
    let content = format!(
        "error: 'foo' was not declared in this scope\n{RULE}\nwarning: unused variable 'x'"
    );

    let blocks = split_blocks(&content);
    assert_eq!(blocks.len(), 2);

    let first = extract_occurrences(blocks[0], "gen.log");
    let second = extract_occurrences(blocks[1], "gen.log");

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].severity(), Severity::Error);
    assert_eq!(first[0].message, "'foo' was not declared in this scope");
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].severity(), Severity::Warning);
    assert_eq!(second[0].message, "unused variable 'x'");
}

#[test]
fn test_context_width_is_configurable() {
    let block = "a\nb\nerror: x\nc\nd";

    let narrow = extract_occurrences_with_context(block, "gen.log", 1);
    assert_eq!(narrow.len(), 1);
    assert_eq!(narrow[0].context.render(), "    b\n>>> error: x\n    c");

    let bare = extract_occurrences_with_context(block, "gen.log", 0);
    assert_eq!(bare[0].context.render(), ">>> error: x");
}

#[tokio::test]
async fn test_driver_uses_configured_context_lines() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.log", "cc -c a.c\nerror: expected ';'\nmake: *** [a.o] Error 1");

    let driver = CorpusDriver::new(
        StubClassifier::new(),
        CorpusConfig {
            context_lines: 0,
            ..config(10)
        },
    );
    let report = driver.run(dir.path()).await.unwrap();

    let example = &report.result.examples[&ErrorCategory::Syntax];
    assert_eq!(example.context.render(), ">>> error: expected ';'");
}

#[tokio::test]
async fn test_single_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "gen.log",
        &format!("error: 'foo' was not declared in this scope\n{RULE}\nwarning: unused variable 'x'"),
    );

    let driver = CorpusDriver::new(StubClassifier::new(), config(10));
    let report = driver.run(dir.path()).await.unwrap();

    assert_eq!(report.occurrences, 2);
    assert_eq!(report.files_processed, 1);
    assert_eq!(report.result.counts[&ErrorCategory::Scope], 1);
    assert_eq!(report.result.counts[&ErrorCategory::Declaration], 1);

    let example = &report.result.examples[&ErrorCategory::Declaration];
    assert_eq!(example.severity, Severity::Warning);
    assert_eq!(
        example.to_string(),
        "File: gen.log\nContext:\n>>> warning: unused variable 'x'\nWarning Message: unused variable 'x'"
    );
}

#[tokio::test]
async fn test_cap_processes_first_ten_of_fifteen() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..15 {
        write(
            dir.path(),
            &format!("run_{i:02}.log"),
            &format!("error: problem in run {i}"),
        );
    }

    let classifier = StubClassifier::new();
    let driver = CorpusDriver::new(classifier, config(10));
    let report = driver.run(dir.path()).await.unwrap();

    assert_eq!(report.files_processed, 10);
    assert_eq!(report.files_skipped, 5);
    assert_eq!(report.occurrences, 10);
    assert_eq!(report.result.counts[&ErrorCategory::Syntax], 10);
    assert_eq!(report.result.examples[&ErrorCategory::Syntax].file, "run_00.log");
}

#[tokio::test]
async fn test_directory_without_logs_is_empty_result() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "notes.txt", "error: not a log file");

    let driver = CorpusDriver::new(StubClassifier::new(), config(10));
    let report = driver.run(dir.path()).await.unwrap();

    assert!(report.is_empty());
    assert!(report.result.counts.is_empty());
    assert!(report.result.examples.is_empty());
    assert_eq!(report.files_processed, 0);
    assert_eq!(report.files_skipped, 0);
}

#[tokio::test]
async fn test_logs_without_markers_are_empty_result() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "clean.log", "gcc -Wall main.c -o main\nBuild succeeded\n");

    let driver = CorpusDriver::new(StubClassifier::new(), config(10));
    let report = driver.run(dir.path()).await.unwrap();

    assert!(report.is_empty());
    assert_eq!(report.files_processed, 1);
}

#[tokio::test]
async fn test_missing_directory_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let driver = CorpusDriver::new(StubClassifier::new(), config(10));

    let err = driver.run(&dir.path().join("absent")).await.unwrap_err();
    assert!(matches!(err, AnalyticsError::InputDirectory { .. }));
}

#[tokio::test]
async fn test_first_example_comes_from_first_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.log", "main.c:3:1: error: expected ';' before 'return'");
    write(dir.path(), "b.log", "main.c:9:2: error: expected '}' at end of input");

    let driver = CorpusDriver::new(StubClassifier::new(), config(10));
    let report = driver.run(dir.path()).await.unwrap();

    let example = &report.result.examples[&ErrorCategory::Syntax];
    assert_eq!(example.file, "a.log");
    assert_eq!(example.message, "expected ';' before 'return'");
    assert_eq!(report.result.counts[&ErrorCategory::Syntax], 2);
}

#[tokio::test]
async fn test_repeated_category_in_one_file_counts_once() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "a.log",
        &format!("error: one\nerror: two\n{RULE}\nerror: three"),
    );

    let driver = CorpusDriver::new(StubClassifier::new(), config(10));
    let report = driver.run(dir.path()).await.unwrap();

    assert_eq!(report.occurrences, 3);
    assert_eq!(report.result.counts[&ErrorCategory::Syntax], 1);
    assert_eq!(report.result.examples[&ErrorCategory::Syntax].message, "one");
}

#[tokio::test]
async fn test_concurrency_keeps_first_wins_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let content = (0..12)
        .map(|i| format!("error: {}", "x".repeat(i + 1)))
        .collect::<Vec<_>>()
        .join("\n");
    write(dir.path(), "a.log", &content);

    let sequential = CorpusDriver::new(JitteryClassifier, config(10))
        .run(dir.path())
        .await
        .unwrap();
    let concurrent = CorpusDriver::new(
        JitteryClassifier,
        CorpusConfig {
            concurrency: 8,
            ..config(10)
        },
    )
    .run(dir.path())
    .await
    .unwrap();

    assert_eq!(sequential.result, concurrent.result);
    assert_eq!(concurrent.result.examples[&ErrorCategory::Syntax].message, "x");
}

#[tokio::test]
async fn test_unreadable_file_does_not_stop_run() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.log", "error: 'n' was not declared in this scope");
    fs::write(dir.path().join("b.log"), [0xc3, 0x28, 0xa0, 0xa1]).unwrap();
    write(dir.path(), "c.log", "warning: unused parameter 'argc'");

    let driver = CorpusDriver::new(StubClassifier::new(), config(10));
    let report = driver.run(dir.path()).await.unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file, "b.log");
    assert_eq!(report.files_processed, 2);
    assert_eq!(report.result.counts[&ErrorCategory::Scope], 1);
    assert_eq!(report.result.counts[&ErrorCategory::Declaration], 1);
}

#[tokio::test]
async fn test_slow_file_is_skipped_on_timeout() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.log", "error: please hang here");
    write(dir.path(), "b.log", "error: quick one");

    let driver = CorpusDriver::new(
        HangingClassifier,
        CorpusConfig {
            file_timeout_secs: Some(1),
            ..config(10)
        },
    );
    let report = driver.run(dir.path()).await.unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file, "a.log");
    assert!(report.failures[0].reason.contains("timed out"));
    assert_eq!(report.result.counts[&ErrorCategory::Syntax], 1);
    assert_eq!(report.result.examples[&ErrorCategory::Syntax].file, "b.log");
}

#[tokio::test]
async fn test_rule_classifier_over_realistic_log() {
    let dir = tempfile::tempdir().unwrap();
    let log = format!(
        "gcc -std=c99 -Wall test_file_1.c -o test_file_1\n\
         test_file_1.c: In function 'main':\n\
         test_file_1.c:12:5: error: implicit declaration of function 'strdup'\n\
         test_file_1.c:20:1: error: expected ';' before '}}' token\n\
         test_file_1.c:7:9: warning: unused variable 'tmp'\n\
         {RULE}\n\
         /usr/bin/ld: test_file_1.o: in function `main':\n\
         test_file_1.c:(.text+0x1c): undefined reference to `sqrtf'\n\
         collect2: error: ld returned 1 exit status\n"
    );
    write(dir.path(), "test_file_1.log", &log);

    let driver = CorpusDriver::new(TaxonomyClassifier::new(RuleBackend::new()), config(10));
    let report = driver.run(dir.path()).await.unwrap();

    assert_eq!(report.occurrences, 4);
    assert_eq!(report.result.counts[&ErrorCategory::Declaration], 1);
    assert_eq!(report.result.counts[&ErrorCategory::Syntax], 1);
    assert_eq!(report.result.counts[&ErrorCategory::Linker], 1);

    let decl = &report.result.examples[&ErrorCategory::Declaration];
    assert_eq!(decl.message, "implicit declaration of function 'strdup'");
    assert!(decl
        .context
        .render()
        .contains(">>> test_file_1.c:12:5: error: implicit declaration"));
}
