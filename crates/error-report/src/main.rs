mod config;

use analytics::report::write_reports;
use analytics::{histogram_dir, CorpusDriver};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Classify compiler errors found in generated-code build logs
#[derive(Parser, Debug)]
#[command(name = "error-report", author, version, about, long_about = None)]
struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a directory of compiler logs and write category reports
    Analyze(AnalyzeArgs),
    /// Bucket source files by non-blank line count
    Histogram(HistogramArgs),
}

#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Directory containing the log files
    pub log_dir: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of log files to process
    #[arg(short = 'n', long)]
    pub max_files: Option<usize>,

    /// Directory receiving the report artifacts
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Classifier backend: ollama or rules
    #[arg(long)]
    pub backend: Option<String>,

    /// Model name for the ollama backend
    #[arg(long)]
    pub model: Option<String>,

    /// Ollama server base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Classification calls in flight per file
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Context lines captured around each match
    #[arg(long)]
    pub context_lines: Option<usize>,

    /// Skip files taking longer than this many seconds
    #[arg(long)]
    pub file_timeout: Option<u64>,
}

#[derive(Args, Debug)]
struct HistogramArgs {
    /// Directory containing the source files
    src_dir: PathBuf,

    /// Source file extension
    #[arg(long, default_value = "c")]
    extension: String,

    /// Maximum number of files to count
    #[arg(short = 'n', long, default_value_t = analytics::histogram::DEFAULT_MAX_FILES)]
    max_files: usize,

    /// Ascending bucket thresholds
    #[arg(long, value_delimiter = ',', default_values_t = analytics::histogram::DEFAULT_BUCKETS)]
    buckets: Vec<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Analyze(args) => analyze(args).await,
        Command::Histogram(args) => histogram(args),
    }
}

async fn analyze(args: AnalyzeArgs) -> Result<()> {
    let start = Instant::now();
    let config = config::resolve(&args)?;
    info!(
        log_dir = %args.log_dir.display(),
        backend = %config.classifier.backend,
        max_files = config.corpus.max_files,
        "Starting analysis"
    );

    let classifier = config::build_classifier(&config.classifier)?;
    let driver = CorpusDriver::new(classifier, config.corpus.clone());
    let report = driver
        .run(&args.log_dir)
        .await
        .with_context(|| format!("Failed to analyze {}", args.log_dir.display()))?;

    write_reports(&config.output_dir, &args.log_dir, &report).with_context(|| {
        format!(
            "Failed to write reports to {}",
            config.output_dir.display()
        )
    })?;

    if report.is_empty() {
        println!(
            "\nNo errors found in {} processed file(s)",
            report.files_processed
        );
    } else {
        println!();
        for (category, files) in report.result.ranked() {
            println!("{:<24}{:>6}", category.label(), files);
        }
    }
    if report.files_skipped > 0 {
        println!("Skipped {} file(s) over the cap", report.files_skipped);
    }
    if !report.failures.is_empty() {
        println!("{} file(s) could not be processed", report.failures.len());
    }

    println!(
        "\nAnalysis completed in {:.2} minutes",
        start.elapsed().as_secs_f64() / 60.0
    );
    println!("Results saved in {}", config.output_dir.display());
    Ok(())
}

fn histogram(args: HistogramArgs) -> Result<()> {
    let histogram = histogram_dir(&args.src_dir, &args.extension, &args.buckets, args.max_files)
        .with_context(|| format!("Failed to build histogram for {}", args.src_dir.display()))?;
    println!("{}", histogram.render());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_flags() {
        let cli = Cli::try_parse_from([
            "error-report",
            "analyze",
            "logs",
            "-n",
            "5",
            "--backend",
            "rules",
            "--file-timeout",
            "30",
        ])
        .unwrap();

        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.log_dir, PathBuf::from("logs"));
                assert_eq!(args.max_files, Some(5));
                assert_eq!(args.backend.as_deref(), Some("rules"));
                assert_eq!(args.file_timeout, Some(30));
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_histogram_defaults() {
        let cli = Cli::try_parse_from(["error-report", "histogram", "src"]).unwrap();
        match cli.command {
            Command::Histogram(args) => {
                assert_eq!(args.extension, "c");
                assert_eq!(args.max_files, 1200);
                assert_eq!(args.buckets, vec![50, 100, 200, 500]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_histogram_custom_buckets() {
        let cli =
            Cli::try_parse_from(["error-report", "histogram", "src", "--buckets", "10,20"]).unwrap();
        match cli.command {
            Command::Histogram(args) => assert_eq!(args.buckets, vec![10, 20]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_log_dir_is_required() {
        assert!(Cli::try_parse_from(["error-report", "analyze"]).is_err());
    }
}
