//! Analytics configuration
//!
//! Layered as defaults → optional TOML file → `ANALYTICS_*` environment
//! variables. The CLI applies its flags on top.

use crate::error::{AnalyticsError, Result};
use crate::extraction::DEFAULT_CONTEXT_LINES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which classification backend to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Local Ollama model
    Ollama,
    /// Deterministic keyword rules
    Rules,
}

impl std::str::FromStr for BackendKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "rules" => Ok(Self::Rules),
            other => Err(AnalyticsError::config(format!(
                "unknown classifier backend '{other}' (expected 'ollama' or 'rules')"
            ))),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::Rules => write!(f, "rules"),
        }
    }
}

/// Corpus scan settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Maximum number of log files processed per run
    pub max_files: usize,
    /// Log file extension, without the dot
    pub extension: String,
    /// Context lines captured on each side of a match
    pub context_lines: usize,
    /// Classification calls in flight per file
    pub concurrency: usize,
    /// Skip a file whose processing exceeds this many seconds
    pub file_timeout_secs: Option<u64>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            max_files: 10,
            extension: "log".to_string(),
            context_lines: DEFAULT_CONTEXT_LINES,
            concurrency: 1,
            file_timeout_secs: None,
        }
    }
}

impl CorpusConfig {
    pub fn file_timeout(&self) -> Option<Duration> {
        self.file_timeout_secs.map(Duration::from_secs)
    }
}

/// Classifier backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub backend: BackendKind,
    /// Ollama server base URL
    pub base_url: String,
    pub model: String,
    /// Sampling temperature; lower is more deterministic
    pub temperature: f32,
    /// HTTP timeout per classification request
    pub request_timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Ollama,
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            temperature: 0.1,
            request_timeout_secs: 120,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub corpus: CorpusConfig,
    pub classifier: ClassifierConfig,
    /// Directory receiving report artifacts
    pub output_dir: PathBuf,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            corpus: CorpusConfig::default(),
            classifier: ClassifierConfig::default(),
            output_dir: PathBuf::from("analysis"),
        }
    }
}

impl AnalyticsConfig {
    /// Parse a TOML document; missing fields take their defaults
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&text)
    }

    /// Defaults overridden by environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from `ANALYTICS_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(n) = var("ANALYTICS_MAX_FILES") {
            self.corpus.max_files = parse_var("ANALYTICS_MAX_FILES", &n)?;
        }
        if let Some(ext) = var("ANALYTICS_EXTENSION") {
            self.corpus.extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(n) = var("ANALYTICS_CONTEXT_LINES") {
            self.corpus.context_lines = parse_var("ANALYTICS_CONTEXT_LINES", &n)?;
        }
        if let Some(n) = var("ANALYTICS_CONCURRENCY") {
            self.corpus.concurrency = parse_var("ANALYTICS_CONCURRENCY", &n)?;
        }
        if let Some(n) = var("ANALYTICS_FILE_TIMEOUT_SECS") {
            self.corpus.file_timeout_secs = Some(parse_var("ANALYTICS_FILE_TIMEOUT_SECS", &n)?);
        }
        if let Some(backend) = var("ANALYTICS_BACKEND") {
            self.classifier.backend = backend.parse()?;
        }
        if let Some(url) = var("OLLAMA_HOST") {
            self.classifier.base_url = url;
        }
        if let Some(url) = var("ANALYTICS_OLLAMA_URL") {
            self.classifier.base_url = url;
        }
        if let Some(model) = var("ANALYTICS_MODEL") {
            self.classifier.model = model;
        }
        if let Some(t) = var("ANALYTICS_TEMPERATURE") {
            self.classifier.temperature = parse_var("ANALYTICS_TEMPERATURE", &t)?;
        }
        if let Some(dir) = var("ANALYTICS_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.corpus.max_files == 0 {
            return Err(AnalyticsError::config("max_files must be at least 1"));
        }
        if self.corpus.concurrency == 0 {
            return Err(AnalyticsError::config("concurrency must be at least 1"));
        }
        if self.corpus.extension.is_empty() {
            return Err(AnalyticsError::config("extension must not be empty"));
        }
        if !(0.0..=1.0).contains(&self.classifier.temperature) {
            return Err(AnalyticsError::config(format!(
                "temperature {} is outside 0.0..=1.0",
                self.classifier.temperature
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AnalyticsError::config(format!("{name} has invalid value '{value}'")))
}
