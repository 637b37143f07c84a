//! Configuration resolution and classifier selection for the CLI

use crate::AnalyzeArgs;
use analytics::{
    AnalyticsConfig, BackendKind, Classifier, ClassifierConfig, OllamaBackend, RuleBackend,
    TaxonomyClassifier,
};
use anyhow::{Context, Result};
use tracing::info;

/// Build the effective configuration: file, then environment, then flags.
pub fn resolve(args: &AnalyzeArgs) -> Result<AnalyticsConfig> {
    let mut config = match &args.config {
        Some(path) => AnalyticsConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalyticsConfig::default(),
    };
    config
        .apply_env()
        .context("Invalid ANALYTICS_* environment variable")?;
    apply_flags(&mut config, args)?;
    config.validate()?;
    Ok(config)
}

/// Command-line flags win over every other source
fn apply_flags(config: &mut AnalyticsConfig, args: &AnalyzeArgs) -> Result<()> {
    if let Some(n) = args.max_files {
        config.corpus.max_files = n;
    }
    if let Some(dir) = &args.output {
        config.output_dir = dir.clone();
    }
    if let Some(backend) = &args.backend {
        config.classifier.backend = backend.parse::<BackendKind>()?;
    }
    if let Some(model) = &args.model {
        config.classifier.model = model.clone();
    }
    if let Some(url) = &args.base_url {
        config.classifier.base_url = url.clone();
    }
    if let Some(n) = args.concurrency {
        config.corpus.concurrency = n;
    }
    if let Some(k) = args.context_lines {
        config.corpus.context_lines = k;
    }
    if let Some(secs) = args.file_timeout {
        config.corpus.file_timeout_secs = Some(secs);
    }
    Ok(())
}

/// Classifier for the configured backend
pub fn build_classifier(config: &ClassifierConfig) -> Result<Box<dyn Classifier>> {
    let classifier: Box<dyn Classifier> = match config.backend {
        BackendKind::Ollama => {
            let backend = OllamaBackend::new(config)?;
            info!(
                endpoint = backend.endpoint(),
                model = backend.model(),
                "Using Ollama classifier"
            );
            Box::new(TaxonomyClassifier::new(backend))
        }
        BackendKind::Rules => {
            info!("Using rule-based classifier");
            Box::new(TaxonomyClassifier::new(RuleBackend::new()))
        }
    };
    Ok(classifier)
}
