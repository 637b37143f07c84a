//! Error message classification
//!
//! The engine only ever sees [`Classifier::classify`], which maps a message to
//! exactly one [`ErrorCategory`] and never fails. [`TaxonomyClassifier`]
//! provides that contract over any [`ClassificationBackend`] (a model endpoint
//! or the deterministic rule set):
//!
//! ```text
//! message → backend.label() ──Ok(token)──→ trim + uppercase ──known──→ category
//!                 │                                 └──unknown──→ Other
//!                 └──Err / timeout──→ Uncategorized
//! ```

pub mod ollama;
pub mod rules;

use crate::taxonomy::ErrorCategory;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub use ollama::OllamaBackend;
pub use rules::RuleBackend;

/// Errors from a classification backend
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classification request failed: {0}")]
    RequestFailed(String),

    #[error("Classifier returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response parse error: {0}")]
    ParseError(String),

    #[error("Classification timed out after {0:?}")]
    Timeout(Duration),
}

/// Maps a message to one category. Implementations must not fail.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, message: &str) -> ErrorCategory;
}

#[async_trait]
impl<C: Classifier + ?Sized> Classifier for Box<C> {
    async fn classify(&self, message: &str) -> ErrorCategory {
        (**self).classify(message).await
    }
}

#[async_trait]
impl<C: Classifier + ?Sized> Classifier for Arc<C> {
    async fn classify(&self, message: &str) -> ErrorCategory {
        (**self).classify(message).await
    }
}

/// A request to label one message with a token from a closed set
#[derive(Debug, Clone)]
pub struct ClassificationRequest<'a> {
    pub message: &'a str,
    /// Tokens the backend may answer with
    pub allowed: Vec<&'static str>,
}

impl<'a> ClassificationRequest<'a> {
    pub fn new(message: &'a str) -> Self {
        Self {
            message,
            allowed: ErrorCategory::keys(),
        }
    }

    /// Instruction prompt for model backends
    pub fn prompt(&self) -> String {
        format!(
            "You are a compiler error analysis expert. Given a gcc compiler error/warning, \
             classify it into EXACTLY ONE of these categories by responding with just the category name:\n\n\
             {}\n\n\
             Rules:\n\
             - Respond with EXACTLY ONE word from the above list\n\
             - Do not add any explanation or additional text\n\
             - If unsure, prefer more specific categories over general ones\n\n\
             Error text to analyze: {}\n\n\
             Category:",
            self.allowed.join("\n"),
            self.message
        )
    }
}

/// The external labelling capability
#[async_trait]
pub trait ClassificationBackend: Send + Sync {
    /// Short name for diagnostics
    fn name(&self) -> &str;

    /// Answer with a single token, ideally one of `request.allowed`
    async fn label(&self, request: &ClassificationRequest<'_>) -> Result<String, ClassifierError>;
}

/// Normalize a backend answer before lookup: trim, then uppercase.
///
/// No other folding happens, so plurals, synonyms and trailing punctuation
/// stay unrecognized.
pub fn normalize_token(token: &str) -> String {
    token.trim().to_uppercase()
}

/// Classifier enforcing the closed taxonomy over a backend
pub struct TaxonomyClassifier<B> {
    backend: B,
    timeout: Option<Duration>,
}

impl<B: ClassificationBackend> TaxonomyClassifier<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            timeout: None,
        }
    }

    /// Bound each backend call; an elapsed call counts as a failure
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Map a backend outcome onto the taxonomy
    pub fn resolve(&self, outcome: Result<String, ClassifierError>) -> ErrorCategory {
        match outcome {
            Ok(token) => {
                let key = normalize_token(&token);
                match ErrorCategory::from_key(&key) {
                    Some(category) => category,
                    None => {
                        warn!(
                            backend = self.backend.name(),
                            token = %token.trim(),
                            "Unexpected category token, using Other"
                        );
                        ErrorCategory::Other
                    }
                }
            }
            Err(e) => {
                warn!(
                    backend = self.backend.name(),
                    error = %e,
                    "Classification failed, using Uncategorized"
                );
                ErrorCategory::Uncategorized
            }
        }
    }

    async fn call_backend(&self, request: &ClassificationRequest<'_>) -> Result<String, ClassifierError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.backend.label(request))
                .await
                .unwrap_or(Err(ClassifierError::Timeout(limit))),
            None => self.backend.label(request).await,
        }
    }
}

#[async_trait]
impl<B: ClassificationBackend> Classifier for TaxonomyClassifier<B> {
    async fn classify(&self, message: &str) -> ErrorCategory {
        let request = ClassificationRequest::new(message);
        let category = self.resolve(self.call_backend(&request).await);
        debug!(backend = self.backend.name(), %category, "Classified message");
        category
    }
}
