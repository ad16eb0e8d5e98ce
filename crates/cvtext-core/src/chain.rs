use std::time::{Duration, Instant};

use serde::Serialize;

use crate::backend::{BackendError, TextBackend};
use crate::policy::{AcceptPolicy, trimmed_char_count};
use crate::DocumentRef;

/// Outcome of a single backend within a chain run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Accepted,
    /// Produced text, but not enough to satisfy the [`AcceptPolicy`].
    BelowThreshold,
    /// Ran successfully but produced only whitespace.
    Empty,
    Unavailable,
    Failed,
    /// Not run because an earlier backend was accepted.
    Skipped,
}

/// Record of one backend in a chain run.
#[derive(Debug, Clone, Serialize)]
pub struct BackendAttempt {
    pub name: String,
    pub status: AttemptStatus,
    pub elapsed: Option<Duration>,
    /// Trimmed character count of the backend's text.
    pub chars: usize,
    pub error_message: Option<String>,
}

/// Terminal classification of a chain run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// A backend's text was accepted.
    Extracted,
    /// Some text came out, but never enough; the longest partial text is kept.
    Partial,
    /// No backend produced any text: image-only document, OCR required.
    ImageOnly,
    /// Every backend was unavailable or failed.
    AllBackendsFailed,
}

/// Result of running the chain over one document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub text: String,
    /// Backend whose text was accepted (or that produced the partial text).
    pub source: Option<String>,
    pub classification: Classification,
    pub attempts: Vec<BackendAttempt>,
    pub page_count: usize,
    pub char_count: usize,
    pub word_count: usize,
    pub elapsed: Duration,
}

impl ExtractionResult {
    pub fn success(&self) -> bool {
        self.classification == Classification::Extracted
    }

    /// Whether the caller should show manual-remediation guidance.
    pub fn needs_manual_ocr(&self) -> bool {
        !self.success()
    }

    /// Names of the backends that were actually invoked.
    pub fn attempted_backends(&self) -> impl Iterator<Item = &str> {
        self.attempts
            .iter()
            .filter(|a| a.status != AttemptStatus::Skipped)
            .map(|a| a.name.as_str())
    }
}

/// Ordered list of backends with early exit on the first acceptable text.
pub struct ExtractionChain {
    backends: Vec<Box<dyn TextBackend>>,
    policy: AcceptPolicy,
}

impl ExtractionChain {
    pub fn new(policy: AcceptPolicy) -> Self {
        Self {
            backends: Vec::new(),
            policy,
        }
    }

    /// Append a backend; backends run in insertion order.
    pub fn with_backend(mut self, backend: impl TextBackend + 'static) -> Self {
        self.backends.push(Box::new(backend));
        self
    }

    pub fn push(&mut self, backend: Box<dyn TextBackend>) {
        self.backends.push(backend);
    }

    pub fn policy(&self) -> &AcceptPolicy {
        &self.policy
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Run every backend in order until one produces acceptable text.
    ///
    /// Backend failures never abort the run. Nothing is cached: each call
    /// re-runs the extractions.
    pub fn run(&self, doc: &DocumentRef) -> ExtractionResult {
        let start = Instant::now();
        let mut attempts: Vec<BackendAttempt> = Vec::with_capacity(self.backends.len());
        let mut best_partial: Option<(String, String, usize)> = None;
        let mut page_count = 0;

        tracing::info!(
            file = %doc.file_name(),
            format = %doc.format(),
            backends = self.backends.len(),
            "starting extraction"
        );

        for (idx, backend) in self.backends.iter().enumerate() {
            let name = backend.name().to_string();

            if let Err(err) = backend.availability() {
                tracing::warn!(backend = %name, error = %err, "backend unavailable, skipping");
                attempts.push(failed_attempt(name, AttemptStatus::Unavailable, None, &err));
                continue;
            }

            tracing::info!(backend = %name, "trying backend");
            let backend_start = Instant::now();
            let output = backend.extract(doc);
            let elapsed = backend_start.elapsed();

            let output = match output {
                Ok(o) => o,
                Err(err) => {
                    let status = match err {
                        BackendError::Unavailable(_) => AttemptStatus::Unavailable,
                        _ => AttemptStatus::Failed,
                    };
                    tracing::warn!(backend = %name, error = %err, "backend failed, trying next");
                    attempts.push(failed_attempt(name, status, Some(elapsed), &err));
                    continue;
                }
            };

            page_count = page_count.max(output.page_count);
            let text = output.text();
            let chars = trimmed_char_count(&text);

            if self.policy.accepts(&text) {
                tracing::info!(backend = %name, chars, "text accepted");
                attempts.push(BackendAttempt {
                    name: name.clone(),
                    status: AttemptStatus::Accepted,
                    elapsed: Some(elapsed),
                    chars,
                    error_message: None,
                });
                for skipped in &self.backends[idx + 1..] {
                    attempts.push(BackendAttempt {
                        name: skipped.name().to_string(),
                        status: AttemptStatus::Skipped,
                        elapsed: None,
                        chars: 0,
                        error_message: None,
                    });
                }
                return finish(text, Some(name), Classification::Extracted, attempts, page_count, start);
            }

            let status = if chars == 0 {
                tracing::info!(backend = %name, "no text found");
                AttemptStatus::Empty
            } else {
                tracing::info!(
                    backend = %name,
                    chars,
                    min_chars = self.policy.min_chars,
                    "text below threshold, trying next"
                );
                AttemptStatus::BelowThreshold
            };
            attempts.push(BackendAttempt {
                name: name.clone(),
                status,
                elapsed: Some(elapsed),
                chars,
                error_message: None,
            });

            if chars > 0 && best_partial.as_ref().is_none_or(|(_, _, c)| chars > *c) {
                best_partial = Some((text, name, chars));
            }
        }

        if let Some((text, name, _)) = best_partial {
            tracing::warn!(backend = %name, "no backend met the threshold, keeping partial text");
            return finish(text, Some(name), Classification::Partial, attempts, page_count, start);
        }

        let any_ran = attempts
            .iter()
            .any(|a| matches!(a.status, AttemptStatus::Empty | AttemptStatus::BelowThreshold));
        let classification = if any_ran {
            tracing::warn!("no extractable text: image-only document, OCR required");
            Classification::ImageOnly
        } else {
            tracing::warn!("every backend was unavailable or failed");
            Classification::AllBackendsFailed
        };
        finish(String::new(), None, classification, attempts, page_count, start)
    }
}

fn failed_attempt(
    name: String,
    status: AttemptStatus,
    elapsed: Option<Duration>,
    err: &BackendError,
) -> BackendAttempt {
    BackendAttempt {
        name,
        status,
        elapsed,
        chars: 0,
        error_message: Some(err.to_string()),
    }
}

fn finish(
    text: String,
    source: Option<String>,
    classification: Classification,
    attempts: Vec<BackendAttempt>,
    page_count: usize,
    start: Instant,
) -> ExtractionResult {
    let char_count = text.chars().count();
    let word_count = text.split_whitespace().count();
    ExtractionResult {
        text,
        source,
        classification,
        attempts,
        page_count,
        char_count,
        word_count,
        elapsed: start.elapsed(),
    }
}
