use thiserror::Error;

use crate::DocumentRef;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text produced by a single backend call.
///
/// `pages` holds one entry per PDF page or per DOCX block; the chain joins
/// them with newlines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendOutput {
    pub pages: Vec<String>,
    pub page_count: usize,
}

impl BackendOutput {
    pub fn new(pages: Vec<String>, page_count: usize) -> Self {
        Self { pages, page_count }
    }

    pub fn text(&self) -> String {
        self.pages.join("\n")
    }
}

/// Trait for text extraction backends.
///
/// Implementors provide one extraction technique; ordering, acceptance and
/// fallback live in [`crate::chain::ExtractionChain`].
pub trait TextBackend: Send + Sync {
    /// Short identifier shown in logs and reports (e.g. "text-layer").
    fn name(&self) -> &str;

    /// Report whether the backend can run at all (external tools present).
    fn availability(&self) -> Result<(), BackendError> {
        Ok(())
    }

    /// Extract the text content of `doc`.
    fn extract(&self, doc: &DocumentRef) -> Result<BackendOutput, BackendError>;
}

/// Shared backends, so callers can keep a handle after building a chain.
impl<T: TextBackend> TextBackend for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn availability(&self) -> Result<(), BackendError> {
        (**self).availability()
    }

    fn extract(&self, doc: &DocumentRef) -> Result<BackendOutput, BackendError> {
        (**self).extract(doc)
    }
}
