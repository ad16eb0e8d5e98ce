use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

pub mod backend;
pub mod chain;
pub mod config_file;
pub mod guidance;
pub mod metrics;
pub mod mock;
pub mod name;
pub mod ocr;
pub mod output;
pub mod policy;
pub mod sections;
pub mod text;

// Re-export for convenience
pub use backend::{BackendError, BackendOutput, TextBackend};
pub use chain::{AttemptStatus, BackendAttempt, Classification, ExtractionChain, ExtractionResult};
pub use metrics::TextMetrics;
pub use name::{NameRejection, extract_name};
pub use ocr::{OcrEngine, OcrSettings, TesseractCli};
pub use policy::AcceptPolicy;

/// File formats the extraction chain knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => f.write_str("PDF"),
            Self::Docx => f.write_str("DOCX"),
        }
    }
}

/// A document to extract text from.
///
/// Only existence is validated on construction; whether the file actually
/// parses is left to the backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    path: PathBuf,
    format: DocumentFormat,
}

impl DocumentRef {
    /// Open a document, detecting its format from the file extension.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ExtractError> {
        let path = path.into();
        let format = DocumentFormat::from_path(&path)
            .ok_or_else(|| ExtractError::UnsupportedFormat(path.clone()))?;
        Self::with_format(path, format)
    }

    /// Open a document with an explicitly declared format.
    pub fn with_format(path: impl Into<PathBuf>, format: DocumentFormat) -> Result<Self, ExtractError> {
        let path = path.into();
        if !path.exists() {
            return Err(ExtractError::NotFound(path));
        }
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// The file name for display, falling back to the full path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Errors that stop a run before the extraction chain is entered.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("unsupported document format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
