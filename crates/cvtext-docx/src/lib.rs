//! DOCX support for cvtext.
//!
//! A DOCX file is a zip package; the text and layout we care about all live in
//! `word/document.xml`, which is read with a streaming XML parser.

use thiserror::Error;

use cvtext_core::{BackendError, BackendOutput, DocumentRef, TextBackend};

pub mod model;
pub mod probe;
pub mod reader;

pub use model::DocxBody;
pub use probe::{DocxReport, probe_docx};
pub use reader::{parse_document_xml, read_docx};

#[derive(Error, Debug)]
pub enum DocxError {
    #[error("not a valid DOCX package: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("DOCX package has no {0} part")]
    MissingPart(&'static str),
    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DocxError> for BackendError {
    fn from(e: DocxError) -> Self {
        match e {
            DocxError::Io(io) => BackendError::Io(io),
            DocxError::Zip(_) | DocxError::MissingPart(_) => BackendError::OpenError(e.to_string()),
            DocxError::Xml(_) => BackendError::ExtractionError(e.to_string()),
        }
    }
}

/// Text of the DOCX body: paragraphs first, then table rows as `a | b | c`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxBackend;

impl DocxBackend {
    pub fn new() -> Self {
        Self
    }
}

impl TextBackend for DocxBackend {
    fn name(&self) -> &str {
        "docx"
    }

    fn extract(&self, doc: &DocumentRef) -> Result<BackendOutput, BackendError> {
        let body = read_docx(doc.path())?;
        let blocks = body.text_blocks();
        tracing::debug!(
            paragraphs = body.paragraphs().count(),
            tables = body.tables().count(),
            blocks = blocks.len(),
            "docx body read"
        );
        // A DOCX has no fixed pagination; report it as a single page.
        Ok(BackendOutput::new(blocks, 1))
    }
}
