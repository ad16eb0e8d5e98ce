//! MuPDF-backed PDF handling for cvtext.
//!
//! This crate is the sole AGPL island: every use of the `mupdf` bindings
//! lives here so that DOCX-only code paths do not depend on it.

use std::path::Path;

use mupdf::Document;

use cvtext_core::BackendError;

pub mod ocr;
pub mod probe;
pub mod render;
pub mod table;
pub mod text_layer;

pub use ocr::MupdfOcrBackend;
pub use probe::{PageReport, PdfMetadata, PdfReport, probe_pdf};
pub use render::render_pages;
pub use table::MupdfTableBackend;
pub use text_layer::MupdfTextBackend;

/// Open a PDF with MuPDF, mapping failures to [`BackendError::OpenError`].
pub(crate) fn open_document(path: &Path) -> Result<Document, BackendError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;
    Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))
}

pub(crate) fn extraction_error(e: mupdf::Error) -> BackendError {
    BackendError::ExtractionError(e.to_string())
}
