use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use cvtext_core::{
    AcceptPolicy, BackendError, DocumentFormat, DocumentRef, ExtractError, ExtractionChain,
    ExtractionResult, OcrSettings, TextMetrics,
};
use cvtext_docx::{DocxBackend, DocxError, DocxReport};

// Re-export domain types for convenience
pub use cvtext_core::{Classification, extract_name};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Input(#[from] ExtractError),
    #[error("PDF error: {0}")]
    Pdf(#[from] BackendError),
    #[error("DOCX error: {0}")]
    Docx(#[from] DocxError),
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of cvtext-ingest)")]
    NoPdfSupport,
}

/// Knobs that decide which backends go into a chain and how they judge text.
#[derive(Debug, Clone)]
pub struct ChainOptions {
    pub policy: AcceptPolicy,
    pub ocr: OcrSettings,
    pub ocr_enabled: bool,
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self {
            policy: AcceptPolicy::default(),
            ocr: OcrSettings::default(),
            ocr_enabled: true,
        }
    }
}

/// Build the backend chain for a document format.
///
/// - PDF → text layer, table-aware layout, then rasterize + tesseract
///   (requires the `pdf` feature / mupdf)
/// - DOCX → body paragraphs followed by table rows
pub fn build_chain(format: DocumentFormat, options: &ChainOptions) -> Result<ExtractionChain, IngestError> {
    let chain = ExtractionChain::new(options.policy);
    match format {
        DocumentFormat::Pdf => pdf_chain(chain, options),
        DocumentFormat::Docx => Ok(chain.with_backend(DocxBackend::new())),
    }
}

#[cfg(feature = "pdf")]
fn pdf_chain(chain: ExtractionChain, options: &ChainOptions) -> Result<ExtractionChain, IngestError> {
    use cvtext_core::TesseractCli;
    use cvtext_pdf_mupdf::{MupdfOcrBackend, MupdfTableBackend, MupdfTextBackend};

    let chain = chain
        .with_backend(MupdfTextBackend::new())
        .with_backend(MupdfTableBackend::new());
    if !options.ocr_enabled {
        tracing::info!("OCR disabled, chain stops after the text layer backends");
        return Ok(chain);
    }
    let ocr = MupdfOcrBackend::new(TesseractCli::new(&options.ocr)).with_dpi(options.ocr.dpi);
    Ok(chain.with_backend(ocr))
}

#[cfg(not(feature = "pdf"))]
fn pdf_chain(_chain: ExtractionChain, _options: &ChainOptions) -> Result<ExtractionChain, IngestError> {
    Err(IngestError::NoPdfSupport)
}

/// Run the chain that fits `doc` and return its result.
pub fn extract_document(doc: &DocumentRef, options: &ChainOptions) -> Result<ExtractionResult, IngestError> {
    let chain = build_chain(doc.format(), options)?;
    Ok(chain.run(doc))
}

/// Structure report for either supported format.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum Report {
    #[cfg(feature = "pdf")]
    Pdf(cvtext_pdf_mupdf::PdfReport),
    Docx(DocxReport),
}

pub fn probe_document(doc: &DocumentRef) -> Result<Report, IngestError> {
    match doc.format() {
        DocumentFormat::Pdf => probe_pdf(doc.path()),
        DocumentFormat::Docx => Ok(Report::Docx(cvtext_docx::probe_docx(doc.path())?)),
    }
}

#[cfg(feature = "pdf")]
fn probe_pdf(path: &Path) -> Result<Report, IngestError> {
    Ok(Report::Pdf(cvtext_pdf_mupdf::probe_pdf(path)?))
}

#[cfg(not(feature = "pdf"))]
fn probe_pdf(_path: &Path) -> Result<Report, IngestError> {
    Err(IngestError::NoPdfSupport)
}

/// Export PDF pages as `page_01.png`, `page_02.png`, ... in `out_dir`.
#[cfg(feature = "pdf")]
pub fn render_document(doc: &DocumentRef, out_dir: &Path, dpi: u32) -> Result<Vec<PathBuf>, IngestError> {
    match doc.format() {
        DocumentFormat::Pdf => Ok(cvtext_pdf_mupdf::render_pages(doc.path(), out_dir, dpi)?),
        DocumentFormat::Docx => Err(ExtractError::UnsupportedFormat(doc.path().to_path_buf()).into()),
    }
}

#[cfg(not(feature = "pdf"))]
pub fn render_document(_doc: &DocumentRef, _out_dir: &Path, _dpi: u32) -> Result<Vec<PathBuf>, IngestError> {
    Err(IngestError::NoPdfSupport)
}

/// Extraction outcome and text metrics for one side of a comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ComparedDocument {
    pub file: String,
    pub format: DocumentFormat,
    pub classification: Classification,
    pub source: Option<String>,
    pub metrics: TextMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub left: ComparedDocument,
    pub right: ComparedDocument,
}

impl Comparison {
    /// Signed character difference, right minus left.
    pub fn char_delta(&self) -> i64 {
        self.right.metrics.characters as i64 - self.left.metrics.characters as i64
    }
}

fn compared(doc: &DocumentRef, options: &ChainOptions) -> Result<ComparedDocument, IngestError> {
    let result = extract_document(doc, options)?;
    Ok(ComparedDocument {
        file: doc.file_name(),
        format: doc.format(),
        classification: result.classification,
        source: result.source.clone(),
        metrics: TextMetrics::from_text(&result.text),
    })
}

/// Extract two documents (typically the PDF and DOCX of the same résumé) and
/// put their text metrics side by side.
pub fn compare_documents(
    left: &DocumentRef,
    right: &DocumentRef,
    options: &ChainOptions,
) -> Result<Comparison, IngestError> {
    Ok(Comparison {
        left: compared(left, options)?,
        right: compared(right, options)?,
    })
}
