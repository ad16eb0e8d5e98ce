use cvtext_core::ocr::DEFAULT_DPI;
use cvtext_core::output::with_page_marker;
use cvtext_core::{BackendError, BackendOutput, DocumentRef, OcrEngine, TextBackend};

use crate::render::{page_image_name, render_page_png};
use crate::{extraction_error, open_document};

/// Rasterizes each page and hands the image to an [`OcrEngine`].
///
/// Pages are rendered into a temporary directory that is removed when the
/// call returns. A page whose OCR fails is logged and skipped; the call only
/// fails when no page could be recognized at all.
pub struct MupdfOcrBackend<E> {
    engine: E,
    dpi: u32,
}

impl<E: OcrEngine> MupdfOcrBackend<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            dpi: DEFAULT_DPI,
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: OcrEngine> TextBackend for MupdfOcrBackend<E> {
    fn name(&self) -> &str {
        "ocr"
    }

    fn availability(&self) -> Result<(), BackendError> {
        self.engine.availability()
    }

    fn extract(&self, doc: &DocumentRef) -> Result<BackendOutput, BackendError> {
        let document = open_document(doc.path())?;
        let scratch = tempfile::tempdir()?;

        let mut pages = Vec::new();
        let mut page_count = 0;
        let mut last_error = None;

        for (idx, page_result) in document.pages().map_err(extraction_error)?.enumerate() {
            page_count += 1;
            let page_number = idx + 1;
            let image = scratch.path().join(page_image_name(page_number));

            let recognized = page_result
                .map_err(extraction_error)
                .and_then(|page| render_page_png(&page, &image, self.dpi))
                .and_then(|()| self.engine.recognize(&image));

            match recognized {
                Ok(text) if !text.trim().is_empty() => {
                    tracing::debug!(page = page_number, chars = text.trim().chars().count(), "page recognized");
                    pages.push(with_page_marker(page_number, &text));
                }
                Ok(_) => tracing::debug!(page = page_number, "no text recognized on page"),
                Err(err) => {
                    tracing::warn!(page = page_number, engine = self.engine.name(), error = %err, "page OCR failed");
                    last_error = Some(err);
                }
            }
        }

        if pages.is_empty()
            && let Some(err) = last_error
        {
            return Err(err);
        }
        Ok(BackendOutput::new(pages, page_count))
    }
}
