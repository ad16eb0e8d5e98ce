use mupdf::{Page, TextPageFlags};

use cvtext_core::text::{expand_ligatures, tidy_page};
use cvtext_core::{BackendError, BackendOutput, DocumentRef, TextBackend};

use crate::{extraction_error, open_document};

/// Reads the embedded text layer, block by block and line by line.
///
/// Image-only pages come back as empty strings; the chain decides whether the
/// total is enough.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfTextBackend;

impl MupdfTextBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Text of one page in reading order as MuPDF groups it.
pub(crate) fn page_text(page: &Page) -> Result<String, BackendError> {
    let text_page = page
        .to_text_page(TextPageFlags::empty())
        .map_err(extraction_error)?;

    let mut text = String::new();
    for block in text_page.blocks() {
        for line in block.lines() {
            let line_text: String = line
                .chars()
                .map(|c| c.char().unwrap_or('\u{FFFD}'))
                .collect();
            text.push_str(&line_text);
            text.push('\n');
        }
    }
    Ok(tidy_page(&expand_ligatures(&text)))
}

impl TextBackend for MupdfTextBackend {
    fn name(&self) -> &str {
        "text-layer"
    }

    fn extract(&self, doc: &DocumentRef) -> Result<BackendOutput, BackendError> {
        let document = open_document(doc.path())?;

        let mut pages = Vec::new();
        for (idx, page_result) in document.pages().map_err(extraction_error)?.enumerate() {
            let page = page_result.map_err(extraction_error)?;
            let text = page_text(&page)?;
            tracing::debug!(page = idx + 1, chars = text.chars().count(), "text layer page");
            pages.push(text);
        }

        let page_count = pages.len();
        Ok(BackendOutput::new(pages, page_count))
    }
}
