use std::path::Path;

use mupdf::text_page::TextBlockType;
use mupdf::{Document, MetadataName, TextPageFlags};
use serde::Serialize;

use cvtext_core::BackendError;
use cvtext_core::policy::trimmed_char_count;
use cvtext_core::sections::{SectionHit, identify_sections};

use crate::text_layer::page_text;
use crate::{extraction_error, open_document};

/// Pages with more text than this get a preview in the report.
const PREVIEW_THRESHOLD: usize = 50;
const PREVIEW_LEN: usize = 100;

#[derive(Debug, Clone, Default, Serialize)]
pub struct PdfMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub producer: Option<String>,
    pub creator: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    /// 1-based page number.
    pub number: usize,
    /// Page width in points.
    pub width: f32,
    /// Page height in points.
    pub height: f32,
    /// Character count of the text layer, surrounding whitespace excluded.
    pub chars: usize,
    pub image_blocks: usize,
    pub preview: Option<String>,
}

impl PageReport {
    /// A page with images and no text is almost certainly a scan.
    pub fn looks_scanned(&self) -> bool {
        self.chars == 0 && self.image_blocks > 0
    }
}

/// Structural summary of a PDF.
#[derive(Debug, Clone, Serialize)]
pub struct PdfReport {
    pub page_count: usize,
    pub metadata: PdfMetadata,
    pub pages: Vec<PageReport>,
    /// Section headers found in the text layer.
    pub sections: Vec<SectionHit>,
}

impl PdfReport {
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.chars).sum()
    }

    pub fn has_text_layer(&self) -> bool {
        self.total_chars() > 0
    }
}

fn metadata_field(document: &Document, name: MetadataName) -> Option<String> {
    document
        .metadata(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn preview(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(PREVIEW_LEN)
        .collect()
}

/// Inspect the PDF at `path`: metadata, page geometry, text and image content.
pub fn probe_pdf(path: &Path) -> Result<PdfReport, BackendError> {
    let document = open_document(path)?;

    let metadata = PdfMetadata {
        title: metadata_field(&document, MetadataName::Title),
        author: metadata_field(&document, MetadataName::Author),
        subject: metadata_field(&document, MetadataName::Subject),
        producer: metadata_field(&document, MetadataName::Producer),
        creator: metadata_field(&document, MetadataName::Creator),
        format: metadata_field(&document, MetadataName::Format),
    };

    let mut pages = Vec::new();
    let mut full_text = String::new();

    for (idx, page_result) in document.pages().map_err(extraction_error)?.enumerate() {
        let page = page_result.map_err(extraction_error)?;
        let bounds = page.bounds().map_err(extraction_error)?;

        let image_blocks = page
            .to_text_page(TextPageFlags::PRESERVE_IMAGES)
            .map_err(extraction_error)?
            .blocks()
            .filter(|b| matches!(b.r#type(), TextBlockType::Image))
            .count();

        let text = page_text(&page)?;
        let chars = trimmed_char_count(&text);
        tracing::debug!(page = idx + 1, chars, image_blocks, "page probed");

        pages.push(PageReport {
            number: idx + 1,
            width: bounds.x1 - bounds.x0,
            height: bounds.y1 - bounds.y0,
            chars,
            image_blocks,
            preview: (chars > PREVIEW_THRESHOLD).then(|| preview(&text)),
        });
        full_text.push_str(&text);
        full_text.push('\n');
    }

    Ok(PdfReport {
        page_count: pages.len(),
        metadata,
        pages,
        sections: identify_sections(&full_text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_is_single_line_and_bounded() {
        let text = "Naam\nJan de Vries\n".repeat(20);
        let p = preview(&text);
        assert!(!p.contains('\n'));
        assert_eq!(p.chars().count(), PREVIEW_LEN);
        assert!(p.starts_with("Naam Jan de Vries Naam"));
    }

    #[test]
    fn scanned_page_detection() {
        let page = PageReport {
            number: 1,
            width: 595.0,
            height: 842.0,
            chars: 0,
            image_blocks: 1,
            preview: None,
        };
        assert!(page.looks_scanned());
    }
}
