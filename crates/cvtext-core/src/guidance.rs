//! Manual-remediation instructions for documents with no extractable text.

use std::fmt;
use std::path::Path;

/// Free online OCR services suggested to the user.
pub const ONLINE_OCR_SERVICES: &[&str] = &[
    "https://www.onlineocr.net/",
    "https://www.free-online-ocr.com/",
    "https://www.ilovepdf.com/ocr-pdf",
    "https://www.sodapdf.com/ocr-pdf/",
];

pub const TESSERACT_DOWNLOAD: &str = "https://github.com/UB-Mannheim/tesseract/wiki";

const GOOGLE_DRIVE_STEPS: &[&str] = &[
    "Go to https://drive.google.com",
    "Click 'New' > 'File upload'",
    "Select the document",
    "Wait for the upload to finish",
    "Right-click the file",
    "Choose 'Open with' > 'Google Docs'",
    "Wait for OCR to finish (this can take a while)",
    "Copy all text from Google Docs",
    "Paste it into a new document or text file",
];

/// The manual-OCR instruction block for one document.
///
/// `page_count` is included when known; `page_images` lists exported page
/// images the user can feed to an OCR service.
pub struct Remediation<'a> {
    pub document: Option<&'a Path>,
    pub page_count: Option<usize>,
    pub page_images: &'a [&'a Path],
}

impl fmt::Display for Remediation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = "=".repeat(60);

        writeln!(f, "{}", sep)?;
        writeln!(f, "MANUAL TEXT EXTRACTION REQUIRED")?;
        writeln!(f, "{}", sep)?;
        if let Some(doc) = self.document {
            writeln!(f, "Document: {}", doc.display())?;
        }
        writeln!(f, "Status: document contains only images (no selectable text)")?;
        if let Some(pages) = self.page_count {
            writeln!(f, "Pages: {}", pages)?;
        }
        writeln!(f)?;

        writeln!(f, "1. Google Drive (recommended):")?;
        writeln!(f, "   - Upload the PDF to Google Drive")?;
        writeln!(f, "   - Open it with Google Docs, which runs OCR automatically")?;
        writeln!(f, "   - Copy the text")?;
        writeln!(f)?;
        writeln!(f, "2. Microsoft OneNote:")?;
        writeln!(f, "   - Insert > File printout > select the document")?;
        writeln!(f, "   - Right-click the printout and copy text from the picture")?;
        writeln!(f)?;
        writeln!(f, "3. Online OCR services:")?;
        for url in ONLINE_OCR_SERVICES {
            writeln!(f, "   - {}", url)?;
        }
        writeln!(f)?;
        writeln!(f, "4. Tesseract OCR:")?;
        writeln!(f, "   - Download from {}", TESSERACT_DOWNLOAD)?;
        writeln!(f, "   - Install it with the Dutch language pack and add it to PATH")?;
        writeln!(f, "   - Run the extraction again")?;

        if !self.page_images.is_empty() {
            writeln!(f)?;
            writeln!(f, "Page images ready for OCR:")?;
            for (i, img) in self.page_images.iter().enumerate() {
                writeln!(f, "   {}. {}", i + 1, img.display())?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Step by step, Google Drive:")?;
        for (i, step) in GOOGLE_DRIVE_STEPS.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, step)?;
        }
        writeln!(f, "{}", sep)
    }
}

/// Build the instruction block for `document` as a string.
pub fn remediation_text(document: Option<&Path>, page_count: Option<usize>, page_images: &[&Path]) -> String {
    Remediation {
        document,
        page_count,
        page_images,
    }
    .to_string()
}

/// Write the instruction block to `path` as UTF-8.
pub fn write_instructions(path: &Path, text: &str) -> std::io::Result<()> {
    crate::output::write_text(path, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_every_service() {
        let text = remediation_text(Some(Path::new("scan.pdf")), Some(2), &[]);
        for url in ONLINE_OCR_SERVICES {
            assert!(text.contains(url), "missing {}", url);
        }
        assert!(text.contains("Pages: 2"));
        assert!(text.contains(TESSERACT_DOWNLOAD));
        assert!(!text.contains("Page images"));
    }

    #[test]
    fn lists_exported_images() {
        let img = Path::new("cv_images/page_01.png");
        let text = remediation_text(None, None, &[img]);
        assert!(text.contains("1. cv_images/page_01.png"));
    }

    #[test]
    fn block_is_framed_by_separators() {
        let text = remediation_text(None, None, &[]);
        let sep = "=".repeat(60);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.first(), Some(&sep.as_str()));
        assert_eq!(lines.last(), Some(&sep.as_str()));
        assert!(text.ends_with('\n'));
        assert!(!text.contains("Document:"));
    }
}
