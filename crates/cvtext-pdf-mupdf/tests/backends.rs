mod common;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use cvtext_core::{
    AcceptPolicy, BackendError, Classification, DocumentRef, ExtractionChain, OcrEngine,
    TextBackend,
};
use cvtext_pdf_mupdf::{MupdfOcrBackend, MupdfTableBackend, MupdfTextBackend, probe_pdf, render_pages};

use common::{blank_pdf, item, text_cv, write_pdf};

/// Stands in for tesseract: answers with fixed text and records each image.
struct FakeOcr {
    reply: Result<&'static str, &'static str>,
    calls: AtomicUsize,
}

impl FakeOcr {
    fn answering(text: &'static str) -> Self {
        Self {
            reply: Ok(text),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing(message: &'static str) -> Self {
        Self {
            reply: Err(message),
            calls: AtomicUsize::new(0),
        }
    }
}

impl OcrEngine for FakeOcr {
    fn name(&self) -> &str {
        "fake"
    }

    fn availability(&self) -> Result<(), BackendError> {
        Ok(())
    }

    fn recognize(&self, image: &Path) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(image.exists(), "page image was not rendered");
        self.reply
            .map(str::to_string)
            .map_err(|m| BackendError::ExtractionError(m.to_string()))
    }
}

struct MissingOcr;

impl OcrEngine for MissingOcr {
    fn name(&self) -> &str {
        "missing"
    }

    fn availability(&self) -> Result<(), BackendError> {
        Err(BackendError::Unavailable("tesseract not installed".into()))
    }

    fn recognize(&self, _image: &Path) -> Result<String, BackendError> {
        unreachable!("availability failed")
    }
}

#[test]
fn text_layer_reads_native_text() {
    let dir = tempfile::tempdir().unwrap();
    let doc = DocumentRef::open(text_cv(dir.path())).unwrap();

    let output = MupdfTextBackend::new().extract(&doc).unwrap();
    assert_eq!(output.page_count, 1);
    let text = output.text();
    assert!(text.contains("Naam: Gert Jan Roth"));
    assert!(text.contains("Technische Bestuurskunde"));
}

#[test]
fn text_layer_of_blank_pages_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let doc = DocumentRef::open(blank_pdf(dir.path())).unwrap();

    let output = MupdfTextBackend::new().extract(&doc).unwrap();
    assert_eq!(output.page_count, 2);
    assert!(output.text().trim().is_empty());
}

#[test]
fn corrupt_pdf_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"this is not a pdf").unwrap();
    let doc = DocumentRef::open(&path).unwrap();

    assert!(MupdfTextBackend::new().extract(&doc).is_err());
}

#[test]
fn table_backend_keeps_columns_on_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(
        dir.path(),
        "table.pdf",
        &[vec![
            item(72.0, 700.0, "Periode"),
            item(300.0, 700.0, "Functie"),
            item(72.0, 680.0, "2019 - 2023"),
            item(300.0, 680.0, "Projectleider"),
        ]],
    );
    let doc = DocumentRef::open(&path).unwrap();

    let text = MupdfTableBackend::new().extract(&doc).unwrap().text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["Periode | Functie", "2019 - 2023 | Projectleider"]);
}

#[test]
fn ocr_backend_marks_each_page() {
    let dir = tempfile::tempdir().unwrap();
    let doc = DocumentRef::open(blank_pdf(dir.path())).unwrap();
    let backend = MupdfOcrBackend::new(FakeOcr::answering("Naam: Ray Amat\n")).with_dpi(72);

    let output = backend.extract(&doc).unwrap();
    assert_eq!(backend.engine().calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        output.pages,
        vec![
            "--- PAGE 1 ---\nNaam: Ray Amat".to_string(),
            "--- PAGE 2 ---\nNaam: Ray Amat".to_string(),
        ]
    );
}

#[test]
fn ocr_backend_fails_only_when_every_page_fails() {
    let dir = tempfile::tempdir().unwrap();
    let doc = DocumentRef::open(blank_pdf(dir.path())).unwrap();
    let backend = MupdfOcrBackend::new(FakeOcr::failing("tesseract crashed")).with_dpi(72);

    let err = backend.extract(&doc).unwrap_err();
    assert!(matches!(err, BackendError::ExtractionError(_)));
    assert_eq!(backend.engine().calls.load(Ordering::SeqCst), 2);
}

#[test]
fn scanned_pdf_falls_through_to_ocr() {
    let dir = tempfile::tempdir().unwrap();
    let doc = DocumentRef::open(blank_pdf(dir.path())).unwrap();

    let chain = ExtractionChain::new(AcceptPolicy::default())
        .with_backend(MupdfTextBackend::new())
        .with_backend(MupdfTableBackend::new())
        .with_backend(
            MupdfOcrBackend::new(FakeOcr::answering(
                "Curriculum vitae van Ray Amat, omgevingsmanager met tien jaar ervaring.",
            ))
            .with_dpi(72),
        );
    let result = chain.run(&doc);

    assert!(result.success());
    assert_eq!(result.source.as_deref(), Some("ocr"));
    assert!(result.text.starts_with("--- PAGE 1 ---\n"));
}

#[test]
fn missing_ocr_engine_leaves_scan_image_only() {
    let dir = tempfile::tempdir().unwrap();
    let doc = DocumentRef::open(blank_pdf(dir.path())).unwrap();

    let chain = ExtractionChain::new(AcceptPolicy::default())
        .with_backend(MupdfTextBackend::new())
        .with_backend(MupdfOcrBackend::new(MissingOcr));
    let result = chain.run(&doc);

    assert_eq!(result.classification, Classification::ImageOnly);
    assert_eq!(result.page_count, 2);
}

#[test]
fn probe_reports_pages_and_sections() {
    let dir = tempfile::tempdir().unwrap();
    let report = probe_pdf(&text_cv(dir.path())).unwrap();

    assert_eq!(report.page_count, 1);
    let page = &report.pages[0];
    assert_eq!((page.width, page.height), (595.0, 842.0));
    assert!(page.chars > 50);
    assert!(page.preview.is_some());
    assert_eq!(page.image_blocks, 0);

    let headers: Vec<&str> = report.sections.iter().map(|s| s.text.as_str()).collect();
    assert!(headers.contains(&"Werkervaring"));
    assert!(headers.contains(&"Opleiding"));
}

#[test]
fn probe_of_blank_pdf_has_no_text_layer() {
    let dir = tempfile::tempdir().unwrap();
    let report = probe_pdf(&blank_pdf(dir.path())).unwrap();
    assert_eq!(report.page_count, 2);
    assert!(!report.has_text_layer());
    assert!(report.pages.iter().all(|p| p.preview.is_none()));
}

#[test]
fn render_writes_numbered_pngs() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = blank_pdf(dir.path());
    let out = dir.path().join("cv_images");

    let written = render_pages(&pdf, &out, 72).unwrap();
    assert_eq!(written, vec![out.join("page_01.png"), out.join("page_02.png")]);
    let header = std::fs::read(&written[0]).unwrap();
    assert_eq!(&header[..4], b"\x89PNG");
}
