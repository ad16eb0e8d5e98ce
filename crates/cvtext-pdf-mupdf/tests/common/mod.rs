//! Minimal PDF fixtures written by hand.
//!
//! Each page is A4 (595 × 842 pt) with Helvetica text placed at explicit
//! positions. A page with no text items is blank, which is what a scanned
//! page looks like to a text-layer reader.

use std::path::{Path, PathBuf};

/// A string drawn at `(x, y)` in PDF user space (origin bottom-left).
pub struct TextItem<'a> {
    pub x: f32,
    pub y: f32,
    pub text: &'a str,
}

pub fn item(x: f32, y: f32, text: &str) -> TextItem<'_> {
    TextItem { x, y, text }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

fn content_stream(items: &[TextItem<'_>]) -> String {
    items
        .iter()
        .map(|i| format!("BT /F1 12 Tf {} {} Td ({}) Tj ET\n", i.x, i.y, escape(i.text)))
        .collect()
}

/// Build a PDF with one page per entry of `pages`.
pub fn minimal_pdf(pages: &[Vec<TextItem<'_>>]) -> Vec<u8> {
    let n = pages.len();
    // 1: catalog, 2: pages, 3: font, then (page, contents) pairs.
    let page_id = |i: usize| 4 + 2 * i;
    let kids: Vec<String> = (0..n).map(|i| format!("{} 0 R", page_id(i))).collect();

    let mut objects: Vec<String> = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), n),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];
    for (i, items) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595 842] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            page_id(i) + 1
        ));
        let stream = content_stream(items);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            stream.len(),
            stream
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_at = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for off in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", off).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        )
        .as_bytes(),
    );
    out
}

pub fn write_pdf(dir: &Path, name: &str, pages: &[Vec<TextItem<'_>>]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, minimal_pdf(pages)).unwrap();
    path
}

/// A one-page résumé with a text layer comfortably above the default threshold.
pub fn text_cv(dir: &Path) -> PathBuf {
    write_pdf(
        dir,
        "_GJRoth_CV.pdf",
        &[vec![
            item(72.0, 770.0, "Personalia"),
            item(72.0, 750.0, "Naam: Gert Jan Roth"),
            item(72.0, 720.0, "Werkervaring"),
            item(72.0, 700.0, "Omgevingsmanager bij Rijkswaterstaat, 2019 - 2023"),
            item(72.0, 670.0, "Opleiding"),
            item(72.0, 650.0, "Technische Bestuurskunde, TU Delft"),
        ]],
    )
}

/// Two blank pages: no text layer at all.
pub fn blank_pdf(dir: &Path) -> PathBuf {
    write_pdf(dir, "scan.pdf", &[vec![], vec![]])
}
