use std::path::{Path, PathBuf};

use mupdf::{Colorspace, ImageFormat, Matrix, Page};

use cvtext_core::BackendError;

use crate::{extraction_error, open_document};

/// PDF user space is 72 units per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// File name for an exported page: `page_01.png`, `page_02.png`, ...
pub fn page_image_name(page_number: usize) -> String {
    format!("page_{:02}.png", page_number)
}

/// Rasterize `page` at `dpi` and save it as a PNG at `dest`.
pub(crate) fn render_page_png(page: &Page, dest: &Path, dpi: u32) -> Result<(), BackendError> {
    let scale = dpi as f32 / POINTS_PER_INCH;
    let pixmap = page
        .to_pixmap(&Matrix::new_scale(scale, scale), &Colorspace::device_rgb(), false, true)
        .map_err(extraction_error)?;
    let dest_str = dest
        .to_str()
        .ok_or_else(|| BackendError::ExtractionError("invalid output path encoding".into()))?;
    pixmap
        .save_as(dest_str, ImageFormat::PNG)
        .map_err(extraction_error)
}

/// Export every page of the PDF at `path` to `out_dir` as numbered PNGs.
///
/// Returns the written files in page order.
pub fn render_pages(path: &Path, out_dir: &Path, dpi: u32) -> Result<Vec<PathBuf>, BackendError> {
    let document = open_document(path)?;
    std::fs::create_dir_all(out_dir)?;

    let mut written = Vec::new();
    for (idx, page_result) in document.pages().map_err(extraction_error)?.enumerate() {
        let page = page_result.map_err(extraction_error)?;
        let dest = out_dir.join(page_image_name(idx + 1));
        render_page_png(&page, &dest, dpi)?;
        tracing::info!(page = idx + 1, path = %dest.display(), "page exported");
        written.push(dest);
    }
    Ok(written)
}
