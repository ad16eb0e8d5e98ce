use mupdf::{Page, TextPageFlags};

use cvtext_core::text::expand_ligatures;
use cvtext_core::{BackendError, BackendOutput, DocumentRef, TextBackend};

use crate::{extraction_error, open_document};

/// Glyphs whose baselines differ by less than this fraction of the font size
/// share a row.
const ROW_TOLERANCE: f32 = 0.5;
/// A horizontal gap wider than this many font sizes starts a new cell.
const CELL_GAP: f32 = 2.0;

/// A positioned character, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub x0: f32,
    pub x1: f32,
    pub baseline: f32,
    pub size: f32,
}

/// Rebuilds rows and columns from glyph positions.
///
/// Two-column résumé layouts and tables come out of the plain text layer as
/// one column after the other; this backend regroups glyphs by baseline so
/// each visual row is one line, with cells joined by `" | "`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfTableBackend;

impl MupdfTableBackend {
    pub fn new() -> Self {
        Self
    }
}

fn page_glyphs(page: &Page) -> Result<Vec<Glyph>, BackendError> {
    let text_page = page
        .to_text_page(TextPageFlags::empty())
        .map_err(extraction_error)?;

    let mut glyphs = Vec::new();
    for block in text_page.blocks() {
        for line in block.lines() {
            for c in line.chars() {
                let Some(ch) = c.char() else { continue };
                let quad = c.quad();
                let origin = c.origin();
                glyphs.push(Glyph {
                    ch,
                    x0: quad.ul.x.min(quad.ll.x),
                    x1: quad.ur.x.max(quad.lr.x),
                    baseline: origin.y,
                    size: c.size(),
                });
            }
        }
    }
    Ok(glyphs)
}

/// Group glyphs into rows by baseline and split each row into cells at wide
/// horizontal gaps.
pub fn layout_rows(mut glyphs: Vec<Glyph>) -> Vec<String> {
    glyphs.sort_by(|a, b| a.baseline.total_cmp(&b.baseline).then(a.x0.total_cmp(&b.x0)));

    let mut rows: Vec<Vec<Glyph>> = Vec::new();
    for glyph in glyphs {
        match rows.last_mut() {
            Some(row)
                if (glyph.baseline - row[0].baseline).abs()
                    <= ROW_TOLERANCE * glyph.size.max(row[0].size) =>
            {
                row.push(glyph)
            }
            _ => rows.push(vec![glyph]),
        }
    }

    rows.into_iter()
        .filter_map(|mut row| {
            row.sort_by(|a, b| a.x0.total_cmp(&b.x0));
            let line = join_cells(&row);
            (!line.is_empty()).then_some(line)
        })
        .collect()
}

fn join_cells(row: &[Glyph]) -> String {
    let mut cells: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut right_edge: Option<f32> = None;

    for glyph in row {
        if let Some(edge) = right_edge
            && glyph.x0 - edge > CELL_GAP * glyph.size
        {
            cells.push(std::mem::take(&mut current));
        }
        current.push(glyph.ch);
        if !glyph.ch.is_whitespace() {
            right_edge = Some(glyph.x1);
        }
    }
    cells.push(current);

    cells
        .iter()
        .map(|c| c.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

impl TextBackend for MupdfTableBackend {
    fn name(&self) -> &str {
        "table-aware"
    }

    fn extract(&self, doc: &DocumentRef) -> Result<BackendOutput, BackendError> {
        let document = open_document(doc.path())?;

        let mut pages = Vec::new();
        for (idx, page_result) in document.pages().map_err(extraction_error)?.enumerate() {
            let page = page_result.map_err(extraction_error)?;
            let rows = layout_rows(page_glyphs(&page)?);
            tracing::debug!(page = idx + 1, rows = rows.len(), "table layout page");
            pages.push(expand_ligatures(&rows.join("\n")));
        }

        let page_count = pages.len();
        Ok(BackendOutput::new(pages, page_count))
    }
}
