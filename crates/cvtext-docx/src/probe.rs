use std::path::Path;

use serde::Serialize;

use cvtext_core::sections::{SectionHit, identify_sections};

use crate::DocxError;
use crate::model::{DocxBody, Paragraph, Run, SectionLayout, Table, twips_to_inches};
use crate::reader::read_docx;

/// Rows per table included in the report.
const SAMPLE_ROWS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct PageSetup {
    pub width_in: Option<f32>,
    pub height_in: Option<f32>,
    pub margin_top_in: Option<f32>,
    pub margin_bottom_in: Option<f32>,
    pub margin_left_in: Option<f32>,
    pub margin_right_in: Option<f32>,
}

impl From<&SectionLayout> for PageSetup {
    fn from(s: &SectionLayout) -> Self {
        let inches = |v: Option<u32>| v.map(twips_to_inches);
        Self {
            width_in: inches(s.page_width),
            height_in: inches(s.page_height),
            margin_top_in: inches(s.margin_top),
            margin_bottom_in: inches(s.margin_bottom),
            margin_left_in: inches(s.margin_left),
            margin_right_in: inches(s.margin_right),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunFormat {
    pub text: String,
    pub font: Option<String>,
    pub size_pt: Option<f32>,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<String>,
}

impl From<&Run> for RunFormat {
    fn from(r: &Run) -> Self {
        Self {
            text: r.text.clone(),
            font: r.font.clone(),
            size_pt: r.size_pt,
            bold: r.bold,
            italic: r.italic,
            color: r.color.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CellReport {
    pub text: String,
    pub fill: Option<String>,
    pub runs: Vec<RunFormat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    /// 1-based table number in document order.
    pub number: usize,
    pub rows: usize,
    pub columns: usize,
    pub column_widths_in: Vec<f32>,
    /// The first few rows, cell by cell.
    pub sample: Vec<Vec<CellReport>>,
}

impl TableReport {
    fn from_table(number: usize, table: &Table) -> Self {
        let sample = table
            .rows
            .iter()
            .take(SAMPLE_ROWS)
            .map(|row| {
                row.cells
                    .iter()
                    .map(|cell| CellReport {
                        text: cell.text(),
                        fill: cell.fill.clone(),
                        runs: cell.runs().filter(|r| !r.text.trim().is_empty()).map(RunFormat::from).collect(),
                    })
                    .collect()
            })
            .collect();

        Self {
            number,
            rows: table.rows.len(),
            columns: table.column_count(),
            column_widths_in: table.grid.iter().copied().map(twips_to_inches).collect(),
            sample,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParagraphReport {
    /// 1-based index among body paragraphs, counting empty ones.
    pub number: usize,
    pub style: Option<String>,
    pub text: String,
    pub runs: Vec<RunFormat>,
}

/// Structural summary of a DOCX document.
#[derive(Debug, Clone, Serialize)]
pub struct DocxReport {
    pub page_setup: Vec<PageSetup>,
    pub paragraph_count: usize,
    pub tables: Vec<TableReport>,
    /// Body paragraphs that carry text.
    pub paragraphs: Vec<ParagraphReport>,
    /// Section headers found in the body and table text.
    pub sections: Vec<SectionHit>,
}

impl DocxReport {
    pub fn from_body(body: &DocxBody) -> Self {
        let paragraphs = body
            .paragraphs()
            .enumerate()
            .filter(|(_, p)| !p.text().trim().is_empty())
            .map(|(i, p): (usize, &Paragraph)| ParagraphReport {
                number: i + 1,
                style: p.style.clone(),
                text: p.text(),
                runs: p.runs.iter().map(RunFormat::from).collect(),
            })
            .collect();

        Self {
            page_setup: body.sections.iter().map(PageSetup::from).collect(),
            paragraph_count: body.paragraphs().count(),
            tables: body
                .tables()
                .enumerate()
                .map(|(i, t)| TableReport::from_table(i + 1, t))
                .collect(),
            paragraphs,
            sections: identify_sections(&body.text_blocks().join("\n")),
        }
    }
}

/// Inspect the DOCX at `path`: page setup, tables, paragraph formatting.
pub fn probe_docx(path: &Path) -> Result<DocxReport, DocxError> {
    let body = read_docx(path)?;
    Ok(DocxReport::from_body(&body))
}
