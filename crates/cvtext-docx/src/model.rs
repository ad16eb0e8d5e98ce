//! In-memory view of a WordprocessingML body.
//!
//! Lengths are kept in the units Word stores them in: twips (1/20 pt) for
//! page geometry and table grids. Font sizes are converted to points on read.

pub const TWIPS_PER_INCH: f32 = 1440.0;

pub fn twips_to_inches(twips: u32) -> f32 {
    twips as f32 / TWIPS_PER_INCH
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub text: String,
    pub font: Option<String>,
    pub size_pt: Option<f32>,
    pub bold: bool,
    pub italic: bool,
    /// Hex colour as written in the document, e.g. `"1F3864"`.
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub style: Option<String>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    /// Background shading fill, e.g. `"D9E2F3"`.
    pub fill: Option<String>,
    pub paragraphs: Vec<Paragraph>,
}

impl Cell {
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.paragraphs.iter().flat_map(|p| p.runs.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    /// Cell texts joined with `" | "`, or `None` when every cell is blank.
    pub fn text(&self) -> Option<String> {
        let cells: Vec<String> = self.cells.iter().map(Cell::text).collect();
        if cells.iter().all(|c| c.is_empty()) {
            return None;
        }
        Some(cells.join(" | "))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Grid column widths in twips.
    pub grid: Vec<u32>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.cells.len())
            .max()
            .unwrap_or(self.grid.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// Page setup of one document section, in twips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionLayout {
    pub page_width: Option<u32>,
    pub page_height: Option<u32>,
    pub margin_top: Option<u32>,
    pub margin_bottom: Option<u32>,
    pub margin_left: Option<u32>,
    pub margin_right: Option<u32>,
}

/// Body of `word/document.xml`, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocxBody {
    pub blocks: Vec<Block>,
    pub sections: Vec<SectionLayout>,
}

impl DocxBody {
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }

    /// Non-empty body paragraphs first, then one line per non-blank table row.
    pub fn text_blocks(&self) -> Vec<String> {
        let paragraphs = self
            .paragraphs()
            .map(Paragraph::text)
            .filter(|t| !t.trim().is_empty());
        let rows = self
            .tables()
            .flat_map(|t| t.rows.iter())
            .filter_map(Row::text);
        paragraphs.chain(rows).collect()
    }
}
