//! SAX-style reader for `word/document.xml`.
//!
//! Only the parts of WordprocessingML that matter for text and layout
//! reporting are tracked: paragraphs, runs and their formatting, tables with
//! cell shading, and section page setup. Everything else is skipped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::DocxError;
use crate::model::{Block, Cell, DocxBody, Paragraph, Row, Run, SectionLayout, Table};

const DOCUMENT_PART: &str = "word/document.xml";

/// Read and parse the main document part of the DOCX package at `path`.
pub fn read_docx(path: &Path) -> Result<DocxBody, DocxError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut part = archive.by_name(DOCUMENT_PART).map_err(|e| match e {
        zip::result::ZipError::FileNotFound => DocxError::MissingPart(DOCUMENT_PART),
        other => DocxError::Zip(other),
    })?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    tracing::debug!(path = %path.display(), bytes = xml.len(), "read document part");
    parse_document_xml(&xml)
}

/// A table under construction; nested tables push a new one.
#[derive(Default)]
struct OpenTable {
    table: Table,
    row: Option<Row>,
    cell: Option<Cell>,
}

#[derive(Default)]
struct BodyBuilder {
    body: DocxBody,
    tables: Vec<OpenTable>,
    paragraph: Option<Paragraph>,
    run: Option<Run>,
    section: Option<SectionLayout>,
    in_text: bool,
    /// Open `w:txbxContent` elements. Text boxes hang off a run of the
    /// enclosing paragraph and are not part of the body text.
    text_box_depth: usize,
}

fn attr(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == name)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

fn attr_u32(e: &BytesStart<'_>, name: &[u8]) -> Option<u32> {
    attr(e, name).and_then(|v| v.parse().ok())
}

/// `<w:b/>` means on; `<w:b w:val="0"/>` or `"false"` means off.
fn toggle(e: &BytesStart<'_>) -> bool {
    !matches!(attr(e, b"val").as_deref(), Some("0" | "false" | "off"))
}

impl BodyBuilder {
    fn open(&mut self, e: &BytesStart<'_>) {
        if e.local_name().as_ref() == b"txbxContent" {
            self.text_box_depth += 1;
        }
        if self.text_box_depth > 0 {
            return;
        }
        match e.local_name().as_ref() {
            b"p" => self.paragraph = Some(Paragraph::default()),
            b"pStyle" => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.style = attr(e, b"val");
                }
            }
            b"r" => self.run = Some(Run::default()),
            b"t" => self.in_text = true,
            b"tab" => self.push_text("\t"),
            b"br" | b"cr" => self.push_text("\n"),
            b"rFonts" => {
                if let Some(r) = self.run.as_mut() {
                    r.font = attr(e, b"ascii").or_else(|| attr(e, b"hAnsi"));
                }
            }
            b"sz" => {
                if let Some(r) = self.run.as_mut() {
                    r.size_pt = attr_u32(e, b"val").map(|half| half as f32 / 2.0);
                }
            }
            b"b" => {
                if let Some(r) = self.run.as_mut() {
                    r.bold = toggle(e);
                }
            }
            b"i" => {
                if let Some(r) = self.run.as_mut() {
                    r.italic = toggle(e);
                }
            }
            b"color" => {
                if let Some(r) = self.run.as_mut() {
                    r.color = attr(e, b"val").filter(|c| c != "auto");
                }
            }
            b"tbl" => self.tables.push(OpenTable::default()),
            b"gridCol" => {
                if let (Some(t), Some(w)) = (self.tables.last_mut(), attr_u32(e, b"w")) {
                    t.table.grid.push(w);
                }
            }
            b"tr" => {
                if let Some(t) = self.tables.last_mut() {
                    t.row = Some(Row::default());
                }
            }
            b"tc" => {
                if let Some(t) = self.tables.last_mut() {
                    t.cell = Some(Cell::default());
                }
            }
            // Cell shading lives in tcPr, outside any paragraph.
            b"shd" if self.paragraph.is_none() => {
                if let Some(cell) = self.tables.last_mut().and_then(|t| t.cell.as_mut()) {
                    cell.fill = attr(e, b"fill").filter(|f| f != "auto");
                }
            }
            b"sectPr" => self.section = Some(SectionLayout::default()),
            b"pgSz" => {
                if let Some(s) = self.section.as_mut() {
                    s.page_width = attr_u32(e, b"w");
                    s.page_height = attr_u32(e, b"h");
                }
            }
            b"pgMar" => {
                if let Some(s) = self.section.as_mut() {
                    s.margin_top = attr_u32(e, b"top");
                    s.margin_bottom = attr_u32(e, b"bottom");
                    s.margin_left = attr_u32(e, b"left");
                    s.margin_right = attr_u32(e, b"right");
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, local_name: &[u8]) {
        if self.text_box_depth > 0 {
            if local_name == b"txbxContent" {
                self.text_box_depth -= 1;
            }
            return;
        }
        match local_name {
            b"t" => self.in_text = false,
            b"r" => {
                if let (Some(run), Some(p)) = (self.run.take(), self.paragraph.as_mut()) {
                    p.runs.push(run);
                }
            }
            b"p" => {
                if let Some(p) = self.paragraph.take() {
                    self.finish_paragraph(p);
                }
            }
            b"tc" => {
                if let Some(t) = self.tables.last_mut()
                    && let (Some(cell), Some(row)) = (t.cell.take(), t.row.as_mut())
                {
                    row.cells.push(cell);
                }
            }
            b"tr" => {
                if let Some(t) = self.tables.last_mut()
                    && let Some(row) = t.row.take()
                {
                    t.table.rows.push(row);
                }
            }
            b"tbl" => {
                if let Some(done) = self.tables.pop() {
                    self.finish_table(done.table);
                }
            }
            b"sectPr" => {
                if let Some(s) = self.section.take() {
                    self.body.sections.push(s);
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(r) = self.run.as_mut() {
            r.text.push_str(text);
        }
    }

    fn finish_paragraph(&mut self, p: Paragraph) {
        match self.tables.last_mut().and_then(|t| t.cell.as_mut()) {
            Some(cell) => cell.paragraphs.push(p),
            None => self.body.blocks.push(Block::Paragraph(p)),
        }
    }

    /// Top-level tables become blocks; a nested table is flattened into its
    /// enclosing cell, one paragraph per row.
    fn finish_table(&mut self, table: Table) {
        match self.tables.last_mut().and_then(|t| t.cell.as_mut()) {
            Some(cell) => {
                for text in table.rows.iter().filter_map(Row::text) {
                    cell.paragraphs.push(Paragraph {
                        style: None,
                        runs: vec![Run {
                            text,
                            ..Default::default()
                        }],
                    });
                }
            }
            None => self.body.blocks.push(Block::Table(table)),
        }
    }
}

/// Parse the XML of a `word/document.xml` part.
pub fn parse_document_xml(xml: &str) -> Result<DocxBody, DocxError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut builder = BodyBuilder::default();
    loop {
        match reader.read_event()? {
            Event::Start(ref e) => builder.open(e),
            Event::Empty(ref e) => {
                builder.open(e);
                builder.close(e.local_name().as_ref());
            }
            Event::End(ref e) => builder.close(e.local_name().as_ref()),
            Event::Text(ref e) if builder.in_text => {
                let text = e.unescape()?;
                builder.push_text(&text);
            }
            Event::CData(ref e) if builder.in_text => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                builder.push_text(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(builder.body)
}
