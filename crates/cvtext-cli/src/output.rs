use std::io::Write;
use std::path::{Path, PathBuf};

use cvtext_core::name::{NameRejection, NameTrace};
use cvtext_core::sections::SectionHit;
use cvtext_core::{AttemptStatus, BackendAttempt, Classification, ExtractionResult};
use cvtext_docx::DocxReport;
use cvtext_ingest::Comparison;
use cvtext_pdf_mupdf::PdfReport;
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn print_banner(w: &mut dyn Write, title: &str, color: ColorMode) -> std::io::Result<()> {
    let sep = "=".repeat(60);
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", title.bold())?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "{}", title)?;
        writeln!(w, "{}", sep)?;
    }
    Ok(())
}

fn status_label(status: AttemptStatus) -> &'static str {
    match status {
        AttemptStatus::Accepted => "ACCEPTED",
        AttemptStatus::BelowThreshold => "TOO SHORT",
        AttemptStatus::Empty => "EMPTY",
        AttemptStatus::Unavailable => "UNAVAILABLE",
        AttemptStatus::Failed => "FAILED",
        AttemptStatus::Skipped => "SKIPPED",
    }
}

fn print_attempt(w: &mut dyn Write, attempt: &BackendAttempt, color: ColorMode) -> std::io::Result<()> {
    let label = status_label(attempt.status);
    let timing = attempt
        .elapsed
        .map(|d| format!(" in {:.2}s", d.as_secs_f64()))
        .unwrap_or_default();
    let detail = match (&attempt.error_message, attempt.status) {
        (Some(msg), _) => format!(": {}", msg),
        (None, AttemptStatus::Accepted | AttemptStatus::BelowThreshold) => {
            format!(" ({} characters)", attempt.chars)
        }
        _ => String::new(),
    };

    if color.enabled() {
        let label = match attempt.status {
            AttemptStatus::Accepted => label.green().to_string(),
            AttemptStatus::BelowThreshold | AttemptStatus::Empty => label.yellow().to_string(),
            AttemptStatus::Unavailable | AttemptStatus::Failed => label.red().to_string(),
            AttemptStatus::Skipped => label.dimmed().to_string(),
        };
        writeln!(w, "  {:<12} -> {}{}{}", attempt.name, label, detail, timing.dimmed())
    } else {
        writeln!(w, "  {:<12} -> {}{}{}", attempt.name, label, detail, timing)
    }
}

/// Per-backend outcomes followed by the overall verdict.
pub fn print_extraction_report(
    w: &mut dyn Write,
    file_name: &str,
    result: &ExtractionResult,
    written_to: Option<&Path>,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Extracting text from {}...", file_name)?;
    for attempt in &result.attempts {
        print_attempt(w, attempt, color)?;
    }
    writeln!(w)?;

    let verdict = match result.classification {
        Classification::Extracted => format!(
            "Extracted {} characters, {} words with {}",
            result.char_count,
            result.word_count,
            result.source.as_deref().unwrap_or("unknown")
        ),
        Classification::Partial => format!(
            "Only {} characters found (best: {}); text may be incomplete",
            result.char_count,
            result.source.as_deref().unwrap_or("unknown")
        ),
        Classification::ImageOnly => "No text found: image-only document, OCR required".to_string(),
        Classification::AllBackendsFailed => "Every extraction backend failed".to_string(),
    };
    if color.enabled() {
        let verdict = match result.classification {
            Classification::Extracted => verdict.green().to_string(),
            Classification::Partial => verdict.yellow().to_string(),
            _ => verdict.red().to_string(),
        };
        writeln!(w, "{}", verdict)?;
    } else {
        writeln!(w, "{}", verdict)?;
    }

    if result.page_count > 0 {
        writeln!(w, "Pages: {}", result.page_count)?;
    }
    writeln!(w, "Time: {:.2}s", result.elapsed.as_secs_f64())?;
    if let Some(path) = written_to {
        writeln!(w, "Saved to: {}", path.display())?;
    }
    Ok(())
}

/// Candidate-name trace for one file name, step by step.
pub fn print_name_trace(
    w: &mut dyn Write,
    filename: &str,
    trace: &NameTrace,
    outcome: &Result<(), NameRejection>,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "{}", filename)?;
    writeln!(w, "  extension removed: {:?}", trace.without_extension)?;
    writeln!(w, "  prefix removed:    {:?}", trace.without_prefix)?;
    writeln!(w, "  year removed:      {:?}", trace.without_year)?;
    writeln!(w, "  candidate:         {:?}", trace.candidate)?;
    match outcome {
        Ok(()) => {
            if color.enabled() {
                writeln!(w, "  {} {}", "name:".green(), trace.candidate.bold())?;
            } else {
                writeln!(w, "  name: {}", trace.candidate)?;
            }
        }
        Err(reason) => {
            if color.enabled() {
                writeln!(w, "  {} {}", "rejected:".red(), reason)?;
            } else {
                writeln!(w, "  rejected: {}", reason)?;
            }
        }
    }
    Ok(())
}

fn print_sections(w: &mut dyn Write, sections: &[SectionHit], color: ColorMode) -> std::io::Result<()> {
    writeln!(w)?;
    if sections.is_empty() {
        writeln!(w, "Sections: none detected")?;
        return Ok(());
    }
    writeln!(w, "Sections:")?;
    for hit in sections {
        if color.enabled() {
            writeln!(w, "  line {:>3}: {} {}", hit.line, hit.text.cyan(), format!("[{}]", hit.keyword).dimmed())?;
        } else {
            writeln!(w, "  line {:>3}: {} [{}]", hit.line, hit.text, hit.keyword)?;
        }
    }
    Ok(())
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

pub fn print_pdf_report(w: &mut dyn Write, file_name: &str, report: &PdfReport, color: ColorMode) -> std::io::Result<()> {
    print_banner(w, &format!("PDF ANALYSIS: {}", file_name), color)?;
    writeln!(w, "Pages:    {}", report.page_count)?;
    let meta = &report.metadata;
    writeln!(w, "Title:    {}", opt(&meta.title))?;
    writeln!(w, "Author:   {}", opt(&meta.author))?;
    writeln!(w, "Subject:  {}", opt(&meta.subject))?;
    writeln!(w, "Producer: {}", opt(&meta.producer))?;
    writeln!(w, "Creator:  {}", opt(&meta.creator))?;
    writeln!(w, "Format:   {}", opt(&meta.format))?;

    for page in &report.pages {
        writeln!(w)?;
        writeln!(w, "Page {}: {:.0} x {:.0} pt", page.number, page.width, page.height)?;
        writeln!(w, "  text characters: {}", page.chars)?;
        writeln!(w, "  image blocks:    {}", page.image_blocks)?;
        if page.looks_scanned() {
            if color.enabled() {
                writeln!(w, "  {}", "images only, probably a scan".yellow())?;
            } else {
                writeln!(w, "  images only, probably a scan")?;
            }
        }
        if let Some(preview) = &page.preview {
            writeln!(w, "  preview: {}...", preview)?;
        }
    }

    if !report.has_text_layer() {
        writeln!(w)?;
        if color.enabled() {
            writeln!(w, "{}", "No text layer: OCR required".red())?;
        } else {
            writeln!(w, "No text layer: OCR required")?;
        }
    }
    print_sections(w, &report.sections, color)
}

fn format_run(run: &cvtext_docx::probe::RunFormat) -> String {
    let mut parts = vec![run.font.clone().unwrap_or_else(|| "default font".into())];
    if let Some(size) = run.size_pt {
        parts.push(format!("{}pt", size));
    }
    if run.bold {
        parts.push("bold".into());
    }
    if run.italic {
        parts.push("italic".into());
    }
    if let Some(c) = &run.color {
        parts.push(format!("#{}", c));
    }
    parts.join(", ")
}

pub fn print_docx_report(w: &mut dyn Write, file_name: &str, report: &DocxReport, color: ColorMode) -> std::io::Result<()> {
    let inches = |v: Option<f32>| v.map(|i| format!("{:.2}\"", i)).unwrap_or_else(|| "-".into());

    print_banner(w, &format!("DOCX ANALYSIS: {}", file_name), color)?;
    for (i, setup) in report.page_setup.iter().enumerate() {
        writeln!(w, "Section {}:", i + 1)?;
        writeln!(w, "  page size: {} x {}", inches(setup.width_in), inches(setup.height_in))?;
        writeln!(
            w,
            "  margins:   top {}, bottom {}, left {}, right {}",
            inches(setup.margin_top_in),
            inches(setup.margin_bottom_in),
            inches(setup.margin_left_in),
            inches(setup.margin_right_in)
        )?;
    }
    writeln!(w, "Paragraphs: {}", report.paragraph_count)?;
    writeln!(w, "Tables:     {}", report.tables.len())?;

    for table in &report.tables {
        writeln!(w)?;
        if color.enabled() {
            writeln!(w, "{}", format!("Table {}: {} rows x {} columns", table.number, table.rows, table.columns).bold())?;
        } else {
            writeln!(w, "Table {}: {} rows x {} columns", table.number, table.rows, table.columns)?;
        }
        if !table.column_widths_in.is_empty() {
            let widths: Vec<String> = table.column_widths_in.iter().map(|c| format!("{:.2}\"", c)).collect();
            writeln!(w, "  column widths: {}", widths.join(", "))?;
        }
        for (r, row) in table.sample.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let fill = cell.fill.as_ref().map(|f| format!(" [fill #{}]", f)).unwrap_or_default();
                writeln!(w, "  [{},{}] {:?}{}", r + 1, c + 1, cell.text, fill)?;
                if let Some(run) = cell.runs.first() {
                    writeln!(w, "        {}", format_run(run))?;
                }
            }
        }
    }

    if !report.paragraphs.is_empty() {
        writeln!(w)?;
        writeln!(w, "Paragraph formatting:")?;
        for p in &report.paragraphs {
            let style = p.style.as_deref().unwrap_or("Normal");
            if color.enabled() {
                writeln!(w, "  {:>3}. {} {:?}", p.number, format!("({})", style).dimmed(), p.text)?;
            } else {
                writeln!(w, "  {:>3}. ({}) {:?}", p.number, style, p.text)?;
            }
            for run in p.runs.iter().filter(|r| !r.text.trim().is_empty()) {
                writeln!(w, "        {:?}: {}", run.text, format_run(run))?;
            }
        }
    }
    print_sections(w, &report.sections, color)
}

pub fn print_comparison(w: &mut dyn Write, cmp: &Comparison, color: ColorMode) -> std::io::Result<()> {
    let (l, r) = (&cmp.left, &cmp.right);
    print_banner(w, "DOCUMENT COMPARISON", color)?;
    writeln!(w, "{:<18} {:>20} {:>20}", "", l.format.to_string(), r.format.to_string())?;
    writeln!(w, "{:<18} {:>20} {:>20}", "file", truncate(&l.file, 20), truncate(&r.file, 20))?;
    writeln!(
        w,
        "{:<18} {:>20} {:>20}",
        "extracted by",
        l.source.as_deref().unwrap_or("-"),
        r.source.as_deref().unwrap_or("-")
    )?;
    writeln!(w, "{:<18} {:>20} {:>20}", "characters", l.metrics.characters, r.metrics.characters)?;
    writeln!(w, "{:<18} {:>20} {:>20}", "lines", l.metrics.lines, r.metrics.lines)?;
    writeln!(w, "{:<18} {:>20} {:>20}", "words", l.metrics.words, r.metrics.words)?;
    writeln!(w, "{:<18} {:>20} {:>20}", "bullets", yes_no(l.metrics.has_bullets), yes_no(r.metrics.has_bullets))?;
    writeln!(w, "{:<18} {:>20} {:>20}", "year references", l.metrics.year_references, r.metrics.year_references)?;

    for side in [l, r] {
        if side.classification != Classification::Extracted {
            let msg = format!("{}: no usable text ({:?})", side.file, side.classification);
            if color.enabled() {
                writeln!(w, "{}", msg.yellow())?;
            } else {
                writeln!(w, "{}", msg)?;
            }
        }
    }
    Ok(())
}

pub fn print_rendered(w: &mut dyn Write, files: &[PathBuf]) -> std::io::Result<()> {
    writeln!(w, "Exported {} page image(s):", files.len())?;
    for f in files {
        writeln!(w, "  {}", f.display())?;
    }
    writeln!(w)?;
    Ok(())
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}
