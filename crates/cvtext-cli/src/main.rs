use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use cvtext_core::config_file::{self, ConfigFile};
use cvtext_core::guidance::{remediation_text, write_instructions};
use cvtext_core::name::{trace_filename, validate_name};
use cvtext_core::output::{default_output_path, write_text};
use cvtext_core::{DocumentFormat, DocumentRef, extract_name};
use cvtext_ingest::{ChainOptions, Report};

mod output;

use output::ColorMode;

/// Résumé text extractor - pull text out of PDF and DOCX résumés, with OCR fallback
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Pdf,
    Docx,
}

impl From<FormatArg> for DocumentFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Pdf => DocumentFormat::Pdf,
            FormatArg::Docx => DocumentFormat::Docx,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract text from a PDF or DOCX résumé
    Extract {
        /// Path to the PDF or DOCX file
        path: PathBuf,

        /// Where to write the text (default: <stem>.txt in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treat the file as this format instead of guessing from the extension
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Minimum characters for a backend's text to be accepted
        #[arg(long)]
        min_chars: Option<usize>,

        /// Tesseract language hint, e.g. "nld+eng"
        #[arg(long)]
        lang: Option<String>,

        /// Rasterization resolution for OCR
        #[arg(long)]
        dpi: Option<u32>,

        /// Skip the OCR backend
        #[arg(long)]
        no_ocr: bool,

        /// Write manual-OCR instructions to this file when no text is found
        #[arg(long)]
        instructions: Option<PathBuf>,
    },

    /// Report the structure of a PDF or DOCX document
    Probe {
        path: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Guess the candidate's name from one or more file names
    Name {
        #[arg(required = true)]
        filenames: Vec<String>,
    },

    /// Compare the extracted text of two documents
    Compare {
        first: PathBuf,
        second: PathBuf,

        /// Print the comparison as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export PDF pages as PNG images for manual OCR
    Render {
        path: PathBuf,

        /// Output directory (default: <stem>_images in the current directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        #[arg(long)]
        dpi: Option<u32>,
    },

    /// Print instructions for extracting text from image-only documents
    Guidance {
        /// Also write the instructions to this file
        #[arg(long)]
        instructions: Option<PathBuf>,
    },

    /// Show or initialise the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the effective configuration to the platform config file
    Init,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let color = ColorMode(!cli.no_color);
    let config = config_file::load_config();
    let mut stdout = std::io::stdout();

    match cli.command {
        Command::Extract {
            path,
            output,
            format,
            min_chars,
            lang,
            dpi,
            no_ocr,
            instructions,
        } => {
            let options = resolve_options(&config, min_chars, lang, dpi, no_ocr);
            extract(&mut stdout, path, output, format, &options, instructions, color)
        }
        Command::Probe { path, json } => probe(&mut stdout, &path, json, color),
        Command::Name { filenames } => {
            for (i, filename) in filenames.iter().enumerate() {
                if i > 0 {
                    writeln!(stdout)?;
                }
                let trace = trace_filename(filename);
                let outcome = validate_name(&trace.candidate);
                output::print_name_trace(&mut stdout, filename, &trace, &outcome, color)?;
            }
            Ok(())
        }
        Command::Compare { first, second, json } => {
            let options = resolve_options(&config, None, None, None, false);
            let cmp = cvtext_ingest::compare_documents(
                &DocumentRef::open(first)?,
                &DocumentRef::open(second)?,
                &options,
            )?;
            if json {
                writeln!(stdout, "{}", serde_json::to_string_pretty(&cmp)?)?;
            } else {
                output::print_comparison(&mut stdout, &cmp, color)?;
            }
            Ok(())
        }
        Command::Render { path, out_dir, dpi } => {
            let doc = DocumentRef::open(&path)?;
            let out_dir = out_dir.unwrap_or_else(|| PathBuf::from(format!("{}_images", file_stem(&path))));
            let dpi = dpi.unwrap_or(config.ocr_settings().dpi);
            let files = cvtext_ingest::render_document(&doc, &out_dir, dpi)?;
            output::print_rendered(&mut stdout, &files)?;
            let images: Vec<&Path> = files.iter().map(PathBuf::as_path).collect();
            write!(stdout, "{}", remediation_text(Some(path.as_path()), Some(files.len()), &images))?;
            Ok(())
        }
        Command::Guidance { instructions } => {
            let text = remediation_text(None, None, &[]);
            write!(stdout, "{}", text)?;
            if let Some(dest) = instructions {
                write_instructions(&dest, &text)
                    .with_context(|| format!("writing instructions to {}", dest.display()))?;
                tracing::info!(path = %dest.display(), "instructions written");
            }
            Ok(())
        }
        Command::Config { action } => match action {
            ConfigAction::Show => {
                match config_file::config_path() {
                    Some(p) => writeln!(stdout, "# {}", p.display())?,
                    None => writeln!(stdout, "# no platform config directory")?,
                }
                write!(stdout, "{}", effective_toml(&config)?)?;
                Ok(())
            }
            ConfigAction::Init => {
                let path = config_file::save_config(&effective_config(&config)).map_err(anyhow::Error::msg)?;
                tracing::info!(path = %path.display(), "config written");
                writeln!(stdout, "Wrote {}", path.display())?;
                Ok(())
            }
        },
    }
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve settings: CLI flags > env vars > config file > defaults.
fn resolve_options(
    config: &ConfigFile,
    min_chars: Option<usize>,
    lang: Option<String>,
    dpi: Option<u32>,
    no_ocr: bool,
) -> ChainOptions {
    let mut policy = config.accept_policy();
    if let Some(n) = min_chars {
        policy.min_chars = n;
    }

    let mut ocr = config.ocr_settings();
    if let Some(languages) = lang.or_else(|| std::env::var("CVTEXT_OCR_LANG").ok()) {
        ocr.languages = languages;
    }
    if let Ok(path) = std::env::var("CVTEXT_TESSERACT") {
        ocr.tesseract_path = PathBuf::from(path);
    }
    if let Some(dpi) = dpi {
        ocr.dpi = dpi;
    }

    ChainOptions {
        policy,
        ocr,
        ocr_enabled: !no_ocr && config.ocr_enabled(),
    }
}

/// The loaded config with every default filled in.
fn effective_config(config: &ConfigFile) -> ConfigFile {
    let policy = config.accept_policy();
    let ocr = config.ocr_settings();
    ConfigFile {
        extraction: Some(config_file::ExtractionConfig {
            min_chars: Some(policy.min_chars),
            min_printable_ratio: Some(policy.min_printable_ratio),
        }),
        ocr: Some(config_file::OcrConfig {
            enabled: Some(config.ocr_enabled()),
            languages: Some(ocr.languages),
            dpi: Some(ocr.dpi),
            psm: Some(ocr.psm),
            tesseract_path: Some(ocr.tesseract_path.display().to_string()),
        }),
    }
}

fn effective_toml(config: &ConfigFile) -> anyhow::Result<String> {
    config_file::to_toml(&effective_config(config)).map_err(anyhow::Error::msg)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

fn extract(
    w: &mut dyn Write,
    path: PathBuf,
    output: Option<PathBuf>,
    format: Option<FormatArg>,
    options: &ChainOptions,
    instructions: Option<PathBuf>,
    color: ColorMode,
) -> anyhow::Result<()> {
    let doc = match format {
        Some(f) => DocumentRef::with_format(&path, f.into())?,
        None => DocumentRef::open(&path)?,
    };
    let file_name = doc.file_name();
    tracing::info!(file = %file_name, format = ?doc.format(), "extracting");

    let result = cvtext_ingest::extract_document(&doc, options)?;
    tracing::info!(
        classification = ?result.classification,
        source = result.source.as_deref().unwrap_or("-"),
        chars = result.text.chars().count(),
        "extraction finished"
    );

    let written = if result.text.trim().is_empty() {
        None
    } else {
        let dest = output.unwrap_or_else(|| default_output_path(&path, Path::new(".")));
        write_text(&dest, &result.text).with_context(|| format!("writing text to {}", dest.display()))?;
        Some(dest)
    };

    output::print_extraction_report(w, &file_name, &result, written.as_deref(), color)?;
    if let Some(name) = extract_name(&file_name) {
        writeln!(w, "Candidate name: {}", name)?;
    }

    if result.needs_manual_ocr() {
        tracing::warn!(file = %file_name, "no extractable text, manual OCR needed");
        writeln!(w)?;
        let text = remediation_text(Some(path.as_path()), Some(result.page_count), &[]);
        write!(w, "{}", text)?;
        if let Some(dest) = instructions {
            write_instructions(&dest, &text)
                .with_context(|| format!("writing instructions to {}", dest.display()))?;
            tracing::info!(path = %dest.display(), "instructions written");
            writeln!(w, "Instructions saved to: {}", dest.display())?;
        }
    }
    Ok(())
}

fn probe(w: &mut dyn Write, path: &Path, json: bool, color: ColorMode) -> anyhow::Result<()> {
    let doc = DocumentRef::open(path)?;
    let report = cvtext_ingest::probe_document(&doc)?;

    if json {
        writeln!(w, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }
    match &report {
        Report::Pdf(r) => output::print_pdf_report(w, &doc.file_name(), r, color)?,
        Report::Docx(r) => output::print_docx_report(w, &doc.file_name(), r, color)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use cvtext_core::config_file::ExtractionConfig;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn extract_flags_parse() {
        let cli = Cli::try_parse_from([
            "cvtext", "extract", "cv.pdf", "--no-ocr", "--min-chars", "30", "--format", "docx", "-q",
        ])
        .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Command::Extract {
                no_ocr,
                min_chars,
                format,
                ..
            } => {
                assert!(no_ocr);
                assert_eq!(min_chars, Some(30));
                assert!(matches!(format, Some(FormatArg::Docx)));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn flags_override_config() {
        let config = ConfigFile {
            extraction: Some(ExtractionConfig {
                min_chars: Some(10),
                ..Default::default()
            }),
            ..Default::default()
        };
        let options = resolve_options(&config, Some(80), Some("eng".into()), Some(150), true);
        assert_eq!(options.policy.min_chars, 80);
        assert_eq!(options.ocr.languages, "eng");
        assert_eq!(options.ocr.dpi, 150);
        assert!(!options.ocr_enabled);

        let from_config = resolve_options(&config, None, Some("eng".into()), None, false);
        assert_eq!(from_config.policy.min_chars, 10);
        assert_eq!(from_config.ocr.dpi, 300);
        assert!(from_config.ocr_enabled);
    }

    #[test]
    fn effective_config_fills_defaults() {
        let toml = effective_toml(&ConfigFile::default()).unwrap();
        assert!(toml.contains("min_chars = 50"));
        assert!(toml.contains("psm = 1"));
    }
}
