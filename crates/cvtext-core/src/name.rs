//! Guess a candidate's display name from a résumé file name.
//!
//! This is a strict accept/reject gate: a file name that fails any check
//! yields no name at all rather than a best-effort partial string.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Extensions stripped before parsing. Anything else is left in place so
/// "CV J. Smit" does not lose its surname to `Path::file_stem`.
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "odt", "rtf", "txt"];

/// Leading labels removed from the file name (matched case-insensitively).
const LABEL_PREFIXES: &[&str] = &["curriculum vitae", "resumé", "resume", "cv"];

/// Section-header vocabulary (Dutch and English) that disqualifies a candidate.
const SECTION_WORDS: &[&str] = &[
    "cv",
    "resume",
    "resumé",
    "curriculum",
    "vitae",
    "werkervaring",
    "opleiding",
    "vaardigheden",
    "experience",
    "education",
    "skills",
];

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 50;
const MAX_WORDS: usize = 4;
const ALL_CAPS_MAX_LEN: usize = 10;

static TRAILING_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_-]*\d{4}\s*$").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Why a candidate string was not accepted as a name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameRejection {
    #[error("too short ({0} characters)")]
    TooShort(usize),
    #[error("too long ({0} characters)")]
    TooLong(usize),
    #[error("contains no letters")]
    NoLetters,
    #[error("contains a digit")]
    ContainsDigit,
    #[error("contains section word \"{0}\"")]
    SectionWord(&'static str),
    #[error("all upper-case and longer than 10 characters")]
    AllCaps,
    #[error("has {0} words")]
    WordCount(usize),
}

/// Intermediate strings produced while cleaning a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTrace {
    pub without_extension: String,
    pub without_prefix: String,
    pub without_year: String,
    pub candidate: String,
}

/// Run the cleaning steps and keep every intermediate value.
pub fn trace_filename(filename: &str) -> NameTrace {
    let without_extension = strip_extension(filename).to_string();
    let without_prefix = strip_label_prefix(&without_extension).to_string();
    let without_year = TRAILING_YEAR.replace(&without_prefix, "").trim().to_string();
    let separated = without_year.replace(['_', '-'], " ");
    let candidate = WHITESPACE_RUN.replace_all(separated.trim(), " ").into_owned();

    NameTrace {
        without_extension,
        without_prefix,
        without_year,
        candidate,
    }
}

/// Cleaned candidate string for `filename`, before validation.
pub fn candidate_from_filename(filename: &str) -> String {
    trace_filename(filename).candidate
}

/// Check a candidate against the name heuristics.
pub fn validate_name(text: &str) -> Result<(), NameRejection> {
    let len = text.chars().count();
    if len < MIN_LEN {
        return Err(NameRejection::TooShort(len));
    }
    if len > MAX_LEN {
        return Err(NameRejection::TooLong(len));
    }
    if !text.chars().any(char::is_alphabetic) {
        return Err(NameRejection::NoLetters);
    }
    if text.chars().any(|c| c.is_ascii_digit()) {
        return Err(NameRejection::ContainsDigit);
    }

    let lower = text.to_lowercase();
    if let Some(word) = SECTION_WORDS.iter().find(|w| lower.contains(**w)) {
        return Err(NameRejection::SectionWord(*word));
    }

    // Scripts without letter case have neither upper nor lower case letters.
    let shouting = text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase);
    if len > ALL_CAPS_MAX_LEN && shouting {
        return Err(NameRejection::AllCaps);
    }

    let words = text.split_whitespace().count();
    if !(1..=MAX_WORDS).contains(&words) {
        return Err(NameRejection::WordCount(words));
    }

    Ok(())
}

/// Extract a display name from a file name, or `None` if it doesn't look like one.
pub fn extract_name(filename: &str) -> Option<String> {
    let candidate = candidate_from_filename(filename);
    match validate_name(&candidate) {
        Ok(()) => Some(candidate),
        Err(reason) => {
            tracing::debug!(filename, candidate = %candidate, %reason, "no name extracted");
            None
        }
    }
}

fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if DOCUMENT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => {
            stem
        }
        _ => filename,
    }
}

fn strip_label_prefix(text: &str) -> &str {
    let trimmed = text.trim();
    let lower = trimmed.to_lowercase();
    for prefix in LABEL_PREFIXES {
        if !lower.starts_with(prefix) {
            continue;
        }
        // Lower-casing can change byte lengths, so map back by char count.
        let prefix_chars = prefix.chars().count();
        let split_at = trimmed
            .char_indices()
            .nth(prefix_chars)
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());
        let rest = &trimmed[split_at..];
        // Only a label when followed by a separator ("Cvetkovic" is a surname).
        if rest.is_empty() || rest.starts_with([' ', '_', '-']) {
            return rest.trim_start_matches([' ', '_', '-']);
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cv_prefix_and_year_are_stripped() {
        assert_eq!(extract_name("CV Ray Amat 2025.docx").as_deref(), Some("Ray Amat"));
    }

    #[test]
    fn trace_matches_each_step() {
        let trace = trace_filename("CV Ray Amat 2025.docx");
        assert_eq!(trace.without_extension, "CV Ray Amat 2025");
        assert_eq!(trace.without_prefix, "Ray Amat 2025");
        assert_eq!(trace.without_year, "Ray Amat");
        assert_eq!(trace.candidate, "Ray Amat");
    }

    #[test]
    fn section_word_rejects() {
        assert_eq!(extract_name("Werkervaring Overzicht.pdf"), None);
        assert_eq!(
            validate_name("Werkervaring Overzicht"),
            Err(NameRejection::SectionWord("werkervaring"))
        );
    }

    #[test]
    fn long_all_caps_rejects() {
        assert_eq!(
            validate_name("JOHANNES VAN DER BERG"),
            Err(NameRejection::AllCaps)
        );
        assert_eq!(extract_name("JOHANNES VAN DER BERG.pdf"), None);
        assert_eq!(extract_name("JAN DE VRIES.pdf"), None);
        // Ten characters or fewer may be upper-case.
        assert_eq!(extract_name("AB SMIT.pdf").as_deref(), Some("AB SMIT"));
    }

    #[test]
    fn caseless_script_is_not_all_caps() {
        assert_eq!(validate_name("אברהם בן דוד כהן"), Ok(()));
        assert_eq!(
            extract_name("CV 欧阳 司马 诸葛 长孙.pdf").as_deref(),
            Some("欧阳 司马 诸葛 长孙")
        );
    }

    #[test]
    fn underscores_and_hyphens_become_spaces() {
        assert_eq!(extract_name("Resume_Eva-Marie_Jansen_2023.pdf").as_deref(), Some("Eva Marie Jansen"));
        assert_eq!(extract_name("resumé - Piet Hein.docx").as_deref(), Some("Piet Hein"));
    }

    #[test]
    fn prefix_requires_separator() {
        assert_eq!(strip_label_prefix("Cvetkovic Ana"), "Cvetkovic Ana");
        assert_eq!(strip_label_prefix("CV_Ana"), "Ana");
    }

    #[test]
    fn digits_and_word_count_reject() {
        assert_eq!(validate_name("Ray Amat 2"), Err(NameRejection::ContainsDigit));
        assert_eq!(
            validate_name("Jan Piet Klaas Henk Joop"),
            Err(NameRejection::WordCount(5))
        );
        assert_eq!(validate_name("Al"), Err(NameRejection::TooShort(2)));
        assert_eq!(validate_name("--- ..."), Err(NameRejection::NoLetters));
    }

    #[test]
    fn unknown_extension_is_kept() {
        assert_eq!(strip_extension("CV J. Smit"), "CV J. Smit");
        assert_eq!(strip_extension("cv.PDF"), "cv");
    }
}
