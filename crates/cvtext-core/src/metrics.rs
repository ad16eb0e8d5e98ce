use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());

/// Coarse statistics used to compare two documents side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextMetrics {
    pub characters: usize,
    pub lines: usize,
    pub words: usize,
    pub has_bullets: bool,
    /// Four-digit runs, a rough count of dates.
    pub year_references: usize,
}

impl TextMetrics {
    pub fn from_text(text: &str) -> Self {
        Self {
            characters: text.chars().count(),
            lines: text.matches('\n').count() + 1,
            words: text.split_whitespace().count(),
            has_bullets: text.contains('•') || text.contains('-'),
            year_references: YEAR.find_iter(text).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_basic_metrics() {
        let m = TextMetrics::from_text("Ray Amat\n• Projectleider 2019 - 2024\n");
        assert_eq!(m.lines, 3);
        assert_eq!(m.words, 7);
        assert!(m.has_bullets);
        assert_eq!(m.year_references, 2);
    }

    #[test]
    fn empty_text_has_one_line() {
        let m = TextMetrics::from_text("");
        assert_eq!(m.characters, 0);
        assert_eq!(m.lines, 1);
        assert!(!m.has_bullets);
    }
}
