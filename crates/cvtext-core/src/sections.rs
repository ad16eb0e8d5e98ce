use serde::Serialize;

/// Résumé section keywords, Dutch and English.
const SECTION_KEYWORDS: &[&str] = &[
    "personalia",
    "persoonlijk",
    "personal",
    "profile",
    "profiel",
    "opleiding",
    "education",
    "ervaring",
    "experience",
    "projecten",
    "projects",
    "projectervaring",
    "vaardigheden",
    "skills",
    "competenties",
    "certificaten",
    "certificates",
    "certificering",
    "talen",
    "languages",
    "referenties",
    "references",
    "cursussen",
    "training",
];

/// Section headers are short; longer lines merely mention a keyword.
const MAX_HEADER_LEN: usize = 50;

/// A line that looks like a section header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionHit {
    /// 1-based index among the non-empty lines.
    pub line: usize,
    pub text: String,
    pub keyword: &'static str,
}

/// Find section-header lines in extracted text.
///
/// Blank lines are ignored when numbering, so line numbers match the
/// trimmed line listing shown by the probe report.
pub fn identify_sections(text: &str) -> Vec<SectionHit> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .enumerate()
        .filter(|(_, l)| l.chars().count() < MAX_HEADER_LEN)
        .filter_map(|(i, l)| {
            let lower = l.to_lowercase();
            SECTION_KEYWORDS
                .iter()
                .find(|k| lower.contains(**k))
                .map(|k| SectionHit {
                    line: i + 1,
                    text: l.to_string(),
                    keyword: *k,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_short_header_lines() {
        let text = "Ray Amat\n\nWerkervaring\nProjectleider bij gemeente Utrecht\nOpleiding\nTalen\n";
        let hits = identify_sections(text);
        let names: Vec<_> = hits.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(names, vec!["Werkervaring", "Opleiding", "Talen"]);
        assert_eq!(hits[0].line, 2);
        assert_eq!(hits[0].keyword, "ervaring");
    }

    #[test]
    fn long_lines_are_not_headers() {
        let text = "Ruime ervaring met omgevingsmanagement in complexe infrastructurele projecten";
        assert!(identify_sections(text).is_empty());
    }
}
