use once_cell::sync::Lazy;
use regex::Regex;

/// Expand typographic ligatures (ﬁ → fi, ﬂ → fl, etc.).
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

/// Strip trailing spaces from each line and keep at most one blank line in a row.
pub fn tidy_page(text: &str) -> String {
    static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

    let trimmed: Vec<&str> = text.lines().map(str::trim_end).collect();
    let joined = trimmed.join("\n");
    BLANK_RUNS.replace_all(joined.trim_matches('\n'), "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ligatures_expanded() {
        assert_eq!(expand_ligatures("pro\u{FB01}el o\u{FB03}ce"), "profiel office");
    }

    #[test]
    fn tidy_collapses_blank_runs() {
        assert_eq!(tidy_page("\nNaam   \n\n\n\nAdres \n\n"), "Naam\n\nAdres");
    }
}
