/// Default minimum character count after trimming.
pub const DEFAULT_MIN_CHARS: usize = 50;

/// Default minimum share of printable characters.
pub const DEFAULT_MIN_PRINTABLE_RATIO: f32 = 0.8;

/// Decides whether a backend's text is good enough to stop the chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptPolicy {
    /// Minimum character count of the trimmed text.
    pub min_chars: usize,
    /// Minimum fraction (0.0–1.0) of characters that are printable or whitespace.
    pub min_printable_ratio: f32,
}

impl Default for AcceptPolicy {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_CHARS,
            min_printable_ratio: DEFAULT_MIN_PRINTABLE_RATIO,
        }
    }
}

impl AcceptPolicy {
    pub fn new(min_chars: usize) -> Self {
        Self {
            min_chars,
            ..Self::default()
        }
    }

    /// Accept any text that is non-empty after trimming.
    pub fn non_empty() -> Self {
        Self::new(1)
    }

    pub fn accepts(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.chars().count() < self.min_chars {
            return false;
        }
        printable_ratio(trimmed) >= self.min_printable_ratio
    }
}

/// Count of characters after trimming surrounding whitespace.
pub fn trimmed_char_count(text: &str) -> usize {
    text.trim().chars().count()
}

fn printable_ratio(text: &str) -> f32 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let printable = text
        .chars()
        .filter(|c| c.is_whitespace() || !c.is_control())
        .filter(|&c| c != '\u{FFFD}')
        .count();
    printable as f32 / total as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_is_rejected() {
        assert!(!AcceptPolicy::non_empty().accepts("  \n\t "));
    }

    #[test]
    fn short_text_rejected_by_default_threshold() {
        let policy = AcceptPolicy::default();
        assert!(!policy.accepts("Ray Amat"));
        assert!(policy.accepts(&"Projectleider infrastructuur ".repeat(3)));
    }

    #[test]
    fn threshold_counts_trimmed_chars() {
        let policy = AcceptPolicy::new(5);
        assert!(!policy.accepts("   abcd   "));
        assert!(policy.accepts("   abcde   "));
    }

    #[test]
    fn mostly_replacement_chars_rejected() {
        let garbage: String = std::iter::repeat_n('\u{FFFD}', 60).collect();
        assert!(!AcceptPolicy::default().accepts(&garbage));
    }
}
