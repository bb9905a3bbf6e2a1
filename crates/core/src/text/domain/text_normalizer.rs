use regex::{Captures, Regex};

use super::numeral_formatter::NumeralFormatter;

/// Canonicalizes narration text so that script text, chunk text and the
/// words an ASR engine heard can be compared.
///
/// Steps, in order: drop parenthetical asides, spell out numerals, collapse
/// whitespace, glue apostrophes to their word, strip leading `/` markers.
/// `normalize` is idempotent. Only normalized text should ever be compared
/// with normalized text.
pub struct TextNormalizer {
    formatter: Box<dyn NumeralFormatter>,
    parenthetical: Regex,
    numeral: Regex,
}

impl TextNormalizer {
    pub fn new(formatter: Box<dyn NumeralFormatter>) -> Self {
        Self {
            formatter,
            parenthetical: Regex::new(r"\([^)]*\)").expect("valid parenthetical pattern"),
            numeral: Regex::new(r"[0-9](?:[0-9,]*[0-9])?(?:\.[0-9]+)?")
                .expect("valid numeral pattern"),
        }
    }

    pub fn normalize(&self, raw: &str) -> String {
        let text = self.parenthetical.replace_all(raw, "");
        let text = text.replace(['(', ')'], "");
        let text = self
            .numeral
            .replace_all(&text, |caps: &Captures| self.formatter.spell(&caps[0]));
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let text = text.replace(" '", "'").replace("' ", "'");
        text.trim_start_matches(|c: char| c == '/' || c.is_whitespace())
            .to_string()
    }

    /// Normalized text with all whitespace removed, for prefix comparisons
    /// that must not depend on where chunk boundaries split words.
    pub fn compact(&self, raw: &str) -> String {
        self.normalize(raw)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    }

    /// Whitespace tokens of the normalized text.
    pub fn tokenize(&self, raw: &str) -> Vec<String> {
        self.normalize(raw)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}
