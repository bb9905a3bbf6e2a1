use serde::{Deserialize, Serialize};

/// Where a segment's timing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    /// High-confidence 1:1 word/token match.
    Anchor,
    /// Words between two anchors collapsed into one span.
    ContextGap,
    /// Forced 1:1 pairing when no anchor could be found.
    Fallback,
    Equal,
    Replace,
    /// Sentence text with no timing source; zero-width.
    Insert,
}

/// A span of reconstructed text with the time range it was spoken in.
///
/// `asr_words` and `chunk_tokens` count how many input elements the segment
/// stands for; the aligners use them to prove nothing was dropped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlignedSegment {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub source: SourceTag,
    #[serde(default)]
    pub asr_words: usize,
    #[serde(default)]
    pub chunk_tokens: usize,
}

impl AlignedSegment {
    pub fn new(text: &str, start: f64, end: f64, source: SourceTag) -> Self {
        Self {
            text: text.to_string(),
            start,
            end: end.max(start),
            source,
            asr_words: 0,
            chunk_tokens: 0,
        }
    }

    pub fn with_counts(mut self, asr_words: usize, chunk_tokens: usize) -> Self {
        self.asr_words = asr_words;
        self.chunk_tokens = chunk_tokens;
        self
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_clamps_inverted_span() {
        let seg = AlignedSegment::new("x", 1.0, 0.5, SourceTag::Fallback);
        assert_relative_eq!(seg.start, 1.0);
        assert_relative_eq!(seg.end, 1.0);
    }

    #[test]
    fn test_char_count_uses_scalar_values() {
        let seg = AlignedSegment::new("고양이", 0.0, 1.0, SourceTag::Anchor);
        assert_eq!(seg.char_count(), 3);
    }

    #[test]
    fn test_with_counts() {
        let seg = AlignedSegment::new("a b", 0.0, 1.0, SourceTag::ContextGap).with_counts(3, 2);
        assert_eq!(seg.asr_words, 3);
        assert_eq!(seg.chunk_tokens, 2);
    }
}
