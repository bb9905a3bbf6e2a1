use crate::alignment::domain::text_chunk::TextChunk;
use crate::alignment::domain::word_timestamp::WordTimestamp;

/// Everything known about one spoken sentence before timing reconstruction.
#[derive(Clone, Debug, PartialEq)]
pub struct SentenceRecord {
    pub original_sentence: String,
    /// Duration of the rendered narration clip, in seconds.
    pub measured_duration: f64,
    pub chunks: Vec<TextChunk>,
    pub words: Vec<WordTimestamp>,
}

impl SentenceRecord {
    pub fn new(
        original_sentence: &str,
        measured_duration: f64,
        chunks: Vec<TextChunk>,
        words: Vec<WordTimestamp>,
    ) -> Self {
        Self {
            original_sentence: original_sentence.to_string(),
            measured_duration,
            chunks,
            words,
        }
    }

    /// Sentence as it should appear on screen: trimmed, without the leading
    /// `/` marker of the script format.
    pub fn display_text(&self) -> &str {
        self.original_sentence
            .trim()
            .trim_start_matches('/')
            .trim_start()
    }

    /// Duration usable as a timeline length; unusable values count as zero.
    pub fn timeline_duration(&self) -> f64 {
        if self.measured_duration.is_finite() {
            self.measured_duration.max(0.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case("  the cat sat. ", "the cat sat.")]
    #[case("/ 고양이가 앉았다", "고양이가 앉았다")]
    #[case("//x", "x")]
    #[case("a/b", "a/b")]
    fn test_display_text(#[case] raw: &str, #[case] expected: &str) {
        let record = SentenceRecord::new(raw, 1.0, vec![], vec![]);
        assert_eq!(record.display_text(), expected);
    }

    #[rstest]
    #[case(2.5, 2.5)]
    #[case(-1.0, 0.0)]
    #[case(f64::NAN, 0.0)]
    fn test_timeline_duration(#[case] measured: f64, #[case] expected: f64) {
        let record = SentenceRecord::new("x", measured, vec![], vec![]);
        assert_relative_eq!(record.timeline_duration(), expected);
    }
}
