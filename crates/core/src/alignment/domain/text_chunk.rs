use crate::text::domain::text_normalizer::TextNormalizer;

/// An authored span of script text paired with an opaque visual cue.
///
/// `tokens` is the whitespace split of the normalized text; `visual` is
/// carried through the pipeline untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct TextChunk {
    pub text: String,
    pub tokens: Vec<String>,
    pub visual: Option<serde_json::Value>,
}

impl TextChunk {
    pub fn new(text: &str, visual: Option<serde_json::Value>, normalizer: &TextNormalizer) -> Self {
        Self {
            text: text.to_string(),
            tokens: normalizer.tokenize(text),
            visual,
        }
    }

    /// Normalized text, rebuilt from the tokens.
    pub fn normalized_text(&self) -> String {
        self.tokens.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::infrastructure::korean_numeral_formatter::KoreanNumeralFormatter;

    #[test]
    fn test_tokens_come_from_normalized_text() {
        let normalizer = TextNormalizer::new(Box::new(KoreanNumeralFormatter));
        let chunk = TextChunk::new("/ 사과 3개 (빨간)", None, &normalizer);
        assert_eq!(chunk.text, "/ 사과 3개 (빨간)");
        assert_eq!(chunk.tokens, vec!["사과", "삼개"]);
        assert_eq!(chunk.normalized_text(), "사과 삼개");
    }

    #[test]
    fn test_visual_passes_through() {
        let normalizer = TextNormalizer::new(Box::new(KoreanNumeralFormatter));
        let visual = serde_json::json!({"image": "cat.png"});
        let chunk = TextChunk::new("cat", Some(visual.clone()), &normalizer);
        assert_eq!(chunk.visual, Some(visual));
    }
}
