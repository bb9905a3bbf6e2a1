use crate::text::domain::text_normalizer::TextNormalizer;

/// Hands out consecutive chunks of a flat visual plan to sentences.
///
/// A sentence claims chunks, starting at the plan cursor, for as long as the
/// whitespace-free normalized concatenation stays a prefix of the
/// whitespace-free normalized sentence. The cursor carries over to the next
/// sentence.
pub struct ChunkClaimer<'a> {
    normalizer: &'a TextNormalizer,
}

impl<'a> ChunkClaimer<'a> {
    pub fn new(normalizer: &'a TextNormalizer) -> Self {
        Self { normalizer }
    }

    /// Returns the plan indices claimed by `sentence` and advances `cursor`
    /// past them. Chunks that normalize to nothing are skipped, not claimed.
    pub fn claim<S: AsRef<str>>(&self, sentence: &str, plan: &[S], cursor: &mut usize) -> Vec<usize> {
        let target = self.normalizer.compact(sentence);
        let mut rebuilt = String::new();
        let mut claimed = Vec::new();

        while *cursor < plan.len() {
            let chunk = self.normalizer.compact(plan[*cursor].as_ref());
            if chunk.is_empty() {
                *cursor += 1;
                continue;
            }

            let candidate = format!("{rebuilt}{chunk}");
            if !target.starts_with(&candidate) {
                break;
            }

            claimed.push(*cursor);
            rebuilt = candidate;
            *cursor += 1;
            if rebuilt == target {
                break;
            }
        }

        if rebuilt != target {
            log::warn!(
                "chunks rebuilt only {} of {} chars of sentence '{}'",
                rebuilt.chars().count(),
                target.chars().count(),
                sentence
            );
        }
        claimed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::infrastructure::korean_numeral_formatter::KoreanNumeralFormatter;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new(Box::new(KoreanNumeralFormatter))
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let normalizer = normalizer();
        let claimer = ChunkClaimer::new(&normalizer);
        let plan = ["the cat", "sat down."];
        let mut cursor = 0;

        assert_eq!(claimer.claim("The cat sat down.", &plan, &mut cursor), Vec::<usize>::new());
        assert_eq!(cursor, 0);
    }

    #[test]
    fn test_claims_across_sentences() {
        let normalizer = normalizer();
        let claimer = ChunkClaimer::new(&normalizer);
        let plan = ["the cat", "sat down.", "then it", "slept."];
        let mut cursor = 0;

        assert_eq!(claimer.claim("the cat sat down.", &plan, &mut cursor), vec![0, 1]);
        assert_eq!(cursor, 2);
        assert_eq!(claimer.claim("then it slept.", &plan, &mut cursor), vec![2, 3]);
        assert_eq!(cursor, 4);
    }

    #[test]
    fn test_chunk_boundary_inside_word() {
        let normalizer = normalizer();
        let claimer = ChunkClaimer::new(&normalizer);
        let plan = ["고양이가 앉", "았다"];
        let mut cursor = 0;
        assert_eq!(claimer.claim("고양이가 앉았다", &plan, &mut cursor), vec![0, 1]);
    }

    #[test]
    fn test_numbers_compare_after_normalization() {
        let normalizer = normalizer();
        let claimer = ChunkClaimer::new(&normalizer);
        let plan = ["사과 3개를", "샀다"];
        let mut cursor = 0;
        assert_eq!(claimer.claim("/ 사과 세 (3) 3개를 샀다", &plan, &mut cursor), Vec::<usize>::new());

        let mut cursor = 0;
        assert_eq!(claimer.claim("사과 삼개를 샀다", &plan, &mut cursor), vec![0, 1]);
    }

    #[test]
    fn test_empty_chunks_skipped() {
        let normalizer = normalizer();
        let claimer = ChunkClaimer::new(&normalizer);
        let plan = ["a", "(note)", "b", "c"];
        let mut cursor = 0;
        assert_eq!(claimer.claim("a b", &plan, &mut cursor), vec![0, 2]);
        assert_eq!(cursor, 3);
    }

    #[test]
    fn test_stops_at_first_mismatch() {
        let normalizer = normalizer();
        let claimer = ChunkClaimer::new(&normalizer);
        let plan = ["a", "x", "b"];
        let mut cursor = 0;
        assert_eq!(claimer.claim("a b", &plan, &mut cursor), vec![0]);
        assert_eq!(cursor, 1);
    }
}
