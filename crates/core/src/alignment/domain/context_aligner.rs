use super::aligned_segment::{AlignedSegment, SourceTag};
use super::word_timestamp::WordTimestamp;
use crate::text::domain::similarity::SimilarityScorer;

/// Anchor-based matcher between one chunk's text and the ASR words heard
/// for it.
///
/// High-confidence 1:1 matches become anchors. Between anchors, the unmatched
/// words on both sides are collapsed into one context-gap segment. Every ASR
/// word and every chunk word ends up in exactly one segment.
pub struct ContextAligner<'a> {
    scorer: &'a dyn SimilarityScorer,
    match_threshold: u8,
    high_threshold: u8,
    lookahead: usize,
}

impl<'a> ContextAligner<'a> {
    pub fn new(
        scorer: &'a dyn SimilarityScorer,
        match_threshold: u8,
        high_threshold: u8,
        lookahead: usize,
    ) -> Self {
        Self {
            scorer,
            match_threshold,
            high_threshold,
            lookahead,
        }
    }

    /// `chunk_text` must already be normalized.
    pub fn align(&self, words: &[WordTimestamp], chunk_text: &str) -> Vec<AlignedSegment> {
        let chunk_words: Vec<&str> = chunk_text.split_whitespace().collect();
        if words.is_empty() || chunk_words.is_empty() {
            return Vec::new();
        }

        let mut cursor = ContextCursor::new(self, words, chunk_words);
        while !cursor.finished() {
            let score = cursor.current_score();
            if cursor.try_anchor(score) {
                continue;
            }
            match cursor.find_next_anchor() {
                Some((k, l)) => cursor.emit_context_gap(k, l),
                None => cursor.emit_fallback(score),
            }
        }
        cursor.finish()
    }
}

/// Walk state: `w` into the ASR words, `c` into the chunk words.
struct ContextCursor<'s, 'a> {
    aligner: &'s ContextAligner<'a>,
    words: &'s [WordTimestamp],
    chunk_words: Vec<&'s str>,
    w: usize,
    c: usize,
    segments: Vec<AlignedSegment>,
}

impl<'s, 'a> ContextCursor<'s, 'a> {
    fn new(
        aligner: &'s ContextAligner<'a>,
        words: &'s [WordTimestamp],
        chunk_words: Vec<&'s str>,
    ) -> Self {
        Self {
            aligner,
            words,
            chunk_words,
            w: 0,
            c: 0,
            segments: Vec::new(),
        }
    }

    fn finished(&self) -> bool {
        self.w >= self.words.len() || self.c >= self.chunk_words.len()
    }

    fn score(&self, w: usize, c: usize) -> u8 {
        self.aligner
            .scorer
            .similarity(&self.words[w].text, self.chunk_words[c])
    }

    fn current_score(&self) -> u8 {
        self.score(self.w, self.c)
    }

    fn push_one_to_one(&mut self, source: SourceTag) {
        let word = &self.words[self.w];
        self.segments.push(
            AlignedSegment::new(self.chunk_words[self.c], word.start, word.end, source)
                .with_counts(1, 1),
        );
        self.w += 1;
        self.c += 1;
    }

    fn try_anchor(&mut self, score: u8) -> bool {
        if score < self.aligner.high_threshold {
            return false;
        }
        self.push_one_to_one(SourceTag::Anchor);
        true
    }

    /// First `(k, l)` in the lookahead window where ASR word `w + k` anchors
    /// to chunk word `c + l`.
    fn find_next_anchor(&self) -> Option<(usize, usize)> {
        let lookahead = self.aligner.lookahead;
        for k in 1..=lookahead {
            if self.w + k >= self.words.len() {
                break;
            }
            for l in 1..=lookahead {
                if self.c + l >= self.chunk_words.len() {
                    break;
                }
                if self.score(self.w + k, self.c + l) >= self.aligner.high_threshold {
                    return Some((k, l));
                }
            }
        }
        None
    }

    /// Collapses words `[w, w + k)` and chunk words `[c, c + l)` into one segment.
    fn emit_context_gap(&mut self, k: usize, l: usize) {
        let gap_words = &self.words[self.w..self.w + k];
        let text = self.chunk_words[self.c..self.c + l].join(" ");
        let start = gap_words[0].start;
        let end = gap_words[k - 1].end;
        self.segments
            .push(AlignedSegment::new(&text, start, end, SourceTag::ContextGap).with_counts(k, l));
        self.w += k;
        self.c += l;
    }

    fn emit_fallback(&mut self, score: u8) {
        if score < self.aligner.match_threshold {
            log::debug!(
                "alignment_low_confidence: '{}' paired with '{}' at score {score}",
                self.words[self.w].text,
                self.chunk_words[self.c]
            );
        }
        self.push_one_to_one(SourceTag::Fallback);
    }

    /// Accounts for whatever one side still holds once the other ran out.
    fn finish(mut self) -> Vec<AlignedSegment> {
        if self.c < self.chunk_words.len() {
            let text = self.chunk_words[self.c..].join(" ");
            let at = self.segments.last().map(|s| s.end).unwrap_or(0.0);
            let remaining = self.chunk_words.len() - self.c;
            self.segments
                .push(AlignedSegment::new(&text, at, at, SourceTag::Fallback).with_counts(0, remaining));
        }

        if self.w < self.words.len() {
            let remaining = &self.words[self.w..];
            if let Some(last) = self.segments.last_mut() {
                let tail_end = remaining.iter().map(|w| w.end).fold(last.end, f64::max);
                last.end = tail_end;
                last.asr_words += remaining.len();
            }
        }

        self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::infrastructure::indel_similarity::IndelSimilarity;
    use approx::assert_relative_eq;

    struct StubScorer {
        overrides: Vec<(&'static str, &'static str, u8)>,
    }

    impl SimilarityScorer for StubScorer {
        fn similarity(&self, a: &str, b: &str) -> u8 {
            for &(x, y, score) in &self.overrides {
                if (a == x && b == y) || (a == y && b == x) {
                    return score;
                }
            }
            if a == b {
                100
            } else {
                0
            }
        }
    }

    fn exact() -> StubScorer {
        StubScorer { overrides: vec![] }
    }

    fn word(w: &str, start: f64, end: f64) -> WordTimestamp {
        WordTimestamp::new(w, start, end, 0.9)
    }

    fn words(spec: &[(&str, f64, f64)]) -> Vec<WordTimestamp> {
        spec.iter().map(|&(w, s, e)| word(w, s, e)).collect()
    }

    fn assert_complete(segments: &[AlignedSegment], word_count: usize, token_count: usize) {
        assert_eq!(segments.iter().map(|s| s.asr_words).sum::<usize>(), word_count);
        assert_eq!(segments.iter().map(|s| s.chunk_tokens).sum::<usize>(), token_count);
    }

    #[test]
    fn test_all_anchors() {
        let scorer = exact();
        let aligner = ContextAligner::new(&scorer, 75, 90, 5);
        let asr = words(&[("the", 0.0, 0.3), ("cat", 0.3, 0.6), ("sat", 0.6, 0.9)]);
        let segments = aligner.align(&asr, "the cat sat");

        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|s| s.source == SourceTag::Anchor));
        assert_relative_eq!(segments[1].start, 0.3);
        assert_relative_eq!(segments[1].end, 0.6);
        assert_complete(&segments, 3, 3);
    }

    #[test]
    fn test_context_gap_between_anchors() {
        let scorer = exact();
        let aligner = ContextAligner::new(&scorer, 75, 90, 5);
        // "big red" was heard as one garbled word.
        let asr = words(&[("a", 0.0, 0.2), ("bigred", 0.2, 0.8), ("dog", 0.8, 1.1)]);
        let segments = aligner.align(&asr, "a big red dog");

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].text, "big red");
        assert_eq!(segments[1].source, SourceTag::ContextGap);
        assert_relative_eq!(segments[1].start, 0.2);
        assert_relative_eq!(segments[1].end, 0.8);
        assert_eq!((segments[1].asr_words, segments[1].chunk_tokens), (1, 2));
        assert_eq!(segments[2].source, SourceTag::Anchor);
        assert_complete(&segments, 3, 4);
    }

    #[test]
    fn test_context_gap_spans_several_asr_words() {
        let scorer = exact();
        let aligner = ContextAligner::new(&scorer, 75, 90, 5);
        let asr = words(&[
            ("go", 0.0, 0.2),
            ("na", 0.2, 0.4),
            ("home", 0.4, 0.7),
        ]);
        let segments = aligner.align(&asr, "gonna home");

        assert_eq!(segments[0].text, "gonna");
        assert_eq!(segments[0].source, SourceTag::ContextGap);
        assert_relative_eq!(segments[0].end, 0.4);
        assert_eq!(segments[1].source, SourceTag::Anchor);
        assert_complete(&segments, 3, 2);
    }

    #[test]
    fn test_unmatched_text_falls_back_one_to_one() {
        let scorer = IndelSimilarity;
        let aligner = ContextAligner::new(&scorer, 75, 90, 5);
        let asr = words(&[("xq", 0.0, 0.4), ("zz", 0.4, 0.8), ("vv", 0.8, 1.2)]);
        let segments = aligner.align(&asr, "alpha beta gamma");

        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|s| s.source == SourceTag::Fallback));
        assert_eq!(segments[2].text, "gamma");
        assert_relative_eq!(segments[2].start, 0.8);
        for pair in segments.windows(2) {
            assert!(pair[1].start >= pair[0].start);
        }
        assert_complete(&segments, 3, 3);
    }

    #[test]
    fn test_leftover_chunk_words_are_kept() {
        let scorer = exact();
        let aligner = ContextAligner::new(&scorer, 75, 90, 5);
        let asr = words(&[("one", 0.0, 0.5)]);
        let segments = aligner.align(&asr, "one two three");

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].text, "two three");
        assert_relative_eq!(segments[1].start, 0.5);
        assert_relative_eq!(segments[1].end, 0.5);
        assert_complete(&segments, 1, 3);
    }

    #[test]
    fn test_leftover_asr_words_extend_last_segment() {
        let scorer = exact();
        let aligner = ContextAligner::new(&scorer, 75, 90, 5);
        let asr = words(&[("one", 0.0, 0.5), ("um", 0.5, 0.7), ("uh", 0.7, 1.0)]);
        let segments = aligner.align(&asr, "one");

        assert_eq!(segments.len(), 1);
        assert_relative_eq!(segments[0].end, 1.0);
        assert_complete(&segments, 3, 1);
    }

    #[test]
    fn test_lookahead_bounds_anchor_search() {
        let scorer = exact();
        let aligner = ContextAligner::new(&scorer, 75, 90, 1);
        let asr = words(&[("x", 0.0, 0.1), ("y", 0.1, 0.2), ("c", 0.2, 0.3)]);
        // "c" is two ASR words ahead, beyond a lookahead of 1.
        let segments = aligner.align(&asr, "a b c");
        assert_eq!(segments[0].source, SourceTag::Fallback);
        assert_complete(&segments, 3, 3);
    }

    #[test]
    fn test_empty_inputs_yield_nothing() {
        let scorer = exact();
        let aligner = ContextAligner::new(&scorer, 75, 90, 5);
        assert!(aligner.align(&[], "a b").is_empty());
        assert!(aligner.align(&words(&[("a", 0.0, 1.0)]), "   ").is_empty());
    }
}
