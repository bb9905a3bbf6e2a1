use super::text_chunk::TextChunk;
use super::word_timestamp::WordTimestamp;
use crate::text::domain::similarity::SimilarityScorer;

/// ASR words assigned to each chunk, in chunk order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkAssignment {
    words: Vec<Vec<WordTimestamp>>,
}

impl ChunkAssignment {
    pub fn words_for(&self, chunk_idx: usize) -> &[WordTimestamp] {
        self.words.get(chunk_idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `[first.start, last.end]` of the chunk's words, or `(0, 0)` when it got none.
    pub fn span(&self, chunk_idx: usize) -> (f64, f64) {
        match self.words_for(chunk_idx) {
            [] => (0.0, 0.0),
            [first, .., last] => (first.start, last.end.max(first.start)),
            [only] => (only.start, only.end.max(only.start)),
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.words.len()
    }

    pub fn total_words(&self) -> usize {
        self.words.iter().map(Vec::len).sum()
    }
}

/// Assigns an ordered ASR word stream to an ordered list of chunks.
///
/// Used when the chunk order is known and only the word boundaries between
/// chunks are missing. Every word ends up in exactly one chunk.
pub struct SequentialAligner<'a> {
    scorer: &'a dyn SimilarityScorer,
    threshold: u8,
    slip_lookahead: usize,
}

impl<'a> SequentialAligner<'a> {
    pub fn new(scorer: &'a dyn SimilarityScorer, threshold: u8, slip_lookahead: usize) -> Self {
        Self {
            scorer,
            threshold,
            slip_lookahead,
        }
    }

    pub fn align(&self, words: &[WordTimestamp], chunks: &[TextChunk]) -> ChunkAssignment {
        if words.is_empty() || chunks.is_empty() {
            return ChunkAssignment {
                words: vec![Vec::new(); chunks.len()],
            };
        }

        let mut cursor = SequentialCursor::new(self, words, chunks);
        while !cursor.finished() {
            if cursor.current_chunk_exhausted() {
                cursor.advance_chunk();
                continue;
            }
            if cursor.try_direct_match() || cursor.try_slip_match() || cursor.try_next_chunk_match()
            {
                continue;
            }
            cursor.fallback_assign();
        }
        cursor.into_assignment()
    }
}

/// Walk state: `word_ptr` into the ASR words, `chunk_ptr` into the chunks,
/// `token_ptr` into the current chunk's tokens. All three only move forward.
struct SequentialCursor<'s, 'a> {
    aligner: &'s SequentialAligner<'a>,
    words: &'s [WordTimestamp],
    chunks: &'s [TextChunk],
    word_ptr: usize,
    chunk_ptr: usize,
    token_ptr: usize,
    assigned: Vec<Vec<WordTimestamp>>,
}

impl<'s, 'a> SequentialCursor<'s, 'a> {
    fn new(
        aligner: &'s SequentialAligner<'a>,
        words: &'s [WordTimestamp],
        chunks: &'s [TextChunk],
    ) -> Self {
        Self {
            aligner,
            words,
            chunks,
            word_ptr: 0,
            chunk_ptr: 0,
            token_ptr: 0,
            assigned: vec![Vec::new(); chunks.len()],
        }
    }

    fn finished(&self) -> bool {
        self.word_ptr >= self.words.len() || self.chunk_ptr >= self.chunks.len()
    }

    fn current_word(&self) -> &'s str {
        &self.words[self.word_ptr].text
    }

    fn current_tokens(&self) -> &'s [String] {
        &self.chunks[self.chunk_ptr].tokens
    }

    fn current_chunk_exhausted(&self) -> bool {
        self.token_ptr >= self.current_tokens().len()
    }

    fn advance_chunk(&mut self) {
        self.chunk_ptr += 1;
        self.token_ptr = 0;
    }

    fn matches(&self, token: &str) -> bool {
        self.aligner.scorer.similarity(self.current_word(), token) >= self.aligner.threshold
    }

    fn assign_current_word(&mut self) {
        self.assigned[self.chunk_ptr].push(self.words[self.word_ptr].clone());
        self.word_ptr += 1;
    }

    /// Word matches the expected token: consume both.
    fn try_direct_match(&mut self) -> bool {
        let token = &self.current_tokens()[self.token_ptr];
        if !self.matches(token) {
            return false;
        }
        self.assign_current_word();
        self.token_ptr += 1;
        true
    }

    /// Word matches a token a little further into the chunk: skip the
    /// tokens in between (likely dropped by the ASR).
    fn try_slip_match(&mut self) -> bool {
        let tokens = self.current_tokens();
        let found = (1..=self.aligner.slip_lookahead)
            .map(|offset| self.token_ptr + offset)
            .take_while(|&idx| idx < tokens.len())
            .find(|&idx| self.matches(&tokens[idx]));

        let Some(idx) = found else {
            return false;
        };
        log::debug!(
            "slip match: '{}' skipped {} token(s) of chunk {}",
            self.current_word(),
            idx - self.token_ptr,
            self.chunk_ptr
        );
        self.assign_current_word();
        self.token_ptr = idx + 1;
        true
    }

    /// Word opens the next chunk: move on without consuming the word.
    fn try_next_chunk_match(&mut self) -> bool {
        let Some(next) = self.chunks.get(self.chunk_ptr + 1) else {
            return false;
        };
        let Some(first) = next.tokens.first() else {
            return false;
        };
        if !self.matches(first) {
            return false;
        }
        self.advance_chunk();
        true
    }

    /// Nothing matched: keep the word in the current chunk and hold the token.
    fn fallback_assign(&mut self) {
        log::debug!(
            "alignment_low_confidence: '{}' forced into chunk {} at token '{}'",
            self.current_word(),
            self.chunk_ptr,
            self.current_tokens()[self.token_ptr]
        );
        self.assign_current_word();
    }

    /// Words left after the chunks ran out belong to the last chunk reached
    /// that has tokens to carry them.
    fn into_assignment(mut self) -> ChunkAssignment {
        if self.word_ptr < self.words.len() {
            let reached = self.chunk_ptr.min(self.chunks.len() - 1);
            let last = (0..=reached)
                .rev()
                .find(|&idx| !self.chunks[idx].tokens.is_empty())
                .unwrap_or(reached);
            self.assigned[last].extend_from_slice(&self.words[self.word_ptr..]);
        }
        ChunkAssignment {
            words: self.assigned,
        }
    }
}
