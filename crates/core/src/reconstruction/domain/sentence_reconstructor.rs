use super::sequence_diff::{OpTag, SequenceDiff};
use crate::alignment::domain::aligned_segment::{AlignedSegment, SourceTag};
use crate::shared::timing_error::TimingError;

/// Projects aligned chunk segments back onto the literal sentence.
///
/// Chunk text and the sentence differ in spacing, punctuation and numerals.
/// Each sentence character borrows the time range of the aligned character
/// the diff pairs it with; sentence text with no counterpart gets a
/// zero-width span at the running end time.
pub struct SentenceReconstructor<'a> {
    diff: &'a dyn SequenceDiff,
}

impl<'a> SentenceReconstructor<'a> {
    pub fn new(diff: &'a dyn SequenceDiff) -> Self {
        Self { diff }
    }

    /// Like `try_reconstruct`, but returns the input untouched on failure.
    /// `context` names the sentence in the log line.
    pub fn reconstruct(
        &self,
        sentence: &str,
        segments: &[AlignedSegment],
        context: &str,
    ) -> Vec<AlignedSegment> {
        self.try_reconstruct(sentence, segments).unwrap_or_else(|e| {
            log::warn!(
                "{context}: stage=reconstruct kind={} ({e}); keeping aligned segments",
                e.kind()
            );
            Self::unchanged(segments)
        })
    }

    /// Input segments re-tagged as `Equal`, the fallback when projection fails.
    pub fn unchanged(segments: &[AlignedSegment]) -> Vec<AlignedSegment> {
        segments
            .iter()
            .map(|s| AlignedSegment {
                source: SourceTag::Equal,
                ..s.clone()
            })
            .collect()
    }

    pub fn try_reconstruct(
        &self,
        sentence: &str,
        segments: &[AlignedSegment],
    ) -> Result<Vec<AlignedSegment>, TimingError> {
        let Some(first) = segments.first() else {
            return Ok(Vec::new());
        };

        let aligned: Vec<char> = segments.iter().flat_map(|s| s.text.chars()).collect();
        if aligned.is_empty() {
            return Ok(Vec::new());
        }
        let char_times: Vec<(f64, f64)> = segments
            .iter()
            .flat_map(|s| std::iter::repeat((s.start, s.end)).take(s.char_count()))
            .collect();
        if aligned.len() != char_times.len() {
            return Err(TimingError::LengthMismatch {
                aligned: aligned.len(),
                timestamps: char_times.len(),
            });
        }

        let sentence_chars: Vec<char> = sentence.chars().collect();
        let mut projected: Vec<AlignedSegment> = Vec::new();
        let mut last_end = first.start;
        let mut floor = first.start;

        for op in self.diff.opcodes(&aligned, &sentence_chars) {
            let source = match op.tag {
                OpTag::Equal => SourceTag::Equal,
                OpTag::Replace => SourceTag::Replace,
                OpTag::Insert => SourceTag::Insert,
                OpTag::Delete => continue,
            };

            let (start, end) = if source != SourceTag::Insert && op.i2 > op.i1 {
                let start = char_times[op.i1].0;
                (start, char_times[op.i2 - 1].1.max(start))
            } else {
                (last_end, last_end)
            };
            // Starts never move backwards, even when ASR spans overlap.
            let start = start.max(floor);
            let end = end.max(start);
            floor = start;
            last_end = end;

            let text: String = sentence_chars[op.j1..op.j2].iter().collect();
            projected.push(AlignedSegment::new(&text, start, end, source));
        }

        Ok(merge_identical_spans(projected))
    }
}

/// Joins neighbours that ended up with exactly the same span.
fn merge_identical_spans(segments: Vec<AlignedSegment>) -> Vec<AlignedSegment> {
    let mut merged: Vec<AlignedSegment> = Vec::with_capacity(segments.len());
    for segment in segments {
        match merged.last_mut() {
            Some(last) if last.start == segment.start && last.end == segment.end => {
                last.text.push_str(&segment.text);
            }
            _ => merged.push(segment),
        }
    }
    merged
}
