use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::alignment::domain::aligned_segment::{AlignedSegment, SourceTag};
use crate::alignment::domain::context_aligner::ContextAligner;
use crate::alignment::domain::sequential_aligner::SequentialAligner;
use crate::alignment::domain::text_chunk::TextChunk;
use crate::alignment::domain::word_timestamp::WordTimestamp;
use crate::captions::domain::caption_chunker::CaptionChunker;
use crate::captions::domain::caption_window::CaptionWindow;
use crate::captions::domain::duration_rescaler::DurationRescaler;
use crate::document::domain::caption_document::{ChunkSpan, SentenceCaptions};
use crate::document::domain::sentence_record::SentenceRecord;
use crate::reconstruction::domain::sentence_reconstructor::SentenceReconstructor;
use crate::reconstruction::domain::sequence_diff::SequenceDiff;
use crate::shared::config::CaptionConfig;
use crate::shared::timing_error::TimingError;
use crate::text::domain::similarity::SimilarityScorer;

pub const STAGE_ALIGN: &str = "align";
pub const STAGE_RECONSTRUCT: &str = "reconstruct";
pub const STAGE_CHUNK: &str = "chunk";
pub const STAGE_RESCALE: &str = "rescale";

/// One sentence queued for captioning.
#[derive(Clone, Debug)]
pub struct SentenceJob {
    pub index: usize,
    pub record: SentenceRecord,
    /// Start of this sentence on the narration timeline, in seconds.
    pub timeline_offset: f64,
}

/// Captions for one sentence plus how long each stage took.
#[derive(Clone, Debug)]
pub struct SentenceReport {
    pub captions: SentenceCaptions,
    pub stage_timings: Vec<(&'static str, f64)>,
}

/// The per-sentence timing pipeline: align, reconstruct, chunk, rescale.
///
/// Holds only read-only collaborators, so one instance is shared by all
/// batch workers.
pub struct SentencePipeline {
    scorer: Arc<dyn SimilarityScorer>,
    diff: Arc<dyn SequenceDiff>,
    config: CaptionConfig,
}

impl SentencePipeline {
    pub fn new(
        scorer: Arc<dyn SimilarityScorer>,
        diff: Arc<dyn SequenceDiff>,
        config: CaptionConfig,
    ) -> Self {
        Self {
            scorer,
            diff,
            config,
        }
    }

    pub fn config(&self) -> &CaptionConfig {
        &self.config
    }

    /// Captions one sentence. Never fails: any error or panic inside the
    /// pipeline yields a single window showing the whole sentence for its
    /// full duration.
    pub fn process(&self, job: &SentenceJob) -> SentenceReport {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.try_process(job)))
            .unwrap_or_else(|payload| Err(TimingError::SentencePipeline(panic_message(&*payload))));

        outcome.unwrap_or_else(|e| {
            log::warn!(
                "sentence {}: stage=pipeline kind={} ({e}); using whole-sentence caption",
                job.index,
                e.kind()
            );
            self.fallback(job, &e)
        })
    }

    /// Whole-sentence caption spanning `[0, measured_duration]`.
    pub fn fallback(&self, job: &SentenceJob, error: &TimingError) -> SentenceReport {
        let record = &job.record;
        let text = record.display_text();
        let windows = if text.is_empty() {
            Vec::new()
        } else {
            vec![CaptionWindow::new(text, 0.0, record.timeline_duration())]
        };
        SentenceReport {
            captions: SentenceCaptions {
                failure: Some(error.kind().to_string()),
                ..self.captions(job, windows, Vec::new())
            },
            stage_timings: Vec::new(),
        }
    }

    pub fn try_process(&self, job: &SentenceJob) -> Result<SentenceReport, TimingError> {
        let record = &job.record;
        let words = validated_words(&record.words)?;
        let mut stage_timings = Vec::with_capacity(4);

        if words.is_empty() || record.chunks.is_empty() {
            log::warn!(
                "sentence {}: stage={STAGE_ALIGN} kind={}; no captions",
                job.index,
                TimingError::EmptyInput.kind()
            );
            return Ok(SentenceReport {
                captions: self.captions(job, Vec::new(), Vec::new()),
                stage_timings,
            });
        }

        let started = Instant::now();
        let (segments, chunk_spans) = self.align(&words, &record.chunks);
        stage_timings.push((STAGE_ALIGN, elapsed_ms(started)));

        let context = format!("sentence {}", job.index);

        let started = Instant::now();
        let projected = SentenceReconstructor::new(&*self.diff).reconstruct(
            record.display_text(),
            &segments,
            &context,
        );
        stage_timings.push((STAGE_RECONSTRUCT, elapsed_ms(started)));

        let started = Instant::now();
        let chunker = CaptionChunker::new(self.config.target_chars, self.config.max_factor);
        let windows = chunker.chunk(&projected);
        stage_timings.push((STAGE_CHUNK, elapsed_ms(started)));

        let started = Instant::now();
        let windows = DurationRescaler::rescale(&windows, record.measured_duration, &context);
        stage_timings.push((STAGE_RESCALE, elapsed_ms(started)));

        Ok(SentenceReport {
            captions: self.captions(job, windows, chunk_spans),
            stage_timings,
        })
    }

    /// Sequential pass to split the words among chunks, then a context pass
    /// per chunk. Chunks that received no words still contribute their text
    /// as a zero-width segment. Words that landed on a chunk without tokens
    /// are carried into the next chunk with tokens, or folded into the last
    /// segment, so no word's timing is lost.
    fn align(
        &self,
        words: &[WordTimestamp],
        chunks: &[TextChunk],
    ) -> (Vec<AlignedSegment>, Vec<ChunkSpan>) {
        let scorer = &*self.scorer;
        let sequential = SequentialAligner::new(
            scorer,
            self.config.sequential_match_threshold,
            self.config.slip_lookahead,
        );
        let context = ContextAligner::new(
            scorer,
            self.config.context_match_threshold,
            self.config.context_high_threshold,
            self.config.context_lookahead,
        );

        let assignment = sequential.align(words, chunks);
        let mut segments: Vec<AlignedSegment> = Vec::new();
        let mut spans = Vec::with_capacity(chunks.len());
        let mut carried: Vec<WordTimestamp> = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let (start, end) = assignment.span(idx);
            spans.push(ChunkSpan {
                chunk_text: chunk.text.clone(),
                visual: chunk.visual.clone(),
                start,
                end,
            });

            if chunk.tokens.is_empty() {
                carried.extend_from_slice(assignment.words_for(idx));
                continue;
            }

            let chunk_words = if carried.is_empty() {
                assignment.words_for(idx).to_vec()
            } else {
                let mut joined = std::mem::take(&mut carried);
                joined.extend_from_slice(assignment.words_for(idx));
                joined
            };

            if chunk_words.is_empty() {
                let at = segments.last().map(|s| s.end).unwrap_or(0.0);
                segments.push(
                    AlignedSegment::new(&chunk.normalized_text(), at, at, SourceTag::Fallback)
                        .with_counts(0, chunk.tokens.len()),
                );
                continue;
            }
            segments.extend(context.align(&chunk_words, &chunk.normalized_text()));
        }

        if !carried.is_empty() {
            fold_untexted_words(&mut segments, &carried);
        }
        (segments, spans)
    }

    fn captions(
        &self,
        job: &SentenceJob,
        windows: Vec<CaptionWindow>,
        chunk_spans: Vec<ChunkSpan>,
    ) -> SentenceCaptions {
        SentenceCaptions {
            sentence_index: job.index,
            original_sentence: job.record.original_sentence.clone(),
            sentence_duration: job.record.measured_duration,
            timeline_offset: job.timeline_offset,
            final_subtitle_chunks: windows,
            chunk_spans,
            failure: None,
        }
    }
}

/// Attaches words with no chunk text to the last segment, or to an empty
/// segment of their own when nothing else was aligned.
fn fold_untexted_words(segments: &mut Vec<AlignedSegment>, words: &[WordTimestamp]) {
    let end = words.iter().map(|w| w.end).fold(f64::NEG_INFINITY, f64::max);
    match segments.last_mut() {
        Some(last) => {
            last.end = last.end.max(end);
            last.asr_words += words.len();
        }
        None => {
            let start = words[0].start;
            segments.push(
                AlignedSegment::new("", start, end, SourceTag::Fallback).with_counts(words.len(), 0),
            );
        }
    }
}

/// Rejects non-finite timestamps and clamps the rest to `0 <= start <= end`.
fn validated_words(words: &[WordTimestamp]) -> Result<Vec<WordTimestamp>, TimingError> {
    words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            if word.has_finite_timing() {
                Ok(word.clamped())
            } else {
                Err(TimingError::InvalidTiming {
                    index,
                    start: word.start,
                    end: word.end,
                })
            }
        })
        .collect()
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
