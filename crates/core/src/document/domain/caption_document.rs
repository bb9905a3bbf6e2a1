use serde::{Deserialize, Serialize};

use crate::captions::domain::caption_window::CaptionWindow;

/// Time range the ASR words assigned to one chunk cover, with the chunk's
/// visual cue passed through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkSpan {
    pub chunk_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual: Option<serde_json::Value>,
    pub start: f64,
    pub end: f64,
}

/// Caption output for one sentence. Window times are sentence-relative;
/// add `timeline_offset` for the position on the full narration timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SentenceCaptions {
    pub sentence_index: usize,
    pub original_sentence: String,
    pub sentence_duration: f64,
    pub timeline_offset: f64,
    pub final_subtitle_chunks: Vec<CaptionWindow>,
    #[serde(default)]
    pub chunk_spans: Vec<ChunkSpan>,
    /// Failure kind when the captions are a whole-sentence fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl SentenceCaptions {
    /// Windows moved onto the absolute timeline.
    pub fn absolute_windows(&self) -> impl Iterator<Item = CaptionWindow> + '_ {
        self.final_subtitle_chunks
            .iter()
            .map(|w| w.shifted(self.timeline_offset))
    }
}

/// Captions for a whole narration, sentences in input order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptionDocument {
    pub total_duration_seconds: f64,
    pub sentences: Vec<SentenceCaptions>,
}

impl CaptionDocument {
    pub fn new(sentences: Vec<SentenceCaptions>, total_duration_seconds: f64) -> Self {
        Self {
            total_duration_seconds,
            sentences,
        }
    }

    pub fn window_count(&self) -> usize {
        self.sentences
            .iter()
            .map(|s| s.final_subtitle_chunks.len())
            .sum()
    }

    pub fn failure_count(&self) -> usize {
        self.sentences.iter().filter(|s| s.failure.is_some()).count()
    }
}
