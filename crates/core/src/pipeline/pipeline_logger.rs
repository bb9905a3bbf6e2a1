use std::collections::BTreeMap;

use crate::document::domain::caption_document::SentenceCaptions;

/// Observer for a captioning batch: progress, stage timings and the outcome
/// of every sentence.
///
/// Keeps the use case independent of where batch statistics end up.
pub trait PipelineLogger: Send {
    /// `done` of `total` sentences have been captioned.
    fn progress(&mut self, done: usize, total: usize);

    /// Record how long a stage took for one sentence.
    fn stage_timing(&mut self, stage: &str, duration_ms: f64);

    /// Called once per sentence, in narration order.
    fn sentence_captioned(&mut self, captions: &SentenceCaptions);

    fn info(&mut self, message: &str);

    /// Emit an end-of-batch report. Default: no-op.
    fn summary(&self) {}
}

/// Logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _done: usize, _total: usize) {}
    fn stage_timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn sentence_captioned(&mut self, _captions: &SentenceCaptions) {}
    fn info(&mut self, _message: &str) {}
}

/// Duration of one stage aggregated over the batch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StageStats {
    pub runs: usize,
    pub total_ms: f64,
    pub max_ms: f64,
}

impl StageStats {
    fn record(&mut self, duration_ms: f64) {
        self.runs += 1;
        self.total_ms += duration_ms;
        self.max_ms = self.max_ms.max(duration_ms);
    }

    pub fn mean_ms(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.total_ms / self.runs as f64
        }
    }
}

/// Collects caption statistics and reports them through `log` once the
/// batch is done: window counts per sentence, whole-sentence fallbacks by
/// failure kind, and per-stage cost.
///
/// Progress lines are emitted every `progress_every` sentences.
pub struct CaptionStatsLogger {
    progress_every: usize,
    stages: BTreeMap<String, StageStats>,
    /// Number of sentences per caption-window count.
    window_histogram: BTreeMap<usize, usize>,
    failures: BTreeMap<String, usize>,
    sentences: usize,
    windows: usize,
    narration_seconds: f64,
}

impl CaptionStatsLogger {
    pub fn new(progress_every: usize) -> Self {
        Self {
            progress_every: progress_every.max(1),
            stages: BTreeMap::new(),
            window_histogram: BTreeMap::new(),
            failures: BTreeMap::new(),
            sentences: 0,
            windows: 0,
            narration_seconds: 0.0,
        }
    }

    pub fn stage(&self, stage: &str) -> Option<&StageStats> {
        self.stages.get(stage)
    }

    pub fn window_histogram(&self) -> &BTreeMap<usize, usize> {
        &self.window_histogram
    }

    /// Fallback sentences keyed by `TimingError::kind()`.
    pub fn failures_by_kind(&self) -> &BTreeMap<String, usize> {
        &self.failures
    }

    /// Share of sentences that fell back to a whole-sentence caption.
    pub fn fallback_rate(&self) -> f64 {
        if self.sentences == 0 {
            0.0
        } else {
            self.failures.values().sum::<usize>() as f64 / self.sentences as f64
        }
    }

    /// Returns the report, or `None` before any sentence was captioned.
    pub fn summary_string(&self) -> Option<String> {
        if self.sentences == 0 {
            return None;
        }

        let mut lines = vec![format!(
            "Captioned {} sentences into {} windows ({:.1}s of narration)",
            self.sentences, self.windows, self.narration_seconds
        )];

        let histogram: Vec<String> = self
            .window_histogram
            .iter()
            .map(|(windows, sentences)| format!("{windows}:{sentences}"))
            .collect();
        lines.push(format!("  windows per sentence  {}", histogram.join("  ")));

        let fallbacks: usize = self.failures.values().sum();
        let mut line = format!(
            "  fallbacks  {fallbacks} of {} ({:.1}%)",
            self.sentences,
            self.fallback_rate() * 100.0
        );
        for (kind, count) in &self.failures {
            line.push_str(&format!("  {kind}={count}"));
        }
        lines.push(line);

        for (stage, stats) in &self.stages {
            lines.push(format!(
                "  {stage:<12} avg {:.2}ms  max {:.2}ms",
                stats.mean_ms(),
                stats.max_ms
            ));
        }

        Some(lines.join("\n"))
    }
}

impl Default for CaptionStatsLogger {
    fn default() -> Self {
        Self::new(25)
    }
}

impl PipelineLogger for CaptionStatsLogger {
    fn progress(&mut self, done: usize, total: usize) {
        if done % self.progress_every == 0 || done == total {
            log::info!("Captioned {done}/{total} sentences");
        }
    }

    fn stage_timing(&mut self, stage: &str, duration_ms: f64) {
        self.stages.entry(stage.to_string()).or_default().record(duration_ms);
    }

    fn sentence_captioned(&mut self, captions: &SentenceCaptions) {
        let windows = captions.final_subtitle_chunks.len();
        self.sentences += 1;
        self.windows += windows;
        *self.window_histogram.entry(windows).or_default() += 1;
        if let Some(kind) = &captions.failure {
            *self.failures.entry(kind.clone()).or_default() += 1;
        }
        if captions.sentence_duration.is_finite() && captions.sentence_duration > 0.0 {
            self.narration_seconds += captions.sentence_duration;
        }
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n{text}");
        }
    }
}
