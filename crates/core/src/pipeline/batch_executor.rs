use std::sync::Arc;

use super::sentence_pipeline::{SentenceJob, SentencePipeline, SentenceReport};

/// Abstracts how a batch of sentences is pushed through the pipeline.
///
/// This is a port. Infrastructure provides concrete implementations
/// (e.g. a worker pool); `SequentialBatchExecutor` runs in-thread.
pub trait BatchExecutor: Send {
    /// Processes every job and returns one report per job, in job order.
    /// `on_progress(done, total)` is called on the calling thread.
    fn execute(
        &self,
        pipeline: Arc<SentencePipeline>,
        jobs: Vec<SentenceJob>,
        on_progress: &mut dyn FnMut(usize, usize),
    ) -> Vec<SentenceReport>;
}

/// Runs sentences one after another on the calling thread.
pub struct SequentialBatchExecutor;

impl BatchExecutor for SequentialBatchExecutor {
    fn execute(
        &self,
        pipeline: Arc<SentencePipeline>,
        jobs: Vec<SentenceJob>,
        on_progress: &mut dyn FnMut(usize, usize),
    ) -> Vec<SentenceReport> {
        let total = jobs.len();
        jobs.iter()
            .enumerate()
            .map(|(i, job)| {
                let report = pipeline.process(job);
                on_progress(i + 1, total);
                report
            })
            .collect()
    }
}
