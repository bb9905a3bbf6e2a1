use std::sync::Arc;
use std::thread::JoinHandle;

use crate::pipeline::batch_executor::BatchExecutor;
use crate::pipeline::sentence_pipeline::{SentenceJob, SentencePipeline, SentenceReport};
use crate::shared::timing_error::TimingError;

const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Processes sentences on a fixed pool of worker threads.
///
/// Layout: `job queue → N workers → main [collect/progress]`
///
/// Workers pull job positions from a shared queue and send finished reports
/// back; the calling thread slots them by position, so output order never
/// depends on scheduling.
pub struct ThreadedBatchExecutor {
    workers: usize,
    channel_capacity: usize,
}

impl ThreadedBatchExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl BatchExecutor for ThreadedBatchExecutor {
    fn execute(
        &self,
        pipeline: Arc<SentencePipeline>,
        jobs: Vec<SentenceJob>,
        on_progress: &mut dyn FnMut(usize, usize),
    ) -> Vec<SentenceReport> {
        let total = jobs.len();
        if total == 0 {
            return Vec::new();
        }
        let jobs = Arc::new(jobs);

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<usize>();
        for position in 0..total {
            if job_tx.send(position).is_err() {
                break;
            }
        }
        drop(job_tx);

        let (done_tx, done_rx) =
            crossbeam_channel::bounded::<(usize, SentenceReport)>(self.channel_capacity);
        let handles: Vec<_> = (0..self.workers.min(total))
            .map(|_| spawn_worker(pipeline.clone(), jobs.clone(), job_rx.clone(), done_tx.clone()))
            .collect();
        drop(done_tx);
        log::debug!("Captioning {total} sentences on {} workers", handles.len());

        let mut slots: Vec<Option<SentenceReport>> = (0..total).map(|_| None).collect();
        let mut completed = 0;
        for (position, report) in done_rx {
            slots[position] = Some(report);
            completed += 1;
            on_progress(completed, total);
        }

        join_workers(handles);

        slots
            .into_iter()
            .enumerate()
            .map(|(position, slot)| {
                slot.unwrap_or_else(|| {
                    let error = TimingError::SentencePipeline("worker exited before finishing".into());
                    log::error!("sentence {}: {error}", jobs[position].index);
                    pipeline.fallback(&jobs[position], &error)
                })
            })
            .collect()
    }
}

fn spawn_worker(
    pipeline: Arc<SentencePipeline>,
    jobs: Arc<Vec<SentenceJob>>,
    job_rx: crossbeam_channel::Receiver<usize>,
    done_tx: crossbeam_channel::Sender<(usize, SentenceReport)>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for position in job_rx {
            let report = pipeline.process(&jobs[position]);
            if done_tx.send((position, report)).is_err() {
                break;
            }
        }
    })
}

fn join_workers(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        if handle.join().is_err() {
            log::error!("Caption worker thread panicked");
        }
    }
}
