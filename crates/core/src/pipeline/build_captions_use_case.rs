use std::path::Path;
use std::sync::Arc;

use crate::document::domain::caption_document::CaptionDocument;
use crate::document::domain::caption_writer::CaptionWriter;
use crate::document::domain::record_reader::RecordReader;
use crate::document::domain::sentence_record::SentenceRecord;

use super::batch_executor::BatchExecutor;
use super::pipeline_logger::PipelineLogger;
use super::sentence_pipeline::{SentenceJob, SentencePipeline};

/// Reads a narration, captions every sentence and writes the results.
///
/// A failing sentence degrades to a whole-sentence caption; only I/O errors
/// abort the run.
pub struct BuildCaptionsUseCase {
    reader: Box<dyn RecordReader>,
    writer: Box<dyn CaptionWriter>,
    srt_writer: Box<dyn CaptionWriter>,
    executor: Box<dyn BatchExecutor>,
    pipeline: Arc<SentencePipeline>,
}

impl BuildCaptionsUseCase {
    pub fn new(
        reader: Box<dyn RecordReader>,
        writer: Box<dyn CaptionWriter>,
        srt_writer: Box<dyn CaptionWriter>,
        executor: Box<dyn BatchExecutor>,
        pipeline: Arc<SentencePipeline>,
    ) -> Self {
        Self {
            reader,
            writer,
            srt_writer,
            executor,
            pipeline,
        }
    }

    pub fn run(
        &self,
        input_path: &Path,
        output_path: &Path,
        srt_path: Option<&Path>,
        logger: &mut dyn PipelineLogger,
    ) -> Result<CaptionDocument, Box<dyn std::error::Error>> {
        // 1. Read sentences, chunks already resolved
        let records = self.reader.read_records(input_path)?;
        let total_duration: f64 = records.iter().map(SentenceRecord::timeline_duration).sum();
        logger.info(&format!(
            "Captioning {} sentences ({total_duration:.1}s of narration)",
            records.len()
        ));

        // 2. Caption every sentence, placed on the narration timeline
        let jobs = timeline_jobs(records);
        let reports = self.executor.execute(self.pipeline.clone(), jobs, &mut |done, total| {
            logger.progress(done, total)
        });

        // 3. Feed statistics to the logger
        let mut sentences = Vec::with_capacity(reports.len());
        for report in reports {
            for (stage, ms) in &report.stage_timings {
                logger.stage_timing(stage, *ms);
            }
            logger.sentence_captioned(&report.captions);
            sentences.push(report.captions);
        }
        let document = CaptionDocument::new(sentences, total_duration);

        // 4. Write outputs
        self.writer.write(output_path, &document)?;
        if let Some(path) = srt_path {
            self.srt_writer.write(path, &document)?;
        }

        logger.summary();
        Ok(document)
    }
}

/// Jobs in narration order, each offset by the durations before it.
fn timeline_jobs(records: Vec<SentenceRecord>) -> Vec<SentenceJob> {
    let mut offset = 0.0;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let timeline_offset = offset;
            offset += record.timeline_duration();
            SentenceJob {
                index,
                record,
                timeline_offset,
            }
        })
        .collect()
}
