use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use captionsync_core::document::infrastructure::json_caption_writer::JsonCaptionWriter;
use captionsync_core::document::infrastructure::json_record_reader::JsonRecordReader;
use captionsync_core::document::infrastructure::srt_caption_writer::SrtCaptionWriter;
use captionsync_core::pipeline::batch_executor::{BatchExecutor, SequentialBatchExecutor};
use captionsync_core::pipeline::build_captions_use_case::BuildCaptionsUseCase;
use captionsync_core::pipeline::infrastructure::threaded_batch_executor::ThreadedBatchExecutor;
use captionsync_core::pipeline::pipeline_logger::CaptionStatsLogger;
use captionsync_core::pipeline::sentence_pipeline::SentencePipeline;
use captionsync_core::reconstruction::infrastructure::matching_blocks_diff::MatchingBlocksDiff;
use captionsync_core::shared::config::{CaptionConfig, NumeralStyle};
use captionsync_core::text::infrastructure::indel_similarity::IndelSimilarity;
use captionsync_core::text::infrastructure::numeral_formatter_factory::create_normalizer;

/// Rebuilds caption timing from narration text, ASR word timings and visual chunks.
#[derive(Parser)]
#[command(name = "captionsync")]
struct Cli {
    /// Input JSON with sentences, durations, word timings and chunks.
    input: PathBuf,

    /// Output caption JSON file.
    output: PathBuf,

    /// Also write an SRT subtitle file.
    #[arg(long)]
    srt: Option<PathBuf>,

    /// Config file (defaults to the user config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preferred characters per caption window.
    #[arg(long)]
    target_chars: Option<usize>,

    /// Hard window cap as a multiple of --target-chars (>= 1.0).
    #[arg(long)]
    max_factor: Option<f64>,

    /// Worker threads (1 = sequential, default: all cores).
    #[arg(long)]
    workers: Option<usize>,

    /// How digits are spelled for matching: korean or verbatim.
    #[arg(long)]
    numerals: Option<NumeralStyle>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    let config = build_config(&cli)?;
    log::debug!("Config: {config:?}");

    let normalizer = Arc::new(create_normalizer(config.numerals));
    let executor: Box<dyn BatchExecutor> = match config.worker_count() {
        1 => Box::new(SequentialBatchExecutor),
        workers => Box::new(ThreadedBatchExecutor::new(workers)),
    };
    let pipeline = Arc::new(SentencePipeline::new(
        Arc::new(IndelSimilarity),
        Arc::new(MatchingBlocksDiff),
        config,
    ));

    let use_case = BuildCaptionsUseCase::new(
        Box::new(JsonRecordReader::new(normalizer)),
        Box::new(JsonCaptionWriter),
        Box::new(SrtCaptionWriter),
        executor,
        pipeline,
    );
    let mut logger = CaptionStatsLogger::default();
    let document = use_case.run(&cli.input, &cli.output, cli.srt.as_deref(), &mut logger)?;

    log::info!(
        "Wrote {} caption windows for {} sentences to {}",
        document.window_count(),
        document.sentences.len(),
        cli.output.display()
    );
    if let Some(srt) = &cli.srt {
        log::info!("SRT written to {}", srt.display());
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<CaptionConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => CaptionConfig::load_from(path)?,
        None => CaptionConfig::load(),
    };
    if let Some(target_chars) = cli.target_chars {
        config.target_chars = target_chars;
    }
    if let Some(max_factor) = cli.max_factor {
        config.max_factor = max_factor;
    }
    if let Some(workers) = cli.workers {
        config.workers = Some(workers);
    }
    if let Some(numerals) = cli.numerals {
        config.numerals = numerals;
    }
    config.validate()?;
    Ok(config)
}
