use thiserror::Error;

/// Failure kinds raised while rebuilding caption timing for one sentence.
///
/// Every kind is recovered at the narrowest scope: the stage that raises it
/// falls back to a degraded result and the batch keeps going.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimingError {
    #[error("no ASR words or no chunks for the sentence")]
    EmptyInput,
    #[error("aligned text has {aligned} chars but {timestamps} char timestamps")]
    LengthMismatch { aligned: usize, timestamps: usize },
    #[error("cannot rescale span {span:.6}s to target {target:.6}s")]
    DegenerateDuration { target: f64, span: f64 },
    #[error("ASR word {index} has unusable timing ({start}, {end})")]
    InvalidTiming { index: usize, start: f64, end: f64 },
    #[error("sentence pipeline failed: {0}")]
    SentencePipeline(String),
}

impl TimingError {
    /// Short stable name used in log lines and output documents.
    pub fn kind(&self) -> &'static str {
        match self {
            TimingError::EmptyInput => "empty_input",
            TimingError::LengthMismatch { .. } => "length_mismatch",
            TimingError::DegenerateDuration { .. } => "degenerate_duration",
            TimingError::InvalidTiming { .. } => "invalid_timing",
            TimingError::SentencePipeline(_) => "sentence_pipeline",
        }
    }
}
