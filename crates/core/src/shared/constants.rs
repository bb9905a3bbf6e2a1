/// Minimum similarity (0-100) for the sequential aligner to accept a word/token pair.
pub const SEQUENTIAL_MATCH_THRESHOLD: u8 = 90;

/// How many tokens ahead the sequential aligner searches when the expected token misses.
pub const SLIP_LOOKAHEAD: usize = 2;

/// Below this similarity a context fallback is reported as low confidence.
pub const CONTEXT_MATCH_THRESHOLD: u8 = 75;

/// Similarity required for a context anchor.
pub const CONTEXT_HIGH_THRESHOLD: u8 = 90;

/// Size of the (ASR word, chunk word) window searched for the next anchor.
pub const CONTEXT_LOOKAHEAD: usize = 5;

pub const DEFAULT_TARGET_CHARS: usize = 30;

/// Windows may grow up to `target_chars * max_factor` characters.
pub const DEFAULT_MAX_FACTOR: f64 = 1.8;

/// Width given to a caption window whose timing collapsed or inverted.
pub const MIN_WINDOW_SECONDS: f64 = 0.01;

/// Spans at or below this are too small to rescale.
pub const DEGENERATE_SPAN_SECONDS: f64 = 1e-6;

/// Scale factors this close to 1.0 are skipped.
pub const SCALE_TOLERANCE: f64 = 1e-4;

pub const CONFIG_DIR_NAME: &str = "captionsync";
pub const CONFIG_FILE_NAME: &str = "config.json";
