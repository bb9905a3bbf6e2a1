pub mod aligned_segment;
pub mod chunk_claimer;
pub mod context_aligner;
pub mod sequential_aligner;
pub mod text_chunk;
pub mod word_timestamp;
