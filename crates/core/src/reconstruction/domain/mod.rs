pub mod sentence_reconstructor;
pub mod sequence_diff;
