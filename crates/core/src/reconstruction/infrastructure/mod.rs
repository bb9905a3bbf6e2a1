pub mod matching_blocks_diff;
