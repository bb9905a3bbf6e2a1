pub mod indel_similarity;
pub mod korean_numeral_formatter;
pub mod numeral_formatter_factory;
pub mod verbatim_numeral_formatter;
