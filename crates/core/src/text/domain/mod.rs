pub mod numeral_formatter;
pub mod similarity;
pub mod text_normalizer;
