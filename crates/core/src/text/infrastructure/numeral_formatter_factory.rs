use crate::shared::config::NumeralStyle;
use crate::text::domain::numeral_formatter::NumeralFormatter;
use crate::text::domain::text_normalizer::TextNormalizer;

use super::korean_numeral_formatter::KoreanNumeralFormatter;
use super::verbatim_numeral_formatter::VerbatimNumeralFormatter;

/// Creates the numeral formatter for the configured style.
pub fn create_formatter(style: NumeralStyle) -> Box<dyn NumeralFormatter> {
    log::debug!("Using {style} numeral formatter");
    match style {
        NumeralStyle::Korean => Box::new(KoreanNumeralFormatter),
        NumeralStyle::Verbatim => Box::new(VerbatimNumeralFormatter),
    }
}

/// Normalizer wired with the formatter for `style`.
pub fn create_normalizer(style: NumeralStyle) -> TextNormalizer {
    TextNormalizer::new(create_formatter(style))
}
