use crate::text::domain::numeral_formatter::NumeralFormatter;

/// Keeps numerals as written, for recognizers that transcribe digits.
pub struct VerbatimNumeralFormatter;

impl NumeralFormatter for VerbatimNumeralFormatter {
    fn spell(&self, numeral: &str) -> String {
        numeral.to_string()
    }
}
