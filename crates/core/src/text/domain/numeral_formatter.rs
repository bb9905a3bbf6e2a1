/// Domain interface for spelling a numeral the way a narrator would say it.
///
/// The normalizer hands over a well-formed numeral (`"2024"`, `"1,234.5"`).
/// The returned text must not contain ASCII digits unless the formatter
/// deliberately keeps them (see `VerbatimNumeralFormatter`).
pub trait NumeralFormatter: Send + Sync {
    fn spell(&self, numeral: &str) -> String;
}
