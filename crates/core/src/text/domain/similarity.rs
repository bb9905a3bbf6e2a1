/// Domain interface for fuzzy word similarity.
///
/// Returns a score in `0..=100`, where 100 means the two words are
/// considered identical.
pub trait SimilarityScorer: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> u8;
}
