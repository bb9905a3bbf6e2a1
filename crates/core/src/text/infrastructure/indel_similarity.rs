use crate::text::domain::similarity::SimilarityScorer;

/// Normalized Indel similarity: `200 * LCS(a, b) / (|a| + |b|)`, rounded.
///
/// Comparison is case-insensitive and ignores surrounding whitespace.
/// Lengths are counted in Unicode scalar values so Hangul syllables weigh
/// the same as Latin letters.
pub struct IndelSimilarity;

impl IndelSimilarity {
    fn lcs_len(a: &[char], b: &[char]) -> usize {
        let mut prev = vec![0usize; b.len() + 1];
        let mut curr = vec![0usize; b.len() + 1];
        for &ca in a {
            for (j, &cb) in b.iter().enumerate() {
                curr[j + 1] = if ca == cb {
                    prev[j] + 1
                } else {
                    prev[j + 1].max(curr[j])
                };
            }
            std::mem::swap(&mut prev, &mut curr);
        }
        prev[b.len()]
    }
}

impl SimilarityScorer for IndelSimilarity {
    fn similarity(&self, a: &str, b: &str) -> u8 {
        let a: Vec<char> = a.trim().to_lowercase().chars().collect();
        let b: Vec<char> = b.trim().to_lowercase().chars().collect();

        match (a.is_empty(), b.is_empty()) {
            (true, true) => return 100,
            (true, false) | (false, true) => return 0,
            _ => {}
        }

        let lcs = Self::lcs_len(&a, &b);
        let ratio = 200.0 * lcs as f64 / (a.len() + b.len()) as f64;
        ratio.round().clamp(0.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::identical("cat", "cat", 100)]
    #[case::case_insensitive("Cat", "cAT", 100)]
    #[case::trimmed(" cat ", "cat", 100)]
    #[case::one_substitution("kat", "cat", 67)]
    #[case::disjoint("abc", "xyz", 0)]
    #[case::both_empty("", "", 100)]
    #[case::one_empty("", "cat", 0)]
    #[case::insertion("cats", "cat", 86)]
    #[case::hangul("안녕하세요", "안녕하세오", 80)]
    fn test_similarity(#[case] a: &str, #[case] b: &str, #[case] expected: u8) {
        assert_eq!(IndelSimilarity.similarity(a, b), expected);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let pairs = [("sitting", "kitten"), ("그리고", "그래서"), ("a", "ab")];
        for (a, b) in pairs {
            assert_eq!(
                IndelSimilarity.similarity(a, b),
                IndelSimilarity.similarity(b, a)
            );
        }
    }
}
