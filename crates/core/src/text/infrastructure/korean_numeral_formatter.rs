use crate::text::domain::numeral_formatter::NumeralFormatter;

const DIGIT_WORDS: [&str; 10] = ["영", "일", "이", "삼", "사", "오", "육", "칠", "팔", "구"];
const PLACE_UNITS: [&str; 4] = ["", "십", "백", "천"];
/// Units for each 4-digit block, lowest first.
const BLOCK_UNITS: [&str; 5] = ["", "만", "억", "조", "경"];
const DECIMAL_POINT: &str = "쩜 ";

/// Spells numerals with Sino-Korean readings (`2024` → `이천이십사`).
///
/// Integers are read in 4-digit blocks (만, 억, 조, 경). `일` is dropped
/// before 십/백/천 and before a lone 만. Fractions are read digit by digit
/// after `쩜`. Numbers too long for the block table are read digit by digit.
pub struct KoreanNumeralFormatter;

impl KoreanNumeralFormatter {
    fn spell_integer(digits: &[u8]) -> String {
        let significant: Vec<u8> = digits.iter().copied().skip_while(|&d| d == 0).collect();
        if significant.is_empty() {
            return DIGIT_WORDS[0].to_string();
        }
        if significant.len() > 4 * BLOCK_UNITS.len() {
            return Self::spell_digits(&significant);
        }

        let blocks: Vec<&[u8]> = significant.rchunks(4).collect();
        let mut out = String::new();
        for (block_idx, block) in blocks.iter().enumerate().rev() {
            let text = Self::spell_block(block);
            if text.is_empty() {
                continue;
            }
            // 10000 reads as 만, not 일만
            let lone_myriad = block_idx == 1 && text == DIGIT_WORDS[1];
            if !lone_myriad {
                out.push_str(&text);
            }
            out.push_str(BLOCK_UNITS[block_idx]);
        }
        out
    }

    /// Spells one block of up to four digits (most significant first).
    fn spell_block(block: &[u8]) -> String {
        let mut out = String::new();
        for (i, &digit) in block.iter().enumerate() {
            let place = block.len() - 1 - i;
            if digit == 0 {
                continue;
            }
            if digit != 1 || place == 0 {
                out.push_str(DIGIT_WORDS[digit as usize]);
            }
            out.push_str(PLACE_UNITS[place]);
        }
        out
    }

    fn spell_digits(digits: &[u8]) -> String {
        digits.iter().map(|&d| DIGIT_WORDS[d as usize]).collect()
    }

    fn digits_of(text: &str) -> Vec<u8> {
        text.chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| d as u8)
            .collect()
    }
}

impl NumeralFormatter for KoreanNumeralFormatter {
    fn spell(&self, numeral: &str) -> String {
        let cleaned: String = numeral.chars().filter(|&c| c != ',').collect();
        let (int_part, frac_part) = match cleaned.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (cleaned.as_str(), None),
        };

        let mut out = Self::spell_integer(&Self::digits_of(int_part));

        if let Some(frac_part) = frac_part {
            let frac_digits = Self::digits_of(frac_part);
            if !frac_digits.is_empty() {
                out.push_str(DECIMAL_POINT);
                out.push_str(&Self::spell_digits(&frac_digits));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero("0", "영")]
    #[case::single("7", "칠")]
    #[case::ten("10", "십")]
    #[case::eleven("11", "십일")]
    #[case::twenty_five("25", "이십오")]
    #[case::hundred("100", "백")]
    #[case::thousand("1000", "천")]
    #[case::year("2024", "이천이십사")]
    #[case::myriad("10000", "만")]
    #[case::mixed_myriad("12345", "만이천삼백사십오")]
    #[case::hundred_thousand("110000", "십일만")]
    #[case::hundred_million("100000000", "일억")]
    #[case::across_blocks("300050007", "삼억오만칠")]
    #[case::commas("1,234", "천이백삼십사")]
    #[case::leading_zeros("007", "칠")]
    fn test_spell_integer(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(KoreanNumeralFormatter.spell(input), expected);
    }

    #[rstest]
    #[case::pi("3.14", "삼쩜 일사")]
    #[case::zero_fraction_digit("3.05", "삼쩜 영오")]
    #[case::no_integer(".5", "영쩜 오")]
    #[case::trailing_point("3.", "삼")]
    fn test_spell_decimal(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(KoreanNumeralFormatter.spell(input), expected);
    }

    #[test]
    fn test_very_long_number_read_digit_by_digit() {
        let input = "1".repeat(21);
        assert_eq!(KoreanNumeralFormatter.spell(&input), "일".repeat(21));
    }

    #[test]
    fn test_output_has_no_ascii_digits() {
        for n in [0u64, 9, 19, 909, 10_001, 987_654_321] {
            let spelled = KoreanNumeralFormatter.spell(&n.to_string());
            assert!(!spelled.chars().any(|c| c.is_ascii_digit()), "{n} -> {spelled}");
        }
    }
}
