// 💰 Currency Words - amount → "रु. <words> मात्र"
//
// Loan documents repeat every amount in words. Nepali has a distinct word for
// each number 0-99, and groups larger amounts by the South Asian scale
// (सय, हजार, लाख, करोड, अरब, खरब) rather than by thousands.
//
// Bad input never raises: callers compare against `INVALID_AMOUNT`.

use crate::numerals::delocalize_digits;

/// Prefix placed before the spelled-out magnitude
pub const CURRENCY_PREFIX: &str = "रु.";

/// Qualifier placed after the spelled-out magnitude ("only")
pub const AMOUNT_QUALIFIER: &str = "मात्र";

/// Sentinel returned for negative or non-numeric input
pub const INVALID_AMOUNT: &str = "अमान्य रकम";

#[rustfmt::skip]
const UNDER_HUNDRED: [&str; 100] = [
    "शून्य", "एक", "दुई", "तीन", "चार", "पाँच", "छ", "सात", "आठ", "नौ",
    "दस", "एघार", "बाह्र", "तेह्र", "चौध", "पन्ध्र", "सोह्र", "सत्र", "अठार", "उन्नाइस",
    "बीस", "एक्काइस", "बाइस", "तेइस", "चौबीस", "पच्चीस", "छब्बीस", "सत्ताइस", "अठ्ठाइस", "उनन्तीस",
    "तीस", "एकतीस", "बत्तीस", "तेत्तीस", "चौंतीस", "पैंतीस", "छत्तीस", "सैंतीस", "अठतीस", "उनन्चालीस",
    "चालीस", "एकचालीस", "बयालीस", "त्रियालीस", "चवालीस", "पैंतालीस", "छयालीस", "सतचालीस", "अठचालीस", "उनन्चास",
    "पचास", "एकाउन्न", "बाउन्न", "त्रिपन्न", "चउन्न", "पचपन्न", "छपन्न", "सन्ताउन्न", "अन्ठाउन्न", "उनन्साठी",
    "साठी", "एकसट्ठी", "बयसट्ठी", "त्रिसट्ठी", "चौंसट्ठी", "पैंसट्ठी", "छयसट्ठी", "सतसट्ठी", "अठसट्ठी", "उनन्सत्तरी",
    "सत्तरी", "एकहत्तर", "बहत्तर", "त्रिहत्तर", "चौहत्तर", "पचहत्तर", "छयहत्तर", "सतहत्तर", "अठहत्तर", "उनासी",
    "असी", "एकासी", "बयासी", "त्रियासी", "चौरासी", "पचासी", "छयासी", "सतासी", "अठासी", "उनान्नब्बे",
    "नब्बे", "एकान्नब्बे", "बयान्नब्बे", "त्रियान्नब्बे", "चौरान्नब्बे", "पन्चानब्बे", "छयान्नब्बे", "सन्तान्नब्बे", "अन्ठान्नब्बे", "उनान्सय",
];

/// Scale words, largest first. Each entry is (unit size, word).
const SCALES: [(u64, &str); 5] = [
    (100_000_000_000, "खरब"),
    (1_000_000_000, "अरब"),
    (10_000_000, "करोड"),
    (100_000, "लाख"),
    (1_000, "हजार"),
];

/// Spell out a number without prefix or qualifier
pub fn number_to_words(n: u64) -> String {
    if n < 100 {
        return UNDER_HUNDRED[n as usize].to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    let mut rest = n;

    // Above the largest scale the count itself is spelled recursively
    let (top_unit, top_word) = SCALES[0];
    if rest >= top_unit {
        parts.push(number_to_words(rest / top_unit));
        parts.push(top_word.to_string());
        rest %= top_unit;
    }

    for &(unit, word) in &SCALES[1..] {
        let count = rest / unit;
        if count > 0 {
            parts.push(UNDER_HUNDRED[count as usize].to_string());
            parts.push(word.to_string());
        }
        rest %= unit;
    }

    let hundreds = rest / 100;
    if hundreds > 0 {
        parts.push(UNDER_HUNDRED[hundreds as usize].to_string());
        parts.push("सय".to_string());
    }
    rest %= 100;

    if rest > 0 {
        parts.push(UNDER_HUNDRED[rest as usize].to_string());
    }

    parts.join(" ")
}

/// Full currency phrase for a non-negative amount
pub fn amount_to_words(amount: u64) -> String {
    format!("{} {} {}", CURRENCY_PREFIX, number_to_words(amount), AMOUNT_QUALIFIER)
}

/// Parse a stored amount string
///
/// Accepts ASCII or Devanagari digits, ',' group separators and a fractional
/// part made only of zeros ("50000.00"). Anything else is `None`.
pub fn parse_amount(input: &str) -> Option<u64> {
    let cleaned: String = delocalize_digits(input.trim())
        .chars()
        .filter(|&c| c != ',')
        .collect();

    let (whole, fraction) = match cleaned.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (cleaned.as_str(), None),
    };

    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if let Some(f) = fraction {
        if !f.chars().all(|c| c == '0') {
            return None;
        }
    }

    whole.parse().ok()
}

/// Convert a stored amount string, returning `INVALID_AMOUNT` on bad input
pub fn amount_str_to_words(input: &str) -> String {
    match parse_amount(input) {
        Some(amount) => amount_to_words(amount),
        None => INVALID_AMOUNT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_numbers() {
        assert_eq!(number_to_words(0), "शून्य");
        assert_eq!(number_to_words(5), "पाँच");
        assert_eq!(number_to_words(99), "उनान्सय");
    }

    #[test]
    fn test_scale_grouping() {
        assert_eq!(number_to_words(100), "एक सय");
        assert_eq!(number_to_words(250), "दुई सय पचास");
        assert_eq!(number_to_words(50_000), "पचास हजार");
        assert_eq!(number_to_words(150_000), "एक लाख पचास हजार");
        assert_eq!(number_to_words(12_345_678), "एक करोड तेइस लाख पैंतालीस हजार छ सय अठहत्तर");
        assert_eq!(number_to_words(2_000_000_000), "दुई अरब");
    }

    #[test]
    fn test_above_largest_scale_recurses() {
        assert_eq!(number_to_words(100 * 100_000_000_000), "एक सय खरब");
    }

    #[test]
    fn test_currency_phrase() {
        assert_eq!(amount_to_words(50_000), "रु. पचास हजार मात्र");
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(amount_to_words(987_654), amount_to_words(987_654));
    }

    #[test]
    fn test_parse_amount_variants() {
        assert_eq!(parse_amount("50000"), Some(50_000));
        assert_eq!(parse_amount(" 1,50,000 "), Some(150_000));
        assert_eq!(parse_amount("५००००"), Some(50_000));
        assert_eq!(parse_amount("50000.00"), Some(50_000));
        assert_eq!(parse_amount("50000.50"), None);
        assert_eq!(parse_amount("-5"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_invalid_input_returns_sentinel() {
        assert_eq!(amount_str_to_words("-100"), INVALID_AMOUNT);
        assert_eq!(amount_str_to_words("ten"), INVALID_AMOUNT);
        assert_eq!(amount_str_to_words(""), INVALID_AMOUNT);
        assert_eq!(amount_str_to_words("50000"), "रु. पचास हजार मात्र");
    }
}
