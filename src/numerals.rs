// 🔢 Numeral Localization - ASCII digits → Devanagari digits
//
// Display values in generated documents use Devanagari digits (०-९).
// Transliteration is per character: every ASCII digit maps to exactly one
// glyph and everything else passes through, so the output always has the
// same number of characters as the input.

use serde_json::Value;

const DEVANAGARI_DIGITS: [char; 10] = ['०', '१', '२', '३', '४', '५', '६', '७', '८', '९'];

/// Map a single character; non-digits are returned unchanged
fn localize_char(c: char) -> char {
    match c.to_digit(10) {
        Some(d) if c.is_ascii_digit() => DEVANAGARI_DIGITS[d as usize],
        _ => c,
    }
}

/// Transliterate every ASCII digit in `input` to its Devanagari glyph
pub fn localize_digits(input: &str) -> String {
    input.chars().map(localize_char).collect()
}

/// Localize any JSON scalar for display
///
/// Null becomes the empty string; numbers and booleans are stringified first.
/// Arrays and objects have no display form and become the empty string.
pub fn localize_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => localize_digits(s),
        Value::Number(n) => localize_digits(&n.to_string()),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Inverse mapping, for reading user input that may already be localized
///
/// Only used when parsing (member numbers, amounts). Context output is never
/// passed through this.
pub fn delocalize_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match DEVANAGARI_DIGITS.iter().position(|&d| d == c) {
            Some(idx) => char::from(b'0' + idx as u8),
            None => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_localize_all_digits() {
        assert_eq!(localize_digits("0123456789"), "०१२३४५६७८९");
    }

    #[test]
    fn test_punctuation_and_other_scripts_pass_through() {
        assert_eq!(localize_digits("2082-03-05"), "२०८२-०३-०५");
        assert_eq!(localize_digits("रु. 5,000/-"), "रु. ५,०००/-");
        assert_eq!(localize_digits("abc XYZ"), "abc XYZ");
    }

    #[test]
    fn test_length_preserving() {
        for s in ["", "0", "12.5%", "वडा नं. 4", "९८४१", "mixed 1a2b3c ✓"] {
            let out = localize_digits(s);
            assert_eq!(out.chars().count(), s.chars().count(), "length changed for {:?}", s);
        }
    }

    #[test]
    fn test_no_digits_unchanged() {
        let s = "राम बहादुर";
        assert_eq!(localize_digits(s), s);
    }

    #[test]
    fn test_localize_value() {
        assert_eq!(localize_value(&json!(null)), "");
        assert_eq!(localize_value(&json!("9841")), "९८४१");
        assert_eq!(localize_value(&json!(12)), "१२");
        assert_eq!(localize_value(&json!(12.5)), "१२.५");
        assert_eq!(localize_value(&json!([1, 2])), "");
    }

    #[test]
    fn test_delocalize() {
        assert_eq!(delocalize_digits("००००००१२३"), "000000123");
        assert_eq!(delocalize_digits("12a"), "12a");
    }
}
