use std::sync::LazyLock;

use regex::Regex;

use super::digits;

const MAX_DIGITS: usize = 11;
const MAX_LEN: usize = 15;

static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\(?([1-9]{2})\)?\s?(9\d{4})-?(\d{4})$|^\(?([1-9]{2})\)?\s?(\d{4})-?(\d{4})$",
    )
    .expect("phone pattern compiles")
});

/// Formats `(XX) XXXX-XXXX` for up to ten digits and `(XX) XXXXX-XXXX` for eleven.
pub fn apply_phone_mask(raw: &str) -> String {
    let digits = digits(raw);
    let digits = &digits[..digits.len().min(MAX_DIGITS)];
    if digits.len() <= 2 {
        return digits.to_string();
    }

    let (area, rest) = digits.split_at(2);
    let prefix_len = if digits.len() <= 10 { 4 } else { 5 };
    let mut formatted = format!("({area}) ");
    if rest.len() > prefix_len {
        let (head, tail) = rest.split_at(prefix_len);
        formatted.push_str(head);
        formatted.push('-');
        formatted.push_str(tail);
    } else {
        formatted.push_str(rest);
    }
    formatted.chars().take(MAX_LEN).collect()
}

pub fn is_valid_phone(raw: &str) -> bool {
    let masked = apply_phone_mask(raw);
    let count = digits(&masked).len();
    (count == 10 || count == 11) && PHONE_REGEX.is_match(&masked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_gets_partial_format() {
        assert_eq!(apply_phone_mask("1"), "1");
        assert_eq!(apply_phone_mask("11"), "11");
        assert_eq!(apply_phone_mask("113"), "(11) 3");
        assert_eq!(apply_phone_mask("1134567"), "(11) 3456-7");
    }

    #[test]
    fn ten_and_eleven_digit_tiers() {
        assert_eq!(apply_phone_mask("1134567890"), "(11) 3456-7890");
        assert_eq!(apply_phone_mask("11987654321"), "(11) 98765-4321");
    }

    #[test]
    fn never_exceeds_fifteen_chars() {
        assert_eq!(apply_phone_mask("119876543219999"), "(11) 98765-4321");
    }

    #[test]
    fn validator_accepts_both_tiers() {
        assert!(is_valid_phone("(11) 98765-4321"));
        assert!(is_valid_phone("1134567890"));
        assert!(!is_valid_phone("(01) 3456-7890"));
        assert!(!is_valid_phone("113456"));
    }
}
