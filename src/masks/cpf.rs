use super::digits;

const CPF_DIGITS: usize = 11;

/// Formats up to eleven digits as `XXX.XXX.XXX-XX`.
pub fn apply_cpf_mask(raw: &str) -> String {
    let digits = digits(raw);
    let digits = &digits[..digits.len().min(CPF_DIGITS)];

    let groups = [0..3, 3..6, 6..9]
        .into_iter()
        .filter_map(|range| slice(digits, range))
        .collect::<Vec<_>>();
    let mut formatted = groups.join(".");
    if let Some(check) = slice(digits, 9..11) {
        formatted.push('-');
        formatted.push_str(check);
    }
    formatted
}

/// Checksum validation; sequences of a repeated digit are always rejected.
pub fn is_valid_cpf(raw: &str) -> bool {
    let digits = digits(raw)
        .bytes()
        .map(|byte| u32::from(byte - b'0'))
        .collect::<Vec<_>>();
    if digits.len() != CPF_DIGITS || digits.iter().all(|digit| *digit == digits[0]) {
        return false;
    }
    verifier(&digits[..9]) == digits[9] && verifier(&digits[..10]) == digits[10]
}

fn verifier(base: &[u32]) -> u32 {
    let weight_start = base.len() as u32 + 1;
    let sum: u32 = base
        .iter()
        .enumerate()
        .map(|(index, digit)| digit * (weight_start - index as u32))
        .sum();
    let remainder = (sum * 10) % 11;
    if remainder == 10 { 0 } else { remainder }
}

fn slice(digits: &str, range: std::ops::Range<usize>) -> Option<&str> {
    if digits.len() <= range.start {
        return None;
    }
    Some(&digits[range.start..range.end.min(digits.len())])
}
