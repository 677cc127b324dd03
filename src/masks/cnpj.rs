use super::digits;

const CNPJ_DIGITS: usize = 14;
const FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Formats up to fourteen digits as `XX.XXX.XXX/XXXX-XX`.
pub fn apply_cnpj_mask(raw: &str) -> String {
    let digits = digits(raw);
    let digits = &digits[..digits.len().min(CNPJ_DIGITS)];

    let mut formatted = String::with_capacity(18);
    for (index, ch) in digits.chars().enumerate() {
        match index {
            2 | 5 => formatted.push('.'),
            8 => formatted.push('/'),
            12 => formatted.push('-'),
            _ => {}
        }
        formatted.push(ch);
    }
    formatted
}

pub fn is_valid_cnpj(raw: &str) -> bool {
    let digits = digits(raw)
        .bytes()
        .map(|byte| u32::from(byte - b'0'))
        .collect::<Vec<_>>();
    if digits.len() != CNPJ_DIGITS || digits.iter().all(|digit| *digit == digits[0]) {
        return false;
    }
    verifier(&digits[..12], &FIRST_WEIGHTS) == digits[12]
        && verifier(&digits[..13], &SECOND_WEIGHTS) == digits[13]
}

fn verifier(base: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = base.iter().zip(weights).map(|(d, w)| d * w).sum();
    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}
