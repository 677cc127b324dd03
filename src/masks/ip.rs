use std::sync::LazyLock;

use regex::Regex;

use super::digits;

const MAX_OCTET: u16 = 255;
const MAX_DIGITS: usize = 12;

static IP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
    .expect("ip pattern compiles")
});

/// Groups digits into at most four dotted octets of three digits.
///
/// Octets above 255 are clamped to `255`; in-range octets keep their typed
/// digits (including leading zeros) so re-masking the output is a no-op.
pub fn apply_ip_mask(raw: &str) -> String {
    let digits = digits(raw);
    let digits = &digits[..digits.len().min(MAX_DIGITS)];
    digits
        .as_bytes()
        .chunks(3)
        .map(|chunk| {
            let segment = std::str::from_utf8(chunk).unwrap_or_default();
            match segment.parse::<u16>() {
                Ok(value) if value > MAX_OCTET => MAX_OCTET.to_string(),
                _ => segment.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

pub fn is_valid_ip(raw: &str) -> bool {
    IP_REGEX.is_match(raw)
}
