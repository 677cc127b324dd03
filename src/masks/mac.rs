use std::sync::LazyLock;

use regex::Regex;

const MAX_HEX_DIGITS: usize = 12;

static MAC_ADDRESS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})$").expect("mac pattern compiles")
});

/// Upper-cased hex pairs joined by `:`, at most six pairs.
pub fn apply_mac_address_mask(raw: &str) -> String {
    let mut masked = String::with_capacity(17);
    for (index, ch) in raw
        .chars()
        .filter(char::is_ascii_hexdigit)
        .take(MAX_HEX_DIGITS)
        .enumerate()
    {
        if index != 0 && index % 2 == 0 {
            masked.push(':');
        }
        masked.push(ch.to_ascii_uppercase());
    }
    masked
}

pub fn is_valid_mac_address(raw: &str) -> bool {
    MAC_ADDRESS_REGEX.is_match(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_hex_digits() {
        assert_eq!(apply_mac_address_mask("a"), "A");
        assert_eq!(apply_mac_address_mask("aabbc"), "AA:BB:C");
        assert_eq!(apply_mac_address_mask("aa-bb-cc-dd-ee-ff"), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn drops_non_hex_and_overflow() {
        assert_eq!(apply_mac_address_mask("zz00gg11"), "00:11");
        assert_eq!(
            apply_mac_address_mask("001122334455667788"),
            "00:11:22:33:44:55"
        );
    }

    #[test]
    fn validator() {
        assert!(is_valid_mac_address("00:1A:2b:3C:4d:5E"));
        assert!(!is_valid_mac_address("00:1A:2b:3C:4d"));
    }
}
