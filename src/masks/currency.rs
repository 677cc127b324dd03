const PREFIX: &str = "R$ ";
const MAX_DECIMALS: usize = 2;

/// Brazilian real formatting: `R$ 1.234,56`.
///
/// `,` is the decimal separator. Without a comma, a trailing `.` followed by
/// one or two digits is read as the decimal point; any other `.` groups
/// thousands. At most two decimals are kept.
pub fn apply_currency_mask(raw: &str) -> String {
    if !raw.chars().any(|ch| ch.is_ascii_digit()) {
        return String::new();
    }

    let (integer_raw, decimal_raw) = match decimal_split(raw) {
        Some(index) => (&raw[..index], Some(&raw[index + 1..])),
        None => (raw, None),
    };

    let integer_digits = integer_raw
        .chars()
        .filter(char::is_ascii_digit)
        .skip_while(|ch| *ch == '0')
        .collect::<String>();
    let integer = if integer_digits.is_empty() {
        "0".to_string()
    } else {
        group_thousands(&integer_digits)
    };

    let mut formatted = format!("{PREFIX}{integer}");
    if let Some(decimal) = decimal_raw {
        formatted.push(',');
        formatted.extend(
            decimal
                .chars()
                .filter(char::is_ascii_digit)
                .take(MAX_DECIMALS),
        );
    }
    formatted
}

fn decimal_split(raw: &str) -> Option<usize> {
    if let Some(index) = raw.rfind(',') {
        return Some(index);
    }
    let index = raw.rfind('.')?;
    let tail = &raw[index + 1..];
    let is_decimal = (1..=MAX_DECIMALS).contains(&tail.len())
        && tail.chars().all(|ch| ch.is_ascii_digit());
    is_decimal.then_some(index)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && (index + 3 - offset) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_digitless_input_is_empty() {
        assert_eq!(apply_currency_mask(""), "");
        assert_eq!(apply_currency_mask("R$ ,"), "");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(apply_currency_mask("5"), "R$ 5");
        assert_eq!(apply_currency_mask("1234"), "R$ 1.234");
        assert_eq!(apply_currency_mask("1234567"), "R$ 1.234.567");
        assert_eq!(apply_currency_mask("000120"), "R$ 120");
    }

    #[test]
    fn keeps_up_to_two_decimals() {
        assert_eq!(apply_currency_mask("1234,5"), "R$ 1.234,5");
        assert_eq!(apply_currency_mask("1234,567"), "R$ 1.234,56");
        assert_eq!(apply_currency_mask("12."), "R$ 12");
        assert_eq!(apply_currency_mask("12.5"), "R$ 12,5");
        assert_eq!(apply_currency_mask(",5"), "R$ 0,5");
        assert_eq!(apply_currency_mask("12,"), "R$ 12,");
    }

    #[test]
    fn remasking_is_stable() {
        for raw in ["1234,56", "R$ 1.234", "9.999.999,9", "12,"] {
            let once = apply_currency_mask(raw);
            assert_eq!(apply_currency_mask(&once), once);
        }
    }
}
