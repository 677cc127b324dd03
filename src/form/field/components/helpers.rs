use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::masks::Mask;

/// Printable character of a key press without Ctrl/Alt chords.
pub(crate) fn plain_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(ch)
        }
        _ => None,
    }
}

pub(crate) fn is_ctrl(key: &KeyEvent, ch: char) -> bool {
    key.code == KeyCode::Char(ch) && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Apply an editing key to a masked buffer. Returns `true` when the buffer
/// changed.
///
/// Backspace keeps deleting while re-masking would restore the same text, so
/// a trailing separator never traps the cursor.
pub(crate) fn edit_masked(buffer: &mut String, mask: &Mask, key: &KeyEvent) -> bool {
    let before = buffer.clone();
    match key.code {
        KeyCode::Backspace => {
            let mut raw = buffer.clone();
            loop {
                if raw.pop().is_none() {
                    *buffer = String::new();
                    break;
                }
                let masked = mask.apply(&raw);
                if masked != before || raw.is_empty() {
                    *buffer = masked;
                    break;
                }
            }
        }
        KeyCode::Delete => buffer.clear(),
        _ => match plain_char(key) {
            Some(ch) => {
                let mut raw = buffer.clone();
                raw.push(ch);
                let masked = mask.apply(&raw);
                if mask.max_len().is_some_and(|max| masked.chars().count() > max) {
                    return false;
                }
                *buffer = masked;
            }
            None => return false,
        },
    }
    *buffer != before
}

/// Move `current` by `delta` over `len` slots.
pub(crate) fn step_cursor(current: usize, delta: i32, len: usize, wrap: bool) -> usize {
    crate::widgets::multi_select::step_index(current, delta, len, wrap)
}

/// Plain-number rendering: integers without a fractional part, other values
/// without trailing zeros.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let text = format!("{value:.6}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masks::MaskKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn backspace_skips_separators() {
        let mask = Mask::Builtin(MaskKind::Cpf);
        let mut buffer = "123.4".to_string();
        assert!(edit_masked(&mut buffer, &mask, &key(KeyCode::Backspace)));
        assert_eq!(buffer, "123");
    }

    #[test]
    fn numbers_render_without_noise() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.50), "2.5");
        assert_eq!(format_number(-0.125), "-0.125");
    }
}
