use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::domain::NumberField;
use crate::form::field::FieldValue;

use super::helpers::{format_number, plain_char};
use super::{ComponentKind, FieldComponent, KeyOutcome, palette::ComponentPalette};

/// Numeric input. Typed text is coerced to a number before it is committed;
/// text that does not parse stays on screen and the committed value is kept.
#[derive(Debug, Clone)]
pub struct NumberComponent {
    config: NumberField,
    buffer: String,
    value: Option<f64>,
    issue: Option<String>,
    palette: Arc<ComponentPalette>,
}

impl NumberComponent {
    pub fn new(config: NumberField, palette: Arc<ComponentPalette>) -> Self {
        Self {
            config,
            buffer: String::new(),
            value: None,
            issue: None,
            palette,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    fn reparse(&mut self) -> KeyOutcome {
        let trimmed = self.buffer.trim();
        if trimmed.is_empty() {
            self.issue = None;
            self.value = None;
            return KeyOutcome::Changed(FieldValue::Empty);
        }
        match parse_number(trimmed) {
            Some(number) => {
                self.issue = None;
                self.value = Some(number);
                KeyOutcome::Changed(FieldValue::Number(number))
            }
            None => {
                self.issue = Some(format!("'{trimmed}' is not a number"));
                KeyOutcome::Handled
            }
        }
    }

    fn step(&mut self, direction: f64, fast: bool) -> KeyOutcome {
        let step = self.palette.numeric.step(self.config.step, fast);
        let mut next = self.value.unwrap_or(0.0) + direction * step;
        if let Some(min) = self.config.min {
            next = next.max(min);
        }
        if let Some(max) = self.config.max {
            next = next.min(max);
        }
        next = round_to_step(next, self.config.step);
        if self.value == Some(next) {
            return KeyOutcome::Handled;
        }
        self.value = Some(next);
        self.issue = None;
        self.buffer = format_number(next);
        KeyOutcome::Changed(FieldValue::Number(next))
    }
}

impl FieldComponent for NumberComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Number
    }

    fn display_value(&self) -> String {
        self.buffer.clone()
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        let fast = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Left if self.palette.numeric.step_with_arrows => self.step(-1.0, fast),
            KeyCode::Right if self.palette.numeric.step_with_arrows => self.step(1.0, fast),
            KeyCode::Backspace => {
                if self.buffer.pop().is_none() {
                    return KeyOutcome::Ignored;
                }
                self.reparse()
            }
            KeyCode::Delete => {
                self.buffer.clear();
                self.reparse()
            }
            _ => match plain_char(key) {
                Some(ch) => {
                    self.buffer.push(ch);
                    self.reparse()
                }
                None => KeyOutcome::Ignored,
            },
        }
    }

    fn seed_value(&mut self, value: &FieldValue) {
        self.issue = None;
        match value {
            FieldValue::Number(number) => {
                self.value = Some(*number);
                self.buffer = format_number(*number);
            }
            FieldValue::Text(text) => {
                self.buffer = text.clone();
                self.value = parse_number(text);
            }
            _ => {
                self.value = None;
                self.buffer.clear();
            }
        }
    }

    fn current_value(&self) -> FieldValue {
        self.value.map(FieldValue::Number).unwrap_or_default()
    }

    fn issue(&self) -> Option<&str> {
        self.issue.as_deref()
    }
}

/// Accepts `.` or `,` as decimal separator.
fn parse_number(text: &str) -> Option<f64> {
    text.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

fn round_to_step(value: f64, step: f64) -> f64 {
    let decimals = format_number(step)
        .split_once('.')
        .map(|(_, fraction)| fraction.len())
        .unwrap_or(0) as i32;
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn component() -> NumberComponent {
        NumberComponent::new(NumberField::default(), Arc::new(ComponentPalette::default()))
    }

    #[test]
    fn typed_digits_commit_numbers() {
        let mut number = component();
        number.handle_key(&key(KeyCode::Char('4')));
        let outcome = number.handle_key(&key(KeyCode::Char('2')));
        assert_eq!(outcome, KeyOutcome::Changed(FieldValue::Number(42.0)));
    }

    #[test]
    fn unparsable_text_keeps_committed_value() {
        let mut number = component();
        number.seed_value(&FieldValue::Number(7.0));
        let outcome = number.handle_key(&key(KeyCode::Char('x')));
        assert_eq!(outcome, KeyOutcome::Handled);
        assert_eq!(number.text(), "7x");
        assert_eq!(number.current_value(), FieldValue::Number(7.0));
        assert!(number.issue().is_some());
    }

    #[test]
    fn arrows_step_and_clamp_at_minimum() {
        let mut number = component();
        assert_eq!(
            number.handle_key(&key(KeyCode::Left)),
            KeyOutcome::Changed(FieldValue::Number(0.0))
        );
        assert_eq!(number.handle_key(&key(KeyCode::Left)), KeyOutcome::Handled);
        assert_eq!(
            number.handle_key(&key(KeyCode::Right)),
            KeyOutcome::Changed(FieldValue::Number(0.01))
        );
        let fast = KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT);
        assert_eq!(
            number.handle_key(&fast),
            KeyOutcome::Changed(FieldValue::Number(0.11))
        );
    }

    #[test]
    fn comma_is_a_decimal_separator() {
        assert_eq!(parse_number("3,5"), Some(3.5));
        assert_eq!(parse_number("-"), None);
    }
}
