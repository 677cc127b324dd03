use crossterm::event::{KeyCode, KeyEvent};

use crate::domain::ChoiceOption;
use crate::form::field::FieldValue;

use super::helpers::step_cursor;
use super::{ComponentKind, FieldComponent, KeyOutcome};

/// Inline checkbox group. Space adds or removes the option under the cursor
/// from the current id list.
#[derive(Debug, Clone)]
pub struct CheckboxComponent {
    options: Vec<ChoiceOption>,
    values: Vec<String>,
    cursor: usize,
}

impl CheckboxComponent {
    pub fn new(options: Vec<ChoiceOption>) -> Self {
        Self {
            options,
            values: Vec::new(),
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn toggle_cursor(&mut self) -> KeyOutcome {
        let Some(option) = self.options.get(self.cursor) else {
            return KeyOutcome::Ignored;
        };
        if option.disabled {
            tracing::debug!(option = %option.id, "ignoring disabled checkbox");
            return KeyOutcome::Handled;
        }
        self.values = toggled(&self.values, &option.id);
        KeyOutcome::Changed(FieldValue::List(self.values.clone()))
    }
}

/// New selection with `id` added when absent, removed when present.
pub fn toggled(values: &[String], id: &str) -> Vec<String> {
    if values.iter().any(|value| value == id) {
        values.iter().filter(|value| *value != id).cloned().collect()
    } else {
        let mut next = values.to_vec();
        next.push(id.to_string());
        next
    }
}

impl FieldComponent for CheckboxComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Checkbox
    }

    fn display_value(&self) -> String {
        self.options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let mark = if self.values.contains(&option.id) { "[x]" } else { "[ ]" };
                let pointer = if index == self.cursor { "›" } else { " " };
                format!("{pointer}{mark} {}", option.label)
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Left => {
                self.cursor = step_cursor(self.cursor, -1, self.options.len(), false);
                KeyOutcome::Handled
            }
            KeyCode::Right => {
                self.cursor = step_cursor(self.cursor, 1, self.options.len(), false);
                KeyOutcome::Handled
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_cursor(),
            _ => KeyOutcome::Ignored,
        }
    }

    fn seed_value(&mut self, value: &FieldValue) {
        let mut values: Vec<String> = Vec::new();
        for id in value.as_list().unwrap_or_default() {
            if !values.contains(id) {
                values.push(id.clone());
            }
        }
        self.values = values;
    }

    fn current_value(&self) -> FieldValue {
        FieldValue::List(self.values.clone())
    }
}
