use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};

use crate::domain::ChoiceOption;
use crate::form::field::FieldValue;

use super::helpers::step_cursor;
use super::{
    ComponentKind, FieldComponent, KeyOutcome, ListOverlay, OverlayRow, OverlayView,
    palette::ComponentPalette,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceStyle {
    /// Closed trigger plus a popup list.
    Dropdown,
    /// Every option inline, one active.
    Radio,
}

/// Single choice among flat options. The committed value is the option id.
#[derive(Debug, Clone)]
pub struct ChoiceComponent {
    style: ChoiceStyle,
    options: Vec<ChoiceOption>,
    selected: Option<usize>,
    open: bool,
    cursor: usize,
    placeholder: String,
    palette: Arc<ComponentPalette>,
}

impl ChoiceComponent {
    pub fn new(
        style: ChoiceStyle,
        options: Vec<ChoiceOption>,
        placeholder: Option<String>,
        palette: Arc<ComponentPalette>,
    ) -> Self {
        Self {
            style,
            options,
            selected: None,
            open: false,
            cursor: 0,
            placeholder: placeholder.unwrap_or_else(|| "Select an option".to_string()),
            palette,
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected
            .and_then(|index| self.options.get(index))
            .map(|option| option.id.as_str())
    }

    /// Next enabled option from `start` in `delta` direction.
    fn next_enabled(&self, start: Option<usize>, delta: i32) -> Option<usize> {
        let len = self.options.len();
        if len == 0 {
            return None;
        }
        let Some(mut index) = start else {
            let mut enabled = self.options.iter().enumerate().filter(|(_, o)| !o.disabled);
            let found = if delta > 0 { enabled.next() } else { enabled.last() };
            return found.map(|(index, _)| index);
        };
        let wrap = self.palette.choices.wrap_around;
        for _ in 0..len {
            let next = step_cursor(index, delta, len, wrap);
            if next == index {
                return None;
            }
            index = next;
            if !self.options[index].disabled {
                return Some(index);
            }
        }
        None
    }

    fn select(&mut self, index: usize) -> KeyOutcome {
        let Some(option) = self.options.get(index) else {
            return KeyOutcome::Ignored;
        };
        if option.disabled {
            tracing::debug!(option = %option.id, "ignoring disabled option");
            return KeyOutcome::Handled;
        }
        self.open = false;
        if self.selected == Some(index) {
            return KeyOutcome::Handled;
        }
        self.selected = Some(index);
        KeyOutcome::Changed(FieldValue::Text(option.id.clone()))
    }

    fn cycle(&mut self, delta: i32) -> KeyOutcome {
        match self.next_enabled(self.selected, delta) {
            Some(index) => self.select(index),
            None => KeyOutcome::Handled,
        }
    }
}

impl FieldComponent for ChoiceComponent {
    fn kind(&self) -> ComponentKind {
        match self.style {
            ChoiceStyle::Dropdown => ComponentKind::Select,
            ChoiceStyle::Radio => ComponentKind::Radio,
        }
    }

    fn display_value(&self) -> String {
        match self.style {
            ChoiceStyle::Dropdown => self
                .selected
                .and_then(|index| self.options.get(index))
                .map(|option| format!("{} ▾", option.label))
                .unwrap_or_else(|| format!("{} ▾", self.placeholder)),
            ChoiceStyle::Radio => self
                .options
                .iter()
                .enumerate()
                .map(|(index, option)| {
                    let mark = if self.selected == Some(index) { "(•)" } else { "( )" };
                    if option.disabled {
                        format!("{mark} {} (disabled)", option.label)
                    } else {
                        format!("{mark} {}", option.label)
                    }
                })
                .collect::<Vec<_>>()
                .join("  "),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        if self.style == ChoiceStyle::Dropdown && self.open {
            let wrap = self.palette.choices.wrap_around;
            return match key.code {
                KeyCode::Up => {
                    self.cursor = step_cursor(self.cursor, -1, self.options.len(), wrap);
                    KeyOutcome::Handled
                }
                KeyCode::Down => {
                    self.cursor = step_cursor(self.cursor, 1, self.options.len(), wrap);
                    KeyOutcome::Handled
                }
                KeyCode::Enter | KeyCode::Char(' ') => self.select(self.cursor),
                KeyCode::Esc => self.dismiss(),
                _ => KeyOutcome::Ignored,
            };
        }
        match key.code {
            KeyCode::Left => self.cycle(-1),
            KeyCode::Right => self.cycle(1),
            KeyCode::Enter if self.style == ChoiceStyle::Dropdown => {
                self.open = true;
                self.cursor = self.selected.unwrap_or(0);
                KeyOutcome::Handled
            }
            KeyCode::Delete if self.selected.is_some() => {
                self.selected = None;
                KeyOutcome::Changed(FieldValue::Empty)
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn seed_value(&mut self, value: &FieldValue) {
        self.selected = value
            .as_text()
            .and_then(|id| self.options.iter().position(|option| option.id == id));
    }

    fn current_value(&self) -> FieldValue {
        self.selected_id()
            .map(|id| FieldValue::Text(id.to_string()))
            .unwrap_or_default()
    }

    fn dismiss(&mut self) -> KeyOutcome {
        if self.open {
            self.open = false;
            KeyOutcome::Handled
        } else {
            KeyOutcome::Ignored
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn overlay(&self) -> Option<OverlayView> {
        if !self.open {
            return None;
        }
        let rows = self
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let marker = if self.selected == Some(index) { "✓" } else { " " };
                OverlayRow::new(marker, option.label.clone()).with_disabled(option.disabled)
            })
            .collect();
        Some(OverlayView::List(ListOverlay {
            title: self.placeholder.clone(),
            rows,
            cursor: Some(self.cursor),
            empty_text: self.palette.selectors.empty_text.to_string(),
            ..ListOverlay::default()
        }))
    }
}
