use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};

use crate::domain::ChoiceOption;
use crate::form::field::FieldValue;
use crate::widgets::filter_choices;

use super::helpers::{plain_char, step_cursor};
use super::{
    ComponentKind, FieldComponent, KeyOutcome, ListOverlay, OverlayRow, OverlayView,
    palette::ComponentPalette,
};

/// Searchable single choice. Picking the current option again clears it.
#[derive(Debug, Clone)]
pub struct ComboboxComponent {
    options: Vec<ChoiceOption>,
    selected: Option<String>,
    open: bool,
    query: String,
    cursor: usize,
    placeholder: String,
    not_found: String,
    palette: Arc<ComponentPalette>,
}

impl ComboboxComponent {
    pub fn new(
        options: Vec<ChoiceOption>,
        placeholder: Option<String>,
        not_found: Option<String>,
        palette: Arc<ComponentPalette>,
    ) -> Self {
        let not_found = not_found.unwrap_or_else(|| palette.selectors.empty_text.to_string());
        Self {
            options,
            selected: None,
            open: false,
            query: String::new(),
            cursor: 0,
            placeholder: placeholder.unwrap_or_else(|| "Select an option".to_string()),
            not_found,
            palette,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    fn matches(&self) -> Vec<&ChoiceOption> {
        filter_choices(&self.options, &self.query)
    }

    fn pick_cursor(&mut self) -> KeyOutcome {
        let Some(option) = self.matches().get(self.cursor).copied() else {
            return KeyOutcome::Handled;
        };
        if option.disabled {
            tracing::debug!(option = %option.id, "ignoring disabled option");
            return KeyOutcome::Handled;
        }
        let picked = option.id.clone();
        self.close();
        if self.selected.as_deref() == Some(picked.as_str()) {
            self.selected = None;
            KeyOutcome::Changed(FieldValue::Empty)
        } else {
            self.selected = Some(picked.clone());
            KeyOutcome::Changed(FieldValue::Text(picked))
        }
    }

    fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.cursor = 0;
    }

    fn set_query(&mut self, query: String) -> KeyOutcome {
        self.query = query;
        self.cursor = 0;
        self.open = true;
        KeyOutcome::Handled
    }
}

impl FieldComponent for ComboboxComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Combobox
    }

    fn display_value(&self) -> String {
        let label = self
            .selected
            .as_deref()
            .and_then(|id| self.options.iter().find(|option| option.id == id))
            .map(|option| option.label.as_str())
            .unwrap_or(&self.placeholder);
        format!("{label} ⇅")
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        if !self.open {
            return match key.code {
                KeyCode::Enter => {
                    self.open = true;
                    KeyOutcome::Handled
                }
                KeyCode::Delete if self.selected.is_some() => {
                    self.selected = None;
                    KeyOutcome::Changed(FieldValue::Empty)
                }
                _ => match plain_char(key) {
                    Some(ch) => self.set_query(ch.to_string()),
                    None => KeyOutcome::Ignored,
                },
            };
        }
        let wrap = self.palette.choices.wrap_around;
        match key.code {
            KeyCode::Up => {
                self.cursor = step_cursor(self.cursor, -1, self.matches().len(), wrap);
                KeyOutcome::Handled
            }
            KeyCode::Down => {
                self.cursor = step_cursor(self.cursor, 1, self.matches().len(), wrap);
                KeyOutcome::Handled
            }
            KeyCode::Enter => self.pick_cursor(),
            KeyCode::Esc => self.dismiss(),
            KeyCode::Backspace => {
                let mut query = self.query.clone();
                query.pop();
                self.set_query(query)
            }
            _ => match plain_char(key) {
                Some(ch) => {
                    let mut query = self.query.clone();
                    query.push(ch);
                    self.set_query(query)
                }
                None => KeyOutcome::Ignored,
            },
        }
    }

    fn seed_value(&mut self, value: &FieldValue) {
        self.selected = value
            .as_text()
            .filter(|id| self.options.iter().any(|option| option.id == *id))
            .map(str::to_string);
    }

    fn current_value(&self) -> FieldValue {
        self.selected
            .clone()
            .map(FieldValue::Text)
            .unwrap_or_default()
    }

    fn dismiss(&mut self) -> KeyOutcome {
        if self.open {
            self.close();
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
            .matches()
            .into_iter()
            .map(|option| {
                let marker = if self.selected.as_deref() == Some(option.id.as_str()) {
                    "✓"
                } else {
                    " "
                };
                OverlayRow::new(marker, option.label.clone()).with_disabled(option.disabled)
            })
            .collect();
        Some(OverlayView::List(ListOverlay {
            title: self.placeholder.clone(),
            query: Some(self.query.clone()),
            rows,
            cursor: Some(self.cursor),
            empty_text: self.not_found.clone(),
            ..ListOverlay::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_filters_and_repeated_pick_clears() {
        let mut combo = ComboboxComponent::new(
            vec![
                ChoiceOption::new("next", "Next.js"),
                ChoiceOption::new("svelte", "SvelteKit"),
            ],
            None,
            Some("No framework found.".into()),
            Arc::new(ComponentPalette::default()),
        );
        combo.handle_key(&key(KeyCode::Char('s')));
        combo.handle_key(&key(KeyCode::Char('v')));
        assert!(combo.is_open());
        assert_eq!(
            combo.handle_key(&key(KeyCode::Enter)),
            KeyOutcome::Changed(FieldValue::Text("svelte".into()))
        );
        assert!(!combo.is_open());

        combo.handle_key(&key(KeyCode::Enter));
        combo.handle_key(&key(KeyCode::Down));
        assert_eq!(
            combo.handle_key(&key(KeyCode::Enter)),
            KeyOutcome::Changed(FieldValue::Empty)
        );
    }

    #[test]
    fn empty_matches_show_not_found_text() {
        let mut combo = ComboboxComponent::new(
            vec![ChoiceOption::new("next", "Next.js")],
            None,
            Some("No framework found.".into()),
            Arc::new(ComponentPalette::default()),
        );
        combo.handle_key(&key(KeyCode::Char('z')));
        let Some(OverlayView::List(list)) = combo.overlay() else {
            panic!("expected list overlay");
        };
        assert!(list.rows.is_empty());
        assert_eq!(list.empty_text, "No framework found.");
    }
}
