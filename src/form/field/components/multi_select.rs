use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::domain::MultiSelectField;
use crate::form::field::FieldValue;
use crate::widgets::{
    MultiSelectAction, MultiSelectRules, MultiSelectState, TextDirection, filter_choices,
    multi_select_key, reduce_multi_select, truncate_chips,
};

use super::{
    ComponentKind, FieldComponent, KeyOutcome, ListOverlay, OverlayRow, OverlayView,
    palette::ComponentPalette,
};

/// Chip-style multi-value selector backed by the multi-select reducer.
#[derive(Debug, Clone)]
pub struct MultiSelectComponent {
    config: MultiSelectField,
    state: MultiSelectState,
    placeholder: String,
    direction: TextDirection,
    palette: Arc<ComponentPalette>,
}

impl MultiSelectComponent {
    pub fn new(
        config: MultiSelectField,
        placeholder: Option<String>,
        direction: TextDirection,
        palette: Arc<ComponentPalette>,
    ) -> Self {
        let placeholder =
            placeholder.unwrap_or_else(|| palette.selectors.placeholder.to_string());
        Self {
            config,
            state: MultiSelectState::default(),
            placeholder,
            direction,
            palette,
        }
    }

    pub fn state(&self) -> &MultiSelectState {
        &self.state
    }

    fn rules(&self) -> MultiSelectRules<'_> {
        MultiSelectRules::new(&self.config.options)
            .with_max_selected(self.config.max_selected)
            .with_loop(self.config.loop_navigation)
            .with_wrap_list(self.palette.choices.wrap_around)
    }

    /// Run one reducer step and report whether the selection changed.
    pub fn apply(&mut self, action: MultiSelectAction) -> KeyOutcome {
        let before = self.state.values.clone();
        let next = reduce_multi_select(self.state.clone(), action, &self.rules());
        self.state = next;
        if self.state.values != before {
            KeyOutcome::Changed(FieldValue::List(self.state.values.clone()))
        } else {
            KeyOutcome::Handled
        }
    }

    fn chip(&self, index: usize, id: &str) -> String {
        let label = self
            .rules()
            .option(id)
            .map(|option| option.label.as_str())
            .unwrap_or(id);
        let remove = if self.config.disabled_trigger { "" } else { " ×" };
        if self.state.active_index == Some(index) {
            format!("<{label}{remove}>")
        } else {
            format!("[{label}{remove}]")
        }
    }
}

impl FieldComponent for MultiSelectComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::MultiSelect
    }

    fn display_value(&self) -> String {
        if self.state.values.is_empty() {
            return if self.state.input.is_empty() {
                self.placeholder.clone()
            } else {
                format!("› {}", self.state.input)
            };
        }
        let (shown, hidden) = truncate_chips(&self.state.values, self.config.items_shown);
        let mut parts = shown
            .iter()
            .enumerate()
            .map(|(index, id)| self.chip(index, id))
            .collect::<Vec<_>>();
        if hidden > 0 {
            parts.push(self.palette.selectors.overflow(hidden));
        }
        if !self.state.input.is_empty() {
            parts.push(format!("› {}", self.state.input));
        }
        parts.join(" ")
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        let rules = self.rules();
        match multi_select_key(&self.state, &rules, key, self.direction) {
            Some(action) => self.apply(action),
            None => KeyOutcome::Ignored,
        }
    }

    fn seed_value(&mut self, value: &FieldValue) {
        let values = value.as_list().unwrap_or_default().to_vec();
        let fresh = MultiSelectState::with_values(values);
        self.state.values = fresh.values;
        self.state.active_index = None;
    }

    fn current_value(&self) -> FieldValue {
        FieldValue::List(self.state.values.clone())
    }

    fn dismiss(&mut self) -> KeyOutcome {
        if self.state.open || self.state.active_index.is_some() || !self.state.input.is_empty() {
            self.apply(MultiSelectAction::Dismiss)
        } else {
            KeyOutcome::Ignored
        }
    }

    fn is_open(&self) -> bool {
        self.state.open
    }

    fn overlay(&self) -> Option<OverlayView> {
        if !self.state.open {
            return None;
        }
        let copy = &self.palette.selectors;
        let matches = filter_choices(&self.config.options, &self.state.input);
        let rows = matches
            .iter()
            .map(|option| {
                let marker = if self.state.is_selected(&option.id) { "[x]" } else { "[ ]" };
                OverlayRow::new(marker, option.label.clone()).with_disabled(option.disabled)
            })
            .collect();
        let counter = copy.count(self.state.values.len(), self.config.options.len());
        let header = if self.config.options.len() >= copy.toggle_all_threshold {
            format!("{counter} · {}", copy.toggle_all_label)
        } else {
            counter
        };
        Some(OverlayView::List(ListOverlay {
            title: self.placeholder.clone(),
            query: Some(self.state.input.clone()),
            header: Some(header),
            rows,
            cursor: (!matches.is_empty()).then_some(self.state.highlighted),
            empty_text: copy.empty_text.to_string(),
        }))
    }
}
