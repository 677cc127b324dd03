use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};

use crate::form::field::FieldValue;

use super::{ComponentKind, FieldComponent, KeyOutcome, palette::ComponentPalette};

#[derive(Debug, Clone)]
pub struct SwitchComponent {
    value: bool,
    palette: Arc<ComponentPalette>,
}

impl SwitchComponent {
    pub fn new(palette: Arc<ComponentPalette>) -> Self {
        Self {
            value: false,
            palette,
        }
    }

    pub fn is_on(&self) -> bool {
        self.value
    }

    fn toggle(&mut self) -> KeyOutcome {
        self.value = !self.value;
        KeyOutcome::Changed(FieldValue::Bool(self.value))
    }
}

impl FieldComponent for SwitchComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Switch
    }

    fn display_value(&self) -> String {
        let presentation = &self.palette.switches;
        if self.value {
            format!("[●━] {}", presentation.on_label)
        } else {
            format!("[━○] {}", presentation.off_label)
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        let presentation = &self.palette.switches;
        match key.code {
            KeyCode::Char(' ') if presentation.toggle_with_space => self.toggle(),
            KeyCode::Left | KeyCode::Right if presentation.toggle_with_arrows => self.toggle(),
            _ => KeyOutcome::Ignored,
        }
    }

    fn seed_value(&mut self, value: &FieldValue) {
        self.value = matches!(value, FieldValue::Bool(true));
    }

    fn current_value(&self) -> FieldValue {
        FieldValue::Bool(self.value)
    }
}
