use crossterm::event::{KeyCode, KeyEvent};

use crate::form::field::FieldValue;
use crate::masks::{LinkTarget, Mask, link_target};

use super::helpers::{edit_masked, is_ctrl};
use super::{ComponentKind, FieldComponent, KeyOutcome};

/// Flavour of a free-text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextVariant {
    Plain,
    Password,
    Textarea,
    Link,
}

#[derive(Debug, Clone)]
pub struct TextComponent {
    variant: TextVariant,
    buffer: String,
    mask: Mask,
    revealed: bool,
}

impl TextComponent {
    pub fn new(variant: TextVariant, mask: Mask) -> Self {
        Self {
            variant,
            buffer: String::new(),
            mask,
            revealed: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Where the link text points, for link fields.
    pub fn target(&self) -> Option<LinkTarget> {
        match self.variant {
            TextVariant::Link => link_target(&self.buffer),
            _ => None,
        }
    }

    fn committed(&self) -> KeyOutcome {
        KeyOutcome::Changed(self.current_value())
    }

    /// Line breaks go through the mask like any typed character.
    fn new_line(&mut self) -> KeyOutcome {
        let masked = self.mask.apply(&format!("{}\n", self.buffer));
        let too_long = self
            .mask
            .max_len()
            .is_some_and(|max| masked.chars().count() > max);
        if too_long || masked == self.buffer {
            return KeyOutcome::Ignored;
        }
        self.buffer = masked;
        self.committed()
    }
}

impl FieldComponent for TextComponent {
    fn kind(&self) -> ComponentKind {
        match self.variant {
            TextVariant::Plain => ComponentKind::TextInput,
            TextVariant::Password => ComponentKind::Password,
            TextVariant::Textarea => ComponentKind::Textarea,
            TextVariant::Link => ComponentKind::Link,
        }
    }

    fn display_value(&self) -> String {
        match self.variant {
            TextVariant::Password if !self.revealed => "•".repeat(self.buffer.chars().count()),
            TextVariant::Link => match self.target() {
                Some(LinkTarget::Url(url)) => format!("{url} ↗"),
                Some(LinkTarget::Mail(address)) => format!("{address} ✉"),
                None => self.buffer.clone(),
            },
            _ => self.buffer.clone(),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        if self.variant == TextVariant::Password && is_ctrl(key, 'r') {
            self.revealed = !self.revealed;
            return KeyOutcome::Handled;
        }
        if self.variant == TextVariant::Textarea && key.code == KeyCode::Enter {
            return self.new_line();
        }
        if edit_masked(&mut self.buffer, &self.mask, key) {
            self.committed()
        } else {
            KeyOutcome::Ignored
        }
    }

    fn seed_value(&mut self, value: &FieldValue) {
        self.buffer = match value {
            FieldValue::Text(text) => self.mask.apply(text),
            FieldValue::Number(number) => self.mask.apply(&number.to_string()),
            _ => String::new(),
        };
    }

    fn current_value(&self) -> FieldValue {
        if self.buffer.is_empty() {
            FieldValue::Empty
        } else {
            FieldValue::Text(self.buffer.clone())
        }
    }
}
