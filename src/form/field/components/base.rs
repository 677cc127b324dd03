use chrono::NaiveDate;
use crossterm::event::KeyEvent;

use crate::form::field::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    TextInput,
    Password,
    Number,
    Textarea,
    Date,
    DateTime,
    Slider,
    Switch,
    Select,
    MultiSelect,
    Checkbox,
    Radio,
    Combobox,
    FileUpload,
    Link,
    Hierarchical,
}

/// Result of offering a key to a component.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// The key is not for this component.
    Ignored,
    /// Interaction state changed; the committed value did not.
    Handled,
    /// The committed value changed and must be propagated.
    Changed(FieldValue),
}

impl KeyOutcome {
    pub fn consumed(&self) -> bool {
        !matches!(self, KeyOutcome::Ignored)
    }
}

pub trait FieldComponent: std::fmt::Debug {
    fn kind(&self) -> ComponentKind;
    fn display_value(&self) -> String;
    fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome;
    /// Replace the shown value with one coming from the controller.
    fn seed_value(&mut self, value: &FieldValue);
    fn current_value(&self) -> FieldValue;

    /// Problem with the last interaction that did not reach the controller
    /// (unparsable text, rejected file).
    fn issue(&self) -> Option<&str> {
        None
    }

    /// Outside interaction: close any popup and drop ephemeral state.
    fn dismiss(&mut self) -> KeyOutcome {
        KeyOutcome::Ignored
    }

    fn is_open(&self) -> bool {
        false
    }

    fn overlay(&self) -> Option<OverlayView> {
        None
    }
}

/// Popup content of an open component.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayView {
    List(ListOverlay),
    Calendar(CalendarOverlay),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOverlay {
    pub title: String,
    pub query: Option<String>,
    pub header: Option<String>,
    pub rows: Vec<OverlayRow>,
    pub cursor: Option<usize>,
    pub empty_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRow {
    pub marker: String,
    pub label: String,
    pub depth: usize,
    pub disabled: bool,
}

impl OverlayRow {
    pub fn new(marker: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            label: label.into(),
            depth: 0,
            disabled: false,
        }
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarOverlay {
    pub title: String,
    pub cursor: NaiveDate,
    pub today: NaiveDate,
    pub selected_from: Option<NaiveDate>,
    pub selected_to: Option<NaiveDate>,
    pub disable_future: bool,
    pub weekdays: [String; 7],
}

impl CalendarOverlay {
    pub fn is_selected(&self, day: NaiveDate) -> bool {
        match (self.selected_from, self.selected_to) {
            (Some(from), Some(to)) => day >= from && day <= to,
            (Some(from), None) => day == from,
            _ => false,
        }
    }

    pub fn is_disabled(&self, day: NaiveDate) -> bool {
        self.disable_future && day > self.today
    }
}
