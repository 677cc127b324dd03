pub mod components;
mod value;

use crossterm::event::KeyEvent;

use crate::domain::{FieldDescriptor, FieldPath};

use self::components::{ComponentKind, FieldComponent, KeyOutcome, OverlayView};
use super::controller::FormController;

pub use value::{FieldValue, UploadedFile};

/// One rendered field: its descriptor, the widget built for it and the
/// validation message currently attached.
#[derive(Debug)]
pub struct FieldState {
    pub descriptor: FieldDescriptor,
    component: Box<dyn FieldComponent>,
    pub dirty: bool,
    pub error: Option<String>,
}

impl FieldState {
    pub fn new(descriptor: FieldDescriptor, component: Box<dyn FieldComponent>) -> Self {
        Self {
            descriptor,
            component,
            dirty: false,
            error: None,
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.descriptor.name
    }

    pub fn kind(&self) -> ComponentKind {
        self.component.kind()
    }

    pub fn component(&self) -> &dyn FieldComponent {
        self.component.as_ref()
    }

    pub fn display_value(&self) -> String {
        self.component.display_value()
    }

    pub fn current_value(&self) -> FieldValue {
        self.component.current_value()
    }

    pub fn is_disabled(&self) -> bool {
        self.descriptor.display.disabled
    }

    /// Offer a key to the widget and propagate a committed change to the
    /// controller. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent, controller: &dyn FormController) -> bool {
        if self.is_disabled() {
            return false;
        }
        let outcome = self.component.handle_key(key);
        self.apply(outcome, controller)
    }

    /// Focus left the field: dismiss any open popup. Runs after the key that
    /// moved focus has been fully handled, so a pending selection is
    /// committed first.
    pub fn blur(&mut self, controller: &dyn FormController) -> bool {
        let outcome = self.component.dismiss();
        self.apply(outcome, controller)
    }

    /// Reseed the widget when the controller holds a different value.
    pub fn sync_from(&mut self, value: &FieldValue) -> bool {
        if self.component.current_value() == *value {
            return false;
        }
        tracing::debug!(field = %self.descriptor.name, "reseeding from controller");
        self.component.seed_value(value);
        true
    }

    pub fn is_open(&self) -> bool {
        self.component.is_open()
    }

    pub fn overlay(&self) -> Option<OverlayView> {
        self.component.overlay()
    }

    /// Widget-level problem that never reached the controller.
    pub fn issue(&self) -> Option<&str> {
        self.component.issue()
    }

    /// Message to show under the field: validation error first, then any
    /// widget issue. Hidden when the descriptor asks for it.
    pub fn message(&self) -> Option<&str> {
        if self.descriptor.display.hide_error_message {
            return None;
        }
        self.error.as_deref().or_else(|| self.issue())
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(message.into());
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn apply(&mut self, outcome: KeyOutcome, controller: &dyn FormController) -> bool {
        match outcome {
            KeyOutcome::Ignored => false,
            KeyOutcome::Handled => true,
            KeyOutcome::Changed(value) => {
                tracing::debug!(
                    field = %self.descriptor.name,
                    kind = self.descriptor.type_tag(),
                    "propagating change"
                );
                controller.set_value(&self.descriptor.name, value);
                self.dirty = true;
                self.error = None;
                true
            }
        }
    }
}
