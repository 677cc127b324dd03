use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::KeyEvent;
use serde_json::{Map, Value};

use crate::domain::{FieldDescriptor, FieldPath};

use super::{
    controller::{FormController, Subscription},
    dispatch::{DispatchContext, build_component},
    field::{FieldState, FieldValue},
};

/// Ordered fields bound to a host controller, plus the focus cursor.
///
/// External writes to the controller are queued by the per-field
/// subscriptions and applied to the widgets on the next [`FormState::sync`].
#[derive(Debug)]
pub struct FormState {
    pub title: String,
    fields: Vec<FieldState>,
    field_index: usize,
    pub scroll_offset: usize,
    pending: Rc<RefCell<Vec<FieldPath>>>,
    subscriptions: Vec<Subscription>,
}

impl FormState {
    pub fn new(
        title: impl Into<String>,
        descriptors: Vec<FieldDescriptor>,
        controller: &dyn FormController,
        ctx: &DispatchContext,
    ) -> Self {
        let pending = Rc::new(RefCell::new(Vec::new()));
        let mut fields = Vec::with_capacity(descriptors.len());
        let mut subscriptions = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let mut current = controller.get_value(&descriptor.name);
            if current.is_empty()
                && let Some(default) = &descriptor.default
            {
                let seeded = FieldValue::from_json(&descriptor.kind, default);
                if !seeded.is_empty() {
                    controller.set_value(&descriptor.name, seeded.clone());
                    current = seeded;
                }
            }

            let component = build_component(&descriptor, ctx);
            let mut field = FieldState::new(descriptor, component);
            field.sync_from(&current);

            let queue = Rc::clone(&pending);
            subscriptions.push(controller.subscribe(
                field.path(),
                Box::new(move |path, _| queue.borrow_mut().push(path.clone())),
            ));
            fields.push(field);
        }
        Self {
            title: title.into(),
            fields,
            field_index: 0,
            scroll_offset: 0,
            pending,
            subscriptions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldState] {
        &self.fields
    }

    pub fn field(&self, path: &str) -> Option<&FieldState> {
        self.fields.iter().find(|field| field.path().as_str() == path)
    }

    pub fn field_mut(&mut self, path: &str) -> Option<&mut FieldState> {
        self.fields
            .iter_mut()
            .find(|field| field.path().as_str() == path)
    }

    pub fn field_index(&self) -> usize {
        self.field_index
    }

    pub fn set_field_index(&mut self, index: usize) {
        self.field_index = index.min(self.fields.len().saturating_sub(1));
    }

    pub fn focused_field(&self) -> Option<&FieldState> {
        self.fields.get(self.field_index)
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut FieldState> {
        self.fields.get_mut(self.field_index)
    }

    pub fn focus_next_field(&mut self) {
        self.step_focus(1);
    }

    pub fn focus_prev_field(&mut self) {
        self.step_focus(-1);
    }

    fn step_focus(&mut self, delta: i32) {
        let len = self.fields.len() as i32;
        if len == 0 {
            return;
        }
        let next = self.field_index as i32 + delta;
        self.field_index = (((next % len) + len) % len) as usize;
    }

    /// Route a key to the focused field, then bring every widget whose
    /// controller value moved back in line with it.
    pub fn handle_key(&mut self, key: &KeyEvent, controller: &dyn FormController) -> bool {
        let consumed = match self.fields.get_mut(self.field_index) {
            Some(field) => field.handle_key(key, controller),
            None => false,
        };
        self.sync(controller);
        consumed
    }

    /// Dismiss the focused field's popup. Called after the key that moves
    /// focus away has been handled.
    pub fn blur_focused(&mut self, controller: &dyn FormController) -> bool {
        let changed = match self.fields.get_mut(self.field_index) {
            Some(field) => field.blur(controller),
            None => false,
        };
        self.sync(controller);
        changed
    }

    /// Apply queued controller notifications. Returns how many widgets were
    /// reseeded.
    pub fn sync(&mut self, controller: &dyn FormController) -> usize {
        let queued = std::mem::take(&mut *self.pending.borrow_mut());
        let mut reseeded = 0;
        for path in queued {
            let value = controller.get_value(&path);
            if let Some(field) = self.fields.iter_mut().find(|field| *field.path() == path)
                && field.sync_from(&value)
            {
                reseeded += 1;
            }
        }
        reseeded
    }

    /// Assemble the nested form value from the controller. Empty values are
    /// left out so that `required` rules see them as missing.
    pub fn build_value(&self, controller: &dyn FormController) -> Value {
        let mut root = Value::Object(Map::new());
        for field in &self.fields {
            let value = controller.get_value(field.path());
            if value.is_empty() {
                continue;
            }
            let segments = field.path().segments().collect::<Vec<_>>();
            insert_path(&mut root, &segments, value.to_json());
        }
        root
    }

    /// Write every field found in `value` into the controller. Returns the
    /// number of fields written.
    pub fn seed_from_value(&mut self, value: &Value, controller: &dyn FormController) -> usize {
        let mut written = 0;
        for field in &self.fields {
            let segments = field.path().segments().collect::<Vec<_>>();
            if let Some(subvalue) = value_at_path(value, &segments) {
                controller.set_value(
                    field.path(),
                    FieldValue::from_json(&field.descriptor.kind, subvalue),
                );
                written += 1;
            }
        }
        self.sync(controller);
        written
    }

    pub fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.clear_error();
        }
    }

    /// Attach `message` to the field owning `path` (`tags[1]` belongs to
    /// `tags`). The most specific field wins.
    pub fn set_error(&mut self, path: &str, message: impl Into<String>) -> bool {
        let owner = self
            .fields
            .iter_mut()
            .filter(|field| field.path().covers(path))
            .max_by_key(|field| field.path().as_str().len());
        match owner {
            Some(field) => {
                field.set_error(message);
                true
            }
            None => false,
        }
    }

    pub fn clear_error(&mut self, path: &str) {
        if let Some(field) = self.field_mut(path) {
            field.clear_error();
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.fields.iter().any(|field| field.dirty)
    }

    pub fn dirty_count(&self) -> usize {
        self.fields.iter().filter(|field| field.dirty).count()
    }

    pub fn error_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|field| field.error.is_some())
            .count()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

pub(crate) fn insert_path(root: &mut Value, path: &[&str], value: Value) {
    if path.is_empty() {
        *root = value;
        return;
    }

    if !root.is_object() {
        *root = Value::Object(Map::new());
    }

    if let Value::Object(obj) = root {
        if path.len() == 1 {
            obj.insert(path[0].to_string(), value);
            return;
        }

        let entry = obj
            .entry(path[0].to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        insert_path(entry, &path[1..], value);
    }
}

pub(crate) fn value_at_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        match current {
            Value::Object(map) => {
                current = map.get(*segment)?;
            }
            _ => return None,
        }
    }
    Some(current)
}
