use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::domain::FieldPath;

use super::field::FieldValue;

pub type Listener = Box<dyn Fn(&FieldPath, &FieldValue)>;

/// Host-owned value store the form reads from and writes into.
///
/// The form never keeps authoritative field values itself: every committed
/// change goes through [`FormController::set_value`], and external writes
/// reach the widgets through [`FormController::subscribe`].
pub trait FormController {
    fn get_value(&self, path: &FieldPath) -> FieldValue;
    fn set_value(&self, path: &FieldPath, value: FieldValue);
    fn subscribe(&self, path: &FieldPath, listener: Listener) -> Subscription;
}

/// Registration returned by [`FormController::subscribe`]. Dropping it
/// unregisters the listener.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to release.
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

type SharedListener = Rc<dyn Fn(&FieldPath, &FieldValue)>;

#[derive(Default)]
struct Store {
    values: IndexMap<FieldPath, FieldValue>,
    listeners: Vec<(u64, FieldPath, SharedListener)>,
    next_id: u64,
}

/// In-memory [`FormController`]. Clones share the same store.
#[derive(Clone, Default)]
pub struct MemoryController {
    store: Rc<RefCell<Store>>,
}

impl MemoryController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every value written so far, in first-write order.
    pub fn values(&self) -> IndexMap<FieldPath, FieldValue> {
        self.store.borrow().values.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.store.borrow().listeners.len()
    }
}

impl FormController for MemoryController {
    fn get_value(&self, path: &FieldPath) -> FieldValue {
        self.store
            .borrow()
            .values
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    fn set_value(&self, path: &FieldPath, value: FieldValue) {
        // Listeners may read the store, so call them after the borrow ends.
        let listeners: Vec<SharedListener> = {
            let mut store = self.store.borrow_mut();
            store.values.insert(path.clone(), value.clone());
            store
                .listeners
                .iter()
                .filter(|(_, watched, _)| watched == path)
                .map(|(_, _, listener)| Rc::clone(listener))
                .collect()
        };
        tracing::debug!(field = %path, listeners = listeners.len(), "value set");
        for listener in listeners {
            listener(path, &value);
        }
    }

    fn subscribe(&self, path: &FieldPath, listener: Listener) -> Subscription {
        let id = {
            let mut store = self.store.borrow_mut();
            let id = store.next_id;
            store.next_id += 1;
            store
                .listeners
                .push((id, path.clone(), Rc::from(listener)));
            id
        };
        let store: Weak<RefCell<Store>> = Rc::downgrade(&self.store);
        Subscription::new(move || {
            if let Some(store) = store.upgrade() {
                store
                    .borrow_mut()
                    .listeners
                    .retain(|(listener_id, _, _)| *listener_id != id);
            }
        })
    }
}

impl fmt::Debug for MemoryController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.borrow();
        f.debug_struct("MemoryController")
            .field("values", &store.values)
            .field("listeners", &store.listeners.len())
            .finish()
    }
}
