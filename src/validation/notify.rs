use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::tree::{ErrorTree, flatten_errors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Fire-and-forget sink for user notifications.
pub trait Notifier {
    fn notify(&self, toast: Toast);
}

impl<F> Notifier for F
where
    F: Fn(Toast),
{
    fn notify(&self, toast: Toast) {
        self(toast)
    }
}

/// Bounded in-memory notifier; the newest toasts are kept.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    inner: Rc<RefCell<VecDeque<Toast>>>,
    capacity: usize,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::with_capacity(8)
    }
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(VecDeque::new())),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Newest last.
    pub fn snapshot(&self) -> Vec<Toast> {
        self.inner.borrow().iter().cloned().collect()
    }

    pub fn dismiss_oldest(&self) -> Option<Toast> {
        self.inner.borrow_mut().pop_front()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, toast: Toast) {
        let mut queue = self.inner.borrow_mut();
        while queue.len() >= self.capacity {
            queue.pop_front();
        }
        queue.push_back(toast);
    }
}

/// One error toast per flattened message, titled after the field path.
/// Returns the number of toasts sent.
pub fn report_errors(tree: &ErrorTree, notifier: &dyn Notifier) -> usize {
    let flat = flatten_errors(tree);
    for (path, message) in &flat {
        notifier.notify(Toast::error(format!("Field: {path}"), message.clone()));
    }
    flat.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_message_becomes_a_toast() {
        let queue = ToastQueue::new();
        let tree = ErrorTree::from_pairs([("a.b", "required"), ("c[0]", "x")]);
        assert_eq!(report_errors(&tree, &queue), 2);
        let toasts = queue.snapshot();
        assert_eq!(toasts[0], Toast::error("Field: a.b", "required"));
        assert_eq!(toasts[1].title, "Field: c[0]");
    }

    #[test]
    fn queue_drops_oldest_when_full() {
        let queue = ToastQueue::with_capacity(2);
        for index in 0..3 {
            queue.notify(Toast::success(format!("t{index}"), ""));
        }
        let titles = queue
            .snapshot()
            .into_iter()
            .map(|toast| toast.title)
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["t1", "t2"]);
    }

    #[test]
    fn closures_are_notifiers() {
        let seen = RefCell::new(Vec::new());
        let sink = |toast: Toast| seen.borrow_mut().push(toast.kind);
        sink.notify(Toast::success("Saved", ""));
        assert_eq!(*seen.borrow(), vec![ToastKind::Success]);
    }
}
