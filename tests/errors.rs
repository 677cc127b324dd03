use dynaform::validation::{
    ErrorTree, Notifier, ROOT_KEY, Toast, ToastKind, ToastQueue, flatten_errors, report_errors,
};
use serde_json::json;

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(path, message)| (path.to_string(), message.to_string()))
        .collect()
}

#[test]
fn flattens_nested_objects_and_array_slots() {
    let raw = json!({
        "a": { "b": { "message": "required" } },
        "c": [{ "message": "x" }]
    });
    let tree = ErrorTree::from_json(&raw).expect("tree");
    assert_eq!(
        flatten_errors(&tree),
        pairs(&[("a.b", "required"), ("c[0]", "x")])
    );
}

#[test]
fn holes_in_lists_keep_their_index() {
    let raw = json!({ "items": [null, { "name": { "message": "too short" } }] });
    let tree = ErrorTree::from_json(&raw).expect("tree");
    assert_eq!(flatten_errors(&tree), pairs(&[("items[1].name", "too short")]));
}

#[test]
fn values_without_messages_are_dropped() {
    assert_eq!(ErrorTree::from_json(&json!({ "a": 1, "b": [true] })), None);
    assert_eq!(ErrorTree::from_json(&json!(null)), None);
}

#[test]
fn insert_builds_the_same_shape_as_parsing() {
    let mut tree = ErrorTree::new();
    tree.insert("a.b", "required");
    tree.insert("c[0]", "x");
    let parsed = ErrorTree::from_json(&json!({
        "a": { "b": { "message": "required" } },
        "c": [{ "message": "x" }]
    }))
    .expect("tree");
    assert_eq!(tree, parsed);
}

#[test]
fn empty_paths_land_under_the_root_key() {
    let mut tree = ErrorTree::new();
    tree.insert("", "form is incomplete");
    assert_eq!(flatten_errors(&tree), pairs(&[(ROOT_KEY, "form is incomplete")]));
}

#[test]
fn merge_keeps_existing_messages() {
    let mut tree = ErrorTree::from_pairs([("email", "invalid email")]);
    tree.merge(ErrorTree::from_pairs([
        ("email", "email is required"),
        ("name", "name is required"),
    ]));
    assert_eq!(
        flatten_errors(&tree),
        pairs(&[("email", "invalid email"), ("name", "name is required")])
    );
}

#[test]
fn empty_trees_report_nothing() {
    let queue = ToastQueue::new();
    assert!(ErrorTree::new().is_empty());
    assert_eq!(report_errors(&ErrorTree::new(), &queue), 0);
    assert!(queue.is_empty());
}

#[test]
fn every_message_becomes_an_error_toast() {
    let queue = ToastQueue::new();
    let tree = ErrorTree::from_pairs([("user.name", "required"), ("tags[2]", "unknown tag")]);

    assert_eq!(report_errors(&tree, &queue), 2);
    let toasts = queue.snapshot();
    assert!(toasts.iter().all(|toast| toast.kind == ToastKind::Error));
    assert_eq!(toasts[0], Toast::error("Field: user.name", "required"));
    assert_eq!(toasts[1], Toast::error("Field: tags[2]", "unknown tag"));
}

#[test]
fn closures_can_receive_notifications() {
    let seen = std::cell::RefCell::new(Vec::new());
    let sink = |toast: Toast| seen.borrow_mut().push(toast.title);
    sink.notify(Toast::success("Saved", "all good"));
    report_errors(&ErrorTree::from_pairs([("zip", "invalid")]), &sink);
    assert_eq!(*seen.borrow(), vec!["Saved".to_string(), "Field: zip".to_string()]);
}
