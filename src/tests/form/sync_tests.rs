use crate::{
    domain::{
        ChoiceOption, FieldDescriptor, FieldKind, FieldPath, MultiSelectField, TextField,
    },
    form::{FieldValue, FormController, FormState, MemoryController},
    tests::test_ctx,
};

fn tags_form(controller: &MemoryController) -> FormState {
    FormState::new(
        "Tags",
        vec![
            FieldDescriptor::new("title", FieldKind::Input(TextField::default())),
            FieldDescriptor::new(
                "tags",
                FieldKind::MultiSelect(MultiSelectField::new(vec![
                    ChoiceOption::new("rust", "Rust"),
                    ChoiceOption::new("go", "Go"),
                    ChoiceOption::new("zig", "Zig"),
                ])),
            ),
        ],
        controller,
        &test_ctx(),
    )
}

#[test]
fn external_writes_reseed_widgets_on_sync() {
    let controller = MemoryController::new();
    let mut state = tags_form(&controller);

    controller.set_value(&FieldPath::new("title"), FieldValue::Text("Hello".into()));
    controller.set_value(
        &FieldPath::new("tags"),
        FieldValue::List(vec!["go".into(), "rust".into()]),
    );
    assert_eq!(state.sync(&controller), 2);

    assert_eq!(
        state.field("title").map(|f| f.display_value()),
        Some("Hello".into())
    );
    assert_eq!(
        state.field("tags").map(|f| f.current_value()),
        Some(FieldValue::List(vec!["go".into(), "rust".into()]))
    );
    assert!(!state.is_dirty());
}

#[test]
fn sync_without_changes_is_a_no_op() {
    let controller = MemoryController::new();
    let mut state = tags_form(&controller);
    assert_eq!(state.sync(&controller), 0);

    controller.set_value(&FieldPath::new("title"), FieldValue::Empty);
    assert_eq!(state.sync(&controller), 0);
}

#[test]
fn writes_to_unknown_paths_are_ignored() {
    let controller = MemoryController::new();
    let mut state = tags_form(&controller);
    controller.set_value(&FieldPath::new("other"), FieldValue::Bool(true));
    assert_eq!(state.sync(&controller), 0);
}

#[test]
fn one_subscription_per_field_released_on_drop() {
    let controller = MemoryController::new();
    let state = tags_form(&controller);
    assert_eq!(state.subscription_count(), 2);
    assert_eq!(controller.listener_count(), 2);

    drop(state);
    assert_eq!(controller.listener_count(), 0);
}

#[test]
fn two_forms_share_one_controller() {
    let controller = MemoryController::new();
    let mut first = tags_form(&controller);
    let mut second = tags_form(&controller);

    first.handle_key(
        &crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('x'),
            crossterm::event::KeyModifiers::NONE,
        ),
        &controller,
    );
    second.sync(&controller);
    assert_eq!(
        second.field("title").map(|f| f.display_value()),
        Some("x".into())
    );
}
