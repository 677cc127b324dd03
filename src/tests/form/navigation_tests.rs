use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::{Value, json};

use crate::{
    domain::{FieldDescriptor, FieldKind, FieldPath, NumberField},
    form::{FormCommand, FormEngine, FormState, MemoryController, apply_command},
    tests::test_ctx,
    validation::{ErrorTree, JsonSchemaValidator, NoValidation},
};

fn three_fields(controller: &MemoryController) -> FormState {
    FormState::new(
        "Nav",
        vec![
            FieldDescriptor::new("a", FieldKind::input()),
            FieldDescriptor::new("b", FieldKind::input()),
            FieldDescriptor::new("c", FieldKind::input()),
        ],
        controller,
        &test_ctx(),
    )
}

#[test]
fn focus_wraps_in_both_directions() {
    let controller = MemoryController::new();
    let mut state = three_fields(&controller);

    apply_command(&mut state, FormCommand::FocusPrevField);
    assert_eq!(state.field_index(), 2);
    apply_command(&mut state, FormCommand::FocusNextField);
    assert_eq!(state.field_index(), 0);
    apply_command(&mut state, FormCommand::FocusNextField);
    assert_eq!(
        state.focused_field().map(|f| f.path().as_str()),
        Some("b")
    );
}

#[test]
fn empty_form_has_no_focus() {
    let controller = MemoryController::new();
    let mut state = FormState::new("Empty", Vec::new(), &controller, &test_ctx());
    state.focus_next_field();
    assert!(state.is_empty());
    assert!(state.focused_field().is_none());
}

#[test]
fn set_field_index_clamps() {
    let controller = MemoryController::new();
    let mut state = three_fields(&controller);
    state.set_field_index(10);
    assert_eq!(state.field_index(), 2);
}

#[test]
fn field_edited_revalidates_only_that_field() {
    let controller = MemoryController::new();
    let mut state = FormState::new(
        "Signup",
        vec![
            FieldDescriptor::new("email", FieldKind::input()),
            FieldDescriptor::new("name", FieldKind::input()),
        ],
        &controller,
        &test_ctx(),
    );
    let validator = |value: &Value| {
        let mut errors = ErrorTree::new();
        if value.get("email").is_none() {
            errors.insert("email", "email is required");
        }
        if value.get("name").is_none() {
            errors.insert("name", "name is required");
        }
        errors
    };

    let matched = FormEngine::new(&mut state, &controller, &validator).dispatch(
        FormCommand::FieldEdited {
            path: FieldPath::new("email"),
        },
    );

    assert_eq!(matched, 1);
    assert_eq!(
        state.field("email").and_then(|f| f.error.clone()),
        Some("email is required".into())
    );
    assert_eq!(state.field("name").and_then(|f| f.error.clone()), None);
}

#[test]
fn field_edited_clears_a_fixed_error() {
    let controller = MemoryController::new();
    let mut state = three_fields(&controller);
    state.set_error("a", "stale");
    state.handle_key(
        &KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE),
        &controller,
    );
    state.set_error("a", "stale");

    let matched = FormEngine::new(&mut state, &controller, &NoValidation).dispatch(
        FormCommand::FieldEdited {
            path: FieldPath::new("a"),
        },
    );
    assert_eq!(matched, 0);
    assert_eq!(state.error_count(), 0);
}

#[test]
fn schema_errors_reach_number_fields() {
    let controller = MemoryController::new();
    let mut state = FormState::new(
        "Age",
        vec![FieldDescriptor::new("age", FieldKind::Number(NumberField::default()))],
        &controller,
        &test_ctx(),
    );
    let validator = JsonSchemaValidator::new(&json!({
        "type": "object",
        "properties": { "age": { "type": "number", "minimum": 18 } }
    }))
    .expect("schema compiles");

    state.seed_from_value(&json!({ "age": 12 }), &controller);
    let matched = FormEngine::new(&mut state, &controller, &validator).dispatch(
        FormCommand::FieldEdited {
            path: FieldPath::new("age"),
        },
    );
    assert_eq!(matched, 1);
    assert!(state.field("age").and_then(|f| f.message()).is_some());
}
