use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;

use crate::{
    domain::{ChoiceOption, FieldDescriptor, FieldKind, FieldPath, SelectField, SwitchField},
    form::{FieldValue, FormController, FormState, MemoryController},
    masks::MaskKind,
    tests::test_ctx,
};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(state: &mut FormState, controller: &MemoryController, text: &str) {
    for ch in text.chars() {
        state.handle_key(&key(KeyCode::Char(ch)), controller);
    }
}

fn profile_form(controller: &MemoryController) -> FormState {
    FormState::new(
        "Profile",
        vec![
            FieldDescriptor::new("user.name", FieldKind::input()).with_label("Name"),
            FieldDescriptor::new("user.cpf", FieldKind::masked_input(MaskKind::Cpf)),
            FieldDescriptor::new(
                "state",
                FieldKind::Select(SelectField {
                    options: vec![
                        ChoiceOption::new("sp", "São Paulo"),
                        ChoiceOption::new("rj", "Rio de Janeiro"),
                    ],
                }),
            ),
            FieldDescriptor::new("newsletter", FieldKind::Switch(SwitchField {})),
        ],
        controller,
        &test_ctx(),
    )
}

#[test]
fn defaults_are_written_to_the_controller() {
    let controller = MemoryController::new();
    let state = FormState::new(
        "Defaults",
        vec![
            FieldDescriptor::new("name", FieldKind::input()).with_default(json!("Ana")),
            FieldDescriptor::new("nickname", FieldKind::input()).with_default(json!("")),
        ],
        &controller,
        &test_ctx(),
    );

    assert_eq!(
        controller.get_value(&FieldPath::new("name")),
        FieldValue::Text("Ana".into())
    );
    assert_eq!(state.field("name").map(|f| f.display_value()), Some("Ana".into()));
    assert!(!controller.values().contains_key(&FieldPath::new("nickname")));
    assert!(!state.is_dirty());
}

#[test]
fn existing_controller_values_win_over_defaults() {
    let controller = MemoryController::new();
    controller.set_value(&FieldPath::new("name"), FieldValue::Text("Bia".into()));
    let state = FormState::new(
        "Defaults",
        vec![FieldDescriptor::new("name", FieldKind::input()).with_default(json!("Ana"))],
        &controller,
        &test_ctx(),
    );
    assert_eq!(state.field("name").map(|f| f.display_value()), Some("Bia".into()));
}

#[test]
fn typing_propagates_masked_text() {
    let controller = MemoryController::new();
    let mut state = profile_form(&controller);
    state.set_field_index(1);
    type_text(&mut state, &controller, "52998224725");

    assert_eq!(
        controller.get_value(&FieldPath::new("user.cpf")),
        FieldValue::Text("529.982.247-25".into())
    );
    assert!(state.is_dirty());
}

#[test]
fn letters_never_reach_a_masked_field() {
    let controller = MemoryController::new();
    let mut state = profile_form(&controller);
    state.set_field_index(1);
    type_text(&mut state, &controller, "ab");
    assert_eq!(
        controller.get_value(&FieldPath::new("user.cpf")),
        FieldValue::Empty
    );
}

#[test]
fn build_value_nests_paths_and_skips_empty_fields() {
    let controller = MemoryController::new();
    let mut state = profile_form(&controller);
    type_text(&mut state, &controller, "Ana");
    state.set_field_index(2);
    state.handle_key(&key(KeyCode::Right), &controller);
    state.set_field_index(3);
    state.handle_key(&key(KeyCode::Char(' ')), &controller);

    assert_eq!(
        state.build_value(&controller),
        json!({
            "user": { "name": "Ana" },
            "state": "sp",
            "newsletter": true
        })
    );
}

#[test]
fn seed_from_value_reaches_nested_fields() {
    let controller = MemoryController::new();
    let mut state = profile_form(&controller);
    let written = state.seed_from_value(
        &json!({ "user": { "name": "Caio", "cpf": "52998224725" }, "state": "rj" }),
        &controller,
    );

    assert_eq!(written, 3);
    assert_eq!(
        state.field("user.name").map(|f| f.display_value()),
        Some("Caio".into())
    );
    assert_eq!(
        state.field("user.cpf").map(|f| f.display_value()),
        Some("529.982.247-25".into())
    );
    assert_eq!(
        state.field("state").map(|f| f.current_value()),
        Some(FieldValue::Text("rj".into()))
    );
}

#[test]
fn errors_attach_to_the_most_specific_owner() {
    let controller = MemoryController::new();
    let mut state = FormState::new(
        "Errors",
        vec![
            FieldDescriptor::new("address", FieldKind::input()),
            FieldDescriptor::new("address.street", FieldKind::input()),
        ],
        &controller,
        &test_ctx(),
    );

    assert!(state.set_error("address.street", "required"));
    assert!(state.set_error("address.zip[0]", "invalid"));
    assert!(!state.set_error("phone", "unknown"));

    assert_eq!(
        state.field("address.street").and_then(|f| f.error.clone()),
        Some("required".into())
    );
    assert_eq!(
        state.field("address").and_then(|f| f.error.clone()),
        Some("invalid".into())
    );
    assert_eq!(state.error_count(), 2);

    state.clear_errors();
    assert_eq!(state.error_count(), 0);
}

#[test]
fn first_error_per_field_is_kept() {
    let controller = MemoryController::new();
    let mut state = profile_form(&controller);
    state.set_error("state", "first");
    state.set_error("state", "second");
    assert_eq!(state.field("state").and_then(|f| f.message()), Some("first"));
}

#[test]
fn disabled_fields_ignore_keys() {
    let controller = MemoryController::new();
    let mut state = FormState::new(
        "Disabled",
        vec![FieldDescriptor::new("code", FieldKind::input()).with_disabled(true)],
        &controller,
        &test_ctx(),
    );
    assert!(!state.handle_key(&key(KeyCode::Char('x')), &controller));
    assert_eq!(
        controller.get_value(&FieldPath::new("code")),
        FieldValue::Empty
    );
}

#[test]
fn editing_clears_the_field_error() {
    let controller = MemoryController::new();
    let mut state = profile_form(&controller);
    state.set_error("user.name", "required");
    type_text(&mut state, &controller, "A");
    assert_eq!(state.field("user.name").and_then(|f| f.error.clone()), None);
}
