use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde_json::json;

use crate::{
    app::{App, DynamicForm, FormStatus, StatusTone, UiOptions},
    domain::{FieldDescriptor, FieldKind},
    form::{FieldValue, FormController, MemoryController},
    tests::fixed_now,
    validation::{JsonSchemaValidator, ToastKind},
};

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.handle_key(press(KeyCode::Char(ch)));
    }
}

fn signup(controller: MemoryController) -> App {
    let validator = JsonSchemaValidator::new(&json!({
        "type": "object",
        "required": ["name", "email"],
        "properties": {
            "name": { "type": "string", "minLength": 2 },
            "email": { "type": "string", "format": "email" }
        }
    }))
    .expect("schema compiles");
    DynamicForm::new(vec![
        FieldDescriptor::new("name", FieldKind::input()).with_label("Name"),
        FieldDescriptor::new("email", FieldKind::input()).with_label("Email"),
    ])
    .with_title("Signup")
    .with_controller(controller)
    .with_validator(validator)
    .with_options(UiOptions::default().with_clock(fixed_now()))
    .into_app()
}

#[test]
fn submit_with_missing_fields_reports_every_issue() {
    let mut app = signup(MemoryController::new());
    app.handle_key(ctrl('s'));

    assert!(!app.should_quit());
    assert_eq!(app.status_message(), "2 issue(s) remaining");
    assert_eq!(app.status(), &FormStatus::Rejected { issues: 2, global: 0 });
    assert_eq!(app.form_state().error_count(), 2);
    let toasts = app.toasts().snapshot();
    assert_eq!(toasts.len(), 2);
    assert!(toasts.iter().all(|toast| toast.kind == ToastKind::Error));
    assert_eq!(toasts[0].title, "Field: name");
}

#[test]
fn valid_submit_returns_the_nested_value() {
    let controller = MemoryController::new();
    let mut app = signup(controller.clone());
    type_text(&mut app, "Ana");
    app.handle_key(press(KeyCode::Tab));
    type_text(&mut app, "ana@example.com");
    app.handle_key(ctrl('s'));

    assert!(app.should_quit());
    assert_eq!(app.status_message(), "Submitted 2 field(s)");
    assert_eq!(app.status().tone(), StatusTone::Success);
    assert_eq!(
        app.take_result(),
        Some(json!({ "name": "Ana", "email": "ana@example.com" }))
    );
    assert_eq!(
        app.toasts().snapshot().last().map(|toast| toast.kind),
        Some(ToastKind::Success)
    );
    assert_eq!(
        controller.get_value(&"name".into()),
        FieldValue::Text("Ana".into())
    );
}

#[test]
fn live_validation_flags_the_edited_field_only() {
    let mut app = signup(MemoryController::new());
    app.handle_key(press(KeyCode::Tab));
    type_text(&mut app, "ana");

    let form = app.form_state();
    let error = form.field("email").and_then(|f| f.error.clone());
    assert!(error.is_some());
    assert!(form.field("name").and_then(|f| f.error.clone()).is_none());
    assert_eq!(
        app.status(),
        &FormStatus::Edited {
            label: "Email".into(),
            error,
        }
    );
    assert!(app.status_message().starts_with("Email: "));
    assert_eq!(app.status().tone(), StatusTone::Error);
}

#[test]
fn fixing_a_field_clears_the_error_status() {
    let mut app = signup(MemoryController::new());
    app.handle_key(press(KeyCode::Tab));
    type_text(&mut app, "ana@example.com");
    assert_eq!(app.status_message(), "Email updated");
    assert_eq!(app.status().tone(), StatusTone::Neutral);
}

#[test]
fn auto_validate_can_be_turned_off() {
    let mut app = DynamicForm::new(vec![FieldDescriptor::new("email", FieldKind::input())])
        .with_validator(
            JsonSchemaValidator::new(&json!({
                "properties": { "email": { "type": "string", "format": "email" } }
            }))
            .expect("schema compiles"),
        )
        .with_options(UiOptions::default().with_auto_validate(false))
        .into_app();
    type_text(&mut app, "nope");
    assert_eq!(app.form_state().error_count(), 0);
    assert_eq!(app.status_message(), "email updated");
}

#[test]
fn quitting_a_dirty_form_needs_confirmation() {
    let mut app = signup(MemoryController::new());
    type_text(&mut app, "A");

    app.handle_key(ctrl('q'));
    assert!(!app.should_quit());
    assert_eq!(app.status(), &FormStatus::ConfirmExit { unsaved: 1 });
    assert!(app.status_message().starts_with("1 unsaved field(s)."));

    app.handle_key(ctrl('q'));
    assert!(app.should_quit());
    assert_eq!(app.take_result(), None);
}

#[test]
fn any_other_key_disarms_the_exit() {
    let mut app = signup(MemoryController::new());
    type_text(&mut app, "A");
    app.handle_key(ctrl('q'));
    type_text(&mut app, "n");
    app.handle_key(ctrl('q'));
    assert!(!app.should_quit());
}

#[test]
fn clean_form_quits_immediately() {
    let mut app = signup(MemoryController::new());
    app.handle_key(ctrl('c'));
    assert!(app.should_quit());
}

#[test]
fn tab_and_arrows_move_focus() {
    let mut app = signup(MemoryController::new());
    app.handle_key(press(KeyCode::Tab));
    assert_eq!(app.form_state().field_index(), 1);
    assert_eq!(app.status_message(), "Editing Email");

    app.handle_key(press(KeyCode::Down));
    assert_eq!(app.form_state().field_index(), 0);
    app.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
    assert_eq!(app.form_state().field_index(), 1);
}

#[test]
fn key_releases_are_ignored() {
    let mut app = signup(MemoryController::new());
    let mut release = press(KeyCode::Char('z'));
    release.kind = KeyEventKind::Release;
    app.handle_key(release);
    assert!(!app.form_state().is_dirty());
}

#[test]
fn paste_types_into_the_focused_field() {
    let controller = MemoryController::new();
    let mut app = signup(controller.clone());
    app.handle_paste("Bia\r");
    assert_eq!(
        controller.get_value(&"name".into()),
        FieldValue::Text("Bia".into())
    );
}

#[test]
fn initial_values_are_seeded() {
    let controller = MemoryController::new();
    let app = DynamicForm::new(vec![FieldDescriptor::new("user.city", FieldKind::input())])
        .with_controller(controller.clone())
        .with_initial_value(json!({ "user": { "city": "Recife" } }))
        .into_app();
    assert_eq!(
        app.form_state()
            .field("user.city")
            .map(|field| field.display_value()),
        Some("Recife".into())
    );
    assert_eq!(
        controller.get_value(&"user.city".into()),
        FieldValue::Text("Recife".into())
    );
}

#[test]
fn check_collects_errors_without_a_terminal() {
    let (value, errors) = DynamicForm::new(vec![FieldDescriptor::new("age", FieldKind::input())])
        .with_initial_value(json!({ "age": "12" }))
        .with_validator(
            JsonSchemaValidator::new(&json!({
                "properties": { "age": { "type": "string", "pattern": "^[0-9]{3}$" } }
            }))
            .expect("schema compiles"),
        )
        .check();
    assert_eq!(value, json!({ "age": "12" }));
    assert!(!errors.is_empty());
}
