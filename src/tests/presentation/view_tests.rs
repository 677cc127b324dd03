use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend, buffer::Buffer, style::Color};

use crate::{
    app::StatusTone,
    domain::{ChoiceOption, DateField, DateMode, FieldDescriptor, FieldKind, SelectField},
    form::{FormState, MemoryController},
    presentation::{UiContext, draw},
    tests::test_ctx,
    validation::Toast,
};

fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn render(state: &mut FormState, toasts: &[Toast], status: &str) -> String {
    buffer_text(&render_buffer(state, toasts, status, StatusTone::Neutral))
}

fn render_buffer(
    state: &mut FormState,
    toasts: &[Toast],
    status: &str,
    status_tone: StatusTone,
) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(70, 30)).expect("test terminal");
    let focused = state.focused_field();
    let overlay = focused.and_then(|field| field.overlay());
    let focus_label = focused.map(|field| field.descriptor.display_label());
    let dirty = state.is_dirty();
    let error_count = state.error_count();
    terminal
        .draw(|frame| {
            draw(
                frame,
                UiContext {
                    form_state: &mut *state,
                    status_message: status,
                    status_tone,
                    dirty,
                    error_count,
                    help: Some("Ctrl+S submit"),
                    focus_label: focus_label.clone(),
                    global_errors: &[],
                    toasts,
                    overlay: overlay.clone(),
                },
            )
        })
        .expect("draw");
    terminal.backend().buffer().clone()
}

fn contact_form(controller: &MemoryController) -> FormState {
    FormState::new(
        "Contact",
        vec![
            FieldDescriptor::new("name", FieldKind::input())
                .with_label("Full name")
                .with_description("As printed on your ID")
                .with_placeholder("Maria Silva"),
            FieldDescriptor::new(
                "city",
                FieldKind::Select(SelectField {
                    options: vec![
                        ChoiceOption::new("rec", "Recife"),
                        ChoiceOption::new("poa", "Porto Alegre"),
                    ],
                }),
            )
            .with_label("City"),
        ],
        controller,
        &test_ctx(),
    )
}

#[test]
fn renders_labels_descriptions_and_placeholders() {
    let controller = MemoryController::new();
    let mut state = contact_form(&controller);
    let screen = render(&mut state, &[], "Ready");

    assert!(screen.contains("Contact"));
    assert!(screen.contains("Full name"));
    assert!(screen.contains("input"));
    assert!(screen.contains("As printed on your ID"));
    assert!(screen.contains("Maria Silva"));
    assert!(screen.contains("City"));
    assert!(screen.contains("Status: Ready"));
    assert!(screen.contains("[ok]"));
}

#[test]
fn renders_error_messages_and_badge() {
    let controller = MemoryController::new();
    let mut state = contact_form(&controller);
    state.set_error("name", "name is required");
    let screen = render(&mut state, &[], "1 issue(s) remaining");

    assert!(screen.contains("✗ name is required"));
    assert!(screen.contains("[! 1]"));
}

#[test]
fn hidden_labels_are_not_drawn() {
    let controller = MemoryController::new();
    let mut descriptor = FieldDescriptor::new("secret", FieldKind::input()).with_label("Hidden");
    descriptor.display.hide_label = true;
    let mut state = FormState::new("Form", vec![descriptor], &controller, &test_ctx());
    let screen = render(&mut state, &[], "Ready");
    assert!(!screen.contains("Hidden"));
}

#[test]
fn open_select_draws_its_options() {
    let controller = MemoryController::new();
    let mut state = contact_form(&controller);
    state.set_field_index(1);
    state.handle_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &controller);
    let screen = render(&mut state, &[], "Ready");

    assert!(screen.contains("Porto Alegre"));
    assert!(screen.contains("» "));
}

#[test]
fn open_calendar_draws_weekday_header() {
    let controller = MemoryController::new();
    let mut state = FormState::new(
        "Trip",
        vec![FieldDescriptor::new("day", FieldKind::Date(DateField::new(DateMode::Single)))],
        &controller,
        &test_ctx(),
    );
    state.handle_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &controller);
    assert!(state.focused_field().is_some_and(|field| field.is_open()));
    let screen = render(&mut state, &[], "Ready");
    assert!(screen.contains("14"));
}

#[test]
fn toasts_are_listed_above_the_footer() {
    let controller = MemoryController::new();
    let mut state = contact_form(&controller);
    let toasts = vec![Toast::error("Field: name", "name is required")];
    let screen = render(&mut state, &toasts, "Ready");
    assert!(screen.contains("Notifications"));
    assert!(screen.contains("✗ Field: name"));
}

#[test]
fn empty_forms_say_so() {
    let controller = MemoryController::new();
    let mut state = FormState::new("Nothing", Vec::new(), &controller, &test_ctx());
    let screen = render(&mut state, &[], "Ready");
    assert!(screen.contains("This form has no fields"));
}

#[test]
fn status_colour_follows_its_tone() {
    let controller = MemoryController::new();
    let mut state = contact_form(&controller);
    let buffer = render_buffer(&mut state, &[], "Email: not an email", StatusTone::Error);
    let text = buffer_text(&buffer);
    let (y, line) = text
        .lines()
        .enumerate()
        .find(|(_, line)| line.contains("Status: Email"))
        .expect("status row");
    let x = line
        .chars()
        .collect::<Vec<_>>()
        .windows(5)
        .position(|window| window.iter().collect::<String>() == "Email")
        .expect("status text");
    assert_eq!(buffer[(x as u16, y as u16)].fg, Color::Red);
    assert_ne!(buffer[(0, y as u16)].fg, Color::Red);
}
