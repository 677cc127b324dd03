use anyhow::{Result, anyhow};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde_json::Value;

use crate::{
    domain::FieldPath,
    form::{FormCommand, FormController, FormEngine, FormState},
    presentation::{self, UiContext},
    validation::{FormValidator, ToastQueue, ValidationOutcome, submit_form},
};

use super::{
    FormStatus,
    input::{KeyCommand, Unhandled, classify, fallback},
    options::UiOptions,
    status::StatusLine,
    terminal::FormTerminal,
};

const HELP_TEXT: &str =
    "Tab/Shift+Tab navigate • Enter open/pick • Esc close • Ctrl+S submit • Ctrl+Q quit";

pub(crate) struct App {
    form_state: FormState,
    controller: Box<dyn FormController>,
    validator: Box<dyn FormValidator>,
    options: UiOptions,
    status: StatusLine,
    toasts: ToastQueue,
    global_errors: Vec<String>,
    validation_errors: usize,
    exit_armed: bool,
    should_quit: bool,
    result: Option<Value>,
}

impl App {
    pub fn new(
        form_state: FormState,
        controller: Box<dyn FormController>,
        validator: Box<dyn FormValidator>,
        options: UiOptions,
    ) -> Self {
        Self {
            form_state,
            controller,
            validator,
            options,
            status: StatusLine::new(),
            toasts: ToastQueue::with_capacity(4),
            global_errors: Vec::new(),
            validation_errors: 0,
            exit_armed: false,
            should_quit: false,
            result: None,
        }
    }

    pub fn run(&mut self) -> Result<Value> {
        let mut terminal = FormTerminal::open(self.options.tick_rate)?;
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            match terminal.next_event()? {
                Some(Event::Key(key)) => self.handle_key(key),
                Some(Event::Paste(text)) => self.handle_paste(&text),
                Some(_) | None => {}
            }
        }
        drop(terminal);

        if let Some(value) = self.result.take() {
            Ok(value)
        } else {
            Err(anyhow!("user exited without submitting"))
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let help = if self.options.show_help {
            Some(HELP_TEXT)
        } else {
            None
        };
        let dirty = self.form_state.is_dirty();
        let focused = self.form_state.focused_field();
        let overlay = focused.and_then(|field| field.overlay());
        let focus_label = focused.map(|field| field.descriptor.display_label());
        let toasts = self.toasts.snapshot();

        presentation::draw(
            frame,
            UiContext {
                form_state: &mut self.form_state,
                status_message: self.status.message(),
                status_tone: self.status.tone(),
                dirty,
                error_count: self.validation_errors,
                help,
                focus_label,
                global_errors: &self.global_errors,
                toasts: &toasts,
                overlay,
            },
        );
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match classify(&key) {
            KeyCommand::Save => {
                self.exit_armed = false;
                self.on_save();
            }
            KeyCommand::Quit => self.on_exit(),
            KeyCommand::NextField => self.move_focus(FormCommand::FocusNextField),
            KeyCommand::PrevField => self.move_focus(FormCommand::FocusPrevField),
            KeyCommand::Edit(key) => self.edit(key),
        }
    }

    /// Pasted text is typed into the focused widget one character at a time.
    pub(crate) fn handle_paste(&mut self, text: &str) {
        for ch in text.chars() {
            let code = match ch {
                '\r' => continue,
                '\n' => KeyCode::Enter,
                ch if ch.is_control() => continue,
                ch => KeyCode::Char(ch),
            };
            self.edit(KeyEvent::new(code, KeyModifiers::NONE));
        }
    }

    fn edit(&mut self, key: KeyEvent) {
        let Some(field) = self.form_state.focused_field() else {
            return;
        };
        let path = field.path().clone();
        let label = field.descriptor.display_label();
        if field.is_disabled() {
            self.status.set(FormStatus::Disabled(label.clone()));
        }
        let before = self.controller.get_value(&path);

        if !self.form_state.handle_key(&key, self.controller.as_ref()) {
            match fallback(&key) {
                Unhandled::NextField => self.move_focus(FormCommand::FocusNextField),
                Unhandled::PrevField => self.move_focus(FormCommand::FocusPrevField),
                Unhandled::ResetStatus => {
                    self.exit_armed = false;
                    self.status.set(FormStatus::Ready);
                }
                Unhandled::Nothing => {}
            }
            return;
        }

        self.exit_armed = false;
        if self.controller.get_value(&path) != before {
            self.after_edit(path, label);
        }
    }

    /// Tab/Shift+Tab: the focused widget is dismissed first, so a pending
    /// pick commits before focus moves.
    fn move_focus(&mut self, command: FormCommand) {
        self.exit_armed = false;
        if let Some(field) = self.form_state.focused_field() {
            let path = field.path().clone();
            let label = field.descriptor.display_label();
            let before = self.controller.get_value(&path);
            self.form_state.blur_focused(self.controller.as_ref());
            if self.controller.get_value(&path) != before {
                self.after_edit(path, label);
            }
        }
        FormEngine::new(
            &mut self.form_state,
            self.controller.as_ref(),
            self.validator.as_ref(),
        )
        .dispatch(command);
        if let Some(field) = self.form_state.focused_field() {
            let label = field.descriptor.display_label();
            self.status.set(FormStatus::Editing(label));
        }
    }

    /// Live-validate the edited field and report its result in the status.
    fn after_edit(&mut self, path: FieldPath, label: String) {
        if self.options.auto_validate {
            FormEngine::new(
                &mut self.form_state,
                self.controller.as_ref(),
                self.validator.as_ref(),
            )
            .dispatch(FormCommand::FieldEdited { path: path.clone() });
            self.validation_errors = self.form_state.error_count();
        }
        let error = self
            .form_state
            .field(path.as_str())
            .and_then(|field| field.error.clone());
        self.status.set(FormStatus::Edited { label, error });
    }

    fn on_save(&mut self) {
        let outcome = submit_form(
            &mut self.form_state,
            self.controller.as_ref(),
            self.validator.as_ref(),
            &self.toasts,
        );
        match outcome {
            ValidationOutcome::Valid(value) => {
                let filled = self
                    .form_state
                    .fields()
                    .iter()
                    .filter(|field| !self.controller.get_value(field.path()).is_empty())
                    .count();
                self.global_errors.clear();
                self.validation_errors = 0;
                self.status.set(FormStatus::Submitted { filled });
                self.result = Some(value);
                self.should_quit = true;
            }
            ValidationOutcome::Invalid {
                issues,
                global_errors,
                ..
            } => {
                self.status.set(FormStatus::Rejected {
                    issues,
                    global: global_errors.len(),
                });
                self.global_errors = global_errors;
                self.validation_errors = issues;
            }
        }
    }

    fn on_exit(&mut self) {
        if self.options.confirm_exit && self.form_state.is_dirty() && !self.exit_armed {
            self.exit_armed = true;
            self.status.set(FormStatus::ConfirmExit {
                unsaved: self.form_state.dirty_count(),
            });
            return;
        }
        self.should_quit = true;
        self.result = None;
    }

    pub(crate) fn form_state(&self) -> &FormState {
        &self.form_state
    }

    pub(crate) fn status_message(&self) -> &str {
        self.status.message()
    }

    pub(crate) fn status(&self) -> &FormStatus {
        self.status.status()
    }

    pub(crate) fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub(crate) fn take_result(&mut self) -> Option<Value> {
        self.result.take()
    }
}
