use crate::validation::{FormValidator, collect_errors, flatten_errors};

use super::{actions::FormCommand, controller::FormController, state::FormState};

pub fn apply_command(state: &mut FormState, command: FormCommand) {
    match command {
        FormCommand::FocusNextField => state.focus_next_field(),
        FormCommand::FocusPrevField => state.focus_prev_field(),
        FormCommand::FieldEdited { .. } => {}
    }
}

/// Runs form commands, revalidating an edited field against the host
/// validator.
pub struct FormEngine<'a> {
    state: &'a mut FormState,
    controller: &'a dyn FormController,
    validator: &'a dyn FormValidator,
}

impl<'a> FormEngine<'a> {
    pub fn new(
        state: &'a mut FormState,
        controller: &'a dyn FormController,
        validator: &'a dyn FormValidator,
    ) -> Self {
        Self {
            state,
            controller,
            validator,
        }
    }

    /// Returns the number of messages now attached to the edited field.
    pub fn dispatch(&mut self, command: FormCommand) -> usize {
        match command {
            FormCommand::FieldEdited { path } => self.validate_field(path.as_str()),
            other => {
                apply_command(self.state, other);
                0
            }
        }
    }

    fn validate_field(&mut self, path: &str) -> usize {
        let (_, errors) = collect_errors(self.state, self.controller, self.validator);
        self.state.clear_error(path);
        let Some(field) = self.state.field(path) else {
            return 0;
        };
        let owner = field.path().clone();
        let mut matched = 0;
        for (error_path, message) in flatten_errors(&errors) {
            if owner.covers(&error_path) {
                matched += 1;
                self.state.set_error(&error_path, message);
            }
        }
        matched
    }
}
