mod checks;
mod notify;
mod schema;
mod tree;

use serde_json::Value;

use crate::form::{FormController, FormState};

pub use checks::{check_field, check_fields};
pub use notify::{Notifier, Toast, ToastKind, ToastQueue, report_errors};
pub use schema::{FormValidator, JsonSchemaValidator, NoValidation, pointer_to_path};
pub use tree::{ErrorTree, MAX_LIST_INDEX, ROOT_KEY, flatten_errors};

#[derive(Debug)]
pub enum ValidationOutcome {
    Valid(Value),
    Invalid {
        issues: usize,
        errors: ErrorTree,
        global_errors: Vec<String>,
    },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Everything wrong with the form right now: built-in checks first, then
/// the host validator over the assembled value.
pub fn collect_errors(
    form: &FormState,
    controller: &dyn FormController,
    validator: &dyn FormValidator,
) -> (Value, ErrorTree) {
    let value = form.build_value(controller);
    let mut errors = check_fields(
        form.fields()
            .iter()
            .map(|field| (field, controller.get_value(field.path()))),
    );
    errors.merge(validator.validate(&value));
    (value, errors)
}

/// Validate the whole form and attach every message to its field. Messages
/// no field owns are returned as global errors.
pub fn validate_form(
    form: &mut FormState,
    controller: &dyn FormController,
    validator: &dyn FormValidator,
) -> ValidationOutcome {
    let (value, errors) = collect_errors(form, controller, validator);
    form.clear_errors();
    let flat = flatten_errors(&errors);
    if flat.is_empty() {
        tracing::info!("form is valid");
        return ValidationOutcome::Valid(value);
    }

    let mut global_errors = Vec::new();
    for (path, message) in &flat {
        if !form.set_error(path, message.clone()) {
            global_errors.push(format!("{path}: {message}"));
        }
    }
    tracing::info!(issues = flat.len(), global = global_errors.len(), "form is invalid");
    ValidationOutcome::Invalid {
        issues: flat.len(),
        errors,
        global_errors,
    }
}

/// [`validate_form`] plus notifications: one error toast per message, or a
/// single success toast.
pub fn submit_form(
    form: &mut FormState,
    controller: &dyn FormController,
    validator: &dyn FormValidator,
    notifier: &dyn Notifier,
) -> ValidationOutcome {
    let outcome = validate_form(form, controller, validator);
    match &outcome {
        ValidationOutcome::Valid(_) => {
            notifier.notify(Toast::success("Form submitted", "All fields are valid."));
        }
        ValidationOutcome::Invalid { errors, .. } => {
            report_errors(errors, notifier);
        }
    }
    outcome
}
