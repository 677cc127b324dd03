use anyhow::Result;
use serde_json::Value;

use crate::{
    domain::{FieldDescriptor, FormDocument},
    form::{FormController, FormState, MemoryController},
    io::OutputOptions,
    validation::{
        ErrorTree, FormValidator, JsonSchemaValidator, NoValidation, collect_errors,
    },
};

use super::{options::UiOptions, runtime::App};

/// Entry point: a titled list of field descriptors shown as an interactive
/// terminal form. `run` returns the submitted value and, when an output is
/// configured, writes it there too.
pub struct DynamicForm {
    fields: Vec<FieldDescriptor>,
    title: Option<String>,
    initial: Option<Value>,
    controller: Box<dyn FormController>,
    validator: Box<dyn FormValidator>,
    options: UiOptions,
    output: Option<OutputOptions>,
}

struct Prepared {
    form_state: FormState,
    controller: Box<dyn FormController>,
    validator: Box<dyn FormValidator>,
    options: UiOptions,
}

impl std::fmt::Debug for DynamicForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicForm")
            .field("fields", &self.fields.len())
            .field("title", &self.title)
            .field("options", &self.options)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl DynamicForm {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            title: None,
            initial: None,
            controller: Box::new(MemoryController::new()),
            validator: Box::new(NoValidation),
            options: UiOptions::default(),
            output: None,
        }
    }

    /// Build from a parsed document, compiling its `schema` when present.
    pub fn from_document(document: FormDocument) -> Result<Self> {
        let FormDocument {
            title,
            fields,
            schema,
        } = document;
        let mut form = Self::new(fields);
        form.title = title;
        if let Some(schema) = schema {
            form = form.with_validator(JsonSchemaValidator::new(&schema)?);
        }
        Ok(form)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_validator(mut self, validator: impl FormValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn with_controller(mut self, controller: impl FormController + 'static) -> Self {
        self.controller = Box::new(controller);
        self
    }

    /// Write the submitted value in `output.format` to its destinations.
    /// Nothing is written when the user quits without submitting.
    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = Some(output);
        self
    }

    /// Values written into the controller before the form opens.
    pub fn with_initial_value(mut self, value: Value) -> Self {
        self.initial = Some(value);
        self
    }

    fn prepare(self) -> Prepared {
        let DynamicForm {
            fields,
            title,
            initial,
            controller,
            validator,
            options,
            output: _,
        } = self;
        let ctx = options.dispatch_context();
        let title = title.unwrap_or_else(|| "Form".to_string());
        let mut form_state = FormState::new(title, fields, controller.as_ref(), &ctx);
        if let Some(initial) = &initial {
            let written = form_state.seed_from_value(initial, controller.as_ref());
            tracing::debug!(written, "seeded initial values");
        }
        Prepared {
            form_state,
            controller,
            validator,
            options,
        }
    }

    pub(crate) fn into_app(self) -> App {
        let Prepared {
            form_state,
            controller,
            validator,
            options,
        } = self.prepare();
        App::new(form_state, controller, validator, options)
    }

    /// Validate the initial values without opening the terminal. Returns the
    /// assembled value and every error found.
    pub fn check(self) -> (Value, ErrorTree) {
        let prepared = self.prepare();
        collect_errors(
            &prepared.form_state,
            prepared.controller.as_ref(),
            prepared.validator.as_ref(),
        )
    }

    pub fn run(mut self) -> Result<Value> {
        let output = self.output.take();
        let value = self.into_app().run()?;
        if let Some(output) = output {
            deliver(&output, &value)?;
        }
        Ok(value)
    }
}

fn deliver(output: &OutputOptions, value: &Value) -> Result<usize> {
    let written = output.deliver(value)?;
    tracing::info!(written, format = %output.format, "submitted value delivered");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldKind;
    use crate::io::{DocumentFormat, OutputDestination};
    use serde_json::json;

    #[test]
    fn configured_output_receives_the_checked_value() {
        let path = std::env::temp_dir().join(format!(
            "dynaform-form-output-{}.json",
            std::process::id()
        ));
        let output = OutputOptions::new(DocumentFormat::Json)
            .with_pretty(false)
            .with_overwrite(true)
            .with_destinations(vec![OutputDestination::file(&path)]);
        let form = DynamicForm::new(vec![FieldDescriptor::new("city", FieldKind::input())])
            .with_initial_value(json!({ "city": "Recife" }))
            .with_output(output.clone());
        assert!(format!("{form:?}").contains("output: Some"));

        let (value, errors) = form.check();
        assert!(errors.is_empty());
        assert_eq!(deliver(&output, &value).unwrap(), 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\"city\":\"Recife\"}\n"
        );
        let _ = std::fs::remove_file(path);
    }
}
