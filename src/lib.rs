#![deny(rust_2018_idioms)]

pub mod app;
pub mod domain;
pub mod form;
pub mod io;
pub mod masks;
mod presentation;
pub mod validation;
pub mod widgets;

#[cfg(test)]
mod tests;

pub use app::{DynamicForm, UiOptions};
pub use domain::{FieldDescriptor, FieldKind, FieldPath, FormDocument};
pub use form::{FieldValue, FormController, MemoryController};
pub use validation::{ErrorTree, FormValidator, JsonSchemaValidator};

pub mod prelude {
    pub use super::{
        DynamicForm, ErrorTree, FieldDescriptor, FieldKind, FieldPath, FieldValue,
        FormController, FormDocument, FormValidator, JsonSchemaValidator, MemoryController,
        UiOptions,
    };
    pub use crate::domain::{ChoiceOption, TreeOption};
    pub use crate::io::{DocumentFormat, OutputDestination, OutputOptions};
    pub use crate::masks::{MaskKind, MaskSpec};
}
