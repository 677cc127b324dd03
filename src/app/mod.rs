mod dynamic_form;
pub(crate) mod input;
mod options;
mod runtime;
mod status;
mod terminal;

pub use dynamic_form::DynamicForm;
pub use options::UiOptions;
pub(crate) use runtime::App;
pub(crate) use status::{FormStatus, StatusTone};
