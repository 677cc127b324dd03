mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{load_form_document, load_form_document_str, load_value, parse_document_str};
pub use output::{OutputDestination, OutputOptions};
