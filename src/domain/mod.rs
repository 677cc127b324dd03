mod descriptor;
mod error;
mod option;
mod parser;

pub use descriptor::{
    CheckboxField, ComboboxField, DEFAULT_MAX_UPLOAD_SIZE, DateField, DateFormat, DateMode,
    DatetimeField, DisplayOptions, DropzoneOptions, FieldDescriptor, FieldKind, FieldPath,
    FileUploadField, HierarchicalField, MultiSelectField, NumberField, RadioField, SelectField,
    SliderField, SwitchField, TextField, TextareaField,
};
pub use error::DescriptorError;
pub use option::{ChoiceOption, TreeOption};
pub use parser::{FormDocument, check_descriptor, parse_field_descriptor, parse_form_document};
