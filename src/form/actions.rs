use crate::domain::FieldPath;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    FocusNextField,
    FocusPrevField,
    FieldEdited { path: FieldPath },
}
