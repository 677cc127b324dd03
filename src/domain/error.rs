use thiserror::Error;

/// Configuration problems found while turning a descriptor document into
/// [`FieldDescriptor`](super::FieldDescriptor)s.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("form document must be an object with a `fields` array")]
    NotADocument,
    #[error("field #{index} must be an object")]
    NotAnObject { index: usize },
    #[error("field #{index} is missing a string `name`")]
    MissingName { index: usize },
    #[error("field `{field}` is declared more than once")]
    DuplicateField { field: String },
    #[error("field `{field}` is missing a string `type`")]
    MissingType { field: String },
    #[error("field `{field}` has unknown type `{tag}`")]
    UnknownType { field: String, tag: String },
    #[error("field `{field}` ({tag}) is missing required attribute `{attribute}`")]
    MissingAttribute {
        field: String,
        tag: &'static str,
        attribute: &'static str,
    },
    #[error("field `{field}` ({tag}) does not accept `{attribute}`; it belongs to {owners}")]
    ForeignAttribute {
        field: String,
        tag: &'static str,
        attribute: String,
        owners: String,
    },
    #[error("field `{field}` ({tag}) has unknown attribute `{attribute}`")]
    UnknownAttribute {
        field: String,
        tag: &'static str,
        attribute: String,
    },
    #[error("field `{field}` has invalid attributes")]
    InvalidAttributes {
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("field `{field}` lists option id `{id}` more than once among siblings")]
    DuplicateOptionId { field: String, id: String },
    #[error("field `{field}`: {message}")]
    InvalidConfig { field: String, message: String },
}

impl DescriptorError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        DescriptorError::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending field, when the error is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            DescriptorError::NotADocument
            | DescriptorError::NotAnObject { .. }
            | DescriptorError::MissingName { .. } => None,
            DescriptorError::DuplicateField { field }
            | DescriptorError::MissingType { field }
            | DescriptorError::UnknownType { field, .. }
            | DescriptorError::MissingAttribute { field, .. }
            | DescriptorError::ForeignAttribute { field, .. }
            | DescriptorError::UnknownAttribute { field, .. }
            | DescriptorError::InvalidAttributes { field, .. }
            | DescriptorError::DuplicateOptionId { field, .. }
            | DescriptorError::InvalidConfig { field, .. } => Some(field),
        }
    }
}
