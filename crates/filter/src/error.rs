use thiserror::Error;

/// The ways a client-supplied filter request can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    MalformedPayload,
    UnknownAttribute,
    UnknownOperator,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The payload is not valid JSON.
    #[error("Invalid filter format: {reason}")]
    MalformedPayload { reason: String },

    /// The clause names an attribute the entity does not expose.
    #[error("Invalid filter \"{clause}\", unknown attribute \"{attribute}\"")]
    UnknownAttribute { attribute: String, clause: String },

    /// The operator is not recognized for the named attribute.
    #[error("Invalid filter \"{clause}\", unknown operator \"{operator}\"")]
    UnknownOperator { operator: String, clause: String },
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            ValidationError::MalformedPayload { .. } => ValidationErrorKind::MalformedPayload,
            ValidationError::UnknownAttribute { .. } => ValidationErrorKind::UnknownAttribute,
            ValidationError::UnknownOperator { .. } => ValidationErrorKind::UnknownOperator,
        }
    }
}
