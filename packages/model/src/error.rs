use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("Invalid overrides: {0}")]
    InvalidOverrides(String),

    #[error("Field '{0}' cannot be overridden")]
    ReservedField(String),

    #[error("Invalid layout for {id}: {message}")]
    InvalidLayout { id: String, message: String },

    #[error("Invalid style for {id}: {message}")]
    InvalidStyle { id: String, message: String },

    #[error("Duplicate node id: {0}")]
    DuplicateId(String),
}

impl ModelError {
    pub fn invalid_layout(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidLayout {
            id: id.into(),
            message: message.into(),
        }
    }

    pub fn invalid_style(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidStyle {
            id: id.into(),
            message: message.into(),
        }
    }
}
