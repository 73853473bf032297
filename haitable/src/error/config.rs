//! Static configuration errors

/// Invalid column or option specification.
///
/// Raised at construction time only. A table that was built successfully
/// never produces one of these afterwards.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// A column spec has no `field`.
    #[error("Column spec at position {index} is missing the required 'field'")]
    MissingField { index: usize },

    /// Two columns resolved to the same id.
    #[error("Duplicate column id '{id}'")]
    DuplicateColumnId { id: String },

    /// `pagination.pageSize` was zero.
    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    /// An option had a value the engine cannot use.
    #[error("Invalid option '{name}': {message}")]
    InvalidOption { name: String, message: String },

    /// The configuration document itself could not be parsed.
    #[error("Malformed table configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigurationError {
    /// Creates a new invalid option error.
    pub fn invalid_option(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            name: name.into(),
            message: message.into(),
        }
    }
}
