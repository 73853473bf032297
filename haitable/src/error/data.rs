//! Row data resolution errors

/// A named row reference could not be resolved against its payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataResolutionError {
    /// No value exists at the given path.
    #[error("Row reference '{path}' not found")]
    PathNotFound { path: String },

    /// The path resolved, but not to an array of records.
    #[error("Row reference '{path}' does not point to an array")]
    NotAnArray { path: String },

    /// The reference path was empty.
    #[error("Row reference path is empty")]
    EmptyPath,
}

impl DataResolutionError {
    /// Creates a new path-not-found error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::PathNotFound { path: path.into() }
    }
}
