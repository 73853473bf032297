//! Errors reported by the surrounding application's data fetch

/// The application failed to fetch the rows backing a table.
///
/// The table engine never retries on its own. It keeps the error so the
/// views can show an error region, and the application decides when to retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to load table data: {message}")]
pub struct TransientFetchError {
    /// Human-readable description.
    pub message: String,
    /// Whether the application offers a retry.
    pub retryable: bool,
}

impl TransientFetchError {
    /// Creates a retryable fetch error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
        }
    }

    /// Marks the error as not retryable.
    pub fn permanent(mut self) -> Self {
        self.retryable = false;
        self
    }
}
