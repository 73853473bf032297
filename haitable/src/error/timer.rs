//! Timer errors

/// A timer could not be armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    /// There is no tokio runtime on the current thread.
    #[error("No async runtime available to drive timers")]
    NoRuntime,
}
