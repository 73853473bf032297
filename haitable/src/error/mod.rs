//! Error types

mod config;
mod data;
mod fetch;
mod timer;

pub use config::*;
pub use data::*;
pub use fetch::*;
pub use timer::*;

/// Any error the table engine can report.
///
/// Only [`ConfigurationError`] ever escapes table construction; the other
/// kinds are absorbed by the table and surfaced through its views.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    DataResolution(#[from] DataResolutionError),

    #[error(transparent)]
    TransientFetch(#[from] TransientFetchError),

    #[error(transparent)]
    Timer(#[from] TimerError),
}
