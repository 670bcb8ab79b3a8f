//! Error types

mod api;
mod config;
mod validation;

pub use api::*;
pub use config::*;
pub use validation::*;

/// Top-level error for the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Order endpoint call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
