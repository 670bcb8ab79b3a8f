//! Configuration error types

/// Errors that can occur while loading [`FormConfig`](crate::FormConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The endpoint is not an absolute http(s) URL.
    #[error("Invalid endpoint '{value}': {reason}")]
    InvalidEndpoint { value: String, reason: String },

    /// A timeout setting is not a positive number of seconds.
    #[error("Invalid timeout '{value}' for {key}")]
    InvalidTimeout { key: &'static str, value: String },
}

impl ConfigError {
    /// Creates a new invalid endpoint error.
    pub fn invalid_endpoint(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            value: value.into(),
            reason: reason.into(),
        }
    }
}
