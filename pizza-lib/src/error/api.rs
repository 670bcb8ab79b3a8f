//! API error types

use std::time::Duration;

/// Errors that can occur while placing an order.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-success response from the order endpoint.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("<no message>"))]
    Http {
        /// HTTP status code.
        status: u16,
        /// The `message` field of the error body, when the server sent one.
        message: Option<String>,
    },

    /// Network error during the call.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid endpoint URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Creates a new HTTP error with a server message.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: Some(message.into()),
        }
    }

    /// Creates a new HTTP error for a response without a usable body.
    pub fn http_without_message(status: u16) -> Self {
        Self::Http {
            status,
            message: None,
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the message the server attached to its error response.
    ///
    /// `None` for transport failures and for error responses whose body had
    /// no `message`.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message() {
        assert_eq!(ApiError::http(409, "Out of stock").server_message(), Some("Out of stock"));
        assert_eq!(ApiError::http(500, "").server_message(), None);
        assert_eq!(ApiError::http_without_message(502).server_message(), None);
        assert_eq!(ApiError::Timeout(Duration::from_secs(1)).server_message(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ApiError::http(422, "Bad size").to_string(), "HTTP 422: Bad size");
        assert_eq!(
            ApiError::http_without_message(500).to_string(),
            "HTTP 500: <no message>"
        );
    }

    #[test]
    fn test_status_code() {
        assert_eq!(ApiError::http(404, "x").status_code(), Some(404));
        assert_eq!(ApiError::InvalidUrl("x".to_string()).status_code(), None);
    }
}
