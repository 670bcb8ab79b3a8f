//! Submission outcome banners

/// Banner text shown for a successful order when the server sent no message.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Thank you for your order!";

/// Banner text shown when a failed submission carried no server message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

/// Result of the last submit attempt. At most one banner is ever set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing submitted yet.
    #[default]
    None,
    /// The order was accepted.
    Success(String),
    /// The order was rejected or never arrived.
    Failure(String),
}

impl Outcome {
    /// The success banner, if the last attempt succeeded.
    pub fn success(&self) -> Option<&str> {
        match self {
            Self::Success(msg) => Some(msg),
            _ => None,
        }
    }

    /// The failure banner, if the last attempt failed.
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failure(msg) => Some(msg),
            _ => None,
        }
    }

    /// Returns `true` if no banner is shown.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
