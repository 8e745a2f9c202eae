use thiserror::Error;

/// Message shown when the auth backend cannot be reached at all.
pub const AUTH_UNAVAILABLE_MESSAGE: &str = "Could not reach the server. Please try again.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Rejected locally, before anything was sent.
    #[error("{0}")]
    Validation(String),

    /// Rejected by the backend, or the backend could not be reached. The message is
    /// meant to be shown as is.
    #[error("{0}")]
    Rejected(String),
}

impl AuthError {
    pub fn message(&self) -> &str {
        match self {
            AuthError::Validation(msg) | AuthError::Rejected(msg) => msg,
        }
    }

    pub(crate) fn unavailable() -> AuthError {
        AuthError::Rejected(AUTH_UNAVAILABLE_MESSAGE.to_string())
    }
}
