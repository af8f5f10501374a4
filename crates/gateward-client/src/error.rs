//! Client error types.
//!
//! The request choke point in [`crate::client`] is the only place that
//! translates transport outcomes and HTTP statuses into this taxonomy; the
//! resource stores and session operations propagate it unchanged.

use thiserror::Error;

/// A result type using `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the gateward backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No valid session is held, so the request was never sent.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The backend rejected the supplied login credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Authenticated, but the backend denied access to the resource.
    #[error("not authorized")]
    NotAuthorized,

    /// The resource does not exist; carries the backend-provided message.
    #[error("not found: {0}")]
    NotFound(String),

    /// The payload failed backend validation; carries the backend message.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Transport failure or server-side error (network error, 5xx).
    #[error("API unavailable: {0}")]
    Unavailable(String),

    /// Unexpected backend behavior: an unmapped status or a malformed body.
    #[error("API error: {0}")]
    Api(String),

    /// Caller bug: the request was shaped in a way the API never accepts.
    #[error("usage error: {0}")]
    Usage(String),
}

impl ClientError {
    /// Map a non-success, non-server-error status onto the taxonomy.
    ///
    /// `body` is the backend's response text; 404 and 422 carry it through.
    #[must_use]
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            403 => Self::NotAuthorized,
            404 => Self::NotFound(body),
            422 => Self::Validation(body),
            _ => Self::Api(format!("unexpected status {status}: {body}")),
        }
    }

    /// Returns `true` if this error means the caller should re-authenticate.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated | Self::InvalidCredentials | Self::NotAuthorized
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_table() {
        assert!(matches!(
            ClientError::from_status(403, String::new()),
            ClientError::NotAuthorized
        ));
        assert!(matches!(
            ClientError::from_status(404, "no such user".to_string()),
            ClientError::NotFound(msg) if msg == "no such user"
        ));
        assert!(matches!(
            ClientError::from_status(422, "login taken".to_string()),
            ClientError::Validation(msg) if msg == "login taken"
        ));
        assert!(matches!(
            ClientError::from_status(400, String::new()),
            ClientError::Api(_)
        ));
    }

    #[test]
    fn auth_failure_classification() {
        assert!(ClientError::NotAuthenticated.is_auth_failure());
        assert!(ClientError::InvalidCredentials.is_auth_failure());
        assert!(ClientError::NotAuthorized.is_auth_failure());
        assert!(!ClientError::NotFound(String::new()).is_auth_failure());
        assert!(!ClientError::Unavailable(String::new()).is_auth_failure());
        assert!(!ClientError::Usage(String::new()).is_auth_failure());
    }
}
