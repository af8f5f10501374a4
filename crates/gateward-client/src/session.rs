//! Session credential state.
//!
//! A [`Session`] holds the opaque credential artifact (the backend's JWT)
//! proving authentication. It is shared mutable state: every request through
//! the choke point reads it, and it is written only by login, logout, the
//! refresh-header path, and the authorization-denied clear.

use std::sync::Arc;

use parking_lot::RwLock;

/// Shared holder for the session credential.
///
/// Cheap to clone; all clones observe the same credential.
#[derive(Debug, Clone, Default)]
pub struct Session {
    credential: Arc<RwLock<Option<String>>>,
}

impl Session {
    /// Create an empty, unauthenticated session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a credential artifact is currently held.
    ///
    /// This is a purely local check; the backend may have revoked the
    /// credential since it was stored. Use [`crate::Client::is_authenticated`]
    /// for a freshness check.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.credential.read().is_some()
    }

    /// Return a copy of the current credential, if any.
    #[must_use]
    pub fn credential(&self) -> Option<String> {
        self.credential.read().clone()
    }

    /// Store a (possibly refreshed) credential artifact.
    pub fn store(&self, token: impl Into<String>) {
        *self.credential.write() = Some(token.into());
    }

    /// Drop the credential, returning to the unauthenticated state.
    ///
    /// Safe to call when no credential is held.
    pub fn clear(&self) {
        *self.credential.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unauthenticated() {
        let session = Session::new();
        assert!(!session.has_credential());
        assert_eq!(session.credential(), None);
    }

    #[test]
    fn store_and_clear() {
        let session = Session::new();
        session.store("tok");
        assert!(session.has_credential());
        assert_eq!(session.credential().as_deref(), Some("tok"));

        session.clear();
        assert!(!session.has_credential());

        // Clearing twice is a no-op
        session.clear();
        assert!(!session.has_credential());
    }

    #[test]
    fn clones_share_state() {
        let session = Session::new();
        let other = session.clone();
        session.store("tok");
        assert_eq!(other.credential().as_deref(), Some("tok"));
    }
}
