//! Client-side session state.
//!
//! [`Session`] owns the bearer token returned by the auth service. The
//! token lives in memory and is mirrored to the [`LocalStore`] under a
//! fixed key so a restart resumes the previous session. Token presence
//! gates every authenticated view; logout clears both copies.

use tokio::sync::watch;

use crate::storage::LocalStore;

/// Storage key under which the bearer token is mirrored.
const TOKEN_KEY: &str = "session.token";

/// Owned session context, injected into whichever component needs it.
#[derive(Clone)]
pub struct Session {
    store: LocalStore,
    token_tx: watch::Sender<Option<String>>,
}

impl Session {
    /// Builds a session from the store, rehydrating any persisted token.
    pub fn from_store(store: LocalStore) -> Self {
        let token = store.get::<String>(TOKEN_KEY);
        let (token_tx, _) = watch::channel(token);
        Self { store, token_tx }
    }

    /// Records a fresh bearer token in memory and in durable storage.
    pub fn login(&self, token: String) {
        self.store.set(TOKEN_KEY, &token);
        self.token_tx.send_replace(Some(token));
    }

    /// Drops the token from memory and durable storage.
    pub fn logout(&self) {
        self.store.remove(TOKEN_KEY);
        self.token_tx.send_replace(None);
    }

    /// The current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.token_tx.borrow().clone()
    }

    /// Whether a token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.token_tx.borrow().is_some()
    }

    /// Subscribes to token changes (login/logout).
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.token_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_persists_token_across_restart() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::from_store(LocalStore::open(dir.path()));
        assert!(!session.is_authenticated());

        session.login("jwt-token".to_string());
        assert_eq!(session.token().as_deref(), Some("jwt-token"));

        let resumed = Session::from_store(LocalStore::open(dir.path()));
        assert_eq!(resumed.token().as_deref(), Some("jwt-token"));
    }

    #[test]
    fn logout_clears_memory_and_storage() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::from_store(LocalStore::open(dir.path()));
        session.login("jwt-token".to_string());
        session.logout();
        assert!(!session.is_authenticated());

        let resumed = Session::from_store(LocalStore::open(dir.path()));
        assert!(resumed.token().is_none());
    }

    #[test]
    fn subscribers_observe_state_changes() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::from_store(LocalStore::open(dir.path()));
        let mut rx = session.subscribe();

        session.login("jwt-token".to_string());
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_deref(), Some("jwt-token"));

        session.logout();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
    }
}
