//! Process-wide session state.
//!
//! Publishes the coarse repository state together with the active session.
//! The session is set before the state flips to `Ready`, so anyone waking up
//! on `Ready` reads the settled value.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::{Session, SessionState};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct SessionRepository {
    state: Arc<watch::Sender<SessionState>>,
    current: Arc<watch::Sender<Option<Session>>>,
}

impl Default for SessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRepository {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        let (current, _) = watch::channel(None);
        Self {
            state: Arc::new(state),
            current: Arc::new(current),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    /// Fresh receiver over the repository state.
    pub fn subscribe_state(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn subscribe_session(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }

    pub fn set_state(&self, state: SessionState) {
        debug!("Session repository state: {:?}", state);
        // Re-publishing the same state still wakes subscribers
        self.state.send_replace(state);
    }

    pub fn set_session(&self, session: Option<Session>) {
        self.current.send_replace(session);
    }

    /// Load the stored session and walk the repository to `Ready`.
    pub async fn restore(&self, store: &SessionStore) {
        self.set_state(SessionState::Initializing);

        let session = match store.get_session() {
            Ok(session) => session,
            Err(e) => {
                warn!("Failed to restore session: {:#}", e);
                None
            }
        };

        match &session {
            Some(s) => info!("Restored session for server {}", s.server_id),
            None => info!("No stored session"),
        }

        self.set_session(session);
        self.set_state(SessionState::Ready);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use uuid::Uuid;

    #[test]
    fn test_new_repository_is_uninitialized() {
        let repo = SessionRepository::new();
        assert_eq!(repo.state(), SessionState::Uninitialized);
        assert!(repo.current_session().is_none());
    }

    #[tokio::test]
    async fn test_restore_publishes_session_before_ready() {
        let tmp = tempdir().unwrap();
        let store =
            SessionStore::with_env_prefix(tmp.path().to_path_buf(), "LANDING_TEST_RESTORE")
                .unwrap();
        let server_id = Uuid::new_v4();
        store
            .save_session(&Session {
                server_id,
                server_address: "http://media.local:8096".to_string(),
                access_token: "abc".to_string(),
            })
            .unwrap();

        let repo = SessionRepository::new();
        let mut states = repo.subscribe_state();
        repo.restore(&store).await;

        states
            .wait_for(|s| *s == SessionState::Ready)
            .await
            .unwrap();
        assert_eq!(repo.current_session().unwrap().server_id, server_id);
    }

    #[tokio::test]
    async fn test_restore_without_session() {
        let tmp = tempdir().unwrap();
        let store =
            SessionStore::with_env_prefix(tmp.path().to_path_buf(), "LANDING_TEST_EMPTY")
                .unwrap();

        let repo = SessionRepository::new();
        repo.restore(&store).await;

        assert_eq!(repo.state(), SessionState::Ready);
        assert!(repo.current_session().is_none());
    }
}
