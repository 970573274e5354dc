//! Process-wide current user.
//!
//! Follows the session repository: each time a session becomes active the
//! user is fetched from that session's server and published; when the session
//! goes away the user is cleared.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::SessionRepository;
use crate::domain::{Session, User};

/// Fetches the user behind a session.
#[async_trait]
pub trait UserSource: Send + Sync {
    async fn current_user(&self, session: &Session) -> Result<User>;
}

#[derive(Clone)]
pub struct UserRepository {
    current: Arc<watch::Sender<Option<User>>>,
}

impl Default for UserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            current: Arc::new(current),
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current.subscribe()
    }

    pub fn set_user(&self, user: Option<User>) {
        self.current.send_replace(user);
    }

    /// Keep the current user in step with the active session.
    ///
    /// A failed fetch leaves the user unset; whoever waits for it keeps
    /// waiting.
    pub fn follow_sessions(
        &self,
        sessions: &SessionRepository,
        source: Arc<dyn UserSource>,
    ) -> JoinHandle<()> {
        let users = self.clone();
        let mut rx = sessions.subscribe_session();

        tokio::spawn(async move {
            loop {
                let session = rx.borrow_and_update().clone();
                match session {
                    Some(session) => {
                        debug!("Fetching current user for server {}", session.server_id);
                        match source.current_user(&session).await {
                            Ok(user) => {
                                info!("Current user is {} ({})", user.name, user.id);
                                users.set_user(Some(user));
                            }
                            Err(e) => error!("Failed to fetch current user: {:#}", e),
                        }
                    }
                    None => users.set_user(None),
                }

                if rx.changed().await.is_err() {
                    break;
                }
            }
        })
    }
}
