//! Pure navigation decision over a snapshot of the startup inputs.
//!
//! The async driver in [`super::flow`] fills the snapshot in step by step
//! (session, then user, then destination) and acts on whatever this returns.

use crate::domain::{Decision, Destination, ServerId, Session, SessionState, User};

#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub state: SessionState,
    pub session: Option<&'a Session>,
    pub user: Option<&'a User>,
    pub remembered_server: Option<ServerId>,
    /// Resolved deep-link destination, once known.
    pub destination: Option<&'a Destination>,
}

impl<'a> Snapshot<'a> {
    pub fn ready(session: Option<&'a Session>) -> Self {
        Self {
            state: SessionState::Ready,
            session,
            user: None,
            remembered_server: None,
            destination: None,
        }
    }
}

/// Nothing is decided before the session repository is ready.
pub fn decide(snapshot: &Snapshot<'_>) -> Option<Decision> {
    (snapshot.state == SessionState::Ready).then(|| decide_ready(snapshot))
}

pub(crate) fn decide_ready(snapshot: &Snapshot<'_>) -> Decision {
    if snapshot.session.is_none() {
        return match snapshot.remembered_server {
            Some(id) => Decision::ShowServerLogin(id),
            None => Decision::ShowServerPicker,
        };
    }

    match (snapshot.user, snapshot.destination) {
        (Some(_), Some(destination)) => Decision::HandOff(destination.clone()),
        // Session exists but user or destination is still settling
        _ => Decision::ShowSplash,
    }
}
