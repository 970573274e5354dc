//! Host visibility window.
//!
//! The startup flow only observes sessions while the host is resumed. Leaving
//! the resumed window cancels the pending cycle; entering it again starts a
//! fresh one.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    /// Visible but not in the foreground (paused).
    Started,
    Resumed,
    Destroyed,
}

#[derive(Clone)]
pub struct Lifecycle {
    tx: Arc<watch::Sender<LifecycleState>>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LifecycleState::Created);
        Self { tx: Arc::new(tx) }
    }

    pub fn state(&self) -> LifecycleState {
        *self.tx.borrow()
    }

    pub fn resume(&self) {
        self.transition(LifecycleState::Resumed);
    }

    pub fn pause(&self) {
        self.transition(LifecycleState::Started);
    }

    pub fn destroy(&self) {
        self.transition(LifecycleState::Destroyed);
    }

    fn transition(&self, next: LifecycleState) {
        let previous = self.tx.send_replace(next);
        if previous != next {
            debug!("Lifecycle {:?} -> {:?}", previous, next);
        }
    }

    pub fn watch(&self) -> LifecycleWatch {
        LifecycleWatch {
            rx: self.tx.subscribe(),
        }
    }
}

pub struct LifecycleWatch {
    rx: watch::Receiver<LifecycleState>,
}

impl LifecycleWatch {
    /// Wait until the host is resumed. Returns `false` if it was destroyed
    /// first.
    pub async fn resumed(&mut self) -> bool {
        match self
            .rx
            .wait_for(|s| matches!(s, LifecycleState::Resumed | LifecycleState::Destroyed))
            .await
        {
            Ok(state) => *state == LifecycleState::Resumed,
            // Sender dropped: nobody can resume us any more
            Err(_) => false,
        }
    }

    /// Wait until the host leaves the resumed window.
    pub async fn left_resumed(&mut self) {
        if self
            .rx
            .wait_for(|s| *s != LifecycleState::Resumed)
            .await
            .is_err()
        {
            // Sender dropped while resumed; the window never closes.
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_resumed_returns_immediately_when_already_resumed() {
        let lifecycle = Lifecycle::new();
        lifecycle.resume();
        let mut watch = lifecycle.watch();
        assert!(watch.resumed().await);
    }

    #[tokio::test]
    async fn test_resumed_reports_destroy() {
        let lifecycle = Lifecycle::new();
        let mut watch = lifecycle.watch();
        lifecycle.destroy();
        assert!(!watch.resumed().await);
    }

    #[tokio::test]
    async fn test_left_resumed_waits_for_pause() {
        let lifecycle = Lifecycle::new();
        lifecycle.resume();
        let mut watch = lifecycle.watch();

        assert!(timeout(Duration::from_millis(20), watch.left_resumed())
            .await
            .is_err());

        lifecycle.pause();
        assert!(timeout(Duration::from_millis(20), watch.left_resumed())
            .await
            .is_ok());
        assert_eq!(lifecycle.state(), LifecycleState::Started);
    }
}
