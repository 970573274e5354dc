//! Navigation target handed to the main shell.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::domain::Destination;
use crate::startup::NavigationStore;

/// Holds the destination the main shell opens on. Resetting replaces any
/// back stack with that single destination.
#[derive(Clone, Default)]
pub struct NavigationRepository {
    target: Arc<Mutex<Option<Destination>>>,
}

impl NavigationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Destination> {
        self.target
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl NavigationStore for NavigationRepository {
    fn reset(&self, destination: Destination) {
        debug!("Navigation reset to {}", destination);
        *self.target.lock().unwrap_or_else(|e| e.into_inner()) = Some(destination);
    }
}
