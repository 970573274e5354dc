//! In-memory playback queue.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::domain::ItemId;
use crate::startup::PlaybackQueue;

#[derive(Clone, Default)]
pub struct MediaQueue {
    items: Arc<Mutex<Vec<ItemId>>>,
}

impl MediaQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ItemId>> {
        // A panicked writer cannot leave a Vec half-updated
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PlaybackQueue for MediaQueue {
    fn clear_queue(&self) {
        let mut items = self.lock();
        debug!("Clearing playback queue ({} items)", items.len());
        items.clear();
    }
}
