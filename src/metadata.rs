//! Session-start bookkeeping in `<data dir>/metadata.json`.
//!
//! Every time a session settles at startup the count goes up and the start
//! time is stamped. `status` reports both.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::startup::SessionStartHook;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    #[serde(default)]
    pub session_count: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_started: Option<DateTime<Utc>>,
}

pub struct SessionStatsStore {
    path: PathBuf,
}

impl SessionStatsStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

        Ok(Self {
            path: data_dir.join("metadata.json"),
        })
    }

    /// Missing file means no session has started yet.
    pub fn stats(&self) -> Result<SessionStats> {
        if !self.path.exists() {
            return Ok(SessionStats::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read metadata file: {:?}", self.path))?;

        serde_json::from_str(&content).context("Failed to parse metadata JSON")
    }

    pub fn record_start(&self, at: DateTime<Utc>) -> Result<SessionStats> {
        let mut stats = self.stats().unwrap_or_else(|e| {
            warn!("Unreadable session stats, counting from zero: {}", e);
            SessionStats::default()
        });
        stats.session_count += 1;
        stats.last_started = Some(at);

        let content =
            serde_json::to_string_pretty(&stats).context("Failed to serialize metadata")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write metadata file: {:?}", self.path))?;

        debug!("Session #{} started at {}", stats.session_count, at);
        Ok(stats)
    }
}

impl SessionStartHook for SessionStatsStore {
    fn on_session_start(&self) {
        if let Err(e) = self.record_start(Utc::now()) {
            warn!("Failed to record session start: {:#}", e);
        }
    }
}
