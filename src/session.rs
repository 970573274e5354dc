//! Session storage.
//!
//! Persists the active session in `<data dir>/session.json`. The environment
//! can supply a session instead of the file, which is handy for kiosks and
//! scripted runs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::Session;

/// Default prefix for session environment variables.
pub const DEFAULT_ENV_PREFIX: &str = "LANDING";

/// Session store
///
/// Lookup priority:
/// 1. `<PREFIX>_SESSION_AUTH` environment variable (JSON)
/// 2. `<PREFIX>_SERVER_URL` + `<PREFIX>_ACCESS_TOKEN` + `<PREFIX>_SERVER_ID`
/// 3. session.json
pub struct SessionStore {
    session_path: PathBuf,
    env_prefix: String,
}

impl SessionStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        Self::with_env_prefix(data_dir, DEFAULT_ENV_PREFIX)
    }

    pub fn with_env_prefix(data_dir: PathBuf, env_prefix: &str) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

        Ok(Self {
            session_path: data_dir.join("session.json"),
            env_prefix: env_prefix.to_string(),
        })
    }

    pub fn session_path(&self) -> &PathBuf {
        &self.session_path
    }

    fn env(&self, name: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.env_prefix, name))
            .ok()
            .filter(|v| !v.is_empty())
    }

    fn parse_session(raw: &str) -> Option<Session> {
        match serde_json::from_str::<Session>(raw) {
            Ok(session) => {
                if session.access_token.is_empty() || session.server_address.is_empty() {
                    warn!("Session validation failed: missing access token or server address");
                    return None;
                }
                Some(session)
            }
            Err(e) => {
                warn!("Failed to parse session JSON: {}", e);
                None
            }
        }
    }

    fn session_from_env(&self) -> Option<Session> {
        if let Some(raw) = self.env("SESSION_AUTH") {
            if let Some(session) = Self::parse_session(&raw) {
                debug!("Using session from {}_SESSION_AUTH", self.env_prefix);
                return Some(session);
            }
        }

        let (address, token, server_id) = (
            self.env("SERVER_URL")?,
            self.env("ACCESS_TOKEN")?,
            self.env("SERVER_ID")?,
        );
        let server_id = match Uuid::parse_str(&server_id) {
            Ok(id) => id,
            Err(e) => {
                warn!("Ignoring {}_SERVER_ID: {}", self.env_prefix, e);
                return None;
            }
        };

        debug!("Using session from {}_SERVER_URL", self.env_prefix);
        Some(Session {
            server_id,
            server_address: address,
            access_token: token,
        })
    }

    pub fn get_session(&self) -> Result<Option<Session>> {
        if let Some(session) = self.session_from_env() {
            return Ok(Some(session));
        }

        if !self.session_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.session_path)
            .with_context(|| format!("Failed to read session file: {:?}", self.session_path))?;

        if let Some(session) = Self::parse_session(&content) {
            return Ok(Some(session));
        }

        warn!("Invalid session data found, removing session file");
        let _ = self.remove_session();
        Ok(None)
    }

    pub fn save_session(&self, session: &Session) -> Result<()> {
        let content =
            serde_json::to_string_pretty(session).context("Failed to serialize session data")?;

        std::fs::write(&self.session_path, content)
            .with_context(|| format!("Failed to write session file: {:?}", self.session_path))?;

        info!("Session saved for server {}", session.server_id);
        debug!("Session saved to {:?}", self.session_path);

        Ok(())
    }

    pub fn remove_session(&self) -> Result<()> {
        if self.session_path.exists() {
            std::fs::remove_file(&self.session_path).with_context(|| {
                format!("Failed to remove session file: {:?}", self.session_path)
            })?;
        }

        info!("Session removed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store(prefix: &str) -> (tempfile::TempDir, SessionStore) {
        let tmp = tempdir().unwrap();
        let store = SessionStore::with_env_prefix(tmp.path().to_path_buf(), prefix).unwrap();
        (tmp, store)
    }

    fn sample() -> Session {
        Session {
            server_id: Uuid::new_v4(),
            server_address: "http://media.local:8096".to_string(),
            access_token: "test_token".to_string(),
        }
    }

    #[test]
    fn test_empty_store_has_no_session() {
        let (_tmp, store) = store("LANDING_TEST_STORE_EMPTY");
        assert!(store.get_session().unwrap().is_none());
    }

    #[test]
    fn test_session_save_and_load() {
        let (_tmp, store) = store("LANDING_TEST_STORE_SAVE");
        let session = sample();

        store.save_session(&session).unwrap();

        assert_eq!(store.get_session().unwrap(), Some(session));
    }

    #[test]
    fn test_session_remove() {
        let (_tmp, store) = store("LANDING_TEST_STORE_REMOVE");
        store.save_session(&sample()).unwrap();
        assert!(store.session_path().exists());

        store.remove_session().unwrap();
        assert!(!store.session_path().exists());
        assert!(store.get_session().unwrap().is_none());
    }

    #[test]
    fn test_invalid_session_file_is_discarded() {
        let (_tmp, store) = store("LANDING_TEST_STORE_INVALID");
        std::fs::write(store.session_path(), r#"{"serverId": "nope"}"#).unwrap();

        assert!(store.get_session().unwrap().is_none());
        assert!(!store.session_path().exists());
    }

    #[test]
    fn test_session_from_env_overrides_file() {
        let (_tmp, store) = store("LANDING_TEST_STORE_ENV");
        store.save_session(&sample()).unwrap();

        let server_id = Uuid::new_v4();
        std::env::set_var("LANDING_TEST_STORE_ENV_SERVER_URL", "http://env.local");
        std::env::set_var("LANDING_TEST_STORE_ENV_ACCESS_TOKEN", "env_token");
        std::env::set_var("LANDING_TEST_STORE_ENV_SERVER_ID", server_id.to_string());

        let session = store.get_session().unwrap().unwrap();
        assert_eq!(session.server_id, server_id);
        assert_eq!(session.server_address, "http://env.local");
        assert_eq!(session.access_token, "env_token");
    }
}
