//! Known-server storage.
//!
//! Servers the client has logged in to are kept in `<data dir>/servers.json`.
//! The most recently used one is the server the startup flow offers to log
//! back in to.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Server;
use crate::startup::ServerRepository;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ServerList {
    #[serde(default)]
    servers: Vec<Server>,
}

pub struct ServerStore {
    servers_path: PathBuf,
}

impl ServerStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

        Ok(Self {
            servers_path: data_dir.join("servers.json"),
        })
    }

    fn read(&self) -> Result<ServerList> {
        if !self.servers_path.exists() {
            return Ok(ServerList::default());
        }

        let content = std::fs::read_to_string(&self.servers_path)
            .with_context(|| format!("Failed to read servers file: {:?}", self.servers_path))?;

        serde_json::from_str(&content).context("Failed to parse servers JSON")
    }

    fn write(&self, list: &ServerList) -> Result<()> {
        let content =
            serde_json::to_string_pretty(list).context("Failed to serialize server list")?;

        std::fs::write(&self.servers_path, content)
            .with_context(|| format!("Failed to write servers file: {:?}", self.servers_path))?;

        debug!("Server list saved to {:?}", self.servers_path);
        Ok(())
    }

    pub fn servers(&self) -> Result<Vec<Server>> {
        Ok(self.read()?.servers)
    }

    /// Insert or update a server, keyed by id.
    pub fn upsert(&self, server: Server) -> Result<()> {
        let mut list = self.read()?;
        match list.servers.iter_mut().find(|s| s.id == server.id) {
            Some(existing) => *existing = server,
            None => list.servers.push(server),
        }
        self.write(&list)
    }

    pub fn last_used(&self) -> Result<Option<Server>> {
        Ok(self
            .read()?
            .servers
            .into_iter()
            .max_by_key(|s| s.last_used))
    }
}

impl ServerRepository for ServerStore {
    fn last_server(&self) -> Result<Option<Server>> {
        self.last_used()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tempfile::tempdir;
    use uuid::Uuid;

    fn server(name: &str, minutes_ago: i64) -> Server {
        Server {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: format!("http://{}.local:8096", name),
            last_used: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn test_empty_store() {
        let tmp = tempdir().unwrap();
        let store = ServerStore::new(tmp.path().to_path_buf()).unwrap();
        assert!(store.servers().unwrap().is_empty());
        assert!(store.last_server().unwrap().is_none());
    }

    #[test]
    fn test_last_server_is_most_recent() {
        let tmp = tempdir().unwrap();
        let store = ServerStore::new(tmp.path().to_path_buf()).unwrap();

        let old = server("attic", 60);
        let recent = server("den", 5);
        store.upsert(old.clone()).unwrap();
        store.upsert(recent.clone()).unwrap();

        assert_eq!(store.last_server().unwrap(), Some(recent));
        assert!(store.servers().unwrap().contains(&old));
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let tmp = tempdir().unwrap();
        let store = ServerStore::new(tmp.path().to_path_buf()).unwrap();

        let mut first = server("den", 30);
        store.upsert(first.clone()).unwrap();
        first.name = "Living room".to_string();
        first.last_used = Utc::now();
        store.upsert(first.clone()).unwrap();

        let servers = store.servers().unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].name, "Living room");
    }
}
