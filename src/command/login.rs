use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::api::ApiClient;
use crate::domain::{Server, Session};
use crate::servers::ServerStore;
use crate::session::SessionStore;

pub async fn run_login(data_dir: PathBuf, address: String, token: String) -> Result<()> {
    let session_store = SessionStore::new(data_dir.clone())?;
    let server_store = ServerStore::new(data_dir)?;

    if let Some(existing) = session_store.get_session()? {
        println!(
            "⚠️  Replacing the current session for {}.",
            existing.server_address
        );
    }

    let address = address.trim_end_matches('/').to_string();
    let api = ApiClient::new()?;

    println!("🔗 Contacting {}...", address);
    let info = api
        .public_system_info(&address)
        .await
        .with_context(|| format!("Could not reach a media server at {}", address))?;

    let session = Session {
        server_id: info.id,
        server_address: address.clone(),
        access_token: token,
    };

    let user = api
        .fetch_current_user(&session)
        .await
        .context("The server did not accept the access token")?;

    let name = info.server_name.unwrap_or_else(|| address.clone());
    server_store.upsert(Server {
        id: info.id,
        name: name.clone(),
        address,
        last_used: Utc::now(),
    })?;
    session_store.save_session(&session)?;

    println!("✅ Signed in to {} as {}", name, user.name);

    Ok(())
}
