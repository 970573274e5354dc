use std::path::PathBuf;

use anyhow::Result;

use crate::metadata::SessionStatsStore;
use crate::servers::ServerStore;
use crate::session::SessionStore;

pub async fn run_status(data_dir: PathBuf) -> Result<()> {
    let session_store = SessionStore::new(data_dir.clone())?;
    let server_store = ServerStore::new(data_dir.clone())?;
    let stats = SessionStatsStore::new(data_dir)?.stats()?;

    match session_store.get_session()? {
        Some(session) => {
            println!("✅ Signed in");
            println!("   Server: {} ({})", session.server_address, session.server_id);
        }
        None => {
            println!("❌ Not signed in");
        }
    }

    let mut servers = server_store.servers()?;
    if servers.is_empty() {
        println!("   No remembered server");
    } else {
        servers.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        println!("   Known servers (most recent first):");
        for server in &servers {
            println!(
                "   - {} at {} (used {})",
                server.name,
                server.address,
                server.last_used.to_rfc3339()
            );
        }
    }

    match stats.last_started {
        Some(at) => println!(
            "   Sessions started: {} (last {})",
            stats.session_count,
            at.to_rfc3339()
        ),
        None => println!("   Sessions started: {}", stats.session_count),
    }

    Ok(())
}
