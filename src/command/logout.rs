use std::path::PathBuf;

use anyhow::Result;

use crate::session::SessionStore;

pub async fn run_logout(data_dir: PathBuf) -> Result<()> {
    let session_store = SessionStore::new(data_dir)?;

    let Some(session) = session_store.get_session()? else {
        println!("You are not signed in.");
        return Ok(());
    };

    // The server stays in servers.json so the next start offers its login
    session_store.remove_session()?;
    println!("✅ Signed out of {}.", session.server_address);

    Ok(())
}
