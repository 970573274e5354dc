use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tracing::{debug, info};

use crate::api::{ApiClient, RetryPolicy};
use crate::cli::StartArgs;
use crate::domain::Decision;
use crate::metadata::SessionStatsStore;
use crate::navigation::NavigationRepository;
use crate::playback::MediaQueue;
use crate::repository::{SessionRepository, UserRepository};
use crate::servers::ServerStore;
use crate::session::SessionStore;
use crate::startup::{
    Lifecycle, PermissionOutcome, StartupActivity, StartupDeps, WindowOutcome,
};
use crate::terminal::{TerminalPermissionHost, TerminalPresenter, TerminalShell};

pub async fn run_start(data_dir: PathBuf, args: StartArgs) -> Result<()> {
    let session_store = SessionStore::new(data_dir.clone())?;
    let servers = Arc::new(ServerStore::new(data_dir.clone())?);
    let stats = Arc::new(SessionStatsStore::new(data_dir)?);
    let mut api = ApiClient::new()?;
    if args.no_retry {
        api = api.with_retry(RetryPolicy::none());
    }
    let api = Arc::new(api);

    let sessions = SessionRepository::new();
    let users = UserRepository::new();
    let navigation = NavigationRepository::new();
    let _user_task = users.follow_sessions(&sessions, api.clone());

    let deps = StartupDeps {
        presenter: Arc::new(TerminalPresenter::new()),
        permissions: Arc::new(TerminalPermissionHost::new(args.yes)),
        sessions: sessions.clone(),
        users,
        servers,
        items: api,
        playback: Arc::new(MediaQueue::new()),
        navigation: Arc::new(navigation.clone()),
        session_hook: stats,
        shell: Arc::new(TerminalShell),
    };

    let lifecycle = Lifecycle::new();
    let mut activity = StartupActivity::new(deps, args.launch_params(), lifecycle.clone());
    lifecycle.resume();

    // Session restore runs alongside the activity, as it does at process start
    let restore = tokio::spawn(async move { sessions.restore(&session_store).await });

    {
        let lifecycle = lifecycle.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("Interrupted, leaving the startup screen");
                lifecycle.destroy();
            }
        });
    }

    if activity.on_create().await == PermissionOutcome::Denied {
        anyhow::bail!("Startup aborted: network permissions were denied");
    }

    let outcome = match args.timeout {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), activity.run_window())
            .await
            .map_err(|_| {
                anyhow!(
                    "No screen decided after {}s; the server may be unreachable",
                    secs
                )
            })??,
        None => activity.run_window().await?,
    };

    restore.abort();

    match outcome {
        WindowOutcome::Decided(Decision::HandOff(_)) => {
            if let Some(destination) = navigation.current() {
                println!("   Destination: {}", destination);
            }
        }
        WindowOutcome::Decided(decision) => info!("Startup settled on {:?}", decision),
        WindowOutcome::Interrupted | WindowOutcome::Destroyed => {
            anyhow::bail!("Startup interrupted before a screen was chosen")
        }
    }

    Ok(())
}
