use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use landing::cli::{resolve_data_dir, Cli, Commands, StartArgs};
use landing::command::{run_login, run_logout, run_start, run_status};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let data_dir = resolve_data_dir(cli.data_dir)?;

    match cli.command {
        Some(Commands::Start(args)) => run_start(data_dir, args).await?,
        Some(Commands::Login { address, token }) => run_login(data_dir, address, token).await?,
        Some(Commands::Logout) => run_logout(data_dir).await?,
        Some(Commands::Status) => run_status(data_dir).await?,
        // No command runs the startup flow with a plain launch
        None => run_start(data_dir, StartArgs::default()).await?,
    }

    Ok(())
}
