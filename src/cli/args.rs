use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::startup::{LaunchAction, LaunchParams};

/// Landing - decides which screen a media client opens on
#[derive(Parser)]
#[command(name = "landing")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory for session and server files. Defaults to ~/.landing
    #[arg(long, env = "LANDING_DATA_DIR", global = true)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the startup flow (default)
    Start(StartArgs),
    /// Sign in to a server with an access token
    Login {
        /// Server address, e.g. http://10.0.0.2:8096
        #[arg(long)]
        address: String,

        /// Access token (API key or session token)
        #[arg(long, env = "LANDING_LOGIN_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Sign out; the server stays remembered
    Logout,
    /// Show the stored session and remembered server
    Status,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ActionArg {
    View,
    Search,
    #[default]
    Main,
}

impl From<ActionArg> for LaunchAction {
    fn from(action: ActionArg) -> Self {
        match action {
            ActionArg::View => LaunchAction::View,
            ActionArg::Search => LaunchAction::Search,
            ActionArg::Main => LaunchAction::Main,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct StartArgs {
    /// Launch action
    #[arg(long, value_enum, default_value_t = ActionArg::Main)]
    pub action: ActionArg,

    /// Data reference for `--action view` (an item id)
    #[arg(long)]
    pub data: Option<String>,

    /// Item to open
    #[arg(long)]
    pub item_id: Option<String>,

    /// Treat --item-id as a library (user view)
    #[arg(long)]
    pub user_view: bool,

    /// Do not show the splash while waiting for permissions
    #[arg(long)]
    pub hide_splash: bool,

    /// Grant network permissions without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Fail server requests on the first error instead of retrying
    #[arg(long)]
    pub no_retry: bool,

    /// Give up if no screen is decided within this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl StartArgs {
    pub fn launch_params(&self) -> LaunchParams {
        LaunchParams {
            action: self.action.into(),
            data: self.data.clone(),
            item_id: self.item_id.clone(),
            item_is_user_view: self.user_view,
            hide_splash: self.hide_splash,
        }
    }
}
