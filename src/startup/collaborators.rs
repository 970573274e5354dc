//! Seams between the startup flow and the rest of the application.
//!
//! Everything the flow reads or writes outside its own state goes through one
//! of these traits, so the flow can be driven by fabricated collaborators.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{Destination, Item, ItemId, Screen, Server, Session};

/// Required runtime capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Internet,
    AccessNetworkState,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Internet => "INTERNET",
            Capability::AccessNetworkState => "ACCESS_NETWORK_STATE",
        }
    }
}

/// The host permission system. Answers with one grant result per capability.
#[async_trait]
pub trait PermissionHost: Send + Sync {
    async fn request(&self, capabilities: &[Capability]) -> Vec<(Capability, bool)>;
}

/// Swaps the visible screen.
pub trait ScreenPresenter: Send + Sync {
    fn current(&self) -> Option<Screen>;
    fn show(&self, screen: Screen);
    /// Short user-facing notice (toast).
    fn notify(&self, message: &str);
    /// Close the startup screen.
    fn finish(&self);
}

#[async_trait]
pub trait ItemLookup: Send + Sync {
    async fn get_item(&self, session: &Session, id: ItemId) -> Result<Item>;
}

pub trait ServerRepository: Send + Sync {
    fn last_server(&self) -> Result<Option<Server>>;
}

pub trait PlaybackQueue: Send + Sync {
    fn clear_queue(&self);
}

pub trait NavigationStore: Send + Sync {
    fn reset(&self, destination: Destination);
}

/// Called once a session is confirmed, right before hand-off.
pub trait SessionStartHook: Send + Sync {
    fn on_session_start(&self);
}

/// Task flags used when launching the main shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellFlags {
    /// Drop the existing back stack.
    pub clear_task: bool,
    /// Make the shell the root of its task.
    pub task_root: bool,
}

impl ShellFlags {
    pub const HAND_OFF: ShellFlags = ShellFlags {
        clear_task: true,
        task_root: true,
    };
}

pub trait MainShell: Send + Sync {
    fn launch(&self, flags: ShellFlags);
}
