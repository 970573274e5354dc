//! Domain types shared across modules.
//!
//! The startup flow, the repositories and the API client all speak in these
//! types. Keeping them here avoids circular dependencies between modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ServerId = Uuid;
pub type ItemId = Uuid;
pub type UserId = Uuid;

/// Coarse lifecycle of the session repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
}

/// An authenticated connection to one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub server_id: ServerId,
    pub server_address: String,
    pub access_token: String,
}

/// The active profile under a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
}

/// A server the client has connected to before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub id: ServerId,
    pub name: String,
    pub address: String,
    pub last_used: DateTime<Utc>,
}

/// A library item as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(rename = "Type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub collection_type: Option<String>,
}

/// Which library browser a user view opens in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryKind {
    Movies,
    TvShows,
    Music,
    LiveTv,
    Playlists,
    Collections,
    Folders,
    Other,
}

impl LibraryKind {
    pub fn from_collection_type(collection_type: Option<&str>) -> Self {
        match collection_type.map(str::to_ascii_lowercase).as_deref() {
            Some("movies") => LibraryKind::Movies,
            Some("tvshows") => LibraryKind::TvShows,
            Some("music") => LibraryKind::Music,
            Some("livetv") => LibraryKind::LiveTv,
            Some("playlists") => LibraryKind::Playlists,
            Some("boxsets") => LibraryKind::Collections,
            Some("folders") => LibraryKind::Folders,
            _ => LibraryKind::Other,
        }
    }
}

/// Where the main shell should open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Search,
    UserView { item: Item, kind: LibraryKind },
    ItemDetails(ItemId),
    /// No destination requested; the shell opens its default page.
    Home,
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Search => write!(f, "search"),
            Destination::UserView { item, kind } => {
                write!(f, "user view {} ({:?}, {})", item.name, kind, item.id)
            }
            Destination::ItemDetails(id) => write!(f, "item details {}", id),
            Destination::Home => write!(f, "home"),
        }
    }
}

/// The outcome of one resolution step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    ShowSplash,
    ShowServerPicker,
    ShowServerLogin(ServerId),
    HandOff(Destination),
}

/// What the presenter currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Splash,
    ServerPicker,
    ServerLogin(ServerId),
}
