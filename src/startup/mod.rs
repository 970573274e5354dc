//! Startup resolution flow.
//!
//! Decides, once per process start, which screen the user lands on:
//! - permission gate: network permissions or nothing
//! - session observation: wait for the session repository to be ready
//! - with a session: wait for the current user, resolve the deep link, hand off
//! - without one: clear the playback queue, show server login or picker
//!
//! All collaborators are injected through the traits in [`collaborators`].

mod collaborators;
mod decider;
mod deep_link;
mod flow;
mod lifecycle;
mod permissions;


use thiserror::Error;

use crate::domain::ItemId;

pub use collaborators::{
    Capability, ItemLookup, MainShell, NavigationStore, PermissionHost, PlaybackQueue,
    ScreenPresenter, ServerRepository, SessionStartHook, ShellFlags,
};
pub use decider::{decide, Snapshot};
pub use deep_link::{
    parse_item_id, user_view_destination, DeepLinkResolver, LaunchAction, LaunchParams,
    LaunchRequest,
};
pub use flow::{
    FlowOutcome, FlowState, StartupActivity, StartupDeps, WindowOutcome,
    PERMISSIONS_DENIED_NOTICE,
};
pub use lifecycle::{Lifecycle, LifecycleState, LifecycleWatch};
pub use permissions::{reduce_grants, PermissionGate, PermissionOutcome, REQUIRED_CAPABILITIES};

/// Faults that escape the startup flow.
///
/// Permission denial is not among them: it is handled in place (notice and
/// close) and reported as [`FlowOutcome::Aborted`].
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to look up item {id}")]
    ItemLookup {
        id: ItemId,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to read the remembered server")]
    ServerRepository(#[source] anyhow::Error),
    #[error("startup resolution started before permissions were granted")]
    PermissionsPending,
}
