//! Startup activity: drives the permission gate, session observation, user
//! settle, deep-link resolution and hand-off.
//!
//! ```text
//! on_create()    splash (unless hidden) -> permission gate
//! run_window()   wait for Resumed -> first READY -> branch:
//!                  session  -> splash -> first user -> start hook -> deep link -> hand-off
//!                  none     -> clear queue -> server login / server picker
//! run()          on_create() then run_window() until hand-off or destroy
//! ```
//!
//! A window is raced against the host leaving the resumed state; losing that
//! race drops the cycle and the next resume starts a fresh one.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::collaborators::{
    ItemLookup, MainShell, NavigationStore, PermissionHost, PlaybackQueue, ScreenPresenter,
    ServerRepository, SessionStartHook, ShellFlags,
};
use super::decider::{decide_ready, Snapshot};
use super::deep_link::{DeepLinkResolver, LaunchParams, LaunchRequest};
use super::lifecycle::Lifecycle;
use super::permissions::{PermissionGate, PermissionOutcome, REQUIRED_CAPABILITIES};
use super::StartupError;
use crate::domain::{Decision, Destination, Screen, Session, SessionState, User};
use crate::repository::{SessionRepository, UserRepository};

/// Notice shown when the required permissions are refused.
pub const PERMISSIONS_DENIED_NOTICE: &str =
    "Network permissions are required to connect to your media server.";

/// Everything the startup activity reads from or writes to.
#[derive(Clone)]
pub struct StartupDeps {
    pub presenter: Arc<dyn ScreenPresenter>,
    pub permissions: Arc<dyn PermissionHost>,
    pub sessions: SessionRepository,
    pub users: UserRepository,
    pub servers: Arc<dyn ServerRepository>,
    pub items: Arc<dyn ItemLookup>,
    pub playback: Arc<dyn PlaybackQueue>,
    pub navigation: Arc<dyn NavigationStore>,
    pub session_hook: Arc<dyn SessionStartHook>,
    pub shell: Arc<dyn MainShell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    AwaitingPermission,
    ObservingSession,
    ResolvingUser,
    PresentingServerFlow,
    Resolved(Decision),
    Aborted,
}

/// How a full run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    HandedOff(Destination),
    /// Permissions were denied; the user was notified and the activity closed.
    Aborted,
    /// The host was destroyed before a hand-off.
    Closed,
}

/// How one resumed window ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowOutcome {
    Decided(Decision),
    /// The host left the resumed state before a decision.
    Interrupted,
    Destroyed,
}

pub struct StartupActivity {
    deps: StartupDeps,
    launch: LaunchParams,
    request: LaunchRequest,
    lifecycle: Lifecycle,
    state: FlowState,
    permissions_granted: bool,
}

impl StartupActivity {
    pub fn new(deps: StartupDeps, launch: LaunchParams, lifecycle: Lifecycle) -> Self {
        let request = LaunchRequest::from_params(&launch);
        debug!(
            "Launch (action={:?}, request={:?}, hide_splash={})",
            launch.action, request, launch.hide_splash
        );

        Self {
            deps,
            launch,
            request,
            lifecycle,
            state: FlowState::Idle,
            permissions_granted: false,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    fn transition(&mut self, next: FlowState) {
        debug!("Startup {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Show the splash and ask for permissions. Only asks once per process;
    /// later calls report the remembered grant.
    pub async fn on_create(&mut self) -> PermissionOutcome {
        if self.permissions_granted {
            return PermissionOutcome::Granted;
        }

        if !self.launch.hide_splash {
            self.show_splash();
        }

        self.transition(FlowState::AwaitingPermission);
        let outcome = PermissionGate::new(self.deps.permissions.as_ref())
            .request(REQUIRED_CAPABILITIES)
            .await;

        match outcome {
            PermissionOutcome::Granted => {
                self.permissions_granted = true;
                self.transition(FlowState::ObservingSession);
            }
            PermissionOutcome::Denied => {
                warn!("Required permissions denied, closing");
                self.deps.presenter.notify(PERMISSIONS_DENIED_NOTICE);
                self.deps.presenter.finish();
                self.transition(FlowState::Aborted);
            }
        }

        outcome
    }

    /// Run one resumed window: wait for the host to be resumed, then resolve
    /// unless the host leaves the window first.
    pub async fn run_window(&mut self) -> Result<WindowOutcome, StartupError> {
        if !self.permissions_granted {
            return Err(StartupError::PermissionsPending);
        }

        let mut window = self.lifecycle.watch();
        if !window.resumed().await {
            return Ok(WindowOutcome::Destroyed);
        }

        let cycle = tokio::select! {
            biased;
            _ = window.left_resumed() => None,
            result = self.resolve_cycle() => Some(result),
        };

        match cycle {
            Some(result) => result.map(WindowOutcome::Decided),
            None => {
                debug!("Left resumed window before a decision, cancelling");
                self.transition(FlowState::ObservingSession);
                Ok(WindowOutcome::Interrupted)
            }
        }
    }

    /// Drive the activity until it hands off, is aborted, or is destroyed.
    pub async fn run(&mut self) -> Result<FlowOutcome, StartupError> {
        if self.on_create().await == PermissionOutcome::Denied {
            return Ok(FlowOutcome::Aborted);
        }

        loop {
            match self.run_window().await? {
                WindowOutcome::Decided(Decision::HandOff(destination)) => {
                    return Ok(FlowOutcome::HandedOff(destination));
                }
                WindowOutcome::Decided(decision) => {
                    debug!("{:?} presented, waiting for next resume", decision);
                    self.lifecycle.watch().left_resumed().await;
                }
                WindowOutcome::Interrupted => {}
                WindowOutcome::Destroyed => return Ok(FlowOutcome::Closed),
            }
        }
    }

    async fn resolve_cycle(&mut self) -> Result<Decision, StartupError> {
        self.transition(FlowState::ObservingSession);
        self.await_ready().await;

        let decision = match self.deps.sessions.current_session() {
            Some(session) => self.resolve_session(&session).await?,
            None => self.resolve_server_flow()?,
        };

        self.present(&decision);
        self.transition(FlowState::Resolved(decision.clone()));
        Ok(decision)
    }

    fn resolve_server_flow(&mut self) -> Result<Decision, StartupError> {
        self.transition(FlowState::PresentingServerFlow);
        // Queue left over from a previous run belongs to no session
        self.deps.playback.clear_queue();
        let remembered_server = self
            .deps
            .servers
            .last_server()
            .map_err(StartupError::ServerRepository)?
            .map(|server| server.id);

        Ok(decide_ready(&Snapshot {
            remembered_server,
            ..Snapshot::ready(None)
        }))
    }

    /// Splash until the user settles and the deep link resolves.
    async fn resolve_session(&mut self, session: &Session) -> Result<Decision, StartupError> {
        info!("Found a session, waiting for the current user");
        self.transition(FlowState::ResolvingUser);

        let mut user: Option<User> = None;
        let mut destination: Option<Destination> = None;

        loop {
            let decision = decide_ready(&Snapshot {
                user: user.as_ref(),
                destination: destination.as_ref(),
                ..Snapshot::ready(Some(session))
            });
            if decision != Decision::ShowSplash {
                return Ok(decision);
            }

            self.show_splash();
            if user.is_none() {
                let settled = self.await_user().await;
                info!("Current user is {} while starting up", settled.id);
                user = Some(settled);
                // The session counts as started even if the deep link fails
                self.deps.session_hook.on_session_start();
            } else {
                let resolved = DeepLinkResolver::new(self.deps.items.as_ref())
                    .resolve(&self.request, session)
                    .await?;
                destination = Some(resolved);
            }
        }
    }

    fn present(&self, decision: &Decision) {
        match decision {
            Decision::HandOff(destination) => self.hand_off(destination.clone()),
            Decision::ShowServerLogin(id) => {
                info!("No session, showing login for server {}", id);
                self.deps.presenter.show(Screen::ServerLogin(*id));
            }
            Decision::ShowServerPicker => {
                info!("No session and no known server, showing server picker");
                self.deps.presenter.show(Screen::ServerPicker);
            }
            Decision::ShowSplash => self.show_splash(),
        }
    }

    /// First READY wins; earlier states are ignored.
    async fn await_ready(&self) {
        let mut states = self.deps.sessions.subscribe_state();
        let ready = states
            .wait_for(|state| *state == SessionState::Ready)
            .await
            .is_ok();
        if !ready {
            warn!("Session repository closed before it became ready");
            std::future::pending::<()>().await;
        }
    }

    /// First non-null user wins; the subscription is dropped afterwards.
    async fn await_user(&self) -> User {
        let mut users = self.deps.users.subscribe();
        let settled = users
            .wait_for(Option::is_some)
            .await
            .map(|user| (*user).clone());

        match settled {
            Ok(Some(user)) => user,
            _ => {
                warn!("User repository closed before a user settled");
                std::future::pending().await
            }
        }
    }

    fn show_splash(&self) {
        // Replacing splash with itself makes the progress bar flash
        if self.deps.presenter.current() == Some(Screen::Splash) {
            return;
        }
        self.deps.presenter.show(Screen::Splash);
    }

    fn hand_off(&self, destination: Destination) {
        info!("Handing off to the main shell ({})", destination);
        self.deps.navigation.reset(destination);
        self.deps.shell.launch(ShellFlags::HAND_OFF);
        self.deps.presenter.finish();
    }
}
