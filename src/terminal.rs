//! Terminal stand-ins for the host: presenter, permission prompt, and shell
//! launcher used by the `start` command.

use std::io::{self, Write};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::Screen;
use crate::startup::{Capability, MainShell, PermissionHost, ScreenPresenter, ShellFlags};

#[derive(Default)]
pub struct TerminalPresenter {
    current: Mutex<Option<Screen>>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScreenPresenter for TerminalPresenter {
    fn current(&self) -> Option<Screen> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn show(&self, screen: Screen) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = Some(screen);
        match screen {
            Screen::Splash => println!("⏳ Starting up..."),
            Screen::ServerPicker => {
                println!("🖥️  No server selected.");
                println!("   Run 'landing login --address <url> --token <token>' to add one.");
            }
            Screen::ServerLogin(id) => {
                println!("🔐 Signed out of server {}.", id);
                println!("   Run 'landing login --address <url> --token <token>' to sign in.");
            }
        }
    }

    fn notify(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }

    fn finish(&self) {
        debug!("Startup screen closed");
    }
}

/// Prompts once for all capabilities, or grants them up front.
pub struct TerminalPermissionHost {
    assume_yes: bool,
}

impl TerminalPermissionHost {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

fn prompt_yes_default(question: &str) -> io::Result<bool> {
    print!("{} [Y/n]: ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();

    Ok(answer.is_empty() || answer == "y" || answer == "yes")
}

#[async_trait]
impl PermissionHost for TerminalPermissionHost {
    async fn request(&self, capabilities: &[Capability]) -> Vec<(Capability, bool)> {
        if self.assume_yes {
            return capabilities.iter().map(|c| (*c, true)).collect();
        }

        let names = capabilities
            .iter()
            .map(Capability::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let question = format!("Allow network access ({})?", names);

        let granted = match tokio::task::spawn_blocking(move || prompt_yes_default(&question)).await
        {
            Ok(Ok(granted)) => granted,
            Ok(Err(e)) => {
                warn!("Could not read permission answer: {}", e);
                false
            }
            Err(e) => {
                warn!("Permission prompt failed: {}", e);
                false
            }
        };

        capabilities.iter().map(|c| (*c, granted)).collect()
    }
}

pub struct TerminalShell;

impl MainShell for TerminalShell {
    fn launch(&self, flags: ShellFlags) {
        debug!(
            "Launching main shell (clear_task={}, task_root={})",
            flags.clear_task, flags.task_root
        );
        println!("🚀 Opening main shell");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presenter_tracks_current_screen() {
        let presenter = TerminalPresenter::new();
        assert_eq!(presenter.current(), None);

        presenter.show(Screen::Splash);
        assert_eq!(presenter.current(), Some(Screen::Splash));

        presenter.show(Screen::ServerPicker);
        assert_eq!(presenter.current(), Some(Screen::ServerPicker));
    }

    #[tokio::test]
    async fn test_assume_yes_grants_everything() {
        let host = TerminalPermissionHost::new(true);
        let grants = host
            .request(&[Capability::Internet, Capability::AccessNetworkState])
            .await;
        assert_eq!(
            grants,
            vec![
                (Capability::Internet, true),
                (Capability::AccessNetworkState, true)
            ]
        );
    }
}
