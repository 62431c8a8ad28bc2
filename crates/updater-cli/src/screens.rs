//! Screen routing for the REPL.

use dialoguer::{Confirm, Password};
use std::sync::Mutex;
use tracing::warn;
use updater_core::project::Confirmation;
use updater_core::session::{Navigator, Route};

/// Tracks which screen the REPL shows. Login and logout move it through
/// [`Navigator`]; the REPL moves it back to login on session expiry.
pub struct ScreenNavigator {
    current: Mutex<Route>,
}

impl ScreenNavigator {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Route::Login),
        }
    }

    pub fn current(&self) -> Route {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Navigator for ScreenNavigator {
    fn navigate(&self, route: Route) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = route;
    }
}

/// Terminal yes/no prompt. Anything but an explicit yes declines.
pub struct TerminalConfirmation;

impl Confirmation for TerminalConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Confirmation prompt failed, treating as declined");
                false
            })
    }
}

/// Reads a credential without echoing it.
pub fn read_credential() -> anyhow::Result<String> {
    Ok(Password::new().with_prompt("Credential").interact()?)
}
