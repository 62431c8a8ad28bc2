use super::api::{IdentityApi, LoginResponse};
use super::navigation::{Navigator, Route};
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// The operator's authentication session.
///
/// `AuthSession` is the only owner of the authenticated flag. Everything that
/// wants to mutate remote data asks it through [`verify`](Self::verify), which
/// always performs a round trip because the server may have expired the
/// session since the last check.
///
/// State machine:
///
/// ```text
/// Unauthenticated --login ok / verify true--> Authenticated
/// Authenticated --logout / verify false / verify 401 / verify fault--> Unauthenticated
/// ```
pub struct AuthSession {
    identity: Arc<dyn IdentityApi>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<bool>,
}

impl AuthSession {
    /// Creates an unauthenticated session.
    pub fn new(identity: Arc<dyn IdentityApi>, navigator: Arc<dyn Navigator>) -> Self {
        let (state, _) = watch::channel(false);
        Self {
            identity,
            navigator,
            state,
        }
    }

    /// Last known local state. Not authoritative; use [`verify`](Self::verify)
    /// before mutating anything.
    pub fn is_authenticated(&self) -> bool {
        *self.state.borrow()
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// Attempts to log in.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: accepted; state is authenticated and the view is sent to
    ///   [`Route::Main`]
    /// - `Ok(false)`: credential rejected (401); state unchanged
    /// - `Err(_)`: any other failure, propagated untouched
    pub async fn login(&self, credential: &str) -> Result<bool> {
        match self.identity.login(credential).await {
            Ok(LoginResponse::Accepted) => {
                self.set_authenticated(true);
                info!("Login accepted");
                self.navigator.navigate(Route::Main);
                Ok(true)
            }
            Ok(LoginResponse::Unauthorized) => {
                info!("Login rejected: invalid credential");
                Ok(false)
            }
            Err(err) => {
                warn!(error = %err, "Login failed");
                Err(err)
            }
        }
    }

    /// Ends the server-side session.
    ///
    /// The local flag only changes once the server confirms. A failed request
    /// leaves it as it was; the next [`verify`](Self::verify) reconciles it.
    pub async fn logout(&self) -> Result<()> {
        if let Err(err) = self.identity.logout().await {
            warn!(error = %err, "Logout request failed, local session state kept");
            return Err(err);
        }

        self.set_authenticated(false);
        info!("Logged out");
        self.navigator.navigate(Route::Login);
        Ok(())
    }

    /// Asks the server whether the session is still valid and records the
    /// answer locally.
    pub async fn verify(&self) -> Result<bool> {
        match self.identity.verify_token().await {
            Ok(valid) => {
                debug!(valid, "Session verified");
                self.set_authenticated(valid);
                Ok(valid)
            }
            Err(err) => {
                warn!(error = %err, "Session verification failed");
                self.set_authenticated(false);
                Err(err)
            }
        }
    }

    fn set_authenticated(&self, value: bool) {
        self.state.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }
}
