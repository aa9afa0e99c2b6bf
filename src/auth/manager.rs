use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::SessionHandle;

/// Shown when login fails and the server did not say why
const GENERIC_LOGIN_FAILURE: &str = "Login failed. Please try again.";

/// Result of a login attempt that reached the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    /// The backend processed the attempt and turned it down. Carries the
    /// message the login form should show.
    Rejected(String),
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// The login endpoint reports business-level failure inside a 2xx body,
/// not through an HTTP status.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Drives the session lifecycle: the startup check, login, and logout.
///
/// State transitions themselves live in [`SessionHandle`]; this type owns
/// when they happen.
pub struct SessionManager {
    client: ApiClient,
    session: SessionHandle,
    bootstrap_once: OnceCell<()>,
}

impl SessionManager {
    pub fn new(client: ApiClient, session: SessionHandle) -> Self {
        Self {
            client,
            session,
            bootstrap_once: OnceCell::new(),
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Run the startup session check. Only the first call does the work;
    /// later and concurrent calls await that same run. `bootstrapping`
    /// flips to false once it settles, whatever the outcome.
    pub async fn bootstrap(&self) {
        self.bootstrap_once
            .get_or_init(|| async { self.run_bootstrap().await })
            .await;
    }

    async fn run_bootstrap(&self) {
        if self.session.marker().is_set() {
            if let Some(at) = self.session.marker().remembered_at() {
                debug!("Found login remembered at {}", at);
            }
            let _ = self.client.warm_credential().await;

            match self.client.fetch_employees().await {
                Ok(_) => {
                    debug!("Session probe succeeded");
                    self.session.mark_authenticated();
                }
                Err(e) if e.is_unauthorized() => {
                    // The client already cleared the marker and redirected.
                    debug!("Session probe rejected, previous login is no longer valid: {}", e);
                }
                Err(ApiError::CsrfRejected { detail }) => {
                    // Any 403 during the probe means the remembered login
                    // cannot be trusted.
                    debug!("Session probe forbidden: {}", detail);
                    if let Err(e) = self.session.marker().clear() {
                        warn!("Failed to clear login marker: {}", e);
                    }
                }
                Err(e) => {
                    // Transient failure; keep the marker so the next start
                    // probes again.
                    warn!("Session probe failed: {}", e);
                }
            }
        } else {
            // Nothing remembered. Warm the token in the background so the
            // login form's first submission does not pay acquisition
            // latency.
            let client = self.client.clone();
            tokio::spawn(async move {
                let _ = client.warm_credential().await;
            });
        }

        self.session.finish_bootstrap();
    }

    /// Attempt to log in.
    ///
    /// Never returns an error: transport and HTTP failures collapse into
    /// [`LoginOutcome::Rejected`] with the server's message when one was
    /// provided, or a generic one otherwise.
    pub async fn login(&self, username: &str, password: &str) -> LoginOutcome {
        // Acquire the token first so the submission itself carries it.
        let _ = self.client.warm_credential().await;

        let request = LoginRequest { username, password };
        match self.client.post::<LoginResponse, _>("/login/", &request).await {
            Ok(response) if response.success => {
                if let Err(e) = self.session.marker().set() {
                    warn!("Failed to persist login marker: {}", e);
                }
                self.session.mark_authenticated();
                // Re-warm so the next state-changing call does not need to
                // acquire a token of its own.
                let _ = self.client.warm_credential().await;
                info!("Login succeeded");
                LoginOutcome::LoggedIn
            }
            Ok(response) => {
                let message = response
                    .error
                    .unwrap_or_else(|| GENERIC_LOGIN_FAILURE.to_string());
                debug!("Login rejected: {}", message);
                LoginOutcome::Rejected(message)
            }
            Err(e) => {
                warn!("Login request failed: {}", e);
                let message = e
                    .server_message()
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| GENERIC_LOGIN_FAILURE.to_string());
                LoginOutcome::Rejected(message)
            }
        }
    }

    /// End the session. The server call is best-effort; local state is
    /// always cleared and the user always ends up on the login screen.
    pub async fn logout(&self) {
        if let Err(e) = self.client.post_empty::<serde_json::Value>("/logout/").await {
            warn!("Logout request failed: {}", e);
        }
        self.session.force_unauthenticated();
        info!("Logged out");
    }
}
