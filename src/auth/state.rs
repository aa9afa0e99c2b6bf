use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::auth::marker::MarkerStore;
use crate::nav::{Navigator, LOGIN_PATH};

/// Observable authentication state.
///
/// `bootstrapping` starts true and flips to false exactly once, after the
/// startup session check has settled. Embedders typically render a loading
/// view while it is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub authenticated: bool,
    pub bootstrapping: bool,
}

impl SessionState {
    fn initial() -> Self {
        Self {
            authenticated: false,
            bootstrapping: true,
        }
    }
}

struct SessionInner {
    state: watch::Sender<SessionState>,
    marker: MarkerStore,
    navigator: Arc<dyn Navigator>,
    /// Serializes the logged-out transition; two racing triggers must not
    /// both read a pre-redirect path and navigate twice.
    transition: Mutex<()>,
}

/// Shared handle to the session state.
///
/// Cloning is cheap; all clones observe and mutate the same state. The
/// handle is the single place the logged-out transition is implemented,
/// so the HTTP layer and the session manager cannot drift apart on what
/// "logged out" means.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<SessionInner>,
}

impl SessionHandle {
    pub fn new(marker: MarkerStore, navigator: Arc<dyn Navigator>) -> Self {
        let (state, _) = watch::channel(SessionState::initial());
        Self {
            inner: Arc::new(SessionInner {
                state,
                marker,
                navigator,
                transition: Mutex::new(()),
            }),
        }
    }

    /// Current state, read without subscribing.
    pub fn snapshot(&self) -> SessionState {
        *self.inner.state.borrow()
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().authenticated
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn marker(&self) -> &MarkerStore {
        &self.inner.marker
    }

    /// Record that the backend confirmed a live session.
    pub(crate) fn mark_authenticated(&self) {
        self.inner.state.send_modify(|s| s.authenticated = true);
    }

    /// Record that the startup session check has settled.
    pub(crate) fn finish_bootstrap(&self) {
        self.inner.state.send_modify(|s| s.bootstrapping = false);
    }

    /// Transition to logged-out: drop the authenticated flag, forget the
    /// remembered login, and send the user to the login screen unless they
    /// are already there.
    ///
    /// Safe to call repeatedly and from racing callers; the transition is
    /// serialized, so once on the login screen no later call navigates again.
    pub(crate) fn force_unauthenticated(&self) {
        let _transition = match self.inner.transition.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        self.inner.state.send_modify(|s| s.authenticated = false);

        if let Err(e) = self.inner.marker.clear() {
            tracing::warn!("Failed to clear login marker: {}", e);
        }

        let current = self.inner.navigator.current_path();
        if current != LOGIN_PATH {
            tracing::info!("Session is no longer valid, redirecting to login");
            self.inner.navigator.navigate(LOGIN_PATH);
        } else {
            tracing::debug!("Already on login screen, not redirecting");
        }
    }
}
